mod crawl;
mod ingest;
mod sites;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopseed_core::SiteType;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopseed")]
#[command(about = "Extract product listings and seed them into a catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract listings from the configured sites and export them as CSV
    Crawl {
        /// Site list YAML (defaults to `SHOPSEED_SITES_PATH`)
        #[arg(long)]
        sites: Option<PathBuf>,
        /// Directory to write the CSV files into (defaults to `SHOPSEED_EXPORT_DIR`)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// `WebDriver` server URL (defaults to `SHOPSEED_WEBDRIVER_URL`)
        #[arg(long)]
        webdriver_url: Option<String>,
        /// Only visit sites of this type (e.g. `samsung_store`)
        #[arg(long)]
        site_type: Option<SiteType>,
    },
    /// Download images and submit exported items to the catalog
    Ingest {
        /// Item CSV (defaults to `<export dir>/item_data_utf8.csv`)
        #[arg(long)]
        items: Option<PathBuf>,
        /// Image CSV (defaults to `<export dir>/img_data_utf8.csv`)
        #[arg(long)]
        images: Option<PathBuf>,
        /// Catalog create-item endpoint (defaults to `SHOPSEED_CATALOG_ENDPOINT`)
        #[arg(long)]
        endpoint: Option<String>,
        /// Items processed at once (defaults to `SHOPSEED_INGEST_CONCURRENCY`)
        #[arg(long)]
        concurrency: Option<usize>,
        /// Validate and download without submitting anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate and list the configured sites
    Sites {
        /// Site list YAML (defaults to `SHOPSEED_SITES_PATH`)
        #[arg(long)]
        sites: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shopseed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Crawl {
            sites,
            out_dir,
            webdriver_url,
            site_type,
        }) => {
            let sites = sites.unwrap_or_else(|| config.sites_path.clone());
            let out_dir = out_dir.unwrap_or_else(|| config.export_dir.clone());
            let webdriver_url = webdriver_url.unwrap_or_else(|| config.webdriver_url.clone());
            crawl::run_crawl(&config, &sites, &out_dir, &webdriver_url, site_type).await?;
        }
        Some(Commands::Ingest {
            items,
            images,
            endpoint,
            concurrency,
            dry_run,
        }) => {
            let paths = ingest::IngestPaths::resolve(&config, items, images);
            let concurrency = concurrency.unwrap_or(config.ingest_concurrency);
            ingest::run_ingest(&config, &paths, endpoint.as_deref(), concurrency, dry_run).await?;
        }
        Some(Commands::Sites { sites }) => {
            let sites = sites.unwrap_or_else(|| config.sites_path.clone());
            sites::run_sites(&sites)?;
        }
        None => {
            println!("shopseed: pass a command (crawl, ingest, sites); see --help");
        }
    }

    Ok(())
}
