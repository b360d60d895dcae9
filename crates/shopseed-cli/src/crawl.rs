//! `crawl` command handler.

use std::path::Path;
use std::time::Duration;

use shopseed_core::{load_sites, AppConfig, SiteConfig, SiteType};
use shopseed_scraper::{export, ExtractionState, Orchestrator, PageSession, WebDriverSession};

/// Keep only the sites of `site_type`, or all of them when `None`.
pub(crate) fn select_sites(sites: Vec<SiteConfig>, site_type: Option<SiteType>) -> Vec<SiteConfig> {
    match site_type {
        Some(wanted) => sites.into_iter().filter(|s| s.site_type == wanted).collect(),
        None => sites,
    }
}

/// Run extraction over the configured sites and export whatever was gathered.
///
/// The browser session is closed and the export written even when a site
/// fails part way; the site error is returned afterwards.
///
/// # Errors
///
/// Returns an error if the site list is invalid or empty after filtering,
/// the `WebDriver` server is unreachable, a site fails unrecoverably, or the
/// export cannot be written.
pub(crate) async fn run_crawl(
    config: &AppConfig,
    sites_path: &Path,
    out_dir: &Path,
    webdriver_url: &str,
    site_type: Option<SiteType>,
) -> anyhow::Result<()> {
    let sites = select_sites(load_sites(sites_path)?.sites, site_type);
    if sites.is_empty() {
        anyhow::bail!(
            "no sites to crawl in {} (filter: {})",
            sites_path.display(),
            site_type.map_or_else(|| "none".to_string(), |t| t.to_string())
        );
    }

    let session =
        WebDriverSession::connect(webdriver_url, Duration::from_millis(config.element_wait_ms))
            .await?;
    let mut state = ExtractionState::new(config.item_defaults.clone());

    let result = Orchestrator::new(&session).run(&sites, &mut state).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "extraction aborted; exporting partial results");
    }

    if let Err(e) = session.quit().await {
        tracing::warn!(error = %e, "failed to close browser session");
    }

    let paths = export(&state, out_dir)?;
    println!(
        "extracted {} items and {} images",
        state.items().len(),
        state.images().len()
    );
    for path in &paths {
        println!("  wrote {}", path.display());
    }

    let summaries = result?;
    for summary in &summaries {
        let note = if summary.exhausted { " (stopped early)" } else { "" };
        println!(
            "  {:<20} {:>3} items {:>4} images  {}{note}",
            summary.site_type, summary.items, summary.images, summary.entry_url
        );
    }

    Ok(())
}
