//! `ingest` command handler.

use std::path::PathBuf;

use anyhow::Context;
use shopseed_core::AppConfig;
use shopseed_ingest::{CatalogClient, ImageFetcher, IngestPipeline};
use shopseed_store::{build_image_index, read_image_rows, read_item_rows, Dataset, TextEncoding};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IngestPaths {
    pub(crate) items: PathBuf,
    pub(crate) images: PathBuf,
}

impl IngestPaths {
    /// Explicit paths win; otherwise the UTF-8 exports in the export dir.
    pub(crate) fn resolve(
        config: &AppConfig,
        items: Option<PathBuf>,
        images: Option<PathBuf>,
    ) -> Self {
        let default_path =
            |dataset: Dataset| config.export_dir.join(dataset.file_name(TextEncoding::Utf8));
        Self {
            items: items.unwrap_or_else(|| default_path(Dataset::Items)),
            images: images.unwrap_or_else(|| default_path(Dataset::Images)),
        }
    }
}

/// Read the exported datasets and push every valid item to the catalog.
///
/// # Errors
///
/// Returns an error if either dataset cannot be read, no endpoint is
/// configured outside dry-run mode, or the HTTP clients cannot be built.
/// Per-item failures are counted in the printed report, not returned.
pub(crate) async fn run_ingest(
    config: &AppConfig,
    paths: &IngestPaths,
    endpoint: Option<&str>,
    concurrency: usize,
    dry_run: bool,
) -> anyhow::Result<()> {
    let items = read_item_rows(&paths.items)?;
    let image_rows = read_image_rows(&paths.images)?;
    let image_index = build_image_index(&image_rows);
    tracing::info!(
        items = items.len(),
        image_rows = image_rows.len(),
        items_with_images = image_index.len(),
        "datasets loaded"
    );

    let fetcher = ImageFetcher::new(
        config.fetch_timeout_secs,
        &config.fetch_user_agent,
        config.fetch_max_retries,
        config.fetch_retry_backoff_base_secs,
    )?;

    let catalog = if dry_run {
        None
    } else {
        let endpoint = match endpoint {
            Some(endpoint) => endpoint,
            None => config
                .require_catalog_endpoint()
                .context("no catalog endpoint; pass --endpoint or use --dry-run")?,
        };
        Some(CatalogClient::new(endpoint, config.submit_timeout_secs)?)
    };

    let report = IngestPipeline::new(fetcher, catalog, concurrency)
        .ingest(&items, &image_index)
        .await;

    if dry_run {
        println!("dry run: nothing was submitted");
    }
    println!("{report}");
    Ok(())
}
