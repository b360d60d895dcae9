//! Per-item ingestion: validate, download images, submit, tally.
//!
//! Items are independent, so up to `concurrency` of them are in flight at
//! once. Results are consumed in input order. An item's images are all
//! downloaded before its single submission is sent.

use std::collections::BTreeMap;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use shopseed_store::ItemRow;

use crate::catalog::CatalogClient;
use crate::fetch::{DownloadedImage, ImageFetcher};
use crate::report::{RunCounters, RunReport};
use crate::validate::{validate_item, ValidationError};

/// Why an item never reached the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Invalid(ValidationError),
    /// Image URLs were listed for the item but none could be downloaded.
    AllImagesFailed { listed: usize },
}

/// Result of processing one item row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Skipped(SkipReason),
    Succeeded { item_id: u64, status: u16, images: usize },
    /// The catalog answered with a non-2xx status.
    Rejected { item_id: u64, status: u16, body: String },
    /// The submission did not complete (timeout, connection failure).
    Failed { item_id: u64, error: String },
    /// Validated and downloaded; submission suppressed.
    DryRun { item_id: u64, images: usize },
}

pub struct IngestPipeline {
    fetcher: ImageFetcher,
    /// `None` runs in dry-run mode.
    catalog: Option<CatalogClient>,
    concurrency: usize,
}

impl IngestPipeline {
    #[must_use]
    pub fn new(fetcher: ImageFetcher, catalog: Option<CatalogClient>, concurrency: usize) -> Self {
        Self {
            fetcher,
            catalog,
            concurrency,
        }
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.catalog.is_none()
    }

    /// Runs every item row through the pipeline and returns the totals.
    ///
    /// `image_index` maps an item's source id to its image URLs, as built by
    /// [`shopseed_store::build_image_index`]. Per-item failures are logged
    /// and counted, never returned.
    pub async fn ingest(
        &self,
        items: &[ItemRow],
        image_index: &BTreeMap<u64, Vec<String>>,
    ) -> RunReport {
        let counters = RunCounters::default();
        tracing::info!(
            items = items.len(),
            concurrency = self.concurrency.max(1),
            dry_run = self.is_dry_run(),
            "ingestion started"
        );

        let counters_ref = &counters;
        stream::iter(items.iter().map(move |row| async move {
            let outcome = self.process_item(row, image_index).await;
            counters_ref.record(&outcome);
            outcome
        }))
        .buffered(self.concurrency.max(1))
        .for_each(|outcome| {
            log_outcome(&outcome);
            futures::future::ready(())
        })
        .await;

        let report = counters.snapshot();
        tracing::info!(
            total = report.total,
            skipped = report.skipped,
            attempted = report.attempted,
            succeeded = report.succeeded,
            errored = report.errored,
            "ingestion finished"
        );
        report
    }

    /// Processes a single item row end to end.
    pub async fn process_item(
        &self,
        row: &ItemRow,
        image_index: &BTreeMap<u64, Vec<String>>,
    ) -> ItemOutcome {
        let item = match validate_item(row) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(row_id = %row.id, reason = %e, "item skipped: validation failed");
                return ItemOutcome::Skipped(SkipReason::Invalid(e));
            }
        };
        let item_id = item.source_id;

        let urls = image_index.get(&item_id).map_or(&[][..], Vec::as_slice);
        if urls.is_empty() {
            tracing::warn!(item_id, "no image URLs listed for item");
        }
        let images = self.download_all(item_id, urls).await;
        if !urls.is_empty() && images.is_empty() {
            tracing::warn!(
                item_id,
                listed = urls.len(),
                "item skipped: no image could be downloaded"
            );
            return ItemOutcome::Skipped(SkipReason::AllImagesFailed { listed: urls.len() });
        }
        let image_count = images.len();

        let Some(catalog) = &self.catalog else {
            return ItemOutcome::DryRun {
                item_id,
                images: image_count,
            };
        };

        match catalog.submit(&item.payload, images).await {
            Ok(response) if response.is_success() => ItemOutcome::Succeeded {
                item_id,
                status: response.status,
                images: image_count,
            },
            Ok(response) => ItemOutcome::Rejected {
                item_id,
                status: response.status,
                body: response.body,
            },
            Err(e) => ItemOutcome::Failed {
                item_id,
                error: e.to_string(),
            },
        }
    }

    /// Downloads every URL concurrently, keeping listed order among the
    /// successes. Failures are logged and dropped.
    async fn download_all(&self, item_id: u64, urls: &[String]) -> Vec<DownloadedImage> {
        let results = join_all(urls.iter().map(|url| self.fetcher.fetch(url))).await;
        urls.iter()
            .zip(results)
            .filter_map(|(url, result)| match result {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(item_id, url = %url, error = %e, "image download failed");
                    None
                }
            })
            .collect()
    }
}

fn log_outcome(outcome: &ItemOutcome) {
    match outcome {
        // Logged where the skip is decided, with the row context.
        ItemOutcome::Skipped(_) => {}
        ItemOutcome::Succeeded {
            item_id,
            status,
            images,
        } => {
            tracing::info!(item_id, status, images, "item submitted");
        }
        ItemOutcome::Rejected {
            item_id,
            status,
            body,
        } => {
            tracing::warn!(item_id, status, body = %body, "catalog rejected item");
        }
        ItemOutcome::Failed { item_id, error } => {
            tracing::warn!(item_id, error = %error, "item submission failed");
        }
        ItemOutcome::DryRun { item_id, images } => {
            tracing::info!(item_id, images, "dry run: submission skipped");
        }
    }
}
