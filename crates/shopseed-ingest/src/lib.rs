pub mod catalog;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub(crate) mod retry;
pub mod validate;

pub use catalog::{CatalogClient, SubmitResponse, IMAGES_PART_NAME, ITEM_PART_NAME};
pub use error::IngestError;
pub use fetch::{normalize_media_type, resolve_filename, DownloadedImage, ImageFetcher};
pub use pipeline::{IngestPipeline, ItemOutcome, SkipReason};
pub use report::{RunCounters, RunReport};
pub use validate::{validate_item, ItemPayload, ValidItem, ValidationError, MAX_NAME_CHARS};
