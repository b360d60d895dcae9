//! Tabular intermediate store shared by extraction and ingestion.
//!
//! Extraction writes the item and image datasets as `;`-delimited text in
//! three encodings; ingestion reads one of them back as untyped rows.

mod encoding;
mod export;
mod read;

use thiserror::Error;

pub use encoding::TextEncoding;
pub use export::{export, Dataset, IMAGE_COLUMNS, ITEM_COLUMNS};
pub use read::{build_image_index, read_image_rows, read_item_rows, ImageRow, ItemRow};

/// Field separator for every exported file. Free-text names routinely contain commas.
pub const DELIMITER: u8 = b';';

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record data in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}
