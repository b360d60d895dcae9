use std::path::{Path, PathBuf};

use serde::Serialize;
use shopseed_core::{Image, Item};

use crate::{StoreError, TextEncoding, DELIMITER};

pub const ITEM_COLUMNS: [&str; 11] = [
    "id",
    "name",
    "detail",
    "price",
    "brand",
    "category_id",
    "quantity",
    "sales_count",
    "status",
    "created_at",
    "updated_at",
];

pub const IMAGE_COLUMNS: [&str; 5] = ["id", "url", "item_id", "created_at", "updated_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Items,
    Images,
}

impl Dataset {
    fn base_name(self) -> &'static str {
        match self {
            Dataset::Items => "item_data",
            Dataset::Images => "img_data",
        }
    }

    /// File name for this dataset in `encoding`, e.g. `item_data_utf8sig.csv`.
    #[must_use]
    pub fn file_name(self, encoding: TextEncoding) -> String {
        format!("{}{}.csv", self.base_name(), encoding.file_suffix())
    }
}

/// Write both datasets into `dir`, once per [`TextEncoding`].
///
/// The header row is written even when a dataset is empty. Returns the paths
/// written, items first.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if `dir` cannot be created or a file cannot be
/// written, and [`StoreError::Csv`] if a record fails to serialize.
pub fn export(dir: &Path, items: &[Item], images: &[Image]) -> Result<Vec<PathBuf>, StoreError> {
    std::fs::create_dir_all(dir).map_err(|e| StoreError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut written = Vec::with_capacity(TextEncoding::ALL.len() * 2);
    written.extend(write_dataset(dir, Dataset::Items, &ITEM_COLUMNS, items)?);
    written.extend(write_dataset(dir, Dataset::Images, &IMAGE_COLUMNS, images)?);

    tracing::info!(
        dir = %dir.display(),
        items = items.len(),
        images = images.len(),
        files = written.len(),
        "exported extraction records"
    );
    Ok(written)
}

fn write_dataset<T: Serialize>(
    dir: &Path,
    dataset: Dataset,
    columns: &[&str],
    records: &[T],
) -> Result<Vec<PathBuf>, StoreError> {
    let text = render(dataset, columns, records)?;

    TextEncoding::ALL
        .into_iter()
        .map(|encoding| {
            let path = dir.join(dataset.file_name(encoding));
            std::fs::write(&path, encoding.encode(&text)).map_err(|e| StoreError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            Ok(path)
        })
        .collect()
}

fn render<T: Serialize>(
    dataset: Dataset,
    columns: &[&str],
    records: &[T],
) -> Result<String, StoreError> {
    let csv_err = |source: csv::Error| StoreError::Csv {
        path: dataset.base_name().to_string(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(columns).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }

    let bytes = writer.into_inner().map_err(|e| StoreError::Io {
        path: dataset.base_name().to_string(),
        source: e.into_error(),
    })?;

    // Records only ever hold `String` data, so the buffer is valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
