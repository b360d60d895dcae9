use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::encoding::decode;
use crate::{StoreError, DELIMITER};

/// One item row as stored. Values stay untyped; validation happens at
/// ingestion so a bad cell costs one item, not the whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ItemRow {
    pub id: String,
    pub name: String,
    pub detail: String,
    pub price: String,
    pub brand: String,
    pub category_id: String,
    pub quantity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImageRow {
    pub id: String,
    pub url: String,
    pub item_id: String,
}

/// Read an item dataset in any of the exported encodings.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read and
/// [`StoreError::Csv`] if it is not delimited text.
pub fn read_item_rows(path: &Path) -> Result<Vec<ItemRow>, StoreError> {
    read_rows(path)
}

/// Read an image dataset in any of the exported encodings.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read and
/// [`StoreError::Csv`] if it is not delimited text.
pub fn read_image_rows(path: &Path) -> Result<Vec<ImageRow>, StoreError> {
    read_rows(path)
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let bytes = std::fs::read(path).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let text = decode(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| StoreError::Csv {
            path: path.display().to_string(),
            source: e,
        })
}

/// Group image URLs by the item they belong to, keeping listed order.
///
/// Rows missing either field are ignored; rows whose `item_id` is not an
/// integer are skipped with a warning.
#[must_use]
pub fn build_image_index(rows: &[ImageRow]) -> BTreeMap<u64, Vec<String>> {
    let mut index: BTreeMap<u64, Vec<String>> = BTreeMap::new();

    for row in rows {
        let item_id = row.item_id.trim();
        if item_id.is_empty() || row.url.is_empty() {
            continue;
        }
        match item_id.parse::<u64>() {
            Ok(id) => index.entry(id).or_default().push(row.url.clone()),
            Err(_) => {
                tracing::warn!(
                    item_id = %row.item_id,
                    image_id = %row.id,
                    "skipping image row with invalid item_id"
                );
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_row(id: &str, url: &str, item_id: &str) -> ImageRow {
        ImageRow {
            id: id.to_string(),
            url: url.to_string(),
            item_id: item_id.to_string(),
        }
    }

    #[test]
    fn image_index_groups_in_listed_order() {
        let rows = vec![
            image_row("1", "https://a/1.jpg", "1"),
            image_row("2", "https://a/2.jpg", "2"),
            image_row("3", "https://a/3.jpg", "1"),
        ];
        let index = build_image_index(&rows);
        assert_eq!(index[&1], vec!["https://a/1.jpg", "https://a/3.jpg"]);
        assert_eq!(index[&2], vec!["https://a/2.jpg"]);
    }

    #[test]
    fn image_index_skips_bad_and_blank_rows() {
        let rows = vec![
            image_row("1", "https://a/1.jpg", "one"),
            image_row("2", "", "1"),
            image_row("3", "https://a/3.jpg", ""),
            image_row("4", "https://a/4.jpg", " 7 "),
        ];
        let index = build_image_index(&rows);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&7], vec!["https://a/4.jpg"]);
    }

    #[test]
    fn missing_columns_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.csv");
        std::fs::write(&path, "id;name\n5;Soap\n").unwrap();

        let rows = read_item_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "5");
        assert_eq!(rows[0].name, "Soap");
        assert_eq!(rows[0].brand, "");
        assert_eq!(rows[0].quantity, "");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.csv");
        std::fs::write(
            &path,
            "id;url;item_id;created_at;updated_at\n1;https://a/1.jpg;3;x;y\n",
        )
        .unwrap();

        let rows = read_image_rows(&path).unwrap();
        assert_eq!(rows, vec![image_row("1", "https://a/1.jpg", "3")]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_item_rows(Path::new("/nonexistent/items.csv")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
