use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detail text stamped on every extracted listing; product pages are not
/// parsed for a description.
pub const DEFAULT_ITEM_DETAIL: &str = "상품 상세 정보가 없습니다.";

/// A product listing captured from a storefront.
///
/// Field order matches the exported column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Dense, strictly increasing across the whole extraction run.
    pub id: u64,
    pub name: String,
    pub detail: String,
    pub price: u64,
    pub brand: String,
    pub category_id: u32,
    pub quantity: u32,
    pub sales_count: u64,
    /// Written as `0`/`1` so downstream loaders see an integer flag.
    #[serde(with = "flag")]
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An image URL attached to an [`Item`]. Ids come from a sequence separate
/// from item ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub url: String,
    pub item_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values the storefronts do not expose, filled in on every extracted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefaults {
    pub detail: String,
    pub price: u64,
    pub quantity: u32,
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            detail: DEFAULT_ITEM_DETAIL.to_string(),
            price: 0,
            quantity: 10,
        }
    }
}

mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim() {
            "1" | "true" | "True" => Ok(true),
            "0" | "false" | "False" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid status flag: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item(status: bool) -> Item {
        let ts = DateTime::parse_from_rfc3339("2024-09-30T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Item {
            id: 1,
            name: "Bespoke AI 콤보".to_string(),
            detail: DEFAULT_ITEM_DETAIL.to_string(),
            price: 0,
            brand: "삼성".to_string(),
            category_id: 1,
            quantity: 10,
            sales_count: 0,
            status,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn status_serializes_as_integer_flag() {
        let json = serde_json::to_value(sample_item(false)).unwrap();
        assert_eq!(json["status"], 0);
        let json = serde_json::to_value(sample_item(true)).unwrap();
        assert_eq!(json["status"], 1);
    }

    #[test]
    fn item_defaults_match_catalog_expectations() {
        let defaults = ItemDefaults::default();
        assert_eq!(defaults.detail, DEFAULT_ITEM_DETAIL);
        assert_eq!(defaults.price, 0);
        assert_eq!(defaults.quantity, 10);
    }
}
