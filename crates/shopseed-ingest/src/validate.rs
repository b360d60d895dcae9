//! Row validation ahead of submission.

use serde::Serialize;
use shopseed_store::ItemRow;
use thiserror::Error;

/// Longest item name the catalog accepts, in characters.
pub const MAX_NAME_CHARS: usize = 30;

/// JSON body of the `item` part of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub name: String,
    pub category_id: i64,
    pub brand: String,
    pub price: i64,
    pub detail: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidItem {
    /// The row's `id`, used to look up its images.
    pub source_id: u64,
    pub payload: ItemPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("item id is missing")]
    MissingId,

    #[error("item id {0:?} is not a non-negative integer")]
    InvalidId(String),

    #[error("{field} {value:?} is not an integer")]
    NotAnInteger { field: &'static str, value: String },

    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("price must not be negative, got {0}")]
    NegativePrice(i64),
}

/// Validates and normalizes one item row.
///
/// The name is trimmed and cut to [`MAX_NAME_CHARS`] characters; brand and
/// detail are trimmed. Numeric cells may carry surrounding whitespace.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found. The row should be skipped.
pub fn validate_item(row: &ItemRow) -> Result<ValidItem, ValidationError> {
    let id = row.id.trim();
    if id.is_empty() {
        return Err(ValidationError::MissingId);
    }
    let source_id = id
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidId(id.to_owned()))?;

    let name = truncate_name(source_id, row.name.trim());
    let category_id = parse_int("categoryId", &row.category_id)?;
    let brand = row.brand.trim().to_owned();
    let price = parse_int("price", &row.price)?;
    let detail = row.detail.trim().to_owned();
    let quantity = parse_int("quantity", &row.quantity)?;

    if name.is_empty() {
        return Err(ValidationError::Empty("name"));
    }
    if brand.is_empty() {
        return Err(ValidationError::Empty("brand"));
    }
    if detail.is_empty() {
        return Err(ValidationError::Empty("detail"));
    }
    if category_id <= 0 {
        return Err(ValidationError::NotPositive {
            field: "categoryId",
            value: category_id,
        });
    }
    if quantity <= 0 {
        return Err(ValidationError::NotPositive {
            field: "quantity",
            value: quantity,
        });
    }
    if price < 0 {
        return Err(ValidationError::NegativePrice(price));
    }

    Ok(ValidItem {
        source_id,
        payload: ItemPayload {
            name,
            category_id,
            brand,
            price,
            detail,
            quantity,
        },
    })
}

fn truncate_name(source_id: u64, name: &str) -> String {
    let length = name.chars().count();
    if length <= MAX_NAME_CHARS {
        return name.to_owned();
    }
    let truncated: String = name.chars().take(MAX_NAME_CHARS).collect();
    tracing::warn!(
        item_id = source_id,
        original_chars = length,
        name = %truncated,
        "item name truncated"
    );
    truncated
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, ValidationError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger {
            field,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ItemRow {
        ItemRow {
            id: "1".to_owned(),
            name: "갤럭시 버즈3 프로".to_owned(),
            detail: "상품 상세 정보가 없습니다.".to_owned(),
            price: "0".to_owned(),
            brand: "삼성".to_owned(),
            category_id: "1".to_owned(),
            quantity: "10".to_owned(),
        }
    }

    #[test]
    fn valid_row_passes_through() {
        let item = validate_item(&row()).unwrap();
        assert_eq!(item.source_id, 1);
        assert_eq!(item.payload.name, "갤럭시 버즈3 프로");
        assert_eq!(item.payload.category_id, 1);
        assert_eq!(item.payload.quantity, 10);
    }

    #[test]
    fn long_name_is_cut_to_thirty_chars() {
        let long: String = "가나다라마바사아자차카타파하거".repeat(3);
        assert_eq!(long.chars().count(), 45);
        let item = validate_item(&ItemRow {
            name: long.clone(),
            ..row()
        })
        .unwrap();
        assert_eq!(item.payload.name.chars().count(), 30);
        assert_eq!(
            item.payload.name,
            long.chars().take(30).collect::<String>()
        );
    }

    #[test]
    fn text_fields_are_trimmed() {
        let item = validate_item(&ItemRow {
            name: "  Galaxy Tab  ".to_owned(),
            brand: " Samsung ".to_owned(),
            detail: "\tdetail\n".to_owned(),
            quantity: " 3 ".to_owned(),
            ..row()
        })
        .unwrap();
        assert_eq!(item.payload.name, "Galaxy Tab");
        assert_eq!(item.payload.brand, "Samsung");
        assert_eq!(item.payload.detail, "detail");
        assert_eq!(item.payload.quantity, 3);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = validate_item(&ItemRow {
            quantity: "0".to_owned(),
            ..row()
        })
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotPositive {
                field: "quantity",
                value: 0
            }
        );
    }

    #[test]
    fn blank_brand_is_rejected() {
        let err = validate_item(&ItemRow {
            brand: "   ".to_owned(),
            ..row()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty("brand"));
    }

    #[test]
    fn non_numeric_category_is_rejected() {
        let err = validate_item(&ItemRow {
            category_id: "abc".to_owned(),
            ..row()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NotAnInteger {
                field: "categoryId",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_category_is_rejected() {
        let err = validate_item(&ItemRow {
            category_id: "-2".to_owned(),
            ..row()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NotPositive {
                field: "categoryId",
                value: -2
            }
        ));
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = validate_item(&ItemRow {
            price: "-100".to_owned(),
            ..row()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::NegativePrice(-100));
    }

    #[test]
    fn missing_or_bad_id_is_rejected() {
        assert_eq!(
            validate_item(&ItemRow {
                id: String::new(),
                ..row()
            })
            .unwrap_err(),
            ValidationError::MissingId
        );
        assert_eq!(
            validate_item(&ItemRow {
                id: "x1".to_owned(),
                ..row()
            })
            .unwrap_err(),
            ValidationError::InvalidId("x1".to_owned())
        );
    }

    #[test]
    fn payload_serializes_with_camel_case_keys_in_order() {
        let item = validate_item(&row()).unwrap();
        let json = serde_json::to_string(&item.payload).unwrap();
        assert_eq!(
            json,
            r#"{"name":"갤럭시 버즈3 프로","categoryId":1,"brand":"삼성","price":0,"detail":"상품 상세 정보가 없습니다.","quantity":10}"#
        );
    }
}
