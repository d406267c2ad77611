//! Product-transaction records.
//!
//! Exposes two shapes:
//! - `RawTransaction`: the remote dataset's wire format, taken as-is
//! - `Transaction`: the stored record with a decimal price and a UTC sale date

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::month::month_index_of;

/// One dataset item exactly as the remote source publishes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Source-assigned identifier.
    pub id: i64,
    /// Product title.
    pub title: String,
    /// Price as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Product description.
    pub description: String,
    /// Product category.
    pub category: String,
    /// Whether the item was sold.
    pub sold: bool,
    /// RFC 3339 timestamp with offset, e.g. `2021-11-27T20:29:54+05:30`.
    pub date_of_sale: String,
    /// Product image URI.
    pub image: String,
}

/// A stored product transaction.
///
/// Records are written once by the dataset loader and are read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Source-assigned identifier (not unique across re-imports).
    pub id: i64,
    /// Product title.
    pub title: String,
    /// Product description.
    pub description: String,
    /// Non-negative price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Product category.
    pub category: String,
    /// Whether the item was sold.
    pub sold: bool,
    /// Sale timestamp, normalised to UTC.
    pub date_of_sale: DateTime<Utc>,
    /// Product image URI.
    pub image: String,
}

impl Transaction {
    /// Calendar month (1..=12) of the sale date.
    pub fn sale_month(&self) -> u32 {
        month_index_of(&self.date_of_sale)
    }
}

/// A dataset item that cannot be coerced into a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {id} is invalid: {reason}")]
pub struct RecordError {
    /// Identifier of the offending item.
    pub id: i64,
    /// What was wrong with it.
    pub reason: String,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = RecordError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        if raw.price < Decimal::ZERO {
            return Err(RecordError {
                id: raw.id,
                reason: format!("negative price {}", raw.price),
            });
        }

        let date_of_sale = DateTime::parse_from_rfc3339(&raw.date_of_sale)
            .map_err(|e| RecordError {
                id: raw.id,
                reason: format!("unparseable dateOfSale '{}': {e}", raw.date_of_sale),
            })?
            .with_timezone(&Utc);

        Ok(Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            price: raw.price,
            category: raw.category,
            sold: raw.sold,
            date_of_sale,
            image: raw.image,
        })
    }
}
