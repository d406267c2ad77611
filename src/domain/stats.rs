//! Aggregate views over a month of records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Sale totals for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleStatistics {
    /// Sum of prices over all matching records, sold or not.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sale_amount: Decimal,
    /// Matching records with `sold = true`.
    pub total_sold_items: u64,
    /// Matching records with `sold = false`.
    pub total_not_sold_items: u64,
}

impl SaleStatistics {
    /// Fold one record into the totals.
    pub fn add(&mut self, price: Decimal, sold: bool) {
        self.total_sale_amount += price;
        if sold {
            self.total_sold_items += 1;
        } else {
            self.total_not_sold_items += 1;
        }
    }
}

impl<'a> FromIterator<&'a Transaction> for SaleStatistics {
    fn from_iter<I: IntoIterator<Item = &'a Transaction>>(iter: I) -> Self {
        let mut stats = Self::default();
        for record in iter {
            stats.add(record.price, record.sold);
        }
        stats
    }
}

/// Record count for one bar-chart bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub range: String,
    pub count: u64,
}

/// Record count for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Statistics, bar chart and pie chart for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    pub statistics: SaleStatistics,
    pub bar_chart: Vec<BucketCount>,
    pub pie_chart: Vec<CategoryCount>,
}
