//! Fixed price ranges for the bar chart.
//!
//! Ten contiguous buckets labelled by inclusive integer bounds
//! (`0-100`, `101-200`, ..., `901-above`). Bucket *k* covers the half-open
//! interval `(upper of bucket k-1, upper of bucket k]`, with the first
//! bucket closed at zero. Integral prices land where the labels say, and
//! fractional prices between two labels (e.g. 100.50) still fall in
//! exactly one bucket.

use std::ops::{Bound, RangeBounds};

use rust_decimal::Decimal;

use super::query::PriceRange;

/// One bar-chart price bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBucket {
    /// Lower label bound.
    pub min: u32,
    /// Upper label bound; `None` for the open-ended last bucket.
    pub max: Option<u32>,
}

/// All buckets in declaration order.
pub static PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket { min: 0, max: Some(100) },
    PriceBucket { min: 101, max: Some(200) },
    PriceBucket { min: 201, max: Some(300) },
    PriceBucket { min: 301, max: Some(400) },
    PriceBucket { min: 401, max: Some(500) },
    PriceBucket { min: 501, max: Some(600) },
    PriceBucket { min: 601, max: Some(700) },
    PriceBucket { min: 701, max: Some(800) },
    PriceBucket { min: 801, max: Some(900) },
    PriceBucket { min: 901, max: None },
];

impl PriceBucket {
    /// Chart label, `"<min>-<max>"` or `"<min>-above"`.
    pub fn label(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{max}", self.min),
            None => format!("{}-above", self.min),
        }
    }

    /// Price interval covered by this bucket.
    pub fn range(&self) -> PriceRange {
        let lower = if self.min == 0 {
            Bound::Included(Decimal::ZERO)
        } else {
            Bound::Excluded(Decimal::from(self.min - 1))
        };
        let upper = self
            .max
            .map_or(Bound::Unbounded, |max| Bound::Included(Decimal::from(max)));
        PriceRange { lower, upper }
    }

    /// Whether a price falls in this bucket.
    pub fn contains(&self, price: Decimal) -> bool {
        self.range().contains(&price)
    }
}

/// The bucket a price belongs to; `None` only for negative prices.
pub fn bucket_for(price: Decimal) -> Option<&'static PriceBucket> {
    PRICE_BUCKETS.iter().find(|bucket| bucket.contains(price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_labels() {
        let labels: Vec<String> = PRICE_BUCKETS.iter().map(PriceBucket::label).collect();
        assert_eq!(labels[0], "0-100");
        assert_eq!(labels[1], "101-200");
        assert_eq!(labels[9], "901-above");
    }

    #[test]
    fn test_integral_boundaries() {
        assert_eq!(bucket_for(dec!(0)).unwrap().min, 0);
        assert_eq!(bucket_for(dec!(100)).unwrap().min, 0);
        assert_eq!(bucket_for(dec!(101)).unwrap().min, 101);
        assert_eq!(bucket_for(dec!(900)).unwrap().min, 801);
        assert_eq!(bucket_for(dec!(901)).unwrap().min, 901);
        assert_eq!(bucket_for(dec!(1000000)).unwrap().min, 901);
    }

    #[test]
    fn test_fractional_price_between_labels() {
        assert_eq!(bucket_for(dec!(100.5)).unwrap().min, 101);
        assert_eq!(bucket_for(dec!(900.01)).unwrap().min, 901);
    }

    #[test]
    fn test_negative_price_has_no_bucket() {
        assert!(bucket_for(dec!(-0.01)).is_none());
    }
}
