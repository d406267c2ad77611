//! Request parameters and the record filter they translate into.
//!
//! Raw query-string values are parsed once into validated types here;
//! the store adapters only ever see a [`TransactionFilter`].

use std::ops::{Bound, RangeBounds};
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use super::month::MonthFilter;
use super::transaction::Transaction;

/// Default page number when the request omits `page`.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size when the request omits `perPage`.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// A request parameter that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid value '{value}' for parameter '{name}': expected an integer >= 1")]
    InvalidParameter { name: &'static str, value: String },
}

/// Case-insensitive substring test shared by the in-process predicate
/// and the store's search function.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Free-text search over title, description and price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    text: String,
    price: Option<Decimal>,
}

impl SearchTerm {
    /// Parse a raw `search` parameter. Empty input means "no search".
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            text: raw.to_string(),
            price: parse_number(raw),
        })
    }

    /// The literal search text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The search text as a price, when it is numeric.
    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// Title OR description substring match, OR exact price match.
    pub fn matches(&self, record: &Transaction) -> bool {
        contains_ignore_case(&record.title, &self.text)
            || contains_ignore_case(&record.description, &self.text)
            || self.price.is_some_and(|p| p == record.price)
    }
}

fn parse_number(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Price interval with explicit endpoint inclusivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub lower: Bound<Decimal>,
    pub upper: Bound<Decimal>,
}

impl RangeBounds<Decimal> for PriceRange {
    fn start_bound(&self) -> Bound<&Decimal> {
        self.lower.as_ref()
    }

    fn end_bound(&self) -> Bound<&Decimal> {
        self.upper.as_ref()
    }
}

/// Everything a store needs to select records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    pub month: MonthFilter,
    pub search: Option<SearchTerm>,
    pub price: Option<PriceRange>,
}

impl TransactionFilter {
    /// All records of one calendar month.
    pub fn for_month(month: MonthFilter) -> Self {
        Self {
            month,
            search: None,
            price: None,
        }
    }

    /// Narrow by free-text search.
    #[must_use]
    pub fn with_search(mut self, search: Option<SearchTerm>) -> Self {
        self.search = search;
        self
    }

    /// Narrow by price interval.
    #[must_use]
    pub fn with_price(mut self, range: PriceRange) -> Self {
        self.price = Some(range);
        self
    }

    /// Reference predicate. Store adapters must select exactly the
    /// records for which this returns `true`.
    pub fn matches(&self, record: &Transaction) -> bool {
        self.month.matches(&record.date_of_sale)
            && self.search.as_ref().is_none_or(|s| s.matches(record))
            && self.price.is_none_or(|r| r.contains(&record.price))
    }
}

/// Validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub month: MonthFilter,
    pub search: Option<SearchTerm>,
    pub page: u32,
    pub per_page: u32,
}

impl ListQuery {
    /// Parse raw query-string values, applying defaults for absent
    /// pagination parameters.
    pub fn parse(
        month: Option<&str>,
        search: Option<&str>,
        page: Option<&str>,
        per_page: Option<&str>,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            month: MonthFilter::parse(month),
            search: search.and_then(SearchTerm::parse),
            page: parse_positive("page", page, DEFAULT_PAGE)?,
            per_page: parse_positive("perPage", per_page, DEFAULT_PER_PAGE)?,
        })
    }

    /// Store filter for this request.
    pub fn filter(&self) -> TransactionFilter {
        TransactionFilter::for_month(self.month).with_search(self.search.clone())
    }

    /// Number of matching records to skip before this page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

fn parse_positive(name: &'static str, raw: Option<&str>, default: u32) -> Result<u32, QueryError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(QueryError::InvalidParameter {
            name,
            value: raw.to_string(),
        }),
    }
}

/// `ceil(total / per_page)`.
pub fn total_pages(total: u64, per_page: u32) -> u64 {
    total.div_ceil(u64::from(per_page.max(1)))
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            items,
            page,
            total_pages: total_pages(total, per_page),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn record(title: &str, description: &str, price: Decimal, month: u32) -> Transaction {
        Transaction {
            id: 1,
            title: title.to_string(),
            description: description.to_string(),
            price,
            category: "electronics".to_string(),
            sold: true,
            date_of_sale: Utc.with_ymd_and_hms(2022, month, 10, 12, 0, 0).unwrap(),
            image: String::new(),
        }
    }

    #[test]
    fn test_search_matches_title_case_insensitively() {
        let term = SearchTerm::parse("BIKE").unwrap();
        assert!(term.matches(&record("Mountain bike", "", dec!(10), 1)));
        assert!(!term.matches(&record("Helmet", "for bicycles", dec!(10), 1)));
    }

    #[test]
    fn test_search_matches_description() {
        let term = SearchTerm::parse("cotton").unwrap();
        assert!(term.matches(&record("Shirt", "100% Cotton blend", dec!(10), 1)));
    }

    #[test]
    fn test_search_is_literal_not_pattern() {
        let term = SearchTerm::parse("a.c").unwrap();
        assert!(!term.matches(&record("abc", "", dec!(1), 1)));
        assert!(term.matches(&record("the a.c adapter", "", dec!(1), 1)));
    }

    #[test]
    fn test_numeric_search_matches_price() {
        let term = SearchTerm::parse("150").unwrap();
        assert_eq!(term.price(), Some(dec!(150)));
        assert!(term.matches(&record("Bike", "", dec!(150.00), 1)));
        assert!(!term.matches(&record("Bike", "", dec!(150.5), 1)));
    }

    #[test]
    fn test_non_numeric_search_has_no_price_clause() {
        assert_eq!(SearchTerm::parse("bike").unwrap().price(), None);
        assert_eq!(SearchTerm::parse(" ").unwrap().price(), None);
    }

    #[test]
    fn test_empty_search_is_none() {
        assert!(SearchTerm::parse("").is_none());
    }

    #[test]
    fn test_filter_combines_month_and_search() {
        let filter = TransactionFilter::for_month(MonthFilter::parse(Some("March")))
            .with_search(SearchTerm::parse("bike"));
        assert!(filter.matches(&record("Bike", "", dec!(5), 3)));
        assert!(!filter.matches(&record("Bike", "", dec!(5), 4)));
        assert!(!filter.matches(&record("Lamp", "", dec!(5), 3)));
    }

    #[test]
    fn test_list_query_defaults() {
        let q = ListQuery::parse(Some("June"), None, None, None).unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, 10);
        assert_eq!(q.skip(), 0);
        assert!(q.search.is_none());
    }

    #[test]
    fn test_list_query_skip() {
        let q = ListQuery::parse(Some("June"), Some(""), Some("3"), Some("25")).unwrap();
        assert_eq!(q.skip(), 50);
    }

    #[test]
    fn test_list_query_rejects_zero_and_garbage() {
        let err = ListQuery::parse(Some("June"), None, Some("0"), None).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidParameter {
                name: "page",
                value: "0".to_string()
            }
        );
        assert!(ListQuery::parse(Some("June"), None, None, Some("ten")).is_err());
        assert!(ListQuery::parse(Some("June"), None, Some("-2"), None).is_err());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }
}
