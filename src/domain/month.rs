//! Calendar-month filtering.
//!
//! A record belongs to a month by the calendar month of its sale date
//! alone: the year is ignored, so "March" covers March of every year in
//! the dataset. Month extraction happens in UTC, matching how the sale
//! dates are stored.

use std::fmt;

use chrono::{DateTime, Datelike, Month, Utc};

/// Calendar month (1..=12) of a sale timestamp, year ignored.
pub fn month_index_of(timestamp: &DateTime<Utc>) -> u32 {
    timestamp.month()
}

/// Month selector resolved from a request parameter.
///
/// Month names are matched exactly ("March", not "march" or "Mar").
/// Anything else resolves to [`MonthFilter::Unmatched`], which selects
/// no records instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    /// Records sold in this calendar month of any year.
    Month(Month),
    /// Unknown or missing month name; matches nothing.
    Unmatched,
}

impl MonthFilter {
    /// Resolve a raw month parameter.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(month_from_name)
            .map_or(Self::Unmatched, Self::Month)
    }

    /// Month index (1..=12) when a month was recognised.
    pub fn index(&self) -> Option<u32> {
        match self {
            Self::Month(month) => Some(month.number_from_month()),
            Self::Unmatched => None,
        }
    }

    /// Whether a sale timestamp falls in this month.
    pub fn matches(&self, date_of_sale: &DateTime<Utc>) -> bool {
        self.index() == Some(month_index_of(date_of_sale))
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month(month) => f.write_str(month.name()),
            Self::Unmatched => f.write_str("<unmatched>"),
        }
    }
}

fn month_from_name(name: &str) -> Option<Month> {
    (0u8..12)
        .filter_map(|i| Month::try_from(i + 1).ok())
        .find(|month| month.name() == name)
}
