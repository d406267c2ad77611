//! Property-Based Tests - Domain Layer Invariants
//!
//! Uses `proptest` to verify that bucketing, paging, month extraction
//! and the store's filter translation hold across random inputs.

use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use transaction_dashboard::adapters::store::{SqliteStore, StoreOptions};
use transaction_dashboard::domain::buckets::{bucket_for, PRICE_BUCKETS};
use transaction_dashboard::domain::month::{month_index_of, MonthFilter};
use transaction_dashboard::domain::query::{total_pages, ListQuery, SearchTerm, TransactionFilter};
use transaction_dashboard::domain::transaction::Transaction;
use transaction_dashboard::ports::store::TransactionStore;

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Non-negative price with up to two decimal places.
fn price() -> impl Strategy<Value = Decimal> {
    (0i64..200_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Any instant between 2000 and 2040.
fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..2_208_988_800).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn record() -> impl Strategy<Value = Transaction> {
    (
        price(),
        any::<bool>(),
        timestamp(),
        prop::sample::select(vec!["Bike", "Phone", "Shirt", "Ring"]),
        prop::sample::select(vec!["electronics", "jewelery", "men's clothing"]),
    )
        .prop_map(|(price, sold, date_of_sale, title, category)| Transaction {
            id: 0,
            title: title.to_string(),
            description: format!("{title} for sale"),
            price,
            category: category.to_string(),
            sold,
            date_of_sale,
            image: String::new(),
        })
}

// ── Price Bucket Properties ─────────────────────────────────

proptest! {
    /// Every non-negative price falls in exactly one bucket.
    #[test]
    fn buckets_exhaustive_and_disjoint(p in price()) {
        let containing = PRICE_BUCKETS.iter().filter(|b| b.contains(p)).count();
        prop_assert_eq!(containing, 1, "price {} in {} buckets", p, containing);
        prop_assert!(bucket_for(p).is_some());
    }

    /// Bucket counts over any set of prices sum to the set size.
    #[test]
    fn bucket_counts_sum_to_total(prices in prop::collection::vec(price(), 0..64)) {
        let total: usize = PRICE_BUCKETS
            .iter()
            .map(|b| prices.iter().filter(|p| b.contains(**p)).count())
            .sum();
        prop_assert_eq!(total, prices.len());
    }

    /// Integer prices land in the bucket their label names.
    #[test]
    fn integer_prices_match_labels(n in 0u32..2_000) {
        let bucket = bucket_for(Decimal::from(n)).unwrap();
        prop_assert!(n >= bucket.min);
        prop_assert!(bucket.max.is_none_or(|max| n <= max));
    }
}

// ── Paging Properties ───────────────────────────────────────

proptest! {
    /// `total_pages` is the ceiling of `total / per_page`.
    #[test]
    fn total_pages_is_ceiling(total in 0u64..100_000, per_page in 1u32..500) {
        let pages = total_pages(total, per_page);
        let per_page = u64::from(per_page);
        prop_assert!(pages * per_page >= total);
        if total > 0 {
            prop_assert!((pages - 1) * per_page < total);
        } else {
            prop_assert_eq!(pages, 0);
        }
    }

    /// Positive integers parse as page parameters and drive the offset.
    #[test]
    fn list_query_offset(page in 1u32..10_000, per_page in 1u32..200) {
        let query = ListQuery::parse(
            Some("May"),
            None,
            Some(&page.to_string()),
            Some(&per_page.to_string()),
        )
        .unwrap();
        prop_assert_eq!(query.skip(), u64::from(page - 1) * u64::from(per_page));
    }
}

// ── Month Properties ────────────────────────────────────────

proptest! {
    /// Month extraction is the calendar month, whatever the year.
    #[test]
    fn month_index_is_calendar_month(ts in timestamp()) {
        let index = month_index_of(&ts);
        prop_assert!((1..=12).contains(&index));
        prop_assert_eq!(index, ts.month());
        let name = MONTHS[(index - 1) as usize];
        prop_assert!(MonthFilter::parse(Some(name)).matches(&ts));
    }
}

// ── Store Agreement ─────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The SQLite filter translation selects exactly the records the
    /// in-process predicate accepts.
    #[test]
    fn sqlite_agrees_with_predicate(
        mut records in prop::collection::vec(record(), 1..40),
        month in prop::sample::select(MONTHS.to_vec()),
        search in prop::sample::select(vec!["", "bike", "RING", "for", "150", "0.5"]),
        bucket in 0usize..PRICE_BUCKETS.len(),
    ) {
        for (i, record) in records.iter_mut().enumerate() {
            record.id = i as i64 + 1;
        }

        let base = TransactionFilter::for_month(MonthFilter::parse(Some(month)))
            .with_search(SearchTerm::parse(search));
        let bucketed = base.clone().with_price(PRICE_BUCKETS[bucket].range());

        let (listed, counted, in_bucket) = tokio_test::block_on(async {
            let store = Arc::new(SqliteStore::open_in_memory(StoreOptions::default()).unwrap());
            store.insert_if_empty(&records).await.unwrap();
            (
                store.find(&base, 0, u32::MAX).await.unwrap(),
                store.count(&base).await.unwrap(),
                store.count(&bucketed).await.unwrap(),
            )
        });

        let expected: Vec<i64> = records.iter().filter(|r| base.matches(r)).map(|r| r.id).collect();
        let listed: Vec<i64> = listed.iter().map(|r| r.id).collect();
        prop_assert_eq!(&listed, &expected);
        prop_assert_eq!(counted, expected.len() as u64);
        prop_assert_eq!(in_bucket, records.iter().filter(|r| bucketed.matches(r)).count() as u64);
    }
}
