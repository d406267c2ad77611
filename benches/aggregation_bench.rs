//! Aggregation Benchmarks - Domain Hot Paths
//!
//! Benchmarks the pure functions behind every dashboard request:
//! bucket classification, filter matching and statistics folding.
//!
//! Run with: cargo bench --bench aggregation_bench

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

use transaction_dashboard::domain::buckets::bucket_for;
use transaction_dashboard::domain::month::MonthFilter;
use transaction_dashboard::domain::query::{SearchTerm, TransactionFilter};
use transaction_dashboard::domain::stats::SaleStatistics;
use transaction_dashboard::domain::transaction::Transaction;

fn sample_records(n: i64) -> Vec<Transaction> {
    (0..n)
        .map(|i| Transaction {
            id: i,
            title: format!("Product {i}"),
            description: "Lightweight everyday backpack with padded sleeve".to_string(),
            price: Decimal::new(i * 1_337 % 120_000, 2),
            category: ["electronics", "jewelery", "men's clothing"][(i % 3) as usize].to_string(),
            sold: i % 2 == 0,
            date_of_sale: Utc
                .with_ymd_and_hms(2022, (i % 12 + 1) as u32, 10, 12, 0, 0)
                .unwrap(),
            image: String::new(),
        })
        .collect()
}

/// Benchmark price bucket lookup.
fn bench_bucket_for(c: &mut Criterion) {
    let price = Decimal::new(95_050, 2);

    c.bench_function("bucket_for_top_range", |b| {
        b.iter(|| {
            let _bucket = bucket_for(black_box(price));
        });
    });
}

/// Benchmark month + search filtering over 1,000 records.
fn bench_filter_matching(c: &mut Criterion) {
    let records = sample_records(1_000);
    let filter = TransactionFilter::for_month(MonthFilter::parse(Some("March")))
        .with_search(SearchTerm::parse("PADDED"));

    c.bench_function("filter_match_1000", |b| {
        b.iter(|| {
            let _matched = records.iter().filter(|r| filter.matches(black_box(r))).count();
        });
    });
}

/// Benchmark statistics folding over 1,000 records.
fn bench_statistics_fold(c: &mut Criterion) {
    let records = sample_records(1_000);

    c.bench_function("statistics_fold_1000", |b| {
        b.iter(|| {
            let _stats: SaleStatistics = black_box(&records).iter().collect();
        });
    });
}

criterion_group!(
    benches,
    bench_bucket_for,
    bench_filter_matching,
    bench_statistics_fold,
);
criterion_main!(benches);
