//! SQLite Record Store - Transaction Persistence via rusqlite
//!
//! Stores records in a single `transactions` table. Two columns are
//! derived at insert time so the database never has to interpret
//! domain semantics:
//! - `sale_month`: `month_index_of(date_of_sale)`, the year-agnostic month
//! - `price_value`: the price as REAL for range and equality predicates
//!
//! The exact decimal price is kept as TEXT and is what reads return.
//! Free-text search goes through the `contains_ci` scalar function,
//! registered on the connection and backed by the same Rust function the
//! in-process predicate uses.
//!
//! rusqlite is blocking: every call runs on the blocking pool behind a
//! mutex-guarded connection. Reads are bounded by the configured timeout;
//! the bulk insert always runs to commit or rollback before it reports.

use std::ops::Bound;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{ToSql, Type};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::domain::month::MonthFilter;
use crate::domain::query::{contains_ignore_case, TransactionFilter};
use crate::domain::stats::{CategoryCount, SaleStatistics};
use crate::domain::transaction::Transaction;
use crate::ports::store::{StoreError, TransactionStore};

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS transactions (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    price TEXT NOT NULL,
    price_value REAL NOT NULL,
    category TEXT NOT NULL,
    sold INTEGER NOT NULL,
    date_of_sale TEXT NOT NULL,
    sale_month INTEGER NOT NULL,
    image TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_transactions_month_id ON transactions(sale_month, id);
CREATE INDEX IF NOT EXISTS idx_transactions_month_price ON transactions(sale_month, price_value);
";

const RECORD_COLUMNS: &str =
    "id, title, description, price, category, sold, date_of_sale, image";

/// Connection tuning for [`SqliteStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Upper bound on any single store call.
    pub query_timeout: Duration,
    /// How long SQLite waits on a locked database file.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(2),
        }
    }
}

/// Record store backed by a single SQLite database.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    options: StoreOptions,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn open<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!(
                    "Failed to create store directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(path)
            .map_err(|e| StoreError::Unavailable(format!("Failed to open database: {e}")))?;
        info!(path = %path.display(), "Record store opened");
        Self::from_connection(conn, options)
    }

    /// Private in-memory database, used by tests and benches.
    pub fn open_in_memory(options: StoreOptions) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Unavailable(format!("Failed to open database: {e}")))?;
        Self::from_connection(conn, options)
    }

    fn from_connection(conn: Connection, options: StoreOptions) -> Result<Self, StoreError> {
        conn.busy_timeout(options.busy_timeout)
            .map_err(|e| StoreError::Unavailable(format!("Failed to set busy timeout: {e}")))?;

        conn.create_scalar_function(
            "contains_ci",
            2,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let haystack = ctx.get::<String>(0)?;
                let needle = ctx.get::<String>(1)?;
                Ok(contains_ignore_case(&haystack, &needle))
            },
        )
        .map_err(|e| StoreError::Unavailable(format!("Failed to register contains_ci: {e}")))?;

        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Unavailable(format!("Failed to create tables: {e}")))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            options,
        })
    }

    fn spawn_on_conn<T, F>(&self, f: F) -> tokio::task::JoinHandle<Result<T, StoreError>>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("Lock error: {e}")))?;
            f(&mut guard)
        })
    }

    /// Run a read against the connection on the blocking pool, bounded by
    /// the query timeout.
    async fn with_conn<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        match tokio::time::timeout(self.options.query_timeout, self.spawn_on_conn(f)).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(StoreError::Unavailable(format!("{op} task failed: {e}"))),
            Err(_) => Err(StoreError::Unavailable(format!(
                "{op} timed out after {}ms",
                self.options.query_timeout.as_millis()
            ))),
        }
    }

    /// Run a write to completion on the blocking pool.
    ///
    /// A blocking task cannot be cancelled, so a write is never reported
    /// as failed while its transaction may still commit. Lock waits are
    /// bounded by the busy timeout instead.
    async fn with_conn_to_completion<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        self.spawn_on_conn(f)
            .await
            .map_err(|e| StoreError::Write(format!("{op} task failed: {e}")))?
    }
}

/// SQL `WHERE` clause and its positional parameters.
struct WhereClause {
    sql: String,
    params: Vec<Box<dyn ToSql + Send>>,
}

impl WhereClause {
    fn param_refs(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref() as &dyn ToSql).collect()
    }
}

/// Translate a filter into SQL over the derived columns.
fn where_clause(filter: &TransactionFilter) -> WhereClause {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql + Send>> = Vec::new();

    match filter.month {
        MonthFilter::Month(month) => {
            conditions.push("sale_month = ?".to_string());
            params.push(Box::new(month.number_from_month()));
        }
        MonthFilter::Unmatched => conditions.push("0 = 1".to_string()),
    }

    if let Some(search) = &filter.search {
        let mut clauses = vec![
            "contains_ci(title, ?)".to_string(),
            "contains_ci(description, ?)".to_string(),
        ];
        params.push(Box::new(search.text().to_string()));
        params.push(Box::new(search.text().to_string()));
        if let Some(price) = search.price().and_then(|p| p.to_f64()) {
            clauses.push("price_value = ?".to_string());
            params.push(Box::new(price));
        }
        conditions.push(format!("({})", clauses.join(" OR ")));
    }

    if let Some(range) = &filter.price {
        push_bound(&mut conditions, &mut params, range.lower, ">=", ">");
        push_bound(&mut conditions, &mut params, range.upper, "<=", "<");
    }

    WhereClause {
        sql: conditions.join(" AND "),
        params,
    }
}

fn push_bound(
    conditions: &mut Vec<String>,
    params: &mut Vec<Box<dyn ToSql + Send>>,
    bound: Bound<Decimal>,
    inclusive_op: &str,
    exclusive_op: &str,
) {
    let (op, value) = match bound {
        Bound::Included(v) => (inclusive_op, v),
        Bound::Excluded(v) => (exclusive_op, v),
        Bound::Unbounded => return,
    };
    conditions.push(format!("price_value {op} ?"));
    params.push(Box::new(value.to_f64().unwrap_or(f64::MAX)));
}

fn conversion_error(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// Map a row selected with [`RECORD_COLUMNS`].
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let price: String = row.get(3)?;
    let date_of_sale: String = row.get(6)?;

    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: Decimal::from_str(&price).map_err(|e| conversion_error(3, e))?,
        category: row.get(4)?,
        sold: row.get(5)?,
        date_of_sale: DateTime::parse_from_rfc3339(&date_of_sale)
            .map_err(|e| conversion_error(6, e))?
            .with_timezone(&Utc),
        image: row.get(7)?,
    })
}

fn count_of(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[async_trait]
impl TransactionStore for SqliteStore {
    async fn count_all(&self) -> Result<u64, StoreError> {
        self.with_conn("count_all", |conn| {
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get::<_, i64>(0))
                .map(count_of)
                .map_err(|e| StoreError::Query(format!("Failed to count records: {e}")))
        })
        .await
    }

    #[instrument(skip(self, records), fields(records = records.len()))]
    async fn insert_if_empty(&self, records: &[Transaction]) -> Result<Option<u64>, StoreError> {
        let records = records.to_vec();
        self.with_conn_to_completion("insert_if_empty", move |conn| {
            let write_err = |e: rusqlite::Error| StoreError::Write(e.to_string());

            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(write_err)?;

            let existing: i64 = tx
                .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
                .map_err(write_err)?;
            if existing > 0 {
                return Ok(None);
            }

            {
                let mut stmt = tx
                    .prepare(
                        "INSERT INTO transactions
                         (id, title, description, price, price_value, category, sold,
                          date_of_sale, sale_month, image)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    )
                    .map_err(write_err)?;

                for record in &records {
                    stmt.execute(params![
                        record.id,
                        &record.title,
                        &record.description,
                        record.price.to_string(),
                        record.price.to_f64().unwrap_or_default(),
                        &record.category,
                        record.sold,
                        record.date_of_sale.to_rfc3339_opts(SecondsFormat::Millis, true),
                        record.sale_month(),
                        &record.image,
                    ])
                    .map_err(write_err)?;
                }
            }

            tx.commit().map_err(write_err)?;
            debug!(count = records.len(), "Batch committed");
            Ok(Some(records.len() as u64))
        })
        .await
    }

    async fn find(
        &self,
        filter: &TransactionFilter,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Transaction>, StoreError> {
        let clause = where_clause(filter);
        let offset = i64::try_from(skip).unwrap_or(i64::MAX);

        self.with_conn("find", move |conn| {
            let sql = format!(
                "SELECT {RECORD_COLUMNS} FROM transactions WHERE {}
                 ORDER BY id ASC, seq ASC LIMIT ? OFFSET ?",
                clause.sql
            );
            let mut params = clause.param_refs();
            params.push(&limit);
            params.push(&offset);

            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| StoreError::Query(format!("Failed to prepare statement: {e}")))?;
            stmt.query_map(params.as_slice(), record_from_row)
                .map_err(|e| StoreError::Query(format!("Query failed: {e}")))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| StoreError::Query(format!("Failed to collect results: {e}")))
        })
        .await
    }

    async fn count(&self, filter: &TransactionFilter) -> Result<u64, StoreError> {
        let clause = where_clause(filter);

        self.with_conn("count", move |conn| {
            let sql = format!("SELECT COUNT(*) FROM transactions WHERE {}", clause.sql);
            conn.query_row(&sql, clause.param_refs().as_slice(), |row| {
                row.get::<_, i64>(0)
            })
            .map(count_of)
            .map_err(|e| StoreError::Query(format!("Failed to count records: {e}")))
        })
        .await
    }

    async fn summarize(&self, filter: &TransactionFilter) -> Result<SaleStatistics, StoreError> {
        let clause = where_clause(filter);

        self.with_conn("summarize", move |conn| {
            let sql = format!("SELECT price, sold FROM transactions WHERE {}", clause.sql);
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| StoreError::Query(format!("Failed to prepare statement: {e}")))?;
            let mut rows = stmt
                .query(clause.param_refs().as_slice())
                .map_err(|e| StoreError::Query(format!("Query failed: {e}")))?;

            let mut stats = SaleStatistics::default();
            while let Some(row) = rows
                .next()
                .map_err(|e| StoreError::Query(format!("Failed to read row: {e}")))?
            {
                let price: String = row
                    .get(0)
                    .map_err(|e| StoreError::Query(format!("Failed to read price: {e}")))?;
                let sold: bool = row
                    .get(1)
                    .map_err(|e| StoreError::Query(format!("Failed to read sold: {e}")))?;
                let price = Decimal::from_str(&price)
                    .map_err(|e| StoreError::Query(format!("Stored price '{price}' is invalid: {e}")))?;
                stats.add(price, sold);
            }
            Ok(stats)
        })
        .await
    }

    async fn count_by_category(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<CategoryCount>, StoreError> {
        let clause = where_clause(filter);

        self.with_conn("count_by_category", move |conn| {
            let sql = format!(
                "SELECT category, COUNT(*) FROM transactions WHERE {}
                 GROUP BY category ORDER BY category ASC",
                clause.sql
            );
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| StoreError::Query(format!("Failed to prepare statement: {e}")))?;
            stmt.query_map(clause.param_refs().as_slice(), |row| {
                Ok(CategoryCount {
                    category: row.get(0)?,
                    count: count_of(row.get(1)?),
                })
            })
            .map_err(|e| StoreError::Query(format!("Query failed: {e}")))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| StoreError::Query(format!("Failed to collect results: {e}")))
        })
        .await
    }

    async fn is_healthy(&self) -> bool {
        self.with_conn("health_check", |conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(|e| StoreError::Unavailable(e.to_string()))
        })
        .await
        .is_ok()
    }
}
