//! SQLite-backed store for the shop data
//!
//! The store owns a single connection behind a mutex: every database call
//! takes the lock, so calls are strictly sequential even when the store is
//! shared between threads.

mod row;
mod schema;
mod seed;

pub use row::{QueryResult, Row};
pub use schema::{ENTITY_TABLES, SCHEMA_VERSION};
pub use seed::SeedStats;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Params, Statement};

use crate::core::{Result, StoreError, Value};

/// The shop database
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create the database at `path`, creating the schema when absent
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|source| StoreError::DatabaseOpen {
            path: path.to_path_buf(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let store = Self::with_connection(conn, Some(path.to_path_buf()))?;
        tracing::debug!(path = %path.display(), "opened store");
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::with_connection(conn, None)
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Self {
            conn: Mutex::new(conn),
            path,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        let found: Option<i32> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
                [],
                |_| Ok(()),
            )
            .optional()?
            .map(|_| {
                conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                    row.get::<_, Option<i32>>(0)
                })
            })
            .transpose()?
            .flatten();

        match found {
            None => {
                schema::create(&conn)?;
                tracing::info!(version = SCHEMA_VERSION, "created schema");
                Ok(())
            }
            Some(v) if v == SCHEMA_VERSION => Ok(()),
            Some(v) => Err(StoreError::SchemaMismatch {
                found: v,
                expected: SCHEMA_VERSION,
            }),
        }
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Acquire the connection lock
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Run a query and collect every row
    pub fn query<P: Params>(&self, sql: &str, params: P) -> Result<QueryResult> {
        tracing::debug!(sql, "query");
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        collect_rows(&mut stmt, params)
    }

    /// Run a query and return its first row
    pub fn query_one<P: Params>(&self, sql: &str, params: P) -> Result<Option<Row>> {
        Ok(self.query(sql, params)?.rows.into_iter().next())
    }

    /// Execute a statement, returning the number of affected rows
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        tracing::debug!(sql, "execute");
        let conn = self.lock()?;
        Ok(conn.execute(sql, params)?)
    }

    /// Execute an insert, returning the new rowid
    pub fn insert<P: Params>(&self, sql: &str, params: P) -> Result<i64> {
        tracing::debug!(sql, "insert");
        let conn = self.lock()?;
        conn.execute(sql, params)?;
        Ok(conn.last_insert_rowid())
    }

    pub fn schema_version(&self) -> Result<i32> {
        let conn = self.lock()?;
        Ok(conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })?)
    }

    /// Record count of every entity table, in schema order
    pub fn table_counts(&self) -> Result<Vec<(&'static str, i64)>> {
        let conn = self.lock()?;
        count_tables(&conn)
    }

    /// Load the demo data set into an empty store.
    ///
    /// The emptiness check and the inserts run under one lock.
    pub fn seed_demo(&self) -> Result<SeedStats> {
        let mut conn = self.lock()?;
        let total: i64 = count_tables(&conn)?.iter().map(|(_, n)| n).sum();
        if total > 0 {
            return Err(StoreError::NotEmpty);
        }

        let stats = seed::insert_demo(&mut conn)?;
        tracing::info!(records = stats.records, "loaded demo data");
        Ok(stats)
    }
}

fn count_tables(conn: &Connection) -> Result<Vec<(&'static str, i64)>> {
    ENTITY_TABLES
        .iter()
        .map(|table| {
            let sql = format!("SELECT COUNT(*) FROM \"{}\"", table);
            let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok((*table, count))
        })
        .collect()
}

fn collect_rows<P: Params>(stmt: &mut Statement<'_>, params: P) -> Result<QueryResult> {
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut r = Row::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            let value: Value = row.get(i)?;
            r.push(name.clone(), value);
        }
        out.push(r);
    }

    Ok(QueryResult { columns, rows: out })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory_creates_schema() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
        assert!(store.table_counts().unwrap().iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_open_file_twice() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested/store.db");

        let store = Store::open(&path).unwrap();
        store.seed_demo().unwrap();
        drop(store);

        let reopened = Store::open(&path).unwrap();
        let products = reopened
            .table_counts()
            .unwrap()
            .into_iter()
            .find(|(t, _)| *t == "product")
            .unwrap();
        assert!(products.1 > 0);
    }

    #[test]
    fn test_schema_mismatch_is_an_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("store.db");
        Store::open(&path).unwrap();

        let conn = Connection::open(&path).unwrap();
        conn.execute("UPDATE schema_version SET version = 99", [])
            .unwrap();
        drop(conn);

        let err = Store::open(&path).err().unwrap();
        assert!(matches!(err, StoreError::SchemaMismatch { found: 99, .. }));
    }

    #[test]
    fn test_poisoned_lock_is_an_error() {
        let store = Store::open_in_memory().unwrap();
        let panicked = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _conn = store.lock().unwrap();
                    panic!("connection holder failed");
                })
                .join()
                .is_err()
        });
        assert!(panicked);

        assert!(matches!(store.query("SELECT 1", []), Err(StoreError::LockPoisoned)));
        assert!(matches!(store.table_counts(), Err(StoreError::LockPoisoned)));
    }

    #[test]
    fn test_seed_refuses_non_empty_store() {
        let store = Store::open_in_memory().unwrap();
        store.seed_demo().unwrap();
        assert!(matches!(store.seed_demo(), Err(StoreError::NotEmpty)));
    }

    #[test]
    fn test_query_returns_named_columns() {
        let store = Store::open_in_memory().unwrap();
        store.seed_demo().unwrap();

        let result = store
            .query(
                "SELECT product_name, product_sale_price FROM product WHERE product_id = :id",
                &[(":id", &1i64 as &dyn rusqlite::ToSql)],
            )
            .unwrap();
        assert_eq!(result.columns, vec!["product_name", "product_sale_price"]);
        assert_eq!(result.rows[0].get("product_name"), Some(&Value::from("Brake pads")));
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let store = Store::open_in_memory().unwrap();
        let err = store
            .execute(
                "INSERT INTO supplier (supplier_category_id, supplier_name, supplier_address) VALUES (42, 'X', 'Y')",
                [],
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
