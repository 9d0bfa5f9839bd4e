//! File-backed DuckDB store with scoped units of work.
//!
//! Every write goes through [`Store::with_session`], which clones the
//! connection, opens a transaction, and commits only if the closure succeeds.
//! A failed or panicking unit of work rolls back when the transaction drops.

use crate::error::{IngestError, Result};
use crate::upsert::KeyedTable;
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle to the local database.
///
/// Cheap to share by reference; each unit of work gets its own cloned
/// connection onto the same database instance.
pub struct Store {
    conn: DuckDbConnection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (creating if needed) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = DuckDbConnection::open(path)?;
        debug!(path = %path.display(), "opened store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: DuckDbConnection::open_in_memory()?,
            path: None,
        })
    }

    /// Database file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run one unit of work in its own transaction.
    ///
    /// The transaction is committed when `f` returns `Ok`; on `Err` it is
    /// rolled back and the error returned unchanged.
    pub fn with_session<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&DuckDbConnection) -> Result<T>,
    {
        let mut conn = self.conn.try_clone()?;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    /// Create `table` if it does not exist yet.
    pub fn ensure_table(&self, table: &KeyedTable) -> Result<()> {
        self.with_session(|conn| {
            conn.execute_batch(&table.create_sql())?;
            Ok(())
        })
    }

    /// Names of all tables in the main schema, sorted.
    pub fn tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'main' ORDER BY table_name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    pub fn has_table(&self, table: &str) -> Result<bool> {
        Ok(self.tables()?.iter().any(|t| t == table))
    }

    /// Number of rows in an existing table.
    pub fn row_count(&self, table: &str) -> Result<i64> {
        if !self.has_table(table)? {
            return Err(IngestError::InvalidArgument(format!(
                "Unknown table: {}",
                table
            )));
        }
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |r| r.get(0))?;
        Ok(count)
    }

    /// Run a query and return each row as a column-name map.
    pub fn execute(&self, sql: &str, params: &[String]) -> Result<Vec<HashMap<String, Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let bound: Vec<&dyn duckdb::ToSql> = params.iter().map(|p| p as &dyn duckdb::ToSql).collect();
        let mut rows = stmt.query(bound.as_slice())?;

        // Column metadata is only available once the statement has run.
        let columns: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names().into_iter().map(|c| c.to_string()).collect())
            .unwrap_or_default();

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                map.insert(name.clone(), to_json(row.get_ref(i)?));
            }
            out.push(map);
        }
        Ok(out)
    }

    /// Run a query and deserialize each row into `T`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[String]) -> Result<Vec<T>> {
        self.execute(sql, params)?
            .into_iter()
            .map(|row| {
                let obj: serde_json::Map<String, Value> = row.into_iter().collect();
                serde_json::from_value(Value::Object(obj)).map_err(IngestError::from)
            })
            .collect()
    }

    /// First column of the first row, or `None` for an empty result.
    pub fn execute_scalar(&self, sql: &str, params: &[String]) -> Result<Option<Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let bound: Vec<&dyn duckdb::ToSql> = params.iter().map(|p| p as &dyn duckdb::ToSql).collect();
        let mut rows = stmt.query(bound.as_slice())?;
        match rows.next()? {
            Some(row) => Ok(Some(to_json(row.get_ref(0)?))),
            None => Ok(None),
        }
    }

    /// The underlying DuckDB connection.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

fn to_json(val: ValueRef<'_>) -> Value {
    match val {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => n.into(),
        ValueRef::SmallInt(n) => n.into(),
        ValueRef::Int(n) => n.into(),
        ValueRef::BigInt(n) => n.into(),
        ValueRef::UTinyInt(n) => n.into(),
        ValueRef::USmallInt(n) => n.into(),
        ValueRef::UInt(n) => n.into(),
        ValueRef::UBigInt(n) => n.into(),
        ValueRef::HugeInt(n) => i64::try_from(n)
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(n.to_string())),
        ValueRef::Float(f) => Value::from(f as f64),
        ValueRef::Double(f) => Value::from(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        // Dates, blobs and nested types are not produced by this crate's tables.
        _ => Value::Null,
    }
}
