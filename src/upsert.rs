//! Keyed writes into tables with a declared primary key.
//!
//! [`upsert`] replaces any row with the same key (last write wins);
//! [`insert_ignore`] keeps the existing row (first write wins). Neither
//! errors on a duplicate key.

use duckdb::ToSql;

use crate::error::{IngestError, Result};

/// Name, primary key and column layout of a store table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyedTable {
    pub name: &'static str,
    /// Columns forming the primary key; each must appear in `columns`.
    pub key: &'static [&'static str],
    /// `(column, sql type)` in insertion order.
    pub columns: &'static [(&'static str, &'static str)],
}

impl KeyedTable {
    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|(c, _)| *c).collect()
    }

    /// `CREATE TABLE IF NOT EXISTS` with the primary key; key columns are `NOT NULL`.
    pub fn create_sql(&self) -> String {
        let mut defs: Vec<String> = self
            .columns
            .iter()
            .map(|(c, t)| {
                if self.key.contains(c) {
                    format!("{} {} NOT NULL", c, t)
                } else {
                    format!("{} {}", c, t)
                }
            })
            .collect();
        defs.push(format!("PRIMARY KEY ({})", self.key.join(", ")));
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            defs.join(", ")
        )
    }

    /// `DROP TABLE IF EXISTS`.
    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }

    /// Insert replacing any row with the same key.
    pub fn upsert_sql(&self) -> String {
        self.insert_sql("INSERT OR REPLACE")
    }

    /// Insert skipping rows whose key already exists.
    pub fn insert_ignore_sql(&self) -> String {
        self.insert_sql("INSERT OR IGNORE")
    }

    fn insert_sql(&self, verb: &str) -> String {
        let cols = self.column_names();
        let placeholders: Vec<&str> = cols.iter().map(|_| "?").collect();
        format!(
            "{} INTO {} ({}) VALUES ({})",
            verb,
            self.name,
            cols.join(", "),
            placeholders.join(", ")
        )
    }

    fn check_arity(&self, values: &[&dyn ToSql]) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(IngestError::InvalidArgument(format!(
                "{} expects {} values, got {}",
                self.name,
                self.columns.len(),
                values.len()
            )));
        }
        Ok(())
    }
}

/// Insert a row, replacing any existing row with the same key.
pub fn upsert(conn: &duckdb::Connection, table: &KeyedTable, values: &[&dyn ToSql]) -> Result<()> {
    table.check_arity(values)?;
    conn.prepare_cached(&table.upsert_sql())?.execute(values)?;
    Ok(())
}

/// Insert a row unless one with the same key already exists.
pub fn insert_ignore(
    conn: &duckdb::Connection,
    table: &KeyedTable,
    values: &[&dyn ToSql],
) -> Result<()> {
    table.check_arity(values)?;
    conn.prepare_cached(&table.insert_ignore_sql())?
        .execute(values)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: KeyedTable = KeyedTable {
        name: "pairs",
        key: &["id", "source"],
        columns: &[("id", "VARCHAR"), ("source", "VARCHAR"), ("value", "VARCHAR")],
    };

    #[test]
    fn create_sql_marks_key_columns() {
        assert_eq!(
            PAIRS.create_sql(),
            "CREATE TABLE IF NOT EXISTS pairs (id VARCHAR NOT NULL, source VARCHAR NOT NULL, \
             value VARCHAR, PRIMARY KEY (id, source))"
        );
    }

    #[test]
    fn insert_statements_list_every_column() {
        assert_eq!(
            PAIRS.upsert_sql(),
            "INSERT OR REPLACE INTO pairs (id, source, value) VALUES (?, ?, ?)"
        );
        assert_eq!(
            PAIRS.insert_ignore_sql(),
            "INSERT OR IGNORE INTO pairs (id, source, value) VALUES (?, ?, ?)"
        );
    }

    #[test]
    fn wrong_arity_is_rejected_before_touching_the_database() {
        let conn = duckdb::Connection::open_in_memory().unwrap();
        let id = "x".to_string();
        let err = upsert(&conn, &PAIRS, &[&id]).unwrap_err();
        assert!(matches!(err, IngestError::InvalidArgument(_)));
    }

    #[test]
    fn upsert_replaces_and_ignore_keeps() {
        let conn = duckdb::Connection::open_in_memory().unwrap();
        conn.execute_batch(&PAIRS.create_sql()).unwrap();

        let (id, src) = ("a".to_string(), "s".to_string());
        let (v1, v2, v3) = ("one".to_string(), "two".to_string(), "three".to_string());
        upsert(&conn, &PAIRS, &[&id, &src, &v1]).unwrap();
        upsert(&conn, &PAIRS, &[&id, &src, &v2]).unwrap();
        insert_ignore(&conn, &PAIRS, &[&id, &src, &v3]).unwrap();

        let (count, value): (i64, String) = conn
            .query_row("SELECT COUNT(*), MAX(value) FROM pairs", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(value, "two");
    }
}
