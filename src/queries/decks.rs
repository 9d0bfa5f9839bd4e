//! Deck lookups against the `decks` and `precons` tables.

use serde_json::Value;

use crate::error::Result;
use crate::queries::rows_to_values;
use crate::schema::DeckTable;
use crate::sql_builder::SqlBuilder;
use crate::store::Store;

pub struct DeckQuery<'a> {
    store: &'a Store,
}

impl<'a> DeckQuery<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Rows for deck `id`. The `decks` table may hold one row per source.
    pub fn get(&self, table: DeckTable, id: &str) -> Result<Vec<Value>> {
        self.select(table, |qb| {
            qb.where_eq("id", id);
        })
    }

    pub fn by_owner(&self, table: DeckTable, owner: &str) -> Result<Vec<Value>> {
        self.select(table, |qb| {
            qb.where_eq("owner", owner);
        })
    }

    /// Decks whose declared format equals `format` (case-insensitive).
    pub fn by_format(&self, table: DeckTable, format: &str) -> Result<Vec<Value>> {
        self.select(table, |qb| {
            qb.where_eq("LOWER(format)", &format.to_lowercase());
        })
    }

    /// Deck counts per owner, largest first.
    pub fn count_by_owner(&self, table: DeckTable) -> Result<Vec<Value>> {
        if !self.store.has_table(table.name())? {
            return Ok(Vec::new());
        }
        let (sql, params) = SqlBuilder::new(table.name())
            .select(&["owner", "COUNT(*) AS decks"])
            .group_by(&["owner"])
            .order_by(&["decks DESC", "owner ASC"])
            .build();
        Ok(rows_to_values(self.store.execute(&sql, &params)?))
    }

    pub fn count(&self, table: DeckTable) -> Result<i64> {
        if !self.store.has_table(table.name())? {
            return Ok(0);
        }
        self.store.row_count(table.name())
    }

    fn select<F>(&self, table: DeckTable, filter: F) -> Result<Vec<Value>>
    where
        F: FnOnce(&mut SqlBuilder),
    {
        if !self.store.has_table(table.name())? {
            return Ok(Vec::new());
        }
        let mut qb = SqlBuilder::new(table.name());
        filter(&mut qb);
        qb.order_by(&["name ASC", "id ASC"]);
        let (sql, params) = qb.build();
        Ok(rows_to_values(self.store.execute(&sql, &params)?))
    }
}
