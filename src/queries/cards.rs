//! Card lookups against the `cards` table.

use serde_json::Value;

use crate::error::Result;
use crate::queries::rows_to_values;
use crate::schema;
use crate::sql_builder::SqlBuilder;
use crate::store::Store;

// ---------------------------------------------------------------------------
// SearchCardsParams
// ---------------------------------------------------------------------------

/// Filters for [`CardQuery::search`]. `None` skips a filter; string filters
/// are case-insensitive substring matches.
#[derive(Debug, Clone, Default)]
pub struct SearchCardsParams {
    pub name: Option<String>,
    pub type_line: Option<String>,
    /// Matched against `oracle_text` inside the stored document.
    pub text: Option<String>,
    pub set_code: Option<String>,
    pub rarity: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ---------------------------------------------------------------------------
// CardQuery
// ---------------------------------------------------------------------------

pub struct CardQuery<'a> {
    store: &'a Store,
}

impl<'a> CardQuery<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// One card by Scryfall id.
    pub fn get(&self, id: &str) -> Result<Option<Value>> {
        if !self.store.has_table(schema::CARDS.name)? {
            return Ok(None);
        }
        let (sql, params) = SqlBuilder::new("cards").where_eq("id", id).limit(1).build();
        Ok(rows_to_values(self.store.execute(&sql, &params)?)
            .into_iter()
            .next())
    }

    /// Cards whose name contains `name`, ordered by name.
    pub fn get_by_name(&self, name: &str) -> Result<Vec<Value>> {
        self.search(&SearchCardsParams {
            name: Some(name.to_string()),
            ..SearchCardsParams::default()
        })
    }

    pub fn search(&self, params: &SearchCardsParams) -> Result<Vec<Value>> {
        if !self.store.has_table(schema::CARDS.name)? {
            return Ok(Vec::new());
        }

        let mut qb = SqlBuilder::new("cards");
        if let Some(name) = &params.name {
            qb.where_contains("name", name);
        }
        if let Some(type_line) = &params.type_line {
            qb.where_contains("type_line", type_line);
        }
        if let Some(text) = &params.text {
            qb.where_json_contains("document", "oracle_text", text);
        }
        if let Some(set_code) = &params.set_code {
            qb.where_eq("LOWER(set_code)", &set_code.to_lowercase());
        }
        if let Some(rarity) = &params.rarity {
            qb.where_eq("LOWER(rarity)", &rarity.to_lowercase());
        }
        qb.order_by(&["name ASC", "id ASC"]);
        if let Some(n) = params.limit {
            qb.limit(n);
        }
        if let Some(n) = params.offset {
            qb.offset(n);
        }

        let (sql, bind) = qb.build();
        Ok(rows_to_values(self.store.execute(&sql, &bind)?))
    }

    pub fn count(&self) -> Result<i64> {
        if !self.store.has_table(schema::CARDS.name)? {
            return Ok(0);
        }
        self.store.row_count(schema::CARDS.name)
    }
}
