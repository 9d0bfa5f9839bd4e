//! Read-side lookups over the ingested tables.
//!
//! Each query struct borrows the [`Store`](crate::store::Store) and returns
//! rows as `serde_json::Value` objects. The stored `document` column is
//! returned parsed, not as text.

pub mod cards;
pub mod decks;

pub use cards::{CardQuery, SearchCardsParams};
pub use decks::DeckQuery;

use std::collections::HashMap;

use serde_json::Value;

pub(crate) fn rows_to_values(rows: Vec<HashMap<String, Value>>) -> Vec<Value> {
    rows.into_iter()
        .map(|mut row| {
            let parsed = match row.get("document") {
                Some(Value::String(text)) => serde_json::from_str::<Value>(text).ok(),
                _ => None,
            };
            if let Some(doc) = parsed {
                row.insert("document".to_string(), doc);
            }
            Value::Object(row.into_iter().collect())
        })
        .collect()
}
