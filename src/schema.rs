//! Table layouts for the local store.

use crate::upsert::KeyedTable;

/// Bulk card snapshot; dropped and recreated on every load.
pub const CARDS: KeyedTable = KeyedTable {
    name: "cards",
    key: &["id"],
    columns: &[
        ("id", "VARCHAR"),
        ("name", "VARCHAR"),
        ("mana_cost", "VARCHAR"),
        ("type_line", "VARCHAR"),
        ("oracle_text", "VARCHAR"),
        ("set_code", "VARCHAR"),
        ("rarity", "VARCHAR"),
        ("colors", "VARCHAR"),
        ("image_uri", "VARCHAR"),
        ("document", "VARCHAR"),
    ],
};

/// Decks from several listings, keyed by `(id, source)`.
pub const DECKS: KeyedTable = KeyedTable {
    name: "decks",
    key: &["id", "source"],
    columns: &[
        ("id", "VARCHAR"),
        ("source", "VARCHAR"),
        ("name", "VARCHAR"),
        ("format", "VARCHAR"),
        ("created", "VARCHAR"),
        ("updated", "VARCHAR"),
        ("owner", "VARCHAR NOT NULL"),
        ("document", "VARCHAR"),
    ],
};

/// Official preconstructed decks, keyed by `id` alone.
pub const PRECONS: KeyedTable = KeyedTable {
    name: "precons",
    key: &["id"],
    columns: &[
        ("id", "VARCHAR"),
        ("name", "VARCHAR"),
        ("format", "VARCHAR"),
        ("created", "VARCHAR"),
        ("updated", "VARCHAR"),
        ("owner", "VARCHAR NOT NULL"),
        ("document", "VARCHAR"),
    ],
};

/// Single decks captured verbatim.
pub const MOXFIELD_RAW: KeyedTable = KeyedTable {
    name: "moxfield_raw",
    key: &["deck_id"],
    columns: &[("deck_id", "VARCHAR"), ("document", "VARCHAR")],
};

/// Where the deck pipeline writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeckTable {
    /// `decks`, keyed by `(id, source)`.
    #[default]
    Decks,
    /// `precons`, keyed by `id`.
    Precons,
}

impl DeckTable {
    pub fn table(&self) -> &'static KeyedTable {
        match self {
            DeckTable::Decks => &DECKS,
            DeckTable::Precons => &PRECONS,
        }
    }

    pub fn name(&self) -> &'static str {
        self.table().name
    }
}
