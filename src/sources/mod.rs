//! Remote data sources.
//!
//! The loaders only talk to the [`SnapshotSource`] and [`DeckSource`] traits;
//! [`ScryfallClient`] and [`MoxfieldClient`] are the HTTP implementations.

pub mod moxfield;
pub mod scryfall;

pub use moxfield::MoxfieldClient;
pub use scryfall::ScryfallClient;

use std::fmt;

use serde_json::Value;

use crate::config;
use crate::error::Result;
use crate::models::{BulkCatalog, BulkExport, ListingPage};

/// Provider of the bulk card export.
pub trait SnapshotSource {
    /// Fetch the list of available bulk exports.
    fn bulk_catalog(&self) -> Result<BulkCatalog>;

    /// Download one export as a JSON array of card documents.
    fn download(&self, export: &BulkExport) -> Result<Vec<Value>>;
}

/// Provider of paginated deck listings and deck details.
pub trait DeckSource {
    /// Fetch one page (1-based) of a listing.
    fn fetch_page(&self, listing: &Listing, page: u32, page_size: u32) -> Result<ListingPage>;

    /// Fetch the full deck document for `public_id`.
    fn fetch_detail(&self, public_id: &str) -> Result<Value>;
}

/// A paginated listing to drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// All public decks of one user; the user name is the source label.
    User(String),
    /// A deck search with a JSON filter expression.
    Search { label: String, query: String },
}

impl Listing {
    pub fn user(name: &str) -> Self {
        Listing::User(name.to_string())
    }

    pub fn search(label: &str, query: &str) -> Self {
        Listing::Search {
            label: label.to_string(),
            query: query.to_string(),
        }
    }

    /// The official Commander precon search.
    pub fn precons() -> Self {
        Self::search("commanderPrecons", config::PRECON_SEARCH_QUERY)
    }

    /// Label stored alongside each deck from this listing.
    pub fn label(&self) -> &str {
        match self {
            Listing::User(name) => name,
            Listing::Search { label, .. } => label,
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::User(name) => write!(f, "user:{}", name),
            Listing::Search { label, .. } => write!(f, "search:{}", label),
        }
    }
}
