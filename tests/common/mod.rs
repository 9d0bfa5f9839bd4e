//! Shared fixtures for the integration tests.
//!
//! Provides in-memory stores and scripted implementations of the
//! `DeckSource` and `SnapshotSource` traits that record every request.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use mtg_ingest::models::{BulkCatalog, BulkExport, DeckSummary, ListingPage};
use mtg_ingest::pipeline::PipelineOptions;
use mtg_ingest::sources::{DeckSource, SnapshotSource};
use mtg_ingest::{IngestError, Listing, Result, Store};
use serde_json::{json, Value};

pub fn memory_store() -> Store {
    Store::open_in_memory().unwrap()
}

/// Pipeline options with no pacing and two summaries per page.
pub fn fast_options() -> PipelineOptions {
    PipelineOptions {
        page_size: 2,
        page_delay: Duration::ZERO,
        item_delay: Duration::ZERO,
        ..PipelineOptions::default()
    }
}

pub fn summary(id: &str) -> DeckSummary {
    let mut s = DeckSummary::new(id);
    s.name = Some(format!("Deck {}", id));
    s
}

/// A Moxfield-like detail document for a commander deck.
pub fn deck_doc(id: &str, legal: bool) -> Value {
    json!({
        "publicId": id,
        "name": format!("Deck {}", id),
        "format": "commander",
        "createdAtUtc": "2024-01-02T03:04:05.000Z",
        "lastUpdatedAtUtc": "2024-02-03T04:05:06.000Z",
        "createdByUser": {"userName": "builder"},
        "legalities": {"commander": if legal { "legal" } else { "not_legal" }},
        "boards": {"mainboard": {"count": 99}}
    })
}

// ---------------------------------------------------------------------------
// MockDeckSource
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockDeckSource {
    listings: HashMap<String, (Vec<Vec<DeckSummary>>, Option<u64>)>,
    details: HashMap<String, Value>,
    failing_details: HashSet<String>,
    failing_listings: HashSet<String>,
    malformed_listings: HashSet<String>,
    pub page_requests: RefCell<Vec<(String, u32, u32)>>,
    pub detail_requests: RefCell<Vec<String>>,
}

impl MockDeckSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the pages of the listing labelled `label`. Pages past the end
    /// come back empty.
    pub fn listing(mut self, label: &str, pages: Vec<Vec<DeckSummary>>, total: Option<u64>) -> Self {
        self.listings.insert(label.to_string(), (pages, total));
        self
    }

    pub fn detail(mut self, id: &str, doc: Value) -> Self {
        self.details.insert(id.to_string(), doc);
        self
    }

    pub fn fail_detail(mut self, id: &str) -> Self {
        self.failing_details.insert(id.to_string());
        self
    }

    pub fn fail_listing(mut self, label: &str) -> Self {
        self.failing_listings.insert(label.to_string());
        self
    }

    /// Every page of `label` comes back as an undecodable body.
    pub fn malformed_listing(mut self, label: &str) -> Self {
        self.malformed_listings.insert(label.to_string());
        self
    }

    pub fn page_count(&self) -> usize {
        self.page_requests.borrow().len()
    }

    pub fn detail_count(&self) -> usize {
        self.detail_requests.borrow().len()
    }
}

impl DeckSource for MockDeckSource {
    fn fetch_page(&self, listing: &Listing, page: u32, page_size: u32) -> Result<ListingPage> {
        let label = listing.label().to_string();
        self.page_requests
            .borrow_mut()
            .push((label.clone(), page, page_size));

        if self.failing_listings.contains(&label) {
            return Err(IngestError::Status {
                url: format!("mock://{}", label),
                status: 503,
            });
        }

        if self.malformed_listings.contains(&label) {
            return serde_json::from_str::<ListingPage>("{\"data\": [").map_err(IngestError::from);
        }

        let Some((pages, total)) = self.listings.get(&label) else {
            return Ok(ListingPage::default());
        };
        let data = pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default();
        Ok(ListingPage { data, total: *total })
    }

    fn fetch_detail(&self, public_id: &str) -> Result<Value> {
        self.detail_requests
            .borrow_mut()
            .push(public_id.to_string());

        if self.failing_details.contains(public_id) {
            return Err(IngestError::Status {
                url: format!("mock://decks/{}", public_id),
                status: 404,
            });
        }
        Ok(self
            .details
            .get(public_id)
            .cloned()
            .unwrap_or_else(|| deck_doc(public_id, true)))
    }
}

// ---------------------------------------------------------------------------
// MockSnapshotSource
// ---------------------------------------------------------------------------

pub struct MockSnapshotSource {
    pub catalog: BulkCatalog,
    pub documents: Vec<Value>,
    pub downloads: RefCell<Vec<String>>,
}

impl MockSnapshotSource {
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            catalog: sample_catalog(),
            documents,
            downloads: RefCell::new(Vec::new()),
        }
    }
}

impl SnapshotSource for MockSnapshotSource {
    fn bulk_catalog(&self) -> Result<BulkCatalog> {
        Ok(self.catalog.clone())
    }

    fn download(&self, export: &BulkExport) -> Result<Vec<Value>> {
        self.downloads
            .borrow_mut()
            .push(export.download_uri.clone());
        Ok(self.documents.clone())
    }
}

pub fn export(export_type: &str) -> BulkExport {
    BulkExport {
        type_field: export_type.to_string(),
        download_uri: format!("https://data.example/{}.json", export_type),
        name: None,
        updated_at: None,
        size: None,
    }
}

/// Three descriptors, only one of which is `default_cards`.
pub fn sample_catalog() -> BulkCatalog {
    BulkCatalog {
        data: vec![
            export("oracle_cards"),
            export("default_cards"),
            export("all_cards"),
        ],
    }
}

pub fn card_doc(id: &str, name: &str, set: &str, oracle_text: &str) -> Value {
    json!({
        "object": "card",
        "id": id,
        "name": name,
        "mana_cost": "{1}{U}",
        "type_line": "Instant",
        "oracle_text": oracle_text,
        "set": set,
        "rarity": "common",
        "colors": ["U"],
        "image_uris": {"normal": format!("https://img.example/{}.jpg", id)}
    })
}
