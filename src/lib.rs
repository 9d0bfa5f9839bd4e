//! Card and deck ingestion for a personal Magic: The Gathering database.
//!
//! Pulls the Scryfall bulk card snapshot and Moxfield deck listings into a
//! local DuckDB file. Each fetched document is stored verbatim next to a few
//! projected columns (id, owner, timestamps, ...) so it can be queried both by
//! column and by JSON path.
//!
//! # Quick start
//!
//! ```no_run
//! use mtg_ingest::{Ingestor, Listing, TracingObserver};
//! use mtg_ingest::pipeline::DeckFilter;
//! use mtg_ingest::schema::DeckTable;
//!
//! let ingestor = Ingestor::builder().db_path("mtg.duckdb").build().unwrap();
//!
//! // Replace the card table with the current snapshot
//! ingestor.load_cards(&mut TracingObserver).unwrap();
//!
//! // Import official Commander precons
//! ingestor
//!     .drain(
//!         &Listing::precons(),
//!         DeckTable::Precons,
//!         DeckFilter::InHub("Commander Precons".into()),
//!         &mut TracingObserver,
//!     )
//!     .unwrap();
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod queries;
pub mod schema;
pub mod snapshot;
pub mod sources;
pub mod sql_builder;
pub mod store;
pub mod upsert;

pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use events::{IngestEvent, IngestObserver, NullObserver, TracingObserver};
pub use sources::Listing;
pub use sql_builder::SqlBuilder;
pub use store::Store;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use http::HttpClient;
use pipeline::{DeckFilter, DeckPipeline, DrainReport, PipelineOptions, SourceOutcome};
use schema::DeckTable;
use snapshot::{SnapshotLoader, SnapshotReport};
use sources::{MoxfieldClient, ScryfallClient};

// ---------------------------------------------------------------------------
// IngestorBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`Ingestor`].
///
/// Starts from [`IngestConfig::default()`]; use
/// [`from_config`](Self::from_config) to start from an environment-derived
/// config instead.
pub struct IngestorBuilder {
    config: IngestConfig,
    in_memory: bool,
}

impl Default for IngestorBuilder {
    fn default() -> Self {
        Self {
            config: IngestConfig::default(),
            in_memory: false,
        }
    }
}

impl IngestorBuilder {
    pub fn from_config(config: IngestConfig) -> Self {
        Self {
            config,
            in_memory: false,
        }
    }

    /// Database file to open or create.
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.db_path = path.as_ref().to_path_buf();
        self.in_memory = false;
        self
    }

    /// Use an in-memory database instead of a file.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// HTTP request timeout. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Deadline for the bulk snapshot download. Defaults to 30 minutes.
    pub fn download_timeout(mut self, timeout: Duration) -> Self {
        self.config.download_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: &str) -> Self {
        self.config.user_agent = agent.to_string();
        self
    }

    /// Summaries requested per listing page. Defaults to 50.
    pub fn page_size(mut self, size: u32) -> Self {
        self.config.page_size = size;
        self
    }

    /// Pause between listing pages. Defaults to 500 ms.
    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.config.page_delay = delay;
        self
    }

    /// Pause after every deck detail request. Defaults to none.
    pub fn item_delay(mut self, delay: Duration) -> Self {
        self.config.item_delay = delay;
        self
    }

    /// Owner recorded for decks without a creator.
    pub fn fallback_owner(mut self, owner: &str) -> Self {
        self.config.fallback_owner = owner.to_string();
        self
    }

    /// Bulk export type to load. Defaults to `default_cards`.
    pub fn bulk_type(mut self, export_type: &str) -> Self {
        self.config.bulk_type = export_type.to_string();
        self
    }

    /// Open the store and build the HTTP clients. No request is made yet.
    pub fn build(self) -> Result<Ingestor> {
        let store = if self.in_memory {
            Store::open_in_memory()?
        } else {
            Store::open(&self.config.db_path)?
        };
        let http = HttpClient::new(self.config.timeout, &self.config.user_agent)?;
        Ok(Ingestor {
            scryfall: ScryfallClient::new(http.clone(), &self.config.scryfall_bulk_url)
                .download_timeout(self.config.download_timeout),
            moxfield: MoxfieldClient::new(http, &self.config.moxfield_base)?,
            store,
            config: self.config,
        })
    }
}

// ---------------------------------------------------------------------------
// Ingestor
// ---------------------------------------------------------------------------

/// Entry point tying the store to the Scryfall and Moxfield clients.
pub struct Ingestor {
    store: Store,
    scryfall: ScryfallClient,
    moxfield: MoxfieldClient,
    config: IngestConfig,
}

impl Ingestor {
    pub fn builder() -> IngestorBuilder {
        IngestorBuilder::default()
    }

    // -- Ingestion -----------------------------------------------------------

    /// Replace the `cards` table with the current bulk snapshot.
    pub fn load_cards(&self, observer: &mut dyn IngestObserver) -> Result<SnapshotReport> {
        SnapshotLoader::new(&self.store, &self.scryfall, &self.config.bulk_type).run(observer)
    }

    /// Drain one listing into `table`, storing decks accepted by `filter`.
    pub fn drain(
        &self,
        listing: &Listing,
        table: DeckTable,
        filter: DeckFilter,
        observer: &mut dyn IngestObserver,
    ) -> Result<DrainReport> {
        self.pipeline(table, filter).drain(listing, observer)
    }

    /// Drain several listings, continuing past listings that fail.
    pub fn run_sources(
        &self,
        listings: &[Listing],
        table: DeckTable,
        filter: DeckFilter,
        observer: &mut dyn IngestObserver,
    ) -> Vec<SourceOutcome> {
        self.pipeline(table, filter).run_sources(listings, observer)
    }

    /// Fetch a single deck into `moxfield_raw` and return its document.
    pub fn capture_deck(&self, public_id: &str) -> Result<serde_json::Value> {
        pipeline::capture_raw_deck(&self.store, &self.moxfield, public_id)
    }

    fn pipeline(&self, table: DeckTable, filter: DeckFilter) -> DeckPipeline<'_> {
        let options = PipelineOptions::from_config(&self.config)
            .table(table)
            .filter(filter);
        DeckPipeline::new(&self.store, &self.moxfield, options)
    }

    // -- Query accessors -----------------------------------------------------

    pub fn cards(&self) -> queries::CardQuery<'_> {
        queries::CardQuery::new(&self.store)
    }

    pub fn decks(&self) -> queries::DeckQuery<'_> {
        queries::DeckQuery::new(&self.store)
    }

    /// Raw SQL escape hatch with `?` placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.store.execute(query, params)
    }

    /// Row count per table.
    pub fn table_counts(&self) -> Result<Vec<(String, i64)>> {
        self.store
            .tables()?
            .into_iter()
            .map(|t| {
                let n = self.store.row_count(&t)?;
                Ok((t, n))
            })
            .collect()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Database file, or `None` when in memory.
    pub fn db_path(&self) -> Option<PathBuf> {
        self.store.path().map(Path::to_path_buf)
    }
}

impl fmt::Display for Ingestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let db = self
            .store
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        write!(
            f,
            "Ingestor(db={}, page_size={}, bulk_type={})",
            db, self.config.page_size, self.config.bulk_type
        )
    }
}
