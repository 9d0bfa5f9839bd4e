//! Paginated fetch-and-upsert pipeline for Moxfield deck listings.
//!
//! A drain walks a listing page by page, fetches every deck's detail document,
//! applies the configured [`DeckFilter`], and upserts survivors one at a time.
//! A failed detail fetch skips that deck; a failed page ends the drain.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::{self, IngestConfig};
use crate::error::{IngestError, Result};
use crate::events::{IngestEvent, IngestObserver};
use crate::models::{DeckRecord, DeckSummary};
use crate::schema::{self, DeckTable};
use crate::sources::{DeckSource, Listing};
use crate::store::Store;
use crate::upsert;

// ---------------------------------------------------------------------------
// DeckFilter
// ---------------------------------------------------------------------------

/// Predicate deciding whether a fetched deck is stored.
#[derive(Clone, Default)]
pub enum DeckFilter {
    /// Store every deck.
    #[default]
    Any,
    /// Store decks legal in the format they declare.
    LegalInDeclaredFormat,
    /// Store decks listed in the named hub, e.g. `"Commander Precons"`.
    InHub(String),
    /// Store decks for which the closure returns `true`.
    Custom(Arc<dyn Fn(&DeckRecord) -> bool + Send + Sync>),
}

impl DeckFilter {
    /// Wrap a closure as a [`DeckFilter::Custom`].
    ///
    /// ```
    /// use mtg_ingest::models::{DeckRecord, DeckSummary};
    /// use mtg_ingest::pipeline::DeckFilter;
    /// use serde_json::json;
    ///
    /// let modern_only = DeckFilter::custom(|d| d.format.as_deref() == Some("modern"));
    /// let deck = DeckRecord::from_detail(
    ///     &DeckSummary::new("abc"),
    ///     "alice",
    ///     json!({"format": "modern"}),
    ///     "nobody",
    /// );
    /// assert!(modern_only.accepts(&deck));
    /// ```
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&DeckRecord) -> bool + Send + Sync + 'static,
    {
        DeckFilter::Custom(Arc::new(f))
    }

    /// True when `deck` should be stored.
    pub fn accepts(&self, deck: &DeckRecord) -> bool {
        match self {
            DeckFilter::Any => true,
            DeckFilter::LegalInDeclaredFormat => deck.is_legal_in_declared_format(),
            DeckFilter::InHub(hub) => deck.hub_names.iter().any(|h| h == hub),
            DeckFilter::Custom(f) => f(deck),
        }
    }
}

impl fmt::Debug for DeckFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckFilter::Any => write!(f, "Any"),
            DeckFilter::LegalInDeclaredFormat => write!(f, "LegalInDeclaredFormat"),
            DeckFilter::InHub(hub) => write!(f, "InHub({:?})", hub),
            DeckFilter::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Options and reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub page_size: u32,
    /// Pause before each page after the first.
    pub page_delay: Duration,
    /// Pause after each detail request.
    pub item_delay: Duration,
    pub fallback_owner: String,
    pub table: DeckTable,
    pub filter: DeckFilter,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            page_size: config::DEFAULT_PAGE_SIZE,
            page_delay: config::DEFAULT_PAGE_DELAY,
            item_delay: Duration::ZERO,
            fallback_owner: config::DEFAULT_FALLBACK_OWNER.to_string(),
            table: DeckTable::Decks,
            filter: DeckFilter::Any,
        }
    }
}

impl PipelineOptions {
    pub fn from_config(cfg: &IngestConfig) -> Self {
        Self {
            page_size: cfg.page_size,
            page_delay: cfg.page_delay,
            item_delay: cfg.item_delay,
            fallback_owner: cfg.fallback_owner.clone(),
            ..Self::default()
        }
    }

    pub fn table(mut self, table: DeckTable) -> Self {
        self.table = table;
        self
    }

    pub fn filter(mut self, filter: DeckFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Counters for one drained listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    pub listing: String,
    /// Page requests issued.
    pub pages: u32,
    /// Summaries seen across all pages.
    pub summaries: usize,
    pub total: Option<u64>,
    pub upserted: usize,
    pub filtered: usize,
    pub failed: usize,
    pub failed_ids: Vec<String>,
}

/// Result of draining one listing inside [`DeckPipeline::run_sources`].
#[derive(Debug)]
pub struct SourceOutcome {
    pub listing: Listing,
    pub result: Result<DrainReport>,
}

// ---------------------------------------------------------------------------
// DeckPipeline
// ---------------------------------------------------------------------------

pub struct DeckPipeline<'a> {
    store: &'a Store,
    source: &'a dyn DeckSource,
    options: PipelineOptions,
}

impl<'a> DeckPipeline<'a> {
    pub fn new(store: &'a Store, source: &'a dyn DeckSource, options: PipelineOptions) -> Self {
        Self {
            store,
            source,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Drain `listing` to completion.
    ///
    /// Stops on an empty page or once the number of summaries seen reaches
    /// the total reported by the first page that carries one. Page-level
    /// failures (transport, status, malformed JSON) and store failures end
    /// the drain with an error; decks already written stay written.
    pub fn drain(
        &self,
        listing: &Listing,
        observer: &mut dyn IngestObserver,
    ) -> Result<DrainReport> {
        if self.options.page_size == 0 {
            return Err(IngestError::InvalidArgument(
                "page_size must be positive".to_string(),
            ));
        }
        self.store.ensure_table(self.options.table.table())?;

        let label = listing.to_string();
        let mut report = DrainReport {
            listing: label.clone(),
            ..DrainReport::default()
        };
        let mut page = 1u32;

        loop {
            let listing_page = self
                .source
                .fetch_page(listing, page, self.options.page_size)?;
            report.pages += 1;
            if report.total.is_none() {
                report.total = listing_page.total;
            }
            observer.on_event(&IngestEvent::PageFetched {
                listing: label.clone(),
                page,
                items: listing_page.data.len(),
                total: report.total,
            });

            if listing_page.data.is_empty() {
                break;
            }
            report.summaries += listing_page.data.len();

            for summary in &listing_page.data {
                self.process_item(listing, summary, &mut report, observer)?;
            }

            if report
                .total
                .is_some_and(|total| report.summaries as u64 >= total)
            {
                break;
            }

            pause(self.options.page_delay);
            page += 1;
        }

        observer.on_event(&IngestEvent::DrainFinished {
            listing: label,
            upserted: report.upserted,
            pages: report.pages,
        });
        Ok(report)
    }

    /// Drain each listing in turn. A failing listing is reported and the
    /// remaining listings still run.
    pub fn run_sources(
        &self,
        listings: &[Listing],
        observer: &mut dyn IngestObserver,
    ) -> Vec<SourceOutcome> {
        let mut outcomes = Vec::with_capacity(listings.len());
        for listing in listings {
            let result = self.drain(listing, observer);
            if let Err(e) = &result {
                observer.on_event(&IngestEvent::SourceFailed {
                    listing: listing.to_string(),
                    reason: e.to_string(),
                });
            }
            outcomes.push(SourceOutcome {
                listing: listing.clone(),
                result,
            });
        }
        outcomes
    }

    fn process_item(
        &self,
        listing: &Listing,
        summary: &DeckSummary,
        report: &mut DrainReport,
        observer: &mut dyn IngestObserver,
    ) -> Result<()> {
        let fetched = self.source.fetch_detail(&summary.public_id);
        pause(self.options.item_delay);

        let document = match fetched {
            Ok(doc) => doc,
            Err(e) => {
                let err = IngestError::ItemFetch {
                    id: summary.public_id.clone(),
                    reason: e.to_string(),
                };
                observer.on_event(&IngestEvent::DeckFailed {
                    listing: listing.to_string(),
                    id: summary.public_id.clone(),
                    reason: err.to_string(),
                });
                report.failed += 1;
                report.failed_ids.push(summary.public_id.clone());
                return Ok(());
            }
        };

        let deck = DeckRecord::from_detail(
            summary,
            listing.label(),
            document,
            &self.options.fallback_owner,
        );

        if !self.options.filter.accepts(&deck) {
            report.filtered += 1;
            observer.on_event(&IngestEvent::DeckFiltered {
                listing: listing.to_string(),
                id: deck.id,
            });
            return Ok(());
        }

        let table = self.options.table;
        self.store.with_session(|conn| store_deck(conn, table, &deck))?;
        report.upserted += 1;
        observer.on_event(&IngestEvent::DeckSaved {
            listing: listing.to_string(),
            id: deck.id,
            name: deck.name,
        });
        Ok(())
    }
}

/// Upsert one deck row into `table`.
pub fn store_deck(conn: &duckdb::Connection, table: DeckTable, deck: &DeckRecord) -> Result<()> {
    let document = serde_json::to_string(&deck.document)?;
    match table {
        DeckTable::Decks => upsert::upsert(
            conn,
            table.table(),
            &[
                &deck.id,
                &deck.source,
                &deck.name,
                &deck.format,
                &deck.created,
                &deck.updated,
                &deck.owner,
                &document,
            ],
        ),
        DeckTable::Precons => upsert::upsert(
            conn,
            table.table(),
            &[
                &deck.id,
                &deck.name,
                &deck.format,
                &deck.created,
                &deck.updated,
                &deck.owner,
                &document,
            ],
        ),
    }
}

/// Fetch one deck and keep its document verbatim in `moxfield_raw`.
pub fn capture_raw_deck(store: &Store, source: &dyn DeckSource, public_id: &str) -> Result<Value> {
    let document = source
        .fetch_detail(public_id)
        .map_err(|e| IngestError::ItemFetch {
            id: public_id.to_string(),
            reason: e.to_string(),
        })?;
    let text = serde_json::to_string(&document)?;
    let id = public_id.to_string();

    store.ensure_table(&schema::MOXFIELD_RAW)?;
    store.with_session(|conn| upsert::upsert(conn, &schema::MOXFIELD_RAW, &[&id, &text]))?;
    Ok(document)
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
