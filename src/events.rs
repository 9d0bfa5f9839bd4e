//! Progress events emitted by the loaders.
//!
//! Callers pass an [`IngestObserver`]; any `FnMut(&IngestEvent)` closure
//! qualifies. [`TracingObserver`] forwards events to `tracing`.

use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    SnapshotLocated { export_type: String, uri: String },
    SnapshotDownloaded { documents: usize },
    CardRejected { index: usize, reason: String },
    SnapshotStored { stored: usize, duplicates: usize },
    PageFetched { listing: String, page: u32, items: usize, total: Option<u64> },
    DeckSaved { listing: String, id: String, name: Option<String> },
    DeckFiltered { listing: String, id: String },
    DeckFailed { listing: String, id: String, reason: String },
    DrainFinished { listing: String, upserted: usize, pages: u32 },
    SourceFailed { listing: String, reason: String },
}

pub trait IngestObserver {
    fn on_event(&mut self, event: &IngestEvent);
}

impl<F> IngestObserver for F
where
    F: FnMut(&IngestEvent),
{
    fn on_event(&mut self, event: &IngestEvent) {
        self(event)
    }
}

/// Discards every event.
pub struct NullObserver;

impl IngestObserver for NullObserver {
    fn on_event(&mut self, _event: &IngestEvent) {}
}

/// Logs events through `tracing`: failures at `warn`, the rest at `info`.
#[derive(Default)]
pub struct TracingObserver;

impl IngestObserver for TracingObserver {
    fn on_event(&mut self, event: &IngestEvent) {
        match event {
            IngestEvent::SnapshotLocated { export_type, uri } => {
                info!(export_type, uri, "located bulk export")
            }
            IngestEvent::SnapshotDownloaded { documents } => {
                info!(documents, "downloaded card data")
            }
            IngestEvent::CardRejected { index, reason } => {
                warn!(index, reason, "skipping card document")
            }
            IngestEvent::SnapshotStored { stored, duplicates } => {
                info!(stored, duplicates, "card table replaced")
            }
            IngestEvent::PageFetched {
                listing,
                page,
                items,
                total,
            } => info!(listing, page, items, ?total, "fetched page"),
            IngestEvent::DeckSaved { listing, id, name } => {
                info!(listing, id, name = name.as_deref().unwrap_or(""), "saved deck")
            }
            IngestEvent::DeckFiltered { listing, id } => {
                info!(listing, id, "deck rejected by filter")
            }
            IngestEvent::DeckFailed { listing, id, reason } => {
                warn!(listing, id, reason, "skipping deck")
            }
            IngestEvent::DrainFinished {
                listing,
                upserted,
                pages,
            } => info!(listing, upserted, pages, "listing drained"),
            IngestEvent::SourceFailed { listing, reason } => {
                warn!(listing, reason, "listing aborted")
            }
        }
    }
}
