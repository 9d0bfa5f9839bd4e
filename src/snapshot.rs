//! Bulk snapshot loader for the Scryfall card export.
//!
//! The loader locates the configured export in the bulk-data catalog,
//! downloads the whole array into memory, and rebuilds the `cards` table from
//! it. The rebuild runs as a single unit of work, so an interrupted load leaves
//! the previous table untouched.

use serde::Serialize;

use crate::error::{IngestError, Result};
use crate::events::{IngestEvent, IngestObserver};
use crate::models::{BulkCatalog, BulkExport, CardRecord};
use crate::schema;
use crate::sources::SnapshotSource;
use crate::store::Store;
use crate::upsert;

/// Parsed snapshot held in memory before persistence.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub export: BulkExport,
    pub cards: Vec<CardRecord>,
    /// Documents dropped because they had no usable `id`.
    pub rejected: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotReport {
    pub source_uri: String,
    /// Documents in the downloaded array.
    pub fetched: usize,
    /// Rows in `cards` after the load.
    pub stored: usize,
    /// Cards skipped because their id was already inserted.
    pub duplicates: usize,
    pub rejected: usize,
}

/// Pick the export of type `export_type` from a catalog.
pub fn select_export<'c>(catalog: &'c BulkCatalog, export_type: &str) -> Result<&'c BulkExport> {
    catalog.find(export_type).ok_or_else(|| {
        let available: Vec<&str> = catalog.data.iter().map(|e| e.type_field.as_str()).collect();
        IngestError::SourceNotFound(format!(
            "no export of type '{}' (available: [{}])",
            export_type,
            available.join(", ")
        ))
    })
}

pub struct SnapshotLoader<'a> {
    store: &'a Store,
    source: &'a dyn SnapshotSource,
    export_type: String,
}

impl<'a> SnapshotLoader<'a> {
    pub fn new(store: &'a Store, source: &'a dyn SnapshotSource, export_type: &str) -> Self {
        Self {
            store,
            source,
            export_type: export_type.to_string(),
        }
    }

    /// Query the bulk catalog and return the matching export.
    pub fn locate_snapshot_source(&self) -> Result<BulkExport> {
        let catalog = self.source.bulk_catalog()?;
        select_export(&catalog, &self.export_type).cloned()
    }

    /// Download and parse the full export.
    ///
    /// Documents that cannot be projected into a [`CardRecord`] are reported
    /// through `observer` and counted, not fatal.
    pub fn fetch_snapshot(
        &self,
        location: &BulkExport,
        observer: &mut dyn IngestObserver,
    ) -> Result<Snapshot> {
        let documents = self.source.download(location)?;
        observer.on_event(&IngestEvent::SnapshotDownloaded {
            documents: documents.len(),
        });

        let mut cards = Vec::with_capacity(documents.len());
        let mut rejected = 0;
        for (index, doc) in documents.into_iter().enumerate() {
            match CardRecord::from_document(doc) {
                Ok(card) => cards.push(card),
                Err(e) => {
                    rejected += 1;
                    observer.on_event(&IngestEvent::CardRejected {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(Snapshot {
            export: location.clone(),
            cards,
            rejected,
        })
    }

    /// Drop and recreate `cards`, then insert every record.
    ///
    /// Duplicate ids keep their first occurrence. Returns the row count after
    /// the load.
    pub fn replace_store(&self, cards: &[CardRecord]) -> Result<usize> {
        self.store.with_session(|conn| {
            conn.execute_batch(&schema::CARDS.drop_sql())?;
            conn.execute_batch(&schema::CARDS.create_sql())?;

            for card in cards {
                let colors = card.colors_json();
                let document = serde_json::to_string(&card.document)?;
                upsert::insert_ignore(
                    conn,
                    &schema::CARDS,
                    &[
                        &card.id,
                        &card.name,
                        &card.mana_cost,
                        &card.type_line,
                        &card.oracle_text,
                        &card.set_code,
                        &card.rarity,
                        &colors,
                        &card.image_uri,
                        &document,
                    ],
                )?;
            }

            let stored: i64 = conn.query_row("SELECT COUNT(*) FROM cards", [], |r| r.get(0))?;
            Ok(stored as usize)
        })
    }

    /// Locate, fetch and store the snapshot.
    pub fn run(&self, observer: &mut dyn IngestObserver) -> Result<SnapshotReport> {
        let location = self.locate_snapshot_source()?;
        observer.on_event(&IngestEvent::SnapshotLocated {
            export_type: location.type_field.clone(),
            uri: location.download_uri.clone(),
        });

        let snapshot = self.fetch_snapshot(&location, observer)?;
        let stored = self.replace_store(&snapshot.cards)?;
        let duplicates = snapshot.cards.len().saturating_sub(stored);
        observer.on_event(&IngestEvent::SnapshotStored { stored, duplicates });

        Ok(SnapshotReport {
            source_uri: location.download_uri,
            fetched: snapshot.cards.len() + snapshot.rejected,
            stored,
            duplicates,
            rejected: snapshot.rejected,
        })
    }
}
