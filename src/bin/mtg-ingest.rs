//! Batch entry point configured entirely through the environment.
//!
//! `MTG_INGEST_JOB` selects the job:
//! - `cards`   replace the card table with the Scryfall snapshot (default)
//! - `precons` import official Commander precons into `precons`
//! - `users`   import every deck of `MTG_INGEST_USERS` (comma separated) into
//!   `decks`, keeping only decks legal in their declared format
//! - `deck`    capture the single deck `MTG_INGEST_DECK_ID` into `moxfield_raw`
//!
//! See [`IngestConfig::from_env`] for the remaining settings.

use std::process::ExitCode;

use mtg_ingest::pipeline::DeckFilter;
use mtg_ingest::schema::DeckTable;
use mtg_ingest::{config, IngestConfig, IngestError, Ingestor, IngestorBuilder, Listing, TracingObserver};
use tracing::{error, info};

fn main() -> ExitCode {
    if let Err(e) = mtg_ingest::logging::init_tracing("info") {
        eprintln!("{}", e);
    }
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "ingestion failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> mtg_ingest::Result<()> {
    let cfg = IngestConfig::from_env();
    let job = std::env::var("MTG_INGEST_JOB").unwrap_or_else(|_| "cards".to_string());
    let ingestor: Ingestor = IngestorBuilder::from_config(cfg).build()?;
    info!(%ingestor, job, "starting");

    let mut observer = TracingObserver;
    match job.trim() {
        "cards" => {
            let report = ingestor.load_cards(&mut observer)?;
            info!(stored = report.stored, duplicates = report.duplicates, "cards loaded");
        }
        "precons" => {
            let report = ingestor.drain(
                &Listing::precons(),
                DeckTable::Precons,
                DeckFilter::InHub(config::PRECON_HUB.to_string()),
                &mut observer,
            )?;
            info!(upserted = report.upserted, "precons imported");
        }
        "users" => {
            let users = std::env::var("MTG_INGEST_USERS").unwrap_or_default();
            let listings: Vec<Listing> = users
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(Listing::user)
                .collect();
            if listings.is_empty() {
                return Err(IngestError::InvalidArgument(
                    "MTG_INGEST_USERS is empty".to_string(),
                ));
            }
            let outcomes = ingestor.run_sources(
                &listings,
                DeckTable::Decks,
                DeckFilter::LegalInDeclaredFormat,
                &mut observer,
            );
            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
            info!(sources = outcomes.len(), failed, "user decks imported");
        }
        "deck" => {
            let id = std::env::var("MTG_INGEST_DECK_ID").map_err(|_| {
                IngestError::InvalidArgument("MTG_INGEST_DECK_ID is not set".to_string())
            })?;
            ingestor.capture_deck(id.trim())?;
            info!(id = id.trim(), "deck saved");
        }
        other => {
            return Err(IngestError::InvalidArgument(format!(
                "unknown MTG_INGEST_JOB '{}'",
                other
            )));
        }
    }
    Ok(())
}
