use std::path::PathBuf;
use std::time::Duration;

pub const SCRYFALL_BULK_URL: &str = "https://api.scryfall.com/bulk-data";
pub const MOXFIELD_API_BASE: &str = "https://api2.moxfield.com";

/// Bulk export holding every real, non-digital printing.
pub const DEFAULT_BULK_TYPE: &str = "default_cards";

/// Owner recorded when a deck document carries no creator.
pub const DEFAULT_FALLBACK_OWNER: &str = "WizardsOfTheCoast";

/// Moxfield rejects requests without a browser-like agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";

/// Deadline for the whole bulk snapshot transfer, several hundred MB.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// Search filter used for official Commander precons.
pub const PRECON_SEARCH_QUERY: &str = r#"{"format":"commanderPrecons"}"#;
pub const PRECON_HUB: &str = "Commander Precons";

pub fn default_db_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("mtg-ingest").join("mtg.duckdb")
    } else {
        PathBuf::from("mtg.duckdb")
    }
}

/// Runtime settings for an [`Ingestor`](crate::Ingestor).
///
/// `Default` gives production values; [`from_env`](Self::from_env) layers
/// `MTG_INGEST_*` environment variables on top.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub db_path: PathBuf,
    pub timeout: Duration,
    /// Applies to the bulk snapshot download instead of `timeout`.
    pub download_timeout: Duration,
    pub user_agent: String,
    pub scryfall_bulk_url: String,
    pub moxfield_base: String,
    pub bulk_type: String,
    pub page_size: u32,
    pub page_delay: Duration,
    pub item_delay: Duration,
    pub fallback_owner: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            timeout: Duration::from_secs(120),
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            scryfall_bulk_url: SCRYFALL_BULK_URL.to_string(),
            moxfield_base: MOXFIELD_API_BASE.to_string(),
            bulk_type: DEFAULT_BULK_TYPE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: DEFAULT_PAGE_DELAY,
            item_delay: Duration::ZERO,
            fallback_owner: DEFAULT_FALLBACK_OWNER.to_string(),
        }
    }
}

impl IngestConfig {
    /// Build a config from defaults overridden by environment variables.
    ///
    /// Recognized keys: `MTG_INGEST_DB`, `MTG_INGEST_TIMEOUT_SECS`,
    /// `MTG_INGEST_USER_AGENT`, `MTG_INGEST_SCRYFALL_BULK_URL`,
    /// `MTG_INGEST_MOXFIELD_BASE`, `MTG_INGEST_BULK_TYPE`,
    /// `MTG_INGEST_PAGE_SIZE`, `MTG_INGEST_PAGE_DELAY_MS`,
    /// `MTG_INGEST_ITEM_DELAY_MS`, `MTG_INGEST_FALLBACK_OWNER`.
    /// Unparseable numbers keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("MTG_INGEST_DB") {
            cfg.db_path = PathBuf::from(v);
        }
        if let Some(secs) = get("MTG_INGEST_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            cfg.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) =
            get("MTG_INGEST_DOWNLOAD_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok())
        {
            cfg.download_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("MTG_INGEST_USER_AGENT") {
            cfg.user_agent = v;
        }
        if let Some(v) = get("MTG_INGEST_SCRYFALL_BULK_URL") {
            cfg.scryfall_bulk_url = v;
        }
        if let Some(v) = get("MTG_INGEST_MOXFIELD_BASE") {
            cfg.moxfield_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("MTG_INGEST_BULK_TYPE") {
            cfg.bulk_type = v;
        }
        if let Some(n) = get("MTG_INGEST_PAGE_SIZE").and_then(|v| v.trim().parse::<u32>().ok()) {
            if n > 0 {
                cfg.page_size = n;
            }
        }
        if let Some(ms) = get("MTG_INGEST_PAGE_DELAY_MS").and_then(|v| v.trim().parse().ok()) {
            cfg.page_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = get("MTG_INGEST_ITEM_DELAY_MS").and_then(|v| v.trim().parse().ok()) {
            cfg.item_delay = Duration::from_millis(ms);
        }
        if let Some(v) = get("MTG_INGEST_FALLBACK_OWNER") {
            cfg.fallback_owner = v;
        }
        cfg
    }
}
