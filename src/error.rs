#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Bulk export not found: {0}")]
    SourceNotFound(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to fetch deck {id}: {reason}")]
    ItemFetch { id: String, reason: String },

    #[error("DuckDB error: {0}")]
    Persistence(#[from] duckdb::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl IngestError {
    /// True for network failures and non-success HTTP statuses.
    pub fn is_transport(&self) -> bool {
        matches!(self, IngestError::Transport(_) | IngestError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
