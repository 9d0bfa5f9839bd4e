use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

use crate::error::{IngestError, Result};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| IngestError::InvalidArgument(format!("failed to initialize tracing: {}", e)))
}
