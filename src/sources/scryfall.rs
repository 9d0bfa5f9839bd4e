use std::time::Duration;

use serde_json::Value;

use crate::config;
use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{BulkCatalog, BulkExport};
use crate::sources::SnapshotSource;

/// Scryfall bulk-data endpoints.
pub struct ScryfallClient {
    http: HttpClient,
    bulk_url: String,
    download_timeout: Duration,
}

impl ScryfallClient {
    pub fn new(http: HttpClient, bulk_url: &str) -> Self {
        Self {
            http,
            bulk_url: bulk_url.to_string(),
            download_timeout: config::DEFAULT_DOWNLOAD_TIMEOUT,
        }
    }

    /// Deadline for the snapshot transfer, replacing the client's timeout.
    pub fn download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }
}

impl SnapshotSource for ScryfallClient {
    fn bulk_catalog(&self) -> Result<BulkCatalog> {
        self.http.get_json(&self.bulk_url, &[])
    }

    fn download(&self, export: &BulkExport) -> Result<Vec<Value>> {
        // The whole array is held in memory; default_cards is a few hundred MB.
        self.http
            .get_json_with_timeout(&export.download_uri, self.download_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::stub::serve_once;

    fn export_at(uri: String) -> BulkExport {
        BulkExport {
            type_field: "default_cards".to_string(),
            download_uri: uri,
            name: None,
            updated_at: None,
            size: None,
        }
    }

    #[test]
    fn download_outlives_the_api_timeout() {
        let uri = serve_once(
            "200 OK",
            r#"[{"id":"a"},{"id":"b"},{"id":"c"}]"#,
            3,
            Duration::from_millis(120),
        );
        let http = HttpClient::new(Duration::from_secs(1), "test-agent").unwrap();
        let client = ScryfallClient::new(http, "http://127.0.0.1:9/bulk-data")
            .download_timeout(Duration::from_secs(30));

        let cards = client.download(&export_at(uri)).unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[2]["id"], "c");
    }

    #[test]
    fn download_still_has_a_deadline() {
        let uri = serve_once(
            "200 OK",
            r#"[{"id":"a"},{"id":"b"},{"id":"c"}]"#,
            3,
            Duration::from_millis(120),
        );
        let http = HttpClient::new(Duration::from_secs(30), "test-agent").unwrap();
        let client = ScryfallClient::new(http, "http://127.0.0.1:9/bulk-data")
            .download_timeout(Duration::from_millis(500));

        let err = client.download(&export_at(uri)).unwrap_err();
        assert!(err.is_transport());
    }
}
