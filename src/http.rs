//! Blocking HTTP client shared by the Scryfall and Moxfield sources.
//!
//! Non-success statuses surface as [`IngestError::Status`] and response bodies
//! are parsed with `serde_json` so a malformed body is reported as
//! [`IngestError::Json`] rather than a generic transport failure.

use crate::error::{IngestError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Thin wrapper over a `reqwest` blocking client with a fixed user agent,
/// timeout and redirect policy.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// `timeout` bounds each whole request, body included, unless a call
    /// overrides it.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` with query parameters and decode the body as JSON.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!(url, ?query, "GET");
        self.send_json(url, self.client.get(url).query(query))
    }

    /// Like [`get_json`](Self::get_json) with its own deadline for the whole
    /// transfer. Used for bulk files far larger than an API response.
    pub fn get_json_with_timeout<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<T> {
        debug!(url, ?timeout, "GET");
        self.send_json(url, self.client.get(url).timeout(timeout))
    }

    fn send_json<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T> {
        let resp = request.send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}


#[cfg(test)]
mod tests {
    use super::stub::serve_once;
    use super::*;
    use serde_json::Value;

    fn client(timeout: Duration) -> HttpClient {
        HttpClient::new(timeout, "test-agent").unwrap()
    }

    #[test]
    fn decodes_success_body() {
        let url = serve_once("200 OK", r#"{"data":[1,2]}"#, 64, Duration::ZERO);
        let body: Value = client(Duration::from_secs(5)).get_json(&url, &[]).unwrap();
        assert_eq!(body["data"][1], 2);
    }

    #[test]
    fn not_found_maps_to_status() {
        let url = serve_once("404 Not Found", r#"{"error":"missing"}"#, 64, Duration::ZERO);
        let err = client(Duration::from_secs(5))
            .get_json::<Value>(&url, &[])
            .unwrap_err();
        assert!(matches!(err, IngestError::Status { status: 404, .. }));
        assert!(err.is_transport());
    }

    #[test]
    fn malformed_body_maps_to_json() {
        let url = serve_once("200 OK", r#"{"data": ["#, 64, Duration::ZERO);
        let err = client(Duration::from_secs(5))
            .get_json::<Value>(&url, &[])
            .unwrap_err();
        assert!(matches!(err, IngestError::Json(_)));
        assert!(!err.is_transport());
    }

    #[test]
    fn slow_body_exceeds_client_timeout() {
        let url = serve_once("200 OK", r#"[1,2,3,4,5,6,7,8,9,10]"#, 2, Duration::from_millis(150));
        let err = client(Duration::from_secs(1))
            .get_json::<Vec<Value>>(&url, &[])
            .unwrap_err();
        assert!(matches!(err, IngestError::Transport(_)));
    }

    #[test]
    fn download_deadline_overrides_client_timeout() {
        let url = serve_once("200 OK", r#"[1,2,3,4,5,6,7,8,9,10]"#, 2, Duration::from_millis(150));
        let values: Vec<Value> = client(Duration::from_secs(1))
            .get_json_with_timeout(&url, Duration::from_secs(30))
            .unwrap();
        assert_eq!(values.len(), 10);
    }
}
