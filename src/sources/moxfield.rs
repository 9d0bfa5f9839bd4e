use reqwest::Url;
use serde_json::Value;

use crate::error::{IngestError, Result};
use crate::http::HttpClient;
use crate::models::ListingPage;
use crate::sources::{DeckSource, Listing};

/// Moxfield's public deck API.
pub struct MoxfieldClient {
    http: HttpClient,
    base: Url,
}

impl MoxfieldClient {
    /// `base` is the API root, e.g. `https://api2.moxfield.com`.
    pub fn new(http: HttpClient, base: &str) -> Result<Self> {
        let base = Url::parse(base).map_err(|e| {
            IngestError::InvalidArgument(format!("invalid Moxfield base '{}': {}", base, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(IngestError::InvalidArgument(format!(
                "Moxfield base '{}' cannot hold a path",
                base
            )));
        }
        Ok(Self { http, base })
    }

    /// User names are percent-encoded as a single path segment.
    pub fn listing_url(&self, listing: &Listing) -> Result<Url> {
        match listing {
            Listing::User(name) => self.endpoint(&["v2", "users", name.as_str(), "decks"]),
            Listing::Search { .. } => self.endpoint(&["v2", "decks", "search"]),
        }
    }

    pub fn detail_url(&self, public_id: &str) -> Result<Url> {
        self.endpoint(&["v3", "decks", "all", public_id])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                IngestError::InvalidArgument(format!("Moxfield base '{}' cannot hold a path", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl DeckSource for MoxfieldClient {
    fn fetch_page(&self, listing: &Listing, page: u32, page_size: u32) -> Result<ListingPage> {
        let mut query = vec![
            ("pageNumber", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Listing::Search { query: q, .. } = listing {
            query.push(("q", q.clone()));
        }
        self.http
            .get_json(self.listing_url(listing)?.as_str(), &query)
    }

    fn fetch_detail(&self, public_id: &str) -> Result<Value> {
        self.http.get_json(self.detail_url(public_id)?.as_str(), &[])
    }
}
