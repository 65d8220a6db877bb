//! Autocomplete suggestions from the Datamuse API
//!
//! Suggestions are decorative: any failure degrades to an empty list so the
//! search box never shows an error for them.

use bridge_traits::http::{HttpClient, HttpRequest};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::types::SuggestionItem;

/// Datamuse API base URL
const DATAMUSE_API_BASE: &str = "https://api.datamuse.com";

/// Minimum fragment length before suggestions kick in
const MIN_FRAGMENT_LEN: usize = 2;

/// Cap on returned suggestions
const MAX_SUGGESTIONS: usize = 5;

/// Word-completion client
pub struct DatamuseClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl DatamuseClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_base_url(http_client, DATAMUSE_API_BASE)
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Suggest completions for a typed fragment. Fragments under two
    /// characters produce nothing, as do transport or parse failures.
    pub async fn suggest(&self, fragment: &str) -> Vec<String> {
        let fragment = fragment.trim();
        if fragment.chars().count() < MIN_FRAGMENT_LEN {
            return Vec::new();
        }

        let url = format!("{}/sug?s={}", self.base_url, urlencoding::encode(fragment));
        let response = match self.http_client.execute(HttpRequest::get(url)).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                warn!(status = response.status, "Suggestion request rejected");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Suggestion request failed");
                return Vec::new();
            }
        };

        match response.json::<Vec<SuggestionItem>>() {
            Ok(items) => {
                let suggestions: Vec<String> = items
                    .into_iter()
                    .take(MAX_SUGGESTIONS)
                    .map(|item| item.word)
                    .collect();
                debug!(fragment, count = suggestions.len(), "Suggestions fetched");
                suggestions
            }
            Err(e) => {
                warn!(error = %e, "Suggestion response unparseable");
                Vec::new()
            }
        }
    }
}
