//! Definition lookup against the free dictionary API

use bridge_traits::http::{HttpClient, HttpRequest};
use core_deck::WordEntry;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{DictionaryError, Result};
use crate::types::RawEntry;

/// Dictionary API base URL (English entries)
const DICTIONARY_API_BASE: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// Definition lookup client
pub struct DictionaryClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl DictionaryClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_base_url(http_client, DICTIONARY_API_BASE)
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Look up a word. `Ok(None)` means the word has no entry; only
    /// transport and parse problems are errors.
    #[instrument(skip(self))]
    pub async fn lookup(&self, word: &str) -> Result<Option<WordEntry>> {
        let word = word.trim();
        if word.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/{}", self.base_url, urlencoding::encode(word));
        let response = self.http_client.execute(HttpRequest::get(url)).await?;

        // The API answers 404 for unknown words.
        if response.status == 404 {
            debug!(word, "No dictionary entry");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(DictionaryError::ApiError {
                status_code: response.status,
                message: response.text(),
            });
        }

        let entries: Vec<RawEntry> = response
            .json()
            .map_err(|e| DictionaryError::ParseError(e.to_string()))?;

        // The API returns one entry per etymology; the first is the common
        // one and the only one surfaced.
        Ok(entries.into_iter().next().map(RawEntry::into_entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::HttpResponse;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait::async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.as_bytes().to_vec()),
        }
    }

    #[tokio::test]
    async fn lookup_returns_first_entry() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| req.url.ends_with("/en/lumen"))
            .times(1)
            .returning(|_| {
                Ok(response(
                    200,
                    r#"[
                        {
                            "word": "lumen",
                            "phonetic": "/ˈluː.mən/",
                            "meanings": [{
                                "partOfSpeech": "noun",
                                "definitions": [{"definition": "a unit of luminous flux"}]
                            }]
                        },
                        {"word": "lumen", "meanings": []}
                    ]"#,
                ))
            });

        let client = DictionaryClient::new(Arc::new(mock_http));
        let entry = client.lookup("lumen").await.unwrap().unwrap();
        assert_eq!(entry.word, "lumen");
        assert_eq!(entry.meanings[0].part_of_speech, "noun");
    }

    #[tokio::test]
    async fn unknown_word_is_none_not_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(404, r#"{"title":"No Definitions Found"}"#)));

        let client = DictionaryClient::new(Arc::new(mock_http));
        assert!(client.lookup("zzzzzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_input_short_circuits_without_a_request() {
        let mock_http = MockHttpClient::new();
        let client = DictionaryClient::new(Arc::new(mock_http));
        assert!(client.lookup("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn server_error_surfaces() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(500, "oops")));

        let client = DictionaryClient::new(Arc::new(mock_http));
        assert!(client.lookup("lumen").await.is_err());
    }
}
