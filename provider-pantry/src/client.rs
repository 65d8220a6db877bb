//! Pantry API client
//!
//! Implements the `CloudBackup` trait over the Pantry key-value service.
//! A pantry id is the whole credential: validation is a details fetch, the
//! deck lives in one named basket, and pushes replace that basket wholesale.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest};
use bridge_traits::storage::CloudBackup;
use core_deck::Card;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{PantryError, Result};
use crate::types::{BasketPayload, PantryDetails};

/// Pantry API base URL
const PANTRY_API_BASE: &str = "https://getpantry.cloud/apiv1/pantry";

/// Basket holding the deck record
pub const BASKET_NAME: &str = "Lexdeck";

/// Pantry key-value cloud backup
pub struct PantryClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl PantryClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_base_url(http_client, PANTRY_API_BASE)
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn pantry_url(&self, pantry_id: &str) -> String {
        format!("{}/{}", self.base_url, pantry_id)
    }

    fn basket_url(&self, pantry_id: &str) -> String {
        format!("{}/{}/basket/{}", self.base_url, pantry_id, BASKET_NAME)
    }

    async fn validate_inner(&self, pantry_id: &str) -> Result<()> {
        let request = HttpRequest::get(self.pantry_url(pantry_id));
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(PantryError::InvalidAccount(format!(
                "details fetch returned status {}",
                response.status
            )));
        }

        if let Ok(details) = response.json::<PantryDetails>() {
            debug!(pantry = %details.name, baskets = details.baskets.len(), "Pantry validated");
        }
        Ok(())
    }

    async fn pull_inner(&self, pantry_id: &str) -> Result<Vec<Card>> {
        let request = HttpRequest::get(self.basket_url(pantry_id));
        let response = self.http_client.execute(request).await?;

        // Pantry answers 400 for a basket that was never created; a fresh
        // account simply has no deck yet.
        if response.status == 400 || response.status == 404 {
            debug!(pantry_id, "Deck basket not created yet");
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(PantryError::ApiError {
                status_code: response.status,
                message: response.text(),
            });
        }

        let payload: BasketPayload = response
            .json()
            .map_err(|e| PantryError::ParseError(e.to_string()))?;
        info!(cards = payload.cards.len(), "Pulled deck basket");
        Ok(payload.cards)
    }

    async fn push_inner(&self, pantry_id: &str, cards: &[Card]) -> Result<()> {
        let payload = BasketPayload {
            cards: cards.to_vec(),
        };
        let request = HttpRequest::post(self.basket_url(pantry_id)).json(&payload)?;
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            warn!(status = response.status, "Basket push rejected");
            return Err(PantryError::ApiError {
                status_code: response.status,
                message: response.text(),
            });
        }

        info!(cards = cards.len(), "Pushed deck basket");
        Ok(())
    }
}

#[async_trait]
impl CloudBackup for PantryClient {
    #[instrument(skip(self))]
    async fn validate(&self, account_id: &str) -> BridgeResult<()> {
        self.validate_inner(account_id).await.map_err(Into::into)
    }

    #[instrument(skip(self))]
    async fn pull(&self, account_id: &str) -> BridgeResult<Vec<Card>> {
        self.pull_inner(account_id).await.map_err(Into::into)
    }

    #[instrument(skip(self, cards))]
    async fn push(&self, account_id: &str, cards: &[Card]) -> BridgeResult<()> {
        self.push_inner(account_id, cards).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result};
    use bridge_traits::http::HttpResponse;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
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
    async fn validate_accepts_existing_pantry() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| req.url.ends_with("/pantry-1"))
            .times(1)
            .returning(|_| Ok(response(200, r#"{"name":"my pantry","baskets":[]}"#)));

        let client = PantryClient::new(Arc::new(mock_http));
        client.validate("pantry-1").await.unwrap();
    }

    #[tokio::test]
    async fn validate_rejects_unknown_pantry() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(400, "pantry does not exist")));

        let client = PantryClient::new(Arc::new(mock_http));
        let err = client.validate("nope").await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAccount(_)));
    }

    #[tokio::test]
    async fn pull_treats_missing_basket_as_empty_deck() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| req.url.ends_with("/basket/Lexdeck"))
            .times(1)
            .returning(|_| Ok(response(400, "basket does not exist")));

        let client = PantryClient::new(Arc::new(mock_http));
        assert!(client.pull("pantry-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pull_parses_stored_cards() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(response(
                200,
                r#"{"cards":[{
                    "id":"8b6f2f9e-3c1d-4a57-9f60-1e2d3c4b5a69",
                    "word":"lumen",
                    "mainDefinition":"a unit of luminous flux",
                    "partOfSpeech":"noun",
                    "status":"New",
                    "lastReviewed":0,
                    "createdAt":1700000000000
                }]}"#,
            ))
        });

        let client = PantryClient::new(Arc::new(mock_http));
        let cards = client.pull("pantry-1").await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].word, "lumen");
    }

    #[tokio::test]
    async fn pull_surfaces_corrupt_basket() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, r#"{"cards": "not a list"}"#)));

        let client = PantryClient::new(Arc::new(mock_http));
        assert!(client.pull("pantry-1").await.is_err());
    }

    #[tokio::test]
    async fn push_posts_the_full_deck_payload() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| {
                let body = req.body.as_ref().expect("push carries a body");
                let payload: serde_json::Value = serde_json::from_slice(body).unwrap();
                req.url.ends_with("/basket/Lexdeck")
                    && payload["cards"].as_array().map(|c| c.len()) == Some(1)
            })
            .times(1)
            .returning(|_| Ok(response(200, "ok")));

        let client = PantryClient::new(Arc::new(mock_http));
        let cards = vec![Card::new(
            "lumen",
            None,
            "a unit of luminous flux",
            None,
            "noun",
            1_700_000_000_000,
        )];
        client.push("pantry-1", &cards).await.unwrap();
    }

    #[tokio::test]
    async fn push_surfaces_api_failure() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(500, "temporarily down")));

        let client = PantryClient::new(Arc::new(mock_http));
        let cards = vec![Card::new("x", None, "y", None, "noun", 1)];
        assert!(client.push("pantry-1", &cards).await.is_err());
    }
}
