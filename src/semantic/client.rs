//! reqwest-backed implementation of the lookup services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::http::build_client;
use crate::models::{BiomedicalParseResult, SemanticLookupResult};

use super::{LookupConfig, LookupError, SemanticLookup};

/// HTTP client for the identifier, biomedical annotation, and normalization
/// services.
pub struct SemanticClient {
    config: LookupConfig,
    client: Client,
}

impl SemanticClient {
    /// Create a new client. Endpoints are validated up front.
    pub fn new(config: LookupConfig, timeout: Option<Duration>) -> Result<Self, LookupError> {
        for endpoint in [
            &config.identifier_endpoint,
            &config.biomedical_endpoint,
            &config.normalize_endpoint,
        ] {
            url::Url::parse(endpoint).map_err(|e| {
                LookupError::Config(format!("invalid endpoint '{}': {}", endpoint, e))
            })?;
        }
        let client = build_client(timeout).map_err(|e| LookupError::Config(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Raw identifier lookup; `lookup_identifier` wraps this with the
    /// degrade-to-empty policy.
    pub async fn fetch_identifiers(&self, term: &str) -> Result<Map<String, Value>, LookupError> {
        let limit = self.config.identifier_limit.to_string();
        debug!("Identifier lookup: {}", term);

        let resp = self
            .client
            .post(&self.config.identifier_endpoint)
            .query(&[("string", term), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| LookupError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LookupError::Api { status, body });
        }

        resp.json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))
    }

    /// Normalize an identifier (CURIE) to its equivalent identifiers.
    pub async fn normalize(&self, curie: &str) -> Result<Value, LookupError> {
        debug!("Normalizing: {}", curie);
        let resp = self
            .client
            .post(&self.config.normalize_endpoint)
            .query(&[("curie", curie)])
            .send()
            .await
            .map_err(|e| LookupError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LookupError::Api { status, body });
        }

        resp.json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))
    }
}

#[async_trait]
impl SemanticLookup for SemanticClient {
    async fn lookup_identifier(&self, term: &str) -> SemanticLookupResult {
        match self.fetch_identifiers(term).await {
            Ok(full) => SemanticLookupResult::from_response(full),
            Err(e) => {
                warn!("Identifier lookup for '{}' failed: {}", term, e);
                SemanticLookupResult::empty()
            }
        }
    }

    async fn lookup_biomedical_spans(
        &self,
        sentence: &str,
    ) -> Result<BiomedicalParseResult, LookupError> {
        debug!("Biomedical annotation: {}", sentence);
        let resp = self
            .client
            .post(&self.config.biomedical_endpoint)
            .query(&[("content", sentence)])
            .send()
            .await
            .map_err(|e| LookupError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(
                "Biomedical annotation returned {} for '{}', decoding body anyway",
                status, sentence
            );
        }

        let body = resp
            .text()
            .await
            .map_err(|e| LookupError::Connection(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| LookupError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> SemanticClient {
        let config = LookupConfig {
            identifier_endpoint: format!("{}/lookup", server.url()),
            biomedical_endpoint: format!("{}/annotate", server.url()),
            normalize_endpoint: format!("{}/normalize", server.url()),
            ..LookupConfig::base_default()
        };
        SemanticClient::new(config, None).unwrap()
    }

    #[tokio::test]
    async fn test_identifier_lookup_takes_first_key_in_response_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/lookup")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("string".into(), "headache".into()),
                Matcher::UrlEncoded("limit".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"HP:0002315": ["headache"], "MONDO:0005267": ["headache disorder"]}"#)
            .create_async()
            .await;

        let result = client_for(&server).lookup_identifier("headache").await;

        assert_eq!(result.min.as_deref(), Some("HP:0002315"));
        assert_eq!(result.full.len(), 2);
    }

    #[tokio::test]
    async fn test_identifier_lookup_order_is_not_alphabetical() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/lookup")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"B": {"name": "second"}, "A": {"name": "first"}}"#)
            .create_async()
            .await;

        let result = client_for(&server).lookup_identifier("thing").await;

        assert_eq!(result.min.as_deref(), Some("B"));
        let keys: Vec<&str> = result.full.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_identifier_lookup_non_success_degrades_to_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/lookup")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.lookup_identifier("aspirin").await;
        assert_eq!(result, SemanticLookupResult::empty());

        let err = client.fetch_identifiers("aspirin").await.unwrap_err();
        assert!(matches!(err, LookupError::Api { status: 500, ref body } if body == "internal error"));
    }

    #[tokio::test]
    async fn test_identifier_lookup_bad_body_degrades_to_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/lookup")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let result = client_for(&server).lookup_identifier("aspirin").await;
        assert!(result.is_empty());
        assert!(result.min.is_none());
    }

    #[tokio::test]
    async fn test_identifier_lookup_unreachable_degrades_to_empty() {
        let config = LookupConfig {
            identifier_endpoint: "http://127.0.0.1:1/lookup".to_string(),
            ..LookupConfig::base_default()
        };
        let client = SemanticClient::new(config, Some(Duration::from_secs(5))).unwrap();

        let result = client.lookup_identifier("aspirin").await;
        assert_eq!(result, SemanticLookupResult::empty());
    }

    #[tokio::test]
    async fn test_biomedical_spans_decoded() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/annotate")
            .match_query(Matcher::UrlEncoded(
                "content".into(),
                "Aspirin treats headache".into(),
            ))
            .with_status(200)
            .with_body(
                r#"{"content": "Aspirin treats headache", "spans": [
                    {"start": 0, "end": 7, "text": "Aspirin",
                     "token": [{"id": "CHEBI:15365", "category": ["drug"]}]},
                    {"start": 15, "end": 23, "text": "headache",
                     "token": [{"id": "HP:0002315", "category": []}]}
                ]}"#,
            )
            .create_async()
            .await;

        let parsed = client_for(&server)
            .lookup_biomedical_spans("Aspirin treats headache")
            .await
            .unwrap();

        assert_eq!(parsed.spans.len(), 2);
        assert_eq!(parsed.spans[0].primary_id(), "CHEBI:15365");
        assert_eq!(parsed.spans[1].primary_category(), "");
    }

    #[tokio::test]
    async fn test_biomedical_status_is_not_checked() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/annotate")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"spans": []}"#)
            .create_async()
            .await;

        let parsed = client_for(&server)
            .lookup_biomedical_spans("unknown")
            .await
            .unwrap();
        assert!(parsed.spans.is_empty());
    }

    #[tokio::test]
    async fn test_biomedical_decode_failure_propagates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/annotate")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let err = client_for(&server)
            .lookup_biomedical_spans("Aspirin treats headache")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Parse(_)));
    }

    #[tokio::test]
    async fn test_normalize() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/normalize")
            .match_query(Matcher::UrlEncoded("curie".into(), "MESH:D001241".into()))
            .with_status(200)
            .with_body(r#"{"MESH:D001241": {"id": {"identifier": "CHEBI:15365"}}}"#)
            .create_async()
            .await;

        let value = client_for(&server).normalize("MESH:D001241").await.unwrap();
        assert_eq!(value["MESH:D001241"]["id"]["identifier"], "CHEBI:15365");
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        let config = LookupConfig {
            biomedical_endpoint: "annotate".to_string(),
            ..LookupConfig::base_default()
        };
        assert!(matches!(
            SemanticClient::new(config, None),
            Err(LookupError::Config(_))
        ));
    }
}
