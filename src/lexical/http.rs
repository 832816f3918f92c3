//! Lexical backend that delegates to a parser service over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::build_client;
use crate::models::{EntitySpan, Token};

use super::{LexicalAnalysis, LexicalBackend, LexicalError};

/// Parser service request body.
#[derive(Debug, Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
}

/// Parser service response body.
#[derive(Debug, Deserialize)]
struct ParseResponse {
    tokens: Vec<WireToken>,
    #[serde(default)]
    ents: Vec<EntitySpan>,
}

#[derive(Debug, Deserialize)]
struct WireToken {
    text: String,
    lemma: String,
    pos: String,
    tag: String,
    dep: String,
    shape: String,
    is_alpha: bool,
    is_stop: bool,
}

impl From<WireToken> for Token {
    fn from(wire: WireToken) -> Self {
        Token {
            text: wire.text,
            lemma: wire.lemma,
            pos: wire.pos,
            tag: wire.tag,
            dep: wire.dep,
            shape: wire.shape,
            is_alpha: wire.is_alpha,
            is_stop: wire.is_stop,
            lookup: None,
        }
    }
}

/// Backend for a remote tokenizer/tagger/parser/NER service.
pub struct HttpLexicalBackend {
    endpoint: String,
    client: Client,
}

impl HttpLexicalBackend {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, LexicalError> {
        url::Url::parse(endpoint)
            .map_err(|e| LexicalError::Config(format!("invalid endpoint '{}': {}", endpoint, e)))?;
        let client = build_client(timeout).map_err(|e| LexicalError::Config(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LexicalBackend for HttpLexicalBackend {
    fn backend_id(&self) -> &str {
        "http"
    }

    async fn analyze(&self, text: &str) -> Result<LexicalAnalysis, LexicalError> {
        debug!("Parsing via {}: {}", self.endpoint, text);
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&ParseRequest { text })
            .send()
            .await
            .map_err(|e| LexicalError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LexicalError::Api { status, body });
        }

        let parsed: ParseResponse = resp
            .json()
            .await
            .map_err(|e| LexicalError::Parse(e.to_string()))?;

        Ok(LexicalAnalysis {
            tokens: parsed.tokens.into_iter().map(Token::from).collect(),
            entities: parsed.ents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_decodes_parser_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/parse")
            .match_body(mockito::Matcher::Json(serde_json::json!({"text": "Does BRCA1 matter"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "tokens": [
                        {"text": "Does", "lemma": "do", "pos": "AUX", "tag": "VBZ", "dep": "aux",
                         "shape": "Xxxx", "is_alpha": true, "is_stop": true},
                        {"text": "BRCA1", "lemma": "BRCA1", "pos": "PROPN", "tag": "NNP", "dep": "nsubj",
                         "shape": "XXXXd", "is_alpha": false, "is_stop": false},
                        {"text": "matter", "lemma": "matter", "pos": "VERB", "tag": "VB", "dep": "ROOT",
                         "shape": "xxxx", "is_alpha": true, "is_stop": false}
                    ],
                    "ents": [{"text": "BRCA1", "start_char": 5, "end_char": 10, "label": "GENE"}]
                }"#,
            )
            .create_async()
            .await;

        let backend = HttpLexicalBackend::new(&format!("{}/parse", server.url()), None).unwrap();
        let analysis = backend.analyze("Does BRCA1 matter").await.unwrap();

        assert_eq!(analysis.tokens.len(), 3);
        assert_eq!(analysis.tokens[1].text, "BRCA1");
        assert_eq!(analysis.tokens[1].dep, "nsubj");
        assert!(analysis.tokens.iter().all(|t| t.lookup.is_none()));
        assert_eq!(analysis.entities[0].label, "GENE");
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/parse")
            .with_status(503)
            .with_body("model loading")
            .create_async()
            .await;

        let backend = HttpLexicalBackend::new(&format!("{}/parse", server.url()), None).unwrap();
        let err = backend.analyze("anything").await.unwrap_err();

        assert!(matches!(err, LexicalError::Api { status: 503, .. }));
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        assert!(matches!(
            HttpLexicalBackend::new("not a url", None),
            Err(LexicalError::Config(_))
        ));
    }
}
