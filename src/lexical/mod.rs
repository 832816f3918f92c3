//! Lexical annotation: tokens, tags, and named entities.
//!
//! Provides a `LexicalBackend` trait for pluggable tokenizer/tagger/NER
//! capabilities, a built-in `RuleBasedBackend` that needs no model, and an
//! `HttpLexicalBackend` that delegates to a parser service.

mod http;
mod rule_based;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{EntitySpan, Token};

pub use http::HttpLexicalBackend;
pub use rule_based::{word_shape, RuleBasedBackend};

/// Tokens and entities for one piece of text, in annotator order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexicalAnalysis {
    pub tokens: Vec<Token>,
    pub entities: Vec<EntitySpan>,
}

/// Errors from lexical backends.
#[derive(Debug, Error)]
pub enum LexicalError {
    #[error("Parser service connection failed: {0}")]
    Connection(String),

    #[error("Parser service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode parser response: {0}")]
    Parse(String),

    #[error("Invalid lexical backend configuration: {0}")]
    Config(String),
}

/// A tokenizer/tagger/parser/NER capability.
///
/// Implementations only shape their output into `Token` and `EntitySpan`
/// records. Tokens are returned without identifier lookups; enrichment is
/// the aggregator's job.
#[async_trait]
pub trait LexicalBackend: Send + Sync {
    /// Human-readable backend identifier (e.g. "rules", "http").
    fn backend_id(&self) -> &str;

    /// Analyze a piece of text.
    async fn analyze(&self, text: &str) -> Result<LexicalAnalysis, LexicalError>;
}

/// Which lexical backend to construct at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LexicalBackendKind {
    /// Built-in rule-based tokenizer and tagger
    #[default]
    Rules,
    /// Remote parser service
    Http,
}

impl fmt::Display for LexicalBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules => write!(f, "rules"),
            Self::Http => write!(f, "http"),
        }
    }
}

impl FromStr for LexicalBackendKind {
    type Err = LexicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rules" | "rule" | "builtin" => Ok(Self::Rules),
            "http" | "service" => Ok(Self::Http),
            other => Err(LexicalError::Config(format!(
                "unknown lexical backend '{}'",
                other
            ))),
        }
    }
}

/// Lexical section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalConfig {
    #[serde(default)]
    pub backend: LexicalBackendKind,
    /// Parser service endpoint, required for the `http` backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl LexicalConfig {
    /// Apply `BIOLEX_LEXICAL_URL`. Setting it also selects the http backend.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = std::env::var("BIOLEX_LEXICAL_URL")
            .ok()
            .filter(|s| !s.is_empty())
        {
            self.backend = LexicalBackendKind::Http;
            self.endpoint = Some(url);
        }
        self
    }

    /// Construct the configured backend. Built once at startup.
    pub fn build_backend(
        &self,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn LexicalBackend>, LexicalError> {
        match self.backend {
            LexicalBackendKind::Rules => Ok(Box::new(RuleBasedBackend::new())),
            LexicalBackendKind::Http => {
                let endpoint = self.endpoint.as_deref().ok_or_else(|| {
                    LexicalError::Config("the http backend needs lexical.endpoint".to_string())
                })?;
                Ok(Box::new(HttpLexicalBackend::new(endpoint, timeout)?))
            }
        }
    }
}
