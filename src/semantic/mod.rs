//! Remote semantic lookups: noun identifiers and biomedical concept spans.
//!
//! The two lookups have deliberately different failure policies. Identifier
//! lookups are best-effort enrichment: any failure degrades to an empty
//! result and is logged. Biomedical annotation is load-bearing: transport and
//! decode failures propagate to the caller. The biomedical call also does not
//! check the response status; a non-success status is only logged and the
//! body is decoded regardless.

mod client;
mod config;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{BiomedicalParseResult, SemanticLookupResult};

pub use client::SemanticClient;
pub use config::LookupConfig;

/// Errors from the lookup services.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Lookup service connection failed: {0}")]
    Connection(String),

    #[error("Lookup service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode lookup response: {0}")]
    Parse(String),

    #[error("Invalid lookup configuration: {0}")]
    Config(String),
}

/// The two lookups the aggregator depends on.
#[async_trait]
pub trait SemanticLookup: Send + Sync {
    /// Resolve a term to candidate identifiers. Never fails: errors degrade
    /// to `SemanticLookupResult::empty()`.
    async fn lookup_identifier(&self, term: &str) -> SemanticLookupResult;

    /// Annotate a whole sentence with biomedical concept spans.
    async fn lookup_biomedical_spans(
        &self,
        sentence: &str,
    ) -> Result<BiomedicalParseResult, LookupError>;
}
