//! Biomedical concept spans returned by the annotation service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded body of a biomedical annotation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomedicalParseResult {
    pub spans: Vec<BiomedicalSpan>,
}

/// A character range tagged with biomedical concept candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomedicalSpan {
    pub text: String,
    pub start: u64,
    pub end: u64,
    /// Candidate matches, best first. Named `token` on the wire.
    #[serde(rename = "token", default)]
    pub candidates: Vec<ConceptCandidate>,
    /// Fields we don't interpret, kept for the structured output.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One candidate concept for a span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptCandidate {
    pub id: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConceptCandidate {
    pub fn new(id: impl Into<String>, category: Vec<String>) -> Self {
        Self {
            id: id.into(),
            category,
            extra: Map::new(),
        }
    }

    /// First category, or blank when the service returned none.
    pub fn primary_category(&self) -> &str {
        self.category.first().map(String::as_str).unwrap_or("")
    }
}

impl BiomedicalSpan {
    pub fn new(
        text: impl Into<String>,
        start: u64,
        end: u64,
        candidates: Vec<ConceptCandidate>,
    ) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            candidates,
            extra: Map::new(),
        }
    }

    /// The candidate surfaced in tables: always the first one.
    pub fn primary_candidate(&self) -> Option<&ConceptCandidate> {
        self.candidates.first()
    }

    /// Identifier of the first candidate, blank when there are none.
    pub fn primary_id(&self) -> &str {
        self.primary_candidate().map(|c| c.id.as_str()).unwrap_or("")
    }

    /// First category of the first candidate, blank when missing.
    pub fn primary_category(&self) -> &str {
        self.primary_candidate()
            .map(ConceptCandidate::primary_category)
            .unwrap_or("")
    }
}
