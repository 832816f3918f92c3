//! Tokens, entity spans, and the annotated sentence that ties them together.

use serde::{Deserialize, Serialize};

use super::{BiomedicalSpan, SemanticLookupResult};

/// A single token with its morphological and syntactic tags.
///
/// Serialized field names follow the structured output layout
/// (`token`, `alpha`, `stop`, `sri`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "token")]
    pub text: String,
    pub lemma: String,
    pub pos: String,
    pub tag: String,
    pub dep: String,
    pub shape: String,
    #[serde(rename = "alpha")]
    pub is_alpha: bool,
    #[serde(rename = "stop")]
    pub is_stop: bool,
    /// Identifier lookup, present only for tokens selected for enrichment.
    #[serde(rename = "sri", default)]
    pub lookup: Option<SemanticLookupResult>,
}

impl Token {
    /// Best identifier from the lookup, if one was attempted and found.
    pub fn best_identifier(&self) -> Option<&str> {
        self.lookup.as_ref().and_then(SemanticLookupResult::best)
    }

    /// Tokenizer artifacts that tables leave out.
    pub fn is_newline(&self) -> bool {
        self.text == "\n"
    }
}

/// A named-entity span from the lexical annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub start_char: usize,
    pub end_char: usize,
    pub label: String,
}

/// The composite record produced for one input sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSentence {
    pub text: String,
    pub tokens: Vec<Token>,
    pub entities: Vec<EntitySpan>,
    pub biomedical: Vec<BiomedicalSpan>,
}

impl AnnotatedSentence {
    /// Number of tokens that carry an identifier lookup.
    pub fn enriched_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.lookup.is_some()).count()
    }
}
