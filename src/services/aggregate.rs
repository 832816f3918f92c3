//! Per-sentence annotation: lexical analysis, identifier enrichment, and
//! biomedical concept spans merged into one record.

use tracing::debug;

use crate::lexical::{LexicalAnalysis, LexicalBackend};
use crate::models::{AnnotatedSentence, Token};
use crate::semantic::{LookupConfig, SemanticLookup};

use super::PipelineError;

/// Selects the tokens that get an identifier lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPredicate {
    pos: Vec<String>,
}

impl TokenPredicate {
    /// Match tokens whose coarse part of speech is one of `tags`.
    pub fn pos_in<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pos: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &LookupConfig) -> Self {
        Self::pos_in(config.enrich_pos.iter().cloned())
    }

    pub fn matches(&self, token: &Token) -> bool {
        self.pos.iter().any(|p| *p == token.pos)
    }
}

impl Default for TokenPredicate {
    fn default() -> Self {
        Self::pos_in(["NOUN"])
    }
}

/// Combines a lexical backend and the lookup services into annotated
/// sentences. Every remote call is awaited before the next is issued.
pub struct Aggregator<'a> {
    lexical: &'a dyn LexicalBackend,
    lookup: &'a dyn SemanticLookup,
    predicate: TokenPredicate,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        lexical: &'a dyn LexicalBackend,
        lookup: &'a dyn SemanticLookup,
        predicate: TokenPredicate,
    ) -> Self {
        Self {
            lexical,
            lookup,
            predicate,
        }
    }

    /// Annotate one sentence.
    ///
    /// Identifier lookups never fail (they degrade to empty results); lexical
    /// and biomedical failures abort the sentence.
    pub async fn aggregate(&self, text: &str) -> Result<AnnotatedSentence, PipelineError> {
        let LexicalAnalysis {
            mut tokens,
            entities,
        } = self.lexical.analyze(text).await?;

        for token in tokens.iter_mut() {
            if self.predicate.matches(token) {
                token.lookup = Some(self.lookup.lookup_identifier(&token.text).await);
            }
        }

        let parsed = self.lookup.lookup_biomedical_spans(text).await?;

        let sentence = AnnotatedSentence {
            text: text.to_string(),
            tokens,
            entities,
            biomedical: parsed.spans,
        };
        debug!(
            "Aggregated '{}' via {}: {} tokens ({} enriched), {} entities, {} spans",
            text,
            self.lexical.backend_id(),
            sentence.tokens.len(),
            sentence.enriched_count(),
            sentence.entities.len(),
            sentence.biomedical.len()
        );
        Ok(sentence)
    }
}
