//! Identifier lookup result attached to enriched tokens.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of an identifier lookup for a single term.
///
/// `full` keeps the service response as returned, keyed by candidate
/// identifier. `min` is the first key of `full` in response order, which is
/// the only ranking the service gives us.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticLookupResult {
    pub full: Map<String, Value>,
    pub min: Option<String>,
}

impl SemanticLookupResult {
    /// Result used when the lookup failed or returned nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from a decoded response object.
    pub fn from_response(full: Map<String, Value>) -> Self {
        let min = full.keys().next().cloned();
        Self { full, min }
    }

    /// Best identifier, if any.
    pub fn best(&self) -> Option<&str> {
        self.min.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_key_in_response_order() {
        let full: Map<String, Value> =
            serde_json::from_str(r#"{"MONDO:2": {"x": 1}, "CHEBI:1": {}}"#).unwrap();
        let result = SemanticLookupResult::from_response(full);
        assert_eq!(result.best(), Some("MONDO:2"));
    }

    #[test]
    fn test_empty_response_has_no_best() {
        let result = SemanticLookupResult::from_response(Map::new());
        assert_eq!(result, SemanticLookupResult::empty());
        assert!(result.best().is_none());
    }
}
