//! Semantic lookup configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the remote lookup services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Identifier lookup endpoint (query: `string`, `limit`)
    #[serde(default = "default_identifier_endpoint")]
    pub identifier_endpoint: String,
    /// Maximum number of candidates requested per term
    #[serde(default = "default_identifier_limit")]
    pub identifier_limit: u32,
    /// Biomedical annotation endpoint (query: `content`)
    #[serde(default = "default_biomedical_endpoint")]
    pub biomedical_endpoint: String,
    /// Identifier normalization endpoint (query: `curie`)
    #[serde(default = "default_normalize_endpoint")]
    pub normalize_endpoint: String,
    /// Coarse POS values whose tokens get an identifier lookup
    #[serde(default = "default_enrich_pos")]
    pub enrich_pos: Vec<String>,
}

fn default_identifier_endpoint() -> String {
    "http://robokop.renci.org:2433/lookup".to_string()
}

fn default_identifier_limit() -> u32 {
    10
}

fn default_biomedical_endpoint() -> String {
    "https://api.monarchinitiative.org/api/nlp/annotate/entities".to_string()
}

fn default_normalize_endpoint() -> String {
    "https://nodenormalization-sri.renci.org/get_normalized_nodes".to_string()
}

fn default_enrich_pos() -> Vec<String> {
    vec!["NOUN".to_string()]
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LookupConfig {
    /// Base default without env overrides.
    pub(crate) fn base_default() -> Self {
        Self {
            identifier_endpoint: default_identifier_endpoint(),
            identifier_limit: default_identifier_limit(),
            biomedical_endpoint: default_biomedical_endpoint(),
            normalize_endpoint: default_normalize_endpoint(),
            enrich_pos: default_enrich_pos(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `BIOLEX_IDENTIFIER_URL`
    /// - `BIOLEX_BIOMEDICAL_URL`
    /// - `BIOLEX_NORMALIZE_URL`
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env_non_empty("BIOLEX_IDENTIFIER_URL") {
            self.identifier_endpoint = url;
        }
        if let Some(url) = env_non_empty("BIOLEX_BIOMEDICAL_URL") {
            self.biomedical_endpoint = url;
        }
        if let Some(url) = env_non_empty("BIOLEX_NORMALIZE_URL") {
            self.normalize_endpoint = url;
        }
        self
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}
