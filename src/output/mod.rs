//! Output strategies for annotated sentences.
//!
//! Each strategy implements `OutputStrategy`. The corpus driver asks
//! `is_written(index)` before doing any work for a sentence, so a strategy's
//! marker file doubles as the resume point for interrupted runs.

mod atomic;
mod console;
mod rows;
mod structured;
mod table;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::AnnotatedSentence;

pub use atomic::write_atomic;
pub use console::ConsoleOutput;
pub use rows::{
    biomedical_rows, entity_rows, token_rows, BIOMEDICAL_HEADER, ENTITY_HEADER, TOKEN_HEADER,
};
pub use structured::{read_record, StructuredOutput};
pub use table::TableOutput;

/// Errors from output strategies.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown output format '{0}'")]
    UnknownFormat(String),
}

/// A way of persisting annotated sentences, addressed by corpus index.
pub trait OutputStrategy: Send + Sync {
    /// Short name for logs and progress output.
    fn name(&self) -> &str;

    /// Whether the sentence at `index` has already been written.
    fn is_written(&self, index: usize) -> bool;

    /// Render one sentence. Called at most once per index per run.
    fn write(&self, index: usize, sentence: &AnnotatedSentence) -> Result<(), OutputError>;
}

/// Output format selected at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-width tables on stdout (never skips)
    Console,
    /// Comma-delimited files per sentence
    #[default]
    Table,
    /// One YAML file per sentence
    Yaml,
}

impl OutputFormat {
    /// Whether this format persists anything (and so can resume).
    pub fn is_persistent(&self) -> bool {
        !matches!(self, Self::Console)
    }

    /// Construct the strategy for this format.
    pub fn create_strategy(&self, output_dir: &Path) -> Box<dyn OutputStrategy> {
        match self {
            Self::Console => Box::new(ConsoleOutput::new()),
            Self::Table => Box::new(TableOutput::new(output_dir)),
            Self::Yaml => Box::new(StructuredOutput::new(output_dir)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::Table => write!(f, "table"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "log" => Ok(Self::Console),
            "table" | "csv" => Ok(Self::Table),
            "yaml" | "yml" | "structured" => Ok(Self::Yaml),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }
}
