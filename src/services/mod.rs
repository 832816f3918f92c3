//! Service layer for the annotation pipeline.
//!
//! This module contains domain logic separated from UI concerns.
//! Services are driven by the CLI and by integration tests.

pub mod aggregate;
pub mod corpus;

use std::path::PathBuf;

use thiserror::Error;

use crate::lexical::LexicalError;
use crate::output::OutputError;
use crate::semantic::LookupError;

pub use aggregate::{Aggregator, TokenPredicate};
pub use corpus::{load_corpus, parse_corpus, CorpusDriver, CorpusEvent, CorpusSummary};

/// Errors that abort a sentence, and with it the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Lexical analysis failed: {0}")]
    Lexical(#[from] LexicalError),

    #[error("Biomedical annotation failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("Failed to write output: {0}")]
    Output(#[from] OutputError),

    #[error("Failed to read corpus {}: {source}", path.display())]
    Corpus {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
