//! Corpus driver.
//!
//! Walks a sentence list in order, skipping indices the output strategy has
//! already written. Separated from UI concerns - emits events for progress
//! tracking.

use std::fs;
use std::path::Path;

use tokio::sync::mpsc;
use tracing::info;

use crate::output::OutputStrategy;

use super::{Aggregator, PipelineError};

/// Events emitted while driving a corpus.
#[derive(Debug, Clone)]
pub enum CorpusEvent {
    /// Run started over `total` sentences
    Started { total: usize },
    /// Sentence already written by a previous run
    Skipped { index: usize },
    /// Sentence is being annotated
    Annotating { index: usize, text: String },
    /// Sentence annotated and written
    Written {
        index: usize,
        tokens: usize,
        enriched: usize,
        spans: usize,
    },
    /// Run finished
    Complete { written: usize, skipped: usize },
}

/// Result of a corpus run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusSummary {
    pub written: usize,
    pub skipped: usize,
    pub total: usize,
}

/// Read a newline-delimited corpus. Lines are trimmed; empty lines are kept
/// so indices line up with line numbers.
pub fn load_corpus(path: &Path) -> Result<Vec<String>, PipelineError> {
    let content = fs::read_to_string(path).map_err(|source| PipelineError::Corpus {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_corpus(&content))
}

pub fn parse_corpus(content: &str) -> Vec<String> {
    content.lines().map(|line| line.trim().to_string()).collect()
}

/// Drives sentences through an `Aggregator` into an `OutputStrategy`.
pub struct CorpusDriver<'a> {
    aggregator: Aggregator<'a>,
    output: &'a dyn OutputStrategy,
}

impl<'a> CorpusDriver<'a> {
    pub fn new(aggregator: Aggregator<'a>, output: &'a dyn OutputStrategy) -> Self {
        Self { aggregator, output }
    }

    /// Process `sentences` in order. `limit` caps how many are considered
    /// (0 = all). The first aggregate or write error aborts the run.
    pub async fn run(
        &self,
        sentences: &[String],
        limit: usize,
        event_tx: mpsc::Sender<CorpusEvent>,
    ) -> Result<CorpusSummary, PipelineError> {
        let total = if limit > 0 {
            limit.min(sentences.len())
        } else {
            sentences.len()
        };

        let _ = event_tx.send(CorpusEvent::Started { total }).await;

        let mut summary = CorpusSummary {
            total,
            ..Default::default()
        };

        for (index, text) in sentences.iter().enumerate().take(total) {
            if self.output.is_written(index) {
                let _ = event_tx.send(CorpusEvent::Skipped { index }).await;
                summary.skipped += 1;
                continue;
            }

            let _ = event_tx
                .send(CorpusEvent::Annotating {
                    index,
                    text: text.clone(),
                })
                .await;

            let sentence = self.aggregator.aggregate(text).await?;
            self.output.write(index, &sentence)?;

            let _ = event_tx
                .send(CorpusEvent::Written {
                    index,
                    tokens: sentence.tokens.len(),
                    enriched: sentence.enriched_count(),
                    spans: sentence.biomedical.len(),
                })
                .await;
            summary.written += 1;
        }

        info!(
            "Corpus run via {}: {} written, {} skipped of {}",
            self.output.name(),
            summary.written,
            summary.skipped,
            summary.total
        );

        let _ = event_tx
            .send(CorpusEvent::Complete {
                written: summary.written,
                skipped: summary.skipped,
            })
            .await;

        Ok(summary)
    }
}
