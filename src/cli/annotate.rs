//! Corpus annotation command.

use std::path::Path;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::semantic::SemanticClient;
use crate::services::{load_corpus, Aggregator, CorpusDriver, CorpusEvent, TokenPredicate};

use super::helpers::truncate;

/// Annotate every sentence of `input` with the configured output strategy.
pub async fn cmd_annotate(settings: &Settings, input: &Path, limit: usize) -> anyhow::Result<()> {
    let sentences = load_corpus(input)?;

    let lexical = settings.lexical.build_backend(settings.request_timeout)?;
    let client = SemanticClient::new(settings.lookup.clone(), settings.request_timeout)?;
    let output = settings.format.create_strategy(&settings.output_dir);
    let predicate = TokenPredicate::from_config(&settings.lookup);

    if settings.format.is_persistent() {
        eprintln!(
            "{} Annotating {} sentences into {} ({} output, {} backend)",
            style("→").cyan(),
            sentences.len(),
            settings.output_dir.display(),
            settings.format,
            lexical.backend_id()
        );
    }

    let driver = CorpusDriver::new(
        Aggregator::new(lexical.as_ref(), &client, predicate),
        output.as_ref(),
    );

    let (event_tx, mut event_rx) = mpsc::channel::<CorpusEvent>(100);
    let show_progress = settings.format.is_persistent();

    // Spawn event handler for UI
    let event_handler = tokio::spawn(async move {
        let mut progress = ProgressBar::hidden();
        while let Some(event) = event_rx.recv().await {
            match event {
                CorpusEvent::Started { total } => {
                    if show_progress {
                        progress = ProgressBar::new(total as u64);
                        progress.set_style(
                            ProgressStyle::default_bar()
                                .template(
                                    "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}",
                                )
                                .unwrap_or_else(|_| ProgressStyle::default_bar())
                                .progress_chars("█▓░"),
                        );
                        progress.set_message("Annotating...");
                    }
                }
                CorpusEvent::Annotating { text, .. } => {
                    progress.set_message(truncate(&text, 40));
                }
                CorpusEvent::Skipped { .. } | CorpusEvent::Written { .. } => {
                    progress.inc(1);
                }
                CorpusEvent::Complete { .. } => {
                    progress.finish_and_clear();
                }
            }
        }
        progress.finish_and_clear();
    });

    let result = driver.run(&sentences, limit, event_tx).await;
    let _ = event_handler.await;

    match result {
        Ok(summary) => {
            if settings.format.is_persistent() {
                eprintln!(
                    "{} {} written, {} already present ({} considered)",
                    style("✓").green(),
                    summary.written,
                    summary.skipped,
                    summary.total
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} Annotation stopped: {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}
