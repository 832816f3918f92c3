//! One YAML document per sentence.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{AnnotatedSentence, BiomedicalSpan, EntitySpan, Token};

use super::atomic::write_atomic;
use super::{OutputError, OutputStrategy};

#[derive(Serialize)]
struct RecordRef<'a> {
    question: &'a str,
    tokens: &'a [Token],
    ent: &'a [EntitySpan],
    bio_api: &'a [BiomedicalSpan],
}

#[derive(Deserialize)]
struct Record {
    question: String,
    #[serde(default)]
    tokens: Vec<Token>,
    #[serde(default)]
    ent: Vec<EntitySpan>,
    #[serde(default)]
    bio_api: Vec<BiomedicalSpan>,
}

/// Writes `{index}.yaml` with keys `question`, `tokens`, `ent`, `bio_api`.
#[derive(Debug, Clone)]
pub struct StructuredOutput {
    dir: PathBuf,
}

impl StructuredOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn record_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.yaml", index))
    }
}

impl OutputStrategy for StructuredOutput {
    fn name(&self) -> &str {
        "yaml"
    }

    fn is_written(&self, index: usize) -> bool {
        self.record_path(index).exists()
    }

    fn write(&self, index: usize, sentence: &AnnotatedSentence) -> Result<(), OutputError> {
        info!(">> {} ... writing yaml", sentence.text);
        fs::create_dir_all(&self.dir)?;

        let record = RecordRef {
            question: &sentence.text,
            tokens: &sentence.tokens,
            ent: &sentence.entities,
            bio_api: &sentence.biomedical,
        };
        write_atomic(&self.record_path(index), |file: &mut File| {
            serde_yaml::to_writer(file, &record)?;
            Ok(())
        })
    }
}

/// Read a structured record back into an `AnnotatedSentence`.
pub fn read_record(path: &Path) -> Result<AnnotatedSentence, OutputError> {
    let file = File::open(path)?;
    let record: Record = serde_yaml::from_reader(file)?;
    Ok(AnnotatedSentence {
        text: record.question,
        tokens: record.tokens,
        entities: record.ent,
        biomedical: record.bio_api,
    })
}
