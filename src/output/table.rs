//! Comma-delimited tables, one set of files per sentence.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::info;

use crate::models::AnnotatedSentence;

use super::atomic::write_atomic;
use super::rows::{
    biomedical_rows, entity_rows, token_rows, BIOMEDICAL_HEADER, ENTITY_HEADER, TOKEN_HEADER,
};
use super::{OutputError, OutputStrategy};

/// Writes `{index}-lexical-sri.csv`, `{index}-lexical-entity.csv` and
/// `{index}-biolink-api-entity.csv` into the output directory.
///
/// The token file is written last and is the marker `is_written` checks.
/// Fields are never quoted, so a value containing a comma shifts the columns
/// of its row.
#[derive(Debug, Clone)]
pub struct TableOutput {
    dir: PathBuf,
}

impl TableOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn token_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}-lexical-sri.csv", index))
    }

    pub fn entity_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}-lexical-entity.csv", index))
    }

    pub fn biomedical_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}-biolink-api-entity.csv", index))
    }
}

impl OutputStrategy for TableOutput {
    fn name(&self) -> &str {
        "table"
    }

    fn is_written(&self, index: usize) -> bool {
        self.token_path(index).exists()
    }

    fn write(&self, index: usize, sentence: &AnnotatedSentence) -> Result<(), OutputError> {
        info!(">> {} ... writing tables", sentence.text);
        fs::create_dir_all(&self.dir)?;

        if !sentence.entities.is_empty() {
            write_csv(
                &self.entity_path(index),
                &ENTITY_HEADER,
                &entity_rows(sentence),
            )?;
        }
        write_csv(
            &self.biomedical_path(index),
            &BIOMEDICAL_HEADER,
            &biomedical_rows(sentence),
        )?;
        write_csv(&self.token_path(index), &TOKEN_HEADER, &token_rows(sentence))?;
        Ok(())
    }
}

fn write_csv<const N: usize>(
    path: &Path,
    header: &[&str; N],
    rows: &[[String; N]],
) -> Result<(), OutputError> {
    write_atomic(path, |file: &mut File| {
        let mut wtr = WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);
        wtr.write_record(header)?;
        for row in rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BiomedicalSpan, ConceptCandidate, EntitySpan, SemanticLookupResult, Token};
    use tempfile::tempdir;

    fn token(text: &str, lookup: Option<SemanticLookupResult>) -> Token {
        Token {
            text: text.to_string(),
            lemma: text.to_lowercase(),
            pos: "NOUN".to_string(),
            tag: "NN".to_string(),
            dep: "dep".to_string(),
            shape: "xxxx".to_string(),
            is_alpha: true,
            is_stop: false,
            lookup,
        }
    }

    fn sentence(entities: Vec<EntitySpan>) -> AnnotatedSentence {
        let found = SemanticLookupResult::from_response(
            serde_json::from_str(r#"{"HP:0002315": {}}"#).unwrap(),
        );
        AnnotatedSentence {
            text: "headache".to_string(),
            tokens: vec![token("headache", Some(found)), token("\n", None)],
            entities,
            biomedical: vec![BiomedicalSpan::new(
                "headache",
                0,
                8,
                vec![ConceptCandidate::new("HP:0002315", vec![])],
            )],
        }
    }

    #[test]
    fn test_writes_token_and_biomedical_tables() {
        let dir = tempdir().unwrap();
        let output = TableOutput::new(dir.path());
        assert!(!output.is_written(0));

        output.write(0, &sentence(vec![])).unwrap();

        assert!(output.is_written(0));
        assert!(!output.entity_path(0).exists());

        let tokens = fs::read_to_string(output.token_path(0)).unwrap();
        assert_eq!(
            tokens,
            "TEXT,LEMMA,POS,TAG,DEP,SHAPE,ALPHA,STOP,ID\n\
             headache,headache,NOUN,NN,dep,xxxx,true,false,HP:0002315\n"
        );

        let bio = fs::read_to_string(output.biomedical_path(0)).unwrap();
        assert_eq!(bio, "TEXT,IDS,CATEGORY,START,END\nheadache,HP:0002315,,0,8\n");
    }

    #[test]
    fn test_entity_table_written_when_present() {
        let dir = tempdir().unwrap();
        let output = TableOutput::new(dir.path().join("nested"));

        output
            .write(
                3,
                &sentence(vec![EntitySpan {
                    text: "Headache".to_string(),
                    start_char: 0,
                    end_char: 8,
                    label: "MISC".to_string(),
                }]),
            )
            .unwrap();

        let entities = fs::read_to_string(output.entity_path(3)).unwrap();
        assert_eq!(entities, "TEXT,START_CH,END_CH,LABEL\nHeadache,0,8,MISC\n");
    }

    #[test]
    fn test_empty_biomedical_table_has_header_only() {
        let dir = tempdir().unwrap();
        let output = TableOutput::new(dir.path());
        let mut s = sentence(vec![]);
        s.biomedical.clear();

        output.write(1, &s).unwrap();

        let bio = fs::read_to_string(output.biomedical_path(1)).unwrap();
        assert_eq!(bio, "TEXT,IDS,CATEGORY,START,END\n");
    }

    #[test]
    fn test_commas_are_not_escaped() {
        let dir = tempdir().unwrap();
        let output = TableOutput::new(dir.path());
        let mut s = sentence(vec![]);
        s.biomedical = vec![BiomedicalSpan::new("a, b", 0, 4, vec![])];

        output.write(0, &s).unwrap();

        let bio = fs::read_to_string(output.biomedical_path(0)).unwrap();
        assert!(bio.ends_with("a, b,,,0,4\n"));
    }
}
