//! Fixed-width tables on stdout.

use std::io::{self, Write};

use crate::models::AnnotatedSentence;

use super::rows::{
    biomedical_rows, entity_rows, token_rows, BIOMEDICAL_HEADER, ENTITY_HEADER, TOKEN_HEADER,
};
use super::{OutputError, OutputStrategy};

const TOKEN_WIDTHS: [usize; 9] = [15, 15, 5, 5, 10, 15, 5, 5, 15];
const ENTITY_WIDTHS: [usize; 4] = [40, 5, 5, 10];
const BIOMEDICAL_WIDTHS: [usize; 5] = [30, 30, 30, 5, 5];

/// Prints each sentence as a set of aligned tables. Never persists anything,
/// so every sentence is always rendered.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        Self
    }

    /// Render `sentence` into any writer.
    pub fn render<W: Write>(&self, sentence: &AnnotatedSentence, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, ">> {}", sentence.text)?;

        writeln!(out, "Lexical analysis + identifier lookup:")?;
        write_table(out, &TOKEN_WIDTHS, &TOKEN_HEADER, &token_rows(sentence))?;

        if !sentence.entities.is_empty() {
            writeln!(out, "Named entities:")?;
            write_table(out, &ENTITY_WIDTHS, &ENTITY_HEADER, &entity_rows(sentence))?;
        }

        writeln!(out, "Biomedical concepts:")?;
        write_table(
            out,
            &BIOMEDICAL_WIDTHS,
            &BIOMEDICAL_HEADER,
            &biomedical_rows(sentence),
        )?;
        Ok(())
    }
}

impl OutputStrategy for ConsoleOutput {
    fn name(&self) -> &str {
        "console"
    }

    fn is_written(&self, _index: usize) -> bool {
        false
    }

    fn write(&self, _index: usize, sentence: &AnnotatedSentence) -> Result<(), OutputError> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.render(sentence, &mut lock)?;
        lock.flush()?;
        Ok(())
    }
}

fn write_table<W: Write, const N: usize>(
    out: &mut W,
    widths: &[usize; N],
    header: &[&str; N],
    rows: &[[String; N]],
) -> io::Result<()> {
    writeln!(out, "{}", format_row(widths, header.iter().copied()))?;
    // Rule spans the columns plus the single-space separators and indent.
    let rule = widths.iter().sum::<usize>() + N + 1;
    writeln!(out, "{}", "=".repeat(rule))?;
    for row in rows {
        writeln!(out, "{}", format_row(widths, row.iter().map(String::as_str)))?;
    }
    Ok(())
}

/// Left-align each cell to its width. Longer values are not truncated.
fn format_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let cells: Vec<String> = widths
        .iter()
        .zip(cells)
        .map(|(width, cell)| format!("{:<width$}", cell, width = *width))
        .collect();
    format!("  {}", cells.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BiomedicalSpan, ConceptCandidate, EntitySpan, Token};

    fn sentence(entities: Vec<EntitySpan>) -> AnnotatedSentence {
        AnnotatedSentence {
            text: "Aspirin treats headache".to_string(),
            tokens: vec![Token {
                text: "Aspirin".to_string(),
                lemma: "aspirin".to_string(),
                pos: "NOUN".to_string(),
                tag: "NN".to_string(),
                dep: "dep".to_string(),
                shape: "Xxxxx".to_string(),
                is_alpha: true,
                is_stop: false,
                lookup: None,
            }],
            entities,
            biomedical: vec![BiomedicalSpan::new(
                "headache",
                15,
                23,
                vec![ConceptCandidate::new("HP:0002315", vec!["phenotype".to_string()])],
            )],
        }
    }

    fn render(sentence: &AnnotatedSentence) -> String {
        let mut buf = Vec::new();
        ConsoleOutput::new().render(sentence, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_token_row_is_fixed_width() {
        let text = render(&sentence(vec![]));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], ">> Aspirin treats headache");
        let header = format!(
            "  {:<15} {:<15} {:<5} {:<5} {:<10}",
            "TEXT", "LEMMA", "POS", "TAG", "DEP"
        );
        assert!(lines[3].starts_with(&header));
        assert_eq!(lines[4], "=".repeat(100));
        assert_eq!(lines[5].len(), 100);
        let row = format!(
            "  {:<15} {:<15} {:<5} {:<5} {:<10}",
            "Aspirin", "aspirin", "NOUN", "NN", "dep"
        );
        assert!(lines[5].starts_with(&row));
        assert!(lines[5].contains("true  false"));
    }

    #[test]
    fn test_entity_table_only_when_entities_exist() {
        let without = render(&sentence(vec![]));
        assert!(!without.contains("Named entities:"));

        let with = render(&sentence(vec![EntitySpan {
            text: "Aspirin".to_string(),
            start_char: 0,
            end_char: 7,
            label: "MISC".to_string(),
        }]));
        assert!(with.contains("Named entities:"));
        let row = format!("  {:<40} {:<5} {:<5} {:<10}", "Aspirin", 0, 7, "MISC");
        assert!(with.lines().any(|line| line == row));
    }

    #[test]
    fn test_biomedical_row() {
        let text = render(&sentence(vec![]));
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("  headache"));
        assert!(last.contains("HP:0002315"));
        assert!(last.contains("phenotype"));
        assert!(last.ends_with(&format!("{:<5} {:<5}", 15, 23)));
    }

    #[test]
    fn test_never_reports_written() {
        assert!(!ConsoleOutput::new().is_written(0));
    }
}
