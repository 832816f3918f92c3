//! Row projections shared by the console and tabular outputs.
//!
//! Both formats render through these functions so their rows stay in the
//! same order with the same values.

use crate::models::AnnotatedSentence;

pub const TOKEN_HEADER: [&str; 9] = [
    "TEXT", "LEMMA", "POS", "TAG", "DEP", "SHAPE", "ALPHA", "STOP", "ID",
];

pub const ENTITY_HEADER: [&str; 4] = ["TEXT", "START_CH", "END_CH", "LABEL"];

pub const BIOMEDICAL_HEADER: [&str; 5] = ["TEXT", "IDS", "CATEGORY", "START", "END"];

/// Token rows, skipping bare-newline tokens.
pub fn token_rows(sentence: &AnnotatedSentence) -> Vec<[String; 9]> {
    sentence
        .tokens
        .iter()
        .filter(|t| !t.is_newline())
        .map(|t| {
            [
                t.text.clone(),
                t.lemma.clone(),
                t.pos.clone(),
                t.tag.clone(),
                t.dep.clone(),
                t.shape.clone(),
                t.is_alpha.to_string(),
                t.is_stop.to_string(),
                t.best_identifier().unwrap_or("").to_string(),
            ]
        })
        .collect()
}

pub fn entity_rows(sentence: &AnnotatedSentence) -> Vec<[String; 4]> {
    sentence
        .entities
        .iter()
        .map(|e| {
            [
                e.text.clone(),
                e.start_char.to_string(),
                e.end_char.to_string(),
                e.label.clone(),
            ]
        })
        .collect()
}

/// One row per span, from its first candidate. Missing candidates or
/// categories render blank.
pub fn biomedical_rows(sentence: &AnnotatedSentence) -> Vec<[String; 5]> {
    sentence
        .biomedical
        .iter()
        .map(|span| {
            [
                span.text.clone(),
                span.primary_id().to_string(),
                span.primary_category().to_string(),
                span.start.to_string(),
                span.end.to_string(),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BiomedicalSpan, ConceptCandidate, SemanticLookupResult, Token};

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

    #[test]
    fn test_token_rows_skip_newlines_and_blank_missing_ids() {
        let found = SemanticLookupResult::from_response(
            serde_json::from_str(r#"{"HP:0002315": {}}"#).unwrap(),
        );
        let sentence = AnnotatedSentence {
            text: "headache\npain".to_string(),
            tokens: vec![
                token("headache", Some(found)),
                token("\n", None),
                token("pain", Some(SemanticLookupResult::empty())),
            ],
            entities: vec![],
            biomedical: vec![],
        };

        let rows = token_rows(&sentence);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][8], "HP:0002315");
        assert_eq!(rows[0][6], "true");
        assert_eq!(rows[1][0], "pain");
        assert_eq!(rows[1][8], "");
    }

    #[test]
    fn test_biomedical_rows_use_first_candidate() {
        let sentence = AnnotatedSentence {
            text: "headache".to_string(),
            tokens: vec![],
            entities: vec![],
            biomedical: vec![BiomedicalSpan::new(
                "headache",
                0,
                8,
                vec![
                    ConceptCandidate::new("HP:0002315", vec![]),
                    ConceptCandidate::new("MONDO:0005267", vec!["disease".to_string()]),
                ],
            )],
        };

        let rows = biomedical_rows(&sentence);
        assert_eq!(
            rows,
            vec![[
                "headache".to_string(),
                "HP:0002315".to_string(),
                String::new(),
                "0".to_string(),
                "8".to_string(),
            ]]
        );
    }
}
