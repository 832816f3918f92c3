//! Rule-based lexical backend.
//!
//! Whitespace/punctuation tokenization, closed-class tagging for function
//! words, and suffix heuristics for everything else. There is no dependency
//! parse: the first verb (or auxiliary) is `ROOT`, punctuation is `punct`,
//! everything else is `dep`. Entities are runs of proper nouns.

use std::collections::HashSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::models::{EntitySpan, Token};

use super::{LexicalAnalysis, LexicalBackend, LexicalError};

/// Label given to proper-noun runs.
const ENTITY_LABEL: &str = "MISC";

/// Longest run of one shape character before it is truncated.
const MAX_SHAPE_RUN: usize = 4;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?\d+(?:[.,]\d+)*%?$").expect("number pattern should compile")
});

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
        "each", "either", "few", "for", "from", "further", "had", "has", "have", "having", "he",
        "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into",
        "is", "it", "its", "itself", "just", "may", "me", "might", "more", "most", "must", "my",
        "myself", "n't", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
        "our", "ours", "ourselves", "out", "over", "own", "'s", "same", "shall", "she", "should",
        "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves",
        "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
        "until", "up", "us", "very", "was", "we", "were", "what", "when", "where", "whether",
        "which", "while", "who", "whom", "whose", "why", "will", "with", "within", "without",
        "would", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Coarse POS and fine tag for closed-class words.
fn closed_class(lower: &str) -> Option<(&'static str, &'static str)> {
    let tagged = match lower {
        "the" | "a" | "an" | "this" | "that" | "these" | "those" | "some" | "any" | "each"
        | "every" | "no" | "all" | "both" | "either" | "neither" => ("DET", "DT"),
        "which" => ("DET", "WDT"),
        "whose" => ("DET", "WP$"),
        "what" | "who" | "whom" => ("PRON", "WP"),
        "how" | "when" | "where" | "why" => ("ADV", "WRB"),
        "i" | "me" | "you" | "he" | "him" | "she" | "her" | "it" | "we" | "us" | "they"
        | "them" => ("PRON", "PRP"),
        "my" | "your" | "his" | "its" | "our" | "their" => ("PRON", "PRP$"),
        "is" | "does" | "has" => ("AUX", "VBZ"),
        "are" | "am" | "do" | "have" => ("AUX", "VBP"),
        "was" | "were" | "did" | "had" => ("AUX", "VBD"),
        "be" => ("AUX", "VB"),
        "been" => ("AUX", "VBN"),
        "being" => ("AUX", "VBG"),
        "can" | "could" | "will" | "would" | "shall" | "should" | "may" | "might" | "must" => {
            ("AUX", "MD")
        }
        "of" | "in" | "on" | "at" | "by" | "for" | "with" | "from" | "to" | "about" | "into"
        | "through" | "during" | "between" | "against" | "among" | "without" | "within"
        | "after" | "before" | "under" | "over" => ("ADP", "IN"),
        "and" | "or" | "but" | "nor" => ("CCONJ", "CC"),
        "if" | "because" | "while" | "although" | "whether" | "than" => ("SCONJ", "IN"),
        "not" | "n't" => ("PART", "RB"),
        "'s" => ("PART", "POS"),
        _ => return None,
    };
    Some(tagged)
}

fn punct_tag(text: &str) -> &'static str {
    match text {
        "." | "?" | "!" => ".",
        "," => ",",
        ":" | ";" | "-" | "--" => ":",
        "(" | "[" | "{" => "-LRB-",
        ")" | "]" | "}" => "-RRB-",
        "\"" | "'" => "''",
        "$" => "$",
        _ => "NFP",
    }
}

/// Orthographic shape class: `X` upper, `x` lower, `d` digit, anything else
/// kept as is, with runs longer than four characters truncated.
pub fn word_shape(text: &str) -> String {
    let mut shape = String::with_capacity(text.len());
    let mut last: Option<char> = None;
    let mut run = 0;
    for c in text.chars() {
        let class = if c.is_uppercase() {
            'X'
        } else if c.is_lowercase() {
            'x'
        } else if c.is_numeric() {
            'd'
        } else {
            c
        };
        if Some(class) == last {
            run += 1;
        } else {
            last = Some(class);
            run = 1;
        }
        if run <= MAX_SHAPE_RUN {
            shape.push(class);
        }
    }
    shape
}

fn is_plural_form(lower: &str) -> bool {
    lower.len() > 3
        && lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
}

fn strip_plural(lower: &str) -> String {
    if let Some(stem) = lower.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    for suffix in ["sses", "shes", "xes"] {
        if let Some(stem) = lower.strip_suffix(suffix) {
            return format!("{}{}", stem, &suffix[..suffix.len() - 2]);
        }
    }
    lower.strip_suffix('s').unwrap_or(lower).to_string()
}

fn lemmatize(lower: &str, tag: &str) -> String {
    match lower {
        "is" | "are" | "was" | "were" | "am" | "been" | "being" => return "be".to_string(),
        "does" | "did" => return "do".to_string(),
        "has" | "had" => return "have".to_string(),
        "n't" => return "not".to_string(),
        _ => {}
    }
    match tag {
        "NNS" | "VBZ" => strip_plural(lower),
        _ => lower.to_string(),
    }
}

/// A token's text and character offset before tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece<'a> {
    text: &'a str,
    start_char: usize,
}

impl Piece<'_> {
    fn end_char(&self) -> usize {
        self.start_char + self.text.chars().count()
    }
}

/// Split text into pieces with character offsets.
fn tokenize(text: &str) -> Vec<Piece<'_>> {
    // (byte start, byte end, char start) of each whitespace-delimited chunk
    let mut chunks = Vec::new();
    let mut chunk_start: Option<(usize, usize)> = None;

    for (char_pos, (byte, c)) in text.char_indices().enumerate() {
        if c.is_whitespace() {
            if let Some((byte_start, char_start)) = chunk_start.take() {
                chunks.push((byte_start, byte, char_start));
            }
        } else if chunk_start.is_none() {
            chunk_start = Some((byte, char_pos));
        }
    }
    if let Some((byte_start, char_start)) = chunk_start {
        chunks.push((byte_start, text.len(), char_start));
    }

    let mut pieces = Vec::new();
    for (byte_start, byte_end, char_start) in chunks {
        split_chunk(&text[byte_start..byte_end], char_start, &mut pieces);
    }
    pieces
}

/// Split one whitespace-delimited chunk into leading punctuation, the core
/// word (with clitics split off), and trailing punctuation.
fn split_chunk<'a>(chunk: &'a str, char_start: usize, pieces: &mut Vec<Piece<'a>>) {
    if !chunk.chars().any(char::is_alphanumeric) {
        pieces.push(Piece {
            text: chunk,
            start_char: char_start,
        });
        return;
    }

    let mut char_pos = char_start;
    let mut rest = chunk;

    while let Some(c) = rest.chars().next() {
        if c.is_alphanumeric() {
            break;
        }
        let len = c.len_utf8();
        pieces.push(Piece {
            text: &rest[..len],
            start_char: char_pos,
        });
        rest = &rest[len..];
        char_pos += 1;
    }

    let mut trailing = Vec::new();
    while let Some(c) = rest.chars().next_back() {
        if c.is_alphanumeric() {
            break;
        }
        let split = rest.len() - c.len_utf8();
        trailing.push(&rest[split..]);
        rest = &rest[..split];
    }

    let lower = rest.to_lowercase();
    let clitic_len = if lower.len() > 3 && lower.ends_with("n't") {
        3
    } else if lower.len() > 2 && (lower.ends_with("'s") || lower.ends_with("’s")) {
        rest.chars().rev().take(2).map(char::len_utf8).sum()
    } else {
        0
    };

    if clitic_len > 0 {
        let split = rest.len() - clitic_len;
        let (word, clitic) = rest.split_at(split);
        pieces.push(Piece {
            text: word,
            start_char: char_pos,
        });
        char_pos += word.chars().count();
        pieces.push(Piece {
            text: clitic,
            start_char: char_pos,
        });
        char_pos += clitic.chars().count();
    } else {
        pieces.push(Piece {
            text: rest,
            start_char: char_pos,
        });
        char_pos += rest.chars().count();
    }

    for text in trailing.into_iter().rev() {
        pieces.push(Piece {
            text,
            start_char: char_pos,
        });
        char_pos += 1;
    }
}

/// Built-in lexical backend with no external model.
pub struct RuleBasedBackend;

impl RuleBasedBackend {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous analysis; the async trait method delegates here.
    pub fn analyze_text(&self, text: &str) -> LexicalAnalysis {
        let pieces = tokenize(text);
        let mut tags: Vec<(&'static str, &'static str)> = Vec::with_capacity(pieces.len());

        for (i, piece) in pieces.iter().enumerate() {
            let prev_pos = i.checked_sub(1).map(|p| tags[p].0);
            tags.push(classify(piece.text, i == 0, prev_pos));
        }

        let root = tags
            .iter()
            .position(|(pos, _)| *pos == "VERB")
            .or_else(|| tags.iter().position(|(pos, _)| *pos == "AUX"))
            .or_else(|| tags.iter().position(|(pos, _)| *pos != "PUNCT"));

        let tokens: Vec<Token> = pieces
            .iter()
            .zip(tags.iter())
            .enumerate()
            .map(|(i, (piece, (pos, tag)))| {
                let lower = piece.text.to_lowercase();
                let dep = if Some(i) == root {
                    "ROOT"
                } else if *pos == "PUNCT" {
                    "punct"
                } else {
                    "dep"
                };
                Token {
                    text: piece.text.to_string(),
                    lemma: lemmatize(&lower, tag),
                    pos: pos.to_string(),
                    tag: tag.to_string(),
                    dep: dep.to_string(),
                    shape: word_shape(piece.text),
                    is_alpha: piece.text.chars().all(char::is_alphabetic),
                    is_stop: STOP_WORDS.contains(lower.as_str()),
                    lookup: None,
                }
            })
            .collect();

        let entities = proper_noun_runs(text, &pieces, &tags);

        LexicalAnalysis { tokens, entities }
    }
}

impl Default for RuleBasedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LexicalBackend for RuleBasedBackend {
    fn backend_id(&self) -> &str {
        "rules"
    }

    async fn analyze(&self, text: &str) -> Result<LexicalAnalysis, LexicalError> {
        Ok(self.analyze_text(text))
    }
}

fn classify(
    text: &str,
    sentence_initial: bool,
    prev_pos: Option<&str>,
) -> (&'static str, &'static str) {
    if !text.chars().any(char::is_alphanumeric) {
        return ("PUNCT", punct_tag(text));
    }
    if NUMBER.is_match(text) {
        return ("NUM", "CD");
    }

    let lower = text.to_lowercase();
    if let Some(tagged) = closed_class(&lower) {
        return tagged;
    }

    let first_upper = text.chars().next().is_some_and(char::is_uppercase);
    let is_acronym =
        text.chars().count() >= 2 && text.chars().all(|c| c.is_uppercase() || c.is_numeric());
    if is_acronym || (first_upper && !sentence_initial) {
        return ("PROPN", "NNP");
    }

    let after_nominal = matches!(prev_pos, Some("NOUN" | "PROPN" | "PRON"));
    if after_nominal && is_plural_form(&lower) {
        return ("VERB", "VBZ");
    }
    if lower.len() > 4 && lower.ends_with("ly") {
        return ("ADV", "RB");
    }
    if lower.len() > 5 && lower.ends_with("ing") {
        return ("VERB", "VBG");
    }
    if prev_pos == Some("AUX") && lower.len() > 3 && lower.ends_with("ed") {
        return ("VERB", "VBN");
    }
    let adjective_suffixes = ["ous", "ive", "ic", "ful", "less", "able", "ible"];
    if lower.len() > 5 && adjective_suffixes.iter().any(|s| lower.ends_with(s)) {
        return ("ADJ", "JJ");
    }
    if is_plural_form(&lower) {
        return ("NOUN", "NNS");
    }
    ("NOUN", "NN")
}

fn proper_noun_runs(
    text: &str,
    pieces: &[Piece<'_>],
    tags: &[(&'static str, &'static str)],
) -> Vec<EntitySpan> {
    let mut entities = Vec::new();
    let mut run: Option<(usize, usize)> = None;

    let close = |entities: &mut Vec<EntitySpan>, first: usize, last: usize| {
        let start_char = pieces[first].start_char;
        let end_char = pieces[last].end_char();
        let span: String = text
            .chars()
            .skip(start_char)
            .take(end_char - start_char)
            .collect();
        entities.push(EntitySpan {
            text: span,
            start_char,
            end_char,
            label: ENTITY_LABEL.to_string(),
        });
    };

    for (i, (pos, _)) in tags.iter().enumerate() {
        if *pos == "PROPN" {
            run = Some(match run {
                Some((first, _)) => (first, i),
                None => (i, i),
            });
        } else if let Some((first, last)) = run.take() {
            close(&mut entities, first, last);
        }
    }
    if let Some((first, last)) = run {
        close(&mut entities, first, last);
    }

    entities
}
