//! biolex - linguistic and biomedical annotation of natural-language questions.
//!
//! Each sentence of a corpus is tokenized and tagged, its nouns are resolved
//! to candidate identifiers, and the whole sentence is annotated with
//! biomedical concept spans. Results go to the console, to comma-delimited
//! tables, or to one YAML file per sentence.

pub mod cli;
pub mod config;
pub mod http;
pub mod lexical;
pub mod models;
pub mod output;
pub mod semantic;
pub mod services;
