//! Data models for annotated questions.

mod biomedical;
mod lookup;
mod sentence;

pub use biomedical::{BiomedicalParseResult, BiomedicalSpan, ConceptCandidate};
pub use lookup::SemanticLookupResult;
pub use sentence::{AnnotatedSentence, EntitySpan, Token};
