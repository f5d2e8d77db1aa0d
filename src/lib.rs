//! posseq: find word sequences matching a part-of-speech pattern
//!
//! Validates a sequence of POS tags typed by the user and scans a pre-tagged
//! corpus for every contiguous run of words carrying exactly those tags.

pub mod conllu; // CoNLL-U FORM/UPOS extraction
pub mod corpus; // Interned, read-only token sequence
pub mod matcher; // Sliding-window tag matching
pub mod query; // Query validation (pest grammar)
pub mod report; // Summaries, tag table, saving results
pub mod session; // Interactive state machine and action dispatch
pub mod tagged; // word/TAG text extraction
pub mod tagset; // The 16-tag vocabulary

// Re-exports for convenience
pub use corpus::{Corpus, CorpusError, CorpusFormat, CorpusToken};
pub use matcher::{Match, MatchSet, find_matches, find_matches_in, matches};
pub use query::{Query, QueryError, validate};
pub use report::{SaveError, describe, describe_in, save_matches};
pub use session::{Action, Outcome, Session, SessionState};
pub use tagset::Tag;
