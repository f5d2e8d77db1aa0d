//! The closed POS tagset
//!
//! Sixteen universal-style part-of-speech codes with their descriptions.
//! Queries are validated against this set and the interactive tag table is
//! rendered from it.

use std::fmt;
use std::str::FromStr;

/// A part-of-speech tag from the fixed tagset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Adj,
    Adv,
    Conj,
    Det,
    X,
    Noun,
    Propn,
    Num,
    Pron,
    Adp,
    Aux,
    Intj,
    Verb,
    Part,
    Sconj,
    Sym,
}

impl Tag {
    /// Every tag, in tag-table order
    pub const ALL: [Tag; 16] = [
        Tag::Adj,
        Tag::Adv,
        Tag::Conj,
        Tag::Det,
        Tag::X,
        Tag::Noun,
        Tag::Propn,
        Tag::Num,
        Tag::Pron,
        Tag::Adp,
        Tag::Aux,
        Tag::Intj,
        Tag::Verb,
        Tag::Part,
        Tag::Sconj,
        Tag::Sym,
    ];

    /// The short code, e.g. `"NOUN"`
    pub fn code(self) -> &'static str {
        match self {
            Tag::Adj => "ADJ",
            Tag::Adv => "ADV",
            Tag::Conj => "CONJ",
            Tag::Det => "DET",
            Tag::X => "X",
            Tag::Noun => "NOUN",
            Tag::Propn => "PROPN",
            Tag::Num => "NUM",
            Tag::Pron => "PRON",
            Tag::Adp => "ADP",
            Tag::Aux => "AUX",
            Tag::Intj => "INTJ",
            Tag::Verb => "VERB",
            Tag::Part => "PART",
            Tag::Sconj => "SCONJ",
            Tag::Sym => "SYM",
        }
    }

    /// Human-readable description shown in the tag table
    pub fn description(self) -> &'static str {
        match self {
            Tag::Adj => "adjective",
            Tag::Adv => "adverb",
            Tag::Conj => "conjunction",
            Tag::Det => "determiner",
            Tag::X => "other, foreign words",
            Tag::Noun => "noun",
            Tag::Propn => "proper noun",
            Tag::Num => "numeral",
            Tag::Pron => "pronoun",
            Tag::Adp => "adposition (preposition)",
            Tag::Aux => "auxiliary verb",
            Tag::Intj => "interjection",
            Tag::Verb => "verb",
            Tag::Part => "particle",
            Tag::Sconj => "subordinating conjunction",
            Tag::Sym => "symbol",
        }
    }

    /// Look up an exact (uppercase) code
    pub fn from_code(code: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.code() == code)
    }

    /// Map a tag label found in a corpus file onto the tagset
    ///
    /// Accepts the codes themselves plus the labels other tagging schemes
    /// use for the same classes: `CCONJ` (UD v2) and `PRT` (NLTK universal).
    pub fn from_corpus_label(label: &str) -> Option<Tag> {
        match label {
            "CCONJ" => Some(Tag::Conj),
            "PRT" => Some(Tag::Part),
            _ => Tag::from_code(label),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for a string that is not a tag code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown POS tag: {0}")]
pub struct UnknownTag(pub String);

impl FromStr for Tag {
    type Err = UnknownTag;

    /// Case-insensitive parse of a tag code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::from_code(&s.to_uppercase()).ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// (code, description) pairs in tag-table order
pub fn vocabulary() -> impl Iterator<Item = (&'static str, &'static str)> {
    Tag::ALL.into_iter().map(|tag| (tag.code(), tag.description()))
}
