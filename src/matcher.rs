//! POS sequence matching
//!
//! Slides a window as wide as the query across the corpus one position at a
//! time. A window matches when the tag at every offset equals the query tag
//! at that offset. Overlapping windows are evaluated independently, so a
//! token may appear in several matches.

use std::fmt;

use crate::corpus::{Corpus, CorpusToken};
use crate::query::Query;
use crate::tagset::Tag;

/// Random access to a sequence of tagged words
pub trait TokenSource {
    fn token_count(&self) -> usize;

    /// Tag at `index`, or None if the token's tag is outside the tagset
    fn tag_at(&self, index: usize) -> Option<Tag>;

    fn word_at(&self, index: usize) -> &str;
}

impl TokenSource for Corpus {
    fn token_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn tag_at(&self, index: usize) -> Option<Tag> {
        Corpus::tag_at(self, index)
    }

    #[inline]
    fn word_at(&self, index: usize) -> &str {
        Corpus::word_at(self, index)
    }
}

impl TokenSource for [CorpusToken] {
    fn token_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn tag_at(&self, index: usize) -> Option<Tag> {
        self[index].tag
    }

    #[inline]
    fn word_at(&self, index: usize) -> &str {
        &self[index].word
    }
}

/// The words of one matching window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a> {
    /// Corpus offset of the first word
    pub start: usize,
    pub words: Vec<&'a str>,
}

impl Match<'_> {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl fmt::Display for Match<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(word)?;
        }
        Ok(())
    }
}

/// All matches for a query, in corpus order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet<'a> {
    matches: Vec<Match<'a>>,
}

impl<'a> MatchSet<'a> {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn as_slice(&self) -> &[Match<'a>] {
        &self.matches
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match<'a>> {
        self.matches.iter()
    }

    /// Each match rendered as space-separated words
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.matches.iter().map(|m| m.to_string())
    }
}

impl<'a> FromIterator<Match<'a>> for MatchSet<'a> {
    fn from_iter<I: IntoIterator<Item = Match<'a>>>(iter: I) -> Self {
        Self {
            matches: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for MatchSet<'a> {
    type Item = Match<'a>;
    type IntoIter = std::vec::IntoIter<Match<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl<'s, 'a> IntoIterator for &'s MatchSet<'a> {
    type Item = &'s Match<'a>;
    type IntoIter = std::slice::Iter<'s, Match<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Lazy iterator over the matches of a query
pub struct Matches<'q, 'a, S: TokenSource + ?Sized> {
    source: &'a S,
    tags: &'q [Tag],
    next_start: usize,
}

impl<'q, 'a, S: TokenSource + ?Sized> Iterator for Matches<'q, 'a, S> {
    type Item = Match<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source;
        let width = self.tags.len();
        // Last window starts at token_count - width
        while self.next_start + width <= source.token_count() {
            let start = self.next_start;
            self.next_start += 1;

            if window_matches(source, start, self.tags) {
                let words = (start..start + width)
                    .map(|i| source.word_at(i))
                    .collect();
                return Some(Match { start, words });
            }
        }
        None
    }
}

#[inline]
fn window_matches<S: TokenSource + ?Sized>(source: &S, start: usize, tags: &[Tag]) -> bool {
    tags.iter()
        .enumerate()
        .all(|(offset, &tag)| source.tag_at(start + offset) == Some(tag))
}

/// Iterate over the matches of `query` in `source` without collecting them
pub fn matches<'q, 'a, S: TokenSource + ?Sized>(
    query: &'q Query,
    source: &'a S,
) -> Matches<'q, 'a, S> {
    Matches {
        source,
        tags: query.tags(),
        next_start: 0,
    }
}

/// Find every window of `source` whose tags equal `query`
pub fn find_matches<'a, S: TokenSource + ?Sized>(query: &Query, source: &'a S) -> MatchSet<'a> {
    let found: MatchSet<'a> = matches(query, source).collect();
    tracing::debug!(query = %query, matches = found.len(), "Search complete");
    found
}

/// [`find_matches`] over a plain slice of tokens
pub fn find_matches_in<'a>(query: &Query, tokens: &'a [CorpusToken]) -> MatchSet<'a> {
    find_matches(query, tokens)
}
