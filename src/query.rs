//! Query validation
//!
//! Turns free text such as `"adj  noun NOUN"` into a validated sequence of
//! tags using a pest grammar for tokenising.

use pest::Parser;
use pest_derive::Parser;
use std::fmt;
use thiserror::Error;

use crate::tagset::Tag;

#[derive(Parser)]
#[grammar = "query.pest"]
struct QueryParser;

/// Smallest number of tags a query may hold
pub const MIN_QUERY_LEN: usize = 2;

/// Why an input string is not a valid query
#[derive(Debug, Error)]
pub enum QueryError {
    /// The grammar accepts any text, so this only carries pest's error type
    /// through `?`
    #[error("Query error: {0}")]
    Syntax(#[from] pest::error::Error<Rule>),

    #[error("Query error: expected at least {} tags, found {found}", MIN_QUERY_LEN)]
    TooShort { found: usize },

    #[error("Query error: unknown POS tag: {0}")]
    UnknownTag(String),
}

/// An ordered sequence of two or more tags
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    tags: Vec<Tag>,
}

impl Query {
    /// Parse free text into a query
    ///
    /// Input is uppercased and split on runs of whitespace. Every token must
    /// be a tag code and there must be at least two of them.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let normalized = input.to_uppercase();
        let mut pairs = QueryParser::parse(Rule::query, &normalized)?;

        let tokens: Vec<&str> = match pairs.next() {
            Some(query_pair) => query_pair
                .into_inner()
                .filter(|pair| pair.as_rule() == Rule::token)
                .map(|pair| pair.as_str())
                .collect(),
            None => Vec::new(),
        };

        if tokens.len() < MIN_QUERY_LEN {
            return Err(QueryError::TooShort {
                found: tokens.len(),
            });
        }

        let tags = tokens
            .into_iter()
            .map(|token| {
                Tag::from_code(token).ok_or_else(|| QueryError::UnknownTag(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_tags(tags)
    }

    /// Build a query from tags directly
    pub fn from_tags(tags: Vec<Tag>) -> Result<Self, QueryError> {
        if tags.len() < MIN_QUERY_LEN {
            return Err(QueryError::TooShort { found: tags.len() });
        }
        Ok(Self { tags })
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// A validated query is never empty
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Append one tag to the end of the sequence
    pub fn push(&mut self, tag: Tag) {
        self.tags.push(tag);
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tag in &self.tags {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(tag.code())?;
            first = false;
        }
        Ok(())
    }
}

/// Validate free text, returning `None` for anything that is not a query
pub fn validate(input: &str) -> Option<Query> {
    Query::parse(input).ok()
}
