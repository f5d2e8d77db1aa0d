//! `word/TAG` tagged text
//!
//! Whitespace-separated tokens where the tag follows the last slash, as in
//! `The/DET big/ADJ dog/NOUN ./.`. Line breaks carry no meaning.

use bstr::ByteSlice;
use memchr::memrchr;

use crate::corpus::{CorpusError, RawToken};

/// Iterator over the tokens of tagged text
pub struct TaggedTokens<'a> {
    lines: bstr::Lines<'a>,
    fields: Option<bstr::Fields<'a>>,
    line_num: usize,
}

impl<'a> TaggedTokens<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self {
            lines: text.lines(),
            fields: None,
            line_num: 0,
        }
    }
}

impl<'a> Iterator for TaggedTokens<'a> {
    type Item = Result<RawToken<'a>, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(field) = self.fields.as_mut().and_then(|fields| fields.next()) {
                return Some(split_token(field, self.line_num));
            }
            let line = self.lines.next()?;
            self.line_num += 1;
            self.fields = Some(line.fields());
        }
    }
}

fn split_token(token: &[u8], line_num: usize) -> Result<RawToken<'_>, CorpusError> {
    let Some(slash) = memrchr(b'/', token) else {
        return Err(CorpusError::parse(
            line_num,
            format!("Token without a tag: {}", token.as_bstr()),
        ));
    };

    let (word, tag) = (&token[..slash], &token[slash + 1..]);
    if word.is_empty() || tag.is_empty() {
        return Err(CorpusError::parse(
            line_num,
            format!("Malformed token: {}", token.as_bstr()),
        ));
    }

    let word = word
        .to_str()
        .map_err(|e| CorpusError::parse(line_num, format!("Invalid UTF-8: {}", e)))?;
    let tag = tag
        .to_str()
        .map_err(|e| CorpusError::parse(line_num, format!("Invalid UTF-8: {}", e)))?;

    Ok(RawToken {
        line: line_num,
        word,
        tag,
    })
}
