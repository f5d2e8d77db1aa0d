//! CoNLL-U token extraction
//!
//! Reads the FORM and UPOS columns of every word line. Comments, blank
//! lines, multiword token ranges and empty nodes are skipped; sentence
//! boundaries are not reported since the corpus is one flat sequence.
//!
//! CoNLL-U format: https://universaldependencies.org/format.html

use atoi::FromRadix10Checked;
use bstr::ByteSlice;
use memchr::memchr2;

use crate::corpus::{CorpusError, RawToken};

/// Iterator over the word tokens of CoNLL-U text
pub struct ConlluTokens<'a> {
    lines: bstr::Lines<'a>,
    line_num: usize,
}

impl<'a> ConlluTokens<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self {
            lines: text.lines(),
            line_num: 0,
        }
    }
}

impl<'a> Iterator for ConlluTokens<'a> {
    type Item = Result<RawToken<'a>, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_num += 1;

            let line = line.trim();
            if line.is_empty() || line.starts_with(b"#") {
                continue;
            }

            match parse_line(line, self.line_num) {
                Ok(Some(token)) => return Some(Ok(token)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Parse one word line into its FORM and UPOS
///
/// Returns None for multiword tokens (`1-2`) and empty nodes (`1.1`).
fn parse_line(line: &[u8], line_num: usize) -> Result<Option<RawToken<'_>>, CorpusError> {
    let mut fields = line.split_str("\t");
    let (Some(id), Some(form), Some(_lemma), Some(upos)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(CorpusError::parse(
            line_num,
            "Expected at least 4 tab-separated fields",
        ));
    };

    if memchr2(b'-', b'.', id).is_some() {
        return Ok(None);
    }

    let (value, used) = usize::from_radix_10_checked(id);
    if value.is_none() || used == 0 || used != id.len() {
        return Err(CorpusError::parse(
            line_num,
            format!("Invalid ID: {}", id.as_bstr()),
        ));
    }

    let word = form
        .to_str()
        .map_err(|e| CorpusError::parse(line_num, format!("Invalid UTF-8 in FORM: {}", e)))?;
    let tag = upos
        .to_str()
        .map_err(|e| CorpusError::parse(line_num, format!("Invalid UTF-8 in UPOS: {}", e)))?;

    Ok(Some(RawToken {
        line: line_num,
        word,
        tag,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<(String, String)> {
        ConlluTokens::new(text.as_bytes())
            .map(|t| {
                let t = t.unwrap();
                (t.word.to_string(), t.tag.to_string())
            })
            .collect()
    }

    #[test]
    fn test_parse_simple_sentence() {
        let conllu = "# text = The dog runs.
1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_
2\tdog\tdog\tNOUN\tNN\t_\t3\tnsubj\t_\t_
3\truns\trun\tVERB\tVBZ\t_\t0\troot\t_\tSpaceAfter=No
4\t.\t.\tPUNCT\t.\t_\t3\tpunct\t_\t_

";
        let tokens = collect(conllu);
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], ("The".to_string(), "DET".to_string()));
        assert_eq!(tokens[3], (".".to_string(), "PUNCT".to_string()));
    }

    #[test]
    fn test_sentences_are_flattened() {
        let conllu = "1\tCats\tcat\tNOUN\tNNS\t_\t2\tnsubj\t_\t_
2\tsleep\tsleep\tVERB\tVBP\t_\t0\troot\t_\t_

# sent_id = 2
1\tDogs\tdog\tNOUN\tNNS\t_\t2\tnsubj\t_\t_
2\tbark\tbark\tVERB\tVBP\t_\t0\troot\t_\t_
";
        let words: Vec<_> = collect(conllu).into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["Cats", "sleep", "Dogs", "bark"]);
    }

    #[test]
    fn test_skips_ranges_and_empty_nodes() {
        let conllu = "1-2\tdel\t_\t_\t_\t_\t_\t_\t_\t_
1\tde\tde\tADP\t_\t_\t3\tcase\t_\t_
2\tel\tel\tDET\t_\t_\t3\tdet\t_\t_
2.1\tvoy\tir\tVERB\t_\t_\t_\t_\t0:root\t_
3\tmar\tmar\tNOUN\t_\t_\t0\troot\t_\t_
";
        let tags: Vec<_> = collect(conllu).into_iter().map(|(_, t)| t).collect();
        assert_eq!(tags, vec!["ADP", "DET", "NOUN"]);
    }

    #[test]
    fn test_short_line_is_error() {
        let conllu = "1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_\n2\tdog\n";
        let results: Vec<_> = ConlluTokens::new(conllu.as_bytes()).collect();
        assert!(results[0].is_ok());
        match &results[1] {
            Err(CorpusError::Parse { line, .. }) => assert_eq!(*line, 2),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_id_is_error() {
        let conllu = "x1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_\n";
        let result = ConlluTokens::new(conllu.as_bytes()).next().unwrap();
        assert!(matches!(result, Err(CorpusError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_crlf_line_endings() {
        let conllu = "1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_\r\n2\tdog\tdog\tNOUN\tNN\t_\t0\troot\t_\t_\r\n";
        let tokens = collect(conllu);
        assert_eq!(tokens[1], ("dog".to_string(), "NOUN".to_string()));
    }
}
