//! The tagged corpus
//!
//! A corpus is one flat, ordered sequence of (word, tag) tokens loaded once
//! from a CoNLL-U or `word/TAG` file (optionally gzip-compressed) and never
//! modified afterwards. Words and unrecognised tag labels are interned.

use flate2::read::MultiGzDecoder;
use lasso::{Rodeo, Spur};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

use crate::conllu::ConlluTokens;
use crate::tagged::TaggedTokens;
use crate::tagset::Tag;

/// Error while loading a corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl CorpusError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        CorpusError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// A token as read from a corpus file, before interning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub line: usize,
    pub word: &'a str,
    pub tag: &'a str,
}

/// On-disk corpus layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    Conllu,
    Tagged,
}

impl CorpusFormat {
    /// Guess the format from a file name, ignoring a trailing `.gz`
    pub fn from_path(path: &Path) -> Self {
        let mut path = path.to_path_buf();
        if is_gzip(&path) {
            path.set_extension("");
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("conllu") | Some("conll") => CorpusFormat::Conllu,
            _ => CorpusFormat::Tagged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown corpus format: {0} (expected conllu or tagged)")]
pub struct UnknownFormat(pub String);

impl FromStr for CorpusFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conllu" | "conll" => Ok(CorpusFormat::Conllu),
            "tagged" | "txt" => Ok(CorpusFormat::Tagged),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Tag carried by a corpus token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenTag {
    Known(Tag),
    /// Label outside the tagset (punctuation and the like); matches nothing
    Other(Spur),
}

impl TokenTag {
    pub fn known(self) -> Option<Tag> {
        match self {
            TokenTag::Known(tag) => Some(tag),
            TokenTag::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Token {
    word: Spur,
    tag: TokenTag,
}

/// A borrowed view of one corpus token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRef<'a> {
    pub word: &'a str,
    pub tag: Option<Tag>,
    /// Tag label as it appeared in the source
    pub label: &'a str,
}

/// An owned (word, tag) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusToken {
    pub word: String,
    pub tag: Option<Tag>,
}

impl CorpusToken {
    pub fn new(word: &str, tag: Tag) -> Self {
        Self {
            word: word.to_string(),
            tag: Some(tag),
        }
    }
}

/// An immutable tagged corpus
#[derive(Debug)]
pub struct Corpus {
    name: String,
    interner: Rodeo,
    tokens: Vec<Token>,
}

impl Corpus {
    pub fn builder(name: &str) -> CorpusBuilder {
        CorpusBuilder::new(name)
    }

    /// Build a corpus from (word, tag label) pairs
    pub fn from_pairs<'a>(name: &str, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut builder = CorpusBuilder::new(name);
        for (word, label) in pairs {
            builder.push(word, label);
        }
        builder.build()
    }

    /// Parse corpus text held in memory
    pub fn parse(name: &str, text: &[u8], format: CorpusFormat) -> Result<Self, CorpusError> {
        let mut builder = CorpusBuilder::new(name);
        match format {
            CorpusFormat::Conllu => builder.extend(ConlluTokens::new(text))?,
            CorpusFormat::Tagged => builder.extend(TaggedTokens::new(text))?,
        }
        Ok(builder.build())
    }

    /// Load a corpus file
    ///
    /// The format is guessed from the extension unless given. Files ending in
    /// `.gz` are decompressed. The corpus is named after the file stem.
    pub fn from_file(path: impl AsRef<Path>, format: Option<CorpusFormat>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let format = format.unwrap_or_else(|| CorpusFormat::from_path(path));
        let started = Instant::now();

        let text = read_file(path)?;
        let corpus = Self::parse(&default_name(path), &text, format)?;

        tracing::info!(
            path = %path.display(),
            ?format,
            tokens = corpus.len(),
            elapsed = ?started.elapsed(),
            "Loaded corpus"
        );
        Ok(corpus)
    }

    /// Replace the display name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<TokenRef<'_>> {
        self.tokens.get(index).map(|token| self.view(token))
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenRef<'_>> {
        self.tokens.iter().map(|token| self.view(token))
    }

    /// Tag at `index`; None when the label is outside the tagset
    #[inline]
    pub(crate) fn tag_at(&self, index: usize) -> Option<Tag> {
        self.tokens[index].tag.known()
    }

    #[inline]
    pub(crate) fn word_at(&self, index: usize) -> &str {
        self.interner.resolve(&self.tokens[index].word)
    }

    /// Token counts per tag label, most frequent first
    pub fn tag_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: FxHashMap<TokenTag, usize> = FxHashMap::default();
        for token in &self.tokens {
            *counts.entry(token.tag).or_default() += 1;
        }

        let mut counts: Vec<_> = counts
            .into_iter()
            .map(|(tag, count)| (self.label(tag), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        counts
    }

    fn label(&self, tag: TokenTag) -> &str {
        match tag {
            TokenTag::Known(tag) => tag.code(),
            TokenTag::Other(label) => self.interner.resolve(&label),
        }
    }

    fn view(&self, token: &Token) -> TokenRef<'_> {
        TokenRef {
            word: self.interner.resolve(&token.word),
            tag: token.tag.known(),
            label: self.label(token.tag),
        }
    }
}

/// Accumulates tokens into a corpus
pub struct CorpusBuilder {
    name: String,
    interner: Rodeo,
    tokens: Vec<Token>,
    unrecognised: usize,
}

impl CorpusBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            interner: Rodeo::default(),
            tokens: Vec::new(),
            unrecognised: 0,
        }
    }

    /// Append a token with its tag label as found in the source
    pub fn push(&mut self, word: &str, label: &str) {
        let tag = match Tag::from_corpus_label(label) {
            Some(tag) => TokenTag::Known(tag),
            None => {
                self.unrecognised += 1;
                TokenTag::Other(self.interner.get_or_intern(label))
            }
        };
        let word = self.interner.get_or_intern(word);
        self.tokens.push(Token { word, tag });
    }

    /// Append every token from a reader, stopping at the first error
    pub fn extend<'a>(
        &mut self,
        tokens: impl IntoIterator<Item = Result<RawToken<'a>, CorpusError>>,
    ) -> Result<(), CorpusError> {
        for token in tokens {
            let token = token?;
            self.push(token.word, token.tag);
        }
        Ok(())
    }

    pub fn build(self) -> Corpus {
        if self.unrecognised > 0 {
            tracing::debug!(
                corpus = %self.name,
                count = self.unrecognised,
                "Tokens with tags outside the tagset"
            );
        }
        Corpus {
            name: self.name,
            interner: self.interner,
            tokens: self.tokens,
        }
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

fn default_name(path: &Path) -> String {
    let mut path = path.to_path_buf();
    if is_gzip(&path) {
        path.set_extension("");
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string())
}

fn read_file(path: &Path) -> Result<Vec<u8>, CorpusError> {
    let file = File::open(path).map_err(|source| CorpusError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let mut text = Vec::new();
    if is_gzip(path) {
        MultiGzDecoder::new(BufReader::new(file)).read_to_end(&mut text)?;
    } else {
        BufReader::new(file).read_to_end(&mut text)?;
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::tempdir;

    const CONLLU: &str = "# text = The big dog ran.
1\tThe\tthe\tDET\tDT\t_\t3\tdet\t_\t_
2\tbig\tbig\tADJ\tJJ\t_\t3\tamod\t_\t_
3\tdog\tdog\tNOUN\tNN\t_\t4\tnsubj\t_\t_
4\tran\trun\tVERB\tVBD\t_\t0\troot\t_\tSpaceAfter=No
5\t.\t.\tPUNCT\t.\t_\t4\tpunct\t_\t_

";

    #[test]
    fn test_builder() {
        let mut builder = Corpus::builder("built");
        builder.push("old", "ADJ");
        builder
            .extend(TaggedTokens::new(b"men/NOUN and/CCONJ ,/PUNCT"))
            .unwrap();
        let corpus = builder.build();

        let tags: Vec<_> = corpus.iter().map(|token| token.tag).collect();
        assert_eq!(tags, vec![Some(Tag::Adj), Some(Tag::Noun), Some(Tag::Conj), None]);
        assert_eq!(corpus.get(3).unwrap().label, "PUNCT");
    }

    #[test]
    fn test_from_pairs() {
        let corpus = Corpus::from_pairs("test", [("the", "DET"), ("dog", "NOUN"), ("!", ".")]);
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.name(), "test");

        let token = corpus.get(1).unwrap();
        assert_eq!(token.word, "dog");
        assert_eq!(token.tag, Some(Tag::Noun));

        let token = corpus.get(2).unwrap();
        assert_eq!(token.tag, None);
        assert_eq!(token.label, ".");
        assert!(corpus.get(3).is_none());
    }

    #[test]
    fn test_label_aliases() {
        let corpus = Corpus::from_pairs("test", [("and", "CCONJ"), ("up", "PRT")]);
        assert_eq!(corpus.get(0).unwrap().tag, Some(Tag::Conj));
        assert_eq!(corpus.get(1).unwrap().tag, Some(Tag::Part));
        assert_eq!(corpus.get(0).unwrap().label, "CONJ");
    }

    #[test]
    fn test_parse_conllu() {
        let corpus = Corpus::parse("ud", CONLLU.as_bytes(), CorpusFormat::Conllu).unwrap();
        let words: Vec<_> = corpus.iter().map(|t| t.word).collect();
        assert_eq!(words, vec!["The", "big", "dog", "ran", "."]);
        assert_eq!(corpus.get(4).unwrap().label, "PUNCT");
    }

    #[test]
    fn test_parse_error_propagates() {
        let result = Corpus::parse("bad", b"ok/DET broken\n", CorpusFormat::Tagged);
        assert!(matches!(result, Err(CorpusError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_tag_counts() {
        let corpus = Corpus::from_pairs(
            "test",
            [("a", "DET"), ("b", "NOUN"), ("c", "DET"), ("d", "."), ("e", ".")],
        );
        assert_eq!(corpus.tag_counts(), vec![(".", 2), ("DET", 2), ("NOUN", 1)]);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            CorpusFormat::from_path(Path::new("ewt.conllu")),
            CorpusFormat::Conllu
        );
        assert_eq!(
            CorpusFormat::from_path(Path::new("ewt.conllu.gz")),
            CorpusFormat::Conllu
        );
        assert_eq!(
            CorpusFormat::from_path(Path::new("brown.txt")),
            CorpusFormat::Tagged
        );
        assert_eq!("CoNLLU".parse::<CorpusFormat>(), Ok(CorpusFormat::Conllu));
        assert!("xml".parse::<CorpusFormat>().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.conllu");
        std::fs::write(&path, CONLLU).unwrap();

        let corpus = Corpus::from_file(&path, None).unwrap();
        assert_eq!(corpus.name(), "sample");
        assert_eq!(corpus.len(), 5);
    }

    #[test]
    fn test_from_gzip_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("brown.txt.gz");
        let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"The/DET dog/NOUN ran/VERB").unwrap();
        encoder.finish().unwrap();

        let corpus = Corpus::from_file(&path, None).unwrap();
        assert_eq!(corpus.name(), "brown");
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.get(2).unwrap().tag, Some(Tag::Verb));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = Corpus::from_file(dir.path().join("nope.conllu"), None);
        assert!(matches!(result, Err(CorpusError::FileOpen { .. })));
    }

    #[test]
    fn test_with_name() {
        let corpus = Corpus::from_pairs("x", [("a", "DET")]).with_name("Brown");
        assert_eq!(corpus.name(), "Brown");
    }
}
