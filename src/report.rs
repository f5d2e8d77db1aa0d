//! Result formatting and saving

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::corpus::Corpus;
use crate::matcher::{MatchSet, find_matches};
use crate::query::{Query, QueryError};
use crate::tagset::vocabulary;

/// Prompt shown before any input
pub const INPUT_PROMPT: &str = "Enter a sequence of two or more POS tags from the universal \
tagset, separated by spaces (e.g. 'ADJ NOUN NOUN')";

pub const TAG_TABLE_HEADINGS: [&str; 2] = ["Tag", "Description"];

/// `1234567` -> `"1,234,567"`
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Summary line for a result set
pub fn describe(query: &Query, matches: &MatchSet<'_>) -> String {
    format!(
        "Showing {} phrase(s) from the corpus that match the POS sequence {}:",
        format_count(matches.len()),
        query
    )
}

/// Summary line naming the corpus searched
pub fn describe_in(query: &Query, matches: &MatchSet<'_>, corpus_name: &str) -> String {
    format!(
        "Showing {} phrase(s) from the {} corpus that match the POS sequence {}:",
        format_count(matches.len()),
        corpus_name,
        query
    )
}

/// Progress line shown while a search runs
pub fn searching(query: &Query) -> String {
    format!("Getting phrases for POS sequence {}...", query)
}

/// The tag reference table, one row per tag
pub fn tag_table() -> String {
    let width = vocabulary()
        .map(|(code, _)| code.len())
        .chain(std::iter::once(TAG_TABLE_HEADINGS[0].len()))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<width$}  {}\n",
        TAG_TABLE_HEADINGS[0], TAG_TABLE_HEADINGS[1]
    );
    for (code, description) in vocabulary() {
        out.push_str(&format!("{:<width$}  {}\n", code, description));
    }
    out
}

/// Error while saving a result set
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Nothing to save: the result set is empty")]
    NothingToSave,

    #[error("Unable to save file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Path a result file is written to: `.txt` is added when there is no extension
pub fn output_path(path: &Path) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension("txt")
    } else {
        path.to_path_buf()
    }
}

/// Suggested file name for a result set: `ADJ NOUN (3 phrases).txt`
pub fn default_file_name(query: &Query, matches: &MatchSet<'_>) -> PathBuf {
    PathBuf::from(format!("{} ({} phrases).txt", query, matches.len()))
}

/// Write one match per line to a text file, replacing any existing file
///
/// The file is written next to its destination and renamed into place, so a
/// failed save leaves an earlier file intact. Returns the path written.
pub fn save_matches(path: &Path, matches: &MatchSet<'_>) -> Result<PathBuf, SaveError> {
    if matches.is_empty() {
        return Err(SaveError::NothingToSave);
    }

    let path = output_path(path);
    let io_error = |source| SaveError::Io {
        path: path.clone(),
        source,
    };

    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(io_error)?;

    let temp_file = NamedTempFile::new_in(parent).map_err(io_error)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        for m in matches {
            writeln!(writer, "{}", m).map_err(io_error)?;
        }
        writer.flush().map_err(io_error)?;
    }
    temp_file.persist(&path).map_err(|e| io_error(e.error))?;

    tracing::info!(path = %path.display(), matches = matches.len(), "Saved matches");
    Ok(path)
}

/// What happened to a requested save after a search
#[derive(Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    NotRequested,
    /// No matches, so no file was written
    Empty,
    Saved(PathBuf),
}

/// Error from a one-shot search
#[derive(Debug, Error)]
pub enum FindError {
    #[error("{source}\n{prompt}", prompt = INPUT_PROMPT)]
    Query {
        #[from]
        source: QueryError,
    },

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("Unable to write results: {0}")]
    Io(#[from] std::io::Error),
}

/// Search `corpus` for `input` and write the summary and matches to `out`
///
/// At most `limit` matches are written. With `output` set the full result set
/// is also saved there, unless it is empty.
pub fn run_find<W: Write>(
    out: &mut W,
    corpus: &Corpus,
    input: &str,
    output: Option<&Path>,
    limit: Option<usize>,
) -> Result<SaveOutcome, FindError> {
    let query = Query::parse(input)?;
    let matches = find_matches(&query, corpus);
    tracing::info!(query = %query, matches = matches.len(), "Search");

    writeln!(out, "{}", describe_in(&query, &matches, corpus.name()))?;
    for line in matches.lines().take(limit.unwrap_or(usize::MAX)) {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;

    let Some(path) = output else {
        return Ok(SaveOutcome::NotRequested);
    };
    if matches.is_empty() {
        tracing::warn!("No matches, nothing saved");
        return Ok(SaveOutcome::Empty);
    }
    Ok(SaveOutcome::Saved(save_matches(path, &matches)?))
}

/// Token total and per-label counts, most frequent first
pub fn write_stats<W: Write>(out: &mut W, corpus: &Corpus) -> std::io::Result<()> {
    writeln!(out, "{}: {} tokens", corpus.name(), corpus.len())?;
    for (label, count) in corpus.tag_counts() {
        writeln!(out, "{:<8}{:>12}", label, count)?;
    }
    Ok(())
}
