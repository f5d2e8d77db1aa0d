//! Interactive search session
//!
//! Holds the current input text and the result set on display. Which
//! controls are available follows from a single [`SessionState`] value that
//! is recomputed after every [`Action`].

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::corpus::Corpus;
use crate::matcher::{MatchSet, find_matches};
use crate::query::{Query, QueryError};
use crate::report::{default_file_name, describe_in, save_matches, tag_table};
use crate::tagset::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No input and nothing displayed
    Empty,
    /// Input that is not a valid query, or an empty input over displayed results
    TypingInvalid,
    /// Input that is a valid query and can be searched
    TypingValid,
    /// Results for the current input are displayed
    ResultsShown,
}

/// Which controls are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub find: bool,
    pub reset: bool,
    pub save: bool,
}

impl SessionState {
    /// State implied by an input text alone
    pub fn from_input(input: &str, has_results: bool) -> Self {
        if input.trim().is_empty() && !has_results {
            SessionState::Empty
        } else if Query::parse(input).is_ok() {
            SessionState::TypingValid
        } else {
            SessionState::TypingInvalid
        }
    }

    pub fn controls(self, has_results: bool) -> Controls {
        match self {
            SessionState::Empty => Controls {
                find: false,
                reset: false,
                save: false,
            },
            SessionState::TypingInvalid | SessionState::ResultsShown => Controls {
                find: false,
                reset: true,
                save: has_results,
            },
            SessionState::TypingValid => Controls {
                find: true,
                reset: true,
                save: has_results,
            },
        }
    }
}

/// One user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the input text
    Edit(String),
    /// Append a tag code to the input, as picked from the tag table
    AppendTag(Tag),
    Find,
    Reset,
    /// Save the displayed matches; `None` picks a name from the query and count
    Save(Option<PathBuf>),
    ShowTags,
    Exit,
}

/// State after `action`, given the input text once the action is applied
pub fn transition(
    state: SessionState,
    action: &Action,
    input: &str,
    has_results: bool,
) -> SessionState {
    match action {
        Action::Edit(_) | Action::AppendTag(_) => SessionState::from_input(input, has_results),
        Action::Find => match state {
            SessionState::TypingValid => SessionState::ResultsShown,
            other => other,
        },
        Action::Reset => SessionState::Empty,
        Action::Save(_) | Action::ShowTags | Action::Exit => state,
    }
}

/// What the front end should show after an action
#[derive(Debug)]
pub enum Outcome {
    /// Input changed; `error` explains why it is not searchable
    Input {
        state: SessionState,
        error: Option<QueryError>,
    },
    /// A search ran; matches are available from [`Session::results`]
    Results { summary: String, count: usize },
    Cleared,
    Saved(PathBuf),
    SaveFailed(String),
    Tags(String),
    /// The action is not available in the current state
    Ignored,
    Exit,
}

/// Search session over one corpus
pub struct Session<'c> {
    corpus: &'c Corpus,
    input: String,
    state: SessionState,
    results: Option<(Query, MatchSet<'c>)>,
    save_dir: Option<PathBuf>,
}

impl<'c> Session<'c> {
    pub fn new(corpus: &'c Corpus) -> Self {
        Self {
            corpus,
            input: String::new(),
            state: SessionState::Empty,
            results: None,
            save_dir: None,
        }
    }

    /// Directory for saves without an explicit path (the working directory otherwise)
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn controls(&self) -> Controls {
        self.state.controls(self.has_results())
    }

    /// The query and matches on display
    pub fn results(&self) -> Option<(&Query, &MatchSet<'c>)> {
        self.results.as_ref().map(|(query, matches)| (query, matches))
    }

    /// Where a save without a path goes, e.g. `ADJ NOUN (3 phrases).txt`
    pub fn default_save_path(&self) -> Option<PathBuf> {
        let (query, matches) = self.results()?;
        let name = default_file_name(query, matches);
        Some(match &self.save_dir {
            Some(dir) => dir.join(name),
            None => name,
        })
    }

    fn has_results(&self) -> bool {
        self.results
            .as_ref()
            .is_some_and(|(_, matches)| !matches.is_empty())
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let outcome = match &action {
            Action::Edit(text) => {
                self.input = text.clone();
                self.input_outcome(&action)
            }
            Action::AppendTag(tag) => {
                self.input = format!("{} {}", self.input.trim(), tag.code())
                    .trim()
                    .to_string();
                self.input_outcome(&action)
            }
            Action::Find => self.find(),
            Action::Reset => {
                self.input.clear();
                self.results = None;
                self.state = SessionState::Empty;
                Outcome::Cleared
            }
            Action::Save(path) => self.save(path.as_deref()),
            Action::ShowTags => Outcome::Tags(tag_table()),
            Action::Exit => Outcome::Exit,
        };
        tracing::trace!(?action, state = ?self.state, "Dispatched");
        outcome
    }

    fn input_outcome(&mut self, action: &Action) -> Outcome {
        self.state = transition(self.state, action, &self.input, self.results.is_some());
        let error = match self.state {
            SessionState::TypingInvalid => Query::parse(&self.input).err(),
            _ => None,
        };
        Outcome::Input {
            state: self.state,
            error,
        }
    }

    fn find(&mut self) -> Outcome {
        if !self.controls().find {
            return Outcome::Ignored;
        }
        let Ok(query) = Query::parse(&self.input) else {
            return Outcome::Ignored;
        };

        let matches = find_matches(&query, self.corpus);
        let summary = describe_in(&query, &matches, self.corpus.name());
        let count = matches.len();
        tracing::info!(query = %query, matches = count, "Search");

        self.state = transition(self.state, &Action::Find, &self.input, count > 0);
        self.results = Some((query, matches));
        Outcome::Results { summary, count }
    }

    fn save(&self, path: Option<&Path>) -> Outcome {
        if !self.controls().save {
            return Outcome::Ignored;
        }
        let (Some((_, matches)), Some(default)) = (&self.results, self.default_save_path()) else {
            return Outcome::Ignored;
        };
        match save_matches(path.unwrap_or(&default), matches) {
            Ok(written) => Outcome::Saved(written),
            Err(e) => {
                tracing::warn!(error = %e, "Save failed");
                Outcome::SaveFailed(e.to_string())
            }
        }
    }
}

/// Error for an unrecognised interactive command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Tag(#[from] crate::tagset::UnknownTag),
}

/// Translate one line of interactive input into actions
///
/// A line not starting with `:` replaces the input and searches, like
/// pressing Enter in the input box.
pub fn parse_line(line: &str) -> Result<Vec<Action>, CommandError> {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return Ok(vec![Action::Edit(line.to_string()), Action::Find]);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "add" | "a" => {
            if arg.is_empty() {
                return Err(CommandError::Usage(":add TAG"));
            }
            let tags = arg
                .split_whitespace()
                .map(|code| code.parse::<Tag>().map(Action::AppendTag))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tags)
        }
        "find" | "f" => Ok(vec![Action::Find]),
        "reset" | "r" => Ok(vec![Action::Reset]),
        "save" | "s" if arg.is_empty() => Ok(vec![Action::Save(None)]),
        "save" | "s" => Ok(vec![Action::Save(Some(PathBuf::from(arg)))]),
        "tags" | "t" => Ok(vec![Action::ShowTags]),
        "quit" | "q" | "exit" => Ok(vec![Action::Exit]),
        _ => Err(CommandError::Unknown(name.to_string())),
    }
}
