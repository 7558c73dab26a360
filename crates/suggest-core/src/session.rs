//! One interactive round: suggest, let the user pick, log, produce, type.
//!
//! The picker process and the keystroke injection are reached only through
//! the [`Picker`] and [`Typist`] traits.

use std::io;

use tracing::{debug, debug_span, info};

use crate::engine::{SuggestConfig, SuggestionEngine};
use crate::entry::Entry;
use crate::ranker::RankedList;
use crate::realize::{realize_for_query, CommandRunner, Produced, RealizeError};
use crate::storage::Storage;

#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    #[error("failed to run picker `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("picker output is not UTF-8")]
    NotUtf8,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to type with `{command}`: {source}")]
pub struct TypeError {
    pub command: String,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Picker(#[from] PickerError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Realize(#[from] RealizeError),
}

/// Shows the delimiter-joined candidates and returns the chosen line, or
/// `None` if the user dismissed it.
pub trait Picker {
    fn pick(&self, payload: &str, delimiter: char) -> Result<Option<String>, PickerError>;
}

/// Types into the focused application.
pub trait Typist {
    /// Remove the word the query came from.
    fn erase_selection(&self) -> Result<(), TypeError>;
    fn type_text(&self, text: &str) -> Result<(), TypeError>;
    fn line_break(&self) -> Result<(), TypeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestMethod {
    /// A selected word is replaced by the suggestion.
    Replace,
    /// Nothing was selected; the suggestion is inserted at the cursor.
    Insert,
}

impl SuggestMethod {
    pub fn for_query(query: &str) -> Self {
        if query.is_empty() {
            Self::Insert
        } else {
            Self::Replace
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted { chosen: String, produced: Produced },
    NoWords,
    Cancelled,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Accepted { .. } => 0,
            Outcome::NoWords => 1,
            Outcome::Cancelled => 2,
        }
    }
}

/// Candidates after the replace-to-insert fallback.
#[derive(Debug)]
pub struct Lookup {
    pub query: String,
    pub method: SuggestMethod,
    pub ranked: RankedList,
}

pub struct Session<'a, S> {
    engine: &'a SuggestionEngine<S>,
    config: &'a SuggestConfig,
    runner: &'a dyn CommandRunner,
    delimiter: char,
}

impl<'a, S: Storage> Session<'a, S> {
    pub fn new(
        engine: &'a SuggestionEngine<S>,
        config: &'a SuggestConfig,
        runner: &'a dyn CommandRunner,
        delimiter: char,
    ) -> Self {
        Self {
            engine,
            config,
            runner,
            delimiter,
        }
    }

    /// Suggest for `query`; if a selected word has no completions, fall back
    /// to listing everything for insertion.
    pub fn lookup(&self, query: &str) -> Lookup {
        let method = SuggestMethod::for_query(query);
        let ranked = self.engine.suggest(query, self.config).ranked;
        if ranked.is_empty() && method == SuggestMethod::Replace {
            debug!(query, "no completions, listing everything");
            return Lookup {
                query: String::new(),
                method: SuggestMethod::Insert,
                ranked: self.engine.suggest("", self.config).ranked,
            };
        }
        Lookup {
            query: query.to_string(),
            method,
            ranked,
        }
    }

    pub fn payload(&self, lookup: &Lookup) -> String {
        lookup.ranked.payload(self.delimiter)
    }

    pub fn run(
        &self,
        query: &str,
        picker: &dyn Picker,
        typist: &dyn Typist,
    ) -> Result<Outcome, SessionError> {
        let _span = debug_span!("session", query).entered();

        let lookup = self.lookup(query);
        let payload = self.payload(&lookup);
        if payload.is_empty() {
            return Ok(Outcome::NoWords);
        }

        let chosen = match picker.pick(&payload, self.delimiter)? {
            Some(choice) if !choice.trim().is_empty() => choice.trim().to_string(),
            _ => return Ok(Outcome::Cancelled),
        };

        // The picker may return free text the user typed instead of a listed
        // candidate; that text goes through the same line grammar.
        let entry = match lookup.ranked.get(&chosen) {
            Some(candidate) => candidate.entry.clone(),
            None => Entry::parse(&chosen).unwrap_or_else(|| Entry::word(chosen.as_str())),
        };

        self.engine.accept_best_effort(self.config, &chosen);

        let produced = realize_for_query(&entry, &lookup.query, self.runner)?;
        if lookup.method == SuggestMethod::Replace {
            typist.erase_selection()?;
        }
        type_produced(typist, &produced)?;

        info!(chosen = %chosen, kind = ?entry.kind, "suggestion applied");
        Ok(Outcome::Accepted { chosen, produced })
    }
}

/// Single lines are typed as-is; multi-line output gets a line break after
/// every line.
fn type_produced(typist: &dyn Typist, produced: &Produced) -> Result<(), TypeError> {
    if !produced.is_multiline() {
        if let Some(line) = produced.lines().first() {
            typist.type_text(line)?;
        }
        return Ok(());
    }
    for line in produced.lines() {
        typist.type_text(line)?;
        typist.line_break()?;
    }
    Ok(())
}
