//! Accepted-suggestion log.
//!
//! One line per accepted suggestion, appended and never rewritten unless
//! compaction is requested. Each line is read back as one entry, so a text
//! accepted `n` times contributes `n` to its usage count.


use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, debug_span, warn};

use crate::entry::{Entry, COMMAND_MARKER, MATH_MARKER};
use crate::source::SourceError;
use crate::storage::Storage;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history write failed: {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("history compaction failed: {}: {source}", .path.display())]
    Compact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle on the history file. A disabled store reads nothing and writes
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    /// Keep at most this many lines after each append; 0 means unbounded.
    max_lines: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            max_lines: 0,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Every logged line as an entry, in log order. A history file that does
    /// not exist yet reads as empty.
    pub fn read(&self, storage: &dyn Storage) -> Result<Vec<Entry>, SourceError> {
        Ok(self.read_lines(storage)?.into_iter().map(logged_entry).collect())
    }

    fn read_lines(&self, storage: &dyn Storage) -> Result<Vec<String>, SourceError> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };
        match storage.read_to_string(path) {
            Ok(text) => Ok(text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no history yet");
                Ok(Vec::new())
            }
            Err(source) => Err(SourceError::Unavailable {
                path: path.clone(),
                source,
            }),
        }
    }

    /// Log one accepted suggestion.
    pub fn append(&self, storage: &dyn Storage, text: &str) -> Result<(), HistoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let line = single_line(text);
        if line.is_empty() {
            return Ok(());
        }
        let _span = debug_span!("history_append", path = %path.display()).entered();
        storage
            .append_line(path, &line)
            .map_err(|source| HistoryError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        if self.max_lines > 0 {
            let removed = self.compact(storage, self.max_lines)?;
            if removed > 0 {
                debug!(removed, max_lines = self.max_lines, "history compacted");
            }
        }
        Ok(())
    }

    /// Keep only the most recent `keep` lines. Returns how many were dropped.
    ///
    /// This rewrites the file, so unlike `append` it is not safe against a
    /// concurrent invocation appending at the same moment.
    pub fn compact(&self, storage: &dyn Storage, keep: usize) -> Result<usize, HistoryError> {
        let Some(path) = &self.path else {
            return Ok(0);
        };
        let lines = self.read_lines(storage).map_err(|e| match e {
            SourceError::Unavailable { path, source } => HistoryError::Compact { path, source },
        })?;
        if lines.len() <= keep {
            return Ok(0);
        }
        let removed = lines.len() - keep;
        let mut contents = String::new();
        for line in &lines[removed..] {
            contents.push_str(line);
            contents.push('\n');
        }
        storage
            .replace(path, &contents)
            .map_err(|source| HistoryError::Compact {
                path: path.clone(),
                source,
            })?;
        Ok(removed)
    }

    /// Usage count per text, most used first, ties in first-logged order.
    pub fn stats(&self, storage: &dyn Storage) -> Result<Vec<(String, usize)>, SourceError> {
        let mut order: Vec<(String, usize)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        for line in self.read_lines(storage)? {
            match slots.get(&line) {
                Some(&i) => order[i].1 += 1,
                None => {
                    slots.insert(line.clone(), order.len());
                    order.push((line, 1));
                }
            }
        }
        order.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(order)
    }
}

/// Best-effort append: failures are logged and swallowed.
pub fn record_best_effort(store: &HistoryStore, storage: &dyn Storage, text: &str) -> bool {
    match store.append(storage, text) {
        Ok(()) => true,
        Err(e) => {
            warn!("{e}");
            false
        }
    }
}

/// `#command` and `%expression` lines stay lazy so picking them from history
/// runs them again. Everything else, alias keys included, is a plain word.
fn logged_entry(line: String) -> Entry {
    if line.starts_with([COMMAND_MARKER, MATH_MARKER]) {
        if let Some(entry) = Entry::parse(&line).filter(|e| e.text == line) {
            return entry;
        }
    }
    Entry::word(line)
}

/// Collapse line breaks so one acceptance is always exactly one log line.
fn single_line(text: &str) -> String {
    text.trim()
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
