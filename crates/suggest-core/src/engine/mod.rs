//! Suggestion pipeline: sources → matcher → ranker.
//!
//! The engine holds no state between calls. Everything a call depends on is
//! in the [`SuggestConfig`] passed to it and the files that config names.

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use tracing::{debug, debug_span, warn};

use crate::entry::Entry;
use crate::history::{record_best_effort, HistoryError, HistoryStore};
use crate::matcher::matches;
use crate::ranker::{rank, Origin, RankedList, Scored};
use crate::source::{DictionarySource, SourceError};
use crate::storage::{FsStorage, Storage};

/// Which files feed one call, in priority order, plus the history log.
///
/// `sources` is read in the given order; history always comes last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestConfig {
    pub sources: Vec<PathBuf>,
    pub history: HistoryStore,
}

impl SuggestConfig {
    pub fn new(sources: Vec<PathBuf>, history: HistoryStore) -> Self {
        Self { sources, history }
    }
}

/// Result of one `suggest` call.
#[derive(Debug, Default)]
pub struct Suggestions {
    pub ranked: RankedList,
    /// Sources that could not be read and were left out.
    pub unavailable: Vec<SourceError>,
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

pub struct SuggestionEngine<S = FsStorage> {
    storage: S,
}

impl Default for SuggestionEngine<FsStorage> {
    fn default() -> Self {
        Self::new(FsStorage)
    }
}

impl<S: Storage> SuggestionEngine<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Rank every entry of every configured source against `query`.
    pub fn suggest(&self, query: &str, config: &SuggestConfig) -> Suggestions {
        let _span = debug_span!("suggest", query, sources = config.sources.len()).entered();

        let mut unavailable = Vec::new();
        let mut streams: Vec<Vec<Entry>> = Vec::with_capacity(config.sources.len() + 1);

        for path in &config.sources {
            match DictionarySource::open(&self.storage, path) {
                Ok(source) => streams.push(source.into_entries()),
                Err(e) => {
                    warn!("{e}");
                    streams.push(Vec::new());
                    unavailable.push(e);
                }
            }
        }

        if config.history.is_enabled() {
            match config.history.read(&self.storage) {
                Ok(entries) => streams.push(entries),
                Err(e) => {
                    warn!("{e}");
                    unavailable.push(e);
                }
            }
        }

        let pool = streams
            .into_iter()
            .enumerate()
            .flat_map(|(source, entries)| {
                entries
                    .into_iter()
                    .enumerate()
                    .map(move |(position, entry)| (Origin { source, position }, entry))
            })
            .map(|(origin, entry)| Scored {
                score: matches(query, &entry),
                entry,
                origin,
            });

        let ranked = rank(pool);
        debug!(
            candidates = ranked.len(),
            unavailable = unavailable.len(),
            "suggest done"
        );
        Suggestions {
            ranked,
            unavailable,
        }
    }

    /// Log an accepted suggestion to history.
    pub fn accept(&self, config: &SuggestConfig, text: &str) -> Result<(), HistoryError> {
        config.history.append(&self.storage, text)
    }

    /// Like [`accept`](Self::accept), but a failed write is only logged.
    pub fn accept_best_effort(&self, config: &SuggestConfig, text: &str) -> bool {
        record_best_effort(&config.history, &self.storage, text)
    }
}

/// One-shot lookup over real files.
pub fn suggest(query: &str, sources: &[PathBuf], history: Option<&Path>) -> RankedList {
    let config = SuggestConfig {
        sources: sources.to_vec(),
        history: history.map_or_else(HistoryStore::disabled, HistoryStore::new),
    };
    SuggestionEngine::default().suggest(query, &config).ranked
}
