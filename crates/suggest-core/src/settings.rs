//! Settings loaded from TOML.
//!
//! - `parse_settings_toml(toml)` parses and validates a settings file
//! - `default_settings()` parses the embedded defaults
//! - `Settings::suggest_config` resolves the sources for one call
//!
//! Settings are plain values handed to whoever needs them; nothing here is
//! global.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::engine::SuggestConfig;
use crate::entry::{ALIAS_SEPARATOR, COMMAND_MARKER, MATH_MARKER};
use crate::history::HistoryStore;
use crate::storage::Storage;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub sources: SourceSettings,
    pub history: HistorySettings,
    pub picker: PickerSettings,
    pub actuation: ActuationSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceSettings {
    pub dict_dir: String,
    pub languages: Vec<String>,
    pub fallback_language: String,
    pub custom_words: String,
    pub extra_words: String,
    #[serde(default)]
    pub legacy_custom_words: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistorySettings {
    pub enabled: bool,
    pub path: String,
    pub max_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PickerSettings {
    pub command: String,
    pub args: Vec<String>,
    pub theme_args: Vec<String>,
    pub font: String,
    pub prompt: String,
    pub delimiter: char,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActuationSettings {
    pub type_command: String,
    pub selection_command: Vec<String>,
    pub line_delay_ms: u64,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

/// The embedded defaults.
pub fn default_settings() -> Settings {
    parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("default settings TOML must be valid")
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }

    check_non_empty!(sources.dict_dir);
    check_non_empty!(sources.fallback_language);
    check_non_empty!(history.path);
    check_non_empty!(picker.command);
    check_non_empty!(actuation.type_command);
    check_non_empty!(actuation.selection_command);

    if let Some(lang) = s.sources.languages.iter().find(|l| l.trim().is_empty()) {
        return Err(SettingsError::InvalidValue {
            field: "sources.languages".to_string(),
            reason: format!("blank language name {lang:?}"),
        });
    }

    let d = s.picker.delimiter;
    if d.is_alphanumeric() || d.is_whitespace() || [COMMAND_MARKER, MATH_MARKER, ALIAS_SEPARATOR].contains(&d) {
        return Err(SettingsError::InvalidValue {
            field: "picker.delimiter".to_string(),
            reason: format!("{d:?} can occur inside dictionary entries"),
        });
    }

    Ok(())
}

/// Expand a leading `~/` against `home`.
pub fn expand_path(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

impl Settings {
    /// Configured languages followed by the fallback, without repeats.
    pub fn language_priority(&self) -> Vec<String> {
        let mut langs: Vec<String> = Vec::new();
        for lang in self
            .sources
            .languages
            .iter()
            .chain(std::iter::once(&self.sources.fallback_language))
        {
            if !langs.contains(lang) {
                langs.push(lang.clone());
            }
        }
        langs
    }

    /// Put `lang` first in the priority order.
    pub fn prefer_language(&mut self, lang: &str) {
        self.sources.languages.retain(|l| l != lang);
        self.sources.languages.insert(0, lang.to_string());
    }

    pub fn custom_words_path(&self, home: Option<&Path>) -> PathBuf {
        expand_path(&self.sources.custom_words, home)
    }

    pub fn legacy_custom_words_path(&self, home: Option<&Path>) -> Option<PathBuf> {
        self.sources
            .legacy_custom_words
            .as_deref()
            .map(|raw| expand_path(raw, home))
    }

    pub fn history_store(&self, home: Option<&Path>) -> HistoryStore {
        if !self.history.enabled {
            return HistoryStore::disabled();
        }
        HistoryStore::new(expand_path(&self.history.path, home))
            .with_max_lines(self.history.max_lines)
    }

    /// Resolve the source files for one call: every file of each language
    /// directory in priority order, then custom words, then extra words.
    /// Missing language directories and word files are skipped.
    pub fn suggest_config(&self, storage: &dyn Storage, home: Option<&Path>) -> SuggestConfig {
        let dict_dir = expand_path(&self.sources.dict_dir, home);
        let mut sources = Vec::new();

        for lang in self.language_priority() {
            let dir = dict_dir.join(&lang);
            match storage.list_dir(&dir) {
                Ok(files) => sources.extend(files),
                Err(e) => warn!(language = %lang, dir = %dir.display(), "no dictionaries: {e}"),
            }
        }

        for path in [
            self.custom_words_path(home),
            expand_path(&self.sources.extra_words, home),
        ] {
            if storage.is_file(&path) {
                sources.push(path);
            } else {
                debug!(path = %path.display(), "word file not present");
            }
        }

        SuggestConfig::new(sources, self.history_store(home))
    }
}
