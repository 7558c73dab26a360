use std::path::{Path, PathBuf};

use tracing::{info, warn};

use suggest_core::realize::ShellRunner;
use suggest_core::session::{Outcome, Picker, Session, Typist};
use suggest_core::settings::Settings;
use suggest_core::storage::{FsStorage, Storage};
use suggest_core::SuggestionEngine;

use super::config_ops;
use crate::shims::{self, AutoSelect, PickerOptions, RofiPicker, XdotoolTypist};

/// Where the query comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// Insert mode: no word to complete.
    Nothing,
    Given(String),
    /// Read the X selection, optionally selecting the word first.
    Selection(Option<AutoSelect>),
}

impl QuerySource {
    pub fn from_flags(no_selection: bool, words: &[String], auto: Option<AutoSelect>) -> Self {
        if no_selection {
            QuerySource::Nothing
        } else if !words.is_empty() {
            QuerySource::Given(words.join(" "))
        } else {
            QuerySource::Selection(auto)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuggestOptions {
    pub config: Option<PathBuf>,
    pub language: Option<String>,
    pub no_history: bool,
    pub picker: PickerOptions,
    pub print: bool,
}

/// Settings with command-line overrides applied.
pub fn resolve_settings(
    storage: &dyn Storage,
    opts: &SuggestOptions,
    home: Option<&Path>,
) -> Result<Settings, config_ops::ConfigError> {
    let mut settings = config_ops::load_settings(storage, opts.config.as_deref(), home)?;
    if let Some(lang) = &opts.language {
        settings.prefer_language(lang);
    }
    if opts.no_history {
        settings.history.enabled = false;
    }
    Ok(settings)
}

fn capture_query(source: &QuerySource, settings: &Settings, typist: &XdotoolTypist) -> String {
    match source {
        QuerySource::Nothing => String::new(),
        QuerySource::Given(word) => word.clone(),
        QuerySource::Selection(auto) => {
            if let Some(mode) = auto {
                if let Err(e) = typist.select_word(*mode) {
                    warn!("auto selection failed: {e}");
                }
            }
            shims::read_selection(&settings.actuation.selection_command).unwrap_or_else(|e| {
                warn!("cannot read selection, listing everything: {e}");
                String::new()
            })
        }
    }
}

/// Run one suggestion round against real sources and return the exit code.
pub fn run_with<S: Storage>(
    engine: &SuggestionEngine<S>,
    settings: &Settings,
    home: Option<&Path>,
    query: &str,
    picker: &dyn Picker,
    typist: &dyn Typist,
) -> i32 {
    let config = settings.suggest_config(engine.storage(), home);
    let session = Session::new(engine, &config, &ShellRunner, settings.picker.delimiter);
    match session.run(query, picker, typist) {
        Ok(Outcome::NoWords) => {
            eprintln!("No words found. Exiting.");
            Outcome::NoWords.exit_code()
        }
        Ok(outcome) => {
            info!(code = outcome.exit_code(), "done");
            outcome.exit_code()
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

pub fn run(source: QuerySource, opts: &SuggestOptions) -> i32 {
    let home = config_ops::home_dir();
    let home = home.as_deref();
    let settings = die!(resolve_settings(&FsStorage, opts, home), "Error: {}");
    config_ops::migrate_custom_words(&FsStorage, &settings, home);

    let typist = XdotoolTypist::new(&settings.actuation);
    let query = capture_query(&source, &settings, &typist);
    let engine = SuggestionEngine::default();

    if opts.print {
        let config = settings.suggest_config(&FsStorage, home);
        let session = Session::new(&engine, &config, &ShellRunner, settings.picker.delimiter);
        let payload = session.payload(&session.lookup(&query));
        if payload.is_empty() {
            eprintln!("No words found. Exiting.");
            return Outcome::NoWords.exit_code();
        }
        println!("{payload}");
        return 0;
    }

    let picker = RofiPicker::new(&settings.picker, &opts.picker);
    run_with(&engine, &settings, home, &query, &picker, &typist)
}
