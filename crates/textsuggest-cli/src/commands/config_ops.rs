use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use suggest_core::custom_words::migrate_legacy;
use suggest_core::settings::{self, Settings, SettingsError};
use suggest_core::storage::{FsStorage, Storage};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: SettingsError,
    },
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// `~/.config/textsuggest`, also where trace logs go.
pub fn config_dir(home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) => home.join(".config").join("textsuggest"),
        None => std::env::temp_dir().join("textsuggest"),
    }
}

pub fn default_settings_path(home: Option<&Path>) -> PathBuf {
    config_dir(home).join("settings.toml")
}

/// Load `explicit` if given (it must exist), else the user's settings file
/// if present, else the embedded defaults.
pub fn load_settings(
    storage: &dyn Storage,
    explicit: Option<&Path>,
    home: Option<&Path>,
) -> Result<Settings, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_settings_path(home);
            if !storage.is_file(&path) {
                debug!("no settings file, using defaults");
                return Ok(settings::default_settings());
            }
            path
        }
    };
    let content = storage
        .read_to_string(&path)
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
    settings::parse_settings_toml(&content).map_err(|source| ConfigError::Invalid { path, source })
}

/// [`load_settings`] from the real filesystem, exiting on failure.
pub fn load_settings_or_exit(explicit: Option<&Path>, home: Option<&Path>) -> Settings {
    die!(load_settings(&FsStorage, explicit, home), "Error: {}")
}

/// Move a legacy custom words file into place; failures only warn.
pub fn migrate_custom_words(storage: &dyn Storage, settings: &Settings, home: Option<&Path>) {
    let Some(legacy) = settings.legacy_custom_words_path(home) else {
        return;
    };
    let target = settings.custom_words_path(home);
    if let Err(e) = migrate_legacy(storage, &legacy, &target) {
        warn!(from = %legacy.display(), "custom words migration failed: {e}");
    }
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(FsStorage.read_to_string(Path::new(file)), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: languages={:?}, history.enabled={}, picker.command={}, picker.delimiter={:?}",
        s.language_priority(),
        s.history.enabled,
        s.picker.command,
        s.picker.delimiter
    );
}
