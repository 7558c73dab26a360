//! User-maintained word list.
//!
//! The custom words file uses the ordinary dictionary line grammar, so it may
//! hold aliases and commands as well as plain words. Lines are kept verbatim
//! and in order; the file is rewritten atomically on save.

use std::io;
use std::path::Path;

use tracing::info;

use crate::storage::Storage;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomWords {
    lines: Vec<String>,
}

impl CustomWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open from file, returning an empty list if the file doesn't exist.
    pub fn open(storage: &dyn Storage, path: &Path) -> Result<Self, io::Error> {
        match storage.read_to_string(path) {
            Ok(text) => Ok(Self {
                lines: text
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e),
        }
    }

    /// Add a line. Returns `true` if newly added, `false` if already present.
    pub fn register(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() || self.lines.iter().any(|l| l == line) {
            return false;
        }
        self.lines.push(line.to_string());
        true
    }

    /// Remove a line. Returns `true` if removed, `false` if not found.
    pub fn unregister(&mut self, line: &str) -> bool {
        let line = line.trim();
        let before = self.lines.len();
        self.lines.retain(|l| l != line);
        self.lines.len() < before
    }

    pub fn list(&self) -> &[String] {
        &self.lines
    }

    pub fn save(&self, storage: &dyn Storage, path: &Path) -> Result<(), io::Error> {
        let mut contents = String::new();
        for line in &self.lines {
            contents.push_str(line);
            contents.push('\n');
        }
        storage.replace(path, &contents)
    }
}

/// Move a custom words file from its legacy location into place. Does
/// nothing if there is no legacy file or the target already exists.
pub fn migrate_legacy(storage: &dyn Storage, legacy: &Path, target: &Path) -> io::Result<bool> {
    if !storage.is_file(legacy) || storage.is_file(target) {
        return Ok(false);
    }
    storage.rename(legacy, target)?;
    info!(from = %legacy.display(), to = %target.display(), "moved custom words");
    Ok(true)
}
