//! Line-oriented dictionary files.

use std::io;
use std::path::{Path, PathBuf};

use crate::entry::{parse_entries, Entry};
use crate::storage::Storage;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source unavailable: {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Unavailable { path, .. } => path,
        }
    }
}

/// One dictionary file, parsed in file order.
#[derive(Debug, Clone)]
pub struct DictionarySource {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl DictionarySource {
    pub fn open(storage: &dyn Storage, path: &Path) -> Result<Self, SourceError> {
        let text = storage
            .read_to_string(path)
            .map_err(|source| SourceError::Unavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_text(path, &text))
    }

    pub fn from_text(path: &Path, text: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: parse_entries(text).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}
