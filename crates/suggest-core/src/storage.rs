//! File access seam.
//!
//! Every read and write the engine performs goes through [`Storage`], so the
//! whole pipeline can run against [`MemoryStorage`] in tests.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

pub trait Storage: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Append `line` plus a newline in a single write, then flush.
    fn append_line(&self, path: &Path, line: &str) -> io::Result<()>;

    /// Replace the whole file atomically.
    fn replace(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Regular files directly inside `dir`, sorted by path.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    fn is_file(&self, path: &Path) -> bool;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn append_line(&self, path: &Path, line: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(buf.as_bytes())?;
        file.flush()
    }

    /// Atomic write: write to .tmp then rename.
    fn replace(&self, path: &Path, contents: &str) -> io::Result<()> {
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(from, to)
    }
}

/// In-memory files keyed by path. Writes can be switched off to exercise
/// failure paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RwLock<BTreeMap<PathBuf, String>>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), contents.into());
        self
    }

    /// Every subsequent write fails with `PermissionDenied`.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    fn check_writable(&self, path: &Path) -> io::Result<()> {
        if self.read_only {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }
        Ok(())
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file", path.display()),
    )
}

impl Storage for MemoryStorage {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.contents(path).ok_or_else(|| not_found(path))
    }

    fn append_line(&self, path: &Path, line: &str) -> io::Result<()> {
        self.check_writable(path)?;
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        let file = files.entry(path.to_path_buf()).or_default();
        file.push_str(line);
        file.push('\n');
        Ok(())
    }

    fn replace(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.check_writable(path)?;
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        let listed: Vec<PathBuf> = files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect();
        if listed.is_empty() {
            return Err(not_found(dir));
        }
        Ok(listed)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.contents(path).is_some()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.check_writable(to)?;
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        let contents = files.remove(from).ok_or_else(|| not_found(from))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_append_creates_parent_and_writes_one_line_each() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.txt");
        FsStorage.append_line(&path, "apple").unwrap();
        FsStorage.append_line(&path, "apply").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "apple\napply\n");
    }

    #[test]
    fn fs_replace_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        FsStorage.replace(&path, "one\n").unwrap();
        FsStorage.replace(&path, "two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two\n");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn fs_list_dir_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let listed = FsStorage.list_dir(dir.path()).unwrap();
        assert_eq!(
            listed,
            vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
        );
    }

    #[test]
    fn memory_list_dir_direct_children() {
        let storage = MemoryStorage::new()
            .with_file("/d/English/b.txt", "")
            .with_file("/d/English/a.txt", "")
            .with_file("/d/English/deep/c.txt", "");
        let listed = storage.list_dir(Path::new("/d/English")).unwrap();
        assert_eq!(
            listed,
            vec![
                PathBuf::from("/d/English/a.txt"),
                PathBuf::from("/d/English/b.txt")
            ]
        );
        assert!(storage.list_dir(Path::new("/d/Bangla")).is_err());
    }

    #[test]
    fn memory_read_only_rejects_writes() {
        let storage = MemoryStorage::new().read_only();
        let err = storage
            .append_line(Path::new("/h.txt"), "x")
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(storage.contents(Path::new("/h.txt")).is_none());
    }

    #[test]
    fn memory_rename_moves_contents() {
        let storage = MemoryStorage::new().with_file("/old.txt", "w\n");
        storage
            .rename(Path::new("/old.txt"), Path::new("/new/words.txt"))
            .unwrap();
        assert!(!storage.is_file(Path::new("/old.txt")));
        assert_eq!(
            storage.contents(Path::new("/new/words.txt")).as_deref(),
            Some("w\n")
        );
    }
}
