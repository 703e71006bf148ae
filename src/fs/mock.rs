// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEntry {
    File,
    Dir,
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    removed: Vec<PathBuf>,
    fail_create_dir: bool,
}

/// In-memory filesystem for tests.
///
/// Clones share state, so a test can keep one handle for assertions while the
/// supervisor owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
    temp_counter: Arc<AtomicUsize>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.state.lock().unwrap();
        if let Some(parent) = path.parent() {
            insert_dirs(&mut state.entries, parent);
        }
        state.entries.insert(path, MockEntry::File);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        insert_dirs(&mut state.entries, path.as_ref());
    }

    /// Make every subsequent `create_dir_all` call fail.
    pub fn fail_dir_creation(&self) {
        self.state.lock().unwrap().fail_create_dir = true;
    }

    /// Paths passed to `remove_file`, in call order, whether or not they existed.
    pub fn removed(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().removed.clone()
    }

    pub fn entry(&self, path: impl AsRef<Path>) -> Option<MockEntry> {
        self.state.lock().unwrap().entries.get(path.as_ref()).copied()
    }
}

fn insert_dirs(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        entries
            .entry(ancestor.to_path_buf())
            .or_insert(MockEntry::Dir);
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.state.lock().unwrap().entries.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entry(path), Some(MockEntry::Dir))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create_dir {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        if let Some(MockEntry::File) = state.entries.get(path) {
            return Err(anyhow!("Is a file: {:?}", path));
        }
        insert_dirs(&mut state.entries, path);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.removed.push(path.to_path_buf());
        match state.entries.get(path) {
            Some(MockEntry::File) => {
                state.entries.remove(path);
                Ok(())
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn create_temp_dir(&self, prefix: &str) -> Result<PathBuf> {
        let n = self.temp_counter.fetch_add(1, Ordering::SeqCst);
        let path = PathBuf::from("/tmp").join(format!("{prefix}{n}"));
        self.add_dir(&path);
        Ok(path)
    }
}
