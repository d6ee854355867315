use crate::error::{HabitError, Result};

use std::{
    collections::HashMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

pub const HABITS_KEY: &str = "habits";
pub const THEME_KEY: &str = "theme";

/// Durable string key-value storage. Each value is written whole.
pub trait KeyValueStore {
    /// `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens the directory, creating it when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|err| HabitError::storage(root.display().to_string(), err))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(HabitError::storage(key, err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Readers see either the old document or the new one, never half of it.
        let target = self.path_for(key);
        let staging = self.root.join(format!(".{key}.tmp"));
        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&staging)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&staging, &target)
        };
        write().map_err(|err| {
            let _ = fs::remove_file(&staging);
            HabitError::storage(key, err)
        })?;
        tracing::trace!(key, bytes = value.len(), "stored");
        Ok(())
    }
}

/// Volatile storage for tests and benchmarks.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Every later `set` fails, as a full disk would.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.read_only {
            return Err(HabitError::storage(
                key,
                std::io::Error::new(ErrorKind::PermissionDenied, "store is read only"),
            ));
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get(HABITS_KEY).unwrap(), None);
    }

    #[test]
    fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("nested")).unwrap();
        store.set(THEME_KEY, "dark").unwrap();
        store.set(THEME_KEY, "light").unwrap();

        let reopened = FileStore::open(dir.path().join("nested")).unwrap();
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert!(!dir.path().join("nested").join(".theme.tmp").exists());
    }

    #[test]
    fn read_only_memory_store_rejects_writes() {
        let mut store = MemoryStore::new().with_entry(THEME_KEY, "dark").read_only();
        assert!(store.set(THEME_KEY, "light").is_err());
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(store.writes(), 0);
    }
}
