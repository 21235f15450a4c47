// ============================================
// Key/Value Storage Adapter
// ============================================
//
// Best-effort string key/value persistence the preference and mood signal
// stores write through. Two backends:
// - InMemoryStore: process-local, used by tests and ephemeral sessions
// - FileStore: one JSON file per key under a data directory
//
// Stores above this seam never surface a StoreError to their callers.

use crate::error::{Result, StoreError};
use dashmap::DashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Synchronous string key/value storage.
#[cfg_attr(test, automock)]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites any existing value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: DashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: `<root>/<sanitized key>.json`.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// reader sees either the previous value or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates the data directory if it does not exist yet.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            StoreError::Unavailable(format!("cannot create {}: {}", root.display(), e))
        })?;

        debug!(root = %root.display(), "File store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let bytes = match fs::read(self.path_for(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Bytes that are not text are a damaged value, not an I/O failure
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| StoreError::corrupt(key, e))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!(key = key, bytes = value.len(), "Value written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Maps a key like `nuera:prefs:v1` to a portable file stem.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_roundtrip() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_overwrite_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();

        assert_eq!(store.get("nuera:prefs:v1").unwrap(), None);

        store.set("nuera:prefs:v1", r#"{"meditation":1}"#).unwrap();
        store.set("nuera:prefs:v1", r#"{"meditation":2}"#).unwrap();
        assert_eq!(
            store.get("nuera:prefs:v1").unwrap().as_deref(),
            Some(r#"{"meditation":2}"#)
        );
        assert!(store.root().join("nuera_prefs_v1.json").exists());
        assert!(!store.root().join("nuera_prefs_v1.json.tmp").exists());

        store.remove("nuera:prefs:v1").unwrap();
        store.remove("nuera:prefs:v1").unwrap();
        assert_eq!(store.get("nuera:prefs:v1").unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::open(dir.path())
            .unwrap()
            .set("nuera:last_moods:v1", "null")
            .unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("nuera:last_moods:v1").unwrap().as_deref(),
            Some("null")
        );
    }

    #[test]
    fn test_file_store_invalid_utf8_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(store.root().join("nuera_prefs_v1.json"), [0xff, 0xfe, 0x7b]).unwrap();

        let err = store.get("nuera:prefs:v1").unwrap_err();
        assert!(err.is_corrupt());
        assert!(err.to_string().contains("nuera:prefs:v1"));
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("nuera:prefs:v1"), "nuera_prefs_v1");
        assert_eq!(sanitize_key("a/b\\c"), "a_b_c");
    }
}
