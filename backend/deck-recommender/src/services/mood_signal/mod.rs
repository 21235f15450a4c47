// ============================================
// Mood Signal Store
// ============================================
//
// Holds the single most recent mood signal. Last write wins, no history.
// Persisted as `{"moods": [...], "text"?: "..."}` or `null`.

use crate::error::{Result, StoreError};
use crate::models::MoodSignal;
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct MoodSignalStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl MoodSignalStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Replaces the stored signal. Write failures are logged and dropped.
    pub fn set(&self, signal: &MoodSignal) {
        let result = serde_json::to_string(signal)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(&self.key, &json));

        match result {
            Ok(()) => info!(
                moods = ?signal.moods,
                has_text = signal.text.is_some(),
                "Mood signal stored"
            ),
            Err(e) => warn!(key = %self.key, error = %e, "Failed to persist mood signal"),
        }
    }

    /// Forgets the stored signal. Failures are logged and dropped.
    pub fn clear(&self) {
        match self.store.remove(&self.key) {
            Ok(()) => info!(key = %self.key, "Mood signal cleared"),
            Err(e) => warn!(key = %self.key, error = %e, "Failed to clear mood signal"),
        }
    }

    /// Reads the stored signal; `Ok(None)` for never-set or a persisted `null`,
    /// `Err` for unreadable data.
    pub fn read(&self) -> Result<Option<MoodSignal>> {
        match self.store.get(&self.key)? {
            Some(raw) => serde_json::from_str::<Option<MoodSignal>>(&raw)
                .map_err(|e| StoreError::corrupt(&self.key, e)),
            None => Ok(None),
        }
    }

    /// Stored signal, or `None` when absent or unreadable.
    pub fn get(&self) -> Option<MoodSignal> {
        match self.read() {
            Ok(signal) => signal,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Mood signal unreadable, treating as absent");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryStore, MockKeyValueStore};

    const KEY: &str = "nuera:last_moods:v1";

    fn store() -> (Arc<InMemoryStore>, MoodSignalStore) {
        let backend = Arc::new(InMemoryStore::new());
        let moods = MoodSignalStore::new(backend.clone(), KEY);
        (backend, moods)
    }

    #[test]
    fn test_absent_until_set() {
        let (_, moods) = store();
        assert!(matches!(moods.read(), Ok(None)));
        assert_eq!(moods.get(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let (_, moods) = store();
        moods.set(&MoodSignal::from_moods(["sad"]));
        moods.set(&MoodSignal::new(["happy"], Some("great day".to_string())));

        let signal = moods.get().unwrap();
        assert_eq!(signal.moods.iter().collect::<Vec<_>>(), vec!["happy"]);
        assert_eq!(signal.text.as_deref(), Some("great day"));
    }

    #[test]
    fn test_reads_raw_layout() {
        let (backend, moods) = store();
        backend
            .set(KEY, r#"{"moods":["anxious","tired"],"text":"long week"}"#)
            .unwrap();

        let signal = moods.get().unwrap();
        assert!(signal.moods.contains("anxious"));
        assert!(signal.moods.contains("tired"));
        assert_eq!(signal.text.as_deref(), Some("long week"));

        backend.set(KEY, r#"{"moods":[]}"#).unwrap();
        assert_eq!(moods.get(), Some(MoodSignal::default()));
    }

    #[test]
    fn test_persisted_null_is_absent() {
        let (backend, moods) = store();
        backend.set(KEY, "null").unwrap();
        assert!(matches!(moods.read(), Ok(None)));
    }

    #[test]
    fn test_corrupt_signal_degrades_to_absent() {
        let (backend, moods) = store();

        for raw in ["{not json", r#"{"moods":"anxious"}"#, "42"] {
            backend.set(KEY, raw).unwrap();
            assert!(moods.read().unwrap_err().is_corrupt(), "{} should be corrupt", raw);
            assert_eq!(moods.get(), None);
        }
    }

    #[test]
    fn test_clear_forgets_signal() {
        let (backend, moods) = store();
        moods.set(&MoodSignal::from_moods(["happy"]));

        moods.clear();
        assert!(backend.is_empty());
        assert_eq!(moods.get(), None);
    }

    #[test]
    fn test_clear_failure_is_swallowed() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_remove()
            .times(1)
            .returning(|_| Err(StoreError::Io("read-only".to_string())));

        MoodSignalStore::new(Arc::new(mock), KEY).clear();
    }

    #[test]
    fn test_storage_failures_do_not_escape() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .returning(|_| Err(StoreError::Unavailable("private mode".to_string())));
        mock.expect_set()
            .returning(|_, _| Err(StoreError::Io("read-only".to_string())));

        let moods = MoodSignalStore::new(Arc::new(mock), KEY);
        moods.set(&MoodSignal::from_moods(["okay"]));
        assert_eq!(moods.get(), None);
    }
}
