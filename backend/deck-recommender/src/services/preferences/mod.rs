// ============================================
// Preference Store
// ============================================
//
// Longitudinal per-content-type affinity built from swipe feedback.
// Asymmetric: a like adds 1, a dismissal subtracts 0.5.
//
// Persisted layout: flat JSON object, content type → number.
// The older `{"typeScore": {...}}` wrapper is still accepted on read.

use crate::error::{Result, StoreError};
use crate::models::{Card, CardType};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Score added to a card's type on a positive swipe.
pub const POSITIVE_FEEDBACK_DELTA: f64 = 1.0;

/// Score removed from a card's type on a negative swipe.
pub const NEGATIVE_FEEDBACK_PENALTY: f64 = 0.5;

/// Content type → accumulated affinity. Unbounded in both directions.
///
/// Keys are kept as strings so entries for types this build does not know
/// survive a read-modify-write cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceRecord(BTreeMap<String, f64>);

impl PreferenceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for `card_type`, 0 when never recorded.
    pub fn score(&self, card_type: CardType) -> f64 {
        self.0.get(card_type.as_str()).copied().unwrap_or(0.0)
    }

    /// Adds `delta` to the type's score, creating it at 0 first. Returns the new score.
    pub fn adjust(&mut self, card_type: CardType, delta: f64) -> f64 {
        let entry = self.0.entry(card_type.as_str().to_string()).or_insert(0.0);
        *entry += delta;
        *entry
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(t, s)| (t.as_str(), *s))
    }
}

impl<const N: usize> From<[(CardType, f64); N]> for PreferenceRecord {
    fn from(entries: [(CardType, f64); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(t, s)| (t.as_str().to_string(), s))
                .collect(),
        )
    }
}

/// Either layout, or both at once: a `typeScore` wrapper next to flat keys.
#[derive(Deserialize)]
struct PersistedPreferences {
    #[serde(rename = "typeScore", default)]
    type_score: Option<BTreeMap<String, f64>>,
    #[serde(flatten)]
    flat: BTreeMap<String, f64>,
}

impl From<PersistedPreferences> for PreferenceRecord {
    fn from(persisted: PersistedPreferences) -> Self {
        // Flat keys are the current layout and win over wrapped ones
        let mut scores = persisted.type_score.unwrap_or_default();
        scores.extend(persisted.flat);
        PreferenceRecord(scores)
    }
}

/// Decodes a persisted preference blob.
pub fn parse_record(key: &str, raw: &str) -> Result<PreferenceRecord> {
    serde_json::from_str::<PersistedPreferences>(raw)
        .map(PreferenceRecord::from)
        .map_err(|e| StoreError::corrupt(key, e))
}

/// Swipe-driven preference persistence over a key/value store.
#[derive(Clone)]
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Reads the record, keeping "nothing stored" (`Ok(None)`) apart from
    /// "stored but unreadable" (`Err`).
    pub fn read(&self) -> Result<Option<PreferenceRecord>> {
        match self.store.get(&self.key)? {
            Some(raw) => parse_record(&self.key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Current record; empty when nothing is stored or the data is unreadable.
    pub fn load(&self) -> PreferenceRecord {
        match self.read() {
            Ok(Some(record)) => record,
            Ok(None) => PreferenceRecord::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Preference data unreadable, using empty record");
                PreferenceRecord::new()
            }
        }
    }

    /// Best-effort write; failures are logged and dropped.
    fn save(&self, record: &PreferenceRecord) {
        let result = serde_json::to_string(record)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(&self.key, &json));

        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "Failed to persist preferences");
        }
    }

    fn apply(&self, card_type: CardType, delta: f64) -> f64 {
        let mut record = self.load();
        let score = record.adjust(card_type, delta);
        self.save(&record);

        debug!(card_type = %card_type, delta = delta, score = score, "Preference updated");
        score
    }

    /// Drops the stored record. Failures are logged and dropped.
    pub fn clear(&self) {
        match self.store.remove(&self.key) {
            Ok(()) => info!(key = %self.key, "Preferences cleared"),
            Err(e) => warn!(key = %self.key, error = %e, "Failed to clear preferences"),
        }
    }

    /// Like: the card's type gains `POSITIVE_FEEDBACK_DELTA`. Returns the new type score.
    pub fn record_positive(&self, card: &Card) -> f64 {
        let score = self.apply(card.card_type, POSITIVE_FEEDBACK_DELTA);
        info!(card_id = %card.id, card_type = %card.card_type, score = score, "Positive feedback recorded");
        score
    }

    /// Dismissal: the card's type loses `NEGATIVE_FEEDBACK_PENALTY`. Returns the new type score.
    pub fn record_negative(&self, card: &Card) -> f64 {
        let score = self.apply(card.card_type, -NEGATIVE_FEEDBACK_PENALTY);
        info!(card_id = %card.id, card_type = %card.card_type, score = score, "Negative feedback recorded");
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryStore, MockKeyValueStore};

    const KEY: &str = "nuera:prefs:v1";

    fn store() -> (Arc<InMemoryStore>, PreferenceStore) {
        let backend = Arc::new(InMemoryStore::new());
        let prefs = PreferenceStore::new(backend.clone(), KEY);
        (backend, prefs)
    }

    fn card(card_type: CardType) -> Card {
        Card::new(format!("card_{}", card_type), card_type, "Test")
    }

    #[test]
    fn test_empty_when_never_written() {
        let (_, prefs) = store();
        assert!(matches!(prefs.read(), Ok(None)));
        assert!(prefs.load().is_empty());
    }

    #[test]
    fn test_positive_and_negative_are_asymmetric() {
        let (_, prefs) = store();
        let breathing = card(CardType::Breathing);

        assert_eq!(prefs.record_positive(&breathing), 1.0);
        assert_eq!(prefs.record_positive(&breathing), 2.0);
        assert_eq!(prefs.record_negative(&breathing), 1.5);

        let record = prefs.load();
        assert_eq!(record.score(CardType::Breathing), 1.5);
        assert_eq!(record.score(CardType::Meditation), 0.0);
    }

    #[test]
    fn test_negative_on_fresh_type_goes_below_zero() {
        let (_, prefs) = store();
        let cbt = card(CardType::Cbt);

        prefs.record_negative(&cbt);
        prefs.record_negative(&cbt);
        prefs.record_negative(&cbt);
        assert_eq!(prefs.load().score(CardType::Cbt), -1.5);
    }

    #[test]
    fn test_persisted_layout_is_flat() {
        let (backend, prefs) = store();
        prefs.record_positive(&card(CardType::Meditation));
        prefs.record_negative(&card(CardType::Sleep));

        let raw = backend.get(KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json, serde_json::json!({ "meditation": 1.0, "sleep": -0.5 }));
    }

    #[test]
    fn test_reads_legacy_layout() {
        let (backend, prefs) = store();
        backend
            .set(KEY, r#"{"typeScore":{"breathing":3,"gratitude":-0.5}}"#)
            .unwrap();

        let record = prefs.load();
        assert_eq!(record.score(CardType::Breathing), 3.0);
        assert_eq!(record.score(CardType::Gratitude), -0.5);

        // Next write migrates to the flat layout
        prefs.record_positive(&card(CardType::Breathing));
        let raw = backend.get(KEY).unwrap().unwrap();
        assert!(!raw.contains("typeScore"));
        assert_eq!(prefs.load().score(CardType::Breathing), 4.0);
    }

    #[test]
    fn test_mixed_layout_keeps_every_key() {
        let (backend, prefs) = store();
        backend
            .set(KEY, r#"{"typeScore":{"breathing":1,"sleep":4},"meditation":3,"sleep":2}"#)
            .unwrap();

        let record = prefs.load();
        assert_eq!(record.score(CardType::Meditation), 3.0);
        assert_eq!(record.score(CardType::Sleep), 2.0);

        prefs.record_positive(&card(CardType::Breathing));

        let raw = backend.get(KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "breathing": 2.0, "meditation": 3.0, "sleep": 2.0 })
        );
    }

    #[test]
    fn test_clear_removes_record() {
        let (backend, prefs) = store();
        prefs.record_positive(&card(CardType::Companion));

        prefs.clear();
        assert!(backend.is_empty());
        assert!(matches!(prefs.read(), Ok(None)));
    }

    #[test]
    fn test_unknown_types_survive_updates() {
        let (backend, prefs) = store();
        backend.set(KEY, r#"{"yoga":2.5}"#).unwrap();

        prefs.record_positive(&card(CardType::Companion));

        let raw = backend.get(KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json, serde_json::json!({ "companion": 1.0, "yoga": 2.5 }));
    }

    #[test]
    fn test_corrupt_data_is_distinct_from_missing() {
        let (backend, prefs) = store();

        for raw in ["not json", "[1,2,3]", r#"{"meditation":"lots"}"#, "null"] {
            backend.set(KEY, raw).unwrap();
            let err = prefs.read().unwrap_err();
            assert!(err.is_corrupt(), "{} should be corrupt", raw);
            assert!(prefs.load().is_empty());
        }
    }

    #[test]
    fn test_corrupt_data_is_replaced_on_next_write() {
        let (backend, prefs) = store();
        backend.set(KEY, "{{{").unwrap();

        assert_eq!(prefs.record_positive(&card(CardType::Perspective)), 1.0);
        assert_eq!(prefs.load().score(CardType::Perspective), 1.0);
    }

    #[test]
    fn test_read_failure_degrades_to_empty() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .returning(|_| Err(StoreError::Unavailable("storage disabled".to_string())));

        let prefs = PreferenceStore::new(Arc::new(mock), KEY);
        assert!(prefs.read().is_err());
        assert!(prefs.load().is_empty());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set()
            .times(1)
            .returning(|_, _| Err(StoreError::Io("quota exceeded".to_string())));

        let prefs = PreferenceStore::new(Arc::new(mock), KEY);
        assert_eq!(prefs.record_positive(&card(CardType::Meditation)), 1.0);
    }
}
