use crate::config::{Config, StorageKeys};
use crate::error::Result;
use crate::models::{Card, MoodSignal, ScoredCard, SwipeDirection, SwipeOutcome};
use crate::services::mood_signal::MoodSignalStore;
use crate::services::preferences::{PreferenceRecord, PreferenceStore};
use crate::services::ranking::RankingLayer;
use crate::services::tag_inference::{infer_tags, TagWeights};
use crate::storage::{FileStore, InMemoryStore, KeyValueStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Recommendation context: both persisted stores plus the ranking layer.
///
/// Every operation reads storage fresh, so feedback recorded between two
/// calls is reflected in the second one.
#[derive(Clone)]
pub struct Recommender {
    preferences: PreferenceStore,
    moods: MoodSignalStore,
    ranking: RankingLayer,
}

impl Recommender {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: &StorageKeys) -> Self {
        Self {
            preferences: PreferenceStore::new(store.clone(), keys.preferences.clone()),
            moods: MoodSignalStore::new(store, keys.last_mood_signal.clone()),
            ranking: RankingLayer::new(),
        }
    }

    /// Ephemeral context with default keys.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), &StorageKeys::default())
    }

    /// File-backed context under `config.data_dir`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = FileStore::open(&config.data_dir)?;
        Ok(Self::new(Arc::new(store), &config.storage_keys()))
    }

    pub fn preference_store(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn mood_store(&self) -> &MoodSignalStore {
        &self.moods
    }

    // ============================================
    // Ranking
    // ============================================

    /// The catalog in recommended order for `signal`.
    pub fn rank_cards(&self, catalog: &[Card], signal: Option<&MoodSignal>) -> Vec<Card> {
        let preferences = self.preferences.load();
        self.ranking.rank(catalog, signal, &preferences)
    }

    /// Same order as `rank_cards`, with each card's score breakdown.
    pub fn rank_scored(&self, catalog: &[Card], signal: Option<&MoodSignal>) -> Vec<ScoredCard> {
        let preferences = self.preferences.load();
        self.ranking.rank_scored(catalog, signal, &preferences)
    }

    /// Ranks with whatever signal the last check-in stored.
    pub fn rank_for_last_signal(&self, catalog: &[Card]) -> Vec<Card> {
        let signal = self.moods.get();
        debug!(has_signal = signal.is_some(), "Ranking deck for last mood signal");
        self.rank_cards(catalog, signal.as_ref())
    }

    /// Tag weights the stored signal currently produces.
    pub fn current_tag_weights(&self) -> TagWeights {
        self.moods
            .get()
            .map(|signal| infer_tags(&signal))
            .unwrap_or_default()
    }

    pub fn preferences(&self) -> PreferenceRecord {
        self.preferences.load()
    }

    // ============================================
    // Feedback
    // ============================================

    pub fn record_positive(&self, card: &Card) -> f64 {
        self.preferences.record_positive(card)
    }

    pub fn record_negative(&self, card: &Card) -> f64 {
        self.preferences.record_negative(card)
    }

    /// Applies one swipe and reports where a positive swipe leads.
    pub fn record_swipe(&self, card: &Card, direction: SwipeDirection) -> SwipeOutcome {
        let (type_score, navigation_target) = match direction {
            SwipeDirection::Right => (
                self.record_positive(card),
                card.action.navigation_target(),
            ),
            SwipeDirection::Left => (self.record_negative(card), None),
        };

        let outcome = SwipeOutcome {
            card_id: card.id.clone(),
            card_type: card.card_type,
            direction,
            type_score,
            navigation_target,
            recorded_at: Utc::now(),
        };

        info!(
            target: "analytics",
            event = "card_swiped",
            card_id = %outcome.card_id,
            card_type = %outcome.card_type,
            direction = outcome.direction.as_str(),
            type_score = outcome.type_score,
            "Swipe recorded"
        );

        outcome
    }

    // ============================================
    // Mood signal
    // ============================================

    pub fn set_last_mood_signal(&self, signal: &MoodSignal) {
        self.moods.set(signal);
    }

    pub fn get_last_mood_signal(&self) -> Option<MoodSignal> {
        self.moods.get()
    }

    /// Forgets the stored check-in and all swipe feedback.
    pub fn reset(&self) {
        self.moods.clear();
        self.preferences.clear();
    }

    /// Validates a check-in and stores the resulting signal.
    ///
    /// Returns `None` (and stores nothing) when no mood is selected and the
    /// text is blank.
    pub fn check_in<I, S>(&self, moods: I, text: Option<&str>) -> Option<MoodSignal>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let signal = MoodSignal::from_check_in(moods, text)?;
        self.set_last_mood_signal(&signal);
        Some(signal)
    }
}
