//! Card Ranking Module
//!
//! Orders a card catalog for the current user state.
//!
//! # Scoring
//! `score = TAG_MATCH_WEIGHT × Σ W[tag] + PREFERENCE_WEIGHT × P[type]`
//!
//! - `W`: tag weights inferred from the mood signal (empty when absent)
//! - `P`: per-type preference record from swipe feedback
//!
//! Sorting is stable, so ties keep catalog order and the same inputs always
//! give the same deck.

use crate::models::{Card, MoodSignal, ScoredCard};
use crate::services::preferences::PreferenceRecord;
use crate::services::tag_inference::{infer_tags, TagWeights};
use tracing::debug;

/// Multiplier on the summed tag weights of a card.
pub const TAG_MATCH_WEIGHT: f64 = 2.0;

/// Multiplier on the stored preference for a card's type.
pub const PREFERENCE_WEIGHT: f64 = 1.0;

/// Ranking Layer - rule-based card scoring
#[derive(Debug, Default, Clone, Copy)]
pub struct RankingLayer;

impl RankingLayer {
    pub fn new() -> Self {
        Self
    }

    /// Scores one card and keeps the breakdown.
    pub fn score_card(
        &self,
        card: &Card,
        weights: &TagWeights,
        preferences: &PreferenceRecord,
    ) -> ScoredCard {
        let mut tag_total = 0u32;
        let mut matched_tags = Vec::new();

        for tag in &card.tags {
            let weight = weights.weight(tag);
            if weight > 0 {
                tag_total += weight;
                matched_tags.push(tag.clone());
            }
        }

        let tag_score = TAG_MATCH_WEIGHT * f64::from(tag_total);
        let preference_score = PREFERENCE_WEIGHT * preferences.score(card.card_type);

        ScoredCard {
            card: card.clone(),
            score: tag_score + preference_score,
            tag_score,
            preference_score,
            matched_tags,
        }
    }

    /// Scores every card and sorts by score descending; ties keep input order.
    pub fn score_cards(
        &self,
        cards: &[Card],
        weights: &TagWeights,
        preferences: &PreferenceRecord,
    ) -> Vec<ScoredCard> {
        let mut scored: Vec<ScoredCard> = cards
            .iter()
            .map(|card| self.score_card(card, weights, preferences))
            .collect();

        // Stable sort; scores come from finite JSON numbers, so never NaN
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            card_count = scored.len(),
            top_card = scored.first().map(|s| s.card.id.as_str()),
            top_score = scored.first().map(|s| s.score),
            "Cards scored"
        );

        scored
    }

    /// Explainable ranking for a mood signal (or none).
    pub fn rank_scored(
        &self,
        cards: &[Card],
        signal: Option<&MoodSignal>,
        preferences: &PreferenceRecord,
    ) -> Vec<ScoredCard> {
        let weights = signal.map(infer_tags).unwrap_or_default();
        self.score_cards(cards, &weights, preferences)
    }

    /// The catalog permuted into ranked order.
    pub fn rank(
        &self,
        cards: &[Card],
        signal: Option<&MoodSignal>,
        preferences: &PreferenceRecord,
    ) -> Vec<Card> {
        self.rank_scored(cards, signal, preferences)
            .into_iter()
            .map(|scored| scored.card)
            .collect()
    }
}
