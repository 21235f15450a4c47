use super::Recommender;
use crate::models::{Card, SwipeDirection, SwipeOutcome};
use tracing::debug;

/// Cursor over a ranked deck.
///
/// The order is fixed when the deck opens; swipes update preferences but
/// only `reset` re-ranks. Swiping past the last card wraps to the first.
#[derive(Debug, Clone)]
pub struct DeckSession {
    cards: Vec<Card>,
    position: usize,
}

impl DeckSession {
    /// Ranks `catalog` with the stored mood signal and current preferences.
    pub fn open(recommender: &Recommender, catalog: &[Card]) -> Self {
        Self {
            cards: recommender.rank_for_last_signal(catalog),
            position: 0,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&Card> {
        self.cards.get(self.position)
    }

    /// Records feedback for the current card and moves to the next one.
    ///
    /// Returns `None` for an empty deck.
    pub fn swipe(
        &mut self,
        recommender: &Recommender,
        direction: SwipeDirection,
    ) -> Option<SwipeOutcome> {
        let card = self.cards.get(self.position)?;
        let outcome = recommender.record_swipe(card, direction);

        self.position = if self.position + 1 < self.cards.len() {
            self.position + 1
        } else {
            0
        };

        debug!(
            card_id = %outcome.card_id,
            next_position = self.position,
            "Deck advanced"
        );
        Some(outcome)
    }

    /// Re-ranks from the latest signal and preferences and rewinds.
    pub fn reset(&mut self, recommender: &Recommender, catalog: &[Card]) {
        self.cards = recommender.rank_for_last_signal(catalog);
        self.position = 0;
    }
}
