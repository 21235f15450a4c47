// ============================================
// Deck Module
// ============================================
//
// Closes the recommendation loop:
// 1. Check-in stores a mood signal
// 2. Opening the deck ranks the catalog with that signal + preferences
// 3. Each swipe feeds the preference store and advances the cursor
// 4. Reset re-ranks with whatever the preferences are now

pub mod recommender;
pub mod session;

pub use recommender::Recommender;
pub use session::DeckSession;
