pub mod deck;
pub mod mood_signal;
pub mod preferences;
pub mod ranking;
pub mod tag_inference;

pub use deck::{DeckSession, Recommender};
pub use mood_signal::MoodSignalStore;
pub use preferences::{PreferenceRecord, PreferenceStore};
pub use ranking::RankingLayer;
pub use tag_inference::{infer_tags, TagWeights};
