pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::StoreError;
pub use models::{Card, CardAction, CardType, MoodSignal, ScoredCard, SwipeDirection, SwipeOutcome};
pub use services::{
    DeckSession, MoodSignalStore, PreferenceRecord, PreferenceStore, RankingLayer, Recommender,
    TagWeights,
};
pub use storage::{FileStore, InMemoryStore, KeyValueStore};
