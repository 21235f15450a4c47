// ============================================
// Tag Inference Engine
// ============================================
//
// Converts a mood signal into content tag weights:
// 1. Each distinct selected mood adds 1 to every tag in its fixed mapping
// 2. Each keyword rule that matches the free text adds 1 to every tag in
//    its tag-set (rules are independent, all are evaluated)
//
// Pure: no storage, no clock.

use crate::models::MoodSignal;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tracing::debug;

/// Mood identifier → intent tags.
pub const MOOD_TAGS: &[(&str, &[&str])] = &[
    ("anxious", &["calm", "breath", "mindfulness"]),
    ("stressed", &["calm", "breath", "mindfulness"]),
    ("sad", &["mindfulness", "companion"]),
    ("angry", &["calm", "breath"]),
    ("overwhelmed", &["calm", "mindfulness", "gratitude"]),
    ("tired", &["sleep", "calm"]),
    ("wired", &["breath", "calm"]),
    ("unfocused", &["focus", "mindfulness", "breath"]),
    ("grateful", &["gratitude", "mindfulness"]),
    ("okay", &["mindfulness"]),
    ("happy", &["mindfulness", "gratitude", "energize"]),
    ("lonely", &["companion", "gratitude"]),
];

/// A free-text rule: fires once if its pattern matches anywhere in the text.
#[derive(Debug)]
pub struct KeywordRule {
    pub name: &'static str,
    pattern: Regex,
    pub tags: &'static [&'static str],
}

impl KeywordRule {
    /// Every entry in `words` must match a whole word, case-insensitively.
    fn new(name: &'static str, words: &[&str], tags: &'static [&'static str]) -> Self {
        let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();

        let source = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
        let pattern = Regex::new(&source).expect("Invalid keyword rule regex");

        Self {
            name,
            pattern,
            tags,
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Ordered keyword table for free text.
pub static KEYWORD_RULES: LazyLock<Vec<KeywordRule>> = LazyLock::new(|| {
    vec![
        KeywordRule::new(
            "anxiety",
            &["anxious", "anxiety", "panic", "worried"],
            &["calm", "breath", "mindfulness"],
        ),
        KeywordRule::new(
            "stress",
            &["stress", "stressed", "overwhelm", "pressure"],
            &["calm", "mindfulness", "breath"],
        ),
        KeywordRule::new(
            "low_mood",
            &["sad", "down", "depressed", "blue"],
            &["companion", "mindfulness"],
        ),
        KeywordRule::new("anger", &["angry", "rage", "frustrat"], &["calm", "breath"]),
        KeywordRule::new(
            "sleep",
            &["tired", "sleep", "insomnia", "awake"],
            &["sleep", "calm"],
        ),
        KeywordRule::new(
            "focus",
            &["focus", "distract", "procrast"],
            &["focus", "mindfulness", "breath"],
        ),
        KeywordRule::new(
            "gratitude",
            &["grateful", "thanks", "appreciat"],
            &["gratitude", "mindfulness"],
        ),
        KeywordRule::new("loneliness", &["lonely", "alone"], &["companion", "gratitude"]),
    ]
});

/// Tag → accumulated weight derived from one mood signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagWeights(BTreeMap<String, u32>);

impl TagWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight of `tag`, 0 when absent.
    pub fn weight(&self, tag: &str) -> u32 {
        self.0.get(tag).copied().unwrap_or(0)
    }

    pub fn add(&mut self, tag: &str) {
        *self.0.entry(tag.to_string()).or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(tag, weight)| (tag.as_str(), *weight))
    }
}

impl<const N: usize> From<[(&str, u32); N]> for TagWeights {
    fn from(entries: [(&str, u32); N]) -> Self {
        Self(
            entries
                .into_iter()
                .filter(|(_, w)| *w > 0)
                .map(|(t, w)| (t.to_string(), w))
                .collect(),
        )
    }
}

/// Tags mapped to a single mood identifier (case-insensitive).
pub fn tags_for_mood(mood: &str) -> &'static [&'static str] {
    let needle = mood.trim().to_lowercase();
    MOOD_TAGS
        .iter()
        .find(|(m, _)| *m == needle)
        .map(|(_, tags)| *tags)
        .unwrap_or(&[])
}

/// Rules whose pattern fires on `text`, in table order.
pub fn matching_rules(text: &str) -> Vec<&'static KeywordRule> {
    KEYWORD_RULES.iter().filter(|rule| rule.matches(text)).collect()
}

/// Computes the tag weight map for a mood signal.
pub fn infer_tags(signal: &MoodSignal) -> TagWeights {
    let mut weights = TagWeights::new();

    // Case variants of one mood collapse to a single selection
    let moods: BTreeSet<String> = signal
        .moods
        .iter()
        .map(|m| m.trim().to_lowercase())
        .collect();

    for mood in &moods {
        for tag in tags_for_mood(mood) {
            weights.add(tag);
        }
    }

    let mut fired = Vec::new();
    if let Some(text) = signal.text.as_deref() {
        for rule in matching_rules(text) {
            fired.push(rule.name);
            for tag in rule.tags {
                weights.add(tag);
            }
        }
    }

    debug!(
        moods = moods.len(),
        rules_fired = ?fired,
        tags = weights.len(),
        "Tag weights inferred"
    );

    weights
}
