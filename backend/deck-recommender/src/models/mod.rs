use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Closed set of content categories a card can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Meditation,
    Breathing,
    Cbt,
    Companion,
    Sleep,
    Perspective,
    Gratitude,
}

impl CardType {
    pub const ALL: [CardType; 7] = [
        CardType::Meditation,
        CardType::Breathing,
        CardType::Cbt,
        CardType::Companion,
        CardType::Sleep,
        CardType::Perspective,
        CardType::Gratitude,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Meditation => "meditation",
            CardType::Breathing => "breathing",
            CardType::Cbt => "cbt",
            CardType::Companion => "companion",
            CardType::Sleep => "sleep",
            CardType::Perspective => "perspective",
            CardType::Gratitude => "gratitude",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        CardType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| format!("unknown card type: {}", s))
    }
}

/// What a card opens when the user swipes right on it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardAction {
    OpenMeditation { meditation_id: String },
    OpenBreath { pattern_id: String },
    OpenCbt { tip_id: String },
    OpenCompanion,
    OpenSleep { routine_id: String },
    OpenGratitude,
    #[default]
    #[serde(rename = "none")]
    NoAction,
}

impl CardAction {
    /// Route the UI should navigate to after a positive swipe.
    ///
    /// CBT tips, sleep routines and the companion have no screen yet and
    /// resolve to `None`, as does a card without an action.
    pub fn navigation_target(&self) -> Option<String> {
        match self {
            CardAction::OpenMeditation { meditation_id } => {
                Some(format!("/meditation/{}", meditation_id))
            }
            CardAction::OpenBreath { pattern_id } => Some(format!("/breathing/{}", pattern_id)),
            CardAction::OpenGratitude => Some("/gratitude/new".to_string()),
            CardAction::OpenCbt { .. }
            | CardAction::OpenCompanion
            | CardAction::OpenSleep { .. }
            | CardAction::NoAction => None,
        }
    }
}

/// A unit of content in the deck.
///
/// Only `card_type` and `tags` take part in ranking; the display fields are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub action: CardAction,
}

impl Card {
    pub fn new(id: impl Into<String>, card_type: CardType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            card_type,
            title: title.into(),
            subtitle: None,
            content: None,
            image_url: None,
            duration_sec: None,
            duration: None,
            tags: BTreeSet::new(),
            action: CardAction::NoAction,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Sets both the machine duration and its display label.
    pub fn with_duration(mut self, duration_sec: Option<u32>, label: impl Into<String>) -> Self {
        self.duration_sec = duration_sec;
        self.duration = Some(label.into());
        self
    }

    pub fn with_action(mut self, action: CardAction) -> Self {
        self.action = action;
        self
    }
}

/// The user's self-reported state captured at mood check-in.
///
/// `moods` has set semantics: selecting the same mood twice counts once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSignal {
    #[serde(default)]
    pub moods: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl MoodSignal {
    pub fn new<I, S>(moods: I, text: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            moods: moods.into_iter().map(Into::into).collect(),
            text,
        }
    }

    pub fn from_moods<I, S>(moods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(moods, None)
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            moods: BTreeSet::new(),
            text: Some(text.into()),
        }
    }

    /// Builds the signal a check-in submits.
    ///
    /// Returns `None` when nothing was selected and the text is blank, since
    /// the check-in cannot be completed in that state. Blank text is dropped.
    pub fn from_check_in<I, S>(moods: I, text: Option<&str>) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let moods: BTreeSet<String> = moods
            .into_iter()
            .map(Into::into)
            .filter(|m: &String| !m.trim().is_empty())
            .collect();
        let text = text
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.to_string());

        if moods.is_empty() && text.is_none() {
            return None;
        }

        Some(Self { moods, text })
    }
}

/// Binary swipe feedback from the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Positive: the user wants this card.
    Right,
    /// Negative: dismissed.
    Left,
}

impl SwipeDirection {
    pub fn is_positive(&self) -> bool {
        matches!(self, SwipeDirection::Right)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Right => "right",
            SwipeDirection::Left => "left",
        }
    }
}

impl FromStr for SwipeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "right" | "positive" | "like" => Ok(SwipeDirection::Right),
            "left" | "negative" | "dismiss" => Ok(SwipeDirection::Left),
            other => Err(format!("unknown swipe direction: {}", other)),
        }
    }
}

/// A card with the score it was ranked by and how that score was built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCard {
    pub card: Card,
    pub score: f64,
    /// Weighted contribution of mood-derived tag matches
    pub tag_score: f64,
    /// Weighted contribution of the stored type preference
    pub preference_score: f64,
    /// Card tags that carried a non-zero weight, in tag order
    pub matched_tags: Vec<String>,
}

/// Result of feeding one swipe back into the preference store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwipeOutcome {
    pub card_id: String,
    pub card_type: CardType,
    pub direction: SwipeDirection,
    /// Type score after this swipe was applied
    pub type_score: f64,
    pub navigation_target: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
