//! Static content registry shipped with the app.
//!
//! Tag vocabulary the recommender matches on:
//! - `mindfulness`: present-focus meditations
//! - `calm`: soothing content
//! - `breath`: breathing techniques
//! - `gratitude`: gratitude reflection
//! - `focus`: attention support
//! - `sleep`: wind-down
//! - `companion`: talk support
//! - `energize`: uplifting content

use crate::models::{Card, CardAction, CardType};

/// The default deck, in its canonical (unranked) order.
pub fn seed_cards() -> Vec<Card> {
    vec![
        Card::new("card_mindful5", CardType::Meditation, "5-Minute Mindfulness")
            .with_subtitle("Center yourself and breathe")
            .with_content(
                "Take a moment to center yourself with this gentle meditation. \
                 Focus on your breath and let your thoughts flow freely.",
            )
            .with_image("assets/meditation-card.png")
            .with_duration(Some(300), "5 min")
            .with_tags(["mindfulness", "calm"])
            .with_action(CardAction::OpenMeditation {
                meditation_id: "mindful5".to_string(),
            }),
        Card::new("card_calm2", CardType::Meditation, "2-Minute Calm")
            .with_subtitle("Quick reset for busy moments")
            .with_content(
                "A short but powerful meditation to reset your mind and find \
                 instant calm wherever you are.",
            )
            .with_image("assets/meditation-card.png")
            .with_duration(Some(120), "2 min")
            .with_tags(["calm", "mindfulness"])
            .with_action(CardAction::OpenMeditation {
                meditation_id: "calm2".to_string(),
            }),
        Card::new("card_breathing", CardType::Breathing, "Box Breathing")
            .with_content(
                "Try this simple technique: Inhale 4, hold 4, exhale 4, hold 4. \
                 Repeat to find your calm.",
            )
            .with_image("assets/breathing-card.png")
            .with_duration(Some(180), "3 min")
            .with_tags(["breath", "calm", "focus"])
            .with_action(CardAction::OpenBreath {
                pattern_id: "box44".to_string(),
            }),
        Card::new("card_gratitude", CardType::Perspective, "Gratitude Reflection")
            .with_content(
                "What are three things you're grateful for today? Write them down \
                 and reflect on why they matter to you.",
            )
            .with_image("assets/journal-card.png")
            .with_duration(Some(180), "3 min")
            .with_tags(["gratitude", "mindfulness"]),
        Card::new("card_companion", CardType::Companion, "AI Companion Chat")
            .with_subtitle("Here to listen, anytime")
            .with_content(
                "I'm here to listen and support you. What's on your mind today? \
                 Share your thoughts and feelings in a safe space.",
            )
            .with_image("assets/companion-card.svg")
            .with_duration(None, "Open")
            .with_tags(["companion", "support", "chat", "mindfulness"])
            .with_action(CardAction::OpenCompanion),
    ]
}

/// Looks a card up by id.
pub fn find_card<'a>(cards: &'a [Card], id: &str) -> Option<&'a Card> {
    cards.iter().find(|card| card.id == id)
}
