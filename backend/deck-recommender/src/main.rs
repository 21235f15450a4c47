use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deck_recommender::{
    catalog::{find_card, seed_cards},
    config::LogFormat,
    Config, Recommender, SwipeDirection,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "deck-recommender")]
#[command(about = "Mood-aware ranking for the wellness card deck")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a mood check-in for the next deck
    CheckIn {
        /// Selected mood (repeatable)
        #[arg(short, long = "mood")]
        moods: Vec<String>,

        /// Free text describing how you feel
        #[arg(short, long)]
        text: Option<String>,
    },
    /// Print the ranked deck for the stored check-in
    Deck {
        /// Show each card's score breakdown
        #[arg(long)]
        explain: bool,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Record a swipe on a card
    Swipe {
        card_id: String,

        /// right (like) or left (dismiss)
        direction: SwipeDirection,
    },
    /// Print per-type preference scores
    Prefs,
    /// Print the tag weights inferred from the stored check-in
    Tags,
    /// Forget the stored check-in and all swipe feedback
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let config = Config::from_env().context("Failed to load config")?;

    // Initialize tracing
    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (Some(fmt::layer().with_writer(std::io::stderr)), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_writer(std::io::stderr))),
    };
    tracing_subscriber::registry()
        .with(pretty)
        .with(json)
        .with(EnvFilter::from_default_env())
        .init();

    info!(
        service = %config.service_name,
        data_dir = %config.data_dir.display(),
        "Starting"
    );

    let recommender = Recommender::from_config(&config).with_context(|| {
        format!("Failed to open data directory {}", config.data_dir.display())
    })?;
    let catalog = seed_cards();

    match cli.command {
        Commands::CheckIn { moods, text } => {
            match recommender.check_in(moods, text.as_deref()) {
                Some(signal) => {
                    let moods: Vec<&str> = signal.moods.iter().map(String::as_str).collect();
                    println!("Checked in: moods=[{}]", moods.join(", "));
                    if let Some(text) = &signal.text {
                        println!("            text={:?}", text);
                    }
                }
                None => anyhow::bail!("Select at least one mood or describe how you feel"),
            }
        }
        Commands::Deck { explain, json } => {
            let signal = recommender.get_last_mood_signal();
            let scored = recommender.rank_scored(&catalog, signal.as_ref());

            if json {
                println!("{}", serde_json::to_string_pretty(&scored)?);
            } else {
                for (rank, entry) in scored.iter().enumerate() {
                    if explain {
                        println!(
                            "{:>2}. {:<16} {:>5.1}  (tags {:.1} [{}], preference {:.1})",
                            rank + 1,
                            entry.card.id,
                            entry.score,
                            entry.tag_score,
                            entry.matched_tags.join(", "),
                            entry.preference_score
                        );
                    } else {
                        println!("{:>2}. {} ({})", rank + 1, entry.card.title, entry.card.card_type);
                    }
                }
            }
        }
        Commands::Swipe { card_id, direction } => {
            let card = find_card(&catalog, &card_id)
                .with_context(|| format!("Unknown card: {}", card_id))?;
            let outcome = recommender.record_swipe(card, direction);

            println!(
                "{} {} -> {} score {:.1}",
                outcome.direction.as_str(),
                outcome.card_id,
                outcome.card_type,
                outcome.type_score
            );
            if let Some(target) = outcome.navigation_target {
                println!("open {}", target);
            }
        }
        Commands::Prefs => {
            let record = recommender.preferences();
            if record.is_empty() {
                println!("No preferences recorded yet");
            }
            for (card_type, score) in record.iter() {
                println!("{:<12} {:>6.1}", card_type, score);
            }
        }
        Commands::Tags => {
            let weights = recommender.current_tag_weights();
            if weights.is_empty() {
                println!("No tag weights (no check-in or nothing matched)");
            }
            for (tag, weight) in weights.iter() {
                println!("{:<12} {}", tag, weight);
            }
        }
        Commands::Reset => {
            recommender.reset();
            println!("Check-in and preferences cleared");
        }
    }

    Ok(())
}
