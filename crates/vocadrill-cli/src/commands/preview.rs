//! The `vocadrill preview` command.
//!
//! Loads a challenge and prints what the generator would serve, without
//! opening a session or submitting anything.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use vocadrill_client::{load_config_from, MetadataClient};
use vocadrill_core::engine::ChallengeEngine;
use vocadrill_core::generator::{self, Prompt};
use vocadrill_core::model::ChallengeKind;

pub async fn execute(
    kind: String,
    challenge: String,
    drill: String,
    seed: Option<u64>,
    base_url: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let kind: ChallengeKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let config = load_config_from(config_path.as_deref())?;
    let base_url = base_url.unwrap_or_else(|| config.base_url.clone());

    let engine = ChallengeEngine::new(MetadataClient::new(base_url));
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let loaded = engine.load(&challenge, &drill).await;
    let questions = generator::generate(
        kind,
        &challenge,
        &loaded.words,
        &loaded.set_entries,
        &loaded.score_rows,
        &mut rng,
    );

    if questions.is_empty() {
        println!("No playable items found for this challenge.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Word", "Prompt", "Detail"]);
    for (i, q) in questions.iter().enumerate() {
        let detail = match &q.prompt {
            Prompt::ContextQuiz { options, .. } => format!("options: {}", options.join(", ")),
            Prompt::MatchMeaning { meaning } => meaning.clone(),
            Prompt::WordScramble { letters } => letters.iter().collect(),
            Prompt::FlashcardBlitz { column, speed, .. } => {
                format!("column {column}, speed {speed}")
            }
            Prompt::SpeedTyper { ticks, .. } => format!("{ticks} ticks on the clock"),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&q.word),
            Cell::new(&q.question_text),
            Cell::new(detail),
        ]);
    }

    println!("{table}");
    println!("{} playable items for {kind}.", questions.len());
    Ok(())
}
