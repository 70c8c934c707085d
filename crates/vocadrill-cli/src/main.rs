//! vocadrill CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vocadrill", version, about = "Vocabulary drill-challenge client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a drill challenge
    Play {
        /// Challenge variant: context-master, match-meaning, word-scramble,
        /// flashcard-blitz, or speed-typer
        #[arg(long)]
        kind: String,

        /// Challenge refId
        #[arg(long)]
        challenge: String,

        /// Drill refId
        #[arg(long)]
        drill: String,

        /// Seed for deterministic shuffles
        #[arg(long)]
        seed: Option<u64>,

        /// Base URL of the drill-metadata service (overrides config)
        #[arg(long)]
        base_url: Option<String>,

        /// Directory for session reports (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip writing the session report
        #[arg(long)]
        no_report: bool,
    },

    /// Fetch a challenge and print its generated questions without playing
    Preview {
        /// Challenge variant
        #[arg(long)]
        kind: String,

        /// Challenge refId
        #[arg(long)]
        challenge: String,

        /// Drill refId
        #[arg(long)]
        drill: String,

        /// Seed for deterministic shuffles
        #[arg(long)]
        seed: Option<u64>,

        /// Base URL of the drill-metadata service (overrides config)
        #[arg(long)]
        base_url: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vocadrill=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            kind,
            challenge,
            drill,
            seed,
            base_url,
            output,
            config,
            no_report,
        } => {
            commands::play::execute(
                kind, challenge, drill, seed, base_url, output, config, no_report,
            )
            .await
        }
        Commands::Preview {
            kind,
            challenge,
            drill,
            seed,
            base_url,
            config,
        } => commands::preview::execute(kind, challenge, drill, seed, base_url, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
