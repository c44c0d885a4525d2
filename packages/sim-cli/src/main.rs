//! Headless match runner - drives the session controller to completion
//! without a UI attached.
//!
//! Useful for eyeballing the demo pacing, checking reproducibility of
//! seeded matches, and batching matches for quick win-rate counts.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use client::services::remote_match::PollConfig;
use client::{
    ClientError, InMemoryOracle, Mode, NetworkConfig, RemoteMatchClient, SessionController,
    SessionSnapshot, SessionStatus, SimTiming, Winner,
};
use rand::prelude::*;
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "sim-cli")]
#[command(about = "Headless card duel runner")]
struct Args {
    /// Which driver to run the match against
    #[arg(long, default_value = "sim")]
    mode: RunMode,

    /// Number of matches to run
    #[arg(short, long, default_value = "1")]
    matches: u32,

    /// Deterministic dealing and bot play
    #[arg(long)]
    seed: Option<u64>,

    /// Collapse the demo pacing delays
    #[arg(long)]
    fast: bool,

    /// Emit one JSON summary per match instead of history lines
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RunMode {
    /// Local simulation, both sides auto-played
    Sim,
    /// In-memory oracle behind the remote client path
    Remote,
}

#[derive(Serialize)]
struct MatchSummary {
    mode: &'static str,
    match_id: Option<u64>,
    rounds: u8,
    player_score: u8,
    opponent_score: u8,
    winner: &'static str,
}

impl MatchSummary {
    fn from_snapshot(mode: RunMode, snap: &SessionSnapshot) -> Self {
        Self {
            mode: match mode {
                RunMode::Sim => "sim",
                RunMode::Remote => "remote",
            },
            match_id: snap.match_id,
            rounds: snap.round,
            player_score: snap.player_score,
            opponent_score: snap.opponent_score,
            winner: match snap.winner {
                Some(Winner::Player) => "player",
                Some(Winner::Opponent) => "opponent",
                Some(Winner::Tie) => "tie",
                None => "unknown",
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    client::telemetry::init_tracing(filter);

    for index in 0..args.matches {
        // Offset the seed per match so a batch stays reproducible without
        // replaying the same deal N times.
        let seed = args.seed.map(|s| s + u64::from(index));
        let snap = match args.mode {
            RunMode::Sim => run_simulated(seed, args.fast).await?,
            RunMode::Remote => run_remote(seed, args.fast).await?,
        };

        if args.json {
            let summary = MatchSummary::from_snapshot(args.mode, &snap);
            println!("{}", serde_json::to_string(&summary)?);
        } else {
            for entry in &snap.history {
                println!("{}", entry.display_line());
            }
            println!(
                "match {}: {} ({} - {})",
                index + 1,
                MatchSummary::from_snapshot(args.mode, &snap).winner,
                snap.player_score,
                snap.opponent_score,
            );
        }
    }

    Ok(())
}

/// Run one simulated match, waking on controller updates until terminal.
async fn run_simulated(
    seed: Option<u64>,
    fast: bool,
) -> Result<SessionSnapshot, Box<dyn std::error::Error>> {
    let timing = if fast {
        SimTiming::fast()
    } else {
        SimTiming::default()
    };
    let controller = match seed {
        Some(seed) => SessionController::simulated_seeded(timing, seed),
        None => SessionController::simulated(timing),
    };

    let mut updates = controller.subscribe();
    controller.start_new_match().await?;
    info!("simulated match started");

    while controller.snapshot().status != SessionStatus::Finished {
        if updates.changed().await.is_err() {
            break;
        }
    }
    Ok(controller.snapshot())
}

/// Run one match through the remote client against the in-memory oracle,
/// auto-picking a random card each round.
async fn run_remote(
    seed: Option<u64>,
    fast: bool,
) -> Result<SessionSnapshot, Box<dyn std::error::Error>> {
    let mut builder = InMemoryOracle::builder();
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let mut driver = RemoteMatchClient::new(Arc::new(builder.build()), NetworkConfig::sepolia());
    if fast {
        driver = driver
            .with_poll_config(PollConfig {
                max_attempts: 5,
                interval: Duration::from_millis(10),
            })
            .with_confirmation_delay(Duration::ZERO);
    }
    let controller = SessionController::with_driver(Mode::Remote, Box::new(driver));

    controller.start_new_match().await?;
    info!("remote match started");

    let mut rng = rand::rng();
    while controller.snapshot().status != SessionStatus::Finished {
        let snap = controller.snapshot();
        let Some(card) = snap.player_hand.choose(&mut rng).copied() else {
            break;
        };
        if !controller.play_card(card).await {
            let detail = controller
                .snapshot()
                .error
                .unwrap_or_else(|| "play rejected".to_owned());
            return Err(Box::new(ClientError::internal(detail)));
        }
    }
    Ok(controller.snapshot())
}
