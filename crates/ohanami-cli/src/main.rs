//! Ohanami terminal front-end.

use clap::{Parser, Subcommand};
use ohanami_core::{BackendKind, GameState, StartOutcome};
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod display;
mod tournament;

use display::TerminalDisplay;
use tournament::TournamentConfig;

#[derive(Parser)]
#[command(name = "ohanami")]
#[command(about = "Play and benchmark Ohanami bots")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watch a single game, one turn per key press
    Play {
        /// Bot for the next seat (repeatable): random, always-small, better-be-safe, centrist
        #[arg(short, long = "backend")]
        backends: Vec<BackendKind>,

        /// Seats to fill; seats without --backend get a random bot
        #[arg(short, long, default_value_t = 4)]
        players: usize,

        /// Seed for the deal and the bots
        #[arg(long)]
        seed: Option<u64>,

        /// Run the whole game without waiting for input
        #[arg(long)]
        auto: bool,

        /// Print the final standings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play many games between random bots and compare their scores
    Tournament {
        #[arg(long, default_value_t = 100)]
        rounds: usize,

        /// Games played with each drawn table
        #[arg(long, default_value_t = 10)]
        sets_per_round: usize,

        /// Seats per table, 3 or 4
        #[arg(long, default_value_t = 4)]
        players: usize,

        #[arg(long)]
        seed: Option<u64>,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing; warnings only by default so the board stays readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Play {
            backends,
            players,
            seed,
            auto,
            json,
        } => play(backends, players, seed, auto, json),
        Command::Tournament {
            rounds,
            sets_per_round,
            players,
            seed,
            json,
        } => {
            let config = TournamentConfig {
                rounds,
                sets_per_round,
                players,
                seed: seed.unwrap_or_else(rand::random),
            };
            run_tournament(config, json)
        }
    }
}

fn play(
    backends: Vec<BackendKind>,
    players: usize,
    seed: Option<u64>,
    auto: bool,
    json: bool,
) -> anyhow::Result<()> {
    let seats = players.max(backends.len());
    let kinds: Vec<Option<BackendKind>> = backends
        .into_iter()
        .map(Some)
        .chain(std::iter::repeat(None))
        .take(seats)
        .collect();

    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, seats, "starting game");
    let mut game = GameState::with_kinds(&kinds, seed)?;

    if auto {
        game.start()?;
    } else {
        let stdin = io::stdin();
        let mut display = TerminalDisplay::new(stdin.lock(), io::stdout());
        let outcome = game.start_with(&mut display)?;
        display.into_result()?;

        if outcome == StartOutcome::Quit {
            println!(
                "Game abandoned during the {}, turn {}.",
                game.season(),
                game.turn_in_season()
            );
            return Ok(());
        }
    }

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &game.standings())?;
        writeln!(out)?;
    } else {
        display::write_standings(&mut out, &game.standings(), &game.winners())?;
    }

    Ok(())
}

fn run_tournament(config: TournamentConfig, json: bool) -> anyhow::Result<()> {
    config.validate()?;

    info!(
        rounds = config.rounds,
        sets_per_round = config.sets_per_round,
        seed = config.seed,
        "starting tournament"
    );
    let report = tournament::run(&config)?;

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        tournament::write_report(&mut out, &report)?;
    }

    Ok(())
}
