//! Batch play between the built-in bots.
//!
//! Each round draws a random table of bots and plays several fresh deals
//! with it. Scores are then summarized per bot.

use ohanami_core::{BackendKind, GameError, GameState, MAX_PLAYERS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};
use tracing::{debug, info};

/// How many games to play and with how many seats
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    pub rounds: usize,
    pub sets_per_round: usize,
    pub players: usize,
    pub seed: u64,
}

/// Smallest table a tournament draws
pub const MIN_TABLE: usize = 3;

impl TournamentConfig {
    /// Reject table sizes the tournament does not play
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (MIN_TABLE..=MAX_PLAYERS).contains(&self.players),
            "tournament tables seat {} to {} players, got {}",
            MIN_TABLE,
            MAX_PLAYERS,
            self.players
        );
        Ok(())
    }
}

/// Results of one bot across the tournament
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendStats {
    pub backend: String,
    pub games: usize,
    pub wins: usize,
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Default)]
struct Tally {
    scores: Vec<u32>,
    wins: usize,
}

/// Play the whole tournament
pub fn run(config: &TournamentConfig) -> Result<Vec<BackendStats>, GameError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut tallies: HashMap<BackendKind, Tally> = HashMap::new();

    for round in 0..config.rounds {
        let kinds: Vec<Option<BackendKind>> = (0..config.players)
            .map(|_| Some(BackendKind::random(&mut rng)))
            .collect();
        debug!(round = round + 1, table = ?kinds, "round started");

        for _ in 0..config.sets_per_round {
            let mut game = GameState::with_kinds(&kinds, rng.gen())?;
            game.start()?;

            let winners = game.winners();
            for (id, player) in game.players().iter().enumerate() {
                let kind: BackendKind = player.backend_name().parse()?;
                let tally = tallies.entry(kind).or_default();
                tally.scores.push(player.total_score());
                if winners.contains(&id) {
                    tally.wins += 1;
                }
            }
        }

        if (round + 1) % 10 == 0 {
            info!("round {}/{} done", round + 1, config.rounds);
        }
    }

    Ok(BackendKind::ALL
        .iter()
        .map(|kind| {
            let tally = tallies.remove(kind).unwrap_or_default();
            let (mean, std_dev) = summarize(&tally.scores);
            BackendStats {
                backend: kind.name().to_string(),
                games: tally.scores.len(),
                wins: tally.wins,
                mean,
                std_dev,
            }
        })
        .collect())
}

/// Mean and population standard deviation
fn summarize(scores: &[u32]) -> (f64, f64) {
    if scores.is_empty() {
        return (0.0, 0.0);
    }
    let n = scores.len() as f64;
    let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / n;
    let variance = scores
        .iter()
        .map(|&s| (s as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

/// Print the results as a table, best mean first
pub fn write_report<W: Write>(out: &mut W, report: &[BackendStats]) -> io::Result<()> {
    let mut sorted: Vec<&BackendStats> = report.iter().collect();
    sorted.sort_by(|a, b| b.mean.total_cmp(&a.mean));

    writeln!(
        out,
        "{:<14} {:>7} {:>7} {:>8} {:>8}",
        "Backend", "Games", "Wins", "Mean", "StdDev"
    )?;
    for stats in sorted {
        writeln!(
            out,
            "{:<14} {:>7} {:>7} {:>8.1} {:>8.1}",
            stats.backend, stats.games, stats.wins, stats.mean, stats.std_dev
        )?;
    }
    Ok(())
}
