//! Terminal rendering of a running game.

use colored::Colorize;
use ohanami_core::{
    Card, Color, ColorScores, DiscardReason, GameDisplay, GameEvent, GameState, PlayerId, Season,
    Signal, Standing, TURNS_PER_SEASON,
};
use std::io::{self, BufRead, Write};

/// Outer width of a drawn card
const CARD_WIDTH: usize = 8;

/// Rows between the top edge and the bottom edge of a drawn card
const CARD_HEIGHT: usize = 7;

/// Draws the table after every turn and reads one line per turn.
///
/// Output errors are kept and stop the game at the next prompt.
pub struct TerminalDisplay<R, W> {
    input: R,
    output: W,
    error: Option<io::Error>,
}

impl<R: BufRead, W: Write> TerminalDisplay<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            error: None,
        }
    }

    /// The first I/O error hit while displaying, if any
    pub fn into_result(self) -> io::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn draw(&mut self, game: &GameState, events: &[GameEvent]) -> io::Result<()> {
        let out = &mut self.output;

        if game.is_finished() {
            writeln!(out, "{}", "=== Game over ===".bold())?;
        } else {
            writeln!(
                out,
                "{}",
                format!(
                    "=== {}, turn {}/{} ===",
                    capitalize(&game.season().to_string()),
                    game.turn_in_season(),
                    TURNS_PER_SEASON
                )
                .bold()
            )?;
        }

        for event in events {
            if let Some(line) = describe_event(game, event) {
                writeln!(out, "  {}", line)?;
            }
        }

        for player in game.players() {
            writeln!(out)?;
            writeln!(
                out,
                "{} ({} pts, {} discarded)",
                player.name.bold(),
                player.total_score(),
                player.discarded.len()
            )?;
            for (i, pile) in player.piles.iter().enumerate() {
                let cards: Vec<String> = pile
                    .cards()
                    .map(|c| paint(&c.value.to_string(), c.color))
                    .collect();
                writeln!(out, "  pile {}: {}", i + 1, cards.join(" "))?;
            }
            for line in card_row(&player.hand) {
                writeln!(out, "  {}", line)?;
            }
        }

        writeln!(out)?;
        write_scoreboard(out, game)?;
        out.flush()
    }
}

impl<R: BufRead, W: Write> GameDisplay for TerminalDisplay<R, W> {
    fn render(&mut self, game: &GameState, events: &[GameEvent]) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.draw(game, events) {
            self.error = Some(err);
        }
    }

    fn next_signal(&mut self) -> Signal {
        if self.error.is_some() {
            return Signal::Quit;
        }
        if let Err(err) = write!(self.output, "[enter] next turn, [q] quit > ")
            .and_then(|_| self.output.flush())
        {
            self.error = Some(err);
            return Signal::Quit;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Signal::Quit,
            Ok(_) => parse_signal(&line),
            Err(err) => {
                self.error = Some(err);
                Signal::Quit
            }
        }
    }
}

/// Interpret a line typed at the prompt
pub fn parse_signal(line: &str) -> Signal {
    match line.trim().to_lowercase().as_str() {
        "q" | "quit" | "exit" => Signal::Quit,
        _ => Signal::Advance,
    }
}

fn describe_event(game: &GameState, event: &GameEvent) -> Option<String> {
    let name = |id: PlayerId| {
        game.get_player(id)
            .map_or_else(|| format!("player {}", id), |p| p.name.clone())
    };

    match event {
        GameEvent::CardPlaced { player, pile, card } => Some(format!(
            "{} added {} to pile {}",
            name(*player),
            card,
            pile + 1
        )),
        GameEvent::CardDiscarded {
            player,
            card,
            reason: DiscardReason::Chosen,
        } => Some(format!("{} threw away {}", name(*player), card)),
        GameEvent::CardDiscarded {
            player,
            card,
            reason: DiscardReason::Rejected,
        } => Some(format!("{} could not place {} and threw it away", name(*player), card)),
        GameEvent::SeasonScored { season, .. } => {
            Some(format!("{} scored", capitalize(&season.to_string())))
        }
        GameEvent::GameFinished { winners, high_score } => {
            let names: Vec<String> = winners.iter().map(|id| name(*id)).collect();
            Some(format!("{} won with {} points", names.join(" and "), high_score))
        }
        GameEvent::TurnStarted { .. }
        | GameEvent::HandsPassed { .. }
        | GameEvent::SeasonStarted { .. } => None,
    }
}

/// Per-season ledger of every player
fn write_scoreboard<W: Write>(out: &mut W, game: &GameState) -> io::Result<()> {
    writeln!(out, "{:<20} {:>6} {:>6} {:>6} {:>6}", "", "S1", "S2", "S3", "Total")?;
    for player in game.players() {
        let seasons: Vec<u32> = Season::ALL
            .iter()
            .map(|s| player.season_score(*s).total())
            .collect();
        writeln!(
            out,
            "{:<20} {:>6} {:>6} {:>6} {:>6}",
            player.name,
            seasons[0],
            seasons[1],
            seasons[2],
            player.total_score()
        )?;
    }
    Ok(())
}

/// Final results, highest total first; winners are starred
pub fn write_standings<W: Write>(
    out: &mut W,
    standings: &[Standing],
    winners: &[PlayerId],
) -> io::Result<()> {
    let mut sorted: Vec<&Standing> = standings.iter().collect();
    sorted.sort_by(|a, b| b.total.cmp(&a.total));

    writeln!(
        out,
        "  {:<20} {:>6} {:>6} {:>6} {:>6} {:>6}",
        "Player", "Water", "Leaf", "Stone", "Sakura", "Total"
    )?;
    for standing in sorted {
        let mut by_color = ColorScores::new();
        for season in &standing.seasons {
            by_color.add_scores(season);
        }
        let marker = if winners.contains(&standing.player) { "*" } else { " " };
        writeln!(
            out,
            "{} {:<20} {:>6} {:>6} {:>6} {:>6} {:>6}",
            marker,
            standing.name,
            by_color.water,
            by_color.leaf,
            by_color.stone,
            by_color.sakura,
            standing.total
        )?;
    }
    Ok(())
}

/// ASCII drawing of a single card, one string per row
pub fn card_box(card: &Card) -> Vec<String> {
    let inner = CARD_WIDTH - 2;
    let mut rows = Vec::with_capacity(CARD_HEIGHT + 1);
    rows.push(format!(" {} ", "_".repeat(inner)));

    for line in 0..CARD_HEIGHT {
        let row = if line == CARD_HEIGHT / 2 {
            format!("|{}|", center(&card.value.to_string(), inner))
        } else if line == CARD_HEIGHT / 2 + 1 {
            format!("|{}|", center(card.color.label(), inner))
        } else if line == CARD_HEIGHT - 1 {
            format!("|{}|", "_".repeat(inner))
        } else {
            format!("|{}|", " ".repeat(inner))
        };
        rows.push(row);
    }
    rows
}

/// Cards drawn side by side, each colored by its suit
fn card_row(cards: &[Card]) -> Vec<String> {
    if cards.is_empty() {
        return Vec::new();
    }

    let boxes: Vec<Vec<String>> = cards.iter().map(card_box).collect();
    (0..boxes[0].len())
        .map(|row| {
            cards
                .iter()
                .zip(&boxes)
                .map(|(card, drawn)| paint(&drawn[row], card.color))
                .collect::<Vec<_>>()
                .join("")
        })
        .collect()
}

fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.len());
    format!("{}{}{}", " ".repeat(pad / 2), text, " ".repeat(pad - pad / 2))
}

fn paint(text: &str, color: Color) -> String {
    match color {
        Color::Water => text.blue().to_string(),
        Color::Leaf => text.green().to_string(),
        Color::Stone => text.bright_black().to_string(),
        Color::Sakura => text.magenta().to_string(),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
