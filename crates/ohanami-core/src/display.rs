//! Contract for displays that drive a game.
//!
//! A display owns the input loop: it renders the game and decides when the
//! next turn is played. The engine never reads input or writes output.

use crate::events::GameEvent;
use crate::game::{GameState, MAX_PLAYERS};
use serde::{Deserialize, Serialize};

/// What the display asks the engine to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Play exactly one turn
    Advance,
    /// Stop driving the game, leaving it unfinished
    Quit,
}

/// How a displayed game stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartOutcome {
    Finished,
    Quit,
}

/// A passive observer of a game that also paces it
pub trait GameDisplay {
    /// Largest table this display can draw
    fn max_players(&self) -> usize {
        MAX_PLAYERS
    }

    /// Draw the game after `events` (empty before the first turn)
    fn render(&mut self, game: &GameState, events: &[GameEvent]);

    /// Wait for the next instruction
    fn next_signal(&mut self) -> Signal;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameError;

    /// Replays a fixed list of signals and counts renders
    struct Scripted {
        signals: Vec<Signal>,
        renders: usize,
        max_players: usize,
    }

    impl Scripted {
        fn new(signals: Vec<Signal>) -> Self {
            Self {
                signals,
                renders: 0,
                max_players: MAX_PLAYERS,
            }
        }
    }

    impl GameDisplay for Scripted {
        fn max_players(&self) -> usize {
            self.max_players
        }

        fn render(&mut self, _game: &GameState, _events: &[GameEvent]) {
            self.renders += 1;
        }

        fn next_signal(&mut self) -> Signal {
            if self.signals.is_empty() {
                Signal::Quit
            } else {
                self.signals.remove(0)
            }
        }
    }

    #[test]
    fn test_each_advance_plays_one_turn() {
        let mut game = GameState::with_kinds(&[None, None], 4).unwrap();
        let mut display = Scripted::new(vec![Signal::Advance, Signal::Advance, Signal::Quit]);

        let outcome = game.start_with(&mut display).unwrap();

        assert_eq!(outcome, StartOutcome::Quit);
        assert_eq!(game.turn_in_season(), 2);
        assert!(!game.is_finished());
        assert_eq!(display.renders, 3);
    }

    #[test]
    fn test_display_can_finish_game() {
        let mut game = GameState::with_kinds(&[None, None, None], 6).unwrap();
        let mut display = Scripted::new(vec![Signal::Advance; 15]);

        let outcome = game.start_with(&mut display).unwrap();

        assert_eq!(outcome, StartOutcome::Finished);
        assert!(game.is_finished());
        assert!(display.signals.is_empty());
    }

    #[test]
    fn test_display_too_small_for_table() {
        let mut game = GameState::with_kinds(&[None, None, None], 2).unwrap();
        let mut display = Scripted::new(vec![Signal::Advance]);
        display.max_players = 2;

        let result = game.start_with(&mut display);

        assert!(matches!(
            result,
            Err(GameError::TooManyPlayers { count: 3, max: 2 })
        ));
        assert_eq!(display.renders, 0);
        assert_eq!(game.turn_in_season(), 0);
    }
}
