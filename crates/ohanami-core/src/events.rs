//! Events produced while a game advances.
//!
//! The engine reports every state change as a `GameEvent` so that displays
//! and tooling can follow a game without inspecting its internals.

use crate::card::{Card, ColorScores, Season};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Why a card ended up in a discard list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscardReason {
    /// The backend asked to discard it
    Chosen,
    /// A permissive backend aimed it at a pile that could not take it
    Rejected,
}

/// Direction hands travel at the end of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassDirection {
    /// Each player hands their cards to the next player
    Forward,
    /// Each player hands their cards to the previous player
    Backward,
}

impl PassDirection {
    /// Passing direction during a season
    pub fn for_season(season: Season) -> Self {
        match season {
            Season::Second => PassDirection::Backward,
            Season::First | Season::Third => PassDirection::Forward,
        }
    }
}

/// Events that occur as the game advances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A turn began
    TurnStarted { season: Season, turn: u32 },

    /// A card was placed on a pile
    CardPlaced {
        player: PlayerId,
        pile: usize,
        card: Card,
    },

    /// A card was discarded
    CardDiscarded {
        player: PlayerId,
        card: Card,
        reason: DiscardReason,
    },

    /// Remaining hands moved to the neighbouring players
    HandsPassed { direction: PassDirection },

    /// A season ended and was scored
    SeasonScored {
        season: Season,
        scores: Vec<(PlayerId, ColorScores)>,
    },

    /// A new season began with fresh hands
    SeasonStarted { season: Season },

    /// The third season ended
    GameFinished {
        winners: Vec<PlayerId>,
        high_score: u32,
    },
}
