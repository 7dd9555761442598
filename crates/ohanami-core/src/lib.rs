//! Ohanami - a pile-building card game engine
//!
//! This crate provides the core game logic for Ohanami, including:
//! - The fixed 120-card deck
//! - Piles with their placement and scoring rules
//! - Player state and turn execution
//! - Pluggable decision backends and the built-in bots
//! - The turn and season state machine
//!
//! # Architecture
//!
//! The engine is passive: something outside it (a display, a batch runner,
//! a test) calls [`GameState::turn`] whenever the next turn should happen.
//! Every state change is reported as a [`GameEvent`].
//!
//! # Modules
//!
//! - [`card`]: Colors, seasons, cards and score breakdowns
//! - [`deck`]: The deck table, building and shuffling
//! - [`pile`]: Pile admissibility and season scoring
//! - [`player`]: Player state and turn execution
//! - [`backend`]: The backend contract and built-in bots
//! - [`game`]: Game state machine
//! - [`display`]: Contract for displays that pace a game

pub mod backend;
pub mod card;
pub mod deck;
pub mod display;
pub mod events;
pub mod game;
pub mod pile;
pub mod player;

// Re-export commonly used types
pub use backend::{Backend, BackendKind, Bot, Decision, GameView};
pub use card::{Card, Color, ColorScores, Season};
pub use deck::{build_deck, shuffle_deck, values_for, DECK_SIZE};
pub use display::{GameDisplay, Signal, StartOutcome};
pub use events::{DiscardReason, GameEvent, PassDirection};
pub use game::{GameError, GameState, Standing, MAX_PLAYERS, MIN_PLAYERS, TURNS_PER_SEASON};
pub use pile::Pile;
pub use player::{Player, PlayerId, CARDS_PER_TURN, HAND_SIZE, PILES_PER_PLAYER};
