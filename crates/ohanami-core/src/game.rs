//! Core game state machine.
//!
//! This module contains the main `GameState` struct: dealing, turn
//! execution, hand passing, season scoring and the end of the game.

use crate::backend::{Backend, BackendKind, GameView};
use crate::card::{Card, ColorScores, Season};
use crate::deck::{build_deck, shuffle_deck};
use crate::display::{GameDisplay, Signal, StartOutcome};
use crate::events::{GameEvent, PassDirection};
use crate::player::{Player, PlayerId, HAND_SIZE};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Turns played in each season
pub const TURNS_PER_SEASON: u32 = 5;

/// Fewest players a game can be dealt for
pub const MIN_PLAYERS: usize = 2;

/// Most players the deck can serve for three seasons
pub const MAX_PLAYERS: usize = 4;

/// Errors that can occur while creating or running a game
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Card {card} cannot be placed on pile {min} -> {max}")]
    Placement { card: Card, min: u8, max: u8 },

    #[error("Card {card} is not in hand")]
    CardNotInHand { card: Card },

    #[error("No pile at index {index}")]
    InvalidPile { index: usize },

    #[error("{player} has fewer than two cards to play")]
    HandExhausted { player: String },

    #[error("Backend failed: {0}")]
    Backend(String),

    #[error("Need at least {min} players, got {count}")]
    NotEnoughPlayers { count: usize, min: usize },

    #[error("At most {max} players supported, got {count}")]
    TooManyPlayers { count: usize, max: usize },

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Game is over")]
    GameOver,
}

/// Final (or running) result for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player: PlayerId,
    pub name: String,
    pub backend: String,
    /// Ledger entries, one per season
    pub seasons: [ColorScores; 3],
    pub total: u32,
}

/// The complete game state
pub struct GameState {
    /// Players in seating order (fixed after the initial shuffle)
    players: Vec<Player>,
    /// Set on the first turn; informational only
    current_player: Option<PlayerId>,
    season: Season,
    /// Turn within the current season (0 before its first turn)
    turn: u32,
    /// Undealt cards, dealt from the front
    remaining_deck: Vec<Card>,
    finished: bool,
    /// Set when a turn failed; the game cannot continue
    aborted: bool,
}

impl GameState {
    /// Create a game with a freshly shuffled deck.
    ///
    /// `None` entries get a randomly chosen built-in bot.
    pub fn create(backends: Vec<Option<Box<dyn Backend>>>) -> Result<Self, GameError> {
        let mut rng = StdRng::from_entropy();
        Self::create_with_rng(backends, &mut rng)
    }

    /// Create a game drawing every random choice from `rng`
    pub fn create_with_rng<R: Rng>(
        backends: Vec<Option<Box<dyn Backend>>>,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        check_player_count(backends.len())?;

        let mut deck = build_deck();
        shuffle_deck(&mut deck, rng);

        let mut filled: Vec<Box<dyn Backend>> = Vec::with_capacity(backends.len());
        for backend in backends {
            let backend = match backend {
                Some(backend) => backend,
                None => {
                    let kind = BackendKind::random(rng);
                    kind.build(Some(rng.gen()))
                }
            };
            filled.push(backend);
        }

        let mut players = Vec::with_capacity(filled.len());
        for backend in filled {
            let name = unique_name(backend.name(), &players);
            let hand: Vec<Card> = deck.drain(..HAND_SIZE).collect();
            players.push(Player::new(name, backend, hand));
        }
        players.shuffle(rng);

        info!(
            players = players.len(),
            reserve = deck.len(),
            "game created"
        );

        Ok(Self::from_parts(players, deck))
    }

    /// Create a reproducible game of built-in bots from a seed
    pub fn with_kinds(kinds: &[Option<BackendKind>], seed: u64) -> Result<Self, GameError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let backends = kinds
            .iter()
            .map(|kind| kind.map(|kind| kind.build(Some(rng.gen()))))
            .collect();
        Self::create_with_rng(backends, &mut rng)
    }

    /// Create an unshuffled game with known hands and reserve.
    ///
    /// Players keep the order of `backends`.
    pub fn with_hands(
        backends: Vec<Box<dyn Backend>>,
        hands: Vec<Vec<Card>>,
        reserve: Vec<Card>,
    ) -> Result<Self, GameError> {
        check_player_count(backends.len())?;
        assert_eq!(
            backends.len(),
            hands.len(),
            "Must provide a hand for every player"
        );

        let mut players = Vec::with_capacity(backends.len());
        for (backend, hand) in backends.into_iter().zip(hands) {
            let name = unique_name(backend.name(), &players);
            players.push(Player::new(name, backend, hand));
        }

        Ok(Self::from_parts(players, reserve))
    }

    fn from_parts(players: Vec<Player>, remaining_deck: Vec<Card>) -> Self {
        Self {
            players,
            current_player: None,
            season: Season::First,
            turn: 0,
            remaining_deck,
            finished: false,
            aborted: false,
        }
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Players in seating order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by position
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// The player marked as current, once the first turn has been played
    pub fn current_player(&self) -> Option<&Player> {
        self.current_player.and_then(|id| self.players.get(id))
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// Turns played so far in the current season
    pub fn turn_in_season(&self) -> u32 {
        self.turn
    }

    /// Cards not dealt yet
    pub fn remaining_deck(&self) -> &[Card] {
        &self.remaining_deck
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Check if a failed turn ended the game early
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// What backends get to see about the game
    pub fn view(&self) -> GameView {
        GameView {
            season: self.season,
            turn: self.turn,
            player_count: self.players.len(),
            cards_remaining: self.remaining_deck.len(),
        }
    }

    /// Total score of every player, in seating order
    pub fn scores(&self) -> Vec<u32> {
        self.players.iter().map(Player::total_score).collect()
    }

    /// Scores of every player from the ledger recorded so far
    pub fn standings(&self) -> Vec<Standing> {
        self.players
            .iter()
            .enumerate()
            .map(|(id, player)| Standing {
                player: id,
                name: player.name.clone(),
                backend: player.backend_name().to_string(),
                seasons: *player.scores(),
                total: player.total_score(),
            })
            .collect()
    }

    /// Every player sharing the highest total (ties are not broken)
    pub fn winners(&self) -> Vec<PlayerId> {
        let scores = self.scores();
        let Some(best) = scores.iter().copied().max() else {
            return Vec::new();
        };
        scores
            .iter()
            .enumerate()
            .filter(|(_, score)| **score == best)
            .map(|(id, _)| id)
            .collect()
    }

    /// Run a complete turn: every player plays two cards, then hands move on.
    ///
    /// A turn either completes or leaves the cards untouched. Any error
    /// aborts the game, and later turns fail with `GameError::GameOver`.
    pub fn turn(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.finished || self.aborted {
            return Err(GameError::GameOver);
        }

        self.turn += 1;
        let mut events = vec![GameEvent::TurnStarted {
            season: self.season,
            turn: self.turn,
        }];

        let snapshots: Vec<_> = self.players.iter().map(Player::snapshot).collect();
        if let Err(err) = self.play_all(&mut events) {
            for (player, snapshot) in self.players.iter_mut().zip(snapshots) {
                player.restore(snapshot);
            }
            self.turn -= 1;
            self.aborted = true;
            warn!(error = %err, "turn failed, game aborted");
            return Err(err);
        }

        if self.current_player.is_none() {
            self.current_player = Some(0);
        }

        let direction = PassDirection::for_season(self.season);
        self.pass_hands(direction);
        events.push(GameEvent::HandsPassed { direction });

        if self.turn == TURNS_PER_SEASON {
            events.extend(self.go_next_season());
        }

        Ok(events)
    }

    /// Every player plays in seating order
    fn play_all(&mut self, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
        let view = self.view();
        for (id, player) in self.players.iter_mut().enumerate() {
            debug!(player = %player.name, "playing");
            events.extend(player.play(id, &view)?);
        }
        Ok(())
    }

    /// Every player gives their hand to a neighbour
    fn pass_hands(&mut self, direction: PassDirection) {
        let mut hands: Vec<Vec<Card>> = self
            .players
            .iter_mut()
            .map(|p| std::mem::take(&mut p.hand))
            .collect();

        match direction {
            PassDirection::Forward => hands.rotate_right(1),
            PassDirection::Backward => hands.rotate_left(1),
        }

        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.hand = hand;
        }
    }

    /// Score the season that just ended, then deal the next one or conclude.
    pub fn go_next_season(&mut self) -> Vec<GameEvent> {
        if self.finished || self.aborted {
            return Vec::new();
        }

        let ended = self.season;
        let scores = self
            .players
            .iter_mut()
            .enumerate()
            .map(|(id, player)| (id, player.record_season(ended)))
            .collect();

        let mut events = vec![GameEvent::SeasonScored {
            season: ended,
            scores,
        }];
        self.turn = 0;

        match ended.next() {
            Some(next) => {
                self.season = next;
                for player in &mut self.players {
                    let count = HAND_SIZE.min(self.remaining_deck.len());
                    player.hand = self.remaining_deck.drain(..count).collect();
                }
                info!(season = %next, reserve = self.remaining_deck.len(), "season started");
                events.push(GameEvent::SeasonStarted { season: next });
            }
            None => {
                let standings = self.conclude();
                events.push(GameEvent::GameFinished {
                    winners: self.winners(),
                    high_score: standings.iter().map(|s| s.total).max().unwrap_or(0),
                });
            }
        }

        events
    }

    /// End the game and return the final standings
    pub fn conclude(&mut self) -> Vec<Standing> {
        self.finished = true;
        let standings = self.standings();
        info!(winners = ?self.winners(), "game finished");
        standings
    }

    /// Play turns until the game is over
    pub fn start(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let mut events = Vec::new();
        while !self.finished {
            events.extend(self.turn()?);
        }
        Ok(events)
    }

    /// Let an attached display decide when each turn is played.
    ///
    /// Every `Signal::Advance` plays exactly one turn; `Signal::Quit` stops
    /// without finishing the game.
    pub fn start_with<D: GameDisplay + ?Sized>(
        &mut self,
        display: &mut D,
    ) -> Result<StartOutcome, GameError> {
        let max = display.max_players();
        if self.players.len() > max {
            return Err(GameError::TooManyPlayers {
                count: self.players.len(),
                max,
            });
        }

        display.render(self, &[]);
        while !self.finished {
            match display.next_signal() {
                Signal::Advance => {
                    let events = self.turn()?;
                    display.render(self, &events);
                }
                Signal::Quit => return Ok(StartOutcome::Quit),
            }
        }

        Ok(StartOutcome::Finished)
    }
}

fn check_player_count(count: usize) -> Result<(), GameError> {
    if count < MIN_PLAYERS {
        return Err(GameError::NotEnoughPlayers {
            count,
            min: MIN_PLAYERS,
        });
    }
    if count > MAX_PLAYERS {
        return Err(GameError::TooManyPlayers {
            count,
            max: MAX_PLAYERS,
        });
    }
    Ok(())
}

/// `<base>_<n>` with the smallest n not already taken
fn unique_name(base: &str, players: &[Player]) -> String {
    (1u32..)
        .map(|n| format!("{}_{}", base, n))
        .find(|name| players.iter().all(|p| &p.name != name))
        .unwrap_or_else(|| base.to_string())
}
