//! Player state and turn execution.
//!
//! This module contains:
//! - Player struct with hand, piles, discards and the per-season score ledger
//! - Applying a backend's two decisions to the player's piles

use crate::backend::{Backend, GameView};
use crate::card::{Card, ColorScores, Season};
use crate::events::{DiscardReason, GameEvent};
use crate::game::GameError;
use crate::pile::Pile;
use std::fmt;
use tracing::debug;

/// Position of a player in the game's (shuffled) player list
pub type PlayerId = usize;

/// Piles every player builds
pub const PILES_PER_PLAYER: usize = 3;

/// Cards dealt to each player at the start of a season
pub const HAND_SIZE: usize = 10;

/// Cards played per turn
pub const CARDS_PER_TURN: usize = 2;

/// A single player's state
pub struct Player {
    /// Display name, unique within the game
    pub name: String,
    /// Cards still to be played this turn
    pub hand: Vec<Card>,
    pub piles: [Pile; PILES_PER_PLAYER],
    /// Cards thrown away, in the order they were discarded
    pub discarded: Vec<Card>,
    /// Score earned in each season, indexed by `Season::index`
    scores: [ColorScores; 3],
    backend: Box<dyn Backend>,
}

/// A player's cards at one point in time
#[derive(Debug, Clone)]
pub(crate) struct CardsSnapshot {
    hand: Vec<Card>,
    piles: [Pile; PILES_PER_PLAYER],
    discarded: Vec<Card>,
}

impl Player {
    /// Create a new player holding `hand`
    pub fn new(name: String, backend: Box<dyn Backend>, hand: Vec<Card>) -> Self {
        Self {
            name,
            hand,
            piles: [Pile::new(), Pile::new(), Pile::new()],
            discarded: Vec::new(),
            scores: [ColorScores::new(); 3],
            backend,
        }
    }

    /// Name of the strategy driving this player
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Whether this player's illegal placements become discards
    pub fn is_permissive(&self) -> bool {
        self.backend.permissive()
    }

    /// Score recorded for a season (zero until that season is over)
    pub fn season_score(&self, season: Season) -> ColorScores {
        self.scores[season.index()]
    }

    /// The whole ledger, one entry per season
    pub fn scores(&self) -> &[ColorScores; 3] {
        &self.scores
    }

    /// Sum over every season and color
    pub fn total_score(&self) -> u32 {
        self.scores.iter().map(ColorScores::total).sum()
    }

    /// Copy of every card this player holds or has laid down
    pub(crate) fn snapshot(&self) -> CardsSnapshot {
        CardsSnapshot {
            hand: self.hand.clone(),
            piles: self.piles.clone(),
            discarded: self.discarded.clone(),
        }
    }

    /// Put the cards back as they were when `snapshot` was taken
    pub(crate) fn restore(&mut self, snapshot: CardsSnapshot) {
        self.hand = snapshot.hand;
        self.piles = snapshot.piles;
        self.discarded = snapshot.discarded;
    }

    /// Score every pile for `season` into that season's ledger entry
    pub(crate) fn record_season(&mut self, season: Season) -> ColorScores {
        let entry = &mut self.scores[season.index()];
        for pile in &self.piles {
            entry.add_scores(&pile.season_score(season));
        }
        *entry
    }

    /// Ask the backend for this turn's two decisions and apply them.
    ///
    /// `id` is the player's position, used to label the events.
    pub fn play(&mut self, id: PlayerId, game: &GameView) -> Result<Vec<GameEvent>, GameError> {
        if self.hand.len() < CARDS_PER_TURN {
            return Err(GameError::HandExhausted {
                player: self.name.clone(),
            });
        }

        let snapshot = self.piles.clone();
        let decisions = self.backend.play(&self.hand, &snapshot, game)?;
        let permissive = self.backend.permissive();

        let mut events = Vec::with_capacity(CARDS_PER_TURN);
        for decision in decisions {
            if let Some(index) = decision.pile {
                if index >= PILES_PER_PLAYER {
                    return Err(GameError::InvalidPile { index });
                }
            }

            let card = self.take_from_hand(decision.card)?;

            let Some(index) = decision.pile else {
                debug!(player = %self.name, card = %card, "discarding");
                self.discarded.push(card);
                events.push(GameEvent::CardDiscarded {
                    player: id,
                    card,
                    reason: DiscardReason::Chosen,
                });
                continue;
            };

            if self.piles[index].add(card, permissive)? {
                events.push(GameEvent::CardPlaced {
                    player: id,
                    pile: index,
                    card,
                });
            } else {
                self.discarded.push(card);
                events.push(GameEvent::CardDiscarded {
                    player: id,
                    card,
                    reason: DiscardReason::Rejected,
                });
            }
        }

        Ok(events)
    }

    /// Remove a card from hand by identity
    fn take_from_hand(&mut self, card: Card) -> Result<Card, GameError> {
        let pos = self
            .hand
            .iter()
            .position(|c| *c == card)
            .ok_or(GameError::CardNotInHand { card })?;
        Ok(self.hand.remove(pos))
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("backend", &self.backend.name())
            .field("hand", &self.hand)
            .field("piles", &self.piles)
            .field("discarded", &self.discarded)
            .field("scores", &self.scores)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Decision;
    use crate::card::Color;

    /// Replays a fixed list of decisions, two per turn
    struct Scripted {
        turns: Vec<[Decision; 2]>,
        permissive: bool,
    }

    impl Backend for Scripted {
        fn name(&self) -> &str {
            "Scripted"
        }

        fn permissive(&self) -> bool {
            self.permissive
        }

        fn play(
            &mut self,
            _hand: &[Card],
            _piles: &[Pile; PILES_PER_PLAYER],
            _game: &GameView,
        ) -> Result<[Decision; 2], GameError> {
            Ok(self.turns.remove(0))
        }
    }

    fn view() -> GameView {
        GameView {
            season: Season::First,
            turn: 1,
            player_count: 2,
            cards_remaining: 80,
        }
    }

    fn player_with(turns: Vec<[Decision; 2]>, permissive: bool, hand: Vec<Card>) -> Player {
        Player::new(
            "Test".to_string(),
            Box::new(Scripted { turns, permissive }),
            hand,
        )
    }

    #[test]
    fn test_play_places_and_discards() {
        let a = Card::new(10, Color::Water);
        let b = Card::new(20, Color::Leaf);
        let c = Card::new(30, Color::Stone);
        let mut player = player_with(
            vec![[Decision::place(1, a), Decision::discard(b)]],
            false,
            vec![a, b, c],
        );

        let events = player.play(0, &view()).unwrap();

        assert_eq!(player.hand, vec![c]);
        assert_eq!(player.piles[1].min(), 10);
        assert_eq!(player.discarded, vec![b]);
        assert_eq!(
            events,
            vec![
                GameEvent::CardPlaced {
                    player: 0,
                    pile: 1,
                    card: a
                },
                GameEvent::CardDiscarded {
                    player: 0,
                    card: b,
                    reason: DiscardReason::Chosen
                },
            ]
        );
    }

    #[test]
    fn test_strict_backend_illegal_placement_fails() {
        let low = Card::new(10, Color::Water);
        let high = Card::new(50, Color::Water);
        let mid = Card::new(30, Color::Leaf);
        let extra = Card::new(90, Color::Leaf);
        let mut player = player_with(
            vec![
                [Decision::place(0, low), Decision::place(0, high)],
                [Decision::place(0, mid), Decision::discard(extra)],
            ],
            false,
            vec![low, high, mid, extra],
        );

        player.play(0, &view()).unwrap();
        let err = player.play(0, &view()).unwrap_err();
        assert!(matches!(
            err,
            GameError::Placement {
                card,
                min: 10,
                max: 50
            } if card == mid
        ));
    }

    #[test]
    fn test_permissive_backend_illegal_placement_discards() {
        let low = Card::new(10, Color::Water);
        let high = Card::new(50, Color::Water);
        let mid = Card::new(30, Color::Leaf);
        let extra = Card::new(90, Color::Leaf);
        let mut player = player_with(
            vec![
                [Decision::place(0, low), Decision::place(0, high)],
                [Decision::place(0, mid), Decision::place(0, extra)],
            ],
            true,
            vec![low, high, mid, extra],
        );

        player.play(0, &view()).unwrap();
        let events = player.play(0, &view()).unwrap();

        assert_eq!(player.discarded, vec![mid]);
        assert_eq!(player.piles[0].max(), 90);
        assert!(matches!(
            events[0],
            GameEvent::CardDiscarded {
                reason: DiscardReason::Rejected,
                ..
            }
        ));
    }

    #[test]
    fn test_card_not_in_hand() {
        let held = Card::new(10, Color::Water);
        let other = Card::new(11, Color::Sakura);
        let stranger = Card::new(99, Color::Leaf);
        let mut player = player_with(
            vec![[Decision::discard(held), Decision::discard(stranger)]],
            false,
            vec![held, other],
        );

        let err = player.play(0, &view()).unwrap_err();
        assert!(matches!(err, GameError::CardNotInHand { card } if card == stranger));
    }

    #[test]
    fn test_same_card_twice_is_rejected() {
        let a = Card::new(10, Color::Water);
        let b = Card::new(11, Color::Sakura);
        let mut player = player_with(
            vec![[Decision::discard(a), Decision::discard(a)]],
            false,
            vec![a, b],
        );

        assert!(matches!(
            player.play(0, &view()),
            Err(GameError::CardNotInHand { .. })
        ));
    }

    #[test]
    fn test_invalid_pile_index() {
        let a = Card::new(10, Color::Water);
        let b = Card::new(11, Color::Sakura);
        let mut player = player_with(
            vec![[Decision::place(3, a), Decision::discard(b)]],
            true,
            vec![a, b],
        );

        assert!(matches!(
            player.play(0, &view()),
            Err(GameError::InvalidPile { index: 3 })
        ));
    }

    #[test]
    fn test_short_hand_is_exhausted() {
        let mut player = player_with(Vec::new(), false, vec![Card::new(1, Color::Sakura)]);
        assert!(matches!(
            player.play(0, &view()),
            Err(GameError::HandExhausted { .. })
        ));
    }

    #[test]
    fn test_record_season_accumulates_piles() {
        let mut player = player_with(Vec::new(), false, Vec::new());
        player.piles[0].add(Card::new(2, Color::Water), false).unwrap();
        player.piles[1].add(Card::new(4, Color::Water), false).unwrap();
        player.piles[2].add(Card::new(3, Color::Leaf), false).unwrap();

        let first = player.record_season(Season::First);
        assert_eq!(first, ColorScores::with_amounts(6, 0, 0, 0));

        let second = player.record_season(Season::Second);
        assert_eq!(second, ColorScores::with_amounts(6, 4, 0, 0));

        assert_eq!(player.season_score(Season::First).total(), 6);
        assert_eq!(player.season_score(Season::Third).total(), 0);
        assert_eq!(player.total_score(), 16);
    }
}
