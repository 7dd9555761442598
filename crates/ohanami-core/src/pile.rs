//! Personal card piles.
//!
//! A pile is kept sorted ascending. New cards may only go below the current
//! minimum or above the current maximum, so a pile grows from both ends.

use crate::card::{Card, Color, ColorScores, Season};
use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Minimum reported by an empty pile (above every card value)
pub const EMPTY_PILE_MIN: u8 = 121;

/// Maximum reported by an empty pile (below every card value)
pub const EMPTY_PILE_MAX: u8 = 0;

/// Points per Water card, every season
const WATER_POINTS: u32 = 3;

/// Points per Leaf card, from the second season on
const LEAF_POINTS: u32 = 4;

/// Points per Stone card, third season only
const STONE_POINTS: u32 = 7;

/// An ordered stack of cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: VecDeque<Card>,
}

impl Pile {
    /// Create an empty pile
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest value in the pile, or 121 when empty
    pub fn min(&self) -> u8 {
        self.cards.front().map_or(EMPTY_PILE_MIN, |c| c.value)
    }

    /// Largest value in the pile, or 0 when empty
    pub fn max(&self) -> u8 {
        self.cards.back().map_or(EMPTY_PILE_MAX, |c| c.value)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards from bottom (smallest) to top (largest)
    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    /// Number of cards of a given color
    pub fn color_count(&self, color: Color) -> u32 {
        self.cards.iter().filter(|c| c.color == color).count() as u32
    }

    /// Whether a card with this value could be placed right now
    pub fn accepts(&self, value: u8) -> bool {
        value < self.min() || value > self.max()
    }

    /// Gap between a value and the bound it would attach to, if admissible
    pub fn distance(&self, value: u8) -> Option<u8> {
        if self.is_empty() {
            Some(value)
        } else if value < self.min() {
            Some(self.min() - value)
        } else if value > self.max() {
            Some(value - self.max())
        } else {
            None
        }
    }

    /// Score of the pile as of the end of `season`.
    ///
    /// Formulas are cumulative: each season re-counts every bonus of the
    /// seasons before it, then adds its own.
    pub fn season_score(&self, season: Season) -> ColorScores {
        let mut scores = ColorScores::new();
        scores.add(Color::Water, WATER_POINTS * self.color_count(Color::Water));

        if season >= Season::Second {
            scores.add(Color::Leaf, LEAF_POINTS * self.color_count(Color::Leaf));
        }

        if season >= Season::Third {
            scores.add(Color::Stone, STONE_POINTS * self.color_count(Color::Stone));
            let sakura = self.color_count(Color::Sakura);
            scores.add(Color::Sakura, sakura * (sakura + 1) / 2);
        }

        scores
    }

    /// Place a card on the pile.
    ///
    /// Returns `Ok(true)` when placed. An inadmissible card is an error unless
    /// `permissive` is set, in which case the pile is left untouched and
    /// `Ok(false)` tells the caller to discard the card instead.
    pub fn add(&mut self, card: Card, permissive: bool) -> Result<bool, GameError> {
        let (min, max) = (self.min(), self.max());

        if self.cards.is_empty() {
            self.cards.push_back(card);
        } else if card.value < min {
            self.cards.push_front(card);
        } else if card.value > max {
            self.cards.push_back(card);
        } else if permissive {
            warn!(card = %card, min, max, "card does not fit pile, discarding");
            return Ok(false);
        } else {
            return Err(GameError::Placement { card, min, max });
        }

        debug!(card = %card, min = self.min(), max = self.max(), "card placed");
        Ok(true)
    }
}
