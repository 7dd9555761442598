//! Cards, colors, seasons and per-color score breakdowns.
//!
//! This module contains:
//! - `Color` and `Season`, the two closed enumerations the rules are built on
//! - `Card`, an immutable (value, color) pair
//! - `ColorScores` for accumulating points color by color

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Water,
    Leaf,
    Stone,
    Sakura,
}

impl Color {
    /// All colors, in deck-table order
    pub const ALL: [Color; 4] = [Color::Water, Color::Leaf, Color::Stone, Color::Sakura];

    /// Lowercase label used when rendering cards
    pub fn label(&self) -> &'static str {
        match self {
            Color::Water => "water",
            Color::Leaf => "leaf",
            Color::Stone => "stone",
            Color::Sakura => "sakura",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scoring phase. Seasons only ever advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    First,
    Second,
    Third,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::First, Season::Second, Season::Third];

    /// Ordinal used to index per-season ledgers (0..=2)
    pub fn index(&self) -> usize {
        match self {
            Season::First => 0,
            Season::Second => 1,
            Season::Third => 2,
        }
    }

    /// The season that follows this one, if any
    pub fn next(&self) -> Option<Season> {
        match self {
            Season::First => Some(Season::Second),
            Season::Second => Some(Season::Third),
            Season::Third => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::First => "first",
            Season::Second => "second",
            Season::Third => "third",
        };
        write!(f, "{} season", name)
    }
}

/// A single card. Values are unique across the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub value: u8,
    pub color: Color,
}

impl Card {
    pub fn new(value: u8, color: Color) -> Self {
        Self { value, color }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.color)
    }
}

/// Points broken down by color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScores {
    pub water: u32,
    pub leaf: u32,
    pub stone: u32,
    pub sakura: u32,
}

impl ColorScores {
    /// Create an empty breakdown
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a breakdown with specific amounts
    pub fn with_amounts(water: u32, leaf: u32, stone: u32, sakura: u32) -> Self {
        Self {
            water,
            leaf,
            stone,
            sakura,
        }
    }

    /// Points for a specific color
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Water => self.water,
            Color::Leaf => self.leaf,
            Color::Stone => self.stone,
            Color::Sakura => self.sakura,
        }
    }

    /// Add points to a specific color
    pub fn add(&mut self, color: Color, points: u32) {
        match color {
            Color::Water => self.water += points,
            Color::Leaf => self.leaf += points,
            Color::Stone => self.stone += points,
            Color::Sakura => self.sakura += points,
        }
    }

    /// Add another breakdown to this one
    pub fn add_scores(&mut self, other: &ColorScores) {
        self.water += other.water;
        self.leaf += other.leaf;
        self.stone += other.stone;
        self.sakura += other.sakura;
    }

    /// Sum over all colors
    pub fn total(&self) -> u32 {
        self.water + self.leaf + self.stone + self.sakura
    }
}
