//! The fixed 120-card Ohanami deck.

use crate::card::{Card, Color};
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of cards in a full deck
pub const DECK_SIZE: usize = 120;

// Each color owns a fixed, non-contiguous set of values.
const WATER_VALUES: [u8; 34] = [
    2, 4, 8, 10, 16, 20, 22, 26, 32, 34, 38, 40, 44, 46, 50, 52, 58, 62, 64, 68, 74, 76, 80, 82,
    86, 88, 92, 94, 100, 104, 106, 110, 116, 118,
];

const LEAF_VALUES: [u8; 35] = [
    3, 6, 9, 12, 15, 18, 24, 27, 30, 33, 36, 39, 45, 48, 51, 54, 57, 60, 66, 69, 72, 75, 78, 81,
    87, 90, 93, 96, 99, 102, 108, 111, 114, 117, 120,
];

const STONE_VALUES: [u8; 17] = [
    7, 14, 21, 28, 35, 42, 49, 56, 63, 70, 77, 84, 91, 98, 105, 112, 119,
];

const SAKURA_VALUES: [u8; 34] = [
    1, 5, 11, 13, 17, 19, 23, 25, 29, 31, 37, 41, 43, 47, 53, 55, 59, 61, 65, 67, 71, 73, 79, 83,
    85, 89, 95, 97, 101, 103, 107, 109, 113, 115,
];

/// Values printed on the cards of a color
pub fn values_for(color: Color) -> &'static [u8] {
    match color {
        Color::Water => &WATER_VALUES,
        Color::Leaf => &LEAF_VALUES,
        Color::Stone => &STONE_VALUES,
        Color::Sakura => &SAKURA_VALUES,
    }
}

/// Create the full deck in table order (unshuffled)
pub fn build_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for color in Color::ALL {
        deck.extend(values_for(color).iter().map(|&value| Card::new(value, color)));
    }
    deck
}

/// Shuffle a deck
pub fn shuffle_deck<R: Rng>(deck: &mut [Card], rng: &mut R) {
    deck.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_deck_size() {
        assert_eq!(build_deck().len(), DECK_SIZE);
    }

    #[test]
    fn test_deck_values_cover_range_once() {
        let deck = build_deck();
        let mut values: Vec<u8> = deck.iter().map(|c| c.value).collect();
        values.sort_unstable();
        let expected: Vec<u8> = (1..=120).collect();
        assert_eq!(values, expected);

        let unique: HashSet<Card> = deck.into_iter().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn test_deck_color_partition() {
        let deck = build_deck();
        let count = |color: Color| deck.iter().filter(|c| c.color == color).count();

        assert_eq!(count(Color::Water), 34);
        assert_eq!(count(Color::Leaf), 35);
        assert_eq!(count(Color::Stone), 17);
        assert_eq!(count(Color::Sakura), 34);
    }

    #[test]
    fn test_build_deck_is_deterministic() {
        assert_eq!(build_deck(), build_deck());
        assert_eq!(build_deck()[0], Card::new(2, Color::Water));
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut deck = build_deck();
        let mut rng = StdRng::seed_from_u64(7);
        shuffle_deck(&mut deck, &mut rng);

        assert_ne!(deck, build_deck());
        deck.sort_by_key(|c| c.value);
        let mut sorted = build_deck();
        sorted.sort_by_key(|c| c.value);
        assert_eq!(deck, sorted);
    }
}
