//! Decision-making backends.
//!
//! A backend chooses which two cards a player plays each turn and where they
//! go. Anything implementing [`Backend`] can sit at the table; the built-in
//! strategies are listed in [`BackendKind`] and run by [`Bot`]:
//! - Random: any card, any pile
//! - AlwaysSmall: grows piles downward from the smallest cards
//! - BetterBeSafe: plays whatever card sits closest to a pile bound
//! - Centrist: prefers cards near the middle of the value range

use crate::card::{Card, Season};
use crate::game::GameError;
use crate::pile::Pile;
use crate::player::PILES_PER_PLAYER;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value Centrist orders its hand around
const CENTER_VALUE: u8 = 60;

/// Read-only facts about the game handed to backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub season: Season,
    /// Turn within the season (1..=5 while playing)
    pub turn: u32,
    pub player_count: usize,
    /// Cards left in the undealt reserve
    pub cards_remaining: usize,
}

/// One of the two moves a backend makes per turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Target pile, or `None` to discard
    pub pile: Option<usize>,
    pub card: Card,
}

impl Decision {
    /// Put `card` on pile `pile`
    pub fn place(pile: usize, card: Card) -> Self {
        Self {
            pile: Some(pile),
            card,
        }
    }

    /// Throw `card` away
    pub fn discard(card: Card) -> Self {
        Self { pile: None, card }
    }
}

/// The decision contract every player strategy implements.
pub trait Backend {
    /// Name used to build the player's display name
    fn name(&self) -> &str;

    /// Whether illegal placements are turned into discards instead of errors
    fn permissive(&self) -> bool {
        false
    }

    /// Choose two distinct cards from `hand` and where to put them.
    ///
    /// `piles` is a snapshot taken before either card is applied.
    fn play(
        &mut self,
        hand: &[Card],
        piles: &[Pile; PILES_PER_PLAYER],
        game: &GameView,
    ) -> Result<[Decision; 2], GameError>;
}

/// Registry of built-in strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    Random,
    AlwaysSmall,
    BetterBeSafe,
    Centrist,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::Random,
        BackendKind::AlwaysSmall,
        BackendKind::BetterBeSafe,
        BackendKind::Centrist,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Random => "Random",
            BackendKind::AlwaysSmall => "AlwaysSmall",
            BackendKind::BetterBeSafe => "BetterBeSafe",
            BackendKind::Centrist => "Centrist",
        }
    }

    /// Only Centrist is trusted to place legally
    pub fn permissive(&self) -> bool {
        !matches!(self, BackendKind::Centrist)
    }

    /// Pick a strategy uniformly at random
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Build a boxed bot of this kind
    pub fn build(self, seed: Option<u64>) -> Box<dyn Backend> {
        match seed {
            Some(seed) => Box::new(Bot::with_seed(self, seed)),
            None => Box::new(Bot::new(self)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|kind| kind.name().to_lowercase() == wanted)
            .ok_or_else(|| GameError::UnknownBackend(s.to_string()))
    }
}

/// A built-in strategy player
pub struct Bot {
    pub kind: BackendKind,
    rng: StdRng,
}

impl Bot {
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(kind: BackendKind, seed: u64) -> Self {
        Self {
            kind,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Random: two random cards on two random piles
    fn choose_random(&mut self, hand: &[Card]) -> [Decision; 2] {
        let picked: Vec<Card> = hand.choose_multiple(&mut self.rng, 2).copied().collect();
        [
            Decision::place(self.rng.gen_range(0..PILES_PER_PLAYER), picked[0]),
            Decision::place(self.rng.gen_range(0..PILES_PER_PLAYER), picked[1]),
        ]
    }

    /// AlwaysSmall: the two smallest cards, the larger one first so the
    /// smaller can follow it onto the same pile
    fn choose_always_small(hand: &[Card], piles: &[Pile; PILES_PER_PLAYER]) -> [Decision; 2] {
        let mut cards = hand.to_vec();
        cards.sort_by_key(|c| c.value);
        let (smallest, next) = (cards[0], cards[1]);

        let mut working = piles.clone();
        let first = match tightest_pile_above(next, &working) {
            Some(pile) => {
                let _ = working[pile].add(next, true);
                Decision::place(pile, next)
            }
            None => Decision::discard(next),
        };
        let second = match tightest_pile_above(smallest, &working) {
            Some(pile) => Decision::place(pile, smallest),
            None => Decision::discard(smallest),
        };

        [first, second]
    }

    /// BetterBeSafe: the card/pile pair with the smallest gap, twice
    fn choose_better_be_safe(hand: &[Card], piles: &[Pile; PILES_PER_PLAYER]) -> [Decision; 2] {
        let mut working = piles.clone();

        let Some((pile, first_card)) = closest_fit(hand, &working) else {
            return [Decision::discard(hand[0]), Decision::discard(hand[1])];
        };
        let _ = working[pile].add(first_card, true);

        let rest: Vec<Card> = hand.iter().copied().filter(|c| *c != first_card).collect();
        let second = match closest_fit(&rest, &working) {
            Some((pile, card)) => Decision::place(pile, card),
            None => Decision::discard(rest[0]),
        };

        [Decision::place(pile, first_card), second]
    }

    /// Centrist: cards closest to the middle value first, each on its
    /// closest admissible pile
    fn choose_centrist(hand: &[Card], piles: &[Pile; PILES_PER_PLAYER]) -> [Decision; 2] {
        let mut cards = hand.to_vec();
        cards.sort_by_key(|c| (c.value.abs_diff(CENTER_VALUE), c.value));

        let mut working = piles.clone();
        let mut selected: Vec<Decision> = Vec::with_capacity(2);

        for card in &cards {
            if selected.len() == 2 {
                break;
            }
            if let Some(pile) = closest_pile(*card, &working) {
                let _ = working[pile].add(*card, true);
                selected.push(Decision::place(pile, *card));
            }
        }

        // Nothing fits: throw away the least central cards
        for card in cards.iter().rev() {
            if selected.len() == 2 {
                break;
            }
            if selected.iter().all(|d| d.card != *card) {
                selected.push(Decision::discard(*card));
            }
        }

        [selected[0], selected[1]]
    }
}

impl Backend for Bot {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn permissive(&self) -> bool {
        self.kind.permissive()
    }

    fn play(
        &mut self,
        hand: &[Card],
        piles: &[Pile; PILES_PER_PLAYER],
        _game: &GameView,
    ) -> Result<[Decision; 2], GameError> {
        if hand.len() < 2 {
            return Err(GameError::Backend(format!(
                "{} needs two cards, got {}",
                self.kind,
                hand.len()
            )));
        }

        Ok(match self.kind {
            BackendKind::Random => self.choose_random(hand),
            BackendKind::AlwaysSmall => Self::choose_always_small(hand, piles),
            BackendKind::BetterBeSafe => Self::choose_better_be_safe(hand, piles),
            BackendKind::Centrist => Self::choose_centrist(hand, piles),
        })
    }
}

/// Pile whose minimum sits closest above `card`, so the card is prepended
fn tightest_pile_above(card: Card, piles: &[Pile]) -> Option<usize> {
    piles
        .iter()
        .enumerate()
        .filter(|(_, pile)| pile.min() > card.value)
        .min_by_key(|(_, pile)| pile.min() - card.value)
        .map(|(i, _)| i)
}

/// Admissible pile with the smallest gap to `card`
fn closest_pile(card: Card, piles: &[Pile]) -> Option<usize> {
    piles
        .iter()
        .enumerate()
        .filter_map(|(i, pile)| pile.distance(card.value).map(|d| (i, d)))
        .min_by_key(|&(_, d)| d)
        .map(|(i, _)| i)
}

/// Best (pile, card) pair over a whole hand
fn closest_fit(cards: &[Card], piles: &[Pile]) -> Option<(usize, Card)> {
    cards
        .iter()
        .flat_map(move |card| {
            piles
                .iter()
                .enumerate()
                .filter_map(move |(i, pile)| pile.distance(card.value).map(|d| (d, i, *card)))
        })
        .min_by_key(|&(d, _, _)| d)
        .map(|(_, pile, card)| (pile, card))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Color;

    fn view() -> GameView {
        GameView {
            season: Season::First,
            turn: 1,
            player_count: 2,
            cards_remaining: 100,
        }
    }

    fn hand(values: &[u8]) -> Vec<Card> {
        values.iter().map(|&v| Card::new(v, Color::Water)).collect()
    }

    fn empty_piles() -> [Pile; PILES_PER_PLAYER] {
        [Pile::new(), Pile::new(), Pile::new()]
    }

    fn assert_distinct_from_hand(decisions: &[Decision; 2], hand: &[Card]) {
        assert_ne!(decisions[0].card, decisions[1].card);
        for d in decisions {
            assert!(hand.contains(&d.card));
            if let Some(pile) = d.pile {
                assert!(pile < PILES_PER_PLAYER);
            }
        }
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("centrist".parse::<BackendKind>().unwrap(), BackendKind::Centrist);
        assert_eq!(
            "better-be-safe".parse::<BackendKind>().unwrap(),
            BackendKind::BetterBeSafe
        );
        assert_eq!("ALWAYS_SMALL".parse::<BackendKind>().unwrap(), BackendKind::AlwaysSmall);
        assert!(matches!(
            "grandmaster".parse::<BackendKind>(),
            Err(GameError::UnknownBackend(name)) if name == "grandmaster"
        ));
    }

    #[test]
    fn test_bot_creation() {
        let bot = Bot::new(BackendKind::Centrist);
        assert_eq!(bot.name(), "Centrist");
        assert!(!bot.permissive());
        assert!(Bot::new(BackendKind::Random).permissive());
    }

    #[test]
    fn test_every_bot_returns_two_cards_from_hand() {
        let cards = hand(&[5, 17, 33, 60, 61, 90, 104, 118]);
        for kind in BackendKind::ALL {
            let mut bot = Bot::with_seed(kind, 3);
            let decisions = bot.play(&cards, &empty_piles(), &view()).unwrap();
            assert_distinct_from_hand(&decisions, &cards);
        }
    }

    #[test]
    fn test_bot_rejects_short_hand() {
        let mut bot = Bot::with_seed(BackendKind::Random, 1);
        let result = bot.play(&hand(&[4]), &empty_piles(), &view());
        assert!(matches!(result, Err(GameError::Backend(_))));
    }

    #[test]
    fn test_always_small_stacks_smallest_cards() {
        let cards = hand(&[80, 12, 40, 9]);
        let decisions = Bot::choose_always_small(&cards, &empty_piles());

        assert_eq!(decisions[0], Decision::place(0, cards[1]));
        assert_eq!(decisions[1], Decision::place(0, cards[3]));
    }

    #[test]
    fn test_better_be_safe_picks_smallest_gap() {
        let mut piles = empty_piles();
        piles[0].add(Card::new(50, Color::Leaf), false).unwrap();
        piles[1].add(Card::new(100, Color::Leaf), false).unwrap();
        piles[2].add(Card::new(10, Color::Leaf), false).unwrap();

        let cards = hand(&[52, 98, 70]);
        let decisions = Bot::choose_better_be_safe(&cards, &piles);

        assert_eq!(decisions[0], Decision::place(0, cards[0]));
        assert_eq!(decisions[1], Decision::place(1, cards[1]));
    }

    #[test]
    fn test_centrist_plays_central_cards_legally() {
        let mut piles = empty_piles();
        for pile in piles.iter_mut() {
            pile.add(Card::new(1, Color::Sakura), false).unwrap();
            pile.add(Card::new(120, Color::Leaf), false).unwrap();
        }

        // Every pile spans the whole range: nothing fits, so both are discards
        let cards = hand(&[58, 64, 2, 110]);
        let decisions = Bot::choose_centrist(&cards, &piles);
        assert!(decisions.iter().all(|d| d.pile.is_none()));
        assert_distinct_from_hand(&decisions, &cards);

        let decisions = Bot::choose_centrist(&cards, &empty_piles());
        assert_eq!(decisions[0].card.value, 58);
        assert_eq!(decisions[1].card.value, 64);
        let (a, b) = (decisions[0].pile.unwrap(), decisions[1].pile.unwrap());
        let mut working = empty_piles();
        working[a].add(decisions[0].card, false).unwrap();
        working[b].add(decisions[1].card, false).unwrap();
    }

    #[test]
    fn test_seeded_bots_are_reproducible() {
        let cards = hand(&[5, 17, 33, 60, 61, 90, 104, 118]);
        let mut a = Bot::with_seed(BackendKind::Random, 99);
        let mut b = Bot::with_seed(BackendKind::Random, 99);
        assert_eq!(
            a.play(&cards, &empty_piles(), &view()).unwrap(),
            b.play(&cards, &empty_piles(), &view()).unwrap()
        );
    }
}
