//! The player's card hand.

use rand::seq::IndexedRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::game::{Grade, UnitType};

/// One spawnable card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Grade of the unit the card spawns.
    pub grade: Grade,
    /// Type of the unit the card spawns.
    #[serde(rename = "type")]
    pub unit_type: UnitType,
}

/// Ordered card slots shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck from explicit cards.
    #[must_use]
    pub const fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Deal `size` cards, each with a grade drawn from `grades` and a
    /// uniformly random type. An empty grade pool yields an empty deck.
    pub fn random(rng: &mut dyn RngCore, size: usize, grades: &[Grade]) -> Self {
        let cards = (0..size)
            .map_while(|_| {
                let grade = *grades.choose(rng)?;
                let unit_type = *UnitType::ALL.choose(rng)?;
                Some(Card { grade, unit_type })
            })
            .collect();
        Self { cards }
    }

    /// Card at `slot`, if the slot exists.
    #[must_use]
    pub fn card(&self, slot: usize) -> Option<Card> {
        self.cards.get(slot).copied()
    }

    /// All cards in slot order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
