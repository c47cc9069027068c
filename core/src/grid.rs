use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Square grid of cards stored row-major. Every pair-id is carried by exactly
/// two cards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    size: Coord,
    cards: Array2<Card>,
}

impl Grid {
    /// Allocates `size * size` face-down cards with pair-ids assigned in order,
    /// so cards `2k` and `2k + 1` start out as a pair.
    pub fn new(size: Coord) -> Result<Self> {
        let size = Self::validate_size(size)?;
        let side = usize::from(size);
        let cards = Array2::from_shape_fn((side, side), |(row, col)| {
            let index = row * side + col;
            Card::new(row as Coord, col as Coord, (index / 2) as PairId)
        });
        log::debug!("Created {}x{} grid with {} pairs", size, size, mult(size, size) / 2);
        Ok(Self { size, cards })
    }

    /// A grid side must be positive and even so that every card has a partner.
    pub fn validate_size(size: Coord) -> Result<Coord> {
        if size == 0 {
            return Err(GameError::InvalidConfig("grid size must be positive".into()));
        }
        if size % 2 != 0 {
            return Err(GameError::InvalidConfig(format!(
                "grid size {size} gives an odd number of cards"
            )));
        }
        Ok(size)
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn len(&self) -> CardCount {
        mult(self.size, self.size)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pair_count(&self) -> CardCount {
        self.len() / 2
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.size && coords.1 < self.size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn card(&self, coords: Coord2) -> Option<&Card> {
        self.cards.get(coords.to_nd_index())
    }

    /// Cards in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Uniformly permutes the pair-ids over the grid positions (Fisher-Yates).
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let mut pairs: Vec<PairId> = self.cards.iter().map(Card::pair).collect();
        for i in (1..pairs.len()).rev() {
            let j = rng.random_range(0..=i);
            pairs.swap(i, j);
        }
        for (card, pair) in self.cards.iter_mut().zip(pairs) {
            card.set_pair(pair);
        }
        log::trace!("Shuffled {} cards", self.len());
    }

    /// Finds the card whose on-screen rectangle strictly contains `point`.
    pub fn card_at(&self, layout: &CardLayout, point: Point) -> Option<Coord2> {
        let found = self
            .cards
            .iter()
            .map(Card::coords)
            .find(|&coords| layout.card_rect(coords).contains(point));
        if found.is_none() {
            log::trace!("No card at ({}, {})", point.x, point.y);
        }
        found
    }

    /// Toggles the card face. Callers are responsible for not flipping
    /// face-up or matched cards.
    pub fn flip(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.cards[coords.to_nd_index()].flip();
        Ok(())
    }

    pub fn mark_matched(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.cards[coords.to_nd_index()].set_matched();
        Ok(())
    }

    /// Two distinct cards match when they share a pair-id.
    pub fn is_pair(&self, a: Coord2, b: Coord2) -> bool {
        if a == b {
            return false;
        }
        match (self.card(a), self.card(b)) {
            (Some(a), Some(b)) => a.pair() == b.pair(),
            _ => false,
        }
    }

    pub fn matched_count(&self) -> CardCount {
        self.cards.iter().filter(|card| card.is_matched()).count() as CardCount
    }

    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(Card::is_matched)
    }

    /// Coordinates of the other card carrying the same pair-id.
    pub fn partner_of(&self, coords: Coord2) -> Option<Coord2> {
        let pair = self.card(coords)?.pair();
        self.cards
            .iter()
            .find(|card| card.pair() == pair && card.coords() != coords)
            .map(Card::coords)
    }
}
