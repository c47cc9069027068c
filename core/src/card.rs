use serde::{Deserialize, Serialize};

use crate::*;

/// A single card of the grid. Its position is fixed, its pair-id is what a
/// shuffle permutes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    row: Coord,
    col: Coord,
    pair: PairId,
    face_up: bool,
    matched: bool,
}

impl Card {
    pub const fn new(row: Coord, col: Coord, pair: PairId) -> Self {
        Self {
            row,
            col,
            pair,
            face_up: false,
            matched: false,
        }
    }

    pub const fn row(&self) -> Coord {
        self.row
    }

    pub const fn col(&self) -> Coord {
        self.col
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }

    pub const fn pair(&self) -> PairId {
        self.pair
    }

    pub const fn is_face_up(&self) -> bool {
        self.face_up
    }

    pub const fn is_matched(&self) -> bool {
        self.matched
    }

    /// Whether a click on this card may flip it.
    pub const fn is_selectable(&self) -> bool {
        !self.face_up && !self.matched
    }

    pub(crate) fn flip(&mut self) {
        self.face_up = !self.face_up;
    }

    pub(crate) fn set_matched(&mut self) {
        self.matched = true;
    }

    pub(crate) fn set_pair(&mut self, pair: PairId) {
        self.pair = pair;
    }
}
