use serde::{Deserialize, Serialize};

use crate::*;

/// Pixel geometry of the card grid: fixed-size cards laid out row-major at a
/// fixed pitch from an origin margin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLayout {
    pub card_width: i32,
    pub card_height: i32,
    pub margin: i32,
}

impl CardLayout {
    pub const DEFAULT: Self = Self {
        card_width: 100,
        card_height: 100,
        margin: 10,
    };

    pub const fn new(card_width: i32, card_height: i32, margin: i32) -> Self {
        Self {
            card_width,
            card_height,
            margin,
        }
    }

    /// Screen rectangle of the card at `(row, col)`.
    pub const fn card_rect(&self, (row, col): Coord2) -> Rect {
        let x = col as i32 * (self.card_width + self.margin) + self.margin;
        let y = row as i32 * (self.card_height + self.margin) + self.margin;
        Rect::new(x, y, self.card_width, self.card_height)
    }

    /// Total pixel extent of a square grid of `size` cards per side.
    pub const fn board_extent(&self, size: Coord) -> (i32, i32) {
        let size = size as i32;
        (
            size * (self.card_width + self.margin) + self.margin,
            size * (self.card_height + self.margin) + self.margin,
        )
    }

    /// Like [`Self::board_extent`], but `None` when a side does not fit in `i32`.
    pub const fn checked_board_extent(&self, size: Coord) -> Option<(i32, i32)> {
        let Some(width) = checked_side(size, self.card_width, self.margin) else {
            return None;
        };
        let Some(height) = checked_side(size, self.card_height, self.margin) else {
            return None;
        };
        Some((width, height))
    }

    pub(crate) fn validate(&self, size: Coord) -> Result<()> {
        if self.card_width <= 0 || self.card_height <= 0 || self.margin < 0 {
            return Err(GameError::InvalidConfig(format!(
                "card layout must have positive card size and non-negative margin, got {}x{} margin {}",
                self.card_width, self.card_height, self.margin
            )));
        }
        if self.checked_board_extent(size).is_none() {
            return Err(GameError::InvalidConfig(format!(
                "card layout {}x{} margin {} is too large for a {}x{} grid",
                self.card_width, self.card_height, self.margin, size, size
            )));
        }
        Ok(())
    }
}

const fn checked_side(size: Coord, card: i32, margin: i32) -> Option<i32> {
    let Some(pitch) = card.checked_add(margin) else {
        return None;
    };
    let Some(span) = (size as i32).checked_mul(pitch) else {
        return None;
    };
    span.checked_add(margin)
}

impl Default for CardLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_rect_follows_pitch_and_margin() {
        let layout = CardLayout::default();

        assert_eq!(layout.card_rect((0, 0)), Rect::new(10, 10, 100, 100));
        assert_eq!(layout.card_rect((0, 1)), Rect::new(120, 10, 100, 100));
        assert_eq!(layout.card_rect((2, 3)), Rect::new(340, 230, 100, 100));
    }

    #[test]
    fn board_extent_includes_trailing_margin() {
        assert_eq!(CardLayout::default().board_extent(4), (450, 450));
    }

    #[test]
    fn rejects_degenerate_cards() {
        assert!(CardLayout::new(0, 100, 10).validate(4).is_err());
        assert!(CardLayout::new(100, 100, -1).validate(4).is_err());
        assert!(CardLayout::default().validate(8).is_ok());
    }

    #[test]
    fn rejects_layouts_that_overflow_the_board() {
        let huge = CardLayout::new(i32::MAX / 2, 100, 10);

        assert_eq!(huge.checked_board_extent(4), None);
        assert!(matches!(huge.validate(4), Err(GameError::InvalidConfig(_))));
        assert!(CardLayout::new(i32::MAX - 20, 100, 10).validate(1).is_ok());
        assert!(CardLayout::new(100, 100, i32::MAX).validate(2).is_err());
        assert_eq!(CardLayout::default().checked_board_extent(4), Some((450, 450)));
    }
}
