//! Core of a matching-pairs memory game: the card grid, the turn state
//! machine, scoring and the persisted leaderboard.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use card::*;
pub use clock::*;
pub use error::*;
pub use grid::*;
pub use layout::*;
pub use leaderboard::*;
pub use score::*;
pub use session::*;
pub use types::*;

mod card;
mod clock;
mod error;
mod grid;
mod layout;
mod leaderboard;
mod score;
mod session;
mod types;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn grid_size(self) -> Coord {
        match self {
            Self::Easy => 4,
            Self::Medium => 6,
            Self::Hard => 8,
        }
    }

    pub fn from_grid_size(size: Coord) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.grid_size() == size)
            .ok_or_else(|| GameError::InvalidConfig(format!("no difficulty with grid size {size}")))
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    /// How long a mismatched pair stays face up before flipping back.
    pub mismatch_delay: Duration,
    pub layout: CardLayout,
}

impl GameConfig {
    pub const DEFAULT_MISMATCH_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(size: Coord) -> Result<Self> {
        let config = Self {
            size,
            mismatch_delay: Self::DEFAULT_MISMATCH_DELAY,
            layout: CardLayout::DEFAULT,
        };
        config.validate()?;
        Ok(config)
    }

    pub const fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            size: difficulty.grid_size(),
            mismatch_delay: Self::DEFAULT_MISMATCH_DELAY,
            layout: CardLayout::DEFAULT,
        }
    }

    pub const fn with_mismatch_delay(self, mismatch_delay: Duration) -> Self {
        Self {
            mismatch_delay,
            ..self
        }
    }

    pub const fn with_layout(self, layout: CardLayout) -> Self {
        Self { layout, ..self }
    }

    pub const fn total_cards(&self) -> CardCount {
        mult(self.size, self.size)
    }

    pub fn validate(&self) -> Result<()> {
        Grid::validate_size(self.size)?;
        self.layout.validate(self.size)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::default())
    }
}

/// What a click or a timer update did to the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    /// Nothing changed.
    Ignored,
    /// First card of a turn was turned face up.
    Flipped,
    /// Second card matched the first one.
    Matched,
    /// Second card did not match, both stay visible until the delay elapses.
    Mismatched,
    /// A mismatched pair was turned face down again.
    Concealed,
    /// The last pair was matched and the game is over.
    Completed,
}

impl ClickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}
