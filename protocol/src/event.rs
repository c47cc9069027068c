use memory_core::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::*;

/// Discrete input reported by the display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    CardClicked { x: i32, y: i32 },
    ResetClicked,
    NameEntered { name: String },
    DifficultySelected { size: Coord },
    ShowInstructions,
    ShowLeaderboard,
    Back,
    /// Sent once per rendered frame so timers can advance.
    Tick,
}

impl InputEvent {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub const fn click_point(&self) -> Option<Point> {
        match *self {
            Self::CardClicked { x, y } => Some(Point::new(x, y)),
            _ => None,
        }
    }
}
