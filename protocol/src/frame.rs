use std::fmt;

use memory_core::{Card, Coord, GameResult, Leaderboard, Rect};
use serde::{Deserialize, Serialize};

use crate::*;

/// Screen the display should show.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiMode {
    #[default]
    Menu,
    Instructions,
    Leaderboard,
    NameEntry,
    Playing,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFace {
    Down,
    Up,
    Matched,
}

impl From<&Card> for CardFace {
    fn from(card: &Card) -> Self {
        if card.is_matched() {
            Self::Matched
        } else if card.is_face_up() {
            Self::Up
        } else {
            Self::Down
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub row: Coord,
    pub col: Coord,
    pub rect: Rect,
    pub face: CardFace,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub width: i32,
    pub height: i32,
    pub cards: Vec<CardView>,
}

/// Running numbers shown above the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub moves: u32,
    pub elapsed_secs: u64,
    pub score: u32,
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Moves: {}  Time: {}  Score: {}",
            self.moves,
            format_mm_ss(self.elapsed_secs),
            self.score
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub score: u32,
}

impl LeaderboardRow {
    pub fn rows(board: &Leaderboard) -> Vec<Self> {
        board
            .entries()
            .iter()
            .enumerate()
            .map(|(idx, entry)| Self {
                rank: idx + 1,
                name: entry.name.clone(),
                score: entry.score,
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyOption {
    pub name: String,
    pub size: Coord,
}

/// Everything the display needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub mode: UiMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub difficulties: Vec<DifficultyOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hud: Option<Hud>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GameResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leaderboard: Vec<LeaderboardRow>,
    pub player_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Frame {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

pub fn format_mm_ss(total_secs: u64) -> String {
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

#[cfg(test)]
mod tests {
    use memory_core::LeaderboardEntry;

    use super::*;

    #[test]
    fn hud_text_formats_time_as_minutes() {
        let hud = Hud {
            moves: 12,
            elapsed_secs: 125,
            score: 9_755,
        };

        assert_eq!(hud.to_string(), "Moves: 12  Time: 02:05  Score: 9755");
        assert_eq!(format_mm_ss(0), "00:00");
    }

    #[test]
    fn leaderboard_rows_are_ranked_from_one() {
        let board = Leaderboard::from_entries(vec![
            LeaderboardEntry::new("ada", 10),
            LeaderboardEntry::new("bob", 20),
        ]);

        let rows = LeaderboardRow::rows(&board);

        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].name, "bob");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].score, 10);
    }

    #[test]
    fn empty_sections_are_left_out_of_json() {
        let frame = Frame {
            player_name: "ada".into(),
            ..Frame::default()
        };

        let json = frame.to_json().unwrap();

        assert_eq!(json, r#"{"mode":"menu","player_name":"ada"}"#);
        assert_eq!(Frame::from_json(&json).unwrap(), frame);
    }
}
