use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Leaderboard storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
