use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Config must have an entities list")]
    MissingEntities,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Board must be a non-empty rectangle")]
    InvalidBoardShape,
    #[error("Solution {index} does not exist, {available} available")]
    UnknownSolution { index: usize, available: usize },
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
