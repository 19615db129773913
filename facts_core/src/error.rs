use thiserror::Error;

/// Rejected configuration or start request. The message is meant for the player.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("At least one table must be selected")]
    NoOperandsSelected,

    #[error("Pick a factor to start")]
    NoFactorSelected,

    #[error("Factor must be between 1 and 12, got {0}")]
    FactorOutOfRange(u8),

    #[error("Tables run from 1 to 12, got {0}")]
    OperandOutOfRange(u8),

    #[error("Enter between 10 and 600 seconds")]
    InvalidDuration(u32),

    #[error("{0} has no countdown")]
    NotTimedGame(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown game: {0}")]
pub struct UnknownGame(pub String);
