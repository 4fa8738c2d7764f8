use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index or coordinates out of range")]
    OutOfRange,
    #[error("Invalid board configuration")]
    InvalidConfig,
    #[error("Mine layout is not complete yet")]
    IncompleteLayout,
    #[error("No safe cells to score against")]
    DivisionByZero,
    #[error("Invalid match transition")]
    InvalidTransition,
    #[error("Round already finished, no new moves are accepted")]
    RoundFinished,
}

pub type Result<T> = core::result::Result<T, GameError>;
