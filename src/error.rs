//! Error types shared by the board and ability layers.
//!
//! None of these are fatal: the session turns them into a message banner
//! and leaves all state untouched.

use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines for the board size")]
    TooManyMines,
    #[error("Mines have already been placed on this board")]
    MinesAlreadyPlaced,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum AbilityError {
    #[error("Ability not unlocked yet")]
    Locked,
    #[error("Ability unavailable: no uses left")]
    NoUsesLeft,
    #[error("Ability unavailable: the round is over")]
    GameOver,
    #[error("Reveal a cell before using abilities")]
    NotStarted,
    #[error("No hints available")]
    NoHintAvailable,
    #[error("No safe cells left to open")]
    NothingToReveal,
    #[error("Shield activates automatically when you hit a mine")]
    Passive,
    #[error("Not enough score: need {cost}, have {available}")]
    InsufficientScore { cost: u32, available: u32 },
}
