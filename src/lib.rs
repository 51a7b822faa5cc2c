//! Minesweep - Minesweeper with levels, experience and unlockable abilities
//!
//! This module exposes the game logic for testing and external use.

pub mod abilities;
pub mod board;
pub mod core;
pub mod error;
pub mod progression;
pub mod session;
