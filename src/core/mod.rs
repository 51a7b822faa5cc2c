//! Shared game constants.

pub mod constants;

pub use constants::*;
