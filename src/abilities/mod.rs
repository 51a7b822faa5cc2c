//! Ability catalog, per-profile ability state and runtime effects.

pub mod data;
pub mod logic;
pub mod types;

pub use data::*;
pub use logic::*;
pub use types::*;
