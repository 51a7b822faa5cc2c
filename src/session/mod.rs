//! One round of play wired to the player's progression.

pub mod events;
pub mod logic;
pub mod timer;

pub use events::*;
pub use logic::*;
pub use timer::*;
