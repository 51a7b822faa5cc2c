//! Minefield: mine layout, reveal/flag state and the flood-fill reveal.

pub mod reveal;
pub mod types;

pub use reveal::*;
pub use types::*;
