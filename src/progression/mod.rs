//! Player progression: profile, XP and levels, ability economy, persistence.
//!
//! The profile persists across rounds. Every mutation goes through
//! [`ProgressionStore`], which saves after each change.

pub mod levels;
pub mod persistence;
pub mod store;
pub mod types;

pub use levels::*;
pub use persistence::*;
pub use store::*;
pub use types::*;
