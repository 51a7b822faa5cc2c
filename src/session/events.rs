//! Events emitted by [`super::GameSession`] for the renderer to apply.

use crate::abilities::{AbilityKey, HighlightKind};
use crate::board::Pos;

/// What a revealed cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellContent {
    /// Safe cell with its adjacent mine count (0 draws blank).
    Number(u8),
    Mine,
}

/// Round summary shown when a round ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundStats {
    pub won: bool,
    pub time_seconds: u32,
    pub round_score: u32,
    pub total_score: u32,
    pub xp_gained: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub new_best_time: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    CellRevealed {
        row: usize,
        col: usize,
        content: CellContent,
    },
    CellFlagged {
        row: usize,
        col: usize,
        flagged: bool,
    },
    /// Temporary overlay; expires on its own after `duration_ms`.
    HighlightCells {
        cells: Vec<Pos>,
        duration_ms: u64,
        kind: HighlightKind,
    },
    /// A shield charge absorbed a mine at this cell.
    ShieldAbsorbed { row: usize, col: usize },
    TimerTick { elapsed: u32 },
    LevelUp {
        level: u32,
        unlocked: Vec<AbilityKey>,
    },
    /// Ability uses, levels or affordability changed.
    AbilitiesChanged,
    GameEnded { won: bool, stats: RoundStats },
    /// Short-lived banner text.
    Message(String),
}
