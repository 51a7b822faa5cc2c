//! Runtime use of abilities against a live round.
//!
//! Highlights never touch grid state; only magnetism reveals cells, and it
//! does so through the regular reveal path.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{reveal, Grid, Pos};
use crate::core::constants::*;
use crate::error::AbilityError;
use crate::progression::{ProfileBackend, ProgressionStore};
use crate::session::RoundStatus;

use super::types::AbilityKey;

/// What a highlight points at, so the renderer can style it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    Mine,
    SafeCell,
}

/// Effect of a successful ability use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityEffect {
    /// Temporarily mark cells on screen.
    Highlight {
        cells: Vec<Pos>,
        duration_ms: u64,
        kind: HighlightKind,
    },
    /// Stop the round clock for a while.
    FreezeTimer { seconds: u64 },
    /// Safe cells opened by magnetism, flood fill included.
    Revealed(Vec<Pos>),
}

/// First few mines in placement order.
pub fn scan_mines(grid: &Grid) -> Vec<Pos> {
    grid.mine_locations()
        .iter()
        .take(SCANNER_MINES_SHOWN)
        .copied()
        .collect()
}

/// Hidden, unflagged safe cells.
pub fn safe_hidden_cells(grid: &Grid) -> Vec<Pos> {
    grid.iter_cells()
        .filter(|(_, c)| !c.is_revealed && !c.is_mine && !c.is_flagged)
        .map(|(pos, _)| pos)
        .collect()
}

/// Hidden safe cells touching at least one revealed cell.
pub fn hint_candidates(grid: &Grid) -> Vec<Pos> {
    safe_hidden_cells(grid)
        .into_iter()
        .filter(|&(row, col)| {
            grid.neighbors(row, col)
                .into_iter()
                .any(|(r, c)| grid.cell(r, c).is_some_and(|n| n.is_revealed))
        })
        .collect()
}

/// Pick a random safe cell next to the revealed area.
pub fn find_hint<R: Rng>(grid: &Grid, rng: &mut R) -> Option<Pos> {
    hint_candidates(grid).choose(rng).copied()
}

/// Open up to [`MAGNETISM_CELLS`] random safe cells.
pub fn magnetize<R: Rng>(grid: &mut Grid, rng: &mut R) -> Vec<Pos> {
    let candidates = safe_hidden_cells(grid);
    let chosen: Vec<Pos> = candidates
        .choose_multiple(rng, MAGNETISM_CELLS)
        .copied()
        .collect();

    let mut opened = Vec::new();
    for (row, col) in chosen {
        opened.extend_from_slice(reveal(grid, row, col).revealed_cells());
    }
    opened
}

/// Use an ability: check preconditions, apply the effect, spend one use.
///
/// Failures leave the profile and grid untouched. The shield never runs
/// on demand; it is consumed by the session when a mine is hit.
pub fn use_ability<B: ProfileBackend, R: Rng>(
    key: AbilityKey,
    status: RoundStatus,
    grid: &mut Grid,
    store: &mut ProgressionStore<B>,
    rng: &mut R,
) -> Result<AbilityEffect, AbilityError> {
    if !store.profile().is_unlocked(key) {
        return Err(AbilityError::Locked);
    }
    if status.is_over() {
        return Err(AbilityError::GameOver);
    }
    store.check_uses(key)?;
    if key == AbilityKey::Shield {
        return Err(AbilityError::Passive);
    }
    if status == RoundStatus::Fresh {
        return Err(AbilityError::NotStarted);
    }

    let effect = match key {
        AbilityKey::Scanner => AbilityEffect::Highlight {
            cells: scan_mines(grid),
            duration_ms: SCANNER_DURATION_MS,
            kind: HighlightKind::Mine,
        },
        AbilityKey::Hint => {
            let cell = find_hint(grid, rng).ok_or(AbilityError::NoHintAvailable)?;
            AbilityEffect::Highlight {
                cells: vec![cell],
                duration_ms: HINT_DURATION_MS,
                kind: HighlightKind::SafeCell,
            }
        }
        AbilityKey::Telepathy => AbilityEffect::Highlight {
            cells: grid.mine_locations().to_vec(),
            duration_ms: TELEPATHY_DURATION_MS,
            kind: HighlightKind::Mine,
        },
        AbilityKey::TimeShield => AbilityEffect::FreezeTimer {
            seconds: TIME_SHIELD_SECONDS,
        },
        AbilityKey::Magnetism => {
            if safe_hidden_cells(grid).is_empty() {
                return Err(AbilityError::NothingToReveal);
            }
            AbilityEffect::Revealed(magnetize(grid, rng))
        }
        AbilityKey::Shield => return Err(AbilityError::Passive),
    };

    store.consume_use(key)?;
    log::debug!("used ability {}", key.as_str());
    Ok(effect)
}
