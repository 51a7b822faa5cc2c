//! Reveal, flag and win/loss evaluation on a [`Grid`].

use super::types::{Grid, Pos};

/// Result of a reveal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Out of bounds, already revealed, or flagged.
    NoChange,
    /// Safe cells revealed, in reveal order (flood fill included).
    Revealed(Vec<Pos>),
    /// The requested cell was a mine.
    HitMine,
}

impl RevealOutcome {
    pub fn revealed_cells(&self) -> &[Pos] {
        match self {
            RevealOutcome::Revealed(cells) => cells,
            _ => &[],
        }
    }
}

/// Result of a flag toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

/// Reveal a cell at the given position.
///
/// - Flagged or already revealed cells are left alone.
/// - A mine is marked revealed and reported as [`RevealOutcome::HitMine`].
/// - A cell with zero adjacent mines flood-fills its neighbours, using an
///   explicit stack; every cell is revealed at most once.
pub fn reveal(grid: &mut Grid, row: usize, col: usize) -> RevealOutcome {
    let Some(cell) = grid.cell(row, col) else {
        return RevealOutcome::NoChange;
    };

    if cell.is_revealed || cell.is_flagged {
        return RevealOutcome::NoChange;
    }

    if cell.is_mine {
        grid.cells[row][col].is_revealed = true;
        return RevealOutcome::HitMine;
    }

    let mut revealed = Vec::new();
    let mut stack: Vec<Pos> = vec![(row, col)];

    while let Some((r, c)) = stack.pop() {
        let cell = &mut grid.cells[r][c];

        if cell.is_revealed || cell.is_flagged || cell.is_mine {
            continue;
        }

        cell.is_revealed = true;
        grid.revealed_count += 1;
        revealed.push((r, c));

        if cell.neighbor_mines == 0 {
            stack.extend(grid.neighbors(r, c));
        }
    }

    RevealOutcome::Revealed(revealed)
}

/// Toggle flag on a cell. Revealed and out-of-bounds cells cannot be flagged.
pub fn toggle_flag(grid: &mut Grid, row: usize, col: usize) -> FlagOutcome {
    let Some(cell) = grid.cell(row, col) else {
        return FlagOutcome::NoChange;
    };

    if cell.is_revealed {
        return FlagOutcome::NoChange;
    }

    if cell.is_flagged {
        grid.cells[row][col].is_flagged = false;
        grid.flag_count -= 1;
        FlagOutcome::Unflagged
    } else {
        grid.cells[row][col].is_flagged = true;
        grid.flag_count += 1;
        FlagOutcome::Flagged
    }
}

/// Win condition: every safe cell is revealed. Flags play no part.
pub fn check_win(grid: &Grid) -> bool {
    grid.revealed_count == grid.safe_cell_count()
}

/// Reveal every unflagged mine after a loss. Returns the cells newly shown.
pub fn reveal_all_mines(grid: &mut Grid) -> Vec<Pos> {
    let mut shown = Vec::new();

    for &(row, col) in &grid.mine_locations {
        let cell = &mut grid.cells[row][col];
        if cell.is_flagged || cell.is_revealed {
            continue;
        }
        cell.is_revealed = true;
        shown.push((row, col));
    }

    shown
}
