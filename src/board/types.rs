//! Minefield data structures.
//!
//! The grid is allocated empty; mines are placed lazily on the first reveal
//! so that the first click is always safe.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::constants::{BOARD_HEIGHT, BOARD_MINES, BOARD_WIDTH};
use crate::error::BoardError;

/// Grid position as (row, col).
pub type Pos = (usize, usize);

/// Represents a single cell in the minefield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    /// Whether this cell contains a mine.
    pub is_mine: bool,
    /// Whether this cell has been revealed.
    pub is_revealed: bool,
    /// Whether this cell has been flagged by the player.
    pub is_flagged: bool,
    /// Number of adjacent mines (0-8). Zero for mine cells.
    pub neighbor_mines: u8,
}

/// Board dimensions and mine count. Only built through [`BoardConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    width: usize,
    height: usize,
    mines: usize,
}

impl BoardConfig {
    /// Builds a config, clamping to at least one cell and at least one safe cell.
    pub fn new(width: usize, height: usize, mines: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mines = mines.min(width.saturating_mul(height) - 1);
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mines(&self) -> usize {
        self.mines
    }

    pub fn total_cells(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT, BOARD_MINES)
    }
}

/// Get valid neighbor coordinates for a cell (up to 8 directions).
pub fn neighbors(row: usize, col: usize, height: usize, width: usize) -> Vec<Pos> {
    let mut result = Vec::with_capacity(8);

    for d_row in -1i64..=1 {
        for d_col in -1i64..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }

            let new_row = row as i64 + d_row;
            let new_col = col as i64 + d_col;

            if new_row >= 0 && new_row < height as i64 && new_col >= 0 && new_col < width as i64 {
                result.push((new_row as usize, new_col as usize));
            }
        }
    }

    result
}

/// The minefield: mine layout plus per-cell reveal/flag state.
///
/// Reveal and flag state is only mutated through [`crate::board::reveal`].
#[derive(Debug, Clone)]
pub struct Grid {
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) mine_count: usize,
    /// Indexed as cells[row][col].
    pub(super) cells: Vec<Vec<Cell>>,
    /// Mine positions in placement order.
    pub(super) mine_locations: Vec<Pos>,
    pub(super) mines_placed: bool,
    /// Revealed safe cells.
    pub(super) revealed_count: usize,
    pub(super) flag_count: usize,
}

impl Grid {
    /// Create an empty grid. Mines are not placed until [`Grid::place_mines`].
    pub fn new(config: BoardConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            mine_count: config.mines,
            cells: vec![vec![Cell::default(); config.width]; config.height],
            mine_locations: Vec::with_capacity(config.mines),
            mines_placed: false,
            revealed_count: 0,
            flag_count: 0,
        }
    }

    /// Create a grid with a fixed mine layout. Duplicate positions count once.
    pub fn from_mines(width: usize, height: usize, mines: &[Pos]) -> Result<Self, BoardError> {
        let mut grid = Self::new(BoardConfig {
            width,
            height,
            mines: 0,
        });

        for &(row, col) in mines {
            if !grid.is_in_bounds(row, col) {
                return Err(BoardError::InvalidCoords);
            }
            if grid.cells[row][col].is_mine {
                continue;
            }
            grid.cells[row][col].is_mine = true;
            grid.mine_locations.push((row, col));
        }

        if grid.mine_locations.len() >= width * height {
            return Err(BoardError::TooManyMines);
        }

        grid.mine_count = grid.mine_locations.len();
        grid.mines_placed = true;
        grid.calculate_neighbor_counts();
        Ok(grid)
    }

    /// Place mines uniformly at random, never on the excluded cell.
    ///
    /// Runs once per grid; a second call fails and leaves the layout intact.
    pub fn place_mines<R: Rng>(
        &mut self,
        exclude_row: usize,
        exclude_col: usize,
        rng: &mut R,
    ) -> Result<(), BoardError> {
        if self.mines_placed {
            return Err(BoardError::MinesAlreadyPlaced);
        }
        if !self.is_in_bounds(exclude_row, exclude_col) {
            return Err(BoardError::InvalidCoords);
        }
        if self.mine_count >= self.width * self.height {
            return Err(BoardError::TooManyMines);
        }

        let mut candidates: Vec<Pos> = Vec::with_capacity(self.width * self.height - 1);
        for row in 0..self.height {
            for col in 0..self.width {
                if (row, col) != (exclude_row, exclude_col) {
                    candidates.push((row, col));
                }
            }
        }

        candidates.shuffle(rng);

        for &(row, col) in candidates.iter().take(self.mine_count) {
            self.cells[row][col].is_mine = true;
            self.mine_locations.push((row, col));
        }

        self.mines_placed = true;
        self.calculate_neighbor_counts();

        log::debug!(
            "placed {} mines on {}x{} grid, excluding ({}, {})",
            self.mine_count,
            self.width,
            self.height,
            exclude_row,
            exclude_col
        );
        Ok(())
    }

    fn calculate_neighbor_counts(&mut self) {
        for row in 0..self.height {
            for col in 0..self.width {
                if self.cells[row][col].is_mine {
                    continue;
                }

                let count = self
                    .neighbors(row, col)
                    .into_iter()
                    .filter(|&(r, c)| self.cells[r][c].is_mine)
                    .count();

                self.cells[row][col].neighbor_mines = count as u8;
            }
        }
    }

    pub fn is_in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn is_mine(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(|c| c.is_mine)
    }

    pub fn neighbors(&self, row: usize, col: usize) -> Vec<Pos> {
        neighbors(row, col, self.height, self.width)
    }

    /// Iterate all cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Pos, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| ((row, col), cell))
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn mine_locations(&self) -> &[Pos] {
        &self.mine_locations
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn flag_count(&self) -> usize {
        self.flag_count
    }

    pub fn safe_cell_count(&self) -> usize {
        (self.width * self.height).saturating_sub(self.mine_count)
    }

    /// Mines minus flags. Negative when the player over-flags.
    pub fn mines_remaining(&self) -> i32 {
        self.mine_count as i32 - self.flag_count as i32
    }
}
