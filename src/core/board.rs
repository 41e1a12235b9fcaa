//! Board module - manages the game grid
//!
//! The grid is 10 columns x 16 rows where each cell is empty or holds a
//! locked piece kind. Uses a flat array for cache locality and
//! zero-allocation. Coordinates: (x, y) with x in 0..10 (left to right)
//! and y in 0..16 (top to bottom). Rows above the grid (y < 0) are the
//! spawn area and always count as clear.

use arrayvec::ArrayVec;

use crate::types::{Cell, FallingPiece, GRID_COLS, GRID_ROWS};

/// Total number of cells on the grid
const GRID_SIZE: usize = GRID_COLS * GRID_ROWS;

/// The playing grid, flat row-major storage (y * COLS + x)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [Cell; GRID_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= GRID_COLS as i8 || y < 0 || y >= GRID_ROWS as i8 {
            return None;
        }
        Some((y as usize) * GRID_COLS + (x as usize))
    }

    pub fn cols(&self) -> usize {
        GRID_COLS
    }

    pub fn rows(&self) -> usize {
        GRID_ROWS
    }

    /// Get cell at position (x, y). Returns None if out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if an in-bounds position holds a locked cell
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Collision test for a piece at its current origin.
    ///
    /// An occupied sub-cell collides when it maps to a column outside the
    /// grid, a row at or below the floor, or a locked cell. Sub-cells with
    /// a negative row are exempt (spawn area).
    pub fn collides(&self, piece: &FallingPiece) -> bool {
        for (my, row) in piece.matrix.iter().enumerate() {
            for (mx, &sub) in row.iter().enumerate() {
                if sub == 0 {
                    continue;
                }
                let gx = piece.x + mx as i8;
                let gy = piece.y + my as i8;
                if gx < 0 || gx >= GRID_COLS as i8 || gy >= GRID_ROWS as i8 {
                    return true;
                }
                if gy >= 0 && self.is_occupied(gx, gy) {
                    return true;
                }
            }
        }
        false
    }

    /// Return a new grid with the piece's occupied, visible sub-cells
    /// written as its kind. The receiver is not mutated.
    pub fn merged(&self, piece: &FallingPiece) -> Grid {
        let mut out = self.clone();
        for (my, row) in piece.matrix.iter().enumerate() {
            for (mx, &sub) in row.iter().enumerate() {
                if sub == 0 {
                    continue;
                }
                let gy = piece.y + my as i8;
                if gy >= 0 {
                    out.set(piece.x + mx as i8, gy, Some(piece.kind));
                }
            }
        }
        out
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= GRID_ROWS {
            return false;
        }
        let start = y * GRID_COLS;
        self.cells[start..start + GRID_COLS]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Remove every full row in a single pass, preserving the relative
    /// order of the remaining rows and inserting empty rows at the top.
    ///
    /// Returns the compacted grid and the removed rows' original indices
    /// in top-to-bottom order. A grid produced by gameplay never holds
    /// more than four simultaneously full rows (one piece spans at most
    /// four rows and prior full rows were already cleared).
    pub fn cleared_full_rows(&self) -> (Grid, ArrayVec<usize, 4>) {
        let mut cleared: ArrayVec<usize, 4> = ArrayVec::new();
        let mut out = Grid::new();
        let mut write_y = GRID_ROWS;

        // Compact from the bottom up; rows left above write_y stay empty.
        for read_y in (0..GRID_ROWS).rev() {
            if self.is_row_full(read_y) {
                cleared.push(read_y);
            } else {
                write_y -= 1;
                let src = read_y * GRID_COLS;
                let dst = write_y * GRID_COLS;
                out.cells[dst..dst + GRID_COLS].copy_from_slice(&self.cells[src..src + GRID_COLS]);
            }
        }

        cleared.reverse();
        (out, cleared)
    }

    /// Export the grid as color codes (0 = empty, 1..=7 = piece kinds)
    /// for renderers and replay tooling
    pub fn write_color_grid(&self, out: &mut [[u8; GRID_COLS]; GRID_ROWS]) {
        for y in 0..GRID_ROWS {
            for x in 0..GRID_COLS {
                out[y][x] = match self.cells[y * GRID_COLS + x] {
                    Some(kind) => kind.color_code(),
                    None => 0,
                };
            }
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
