//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the color of the
//! piece that filled it. Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Pieces may hang above the board (negative y); those cells are ignored by
//! collision against the stack and by merging.

use arrayvec::ArrayVec;

use crate::pieces::Tetromino;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Number of rows, as a capacity for row lists
pub const BOARD_ROWS: usize = BOARD_HEIGHT as usize;

/// Result of a line clear pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineClear {
    /// Indices of the removed rows, top to bottom, as they were before removal.
    pub rows: ArrayVec<usize, BOARD_ROWS>,
    /// Lifetime cleared-line count after this pass.
    pub total: u32,
}

impl LineClear {
    /// Number of rows removed by this pass.
    pub fn cleared(&self) -> u32 {
        self.rows.len() as u32
    }
}

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
    /// Rows cleared since the last reset
    lines_cleared: u32,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            lines_cleared: 0,
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Lifetime cleared-line count
    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Borrow a single row, `None` past the bottom.
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= BOARD_ROWS {
            return None;
        }
        let width = BOARD_WIDTH as usize;
        let start = y * width;
        Some(&self.cells[start..start + width])
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(BOARD_WIDTH as usize)
    }

    /// Would `piece`, shifted by (dx, dy), hit a wall, the floor, or the stack?
    ///
    /// Cells above the board (y < 0) only take part in the wall check.
    pub fn collides(&self, piece: &Tetromino, dx: i8, dy: i8) -> bool {
        piece.minos().iter().any(|&(mx, my)| {
            let x = piece.x + mx + dx;
            let y = piece.y + my + dy;
            if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
                return true;
            }
            y >= 0 && self.is_occupied(x, y)
        })
    }

    /// Write the piece's color into every on-board cell it covers.
    ///
    /// Cells outside the board are skipped.
    pub fn merge(&mut self, piece: &Tetromino) {
        let color = piece.color();
        for &(mx, my) in piece.minos().iter() {
            self.set(piece.x + mx, piece.y + my, Some(color));
        }
    }

    /// Remove all full rows, shift the rest down, and add the count to the
    /// lifetime total.
    ///
    /// Uses a two-pointer compaction from the bottom up with zero allocation.
    pub fn clear_lines(&mut self) -> LineClear {
        let mut rows = ArrayVec::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_ROWS;

        for read_y in (0..BOARD_ROWS).rev() {
            if self.is_row_full(read_y) {
                rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Everything above the last surviving row becomes empty.
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        rows.reverse();
        self.lines_cleared += rows.len() as u32;

        LineClear {
            rows,
            total: self.lines_cleared,
        }
    }

    /// True iff the top row holds any filled cell.
    pub fn is_game_over(&self) -> bool {
        self.row(0)
            .map(|row| row.iter().any(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Empty every cell and zero the lifetime counter.
    pub fn reset(&mut self) {
        self.cells.fill(None);
        self.lines_cleared = 0;
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the grid into a row-major 2D array.
    pub fn write_grid(&self, out: &mut [[Cell; BOARD_WIDTH as usize]; BOARD_ROWS]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
    }

    /// Create from a 2D vector for testing (converts to flat array)
    #[cfg(test)]
    pub fn from_cells(cells_2d: Vec<Vec<Cell>>) -> Self {
        assert_eq!(cells_2d.len(), BOARD_ROWS);
        assert!(cells_2d.iter().all(|row| row.len() == BOARD_WIDTH as usize));

        let mut board = Self::new();
        for (y, row) in cells_2d.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                board.cells[y * BOARD_WIDTH as usize + x] = *cell;
            }
        }
        board
    }

    /// Convert to 2D vector for testing/display
    #[cfg(test)]
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
