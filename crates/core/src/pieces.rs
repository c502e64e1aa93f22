//! Pieces module - tetromino shapes and matrix rotation
//!
//! Every piece kind has a square base matrix (2x2 for O, 4x4 for I, 3x3 for the
//! rest). Other orientations are derived by rotating the matrix clockwise, so a
//! kind's pattern for a given rotation is always the same.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::rng::PieceGenerator;
use crate::types::{Color, PieceKind, Rotation};

/// Largest matrix side (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Offset of a single mino relative to the matrix's top-left corner, as (x, y)
pub type MinoOffset = (i8, i8);

/// Filled cells of a shape
pub type Minos = ArrayVec<MinoOffset, { MAX_SHAPE_SIZE * MAX_SHAPE_SIZE }>;

/// Default spawn anchor (x, y) for new pieces
pub const SPAWN_POSITION: (i8, i8) = (3, 0);

/// A square cell pattern of side 2..=4, stored row-major.
///
/// `Copy`, so every read hands out an independent snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    size: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl ShapeMatrix {
    /// Build from rows of 0/1 values. Only the first `rows.len()` columns of
    /// each row are read.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let size = rows.len().min(MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in rows.iter().take(size).enumerate() {
            for (x, &v) in row.iter().take(size).enumerate() {
                cells[y][x] = v != 0;
            }
        }
        Self {
            size: size as u8,
            cells,
        }
    }

    /// Side length of the matrix
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Is the cell at column `x`, row `y` filled? False outside the matrix.
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.size() && y < self.size() && self.cells[y][x]
    }

    /// One row of the matrix, `size` cells long.
    pub fn row(&self, y: usize) -> &[bool] {
        &self.cells[y][..self.size()]
    }

    /// Rotate 90° clockwise: `new[x][size - 1 - y] = old[y][x]`.
    pub fn rotate_cw(&self) -> Self {
        let n = self.size();
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for y in 0..n {
            for x in 0..n {
                cells[x][n - 1 - y] = self.cells[y][x];
            }
        }
        Self {
            size: self.size,
            cells,
        }
    }

    /// Offsets of the filled cells, scanned row by row.
    pub fn minos(&self) -> Minos {
        let mut out = Minos::new();
        let n = self.size();
        for y in 0..n {
            for x in 0..n {
                if self.cells[y][x] {
                    out.push((x as i8, y as i8));
                }
            }
        }
        out
    }
}

/// Base (spawn orientation) matrix for a piece kind
pub fn base_shape(kind: PieceKind) -> ShapeMatrix {
    match kind {
        PieceKind::I => ShapeMatrix::from_rows(&[
            &[0, 0, 0, 0],
            &[1, 1, 1, 1],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
        ]),
        PieceKind::J => ShapeMatrix::from_rows(&[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]]),
        PieceKind::L => ShapeMatrix::from_rows(&[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]]),
        PieceKind::O => ShapeMatrix::from_rows(&[&[1, 1], &[1, 1]]),
        PieceKind::S => ShapeMatrix::from_rows(&[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]),
        PieceKind::T => ShapeMatrix::from_rows(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]),
        PieceKind::Z => ShapeMatrix::from_rows(&[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]),
    }
}

/// Get the shape for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> ShapeMatrix {
    let mut shape = base_shape(kind);
    if kind == PieceKind::O {
        return shape;
    }
    for _ in 0..rotation.index() {
        shape = shape.rotate_cw();
    }
    shape
}

/// Spawn anchor for a piece kind.
///
/// I starts one row higher so its empty top row hangs above the board; O
/// starts one column right so the 2-wide square sits centered.
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    let (x, y) = SPAWN_POSITION;
    match kind {
        PieceKind::I => (x, y - 1),
        PieceKind::O => (x + 1, y),
        _ => (x, y),
    }
}

/// Falling piece: kind, orientation and the board position of its matrix's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    kind: PieceKind,
    rotation: Rotation,
    shape: ShapeMatrix,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at its spawn position
    pub fn new(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            rotation: Rotation::North,
            shape: base_shape(kind),
            x,
            y,
        }
    }

    /// Create a tetromino of a uniformly drawn kind
    pub fn random(generator: &mut PieceGenerator) -> Self {
        Self::new(generator.draw())
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    /// Current orientation's cell pattern (a copy)
    pub fn shape(&self) -> ShapeMatrix {
        self.shape
    }

    /// Filled cell offsets of the current orientation
    pub fn minos(&self) -> Minos {
        self.shape.minos()
    }

    /// Board coordinates of the filled cells
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .minos()
            .into_iter()
            .map(move |(mx, my)| (self.x + mx, self.y + my))
    }

    /// Turn the shape 90° clockwise in place. The O piece does not rotate.
    ///
    /// Does not look at the board; kicks and reverts belong to the caller.
    pub fn rotate(&mut self) {
        if self.kind == PieceKind::O {
            return;
        }
        self.shape = self.shape.rotate_cw();
        self.rotation = self.rotation.rotate_cw();
    }

    /// Undo one `rotate` by turning three more times.
    pub fn revert_rotation(&mut self) {
        if self.kind == PieceKind::O {
            return;
        }
        for _ in 0..3 {
            self.rotate();
        }
    }

    /// Copy of this piece moved straight down as far as it can go.
    pub fn ghost(&self, board: &Board) -> Tetromino {
        let mut ghost = *self;
        while !board.collides(&ghost, 0, 1) {
            ghost.y += 1;
        }
        ghost
    }
}
