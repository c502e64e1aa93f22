//! Read-only copies of game state for renderers and observers.

use crate::board::BOARD_ROWS;
use crate::game_state::{ClearAnimation, GameStatus};
use crate::pieces::{ShapeMatrix, Tetromino};
use crate::types::{Cell, Color, PieceKind, Rotation, BOARD_WIDTH, CLEAR_FLASH_PERIOD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    pub color: Color,
    pub shape: ShapeMatrix,
}

impl PieceSnapshot {
    /// Board coordinates of the filled cells
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .minos()
            .into_iter()
            .map(move |(mx, my)| (self.x + mx, self.y + my))
    }
}

impl From<Tetromino> for PieceSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind(),
            rotation: value.rotation(),
            x: value.x,
            y: value.y,
            color: value.color(),
            shape: value.shape(),
        }
    }
}

impl Default for PieceSnapshot {
    fn default() -> Self {
        Tetromino::new(PieceKind::I).into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClearAnimationView {
    /// `rows[y]` is true when row `y` was just cleared
    pub rows: [bool; BOARD_ROWS],
    pub frame: u32,
}

impl ClearAnimationView {
    pub fn flash_visible(&self) -> bool {
        self.frame % CLEAR_FLASH_PERIOD < CLEAR_FLASH_PERIOD / 2
    }

    pub fn is_cleared_row(&self, y: usize) -> bool {
        self.rows.get(y).copied().unwrap_or(false)
    }
}

impl From<&ClearAnimation> for ClearAnimationView {
    fn from(value: &ClearAnimation) -> Self {
        let mut rows = [false; BOARD_ROWS];
        for &y in value.rows() {
            if let Some(slot) = rows.get_mut(y) {
                *slot = true;
            }
        }
        Self {
            rows,
            frame: value.frame(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_ROWS],
    /// Hidden once the game is over.
    pub active: Option<PieceSnapshot>,
    pub ghost: Option<PieceSnapshot>,
    pub next: PieceSnapshot,
    pub status: GameStatus,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_interval_ms: u32,
    pub clear_animation: Option<ClearAnimationView>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.status == GameStatus::Running && self.clear_animation.is_none()
    }

    pub fn paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_ROWS],
            active: None,
            ghost: None,
            next: PieceSnapshot::default(),
            status: GameStatus::Running,
            score: 0,
            level: 1,
            lines: 0,
            drop_interval_ms: 0,
            clear_animation: None,
        }
    }
}
