//! Game state module - manages the complete game state
//!
//! This module ties together the board, pieces, RNG, and scoring.
//! It handles gravity timing, piece movement, rotation with wall kicks, line
//! clears, the clear animation, and the game lifecycle.

use arrayvec::ArrayVec;
use tracing::{debug, info, trace};

use crate::board::{Board, BOARD_ROWS};
use crate::config::GameConfig;
use crate::pieces::Tetromino;
use crate::rng::PieceGenerator;
use crate::scoring::{calculate_drop_score, calculate_level, calculate_line_score};
use crate::snapshot::{ClearAnimationView, GameSnapshot};
use crate::types::*;

/// Top-level lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Running,
    Paused,
    GameOver,
}

/// Rows flashing after a clear; blocks gravity and piece movement while it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearAnimation {
    rows: ArrayVec<usize, BOARD_ROWS>,
    frame: u32,
}

impl ClearAnimation {
    fn new(rows: ArrayVec<usize, BOARD_ROWS>) -> Self {
        Self { rows, frame: 0 }
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Frames elapsed since the clear
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Whether the cleared rows are drawn highlighted on this frame
    pub fn flash_visible(&self) -> bool {
        self.frame % CLEAR_FLASH_PERIOD < CLEAR_FLASH_PERIOD / 2
    }

    /// Advance one frame; returns true once the animation has run its course.
    fn advance(&mut self) -> bool {
        self.frame += 1;
        self.frame >= CLEAR_ANIMATION_FRAMES
    }
}

/// What happened the last time a piece landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingEvent {
    pub kind: PieceKind,
    /// Cleared row indices, top to bottom
    pub rows: ArrayVec<usize, BOARD_ROWS>,
    /// Line clear points awarded (drop points excluded)
    pub points: u32,
    /// Level after the landing
    pub level: u32,
    pub game_over: bool,
}

impl LandingEvent {
    pub fn lines_cleared(&self) -> u32 {
        self.rows.len() as u32
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    active: Tetromino,
    next: Tetromino,
    generator: PieceGenerator,
    status: GameStatus,
    clear_animation: Option<ClearAnimation>,
    /// Last landing (consumed by observers).
    last_event: Option<LandingEvent>,
    score: u32,
    level: u32,
    drop_interval_ms: u32,
    drop_timer_ms: u32,
}

impl GameState {
    /// Create a running game with two freshly drawn pieces
    pub fn new(config: GameConfig) -> Self {
        let mut generator = match config.seed {
            Some(seed) => PieceGenerator::new(seed),
            None => PieceGenerator::from_entropy(),
        };
        let active = Tetromino::random(&mut generator);
        let next = Tetromino::random(&mut generator);
        let drop_interval_ms = config.drop_interval_ms(1);

        Self {
            config,
            board: Board::new(),
            active,
            next,
            generator,
            status: GameStatus::Running,
            clear_animation: None,
            last_event: None,
            score: 0,
            level: 1,
            drop_interval_ms,
            drop_timer_ms: 0,
        }
    }

    /// Create a game with default tuning and a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameConfig::seeded(seed))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn is_animating(&self) -> bool {
        self.clear_animation.is_some()
    }

    pub fn clear_animation(&self) -> Option<&ClearAnimation> {
        self.clear_animation.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Lifetime cleared lines
    pub fn lines(&self) -> u32 {
        self.board.lines_cleared()
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn active(&self) -> Tetromino {
        self.active
    }

    pub fn next(&self) -> Tetromino {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Where the active piece would land, if the game is still going.
    pub fn ghost(&self) -> Option<Tetromino> {
        if self.game_over() {
            return None;
        }
        Some(self.active.ghost(&self.board))
    }

    /// Take and clear the last landing event.
    pub fn take_last_event(&mut self) -> Option<LandingEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);

        let playing = !self.game_over();
        out.active = playing.then(|| self.active.into());
        out.ghost = self.ghost().map(Into::into);
        out.next = self.next.into();
        out.status = self.status;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines();
        out.drop_interval_ms = self.drop_interval_ms;
        out.clear_animation = self.clear_animation.as_ref().map(ClearAnimationView::from);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Player input is accepted only while running and not animating.
    fn can_control(&self) -> bool {
        self.status == GameStatus::Running && self.clear_animation.is_none()
    }

    /// Try to shift the active piece horizontally
    pub(crate) fn try_move(&mut self, dx: i8) -> bool {
        if !self.can_control() || self.board.collides(&self.active, dx, 0) {
            return false;
        }
        self.active.x += dx;
        true
    }

    /// Rotate clockwise, kicking sideways if needed, reverting if nothing fits
    pub(crate) fn try_rotate(&mut self) -> bool {
        if !self.can_control() {
            return false;
        }

        self.active.rotate();
        if !self.board.collides(&self.active, 0, 0) {
            return true;
        }

        for &kick in WALL_KICKS.iter() {
            if !self.board.collides(&self.active, kick, 0) {
                self.active.x += kick;
                return true;
            }
        }

        trace!(kind = ?self.active.kind(), "rotation blocked, reverting");
        self.active.revert_rotation();
        false
    }

    /// One gravity step: move down or land. Returns true if the piece moved.
    fn step_down(&mut self) -> bool {
        if self.board.collides(&self.active, 0, 1) {
            self.land();
            false
        } else {
            self.active.y += 1;
            true
        }
    }

    /// Manual single-row drop. Scores one point whether it moves or lands.
    pub(crate) fn soft_drop(&mut self) -> bool {
        if !self.can_control() {
            return false;
        }
        self.step_down();
        self.score = self.score.saturating_add(calculate_drop_score(1, false));
        true
    }

    /// Drop to the resting row and land immediately. Returns rows descended.
    pub(crate) fn hard_drop(&mut self) -> Option<u32> {
        if !self.can_control() {
            return None;
        }

        let mut distance: u32 = 0;
        while !self.board.collides(&self.active, 0, 1) {
            self.active.y += 1;
            distance += 1;
        }
        self.score = self
            .score
            .saturating_add(calculate_drop_score(distance, true));

        self.land();
        Some(distance)
    }

    /// Merge, clear, score, level, game-over check, spawn.
    fn land(&mut self) {
        let kind = self.active.kind();
        self.board.merge(&self.active);

        let clear = self.board.clear_lines();
        let lines = clear.rows.len();
        let mut points = 0;

        if lines > 0 {
            points = calculate_line_score(lines, self.level);
            self.score = self.score.saturating_add(points);
            self.clear_animation = Some(ClearAnimation::new(clear.rows.clone()));

            let level = calculate_level(clear.total);
            if level > self.level {
                self.level = level;
                self.drop_interval_ms = self.config.drop_interval_ms(level);
                info!(
                    level,
                    drop_interval_ms = self.drop_interval_ms,
                    "level up"
                );
            }
        }

        debug!(kind = ?kind, lines, points, total = clear.total, "piece landed");

        let game_over = self.board.is_game_over();
        self.last_event = Some(LandingEvent {
            kind,
            rows: clear.rows,
            points,
            level: self.level,
            game_over,
        });

        if game_over {
            self.status = GameStatus::GameOver;
            info!(score = self.score, level = self.level, lines = self.lines(), "game over");
            return;
        }

        self.active = self.next;
        self.next = Tetromino::random(&mut self.generator);
    }

    /// Flip between running and paused. Unpausing restarts the drop timer.
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            GameStatus::Running => {
                self.status = GameStatus::Paused;
                true
            }
            GameStatus::Paused => {
                self.status = GameStatus::Running;
                self.drop_timer_ms = 0;
                true
            }
            GameStatus::GameOver => false,
        }
    }

    /// Throw away the current game and start a fresh one.
    ///
    /// The piece generator keeps running, so the new game gets new pieces.
    pub fn restart(&mut self) {
        self.board.reset();
        self.active = Tetromino::random(&mut self.generator);
        self.next = Tetromino::random(&mut self.generator);
        self.status = GameStatus::Running;
        self.clear_animation = None;
        self.last_event = None;
        self.score = 0;
        self.level = 1;
        self.drop_interval_ms = self.config.drop_interval_ms(1);
        self.drop_timer_ms = 0;
        info!("game restarted");
    }

    /// Main game tick - one frame of animation and gravity.
    ///
    /// Returns true if gravity moved or landed the active piece.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        // The clear animation keeps running even while paused.
        if let Some(animation) = self.clear_animation.as_mut() {
            if animation.advance() {
                self.clear_animation = None;
            }
        }

        if self.status != GameStatus::Running {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms < self.drop_interval_ms {
            return false;
        }
        self.drop_timer_ms = 0;

        // The timer still resets while animating; only the step is skipped.
        if self.clear_animation.is_some() {
            return false;
        }

        self.step_down();
        true
    }

    /// Apply a game action. Returns true if it was accepted.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.try_move(-1),
            GameAction::MoveRight => self.try_move(1),
            GameAction::Rotate => self.try_rotate(),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop().is_some(),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::get_shape;

    const GREY: Cell = Some(Color(0x808080));

    /// Seeded game with a chosen active piece at its spawn position.
    fn state_with(kind: PieceKind) -> GameState {
        let mut state = GameState::with_seed(12345);
        state.active = Tetromino::new(kind);
        state
    }

    fn fill_row_except(board: &mut Board, y: i8, gaps: &[i8]) {
        for x in 0..BOARD_WIDTH as i8 {
            if !gaps.contains(&x) {
                board.set(x, y, GREY);
            }
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::with_seed(12345);

        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.drop_interval_ms, 1000);
        assert!(state.clear_animation.is_none());
        assert!(!state.board.collides(&state.active, 0, 0));
    }

    #[test]
    fn test_try_move() {
        let mut state = state_with(PieceKind::T);
        let initial_x = state.active.x;

        assert!(state.try_move(1));
        assert_eq!(state.active.x, initial_x + 1);
        assert!(state.try_move(-1));
        assert_eq!(state.active.x, initial_x);
    }

    #[test]
    fn test_try_move_stops_at_wall() {
        let mut state = state_with(PieceKind::T);

        let mut moved = 0;
        for _ in 0..10 {
            if state.try_move(-1) {
                moved += 1;
            }
        }
        // T spawns at x=3 and its leftmost cell is in matrix column 0.
        assert_eq!(moved, 3);
        assert_eq!(state.active.x, 0);
    }

    #[test]
    fn test_rotate_in_open_space() {
        let mut state = state_with(PieceKind::T);
        state.active.y = 5;

        assert!(state.try_rotate());
        assert_eq!(state.active.rotation(), Rotation::East);
        assert_eq!(state.active.shape(), get_shape(PieceKind::T, Rotation::East));
        assert_eq!(state.active.x, 3);
    }

    #[test]
    fn test_wall_kick_left() {
        let mut state = state_with(PieceKind::I);
        // Vertical I hugging the right wall (matrix column 2 at board x=9).
        state.active.rotate();
        state.active.x = 7;
        state.active.y = 5;
        assert!(!state.board.collides(&state.active, 0, 0));

        assert!(state.try_rotate());
        assert_eq!(state.active.x, 6);
        assert_eq!(state.active.rotation(), Rotation::South);
        assert_eq!(state.active.shape(), get_shape(PieceKind::I, Rotation::South));
    }

    #[test]
    fn test_wall_kick_far_right() {
        let mut state = state_with(PieceKind::I);
        // Vertical I in column 0: only the +2 kick clears the left wall.
        state.active.rotate();
        state.active.x = -2;
        state.active.y = 5;

        assert!(state.try_rotate());
        assert_eq!(state.active.x, 0);
        assert_eq!(state.active.rotation(), Rotation::South);
    }

    #[test]
    fn test_rotation_reverted_when_no_kick_fits() {
        let mut state = state_with(PieceKind::I);
        state.active.rotate();
        state.active.x = -2;
        state.active.y = 5;
        // Horizontal I would occupy row 7; block the +2 kick.
        state.board.set(1, 7, GREY);
        let before = state.active;

        assert!(!state.try_rotate());
        assert_eq!(state.active, before);
    }

    #[test]
    fn test_o_piece_rotate_is_accepted_noop() {
        let mut state = state_with(PieceKind::O);
        let before = state.active;
        assert!(state.try_rotate());
        assert_eq!(state.active, before);
    }

    #[test]
    fn test_soft_drop_scores_per_row() {
        let mut state = state_with(PieceKind::T);

        assert!(state.apply_action(GameAction::SoftDrop));
        assert!(state.apply_action(GameAction::SoftDrop));
        assert_eq!(state.active.y, 2);
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_soft_drop_that_lands_still_scores() {
        let mut state = state_with(PieceKind::T);
        state.active.y = 18;
        let next_kind = state.next.kind();

        assert!(state.apply_action(GameAction::SoftDrop));
        assert_eq!(state.score, 1);
        assert_eq!(state.active.kind(), next_kind);
        assert!(state.board.is_occupied(4, 18));
    }

    #[test]
    fn test_hard_drop_scores_two_per_row() {
        let mut state = state_with(PieceKind::T);
        let ghost = state.active.ghost(&state.board);
        let rows = (ghost.y - state.active.y) as u32;

        assert_eq!(state.hard_drop(), Some(rows));
        assert_eq!(state.score, 2 * rows);
        // Landed cells match the ghost.
        for (x, y) in ghost.cells() {
            assert!(state.board.is_occupied(x, y));
        }
    }

    #[test]
    fn test_hard_drop_then_single_clear() {
        let mut state = state_with(PieceKind::O);
        // O spawns over columns 4-5; leave exactly that gap in the bottom row.
        fill_row_except(&mut state.board, 19, &[4, 5]);
        let rows = (state.active.ghost(&state.board).y - state.active.y) as u32;

        assert!(state.apply_action(GameAction::HardDrop));
        assert_eq!(state.score, 2 * rows + 100);
        assert_eq!(state.lines(), 1);

        let event = state.take_last_event().unwrap();
        assert_eq!(event.kind, PieceKind::O);
        assert_eq!(event.rows.as_slice(), &[19]);
        assert_eq!(event.points, 100);
        assert!(!event.game_over);
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn test_single_clear_uses_level_multiplier() {
        let mut state = state_with(PieceKind::O);
        state.level = 3;
        fill_row_except(&mut state.board, 19, &[4, 5]);
        state.active.y = 18;

        let before = state.score;
        state.step_down();
        assert_eq!(state.score - before, 300);
        // Level never decreases even though lifetime lines is only 1.
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_ten_lines_reach_level_two() {
        let mut state = state_with(PieceKind::T);
        for y in 10..20 {
            fill_row_except(&mut state.board, y, &[]);
        }

        state.hard_drop();
        assert_eq!(state.lines(), 10);
        assert_eq!(state.level, 2);
        assert_eq!(state.drop_interval_ms, 750);
        // Ten rows at once is outside the table.
        assert_eq!(state.last_event.as_ref().unwrap().points, 0);
    }

    #[test]
    fn test_landing_in_top_row_ends_game() {
        let mut state = state_with(PieceKind::T);
        // T stem sits at (4, 0); its base row is 1. A block at (4, 2) stops it.
        state.board.set(4, 2, GREY);
        let next_before = state.next;

        assert!(state.tick(1000));
        assert_eq!(state.status, GameStatus::GameOver);
        // No spawn after game over.
        assert_eq!(state.next, next_before);
        assert!(state.last_event.as_ref().unwrap().game_over);

        // Nothing but restart works now.
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::HardDrop));
        assert!(!state.apply_action(GameAction::Pause));
        assert!(!state.tick(5000));
        assert!(state.ghost().is_none());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = state_with(PieceKind::O);
        state.level = 4;
        fill_row_except(&mut state.board, 19, &[4, 5]);
        state.hard_drop();
        state.board.set(0, 0, GREY);
        state.status = GameStatus::GameOver;

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.drop_interval_ms, 1000);
        assert!(state.clear_animation.is_none());
        assert!(state.board.cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_tick_gravity() {
        let mut state = state_with(PieceKind::T);

        assert!(!state.tick(500));
        assert_eq!(state.active.y, 0);
        assert!(state.tick(500));
        assert_eq!(state.active.y, 1);
        // Timer restarted after the drop.
        assert!(!state.tick(999));
        assert_eq!(state.active.y, 1);
    }

    #[test]
    fn test_pause_stops_gravity_and_input() {
        let mut state = state_with(PieceKind::T);

        assert!(state.apply_action(GameAction::Pause));
        assert!(state.paused());
        assert!(!state.tick(5000));
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::Rotate));
        assert!(!state.apply_action(GameAction::SoftDrop));
        assert_eq!(state.active.y, 0);
    }

    #[test]
    fn test_unpause_resets_drop_timer() {
        let mut state = state_with(PieceKind::T);

        state.tick(900);
        state.apply_action(GameAction::Pause);
        state.apply_action(GameAction::Pause);
        assert!(!state.paused());

        // Without the reset this would cross the 1000ms interval.
        assert!(!state.tick(200));
        assert_eq!(state.active.y, 0);
    }

    #[test]
    fn test_clear_animation_blocks_movement() {
        let mut state = state_with(PieceKind::O);
        fill_row_except(&mut state.board, 19, &[4, 5]);
        state.hard_drop();

        let animation = state.clear_animation().unwrap();
        assert_eq!(animation.rows(), &[19]);
        assert_eq!(animation.frame(), 0);
        let y = state.active.y;

        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::Rotate));
        assert!(!state.apply_action(GameAction::SoftDrop));
        assert!(!state.apply_action(GameAction::HardDrop));

        // Gravity is suspended too, even after a full interval.
        for _ in 0..(CLEAR_ANIMATION_FRAMES - 1) {
            assert!(!state.tick(100));
        }
        assert_eq!(state.active.y, y);
        assert!(state.is_animating());

        state.tick(0);
        assert!(!state.is_animating());
        assert!(state.apply_action(GameAction::MoveLeft));
    }

    #[test]
    fn test_clear_animation_advances_while_paused() {
        let mut state = state_with(PieceKind::O);
        fill_row_except(&mut state.board, 19, &[4, 5]);
        state.hard_drop();
        state.apply_action(GameAction::Pause);

        for _ in 0..CLEAR_ANIMATION_FRAMES {
            state.tick(16);
        }
        assert!(!state.is_animating());
        assert!(state.paused());
    }

    #[test]
    fn test_flash_cycle() {
        let mut animation = ClearAnimation::new(ArrayVec::new());
        let mut pattern = Vec::new();
        for _ in 0..6 {
            animation.advance();
            pattern.push(animation.flash_visible());
        }
        assert_eq!(pattern, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn test_snapshot_hides_active_after_game_over() {
        let mut state = state_with(PieceKind::T);
        let snap = state.snapshot();
        assert!(snap.active.is_some());
        assert_eq!(snap.ghost.unwrap().y, 18);
        assert_eq!(snap.next.kind, state.next.kind());

        state.board.set(4, 2, GREY);
        state.tick(1000);
        let snap = state.snapshot();
        assert_eq!(snap.status, GameStatus::GameOver);
        assert!(snap.active.is_none());
        assert!(snap.ghost.is_none());
        assert_eq!(snap.board[0][4], Some(PieceKind::T.color()));
    }
}
