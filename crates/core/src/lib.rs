//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has no dependency on the terminal or any other I/O, so the same seed
//! always produces the same game.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision detection and line clearing
//! - [`pieces`]: Shape matrices, clockwise rotation, spawn positions
//! - [`rng`]: Uniform random piece generation
//! - [`scoring`]: Line and drop points, level and gravity curve
//! - [`config`]: Tunables read from the environment
//! - [`game_state`]: The controller: gravity, input, landing, clear animation, lifecycle
//! - [`snapshot`]: Copyable views for renderers
//!
//! # Game Rules
//!
//! - Each new piece kind is an independent uniform draw; one piece of preview
//! - Rotation is clockwise only, with sideways kicks of -1, +1, -2, +2 columns
//! - Pieces lock the moment they cannot fall further
//! - Line clears score 100/300/500/800 times the level; soft drop +1, hard drop +2 per row
//! - Every 10 lines raises the level and speeds gravity up by a factor of 0.75
//! - A piece locking into the top row ends the game
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_core::types::GameAction;
//!
//! let mut game = GameState::with_seed(12345);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) once per frame
//! (about every 16ms) with the elapsed time. Each tick also advances the line
//! clear animation by one frame.

pub mod board;
pub mod config;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LineClear};
pub use config::{ConfigError, GameConfig};
pub use game_state::{ClearAnimation, GameState, GameStatus, LandingEvent};
pub use pieces::{get_shape, ShapeMatrix, Tetromino};
pub use rng::PieceGenerator;
pub use scoring::{calculate_drop_score, calculate_level, calculate_line_score};
pub use snapshot::{ClearAnimationView, GameSnapshot, PieceSnapshot};
