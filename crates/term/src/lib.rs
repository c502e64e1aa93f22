//! Terminal game renderer.
//!
//! A small, game-oriented rendering layer: snapshots are drawn into a plain
//! framebuffer (no widgets or layout engine), which is then flushed to the
//! terminal as a diff against the previous frame.
//!
//! Board cells are drawn 2 columns wide by default to offset the usual
//! terminal glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{CellStyle, FrameBuffer, Glyph, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
