//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, PieceSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Color, BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const BLOCK: char = '█';
const GHOST: char = '░';
const EMPTY: char = '·';

/// Top-left corner of the board frame on screen.
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: u16,
    y: u16,
}

/// Renders the playfield, preview and status panel.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Size of the bordered board in terminal cells.
    pub fn frame_size(&self) -> (u16, u16) {
        (
            (BOARD_WIDTH as u16) * self.cell_w + 2,
            (BOARD_HEIGHT as u16) * self.cell_h + 2,
        )
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse one framebuffer across frames; it is resized to the
    /// viewport and cleared first.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().glyph(' '));

        let (frame_w, frame_h) = self.frame_size();
        let origin = Origin {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
                AnchorY::Top => 0,
            },
        };

        self.draw_border(fb, origin, frame_w, frame_h);

        let flashing = snap.clear_animation.filter(|anim| anim.flash_visible());

        for y in 0..BOARD_HEIGHT as usize {
            if flashing.is_some_and(|anim| anim.is_cleared_row(y)) {
                let style = CellStyle::fg(Rgb::WHITE, Rgb::WHITE).bold();
                for x in 0..BOARD_WIDTH as u16 {
                    self.fill_cell(fb, origin, x, y as u16, BLOCK, style);
                }
                continue;
            }

            for x in 0..BOARD_WIDTH as usize {
                match snap.board[y][x] {
                    Some(color) => self.draw_block(fb, origin, x as u16, y as u16, color, false),
                    None => {
                        let style = CellStyle::fg(Rgb::new(90, 90, 100), WELL_BG).dim();
                        self.fill_cell(fb, origin, x as u16, y as u16, EMPTY, style);
                    }
                }
            }
        }

        if let Some(ghost) = snap.ghost {
            let style = CellStyle::fg(ghost.color.into(), WELL_BG).dim();
            for (x, y) in visible_cells(&ghost) {
                self.fill_cell(fb, origin, x, y, GHOST, style);
            }
        }

        if let Some(active) = snap.active {
            for (x, y) in visible_cells(&active) {
                self.draw_block(fb, origin, x, y, active.color, true);
            }
        }

        self.draw_side_panel(fb, snap, viewport, origin, frame_w);

        let frame = (frame_w, frame_h);
        if snap.paused() {
            self.draw_overlay(fb, origin, frame, &["PAUSED", "p to resume"], None);
        } else if snap.game_over() {
            let lines = ["GAME OVER", "r to restart"];
            self.draw_overlay(fb, origin, frame, &lines, Some(snap.score));
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, origin: Origin, w: u16, h: u16) {
        let style = CellStyle::fg(Rgb::new(200, 200, 200), Rgb::BLACK);
        let Origin { x, y } = origin;

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_block(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        x: u16,
        y: u16,
        color: Color,
        bold: bool,
    ) {
        let mut style = CellStyle::fg(color.into(), WELL_BG);
        style.bold = bold;
        self.fill_cell(fb, origin, x, y, BLOCK, style);
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        x: u16,
        y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = origin.x + 1 + x * self.cell_w;
        let py = origin.y + 1 + y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        origin: Origin,
        frame_w: u16,
    ) {
        let panel_x = origin.x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::fg(Rgb::new(200, 200, 200), Rgb::BLACK);

        let mut y = origin.y;
        let stats = [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ];
        for (name, number) in stats {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, number, value);
            y += 3;
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y += 1;
        let next = snap.next;
        let shape = next.shape;
        for row in 0..shape.size() {
            for (col, &filled) in shape.row(row).iter().enumerate() {
                if filled {
                    let px = panel_x + (col as u16) * self.cell_w;
                    let style = CellStyle::fg(next.color.into(), Rgb::BLACK);
                    fb.fill_rect(px, y, self.cell_w, 1, BLOCK, style);
                }
            }
            y += 1;
        }
        y += 1;

        let hint = CellStyle::default().dim();
        let hints = [
            "←→ move  ↑ rotate",
            "↓ soft  ␣ hard drop",
            "p pause  r restart",
            "q quit",
        ];
        for line in hints {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, hint);
            y += 1;
        }
    }

    /// Centered message lines, optionally followed by a `SCORE <n>` line.
    fn draw_overlay(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        (frame_w, frame_h): (u16, u16),
        lines: &[&str],
        score: Option<u32>,
    ) {
        let style = CellStyle::fg(Rgb::WHITE, Rgb::BLACK).bold();
        let rows = lines.len() as u16 + u16::from(score.is_some());
        let top = origin.y + frame_h / 2 - rows / 2;
        for (i, text) in lines.iter().enumerate() {
            let text_w = text.chars().count() as u16;
            let x = origin.x + frame_w.saturating_sub(text_w) / 2;
            fb.put_str(x, top + i as u16, text, style);
        }

        if let Some(score) = score {
            const LABEL: &str = "SCORE ";
            let digits = score.checked_ilog10().map_or(1, |d| d + 1) as u16;
            let text_w = LABEL.len() as u16 + digits;
            let x = origin.x + frame_w.saturating_sub(text_w) / 2;
            let y = top + lines.len() as u16;
            let written = fb.put_str(x, y, LABEL, style);
            fb.put_u32(x + written, y, score, style);
        }
    }
}

/// On-board cells of a piece; rows above the board are skipped.
fn visible_cells(piece: &PieceSnapshot) -> impl Iterator<Item = (u16, u16)> + '_ {
    piece.cells().filter_map(|(x, y)| {
        let on_board = (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y);
        on_board.then_some((x as u16, y as u16))
    })
}
