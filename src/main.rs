//! Blockfall terminal runner (default binary).
//!
//! Reads configuration from the environment, then runs a fixed-cadence loop:
//! render, poll input until the next tick, tick the game.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::{cursor, execute, terminal};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use blockfall::core::config::ENV_LOG_PATH;
use blockfall::core::{GameConfig, GameSnapshot, GameState};
use blockfall::input::{handle_key_event, should_quit};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::TICK_MS;

fn main() -> Result<()> {
    let config = GameConfig::from_env().context("invalid configuration")?;
    init_logging()?;
    info!(
        base_drop_ms = config.base_drop_ms,
        speed_factor = config.speed_factor,
        seed = ?config.seed,
        "starting"
    );

    install_panic_hook();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Log to the file named by `BLOCKFALL_LOG`, filtered by `RUST_LOG`
/// (default `info`). Without the variable nothing is logged, since stdout
/// belongs to the game screen.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os(ENV_LOG_PATH).filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.to_string_lossy()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Leave raw mode before the panic message is printed.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        default_hook(panic);
    }));
}

fn run(term: &mut TerminalRenderer, config: GameConfig) -> Result<()> {
    let mut game = GameState::new(config);
    let view = GameView::default();

    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    let mut stats = SessionStats::default();

    loop {
        // Render.
        let (w, h) = terminal::size().unwrap_or((80, 24));
        game.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        break;
                    }
                    if let Some(action) = handle_key_event(key) {
                        let accepted = game.apply_action(action);
                        debug!(action = action.as_str(), accepted, "input");
                        stats.observe(&mut game);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
            game.tick(elapsed_ms);
            stats.observe(&mut game);
        }
    }

    stats.best_score = stats.best_score.max(game.score());
    info!(
        pieces_placed = stats.pieces_placed,
        best_score = stats.best_score,
        "session ended"
    );
    Ok(())
}

/// Counters kept across restarts for the exit log line.
#[derive(Debug, Default)]
struct SessionStats {
    pieces_placed: u32,
    best_score: u32,
}

impl SessionStats {
    fn observe(&mut self, game: &mut GameState) {
        let Some(landing) = game.take_last_event() else {
            return;
        };
        self.pieces_placed += 1;
        self.best_score = self.best_score.max(game.score());
        if landing.game_over {
            info!(
                pieces_placed = self.pieces_placed,
                best_score = self.best_score,
                "round finished"
            );
        }
    }
}
