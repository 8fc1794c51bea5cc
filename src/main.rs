//! Terminal hexloop runner (default binary).
//!
//! Keyboard or mouse moves a cursor over the board; the held tile is rotated
//! and dropped at the cursor. Finished levels are held on screen for a short
//! pause before the session advances.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use tracing::{debug, info};

use hexloop::config::{parse_run_args, RunConfig, USAGE};
use hexloop::core::{PuzzleSession, SessionEvent, SessionSnapshot};
use hexloop::input::{handle_key_event, should_quit};
use hexloop::logging::init_file_logging;
use hexloop::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use hexloop::types::{AxialCoord, GameAction, BOARD_FULL_PAUSE_MS, CIRCUIT_PAUSE_MS, TICK_MS};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(config) = parse_run_args(&args)? else {
        print!("{}", USAGE);
        return Ok(());
    };

    if let Some(path) = &config.log_file {
        init_file_logging(path)?;
    }

    let mut session = start_session(&config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn start_session(config: &RunConfig) -> Result<PuzzleSession> {
    let levels = config.level_set()?;
    info!(levels = levels.len(), seed = config.seed, "starting session");
    Ok(PuzzleSession::new(levels, config.session_config())?)
}

/// Front-end state that the core does not own.
struct Ui {
    cursor: AxialCoord,
    /// When to advance out of a finished phase.
    advance_at: Option<Instant>,
}

impl Ui {
    fn apply_events(&mut self, session: &mut PuzzleSession) {
        for ev in session.drain_events() {
            match ev {
                SessionEvent::LevelLoaded { .. } => {
                    self.cursor = session.board().center();
                    self.advance_at = None;
                }
                SessionEvent::CircuitComplete(id) => {
                    debug!(%id, "circuit complete");
                    self.advance_at =
                        Some(Instant::now() + Duration::from_millis(CIRCUIT_PAUSE_MS as u64));
                }
                SessionEvent::BoardFull => {
                    self.advance_at =
                        Some(Instant::now() + Duration::from_millis(BOARD_FULL_PAUSE_MS as u64));
                }
                SessionEvent::TileSpawned(_)
                | SessionEvent::TilePlaced { .. }
                | SessionEvent::CursorHint(_) => {}
            }
        }
    }

    fn move_cursor(&mut self, session: &mut PuzzleSession, to: AxialCoord) {
        if session.board().contains(to) {
            self.cursor = to;
            session.hover(Some(to));
        }
    }
}

fn apply_action(session: &mut PuzzleSession, ui: &mut Ui, action: GameAction) -> Result<()> {
    match action {
        GameAction::MoveCursor(dir) => {
            let to = ui.cursor.neighbor(dir);
            ui.move_cursor(session, to);
        }
        GameAction::RotateRight => {
            session.rotate_held_right();
        }
        GameAction::RotateLeft => {
            session.rotate_held_left();
        }
        GameAction::Place => {
            if let Err(e) = session.place_held(ui.cursor) {
                debug!(code = e.code(), error = %e, "placement rejected");
            }
        }
        GameAction::Restart => session.restart()?,
    }
    Ok(())
}

fn run(term: &mut TerminalRenderer, session: &mut PuzzleSession) -> Result<()> {
    let view = GameView::default();
    let mut ui = Ui {
        cursor: session.board().center(),
        advance_at: None,
    };
    ui.apply_events(session);
    session.hover(Some(ui.cursor));

    let mut snap = SessionSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        session.snapshot_into(&mut snap);
        view.render_into(&snap, Some(ui.cursor), viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        apply_action(session, &mut ui, action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    let picked = view.pick(&snap, viewport, mouse.column, mouse.row);
                    match mouse.kind {
                        MouseEventKind::Moved => {
                            if let Some(c) = picked {
                                ui.move_cursor(session, c);
                            }
                        }
                        MouseEventKind::Down(MouseButton::Left) => {
                            if let Some(c) = picked {
                                ui.move_cursor(session, c);
                                apply_action(session, &mut ui, GameAction::Place)?;
                            }
                        }
                        MouseEventKind::ScrollUp => {
                            apply_action(session, &mut ui, GameAction::RotateRight)?
                        }
                        MouseEventKind::ScrollDown => {
                            apply_action(session, &mut ui, GameAction::RotateLeft)?
                        }
                        _ => {}
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
            ui.apply_events(session);
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            if ui.advance_at.is_some_and(|at| Instant::now() >= at) {
                ui.advance_at = None;
                // Finished phase -> Transitioning -> next level.
                session.advance()?;
                session.advance()?;
                ui.apply_events(session);
                session.hover(Some(ui.cursor));
            }
        }
    }
}
