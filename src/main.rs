//! Terminal driver for the blockfall engine.
//!
//! This binary is deliberately thin glue: it translates key presses into
//! engine events, feeds measured elapsed time into `tick`, renders the
//! returned snapshot, and persists the best score when the engine reports
//! a new one. All gameplay rules live in the library.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::{cursor, execute, queue, style::Print, terminal};

use blockfall::types::{GRID_COLS, GRID_ROWS};
use blockfall::{ClearPhase, Difficulty, GameEvent, GameState, GameStatus};

const FRAME_MS: u64 = 16;

/// Single-key best-score store (one integer in a dotfile)
fn best_score_path() -> PathBuf {
    PathBuf::from(".blockfall_best")
}

fn load_best_score() -> u32 {
    fs::read_to_string(best_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Persistence failures are non-fatal; gameplay state is never affected.
fn save_best_score(best: u32) {
    let _ = fs::write(best_score_path(), best.to_string());
}

fn session_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(1)
}

/// Optional first argument selects the starting difficulty
fn difficulty_from_args() -> Result<Difficulty> {
    match std::env::args().nth(1) {
        None => Ok(Difficulty::default()),
        Some(arg) => match Difficulty::from_str(&arg) {
            Some(d) => Ok(d),
            None => {
                let names: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
                bail!("unknown difficulty {:?}, expected one of: {}", arg, names.join(", "))
            }
        },
    }
}

fn main() -> Result<()> {
    let difficulty = difficulty_from_args()?;
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = run(&mut stdout, difficulty);

    // Always try to restore terminal state.
    let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    result
}

fn run(stdout: &mut io::Stdout, difficulty: Difficulty) -> Result<()> {
    let mut game = GameState::new(load_best_score(), difficulty, session_seed());

    let frame = Duration::from_millis(FRAME_MS);
    let mut last_tick = Instant::now();

    loop {
        draw(stdout, &game)?;

        let timeout = frame
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let engine_event = match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Left => Some(GameEvent::Move { dx: -1 }),
                        KeyCode::Right => Some(GameEvent::Move { dx: 1 }),
                        KeyCode::Up | KeyCode::Char('x') => Some(GameEvent::Rotate { dir: 1 }),
                        KeyCode::Char('z') => Some(GameEvent::Rotate { dir: -1 }),
                        KeyCode::Down => Some(GameEvent::SoftDrop),
                        KeyCode::Char(' ') => Some(GameEvent::HardDrop),
                        KeyCode::Char('p') => Some(GameEvent::PauseToggle),
                        KeyCode::Char('n') => Some(GameEvent::NewGame),
                        KeyCode::Char(c @ '1'..='5') => {
                            let idx = (c as u8 - b'1') as usize;
                            Some(GameEvent::SetDifficulty(Difficulty::ALL[idx]))
                        }
                        _ => None,
                    };
                    if let Some(ev) = engine_event {
                        game.apply_event(ev);
                        persist_best(&mut game);
                    }
                }
            }
        }

        if last_tick.elapsed() >= frame {
            // Feed the actual measured delta; the engine handles catch-up.
            let delta_ms = last_tick.elapsed().as_millis() as u32;
            last_tick = Instant::now();
            game.apply_event(GameEvent::Tick { delta_ms });
            persist_best(&mut game);
        }
    }
}

/// Consume the lock report and write the best score when it changed
fn persist_best(game: &mut GameState) {
    if let Some(report) = game.take_last_lock() {
        if let Some(best) = report.new_best {
            save_best_score(best);
        }
    }
}

fn draw(stdout: &mut io::Stdout, game: &GameState) -> Result<()> {
    let mut colors = [[0u8; GRID_COLS]; GRID_ROWS];
    game.grid().write_color_grid(&mut colors);

    // Ghost first so the active piece paints over it when they overlap.
    if let (Some(piece), Some(ghost_y)) = (game.falling(), game.ghost_row()) {
        stamp(&mut colors, &piece.matrix, piece.x, ghost_y, 8);
    }
    if let Some(piece) = game.falling() {
        stamp(
            &mut colors,
            &piece.matrix,
            piece.x,
            piece.y,
            piece.kind.color_code(),
        );
    }

    queue!(stdout, cursor::MoveTo(0, 0))?;
    let flashing = game.clear_phase() == ClearPhase::Flashing;

    for (y, row) in colors.iter().enumerate() {
        let mut line = String::with_capacity(GRID_COLS * 2 + 2);
        line.push('|');
        let row_flash = flashing && game.clearing_rows().contains(&y);
        for &code in row.iter() {
            line.push_str(match (row_flash, code) {
                (true, _) => "**",
                (false, 0) => " .",
                (false, 8) => "()",
                (false, _) => "[]",
            });
        }
        line.push('|');
        queue!(
            stdout,
            Print(line),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            cursor::MoveToNextLine(1)
        )?;
    }

    let status = match game.status() {
        GameStatus::Playing => "playing",
        GameStatus::Paused => "paused (p resumes)",
        GameStatus::GameOver => "game over (n restarts)",
    };
    let preview: Vec<&str> = game.preview().iter().map(|k| k.as_str()).collect();
    let hud = [
        format!(
            "score {}  best {}  level {}  lines {}",
            game.score(),
            game.best_score(),
            game.level(),
            game.lines()
        ),
        format!(
            "difficulty {}  next [{}]  {}",
            game.tuning().name,
            preview.join(" "),
            status
        ),
        String::from("arrows move/drop, x/z rotate, space hard drop, 1-5 difficulty, q quits"),
    ];
    for line in hud {
        queue!(
            stdout,
            Print(line),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            cursor::MoveToNextLine(1)
        )?;
    }

    stdout.flush()?;
    Ok(())
}

/// Write a piece matrix into the color buffer, skipping rows above the grid
fn stamp(colors: &mut [[u8; GRID_COLS]; GRID_ROWS], matrix: &[[u8; 4]; 4], x: i8, y: i8, code: u8) {
    for (my, row) in matrix.iter().enumerate() {
        for (mx, &sub) in row.iter().enumerate() {
            if sub == 0 {
                continue;
            }
            let gx = x + mx as i8;
            let gy = y + my as i8;
            if gx >= 0 && (gx as usize) < GRID_COLS && gy >= 0 && (gy as usize) < GRID_ROWS {
                colors[gy as usize][gx as usize] = code;
            }
        }
    }
}
