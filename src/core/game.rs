//! Game module - the engine state machine
//!
//! Ties together grid, pieces, bag and difficulty. Every event method
//! runs to completion synchronously, including the full lock-consequence
//! chain (merge, clear, score, respawn, topout check), and returns an
//! explicit [`EventOutcome`]. The state is a plain value: cloning it
//! yields an immutable snapshot, and equal seeds plus equal event
//! sequences reproduce identical states.

use arrayvec::ArrayVec;

use crate::core::bag::SevenBag;
use crate::core::board::Grid;
use crate::core::difficulty::{settings, DifficultySettings};
use crate::core::pieces;
use crate::core::scoring::{drop_score, gravity_for_level, level_for_lines, score_for_clears};
use crate::types::{
    ClearPhase, Difficulty, EventOutcome, FallingPiece, GameEvent, GameStatus, PieceKind,
    PREVIEW_MAX,
};

/// What a single lock-consequence run did. Consumed by the driver via
/// [`GameState::take_last_lock`], e.g. to persist a new best score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockReport {
    pub lines_cleared: u32,
    /// Original indices of the removed rows, top to bottom
    pub cleared_rows: ArrayVec<usize, 4>,
    /// Points gained from the clear table (drop bonuses excluded)
    pub score_gained: u32,
    /// Set when this lock pushed the score past the previous best
    pub new_best: Option<u32>,
    /// True when the respawned piece could not be placed
    pub topout: bool,
}

/// Complete engine state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    grid: Grid,
    falling: Option<FallingPiece>,
    /// FIFO preview queue, refilled to the difficulty's lookahead
    next: ArrayVec<PieceKind, PREVIEW_MAX>,
    bag: SevenBag,
    score: u32,
    level: u32,
    lines: u32,
    best_score: u32,
    /// Consecutive-clear counter; -1 = no active combo
    combo: i32,
    status: GameStatus,
    difficulty: Difficulty,
    /// Current gravity interval (ms per row)
    gravity_ms: u32,
    /// Elapsed time not yet converted into gravity steps
    gravity_acc: u32,
    lock_delay_ms: u32,
    /// None while airborne; Some(elapsed) while resting on an obstruction
    lock_acc: Option<u32>,
    /// Rows removed by the most recent clearing lock (one-snapshot
    /// annotation for drivers that flash the clear)
    clearing_rows: ArrayVec<usize, 4>,
    clear_phase: ClearPhase,
    last_lock: Option<LockReport>,
}

impl GameState {
    /// Start a fresh session. The best score is carried in from the
    /// caller's store; the seed drives the bag randomizer.
    pub fn new(best_score: u32, difficulty: Difficulty, seed: u32) -> Self {
        let tuning = settings(difficulty);
        let mut state = Self {
            grid: Grid::new(),
            falling: None,
            next: ArrayVec::new(),
            bag: SevenBag::new(seed),
            score: 0,
            level: 0,
            lines: 0,
            best_score,
            combo: -1,
            status: GameStatus::Playing,
            difficulty,
            gravity_ms: tuning.gravity_ms,
            gravity_acc: 0,
            lock_delay_ms: tuning.lock_delay_ms,
            lock_acc: None,
            clearing_rows: ArrayVec::new(),
            clear_phase: ClearPhase::None,
            last_lock: None,
        };
        state.spawn_next();
        state
    }

    // --- accessors -----------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn falling(&self) -> Option<FallingPiece> {
        self.falling
    }

    /// Upcoming piece kinds, oldest first
    pub fn preview(&self) -> &[PieceKind] {
        &self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn combo(&self) -> i32 {
        self.combo
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn tuning(&self) -> &'static DifficultySettings {
        settings(self.difficulty)
    }

    pub fn gravity_ms(&self) -> u32 {
        self.gravity_ms
    }

    pub fn gravity_acc(&self) -> u32 {
        self.gravity_acc
    }

    pub fn lock_delay_ms(&self) -> u32 {
        self.lock_delay_ms
    }

    pub fn lock_acc(&self) -> Option<u32> {
        self.lock_acc
    }

    pub fn clearing_rows(&self) -> &[usize] {
        &self.clearing_rows
    }

    pub fn clear_phase(&self) -> ClearPhase {
        self.clear_phase
    }

    /// Landing row of the current piece, or None when the difficulty
    /// hides the ghost or no piece is falling
    pub fn ghost_row(&self) -> Option<i8> {
        if !self.tuning().ghost_piece {
            return None;
        }
        let piece = self.falling?;
        Some(pieces::rest_row(&self.grid, &piece))
    }

    /// Take and clear the most recent lock report
    pub fn take_last_lock(&mut self) -> Option<LockReport> {
        self.last_lock.take()
    }

    // --- events --------------------------------------------------------

    /// Dispatch a single event
    pub fn apply_event(&mut self, event: GameEvent) -> EventOutcome {
        match event {
            GameEvent::NewGame => self.new_game(),
            GameEvent::SetDifficulty(d) => self.set_difficulty(d),
            GameEvent::PauseToggle => self.pause_toggle(),
            GameEvent::Tick { delta_ms } => self.tick(delta_ms),
            GameEvent::Move { dx } => self.move_piece(dx),
            GameEvent::SoftDrop => self.soft_drop(),
            GameEvent::HardDrop => self.hard_drop(),
            GameEvent::Rotate { dir } => self.rotate(dir),
        }
    }

    /// Reset grid, score, lines, level and combo; keep the best score and
    /// difficulty; reseed the bag from its rolling RNG state.
    pub fn new_game(&mut self) -> EventOutcome {
        let seed = self.bag.rng_state();
        *self = GameState::new(self.best_score, self.difficulty, seed);
        EventOutcome::Applied
    }

    /// Playing <-> Paused; no effect on GameOver
    pub fn pause_toggle(&mut self) -> EventOutcome {
        match self.status {
            GameStatus::Playing => {
                self.begin_event();
                self.status = GameStatus::Paused;
                EventOutcome::Applied
            }
            GameStatus::Paused => {
                self.begin_event();
                self.status = GameStatus::Playing;
                EventOutcome::Applied
            }
            GameStatus::GameOver => EventOutcome::Ignored,
        }
    }

    /// Apply a difficulty's gravity and lock-delay intervals immediately.
    /// Grid, score, falling piece and randomizer are untouched.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> EventOutcome {
        if self.status != GameStatus::Playing {
            return EventOutcome::Ignored;
        }
        self.begin_event();
        self.difficulty = difficulty;
        let tuning = settings(difficulty);
        self.gravity_ms = tuning.gravity_ms;
        self.lock_delay_ms = tuning.lock_delay_ms;
        self.top_up_preview();
        EventOutcome::Applied
    }

    /// Translate the piece horizontally by dx (-1 or +1)
    pub fn move_piece(&mut self, dx: i8) -> EventOutcome {
        if self.status != GameStatus::Playing {
            return EventOutcome::Ignored;
        }
        if dx != -1 && dx != 1 {
            return EventOutcome::Invalid;
        }
        self.begin_event();
        let Some(piece) = self.falling else {
            return EventOutcome::Blocked;
        };

        let outcome = match pieces::try_shift(&self.grid, &piece, dx, 0) {
            Some(moved) => {
                self.falling = Some(moved);
                EventOutcome::Applied
            }
            None => EventOutcome::Blocked,
        };
        self.sync_lock_timer();
        outcome
    }

    /// Rotate the piece through the kick search (dir: +1 CW, -1 CCW)
    pub fn rotate(&mut self, dir: i8) -> EventOutcome {
        if self.status != GameStatus::Playing {
            return EventOutcome::Ignored;
        }
        if dir != -1 && dir != 1 {
            return EventOutcome::Invalid;
        }
        self.begin_event();
        let Some(piece) = self.falling else {
            return EventOutcome::Blocked;
        };

        let outcome = match pieces::try_rotate(&self.grid, &piece, dir == 1) {
            Some(rotated) => {
                self.falling = Some(rotated);
                EventOutcome::Applied
            }
            // All kicks collided; the piece is unchanged.
            None => EventOutcome::Blocked,
        };
        self.sync_lock_timer();
        outcome
    }

    /// Drop one row, awarding a point whether or not the piece moves
    pub fn soft_drop(&mut self) -> EventOutcome {
        if self.status != GameStatus::Playing {
            return EventOutcome::Ignored;
        }
        self.begin_event();
        let Some(piece) = self.falling else {
            return EventOutcome::Blocked;
        };

        match pieces::try_shift(&self.grid, &piece, 0, 1) {
            Some(moved) => {
                self.falling = Some(moved);
                self.score += drop_score(1, false);
                EventOutcome::Applied
            }
            None => {
                // Resting: keep the lock timer running and still reward
                // the input.
                self.lock_acc = Some(self.lock_acc.unwrap_or(0));
                self.score += drop_score(1, false);
                EventOutcome::Blocked
            }
        }
    }

    /// Drop to the resting row, award 2 points per row travelled, then
    /// lock immediately (no lock-delay wait)
    pub fn hard_drop(&mut self) -> EventOutcome {
        if self.status != GameStatus::Playing {
            return EventOutcome::Ignored;
        }
        if !self.tuning().hard_drop_enabled {
            return EventOutcome::Ignored;
        }
        self.begin_event();
        let Some(mut piece) = self.falling else {
            return EventOutcome::Blocked;
        };

        let mut distance: u32 = 0;
        while let Some(down) = pieces::try_shift(&self.grid, &piece, 0, 1) {
            piece = down;
            distance += 1;
        }
        self.falling = Some(piece);
        self.score += drop_score(distance, true);
        self.lock_resting_piece();
        EventOutcome::Applied
    }

    /// Advance time. Consumes whole gravity intervals into downward steps
    /// (stopping at the first blocked step), then accrues lock delay and
    /// locks once it expires.
    pub fn tick(&mut self, delta_ms: u32) -> EventOutcome {
        if self.status != GameStatus::Playing {
            return EventOutcome::Ignored;
        }
        self.begin_event();
        if self.falling.is_none() {
            return EventOutcome::Ignored;
        }

        self.gravity_acc += delta_ms;
        while self.gravity_acc >= self.gravity_ms {
            self.gravity_acc -= self.gravity_ms;
            let Some(piece) = self.falling else {
                break;
            };
            match pieces::try_shift(&self.grid, &piece, 0, 1) {
                Some(down) => {
                    self.falling = Some(down);
                    self.lock_acc = None;
                }
                None => {
                    // Resting: stop consuming intervals this tick so a
                    // single call never locks twice.
                    self.lock_acc = Some(self.lock_acc.unwrap_or(0));
                    break;
                }
            }
        }

        if let Some(acc) = self.lock_acc {
            let acc = acc + delta_ms;
            if acc >= self.lock_delay_ms {
                self.lock_resting_piece();
            } else {
                self.lock_acc = Some(acc);
            }
        }

        EventOutcome::Applied
    }

    // --- internals -----------------------------------------------------

    /// Drop the previous snapshot's clear-flash annotation
    fn begin_event(&mut self) {
        self.clearing_rows.clear();
        self.clear_phase = ClearPhase::None;
    }

    /// After a move or rotation: start or continue the lock timer while
    /// resting on an obstruction, clear it otherwise
    fn sync_lock_timer(&mut self) {
        let resting = self
            .falling
            .map_or(false, |p| pieces::is_resting(&self.grid, &p));
        self.lock_acc = if resting {
            Some(self.lock_acc.unwrap_or(0))
        } else {
            None
        };
    }

    /// Refill the preview queue up to the difficulty's lookahead
    fn top_up_preview(&mut self) {
        let lookahead = self.tuning().preview_count;
        while self.next.len() < lookahead {
            self.next.push(self.bag.next());
        }
    }

    /// Pop the next kind (refilling around the pop) and place it at the
    /// spawn origin. On collision the session tops out: GameOver, no
    /// falling piece. Returns false on topout.
    fn spawn_next(&mut self) -> bool {
        self.top_up_preview();
        let kind = self.next.remove(0);
        self.top_up_preview();

        let piece = pieces::spawn_piece(kind);
        if self.grid.collides(&piece) {
            self.falling = None;
            self.status = GameStatus::GameOver;
            false
        } else {
            self.falling = Some(piece);
            true
        }
    }

    /// The shared lock-consequence sequence: merge, clear, score, level,
    /// gravity recompute, respawn, topout check.
    fn lock_resting_piece(&mut self) {
        let Some(piece) = self.falling.take() else {
            return;
        };

        let merged = self.grid.merged(&piece);
        let (compacted, rows) = merged.cleared_full_rows();
        let cleared = rows.len() as u32;
        self.grid = compacted;

        self.lines += cleared;
        self.level = level_for_lines(self.lines);

        let gained = score_for_clears(cleared as usize, self.level);
        self.score += gained;
        let new_best = if self.score > self.best_score {
            self.best_score = self.score;
            Some(self.best_score)
        } else {
            None
        };

        self.combo = if cleared > 0 { self.combo + 1 } else { -1 };
        if cleared > 0 {
            self.clearing_rows = rows.clone();
            self.clear_phase = ClearPhase::Flashing;
        }

        self.gravity_ms = gravity_for_level(self.level);
        self.gravity_acc = 0;
        self.lock_acc = None;

        let spawned = self.spawn_next();
        self.last_lock = Some(LockReport {
            lines_cleared: cleared,
            cleared_rows: rows,
            score_gained: gained,
            new_best,
            topout: !spawned,
        });
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0, Difficulty::default(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GRID_COLS, SPAWN_COL, SPAWN_ROW};

    fn state() -> GameState {
        GameState::new(0, Difficulty::Medium, 12345)
    }

    /// Fill a row except the leftmost `gap` columns
    fn fill_row_except(grid: &mut Grid, y: i8, gap: usize) {
        for x in gap..GRID_COLS {
            grid.set(x as i8, y, Some(PieceKind::L));
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = state();
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.combo(), -1);
        assert_eq!(state.gravity_ms(), 500);
        assert_eq!(state.lock_delay_ms(), 1000);
        assert_eq!(state.lock_acc(), None);
        assert_eq!(state.clear_phase(), ClearPhase::None);

        let piece = state.falling().expect("piece spawned");
        assert_eq!(piece.x, SPAWN_COL);
        assert_eq!(piece.y, SPAWN_ROW);
        assert_eq!(state.preview().len(), 3);
    }

    #[test]
    fn test_preview_refilled_after_pop() {
        let mut state = state();
        for _ in 0..5 {
            state.hard_drop();
            if state.status() == GameStatus::GameOver {
                return;
            }
            assert_eq!(state.preview().len(), 3);
        }
    }

    #[test]
    fn test_preview_matches_spawn_order() {
        let mut state = state();
        let expected = state.preview()[0];
        state.hard_drop();
        assert_eq!(state.falling().map(|p| p.kind), Some(expected));
    }

    #[test]
    fn test_move_left_right() {
        let mut state = state();
        let x0 = state.falling().map(|p| p.x).unwrap_or(0);

        assert_eq!(state.move_piece(1), EventOutcome::Applied);
        assert_eq!(state.falling().map(|p| p.x), Some(x0 + 1));
        assert_eq!(state.move_piece(-1), EventOutcome::Applied);
        assert_eq!(state.falling().map(|p| p.x), Some(x0));
    }

    #[test]
    fn test_move_blocked_at_wall() {
        let mut state = state();
        let mut steps = 0;
        while state.move_piece(-1) == EventOutcome::Applied {
            steps += 1;
            assert!(steps < GRID_COLS, "never reached the wall");
        }
        assert_eq!(state.move_piece(-1), EventOutcome::Blocked);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut state = state();
        let before = state.clone();
        assert_eq!(state.move_piece(0), EventOutcome::Invalid);
        assert_eq!(state.move_piece(2), EventOutcome::Invalid);
        assert_eq!(state.rotate(0), EventOutcome::Invalid);
        assert_eq!(state.rotate(-2), EventOutcome::Invalid);
        assert_eq!(state, before, "invalid input must leave state unchanged");
    }

    #[test]
    fn test_rotate_round_trip() {
        let mut state = state();
        // Drop a little so the kick search has room in every direction.
        state.tick(state.gravity_ms() * 3);
        let before = state.falling().expect("falling piece");

        assert_eq!(state.rotate(1), EventOutcome::Applied);
        assert_eq!(state.rotate(-1), EventOutcome::Applied);
        let after = state.falling().expect("falling piece");
        assert_eq!(after.matrix, before.matrix);
    }

    #[test]
    fn test_global_gate_when_paused() {
        let mut state = state();
        assert_eq!(state.pause_toggle(), EventOutcome::Applied);
        assert_eq!(state.status(), GameStatus::Paused);

        let frozen = state.clone();
        assert_eq!(state.tick(10_000), EventOutcome::Ignored);
        assert_eq!(state.move_piece(1), EventOutcome::Ignored);
        assert_eq!(state.soft_drop(), EventOutcome::Ignored);
        assert_eq!(state.hard_drop(), EventOutcome::Ignored);
        assert_eq!(state.rotate(1), EventOutcome::Ignored);
        assert_eq!(state.set_difficulty(Difficulty::Hard), EventOutcome::Ignored);
        assert_eq!(state, frozen);

        assert_eq!(state.pause_toggle(), EventOutcome::Applied);
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn test_set_difficulty_applies_intervals_only() {
        let mut state = state();
        let grid_before = state.grid().clone();
        let score_before = state.score();
        let piece_before = state.falling();

        assert_eq!(state.set_difficulty(Difficulty::Hard), EventOutcome::Applied);
        assert_eq!(state.gravity_ms(), 300);
        assert_eq!(state.lock_delay_ms(), 500);
        assert_eq!(state.grid(), &grid_before);
        assert_eq!(state.score(), score_before);
        assert_eq!(state.falling(), piece_before);
    }

    #[test]
    fn test_soft_drop_moves_and_scores() {
        let mut state = state();
        let y0 = state.falling().map(|p| p.y).unwrap_or(0);
        assert_eq!(state.soft_drop(), EventOutcome::Applied);
        assert_eq!(state.falling().map(|p| p.y), Some(y0 + 1));
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_soft_drop_rewarded_while_resting() {
        let mut state = state();
        // Drive the piece to its resting row.
        while state.soft_drop() == EventOutcome::Applied {}
        let resting_score = state.score();

        assert_eq!(state.soft_drop(), EventOutcome::Blocked);
        assert_eq!(state.score(), resting_score + 1);
        assert!(state.lock_acc().is_some(), "lock timer must be running");
    }

    #[test]
    fn test_hard_drop_distance_scoring() {
        let mut state = state();
        let piece = state.falling().expect("falling piece");
        let distance = (pieces::rest_row(state.grid(), &piece) - piece.y) as u32;

        assert_eq!(state.hard_drop(), EventOutcome::Applied);
        assert_eq!(state.score(), 2 * distance);

        // The piece locked at its resting rows.
        let occupied = state.grid().cells().iter().filter(|c| c.is_some()).count();
        assert_eq!(occupied, 4);
    }

    #[test]
    fn test_hard_drop_disabled_on_super_hard() {
        let mut state = GameState::new(0, Difficulty::SuperHard, 12345);
        let before = state.clone();
        assert_eq!(state.hard_drop(), EventOutcome::Ignored);
        assert_eq!(state, before);
    }

    #[test]
    fn test_tick_gravity_single_step() {
        let mut state = state();
        let y0 = state.falling().map(|p| p.y).unwrap_or(0);

        state.tick(state.gravity_ms() - 1);
        assert_eq!(state.falling().map(|p| p.y), Some(y0));

        state.tick(1);
        assert_eq!(state.falling().map(|p| p.y), Some(y0 + 1));
        assert_eq!(state.gravity_acc(), 0);
    }

    #[test]
    fn test_tick_catch_up_consumes_multiple_intervals() {
        let mut state = state();
        let y0 = state.falling().map(|p| p.y).unwrap_or(0);

        state.tick(state.gravity_ms() * 3 + 7);
        assert_eq!(state.falling().map(|p| p.y), Some(y0 + 3));
        assert_eq!(state.gravity_acc(), 7);
    }

    #[test]
    fn test_tick_starts_lock_timer_when_resting() {
        let mut state = state();
        // One huge delta: gravity walks the piece to its resting row and
        // begins (but does not necessarily expire) the lock delay.
        state.tick(state.gravity_ms());
        while state.lock_acc().is_none() && state.status() == GameStatus::Playing {
            state.tick(state.gravity_ms());
        }
        assert!(state.lock_acc().is_some());
        assert!(state.falling().is_some(), "not locked before delay expires");
    }

    #[test]
    fn test_tick_lock_delay_expiry_locks_piece() {
        let mut state = state();
        while state.soft_drop() == EventOutcome::Applied {}
        assert!(state.lock_acc().is_some());

        state.tick(state.lock_delay_ms());
        let report = state.take_last_lock().expect("lock happened");
        assert_eq!(report.lines_cleared, 0);
        assert!(!report.topout);
        // A fresh piece respawned and the timers reset.
        assert!(state.falling().is_some());
        assert_eq!(state.lock_acc(), None);
        assert_eq!(state.gravity_acc(), 0);
    }

    #[test]
    fn test_lock_clears_line_and_scores() {
        let mut state = state();
        // Leave a gap matching an I piece laid flat at the left wall.
        fill_row_except(&mut state.grid, 15, 4);
        // Force a known falling piece; the engine only sees the value.
        state.falling = Some(FallingPiece {
            kind: PieceKind::I,
            matrix: pieces::base_matrix(PieceKind::I),
            x: 0,
            y: 10,
        });

        assert_eq!(state.hard_drop(), EventOutcome::Applied);
        let report = state.take_last_lock().expect("lock report");
        assert_eq!(report.lines_cleared, 1);
        assert_eq!(report.cleared_rows.as_slice(), &[15]);
        assert_eq!(report.score_gained, 100);
        assert_eq!(state.lines(), 1);
        assert_eq!(state.combo(), 0);
        assert_eq!(state.clear_phase(), ClearPhase::Flashing);
        assert_eq!(state.clearing_rows(), &[15]);
        assert!(!state.grid().is_row_full(15));
    }

    #[test]
    fn test_flash_annotation_cleared_by_next_event() {
        let mut state = state();
        fill_row_except(&mut state.grid, 15, 4);
        state.falling = Some(FallingPiece {
            kind: PieceKind::I,
            matrix: pieces::base_matrix(PieceKind::I),
            x: 0,
            y: 10,
        });
        state.hard_drop();
        assert_eq!(state.clear_phase(), ClearPhase::Flashing);

        state.tick(1);
        assert_eq!(state.clear_phase(), ClearPhase::None);
        assert!(state.clearing_rows().is_empty());
    }

    #[test]
    fn test_combo_resets_on_zero_line_lock() {
        let mut state = state();
        fill_row_except(&mut state.grid, 15, 4);
        state.falling = Some(FallingPiece {
            kind: PieceKind::I,
            matrix: pieces::base_matrix(PieceKind::I),
            x: 0,
            y: 10,
        });
        state.hard_drop();
        assert_eq!(state.combo(), 0);

        // Next lock clears nothing.
        state.hard_drop();
        assert_eq!(state.combo(), -1);
    }

    #[test]
    fn test_best_score_reported_once_exceeded() {
        let mut state = GameState::new(50, Difficulty::Medium, 12345);
        fill_row_except(&mut state.grid, 15, 4);
        state.falling = Some(FallingPiece {
            kind: PieceKind::I,
            matrix: pieces::base_matrix(PieceKind::I),
            x: 0,
            y: 10,
        });
        state.hard_drop();

        let report = state.take_last_lock().expect("lock report");
        assert!(state.score() > 50);
        assert_eq!(report.new_best, Some(state.score()));
        assert_eq!(state.best_score(), state.score());
    }

    #[test]
    fn test_best_score_not_reported_when_unbeaten() {
        let mut state = GameState::new(1_000_000, Difficulty::Medium, 12345);
        state.hard_drop();
        let report = state.take_last_lock().expect("lock report");
        assert_eq!(report.new_best, None);
        assert_eq!(state.best_score(), 1_000_000);
    }

    #[test]
    fn test_gravity_recomputed_after_lock() {
        let mut state = GameState::new(0, Difficulty::SuperEasy, 12345);
        assert_eq!(state.gravity_ms(), 1200);
        state.hard_drop();
        // The lock sequence re-derives gravity from the level curve.
        assert_eq!(state.gravity_ms(), 800);
    }

    #[test]
    fn test_topout_sets_game_over() {
        let mut state = state();
        // Wall off the spawn rows, leaving column 0 open so neither row is
        // full and the lock clears nothing.
        for x in 1..GRID_COLS as i8 {
            state.grid.set(x, 0, Some(PieceKind::J));
            state.grid.set(x, 1, Some(PieceKind::J));
        }
        state.falling = Some(FallingPiece {
            kind: PieceKind::O,
            matrix: pieces::base_matrix(PieceKind::O),
            x: 4,
            y: 13,
        });

        state.hard_drop();
        assert_eq!(state.status(), GameStatus::GameOver);
        assert_eq!(state.falling(), None);
        let report = state.take_last_lock().expect("lock report");
        assert!(report.topout);

        // Only NewGame leaves GameOver.
        let terminal = state.clone();
        assert_eq!(state.tick(10_000), EventOutcome::Ignored);
        assert_eq!(state.hard_drop(), EventOutcome::Ignored);
        assert_eq!(state.pause_toggle(), EventOutcome::Ignored);
        assert_eq!(state, terminal);

        assert_eq!(state.new_game(), EventOutcome::Applied);
        assert_eq!(state.status(), GameStatus::Playing);
        assert!(state.falling().is_some());
    }

    #[test]
    fn test_new_game_preserves_best_and_difficulty() {
        let mut state = GameState::new(0, Difficulty::Hard, 12345);
        state.soft_drop();
        state.soft_drop();
        state.hard_drop();
        let best = state.best_score();
        assert!(best > 0);

        state.new_game();
        assert_eq!(state.score(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.combo(), -1);
        assert_eq!(state.best_score(), best);
        assert_eq!(state.difficulty(), Difficulty::Hard);
        assert_eq!(state.grid(), &Grid::new());
    }

    #[test]
    fn test_ghost_row_respects_difficulty_flag() {
        let state = GameState::new(0, Difficulty::Medium, 7);
        assert!(state.ghost_row().is_some());

        let hidden = GameState::new(0, Difficulty::Hard, 7);
        assert_eq!(hidden.ghost_row(), None);
    }

    #[test]
    fn test_move_while_resting_keeps_lock_timer_running() {
        let mut state = state();
        while state.soft_drop() == EventOutcome::Applied {}
        // Accrue some lock time without expiring it.
        state.tick(1);
        let acc = state.lock_acc().expect("resting");
        assert!(acc > 0);

        // A successful horizontal move while still resting continues the
        // timer at its current value rather than resetting it.
        if state.move_piece(1) == EventOutcome::Applied {
            if let Some(after) = state.lock_acc() {
                assert_eq!(after, acc);
            }
        }
    }

    #[test]
    fn test_apply_event_dispatch() {
        let mut state = state();
        let x0 = state.falling().map(|p| p.x).unwrap_or(0);
        assert_eq!(
            state.apply_event(GameEvent::Move { dx: 1 }),
            EventOutcome::Applied
        );
        assert_eq!(state.falling().map(|p| p.x), Some(x0 + 1));
        assert_eq!(
            state.apply_event(GameEvent::Tick { delta_ms: 0 }),
            EventOutcome::Applied
        );
        assert_eq!(
            state.apply_event(GameEvent::Move { dx: 3 }),
            EventOutcome::Invalid
        );
    }
}
