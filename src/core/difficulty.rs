//! Difficulty module - static tuning table
//!
//! Five levels ordered easiest to hardest. Selecting a difficulty applies
//! its gravity and lock-delay intervals immediately; it never resets the
//! grid, score or randomizer.

use crate::types::Difficulty;

/// Per-difficulty tuning parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultySettings {
    pub name: &'static str,
    /// Base gravity interval (ms per row)
    pub gravity_ms: u32,
    /// Grace period after a piece first rests (ms)
    pub lock_delay_ms: u32,
    /// Preview lookahead length
    pub preview_count: usize,
    /// Whether renderers should show the ghost piece
    pub ghost_piece: bool,
    /// Whether the hard-drop event is available
    pub hard_drop_enabled: bool,
    /// Reserved soft-drop score multiplier. Part of the tuning table but
    /// not yet applied by the scoring path; soft drop awards a flat point.
    pub soft_drop_multiplier: u32,
}

const SUPER_EASY: DifficultySettings = DifficultySettings {
    name: "Super Easy",
    gravity_ms: 1200,
    lock_delay_ms: 2000,
    preview_count: 5,
    ghost_piece: true,
    hard_drop_enabled: true,
    soft_drop_multiplier: 2,
};

const EASY: DifficultySettings = DifficultySettings {
    name: "Easy",
    gravity_ms: 800,
    lock_delay_ms: 1500,
    preview_count: 4,
    ghost_piece: true,
    hard_drop_enabled: true,
    soft_drop_multiplier: 2,
};

const MEDIUM: DifficultySettings = DifficultySettings {
    name: "Medium",
    gravity_ms: 500,
    lock_delay_ms: 1000,
    preview_count: 3,
    ghost_piece: true,
    hard_drop_enabled: true,
    soft_drop_multiplier: 1,
};

const HARD: DifficultySettings = DifficultySettings {
    name: "Hard",
    gravity_ms: 300,
    lock_delay_ms: 500,
    preview_count: 2,
    ghost_piece: false,
    hard_drop_enabled: true,
    soft_drop_multiplier: 1,
};

const SUPER_HARD: DifficultySettings = DifficultySettings {
    name: "Super Hard",
    gravity_ms: 150,
    lock_delay_ms: 200,
    preview_count: 1,
    ghost_piece: false,
    hard_drop_enabled: false,
    soft_drop_multiplier: 1,
};

/// Look up the settings for a difficulty level
pub fn settings(difficulty: Difficulty) -> &'static DifficultySettings {
    match difficulty {
        Difficulty::SuperEasy => &SUPER_EASY,
        Difficulty::Easy => &EASY,
        Difficulty::Medium => &MEDIUM,
        Difficulty::Hard => &HARD,
        Difficulty::SuperHard => &SUPER_HARD,
    }
}
