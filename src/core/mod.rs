//! Core module - pure game logic with no external dependencies
//!
//! Contains all gameplay rules: grid queries and mutations, piece shapes
//! and the kick search, the bag randomizer, the difficulty table, scoring
//! helpers, and the engine state machine. No UI, networking or I/O.

pub mod bag;
pub mod board;
pub mod difficulty;
pub mod game;
pub mod pieces;
pub mod scoring;

// Re-export commonly used types
pub use bag::{SevenBag, SimpleRng};
pub use board::Grid;
pub use difficulty::{settings, DifficultySettings};
pub use game::{GameState, LockReport};
