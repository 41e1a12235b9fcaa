//! blockfall - a deterministic falling-block puzzle core.
//!
//! The engine owns the playing grid, piece movement and rotation,
//! timing-driven gravity and lock delay, line clearing, scoring, leveling
//! and difficulty tuning. Rendering, input translation and persistence
//! are driver concerns; the engine exposes value snapshots and a
//! consumable [`core::LockReport`] for them.

pub mod core;
pub mod types;

pub use crate::core::{GameState, Grid, LockReport, SevenBag};
pub use crate::types::{
    ClearPhase, Difficulty, EventOutcome, FallingPiece, GameEvent, GameStatus, PieceKind,
};
