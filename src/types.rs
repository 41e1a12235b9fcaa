//! Core types shared across the engine
//! This module contains pure data types and tuning constants with no
//! external dependencies

/// Grid dimensions (rows ordered top to bottom)
pub const GRID_ROWS: usize = 16;
pub const GRID_COLS: usize = 10;

/// Spawn origin for new pieces. The row is negative: a freshly spawned
/// piece sits partially above the visible grid.
pub const SPAWN_COL: i8 = 3;
pub const SPAWN_ROW: i8 = -1;

/// Gravity speed curve (ms per row): base - level * step, floored.
pub const GRAVITY_BASE_MS: u32 = 800;
pub const GRAVITY_STEP_MS: u32 = 60;
pub const GRAVITY_MIN_MS: u32 = 50;

/// Level increases every 10 cleared lines
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per cleared-line count, multiplied by (level + 1)
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Drop rewards (points per row)
pub const SOFT_DROP_POINT: u32 = 1;
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// Largest preview lookahead any difficulty configures
pub const PREVIEW_MAX: usize = 5;

/// Piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
}

impl PieceKind {
    /// All seven kinds, in color-code order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Color code for locked cells (1..=7; 0 is reserved for empty)
    pub fn color_code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::J => 4,
            PieceKind::L => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::S => "s",
            PieceKind::Z => "z",
        }
    }
}

/// Cell on the grid (None = empty, Some = locked piece kind)
pub type Cell = Option<PieceKind>;

/// 4x4 shape matrix, 1 = occupied sub-cell
pub type ShapeMatrix = [[u8; 4]; 4];

/// Active falling piece. Replaced wholesale on every mutation; callers
/// never see a partially edited piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingPiece {
    pub kind: PieceKind,
    pub matrix: ShapeMatrix,
    /// Origin column of the 4x4 matrix on the grid
    pub x: i8,
    /// Origin row; may be negative while the piece is partially above the grid
    pub y: i8,
}

/// Difficulty levels, ordered easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    SuperEasy,
    Easy,
    Medium,
    Hard,
    SuperHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::SuperEasy,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::SuperHard,
    ];

    /// Parse from string (case-insensitive), as accepted on the command line
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "super-easy" => Some(Difficulty::SuperEasy),
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "super-hard" => Some(Difficulty::SuperHard),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::SuperEasy => "super-easy",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::SuperHard => "super-hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

/// Line-clear presentation phase. Set on the snapshot produced by a
/// clearing lock so a driver can flash the rows; the engine itself has
/// already compacted the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearPhase {
    None,
    Flashing,
}

/// Discrete engine events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    NewGame,
    SetDifficulty(Difficulty),
    PauseToggle,
    Tick { delta_ms: u32 },
    Move { dx: i8 },
    SoftDrop,
    HardDrop,
    Rotate { dir: i8 },
}

/// Result of applying a single event to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event changed the state
    Applied,
    /// The piece could not move or rotate; score side effects may still
    /// have applied (soft drop rewards input even while resting)
    Blocked,
    /// The event was gated off by the current status or difficulty
    Ignored,
    /// The event carried an out-of-contract argument (dx or dir outside +/-1)
    Invalid,
}
