//! Pieces module - shape matrices, rotation and the kick search
//!
//! Every kind has a single canonical 4x4 base matrix; orientations are
//! produced by rotating the matrix itself rather than by per-rotation
//! lookup tables. Rotation requests resolve ambiguity through a short
//! fixed kick list, not a full SRS table.

use crate::core::board::Grid;
use crate::types::{FallingPiece, PieceKind, ShapeMatrix, SPAWN_COL, SPAWN_ROW};

/// Canonical base matrices (baseline orientation only)
const I_BASE: ShapeMatrix = [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]];
const O_BASE: ShapeMatrix = [[0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
const T_BASE: ShapeMatrix = [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
const J_BASE: ShapeMatrix = [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
const L_BASE: ShapeMatrix = [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
const S_BASE: ShapeMatrix = [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
const Z_BASE: ShapeMatrix = [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]];

/// Get the canonical base matrix for a piece kind
pub fn base_matrix(kind: PieceKind) -> ShapeMatrix {
    match kind {
        PieceKind::I => I_BASE,
        PieceKind::O => O_BASE,
        PieceKind::T => T_BASE,
        PieceKind::J => J_BASE,
        PieceKind::L => L_BASE,
        PieceKind::S => S_BASE,
        PieceKind::Z => Z_BASE,
    }
}

/// Rotate a 4x4 matrix clockwise: out[x][3 - y] = m[y][x]
pub fn rotate_cw(m: &ShapeMatrix) -> ShapeMatrix {
    let mut out: ShapeMatrix = [[0; 4]; 4];
    for (y, row) in m.iter().enumerate() {
        for (x, &sub) in row.iter().enumerate() {
            out[x][3 - y] = sub;
        }
    }
    out
}

/// Rotate a 4x4 matrix counter-clockwise: out[3 - x][y] = m[y][x]
pub fn rotate_ccw(m: &ShapeMatrix) -> ShapeMatrix {
    let mut out: ShapeMatrix = [[0; 4]; 4];
    for (y, row) in m.iter().enumerate() {
        for (x, &sub) in row.iter().enumerate() {
            out[3 - x][y] = sub;
        }
    }
    out
}

/// Kick offsets tried in priority order when a rotation collides
pub const KICKS: [(i8, i8); 6] = [(0, 0), (1, 0), (-1, 0), (2, 0), (-2, 0), (0, -1)];

/// Create a new piece at the spawn origin
pub fn spawn_piece(kind: PieceKind) -> FallingPiece {
    FallingPiece {
        kind,
        matrix: base_matrix(kind),
        x: SPAWN_COL,
        y: SPAWN_ROW,
    }
}

/// Try to translate a piece. Returns the moved piece, or None if the
/// target position collides.
pub fn try_shift(grid: &Grid, piece: &FallingPiece, dx: i8, dy: i8) -> Option<FallingPiece> {
    let moved = FallingPiece {
        x: piece.x + dx,
        y: piece.y + dy,
        ..*piece
    };
    if grid.collides(&moved) {
        None
    } else {
        Some(moved)
    }
}

/// Try to rotate a piece, searching the kick list in priority order.
/// Returns the first non-colliding placement, or None when every kick
/// collides (the caller keeps the original piece).
pub fn try_rotate(grid: &Grid, piece: &FallingPiece, clockwise: bool) -> Option<FallingPiece> {
    let matrix = if clockwise {
        rotate_cw(&piece.matrix)
    } else {
        rotate_ccw(&piece.matrix)
    };

    for &(kx, ky) in KICKS.iter() {
        let candidate = FallingPiece {
            matrix,
            x: piece.x + kx,
            y: piece.y + ky,
            ..*piece
        };
        if !grid.collides(&candidate) {
            return Some(candidate);
        }
    }

    None
}

/// Check whether a piece rests on an obstruction directly below
pub fn is_resting(grid: &Grid, piece: &FallingPiece) -> bool {
    try_shift(grid, piece, 0, 1).is_none()
}

/// Lowest row the piece can occupy from its current position (ghost row)
pub fn rest_row(grid: &Grid, piece: &FallingPiece) -> i8 {
    let mut resting = *piece;
    while let Some(down) = try_shift(grid, &resting, 0, 1) {
        resting = down;
    }
    resting.y
}
