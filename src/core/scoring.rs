//! Scoring module - clear scores, level progression, gravity curve

use crate::types::{
    GRAVITY_BASE_MS, GRAVITY_MIN_MS, GRAVITY_STEP_MS, HARD_DROP_POINTS_PER_ROW, LINES_PER_LEVEL,
    LINE_SCORES, SOFT_DROP_POINT,
};

/// Points for clearing `lines` rows at once, scaled by (level + 1)
pub fn score_for_clears(lines: usize, level: u32) -> u32 {
    let base = LINE_SCORES.get(lines).copied().unwrap_or(0);
    base * (level + 1)
}

/// Points for dropped rows: soft drop +1 per row, hard drop +2 per row
pub fn drop_score(rows: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        rows * HARD_DROP_POINTS_PER_ROW
    } else {
        rows * SOFT_DROP_POINT
    }
}

/// Level derived from the total cleared-line count
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}

/// Gravity interval for a level (ms per row), non-increasing with a floor
pub fn gravity_for_level(level: u32) -> u32 {
    GRAVITY_BASE_MS
        .saturating_sub(level.saturating_mul(GRAVITY_STEP_MS))
        .max(GRAVITY_MIN_MS)
}
