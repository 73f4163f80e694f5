//! Per-level difficulty
//!
//! Each level adds a row and a column of blocks (up to grid capacity), raises
//! the ball's speed range and narrows the paddle.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// 1-based level number
    pub level: u32,
    pub rows: usize,
    pub columns: usize,
    pub min_ball_speed: f32,
    pub max_ball_speed: f32,
    pub paddle_width: f32,
}

impl LevelConfig {
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let steps = (level - 1) as usize;
        let factor = steps as f32;

        Self {
            level,
            rows: (MIN_BLOCK_ROWS + steps).clamp(MIN_BLOCK_ROWS, MAX_BLOCK_ROWS),
            columns: (MIN_BLOCK_COLUMNS + steps).clamp(MIN_BLOCK_COLUMNS, MAX_BLOCK_COLUMNS),
            min_ball_speed: BALL_SPEED_MIN + BALL_SPEED_INCREMENT_PER_LEVEL * factor,
            max_ball_speed: BALL_SPEED_MAX + BALL_SPEED_MAX_INCREMENT_PER_LEVEL * factor,
            paddle_width: (PADDLE_BASE_WIDTH - PADDLE_WIDTH_DECREMENT_PER_LEVEL * factor).max(PADDLE_MIN_WIDTH),
        }
    }
}

/// Bonus for clearing `level` with `score` points banked
pub fn level_bonus(level: u32, score: u64) -> u64 {
    LEVEL_BONUS_MULTIPLIER * level as u64 + (score as f32 * SCORE_BONUS_FRACTION) as u64
}
