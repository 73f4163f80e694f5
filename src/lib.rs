//! Brickfall - a block-breaker simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, block collisions, power-ups)
//! - `tuning`: Data-driven game balance
//! - `view`: Read-only instance data for a renderer

pub mod sim;
pub mod tuning;
pub mod view;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Reference screen size
    pub const SCREEN_WIDTH: f32 = 1920.0;
    pub const SCREEN_HEIGHT: f32 = 1080.0;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_SPEED_MIN: f32 = 900.0;
    pub const BALL_SPEED_MAX: f32 = 1800.0;
    /// Added to the minimum speed for every level past the first
    pub const BALL_SPEED_INCREMENT_PER_LEVEL: f32 = 50.0;
    /// Added to the maximum speed for every level past the first
    pub const BALL_SPEED_MAX_INCREMENT_PER_LEVEL: f32 = 100.0;
    /// Speed boost on every wall, ceiling or block bounce (multiplicative)
    pub const BOUNCE_SPEED_FACTOR: f32 = 1.05;
    /// Minimum |direction.y| after a bounce
    pub const MIN_VERTICAL: f32 = 0.3;
    /// Minimum |direction.x| after a bounce
    pub const MIN_HORIZONTAL: f32 = 0.2;
    /// Horizontal lean when shooting with a direction held
    pub const SHOOT_LEAN: f32 = 0.4;
    /// Random horizontal launch offset when idle, in hundredths
    pub const SHOOT_JITTER: i32 = 15;
    /// Random perpendicular perturbation on block bounce, in hundredths
    pub const BLOCK_BOUNCE_JITTER: i32 = 10;

    /// Paddle defaults
    pub const PADDLE_BASE_WIDTH: f32 = 200.0;
    pub const PADDLE_MIN_WIDTH: f32 = 100.0;
    /// Width lost per level past the first
    pub const PADDLE_WIDTH_DECREMENT_PER_LEVEL: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    pub const PADDLE_BASE_SPEED: f32 = 1000.0;
    /// Distance of the paddle's top edge from the bottom of the screen
    pub const PADDLE_BOTTOM_OFFSET: f32 = 50.0;
    pub const DASH_BOOST: f32 = 1.1;
    pub const STARTING_LIVES: u32 = 5;

    /// Block grid
    pub const MIN_BLOCK_ROWS: usize = 3;
    pub const MAX_BLOCK_ROWS: usize = 6;
    pub const MIN_BLOCK_COLUMNS: usize = 8;
    pub const MAX_BLOCK_COLUMNS: usize = 12;
    pub const BLOCK_SPACING: f32 = 10.0;
    pub const BLOCK_TOP_OFFSET: f32 = 0.18;
    pub const BLOCK_SIDE_OFFSET: f32 = 0.12;
    pub const BLOCK_HEIGHT_FRACTION: f32 = 0.03;
    pub const BLOCK_MAX_LIVES: i32 = 6;

    /// Power-ups
    pub const POWERUP_SLOTS: usize = 10;
    pub const POWERUP_RADIUS: f32 = 10.0;
    pub const POWERUP_FALL_SPEED: f32 = 200.0;

    /// Scoring
    pub const BLOCK_BASE_SCORE: u64 = 100;
    pub const COMBO_SCORE_STEP: f32 = 0.5;
    pub const LEVEL_BONUS_MULTIPLIER: u64 = 100;
    pub const SCORE_BONUS_FRACTION: f32 = 0.25;
}
