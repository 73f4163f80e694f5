//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context. Every subsystem receives the
//! pieces it needs from here by reference; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::block::BlockGrid;
use super::level::{LevelConfig, level_bonus};
use super::paddle::Paddle;
use super::palette::{self, Rgba};
use super::powerup::{EffectTargets, PowerUpKind, PowerUps};
use super::spawn::SpawnSystem;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball in play or resting on the paddle
    Playing,
    /// Every block destroyed; waiting for `advance_level`
    LevelComplete,
    /// Out of lives
    GameOver,
}

/// Outcome signals emitted during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WallBounce,
    PaddleHit,
    BlockHit { row: usize, column: usize },
    BlockDestroyed { row: usize, column: usize },
    AllBlocksDestroyed,
    BallLost,
    GameOver,
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCollected { kind: PowerUpKind },
    /// Picked up while the same kind was already running
    PowerUpDiscarded { kind: PowerUpKind },
    /// Fell off the bottom of the screen
    PowerUpMissed { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
}

/// Scaled world clock
///
/// `scale` is applied once to the raw frame delta; everything downstream
/// (paddle, ball, power-ups, spawn cooldown, effect timers) sees the scaled
/// value so slow motion stays consistent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTime {
    /// Scaled seconds since the game started
    pub elapsed: f32,
    pub scale: f32,
    /// Scale with no Timewarp active
    pub normal_scale: f32,
}

impl WorldTime {
    pub fn new(normal_scale: f32) -> Self {
        Self {
            elapsed: 0.0,
            scale: normal_scale,
            normal_scale,
        }
    }

    pub fn scaled(&self, raw_dt: f32) -> f32 {
        raw_dt * self.scale
    }

    pub fn advance(&mut self, scaled_dt: f32) {
        self.elapsed += scaled_dt;
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Screen size in pixels
    pub screen: Vec2,
    pub level: LevelConfig,
    pub phase: GamePhase,
    pub ball: Ball,
    pub grid: BlockGrid,
    pub paddle: Paddle,
    pub powerups: PowerUps,
    pub spawn: SpawnSystem,
    pub time: WorldTime,
    /// Timewarp block palette
    pub alternate_palette: bool,
    /// Consecutive block hits without losing the ball
    pub combo: u32,
    pub max_combo: u32,
    /// Simulation tick counter
    pub frame: u64,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game at level 1 with the given seed
    pub fn new(seed: u64, screen_width: f32, screen_height: f32, tuning: Tuning) -> Self {
        let level = LevelConfig::for_level(1);
        let paddle = Paddle::new(screen_width, screen_height, level.paddle_width, tuning.starting_lives);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            screen: Vec2::new(screen_width, screen_height),
            level,
            phase: GamePhase::Playing,
            ball: Ball::new(Vec2::ZERO, level.min_ball_speed, level.max_ball_speed),
            grid: BlockGrid::default(),
            paddle,
            powerups: PowerUps::default(),
            spawn: SpawnSystem::new(&tuning.spawn),
            time: WorldTime::new(tuning.normal_time_scale),
            alternate_palette: false,
            combo: 0,
            max_combo: 0,
            frame: 0,
            events: Vec::with_capacity(16),
            tuning,
        };
        state.start_level(1);
        log::info!("New game (seed {})", seed);
        state
    }

    /// Start over from level 1 with fresh lives and score
    ///
    /// The RNG keeps running so a reset mid-session stays reproducible from
    /// the starting seed.
    pub fn reset(&mut self) {
        self.reset_all_effects();
        self.paddle = Paddle::new(
            self.screen.x,
            self.screen.y,
            LevelConfig::for_level(1).paddle_width,
            self.tuning.starting_lives,
        );
        self.spawn = SpawnSystem::new(&self.tuning.spawn);
        self.time = WorldTime::new(self.tuning.normal_time_scale);
        self.max_combo = 0;
        self.frame = 0;
        self.events.clear();
        self.start_level(1);
        log::info!("Game reset");
    }

    /// Build the blocks, ball and paddle for `level`, keeping lives and score
    pub fn start_level(&mut self, level: u32) {
        self.reset_all_effects();

        let cfg = LevelConfig::for_level(level);
        self.level = cfg;

        self.paddle.base_width = cfg.paddle_width;
        self.paddle.width = cfg.paddle_width;
        self.paddle.clamp_to_screen(self.screen.x);

        self.ball = Ball::new(Vec2::ZERO, cfg.min_ball_speed, cfg.max_ball_speed);
        self.ball.rest_on(self.paddle.center_x(), self.paddle.pos.y);
        self.ball.trail.reset(self.ball.pos);

        self.grid = BlockGrid::build(self.screen.x, self.screen.y, cfg.rows, cfg.columns, self.alternate_palette);
        self.combo = 0;
        self.phase = GamePhase::Playing;

        log::info!(
            "Level {}: {}x{} blocks, ball speed {:.0}-{:.0}, paddle {:.0}px",
            cfg.level,
            cfg.rows,
            cfg.columns,
            cfg.min_ball_speed,
            cfg.max_ball_speed,
            cfg.paddle_width
        );
    }

    /// Bank the level bonus and move on; only valid after a clear
    pub fn advance_level(&mut self) -> Option<u64> {
        if self.phase != GamePhase::LevelComplete {
            return None;
        }
        let bonus = level_bonus(self.level.level, self.paddle.score);
        self.paddle.score += bonus;
        self.start_level(self.level.level + 1);
        Some(bonus)
    }

    /// Revert all effects and free every power-up slot
    pub fn reset_all_effects(&mut self) {
        let mut targets = EffectTargets {
            ball: &mut self.ball,
            paddle: &mut self.paddle,
            grid: &mut self.grid,
            time: &mut self.time,
            alternate_palette: &mut self.alternate_palette,
        };
        self.powerups.reset_all(&mut targets);
    }

    /// Ball display colour from the highest-priority active effect
    pub fn active_powerup_color(&self) -> Rgba {
        self.powerups.active_color(palette::BALL)
    }

    /// Where the ball sits before it is shot
    pub fn launch_point(&self) -> Vec2 {
        Vec2::new(self.paddle.center_x(), self.paddle.pos.y - self.ball.radius)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
