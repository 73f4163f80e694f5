//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-stepped, driven only by `tick`
//! - Seeded RNG only, carried in `GameState`
//! - Stable iteration order (row-major blocks, slot-ordered power-ups)
//! - No rendering or platform dependencies

pub mod ball;
pub mod block;
pub mod collision;
pub mod level;
pub mod paddle;
pub mod palette;
pub mod powerup;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod vector;

pub use ball::{Ball, BallStep, Lean, TRAIL_LENGTH, Trail};
pub use block::{Block, BlockGrid, GridHit, all_destroyed, block_dimensions};
pub use collision::{Aabb, CollisionResult, Side, ball_block_collision, circle_rect_overlap};
pub use level::{LevelConfig, level_bonus};
pub use paddle::{MAX_REFLECTION_ANGLE, Paddle, reflection_direction};
pub use palette::Rgba;
pub use powerup::{ActiveEffect, EffectTargets, PowerUp, PowerUpKind, PowerUpSlot, PowerUps};
pub use spawn::SpawnSystem;
pub use state::{GameEvent, GamePhase, GameState, WorldTime};
pub use tick::{TickInput, autoplay_input, block_score, tick};
