//! Ball kinematics
//!
//! Integration, wall/ceiling bounces and the trajectory clamp that keeps the
//! ball from settling into near-horizontal or near-vertical loops.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::palette::{self, Rgba};
use super::vector;
use crate::consts::*;

/// Number of past positions kept for the trail
pub const TRAIL_LENGTH: usize = 10;

/// Fixed-size ring buffer of recent ball positions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    positions: [Vec2; TRAIL_LENGTH],
    /// Slot the next position is written to
    head: usize,
}

impl Trail {
    pub fn new(pos: Vec2) -> Self {
        Self {
            positions: [pos; TRAIL_LENGTH],
            head: 0,
        }
    }

    /// Overwrite the oldest entry
    pub fn push(&mut self, pos: Vec2) {
        self.positions[self.head] = pos;
        self.head = (self.head + 1) % TRAIL_LENGTH;
    }

    pub fn reset(&mut self, pos: Vec2) {
        self.positions = [pos; TRAIL_LENGTH];
        self.head = 0;
    }

    /// Positions from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        (1..=TRAIL_LENGTH).map(move |i| self.positions[(self.head + TRAIL_LENGTH - i) % TRAIL_LENGTH])
    }

    pub fn newest(&self) -> Vec2 {
        self.positions[(self.head + TRAIL_LENGTH - 1) % TRAIL_LENGTH]
    }
}

/// Held direction at the moment of a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lean {
    #[default]
    None,
    Left,
    Right,
}

/// Which bounds the ball bounced off during an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallStep {
    pub left_wall: bool,
    pub right_wall: bool,
    pub ceiling: bool,
}

impl BallStep {
    pub fn bounced(&self) -> bool {
        self.left_wall || self.right_wall || self.ceiling
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Unit direction of travel (screen space, +y is down)
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    /// Radius with no effects applied
    pub base_radius: f32,
    pub current_min_speed: f32,
    pub current_max_speed: f32,
    /// False while resting on the paddle
    pub active: bool,
    pub trail: Trail,
    /// Passes through blocks, damaging them without bouncing
    pub is_ghost: bool,
    pub damage_multiplier: i32,
    /// Display colour, derived from active effects each frame
    pub color: Rgba,
}

impl Ball {
    pub fn new(pos: Vec2, min_speed: f32, max_speed: f32) -> Self {
        Self {
            pos,
            dir: Vec2::ZERO,
            speed: min_speed,
            radius: BALL_RADIUS,
            base_radius: BALL_RADIUS,
            current_min_speed: min_speed,
            current_max_speed: max_speed,
            active: false,
            trail: Trail::new(pos),
            is_ghost: false,
            damage_multiplier: 1,
            color: palette::BALL,
        }
    }

    /// Advance one frame and bounce off the side walls and ceiling
    ///
    /// There is no floor: falling past the bottom is a miss for the caller.
    pub fn update(&mut self, dt: f32, screen_width: f32, _screen_height: f32) -> BallStep {
        let mut step = BallStep::default();
        if !self.active {
            return step;
        }

        self.trail.push(self.pos);
        self.pos += self.dir * self.speed * dt;

        if self.pos.x - self.radius <= 0.0 {
            self.pos.x = self.radius;
            self.dir.x = self.dir.x.abs();
            self.bounce();
            step.left_wall = true;
        } else if self.pos.x + self.radius >= screen_width {
            self.pos.x = screen_width - self.radius;
            self.dir.x = -self.dir.x.abs();
            self.bounce();
            step.right_wall = true;
        }

        if self.pos.y - self.radius <= 0.0 {
            self.pos.y = self.radius;
            self.dir.y = self.dir.y.abs();
            self.bounce();
            step.ceiling = true;
        }

        step
    }

    /// Post-bounce fixups: restore direction invariants and speed up
    pub fn bounce(&mut self) {
        self.adjust_direction();
        self.set_speed(self.speed * BOUNCE_SPEED_FACTOR);
    }

    pub fn adjust_direction(&mut self) {
        self.dir = adjust_direction(self.dir);
    }

    /// Set speed, clamped to the current level's range
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(self.current_min_speed, self.current_max_speed);
    }

    /// Launch from `start`; ignored while the ball is already in play
    pub fn shoot<R: Rng>(&mut self, start: Vec2, lean: Lean, rng: &mut R) {
        if self.active {
            return;
        }

        let x = match lean {
            Lean::Left => -SHOOT_LEAN,
            Lean::Right => SHOOT_LEAN,
            Lean::None => rng.random_range(-SHOOT_JITTER..=SHOOT_JITTER) as f32 / 100.0,
        };

        self.speed = self.current_min_speed;
        self.pos = start;
        self.trail.reset(start);
        self.dir = vector::normalize(Vec2::new(x, -1.0));
        self.active = true;
    }

    /// Park the ball above the paddle
    pub fn rest_on(&mut self, paddle_center_x: f32, paddle_top: f32) {
        self.pos = Vec2::new(paddle_center_x, paddle_top - self.radius);
    }

    /// True once the ball has dropped past the bottom edge
    pub fn is_lost(&self, screen_height: f32) -> bool {
        self.active && self.pos.y > screen_height
    }
}

/// Enforce minimum horizontal and vertical components, then re-normalise
///
/// A zero component counts as positive.
pub fn adjust_direction(dir: Vec2) -> Vec2 {
    let mut d = dir;
    if d.y.abs() < MIN_VERTICAL {
        d.y = if d.y >= 0.0 { MIN_VERTICAL } else { -MIN_VERTICAL };
    }
    if d.x.abs() < MIN_HORIZONTAL {
        d.x = if d.x >= 0.0 { MIN_HORIZONTAL } else { -MIN_HORIZONTAL };
    }
    vector::normalize(d)
}
