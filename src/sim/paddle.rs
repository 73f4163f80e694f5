//! The player's paddle: movement and ball reflection

use std::f32::consts::FRAC_PI_4;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::{Aabb, circle_rect_overlap};
use super::vector;
use crate::consts::*;

/// Maximum deflection from vertical at the paddle's edges
pub const MAX_REFLECTION_ANGLE: f32 = FRAC_PI_4;

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    /// Width with no effects applied (shrinks with level)
    pub base_width: f32,
    pub height: f32,
    pub speed: f32,
    /// Speed with no effects applied
    pub base_speed: f32,
    pub lives: u32,
    pub score: u64,
    pub dashing: bool,
}

impl Paddle {
    /// Centred near the bottom of the screen
    pub fn new(screen_width: f32, screen_height: f32, base_width: f32, lives: u32) -> Self {
        Self {
            pos: Vec2::new(
                (screen_width - base_width) / 2.0,
                screen_height - PADDLE_BOTTOM_OFFSET,
            ),
            width: base_width,
            base_width,
            height: PADDLE_HEIGHT,
            speed: PADDLE_BASE_SPEED,
            base_speed: PADDLE_BASE_SPEED,
            lives,
            score: 0,
            dashing: false,
        }
    }

    pub fn rect(&self) -> Aabb {
        Aabb {
            pos: self.pos,
            size: Vec2::new(self.width, self.height),
        }
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Move from held intents, dashing if requested while moving
    pub fn move_by_intent(&mut self, left: bool, right: bool, dash: bool, dt: f32, screen_width: f32) {
        let direction = match (left, right) {
            (false, true) => 1.0,
            (true, false) => -1.0,
            _ => 0.0,
        };
        let moving = direction != 0.0;
        self.dashing = moving && dash;

        if moving {
            let boost = if self.dashing { DASH_BOOST } else { 1.0 };
            self.pos.x += direction * self.speed * boost * dt;
            self.clamp_to_screen(screen_width);
        }
    }

    /// Keep the whole paddle on screen
    pub fn clamp_to_screen(&mut self, screen_width: f32) {
        self.pos.x = self.pos.x.clamp(0.0, (screen_width - self.width).max(0.0));
    }

    /// Bounce the ball if it touches the paddle; true on contact
    pub fn reflect_ball(&self, ball: &mut Ball) -> bool {
        if !ball.active || !circle_rect_overlap(ball.pos, ball.radius, &self.rect()) {
            return false;
        }
        let hit = (ball.pos.x - self.center_x()) / (self.width / 2.0);
        ball.dir = reflection_direction(hit);
        true
    }
}

/// Launch direction for a normalised hit offset (-1 left edge, 1 right edge)
///
/// The vertical component is always negative, so the ball always leaves
/// upward regardless of where it struck.
pub fn reflection_direction(hit_position: f32) -> Vec2 {
    let angle = hit_position * MAX_REFLECTION_ANGLE;
    vector::normalize(Vec2::new(angle.sin(), -angle.cos().abs()))
}
