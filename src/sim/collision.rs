//! Collision detection for axis-aligned geometry
//!
//! Everything the ball can touch (blocks, paddle, power-up pickups) is an
//! axis-aligned rectangle in screen space (+y down). The ball is a circle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Grow by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            pos: self.pos - Vec2::splat(margin),
            size: self.size + Vec2::splat(margin * 2.0),
        }
    }

    /// Inclusive point test
    pub fn contains_point(&self, p: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Closest point on or inside the rectangle
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// Circle vs rectangle overlap (touching counts)
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Aabb) -> bool {
    let closest = rect.closest_point(center);
    (center - closest).length_squared() <= radius * radius
}

/// Face of a block the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Left/right hits reflect the horizontal component
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// True if travelling along `dir` already leads away from this face
    pub fn is_separating(self, dir: Vec2) -> bool {
        match self {
            Side::Left => dir.x < 0.0,
            Side::Right => dir.x > 0.0,
            Side::Top => dir.y < 0.0,
            Side::Bottom => dir.y > 0.0,
        }
    }
}

/// How far the ball's bounding box has pushed past each block edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Penetration {
    pub fn between(center: Vec2, radius: f32, rect: &Aabb) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Self {
            left: center.x + radius - min.x,
            right: max.x - (center.x - radius),
            top: center.y + radius - min.y,
            bottom: max.y - (center.y - radius),
        }
    }

    /// Side with the shallowest penetration; ties prefer left/right
    pub fn min_side(&self) -> Side {
        let mut side = Side::Left;
        let mut depth = self.left;
        for (s, d) in [
            (Side::Right, self.right),
            (Side::Top, self.top),
            (Side::Bottom, self.bottom),
        ] {
            if d < depth {
                side = s;
                depth = d;
            }
        }
        side
    }
}

/// Result of a ball/block check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Face that was struck (meaningful only if hit)
    pub side: Side,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            side: Side::Top,
        }
    }
}

/// Check a solid ball against a block
///
/// Contact is confirmed when the closest point on the block's rectangle,
/// grown by the ball radius, lies within one radius of the ball centre. The
/// struck side comes from the shallowest penetration against the block's
/// actual rectangle.
pub fn ball_block_collision(ball_pos: Vec2, ball_radius: f32, block: &Aabb) -> CollisionResult {
    let expanded = block.expand(ball_radius);
    if !circle_rect_overlap(ball_pos, ball_radius, &expanded) {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        side: Penetration::between(ball_pos, ball_radius, block).min_side(),
    }
}

/// Check a ghost ball against a block: centre inside the grown rectangle
pub fn ghost_block_overlap(ball_pos: Vec2, ball_radius: f32, block: &Aabb) -> bool {
    block.expand(ball_radius).contains_point(ball_pos)
}
