//! 2D vector helpers
//!
//! Thin, side-effect free wrappers over `glam::Vec2`. The one behavioural
//! difference from glam is `normalize`: a zero-length vector comes back
//! unchanged instead of turning into NaN.

use glam::Vec2;

/// Below this length a vector is treated as zero
pub const EPSILON: f32 = 1e-6;

#[inline]
pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

#[inline]
pub fn subtract(a: Vec2, b: Vec2) -> Vec2 {
    a - b
}

#[inline]
pub fn scale(v: Vec2, s: f32) -> Vec2 {
    v * s
}

#[inline]
pub fn dot(a: Vec2, b: Vec2) -> f32 {
    a.x * b.x + a.y * b.y
}

#[inline]
pub fn length(v: Vec2) -> f32 {
    dot(v, v).sqrt()
}

/// Unit vector in the direction of `v`, or `v` itself if it has no length
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = length(v);
    if len > EPSILON { v / len } else { v }
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    length(a - b)
}

/// Angle from the positive x-axis, in (-π, π]
#[inline]
pub fn angle(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Reflect `v` off a surface with unit normal `n`: v - 2(v·n)n
#[inline]
pub fn reflect(v: Vec2, n: Vec2) -> Vec2 {
    v - 2.0 * dot(v, n) * n
}

/// Rotate counter-clockwise by `theta` radians
#[inline]
pub fn rotate(v: Vec2, theta: f32) -> Vec2 {
    let (sin, cos) = theta.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[inline]
pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Rescale `v` so its length lies in `[min, max]`
pub fn clamp_length(v: Vec2, min: f32, max: f32) -> Vec2 {
    let len = length(v);
    if len < min {
        normalize(v) * min
    } else if len > max {
        normalize(v) * max
    } else {
        v
    }
}
