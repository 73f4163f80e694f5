//! GPU-ready instance data
//!
//! Flattens a `GameState` into plain `#[repr(C)]` structs a renderer can
//! upload as-is with `bytemuck::cast_slice`. Nothing here draws.

use bytemuck::{Pod, Zeroable};

use crate::sim::ball::TRAIL_LENGTH;
use crate::sim::{GameState, Rgba};

/// Per-frame uniforms (must match shader)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameGlobals {
    pub resolution: [f32; 2],
    /// Scaled world seconds
    pub time: f32,
    pub time_scale: f32,
    pub rect_count: u32,
    pub circle_count: u32,
    pub trail_count: u32,
    /// 1 while Timewarp recolours the blocks
    pub alternate_palette: u32,
}

/// Filled axis-aligned rectangle (blocks, paddle)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    /// Top-left corner
    pub pos: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

/// Filled circle (ball, falling power-ups)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

/// One ghost of the ball trail; alpha fades from newest to oldest
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TrailPoint {
    pub pos: [f32; 2],
    pub radius: f32,
    pub alpha: f32,
}

impl RectInstance {
    fn new(pos: glam::Vec2, size: glam::Vec2, color: Rgba) -> Self {
        Self {
            pos: pos.to_array(),
            size: size.to_array(),
            color: color.to_f32(),
        }
    }
}

impl CircleInstance {
    fn new(center: glam::Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            center: center.to_array(),
            radius,
            _pad: 0.0,
            color: color.to_f32(),
        }
    }
}

/// Everything a renderer needs for one frame
///
/// Buffers are reused across frames; `collect` clears and refills them.
#[derive(Debug, Default)]
pub struct FrameInstances {
    pub globals: FrameGlobals,
    /// Live blocks, then the paddle last
    pub rects: Vec<RectInstance>,
    /// The ball first, then falling power-ups in slot order
    pub circles: Vec<CircleInstance>,
    pub trail: Vec<TrailPoint>,
}

impl Default for FrameGlobals {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl FrameInstances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `state` into instance buffers
    pub fn collect(&mut self, state: &GameState) {
        self.rects.clear();
        self.circles.clear();
        self.trail.clear();

        self.rects.extend(
            state
                .grid
                .iter_live()
                .filter(|b| b.active)
                .map(|b| RectInstance::new(b.rect.pos, b.rect.size, b.color)),
        );
        let paddle = state.paddle.rect();
        let paddle_color = if state.alternate_palette {
            crate::sim::palette::PADDLE_TIMEWARP
        } else {
            crate::sim::palette::PADDLE
        };
        self.rects
            .push(RectInstance::new(paddle.pos, paddle.size, paddle_color));

        let ball = &state.ball;
        self.circles
            .push(CircleInstance::new(ball.pos, ball.radius, ball.color));
        self.circles.extend(
            state
                .powerups
                .falling()
                .map(|p| CircleInstance::new(p.pos, p.radius, p.kind.color())),
        );

        if ball.active {
            self.trail
                .extend(ball.trail.iter().enumerate().map(|(i, pos)| {
                    let fade = 1.0 - i as f32 / TRAIL_LENGTH as f32;
                    TrailPoint {
                        pos: pos.to_array(),
                        radius: ball.radius * fade,
                        alpha: 0.5 * fade,
                    }
                }));
        }

        self.globals = FrameGlobals {
            resolution: state.screen.to_array(),
            time: state.time.elapsed,
            time_scale: state.time.scale,
            rect_count: self.rects.len() as u32,
            circle_count: self.circles.len() as u32,
            trail_count: self.trail.len() as u32,
            alternate_palette: u32::from(state.alternate_palette),
        };
    }

    pub fn rect_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rects)
    }

    pub fn circle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.circles)
    }

    pub fn trail_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.trail)
    }
}
