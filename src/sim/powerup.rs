//! Power-up slots and timed effects
//!
//! Every slot is in exactly one of three states:
//!
//! - `Free`: available for a new spawn
//! - `Falling`: dropping toward the paddle; freed if it leaves the screen
//! - `Active`: picked up, effect applied, counting down to expiry
//!
//! Effects are applied and reverted through a single [`apply`]/[`revert`]
//! pair. Reverting restores per-attribute baselines (`base_speed`,
//! `base_width`, `base_radius`, `normal_scale`) instead of undoing a delta, so
//! two effects touching the same attribute cannot drift it.
//!
//! Only one effect of each kind may be active at a time: picking up a second
//! copy while the first is still running discards the new one and leaves the
//! running timer untouched.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::block::BlockGrid;
use super::collision::circle_rect_overlap;
use super::paddle::Paddle;
use super::palette::{self, Rgba};
use super::state::{GameEvent, WorldTime};
use crate::consts::*;
use crate::tuning::EffectTuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PowerUpKind {
    Life,
    Speed,
    Growth,
    Ghost,
    Timewarp,
    Damage,
}

impl PowerUpKind {
    pub const COUNT: u8 = 6;

    pub const ALL: [PowerUpKind; Self::COUNT as usize] = [
        PowerUpKind::Life,
        PowerUpKind::Speed,
        PowerUpKind::Growth,
        PowerUpKind::Ghost,
        PowerUpKind::Timewarp,
        PowerUpKind::Damage,
    ];

    /// Decode a raw kind index; anything out of range is corrupt
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Life is applied on pickup and never enters the Active state
    pub fn is_instant(self) -> bool {
        self == PowerUpKind::Life
    }

    pub fn duration(self, tuning: &EffectTuning) -> f32 {
        match self {
            PowerUpKind::Life => 0.0,
            PowerUpKind::Speed => tuning.speed_duration,
            PowerUpKind::Growth => tuning.growth_duration,
            PowerUpKind::Ghost => tuning.ghost_duration,
            PowerUpKind::Timewarp => tuning.timewarp_duration,
            PowerUpKind::Damage => tuning.damage_duration,
        }
    }

    pub fn color(self) -> Rgba {
        match self {
            PowerUpKind::Life => palette::LIFE,
            PowerUpKind::Speed => palette::SPEED,
            PowerUpKind::Growth => palette::GROWTH,
            PowerUpKind::Ghost => palette::GHOST,
            PowerUpKind::Timewarp => palette::TIMEWARP,
            PowerUpKind::Damage => palette::DAMAGE,
        }
    }
}

/// A power-up dropping toward the paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
    /// Effect length once picked up
    pub duration: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, duration: f32) -> Self {
        Self {
            pos,
            vel: Vec2::new(0.0, POWERUP_FALL_SPEED),
            radius: POWERUP_RADIUS,
            kind,
            duration,
        }
    }
}

/// A picked-up effect counting down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub duration: f32,
    /// World time of pickup
    pub picked_up_at: f32,
    pub remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PowerUpSlot {
    #[default]
    Free,
    Falling(PowerUp),
    Active(ActiveEffect),
}

impl PowerUpSlot {
    pub fn is_free(&self) -> bool {
        matches!(self, PowerUpSlot::Free)
    }
}

/// Everything an effect may touch
pub struct EffectTargets<'a> {
    pub ball: &'a mut Ball,
    pub paddle: &'a mut Paddle,
    pub grid: &'a mut BlockGrid,
    pub time: &'a mut WorldTime,
    pub alternate_palette: &'a mut bool,
}

/// Turn an effect on
pub fn apply(kind: PowerUpKind, t: &mut EffectTargets<'_>, tuning: &EffectTuning) {
    match kind {
        PowerUpKind::Life => {
            t.paddle.lives += tuning.extra_lives;
        }
        PowerUpKind::Speed => {
            t.paddle.speed = t.paddle.base_speed * tuning.speed_multiplier;
        }
        PowerUpKind::Growth => {
            t.paddle.width = t.paddle.base_width * tuning.growth_multiplier;
        }
        PowerUpKind::Ghost => {
            t.ball.is_ghost = true;
        }
        PowerUpKind::Timewarp => {
            t.time.scale = t.time.normal_scale * tuning.timewarp_scale;
            *t.alternate_palette = true;
            t.grid.recolor(true);
        }
        PowerUpKind::Damage => {
            t.ball.damage_multiplier = tuning.damage_multiplier;
            t.ball.radius = t.ball.base_radius * tuning.damage_radius_multiplier;
        }
    }
}

/// Turn an effect off, restoring baselines
pub fn revert(kind: PowerUpKind, t: &mut EffectTargets<'_>) {
    match kind {
        PowerUpKind::Life => {}
        PowerUpKind::Speed => {
            t.paddle.speed = t.paddle.base_speed;
        }
        PowerUpKind::Growth => {
            t.paddle.width = t.paddle.base_width;
        }
        PowerUpKind::Ghost => {
            t.ball.is_ghost = false;
        }
        PowerUpKind::Timewarp => {
            t.time.scale = t.time.normal_scale;
            *t.alternate_palette = false;
            t.grid.recolor(false);
        }
        PowerUpKind::Damage => {
            t.ball.damage_multiplier = 1;
            t.ball.radius = t.ball.base_radius;
        }
    }
}

/// Fixed-capacity power-up slot arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUps {
    pub slots: [PowerUpSlot; POWERUP_SLOTS],
}

impl Default for PowerUps {
    fn default() -> Self {
        Self {
            slots: [PowerUpSlot::Free; POWERUP_SLOTS],
        }
    }
}

impl PowerUps {
    /// Drop a power-up into the first free slot
    ///
    /// Returns the slot index, or `None` if every slot is busy; the spawn is
    /// then simply lost.
    pub fn spawn(&mut self, pos: Vec2, kind: PowerUpKind, tuning: &EffectTuning) -> Option<usize> {
        let Some(index) = self.slots.iter().position(PowerUpSlot::is_free) else {
            log::warn!("No free power-up slot, dropping {:?}", kind);
            return None;
        };
        self.slots[index] = PowerUpSlot::Falling(PowerUp::new(pos, kind, kind.duration(tuning)));
        log::debug!("Spawned {:?} in slot {} at ({:.0}, {:.0})", kind, index, pos.x, pos.y);
        Some(index)
    }

    /// Spawn from a raw kind index, rejecting corrupt indices
    pub fn spawn_from_index(&mut self, pos: Vec2, index: u8, tuning: &EffectTuning) -> Option<(usize, PowerUpKind)> {
        let Some(kind) = PowerUpKind::from_index(index) else {
            log::warn!("Discarding power-up with corrupt kind index {}", index);
            return None;
        };
        self.spawn(pos, kind, tuning).map(|slot| (slot, kind))
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active_effects().any(|e| e.kind == kind)
    }

    /// Time left on an active effect
    pub fn remaining(&self, kind: PowerUpKind) -> Option<f32> {
        self.active_effects().find(|e| e.kind == kind).map(|e| e.remaining)
    }

    pub fn active_effects(&self) -> impl Iterator<Item = &ActiveEffect> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            PowerUpSlot::Active(effect) => Some(effect),
            _ => None,
        })
    }

    pub fn falling(&self) -> impl Iterator<Item = &PowerUp> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            PowerUpSlot::Falling(p) => Some(p),
            _ => None,
        })
    }

    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_free()).count()
    }

    /// Ball display colour: Ghost > Timewarp > Damage > `default`
    pub fn active_color(&self, default: Rgba) -> Rgba {
        [PowerUpKind::Ghost, PowerUpKind::Timewarp, PowerUpKind::Damage]
            .into_iter()
            .find(|kind| self.is_active(*kind))
            .map_or(default, PowerUpKind::color)
    }

    /// Advance one frame
    ///
    /// Expiries are processed before pickups so that a fresh copy caught on
    /// the frame the old one runs out is accepted. `dt` is the scaled frame
    /// delta and `now` the scaled world time after this frame.
    pub fn update(
        &mut self,
        dt: f32,
        now: f32,
        screen_height: f32,
        targets: &mut EffectTargets<'_>,
        tuning: &EffectTuning,
        events: &mut Vec<GameEvent>,
    ) {
        for slot in self.slots.iter_mut() {
            if let PowerUpSlot::Active(effect) = slot {
                effect.remaining = effect.duration - (now - effect.picked_up_at);
                if effect.remaining <= 0.0 {
                    let kind = effect.kind;
                    revert(kind, targets);
                    *slot = PowerUpSlot::Free;
                    log::debug!("{:?} expired", kind);
                    events.push(GameEvent::PowerUpExpired { kind });
                }
            }
        }

        for index in 0..self.slots.len() {
            let PowerUpSlot::Falling(mut p) = self.slots[index] else {
                continue;
            };
            p.pos += p.vel * dt;

            if circle_rect_overlap(p.pos, p.radius, &targets.paddle.rect()) {
                self.pick_up(index, p, now, targets, tuning, events);
            } else if p.pos.y - p.radius > screen_height {
                self.slots[index] = PowerUpSlot::Free;
                events.push(GameEvent::PowerUpMissed { kind: p.kind });
            } else {
                self.slots[index] = PowerUpSlot::Falling(p);
            }
        }
    }

    /// Falling -> Active (or straight to Free for instant and duplicate kinds)
    fn pick_up(
        &mut self,
        index: usize,
        p: PowerUp,
        now: f32,
        targets: &mut EffectTargets<'_>,
        tuning: &EffectTuning,
        events: &mut Vec<GameEvent>,
    ) {
        let kind = p.kind;
        if self.is_active(kind) {
            self.slots[index] = PowerUpSlot::Free;
            log::debug!("{:?} already active, discarding duplicate", kind);
            events.push(GameEvent::PowerUpDiscarded { kind });
            return;
        }

        apply(kind, targets, tuning);
        events.push(GameEvent::PowerUpCollected { kind });

        self.slots[index] = if kind.is_instant() {
            PowerUpSlot::Free
        } else {
            log::debug!("{:?} active for {:.1}s", kind, p.duration);
            PowerUpSlot::Active(ActiveEffect {
                kind,
                duration: p.duration,
                picked_up_at: now,
                remaining: p.duration,
            })
        };
    }

    /// Revert every running effect and free every slot
    pub fn reset_all(&mut self, targets: &mut EffectTargets<'_>) {
        for slot in self.slots.iter_mut() {
            if let PowerUpSlot::Active(effect) = slot {
                revert(effect.kind, targets);
            }
            *slot = PowerUpSlot::Free;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct World {
        ball: Ball,
        paddle: Paddle,
        grid: BlockGrid,
        time: WorldTime,
        alternate: bool,
        events: Vec<GameEvent>,
        tuning: EffectTuning,
        powerups: PowerUps,
    }

    impl World {
        fn new() -> Self {
            Self {
                ball: Ball::new(Vec2::new(960.0, 900.0), BALL_SPEED_MIN, BALL_SPEED_MAX),
                paddle: Paddle::new(SCREEN_WIDTH, SCREEN_HEIGHT, PADDLE_BASE_WIDTH, 3),
                grid: BlockGrid::build(SCREEN_WIDTH, SCREEN_HEIGHT, 3, 8, false),
                time: WorldTime::new(1.0),
                alternate: false,
                events: Vec::new(),
                tuning: EffectTuning::default(),
                powerups: PowerUps::default(),
            }
        }

        /// Drop a power-up right onto the paddle
        fn drop_on_paddle(&mut self, kind: PowerUpKind) -> usize {
            let pos = Vec2::new(self.paddle.center_x(), self.paddle.pos.y);
            self.powerups.spawn(pos, kind, &self.tuning).unwrap()
        }

        fn step(&mut self, dt: f32) {
            self.time.advance(dt);
            let mut targets = EffectTargets {
                ball: &mut self.ball,
                paddle: &mut self.paddle,
                grid: &mut self.grid,
                time: &mut self.time,
                alternate_palette: &mut self.alternate,
            };
            let now = targets.time.elapsed;
            self.powerups
                .update(dt, now, SCREEN_HEIGHT, &mut targets, &self.tuning, &mut self.events);
        }
    }

    #[test]
    fn test_from_index_rejects_corrupt() {
        assert_eq!(PowerUpKind::from_index(0), Some(PowerUpKind::Life));
        assert_eq!(PowerUpKind::from_index(5), Some(PowerUpKind::Damage));
        assert_eq!(PowerUpKind::from_index(PowerUpKind::COUNT), None);
        assert_eq!(PowerUpKind::from_index(255), None);
    }

    #[test]
    fn test_spawn_from_corrupt_index_leaves_slots_free() {
        let mut w = World::new();
        assert!(w.powerups.spawn_from_index(Vec2::ZERO, 42, &w.tuning).is_none());
        assert_eq!(w.powerups.in_use(), 0);
    }

    #[test]
    fn test_spawn_dropped_when_full() {
        let mut w = World::new();
        for _ in 0..POWERUP_SLOTS {
            assert!(w.powerups.spawn(Vec2::ZERO, PowerUpKind::Speed, &w.tuning).is_some());
        }
        assert!(w.powerups.spawn(Vec2::ZERO, PowerUpKind::Speed, &w.tuning).is_none());
        assert_eq!(w.powerups.in_use(), POWERUP_SLOTS);
    }

    #[test]
    fn test_falling_and_missed() {
        let mut w = World::new();
        // Far from the paddle horizontally
        w.powerups.spawn(Vec2::new(10.0, 100.0), PowerUpKind::Speed, &w.tuning);
        w.step(1.0);
        let p = *w.powerups.falling().next().unwrap();
        assert!((p.pos.y - 300.0).abs() < 1e-3);

        w.step(10.0);
        assert_eq!(w.powerups.in_use(), 0);
        assert_eq!(w.events.last(), Some(&GameEvent::PowerUpMissed { kind: PowerUpKind::Speed }));
    }

    #[test]
    fn test_life_is_instant() {
        let mut w = World::new();
        w.drop_on_paddle(PowerUpKind::Life);
        w.step(0.01);
        assert_eq!(w.paddle.lives, 4);
        assert_eq!(w.powerups.in_use(), 0);
        assert!(!w.powerups.is_active(PowerUpKind::Life));
    }

    #[test]
    fn test_growth_applies_and_expires() {
        let mut w = World::new();
        w.drop_on_paddle(PowerUpKind::Growth);
        w.step(0.01);
        assert!(w.powerups.is_active(PowerUpKind::Growth));
        assert_eq!(w.paddle.width, PADDLE_BASE_WIDTH * w.tuning.growth_multiplier);

        w.step(w.tuning.growth_duration / 2.0);
        let remaining = w.powerups.remaining(PowerUpKind::Growth).unwrap();
        assert!((remaining - w.tuning.growth_duration / 2.0).abs() < 1e-3);

        w.step(w.tuning.growth_duration);
        assert!(!w.powerups.is_active(PowerUpKind::Growth));
        assert_eq!(w.paddle.width, PADDLE_BASE_WIDTH);
        assert_eq!(w.powerups.in_use(), 0);
        assert!(w.events.contains(&GameEvent::PowerUpExpired { kind: PowerUpKind::Growth }));
    }

    #[test]
    fn test_same_kind_pickup_is_discarded() {
        let mut w = World::new();
        w.drop_on_paddle(PowerUpKind::Speed);
        w.step(0.01);
        w.step(2.0);
        let before = w.powerups.remaining(PowerUpKind::Speed).unwrap();

        w.drop_on_paddle(PowerUpKind::Speed);
        let mut targets = EffectTargets {
            ball: &mut w.ball,
            paddle: &mut w.paddle,
            grid: &mut w.grid,
            time: &mut w.time,
            alternate_palette: &mut w.alternate,
        };
        let now = targets.time.elapsed;
        w.powerups
            .update(0.0, now, SCREEN_HEIGHT, &mut targets, &w.tuning, &mut w.events);

        assert_eq!(w.powerups.active_effects().count(), 1);
        assert_eq!(w.powerups.in_use(), 1);
        assert_eq!(w.powerups.remaining(PowerUpKind::Speed).unwrap(), before);
        assert_eq!(w.paddle.speed, PADDLE_BASE_SPEED * w.tuning.speed_multiplier);
        assert_eq!(w.events.last(), Some(&GameEvent::PowerUpDiscarded { kind: PowerUpKind::Speed }));
    }

    #[test]
    fn test_different_kinds_stack() {
        let mut w = World::new();
        w.drop_on_paddle(PowerUpKind::Ghost);
        w.drop_on_paddle(PowerUpKind::Damage);
        w.step(0.01);
        assert!(w.ball.is_ghost);
        assert_eq!(w.ball.damage_multiplier, w.tuning.damage_multiplier);
        assert_eq!(w.ball.radius, BALL_RADIUS * w.tuning.damage_radius_multiplier);

        // Ghost runs out first; damage stays
        w.step(w.tuning.ghost_duration + 0.1);
        assert!(!w.ball.is_ghost);
        assert!(w.powerups.is_active(PowerUpKind::Damage));

        w.step(w.tuning.damage_duration);
        assert_eq!(w.ball.damage_multiplier, 1);
        assert_eq!(w.ball.radius, BALL_RADIUS);
    }

    #[test]
    fn test_timewarp_scales_time_and_palette() {
        let mut w = World::new();
        w.drop_on_paddle(PowerUpKind::Timewarp);
        w.step(0.01);
        assert_eq!(w.time.scale, w.tuning.timewarp_scale);
        assert!(w.alternate);
        assert_eq!(w.grid.cells[0][0].color, palette::block_color(3, true));

        w.step(w.tuning.timewarp_duration + 0.1);
        assert_eq!(w.time.scale, 1.0);
        assert!(!w.alternate);
        assert_eq!(w.grid.cells[0][0].color, palette::block_color(3, false));
    }

    #[test]
    fn test_color_priority() {
        let mut w = World::new();
        assert_eq!(w.powerups.active_color(palette::BALL), palette::BALL);

        w.drop_on_paddle(PowerUpKind::Damage);
        w.step(0.01);
        assert_eq!(w.powerups.active_color(palette::BALL), palette::DAMAGE);

        w.drop_on_paddle(PowerUpKind::Timewarp);
        w.step(0.01);
        assert_eq!(w.powerups.active_color(palette::BALL), palette::TIMEWARP);

        w.drop_on_paddle(PowerUpKind::Ghost);
        w.step(0.01);
        assert_eq!(w.powerups.active_color(palette::BALL), palette::GHOST);

        // Speed and growth never win colour priority
        w.drop_on_paddle(PowerUpKind::Speed);
        w.step(0.01);
        assert_eq!(w.powerups.active_color(palette::BALL), palette::GHOST);
    }

    #[test]
    fn test_reset_all_reverts() {
        let mut w = World::new();
        for kind in [PowerUpKind::Speed, PowerUpKind::Growth, PowerUpKind::Timewarp] {
            w.drop_on_paddle(kind);
        }
        w.step(0.01);
        w.powerups.spawn(Vec2::new(10.0, 10.0), PowerUpKind::Ghost, &w.tuning);

        let mut targets = EffectTargets {
            ball: &mut w.ball,
            paddle: &mut w.paddle,
            grid: &mut w.grid,
            time: &mut w.time,
            alternate_palette: &mut w.alternate,
        };
        w.powerups.reset_all(&mut targets);

        assert_eq!(w.powerups.in_use(), 0);
        assert_eq!(w.paddle.speed, PADDLE_BASE_SPEED);
        assert_eq!(w.paddle.width, PADDLE_BASE_WIDTH);
        assert_eq!(w.time.scale, 1.0);
        assert!(!w.alternate);
    }
}
