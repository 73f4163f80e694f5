//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use rand::Rng;

use super::ball::Lean;
use super::palette;
use super::powerup::{EffectTargets, PowerUpKind};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Dash while moving
    pub dash: bool,
    /// Launch the ball if it is resting on the paddle
    pub shoot: bool,
}

impl TickInput {
    /// Held direction at the moment of a shot
    pub fn lean(&self) -> Lean {
        match (self.move_left, self.move_right) {
            (true, false) => Lean::Left,
            (false, true) => Lean::Right,
            _ => Lean::None,
        }
    }
}

/// Advance the game state by one frame
///
/// `raw_dt` is wall-clock seconds; the world time scale is applied once here
/// and everything below sees the scaled delta.
pub fn tick(state: &mut GameState, input: &TickInput, raw_dt: f32) {
    state.events.clear();

    if state.phase != GamePhase::Playing {
        return;
    }

    state.frame += 1;
    let dt = state.time.scaled(raw_dt);
    state.time.advance(dt);

    let width = state.screen.x;
    let height = state.screen.y;

    state
        .paddle
        .move_by_intent(input.move_left, input.move_right, input.dash, dt, width);

    // Resting ball rides the paddle until shot
    if !state.ball.active {
        state.ball.rest_on(state.paddle.center_x(), state.paddle.pos.y);
        if input.shoot {
            let start = state.launch_point();
            state.ball.shoot(start, input.lean(), &mut state.rng);
            log::debug!("Ball shot from ({:.0}, {:.0})", start.x, start.y);
        }
    }

    if state.ball.update(dt, width, height).bounced() {
        state.events.push(GameEvent::WallBounce);
    }

    let hit = if state.ball.active {
        state
            .grid
            .resolve_ball(&mut state.ball, state.alternate_palette, &mut state.rng)
    } else {
        None
    };

    if let Some(hit) = hit {
        state.combo += 1;
        state.max_combo = state.max_combo.max(state.combo);
        state.paddle.score += block_score(state.combo);

        state.events.push(GameEvent::BlockHit {
            row: hit.row,
            column: hit.column,
        });
        if hit.destroyed {
            state.events.push(GameEvent::BlockDestroyed {
                row: hit.row,
                column: hit.column,
            });
        }
    }

    if state.paddle.reflect_ball(&mut state.ball) {
        state.events.push(GameEvent::PaddleHit);
    }

    // One spawn decision per frame: a roll on hit frames, cooldown decay otherwise
    match hit {
        Some(hit) => {
            if state
                .spawn
                .check_spawn(state.combo, state.paddle.score, dt, &mut state.rng)
            {
                let index = state.rng.random_range(0..PowerUpKind::COUNT);
                if let Some((_, kind)) = state
                    .powerups
                    .spawn_from_index(hit.center, index, &state.tuning.effects)
                {
                    state.events.push(GameEvent::PowerUpSpawned { kind });
                }
            }
        }
        None => state.spawn.advance(dt),
    }

    let now = state.time.elapsed;
    let mut targets = EffectTargets {
        ball: &mut state.ball,
        paddle: &mut state.paddle,
        grid: &mut state.grid,
        time: &mut state.time,
        alternate_palette: &mut state.alternate_palette,
    };
    state.powerups.update(
        dt,
        now,
        height,
        &mut targets,
        &state.tuning.effects,
        &mut state.events,
    );

    // Growth may have pushed the paddle past the right edge
    state.paddle.clamp_to_screen(width);
    state.ball.color = state.powerups.active_color(palette::BALL);

    if state.ball.is_lost(height) {
        state.ball.active = false;
        state.ball.rest_on(state.paddle.center_x(), state.paddle.pos.y);
        state.paddle.lives = state.paddle.lives.saturating_sub(1);
        state.combo = 0;
        state.events.push(GameEvent::BallLost);
        log::info!("Ball lost, {} lives left", state.paddle.lives);

        if state.paddle.lives == 0 {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver);
            log::info!(
                "Game over at level {} (score {}, max combo {})",
                state.level.level,
                state.paddle.score,
                state.max_combo
            );
            return;
        }
    }

    if state.grid.all_destroyed() {
        state.phase = GamePhase::LevelComplete;
        state.events.push(GameEvent::AllBlocksDestroyed);
        log::info!(
            "Level {} cleared (score {}, max combo {})",
            state.level.level,
            state.paddle.score,
            state.max_combo
        );
    }
}

/// Points for a block hit at the given (already incremented) combo
pub fn block_score(combo: u32) -> u64 {
    (BLOCK_BASE_SCORE as f32 * (1.0 + combo as f32 * COMBO_SCORE_STEP)) as u64
}

/// Simple paddle AI for demos and headless runs
///
/// Chases the ball while it is coming down; while it is heading up the paddle
/// is free to go after the lowest falling power-up.
pub fn autoplay_input(state: &GameState) -> TickInput {
    let ball = &state.ball;
    let center = state.paddle.center_x();

    let target = if !ball.active || ball.dir.y > 0.0 {
        ball.pos.x
    } else {
        state
            .powerups
            .falling()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map_or(ball.pos.x, |p| p.pos.x)
    };

    let dead_zone = state.paddle.width * 0.25;
    let offset = target - center;
    TickInput {
        move_left: offset < -dead_zone,
        move_right: offset > dead_zone,
        dash: offset.abs() > state.paddle.width,
        shoot: !ball.active,
    }
}
