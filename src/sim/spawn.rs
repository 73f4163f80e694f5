//! Power-up spawn odds
//!
//! The chance of a drop grows with combo and score, is capped, and is gated by
//! a cooldown so that long combos do not flood the screen.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::SpawnTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnSystem {
    pub base_chance: f32,
    pub combo_coefficient: f32,
    pub score_coefficient: f32,
    pub max_chance: f32,
    /// Seconds (scaled) left before the next roll is allowed
    pub cooldown_timer: f32,
    pub cooldown_duration: f32,
    /// Chance computed by the most recent roll
    pub current_chance: f32,
}

impl SpawnSystem {
    pub fn new(tuning: &SpawnTuning) -> Self {
        Self {
            base_chance: tuning.base_chance,
            combo_coefficient: tuning.combo_coefficient,
            score_coefficient: tuning.score_coefficient,
            max_chance: tuning.max_chance,
            cooldown_timer: 0.0,
            cooldown_duration: tuning.cooldown,
            current_chance: 0.0,
        }
    }

    /// Capped spawn chance for the given combo and score
    pub fn chance(&self, combo: u32, score: u64) -> f32 {
        let combo_bonus = combo as f32 * self.combo_coefficient;
        let score_bonus = (score as f32 / 1000.0) * self.score_coefficient;
        (self.base_chance + combo_bonus + score_bonus).min(self.max_chance)
    }

    /// Let the cooldown run down on a frame with no spawn attempt
    ///
    /// Saturates at zero.
    pub fn advance(&mut self, dt: f32) {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
    }

    /// Decay the cooldown by `dt` and, if it has elapsed, roll for a spawn
    ///
    /// While the cooldown is still running no roll is made. A successful roll
    /// restarts the cooldown.
    pub fn check_spawn<R: Rng>(&mut self, combo: u32, score: u64, dt: f32, rng: &mut R) -> bool {
        self.advance(dt);
        if self.cooldown_timer > 0.0 {
            return false;
        }

        self.current_chance = self.chance(combo, score);
        let roll: f32 = rng.random();
        if roll < self.current_chance {
            self.cooldown_timer = self.cooldown_duration;
            log::debug!("Power-up spawn roll {:.3} < {:.3}", roll, self.current_chance);
            true
        } else {
            false
        }
    }
}
