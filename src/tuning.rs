//! Data-driven game balance
//!
//! Power-up odds, effect strengths and durations live here so they can be
//! tweaked from JSON without touching the simulation. Physics constants that
//! define the feel of the ball stay in [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::STARTING_LIVES;

/// Power-up spawn odds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Chance with no combo and no score
    pub base_chance: f32,
    /// Added per combo step
    pub combo_coefficient: f32,
    /// Added per 1000 points of score
    pub score_coefficient: f32,
    /// Hard cap on the final chance
    pub max_chance: f32,
    /// Seconds (scaled) between successful spawns
    pub cooldown: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_chance: 0.10,
            combo_coefficient: 0.05,
            score_coefficient: 0.10,
            max_chance: 0.50,
            cooldown: 1.0,
        }
    }
}

/// Per-effect strengths and durations (durations in scaled seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub extra_lives: u32,
    pub speed_multiplier: f32,
    pub speed_duration: f32,
    pub growth_multiplier: f32,
    pub growth_duration: f32,
    pub ghost_duration: f32,
    /// Fraction of normal time scale while Timewarp is active
    pub timewarp_scale: f32,
    pub timewarp_duration: f32,
    pub damage_multiplier: i32,
    pub damage_radius_multiplier: f32,
    pub damage_duration: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            extra_lives: 1,
            speed_multiplier: 1.5,
            speed_duration: 10.0,
            growth_multiplier: 1.5,
            growth_duration: 10.0,
            ghost_duration: 5.0,
            timewarp_scale: 0.5,
            timewarp_duration: 6.0,
            damage_multiplier: 2,
            damage_radius_multiplier: 1.5,
            damage_duration: 8.0,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub starting_lives: u32,
    /// Time scale when no Timewarp is active
    pub normal_time_scale: f32,
    pub spawn: SpawnTuning,
    pub effects: EffectTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            normal_time_scale: 1.0,
            spawn: SpawnTuning::default(),
            effects: EffectTuning::default(),
        }
    }
}

/// Why a tuning file was rejected
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON, or the wrong shape
    Parse(serde_json::Error),
    /// Parsed, but a value is out of range
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "tuning parse error: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl Tuning {
    /// Parse and validate a JSON balance sheet; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning: {} starting lives", tuning.starting_lives);
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.starting_lives == 0 {
            return invalid("starting_lives", "must be at least 1");
        }
        if !(self.normal_time_scale > 0.0) {
            return invalid("normal_time_scale", "must be positive");
        }

        let s = &self.spawn;
        if !(0.0..=1.0).contains(&s.max_chance) {
            return invalid("spawn.max_chance", "must be within 0..=1");
        }
        let coefficients = [s.base_chance, s.combo_coefficient, s.score_coefficient];
        if coefficients.iter().any(|c| !(*c >= 0.0)) {
            return invalid("spawn", "coefficients must be non-negative");
        }
        if !(s.cooldown >= 0.0) {
            return invalid("spawn.cooldown", "must be non-negative");
        }

        let e = &self.effects;
        if !(e.timewarp_scale > 0.0 && e.timewarp_scale <= 1.0) {
            return invalid("effects.timewarp_scale", "must be within (0, 1]");
        }
        if e.damage_multiplier < 1 {
            return invalid("effects.damage_multiplier", "must be at least 1");
        }
        if e.speed_multiplier <= 0.0 || e.growth_multiplier <= 0.0 || e.damage_radius_multiplier <= 0.0 {
            return invalid("effects", "multipliers must be positive");
        }
        let durations = [
            e.speed_duration,
            e.growth_duration,
            e.ghost_duration,
            e.timewarp_duration,
            e.damage_duration,
        ];
        if durations.iter().any(|d| !(*d > 0.0)) {
            return invalid("effects", "durations must be positive");
        }

        Ok(())
    }
}
