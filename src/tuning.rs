//! Data-driven game balance
//!
//! Every gameplay constant lives here so a session can be reproduced (or
//! rebalanced) from a JSON override without touching the simulation code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration for the player and falling objects (units/s²)
    pub gravity: f32,
    /// Horizontal player speed while grounded (units/s)
    pub player_speed: f32,
    /// Upward impulse applied on jump (units/s)
    pub jump_force: f32,
    /// Horizontal speed multiplier while airborne
    pub airborne_speed_multiplier: f32,

    /// HP restored by a potion
    pub potion_heal: u8,
    /// Shield duration (seconds)
    pub shield_duration: f32,
    /// Slow duration (seconds)
    pub slow_duration: f32,
    /// Falling object time scale while slow is active
    pub slow_coefficient: f32,

    /// Falling object spawn intervals, consumed in order (seconds)
    pub spawn_intervals: Vec<f32>,
    /// Interval used once the table is exhausted (seconds)
    pub tail_interval: f32,
    /// Batch size of the very first spawn
    pub initial_batch: u32,
    /// Intervals longer than this spawn two objects per batch
    pub double_batch_threshold: f32,
    /// Live falling object cap; excess spawns are dropped
    pub max_falling_objects: usize,

    /// Earliest bonus delay after the previous one (seconds)
    pub bonus_delay_min: f32,
    /// Latest bonus delay, exclusive (seconds)
    pub bonus_delay_max: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 490.0,
            player_speed: 250.0,
            jump_force: 200.0,
            airborne_speed_multiplier: 1.4,

            potion_heal: 15,
            shield_duration: 10.0,
            slow_duration: 5.0,
            slow_coefficient: 0.6,

            spawn_intervals: vec![
                0.0, 3.0, 2.8, 2.6, 2.4, 2.2, 2.0, 1.8, 1.6, 1.4, 1.2, 1.0,
            ],
            tail_interval: 0.2,
            initial_batch: 2,
            double_batch_threshold: 1.0,
            max_falling_objects: 1000,

            bonus_delay_min: 25.0,
            bonus_delay_max: 80.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });

        // Out-of-range JSON literals deserialize to `inf`
        let scalars = [
            ("gravity", self.gravity),
            ("player_speed", self.player_speed),
            ("jump_force", self.jump_force),
            ("airborne_speed_multiplier", self.airborne_speed_multiplier),
            ("shield_duration", self.shield_duration),
            ("slow_duration", self.slow_duration),
            ("slow_coefficient", self.slow_coefficient),
            ("tail_interval", self.tail_interval),
            ("double_batch_threshold", self.double_batch_threshold),
            ("bonus_delay_min", self.bonus_delay_min),
            ("bonus_delay_max", self.bonus_delay_max),
        ];
        if let Some((field, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(*field, "must be finite");
        }
        if self.spawn_intervals.iter().any(|i| !i.is_finite()) {
            return invalid("spawn_intervals", "must be finite");
        }

        if !(self.gravity > 0.0) {
            return invalid("gravity", "must be positive");
        }
        if !(self.player_speed >= 0.0) {
            return invalid("player_speed", "must not be negative");
        }
        if !(self.jump_force >= 0.0) {
            return invalid("jump_force", "must not be negative");
        }
        if self.airborne_speed_multiplier < 0.0 {
            return invalid("airborne_speed_multiplier", "must not be negative");
        }
        if self.shield_duration < 0.0 || self.slow_duration < 0.0 {
            return invalid("shield_duration", "effect durations must not be negative");
        }
        if !(self.slow_coefficient > 0.0 && self.slow_coefficient <= 1.0) {
            return invalid("slow_coefficient", "must be in (0, 1]");
        }
        if self.spawn_intervals.is_empty() {
            return invalid("spawn_intervals", "must not be empty");
        }
        if self.spawn_intervals.iter().any(|i| !(*i >= 0.0)) {
            return invalid("spawn_intervals", "must not contain negative values");
        }
        if !(self.tail_interval > 0.0) {
            return invalid("tail_interval", "must be positive");
        }
        if !(self.bonus_delay_min >= 0.0 && self.bonus_delay_min < self.bonus_delay_max) {
            return invalid("bonus_delay_min", "must be non-negative and below bonus_delay_max");
        }
        if self.max_falling_objects == 0 {
            return invalid("max_falling_objects", "must be at least 1");
        }
        Ok(())
    }

    /// Horizontal speed while airborne
    pub fn airborne_speed(&self) -> f32 {
        self.player_speed * self.airborne_speed_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.spawn_intervals.len(), 12);
        assert!((tuning.airborne_speed() - 350.0).abs() < 0.001);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 980.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 980.0);
        assert_eq!(tuning.player_speed, 250.0);
        assert_eq!(tuning.max_falling_objects, 1000);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = Tuning::from_json(r#"{ "gravity": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "gravity", .. }));

        let err = Tuning::from_json(r#"{ "spawn_intervals": [] }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "spawn_intervals", .. }));

        let err =
            Tuning::from_json(r#"{ "bonus_delay_min": 90.0, "bonus_delay_max": 80.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "bonus_delay_min", .. }));
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = Tuning::from_json(r#"{ "bonus_delay_max": 1e39 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "bonus_delay_max", .. }));

        let err = Tuning::from_json(r#"{ "gravity": 1e39 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "gravity", .. }));

        let err = Tuning::from_json(r#"{ "spawn_intervals": [0.0, 1e39] }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "spawn_intervals", .. }));

        let tuning = Tuning {
            airborne_speed_multiplier: f32::NAN,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "airborne_speed_multiplier", .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ gravity"),
            Err(TuningError::Parse(_))
        ));
    }
}
