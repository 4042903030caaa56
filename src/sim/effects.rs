//! Power-up effect timers
//!
//! Shield blocks falling-object damage; slow scales falling-object motion.
//! Timers count down in seconds and switch themselves off at or below zero.

use serde::{Deserialize, Serialize};

/// A countdown that is either idle or running
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTimer {
    pub active: bool,
    /// Seconds remaining while active
    pub remaining: f32,
}

impl EffectTimer {
    /// (Re)start the timer; picking up a second one refreshes the duration
    pub fn start(&mut self, duration: f32) {
        self.active = true;
        self.remaining = duration;
    }

    /// Count down; returns true on the step the timer expires
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.active = false;
            self.remaining = 0.0;
            return true;
        }
        false
    }
}

/// Which timers ran out during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expired {
    pub shield: bool,
    pub slow: bool,
}

/// Active power-up effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield: EffectTimer,
    pub slow: EffectTimer,
    /// Falling-object time scale; 1.0 unless slow is active
    pub slow_coefficient: f32,
}

impl Default for ActiveEffects {
    fn default() -> Self {
        Self {
            shield: EffectTimer::default(),
            slow: EffectTimer::default(),
            slow_coefficient: 1.0,
        }
    }
}

impl ActiveEffects {
    pub fn update(&mut self, dt: f32) -> Expired {
        let shield = self.shield.tick(dt);
        let slow = self.slow.tick(dt);
        if slow {
            self.slow_coefficient = 1.0;
        }
        Expired { shield, slow }
    }

    pub fn activate_shield(&mut self, duration: f32) {
        self.shield.start(duration);
    }

    pub fn activate_slow(&mut self, duration: f32, coefficient: f32) {
        self.slow.start(duration);
        self.slow_coefficient = coefficient;
    }

    #[inline]
    pub fn shield_active(&self) -> bool {
        self.shield.active
    }

    #[inline]
    pub fn slow_active(&self) -> bool {
        self.slow.active
    }
}
