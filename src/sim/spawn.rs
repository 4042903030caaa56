//! Spawn scheduling
//!
//! Falling objects follow a fixed, steadily shortening interval table and then
//! settle into a constant trickle. Bonuses arrive at random, widely spaced
//! times. Both schedules are driven by session time, not wall-clock time.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Cursor into the falling-object interval table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    /// Index of the interval that produced `next_spawn_time`
    index: usize,
    next_spawn_time: f32,
    /// Objects to create when the next batch fires
    batch: u32,
}

impl SpawnSchedule {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            index: 0,
            next_spawn_time: tuning.spawn_intervals.first().copied().unwrap_or(0.0),
            batch: tuning.initial_batch,
        }
    }

    /// Returns the batch size if a batch is due at `elapsed`, then advances.
    ///
    /// Fires at most once per call; the next time is the previous scheduled
    /// time plus the interval, so late frames do not shift the curve.
    pub fn poll(&mut self, elapsed: f32, tuning: &Tuning) -> Option<u32> {
        if elapsed < self.next_spawn_time {
            return None;
        }
        let batch = self.batch;

        self.index += 1;
        let interval = match tuning.spawn_intervals.get(self.index) {
            Some(&interval) => {
                self.batch = if interval > tuning.double_batch_threshold { 2 } else { 1 };
                interval
            }
            None => {
                self.batch = 1;
                tuning.tail_interval
            }
        };
        self.next_spawn_time += interval;

        Some(batch)
    }

    pub fn next_spawn_time(&self) -> f32 {
        self.next_spawn_time
    }

    pub fn next_batch(&self) -> u32 {
        self.batch
    }

    /// True once the interval table is used up
    pub fn in_tail(&self, tuning: &Tuning) -> bool {
        self.index >= tuning.spawn_intervals.len()
    }
}

/// Random bonus timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusSchedule {
    next_bonus_time: f32,
}

impl BonusSchedule {
    /// First bonus lands a random delay after session start
    pub fn new(tuning: &Tuning, rng: &mut Pcg32) -> Self {
        Self {
            next_bonus_time: random_delay(tuning, rng),
        }
    }

    /// Returns true if a bonus is due; reschedules relative to `elapsed`
    pub fn poll(&mut self, elapsed: f32, tuning: &Tuning, rng: &mut Pcg32) -> bool {
        if elapsed < self.next_bonus_time {
            return false;
        }
        self.next_bonus_time = elapsed + random_delay(tuning, rng);
        true
    }

    pub fn next_bonus_time(&self) -> f32 {
        self.next_bonus_time
    }
}

fn random_delay(tuning: &Tuning, rng: &mut Pcg32) -> f32 {
    rng.random_range(tuning.bonus_delay_min..tuning.bonus_delay_max)
}
