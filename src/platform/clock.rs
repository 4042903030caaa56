//! Frame timing
//!
//! `FrameClock` turns raw millisecond timestamps into frame deltas;
//! `FixedStep` slices those deltas into fixed simulation steps.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Converts a monotonically increasing millisecond timestamp into frame deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    /// Seconds accumulated across all frames
    elapsed: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next timestamp (ms); returns the frame delta in seconds.
    ///
    /// The first frame yields one simulation step. Deltas are clamped to
    /// `MAX_FRAME_DT`; a timestamp that goes backwards yields zero.
    pub fn advance(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_timestamp {
            Some(last) => (((timestamp_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        if self.last_timestamp.is_none_or(|last| timestamp_ms >= last) {
            self.last_timestamp = Some(timestamp_ms);
        }
        self.elapsed += dt as f64;
        dt
    }

    /// Total seconds since the first frame
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Forget the previous timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }
}

/// Fixed timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    /// Add a frame delta; returns how many `SIM_DT` steps to run now
    pub fn steps(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Never carry more than one step of debt into the next frame
        self.accumulator = self.accumulator.min(SIM_DT);
        steps
    }

    pub fn clear(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_one_step() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(12_345.0), SIM_DT);
        let dt = clock.advance(12_345.0 + 16.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert_eq!(clock.advance(5_000.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_backwards_timestamp_is_zero() {
        let mut clock = FrameClock::new();
        clock.advance(1_000.0);
        assert_eq!(clock.advance(900.0), 0.0);
        // Still measured against the later timestamp
        let dt = clock.advance(1_010.0);
        assert!((dt - 0.010).abs() < 1e-6);
    }

    #[test]
    fn test_elapsed_accumulates() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        for i in 1..=10 {
            clock.advance(i as f64 * 100.0);
        }
        assert!((clock.elapsed() - (1.0 + SIM_DT as f64)).abs() < 1e-4);
    }

    #[test]
    fn test_fixed_step() {
        let mut step = FixedStep::default();
        assert_eq!(step.steps(SIM_DT * 0.5), 0);
        assert_eq!(step.steps(SIM_DT * 0.6), 1);
        assert_eq!(step.steps(MAX_FRAME_DT), 12);
        assert!(step.steps(10.0) <= MAX_SUBSTEPS);
    }
}
