//! Simulation Clock
//!
//! A single frame counter. Everything time-dependent (formation animation,
//! rhythm phase, view rotation) is derived from it so nothing can drift.

use std::f32::consts::TAU;

/// Formation time advance per frame
pub const TIME_FACTOR_PER_FRAME: f32 = 0.01;

/// Camera orbit per frame, for the renderer
pub const VIEW_ROTATION_PER_FRAME: f32 = 0.005;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationClock {
    frame_count: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame and return the new frame number
    pub fn advance(&mut self) -> u64 {
        self.frame_count = self.frame_count.wrapping_add(1);
        self.frame_count
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Animation time fed to the formations
    pub fn time_factor(&self) -> f32 {
        self.frame_count as f32 * TIME_FACTOR_PER_FRAME
    }

    /// Slow orbit angle in [0, 2π)
    pub fn view_rotation(&self) -> f32 {
        let turns = self.frame_count as f64 * VIEW_ROTATION_PER_FRAME as f64;
        turns.rem_euclid(std::f64::consts::TAU) as f32 % TAU
    }

    /// Whether notes are evaluated on the current frame
    pub fn is_note_check(&self, interval: u64) -> bool {
        self.frame_count % interval.max(1) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_factor_follows_frames() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.time_factor(), 0.0);
        for _ in 0..100 {
            clock.advance();
        }
        assert_eq!(clock.frame_count(), 100);
        assert!((clock.time_factor() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_note_check_every_third_frame() {
        let mut clock = SimulationClock::new();
        let checks: Vec<bool> = (0..6)
            .map(|_| {
                clock.advance();
                clock.is_note_check(3)
            })
            .collect();
        assert_eq!(checks, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn test_view_rotation_wraps() {
        let mut clock = SimulationClock::new();
        for _ in 0..2000 {
            clock.advance();
        }
        let angle = clock.view_rotation();
        assert!((0.0..TAU).contains(&angle));
        assert!((angle - (10.0 - TAU)).abs() < 1e-4);
    }
}
