//! Synthetic pilot used when no camera is available
//!
//! Traces a Lissajous figure over the playfield and pinches on a fixed
//! rhythm so objects get picked up and flung around without a hand.

use glam::DVec2;

use crate::physics::HandSignal;

/// Phase advance per second (0.02 every 16 ms)
pub const PHASE_RATE: f64 = 0.02 / 0.016;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DemoPilot {
    phase: f64,
}

impl DemoPilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, elapsed_seconds: f64) {
        self.phase += elapsed_seconds.max(0.0) * PHASE_RATE;
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Current reading in camera space (the mapping mirrors x like a live
    /// detector frame)
    pub fn signal(&self) -> HandSignal {
        let t = self.phase;
        let screen_x = 0.5 + t.sin() * 0.3;
        let y = 0.5 + (t * 1.5).cos() * 0.3;
        HandSignal::new(DVec2::new(1.0 - screen_x, y), (t * 3.0).sin() > 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_starts_centered_and_open() {
        let signal = DemoPilot::new().signal();
        let p = signal.position.unwrap();
        assert_abs_diff_eq!(p.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.8, epsilon = 1e-12);
        assert!(!signal.is_gripping);
    }

    #[test]
    fn test_stays_in_frame() {
        let mut pilot = DemoPilot::new();
        for _ in 0..2000 {
            pilot.advance(1.0 / 60.0);
            let p = pilot.signal().position.unwrap();
            assert!((0.19..=0.81).contains(&p.x));
            assert!((0.19..=0.81).contains(&p.y));
        }
    }

    #[test]
    fn test_grips_periodically() {
        let mut pilot = DemoPilot::new();
        let mut toggles = 0;
        let mut was = false;
        for _ in 0..600 {
            pilot.advance(1.0 / 60.0);
            let now = pilot.signal().is_gripping;
            if now != was {
                toggles += 1;
                was = now;
            }
        }
        assert!(toggles >= 2);
    }

    #[test]
    fn test_phase_rate() {
        let mut pilot = DemoPilot::new();
        pilot.advance(0.016);
        assert_abs_diff_eq!(pilot.phase(), 0.02, epsilon = 1e-12);
        pilot.advance(-1.0);
        assert_abs_diff_eq!(pilot.phase(), 0.02, epsilon = 1e-12);
    }
}
