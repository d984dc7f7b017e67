//! Hand velocity from consecutive target samples
//!
//! The throw velocity is the displacement of the mapped target between the
//! last two ticks. No averaging and no dead zone: a flick has to survive
//! intact into the release.

use glam::DVec3;

/// Remembers the previous target sample
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VelocityTracker {
    previous: Option<DVec3>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this tick's target and return the displacement since the last
    /// one
    ///
    /// Zero when either sample is missing. A missing sample also clears the
    /// history, so the first tick after the hand reappears reports zero.
    pub fn update(&mut self, current: Option<DVec3>) -> DVec3 {
        let velocity = match (current, self.previous) {
            (Some(now), Some(before)) => now - before,
            _ => DVec3::ZERO,
        };
        self.previous = current;
        velocity
    }

    /// Clear history (world reset)
    pub fn clear(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_zero() {
        let mut tracker = VelocityTracker::new();
        assert_eq!(tracker.update(Some(DVec3::new(3.0, 4.0, 0.0))), DVec3::ZERO);
    }

    #[test]
    fn test_displacement_between_samples() {
        let mut tracker = VelocityTracker::new();
        tracker.update(Some(DVec3::new(0.0, 100.0, 0.0)));
        let v = tracker.update(Some(DVec3::new(10.0, 100.0, 0.0)));
        assert_eq!(v, DVec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_hand_loss_resets_history() {
        let mut tracker = VelocityTracker::new();
        tracker.update(Some(DVec3::new(0.0, 0.0, 0.0)));
        assert_eq!(tracker.update(None), DVec3::ZERO);
        assert_eq!(tracker.update(Some(DVec3::new(50.0, 0.0, 0.0))), DVec3::ZERO);
    }
}
