//! 2-Link Analytical Inverse Kinematics
//!
//! Law-of-cosines solvers for the robot arm. `ArmIK` is the planar arm drawn
//! in pixel space; `ArmIK3D` adds a base yaw and works on the radial/height
//! plane of the scene arm. Both degrade to "point straight at the target"
//! instead of failing when the target is out of reach.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use super::geometry::clamped_acos;

/// Margin kept below full extension by the 3D solver
pub const REACH_EPSILON: f64 = 0.01;

/// Shoulder and elbow angles of the planar arm (radians)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanarAngles {
    /// Upper arm heading, measured from +x
    pub theta1: f64,
    /// Elbow bend relative to the upper arm (0 = straight)
    pub theta2: f64,
}

/// Joint angles of the scene arm (radians)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmAngles {
    /// Yaw about +y, 0 facing +z
    pub base: f64,
    /// Upper arm pitch away from vertical
    pub shoulder: f64,
    /// Forearm pitch relative to the upper arm
    pub elbow: f64,
}

/// Solve the planar arm for `target` with the shoulder at `base`
///
/// Free-function form of [`ArmIK::solve`].
pub fn solve_ik(target: DVec2, base: DVec2, l1: f64, l2: f64) -> PlanarAngles {
    ArmIK::new(l1, l2).solve(base, target)
}

/// Planar 2-link solver
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmIK {
    /// Shoulder to elbow
    upper_arm: f64,
    /// Elbow to wrist
    forearm: f64,
}

impl ArmIK {
    pub fn new(upper_arm: f64, forearm: f64) -> Self {
        Self { upper_arm, forearm }
    }

    pub fn max_reach(&self) -> f64 {
        self.upper_arm + self.forearm
    }

    /// Angles that put the wrist on `target`
    ///
    /// Out of reach: the arm points straight at the target, fully extended.
    pub fn solve(&self, base: DVec2, target: DVec2) -> PlanarAngles {
        let (l1, l2) = (self.upper_arm, self.forearm);

        let dx = target.x - base.x;
        let dy = target.y - base.y;
        let dist_sq = dx * dx + dy * dy;

        if dist_sq.sqrt() > l1 + l2 {
            return PlanarAngles {
                theta1: dy.atan2(dx),
                theta2: 0.0,
            };
        }

        let cos_theta2 = (dist_sq - l1 * l1 - l2 * l2) / (2.0 * l1 * l2);
        let theta2 = clamped_acos(cos_theta2);

        let k1 = l1 + l2 * theta2.cos();
        let k2 = l2 * theta2.sin();
        let theta1 = dy.atan2(dx) - k2.atan2(k1);

        PlanarAngles { theta1, theta2 }
    }

    /// Elbow and wrist positions for the given angles
    pub fn forward(&self, base: DVec2, angles: PlanarAngles) -> (DVec2, DVec2) {
        let elbow = base + self.upper_arm * DVec2::from_angle(angles.theta1);
        let wrist = elbow + self.forearm * DVec2::from_angle(angles.theta1 + angles.theta2);
        (elbow, wrist)
    }
}

/// Scene arm solver: base yaw plus a 2-link chain in the vertical plane
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmIK3D {
    upper_arm: f64,
    forearm: f64,
}

impl ArmIK3D {
    pub fn new(upper_arm: f64, forearm: f64) -> Self {
        Self { upper_arm, forearm }
    }

    /// Farthest distance the solver will try to reach
    pub fn max_reach(&self) -> f64 {
        self.upper_arm + self.forearm - REACH_EPSILON
    }

    /// Angles for a target given relative to `pivot`
    ///
    /// Reach is clamped just below full extension so the elbow never sits
    /// on the straight-arm singularity.
    pub fn solve(&self, pivot: DVec3, target: DVec3) -> ArmAngles {
        let (l1, l2) = (self.upper_arm, self.forearm);
        let local = target - pivot;

        let base = local.x.atan2(local.z);
        let radial = (local.x * local.x + local.z * local.z).sqrt();
        let dist = (radial * radial + local.y * local.y).sqrt();
        let reach = dist.min(self.max_reach()).max(REACH_EPSILON);

        let theta2 = clamped_acos((reach * reach - l1 * l1 - l2 * l2) / (2.0 * l1 * l2));

        let alpha = local.y.atan2(radial);
        let beta = clamped_acos((l1 * l1 + reach * reach - l2 * l2) / (2.0 * l1 * reach));
        let theta1 = alpha + beta;

        ArmAngles {
            base,
            shoulder: FRAC_PI_2 - theta1,
            elbow: theta2,
        }
    }

    /// Elbow and wrist positions for the given angles
    pub fn forward(&self, pivot: DVec3, angles: ArmAngles) -> (DVec3, DVec3) {
        let (sin_b, cos_b) = angles.base.sin_cos();
        let heading = |pitch: f64| {
            let (sin_p, cos_p) = pitch.sin_cos();
            DVec3::new(sin_p * sin_b, cos_p, sin_p * cos_b)
        };

        let elbow = pivot + self.upper_arm * heading(angles.shoulder);
        let wrist = elbow + self.forearm * heading(angles.shoulder + angles.elbow);
        (elbow, wrist)
    }
}
