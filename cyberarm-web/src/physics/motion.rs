//! Free motion for objects nobody is holding
//!
//! Explicit Euler: gravity, exponential damping, integrate, then clamp into
//! the arena and bounce off whatever wall was crossed.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::geometry::Region;
use super::object::ManipulableObject;

/// Tuning for free motion, in the playfield's own units
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Acceleration per time unit squared
    pub gravity: DVec3,
    /// Fraction of velocity kept after one time unit
    pub damping: f64,
    /// Fraction of speed kept when bouncing off a wall
    pub restitution: f64,
    /// Region object centers are kept inside
    pub arena: Region,
    /// Radians of spin per unit of horizontal travel
    #[serde(default)]
    pub spin_rate: f64,
}

/// Advance one ungrabbed object by `dt`
pub fn integrate(obj: &mut ManipulableObject, config: &MotionConfig, dt: f64) {
    obj.velocity += config.gravity * dt;
    obj.velocity *= config.damping.powf(dt);
    obj.position += obj.velocity * dt;
    obj.rotation += obj.velocity.x * config.spin_rate * dt;

    for (axis, span) in config.arena.spans().iter().enumerate() {
        if let Some(min) = span.min {
            if obj.position[axis] < min {
                obj.position[axis] = min;
                obj.velocity[axis] *= -config.restitution;
            }
        }
        if let Some(max) = span.max {
            if obj.position[axis] > max {
                obj.position[axis] = max;
                obj.velocity[axis] *= -config.restitution;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::geometry::Span;
    use crate::physics::object::{ObjectSeed, Rgba, ShapeKind};
    use approx::assert_abs_diff_eq;

    /// 800x600 pixel field, y down
    fn planar() -> MotionConfig {
        MotionConfig {
            gravity: DVec3::new(0.0, 0.5, 0.0),
            damping: 0.98,
            restitution: 0.7,
            arena: Region::new(Span::new(20.0, 780.0), Span::at_most(560.0), Span::OPEN),
            spin_rate: 0.0,
        }
    }

    fn object_at(x: f64, y: f64) -> ManipulableObject {
        ManipulableObject::from_seed(
            0,
            &ObjectSeed {
                position: DVec3::new(x, y, 0.0),
                shape: ShapeKind::Ball,
                color: Rgba::from_hex(0x3B82F6),
            },
        )
    }

    #[test]
    fn test_single_frame_step() {
        let mut obj = object_at(300.0, 300.0);
        obj.velocity = DVec3::new(10.0, 0.0, 0.0);
        integrate(&mut obj, &planar(), 1.0);

        assert_abs_diff_eq!(obj.velocity.x, 9.8, epsilon = 1e-12);
        assert_abs_diff_eq!(obj.velocity.y, 0.49, epsilon = 1e-12);
        assert_abs_diff_eq!(obj.position.x, 309.8, epsilon = 1e-12);
        assert_abs_diff_eq!(obj.position.y, 300.49, epsilon = 1e-12);
    }

    #[test]
    fn test_floor_bounce() {
        let mut obj = object_at(300.0, 555.0);
        obj.velocity = DVec3::new(0.0, 20.0, 0.0);
        integrate(&mut obj, &planar(), 1.0);

        assert_eq!(obj.position.y, 560.0);
        assert!(obj.velocity.y < 0.0);
        assert_abs_diff_eq!(obj.velocity.y, -(20.5 * 0.98) * 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_wall_bounce() {
        let mut obj = object_at(25.0, 300.0);
        obj.velocity = DVec3::new(-20.0, 0.0, 0.0);
        integrate(&mut obj, &planar(), 1.0);

        assert_eq!(obj.position.x, 20.0);
        assert!(obj.velocity.x > 0.0);
    }

    #[test]
    fn test_settles_on_floor() {
        let mut obj = object_at(300.0, 100.0);
        let config = planar();
        for _ in 0..2000 {
            integrate(&mut obj, &config, 1.0);
        }
        assert!(obj.position.y <= 560.0);
        assert!(obj.position.y > 540.0);
        assert!(obj.velocity.y.abs() < 1.0);
    }

    #[test]
    fn test_no_ceiling_above_field() {
        let mut obj = object_at(300.0, -50.0);
        integrate(&mut obj, &planar(), 1.0);
        assert!(obj.position.y < 0.0);
    }

    #[test]
    fn test_fractional_dt_damping() {
        let config = MotionConfig {
            gravity: DVec3::ZERO,
            damping: 0.5,
            restitution: 0.2,
            arena: Region::default(),
            spin_rate: 0.0,
        };
        let mut obj = object_at(0.0, 0.0);
        obj.velocity = DVec3::new(4.0, 0.0, 0.0);
        integrate(&mut obj, &config, 0.5);
        assert_abs_diff_eq!(obj.velocity.x, 4.0 * 0.5f64.sqrt(), epsilon = 1e-12);
    }
}
