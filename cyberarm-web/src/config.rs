//! Game configuration
//!
//! Two presets mirror the two ways the game is played: a flat pixel canvas
//! with a 2-link arm rising from the bottom edge, and a scene with a yawing
//! arm and a bucket off to the side. Everything can be overridden from JS
//! with a JSON document of the same shape.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::physics::{
    CoordinateMapping, GoalConfig, GrabPolicy, InteractionConfig, MotionConfig, ObjectSeed, Region,
    Rgba, ShapeKind, Span,
};

/// Arm geometry and where it points when no hand is tracked
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArmConfig {
    Planar {
        base: DVec2,
        upper_arm: f64,
        forearm: f64,
        rest_target: DVec2,
    },
    Spatial {
        pivot: DVec3,
        upper_arm: f64,
        forearm: f64,
        rest_target: DVec3,
    },
}

impl ArmConfig {
    pub fn lengths(&self) -> (f64, f64) {
        match *self {
            ArmConfig::Planar { upper_arm, forearm, .. }
            | ArmConfig::Spatial { upper_arm, forearm, .. } => (upper_arm, forearm),
        }
    }
}

/// World rectangle shown by the built-in renderer (front view, z ignored)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl ViewRect {
    /// World point to clip space (-1..1, y up)
    pub fn to_clip(&self, p: DVec3) -> (f32, f32) {
        let x = (p.x - self.left) / (self.right - self.left) * 2.0 - 1.0;
        let y = (p.y - self.bottom) / (self.top - self.bottom) * 2.0 - 1.0;
        (x as f32, y as f32)
    }

    /// World length along x to clip-space length
    pub fn scale_x(&self, len: f64) -> f32 {
        (len / (self.right - self.left) * 2.0).abs() as f32
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub mapping: CoordinateMapping,
    pub arm: ArmConfig,
    pub interaction: InteractionConfig,
    pub motion: MotionConfig,
    pub goal: GoalConfig,
    pub objects: Vec<ObjectSeed>,
    /// Simulation time units per second of wall time
    pub time_scale: f64,
    /// Longest step a single tick may take, in simulation units
    pub max_step: f64,
    pub view: ViewRect,
}

impl GameConfig {
    /// Flat canvas of `width` x `height` pixels; time is counted in 60 Hz
    /// frames
    pub fn planar(width: f64, height: f64) -> Self {
        let bucket_x = width - 100.0;
        let bucket_y = height - 80.0;
        let bucket_w = 120.0;

        let seed = |x: f64, y: f64, shape: ShapeKind, hex: u32| ObjectSeed {
            position: DVec3::new(x, y, 0.0),
            shape,
            color: Rgba::from_hex(hex),
        };

        Self {
            mapping: CoordinateMapping::planar(width, height),
            arm: ArmConfig::Planar {
                base: DVec2::new(width / 2.0, height),
                upper_arm: height * 0.35,
                forearm: height * 0.3,
                rest_target: DVec2::new(width / 2.0, height / 2.0),
            },
            interaction: InteractionConfig {
                grab_radius: 60.0,
                throw_scale: 0.3 * 60.0,
                max_throw_speed: None,
                grip_offset: DVec3::ZERO,
                policy: GrabPolicy::AllInRadius,
            },
            motion: MotionConfig {
                gravity: DVec3::new(0.0, 0.5, 0.0),
                damping: 0.98,
                restitution: 0.7,
                arena: Region::new(
                    Span::new(20.0, width - 20.0),
                    Span::at_most(height - 40.0),
                    Span::OPEN,
                ),
                spin_rate: 1.0 / 25.0,
            },
            goal: GoalConfig {
                bucket: Region::new(
                    Span::new(bucket_x - bucket_w / 2.0, bucket_x + bucket_w / 2.0),
                    Span::at_least(bucket_y - 20.0),
                    Span::OPEN,
                ),
                spawn: Region::new(
                    Span::new(50.0, width - 150.0),
                    Span::new(-50.0, -50.0),
                    Span::new(0.0, 0.0),
                ),
                reward: 10,
            },
            objects: vec![
                seed(200.0, 300.0, ShapeKind::Cube, 0xF59E0B),
                seed(300.0, 300.0, ShapeKind::Ball, 0x3B82F6),
                seed(400.0, 300.0, ShapeKind::Cube, 0x10B981),
            ],
            time_scale: 60.0,
            max_step: 3.0,
            view: ViewRect { left: 0.0, right: width, top: 0.0, bottom: height },
        }
    }

    /// Scene units, y up, seconds as the time unit
    pub fn scene() -> Self {
        let bucket_center = DVec3::new(12.0, 0.0, 8.0);
        let bucket_half = 2.0;

        let seed = |x: f64, y: f64, z: f64, shape: ShapeKind, hex: u32| ObjectSeed {
            position: DVec3::new(x, y, z),
            shape,
            color: Rgba::from_hex(hex),
        };

        Self {
            mapping: CoordinateMapping::scene(),
            arm: ArmConfig::Spatial {
                pivot: DVec3::ZERO,
                upper_arm: 8.0,
                forearm: 8.0,
                rest_target: DVec3::new(0.0, 8.0, 8.0),
            },
            interaction: InteractionConfig {
                grab_radius: 2.0,
                throw_scale: 30.0,
                max_throw_speed: Some(25.0),
                grip_offset: DVec3::new(0.0, -0.8, 0.0),
                policy: GrabPolicy::AllInRadius,
            },
            motion: MotionConfig {
                gravity: DVec3::new(0.0, -20.0, 0.0),
                damping: 0.5,
                restitution: 0.2,
                arena: Region::new(Span::new(-30.0, 30.0), Span::at_least(0.9), Span::new(-25.0, 25.0)),
                spin_rate: 1.0 / 0.75,
            },
            goal: GoalConfig {
                bucket: Region::new(
                    Span::new(bucket_center.x - bucket_half, bucket_center.x + bucket_half),
                    Span::new(0.0, 4.0),
                    Span::new(bucket_center.z - bucket_half, bucket_center.z + bucket_half),
                ),
                spawn: Region::new(Span::new(-7.5, 7.5), Span::new(10.0, 10.0), Span::new(0.0, 10.0)),
                reward: 1,
            },
            objects: vec![
                seed(-6.0, 5.0, 8.0, ShapeKind::Cube, 0xF59E0B),
                seed(-2.0, 5.0, 6.0, ShapeKind::Ball, 0x3B82F6),
                seed(2.0, 5.0, 9.0, ShapeKind::Cube, 0x10B981),
                seed(6.0, 5.0, 7.0, ShapeKind::Ball, 0xEF4444),
                seed(0.0, 5.0, 10.0, ShapeKind::Cube, 0x8B5CF6),
            ],
            time_scale: 1.0,
            max_step: 0.05,
            view: ViewRect { left: -30.0, right: 30.0, top: 22.0, bottom: -2.0 },
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let (upper_arm, forearm) = self.arm.lengths();
        if !(upper_arm > 0.0 && forearm > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "arm links must be positive (got {upper_arm}, {forearm})"
            )));
        }
        if self.goal.spawn.reaches_into(&self.goal.bucket) {
            return Err(Error::InvalidConfig(
                "spawn region reaches into the bucket".to_string(),
            ));
        }
        if !(self.time_scale > 0.0 && self.max_step > 0.0) {
            return Err(Error::InvalidConfig(
                "time_scale and max_step must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.motion.damping) {
            return Err(Error::InvalidConfig(format!(
                "damping must be within [0, 1] (got {})",
                self.motion.damping
            )));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::planar(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        GameConfig::planar(800.0, 600.0).validate().unwrap();
        GameConfig::planar(1280.0, 720.0).validate().unwrap();
        GameConfig::scene().validate().unwrap();
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::scene();
        let json = config.to_json().unwrap();
        let parsed = GameConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = GameConfig::from_json("{ \"mapping\": 3 }").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_spawn_inside_bucket() {
        let mut config = GameConfig::planar(800.0, 600.0);
        config.goal.spawn = Region::new(Span::new(700.0, 700.0), Span::new(580.0, 580.0), Span::OPEN);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_link() {
        let mut config = GameConfig::scene();
        config.arm = ArmConfig::Spatial {
            pivot: DVec3::ZERO,
            upper_arm: 0.0,
            forearm: 8.0,
            rest_target: DVec3::new(0.0, 8.0, 8.0),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_view_rect_flips_pixel_y() {
        let view = GameConfig::planar(800.0, 600.0).view;
        assert_eq!(view.to_clip(DVec3::new(0.0, 0.0, 0.0)), (-1.0, 1.0));
        assert_eq!(view.to_clip(DVec3::new(800.0, 600.0, 0.0)), (1.0, -1.0));
        assert_eq!(view.scale_x(400.0), 1.0);
    }
}
