//! Normalized hand coordinates to scene coordinates
//!
//! Each axis is an independent affine map; the camera is front-facing so the
//! horizontal axis is usually mirrored. The scene preset also fakes a depth
//! axis from horizontal deflection so the arm appears to reach around.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// `v' = (mirror ? 1 - v : v) * scale + offset`, optionally floored
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisMap {
    pub scale: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub mirror: bool,
    #[serde(default)]
    pub min: Option<f64>,
}

impl AxisMap {
    pub const fn linear(scale: f64, offset: f64) -> Self {
        Self { scale, offset, mirror: false, min: None }
    }

    pub const fn mirrored(self) -> Self {
        Self { mirror: true, ..self }
    }

    pub const fn floored(self, min: f64) -> Self {
        Self { min: Some(min), ..self }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let v = if self.mirror { 1.0 - v } else { v };
        let mapped = v * self.scale + self.offset;
        match self.min {
            Some(min) => mapped.max(min),
            None => mapped,
        }
    }
}

/// `z = base - |x| * falloff`, computed from the mapped x
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthMap {
    pub base: f64,
    pub falloff: f64,
}

impl DepthMap {
    pub fn apply(&self, x: f64) -> f64 {
        self.base - x.abs() * self.falloff
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapping {
    pub x: AxisMap,
    pub y: AxisMap,
    #[serde(default)]
    pub depth: DepthMap,
}

impl CoordinateMapping {
    /// Pixel canvas of `width` x `height`, y down
    pub fn planar(width: f64, height: f64) -> Self {
        Self {
            x: AxisMap::linear(width, 0.0).mirrored(),
            y: AxisMap::linear(height, 0.0),
            depth: DepthMap::default(),
        }
    }

    /// Scene units, y up, arm at the origin
    pub fn scene() -> Self {
        Self {
            // ((1 - nx) - 0.5) * 24
            x: AxisMap::linear(24.0, -12.0).mirrored(),
            // -(ny - 0.5) * 16 + 8, never below the floor
            y: AxisMap::linear(-16.0, 16.0).floored(0.5),
            depth: DepthMap { base: 8.0, falloff: 0.1 },
        }
    }

    pub fn to_scene(&self, normalized: DVec2) -> DVec3 {
        let x = self.x.apply(normalized.x);
        let y = self.y.apply(normalized.y);
        DVec3::new(x, y, self.depth.apply(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_planar_mirrors_x() {
        let mapping = CoordinateMapping::planar(800.0, 600.0);
        let p = mapping.to_scene(DVec2::new(0.25, 0.5));
        assert_abs_diff_eq!(p.x, 600.0);
        assert_abs_diff_eq!(p.y, 300.0);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_scene_center() {
        let p = CoordinateMapping::scene().to_scene(DVec2::new(0.5, 0.5));
        assert_abs_diff_eq!(p.x, 0.0);
        assert_abs_diff_eq!(p.y, 8.0);
        assert_abs_diff_eq!(p.z, 8.0);
    }

    #[test]
    fn test_scene_edges() {
        let mapping = CoordinateMapping::scene();

        // Hand at the camera's left edge appears on the user's right
        let right = mapping.to_scene(DVec2::new(0.0, 0.0));
        assert_abs_diff_eq!(right.x, 12.0);
        assert_abs_diff_eq!(right.y, 16.0);
        assert_abs_diff_eq!(right.z, 8.0 - 1.2, epsilon = 1e-12);

        // Low hand is floored just above the ground
        let low = mapping.to_scene(DVec2::new(0.5, 1.2));
        assert_abs_diff_eq!(low.y, 0.5);
    }

    #[test]
    fn test_monotonic_axes() {
        let mapping = CoordinateMapping::planar(640.0, 480.0);
        let a = mapping.to_scene(DVec2::new(0.2, 0.2));
        let b = mapping.to_scene(DVec2::new(0.6, 0.6));
        assert!(b.x < a.x);
        assert!(b.y > a.y);
    }
}
