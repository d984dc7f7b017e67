//! Manipulable objects - the boxes and balls the arm sorts into the bucket

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Stable object identifier (index into the population)
pub type ObjectId = u32;

/// Visual shape of an object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Cube,
    Ball,
}

impl ShapeKind {
    /// Numeric code used in the flat arrays handed to JS
    pub fn code(&self) -> f64 {
        match self {
            ShapeKind::Cube => 0.0,
            ShapeKind::Ball => 1.0,
        }
    }
}

/// Linear RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    /// From a 0xRRGGBB literal, fully opaque
    pub fn from_hex(hex: u32) -> Self {
        Self([
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            1.0,
        ])
    }
}

/// Initial placement of one object
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectSeed {
    pub position: DVec3,
    pub shape: ShapeKind,
    pub color: Rgba,
}

/// One object in the scene
///
/// While `is_grabbed` is set the arm owns the position and free motion is
/// suspended.
#[derive(Clone, Debug, PartialEq)]
pub struct ManipulableObject {
    pub id: ObjectId,
    pub position: DVec3,
    pub velocity: DVec3,
    /// Spin about the view axis, visual only
    pub rotation: f64,
    pub is_grabbed: bool,
    pub shape: ShapeKind,
    pub color: Rgba,
}

impl ManipulableObject {
    pub fn from_seed(id: ObjectId, seed: &ObjectSeed) -> Self {
        Self {
            id,
            position: seed.position,
            velocity: DVec3::ZERO,
            rotation: 0.0,
            is_grabbed: false,
            shape: seed.shape,
            color: seed.color,
        }
    }

    /// Move to `position` at rest and hand back to free motion
    pub fn respawn_at(&mut self, position: DVec3) {
        self.position = position;
        self.velocity = DVec3::ZERO;
        self.is_grabbed = false;
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let amber = Rgba::from_hex(0xF59E0B);
        assert_eq!(amber.0[0], 245.0 / 255.0);
        assert_eq!(amber.0[1], 158.0 / 255.0);
        assert_eq!(amber.0[2], 11.0 / 255.0);
        assert_eq!(amber.0[3], 1.0);
    }

    #[test]
    fn test_respawn_clears_motion() {
        let seed = ObjectSeed {
            position: DVec3::new(1.0, 2.0, 3.0),
            shape: ShapeKind::Ball,
            color: Rgba::from_hex(0x3B82F6),
        };
        let mut obj = ManipulableObject::from_seed(4, &seed);
        obj.velocity = DVec3::new(5.0, 5.0, 0.0);
        obj.is_grabbed = true;

        obj.respawn_at(DVec3::new(0.0, -50.0, 0.0));
        assert_eq!(obj.position, DVec3::new(0.0, -50.0, 0.0));
        assert_eq!(obj.speed(), 0.0);
        assert!(!obj.is_grabbed);
    }
}
