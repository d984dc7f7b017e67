//! Geometry helpers shared by the IK solvers and the object update rule
//!
//! Distances, a domain-safe `acos`, angle conversion, and the axis-aligned
//! regions used for arena walls, the bucket, and respawn areas.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Planar distance between two points
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// `acos` with its argument clamped to [-1, 1]
///
/// Law-of-cosines ratios overshoot the unit interval by a few ulps near full
/// extension or full fold; plain `acos` would return NaN there.
pub fn clamped_acos(cos_value: f64) -> f64 {
    cos_value.clamp(-1.0, 1.0).acos()
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / std::f64::consts::PI
}

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// One axis of a region. A missing bound is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl Span {
    pub const OPEN: Span = Span { min: None, max: None };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min: Some(min), max: None }
    }

    pub const fn at_most(max: f64) -> Self {
        Self { min: None, max: Some(max) }
    }

    /// Strict containment (a value sitting exactly on a bound is outside)
    pub fn contains(&self, v: f64) -> bool {
        self.min.map_or(true, |min| v > min) && self.max.map_or(true, |max| v < max)
    }

    /// True when some point of this span, bounds included, lies strictly
    /// inside `other`
    pub fn reaches_into(&self, other: &Span) -> bool {
        let upper_ok = match (self.max, other.min) {
            (Some(hi), Some(lo)) => hi > lo,
            _ => true,
        };
        let lower_ok = match (self.min, other.max) {
            (Some(lo), Some(hi)) => lo < hi,
            _ => true,
        };
        upper_ok && lower_ok
    }

    /// Pick a value inside the span from `t` in [0, 1]
    ///
    /// Open ends collapse onto the closed one; a fully open span yields 0.
    pub fn lerp(&self, t: f64) -> f64 {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min + (max - min) * t,
            (Some(v), None) | (None, Some(v)) => v,
            (None, None) => 0.0,
        }
    }
}

/// Axis-aligned region built from three spans
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub x: Span,
    #[serde(default)]
    pub y: Span,
    #[serde(default)]
    pub z: Span,
}

impl Region {
    pub const fn new(x: Span, y: Span, z: Span) -> Self {
        Self { x, y, z }
    }

    pub fn contains(&self, p: DVec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    pub fn reaches_into(&self, other: &Region) -> bool {
        self.x.reaches_into(&other.x)
            && self.y.reaches_into(&other.y)
            && self.z.reaches_into(&other.z)
    }

    /// Point inside the region from per-axis fractions in [0, 1]
    pub fn lerp(&self, t: DVec3) -> DVec3 {
        DVec3::new(self.x.lerp(t.x), self.y.lerp(t.y), self.z.lerp(t.z))
    }

    pub fn spans(&self) -> [Span; 3] {
        [self.x, self.y, self.z]
    }
}
