//! Per-tick events reported back to the caller

use glam::DVec3;
use serde::Serialize;

use super::object::ObjectId;

/// Something that happened to an object during one tick
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// Pinch closed within grab radius
    Grabbed { id: ObjectId },
    /// Pinch opened while holding; `velocity` is the throw
    Released { id: ObjectId, velocity: DVec3 },
    /// Hand lost while holding, object falls from where it was
    Dropped { id: ObjectId },
    /// Object landed in the bucket and was respawned
    Scored { id: ObjectId, reward: u32, total: u32 },
}
