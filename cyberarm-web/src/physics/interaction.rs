//! Grab / release / follow rule
//!
//! Runs once per tick over the whole population, before free motion. Every
//! object reads the same `FrameInput`.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::events::GameEvent;
use super::object::ManipulableObject;

/// Which objects a closing pinch may pick up
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrabPolicy {
    /// Every free object within the grab radius is picked up, so several can
    /// be carried at once
    #[default]
    AllInRadius,
    /// Only the nearest free object, and only while nothing is held
    SingleNearest,
}

/// Tuning for the interaction rule
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    pub grab_radius: f64,
    /// Hand displacement per tick is multiplied by this on release
    pub throw_scale: f64,
    /// Upper bound on throw speed, if any
    #[serde(default)]
    pub max_throw_speed: Option<f64>,
    /// Where a held object sits relative to the target
    #[serde(default)]
    pub grip_offset: DVec3,
    #[serde(default)]
    pub policy: GrabPolicy,
}

/// Control input for one tick, already in scene coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// `None` when no hand is tracked
    pub target: Option<DVec3>,
    pub is_gripping: bool,
    /// Target displacement since the previous tick
    pub hand_velocity: DVec3,
}

/// Throw velocity for a release with the given hand velocity
pub fn throw_velocity(hand_velocity: DVec3, config: &InteractionConfig) -> DVec3 {
    let velocity = hand_velocity * config.throw_scale;
    match config.max_throw_speed {
        Some(max) => velocity.clamp_length_max(max),
        None => velocity,
    }
}

/// Apply grab acquisition, release, follow, and hand-loss drop
pub fn apply(
    objects: &mut [ManipulableObject],
    input: &FrameInput,
    config: &InteractionConfig,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let Some(target) = input.target else {
        for obj in objects.iter_mut().filter(|o| o.is_grabbed) {
            obj.is_grabbed = false;
            debug!(id = obj.id, "hand lost, dropping object");
            events.push(GameEvent::Dropped { id: obj.id });
        }
        return events;
    };

    if input.is_gripping {
        acquire(objects, target, config, &mut events);
    }

    for obj in objects.iter_mut() {
        if !input.is_gripping && obj.is_grabbed {
            obj.is_grabbed = false;
            obj.velocity = throw_velocity(input.hand_velocity, config);
            debug!(id = obj.id, speed = obj.speed(), "released");
            events.push(GameEvent::Released { id: obj.id, velocity: obj.velocity });
        }

        if obj.is_grabbed {
            obj.position = target + config.grip_offset;
            obj.velocity = DVec3::ZERO;
        }
    }

    events
}

fn acquire(
    objects: &mut [ManipulableObject],
    target: DVec3,
    config: &InteractionConfig,
    events: &mut Vec<GameEvent>,
) {
    let in_reach = |obj: &ManipulableObject| {
        !obj.is_grabbed && obj.position.distance(target) < config.grab_radius
    };

    match config.policy {
        GrabPolicy::AllInRadius => {
            for obj in objects.iter_mut().filter(|o| in_reach(o)) {
                obj.is_grabbed = true;
                debug!(id = obj.id, "grabbed");
                events.push(GameEvent::Grabbed { id: obj.id });
            }
        }
        GrabPolicy::SingleNearest => {
            if objects.iter().any(|o| o.is_grabbed) {
                return;
            }
            let nearest = objects
                .iter_mut()
                .filter(|o| in_reach(o))
                .min_by(|a, b| {
                    a.position
                        .distance_squared(target)
                        .total_cmp(&b.position.distance_squared(target))
                });
            if let Some(obj) = nearest {
                obj.is_grabbed = true;
                debug!(id = obj.id, "grabbed nearest");
                events.push(GameEvent::Grabbed { id: obj.id });
            }
        }
    }
}
