//! Bucket scoring and respawn

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::events::GameEvent;
use super::geometry::Region;
use super::object::ManipulableObject;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    /// Scoring volume (strict bounds)
    pub bucket: Region,
    /// Where scored objects reappear, sampled uniformly
    pub spawn: Region,
    /// Points per object delivered
    pub reward: u32,
}

/// Score every free object inside the bucket and move it to the spawn area
///
/// The spawn region must not reach into the bucket, otherwise an object
/// could score again on the next tick.
pub fn collect<R: Rng>(
    objects: &mut [ManipulableObject],
    config: &GoalConfig,
    score: &mut u32,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    for obj in objects.iter_mut() {
        if obj.is_grabbed || !config.bucket.contains(obj.position) {
            continue;
        }

        *score = score.saturating_add(config.reward);
        let fractions = DVec3::new(rng.gen(), rng.gen(), rng.gen());
        obj.respawn_at(config.spawn.lerp(fractions));

        info!(id = obj.id, score = *score, "object delivered");
        events.push(GameEvent::Scored {
            id: obj.id,
            reward: config.reward,
            total: *score,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::geometry::Span;
    use crate::physics::object::{ObjectSeed, Rgba, ShapeKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn planar_goal() -> GoalConfig {
        GoalConfig {
            bucket: Region::new(Span::new(640.0, 760.0), Span::at_least(500.0), Span::OPEN),
            spawn: Region::new(Span::new(50.0, 650.0), Span::new(-50.0, -50.0), Span::OPEN),
            reward: 10,
        }
    }

    fn object_at(x: f64, y: f64) -> ManipulableObject {
        ManipulableObject::from_seed(
            7,
            &ObjectSeed {
                position: DVec3::new(x, y, 0.0),
                shape: ShapeKind::Cube,
                color: Rgba::from_hex(0x10B981),
            },
        )
    }

    #[test]
    fn test_scores_once_and_respawns_outside() {
        let config = planar_goal();
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let mut score = 0;
        let mut objects = vec![object_at(700.0, 560.0)];
        objects[0].velocity = DVec3::new(3.0, 1.0, 0.0);

        let events = collect(&mut objects, &config, &mut score, &mut rng);
        assert_eq!(score, 10);
        assert_eq!(events, vec![GameEvent::Scored { id: 7, reward: 10, total: 10 }]);
        assert!(!config.bucket.contains(objects[0].position));
        assert_eq!(objects[0].position.y, -50.0);
        assert!(objects[0].position.x >= 50.0 && objects[0].position.x <= 650.0);
        assert_eq!(objects[0].velocity, DVec3::ZERO);

        let events = collect(&mut objects, &config, &mut score, &mut rng);
        assert!(events.is_empty());
        assert_eq!(score, 10);
    }

    #[test]
    fn test_held_object_does_not_score() {
        let config = planar_goal();
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let mut score = 0;
        let mut objects = vec![object_at(700.0, 560.0)];
        objects[0].is_grabbed = true;

        assert!(collect(&mut objects, &config, &mut score, &mut rng).is_empty());
        assert_eq!(score, 0);
        assert_eq!(objects[0].position, DVec3::new(700.0, 560.0, 0.0));
    }

    #[test]
    fn test_outside_bucket_does_not_score() {
        let config = planar_goal();
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let mut score = 0;
        let mut objects = vec![object_at(640.0, 560.0), object_at(700.0, 500.0)];

        assert!(collect(&mut objects, &config, &mut score, &mut rng).is_empty());
        assert_eq!(score, 0);
    }
}
