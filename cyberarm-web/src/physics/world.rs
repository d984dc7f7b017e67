//! World - the per-tick context object
//!
//! Owns the object population, score, previous target sample, and the
//! respawn RNG. One call to [`World::step`] (or the pure [`tick`]) is one
//! rendered frame: map the hand, solve the arm, run the interaction rule,
//! integrate free objects, then collect anything that reached the bucket.

use glam::{DVec2, DVec3};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::Serialize;
use tracing::{debug, info};

use super::arm_ik::{ArmAngles, ArmIK, ArmIK3D, PlanarAngles};
use super::events::GameEvent;
use super::geometry::rad_to_deg;
use super::interaction::{self, FrameInput};
use super::motion;
use super::goal;
use super::object::{ManipulableObject, ObjectId, Rgba, ShapeKind};
use super::state::HandSignal;
use super::velocity::VelocityTracker;
use crate::config::{ArmConfig, GameConfig};

/// Solved arm for one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArmPose {
    Planar {
        base: DVec2,
        angles: PlanarAngles,
        elbow: DVec2,
        wrist: DVec2,
    },
    Spatial {
        pivot: DVec3,
        angles: ArmAngles,
        elbow: DVec3,
        wrist: DVec3,
    },
}

impl ArmPose {
    /// Solve `arm` for `target`, or for its rest target when no hand is
    /// tracked
    pub fn solve(arm: &ArmConfig, target: Option<DVec3>) -> Self {
        match *arm {
            ArmConfig::Planar { base, upper_arm, forearm, rest_target } => {
                let ik = ArmIK::new(upper_arm, forearm);
                let goal = target.map_or(rest_target, |t| t.truncate());
                let angles = ik.solve(base, goal);
                let (elbow, wrist) = ik.forward(base, angles);
                ArmPose::Planar { base, angles, elbow, wrist }
            }
            ArmConfig::Spatial { pivot, upper_arm, forearm, rest_target } => {
                let ik = ArmIK3D::new(upper_arm, forearm);
                let angles = ik.solve(pivot, target.unwrap_or(rest_target));
                let (elbow, wrist) = ik.forward(pivot, angles);
                ArmPose::Spatial { pivot, angles, elbow, wrist }
            }
        }
    }

    /// `[theta1, theta2]` or `[base, shoulder, elbow]`
    pub fn angles(&self) -> Vec<f64> {
        match self {
            ArmPose::Planar { angles, .. } => vec![angles.theta1, angles.theta2],
            ArmPose::Spatial { angles, .. } => vec![angles.base, angles.shoulder, angles.elbow],
        }
    }

    /// Base, elbow, wrist as 3D points
    pub fn joints(&self) -> [DVec3; 3] {
        match *self {
            ArmPose::Planar { base, elbow, wrist, .. } => {
                [base.extend(0.0), elbow.extend(0.0), wrist.extend(0.0)]
            }
            ArmPose::Spatial { pivot, elbow, wrist, .. } => [pivot, elbow, wrist],
        }
    }

    /// Direction the gripper faces in the drawing plane (radians)
    pub fn gripper_heading(&self) -> f64 {
        match self {
            ArmPose::Planar { angles, .. } => angles.theta1 + angles.theta2,
            ArmPose::Spatial { elbow, wrist, .. } => {
                let d = *wrist - *elbow;
                d.y.atan2(d.x)
            }
        }
    }

    pub fn gripper_heading_degrees(&self) -> f64 {
        rad_to_deg(self.gripper_heading())
    }
}

/// What the renderer needs for one object
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ObjectView {
    pub id: ObjectId,
    pub position: DVec3,
    pub rotation: f64,
    pub is_grabbed: bool,
    pub shape: ShapeKind,
    pub color: Rgba,
}

/// Everything a renderer draws for one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub arm: ArmPose,
    pub objects: Vec<ObjectView>,
    pub target: Option<DVec3>,
    pub is_gripping: bool,
    pub score: u32,
}

/// Result of one tick
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrameReport {
    pub events: Vec<GameEvent>,
    pub score: u32,
}

impl FrameReport {
    pub fn scored(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::Scored { .. }))
            .count()
    }
}

#[derive(Clone, Debug)]
pub struct World {
    config: GameConfig,
    objects: Vec<ManipulableObject>,
    score: u32,
    tracker: VelocityTracker,
    rng: Pcg64Mcg,
    target: Option<DVec3>,
    is_gripping: bool,
    arm: ArmPose,
}

impl World {
    /// Fresh world; `seed` drives respawn positions
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let objects = spawn_population(&config);
        let arm = ArmPose::solve(&config.arm, None);
        Self {
            config,
            objects,
            score: 0,
            tracker: VelocityTracker::new(),
            rng: Pcg64Mcg::seed_from_u64(seed),
            target: None,
            is_gripping: false,
            arm,
        }
    }

    /// Advance one tick of `dt` simulation units
    pub fn step(&mut self, signal: &HandSignal, dt: f64) -> FrameReport {
        let target = signal.position.map(|p| self.config.mapping.to_scene(p));
        let hand_velocity = self.tracker.update(target);

        self.target = target;
        self.is_gripping = signal.is_gripping && target.is_some();
        self.arm = ArmPose::solve(&self.config.arm, target);

        let input = FrameInput {
            target,
            is_gripping: signal.is_gripping,
            hand_velocity,
        };
        let mut events = interaction::apply(&mut self.objects, &input, &self.config.interaction);

        for obj in self.objects.iter_mut().filter(|o| !o.is_grabbed) {
            motion::integrate(obj, &self.config.motion, dt);
        }

        events.extend(goal::collect(
            &mut self.objects,
            &self.config.goal,
            &mut self.score,
            &mut self.rng,
        ));

        FrameReport {
            events,
            score: self.score,
        }
    }

    /// Back to the initial layout with a zero score
    pub fn reset(&mut self) {
        self.objects = spawn_population(&self.config);
        self.score = 0;
        self.tracker.clear();
        self.target = None;
        self.is_gripping = false;
        self.arm = ArmPose::solve(&self.config.arm, None);
        info!("world reset");
    }

    /// Convert wall-clock seconds to a clamped simulation step
    pub fn step_for_elapsed(&self, elapsed_seconds: f64) -> f64 {
        (elapsed_seconds.max(0.0) * self.config.time_scale).min(self.config.max_step)
    }

    /// One nominal display frame (1/60 s) in simulation units
    pub fn nominal_step(&self) -> f64 {
        self.step_for_elapsed(1.0 / 60.0)
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            arm: self.arm,
            objects: self
                .objects
                .iter()
                .map(|o| ObjectView {
                    id: o.id,
                    position: o.position,
                    rotation: o.rotation,
                    is_grabbed: o.is_grabbed,
                    shape: o.shape,
                    color: o.color,
                })
                .collect(),
            target: self.target,
            is_gripping: self.is_gripping,
            score: self.score,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn objects(&self) -> &[ManipulableObject] {
        &self.objects
    }

    /// Direct access for scripted setups that bypass the hand
    pub fn objects_mut(&mut self) -> &mut [ManipulableObject] {
        &mut self.objects
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Carry a running score into a freshly configured world
    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    pub fn arm(&self) -> &ArmPose {
        &self.arm
    }

    pub fn target(&self) -> Option<DVec3> {
        self.target
    }

    pub fn is_gripping(&self) -> bool {
        self.is_gripping
    }
}

/// Pure form of [`World::step`]: `(previous, input, dt) -> (next, report)`
pub fn tick(previous: &World, signal: &HandSignal, dt: f64) -> (World, FrameReport) {
    let mut next = previous.clone();
    let report = next.step(signal, dt);
    (next, report)
}

fn spawn_population(config: &GameConfig) -> Vec<ManipulableObject> {
    let objects: Vec<_> = config
        .objects
        .iter()
        .enumerate()
        .map(|(i, seed)| ManipulableObject::from_seed(i as ObjectId, seed))
        .collect();
    debug!(count = objects.len(), "spawned objects");
    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const W: f64 = 800.0;
    const H: f64 = 600.0;

    /// Normalized, pre-mirror hand coordinates that land on pixel (x, y)
    fn hand_at(x: f64, y: f64, gripping: bool) -> HandSignal {
        HandSignal::new(DVec2::new(1.0 - x / W, y / H), gripping)
    }

    fn planar_world() -> World {
        World::new(GameConfig::planar(W, H), 42)
    }

    #[test]
    fn test_grab_snap_and_throw() {
        let mut config = GameConfig::planar(W, H);
        config.objects.truncate(1);
        config.objects[0].position = DVec3::new(400.0, 100.0, 0.0);
        let mut world = World::new(config, 7);

        let report = world.step(&hand_at(400.0, 100.0, true), 1.0);
        assert_eq!(report.events, vec![GameEvent::Grabbed { id: 0 }]);
        assert!(world.objects()[0].is_grabbed);
        assert_abs_diff_eq!(world.objects()[0].position.x, 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(world.objects()[0].position.y, 100.0, epsilon = 1e-9);

        let report = world.step(&hand_at(410.0, 100.0, false), 1.0);
        let thrown = report
            .events
            .iter()
            .find_map(|e| match e {
                GameEvent::Released { velocity, .. } => Some(*velocity),
                _ => None,
            })
            .unwrap();
        assert_abs_diff_eq!(thrown.x, 10.0 * 18.0, epsilon = 1e-6);
        assert_abs_diff_eq!(thrown.y, 0.0, epsilon = 1e-6);
        assert!(!world.objects()[0].is_grabbed);
    }

    #[test]
    fn test_grabbed_object_skips_gravity() {
        let mut world = planar_world();
        let start = world.objects()[0].position;

        for _ in 0..30 {
            world.step(&hand_at(start.x, start.y, true), 1.0);
        }
        let obj = &world.objects()[0];
        assert!(obj.is_grabbed);
        assert_abs_diff_eq!(obj.position.y, start.y, epsilon = 1e-9);
        assert_eq!(obj.velocity, DVec3::ZERO);
    }

    #[test]
    fn test_hand_loss_drops_and_falls() {
        let mut world = planar_world();
        let start = world.objects()[0].position;
        world.step(&hand_at(start.x, start.y, true), 1.0);
        assert!(world.objects()[0].is_grabbed);

        let report = world.step(&HandSignal::ABSENT, 1.0);
        assert!(report.events.contains(&GameEvent::Dropped { id: 0 }));
        assert!(!world.objects()[0].is_grabbed);
        assert!(world.objects()[0].position.y > start.y);
    }

    #[test]
    fn test_scoring_driven_by_harness() {
        let mut world = planar_world();
        let bucket = world.config().goal.bucket;
        world.objects_mut()[1].position = DVec3::new(W - 100.0, H - 50.0, 0.0);

        let report = world.step(&HandSignal::ABSENT, 1.0);
        assert_eq!(report.scored(), 1);
        assert_eq!(report.score, 10);
        assert!(!bucket.contains(world.objects()[1].position));

        let report = world.step(&HandSignal::ABSENT, 1.0);
        assert_eq!(report.scored(), 0);
        assert_eq!(world.score(), 10);
    }

    #[test]
    fn test_falling_object_lands_in_bucket() {
        let mut config = GameConfig::planar(W, H);
        config.objects.truncate(1);
        config.objects[0].position = DVec3::new(W - 100.0, 200.0, 0.0);
        let mut world = World::new(config, 3);

        let frames = (0..300)
            .position(|_| world.step(&HandSignal::ABSENT, 1.0).scored() == 1)
            .expect("object never reached the bucket");
        assert!(frames > 10);
        assert_eq!(world.score(), 10);
        assert_eq!(world.objects().len(), 1);
        assert_eq!(world.objects()[0].position.y, -50.0);
        assert_eq!(world.objects()[0].velocity, DVec3::ZERO);
    }

    #[test]
    fn test_tick_is_pure() {
        let world = planar_world();
        let signal = hand_at(300.0, 300.0, true);

        let (a, report_a) = tick(&world, &signal, 1.0);
        let (b, report_b) = tick(&world, &signal, 1.0);
        assert_eq!(report_a, report_b);
        assert_eq!(a.objects(), b.objects());
        assert!(!world.objects()[1].is_grabbed);
    }

    #[test]
    fn test_respawn_is_deterministic_per_seed() {
        let run = |seed| {
            let mut world = World::new(GameConfig::planar(W, H), seed);
            world.objects_mut()[0].position = DVec3::new(W - 100.0, H - 50.0, 0.0);
            world.step(&HandSignal::ABSENT, 1.0);
            world.objects()[0].position
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_arm_follows_target_and_rests() {
        let mut world = planar_world();
        let rest_wrist = world.arm().joints()[2];
        assert_abs_diff_eq!(rest_wrist.x, W / 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rest_wrist.y, H / 2.0, epsilon = 1e-6);

        world.step(&hand_at(250.0, 350.0, false), 1.0);
        let wrist = world.arm().joints()[2];
        assert_abs_diff_eq!(wrist.x, 250.0, epsilon = 1e-6);
        assert_abs_diff_eq!(wrist.y, 350.0, epsilon = 1e-6);
        assert_eq!(world.arm().angles().len(), 2);

        let angles = world.arm().angles();
        assert_abs_diff_eq!(
            world.arm().gripper_heading_degrees(),
            (angles[0] + angles[1]).to_degrees(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_scene_arm_and_grip_offset() {
        let mut world = World::new(GameConfig::scene(), 5);
        assert_eq!(world.arm().angles().len(), 3);

        // Walk the hand to object 1 at (-2, 5, 6) from above
        let target_nx = 1.0 - (-2.0 + 12.0) / 24.0;
        let target_ny = (16.0 - 5.5) / 16.0;
        world.step(&HandSignal::new(DVec2::new(target_nx, target_ny), true), 1.0 / 60.0);

        let obj = &world.objects()[1];
        assert!(obj.is_grabbed, "object at {:?}", obj.position);
        let target = world.target().unwrap();
        assert_abs_diff_eq!(obj.position.y, target.y - 0.8, epsilon = 1e-9);

        let wrist = world.arm().joints()[2];
        assert!(wrist.distance(target) < 1e-6);
    }

    #[test]
    fn test_scene_bucket_scores_one_point() {
        let mut world = World::new(GameConfig::scene(), 9);
        world.objects_mut()[0].position = DVec3::new(12.0, 2.0, 8.0);

        let report = world.step(&HandSignal::ABSENT, 1.0 / 60.0);
        assert_eq!(report.scored(), 1);
        assert_eq!(world.score(), 1);

        let respawned = &world.objects()[0];
        assert!((-7.5..=7.5).contains(&respawned.position.x));
        assert_abs_diff_eq!(respawned.position.y, 10.0, epsilon = 1e-12);
        assert!((0.0..=10.0).contains(&respawned.position.z));
        assert_eq!(respawned.velocity, DVec3::ZERO);

        // inside the bucket's x/y footprint but behind it in z
        world.objects_mut()[1].position = DVec3::new(12.0, 2.0, 11.0);
        let report = world.step(&HandSignal::ABSENT, 1.0 / 60.0);
        assert_eq!(report.scored(), 0);
        assert_eq!(world.score(), 1);
    }

    #[test]
    fn test_set_score_carries_over() {
        let mut world = World::new(GameConfig::planar(1280.0, 720.0), 2);
        world.set_score(30);
        world.objects_mut()[0].position = DVec3::new(1180.0, 670.0, 0.0);
        assert_eq!(world.step(&HandSignal::ABSENT, 1.0).score, 40);
    }

    #[test]
    fn test_reset_restores_layout() {
        let mut world = planar_world();
        world.objects_mut()[0].position = DVec3::new(W - 100.0, H - 50.0, 0.0);
        world.step(&HandSignal::ABSENT, 1.0);
        assert_eq!(world.score(), 10);

        world.reset();
        assert_eq!(world.score(), 0);
        assert_eq!(world.objects()[0].position, DVec3::new(200.0, 300.0, 0.0));
    }

    #[test]
    fn test_step_for_elapsed() {
        let planar = planar_world();
        assert_abs_diff_eq!(planar.nominal_step(), 1.0, epsilon = 1e-12);
        assert_eq!(planar.step_for_elapsed(10.0), 3.0);
        assert_eq!(planar.step_for_elapsed(-1.0), 0.0);

        let scene = World::new(GameConfig::scene(), 0);
        assert_abs_diff_eq!(scene.nominal_step(), 1.0 / 60.0, epsilon = 1e-12);
    }
}
