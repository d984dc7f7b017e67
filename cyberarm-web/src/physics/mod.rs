//! Physics module - arm kinematics and the pick-and-throw simulation
//!
//! Re-exports only. All logic in submodules.

mod arm_ik;
mod events;
mod geometry;
mod goal;
mod interaction;
mod mapping;
mod motion;
mod object;
mod state;
mod velocity;
mod world;

pub use arm_ik::{solve_ik, ArmAngles, ArmIK, ArmIK3D, PlanarAngles, REACH_EPSILON};
pub use events::GameEvent;
pub use geometry::{clamped_acos, deg_to_rad, distance, rad_to_deg, Region, Span};
pub use goal::{collect, GoalConfig};
pub use interaction::{apply, throw_velocity, FrameInput, GrabPolicy, InteractionConfig};
pub use mapping::{AxisMap, CoordinateMapping, DepthMap};
pub use motion::{integrate, MotionConfig};
pub use object::{ManipulableObject, ObjectId, ObjectSeed, Rgba, ShapeKind};
pub use state::HandSignal;
pub use velocity::VelocityTracker;
pub use world::{tick, ArmPose, FrameReport, ObjectView, RenderSnapshot, World};
