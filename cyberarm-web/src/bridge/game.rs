//! Game session - owns the world between animation frames
//!
//! JS calls `game_tick(now_ms)` once per `requestAnimationFrame`. The
//! session turns wall-clock time into a clamped simulation step, picks the
//! live detector reading or the synthetic pilot, and advances the world.

use std::cell::RefCell;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

use super::demo::DemoPilot;
use super::hand_landmarks::current_input;
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::physics::{FrameReport, GameEvent, HandSignal, RenderSnapshot, World};

pub struct GameSession {
    world: World,
    last_tick_ms: Option<f64>,
    pilot: DemoPilot,
    last_report: FrameReport,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            world: World::new(config, seed),
            last_tick_ms: None,
            pilot: DemoPilot::new(),
            last_report: FrameReport::default(),
        }
    }

    /// Advance to `now_ms`. The first tick runs one nominal frame.
    pub fn advance(&mut self, now_ms: f64, live: HandSignal, demo_mode: bool) -> &FrameReport {
        let elapsed = match self.last_tick_ms {
            Some(last) => (now_ms - last) / 1000.0,
            None => 1.0 / 60.0,
        };
        self.last_tick_ms = Some(now_ms);

        let signal = if demo_mode {
            self.pilot.advance(elapsed);
            self.pilot.signal()
        } else {
            live
        };

        let dt = self.world.step_for_elapsed(elapsed);
        self.last_report = self.world.step(&signal, dt);
        for event in &self.last_report.events {
            debug!(?event, "game event");
        }
        &self.last_report
    }

    pub fn reset(&mut self) {
        self.world.reset();
        self.last_tick_ms = None;
        self.pilot = DemoPilot::new();
        self.last_report = FrameReport::default();
    }

    /// Swap in a new configuration, keeping the running score
    pub fn reconfigure(&mut self, config: GameConfig, seed: u64) {
        let score = self.world.score();
        *self = Self::new(config, seed);
        self.world.set_score(score);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_report.events
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameConfig::default(), entropy_seed())
    }
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
    js_sys::Date::now().to_bits()
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
    0
}

thread_local! {
    static SESSION: RefCell<GameSession> = RefCell::new(GameSession::default());
}

fn with_world<T>(f: impl FnOnce(&World) -> T) -> T {
    SESSION.with(|cell| f(cell.borrow().world()))
}

// ============================================================================
// WASM API
// ============================================================================

/// Replace the running game with one built from a JSON `GameConfig`.
/// The score survives; `reset_game` clears it.
#[wasm_bindgen]
pub fn configure_game(json: &str) -> std::result::Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    install(config);
    Ok(())
}

/// Switch to a built-in preset: `"planar"` (sized to `width` x `height`)
/// or `"scene"`. Called again on canvas resize; the score is kept.
#[wasm_bindgen]
pub fn configure_preset(name: &str, width: f64, height: f64) -> std::result::Result<(), JsValue> {
    install(preset(name, width, height)?);
    Ok(())
}

#[wasm_bindgen]
pub fn get_config_json() -> std::result::Result<String, JsValue> {
    Ok(with_world(|world| world.config().to_json())?)
}

/// Advance one animation frame; returns the score
#[wasm_bindgen]
pub fn game_tick(now_ms: f64) -> u32 {
    let (signal, demo_mode) = current_input();
    SESSION.with(|cell| cell.borrow_mut().advance(now_ms, signal, demo_mode).score)
}

#[wasm_bindgen]
pub fn reset_game() {
    SESSION.with(|cell| cell.borrow_mut().reset());
}

#[wasm_bindgen]
pub fn get_score() -> u32 {
    with_world(World::score)
}

/// `[theta1, theta2]` (planar) or `[base, shoulder, elbow]` (scene)
#[wasm_bindgen]
pub fn get_arm_angles() -> Vec<f64> {
    with_world(|world| world.arm().angles())
}

/// Base, elbow, wrist as `[x, y, z] * 3`
#[wasm_bindgen]
pub fn get_arm_joints() -> Vec<f64> {
    with_world(|world| world.arm().joints().iter().flat_map(|p| p.to_array()).collect())
}

/// `[x, y, z, rotation, grabbed, shape]` per object
#[wasm_bindgen]
pub fn get_object_states() -> Vec<f64> {
    with_world(|world| object_states(&world.snapshot()))
}

/// Gripper heading in degrees, in the drawing plane
#[wasm_bindgen]
pub fn get_gripper_heading() -> f64 {
    with_world(|world| world.arm().gripper_heading_degrees())
}

/// `[r, g, b, a]` per object
#[wasm_bindgen]
pub fn get_object_colors() -> Vec<f32> {
    with_world(|world| world.objects().iter().flat_map(|o| o.color.0).collect())
}

/// Mapped hand target `[x, y, z]`, empty when no hand is tracked
#[wasm_bindgen]
pub fn get_target() -> Vec<f64> {
    with_world(|world| world.target().map(|t| t.to_array().to_vec()).unwrap_or_default())
}

#[wasm_bindgen]
pub fn is_gripping() -> bool {
    with_world(World::is_gripping)
}

/// Events from the most recent tick as a JSON array
#[wasm_bindgen]
pub fn get_last_events() -> std::result::Result<String, JsValue> {
    let json = SESSION.with(|cell| serde_json::to_string(cell.borrow().last_events()));
    Ok(json.map_err(Error::from)?)
}

// ============================================================================
// INTERNAL API
// ============================================================================

pub fn render_snapshot() -> RenderSnapshot {
    with_world(World::snapshot)
}

pub fn current_config() -> GameConfig {
    with_world(|world| world.config().clone())
}

fn install(config: GameConfig) {
    info!(objects = config.objects.len(), "game configured");
    SESSION.with(|cell| cell.borrow_mut().reconfigure(config, entropy_seed()));
}

fn preset(name: &str, width: f64, height: f64) -> Result<GameConfig> {
    let config = match name {
        "planar" => GameConfig::planar(width, height),
        "scene" => GameConfig::scene(),
        other => return Err(Error::InvalidConfig(format!("unknown preset '{other}'"))),
    };
    config.validate()?;
    Ok(config)
}

fn object_states(snapshot: &RenderSnapshot) -> Vec<f64> {
    snapshot
        .objects
        .iter()
        .flat_map(|o| {
            [
                o.position.x,
                o.position.y,
                o.position.z,
                o.rotation,
                if o.is_grabbed { 1.0 } else { 0.0 },
                o.shape.code(),
            ]
        })
        .collect()
}
