//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod demo;
mod game;
mod hand_landmarks;

pub use demo::{DemoPilot, PHASE_RATE};

pub use game::{
    // WASM entry points
    configure_game,
    configure_preset,
    game_tick,
    get_arm_angles,
    get_arm_joints,
    get_config_json,
    get_gripper_heading,
    get_last_events,
    get_object_colors,
    get_object_states,
    get_score,
    get_target,
    is_gripping,
    reset_game,
    // Internal API
    current_config,
    render_snapshot,
    GameSession,
};

pub use hand_landmarks::{
    apply_hand_landmarks,
    get_detector_status,
    is_demo_mode,
    report_detector_failure,
    set_demo_mode,
    current_input,
    hand_signal_from_landmarks,
    is_pinching,
    parse_first_hand,
    DetectorStatus,
    FrameGate,
    HandLandmark,
    InputState,
    INDEX_TIP,
    PINCH_THRESHOLD,
    THUMB_TIP,
};
