//! Hand landmark intake
//!
//! The detector pushes a flat `[x, y, z] * 21 * num_hands` buffer per video
//! frame. Only the first hand drives the arm: the index fingertip is the
//! target and a thumb/index pinch is the grip. Frames whose timestamp does
//! not advance are skipped, and the latest accepted reading stays live until
//! the next one lands.

use glam::DVec2;
use std::cell::RefCell;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::error::{Error, Result};
use crate::physics::{distance, HandSignal};

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;

pub const LANDMARKS_PER_HAND: usize = 21;
pub const VALUES_PER_HAND: usize = LANDMARKS_PER_HAND * 3;

/// Thumb/index tip distance (normalized) below which the hand is gripping
pub const PINCH_THRESHOLD: f64 = 0.1;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl HandLandmark {
    pub fn planar(&self) -> DVec2 {
        DVec2::new(f64::from(self.x), f64::from(self.y))
    }
}

/// First hand of a flat buffer, or `None` when no hand is in view
pub fn parse_first_hand(
    flat_data: &[f32],
    num_hands: usize,
) -> Result<Option<[HandLandmark; LANDMARKS_PER_HAND]>> {
    let expected = num_hands
        .checked_mul(VALUES_PER_HAND)
        .ok_or(Error::InvalidLandmarkData {
            len: flat_data.len(),
            expected: usize::MAX,
        })?;
    if flat_data.len() != expected {
        return Err(Error::InvalidLandmarkData {
            len: flat_data.len(),
            expected,
        });
    }
    if num_hands == 0 {
        return Ok(None);
    }

    let mut hand = [HandLandmark::default(); LANDMARKS_PER_HAND];
    for (landmark, xyz) in hand.iter_mut().zip(flat_data.chunks_exact(3)) {
        *landmark = HandLandmark {
            x: xyz[0],
            y: xyz[1],
            z: xyz[2],
        };
    }
    Ok(Some(hand))
}

pub fn is_pinching(hand: &[HandLandmark; LANDMARKS_PER_HAND]) -> bool {
    distance(hand[THUMB_TIP].planar(), hand[INDEX_TIP].planar()) < PINCH_THRESHOLD
}

pub fn hand_signal_from_landmarks(hand: &[HandLandmark; LANDMARKS_PER_HAND]) -> HandSignal {
    HandSignal::new(hand[INDEX_TIP].planar(), is_pinching(hand))
}

/// Admits strictly increasing timestamps only
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameGate {
    last: Option<f64>,
}

impl FrameGate {
    pub fn would_admit(&self, timestamp_ms: f64) -> bool {
        timestamp_ms.is_finite() && self.last.map_or(true, |last| timestamp_ms > last)
    }

    pub fn admit(&mut self, timestamp_ms: f64) -> bool {
        if !self.would_admit(timestamp_ms) {
            return false;
        }
        self.last = Some(timestamp_ms);
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DetectorStatus {
    #[default]
    Starting,
    Active,
    Failed(String),
}

impl DetectorStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DetectorStatus::Starting => "starting",
            DetectorStatus::Active => "active",
            DetectorStatus::Failed(_) => "failed",
        }
    }
}

/// Last-writer-wins input slot shared by the detector and the game loop
#[derive(Clone, Debug, Default)]
pub struct InputState {
    gate: FrameGate,
    signal: HandSignal,
    status: DetectorStatus,
    demo_mode: bool,
}

impl InputState {
    /// Store a detector frame. `Ok(false)` when the frame gate skipped it.
    pub fn ingest(&mut self, flat_data: &[f32], num_hands: usize, timestamp_ms: f64) -> Result<bool> {
        if !timestamp_ms.is_finite() {
            return Err(Error::InvalidTimestamp(timestamp_ms));
        }
        if !self.gate.would_admit(timestamp_ms) {
            return Ok(false);
        }
        let hand = parse_first_hand(flat_data, num_hands)?;
        self.gate.admit(timestamp_ms);

        self.signal = hand
            .as_ref()
            .map_or(HandSignal::ABSENT, hand_signal_from_landmarks);

        if self.status != DetectorStatus::Active {
            info!("hand detector active");
            self.status = DetectorStatus::Active;
        }
        Ok(true)
    }

    /// Detector could not start or died; the synthetic pilot takes over
    pub fn fail(&mut self, message: &str) {
        let err = Error::DetectorUnavailable(message.to_string());
        warn!("{err}, switching to demo mode");
        self.status = DetectorStatus::Failed(message.to_string());
        self.signal = HandSignal::ABSENT;
        self.demo_mode = true;
    }

    pub fn set_demo_mode(&mut self, enabled: bool) {
        self.demo_mode = enabled;
    }

    pub fn signal(&self) -> HandSignal {
        self.signal
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    pub fn status(&self) -> &DetectorStatus {
        &self.status
    }
}

thread_local! {
    static INPUT: RefCell<InputState> = RefCell::new(InputState::default());
}

// ============================================================================
// WASM API
// ============================================================================

#[wasm_bindgen]
pub fn apply_hand_landmarks(flat_data: &[f32], num_hands: usize, timestamp_ms: f64) {
    INPUT.with(|cell| {
        if let Err(err) = cell.borrow_mut().ingest(flat_data, num_hands, timestamp_ms) {
            warn!("{err}, frame ignored");
        }
    });
}

#[wasm_bindgen]
pub fn report_detector_failure(message: &str) {
    INPUT.with(|cell| cell.borrow_mut().fail(message));
}

#[wasm_bindgen]
pub fn set_demo_mode(enabled: bool) {
    INPUT.with(|cell| cell.borrow_mut().set_demo_mode(enabled));
    info!(enabled, "demo mode");
}

#[wasm_bindgen]
pub fn is_demo_mode() -> bool {
    INPUT.with(|cell| cell.borrow().demo_mode())
}

#[wasm_bindgen]
pub fn get_detector_status() -> String {
    INPUT.with(|cell| cell.borrow().status().label().to_string())
}

// ============================================================================
// INTERNAL API
// ============================================================================

/// Current hand reading and whether the synthetic pilot should replace it
pub fn current_input() -> (HandSignal, bool) {
    INPUT.with(|cell| {
        let state = cell.borrow();
        (state.signal(), state.demo_mode())
    })
}
