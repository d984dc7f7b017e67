//! Hand signal - the single control input read by every object in a tick

use glam::DVec2;

/// Latest hand reading from the detector (or the synthetic pilot)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandSignal {
    /// Index fingertip in normalized camera coordinates (0-1), raw (not
    /// mirrored). `None` when no hand is detected.
    pub position: Option<DVec2>,

    /// Thumb and index tips pinched together
    pub is_gripping: bool,
}

impl HandSignal {
    /// No hand in view
    pub const ABSENT: HandSignal = HandSignal {
        position: None,
        is_gripping: false,
    };

    pub fn new(position: DVec2, is_gripping: bool) -> Self {
        Self {
            position: Some(position),
            is_gripping,
        }
    }
}
