//! Crate error type
//!
//! The simulation itself never fails; these come from the JS boundary
//! (bad landmark buffers, bad configuration, detector start-up).

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid landmark data length: {len} (expected {expected})")]
    InvalidLandmarkData { len: usize, expected: usize },

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid frame timestamp: {0}")]
    InvalidTimestamp(f64),

    #[error("Hand detector unavailable: {0}")]
    DetectorUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
