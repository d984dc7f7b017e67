//! CyberArm Web - gesture-driven robot arm pick-and-throw game
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod bridge;
pub mod config;
pub mod error;
pub mod physics;

#[cfg(target_arch = "wasm32")]
mod renderer;

use wasm_bindgen::prelude::*;

pub use config::GameConfig;
pub use error::{Error, Result};
pub use physics::{tick, FrameReport, HandSignal, World};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();
}

/// Initialize WebGPU on the given canvas - must be called before render_frame
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn init(canvas_id: String, width: u32, height: u32) -> std::result::Result<(), JsValue> {
    renderer::initialize_gpu(&canvas_id, width, height).await?;
    tracing::info!(canvas = %canvas_id, width, height, "WebGPU initialized");
    Ok(())
}

/// Render one frame of the current game state
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_frame() {
    renderer::render_frame();
}
