//! Renderer module - WebGPU rendering of the arm and playfield
//!
//! Re-exports only. All logic in submodules.

mod scene;
mod shapes;
mod state;

pub use scene::render_frame;
pub use state::{initialize_gpu, GpuStateError};
