//! wgpu render backend for orbitview.
//!
//! Meshes, textures and the instance table are uploaded once at startup.
//! Each frame the backend replays a [`orbitview_render::DrawList`] recorded
//! by the scene composer, so nothing in here decides *what* gets drawn.
//!
//! # Invariants
//! - The instance buffer is written once and never updated.
//! - A draw whose uniform was not found reuses the value last written for
//!   that program, matching the composer's "draw proceeds" contract.

mod context;
mod error;
mod gpu;
mod shaders;

pub use context::GpuContext;
pub use error::RenderError;
pub use gpu::WgpuRenderer;

pub fn crate_info() -> &'static str {
    "orbitview-render-wgpu v0.1.0"
}
