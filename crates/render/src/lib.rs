//! Scene composition: camera matrices × model matrices → draw calls.
//!
//! # Invariants
//! - Composition order is `projection · view · model`, evaluated left to right.
//! - The composer never talks to a GPU; it submits [`DrawCall`]s to a
//!   [`DrawTarget`]. Backends replay the calls.
//! - A uniform missing from the bound shader is a warning, never an error: the
//!   draw is still submitted without the uniform update.

mod composer;
mod draw;

pub use composer::{DrawStrategy, SceneComposer};
pub use draw::{DrawCall, DrawList, DrawTarget, Instances, MeshHandle, Program, UniformTable, UniformWrite};

/// Uniform holding the shared view-projection matrix for instanced draws.
pub const VIEW_PROJ_UNIFORM: &str = "view_proj";
/// Uniform holding a complete model-view-projection matrix for a single draw.
pub const MVP_UNIFORM: &str = "mvp";

pub fn crate_info() -> &'static str {
    "orbitview-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
