//! Scene state: orbit camera, static instance table, moving object, overlay quad.
//!
//! # Invariants
//! - Camera position is always derived from (radius, angle); never set directly.
//! - The cached view matrix is recomputed on every update that moves the camera.
//! - The instance table is generated once and never mutated afterwards.
//! - Nothing here touches the GPU; the composer and backend consume these values.

pub mod camera;
pub mod instances;
pub mod object;
pub mod overlay;

pub use camera::{CameraInput, OrbitCamera};
pub use instances::{InstanceParams, InstanceTable, SplitMix64};
pub use object::{MovingObject, ObjectInput};
pub use overlay::OverlayQuad;

pub fn crate_info() -> &'static str {
    "orbitview-scene v0.1.0"
}
