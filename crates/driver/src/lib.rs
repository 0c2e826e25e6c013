//! Frame driver for the orbitview demo.
//!
//! Owns the application state explicitly (no globals) and runs one tick per
//! frame: edge-triggered toggles first, then time and held-input updates,
//! then composition into a [`orbitview_render::DrawTarget`]. Window-side
//! consequences come back as [`FrameEffects`] for the embedding app to apply.
//!
//! # Invariants
//! - Once [`DriverState::Closing`] is entered the driver never ticks again.
//! - The edge detector is updated exactly once per tick.

pub mod clock;
pub mod config;
pub mod driver;
pub mod state;

pub use clock::{FrameClock, MAX_DELTA, Pacing};
pub use config::{
    AssetPaths, CameraConfig, ConfigError, DemoConfig, InstanceConfig, ObjectConfig, WindowConfig,
};
pub use driver::{DriverState, FrameDriver, FrameEffects};
pub use state::{AppState, SceneMeshes, Toggles};

pub fn crate_info() -> &'static str {
    "orbitview-driver v0.1.0"
}
