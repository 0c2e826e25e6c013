//! Shared value types used across the orbitview crates.

pub mod types;

pub use types::{ScreenRect, Transform, Viewport};

pub fn crate_info() -> &'static str {
    "orbitview-common v0.1.0"
}
