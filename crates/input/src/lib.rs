//! Input: window-agnostic key state mapped to demo actions.
//!
//! # Invariants
//! - Held actions are derived from the current key state every tick.
//! - Edge-triggered actions fire once per physical press, never while held.
//! - Edge state lives in [`EdgeDetector`], not in the toggled feature.

pub mod action;
pub mod bindings;
pub mod edge;
pub mod keys;

pub use action::Action;
pub use bindings::{Binding, KeyBindings, Trigger};
pub use edge::EdgeDetector;
pub use keys::{Key, KeyState};

pub fn crate_info() -> &'static str {
    "orbitview-input v0.1.0"
}
