use std::collections::HashSet;

use crate::action::Action;
use crate::edge::EdgeDetector;
use crate::keys::{Key, KeyState};

/// How a binding fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Active every tick the key is down.
    Held,
    /// Fires once on the press transition.
    Press,
}

/// One key-to-action mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub key: Key,
    pub action: Action,
    pub trigger: Trigger,
}

impl Binding {
    pub const fn held(key: Key, action: Action) -> Self {
        Self {
            key,
            action,
            trigger: Trigger::Held,
        }
    }

    pub const fn press(key: Key, action: Action) -> Self {
        Self {
            key,
            action,
            trigger: Trigger::Press,
        }
    }
}

/// Key binding table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<Binding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new(vec![
            Binding::held(Key::ArrowLeft, Action::OrbitLeft),
            Binding::held(Key::ArrowRight, Action::OrbitRight),
            Binding::held(Key::ArrowUp, Action::ZoomIn),
            Binding::held(Key::ArrowDown, Action::ZoomOut),
            Binding::held(Key::ShiftLeft, Action::Boost),
            Binding::held(Key::W, Action::ObjectRight),
            Binding::held(Key::S, Action::ObjectLeft),
            Binding::held(Key::A, Action::ObjectForward),
            Binding::held(Key::D, Action::ObjectBack),
            Binding::held(Key::E, Action::ObjectUp),
            Binding::held(Key::Q, Action::ObjectDown),
            Binding::press(Key::Digit1, Action::ToggleCursor),
            Binding::press(Key::Digit2, Action::ToggleWireframe),
            Binding::press(Key::Digit3, Action::LogCursor),
            Binding::press(Key::Space, Action::ToggleCameraMode),
            Binding::press(Key::Escape, Action::Quit),
        ])
    }
}

impl KeyBindings {
    /// Build a table from explicit bindings. One-shot actions bound as
    /// [`Trigger::Held`] are promoted to [`Trigger::Press`].
    pub fn new(bindings: Vec<Binding>) -> Self {
        let bindings = bindings
            .into_iter()
            .map(|mut b| {
                if b.action.is_one_shot() && b.trigger == Trigger::Held {
                    tracing::debug!(action = ?b.action, "one-shot action bound as held, using press trigger");
                    b.trigger = Trigger::Press;
                }
                b
            })
            .collect();
        Self { bindings }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Edge detector watching every press-triggered key in this table.
    pub fn edge_detector(&self) -> EdgeDetector {
        EdgeDetector::new(
            self.bindings
                .iter()
                .filter(|b| b.trigger == Trigger::Press)
                .map(|b| b.key),
        )
    }

    /// Actions active this tick because their key is held.
    pub fn held_actions(&self, keys: &KeyState) -> HashSet<Action> {
        self.bindings
            .iter()
            .filter(|b| b.trigger == Trigger::Held && keys.is_down(b.key))
            .map(|b| b.action)
            .collect()
    }

    /// Map press edges reported by an [`EdgeDetector`] to actions, preserving
    /// the order of `pressed`.
    pub fn press_actions(&self, pressed: &[Key]) -> Vec<Action> {
        pressed
            .iter()
            .flat_map(|key| {
                self.bindings
                    .iter()
                    .filter(move |b| b.trigger == Trigger::Press && b.key == *key)
                    .map(|b| b.action)
            })
            .collect()
    }
}
