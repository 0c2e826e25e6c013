use std::collections::HashSet;

/// Keys the demo reacts to. Windowing backends map their own key codes here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    ShiftLeft,
    W,
    A,
    S,
    D,
    Q,
    E,
    Digit1,
    Digit2,
    Digit3,
    Space,
    Escape,
}

impl Key {
    /// Parse a key name such as `left`, `shift`, `w` or `1` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "left" | "arrowleft" => Key::ArrowLeft,
            "right" | "arrowright" => Key::ArrowRight,
            "up" | "arrowup" => Key::ArrowUp,
            "down" | "arrowdown" => Key::ArrowDown,
            "shift" | "shiftleft" => Key::ShiftLeft,
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "q" => Key::Q,
            "e" => Key::E,
            "1" => Key::Digit1,
            "2" => Key::Digit2,
            "3" => Key::Digit3,
            "space" => Key::Space,
            "escape" | "esc" => Key::Escape,
            _ => return None,
        };
        Some(key)
    }
}

/// Snapshot of the keyboard and cursor, polled once per tick.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Key>,
    cursor: (f64, f64),
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press or release for `key`.
    pub fn set(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set(key, false);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Release every key, e.g. after the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Cursor position in window pixels, top-left origin.
    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut keys = KeyState::new();
        keys.press(Key::W);
        assert!(keys.is_down(Key::W));
        assert!(!keys.is_down(Key::S));
        keys.release(Key::W);
        assert!(!keys.is_down(Key::W));
    }

    #[test]
    fn clear_releases_everything() {
        let mut keys = KeyState::new();
        keys.press(Key::ArrowLeft);
        keys.press(Key::ShiftLeft);
        keys.clear();
        assert!(!keys.is_down(Key::ArrowLeft));
        assert!(!keys.is_down(Key::ShiftLeft));
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("Left"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_name("shift"), Some(Key::ShiftLeft));
        assert_eq!(Key::from_name("2"), Some(Key::Digit2));
        assert_eq!(Key::from_name("f1"), None);
    }

    #[test]
    fn cursor_defaults_to_origin() {
        let mut keys = KeyState::new();
        assert_eq!(keys.cursor(), (0.0, 0.0));
        keys.set_cursor(12.5, 40.0);
        assert_eq!(keys.cursor(), (12.5, 40.0));
    }
}
