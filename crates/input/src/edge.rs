use std::collections::HashSet;

use crate::keys::{Key, KeyState};

/// Press-edge detector over a fixed set of watched keys.
///
/// Holds the previous tick's state for each watched key. [`EdgeDetector::update`]
/// is called exactly once per tick; a key reports a press only on the tick it
/// goes from up to down.
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    watched: Vec<Key>,
    previous: HashSet<Key>,
}

impl EdgeDetector {
    pub fn new(watched: impl IntoIterator<Item = Key>) -> Self {
        let mut watched: Vec<Key> = watched.into_iter().collect();
        watched.sort();
        watched.dedup();
        Self {
            watched,
            previous: HashSet::new(),
        }
    }

    /// Compare `keys` to the previous tick and return newly pressed keys,
    /// in a stable order.
    pub fn update(&mut self, keys: &KeyState) -> Vec<Key> {
        let mut pressed = Vec::new();
        for &key in &self.watched {
            let down = keys.is_down(key);
            let was_down = self.previous.contains(&key);
            if down && !was_down {
                pressed.push(key);
            }
            if down {
                self.previous.insert(key);
            } else {
                self.previous.remove(&key);
            }
        }
        pressed
    }

    /// Forget previous states. Used with [`KeyState::clear`] on focus loss so
    /// a key still down when focus returns fires as a fresh press.
    pub fn reset(&mut self) {
        self.previous.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_press() {
        let mut edges = EdgeDetector::new([Key::Space]);
        let mut keys = KeyState::new();

        keys.press(Key::Space);
        assert_eq!(edges.update(&keys), vec![Key::Space]);
        // Still held on the following ticks.
        assert!(edges.update(&keys).is_empty());
        assert!(edges.update(&keys).is_empty());

        keys.release(Key::Space);
        assert!(edges.update(&keys).is_empty());

        keys.press(Key::Space);
        assert_eq!(edges.update(&keys), vec![Key::Space]);
    }

    #[test]
    fn ignores_unwatched_keys() {
        let mut edges = EdgeDetector::new([Key::Digit1]);
        let mut keys = KeyState::new();
        keys.press(Key::W);
        assert!(edges.update(&keys).is_empty());
    }

    #[test]
    fn simultaneous_presses_are_ordered() {
        let mut edges = EdgeDetector::new([Key::Space, Key::Digit2, Key::Digit1]);
        let mut keys = KeyState::new();
        keys.press(Key::Space);
        keys.press(Key::Digit1);
        assert_eq!(edges.update(&keys), vec![Key::Digit1, Key::Space]);
    }
}
