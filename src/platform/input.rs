//! Keyboard snapshot consumed by entity behaviours

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
}

/// Keys held down during the current frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    down: HashSet<Key>,
}

impl InputSnapshot {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            down: keys.into_iter().collect(),
        }
    }

    /// Builder-style helper for tests and scripted input
    pub fn with_key(mut self, key: Key) -> Self {
        self.down.insert(key);
        self
    }

    #[inline]
    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Raw WASD direction (not normalized, screen space: W is -Y)
    pub fn movement_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.is_down(Key::W) {
            axis.y = -1.0;
        }
        if self.is_down(Key::A) {
            axis.x = -1.0;
        }
        if self.is_down(Key::S) {
            axis.y = 1.0;
        }
        if self.is_down(Key::D) {
            axis.x = 1.0;
        }
        axis
    }

    /// First held arrow key as a fire direction (Left, Up, Right, Down priority)
    pub fn fire_direction(&self) -> Option<Vec2> {
        [
            (Key::Left, Vec2::new(-1.0, 0.0)),
            (Key::Up, Vec2::new(0.0, -1.0)),
            (Key::Right, Vec2::new(1.0, 0.0)),
            (Key::Down, Vec2::new(0.0, 1.0)),
        ]
        .into_iter()
        .find(|(key, _)| self.is_down(*key))
        .map(|(_, dir)| dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_axis() {
        let input = InputSnapshot::default().with_key(Key::W).with_key(Key::D);
        assert_eq!(input.movement_axis(), Vec2::new(1.0, -1.0));
        assert_eq!(InputSnapshot::default().movement_axis(), Vec2::ZERO);
    }

    #[test]
    fn test_fire_direction_priority() {
        let input = InputSnapshot::new([Key::Down, Key::Left]);
        assert_eq!(input.fire_direction(), Some(Vec2::new(-1.0, 0.0)));
        assert_eq!(InputSnapshot::new([Key::W]).fire_direction(), None);
    }
}
