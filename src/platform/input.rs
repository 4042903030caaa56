//! Keyboard input
//!
//! Browser key events update a set of held logical keys; the frame driver
//! samples it once per frame into a `TickInput`.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
}

impl Key {
    /// Map a `KeyboardEvent.code` to a logical key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyA" | "ArrowLeft" => Some(Key::Left),
            "KeyD" | "ArrowRight" => Some(Key::Right),
            "KeyW" | "ArrowUp" | "Space" => Some(Key::Jump),
            _ => None,
        }
    }
}

/// Codes whose browser default action (scrolling) must be suppressed
pub fn should_prevent_default(code: &str) -> bool {
    matches!(code, "ArrowLeft" | "ArrowRight" | "ArrowUp" | "Space")
}

/// Currently held keys, by physical code
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: &str) {
        self.held.insert(code.to_owned());
    }

    pub fn release(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Drop everything (window blur: keyup events never arrive)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.iter().any(|code| Key::from_code(code) == Some(key))
    }

    /// Sample the held keys for one frame
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            jump: self.is_held(Key::Jump),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_code("KeyA"), Some(Key::Left));
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::Right));
        assert_eq!(Key::from_code("Space"), Some(Key::Jump));
        assert_eq!(Key::from_code("KeyW"), Some(Key::Jump));
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    #[test]
    fn test_prevent_default() {
        assert!(should_prevent_default("Space"));
        assert!(should_prevent_default("ArrowUp"));
        assert!(!should_prevent_default("KeyW"));
    }

    #[test]
    fn test_snapshot_tracks_press_release() {
        let mut input = InputState::new();
        input.press("ArrowLeft");
        input.press("Space");
        assert_eq!(
            input.snapshot(),
            TickInput {
                left: true,
                right: false,
                jump: true
            }
        );

        input.release("Space");
        assert!(!input.snapshot().jump);

        // Either binding keeps the key held
        input.press("KeyA");
        input.release("ArrowLeft");
        assert!(input.snapshot().left);

        input.clear();
        assert_eq!(input.snapshot(), TickInput::default());
    }
}
