//! Keyboard Input Module
//!
//! Keyboard state tracking for camera panning and shortcut keys, decoupled
//! from winit so the scene can be driven headlessly.

use glam::Vec2;

/// Generic key codes, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Pan keys
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Shortcuts
    Escape,
    Enter,
    Space,
    Tab,

    // Modifiers
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,

    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,

    /// Catch-all for unhandled keys.
    Unknown,
}

/// Tracks the camera pan keys (WASD plus arrows) while held.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl PanKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update pan state for a key press/release.
    ///
    /// Returns `true` if the key was a pan key and was handled.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W | KeyCode::ArrowUp => {
                self.up = pressed;
                true
            }
            KeyCode::S | KeyCode::ArrowDown => {
                self.down = pressed;
                true
            }
            KeyCode::A | KeyCode::ArrowLeft => {
                self.left = pressed;
                true
            }
            KeyCode::D | KeyCode::ArrowRight => {
                self.right = pressed;
                true
            }
            _ => false,
        }
    }

    /// Pan direction in screen space (+x right, +y down), unnormalized:
    /// each axis is -1, 0 or 1.
    pub fn vector(&self) -> Vec2 {
        Vec2::new(
            (self.right as i32 - self.left as i32) as f32,
            (self.down as i32 - self.up as i32) as f32,
        )
    }

    pub fn any_pressed(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// State of keyboard modifier keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifierState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }
}

/// Complete keyboard state tracking.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pub pan: PanKeys,
    pub modifiers: ModifierState,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a key event to pan and modifier tracking.
    ///
    /// Returns `true` if the key was recognized.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.modifiers.shift = pressed;
                true
            }
            KeyCode::ControlLeft | KeyCode::ControlRight => {
                self.modifiers.ctrl = pressed;
                true
            }
            KeyCode::AltLeft | KeyCode::AltRight => {
                self.modifiers.alt = pressed;
                true
            }
            key => self.pan.handle_key(key, pressed),
        }
    }

    /// Release all keys, e.g. on window focus loss.
    pub fn reset(&mut self) {
        self.pan.reset();
        self.modifiers = ModifierState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_vector_axes() {
        let mut keys = KeyboardState::new();
        assert_eq!(keys.pan.vector(), Vec2::ZERO);

        keys.handle_key(KeyCode::D, true);
        assert_eq!(keys.pan.vector(), Vec2::new(1.0, 0.0));

        keys.handle_key(KeyCode::W, true);
        assert_eq!(keys.pan.vector(), Vec2::new(1.0, -1.0));

        // Opposite keys cancel
        keys.handle_key(KeyCode::A, true);
        assert_eq!(keys.pan.vector(), Vec2::new(0.0, -1.0));

        keys.handle_key(KeyCode::D, false);
        assert_eq!(keys.pan.vector(), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_arrows_alias_wasd() {
        let mut keys = KeyboardState::new();
        keys.handle_key(KeyCode::ArrowRight, true);
        assert!(keys.pan.right);
        keys.handle_key(KeyCode::ArrowRight, false);
        assert!(!keys.pan.right);
    }

    #[test]
    fn test_modifiers_tracked_separately() {
        let mut keys = KeyboardState::new();
        assert!(keys.handle_key(KeyCode::ShiftLeft, true));
        assert!(keys.modifiers.shift);
        assert!(!keys.pan.any_pressed());

        keys.reset();
        assert!(keys.modifiers.is_empty());
    }

    #[test]
    fn test_unknown_key_unhandled() {
        let mut keys = KeyboardState::new();
        assert!(!keys.handle_key(KeyCode::Unknown, true));
    }
}
