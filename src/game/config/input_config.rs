//! Input Configuration
//!
//! Defines gesture bindings as a data structure, enabling future remapping
//! and centralizing input documentation. The scene never hardcodes button
//! matches.

use crate::input::MouseButton;

/// Mouse gesture bindings.
#[derive(Clone, Debug)]
pub struct GestureBindings {
    /// Clicking a legal target emits the corresponding intent.
    pub select: MouseButton,
    /// Hold-and-drag pans the camera.
    pub pan: MouseButton,
}

/// Input configuration for the board scene.
#[derive(Clone, Debug)]
pub struct InputConfig {
    pub gestures: GestureBindings,
    /// Maximum pointer travel in pixels for a press/release to count as a
    /// click rather than a drag.
    pub click_slop_px: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            gestures: GestureBindings {
                select: MouseButton::Left,
                pan: MouseButton::Middle,
            },
            click_slop_px: 6.0,
        }
    }
}
