//! Input Module
//!
//! Platform-agnostic input handling for keyboard and mouse. Decoupled from
//! any specific windowing system so the scene layer can be driven by a real
//! event loop, a replay, or a test harness interchangeably.
//!
//! # Example
//!
//! ```rust,ignore
//! use hexfall_engine::input::{InputState, KeyCode, MouseButton};
//!
//! let mut input = InputState::new();
//! input.keyboard.handle_key(KeyCode::W, true);
//! input.mouse.set_position(100.0, 50.0);
//! input.mouse.set_button(MouseButton::Left, true);
//! ```

pub mod keyboard;
pub mod mouse;

pub use keyboard::{KeyCode, KeyboardState, ModifierState, PanKeys};
pub use mouse::{ButtonState, MouseButton, MouseState, ScrollDelta};

/// Combined keyboard and mouse state, one instance per window.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release everything, e.g. on focus loss.
    pub fn reset(&mut self) {
        self.keyboard.reset();
        self.mouse.reset();
    }
}
