//! Mouse Input Module
//!
//! Mouse state tracking for position, buttons, and scroll wheel, decoupled
//! from winit to use generic types. Positions are in raw pixel coordinates
//! with the origin at the top-left, matching the camera's screen space.

use glam::Vec2;

/// Mouse button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Additional mouse buttons (button 4, 5, etc.)
    Other(u16),
}

/// State of all mouse buttons.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonState {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl ButtonState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update button state for a specific button.
    pub fn set(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left = pressed,
            MouseButton::Middle => self.middle = pressed,
            MouseButton::Right => self.right = pressed,
            MouseButton::Other(_) => {} // Ignore extra buttons for now
        }
    }

    pub fn any_pressed(&self) -> bool {
        self.left || self.middle || self.right
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
            MouseButton::Other(_) => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Scroll wheel delta, line-based or pixel-based at the source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollDelta {
    /// Horizontal scroll (positive = right)
    pub x: f32,
    /// Vertical scroll (positive = up/forward)
    pub y: f32,
}

impl ScrollDelta {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// From a line delta (common for mouse wheels).
    pub fn from_lines(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// From a pixel delta (common for trackpads), normalized to approximate
    /// line equivalents.
    pub fn from_pixels(x: f64, y: f64) -> Self {
        Self {
            x: (x / 100.0) as f32,
            y: (y / 100.0) as f32,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Complete mouse state tracking.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// Current position in pixels; `None` until the first move event.
    pub position: Option<Vec2>,
    /// Previous position for delta calculations.
    pub last_position: Option<Vec2>,
    pub buttons: ButtonState,
    /// Most recent scroll wheel delta.
    pub scroll: ScrollDelta,
    pub in_window: bool,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update position from a pixel-coordinate move event.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.last_position = self.position;
        self.position = Some(Vec2::new(x, y));
    }

    /// Position delta since the last move event.
    pub fn delta(&self) -> Option<Vec2> {
        match (self.position, self.last_position) {
            (Some(current), Some(last)) => Some(current - last),
            _ => None,
        }
    }

    /// Handle a mouse button press/release event.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        self.buttons.set(button, pressed);

        // Clear last position when releasing a pan button to prevent a
        // jump when re-pressing
        if !pressed && matches!(button, MouseButton::Middle | MouseButton::Right) {
            self.last_position = None;
        }
    }

    pub fn set_scroll(&mut self, delta: ScrollDelta) {
        self.scroll = delta;
    }

    /// Consume the scroll delta; call once per frame after processing.
    pub fn take_scroll(&mut self) -> ScrollDelta {
        std::mem::take(&mut self.scroll)
    }

    pub fn enter_window(&mut self) {
        self.in_window = true;
    }

    /// Positions are cleared on leave so a stale hover cannot survive the
    /// cursor going away.
    pub fn leave_window(&mut self) {
        self.in_window = false;
        self.position = None;
        self.last_position = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
