//! Camera Controller
//!
//! Owns the viewport's view transform (center + zoom) and its smooth
//! approach toward a target. Two interaction modes — idle/auto-drift and
//! pointer panning — plus a continuous approach behavior that runs in both.
//! This is window-system agnostic: input arrives as generic events from
//! [`crate::input`], and render code only reads [`CameraState`].

use glam::Vec2;

use crate::hex::Bounds;
use crate::input::{KeyboardState, MouseButton};

/// Multiplier applied to `target_zoom` per wheel line.
const ZOOM_STEP: f32 = 1.15;

/// The view transform and its animation targets.
///
/// Single instance per viewport, owned exclusively by [`CameraController`];
/// everything else reads it, nothing else writes it.
#[derive(Debug, Clone)]
pub struct CameraState {
    /// World position at the center of the viewport.
    pub center: Vec2,
    pub zoom: f32,
    pub target_center: Vec2,
    pub target_zoom: f32,
    pub is_panning: bool,
    /// Pan limits in world space. Grows as new map regions are revealed,
    /// never shrinks. `None` until the first region is known.
    pub bounds: Option<Bounds>,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

/// Camera state machine plus tuning.
///
/// Tuning fields are public: set them after construction (typically from
/// the visual config) and leave them alone.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub state: CameraState,
    /// Viewport size in pixels; update on resize.
    pub viewport: Vec2,
    /// Fraction of the remaining distance covered per 60fps frame.
    pub lerp_factor: f32,
    /// Keyboard pan speed in world units per second at zoom 1.
    pub key_pan_speed: f32,
    /// Which mouse button starts a pointer pan.
    pub pan_button: MouseButton,
    /// Pointer position when panning, for delta computation.
    pan_anchor: Option<Vec2>,
}

impl CameraController {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            state: CameraState {
                center: Vec2::ZERO,
                zoom: 1.0,
                target_center: Vec2::ZERO,
                target_zoom: 1.0,
                is_panning: false,
                bounds: None,
                min_zoom: 0.35,
                max_zoom: 3.0,
            },
            viewport,
            lerp_factor: 0.12,
            key_pan_speed: 600.0,
            pan_button: MouseButton::Middle,
            pan_anchor: None,
        }
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Per-frame update: keyboard pan plus the smooth approach to the
    /// target center/zoom.
    ///
    /// The smoothing exponent makes the approach frame-rate independent:
    /// `t = 1 - (1 - lerp_factor)^(delta_ms * 60 / 1000)` covers the same
    /// distance whether it arrives as one 16ms tick or two 8ms ticks.
    pub fn tick(&mut self, delta_ms: f32, keys: &KeyboardState) {
        let delta = delta_ms.max(0.0);

        let axis = keys.pan.vector();
        if axis != Vec2::ZERO {
            // Dividing by zoom keeps apparent pan speed constant on screen
            let step = self.key_pan_speed * delta / 1000.0 / self.state.zoom;
            self.state.target_center += axis * step;
            self.clamp_target();
        }

        let t = 1.0 - (1.0 - self.lerp_factor).powf(delta * 60.0 / 1000.0);
        self.state.center = self.state.center.lerp(self.state.target_center, t);
        self.state.zoom += (self.state.target_zoom - self.state.zoom) * t;
    }

    /// Pointer press: enter panning mode on the designated pan button.
    pub fn on_pointer_down(&mut self, pos: Vec2, button: MouseButton) {
        if button == self.pan_button {
            self.state.is_panning = true;
            self.pan_anchor = Some(pos);
        }
    }

    /// Pointer move: while panning, drag the world under the cursor.
    pub fn on_pointer_move(&mut self, pos: Vec2) {
        if !self.state.is_panning {
            return;
        }
        let Some(anchor) = self.pan_anchor else {
            return;
        };
        let delta = pos - anchor;
        self.state.target_center -= delta / self.state.zoom;
        self.pan_anchor = Some(pos);
        self.clamp_target();
    }

    /// Pointer release: exit panning mode.
    pub fn on_pointer_up(&mut self, button: MouseButton) {
        if button == self.pan_button {
            self.state.is_panning = false;
            self.pan_anchor = None;
        }
    }

    /// Cursor-centered wheel zoom: the world point under the cursor stays
    /// under the cursor across the zoom change.
    pub fn on_wheel(&mut self, scroll_lines: f32, cursor: Vec2) {
        if scroll_lines == 0.0 {
            return;
        }
        let factor = ZOOM_STEP.powf(scroll_lines);
        let new_zoom = (self.state.target_zoom * factor).clamp(self.state.min_zoom, self.state.max_zoom);

        // World point under the cursor before the change, in target space
        let offset = cursor - self.viewport * 0.5;
        let world = offset / self.state.target_zoom + self.state.target_center;

        self.state.target_zoom = new_zoom;
        self.state.target_center = world - offset / new_zoom;
        self.clamp_target();
    }

    /// Aim the camera at a world position. `instant` snaps the interpolated
    /// state too — used for first-load placement.
    pub fn center_on(&mut self, pos: Vec2, instant: bool) {
        self.state.target_center = pos;
        self.clamp_target();
        if instant {
            self.state.center = self.state.target_center;
            self.state.zoom = self.state.target_zoom;
        }
    }

    /// Grow the pan bounds to cover a newly revealed region. Bounds never
    /// shrink.
    pub fn expand_bounds(&mut self, region: Bounds) {
        self.state.bounds = Some(match self.state.bounds {
            Some(existing) => existing.union(region),
            None => region,
        });
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.state.center) * self.state.zoom + self.viewport * 0.5
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.viewport * 0.5) / self.state.zoom + self.state.center
    }

    fn clamp_target(&mut self) {
        if let Some(bounds) = self.state.bounds {
            self.state.target_center = bounds.clamp(self.state.target_center);
        }
    }
}
