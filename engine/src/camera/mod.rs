//! Camera control for the 2D board viewport.

mod controller;

pub use controller::{CameraController, CameraState};
