//! Scenes Module
//!
//! Scene composition: the board scene wires the animation stack (camera,
//! tweens, particles, sequencer) to the snapshot model and turns gestures
//! into intents.

pub mod board_scene;

pub use board_scene::{BoardScene, SceneObjects, SceneServices, SnapshotChange, Visual};
