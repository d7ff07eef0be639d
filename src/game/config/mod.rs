//! Config Module
//!
//! Centralized visual and input tuning for the board scene.

pub mod input_config;
pub mod visual_config;

pub use input_config::InputConfig;
pub use visual_config::{CameraTuning, VisualConfig};
