//! Hexfall Presentation Engine
//!
//! Turns authoritative board-game snapshots into an animated, interactive
//! scene, and player gestures into move/explore intents. Everything here is
//! driven from a single per-frame clock on one logical thread; the graphics
//! backend is an opaque [`render::Renderer`] capability.
//!
//! # Modules
//!
//! - [`hex`] - Axial-coordinate geometry and hex/pixel transforms
//! - [`clock`] - The per-frame clock and manager attach/detach lifecycle
//! - [`tween`] - Keyed tween manager for named property animations
//! - [`particles`] - Particle effect archetypes (emitter, tracer, dust, portal)
//! - [`camera`] - 2D camera controller (pan, cursor-centered zoom, bounds)
//! - [`cinematic`] - Coarse-grained step sequencer for second-scale choreography
//! - [`path`] - Authoritative path reconstruction and reachability boundary
//! - [`input`] - Platform-agnostic keyboard/mouse state
//! - [`render`] - Renderer capability trait and a recording draw list
//!
//! # Example
//!
//! ```
//! use hexfall_engine::clock::FrameClock;
//! use hexfall_engine::hex::{AxialCoord, hex_to_pixel};
//! use hexfall_engine::particles::{EmitterConfig, ParticleManager};
//!
//! let mut clock = FrameClock::new();
//! let mut particles = ParticleManager::with_seed(7);
//! particles.attach(clock.handle());
//!
//! let origin = hex_to_pixel(AxialCoord::new(2, -1), 32.0);
//! particles.spawn_emitter(origin, &EmitterConfig::default());
//!
//! // One display frame: 16ms
//! clock.advance(16.0);
//! particles.tick(clock.delta_ms());
//! ```

pub mod camera;
pub mod cinematic;
pub mod clock;
pub mod hex;
pub mod input;
pub mod particles;
pub mod path;
pub mod render;
pub mod tween;

// Game-specific presentation modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export the types most callers touch every frame
pub use camera::{CameraController, CameraState};
pub use clock::{ClockHandle, FrameClock};
pub use hex::{AxialCoord, Bounds, HexDirection, hex_to_pixel, hex_vertices, pixel_to_hex};
pub use input::{InputState, KeyCode, KeyboardState, MouseButton, MouseState};
pub use particles::ParticleManager;
pub use tween::TweenManager;
