//! Choreography Demo - Headless Scene Driver
//!
//! Run with: `cargo run --bin choreo-demo`
//!
//! Drives the board scene through a scripted session without a window:
//! first load with a portal entrance, a reveal wave, an exploration, a
//! click on a move target, and the resulting token walk. Each phase is
//! stepped at a fixed 60fps and the recorded draw calls are summarized, so
//! the whole animation stack can be exercised (and profiled) from a
//! terminal.

use anyhow::Result;
use glam::Vec2;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use hexfall_engine::game::config::{InputConfig, VisualConfig};
use hexfall_engine::game::scenes::BoardScene;
use hexfall_engine::game::state::BoardSnapshot;
use hexfall_engine::hex::{AxialCoord, hex_to_pixel};
use hexfall_engine::input::MouseButton;
use hexfall_engine::render::DrawList;

const FRAME_MS: f32 = 1000.0 / 60.0;

const FIRST_LOAD: &str = r#"{
    "turn": 1,
    "tiles": [
        {"id": "start", "center": {"q": 0, "r": 0}},
        {"id": "countryside-1", "center": {"q": 4, "r": -2}}
    ],
    "enemies": [
        {"id": "orc-1", "hex": {"q": 3, "r": -1}, "color": "green", "revealed": false}
    ],
    "players": [{"id": "p1", "hex": {"q": 0, "r": 0}, "isActive": true}],
    "legalMoves": {
        "moveTargets": [{"hex": {"q": 1, "r": 0}, "cost": 2}],
        "reachable": [
            {"hex": {"q": 1, "r": 0}, "totalCost": 2, "isTerminal": false},
            {"hex": {"q": 2, "r": 0}, "totalCost": 4, "isTerminal": true,
             "cameFrom": {"q": 1, "r": 0}}
        ]
    }
}"#;

const EXPLORATION: &str = r#"{
    "turn": 2,
    "tiles": [
        {"id": "start", "center": {"q": 0, "r": 0}},
        {"id": "countryside-1", "center": {"q": 4, "r": -2}},
        {"id": "forest-1", "center": {"q": -3, "r": 4}}
    ],
    "enemies": [
        {"id": "orc-1", "hex": {"q": 3, "r": -1}, "color": "green", "revealed": true}
    ],
    "players": [{"id": "p1", "hex": {"q": 0, "r": 0}, "isActive": true}],
    "legalMoves": {
        "moveTargets": [{"hex": {"q": 1, "r": 0}, "cost": 2}],
        "reachable": [
            {"hex": {"q": 1, "r": 0}, "totalCost": 2, "isTerminal": false}
        ]
    }
}"#;

const AFTER_MOVE: &str = r#"{
    "turn": 3,
    "tiles": [
        {"id": "start", "center": {"q": 0, "r": 0}},
        {"id": "countryside-1", "center": {"q": 4, "r": -2}},
        {"id": "forest-1", "center": {"q": -3, "r": 4}}
    ],
    "enemies": [
        {"id": "orc-1", "hex": {"q": 3, "r": -1}, "color": "green", "revealed": true}
    ],
    "players": [{"id": "p1", "hex": {"q": 1, "r": 0}, "isActive": true}]
}"#;

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Debug).init()?;

    let mut scene = BoardScene::new(
        Vec2::new(1280.0, 720.0),
        VisualConfig::default(),
        InputConfig::default(),
    );

    info!("== first load ==");
    scene.apply_snapshot(BoardSnapshot::from_json(FIRST_LOAD)?);
    run_phase(&mut scene, 180);

    info!("== exploration ==");
    scene.apply_snapshot(BoardSnapshot::from_json(EXPLORATION)?);
    run_phase(&mut scene, 180);

    info!("== player clicks a move target ==");
    let target = AxialCoord::new(1, 0);
    let screen = scene
        .services
        .camera
        .world_to_screen(hex_to_pixel(target, scene.visuals.hex_size));
    scene.on_mouse_move(screen.x, screen.y);
    scene.on_mouse_button(MouseButton::Left, true);
    scene.on_mouse_button(MouseButton::Left, false);
    for intent in scene.take_intents() {
        info!("intent emitted: {intent:?}");
    }

    info!("== rule engine confirms the move ==");
    scene.apply_snapshot(BoardSnapshot::from_json(AFTER_MOVE)?);
    run_phase(&mut scene, 120);

    info!("demo complete");
    Ok(())
}

/// Step the scene at 60fps for `frames`, logging a summary every second.
fn run_phase(scene: &mut BoardScene, frames: u32) {
    for frame in 0..frames {
        scene.frame(FRAME_MS);
        if frame % 60 == 59 {
            let mut draws = DrawList::new();
            scene.render(&mut draws);
            info!(
                "t+{:.1}s: {} effects / {} particles / {} tweens / {} draw calls",
                (frame + 1) as f32 / 60.0,
                scene.services.particles.active_effects(),
                scene.services.particles.particle_count(),
                scene.services.tweens.len(),
                draws.len(),
            );
        }
    }
}
