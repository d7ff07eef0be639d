//! BoardScene — high-level composition of the presentation stack.
//!
//! Owns the camera, tween manager, particle manager, cinematic sequencer,
//! and the animatable scene objects. Snapshots from the rule engine arrive
//! through [`apply_snapshot`](BoardScene::apply_snapshot); the scene diffs
//! them, classifies the change, and choreographs the response. Gestures
//! arrive through the `on_*` event methods and come back out as
//! [`PlayerIntent`]s. **No graphics imports** — rendering goes through the
//! opaque renderer capability.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use glam::Vec2;
use log::{debug, info};

use crate::camera::CameraController;
use crate::cinematic::{CinematicSequence, CinematicSequencer};
use crate::clock::FrameClock;
use crate::hex::{
    AxialCoord, HexDirection, bounds_of, hex_to_pixel, hex_vertices, pixel_to_hex,
};
use crate::input::{InputState, KeyCode, KeyboardState, MouseButton, ScrollDelta};
use crate::particles::ParticleManager;
use crate::path::{BoundaryEdge, boundary_edges, chain_outline, reconstruct_path};
use crate::render::Renderer;
use crate::tween::{TargetId, TweenManager, TweenScene, TweenSpec, TweenTarget, easing};

use crate::game::assets::TextureCache;
use crate::game::config::{InputConfig, VisualConfig};
use crate::game::intents::{HoverEvent, PlayerIntent};
use crate::game::state::{BoardSnapshot, SiteAction};

/// Duration of a tile/enemy reveal pop.
const REVEAL_MS: f32 = 300.0;

/// An animatable scene object: a tile, token, or overlay element.
#[derive(Debug, Clone)]
pub struct Visual {
    pub pos: Vec2,
    pub scale: f32,
    pub alpha: f32,
}

impl TweenTarget for Visual {
    fn read(&self, prop: &'static str) -> Option<f32> {
        match prop {
            "x" => Some(self.pos.x),
            "y" => Some(self.pos.y),
            "scale" => Some(self.scale),
            "alpha" => Some(self.alpha),
            _ => None,
        }
    }

    fn write(&mut self, prop: &'static str, value: f32) {
        match prop {
            "x" => self.pos.x = value,
            "y" => self.pos.y = value,
            "scale" => self.scale = value,
            "alpha" => self.alpha = value,
            _ => {}
        }
    }
}

/// All animatable objects, addressable by name and by opaque tween id.
///
/// Objects removed mid-animation simply stop resolving; in-flight tweens on
/// them are dropped silently by the tween manager.
#[derive(Debug, Default)]
pub struct SceneObjects {
    visuals: HashMap<u64, Visual>,
    by_name: HashMap<String, u64>,
    next_id: u64,
}

impl SceneObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the object, returning its tween id. A fresh object
    /// starts hidden so reveals can animate it in.
    pub fn ensure(&mut self, name: &str, pos: Vec2) -> TargetId {
        if let Some(&id) = self.by_name.get(name) {
            return TargetId(id);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.by_name.insert(name.to_string(), id);
        self.visuals.insert(
            id,
            Visual {
                pos,
                scale: 0.6,
                alpha: 0.0,
            },
        );
        TargetId(id)
    }

    pub fn id_of(&self, name: &str) -> Option<TargetId> {
        self.by_name.get(name).copied().map(TargetId)
    }

    pub fn get(&self, name: &str) -> Option<&Visual> {
        self.by_name.get(name).and_then(|id| self.visuals.get(id))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Visual> {
        self.by_name.get(name).and_then(|id| self.visuals.get_mut(id))
    }

    pub fn remove(&mut self, name: &str) {
        if let Some(id) = self.by_name.remove(name) {
            self.visuals.remove(&id);
        }
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }
}

impl TweenScene for SceneObjects {
    fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn TweenTarget> {
        self.visuals
            .get_mut(&id.0)
            .map(|v| v as &mut dyn TweenTarget)
    }
}

/// The mutable animation stack handed to cinematic steps.
pub struct SceneServices {
    pub camera: CameraController,
    pub tweens: TweenManager,
    pub particles: ParticleManager,
    pub objects: SceneObjects,
}

/// How a new snapshot differs from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotChange {
    /// No previous snapshot: place everything and run the entrance.
    FirstLoad,
    /// New tiles appeared: pan over and reveal them in a wave.
    Exploration,
    /// Anything else: token moves, legal-move refresh.
    Routine,
}

impl SnapshotChange {
    pub fn classify(previous: Option<&BoardSnapshot>, next: &BoardSnapshot) -> Self {
        match previous {
            None => SnapshotChange::FirstLoad,
            Some(prev) if !next.new_tiles(prev).is_empty() => SnapshotChange::Exploration,
            Some(_) => SnapshotChange::Routine,
        }
    }
}

/// Complete board scene composing the animation stack.
///
/// Created once per view. Feed it events (`on_mouse_*`, `on_key`,
/// `apply_snapshot`), pump [`frame`](BoardScene::frame) once per display
/// frame, then [`render`](BoardScene::render) and drain
/// [`take_intents`](BoardScene::take_intents).
pub struct BoardScene {
    pub visuals: VisualConfig,
    pub input_config: InputConfig,
    pub services: SceneServices,
    pub textures: TextureCache,

    sequencer: CinematicSequencer<SceneServices>,
    clock: FrameClock,
    now_ms: f64,
    input: InputState,

    snapshot: Option<BoardSnapshot>,
    boundary: Vec<BoundaryEdge>,

    intents: Vec<PlayerIntent>,
    hover: Option<HoverEvent>,
    /// Pointer position at select-press, for click-slop rejection.
    press_pos: Option<Vec2>,
    /// Set by the portal's hero-emerge callback; consumed next frame.
    hero_emerged: Rc<Cell<bool>>,
}

impl BoardScene {
    pub fn new(viewport: Vec2, visuals: VisualConfig, input_config: InputConfig) -> Self {
        let clock = FrameClock::new();

        let mut camera = CameraController::new(viewport);
        camera.lerp_factor = visuals.camera.lerp_factor;
        camera.key_pan_speed = visuals.camera.key_pan_speed;
        camera.state.min_zoom = visuals.camera.min_zoom;
        camera.state.max_zoom = visuals.camera.max_zoom;
        camera.pan_button = input_config.gestures.pan;

        let mut particles = ParticleManager::new();
        particles.attach(clock.handle());

        Self {
            visuals,
            input_config,
            services: SceneServices {
                camera,
                tweens: TweenManager::new(),
                particles,
                objects: SceneObjects::new(),
            },
            textures: TextureCache::new(),
            sequencer: CinematicSequencer::new(),
            clock,
            now_ms: 0.0,
            input: InputState::new(),
            snapshot: None,
            boundary: Vec::new(),
            intents: Vec::new(),
            hover: None,
            press_pos: None,
            hero_emerged: Rc::new(Cell::new(false)),
        }
    }

    // --- Snapshot ingestion ---

    /// Ingest a new authoritative snapshot and choreograph the change.
    pub fn apply_snapshot(&mut self, snapshot: BoardSnapshot) {
        let change = SnapshotChange::classify(self.snapshot.as_ref(), &snapshot);
        info!("snapshot turn {} applied: {:?}", snapshot.turn, change);

        match change {
            SnapshotChange::FirstLoad => self.choreograph_first_load(&snapshot),
            SnapshotChange::Exploration => self.choreograph_exploration(&snapshot),
            SnapshotChange::Routine => self.choreograph_routine(&snapshot),
        }

        self.grow_camera_bounds(&snapshot);
        self.refresh_boundary(&snapshot);
        self.snapshot = Some(snapshot);
    }

    fn choreograph_first_load(&mut self, snapshot: &BoardSnapshot) {
        let hex_size = self.visuals.hex_size;

        // Place tiles hidden, then reveal them in a staggered wave
        let mut sequence = CinematicSequence::new("first-load");
        for tile in &snapshot.tiles {
            let pos = hex_to_pixel(tile.center, hex_size);
            let name = format!("tile:{}", tile.id);
            self.services.objects.ensure(&name, pos);
            sequence = sequence.step(
                "reveal-tile",
                self.visuals.reveal_stagger_ms,
                reveal_step(name, pos, &self.visuals),
            );
        }
        for enemy in &snapshot.enemies {
            let pos = hex_to_pixel(enemy.hex, hex_size);
            let name = format!("enemy:{}", enemy.id);
            self.services.objects.ensure(&name, pos);
            sequence = sequence.step(
                "reveal-enemy",
                self.visuals.reveal_stagger_ms,
                reveal_step(name, pos, &self.visuals),
            );
        }
        self.sequencer.play(sequence, self.now_ms);

        // Drop every hero in through a portal; tokens stay hidden until the
        // portal's emerge callback fires
        for player in &snapshot.players {
            let pos = hex_to_pixel(player.hex, hex_size);
            self.services.objects.ensure(&format!("player:{}", player.id), pos);
            let emerged = Rc::clone(&self.hero_emerged);
            self.services.particles.spawn_portal(
                pos,
                &self.visuals.entrance_portal,
                Some(Box::new(move || emerged.set(true))),
                None,
            );
        }

        if let Some(player) = snapshot.active_player() {
            self.services
                .camera
                .center_on(hex_to_pixel(player.hex, hex_size), true);
        }
    }

    fn choreograph_exploration(&mut self, snapshot: &BoardSnapshot) {
        let hex_size = self.visuals.hex_size;
        let Some(previous) = self.snapshot.as_ref() else {
            return;
        };

        let new_tiles: Vec<(String, Vec2)> = snapshot
            .new_tiles(previous)
            .iter()
            .map(|t| (format!("tile:{}", t.id), hex_to_pixel(t.center, hex_size)))
            .collect();
        let Some(region) = bounds_of(&new_tiles.iter().map(|(_, p)| *p).collect::<Vec<_>>())
        else {
            return;
        };

        for (name, pos) in &new_tiles {
            self.services.objects.ensure(name, *pos);
        }

        let home = snapshot
            .active_player()
            .map(|p| hex_to_pixel(p.hex, hex_size));
        let region_center = region.center();

        let mut sequence = CinematicSequence::new("exploration").step(
            "pan-to-region",
            600.0,
            move |services: &mut SceneServices| {
                services.camera.center_on(region_center, false);
            },
        );
        for (name, pos) in new_tiles {
            sequence = sequence.step(
                "reveal-tile",
                self.visuals.reveal_stagger_ms,
                reveal_step(name, pos, &self.visuals),
            );
        }
        sequence = sequence.pause(self.visuals.reveal_settle_ms);
        if let Some(home) = home {
            sequence = sequence.step("pan-home", 0.0, move |services: &mut SceneServices| {
                services.camera.center_on(home, false);
            });
        }
        if !self.sequencer.play(sequence, self.now_ms) {
            // A reveal is already running; the tiles still appear, just
            // without their wave
            debug!("exploration wave skipped: sequencer busy");
        }
    }

    fn choreograph_routine(&mut self, snapshot: &BoardSnapshot) {
        let hex_size = self.visuals.hex_size;
        let Some(previous) = self.snapshot.as_ref() else {
            return;
        };

        // Animate tokens whose hex changed along the authoritative path
        for player in &snapshot.players {
            let Some(old) = previous.players.iter().find(|p| p.id == player.id) else {
                continue;
            };
            if old.hex == player.hex {
                continue;
            }
            let path = reconstruct_path(
                old.hex,
                player.hex,
                &previous.legal_moves.reachable,
                &previous.legal_moves.move_targets,
            );
            let name = format!("player:{}", player.id);
            if path.len() < 2 {
                // No displayable path; snap
                if let Some(visual) = self.services.objects.get_mut(&name) {
                    visual.pos = hex_to_pixel(player.hex, hex_size);
                }
                continue;
            }
            let hop_ms = self.visuals.token_hop_ms;
            let mut sequence = CinematicSequence::new("token-move");
            for (i, hex) in path.iter().enumerate().skip(1) {
                let pos = hex_to_pixel(*hex, hex_size);
                let key = format!("move:{name}:{i}");
                let name = name.clone();
                sequence = sequence.step(
                    "hop",
                    f64::from(hop_ms),
                    move |services: &mut SceneServices| {
                        if let Some(id) = services.objects.id_of(&name) {
                            services.tweens.animate(
                                key,
                                id,
                                TweenSpec::new(hop_ms)
                                    .prop("x", pos.x)
                                    .prop("y", pos.y)
                                    .easing(easing::ease_in_out_quad),
                            );
                        }
                    },
                );
            }
            if !self.sequencer.play(sequence, self.now_ms) {
                if let Some(visual) = self.services.objects.get_mut(&name) {
                    visual.pos = hex_to_pixel(player.hex, hex_size);
                }
            }
        }

        // Newly revealed enemies pop in with a dust burst
        for enemy in &snapshot.enemies {
            let was_revealed = previous
                .enemies
                .iter()
                .find(|e| e.id == enemy.id)
                .is_some_and(|e| e.revealed);
            let name = format!("enemy:{}", enemy.id);
            let pos = hex_to_pixel(enemy.hex, hex_size);
            let id = self.services.objects.ensure(&name, pos);
            if enemy.revealed && !was_revealed {
                self.services
                    .particles
                    .spawn_dust_burst(pos, &self.visuals.reveal_dust);
                self.services.tweens.animate(
                    format!("reveal:{name}"),
                    id,
                    TweenSpec::new(REVEAL_MS)
                        .prop("scale", 1.0)
                        .prop("alpha", 1.0)
                        .easing(easing::ease_out_cubic),
                );
            }
        }
    }

    /// Trace the new reachable boundary when it changes.
    fn refresh_boundary(&mut self, snapshot: &BoardSnapshot) {
        let Some(player) = snapshot.active_player() else {
            self.boundary.clear();
            return;
        };
        let edges = boundary_edges(
            &snapshot.legal_moves.reachable,
            player.hex,
            self.visuals.hex_size,
        );
        // Two regions can share an edge count, so compare the edges
        // themselves (owner hex + facing direction identifies one)
        let changed = edge_keys(&edges) != edge_keys(&self.boundary);
        self.boundary = edges;

        if changed && !self.boundary.is_empty() {
            let outline = chain_outline(&self.boundary);
            self.services
                .particles
                .spawn_tracer(outline, &self.visuals.boundary_tracer, None);
        }
    }

    /// Grow (never shrink) the camera pan bounds to the tile union.
    fn grow_camera_bounds(&mut self, snapshot: &BoardSnapshot) {
        let hex_size = self.visuals.hex_size;
        let vertices = hex_vertices(hex_size);
        let points: Vec<Vec2> = snapshot
            .tiles
            .iter()
            .flat_map(|tile| {
                let center = hex_to_pixel(tile.center, hex_size);
                vertices.iter().map(move |v| center + *v)
            })
            .collect();
        if let Some(bounds) = bounds_of(&points) {
            self.services
                .camera
                .expand_bounds(bounds.inflate(self.visuals.camera.bounds_margin));
        }
    }

    // --- Input events ---

    pub fn on_key(&mut self, key: KeyCode, pressed: bool) {
        self.input.keyboard.handle_key(key, pressed);
    }

    pub fn on_mouse_move(&mut self, x: f32, y: f32) {
        self.input.mouse.set_position(x, y);
        let pos = Vec2::new(x, y);
        if !self.sequencer.is_running() {
            self.services.camera.on_pointer_move(pos);
        }
        self.update_hover(pos);
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        self.input.mouse.set_button(button, pressed);
        let pos = self.input.mouse.position.unwrap_or_default();

        if button == self.input_config.gestures.pan {
            // While a sequence owns the camera, gestures must not start a
            // pan; releases still clear any pan already in flight
            if pressed && !self.sequencer.is_running() {
                self.services.camera.on_pointer_down(pos, button);
            } else if !pressed {
                self.services.camera.on_pointer_up(button);
            }
        }

        if button == self.input_config.gestures.select {
            if pressed {
                self.press_pos = Some(pos);
            } else {
                let slop = self.input_config.click_slop_px;
                let clicked = self
                    .press_pos
                    .take()
                    .is_some_and(|press| press.distance(pos) <= slop);
                if clicked {
                    self.handle_click(pos);
                }
            }
        }
    }

    pub fn on_scroll(&mut self, delta: ScrollDelta) {
        self.input.mouse.set_scroll(delta);
    }

    /// Resolve a completed click into an intent, if it hit a legal target.
    fn handle_click(&mut self, screen_pos: Vec2) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let world = self.services.camera.screen_to_world(screen_pos);
        let hex = pixel_to_hex(world, self.visuals.hex_size);
        let legal = &snapshot.legal_moves;

        // Most specific target first: challenge, site, explore, then move
        let intent = if let Some(challenge) = legal.challenges.iter().find(|c| c.hex == hex) {
            Some(PlayerIntent::Challenge {
                hex,
                enemy_id: challenge.enemy_id.clone(),
            })
        } else if let Some(site) = legal.sites.iter().find(|s| s.hex == hex) {
            site_intent(site.hex, &site.actions, &self.input)
        } else if let Some(explore) = legal.explore.iter().find(|e| e.hex == hex) {
            Some(PlayerIntent::Explore {
                hex,
                direction: explore.direction,
            })
        } else if legal.move_targets.iter().any(|t| t.hex == hex)
            || legal.reachable.iter().any(|r| r.hex == hex)
        {
            Some(PlayerIntent::MoveTo { hex })
        } else {
            None
        };

        if let Some(intent) = intent {
            debug!("gesture at {hex} -> {intent:?}");
            self.intents.push(intent);
        }
    }

    fn update_hover(&mut self, screen_pos: Vec2) {
        let Some(snapshot) = &self.snapshot else {
            self.hover = None;
            return;
        };
        let hex_size = self.visuals.hex_size;
        let world = self.services.camera.screen_to_world(screen_pos);
        let coord = pixel_to_hex(world, hex_size);

        let occupied = snapshot
            .tiles
            .iter()
            .any(|t| t.center.distance_to(coord) <= 2)
            || snapshot.enemy_at(coord).is_some();

        // A sparkle greets each newly hovered hex, once per entry
        let entered = self.hover.is_none_or(|h| h.coord != coord);
        if occupied && entered {
            self.services
                .particles
                .spawn_emitter(hex_to_pixel(coord, hex_size), &self.visuals.hover_sparkle);
        }

        self.hover = occupied.then(|| HoverEvent {
            coord,
            screen_pos: self
                .services
                .camera
                .world_to_screen(hex_to_pixel(coord, hex_size)),
            screen_hex_radius: hex_size * self.services.camera.state.zoom,
        });
    }

    // --- Per-frame pump ---

    /// Advance every subsystem by one display frame.
    pub fn frame(&mut self, delta_ms: f32) {
        self.clock.advance(delta_ms);
        self.now_ms += f64::from(delta_ms.max(0.0));

        self.sequencer.poll(self.now_ms, &mut self.services);
        let choreographing = self.sequencer.is_running();

        // Wheel zoom is cursor-centered when the cursor is in the window;
        // scroll is drained regardless so queued ticks never fire late
        let scroll = self.input.mouse.take_scroll();
        if !scroll.is_zero() && !choreographing {
            let cursor = self
                .input
                .mouse
                .position
                .unwrap_or(self.services.camera.viewport * 0.5);
            // Wheel-up zooms in
            self.services.camera.on_wheel(scroll.y, cursor);
        }

        let SceneServices {
            camera,
            tweens,
            particles,
            objects,
        } = &mut self.services;
        tweens.tick(delta_ms, objects);
        particles.tick(delta_ms);
        // Keyboard pan is a gesture too; a running sequence owns the camera
        let idle_keys = KeyboardState::default();
        let keys = if choreographing {
            &idle_keys
        } else {
            &self.input.keyboard
        };
        camera.tick(delta_ms, keys);

        // Portal callback fired since last frame: show the hero tokens
        if self.hero_emerged.replace(false) {
            if let Some(snapshot) = &self.snapshot {
                for player in &snapshot.players {
                    if let Some(visual) = objects.get_mut(&format!("player:{}", player.id)) {
                        visual.scale = 1.0;
                        visual.alpha = 1.0;
                    }
                }
            }
        }
    }

    // --- Rendering ---

    /// Record this frame's draw calls.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        let camera = &self.services.camera;
        renderer.set_view_transform(camera.state.center, camera.state.zoom, camera.viewport);

        let hex_size = self.visuals.hex_size;
        let vertices = hex_vertices(hex_size);
        let Some(snapshot) = &self.snapshot else {
            return;
        };

        // Tiles: sprite when art is cached, flat hex fill otherwise
        for tile in &snapshot.tiles {
            let Some(visual) = self.services.objects.get(&format!("tile:{}", tile.id)) else {
                continue;
            };
            if visual.alpha <= 0.0 {
                continue;
            }
            if let Some(texture) = self.textures.get(&format!("tile-{}", tile.id)) {
                renderer.draw_sprite(
                    texture,
                    visual.pos,
                    Vec2::splat(hex_size * 2.0 * visual.scale),
                    0.0,
                    [1.0, 1.0, 1.0, visual.alpha],
                );
            } else {
                let polygon: Vec<Vec2> = vertices
                    .iter()
                    .map(|v| visual.pos + *v * visual.scale)
                    .collect();
                renderer.fill_polygon(&polygon, [0.35, 0.42, 0.3, visual.alpha]);
            }
        }

        // Reachability outline, styled by terminality
        let [r, g, b] = self.visuals.boundary_color;
        let [tr, tg, tb] = self.visuals.boundary_terminal_color;
        for edge in &self.boundary {
            let color = if edge.is_terminal {
                [tr, tg, tb, 0.9]
            } else {
                [r, g, b, 0.9]
            };
            renderer.stroke_polyline(&[edge.start, edge.end], self.visuals.boundary_width, color);
        }

        // Path preview toward the hovered hex
        if let Some(hover) = &self.hover {
            if let Some(player) = snapshot.active_player() {
                let path = reconstruct_path(
                    player.hex,
                    hover.coord,
                    &snapshot.legal_moves.reachable,
                    &snapshot.legal_moves.move_targets,
                );
                if path.len() >= 2 {
                    let points: Vec<Vec2> =
                        path.iter().map(|h| hex_to_pixel(*h, hex_size)).collect();
                    let [pr, pg, pb] = self.visuals.path_color;
                    renderer.stroke_polyline(&points, self.visuals.path_width, [pr, pg, pb, 0.8]);
                }
            }
        }

        // Tokens
        for enemy in &snapshot.enemies {
            let Some(visual) = self.services.objects.get(&format!("enemy:{}", enemy.id)) else {
                continue;
            };
            if visual.alpha <= 0.0 {
                continue;
            }
            let color = if enemy.revealed {
                enemy_tint(enemy.color)
            } else {
                [0.25, 0.25, 0.3]
            };
            let polygon: Vec<Vec2> = vertices
                .iter()
                .map(|v| visual.pos + *v * 0.55 * visual.scale)
                .collect();
            renderer.fill_polygon(&polygon, [color[0], color[1], color[2], visual.alpha]);
        }
        for player in &snapshot.players {
            let Some(visual) = self.services.objects.get(&format!("player:{}", player.id))
            else {
                continue;
            };
            if visual.alpha <= 0.0 {
                continue;
            }
            let polygon: Vec<Vec2> = vertices
                .iter()
                .map(|v| visual.pos + *v * 0.45 * visual.scale)
                .collect();
            renderer.fill_polygon(&polygon, [0.95, 0.9, 0.75, visual.alpha]);
        }

        // Effects draw above everything
        self.services.particles.render(renderer);
    }

    // --- Outputs ---

    /// Drain the intents produced since the last call.
    pub fn take_intents(&mut self) -> Vec<PlayerIntent> {
        std::mem::take(&mut self.intents)
    }

    /// Current hover, for the tooltip layer.
    pub fn hover(&self) -> Option<HoverEvent> {
        self.hover
    }

    /// True while a choreographed sequence is holding the scene.
    pub fn is_choreographing(&self) -> bool {
        self.sequencer.is_running()
    }
}

/// Build the one-shot action revealing a named object with a dust burst.
fn reveal_step(
    name: String,
    pos: Vec2,
    visuals: &VisualConfig,
) -> impl FnOnce(&mut SceneServices) + 'static {
    let dust = visuals.reveal_dust.clone();
    move |services: &mut SceneServices| {
        services.particles.spawn_dust_burst(pos, &dust);
        if let Some(id) = services.objects.id_of(&name) {
            services.tweens.animate(
                format!("reveal:{name}"),
                id,
                TweenSpec::new(REVEAL_MS)
                    .prop("scale", 1.0)
                    .prop("alpha", 1.0)
                    .easing(easing::ease_out_cubic),
            );
        }
    }
}

/// Pick the site action from the modifier keys: plain click enters, shift
/// burns, ctrl plunders. Falls back to the first legal action.
fn site_intent(
    hex: AxialCoord,
    actions: &[SiteAction],
    input: &InputState,
) -> Option<PlayerIntent> {
    let wanted = if input.keyboard.modifiers.shift {
        SiteAction::Burn
    } else if input.keyboard.modifiers.ctrl {
        SiteAction::Plunder
    } else {
        SiteAction::Enter
    };
    let action = if actions.contains(&wanted) {
        wanted
    } else {
        *actions.first()?
    };
    Some(match action {
        SiteAction::Enter => PlayerIntent::EnterSite { hex },
        SiteAction::Burn => PlayerIntent::BurnSite { hex },
        SiteAction::Plunder => PlayerIntent::PlunderSite { hex },
    })
}

fn edge_keys(edges: &[BoundaryEdge]) -> HashSet<(i64, HexDirection)> {
    edges.iter().map(|e| (e.owner.key(), e.direction)).collect()
}

fn enemy_tint(color: crate::game::state::EnemyColor) -> [f32; 3] {
    use crate::game::state::EnemyColor;
    match color {
        EnemyColor::Green => [0.35, 0.7, 0.3],
        EnemyColor::Grey => [0.5, 0.5, 0.55],
        EnemyColor::Brown => [0.55, 0.4, 0.25],
        EnemyColor::Violet => [0.55, 0.35, 0.75],
        EnemyColor::Red => [0.8, 0.25, 0.2],
        EnemyColor::White => [0.9, 0.9, 0.85],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawList;

    fn scene() -> BoardScene {
        BoardScene::new(
            Vec2::new(800.0, 600.0),
            VisualConfig::default(),
            InputConfig::default(),
        )
    }

    fn snapshot(json: &str) -> BoardSnapshot {
        BoardSnapshot::from_json(json).unwrap()
    }

    fn base_snapshot() -> BoardSnapshot {
        snapshot(
            r#"{
                "turn": 1,
                "tiles": [{"id": "start", "center": {"q": 0, "r": 0}}],
                "players": [{"id": "p1", "hex": {"q": 0, "r": 0}, "isActive": true}],
                "legalMoves": {
                    "moveTargets": [{"hex": {"q": 1, "r": 0}, "cost": 2}],
                    "reachable": [
                        {"hex": {"q": 1, "r": 0}, "totalCost": 2, "isTerminal": false}
                    ]
                }
            }"#,
        )
    }

    /// Screen position of a hex center under the current camera.
    fn screen_of(scene: &BoardScene, hex: AxialCoord) -> Vec2 {
        scene
            .services
            .camera
            .world_to_screen(hex_to_pixel(hex, scene.visuals.hex_size))
    }

    #[test]
    fn test_first_load_places_and_reveals() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());

        assert!(scene.is_choreographing());
        assert!(scene.services.objects.get("tile:start").is_some());
        // Camera snapped to the active player instantly
        assert_eq!(
            scene.services.camera.state.center,
            hex_to_pixel(AxialCoord::ORIGIN, scene.visuals.hex_size)
        );
        // The entrance portal is live
        assert!(scene.services.particles.active_effects() > 0);

        // Run the choreography out; the tile ends fully revealed
        for _ in 0..400 {
            scene.frame(16.0);
        }
        assert!(!scene.is_choreographing());
        let tile = scene.services.objects.get("tile:start").unwrap();
        assert!((tile.alpha - 1.0).abs() < 1e-3);
        assert!((tile.scale - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_hero_token_appears_after_portal_emerge() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());

        let hidden = scene.services.objects.get("player:p1").unwrap().alpha;
        assert_eq!(hidden, 0.0);

        // Past opening + hold, the emerge callback flips the token visible
        for _ in 0..60 {
            scene.frame(16.0);
        }
        let shown = scene.services.objects.get("player:p1").unwrap().alpha;
        assert_eq!(shown, 1.0);
    }

    #[test]
    fn test_click_move_target_emits_intent() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }

        let target = AxialCoord::new(1, 0);
        let pos = screen_of(&scene, target);
        scene.on_mouse_move(pos.x, pos.y);
        scene.on_mouse_button(MouseButton::Left, true);
        scene.on_mouse_button(MouseButton::Left, false);

        assert_eq!(scene.take_intents(), vec![PlayerIntent::MoveTo { hex: target }]);
        assert!(scene.take_intents().is_empty());
    }

    #[test]
    fn test_drag_past_slop_is_not_a_click() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }

        let pos = screen_of(&scene, AxialCoord::new(1, 0));
        scene.on_mouse_move(pos.x, pos.y);
        scene.on_mouse_button(MouseButton::Left, true);
        scene.on_mouse_move(pos.x + 40.0, pos.y);
        scene.on_mouse_button(MouseButton::Left, false);

        assert!(scene.take_intents().is_empty());
    }

    #[test]
    fn test_click_empty_hex_emits_nothing() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }

        let pos = screen_of(&scene, AxialCoord::new(-4, -4));
        scene.on_mouse_move(pos.x, pos.y);
        scene.on_mouse_button(MouseButton::Left, true);
        scene.on_mouse_button(MouseButton::Left, false);
        assert!(scene.take_intents().is_empty());
    }

    #[test]
    fn test_exploration_reveals_new_tile() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }

        let next = snapshot(
            r#"{
                "turn": 2,
                "tiles": [
                    {"id": "start", "center": {"q": 0, "r": 0}},
                    {"id": "forest", "center": {"q": 4, "r": 0}}
                ],
                "players": [{"id": "p1", "hex": {"q": 0, "r": 0}, "isActive": true}]
            }"#,
        );
        scene.apply_snapshot(next);
        assert!(scene.is_choreographing());
        assert!(scene.services.objects.get("tile:forest").is_some());

        for _ in 0..400 {
            scene.frame(16.0);
        }
        assert!(!scene.is_choreographing());
        let tile = scene.services.objects.get("tile:forest").unwrap();
        assert!((tile.alpha - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_routine_move_walks_token_to_destination() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }

        let moved = snapshot(
            r#"{
                "turn": 2,
                "tiles": [{"id": "start", "center": {"q": 0, "r": 0}}],
                "players": [{"id": "p1", "hex": {"q": 1, "r": 0}, "isActive": true}]
            }"#,
        );
        scene.apply_snapshot(moved);
        for _ in 0..400 {
            scene.frame(16.0);
        }

        let token = scene.services.objects.get("player:p1").unwrap();
        let expected = hex_to_pixel(AxialCoord::new(1, 0), scene.visuals.hex_size);
        assert!((token.pos - expected).length() < 0.5);
    }

    #[test]
    fn test_hover_reports_board_hexes_only() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }

        let on_board = screen_of(&scene, AxialCoord::new(1, 0));
        scene.on_mouse_move(on_board.x, on_board.y);
        let hover = scene.hover().unwrap();
        assert_eq!(hover.coord, AxialCoord::new(1, 0));
        assert!(hover.screen_hex_radius > 0.0);

        let off_board = screen_of(&scene, AxialCoord::new(20, 20));
        scene.on_mouse_move(off_board.x, off_board.y);
        assert!(scene.hover().is_none());
    }

    #[test]
    fn test_gestures_suppressed_while_choreographing() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }

        let next = snapshot(
            r#"{
                "turn": 2,
                "tiles": [
                    {"id": "start", "center": {"q": 0, "r": 0}},
                    {"id": "forest", "center": {"q": 4, "r": 0}}
                ],
                "players": [{"id": "p1", "hex": {"q": 0, "r": 0}, "isActive": true}]
            }"#,
        );
        scene.apply_snapshot(next);
        scene.frame(16.0); // pan-to-region step fires
        assert!(scene.is_choreographing());
        let target = scene.services.camera.state.target_center;
        let zoom = scene.services.camera.state.target_zoom;

        // A drag with the pan button must not move the cinematic's target
        scene.on_mouse_move(100.0, 100.0);
        scene.on_mouse_button(MouseButton::Middle, true);
        scene.on_mouse_move(200.0, 100.0);
        scene.on_mouse_button(MouseButton::Middle, false);
        assert_eq!(scene.services.camera.state.target_center, target);

        // Neither may the wheel or the pan keys
        scene.on_scroll(ScrollDelta::from_lines(0.0, 2.0));
        scene.frame(1.0);
        assert_eq!(scene.services.camera.state.target_zoom, zoom);
        scene.on_key(KeyCode::D, true);
        scene.frame(1.0);
        assert_eq!(scene.services.camera.state.target_center, target);
        scene.on_key(KeyCode::D, false);

        // Once the sequence ends the camera answers gestures again
        for _ in 0..400 {
            scene.frame(16.0);
        }
        assert!(!scene.is_choreographing());
        scene.on_scroll(ScrollDelta::from_lines(0.0, 2.0));
        scene.frame(16.0);
        assert!(scene.services.camera.state.target_zoom > zoom);
    }

    #[test]
    fn test_hover_enter_spawns_sparkle_once() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }
        assert_eq!(scene.services.particles.active_effects(), 0);

        let pos = screen_of(&scene, AxialCoord::new(1, 0));
        scene.on_mouse_move(pos.x, pos.y);
        let spawned = scene.services.particles.active_effects();
        assert!(spawned > 0);

        // Wiggling inside the same hex does not re-trigger it
        scene.on_mouse_move(pos.x + 2.0, pos.y);
        assert_eq!(scene.services.particles.active_effects(), spawned);
    }

    #[test]
    fn test_boundary_retraces_when_region_shifts() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }
        assert_eq!(scene.services.particles.active_effects(), 0);

        // Same number of edges as before, but a different region: the
        // reachable hex flips from east to south-east
        let shifted = snapshot(
            r#"{
                "turn": 2,
                "tiles": [{"id": "start", "center": {"q": 0, "r": 0}}],
                "players": [{"id": "p1", "hex": {"q": 0, "r": 0}, "isActive": true}],
                "legalMoves": {
                    "moveTargets": [{"hex": {"q": 0, "r": 1}, "cost": 2}],
                    "reachable": [
                        {"hex": {"q": 0, "r": 1}, "totalCost": 2, "isTerminal": false}
                    ]
                }
            }"#,
        );
        scene.apply_snapshot(shifted);
        assert!(scene.services.particles.active_effects() > 0);
    }

    #[test]
    fn test_render_records_draw_calls() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }

        let mut list = DrawList::new();
        scene.render(&mut list);
        // Tile fill plus boundary strokes at minimum
        assert!(list.polygon_count() >= 1);
        assert!(list.polyline_count() >= 6);
    }

    #[test]
    fn test_wheel_zoom_applied_on_frame() {
        let mut scene = scene();
        scene.apply_snapshot(base_snapshot());
        for _ in 0..400 {
            scene.frame(16.0);
        }
        scene.on_mouse_move(400.0, 300.0);
        scene.on_scroll(ScrollDelta::from_lines(0.0, 2.0));
        scene.frame(16.0);
        assert!(scene.services.camera.state.target_zoom > 1.0);
    }
}
