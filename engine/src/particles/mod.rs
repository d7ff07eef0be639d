//! Particle Effect System
//!
//! Owns a bounded set of concurrently running effect instances, pumps them
//! once per tick, and garbage-collects the dead ones. Effects form a closed
//! variant set with a uniform `update(delta_ms) -> bool` / `destroy()`
//! contract; an instance whose `update` returns false has already run its
//! `destroy` in the terminal branch and is removed by the manager.
//!
//! Instances are updated in insertion order, but their visual results are
//! order-independent: no effect reads another effect's state.

mod dust;
mod emitter;
mod portal;
mod tracer;

pub use dust::{DustBurstConfig, DustBurstEffect, DustLayerConfig};
pub use emitter::{EmitterConfig, EmitterEffect};
pub use portal::{PortalConfig, PortalEffect, PortalPhase};
pub use tracer::{TracerConfig, TracerEffect};

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::clock::{ClockAttachment, ClockHandle};
use crate::render::Renderer;

/// One particle. Value type, owned exclusively by the effect that spawned
/// it, destroyed when `life_ms` runs out.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub position: Vec2,
    /// World units per second.
    pub velocity: Vec2,
    pub life_ms: f32,
    pub max_life_ms: f32,
    pub size: f32,
    pub start_size: f32,
    pub end_size: f32,
    pub color: [f32; 3],
    pub alpha: f32,
    pub start_alpha: f32,
    pub end_alpha: f32,
    /// Radians.
    pub rotation: f32,
    /// Radians per second.
    pub rotation_speed: f32,
    /// World units per second squared, +y is screen-down.
    pub gravity: f32,
}

impl Particle {
    /// Semi-implicit Euler step plus linear size/alpha fade.
    ///
    /// Returns false once the particle has expired.
    pub fn integrate(&mut self, delta_ms: f32) -> bool {
        self.life_ms -= delta_ms;
        if self.life_ms <= 0.0 {
            return false;
        }

        let dt = delta_ms / 1000.0;
        self.velocity.y += self.gravity * dt;
        self.position += self.velocity * dt;
        self.rotation += self.rotation_speed * dt;

        let t = 1.0 - self.life_ms / self.max_life_ms;
        self.size = lerp(self.start_size, self.end_size, t);
        self.alpha = lerp(self.start_alpha, self.end_alpha, t);
        true
    }
}

pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Draw one particle as a rotated quad through the opaque renderer.
pub(crate) fn draw_particle(renderer: &mut dyn Renderer, p: &Particle) {
    let color = [p.color[0], p.color[1], p.color[2], p.alpha];
    draw_quad(renderer, p.position, p.size, p.rotation, color);
}

/// Rotated quad of the given edge length, centered on `center`.
pub(crate) fn draw_quad(
    renderer: &mut dyn Renderer,
    center: Vec2,
    size: f32,
    rotation: f32,
    color: [f32; 4],
) {
    let half = size * 0.5;
    let (sin, cos) = rotation.sin_cos();
    let right = Vec2::new(cos, sin) * half;
    let up = Vec2::new(-sin, cos) * half;
    let quad = [
        center - right - up,
        center + right - up,
        center + right + up,
        center - right + up,
    ];
    renderer.fill_polygon(&quad, color);
}

/// Closed set of effect archetypes.
pub enum EffectKind {
    Emitter(EmitterEffect),
    Tracer(TracerEffect),
    DustBurst(DustBurstEffect),
    Portal(PortalEffect),
}

impl EffectKind {
    /// Advance the effect; false means it has died (and already destroyed
    /// itself).
    pub fn update(&mut self, delta_ms: f32) -> bool {
        match self {
            EffectKind::Emitter(e) => e.update(delta_ms),
            EffectKind::Tracer(e) => e.update(delta_ms),
            EffectKind::DustBurst(e) => e.update(delta_ms),
            EffectKind::Portal(e) => e.update(delta_ms),
        }
    }

    /// Release owned particles and settle any pending one-shot state.
    pub fn destroy(&mut self) {
        match self {
            EffectKind::Emitter(e) => e.destroy(),
            EffectKind::Tracer(e) => e.destroy(),
            EffectKind::DustBurst(e) => e.destroy(),
            EffectKind::Portal(e) => e.destroy(),
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        match self {
            EffectKind::Emitter(e) => e.render(renderer),
            EffectKind::Tracer(e) => e.render(renderer),
            EffectKind::DustBurst(e) => e.render(renderer),
            EffectKind::Portal(e) => e.render(renderer),
        }
    }

    pub fn particle_count(&self) -> usize {
        match self {
            EffectKind::Emitter(e) => e.particles().len(),
            EffectKind::Tracer(e) => e.spark_count(),
            EffectKind::DustBurst(e) => e.particle_count(),
            EffectKind::Portal(e) => e.particle_count(),
        }
    }
}

/// Manages the full lifecycle of every visual effect in the scene.
///
/// Subscribes to exactly one frame clock at a time; tick work is skipped
/// while detached or after the clock has been torn down.
pub struct ParticleManager {
    effects: Vec<EffectKind>,
    attachment: ClockAttachment,
    rng: SmallRng,
}

impl ParticleManager {
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_entropy())
    }

    /// Deterministic variant for tests and scripted demos.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        Self {
            effects: Vec::new(),
            attachment: ClockAttachment::new(),
            rng,
        }
    }

    /// Subscribe to a frame clock, detaching from any previous one first.
    pub fn attach(&mut self, clock: ClockHandle) {
        self.attachment.attach(clock);
    }

    /// Unsubscribe. Idempotent; tolerates a clock already torn down.
    pub fn detach(&mut self) {
        self.attachment.detach();
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_attached()
    }

    pub fn spawn_emitter(&mut self, origin: Vec2, config: &EmitterConfig) {
        let effect = EmitterEffect::new(origin, config, &mut self.rng);
        self.effects.push(EffectKind::Emitter(effect));
    }

    pub fn spawn_dust_burst(&mut self, origin: Vec2, config: &DustBurstConfig) {
        let effect = DustBurstEffect::new(origin, config, &mut self.rng);
        self.effects.push(EffectKind::DustBurst(effect));
    }

    /// Trace `outline` over the tracer's duration. `on_complete` fires once
    /// when the trace finishes, before the pulse/fade lingering ends.
    pub fn spawn_tracer(
        &mut self,
        outline: Vec<Vec2>,
        config: &TracerConfig,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) {
        let seed = self.rng.r#gen::<u64>();
        let effect = TracerEffect::new(outline, config, seed, on_complete);
        self.effects.push(EffectKind::Tracer(effect));
    }

    /// Open a portal at `origin`. `on_hero_emerge` fires once at the
    /// hold-to-emerging transition; `on_complete` fires once at
    /// emerging-to-breath, before the visual close finishes.
    pub fn spawn_portal(
        &mut self,
        origin: Vec2,
        config: &PortalConfig,
        on_hero_emerge: Option<Box<dyn FnOnce()>>,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) {
        let seed = self.rng.r#gen::<u64>();
        let effect = PortalEffect::new(origin, config, seed, on_hero_emerge, on_complete);
        self.effects.push(EffectKind::Portal(effect));
    }

    /// Pump every live effect and drop the ones that report death.
    ///
    /// No-op while detached from the frame clock.
    pub fn tick(&mut self, delta_ms: f32) {
        if !self.attachment.is_attached() {
            log::trace!("particle tick skipped: not attached to a live clock");
            return;
        }
        let delta = delta_ms.max(0.0);
        self.effects.retain_mut(|effect| effect.update(delta));
    }

    /// Destroy every effect immediately (scene reset).
    pub fn clear(&mut self) {
        for effect in &mut self.effects {
            effect.destroy();
        }
        self.effects.clear();
    }

    pub fn active_effects(&self) -> usize {
        self.effects.len()
    }

    pub fn particle_count(&self) -> usize {
        self.effects.iter().map(EffectKind::particle_count).sum()
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        for effect in &self.effects {
            effect.render(renderer);
        }
    }

    /// Iterate over the live portal effects (the scene reads their phase).
    pub fn portals(&self) -> impl Iterator<Item = &PortalEffect> {
        self.effects.iter().filter_map(|e| match e {
            EffectKind::Portal(p) => Some(p),
            _ => None,
        })
    }
}

impl Default for ParticleManager {
    fn default() -> Self {
        Self::new()
    }
}
