//! Tween Manager
//!
//! Advances a set of keyed tweens by a frame delta and applies the
//! interpolated values to opaque scene targets. The manager owns no domain
//! knowledge: targets are resolved through the [`TweenScene`] trait each
//! tick, so an object destroyed out of band (scene reset) simply resolves to
//! `None` and its tween is dropped silently.
//!
//! Key semantics: one active tween per key. Starting a tween under a key
//! already in flight replaces the old tween *without* firing its completion
//! callback, so re-triggering the same visual effect can never accumulate
//! duplicate timers.

pub mod easing;

use std::collections::HashMap;

use easing::EasingFn;

/// Opaque handle to an animated object inside the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// Name of one animatable property on a target. Property names are defined
/// by the scene, not by the manager.
pub type TweenProp = &'static str;

/// An object whose numeric properties can be animated.
pub trait TweenTarget {
    /// Current value of a property, or `None` if the target does not carry it.
    fn read(&self, prop: TweenProp) -> Option<f32>;

    /// Write an interpolated value.
    fn write(&mut self, prop: TweenProp, value: f32);
}

/// Resolves opaque target ids to live targets.
pub trait TweenScene {
    /// `None` means the object has been destroyed; its tweens are dropped.
    fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn TweenTarget>;
}

/// Everything needed to start a tween, minus the key and target.
pub struct TweenSpec {
    end_values: Vec<(TweenProp, f32)>,
    duration_ms: f32,
    easing: EasingFn,
    on_update: Option<Box<dyn FnMut(f32)>>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl TweenSpec {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            end_values: Vec::new(),
            duration_ms,
            easing: easing::linear,
            on_update: None,
            on_complete: None,
        }
    }

    /// Animate `prop` toward `end`. Start values are captured from the
    /// target on the tween's first tick.
    pub fn prop(mut self, prop: TweenProp, end: f32) -> Self {
        self.end_values.push((prop, end));
        self
    }

    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    pub fn on_update(mut self, f: impl FnMut(f32) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

struct Tween {
    target: TargetId,
    /// Captured from the target on the first tick.
    start_values: Option<Vec<f32>>,
    end_values: Vec<(TweenProp, f32)>,
    elapsed_ms: f32,
    duration_ms: f32,
    easing: EasingFn,
    on_update: Option<Box<dyn FnMut(f32)>>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

enum Outcome {
    Running,
    Complete,
    TargetGone,
}

/// Keyed tween collection, pumped once per display frame.
#[derive(Default)]
pub struct TweenManager {
    tweens: HashMap<String, Tween>,
}

impl TweenManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the tween stored under `key`.
    ///
    /// A tween already in flight under the same key is replaced and its
    /// `on_complete` is never called.
    pub fn animate(&mut self, key: impl Into<String>, target: TargetId, spec: TweenSpec) {
        let key = key.into();
        let replaced = self
            .tweens
            .insert(
                key.clone(),
                Tween {
                    target,
                    start_values: None,
                    end_values: spec.end_values,
                    elapsed_ms: 0.0,
                    duration_ms: spec.duration_ms,
                    easing: spec.easing,
                    on_update: spec.on_update,
                    on_complete: spec.on_complete,
                },
            )
            .is_some();
        if replaced {
            log::trace!("tween '{key}' replaced while in flight");
        }
    }

    /// Remove a tween without firing its completion callback. Returns whether
    /// a tween was actually in flight under that key.
    pub fn cancel(&mut self, key: &str) -> bool {
        self.tweens.remove(key).is_some()
    }

    /// Remove every tween without firing completion callbacks.
    pub fn cancel_all(&mut self) {
        self.tweens.clear();
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.tweens.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Advance every active tween by `delta_ms` and apply side effects.
    ///
    /// Tweens are independent of each other; the order they are advanced in
    /// within one tick is unspecified.
    pub fn tick(&mut self, delta_ms: f32, scene: &mut dyn TweenScene) {
        let delta = delta_ms.max(0.0);
        let keys: Vec<String> = self.tweens.keys().cloned().collect();

        for key in keys {
            let Some(tween) = self.tweens.get_mut(&key) else {
                continue;
            };
            let outcome = match scene.target_mut(tween.target) {
                None => Outcome::TargetGone,
                Some(target) => tween.advance(delta, target),
            };
            match outcome {
                Outcome::Running => {}
                Outcome::Complete => {
                    if let Some(mut done) = self.tweens.remove(&key) {
                        if let Some(on_complete) = done.on_complete.take() {
                            on_complete();
                        }
                    }
                }
                Outcome::TargetGone => {
                    log::debug!("tween '{key}' target destroyed mid-flight, dropping");
                    self.tweens.remove(&key);
                }
            }
        }
    }
}

impl Tween {
    fn advance(&mut self, delta_ms: f32, target: &mut dyn TweenTarget) -> Outcome {
        let starts = self.start_values.get_or_insert_with(|| {
            self.end_values
                .iter()
                // A property the target does not carry starts at its end
                // value, producing no visible motion for it
                .map(|&(prop, end)| target.read(prop).unwrap_or(end))
                .collect()
        });

        self.elapsed_ms += delta_ms;
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).min(1.0)
        };
        let eased = (self.easing)(progress);

        for (&(prop, end), &start) in self.end_values.iter().zip(starts.iter()) {
            target.write(prop, start + (end - start) * eased);
        }
        if let Some(on_update) = self.on_update.as_mut() {
            on_update(eased);
        }

        if progress >= 1.0 {
            Outcome::Complete
        } else {
            Outcome::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Minimal scene: a bag of targets, each a named-property map.
    #[derive(Default)]
    struct TestScene {
        targets: HashMap<TargetId, TestTarget>,
    }

    #[derive(Default)]
    struct TestTarget {
        alpha: f32,
        scale: f32,
    }

    impl TweenTarget for TestTarget {
        fn read(&self, prop: TweenProp) -> Option<f32> {
            match prop {
                "alpha" => Some(self.alpha),
                "scale" => Some(self.scale),
                _ => None,
            }
        }

        fn write(&mut self, prop: TweenProp, value: f32) {
            match prop {
                "alpha" => self.alpha = value,
                "scale" => self.scale = value,
                _ => {}
            }
        }
    }

    impl TweenScene for TestScene {
        fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn TweenTarget> {
            self.targets.get_mut(&id).map(|t| t as &mut dyn TweenTarget)
        }
    }

    fn scene_with_target(id: TargetId) -> TestScene {
        let mut scene = TestScene::default();
        scene.targets.insert(id, TestTarget::default());
        scene
    }

    #[test]
    fn test_completes_exactly_once() {
        let id = TargetId(1);
        let mut scene = scene_with_target(id);
        let mut manager = TweenManager::new();
        let completions = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&completions);
        manager.animate(
            "fade",
            id,
            TweenSpec::new(100.0)
                .prop("alpha", 1.0)
                .on_complete(move || counter.set(counter.get() + 1)),
        );

        for _ in 0..10 {
            manager.tick(10.0, &mut scene);
        }
        assert_eq!(completions.get(), 1);
        assert_eq!(scene.targets[&id].alpha, 1.0);
        assert!(!manager.is_active("fade"));

        // Further ticks do nothing
        manager.tick(10.0, &mut scene);
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn test_replacement_suppresses_old_completion() {
        let id = TargetId(1);
        let mut scene = scene_with_target(id);
        let mut manager = TweenManager::new();
        let first = Rc::new(Cell::new(0u32));
        let second = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&first);
        manager.animate(
            "pulse",
            id,
            TweenSpec::new(100.0)
                .prop("scale", 2.0)
                .on_complete(move || counter.set(counter.get() + 1)),
        );
        manager.tick(50.0, &mut scene);

        // Restart under the same key before the first completes
        let counter = Rc::clone(&second);
        manager.animate(
            "pulse",
            id,
            TweenSpec::new(60.0)
                .prop("scale", 3.0)
                .on_complete(move || counter.set(counter.get() + 1)),
        );
        manager.tick(60.0, &mut scene);

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(scene.targets[&id].scale, 3.0);
    }

    #[test]
    fn test_destroyed_target_is_dropped_silently() {
        let id = TargetId(9);
        let mut scene = scene_with_target(id);
        let mut manager = TweenManager::new();
        let completions = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&completions);
        manager.animate(
            "doomed",
            id,
            TweenSpec::new(100.0)
                .prop("alpha", 1.0)
                .on_complete(move || counter.set(counter.get() + 1)),
        );
        manager.tick(10.0, &mut scene);

        // Tear the target down mid-flight
        scene.targets.remove(&id);
        manager.tick(10.0, &mut scene);

        assert_eq!(completions.get(), 0);
        assert!(!manager.is_active("doomed"));
    }

    #[test]
    fn test_cancel_does_not_complete() {
        let id = TargetId(1);
        let mut scene = scene_with_target(id);
        let mut manager = TweenManager::new();
        let completions = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&completions);
        manager.animate(
            "move",
            id,
            TweenSpec::new(100.0)
                .prop("alpha", 1.0)
                .on_complete(move || counter.set(counter.get() + 1)),
        );
        manager.tick(10.0, &mut scene);

        assert!(manager.cancel("move"));
        assert!(!manager.cancel("move"));
        manager.tick(200.0, &mut scene);
        assert_eq!(completions.get(), 0);
    }

    #[test]
    fn test_eased_interpolation_from_captured_start() {
        let id = TargetId(1);
        let mut scene = scene_with_target(id);
        scene.targets.get_mut(&id).unwrap().alpha = 0.5;
        let mut manager = TweenManager::new();

        manager.animate("fade", id, TweenSpec::new(100.0).prop("alpha", 1.0));
        manager.tick(50.0, &mut scene);
        // Linear easing, halfway between the captured 0.5 and 1.0
        assert!((scene.targets[&id].alpha - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_on_update_receives_eased_progress() {
        let id = TargetId(1);
        let mut scene = scene_with_target(id);
        let mut manager = TweenManager::new();
        let seen = Rc::new(Cell::new(-1.0f32));

        let out = Rc::clone(&seen);
        manager.animate(
            "watch",
            id,
            TweenSpec::new(100.0)
                .prop("alpha", 1.0)
                .easing(easing::ease_in_quad)
                .on_update(move |p| out.set(p)),
        );
        manager.tick(50.0, &mut scene);
        assert!((seen.get() - 0.25).abs() < 1e-6);
    }
}
