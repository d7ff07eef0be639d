//! Frame Clock
//!
//! A single external clock pumps every animated subsystem once per display
//! frame with a delta in milliseconds. Managers subscribe through a
//! [`ClockHandle`]; the handle is a weak reference, so a clock torn down out
//! of band (scene reset) simply reads as dead and managers skip their work
//! instead of raising. Attach and detach are idempotent.

use std::cell::Cell;
use std::rc::{Rc, Weak};

#[derive(Default)]
struct ClockInner {
    frame: Cell<u64>,
    delta_ms: Cell<f32>,
}

/// The per-frame clock owned by the host loop.
///
/// Dropping the clock invalidates every [`ClockHandle`] taken from it.
#[derive(Default)]
pub struct FrameClock {
    inner: Rc<ClockInner>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one display frame. Negative deltas are clamped to zero;
    /// time never runs backwards here.
    pub fn advance(&mut self, delta_ms: f32) {
        let delta = delta_ms.max(0.0);
        self.inner.frame.set(self.inner.frame.get() + 1);
        self.inner.delta_ms.set(delta);
    }

    /// A subscription handle for a manager to attach to.
    pub fn handle(&self) -> ClockHandle {
        ClockHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.inner.frame.get()
    }

    /// Delta of the most recent frame, in milliseconds.
    pub fn delta_ms(&self) -> f32 {
        self.inner.delta_ms.get()
    }
}

/// Weak reference to a [`FrameClock`].
#[derive(Clone, Default)]
pub struct ClockHandle {
    inner: Weak<ClockInner>,
}

impl ClockHandle {
    /// False once the owning clock has been torn down.
    pub fn is_live(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// A manager's attachment to a frame clock.
///
/// Embedded by [`crate::particles::ParticleManager`] (and anything else that
/// subscribes to a clock) to get the lifecycle contract in one place: a
/// manager is attached to at most one clock, re-attach detaches first, and
/// detach tolerates a clock that no longer exists.
#[derive(Default)]
pub struct ClockAttachment {
    handle: Option<ClockHandle>,
}

impl ClockAttachment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to a clock, detaching from any previous one first.
    pub fn attach(&mut self, handle: ClockHandle) {
        if self.handle.is_some() {
            self.detach();
        }
        self.handle = Some(handle);
    }

    /// Detach from the current clock. Idempotent; a clock already torn down
    /// is logged and otherwise ignored.
    pub fn detach(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_live() {
                log::debug!("detached from a clock that was already torn down");
            }
        }
    }

    /// Whether tick work should run this frame: attached, and the clock is
    /// still alive.
    pub fn is_attached(&self) -> bool {
        self.handle.as_ref().is_some_and(ClockHandle::is_live)
    }
}
