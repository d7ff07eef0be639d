//! Cinematic Sequencer
//!
//! Runs scripted, timed sequences of scene actions: reveal waves, entrance
//! choreography, turn-start beats. Each step is a one-shot closure plus a
//! duration; steps execute in order against logical deadlines, so timer
//! jitter never accumulates across a sequence. Step timing is coarse:
//! fine-grained motion belongs to the tween and particle systems, the
//! sequencer only decides *when* each beat starts.

use log::{debug, warn};

/// One beat of a sequence: run `action`, then wait `duration_ms` before the
/// next step starts.
pub struct CinematicStep<Ctx> {
    pub name: &'static str,
    pub duration_ms: f64,
    action: Option<Box<dyn FnOnce(&mut Ctx)>>,
}

/// An ordered list of steps, built fluently and handed to the sequencer.
pub struct CinematicSequence<Ctx> {
    name: &'static str,
    steps: Vec<CinematicStep<Ctx>>,
    on_complete: Option<Box<dyn FnOnce(&mut Ctx)>>,
}

impl<Ctx> CinematicSequence<Ctx> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
            on_complete: None,
        }
    }

    /// Append a step that runs `action` and then holds for `duration_ms`.
    pub fn step(
        mut self,
        name: &'static str,
        duration_ms: f64,
        action: impl FnOnce(&mut Ctx) + 'static,
    ) -> Self {
        self.steps.push(CinematicStep {
            name,
            duration_ms: duration_ms.max(0.0),
            action: Some(Box::new(action)),
        });
        self
    }

    /// Append a pure delay with no action.
    pub fn pause(self, duration_ms: f64) -> Self {
        self.step("pause", duration_ms, |_| {})
    }

    /// Run `callback` once when the sequence finishes normally. Not called
    /// on [`CinematicSequencer::cancel`].
    pub fn on_complete(mut self, callback: impl FnOnce(&mut Ctx) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

struct Running<Ctx> {
    sequence: CinematicSequence<Ctx>,
    next_index: usize,
    /// Logical deadline for the next step, in the caller's clock domain.
    next_deadline_ms: f64,
}

/// Drives at most one [`CinematicSequence`] at a time.
///
/// `poll` takes the current time in milliseconds (any monotonic clock works,
/// as long as the same one is used throughout) and fires every step whose
/// logical deadline has passed. Deadlines accumulate from step durations,
/// not from observed poll times, so a late poll fires the missed steps
/// back-to-back and the sequence still ends on schedule.
pub struct CinematicSequencer<Ctx> {
    running: Option<Running<Ctx>>,
}

impl<Ctx> Default for CinematicSequencer<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> CinematicSequencer<Ctx> {
    pub fn new() -> Self {
        Self { running: None }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Name of the sequence currently playing, if any.
    pub fn current(&self) -> Option<&'static str> {
        self.running.as_ref().map(|r| r.sequence.name)
    }

    /// Start a sequence at `now_ms`. Rejected (returns false) while another
    /// sequence is still playing; callers decide whether to queue or drop.
    pub fn play(&mut self, sequence: CinematicSequence<Ctx>, now_ms: f64) -> bool {
        if let Some(running) = &self.running {
            warn!(
                "cinematic '{}' rejected: '{}' still playing",
                sequence.name, running.sequence.name
            );
            return false;
        }
        debug!(
            "cinematic '{}' started ({} steps)",
            sequence.name,
            sequence.len()
        );
        self.running = Some(Running {
            sequence,
            next_index: 0,
            next_deadline_ms: now_ms,
        });
        true
    }

    /// Abandon the current sequence without running its remaining steps.
    pub fn cancel(&mut self) {
        if let Some(running) = self.running.take() {
            debug!(
                "cinematic '{}' cancelled at step {}/{}",
                running.sequence.name,
                running.next_index,
                running.sequence.len()
            );
        }
    }

    /// Fire every step whose deadline has passed. Call once per frame.
    pub fn poll(&mut self, now_ms: f64, ctx: &mut Ctx) {
        let Some(running) = &mut self.running else {
            return;
        };

        while running.next_index < running.sequence.steps.len() {
            if now_ms < running.next_deadline_ms {
                return;
            }
            let step = &mut running.sequence.steps[running.next_index];
            debug!("cinematic '{}': step '{}'", running.sequence.name, step.name);
            if let Some(action) = step.action.take() {
                action(ctx);
            }
            running.next_deadline_ms += step.duration_ms;
            running.next_index += 1;
        }

        // All steps fired; the sequence ends once the last hold elapses
        if now_ms >= running.next_deadline_ms {
            debug!("cinematic '{}' finished", running.sequence.name);
            if let Some(finished) = self.running.take()
                && let Some(callback) = finished.sequence.on_complete
            {
                callback(ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        entries: Vec<&'static str>,
    }

    fn three_step() -> CinematicSequence<Log> {
        CinematicSequence::new("test")
            .step("a", 100.0, |log: &mut Log| log.entries.push("a"))
            .step("b", 50.0, |log: &mut Log| log.entries.push("b"))
            .step("c", 0.0, |log: &mut Log| log.entries.push("c"))
    }

    #[test]
    fn test_steps_fire_in_order_at_deadlines() {
        let mut seq = CinematicSequencer::new();
        let mut log = Log::default();
        assert!(seq.play(three_step(), 1000.0));

        // First step fires immediately at the start time
        seq.poll(1000.0, &mut log);
        assert_eq!(log.entries, vec!["a"]);

        seq.poll(1099.0, &mut log);
        assert_eq!(log.entries, vec!["a"]);

        seq.poll(1100.0, &mut log);
        assert_eq!(log.entries, vec!["a", "b"]);

        // c has zero duration, so it fires with b's deadline and the
        // sequence ends in the same poll
        seq.poll(1150.0, &mut log);
        assert_eq!(log.entries, vec!["a", "b", "c"]);
        assert!(!seq.is_running());
    }

    #[test]
    fn test_late_poll_fires_missed_steps_back_to_back() {
        let mut seq = CinematicSequencer::new();
        let mut log = Log::default();
        seq.play(three_step(), 0.0);

        // One poll far past the end runs everything, each step once
        seq.poll(10_000.0, &mut log);
        assert_eq!(log.entries, vec!["a", "b", "c"]);
        assert!(!seq.is_running());

        seq.poll(20_000.0, &mut log);
        assert_eq!(log.entries, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_play_while_active_rejected() {
        let mut seq = CinematicSequencer::new();
        let mut log = Log::default();
        assert!(seq.play(three_step(), 0.0));
        assert!(!seq.play(three_step(), 0.0));
        assert_eq!(seq.current(), Some("test"));

        seq.poll(1000.0, &mut log);
        assert!(!seq.is_running());
        assert!(seq.play(three_step(), 1000.0));
    }

    #[test]
    fn test_cancel_skips_remaining_steps() {
        let mut seq = CinematicSequencer::new();
        let mut log = Log::default();
        seq.play(three_step(), 0.0);
        seq.poll(0.0, &mut log);
        assert_eq!(log.entries, vec!["a"]);

        seq.cancel();
        assert!(!seq.is_running());
        seq.poll(10_000.0, &mut log);
        assert_eq!(log.entries, vec!["a"]);
    }

    #[test]
    fn test_jitter_does_not_accumulate() {
        let mut seq = CinematicSequencer::new();
        let mut log = Log::default();
        let seq_def = CinematicSequence::new("jitter")
            .step("a", 100.0, |log: &mut Log| log.entries.push("a"))
            .step("b", 100.0, |log: &mut Log| log.entries.push("b"))
            .step("c", 100.0, |log: &mut Log| log.entries.push("c"));
        seq.play(seq_def, 0.0);

        // Polls land late every time; deadlines stay logical, so c still
        // fires at 200, not at 200 + accumulated lateness
        seq.poll(7.0, &mut log);
        seq.poll(107.0, &mut log);
        seq.poll(199.0, &mut log);
        assert_eq!(log.entries, vec!["a", "b"]);
        seq.poll(200.0, &mut log);
        assert_eq!(log.entries, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_on_complete_fires_once_after_last_hold() {
        let mut seq = CinematicSequencer::new();
        let mut log = Log::default();
        let seq_def = CinematicSequence::new("done")
            .step("a", 100.0, |log: &mut Log| log.entries.push("a"))
            .on_complete(|log: &mut Log| log.entries.push("done"));
        seq.play(seq_def, 0.0);

        // a has fired but its hold is still running
        seq.poll(50.0, &mut log);
        assert_eq!(log.entries, vec!["a"]);

        seq.poll(100.0, &mut log);
        assert_eq!(log.entries, vec!["a", "done"]);
        seq.poll(200.0, &mut log);
        assert_eq!(log.entries, vec!["a", "done"]);
    }

    #[test]
    fn test_cancel_suppresses_on_complete() {
        let mut seq = CinematicSequencer::new();
        let mut log = Log::default();
        let seq_def = CinematicSequence::new("cut")
            .step("a", 100.0, |log: &mut Log| log.entries.push("a"))
            .on_complete(|log: &mut Log| log.entries.push("done"));
        seq.play(seq_def, 0.0);
        seq.poll(0.0, &mut log);
        seq.cancel();
        seq.poll(1000.0, &mut log);
        assert_eq!(log.entries, vec!["a"]);
    }

    #[test]
    fn test_empty_sequence_ends_immediately() {
        let mut seq = CinematicSequencer::new();
        let mut log = Log::default();
        seq.play(CinematicSequence::new("empty"), 0.0);
        seq.poll(0.0, &mut log);
        assert!(!seq.is_running());
    }
}
