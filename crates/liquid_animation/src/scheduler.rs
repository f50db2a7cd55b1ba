//! Cue scripts and frame clocks
//!
//! A [`CueScript`] is an ordered list of `{at_ms, action}` entries. A
//! [`ScriptPlayer`] walks it against a single clock and hands out each cue
//! exactly once, in order. Cancelling the player turns every remaining cue
//! into a no-op.

use std::time::Instant;

/// A scheduled action
#[derive(Clone, Debug, PartialEq)]
pub struct Cue<A> {
    /// Absolute fire time in milliseconds
    pub at_ms: f32,
    pub action: A,
}

/// An ordered list of cues
#[derive(Clone, Debug)]
pub struct CueScript<A> {
    cues: Vec<Cue<A>>,
}

impl<A> CueScript<A> {
    pub fn new() -> Self {
        Self { cues: Vec::new() }
    }

    /// Schedule `action` at `at_ms`
    ///
    /// Cues sharing a time fire in insertion order.
    pub fn push(&mut self, at_ms: f32, action: A) {
        let idx = self.cues.partition_point(|c| c.at_ms <= at_ms);
        self.cues.insert(idx, Cue { at_ms, action });
    }

    /// Builder form of [`push`](Self::push)
    pub fn at(mut self, at_ms: f32, action: A) -> Self {
        self.push(at_ms, action);
        self
    }

    pub fn cues(&self) -> &[Cue<A>] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Fire time of the last cue
    pub fn end_ms(&self) -> f32 {
        self.cues.last().map_or(0.0, |c| c.at_ms)
    }
}

impl<A> Default for CueScript<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Extend<(f32, A)> for CueScript<A> {
    fn extend<I: IntoIterator<Item = (f32, A)>>(&mut self, iter: I) {
        for (at_ms, action) in iter {
            self.push(at_ms, action);
        }
    }
}

/// Plays a [`CueScript`] against one clock
#[derive(Debug)]
pub struct ScriptPlayer<A> {
    script: CueScript<A>,
    cursor: usize,
    time_ms: f32,
    cancelled: bool,
}

impl<A> ScriptPlayer<A> {
    pub fn new(script: CueScript<A>) -> Self {
        Self {
            script,
            cursor: 0,
            time_ms: 0.0,
            cancelled: false,
        }
    }

    /// Advance by `dt_ms` and return the cues that became due
    pub fn advance(&mut self, dt_ms: f32) -> &[Cue<A>] {
        let target = self.time_ms + dt_ms.max(0.0);
        self.advance_to(target)
    }

    /// Advance to an absolute time and return the cues that became due
    ///
    /// Time never runs backwards; earlier targets return nothing.
    pub fn advance_to(&mut self, t_ms: f32) -> &[Cue<A>] {
        self.time_ms = self.time_ms.max(t_ms);
        if self.cancelled {
            return &[];
        }

        let start = self.cursor;
        let cues = self.script.cues();
        while self.cursor < cues.len() && cues[self.cursor].at_ms <= self.time_ms {
            self.cursor += 1;
        }
        &cues[start..self.cursor]
    }

    /// Drop every cue that has not fired yet
    pub fn cancel(&mut self) {
        if !self.cancelled {
            tracing::debug!(pending = self.pending(), "cue script cancelled");
            self.cancelled = true;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of cues still waiting to fire
    pub fn pending(&self) -> usize {
        if self.cancelled {
            0
        } else {
            self.script.len() - self.cursor
        }
    }

    pub fn is_finished(&self) -> bool {
        self.pending() == 0
    }

    pub fn time_ms(&self) -> f32 {
        self.time_ms
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame Clocks
// ─────────────────────────────────────────────────────────────────────────────

/// Source of frame deltas for a render loop
pub trait FrameClock {
    /// Milliseconds elapsed since the previous call
    fn delta_ms(&mut self) -> f32;
}

/// Fixed-step clock for deterministic runs
#[derive(Clone, Copy, Debug)]
pub struct ManualClock {
    step_ms: f32,
}

impl ManualClock {
    pub fn new(step_ms: f32) -> Self {
        Self {
            step_ms: step_ms.max(0.0),
        }
    }

    pub fn from_fps(fps: u32) -> Self {
        Self::new(1000.0 / fps.max(1) as f32)
    }

    pub fn step_ms(&self) -> f32 {
        self.step_ms
    }
}

impl FrameClock for ManualClock {
    fn delta_ms(&mut self) -> f32 {
        self.step_ms
    }
}

/// Wall-clock frame timer
#[derive(Debug)]
pub struct SystemClock {
    last_frame: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn delta_ms(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> CueScript<&'static str> {
        CueScript::new()
            .at(500.0, "logo")
            .at(1600.0, "content")
            .at(500.0, "spacing")
            .at(900.0, "settle")
    }

    #[test]
    fn test_script_is_time_ordered() {
        let actions: Vec<_> = script().cues().iter().map(|c| c.action).collect();
        assert_eq!(actions, vec!["logo", "spacing", "settle", "content"]);
        assert_eq!(script().end_ms(), 1600.0);
    }

    #[test]
    fn test_each_cue_fires_once() {
        let mut player = ScriptPlayer::new(script());

        assert!(player.advance(499.0).is_empty());
        let fired: Vec<_> = player.advance(1.0).iter().map(|c| c.action).collect();
        assert_eq!(fired, vec!["logo", "spacing"]);
        assert!(player.advance(0.0).is_empty());

        let fired: Vec<_> = player.advance_to(5000.0).iter().map(|c| c.action).collect();
        assert_eq!(fired, vec!["settle", "content"]);
        assert!(player.is_finished());
    }

    #[test]
    fn test_time_never_rewinds() {
        let mut player = ScriptPlayer::new(script());
        player.advance_to(1000.0);
        assert!(player.advance_to(0.0).is_empty());
        assert_eq!(player.time_ms(), 1000.0);
        assert_eq!(player.pending(), 1);
    }

    #[test]
    fn test_cancel_drops_pending_cues() {
        let mut player = ScriptPlayer::new(script());
        player.advance_to(600.0);
        player.cancel();

        assert!(player.advance_to(10_000.0).is_empty());
        assert!(player.is_cancelled());
        assert!(player.is_finished());
    }

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::from_fps(50);
        assert_eq!(clock.delta_ms(), 20.0);
        assert_eq!(clock.delta_ms(), 20.0);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let mut clock = SystemClock::new();
        assert!(clock.delta_ms() >= 0.0);
    }

    #[test]
    fn test_extend() {
        let mut script = CueScript::new();
        script.extend([(20.0, 'b'), (10.0, 'a')]);
        assert_eq!(script.cues()[0].action, 'a');
        assert_eq!(script.len(), 2);
    }
}
