//! Keyframe tracks
//!
//! A track animates one scalar property through a list of keyframes. Each
//! keyframe is a transition descriptor `(start, from, to, curve)`; the track
//! value at time `t` is decided by the latest keyframe started at or before
//! `t` (last writer wins). A keyframe that starts from [`Origin::Current`]
//! picks up wherever the track was when it began, so retargeting a running
//! animation never jumps.

use crate::curve::Curve;
use smallvec::SmallVec;

/// Where a keyframe starts from
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Origin {
    /// The track's value at the keyframe's start time
    Current,
    /// An explicit starting value
    Value(f32),
}

/// A single transition on a track
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    /// Absolute start time in milliseconds
    pub start_ms: f32,
    /// Starting value
    pub from: Origin,
    /// Target value
    pub to: f32,
    /// Curve used to move from `from` to `to`
    pub curve: Curve,
}

impl Keyframe {
    /// Animate from the current value to `to`
    pub fn animate(start_ms: f32, to: f32, curve: Curve) -> Self {
        Self {
            start_ms,
            from: Origin::Current,
            to,
            curve,
        }
    }

    /// Set the value without animation
    pub fn jump(start_ms: f32, value: f32) -> Self {
        Self {
            start_ms,
            from: Origin::Value(value),
            to: value,
            curve: Curve::Instant,
        }
    }

    /// Time at which this keyframe reaches (or settles at) its target
    pub fn end_ms(&self) -> f32 {
        self.start_ms + self.curve.duration_ms()
    }

    fn evaluate(&self, from: f32, t_ms: f32) -> f32 {
        let eased = self.curve.sample(t_ms - self.start_ms);
        from + (self.to - from) * eased
    }
}

/// A single-property animation track
#[derive(Clone, Debug)]
pub struct KeyframeTrack {
    initial: f32,
    keyframes: SmallVec<[Keyframe; 8]>,
}

impl KeyframeTrack {
    pub fn new(initial: f32) -> Self {
        Self {
            initial,
            keyframes: SmallVec::new(),
        }
    }

    /// Add a keyframe, keeping start order
    ///
    /// Keyframes with equal start times keep insertion order, so the later
    /// one wins.
    pub fn push(&mut self, keyframe: Keyframe) {
        let idx = self
            .keyframes
            .partition_point(|k| k.start_ms <= keyframe.start_ms);
        self.keyframes.insert(idx, keyframe);
    }

    /// Builder form of [`push`](Self::push)
    pub fn with(mut self, keyframe: Keyframe) -> Self {
        self.push(keyframe);
        self
    }

    pub fn animate(&mut self, start_ms: f32, to: f32, curve: Curve) {
        self.push(Keyframe::animate(start_ms, to, curve));
    }

    pub fn set(&mut self, at_ms: f32, value: f32) {
        self.push(Keyframe::jump(at_ms, value));
    }

    pub fn initial(&self) -> f32 {
        self.initial
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Interpolated value at absolute time `t_ms`
    pub fn value_at(&self, t_ms: f32) -> f32 {
        let mut active: Option<(&Keyframe, f32)> = None;

        for keyframe in &self.keyframes {
            if keyframe.start_ms > t_ms {
                break;
            }
            let from = match keyframe.from {
                Origin::Value(v) => v,
                Origin::Current => match active {
                    Some((prev, prev_from)) => prev.evaluate(prev_from, keyframe.start_ms),
                    None => self.initial,
                },
            };
            active = Some((keyframe, from));
        }

        match active {
            Some((keyframe, from)) => keyframe.evaluate(from, t_ms),
            None => self.initial,
        }
    }

    /// Time after which the value no longer changes
    ///
    /// Only the last keyframe matters: every earlier one is superseded.
    pub fn settled_at_ms(&self) -> f32 {
        self.keyframes.last().map_or(0.0, Keyframe::end_ms)
    }

    pub fn is_settled(&self, t_ms: f32) -> bool {
        t_ms >= self.settled_at_ms()
    }

    /// Final resting value
    pub fn target(&self) -> f32 {
        self.keyframes.last().map_or(self.initial, |k| k.to)
    }
}

impl Default for KeyframeTrack {
    fn default() -> Self {
        Self::new(0.0)
    }
}
