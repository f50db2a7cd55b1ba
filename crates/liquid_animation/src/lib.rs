//! Liquid Launch Animation System
//!
//! Closed-form curves, keyframe tracks and cue scripts for frame-driven
//! animation.
//!
//! # Features
//!
//! - **Curves**: easing functions and critically/under/over-damped springs
//! - **Keyframe Tracks**: last-writer-wins transitions that retarget from the current value
//! - **Timelines**: named property tracks sampled against one clock
//! - **Cue Scripts**: ordered `{at_ms, action}` lists fired exactly once

pub mod curve;
pub mod easing;
pub mod keyframe;
pub mod scheduler;
pub mod spring;
pub mod timeline;

pub use curve::Curve;
pub use easing::Easing;
pub use keyframe::{Keyframe, KeyframeTrack, Origin};
pub use scheduler::{Cue, CueScript, FrameClock, ManualClock, ScriptPlayer, SystemClock};
pub use spring::{SpringConfig, SETTLE_EPSILON};
pub use timeline::{Timeline, TrackId};
