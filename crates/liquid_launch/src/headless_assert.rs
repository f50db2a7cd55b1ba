//! Assertion helpers for headless launch checks.

use crate::state::AnimationState;
use liquid_core::{Color, Layer};
use liquid_render::CapturedFrame;

/// Observable launch state used for headless assertions.
#[derive(Debug, Clone)]
pub struct LaunchSnapshot {
    pub time_ms: f32,
    pub state: AnimationState,
    /// Layer tree composed for `state`
    pub layer: Layer,
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }
}

pub fn evaluate_assert_step(expected: u8, snapshot: &LaunchSnapshot) -> AssertionResult {
    let actual = snapshot.state.step.index();
    if actual == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "step_mismatch",
            format!("expected step {expected}, got {actual} at {:.1}ms", snapshot.time_ms),
        )
    }
}

/// Check that a named value lies within `[min, max]`
pub fn evaluate_assert_range(name: &str, value: f32, min: f32, max: f32) -> AssertionResult {
    if min > max {
        return AssertionResult::failed(
            "invalid_range",
            format!("{name}: min {min} is greater than max {max}"),
        );
    }
    if (min..=max).contains(&value) {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "out_of_range",
            format!("{name}: expected {min}..={max}, got {value}"),
        )
    }
}

pub fn evaluate_assert_pixel(
    x: u32,
    y: u32,
    color: &str,
    tolerance: u8,
    frame: &CapturedFrame,
) -> AssertionResult {
    let expected = match color.parse::<Color>() {
        Ok(color) => color.to_rgba8(),
        Err(err) => return AssertionResult::failed("invalid_color", format!("{color}: {err}")),
    };
    let Some(actual) = frame.get_pixel(x, y) else {
        return AssertionResult::failed(
            "pixel_out_of_bounds",
            format!("({x}, {y}) is outside the {}x{} frame", frame.width, frame.height),
        );
    };
    if frame.pixel_matches(x, y, expected, tolerance) {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "pixel_mismatch",
            format!("({x}, {y}): expected {expected:?} ±{tolerance}, got {actual:?}"),
        )
    }
}

pub fn evaluate_assert_layer(name: &str, snapshot: &LaunchSnapshot) -> AssertionResult {
    if snapshot.layer.find_named(name).is_some() {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "missing_layer",
            format!("{name}: layer not found, present: {:?}", snapshot.layer.names()),
        )
    }
}
