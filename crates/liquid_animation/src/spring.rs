//! Spring curves
//!
//! Springs are parameterized by `response` (the period of the undamped
//! oscillation, in seconds) and `damping_fraction` (1.0 = critically damped).
//! With unit mass this gives
//!
//! ```text
//! stiffness = (2π / response)²
//! damping   = 4π · damping_fraction / response
//! ```
//!
//! Curves are evaluated in closed form from rest at 0 toward 1, so a frame at
//! any elapsed time can be sampled directly without integrating earlier frames.

use std::f64::consts::PI;

/// Distance to target below which a spring counts as settled
pub const SETTLE_EPSILON: f32 = 1e-3;

/// Upper bound on the settle search (seconds)
const MAX_SETTLE_SECS: f64 = 60.0;

/// Spring parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Period of the undamped oscillation in seconds
    pub response: f32,
    /// Damping ratio (< 1 bounces, 1 is critical, > 1 is sluggish)
    pub damping_fraction: f32,
}

impl SpringConfig {
    pub fn new(response: f32, damping_fraction: f32) -> Self {
        Self {
            response: response.max(1e-3),
            damping_fraction: damping_fraction.max(0.0),
        }
    }

    /// Critically damped spring settling over roughly `duration_secs`
    pub fn smooth(duration_secs: f32) -> Self {
        Self::new(duration_secs, 1.0)
    }

    /// Spring with a perceptual duration and no bounce
    pub fn with_duration(duration_secs: f32) -> Self {
        Self::smooth(duration_secs)
    }

    /// Quick spring with a hint of overshoot
    pub fn snappy() -> Self {
        Self::new(0.3, 0.85)
    }

    /// Slow, heavily damped spring
    pub fn gentle() -> Self {
        Self::new(0.8, 1.0)
    }

    /// Visible bounce
    pub fn wobbly() -> Self {
        Self::new(0.6, 0.5)
    }

    fn omega(&self) -> f64 {
        2.0 * PI / self.response as f64
    }

    pub fn stiffness(&self) -> f32 {
        self.omega().powi(2) as f32
    }

    pub fn damping(&self) -> f32 {
        (4.0 * PI * self.damping_fraction as f64 / self.response as f64) as f32
    }

    /// Position of a unit step response at `t_secs` (0 at rest, 1 at target)
    ///
    /// Under-damped springs overshoot past 1 before settling.
    pub fn sample(&self, t_secs: f32) -> f32 {
        if t_secs <= 0.0 {
            return 0.0;
        }
        (1.0 - self.displacement(t_secs as f64)) as f32
    }

    /// Signed distance to the target at `t`, starting from 1
    fn displacement(&self, t: f64) -> f64 {
        let w = self.omega();
        let zeta = self.damping_fraction as f64;

        if (zeta - 1.0).abs() < 1e-4 {
            (1.0 + w * t) * (-w * t).exp()
        } else if zeta < 1.0 {
            let wd = w * (1.0 - zeta * zeta).sqrt();
            (-zeta * w * t).exp() * ((wd * t).cos() + (zeta * w / wd) * (wd * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -w * (zeta - root);
            let r2 = -w * (zeta + root);
            (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
        }
    }

    /// Upper bound on |displacement| from `t` onward
    fn envelope(&self, t: f64) -> f64 {
        let zeta = self.damping_fraction as f64;
        if zeta < 1.0 - 1e-4 {
            let w = self.omega();
            (-zeta * w * t).exp() / (1.0 - zeta * zeta).sqrt()
        } else {
            // Critically and over-damped springs approach monotonically
            self.displacement(t).abs()
        }
    }

    /// Seconds until the spring stays within `epsilon` of its target
    pub fn settle_time(&self, epsilon: f32) -> f32 {
        let eps = epsilon.max(1e-6) as f64;
        let step = 1e-3;
        let mut t = 0.0;
        while t < MAX_SETTLE_SECS && self.envelope(t) >= eps {
            t += step;
        }
        t as f32
    }

    /// Settle time at [`SETTLE_EPSILON`], in milliseconds
    pub fn settle_ms(&self) -> f32 {
        self.settle_time(SETTLE_EPSILON) * 1000.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(0.55, 0.825)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_rest() {
        for cfg in [
            SpringConfig::smooth(0.4),
            SpringConfig::wobbly(),
            SpringConfig::new(0.5, 2.0),
        ] {
            assert_eq!(cfg.sample(0.0), 0.0);
            assert!(cfg.sample(0.001) < 0.01);
        }
    }

    #[test]
    fn test_reaches_target() {
        for cfg in [
            SpringConfig::smooth(0.4),
            SpringConfig::new(0.5, 0.9),
            SpringConfig::new(0.5, 2.0),
        ] {
            let settle = cfg.settle_time(SETTLE_EPSILON);
            assert!((cfg.sample(settle) - 1.0).abs() < SETTLE_EPSILON, "{cfg:?}");
            assert!((cfg.sample(settle + 1.0) - 1.0).abs() < SETTLE_EPSILON, "{cfg:?}");
        }
    }

    #[test]
    fn test_critical_spring_is_monotonic() {
        let cfg = SpringConfig::with_duration(0.5);
        let mut prev = 0.0;
        for i in 1..=200 {
            let v = cfg.sample(i as f32 * 0.005);
            assert!(v >= prev && v <= 1.0);
            prev = v;
        }
    }

    #[test]
    fn test_under_damped_overshoots() {
        let cfg = SpringConfig::wobbly();
        let peak = (1..200)
            .map(|i| cfg.sample(i as f32 * 0.01))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.05);
    }

    #[test]
    fn test_smooth_is_nearly_done_at_its_duration() {
        // A critically damped spring is ~98.6% of the way at t = response
        let v = SpringConfig::smooth(0.4).sample(0.4);
        assert!((v - 0.986).abs() < 0.002, "{v}");
    }

    #[test]
    fn test_physical_constants() {
        let cfg = SpringConfig::new(1.0, 1.0);
        assert!((cfg.stiffness() - (2.0 * std::f32::consts::PI).powi(2)).abs() < 1e-3);
        assert!((cfg.damping() - 4.0 * std::f32::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn test_settle_time_scales_with_response() {
        let fast = SpringConfig::smooth(0.2).settle_time(SETTLE_EPSILON);
        let slow = SpringConfig::smooth(0.4).settle_time(SETTLE_EPSILON);
        assert!((slow / fast - 2.0).abs() < 0.02);
    }
}
