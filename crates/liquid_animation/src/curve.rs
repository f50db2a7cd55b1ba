//! Animation curves
//!
//! A curve maps elapsed time to normalized progress. Eased curves have a fixed
//! duration; spring curves run until they settle.

use crate::easing::Easing;
use crate::spring::SpringConfig;

/// Interpolation curve for a single transition
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Curve {
    /// Jump straight to the target
    #[default]
    Instant,
    /// Easing function over a fixed duration
    Eased { easing: Easing, duration_ms: f32 },
    /// Spring from rest toward the target
    Spring(SpringConfig),
}

impl Curve {
    pub fn eased(easing: Easing, duration_ms: f32) -> Self {
        Curve::Eased {
            easing,
            duration_ms,
        }
    }

    pub fn linear(duration_ms: f32) -> Self {
        Self::eased(Easing::Linear, duration_ms)
    }

    /// Critically damped spring whose response is `duration_ms`
    pub fn smooth(duration_ms: f32) -> Self {
        Curve::Spring(SpringConfig::smooth(duration_ms / 1000.0))
    }

    pub fn spring(response_secs: f32, damping_fraction: f32) -> Self {
        Curve::Spring(SpringConfig::new(response_secs, damping_fraction))
    }

    /// Normalized progress after `elapsed_ms` (0 at start, 1 at target)
    pub fn sample(&self, elapsed_ms: f32) -> f32 {
        match self {
            Curve::Instant => 1.0,
            Curve::Eased {
                easing,
                duration_ms,
            } => {
                if *duration_ms <= 0.0 {
                    return 1.0;
                }
                easing.apply(elapsed_ms / duration_ms)
            }
            Curve::Spring(config) => config.sample(elapsed_ms / 1000.0),
        }
    }

    /// Time until the curve is at (or settled within epsilon of) its target
    pub fn duration_ms(&self) -> f32 {
        match self {
            Curve::Instant => 0.0,
            Curve::Eased { duration_ms, .. } => duration_ms.max(0.0),
            Curve::Spring(config) => config.settle_ms(),
        }
    }

    pub fn is_finished(&self, elapsed_ms: f32) -> bool {
        elapsed_ms >= self.duration_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant() {
        assert_eq!(Curve::Instant.sample(0.0), 1.0);
        assert_eq!(Curve::Instant.duration_ms(), 0.0);
        assert!(Curve::Instant.is_finished(0.0));
    }

    #[test]
    fn test_linear_clamps() {
        let curve = Curve::linear(200.0);
        assert_eq!(curve.sample(100.0), 0.5);
        assert_eq!(curve.sample(500.0), 1.0);
        assert!(!curve.is_finished(199.0));
        assert!(curve.is_finished(200.0));
    }

    #[test]
    fn test_zero_duration_eased_is_instant() {
        assert_eq!(Curve::linear(0.0).sample(0.0), 1.0);
    }

    #[test]
    fn test_smooth_uses_milliseconds() {
        let curve = Curve::smooth(400.0);
        let v = curve.sample(400.0);
        assert!(v > 0.98 && v < 0.99, "{v}");
        // Settling takes longer than the nominal duration
        assert!(curve.duration_ms() > 400.0);
    }
}
