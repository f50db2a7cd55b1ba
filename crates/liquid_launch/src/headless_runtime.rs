//! Headless runtime primitives for deterministic launch runs.

use anyhow::{bail, Result};
use liquid_animation::{FrameClock, ManualClock};

/// Configuration for deterministic headless frame execution.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Number of frames to execute.
    pub max_frames: u32,
    /// Logical milliseconds between frames.
    pub tick_ms: f32,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            width: 390,
            height: 844,
            max_frames: 1,
            tick_ms: 1000.0 / 60.0,
        }
    }
}

impl HeadlessRunConfig {
    /// Frame timing for `fps` frames per second.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.tick_ms = ManualClock::from_fps(fps).step_ms();
        self
    }
}

/// Frame context passed to headless frame callbacks.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessContext {
    pub frame_index: u32,
    pub width: u32,
    pub height: u32,
    /// Time since the first frame of this run.
    pub elapsed_ms: f32,
    /// Time since the previous frame.
    pub delta_ms: f32,
}

/// Deterministic headless runtime loop.
pub struct HeadlessRuntime;

impl HeadlessRuntime {
    /// Run a fixed frame budget driven by a [`ManualClock`].
    pub fn run<F>(cfg: HeadlessRunConfig, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&HeadlessContext),
    {
        if cfg.width == 0 || cfg.height == 0 {
            bail!("headless dimensions must be non-zero");
        }
        if cfg.max_frames == 0 {
            bail!("headless max_frames must be > 0");
        }
        if !(cfg.tick_ms.is_finite() && cfg.tick_ms > 0.0) {
            bail!("headless tick_ms must be > 0");
        }

        let mut clock = ManualClock::new(cfg.tick_ms);
        let mut elapsed_ms = 0.0;
        for frame in 0..cfg.max_frames {
            let delta_ms = clock.delta_ms();
            elapsed_ms += delta_ms;
            on_frame(&HeadlessContext {
                frame_index: frame,
                width: cfg.width,
                height: cfg.height,
                elapsed_ms,
                delta_ms,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_every_frame_with_fixed_delta() {
        let cfg = HeadlessRunConfig {
            max_frames: 4,
            tick_ms: 10.0,
            ..Default::default()
        };
        let mut seen = Vec::new();
        HeadlessRuntime::run(cfg, |ctx| seen.push((ctx.frame_index, ctx.elapsed_ms, ctx.delta_ms)))
            .unwrap();
        assert_eq!(
            seen,
            vec![(0, 10.0, 10.0), (1, 20.0, 10.0), (2, 30.0, 10.0), (3, 40.0, 10.0)]
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let zero_size = HeadlessRunConfig {
            width: 0,
            ..Default::default()
        };
        assert!(HeadlessRuntime::run(zero_size, |_| {}).is_err());

        let zero_frames = HeadlessRunConfig {
            max_frames: 0,
            ..Default::default()
        };
        assert!(HeadlessRuntime::run(zero_frames, |_| {}).is_err());

        let zero_tick = HeadlessRunConfig {
            tick_ms: 0.0,
            ..Default::default()
        };
        assert!(HeadlessRuntime::run(zero_tick, |_| {}).is_err());
    }

    #[test]
    fn test_fps_sets_tick() {
        let cfg = HeadlessRunConfig::default().with_fps(50);
        assert_eq!(cfg.tick_ms, 20.0);
    }
}
