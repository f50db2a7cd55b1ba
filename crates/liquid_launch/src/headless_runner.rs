//! Scenario runner and frame renderer for headless launch runs.

use crate::assets::{AssetCatalog, Palette};
use crate::config::LaunchConfig;
use crate::headless_assert::{
    evaluate_assert_layer, evaluate_assert_pixel, evaluate_assert_range, evaluate_assert_step,
    AssertionResult, LaunchSnapshot,
};
use crate::headless_report::HeadlessReport;
use crate::headless_runtime::{HeadlessContext, HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use crate::sequence::{LaunchEvent, Sequencer};
use crate::state::AnimationState;
use crate::view::LaunchView;
use anyhow::{bail, Context, Result};
use liquid_animation::{FrameClock, ManualClock};
use liquid_core::Layer;
use liquid_render::{CapturedFrame, FrameSequence, SoftwareRenderer};

/// Upper bound on kept scenario captures.
pub const MAX_CAPTURES: usize = 256;
/// Upper bound on frames kept in memory by [`render_sequence`].
pub const MAX_RENDERED_FRAMES: usize = 2048;
/// Longest launch time a render or scenario may reach.
pub const MAX_RUN_MS: f32 = 60_000.0;

/// Sequencer, view, assets and renderer driven by one clock.
pub struct LaunchHarness {
    sequencer: Sequencer,
    view: LaunchView,
    assets: AssetCatalog,
    renderer: SoftwareRenderer,
    width: u32,
    height: u32,
    frames: u64,
    events: Vec<LaunchEvent>,
}

impl LaunchHarness {
    /// Build a harness, loading the configured assets
    pub fn new(config: &LaunchConfig) -> Result<Self> {
        let assets = AssetCatalog::load(&config.assets).context("loading launch assets")?;
        Self::with_assets(config, assets)
    }

    pub fn with_assets(config: &LaunchConfig, assets: AssetCatalog) -> Result<Self> {
        let sequencer = Sequencer::new(config).context("building launch sequence")?;
        let view = LaunchView::new(config)?;
        let renderer = SoftwareRenderer::new().with_clear_color(view.palette().background);

        Ok(Self {
            sequencer,
            view,
            assets,
            renderer,
            width: config.viewport.width,
            height: config.viewport.height,
            frames: 0,
            events: Vec::new(),
        })
    }

    /// Advance one frame by `dt_ms`
    pub fn advance(&mut self, dt_ms: f32) {
        let events = self.sequencer.advance(dt_ms);
        self.record_frame(events);
    }

    /// Advance one frame to the absolute time `t_ms`
    pub fn advance_to(&mut self, t_ms: f32) {
        let events = self.sequencer.seek(t_ms);
        self.record_frame(events);
    }

    fn record_frame(&mut self, events: Vec<LaunchEvent>) {
        self.frames += 1;
        self.events.extend(events);
    }

    pub fn time_ms(&self) -> f32 {
        self.sequencer.time_ms()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn state(&self) -> AnimationState {
        self.sequencer.state()
    }

    pub fn events(&self) -> &[LaunchEvent] {
        &self.events
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    /// Layer tree for the current state
    pub fn compose(&self) -> Layer {
        self.view.compose(&self.state())
    }

    pub fn snapshot(&self) -> LaunchSnapshot {
        let state = self.state();
        LaunchSnapshot {
            time_ms: self.time_ms(),
            state,
            layer: self.view.compose(&state),
        }
    }

    /// Render the current frame
    pub fn render(&self) -> Result<CapturedFrame> {
        let frame = self
            .renderer
            .render(&self.compose(), self.width, self.height, &self.assets)
            .context("rendering launch frame")?
            .with_frame_number(self.frames)
            .with_time_ms(self.time_ms());
        tracing::debug!(frame = self.frames, time_ms = self.time_ms(), "captured frame");
        Ok(frame)
    }

    /// Report for a run that ended here
    pub fn report(&self, report: HeadlessReport) -> HeadlessReport {
        report.with_run(self.state(), self.events.clone(), self.sequencer.completion_ms())
    }
}

/// Final outcome of a scenario run.
#[derive(Debug)]
pub enum RunOutcome {
    Passed {
        report: HeadlessReport,
        captures: FrameSequence,
    },
    Failed {
        report: HeadlessReport,
        captures: FrameSequence,
    },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report, .. } => report,
            RunOutcome::Failed { report, .. } => report,
        }
    }

    /// Frames kept by `capture` steps
    pub fn captures(&self) -> &FrameSequence {
        match self {
            RunOutcome::Passed { captures, .. } => captures,
            RunOutcome::Failed { captures, .. } => captures,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON against a launch configuration.
pub fn run_scenario(input: &str, config: &LaunchConfig) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, config)
}

/// Execute a pre-loaded scenario against a launch configuration.
///
/// Image assets are only decoded when some step renders a frame.
pub fn run_loaded_scenario(scenario: &HeadlessScenario, config: &LaunchConfig) -> Result<RunOutcome> {
    let harness = if scenario.needs_frames() {
        LaunchHarness::new(config)?
    } else {
        let palette = Palette::from_config(&config.assets).context("reading launch palette")?;
        LaunchHarness::with_assets(config, AssetCatalog::placeholders(palette))?
    };
    run_scenario_with_harness(scenario, harness, config.render.fps)
}

/// Execute a scenario on an existing harness, ticking at `fps`.
pub fn run_scenario_with_harness(
    scenario: &HeadlessScenario,
    mut harness: LaunchHarness,
    fps: u32,
) -> Result<RunOutcome> {
    let runtime_cfg = HeadlessRunConfig {
        width: harness.width,
        height: harness.height,
        ..Default::default()
    }
    .with_fps(fps);
    let mut captures = FrameSequence::new(MAX_CAPTURES);
    let mut latest_frame: Option<CapturedFrame> = None;

    for (step_index, step) in scenario.steps.iter().enumerate() {
        let result = match step {
            ScenarioStep::Wait { ms } => {
                if !(ms.is_finite() && *ms >= 0.0) {
                    bail!("step {step_index}: wait ms must be a non-negative number, got {ms}");
                }
                let target = harness.time_ms() + ms;
                check_run_limit(step_index, target)?;
                let frames = wait_frames(*ms, runtime_cfg.tick_ms);
                run_frames(runtime_cfg, frames, |ctx| {
                    if ctx.frame_index + 1 == frames {
                        harness.advance_to(target);
                    } else {
                        harness.advance(ctx.delta_ms);
                    }
                })?;
                latest_frame = None;
                continue;
            }
            ScenarioStep::Tick { frames } => {
                check_run_limit(step_index, harness.time_ms() + *frames as f32 * runtime_cfg.tick_ms)?;
                run_frames(runtime_cfg, *frames, |ctx| harness.advance(ctx.delta_ms))?;
                latest_frame = None;
                continue;
            }
            ScenarioStep::AssertStep { step } => {
                ("assert_step", evaluate_assert_step(*step, &harness.snapshot()))
            }
            ScenarioStep::AssertProgress { min, max } => (
                "assert_progress",
                evaluate_assert_range("progress", harness.state().progress, *min, *max),
            ),
            ScenarioStep::AssertSpacing { min, max } => (
                "assert_spacing",
                evaluate_assert_range("logo_spacing", harness.state().logo_spacing, *min, *max),
            ),
            ScenarioStep::AssertPixel {
                x,
                y,
                color,
                tolerance,
            } => {
                let frame = ensure_frame(&mut latest_frame, &harness)?;
                (
                    "assert_pixel",
                    evaluate_assert_pixel(*x, *y, color, *tolerance, frame),
                )
            }
            ScenarioStep::AssertLayer { name } => {
                ("assert_layer", evaluate_assert_layer(name, &harness.snapshot()))
            }
            ScenarioStep::Capture => {
                let frame = ensure_frame(&mut latest_frame, &harness)?;
                captures.push(frame.clone());
                continue;
            }
        };

        if let (assertion, AssertionResult::Failed { message, .. }) = result {
            tracing::info!(step_index, assertion, %message, "scenario assertion failed");
            let report = harness.report(HeadlessReport::failed(
                assertion,
                step_index,
                message,
                harness.frames(),
                harness.time_ms(),
            ));
            return Ok(RunOutcome::Failed { report, captures });
        }
    }

    tracing::info!(
        frames = harness.frames(),
        time_ms = harness.time_ms(),
        "scenario passed"
    );
    let report = harness.report(HeadlessReport::passed(harness.frames(), harness.time_ms()));
    Ok(RunOutcome::Passed { report, captures })
}

fn check_run_limit(step_index: usize, target_ms: f32) -> Result<()> {
    if target_ms > MAX_RUN_MS {
        bail!("step {step_index}: scenario would run to {target_ms}ms, past the {MAX_RUN_MS}ms limit");
    }
    Ok(())
}

fn ensure_frame<'a>(
    latest_frame: &'a mut Option<CapturedFrame>,
    harness: &LaunchHarness,
) -> Result<&'a CapturedFrame> {
    if latest_frame.is_none() {
        *latest_frame = Some(harness.render()?);
    }
    latest_frame
        .as_ref()
        .context("frame missing after render")
}

fn run_frames<F>(runtime_cfg: HeadlessRunConfig, frames: u32, on_frame: F) -> Result<()>
where
    F: FnMut(&HeadlessContext),
{
    if frames == 0 {
        return Ok(());
    }
    let mut cfg = runtime_cfg;
    cfg.max_frames = frames;
    HeadlessRuntime::run(cfg, on_frame)
}

/// Frames needed to cover `wait_ms`; the last one may be shorter than a tick
fn wait_frames(wait_ms: f32, tick_ms: f32) -> u32 {
    if wait_ms <= 0.0 {
        return 0;
    }
    // Absorb f32 error in non-integral ticks such as 1000/60
    let frames = (wait_ms / tick_ms.max(f32::EPSILON) - 1e-3).ceil().max(1.0);
    frames.min(u32::MAX as f32) as u32
}

/// Frames and report of a full launch render.
#[derive(Debug)]
pub struct RenderedLaunch {
    pub frames: FrameSequence,
    pub report: HeadlessReport,
}

/// Render the launch from mount until it settles, keeping a frame every
/// `every_ms` plus the first and the last.
///
/// Fails rather than dropping frames when more than
/// [`MAX_RENDERED_FRAMES`] would be kept; use [`render_sequence_with`] to
/// stream long renders.
pub fn render_sequence(config: &LaunchConfig, every_ms: f32) -> Result<RenderedLaunch> {
    let mut frames = FrameSequence::new(MAX_RENDERED_FRAMES);
    let report = render_sequence_with(config, every_ms, |frame| {
        if !frames.push(frame) {
            bail!("render keeps more than {MAX_RENDERED_FRAMES} frames; raise every_ms");
        }
        Ok(())
    })?;
    Ok(RenderedLaunch { frames, report })
}

/// Render the launch like [`render_sequence`], handing each kept frame to
/// `on_frame` as soon as it is rendered.
pub fn render_sequence_with<F>(config: &LaunchConfig, every_ms: f32, mut on_frame: F) -> Result<HeadlessReport>
where
    F: FnMut(CapturedFrame) -> Result<()>,
{
    if !(every_ms.is_finite() && every_ms > 0.0) {
        bail!("frame interval must be > 0, got {every_ms}");
    }

    let mut harness = LaunchHarness::new(config)?;
    let mut clock = ManualClock::from_fps(config.render.fps);
    on_frame(harness.render()?)?;
    let mut kept = 1usize;
    let mut last_kept_ms = harness.time_ms();
    let mut next_capture = every_ms;

    while !harness.is_complete() {
        if harness.time_ms() >= MAX_RUN_MS {
            bail!("launch did not settle within {MAX_RUN_MS}ms");
        }
        harness.advance(clock.delta_ms());
        let t = harness.time_ms();
        if t >= next_capture {
            on_frame(harness.render()?)?;
            kept += 1;
            last_kept_ms = t;
            // Next interval boundary strictly after t, even when every_ms is
            // below f32 resolution at t
            next_capture = ((t / every_ms).floor() + 1.0) * every_ms;
            if next_capture <= t {
                next_capture = t + clock.step_ms();
            }
        }
    }

    if last_kept_ms < harness.time_ms() {
        on_frame(harness.render()?)?;
        kept += 1;
    }

    tracing::info!(frames = kept, time_ms = harness.time_ms(), "launch rendered");
    Ok(harness.report(HeadlessReport::passed(harness.frames(), harness.time_ms())))
}
