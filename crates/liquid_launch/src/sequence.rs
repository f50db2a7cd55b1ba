//! Launch sequencer
//!
//! The launch runs as a fixed script of cues played against one clock. Each
//! wipe phase (logo, then content) is the same three cues parameterized by a
//! speed:
//!
//! | cue          | time                    | progress target | curve                          |
//! |--------------|-------------------------|-----------------|--------------------------------|
//! | `BeginPhase` | `start`                 | 0 → 0.4         | smooth `0.4 / speed` s         |
//! | `Hold`       | `start + 400 / speed`   | 0.45            | smooth `0.5 - 0.2·speed` s     |
//! | `Release`    | `+ 100 ms`              | 1.0             | spring of `1.9 - 0.7·speed` s  |
//!
//! The logo phase also mounts the logo, then slides its tiles together and
//! grows its icon after a delay.
//!
//! Cue effects are anchored at the cue's own time, never the tick that
//! delivered it, so coarse and fine frame rates sample identical values.

use crate::config::{LaunchConfig, LogoConfig};
use crate::error::Result;
use crate::state::{AnimationState, Step};
use liquid_animation::{Curve, CueScript, ScriptPlayer, SpringConfig, Timeline, TrackId};
use serde::{Deserialize, Serialize};

/// Progress reached by the opening smooth transition
pub const REVEAL_TARGET: f32 = 0.4;
/// Progress held briefly before the release
pub const HOLD_TARGET: f32 = 0.45;
/// Gap between the hold and the release
pub const HOLD_GAP_MS: f32 = 100.0;

const SPACING_SPRING: (f32, f32) = (0.5, 0.9);
const ICON_SPRING: (f32, f32) = (0.4, 0.9);

/// One scripted action
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LaunchAction {
    /// Enter `step` and start its wipe from zero
    BeginPhase { step: Step, speed: f32 },
    /// Ease toward the hold value
    Hold { step: Step, speed: f32 },
    /// Spring the wipe to completion
    Release { step: Step, speed: f32 },
    /// Reset logo geometry to its entering values
    MountLogo,
    /// Slide the logo tiles together
    MoveSpacing,
    /// Grow the logo icon in
    GrowIcon,
}

impl LaunchAction {
    /// Phase the action belongs to, if any
    pub fn phase(&self) -> Option<Step> {
        match self {
            LaunchAction::BeginPhase { step, .. }
            | LaunchAction::Hold { step, .. }
            | LaunchAction::Release { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Animated scalar properties
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Progress,
    LogoSpacing,
    IconSize,
}

/// Observable effect of a fired cue
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaunchEvent {
    StepChanged { at_ms: f32, step: Step },
    Set { at_ms: f32, property: Property, value: f32 },
    Animate { at_ms: f32, property: Property, to: f32 },
}

impl LaunchEvent {
    pub fn at_ms(&self) -> f32 {
        match self {
            LaunchEvent::StepChanged { at_ms, .. }
            | LaunchEvent::Set { at_ms, .. }
            | LaunchEvent::Animate { at_ms, .. } => *at_ms,
        }
    }
}

/// Curves of one wipe phase as a function of its speed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseCurves {
    pub speed: f32,
}

impl PhaseCurves {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Duration of the opening transition, also the delay before the hold
    pub fn reveal_ms(&self) -> f32 {
        400.0 / self.speed
    }

    pub fn reveal(&self) -> Curve {
        Curve::smooth(self.reveal_ms())
    }

    pub fn hold(&self) -> Curve {
        Curve::smooth((0.5 - 0.2 * self.speed) * 1000.0)
    }

    pub fn release(&self) -> Curve {
        Curve::Spring(SpringConfig::with_duration(1.9 - 0.7 * self.speed))
    }

    /// The phase's cues relative to `start_ms`
    pub fn cues(&self, step: Step, start_ms: f32) -> [(f32, LaunchAction); 3] {
        let speed = self.speed;
        let hold_at = start_ms + self.reveal_ms();
        [
            (start_ms, LaunchAction::BeginPhase { step, speed }),
            (hold_at, LaunchAction::Hold { step, speed }),
            (hold_at + HOLD_GAP_MS, LaunchAction::Release { step, speed }),
        ]
    }
}

/// Build the launch script
pub fn launch_script(config: &LaunchConfig) -> CueScript<LaunchAction> {
    let t = &config.timing;
    let mut script = CueScript::new();

    script.extend(PhaseCurves::new(t.logo_speed).cues(Step::Logo, t.logo_at_ms));
    script.push(t.logo_at_ms, LaunchAction::MountLogo);
    script.push(t.logo_at_ms + t.spacing_delay_ms, LaunchAction::MoveSpacing);
    script.push(t.logo_at_ms + t.icon_delay_ms, LaunchAction::GrowIcon);
    script.extend(PhaseCurves::new(t.content_speed).cues(Step::Content, t.content_at_ms));

    script
}

struct Tracks {
    progress: TrackId,
    spacing: TrackId,
    icon: TrackId,
}

/// Plays the launch script and exposes the animation state
pub struct Sequencer {
    player: ScriptPlayer<LaunchAction>,
    timeline: Timeline,
    tracks: Tracks,
    step: Step,
    logo: LogoConfig,
    last_cue_ms: f32,
}

impl Sequencer {
    /// Validate the configuration and mount the sequencer at `t = 0`
    pub fn new(config: &LaunchConfig) -> Result<Self> {
        config.validate()?;

        let mut timeline = Timeline::new();
        let initial = AnimationState::default();
        let tracks = Tracks {
            progress: timeline.add_track("progress", initial.progress),
            spacing: timeline.add_track("logo_spacing", config.logo.spacing_from),
            icon: timeline.add_track("icon_size", config.logo.icon_size),
        };

        let script = launch_script(config);
        tracing::debug!(cues = script.len(), end_ms = script.end_ms(), "launch script built");

        Ok(Self {
            player: ScriptPlayer::new(script),
            timeline,
            tracks,
            step: Step::Blank,
            logo: config.logo,
            last_cue_ms: 0.0,
        })
    }

    /// Advance by `dt_ms` and return the effects of every cue that fired
    pub fn advance(&mut self, dt_ms: f32) -> Vec<LaunchEvent> {
        let target = self.timeline.current_time() + dt_ms.max(0.0);
        self.seek(target)
    }

    /// Advance to an absolute time; earlier times are ignored
    pub fn seek(&mut self, t_ms: f32) -> Vec<LaunchEvent> {
        let due = self.player.advance_to(t_ms).to_vec();
        let mut events = Vec::new();

        for cue in due {
            tracing::debug!(at_ms = cue.at_ms, action = ?cue.action, "cue fired");
            self.last_cue_ms = cue.at_ms;
            self.apply(cue.at_ms, cue.action, &mut events);
        }

        self.timeline.seek(self.player.time_ms());
        events
    }

    fn apply(&mut self, at_ms: f32, action: LaunchAction, events: &mut Vec<LaunchEvent>) {
        if let Some(phase) = action.phase() {
            let current = matches!(action, LaunchAction::BeginPhase { .. }) || phase == self.step;
            if !current {
                tracing::debug!(at_ms, ?action, step = %self.step, "stale phase cue skipped");
                return;
            }
        }

        match action {
            LaunchAction::BeginPhase { step, speed } => {
                if !self.enter_step(step, at_ms, events) {
                    return;
                }
                let curve = PhaseCurves::new(speed).reveal();
                self.set(Property::Progress, at_ms, 0.0, events);
                self.animate(Property::Progress, at_ms, REVEAL_TARGET, curve, events);
            }
            LaunchAction::Hold { speed, .. } => {
                let curve = PhaseCurves::new(speed).hold();
                self.animate(Property::Progress, at_ms, HOLD_TARGET, curve, events);
            }
            LaunchAction::Release { speed, .. } => {
                let curve = PhaseCurves::new(speed).release();
                self.animate(Property::Progress, at_ms, 1.0, curve, events);
            }
            LaunchAction::MountLogo => {
                let from = self.logo.spacing_from;
                self.set(Property::LogoSpacing, at_ms, from, events);
                self.set(Property::IconSize, at_ms, 0.0, events);
            }
            LaunchAction::MoveSpacing => {
                let (response, damping) = SPACING_SPRING;
                let to = self.logo.spacing_to;
                self.animate(Property::LogoSpacing, at_ms, to, Curve::spring(response, damping), events);
            }
            LaunchAction::GrowIcon => {
                let (response, damping) = ICON_SPRING;
                let to = self.logo.icon_size;
                self.animate(Property::IconSize, at_ms, to, Curve::spring(response, damping), events);
            }
        }
    }

    fn enter_step(&mut self, step: Step, at_ms: f32, events: &mut Vec<LaunchEvent>) -> bool {
        if step <= self.step {
            tracing::warn!(requested = %step, current = %self.step, at_ms, "ignoring step regression");
            return false;
        }
        tracing::info!(step = %step, at_ms, "launch step changed");
        self.step = step;
        events.push(LaunchEvent::StepChanged { at_ms, step });
        true
    }

    fn track(&self, property: Property) -> TrackId {
        match property {
            Property::Progress => self.tracks.progress,
            Property::LogoSpacing => self.tracks.spacing,
            Property::IconSize => self.tracks.icon,
        }
    }

    fn set(&mut self, property: Property, at_ms: f32, value: f32, events: &mut Vec<LaunchEvent>) {
        let id = self.track(property);
        self.timeline.set(id, at_ms, value);
        events.push(LaunchEvent::Set {
            at_ms,
            property,
            value,
        });
    }

    fn animate(
        &mut self,
        property: Property,
        at_ms: f32,
        to: f32,
        curve: Curve,
        events: &mut Vec<LaunchEvent>,
    ) {
        let id = self.track(property);
        self.timeline.animate(id, at_ms, to, curve);
        events.push(LaunchEvent::Animate {
            at_ms,
            property,
            to,
        });
    }

    /// Move to a later step outside the script
    ///
    /// Returns false, and logs a warning, when `step` is not after the
    /// current one.
    pub fn request_step(&mut self, step: Step) -> bool {
        let at_ms = self.time_ms();
        let mut events = Vec::new();
        self.enter_step(step, at_ms, &mut events)
    }

    /// Sample every property at the current time
    pub fn state(&self) -> AnimationState {
        let value = |id: TrackId| self.timeline.value(id).unwrap_or_default();
        AnimationState {
            progress: value(self.tracks.progress).clamp(0.0, 1.0),
            step: self.step,
            logo_spacing: value(self.tracks.spacing),
            icon_size: value(self.tracks.icon),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn time_ms(&self) -> f32 {
        self.timeline.current_time()
    }

    /// Instant after which nothing changes, once every cue has fired
    pub fn completion_ms(&self) -> Option<f32> {
        if !self.player.is_finished() {
            return None;
        }
        Some(self.timeline.settled_at_ms().max(self.last_cue_ms))
    }

    pub fn is_complete(&self) -> bool {
        self.completion_ms()
            .is_some_and(|done| self.time_ms() >= done)
    }

    /// Drop every cue that has not fired; running transitions continue
    pub fn teardown(&mut self) {
        if !self.player.is_cancelled() {
            tracing::info!(at_ms = self.time_ms(), pending = self.player.pending(), "launch torn down");
        }
        self.player.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer() -> Sequencer {
        Sequencer::new(&LaunchConfig::default()).unwrap()
    }

    fn step_changes(events: &[LaunchEvent]) -> Vec<(f32, Step)> {
        events
            .iter()
            .filter_map(|e| match e {
                LaunchEvent::StepChanged { at_ms, step } => Some((*at_ms, *step)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_script_layout() {
        let script = launch_script(&LaunchConfig::default());
        let times: Vec<f32> = script.cues().iter().map(|c| c.at_ms).collect();
        assert_eq!(
            times,
            vec![500.0, 500.0, 900.0, 1000.0, 1100.0, 1100.0, 1600.0, 1800.0, 1900.0]
        );
        assert_eq!(
            script.cues()[1].action,
            LaunchAction::MountLogo,
            "logo mounts after its phase begins"
        );
    }

    #[test]
    fn test_phase_curves_follow_speed() {
        let slow = PhaseCurves::new(1.0);
        let fast = PhaseCurves::new(2.0);
        assert_eq!(slow.reveal_ms(), 400.0);
        assert_eq!(fast.reveal_ms(), 200.0);
        assert_eq!(fast.hold(), Curve::smooth(100.0));
        assert_eq!(
            fast.release(),
            Curve::Spring(SpringConfig::with_duration(0.5))
        );
    }

    #[test]
    fn test_steps_change_once_in_order() {
        let mut seq = sequencer();
        let mut events = Vec::new();
        for _ in 0..200 {
            events.extend(seq.advance(16.0));
        }
        assert_eq!(
            step_changes(&events),
            vec![(500.0, Step::Logo), (1600.0, Step::Content)]
        );
    }

    #[test]
    fn test_step_boundaries() {
        let mut seq = sequencer();
        seq.seek(499.0);
        assert_eq!(seq.step(), Step::Blank);
        seq.seek(500.0);
        assert_eq!(seq.step(), Step::Logo);
        assert_eq!(seq.state().progress, 0.0);
        assert_eq!(seq.state().icon_size, 0.0);
        seq.seek(1599.0);
        assert_eq!(seq.step(), Step::Logo);
        seq.seek(1600.0);
        assert_eq!(seq.step(), Step::Content);
        assert_eq!(seq.state().progress, 0.0);
    }

    #[test]
    fn test_progress_reaches_hold_then_release() {
        let mut seq = sequencer();
        seq.seek(900.0);
        let at_hold = seq.state().progress;
        assert!(at_hold > 0.39 && at_hold < 0.4, "{at_hold}");

        seq.seek(1000.0);
        let at_release = seq.state().progress;
        assert!(at_release > at_hold && at_release < HOLD_TARGET, "{at_release}");

        seq.seek(1500.0);
        assert!(seq.state().progress > 0.8);
    }

    #[test]
    fn test_logo_geometry_animates_after_delay() {
        let mut seq = sequencer();
        seq.seek(1099.0);
        assert_eq!(seq.state().logo_spacing, -88.0);
        assert_eq!(seq.state().icon_size, 0.0);

        seq.seek(1200.0);
        assert!(seq.state().logo_spacing > -88.0);
        assert!(seq.state().icon_size > 0.0);

        seq.seek(3000.0);
        assert!((seq.state().logo_spacing + 14.0).abs() < 0.1);
        assert!((seq.state().icon_size - 68.0).abs() < 0.1);
    }

    #[test]
    fn test_completion() {
        let mut seq = sequencer();
        assert_eq!(seq.completion_ms(), None);

        seq.seek(2500.0);
        assert!((seq.state().progress - 1.0).abs() < 0.01);
        let done = seq.completion_ms().unwrap();
        assert!(done > 2600.0 && done < 2700.0, "{done}");
        assert!(!seq.is_complete());

        seq.seek(done);
        assert!(seq.is_complete());
        assert!((seq.state().progress - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_tick_size_does_not_change_values() {
        let mut fine = sequencer();
        let mut coarse = sequencer();
        for _ in 0..1200 {
            fine.advance(1.0);
        }
        for _ in 0..4 {
            coarse.advance(300.0);
        }
        assert_eq!(fine.step(), coarse.step());
        assert!((fine.state().progress - coarse.state().progress).abs() < 1e-4);
        assert!((fine.state().logo_spacing - coarse.state().logo_spacing).abs() < 1e-3);
    }

    #[test]
    fn test_seek_never_rewinds() {
        let mut seq = sequencer();
        seq.seek(1000.0);
        let before = seq.state();
        assert!(seq.seek(200.0).is_empty());
        assert_eq!(seq.time_ms(), 1000.0);
        assert_eq!(seq.state(), before);
    }

    #[test]
    fn test_teardown_drops_remaining_cues() {
        let mut seq = sequencer();
        seq.seek(1000.0);
        seq.teardown();
        let events = seq.seek(3000.0);
        assert!(events.is_empty());
        assert_eq!(seq.step(), Step::Logo);
        // The release started before teardown keeps running
        assert!(seq.state().progress > 0.99);
        assert!(seq.is_complete());
    }

    #[test]
    fn test_backwards_step_request_is_ignored() {
        let mut seq = sequencer();
        seq.seek(1700.0);
        assert!(!seq.request_step(Step::Logo));
        assert!(!seq.request_step(Step::Content));
        assert_eq!(seq.step(), Step::Content);
    }

    #[test]
    fn test_early_step_request_skips_stale_cues() {
        let mut seq = sequencer();
        seq.seek(100.0);
        assert!(seq.request_step(Step::Content));

        // The logo phase can no longer begin, and its hold and release are stale
        let events = seq.seek(1500.0);
        assert!(step_changes(&events).is_empty());
        assert_eq!(seq.state().progress, 0.0);
    }

    #[test]
    fn test_events_serialize_with_kind() {
        let event = LaunchEvent::Animate {
            at_ms: 900.0,
            property: Property::Progress,
            to: 0.45,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["kind"], "animate");
        assert_eq!(json["property"], "progress");
    }
}
