//! Report output model for headless launch runs.

use crate::sequence::LaunchEvent;
use crate::state::AnimationState;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

/// Report status for a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a headless run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: f32,
    /// Animation state when the run stopped
    #[serde(default)]
    pub final_state: Option<AnimationState>,
    /// Cue effects observed during the run, in firing order
    #[serde(default)]
    pub events: Vec<LaunchEvent>,
    /// Time at which the launch settles, once known
    #[serde(default)]
    pub completion_ms: Option<f32>,
}

impl HeadlessReport {
    pub fn passed(elapsed_frames: u64, elapsed_ms: f32) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            message: None,
            elapsed_frames,
            elapsed_ms,
            final_state: None,
            events: Vec::new(),
            completion_ms: None,
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        message: String,
        elapsed_frames: u64,
        elapsed_ms: f32,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            message: Some(message),
            elapsed_frames,
            elapsed_ms,
            final_state: None,
            events: Vec::new(),
            completion_ms: None,
        }
    }

    /// Attach the run's final state, events and completion time
    pub fn with_run(
        mut self,
        final_state: AnimationState,
        events: Vec<LaunchEvent>,
        completion_ms: Option<f32>,
    ) -> Self {
        self.final_state = Some(final_state);
        self.events = events;
        self.completion_ms = completion_ms;
        self
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    /// Write JSON to a relative path, creating parent directories
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if path.is_absolute() || path.has_root() {
            bail!("report path must be relative and must not start with a separator");
        }
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            bail!("report path cannot contain '..' or drive prefixes");
        }
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        std::fs::write(path, payload).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
