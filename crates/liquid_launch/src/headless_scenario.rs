//! Scenario definition for headless launch checks.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Sequence of headless scenario steps.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("invalid scenario JSON")
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Whether any step needs a rendered frame
    pub fn needs_frames(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s, ScenarioStep::AssertPixel { .. } | ScenarioStep::Capture))
    }
}

/// Scenario steps.
///
/// Time advances only through `wait` and `tick`; assertions observe the
/// state after the last advance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Advance by `ms`, one frame tick at a time
    Wait { ms: f32 },
    /// Advance by whole frames
    Tick { frames: u32 },
    /// Current step index (0, 1 or 2)
    AssertStep { step: u8 },
    AssertProgress { min: f32, max: f32 },
    AssertSpacing { min: f32, max: f32 },
    /// Rendered pixel color as `#RRGGBB[AA]`
    AssertPixel {
        x: u32,
        y: u32,
        color: String,
        #[serde(default)]
        tolerance: u8,
    },
    /// A layer with this name is present in the current frame
    AssertLayer { name: String },
    /// Keep the rendered frame
    Capture,
}
