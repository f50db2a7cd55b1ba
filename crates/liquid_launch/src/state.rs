//! Animation state shared by the sequencer and the view

use serde::{Deserialize, Serialize};
use std::fmt;

/// Launch phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Background only
    #[default]
    Blank = 0,
    /// Liquid wipe reveals the logo
    Logo = 1,
    /// Liquid wipe reveals the content
    Content = 2,
}

impl Step {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Step> {
        match index {
            0 => Some(Step::Blank),
            1 => Some(Step::Logo),
            2 => Some(Step::Content),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Blank => "blank",
            Step::Logo => "logo",
            Step::Content => "content",
        };
        write!(f, "{name}")
    }
}

/// Everything the view reads in one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    /// Wipe progress of the current phase
    pub progress: f32,
    pub step: Step,
    /// Gap between logo tiles (negative values overlap)
    pub logo_spacing: f32,
    /// Edge length of the logo icon
    pub icon_size: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            step: Step::Blank,
            logo_spacing: -88.0,
            icon_size: 68.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert!(Step::Blank < Step::Logo);
        assert!(Step::Logo < Step::Content);
        assert_eq!(Step::Content.index(), 2);
    }

    #[test]
    fn test_step_from_index() {
        for step in [Step::Blank, Step::Logo, Step::Content] {
            assert_eq!(Step::from_index(step.index()), Some(step));
        }
        assert_eq!(Step::from_index(3), None);
    }

    #[test]
    fn test_state_serializes_step_by_name() {
        let state = AnimationState {
            step: Step::Logo,
            ..Default::default()
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["step"], "logo");
        assert_eq!(json["logo_spacing"], -88.0);
        assert_eq!(Step::Content.to_string(), "content");
    }
}
