//! Launch configuration file handling

use crate::error::{LaunchError, Result};
use liquid_core::{Color, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest phase speed for which every phase duration stays positive
pub const MAX_SPEED: f32 = 2.5;

/// Largest accepted viewport edge, in points
pub const MAX_VIEWPORT_EDGE: u32 = 8192;

/// Top-level launch configuration (launch.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LaunchConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub logo: LogoConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Screen size in logical points
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    390
}

fn default_height() -> u32 {
    844
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl ViewportConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// Cue times, measured from mount
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    /// When the logo phase begins
    pub logo_at_ms: f32,
    /// When the content phase begins
    pub content_at_ms: f32,
    /// Speed of the logo phase
    pub logo_speed: f32,
    /// Speed of the content phase
    pub content_speed: f32,
    /// Delay before the logo tiles slide together
    pub spacing_delay_ms: f32,
    /// Delay before the logo icon grows in
    pub icon_delay_ms: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            logo_at_ms: 500.0,
            content_at_ms: 1600.0,
            logo_speed: 1.0,
            content_speed: 2.0,
            spacing_delay_ms: 600.0,
            icon_delay_ms: 600.0,
        }
    }
}

/// Logo geometry targets
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Tile spacing when the logo mounts
    pub spacing_from: f32,
    /// Tile spacing once settled
    pub spacing_to: f32,
    /// Icon edge length once settled
    pub icon_size: f32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            spacing_from: -88.0,
            spacing_to: -14.0,
            icon_size: 68.0,
        }
    }
}

/// Colors and image files
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AssetsConfig {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default)]
    pub icon: Option<PathBuf>,
    #[serde(default)]
    pub wordmark: Option<PathBuf>,
    #[serde(default)]
    pub content: Option<PathBuf>,
}

fn default_background() -> String {
    "#0E1B3D".to_string()
}

fn default_accent() -> String {
    "#2E6BFF".to_string()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            accent: default_accent(),
            icon: None,
            wordmark: None,
            content: None,
        }
    }
}

impl AssetsConfig {
    pub fn background_color(&self) -> Result<Color> {
        Ok(self.background.parse()?)
    }

    pub fn accent_color(&self) -> Result<Color> {
        Ok(self.accent.parse()?)
    }

    /// Resolve relative image paths against `base`
    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.icon, &mut self.wordmark, &mut self.content]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Frame output settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
}

fn default_fps() -> u32 {
    60
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { fps: default_fps() }
    }
}

impl LaunchConfig {
    /// Load and validate a configuration file
    ///
    /// Relative image paths are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| LaunchError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&content)?;
        if let Some(dir) = path.parent() {
            config.assets.resolve_paths(dir);
        }
        tracing::debug!(path = %path.display(), "loaded launch configuration");
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LaunchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value the launch sequence depends on
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(LaunchError::InvalidConfig(msg));

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return invalid(format!(
                "viewport must be non-zero, got {}x{}",
                self.viewport.width, self.viewport.height
            ));
        }
        if self.viewport.width > MAX_VIEWPORT_EDGE || self.viewport.height > MAX_VIEWPORT_EDGE {
            return invalid(format!(
                "viewport edges must be at most {MAX_VIEWPORT_EDGE}, got {}x{}",
                self.viewport.width, self.viewport.height
            ));
        }
        if self.render.fps == 0 {
            return invalid("render.fps must be > 0".to_string());
        }

        let t = &self.timing;
        for (name, value) in [
            ("logo_at_ms", t.logo_at_ms),
            ("content_at_ms", t.content_at_ms),
            ("spacing_delay_ms", t.spacing_delay_ms),
            ("icon_delay_ms", t.icon_delay_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("timing.{name} must be a non-negative number, got {value}"));
            }
        }
        for (name, speed) in [("logo_speed", t.logo_speed), ("content_speed", t.content_speed)] {
            if !(speed > 0.0 && speed < MAX_SPEED) {
                return invalid(format!(
                    "timing.{name} must be in (0, {MAX_SPEED}), got {speed}"
                ));
            }
        }
        if t.content_at_ms <= t.logo_at_ms {
            return invalid(format!(
                "timing.content_at_ms ({}) must be after timing.logo_at_ms ({})",
                t.content_at_ms, t.logo_at_ms
            ));
        }

        for (name, value) in [
            ("spacing_from", self.logo.spacing_from),
            ("spacing_to", self.logo.spacing_to),
        ] {
            if !value.is_finite() {
                return invalid(format!("logo.{name} must be a finite number, got {value}"));
            }
        }
        if !(self.logo.icon_size.is_finite() && self.logo.icon_size >= 0.0) {
            return invalid(format!("logo.icon_size must be >= 0, got {}", self.logo.icon_size));
        }

        self.assets.background_color()?;
        self.assets.accent_color()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LaunchConfig::default();
        assert_eq!(config.viewport.size(), Size::new(390.0, 844.0));
        assert_eq!(config.timing.logo_at_ms, 500.0);
        assert_eq!(config.timing.content_at_ms, 1600.0);
        assert_eq!(config.logo.spacing_from, -88.0);
        assert_eq!(config.render.fps, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LaunchConfig::from_toml_str(
            r##"
            [viewport]
            width = 200

            [timing]
            content_at_ms = 2100.0

            [assets]
            accent = "#FF0000"
            "##,
        )
        .unwrap();

        assert_eq!(config.viewport.width, 200);
        assert_eq!(config.viewport.height, 844);
        assert_eq!(config.timing.content_at_ms, 2100.0);
        assert_eq!(config.timing.logo_speed, 1.0);
        assert_eq!(config.assets.accent_color().unwrap(), Color::from_hex(0xFF0000));
        assert_eq!(config.assets.background, "#0E1B3D");
    }

    #[test]
    fn test_rejects_invalid_values() {
        let cases = [
            "[viewport]\nwidth = 0",
            "[viewport]\nwidth = 100000\nheight = 100000",
            "[logo]\nspacing_from = nan",
            "[logo]\nspacing_to = inf",
            "[timing]\ncontent_speed = 2.5",
            "[timing]\nlogo_speed = 0.0",
            "[timing]\ncontent_at_ms = 400.0",
            "[timing]\nicon_delay_ms = -1.0",
            "[render]\nfps = 0",
            "[assets]\nbackground = \"navy\"",
        ];
        for case in cases {
            assert!(LaunchConfig::from_toml_str(case).is_err(), "{case}");
        }
    }

    #[test]
    fn test_parse_errors_are_reported() {
        assert!(matches!(
            LaunchConfig::from_toml_str("[viewport\nwidth = 1"),
            Err(LaunchError::Parse(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = LaunchConfig::default();
        config.timing.content_at_ms = 2100.0;
        config.assets.icon = Some(PathBuf::from("icon.png"));

        let text = config.to_toml().unwrap();
        assert_eq!(LaunchConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_resolves_relative_asset_paths() {
        let dir = std::env::temp_dir().join(format!("liquid_launch_cfg_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("launch.toml");
        fs::write(&path, "[assets]\ncontent = \"screen.png\"\n").unwrap();

        let config = LaunchConfig::load(&path).unwrap();
        assert_eq!(config.assets.content, Some(dir.join("screen.png")));

        let missing = LaunchConfig::load(&dir.join("missing.toml"));
        assert!(matches!(missing, Err(LaunchError::Read { .. })));

        let _ = fs::remove_dir_all(&dir);
    }
}
