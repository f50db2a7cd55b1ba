//! Launch screen error types

use liquid_core::CoreError;
use liquid_render::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while configuring or assembling the launch screen
#[derive(Error, Debug)]
pub enum LaunchError {
    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a configuration file failed
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML could not be written
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for launch screen operations
pub type Result<T> = std::result::Result<T, LaunchError>;
