//! Core error types

use thiserror::Error;

/// Errors produced while building core values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Color string was not `#RRGGBB` or `#RRGGBBAA`
    #[error("invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
