//! Render error types

use thiserror::Error;

/// Errors produced while rendering, loading or saving frames
#[derive(Error, Debug)]
pub enum RenderError {
    /// Frame or bitmap dimensions of zero
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// Pixel buffer length does not match its dimensions
    #[error("pixel buffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// Image decode or encode failure
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;
