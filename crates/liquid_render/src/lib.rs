//! Liquid Launch Renderer
//!
//! Deterministic CPU rendering of [`liquid_core::Layer`] trees.
//!
//! # Features
//!
//! - **Rasterization**: lyon-flattened paths filled with nonzero winding at pixel centers
//! - **Compositing**: premultiplied source-over with clips, masks and opacity
//! - **Frames**: captured RGBA8 frames, PNG export and pixel comparison
//!
//! # Example
//!
//! ```rust
//! use liquid_core::{Color, Layer};
//! use liquid_render::{NoImages, SoftwareRenderer};
//!
//! let frame = SoftwareRenderer::new()
//!     .render(&Layer::solid(Color::WHITE), 4, 4, &NoImages)
//!     .unwrap();
//! assert_eq!(frame.get_pixel(0, 0), Some([255, 255, 255, 255]));
//! ```

pub mod bitmap;
pub mod error;
pub mod framebuffer;
pub mod raster;
pub mod renderer;

pub use bitmap::{Bitmap, ImageResolver, NoImages};
pub use error::{RenderError, Result};
pub use framebuffer::{compare_frames, CapturedFrame, FrameSequence, RegressionResult};
pub use raster::{rasterize, Coverage, DEFAULT_TOLERANCE};
pub use renderer::SoftwareRenderer;
