//! Liquid Launch Core
//!
//! Foundational types shared by the animation, rendering and launch crates:
//!
//! - **Geometry**: points, sizes, rects and 2D affine transforms
//! - **Paths**: move/line/cubic commands with a fluent builder
//! - **Layers**: a composable tree (fills, images, clips, masks) describing a frame
//!
//! # Example
//!
//! ```rust
//! use liquid_core::{ClipShape, Color, Layer, Path, Rect};
//!
//! let content = Layer::solid(Color::from_hex(0x3366FF)).named("content");
//! let frame = content.with_clip(ClipShape::Path(Path::rect(Rect::new(0.0, 0.0, 50.0, 50.0))));
//!
//! assert!(frame.find_named("content").is_some());
//! ```

pub mod color;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod path;

pub use color::Color;
pub use error::{CoreError, Result};
pub use geometry::{Affine2D, Point, Rect, Size};
pub use layer::{ClipShape, Layer, LayerProperties};
pub use path::{Path, PathBuilder, PathCommand};
