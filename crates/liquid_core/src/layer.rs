//! Layer Model
//!
//! Every frame of the launch screen is described as a tree of composable
//! layers which a renderer flattens into pixels.
//!
//! # Layer Types
//!
//! - **Content**: Solid fills, filled paths, images
//! - **Composition**: Stack, Transform2D, Clip, Mask, Opacity

use crate::color::Color;
use crate::geometry::{Affine2D, Rect};
use crate::path::Path;

// ─────────────────────────────────────────────────────────────────────────────
// Layer Properties
// ─────────────────────────────────────────────────────────────────────────────

/// Properties common to all layers
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerProperties {
    /// Visibility (skips render entirely when false)
    pub visible: bool,

    /// Optional name for lookups and debugging
    pub name: Option<String>,
}

impl LayerProperties {
    pub fn new() -> Self {
        Self {
            visible: true,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clip Shape
// ─────────────────────────────────────────────────────────────────────────────

/// Shape used for clipping
#[derive(Clone, Debug, PartialEq)]
pub enum ClipShape {
    Rect(Rect),
    RoundedRect { rect: Rect, radius: f32 },
    Path(Path),
}

impl ClipShape {
    /// Outline of the clip region as a path
    pub fn to_path(&self) -> Path {
        match self {
            ClipShape::Rect(rect) => Path::rect(*rect),
            ClipShape::RoundedRect { rect, radius } => Path::rounded_rect(*rect, *radius),
            ClipShape::Path(path) => path.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layer Enum
// ─────────────────────────────────────────────────────────────────────────────

/// All visual content is represented as a `Layer`.
#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    /// Color filling everything its parent lets through
    Solid { color: Color, props: LayerProperties },

    /// Filled path (nonzero winding)
    Shape {
        path: Path,
        color: Color,
        props: LayerProperties,
    },

    /// Image asset stretched into `rect`
    Image {
        key: String,
        rect: Rect,
        props: LayerProperties,
    },

    /// Stack of layers composited back to front
    Stack {
        layers: Vec<Layer>,
        props: LayerProperties,
    },

    /// 2D transform applied to a layer
    Transform2D {
        transform: Affine2D,
        layer: Box<Layer>,
        props: LayerProperties,
    },

    /// Geometric clip applied to a layer
    Clip {
        shape: ClipShape,
        layer: Box<Layer>,
        props: LayerProperties,
    },

    /// Layer whose visibility is the alpha of another layer
    Mask {
        mask: Box<Layer>,
        layer: Box<Layer>,
        props: LayerProperties,
    },

    /// Opacity applied to a layer
    Opacity {
        value: f32,
        layer: Box<Layer>,
        props: LayerProperties,
    },

    /// Empty layer (useful as placeholder)
    Empty { props: LayerProperties },
}

impl Layer {
    /// Get the layer properties
    pub fn props(&self) -> &LayerProperties {
        match self {
            Layer::Solid { props, .. }
            | Layer::Shape { props, .. }
            | Layer::Image { props, .. }
            | Layer::Stack { props, .. }
            | Layer::Transform2D { props, .. }
            | Layer::Clip { props, .. }
            | Layer::Mask { props, .. }
            | Layer::Opacity { props, .. }
            | Layer::Empty { props } => props,
        }
    }

    /// Get mutable layer properties
    pub fn props_mut(&mut self) -> &mut LayerProperties {
        match self {
            Layer::Solid { props, .. }
            | Layer::Shape { props, .. }
            | Layer::Image { props, .. }
            | Layer::Stack { props, .. }
            | Layer::Transform2D { props, .. }
            | Layer::Clip { props, .. }
            | Layer::Mask { props, .. }
            | Layer::Opacity { props, .. }
            | Layer::Empty { props } => props,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.props().name.as_deref()
    }

    /// Check if the layer is visible
    pub fn is_visible(&self) -> bool {
        self.props().visible
    }

    /// Builder: name this layer
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.props_mut().name = Some(name.into());
        self
    }

    pub fn empty() -> Self {
        Layer::Empty {
            props: LayerProperties::new(),
        }
    }

    pub fn solid(color: Color) -> Self {
        Layer::Solid {
            color,
            props: LayerProperties::new(),
        }
    }

    pub fn shape(path: Path, color: Color) -> Self {
        Layer::Shape {
            path,
            color,
            props: LayerProperties::new(),
        }
    }

    pub fn image(key: impl Into<String>, rect: Rect) -> Self {
        Layer::Image {
            key: key.into(),
            rect,
            props: LayerProperties::new(),
        }
    }

    /// Create a stack of layers
    pub fn stack(layers: Vec<Layer>) -> Self {
        Layer::Stack {
            layers,
            props: LayerProperties::new(),
        }
    }

    /// Wrap this layer with a 2D transform
    pub fn with_transform_2d(self, transform: Affine2D) -> Self {
        Layer::Transform2D {
            transform,
            layer: Box::new(self),
            props: LayerProperties::new(),
        }
    }

    /// Wrap this layer with a clip shape
    pub fn with_clip(self, shape: ClipShape) -> Self {
        Layer::Clip {
            shape,
            layer: Box::new(self),
            props: LayerProperties::new(),
        }
    }

    /// Show this layer only where `mask` has alpha
    pub fn with_mask(self, mask: Layer) -> Self {
        Layer::Mask {
            mask: Box::new(mask),
            layer: Box::new(self),
            props: LayerProperties::new(),
        }
    }

    /// Wrap this layer with opacity
    pub fn with_opacity(self, value: f32) -> Self {
        Layer::Opacity {
            value,
            layer: Box::new(self),
            props: LayerProperties::new(),
        }
    }

    /// Visit all child layers (mask layers included)
    pub fn visit_children<F: FnMut(&Layer)>(&self, mut f: F) {
        match self {
            Layer::Stack { layers, .. } => {
                for layer in layers {
                    f(layer);
                }
            }
            Layer::Mask { mask, layer, .. } => {
                f(mask);
                f(layer);
            }
            Layer::Transform2D { layer, .. }
            | Layer::Clip { layer, .. }
            | Layer::Opacity { layer, .. } => {
                f(layer);
            }
            Layer::Solid { .. } | Layer::Shape { .. } | Layer::Image { .. } | Layer::Empty { .. } => {}
        }
    }

    /// Traverse this layer and its descendants in depth-first order
    pub fn traverse<F: FnMut(&Layer, usize)>(&self, mut f: F) {
        fn traverse_layer<F: FnMut(&Layer, usize)>(layer: &Layer, depth: usize, f: &mut F) {
            f(layer, depth);
            layer.visit_children(|child| traverse_layer(child, depth + 1, f));
        }

        traverse_layer(self, 0, &mut f);
    }

    /// Find the first layer (depth-first) carrying `name`
    pub fn find_named(&self, name: &str) -> Option<&Layer> {
        if self.name() == Some(name) {
            return Some(self);
        }

        match self {
            Layer::Stack { layers, .. } => layers.iter().find_map(|child| child.find_named(name)),
            Layer::Mask { mask, layer, .. } => mask
                .find_named(name)
                .or_else(|| layer.find_named(name)),
            Layer::Transform2D { layer, .. }
            | Layer::Clip { layer, .. }
            | Layer::Opacity { layer, .. } => layer.find_named(name),
            _ => None,
        }
    }

    /// Names of all named layers, depth-first
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.traverse(|layer, _| {
            if let Some(name) = layer.name() {
                names.push(name.to_string());
            }
        });
        names
    }

    /// Count total number of layers in this subtree
    pub fn layer_count(&self) -> usize {
        let mut count = 0;
        self.traverse(|_, _| count += 1);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_creation() {
        let layer = Layer::empty();
        assert!(layer.is_visible());
        assert!(layer.name().is_none());
    }

    #[test]
    fn test_layer_stack() {
        let stack = Layer::stack(vec![Layer::empty(), Layer::empty(), Layer::empty()]);

        let mut count = 0;
        stack.visit_children(|_| count += 1);
        assert_eq!(count, 3);
        assert_eq!(stack.layer_count(), 4);
    }

    #[test]
    fn test_layer_wrappers() {
        let layer = Layer::solid(Color::WHITE)
            .with_transform_2d(Affine2D::translation(10.0, 20.0))
            .with_opacity(0.5);

        assert!(matches!(layer, Layer::Opacity { .. }));
    }

    #[test]
    fn test_find_named_descends_into_masks() {
        let tiles = Layer::shape(Path::rect(Rect::new(0.0, 0.0, 4.0, 4.0)), Color::WHITE)
            .named("tiles");
        let icon = Layer::image("icon", Rect::new(0.0, 0.0, 2.0, 2.0)).named("icon");
        let root = Layer::stack(vec![
            Layer::solid(Color::BLACK).named("background"),
            icon.with_mask(tiles).named("logo"),
        ]);

        assert!(root.find_named("tiles").is_some());
        assert!(root.find_named("icon").is_some());
        assert!(root.find_named("missing").is_none());
        assert_eq!(root.names(), vec!["background", "logo", "tiles", "icon"]);
    }

    #[test]
    fn test_clip_shape_to_path() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(ClipShape::Rect(rect).to_path(), Path::rect(rect));
        assert_eq!(
            ClipShape::RoundedRect { rect, radius: 0.0 }.to_path(),
            Path::rect(rect)
        );
    }
}
