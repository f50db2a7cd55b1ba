//! Software layer compositor
//!
//! Walks a [`Layer`] tree with an accumulated transform and composites it
//! into a premultiplied RGBA canvas. Clips, masks and opacity render their
//! child into an offscreen canvas first and blend it back weighted per pixel.

use crate::bitmap::{Bitmap, ImageResolver};
use crate::error::{RenderError, Result};
use crate::framebuffer::CapturedFrame;
use crate::raster::{rasterize, Coverage, DEFAULT_TOLERANCE};
use liquid_core::{Affine2D, Color, Layer, Point, Rect};

/// Premultiplied RGBA float canvas
#[derive(Clone, Debug)]
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    fn blank_like(&self) -> Self {
        Self::new(self.width, self.height)
    }

    /// Source-over blend of a premultiplied color at `index`
    fn blend(&mut self, index: usize, src: [f32; 4]) {
        let dst = &mut self.pixels[index];
        let inv = 1.0 - src[3];
        for c in 0..4 {
            dst[c] = src[c] + dst[c] * inv;
        }
    }

    fn fill(&mut self, color: Color) {
        let src = color.premultiplied();
        if src[3] >= 1.0 {
            self.pixels.fill(src);
        } else if src[3] > 0.0 {
            for i in 0..self.pixels.len() {
                self.blend(i, src);
            }
        }
    }

    fn fill_coverage(&mut self, coverage: &Coverage, color: Color) {
        let src = color.premultiplied();
        for i in 0..self.pixels.len() {
            if coverage.covers(i) {
                self.blend(i, src);
            }
        }
    }

    /// Blend `layer` over this canvas, scaling each pixel by `weight(index)`
    fn composite(&mut self, layer: &Canvas, weight: impl Fn(usize) -> f32) {
        for (i, src) in layer.pixels.iter().enumerate() {
            if src[3] <= 0.0 {
                continue;
            }
            let w = weight(i).clamp(0.0, 1.0);
            if w <= 0.0 {
                continue;
            }
            self.blend(i, src.map(|c| c * w));
        }
    }

    /// Pixel index range covered by device-space `bounds`
    fn pixel_bounds(&self, bounds: &Rect) -> Option<(u32, u32, u32, u32)> {
        let clamp_x = |x: f32| (x - 0.5).ceil().clamp(0.0, self.width as f32) as u32;
        let clamp_y = |y: f32| (y - 0.5).ceil().clamp(0.0, self.height as f32) as u32;
        let (x0, x1) = (clamp_x(bounds.x()), clamp_x(bounds.max_x()));
        let (y0, y1) = (clamp_y(bounds.y()), clamp_y(bounds.max_y()));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn to_frame(&self) -> CapturedFrame {
        let mut data = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            let a = px[3].clamp(0.0, 1.0);
            let color = if a > 0.0 {
                Color::rgba(px[0] / a, px[1] / a, px[2] / a, a)
            } else {
                Color::TRANSPARENT
            };
            data.extend_from_slice(&color.to_rgba8());
        }
        CapturedFrame::new(data, self.width, self.height)
    }
}

/// CPU renderer for layer trees
#[derive(Clone, Debug)]
pub struct SoftwareRenderer {
    tolerance: f32,
    clear_color: Color,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            clear_color: Color::TRANSPARENT,
        }
    }

    /// Path flattening tolerance in device pixels
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Color the canvas starts with before any layer is drawn
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Render `layer` into a `width`×`height` frame
    pub fn render(
        &self,
        layer: &Layer,
        width: u32,
        height: u32,
        images: &dyn ImageResolver,
    ) -> Result<CapturedFrame> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }

        let mut canvas = Canvas::new(width, height);
        canvas.fill(self.clear_color);
        self.render_layer(layer, &Affine2D::IDENTITY, &mut canvas, images);

        tracing::trace!(width, height, layers = layer.layer_count(), "rendered frame");
        Ok(canvas.to_frame())
    }

    fn render_layer(
        &self,
        layer: &Layer,
        transform: &Affine2D,
        canvas: &mut Canvas,
        images: &dyn ImageResolver,
    ) {
        if !layer.is_visible() {
            return;
        }

        match layer {
            Layer::Solid { color, .. } => canvas.fill(*color),
            Layer::Shape { path, color, .. } => {
                let coverage = self.coverage(&path.transformed(transform), canvas);
                canvas.fill_coverage(&coverage, *color);
            }
            Layer::Image { key, rect, .. } => match images.resolve(key) {
                Some(bitmap) => self.draw_image(bitmap, rect, transform, canvas),
                None => tracing::debug!(key = %key, "image not resolved, skipping"),
            },
            Layer::Stack { layers, .. } => {
                for child in layers {
                    self.render_layer(child, transform, canvas, images);
                }
            }
            Layer::Transform2D {
                transform: local,
                layer,
                ..
            } => {
                let combined = transform.then(local);
                self.render_layer(layer, &combined, canvas, images);
            }
            Layer::Clip { shape, layer, .. } => {
                let coverage = self.coverage(&shape.to_path().transformed(transform), canvas);
                if coverage.count() == 0 {
                    return;
                }
                let mut offscreen = canvas.blank_like();
                self.render_layer(layer, transform, &mut offscreen, images);
                canvas.composite(&offscreen, |i| if coverage.covers(i) { 1.0 } else { 0.0 });
            }
            Layer::Mask { mask, layer, .. } => {
                let mut mask_canvas = canvas.blank_like();
                self.render_layer(mask, transform, &mut mask_canvas, images);
                let mut offscreen = canvas.blank_like();
                self.render_layer(layer, transform, &mut offscreen, images);
                canvas.composite(&offscreen, |i| mask_canvas.pixels[i][3]);
            }
            Layer::Opacity { value, layer, .. } => {
                let opacity = value.clamp(0.0, 1.0);
                if opacity <= 0.0 {
                    return;
                }
                let mut offscreen = canvas.blank_like();
                self.render_layer(layer, transform, &mut offscreen, images);
                canvas.composite(&offscreen, |_| opacity);
            }
            Layer::Empty { .. } => {}
        }
    }

    fn coverage(&self, device_path: &liquid_core::Path, canvas: &Canvas) -> Coverage {
        rasterize(device_path, canvas.width, canvas.height, self.tolerance)
    }

    /// Nearest-neighbour image draw through the inverse transform
    fn draw_image(&self, bitmap: &Bitmap, rect: &Rect, transform: &Affine2D, canvas: &mut Canvas) {
        if rect.is_empty() {
            return;
        }
        let Some(inverse) = transform.invert() else {
            tracing::debug!("singular image transform, skipping");
            return;
        };
        let bounds = transform.transform_rect_bounds(rect);
        let Some((x0, y0, x1, y1)) = canvas.pixel_bounds(&bounds) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let local = inverse.transform_point(Point::new(x as f32 + 0.5, y as f32 + 0.5));
                let u = (local.x - rect.x()) / rect.width();
                let v = (local.y - rect.y()) / rect.height();
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let index = y as usize * canvas.width as usize + x as usize;
                canvas.blend(index, bitmap.sample(u, v).premultiplied());
            }
        }
    }
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::NoImages;
    use liquid_core::{ClipShape, Path};
    use std::collections::HashMap;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn render(layer: &Layer) -> CapturedFrame {
        SoftwareRenderer::new().render(layer, 10, 10, &NoImages).unwrap()
    }

    #[test]
    fn test_zero_size_is_an_error() {
        let result = SoftwareRenderer::new().render(&Layer::empty(), 0, 10, &NoImages);
        assert!(matches!(result, Err(RenderError::InvalidSize { .. })));
    }

    #[test]
    fn test_clear_color_and_empty_layer() {
        let frame = SoftwareRenderer::new()
            .with_clear_color(Color::from_hex(0x0000FF))
            .render(&Layer::empty(), 4, 4, &NoImages)
            .unwrap();
        assert_eq!(frame.get_pixel(3, 3), Some(BLUE));

        let frame = render(&Layer::empty());
        assert_eq!(frame.get_pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_stack_paints_back_to_front() {
        let layer = Layer::stack(vec![
            Layer::solid(Color::from_hex(0xFF0000)),
            Layer::shape(Path::rect(Rect::new(0.0, 0.0, 5.0, 10.0)), Color::from_hex(0x0000FF)),
        ]);
        let frame = render(&layer);
        assert_eq!(frame.get_pixel(2, 5), Some(BLUE));
        assert_eq!(frame.get_pixel(7, 5), Some(RED));
    }

    #[test]
    fn test_hidden_layers_are_skipped() {
        let mut layer = Layer::solid(Color::from_hex(0xFF0000));
        layer.props_mut().visible = false;
        assert_eq!(render(&layer).get_pixel(5, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_transform_moves_shapes() {
        let layer = Layer::shape(Path::rect(Rect::new(0.0, 0.0, 2.0, 2.0)), Color::from_hex(0xFF0000))
            .with_transform_2d(Affine2D::translation(6.0, 6.0));
        let frame = render(&layer);
        assert_eq!(frame.get_pixel(7, 7), Some(RED));
        assert_eq!(frame.get_pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clip_limits_content() {
        let layer = Layer::solid(Color::from_hex(0xFF0000))
            .with_clip(ClipShape::Rect(Rect::new(0.0, 0.0, 3.0, 10.0)));
        let frame = render(&layer);
        assert_eq!(frame.get_pixel(2, 0), Some(RED));
        assert_eq!(frame.get_pixel(3, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clip_follows_parent_transform() {
        let layer = Layer::solid(Color::from_hex(0xFF0000))
            .with_clip(ClipShape::Rect(Rect::new(0.0, 0.0, 3.0, 10.0)))
            .with_transform_2d(Affine2D::translation(5.0, 0.0));
        let frame = render(&layer);
        assert_eq!(frame.get_pixel(2, 0), Some([0, 0, 0, 0]));
        assert_eq!(frame.get_pixel(6, 0), Some(RED));
    }

    #[test]
    fn test_mask_uses_alpha() {
        let mask = Layer::shape(Path::rect(Rect::new(5.0, 0.0, 5.0, 10.0)), Color::WHITE);
        let layer = Layer::solid(Color::from_hex(0x0000FF)).with_mask(mask);
        let frame = render(&layer);
        assert_eq!(frame.get_pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(frame.get_pixel(7, 2), Some(BLUE));
    }

    #[test]
    fn test_opacity_blends_over_background() {
        let layer = Layer::stack(vec![
            Layer::solid(Color::BLACK),
            Layer::solid(Color::WHITE).with_opacity(0.5),
        ]);
        let [r, g, b, a] = render(&layer).get_pixel(0, 0).unwrap();
        assert_eq!(a, 255);
        assert!((127..=128).contains(&r) && r == g && g == b);
    }

    #[test]
    fn test_images_are_stretched_into_rect() {
        let data = vec![
            255, 0, 0, 255, 0, 0, 255, 255, //
            0, 0, 255, 255, 255, 0, 0, 255,
        ];
        let mut images = HashMap::new();
        images.insert("checker".to_string(), Bitmap::new(2, 2, data).unwrap());

        let layer = Layer::image("checker", Rect::new(2.0, 2.0, 4.0, 4.0));
        let frame = SoftwareRenderer::new().render(&layer, 10, 10, &images).unwrap();

        assert_eq!(frame.get_pixel(2, 2), Some(RED));
        assert_eq!(frame.get_pixel(4, 2), Some(BLUE));
        assert_eq!(frame.get_pixel(2, 4), Some(BLUE));
        assert_eq!(frame.get_pixel(5, 5), Some(RED));
        assert_eq!(frame.get_pixel(6, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_missing_image_draws_nothing() {
        let layer = Layer::image("missing", Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(render(&layer).get_pixel(5, 5), Some([0, 0, 0, 0]));
    }
}
