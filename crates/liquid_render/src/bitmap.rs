//! Decoded images and image lookup

use crate::error::{RenderError, Result};
use liquid_core::Color;
use std::collections::HashMap;
use std::path::Path;

/// RGBA8 image with straight alpha
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw RGBA8 pixels
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Single-color bitmap
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let pixel = color.to_rgba8();
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Decode an image file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        tracing::debug!(path = %path.display(), width, height, "decoded image");
        Self::new(width, height, decoded.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at (x, y) as RGBA8
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Nearest-neighbour sample at normalized coordinates
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let x = ((u * self.width as f32).floor() as i64).clamp(0, self.width as i64 - 1) as u32;
        let y = ((v * self.height as f32).floor() as i64).clamp(0, self.height as i64 - 1) as u32;
        match self.pixel(x, y) {
            Some([r, g, b, a]) => Color::from_rgba8(r, g, b, a),
            None => Color::TRANSPARENT,
        }
    }
}

/// Maps image keys used by [`Layer::Image`](liquid_core::Layer::Image) to bitmaps
pub trait ImageResolver {
    fn resolve(&self, key: &str) -> Option<&Bitmap>;
}

impl ImageResolver for HashMap<String, Bitmap> {
    fn resolve(&self, key: &str) -> Option<&Bitmap> {
        self.get(key)
    }
}

/// Resolver with no images
#[derive(Clone, Copy, Debug, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, _key: &str) -> Option<&Bitmap> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_bitmap() {
        let bitmap = Bitmap::solid(3, 2, Color::from_hex(0x102030));
        assert_eq!(bitmap.data().len(), 24);
        assert_eq!(bitmap.pixel(2, 1), Some([0x10, 0x20, 0x30, 0xFF]));
        assert_eq!(bitmap.pixel(3, 0), None);
    }

    #[test]
    fn test_new_validates_buffer() {
        assert!(matches!(
            Bitmap::new(0, 4, Vec::new()),
            Err(RenderError::InvalidSize { .. })
        ));
        assert!(matches!(
            Bitmap::new(2, 2, vec![0; 15]),
            Err(RenderError::BufferSize {
                expected: 16,
                actual: 15
            })
        ));
        assert!(Bitmap::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_sample_is_nearest_and_clamped() {
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        let bitmap = Bitmap::new(2, 2, data).unwrap();

        assert_eq!(bitmap.sample(0.1, 0.1).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(bitmap.sample(0.9, 0.1).to_rgba8(), [0, 255, 0, 255]);
        assert_eq!(bitmap.sample(0.1, 0.9).to_rgba8(), [0, 0, 255, 255]);
        assert_eq!(bitmap.sample(1.0, 1.0).to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(bitmap.sample(-3.0, 0.0).to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_hashmap_resolver() {
        let mut images = HashMap::new();
        images.insert("icon".to_string(), Bitmap::solid(1, 1, Color::WHITE));
        assert!(images.resolve("icon").is_some());
        assert!(images.resolve("wordmark").is_none());
        assert!(NoImages.resolve("icon").is_none());
    }
}
