//! Captured frames
//!
//! Provides functionality to:
//! - Hold rendered frames in CPU memory
//! - Export frames as PNG
//! - Compare frames for snapshot checks

use crate::error::{RenderError, Result};
use std::path::Path;

/// Rendered frame pixels.
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    /// Raw pixel data (RGBA8, straight alpha)
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Frame number (if capturing a sequence)
    pub frame_number: u64,
    /// Animation time the frame was rendered at
    pub time_ms: f32,
}

impl CapturedFrame {
    /// Create a new captured frame.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            frame_number: 0,
            time_ms: 0.0,
        }
    }

    /// Create with frame number.
    pub fn with_frame_number(mut self, frame: u64) -> Self {
        self.frame_number = frame;
        self
    }

    pub fn with_time_ms(mut self, time_ms: f32) -> Self {
        self.time_ms = time_ms;
        self
    }

    /// Get the number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Get expected data length for RGBA8.
    pub fn expected_size(&self) -> usize {
        self.pixel_count() * 4
    }

    /// Get a pixel at (x, y) as RGBA.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Whether the pixel at (x, y) is within `tolerance` of `expected` on every channel
    pub fn pixel_matches(&self, x: u32, y: u32, expected: [u8; 4], tolerance: u8) -> bool {
        self.get_pixel(x, y).is_some_and(|actual| {
            actual
                .iter()
                .zip(expected.iter())
                .all(|(a, e)| a.abs_diff(*e) <= tolerance)
        })
    }

    /// Compare with another frame, returning the number of different pixels.
    pub fn diff_pixel_count(&self, other: &CapturedFrame) -> usize {
        if self.width != other.width || self.height != other.height {
            return self.pixel_count().max(other.pixel_count());
        }

        self.data
            .chunks(4)
            .zip(other.data.chunks(4))
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Check if two frames are identical.
    pub fn is_identical_to(&self, other: &CapturedFrame) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }

    /// Calculate the percentage of pixels that differ.
    pub fn diff_percentage(&self, other: &CapturedFrame) -> f32 {
        let total = self.pixel_count().max(1) as f32;
        let diff = self.diff_pixel_count(other) as f32;
        (diff / total) * 100.0
    }

    /// Export the frame as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.data.len() != self.expected_size() {
            return Err(RenderError::BufferSize {
                expected: self.expected_size(),
                actual: self.data.len(),
            });
        }
        image::save_buffer_with_format(
            path.as_ref(),
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        Ok(())
    }
}

/// Frame sequence for capturing multiple frames.
#[derive(Debug)]
pub struct FrameSequence {
    frames: Vec<CapturedFrame>,
    max_frames: usize,
}

impl FrameSequence {
    /// Create a new frame sequence with maximum capacity.
    pub fn new(max_frames: usize) -> Self {
        Self {
            frames: Vec::with_capacity(max_frames.min(1000)),
            max_frames,
        }
    }

    /// Add a frame to the sequence. Frames past capacity are dropped and
    /// `false` is returned.
    pub fn push(&mut self, frame: CapturedFrame) -> bool {
        if self.frames.len() < self.max_frames {
            self.frames.push(frame);
            true
        } else {
            tracing::warn!(
                frame = frame.frame_number,
                max_frames = self.max_frames,
                "frame sequence full, dropping frame"
            );
            false
        }
    }

    /// Get the number of captured frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get a frame by index.
    pub fn get(&self, index: usize) -> Option<&CapturedFrame> {
        self.frames.get(index)
    }

    pub fn last(&self) -> Option<&CapturedFrame> {
        self.frames.last()
    }

    /// Iterate over all frames.
    pub fn iter(&self) -> impl Iterator<Item = &CapturedFrame> {
        self.frames.iter()
    }

    /// Export all frames as `<dir>/<stem>_NNNN.png`, returning the written paths.
    pub fn export_frames(
        &self,
        dir: impl AsRef<Path>,
        stem: &str,
    ) -> Result<Vec<std::path::PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.frames.len());
        for (i, frame) in self.frames.iter().enumerate() {
            let path = dir.join(format!("{stem}_{i:04}.png"));
            frame.save_png(&path)?;
            written.push(path);
        }

        tracing::debug!(count = written.len(), dir = %dir.display(), "exported frames");
        Ok(written)
    }

    /// Clear all frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

/// Visual regression test result.
#[derive(Clone, Debug)]
pub struct RegressionResult {
    /// Whether the test passed.
    pub passed: bool,
    /// Number of pixels that differ.
    pub diff_pixels: usize,
    /// Percentage of pixels that differ.
    pub diff_percentage: f32,
    /// Tolerance threshold used.
    pub tolerance: f32,
}

impl RegressionResult {
    /// Check if within tolerance.
    pub fn is_within_tolerance(&self, tolerance: f32) -> bool {
        self.diff_percentage <= tolerance
    }
}

/// Compare two frames for visual regression testing.
pub fn compare_frames(
    actual: &CapturedFrame,
    expected: &CapturedFrame,
    tolerance_percent: f32,
) -> RegressionResult {
    let diff_pixels = actual.diff_pixel_count(expected);
    let diff_percentage = actual.diff_percentage(expected);
    let passed = diff_percentage <= tolerance_percent;

    RegressionResult {
        passed,
        diff_pixels,
        diff_percentage,
        tolerance: tolerance_percent,
    }
}
