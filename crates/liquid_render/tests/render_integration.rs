//! Integration tests for rendering layer trees into frames
//!
//! These tests verify that:
//! - Sheared and rotated shapes land where their transforms put them
//! - Nested clips and masks compose
//! - Rendering is deterministic frame to frame

use liquid_core::{Affine2D, ClipShape, Color, Layer, Path, Point, Rect};
use liquid_render::{compare_frames, Bitmap, NoImages, SoftwareRenderer};
use std::collections::HashMap;

const GREEN: [u8; 4] = [0, 255, 0, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

#[test]
fn test_sheared_rect_leans_right() {
    let tile = Layer::shape(Path::rect(Rect::new(0.0, 0.0, 10.0, 20.0)), Color::from_hex(0x00FF00))
        .with_transform_2d(Affine2D::shear_x(0.5));
    let frame = SoftwareRenderer::new().render(&tile, 30, 20, &NoImages).unwrap();

    // Top row is unshifted, bottom row is shifted by ~10px
    assert_eq!(frame.get_pixel(1, 0), Some(GREEN));
    assert_eq!(frame.get_pixel(12, 0), Some(CLEAR));
    assert_eq!(frame.get_pixel(1, 19), Some(CLEAR));
    assert_eq!(frame.get_pixel(15, 19), Some(GREEN));
}

#[test]
fn test_rotation_about_center_keeps_center() {
    let square = Layer::shape(Path::rect(Rect::new(10.0, 10.0, 20.0, 20.0)), Color::from_hex(0x00FF00))
        .with_transform_2d(Affine2D::rotation_degrees(45.0).about(Point::new(20.0, 20.0)));
    let frame = SoftwareRenderer::new().render(&square, 40, 40, &NoImages).unwrap();

    assert_eq!(frame.get_pixel(20, 20), Some(GREEN));
    // Diamond tips reach ~14px from the center, corners of the original do not survive
    assert_eq!(frame.get_pixel(20, 7), Some(GREEN));
    assert_eq!(frame.get_pixel(11, 11), Some(CLEAR));
}

#[test]
fn test_masked_image_inside_clip() {
    let mut images = HashMap::new();
    images.insert("fill".to_string(), Bitmap::solid(4, 4, Color::from_hex(0x00FF00)));

    let tiles = Layer::shape(Path::rect(Rect::new(0.0, 0.0, 10.0, 20.0)), Color::WHITE);
    let content = Layer::image("fill", Rect::new(0.0, 0.0, 20.0, 20.0)).with_mask(tiles);
    let clipped = content.with_clip(ClipShape::Rect(Rect::new(5.0, 0.0, 15.0, 20.0)));

    let frame = SoftwareRenderer::new().render(&clipped, 20, 20, &images).unwrap();
    assert_eq!(frame.get_pixel(2, 10), Some(CLEAR));
    assert_eq!(frame.get_pixel(7, 10), Some(GREEN));
    assert_eq!(frame.get_pixel(12, 10), Some(CLEAR));
}

#[test]
fn test_rendering_is_deterministic() {
    let path = Path::rounded_rect(Rect::new(3.0, 4.0, 40.0, 30.0), 12.0);
    let layer = Layer::stack(vec![
        Layer::solid(Color::from_hex(0x202020)),
        Layer::shape(path, Color::from_hex(0xFFCC00)).with_opacity(0.8),
    ]);
    let renderer = SoftwareRenderer::new();
    let a = renderer.render(&layer, 50, 40, &NoImages).unwrap();
    let b = renderer.render(&layer, 50, 40, &NoImages).unwrap();

    let result = compare_frames(&a, &b, 0.0);
    assert!(result.passed);
    assert!(a.is_identical_to(&b));
}
