//! The liquid wipe shape
//!
//! [`LiquidShape`] turns a progress value into a closed path: a band anchored
//! 200pt past the right edge whose left boundary is a two-segment cubic
//! "bulge" that sweeps left as progress grows. The path is only ever used as
//! a clip and is rebuilt for every interpolated progress value.
//!
//! [`MaskPlacement`] positions that path over the screen: laid out in an
//! oversized frame, nudged up and right, tilted by 2°, and mirrored
//! vertically during the content phase.

use liquid_core::{Affine2D, Path, Point, Rect, Size};

/// How far past the right edge the band is anchored
const OVERHANG: f32 = 200.0;

/// Closed liquid path for one progress value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiquidShape {
    pub progress: f32,
}

impl LiquidShape {
    pub fn new(progress: f32) -> Self {
        Self { progress }
    }

    /// X of the bulge's top end
    pub fn right_edge_x(&self, width: f32) -> f32 {
        width * (1.0 - self.progress)
    }

    /// How far the bulge reaches left of the edge
    pub fn bulge_depth(&self, width: f32) -> f32 {
        width * 0.3 * self.progress + 200.0 - self.progress * 100.0
    }

    /// Horizontal shift of the bottom corner
    ///
    /// Zero up to progress 0.45, then `450 - 1000 * progress`; it goes
    /// negative past 0.45 and reaches -550 at progress 1.
    pub fn bottom_right_offset(&self) -> f32 {
        if self.progress > 0.45 {
            self.progress * -1000.0 + 450.0
        } else {
            0.0
        }
    }

    /// The closed path inside a `width`×`height` rect at the origin
    pub fn path(&self, width: f32, height: f32) -> Path {
        let edge = self.right_edge_x(width);
        let bulge = self.bulge_depth(width);
        let far = width + OVERHANG;

        Path::builder()
            .move_to(far, 0.0)
            .line_to(far, height)
            .line_to(edge + self.bottom_right_offset(), height)
            .cubic_to(
                edge - bulge * 0.4,
                height * 0.75,
                edge - bulge,
                height * 0.7,
                edge - bulge,
                height * 0.57,
            )
            .cubic_to(
                edge - bulge,
                height * 0.45,
                edge - bulge * 0.4,
                height * 0.25,
                edge,
                0.0,
            )
            .line_to(far, 0.0)
            .close()
            .build()
    }
}

/// Where the liquid shape sits relative to the screen
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskPlacement {
    /// Extra width and height of the shape's frame over the screen
    pub overscan: Size,
    /// Offset of the frame from its centered position
    pub offset: Point,
    /// Clockwise tilt about the screen center
    pub rotation_degrees: f32,
}

impl Default for MaskPlacement {
    fn default() -> Self {
        Self {
            overscan: Size::new(250.0, 400.0),
            offset: Point::new(180.0, -190.0),
            rotation_degrees: 2.0,
        }
    }
}

impl MaskPlacement {
    /// Size of the rect the shape is laid out in
    pub fn frame_size(&self, screen: Size) -> Size {
        Size::new(
            screen.width + self.overscan.width,
            screen.height + self.overscan.height,
        )
    }

    /// The shape's frame in screen space, before rotation and flipping
    pub fn frame(&self, screen: Size) -> Rect {
        let size = self.frame_size(screen);
        let origin = Point::new(
            (screen.width - size.width) / 2.0 + self.offset.x,
            (screen.height - size.height) / 2.0 + self.offset.y,
        );
        Rect::from_origin_size(origin, size)
    }

    /// Shape-local to screen transform
    pub fn transform(&self, screen: Size, flipped: bool) -> Affine2D {
        let center = screen.to_rect().center();
        let origin = self.frame(screen).origin;

        let place = Affine2D::translation(origin.x, origin.y);
        let tilt = Affine2D::rotation_degrees(self.rotation_degrees).about(center);
        let flip = if flipped {
            Affine2D::scale(1.0, -1.0).about(center)
        } else {
            Affine2D::IDENTITY
        };

        flip.then(&tilt).then(&place)
    }

    /// Screen-space mask path for `progress`
    pub fn mask(&self, progress: f32, screen: Size, flipped: bool) -> Path {
        let frame = self.frame_size(screen);
        LiquidShape::new(progress)
            .path(frame.width, frame.height)
            .transformed(&self.transform(screen, flipped))
    }
}

/// Screen-space mask path with the default placement
pub fn liquid_mask(progress: f32, screen: Size, flipped: bool) -> Path {
    MaskPlacement::default().mask(progress, screen, flipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use liquid_core::PathCommand;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_parameters_at_zero() {
        let shape = LiquidShape::new(0.0);
        assert_eq!(shape.right_edge_x(390.0), 390.0);
        assert_eq!(shape.bulge_depth(390.0), 200.0);
        assert_eq!(shape.bottom_right_offset(), 0.0);
    }

    #[test]
    fn test_parameters_at_one() {
        let shape = LiquidShape::new(1.0);
        assert_eq!(shape.right_edge_x(390.0), 0.0);
        assert!(approx(shape.bulge_depth(390.0), 390.0 * 0.3 + 100.0));
        assert_eq!(shape.bottom_right_offset(), -550.0);
    }

    #[test]
    fn test_bottom_offset_switches_on_after_045() {
        assert_eq!(LiquidShape::new(0.45).bottom_right_offset(), 0.0);
        let just_after = LiquidShape::new(0.46).bottom_right_offset();
        assert!(approx(just_after, -10.0), "{just_after}");
    }

    #[test]
    fn test_right_edge_is_monotonic() {
        let mut prev = f32::INFINITY;
        for i in 0..=100 {
            let x = LiquidShape::new(i as f32 / 100.0).right_edge_x(640.0);
            assert!(x < prev);
            prev = x;
        }
    }

    #[test]
    fn test_path_commands() {
        let (w, h) = (100.0, 1000.0);
        let shape = LiquidShape::new(0.5);
        let edge = 50.0;
        let bulge = 100.0 * 0.3 * 0.5 + 200.0 - 50.0;
        let cmds = shape.path(w, h).commands().to_vec();

        assert_eq!(cmds.len(), 7);
        assert_eq!(cmds[0], PathCommand::MoveTo(Point::new(300.0, 0.0)));
        assert_eq!(cmds[1], PathCommand::LineTo(Point::new(300.0, 1000.0)));
        assert_eq!(cmds[2], PathCommand::LineTo(Point::new(edge - 50.0, 1000.0)));
        assert_eq!(
            cmds[3],
            PathCommand::CubicTo {
                control1: Point::new(edge - bulge * 0.4, 750.0),
                control2: Point::new(edge - bulge, 700.0),
                end: Point::new(edge - bulge, 570.0),
            }
        );
        assert_eq!(
            cmds[4],
            PathCommand::CubicTo {
                control1: Point::new(edge - bulge, 450.0),
                control2: Point::new(edge - bulge * 0.4, 250.0),
                end: Point::new(edge, 0.0),
            }
        );
        assert_eq!(cmds[5], PathCommand::LineTo(Point::new(300.0, 0.0)));
        assert_eq!(cmds[6], PathCommand::Close);
    }

    #[test]
    fn test_frame_is_centered_then_offset() {
        let frame = MaskPlacement::default().frame(Size::new(390.0, 844.0));
        assert_eq!(frame, Rect::new(55.0, -390.0, 640.0, 1244.0));
    }

    #[test]
    fn test_transform_without_tilt_is_translation() {
        let placement = MaskPlacement {
            rotation_degrees: 0.0,
            ..Default::default()
        };
        let screen = Size::new(390.0, 844.0);
        let p = placement.transform(screen, false).transform_point(Point::ZERO);
        assert!(approx(p.x, 55.0) && approx(p.y, -390.0));

        // Flipping mirrors about the horizontal center line
        let q = placement.transform(screen, true).transform_point(Point::ZERO);
        assert!(approx(q.x, 55.0) && approx(q.y, 844.0 + 390.0));
    }

    #[test]
    fn test_tilt_keeps_screen_center() {
        let screen = Size::new(390.0, 844.0);
        let placement = MaskPlacement::default();
        let center = Point::new(195.0, 422.0);
        let local = center.offset(-55.0, 390.0);

        for flipped in [false, true] {
            let tf = placement.transform(screen, flipped);
            let p = tf.transform_point(local);
            assert!(approx(p.x, center.x) && approx(p.y, center.y), "{p:?}");
        }
    }

    #[test]
    fn test_liquid_mask_bounds_follow_progress() {
        let screen = Size::new(390.0, 844.0);
        let start = liquid_mask(0.0, screen, false).bounds().unwrap();
        let end = liquid_mask(1.0, screen, false).bounds().unwrap();

        // At rest the band lies right of the screen
        assert!(start.x() > screen.width);
        // Fully advanced it spans the whole screen
        assert!(end.x() < 0.0 && end.max_x() > screen.width);
        assert!(end.y() < 0.0 && end.max_y() > screen.height);
    }
}
