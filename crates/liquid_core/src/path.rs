//! Path building and representation

use crate::geometry::{Affine2D, Point, Rect};
use smallvec::SmallVec;

/// Control-point ratio for approximating a quarter circle with one cubic
const KAPPA: f32 = 0.552_284_8;

/// Path command
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    Close,
}

impl PathCommand {
    fn map_points(self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(f(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(f(p)),
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => PathCommand::CubicTo {
                control1: f(control1),
                control2: f(control2),
                end: f(end),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// A 2D path composed of commands
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 16]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PathBuilder {
        PathBuilder::new()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Closed axis-aligned rectangle
    pub fn rect(rect: Rect) -> Self {
        PathBuilder::new()
            .move_to(rect.x(), rect.y())
            .line_to(rect.max_x(), rect.y())
            .line_to(rect.max_x(), rect.max_y())
            .line_to(rect.x(), rect.max_y())
            .close()
            .build()
    }

    /// Closed rectangle with uniform circular corners
    ///
    /// The radius is clamped to half the shorter side.
    pub fn rounded_rect(rect: Rect, radius: f32) -> Self {
        let r = radius.max(0.0).min(rect.width() / 2.0).min(rect.height() / 2.0);
        if r <= 0.0 {
            return Self::rect(rect);
        }

        let (x0, y0, x1, y1) = (rect.x(), rect.y(), rect.max_x(), rect.max_y());
        let k = r * KAPPA;

        PathBuilder::new()
            .move_to(x0 + r, y0)
            .line_to(x1 - r, y0)
            .cubic_to(x1 - r + k, y0, x1, y0 + r - k, x1, y0 + r)
            .line_to(x1, y1 - r)
            .cubic_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1)
            .line_to(x0 + r, y1)
            .cubic_to(x0 + r - k, y1, x0, y1 - r + k, x0, y1 - r)
            .line_to(x0, y0 + r)
            .cubic_to(x0, y0 + r - k, x0 + r - k, y0, x0 + r, y0)
            .close()
            .build()
    }

    /// Copy of this path with every point mapped through `transform`
    pub fn transformed(&self, transform: &Affine2D) -> Path {
        if transform.is_identity() {
            return self.clone();
        }
        Path {
            commands: self
                .commands
                .iter()
                .map(|cmd| cmd.map_points(|p| transform.transform_point(p)))
                .collect(),
        }
    }

    /// Bounds of all end and control points
    ///
    /// Control points bound their cubic, so this is a conservative box.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.commands.iter().flat_map(|cmd| {
            let pts: SmallVec<[Point; 3]> = match *cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => smallvec::smallvec![p],
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => smallvec::smallvec![control1, control2, end],
                PathCommand::Close => SmallVec::new(),
            };
            pts
        });

        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for p in points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Rect::from_corners(min, max))
    }
}

/// Builder for constructing paths
pub struct PathBuilder {
    path: Path,
    current: Point,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            path: Path::new(),
            current: Point::ZERO,
        }
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        let point = Point::new(x, y);
        self.path.commands.push(PathCommand::MoveTo(point));
        self.current = point;
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        let point = Point::new(x, y);
        self.path.commands.push(PathCommand::LineTo(point));
        self.current = point;
        self
    }

    pub fn cubic_to(mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> Self {
        let end = Point::new(x, y);
        self.path.commands.push(PathCommand::CubicTo {
            control1: Point::new(c1x, c1y),
            control2: Point::new(c2x, c2y),
            end,
        });
        self.current = end;
        self
    }

    /// Point-based variant of [`cubic_to`](Self::cubic_to)
    pub fn curve_to(self, end: Point, control1: Point, control2: Point) -> Self {
        self.cubic_to(control1.x, control1.y, control2.x, control2.y, end.x, end.y)
    }

    pub fn close(mut self) -> Self {
        self.path.commands.push(PathCommand::Close);
        self
    }

    /// Last point written
    pub fn current(&self) -> Point {
        self.current
    }

    pub fn build(self) -> Path {
        self.path
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}
