//! Path rasterization
//!
//! Paths are flattened into line segments through lyon's path iterators and
//! filled with a nonzero-winding scanline pass. Coverage is binary and sampled
//! at pixel centers, so the same path always produces the same pixels.

use liquid_core::{Path, PathCommand, Point};
use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::PathEvent;

/// Flattening tolerance in device pixels
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// Start an implicit subpath at the origin when none is open
fn begin_if_needed(events: &mut Vec<PathEvent>, first: &mut Option<Point>) {
    if first.is_none() {
        events.push(PathEvent::Begin {
            at: point(0.0, 0.0),
        });
        *first = Some(Point::ZERO);
    }
}

/// Convert a liquid_core Path to lyon path events
fn path_to_lyon_events(path: &Path) -> Vec<PathEvent> {
    let mut events = Vec::new();
    let mut first_point: Option<Point> = None;
    let mut current_point = Point::ZERO;

    for cmd in path.commands() {
        match *cmd {
            PathCommand::MoveTo(p) => {
                if let Some(first) = first_point {
                    // End previous subpath
                    events.push(PathEvent::End {
                        last: point(current_point.x, current_point.y),
                        first: point(first.x, first.y),
                        close: false,
                    });
                }
                events.push(PathEvent::Begin { at: point(p.x, p.y) });
                first_point = Some(p);
                current_point = p;
            }
            PathCommand::LineTo(p) => {
                begin_if_needed(&mut events, &mut first_point);
                events.push(PathEvent::Line {
                    from: point(current_point.x, current_point.y),
                    to: point(p.x, p.y),
                });
                current_point = p;
            }
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => {
                begin_if_needed(&mut events, &mut first_point);
                events.push(PathEvent::Cubic {
                    from: point(current_point.x, current_point.y),
                    ctrl1: point(control1.x, control1.y),
                    ctrl2: point(control2.x, control2.y),
                    to: point(end.x, end.y),
                });
                current_point = end;
            }
            PathCommand::Close => {
                if let Some(first) = first_point.take() {
                    events.push(PathEvent::End {
                        last: point(current_point.x, current_point.y),
                        first: point(first.x, first.y),
                        close: true,
                    });
                    current_point = first;
                }
            }
        }
    }

    // Close any remaining open subpath
    if let Some(first) = first_point {
        events.push(PathEvent::End {
            last: point(current_point.x, current_point.y),
            first: point(first.x, first.y),
            close: false,
        });
    }

    events
}

/// A non-horizontal line segment, stored top to bottom
#[derive(Clone, Copy, Debug)]
struct Edge {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    /// +1 for downward segments, -1 for upward ones
    winding: i32,
}

impl Edge {
    fn new(from: lyon::math::Point, to: lyon::math::Point) -> Option<Self> {
        if from.y == to.y {
            return None;
        }
        let (winding, a, b) = if from.y < to.y {
            (1, from, to)
        } else {
            (-1, to, from)
        };
        Some(Self {
            x0: a.x,
            y0: a.y,
            x1: b.x,
            y1: b.y,
            winding,
        })
    }

    fn x_at(&self, y: f32) -> f32 {
        self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0)
    }
}

/// Flatten a path into edges; every subpath is implicitly closed
fn flatten_edges(path: &Path, tolerance: f32) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut skipped = 0usize;

    let mut push = |from: lyon::math::Point, to: lyon::math::Point, edges: &mut Vec<Edge>| {
        if !(from.x.is_finite() && from.y.is_finite() && to.x.is_finite() && to.y.is_finite()) {
            skipped += 1;
            return;
        }
        if let Some(edge) = Edge::new(from, to) {
            edges.push(edge);
        }
    };

    for event in path_to_lyon_events(path)
        .into_iter()
        .flattened(tolerance.max(1e-3))
    {
        match event {
            PathEvent::Line { from, to } => push(from, to, &mut edges),
            PathEvent::End { last, first, .. } => push(last, first, &mut edges),
            PathEvent::Begin { .. } | PathEvent::Quadratic { .. } | PathEvent::Cubic { .. } => {}
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "dropped non-finite path segments while flattening");
    }
    edges
}

/// Binary per-pixel coverage
#[derive(Clone, Debug, PartialEq)]
pub struct Coverage {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Coverage {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    pub fn full(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at (x, y) is covered; out of bounds is uncovered
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[self.index(x, y)]
    }

    /// Coverage by linear pixel index
    pub fn covers(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Number of covered pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Cover every pixel on row `y` whose center lies in `[x_start, x_end)`
    fn fill_span(&mut self, y: u32, x_start: f32, x_end: f32) {
        let width = self.width as f32;
        let clamp = |x: f32| (x - 0.5).ceil().clamp(0.0, width) as u32;
        let (from, to) = (clamp(x_start), clamp(x_end));
        let row = y as usize * self.width as usize;
        for x in from..to {
            self.bits[row + x as usize] = true;
        }
    }
}

/// Rasterize `path` (already in device space) with nonzero winding
pub fn rasterize(path: &Path, width: u32, height: u32, tolerance: f32) -> Coverage {
    let mut coverage = Coverage::empty(width, height);
    let edges = flatten_edges(path, tolerance);
    if edges.is_empty() {
        return coverage;
    }

    let (min_y, max_y) = edges
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.y0), hi.max(e.y1))
        });
    let row_start = (min_y - 0.5).ceil().clamp(0.0, height as f32) as u32;
    let row_end = (max_y - 0.5).ceil().clamp(0.0, height as f32) as u32;

    let mut crossings: Vec<(f32, i32)> = Vec::new();
    for y in row_start..row_end {
        let yc = y as f32 + 0.5;
        crossings.clear();
        crossings.extend(
            edges
                .iter()
                .filter(|e| yc >= e.y0 && yc < e.y1)
                .map(|e| (e.x_at(yc), e.winding)),
        );
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0;
        for pair in crossings.windows(2) {
            winding += pair[0].1;
            if winding != 0 {
                coverage.fill_span(y, pair[0].0, pair[1].0);
            }
        }
    }

    coverage
}
