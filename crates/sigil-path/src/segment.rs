//! Segments
//!
//! Geometric primitives built from drawing commands.

use crate::Vec2;
use crate::path::PathCommand;

/// Polyline subdivisions used to estimate curve length
const CURVE_LENGTH_STEPS: usize = 10;

/// Minimum gap that `closePath` bridges with a line
const CLOSE_EPSILON: f32 = 0.001;

/// Segment geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentKind {
    Line,
    Arc { center: Vec2, radius: f32, start_angle: f32, end_angle: f32 },
    Quadratic { control: Vec2 },
    Cubic { control1: Vec2, control2: Vec2 },
}

/// A single sampled primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    pub kind: SegmentKind,
    /// Exact for lines and arcs, polyline estimate for curves
    pub length: f32,
}

impl Segment {
    /// Straight line
    pub fn line(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Line,
            length: (end - start).norm(),
        }
    }

    /// Circular arc; endpoints lie on the circle
    pub fn arc(center: Vec2, radius: f32, start_angle: f32, end_angle: f32) -> Self {
        Self {
            start: point_on_circle(center, radius, start_angle),
            end: point_on_circle(center, radius, end_angle),
            kind: SegmentKind::Arc { center, radius, start_angle, end_angle },
            length: radius * (end_angle - start_angle).abs(),
        }
    }

    /// Quadratic Bezier curve
    pub fn quadratic(start: Vec2, control: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Quadratic { control },
            length: polyline_length(start, |t| quadratic_bezier(start, control, end, t)),
        }
    }

    /// Cubic Bezier curve
    pub fn cubic(start: Vec2, control1: Vec2, control2: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Cubic { control1, control2 },
            length: polyline_length(start, |t| cubic_bezier(start, control1, control2, end, t)),
        }
    }

    /// Evaluate at `t` in `[0, 1]`
    pub fn point_at(&self, t: f32) -> Vec2 {
        match self.kind {
            SegmentKind::Line => self.start.lerp(&self.end, t),
            SegmentKind::Arc { center, radius, start_angle, end_angle } => {
                point_on_circle(center, radius, lerp(start_angle, end_angle, t))
            }
            SegmentKind::Quadratic { control } => {
                quadratic_bezier(self.start, control, self.end, t)
            }
            SegmentKind::Cubic { control1, control2 } => {
                cubic_bezier(self.start, control1, control2, self.end, t)
            }
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn point_on_circle(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    Vec2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Quadratic Bezier at `t`
pub fn quadratic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

/// Cubic Bezier at `t`
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    p0 * (uu * u) + p1 * (3.0 * uu * t) + p2 * (3.0 * u * tt) + p3 * (tt * t)
}

fn polyline_length(start: Vec2, curve: impl Fn(f32) -> Vec2) -> f32 {
    let mut length = 0.0;
    let mut prev = start;
    for i in 1..=CURVE_LENGTH_STEPS {
        let curr = curve(i as f32 / CURVE_LENGTH_STEPS as f32);
        length += (curr - prev).norm();
        prev = curr;
    }
    length
}

/// Builds segments while tracking the pen and the current subpath start
#[derive(Debug, Clone)]
pub struct SegmentBuilder {
    segments: Vec<Segment>,
    current: Vec2,
    path_start: Vec2,
}

impl Default for SegmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentBuilder {
    /// Create new empty builder, pen at the origin
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            current: Vec2::zeros(),
            path_start: Vec2::zeros(),
        }
    }

    /// Current pen position
    pub fn current(&self) -> Vec2 {
        self.current
    }

    /// Apply one command
    pub fn push(&mut self, command: PathCommand) {
        match command {
            PathCommand::MoveTo(x, y) => {
                self.current = Vec2::new(x, y);
                self.path_start = self.current;
            }
            PathCommand::LineTo(x, y) => {
                let end = Vec2::new(x, y);
                self.segments.push(Segment::line(self.current, end));
                self.current = end;
            }
            PathCommand::Arc { x, y, radius, start_angle, end_angle } => {
                if radius < 0.0 {
                    tracing::debug!("Skipping arc with negative radius {}", radius);
                    return;
                }
                let arc = Segment::arc(Vec2::new(x, y), radius, start_angle, end_angle);
                self.current = arc.end;
                self.segments.push(arc);
            }
            PathCommand::QuadraticCurveTo { cpx, cpy, x, y } => {
                let end = Vec2::new(x, y);
                self.segments.push(Segment::quadratic(self.current, Vec2::new(cpx, cpy), end));
                self.current = end;
            }
            PathCommand::BezierCurveTo { cp1x, cp1y, cp2x, cp2y, x, y } => {
                let end = Vec2::new(x, y);
                self.segments.push(Segment::cubic(
                    self.current,
                    Vec2::new(cp1x, cp1y),
                    Vec2::new(cp2x, cp2y),
                    end,
                ));
                self.current = end;
            }
            PathCommand::ClosePath => {
                if (self.path_start - self.current).norm() > CLOSE_EPSILON {
                    self.segments.push(Segment::line(self.current, self.path_start));
                    self.current = self.path_start;
                }
            }
        }
    }

    /// Collected segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Consume the builder
    pub fn finish(self) -> Vec<Segment> {
        self.segments
    }
}
