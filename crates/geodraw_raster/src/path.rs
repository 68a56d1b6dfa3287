//! Device-space path accumulation
//!
//! Points are transformed by the CTM as they are added, so a later `scale`
//! does not move geometry that is already in the path.

use std::f32::consts::{FRAC_PI_2, TAU};

use geodraw_core::{normalized_arc_end, point_on_circle, Point, Vec2};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Segment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// Path in device coordinates with current point tracking
#[derive(Clone, Debug, Default)]
pub(crate) struct DevicePath {
    segments: Vec<Segment>,
    current: Option<Point>,
    contour_start: Option<Point>,
}

impl DevicePath {
    pub fn clear(&mut self) {
        self.segments.clear();
        self.current = None;
        self.contour_start = None;
    }

    /// Forget the current point so the next segment starts a new contour
    pub fn break_contour(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<Point> {
        self.current
    }

    /// Move every segment of `other` onto the end of this path
    pub fn append(&mut self, other: DevicePath) {
        self.segments.extend(other.segments);
        if other.current.is_some() {
            self.current = other.current;
            self.contour_start = other.contour_start;
        }
    }

    pub fn move_to(&mut self, p: Point) {
        self.segments.push(Segment::MoveTo(p));
        self.current = Some(p);
        self.contour_start = Some(p);
    }

    pub fn line_to(&mut self, p: Point) {
        if self.current.is_none() {
            self.move_to(p);
            return;
        }
        self.segments.push(Segment::LineTo(p));
        self.current = Some(p);
    }

    pub fn quad_to(&mut self, c: Point, p: Point) {
        if self.current.is_none() {
            self.move_to(c);
        }
        self.segments.push(Segment::QuadTo(c, p));
        self.current = Some(p);
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) {
        if self.current.is_none() {
            self.move_to(c1);
        }
        self.segments.push(Segment::CubicTo(c1, c2, p));
        self.current = Some(p);
    }

    pub fn close(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.segments.push(Segment::Close);
        self.current = self.contour_start;
    }

    /// Build a tiny-skia path, `None` when nothing drawable was added
    pub fn to_skia(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::with_capacity(self.segments.len(), self.segments.len() * 3);
        for segment in &self.segments {
            match *segment {
                Segment::MoveTo(p) => pb.move_to(p.x, p.y),
                Segment::LineTo(p) => pb.line_to(p.x, p.y),
                Segment::QuadTo(c, p) => pb.quad_to(c.x, c.y, p.x, p.y),
                Segment::CubicTo(c1, c2, p) => pb.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                Segment::Close => pb.close(),
            }
        }
        pb.finish()
    }

    #[cfg(test)]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Cubic Bézier approximation of a circular arc in user space
///
/// Returns the start point and one `[c1, c2, end]` triple per piece; each
/// piece spans at most a quarter turn. Sweeps beyond two turns are reduced to
/// between one and two turns ending at the same angle.
pub(crate) fn arc_to_cubics(
    center: Point,
    radius: f32,
    start_angle: f32,
    end_angle: f32,
) -> (Point, SmallVec<[[Point; 3]; 4]>) {
    let end_angle = normalized_arc_end(start_angle, end_angle);
    let start = point_on_circle(center, radius, start_angle);
    let mut sweep = end_angle - start_angle;
    if sweep > 2.0 * TAU {
        sweep = TAU + (sweep - TAU).rem_euclid(TAU);
    }
    let end_angle = start_angle + sweep;

    let mut pieces = SmallVec::new();
    if radius == 0.0 || sweep <= 0.0 || !sweep.is_finite() {
        return (start, pieces);
    }

    let n = (sweep / FRAC_PI_2 - 1e-4).ceil().max(1.0) as usize;
    let step = sweep / n as f32;
    let k = radius * 4.0 / 3.0 * (step / 4.0).tan();

    let mut a0 = start_angle;
    let mut p0 = start;
    for i in 0..n {
        let a1 = if i + 1 == n {
            end_angle
        } else {
            start_angle + step * (i + 1) as f32
        };
        let p1 = point_on_circle(center, radius, a1);
        let c1 = p0 + tangent(a0) * k;
        let c2 = p1 - tangent(a1) * k;
        pieces.push([c1, c2, p1]);
        a0 = a1;
        p0 = p1;
    }
    (start, pieces)
}

fn tangent(angle: f32) -> Vec2 {
    Vec2::new(-angle.sin(), angle.cos())
}
