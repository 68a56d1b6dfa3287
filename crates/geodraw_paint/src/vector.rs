//! Vector helpers for annotation geometry

use geodraw_core::{DrawError, Point, Result, Vec2};

/// Midpoint of the segment a-b
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Unit vector pointing from `a` toward `b`
///
/// Fails with [`DrawError::DegenerateSegment`] when the points coincide
/// (or the direction is not finite).
pub fn unit_vector(a: Point, b: Point) -> Result<Vec2> {
    (b - a)
        .try_normalize()
        .ok_or(DrawError::DegenerateSegment { a, b })
}

/// Left-hand perpendicular of `v`, rotated a quarter turn toward +y
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Local frame of a segment: midpoint, length and unit axes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentFrame {
    pub mid: Point,
    pub length: f32,
    /// Unit vector along a -> b
    pub direction: Vec2,
    /// Unit vector perpendicular to `direction`
    pub normal: Vec2,
}

impl SegmentFrame {
    pub fn new(a: Point, b: Point) -> Result<Self> {
        let direction = unit_vector(a, b)?;
        Ok(Self {
            mid: midpoint(a, b),
            length: a.distance(b),
            direction,
            normal: perpendicular(direction),
        })
    }

    /// Point `offset` units from the midpoint along the segment
    pub fn along(&self, offset: f32) -> Point {
        self.mid + self.direction * offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        assert_eq!(
            midpoint(Point::new(0.0, 0.0), Point::new(10.0, 4.0)),
            Point::new(5.0, 2.0)
        );
    }

    #[test]
    fn test_unit_vector_and_perpendicular() {
        let v = unit_vector(Point::new(1.0, 1.0), Point::new(1.0, 5.0)).unwrap();
        assert_eq!(v, Vec2::new(0.0, 1.0));
        assert_eq!(perpendicular(v), Vec2::new(-1.0, 0.0));
        assert_eq!(perpendicular(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Point::new(5.0, 5.0);
        assert_eq!(
            unit_vector(p, p),
            Err(DrawError::DegenerateSegment { a: p, b: p })
        );
        assert!(SegmentFrame::new(p, p).is_err());
    }

    #[test]
    fn test_segment_frame() {
        let frame = SegmentFrame::new(Point::new(0.0, 0.0), Point::new(0.0, -8.0)).unwrap();
        assert_eq!(frame.mid, Point::new(0.0, -4.0));
        assert_eq!(frame.length, 8.0);
        assert_eq!(frame.direction, Vec2::new(0.0, -1.0));
        assert_eq!(frame.normal, Vec2::new(1.0, 0.0));
        assert_eq!(frame.along(2.0), Point::new(0.0, -6.0));
    }
}
