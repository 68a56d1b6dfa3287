//! Geometric primitives
//!
//! Each primitive knows how to append itself to a context's current path.
//! Unset fields fall back to documented defaults instead of failing.

use geodraw_core::{DrawContext, Point, Result};
use smallvec::SmallVec;

use crate::path::Emit;
use crate::text::Text;

/// Axis-aligned rectangle from a corner and a size
///
/// Negative sizes are allowed and span back from the corner. A rectangle is
/// always its own closed contour, also when it extends a path.
/// Defaults to a zero-size rectangle at the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two opposite corners
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x - a.x, b.y - a.y)
    }

    /// The four corners in emission order
    pub fn corners(&self) -> [Point; 4] {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.width, self.y + self.height);
        [
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }
}

impl Emit for Rectangle {
    fn emit(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        let [p0, p1, p2, p3] = self.corners();
        ctx.move_to(p0);
        ctx.line_to(p1);
        ctx.line_to(p2);
        ctx.line_to(p3);
        ctx.close_path();
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "rectangle"
    }
}

/// Straight segment from `start` to `end`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

impl Emit for Line {
    fn emit(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        ctx.move_to(self.start);
        ctx.line_to(self.end);
        Ok(())
    }

    fn emit_extending(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        ctx.line_to(self.start);
        ctx.line_to(self.end);
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "line"
    }
}

/// Polyline through `points`, closed back to the first point when `closed`
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub points: SmallVec<[Point; 8]>,
    pub closed: bool,
}

impl Default for Polygon {
    fn default() -> Self {
        Self {
            points: SmallVec::new(),
            closed: true,
        }
    }
}

impl Polygon {
    /// Closed polygon through `points`
    pub fn new<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            closed: true,
        }
    }

    /// Open polyline through `points`
    pub fn open<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Self {
        Self {
            closed: false,
            ..Self::new(points)
        }
    }

    fn trace(&self, ctx: &mut dyn DrawContext, rest: &[Point]) {
        for p in rest {
            ctx.line_to(*p);
        }
        if self.closed {
            ctx.close_path();
        }
    }
}

impl Emit for Polygon {
    fn emit(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        let Some((first, rest)) = self.points.split_first() else {
            return Ok(());
        };
        ctx.move_to(*first);
        self.trace(ctx, rest);
        Ok(())
    }

    /// Joins the first point to the current contour; closing then returns
    /// to the start of that contour
    fn emit_extending(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        let Some((first, rest)) = self.points.split_first() else {
            return Ok(());
        };
        ctx.line_to(*first);
        self.trace(ctx, rest);
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "polygon"
    }
}

/// Which region a [`Circle`] outlines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArcKind {
    /// The arc alone
    #[default]
    Arc,
    /// Pie slice: center, arc, back to center
    Sector,
    /// Arc closed by its chord
    Segment,
}

/// Circle or part of one
///
/// Angles are radians from the positive x-axis. The sweep follows the
/// context's `arc` contract: from `start_angle` in the positive-angle
/// direction to `end_angle`. Defaults to a full circle.
///
/// Arcs and segments join an existing current point with a line, so they
/// extend a path as they are. A sector always starts its own contour at the
/// center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub kind: ArcKind,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            center: Point::ZERO,
            radius: 0.0,
            start_angle: 0.0,
            end_angle: std::f32::consts::TAU,
            kind: ArcKind::Arc,
        }
    }
}

impl Circle {
    pub fn new(center: Point, radius: f32) -> Self {
        Self {
            center,
            radius,
            ..Default::default()
        }
    }

    pub fn with_angles(mut self, start_angle: f32, end_angle: f32, kind: ArcKind) -> Self {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self.kind = kind;
        self
    }
}

impl Emit for Circle {
    fn emit(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        match self.kind {
            ArcKind::Arc => {
                ctx.arc(self.center, self.radius, self.start_angle, self.end_angle);
            }
            ArcKind::Sector => {
                ctx.move_to(self.center);
                ctx.arc(self.center, self.radius, self.start_angle, self.end_angle);
                ctx.close_path();
            }
            ArcKind::Segment => {
                ctx.arc(self.center, self.radius, self.start_angle, self.end_angle);
                ctx.close_path();
            }
        }
        Ok(())
    }

    fn kind(&self) -> &'static str {
        match self.kind {
            ArcKind::Arc => "arc",
            ArcKind::Sector => "sector",
            ArcKind::Segment => "segment",
        }
    }
}

/// Any drawable shape
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeGeometry {
    Rectangle(Rectangle),
    Line(Line),
    Polygon(Polygon),
    Circle(Circle),
    Text(Text),
}

impl Emit for ShapeGeometry {
    fn emit(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        match self {
            ShapeGeometry::Rectangle(shape) => shape.emit(ctx),
            ShapeGeometry::Line(shape) => shape.emit(ctx),
            ShapeGeometry::Polygon(shape) => shape.emit(ctx),
            ShapeGeometry::Circle(shape) => shape.emit(ctx),
            ShapeGeometry::Text(shape) => shape.emit(ctx),
        }
    }

    fn emit_extending(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        match self {
            ShapeGeometry::Rectangle(shape) => shape.emit_extending(ctx),
            ShapeGeometry::Line(shape) => shape.emit_extending(ctx),
            ShapeGeometry::Polygon(shape) => shape.emit_extending(ctx),
            ShapeGeometry::Circle(shape) => shape.emit_extending(ctx),
            ShapeGeometry::Text(shape) => shape.emit_extending(ctx),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ShapeGeometry::Rectangle(shape) => shape.kind(),
            ShapeGeometry::Line(shape) => shape.kind(),
            ShapeGeometry::Polygon(shape) => shape.kind(),
            ShapeGeometry::Circle(shape) => shape.kind(),
            ShapeGeometry::Text(shape) => shape.kind(),
        }
    }
}

impl From<Rectangle> for ShapeGeometry {
    fn from(shape: Rectangle) -> Self {
        ShapeGeometry::Rectangle(shape)
    }
}

impl From<Line> for ShapeGeometry {
    fn from(shape: Line) -> Self {
        ShapeGeometry::Line(shape)
    }
}

impl From<Polygon> for ShapeGeometry {
    fn from(shape: Polygon) -> Self {
        ShapeGeometry::Polygon(shape)
    }
}

impl From<Circle> for ShapeGeometry {
    fn from(shape: Circle) -> Self {
        ShapeGeometry::Circle(shape)
    }
}

impl From<Text> for ShapeGeometry {
    fn from(shape: Text) -> Self {
        ShapeGeometry::Text(shape)
    }
}
