//! Fluent shape builders
//!
//! A [`Shape`] borrows a context, collects geometry through chained setters
//! and is consumed by `add` or by one of the terminal paint operations.
//!
//! ```
//! use geodraw_core::{Color, Point, RecordingContext};
//! use geodraw_paint::Shape;
//!
//! let mut ctx = RecordingContext::new();
//!
//! // Two shapes composed into one path, painted once
//! Shape::rectangle(&mut ctx)
//!     .of_corner_size(0.0, 0.0, 100.0, 100.0)
//!     .add()?
//!     .keep();
//! Shape::circle(&mut ctx)
//!     .of_center_radius(Point::new(50.0, 50.0), 20.0)
//!     .as_sub_path()
//!     .fill_stroke(Color::YELLOW, Color::BLACK, 2.0)?;
//! # Ok::<(), geodraw_core::DrawError>(())
//! ```

use geodraw_core::{Color, DrawContext, FontSlant, FontWeight, Point, Result, Vec2};

use crate::path::{emit_path, Emit, EmittedPath, PathMode};
use crate::primitives::{ArcKind, Circle, Line, Polygon, Rectangle};
use crate::text::{FontSpec, HorizontalAlign, Text, VerticalAlign};

/// Builder binding a geometry to the context it will be drawn into
pub struct Shape<'c, G> {
    ctx: &'c mut dyn DrawContext,
    geometry: G,
    mode: PathMode,
}

impl<'c, G: Emit> Shape<'c, G> {
    pub fn new(ctx: &'c mut dyn DrawContext, geometry: G) -> Self {
        Self {
            ctx,
            geometry,
            mode: PathMode::NewPath,
        }
    }

    /// Continue the current contour instead of starting a new path
    pub fn extend_path(mut self) -> Self {
        self.mode = PathMode::Extend;
        self
    }

    /// Start a disconnected contour inside the current path
    pub fn as_sub_path(mut self) -> Self {
        self.mode = PathMode::NewSubPath;
        self
    }

    pub fn with_mode(mut self, mode: PathMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> PathMode {
        self.mode
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Modify the geometry in place
    pub fn map(mut self, f: impl FnOnce(&mut G)) -> Self {
        f(&mut self.geometry);
        self
    }

    /// Emit the geometry into the context's current path
    pub fn add(self) -> Result<EmittedPath<'c>> {
        emit_path(self.ctx, &self.geometry, self.mode)?;
        Ok(EmittedPath::new(self.ctx))
    }

    /// Add, then fill (nonzero), optionally setting the color
    pub fn fill(self, color: Option<Color>) -> Result<()> {
        self.add()?.fill(color);
        Ok(())
    }

    /// Add, then stroke, optionally setting color and line width
    pub fn stroke(self, color: Option<Color>, line_width: Option<f32>) -> Result<()> {
        self.add()?.stroke(color, line_width);
        Ok(())
    }

    /// Add once, fill keeping the path, then stroke the same path
    pub fn fill_stroke(self, fill_color: Color, stroke_color: Color, line_width: f32) -> Result<()> {
        self.add()?.fill_stroke(fill_color, stroke_color, line_width);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rectangle
// ─────────────────────────────────────────────────────────────────────────────

impl<'c> Shape<'c, Rectangle> {
    pub fn rectangle(ctx: &'c mut dyn DrawContext) -> Self {
        Self::new(ctx, Rectangle::default())
    }

    pub fn of_corner_size(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.geometry = Rectangle::new(x, y, width, height);
        self
    }

    pub fn of_corners(mut self, a: Point, b: Point) -> Self {
        self.geometry = Rectangle::from_corners(a, b);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line
// ─────────────────────────────────────────────────────────────────────────────

impl<'c> Shape<'c, Line> {
    pub fn line(ctx: &'c mut dyn DrawContext) -> Self {
        Self::new(ctx, Line::default())
    }

    pub fn of_start_end(mut self, start: Point, end: Point) -> Self {
        self.geometry = Line::new(start, end);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Polygon
// ─────────────────────────────────────────────────────────────────────────────

impl<'c> Shape<'c, Polygon> {
    pub fn polygon(ctx: &'c mut dyn DrawContext) -> Self {
        Self::new(ctx, Polygon::default())
    }

    pub fn of_points<P: Into<Point>>(mut self, points: impl IntoIterator<Item = P>) -> Self {
        self.geometry.points = points.into_iter().map(Into::into).collect();
        self
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.geometry.closed = closed;
        self
    }

    pub fn open(self) -> Self {
        self.closed(false)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Circle
// ─────────────────────────────────────────────────────────────────────────────

impl<'c> Shape<'c, Circle> {
    pub fn circle(ctx: &'c mut dyn DrawContext) -> Self {
        Self::new(ctx, Circle::default())
    }

    pub fn of_center_radius(mut self, center: Point, radius: f32) -> Self {
        self.geometry.center = center;
        self.geometry.radius = radius;
        self
    }

    /// Arc from `start_angle` to `end_angle`
    pub fn as_arc(self, start_angle: f32, end_angle: f32) -> Self {
        self.with_angles(start_angle, end_angle, ArcKind::Arc)
    }

    /// Pie slice from `start_angle` to `end_angle`
    pub fn as_sector(self, start_angle: f32, end_angle: f32) -> Self {
        self.with_angles(start_angle, end_angle, ArcKind::Sector)
    }

    /// Chord-bounded segment from `start_angle` to `end_angle`
    pub fn as_segment(self, start_angle: f32, end_angle: f32) -> Self {
        self.with_angles(start_angle, end_angle, ArcKind::Segment)
    }

    fn with_angles(mut self, start_angle: f32, end_angle: f32, kind: ArcKind) -> Self {
        self.geometry = self.geometry.with_angles(start_angle, end_angle, kind);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text
// ─────────────────────────────────────────────────────────────────────────────

impl<'c> Shape<'c, Text> {
    pub fn text(ctx: &'c mut dyn DrawContext) -> Self {
        Self::new(ctx, Text::default())
    }

    pub fn of(mut self, text: impl Into<String>, position: Point) -> Self {
        self.geometry.text = text.into();
        self.geometry.position = position;
        self
    }

    pub fn font(mut self, family: impl Into<String>) -> Self {
        let current = self.geometry.font.take().unwrap_or_else(|| FontSpec::new(""));
        self.geometry.font = Some(FontSpec {
            family: family.into(),
            ..current
        });
        self
    }

    /// Weight and slant of the font, in either order with [`font`](Self::font)
    ///
    /// Without a family the style has nothing to apply to and is dropped
    /// when the text is emitted.
    pub fn font_style(mut self, weight: FontWeight, slant: FontSlant) -> Self {
        let current = self.geometry.font.take().unwrap_or_else(|| FontSpec::new(""));
        self.geometry.font = Some(current.with_weight(weight).with_slant(slant));
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.geometry.size = Some(size);
        self
    }

    pub fn align(mut self, align_x: HorizontalAlign, align_y: VerticalAlign) -> Self {
        self.geometry.align_x = align_x;
        self.geometry.align_y = align_y;
        self
    }

    pub fn align_x(mut self, align_x: HorizontalAlign) -> Self {
        self.geometry.align_x = align_x;
        self
    }

    pub fn align_y(mut self, align_y: VerticalAlign) -> Self {
        self.geometry.align_y = align_y;
        self
    }

    /// Draw upside-down in y, for y-up coordinate systems
    pub fn flip(mut self) -> Self {
        self.geometry.flipped = true;
        self
    }

    pub fn offset(mut self, dx: f32, dy: f32) -> Self {
        self.geometry.offset = Vec2::new(dx, dy);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Add a rectangle contour to a new path without painting it
pub fn rectangle(ctx: &mut dyn DrawContext, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
    emit_path(ctx, &Rectangle::new(x, y, width, height), PathMode::NewPath)
}

/// Add a line segment to a new path without painting it
pub fn line(ctx: &mut dyn DrawContext, a: Point, b: Point) -> Result<()> {
    emit_path(ctx, &Line::new(a, b), PathMode::NewPath)
}

/// Add a polygon to a new path without painting it
pub fn polygon(ctx: &mut dyn DrawContext, points: &[Point], closed: bool) -> Result<()> {
    let polygon = Polygon {
        points: points.iter().copied().collect(),
        closed,
    };
    emit_path(ctx, &polygon, PathMode::NewPath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodraw_core::{DrawCommand, RecordingContext, TextExtents};
    use std::f32::consts::PI;

    #[test]
    fn test_rectangle_fill() {
        let mut ctx = RecordingContext::new();
        Shape::rectangle(&mut ctx)
            .of_corner_size(1.0, 2.0, 3.0, 4.0)
            .fill(Some(Color::RED))
            .unwrap();

        let commands = ctx.commands();
        assert_eq!(commands[0], DrawCommand::NewPath);
        assert_eq!(commands[1], DrawCommand::MoveTo(Point::new(1.0, 2.0)));
        assert_eq!(commands[5], DrawCommand::ClosePath);
        assert_eq!(commands[6], DrawCommand::SetSourceColor(Color::RED));
        assert_eq!(commands[7], DrawCommand::Fill);
    }

    #[test]
    fn test_unset_rectangle_uses_defaults() {
        let mut ctx = RecordingContext::new();
        Shape::rectangle(&mut ctx).fill(None).unwrap();
        assert_eq!(ctx.commands()[1], DrawCommand::MoveTo(Point::ZERO));
    }

    #[test]
    fn test_extend_path_chains_shapes() {
        let mut ctx = RecordingContext::new();
        Shape::line(&mut ctx)
            .of_start_end(Point::new(0.0, 0.0), Point::new(5.0, 0.0))
            .add()
            .unwrap()
            .keep();
        Shape::line(&mut ctx)
            .of_start_end(Point::new(5.0, 0.0), Point::new(5.0, 5.0))
            .extend_path()
            .stroke(Some(Color::BLUE), Some(3.0))
            .unwrap();

        assert_eq!(ctx.count(|c| *c == DrawCommand::NewPath), 1);
        assert_eq!(ctx.count(|c| matches!(c, DrawCommand::MoveTo(_))), 1);
        assert_eq!(ctx.count(|c| *c == DrawCommand::Stroke), 1);
        assert_eq!(ctx.line_width(), 3.0);
    }

    #[test]
    fn test_sub_path_mode() {
        let mut ctx = RecordingContext::new();
        let shape = Shape::circle(&mut ctx)
            .of_center_radius(Point::ZERO, 2.0)
            .as_sub_path();
        assert_eq!(shape.mode(), PathMode::NewSubPath);
        shape.stroke(None, None).unwrap();

        assert_eq!(ctx.commands()[0], DrawCommand::NewSubPath);
    }

    #[test]
    fn test_fill_stroke_counts() {
        let mut ctx = RecordingContext::new();
        Shape::polygon(&mut ctx)
            .of_points([Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 4.0)])
            .fill_stroke(Color::GREEN, Color::BLACK, 1.5)
            .unwrap();

        let geometry = ctx.count(DrawCommand::is_geometry);
        assert_eq!(geometry, 4);
        assert_eq!(ctx.count(|c| *c == DrawCommand::NewPath), 1);
        assert_eq!(ctx.count(|c| *c == DrawCommand::FillPreserve), 1);
        assert_eq!(ctx.count(|c| *c == DrawCommand::Stroke), 1);
    }

    #[test]
    fn test_open_polygon_builder() {
        let mut ctx = RecordingContext::new();
        Shape::polygon(&mut ctx)
            .of_points([Point::new(0.0, 0.0), Point::new(1.0, 1.0)])
            .open()
            .stroke(None, None)
            .unwrap();
        assert!(!ctx.commands().contains(&DrawCommand::ClosePath));
    }

    #[test]
    fn test_font_style_before_family() {
        let mut ctx = RecordingContext::new();
        Shape::text(&mut ctx)
            .of("AB", Point::ZERO)
            .font_style(FontWeight::Bold, FontSlant::Oblique)
            .font("Serif")
            .fill(None)
            .unwrap();

        assert_eq!(
            ctx.commands()[1],
            DrawCommand::SelectFontFace {
                family: "Serif".to_string(),
                slant: FontSlant::Oblique,
                weight: FontWeight::Bold,
            }
        );
    }

    #[test]
    fn test_font_style_without_family_selects_nothing() {
        let mut ctx = RecordingContext::new();
        Shape::text(&mut ctx)
            .of("AB", Point::ZERO)
            .font_style(FontWeight::Bold, FontSlant::Italic)
            .fill(None)
            .unwrap();

        assert_eq!(ctx.count(|c| matches!(c, DrawCommand::SelectFontFace { .. })), 0);
        assert_eq!(ctx.font_family(), None);
    }

    #[test]
    fn test_circle_builders() {
        let mut ctx = RecordingContext::new();
        Shape::circle(&mut ctx)
            .of_center_radius(Point::new(1.0, 1.0), 3.0)
            .as_sector(0.0, PI)
            .fill(None)
            .unwrap();

        assert_eq!(ctx.commands()[1], DrawCommand::MoveTo(Point::new(1.0, 1.0)));
        assert!(matches!(
            ctx.commands()[2],
            DrawCommand::Arc { radius, end_angle, .. } if radius == 3.0 && end_angle == PI
        ));
        assert_eq!(ctx.commands()[3], DrawCommand::ClosePath);
    }

    #[test]
    fn test_text_builder() {
        let mut ctx =
            RecordingContext::new().with_text_extents(TextExtents::new(1.0, -8.0, 10.0, 8.0));
        Shape::text(&mut ctx)
            .of("AB", Point::new(100.0, 100.0))
            .font("Sans")
            .font_style(FontWeight::Bold, FontSlant::Italic)
            .size(12.0)
            .align(HorizontalAlign::Center, VerticalAlign::Bottom)
            .fill(Some(Color::BLACK))
            .unwrap();

        let commands = ctx.commands();
        assert_eq!(commands[0], DrawCommand::NewPath);
        assert_eq!(
            commands[1],
            DrawCommand::SelectFontFace {
                family: "Sans".to_string(),
                slant: FontSlant::Italic,
                weight: FontWeight::Bold,
            }
        );
        assert_eq!(commands[3], DrawCommand::MoveTo(Point::new(94.0, 100.0)));
        assert_eq!(commands.last(), Some(&DrawCommand::Fill));
    }

    #[test]
    fn test_map_geometry() {
        let mut ctx = RecordingContext::new();
        let shape = Shape::rectangle(&mut ctx)
            .of_corner_size(0.0, 0.0, 1.0, 1.0)
            .map(|r| r.width = 9.0);
        assert_eq!(shape.geometry().width, 9.0);
    }

    #[test]
    fn test_one_shot_helpers() {
        let mut ctx = RecordingContext::new();
        rectangle(&mut ctx, 0.0, 0.0, 2.0, 2.0).unwrap();
        line(&mut ctx, Point::ZERO, Point::new(1.0, 0.0)).unwrap();
        polygon(&mut ctx, &[Point::ZERO, Point::new(1.0, 1.0)], false).unwrap();

        assert_eq!(ctx.count(|c| *c == DrawCommand::NewPath), 3);
        assert_eq!(ctx.count(|c| *c == DrawCommand::ClosePath), 1);
        assert_eq!(ctx.count(|c| *c == DrawCommand::Fill), 0);
    }
}
