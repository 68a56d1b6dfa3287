//! Path emission and terminal paint operations
//!
//! Every shape contributes geometry to the context's current path through
//! [`emit_path`], which first applies a [`PathMode`]:
//!
//! | mode | context call | effect |
//! |---|---|---|
//! | `NewPath` | `new_path` | discards any existing path |
//! | `NewSubPath` | `new_sub_path` | keeps the path, starts a disconnected contour |
//! | `Extend` | none | continues the current contour |
//!
//! The paint operations emit exactly once and then paint, so a path is never
//! rebuilt between a fill and the stroke that outlines it.

use geodraw_core::{Color, DrawContext, Result};
use serde::{Deserialize, Serialize};

use crate::primitives::ShapeGeometry;

/// How a shape starts its contribution to the current path
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    /// Begin a brand-new path
    #[default]
    NewPath,
    /// Begin a disconnected contour inside the existing path
    NewSubPath,
    /// Append to the current contour
    Extend,
}

/// Geometry that can append itself to a context's current path
pub trait Emit {
    /// Append this geometry to the current path, without any path-mode call
    fn emit(&self, ctx: &mut dyn DrawContext) -> Result<()>;

    /// Append this geometry as a continuation of the current contour
    ///
    /// Open geometry overrides this to join its first point with a line.
    /// Closed outlines keep their own contour and fall back to [`Emit::emit`].
    fn emit_extending(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        self.emit(ctx)
    }

    /// Short name used in traces
    fn kind(&self) -> &'static str;
}

/// Apply `mode`, then append `geometry` to the current path
pub fn emit_path<G: Emit + ?Sized>(
    ctx: &mut dyn DrawContext,
    geometry: &G,
    mode: PathMode,
) -> Result<()> {
    tracing::trace!(kind = geometry.kind(), ?mode, "emit path");
    match mode {
        PathMode::NewPath => ctx.new_path(),
        PathMode::NewSubPath => ctx.new_sub_path(),
        PathMode::Extend => return geometry.emit_extending(ctx),
    }
    geometry.emit(ctx)
}

/// Emit several shapes as disjoint contours of one fresh path
pub fn emit_compound(ctx: &mut dyn DrawContext, shapes: &[ShapeGeometry]) -> Result<()> {
    for (i, shape) in shapes.iter().enumerate() {
        let mode = if i == 0 {
            PathMode::NewPath
        } else {
            PathMode::NewSubPath
        };
        emit_path(ctx, shape, mode)?;
    }
    Ok(())
}

/// Emit `geometry` and fill it
pub fn fill<G: Emit + ?Sized>(
    ctx: &mut dyn DrawContext,
    geometry: &G,
    mode: PathMode,
    color: Option<Color>,
) -> Result<()> {
    emit_path(ctx, geometry, mode)?;
    EmittedPath::new(ctx).fill(color);
    Ok(())
}

/// Emit `geometry` and stroke it
pub fn stroke<G: Emit + ?Sized>(
    ctx: &mut dyn DrawContext,
    geometry: &G,
    mode: PathMode,
    color: Option<Color>,
    line_width: Option<f32>,
) -> Result<()> {
    emit_path(ctx, geometry, mode)?;
    EmittedPath::new(ctx).stroke(color, line_width);
    Ok(())
}

/// Emit `geometry` once, fill it, then stroke the same path
pub fn fill_stroke<G: Emit + ?Sized>(
    ctx: &mut dyn DrawContext,
    geometry: &G,
    mode: PathMode,
    fill_color: Color,
    stroke_color: Color,
    line_width: f32,
) -> Result<()> {
    emit_path(ctx, geometry, mode)?;
    EmittedPath::new(ctx).fill_stroke(fill_color, stroke_color, line_width);
    Ok(())
}

/// A path that has been emitted and is waiting to be painted
///
/// Painting consumes the handle, so each emission is painted at most once.
#[must_use = "an emitted path does nothing until it is painted"]
pub struct EmittedPath<'c> {
    ctx: &'c mut dyn DrawContext,
}

impl<'c> EmittedPath<'c> {
    pub(crate) fn new(ctx: &'c mut dyn DrawContext) -> Self {
        Self { ctx }
    }

    /// Fill (nonzero), optionally setting the color first
    pub fn fill(self, color: Option<Color>) {
        if let Some(color) = color {
            self.ctx.set_source_color(color);
        }
        self.ctx.fill();
    }

    /// Stroke, optionally setting color and line width first
    pub fn stroke(self, color: Option<Color>, line_width: Option<f32>) {
        if let Some(color) = color {
            self.ctx.set_source_color(color);
        }
        if let Some(width) = line_width {
            self.ctx.set_line_width(width);
        }
        self.ctx.stroke();
    }

    /// Fill with `fill_color` keeping the path, then stroke it
    pub fn fill_stroke(self, fill_color: Color, stroke_color: Color, line_width: f32) {
        self.ctx.set_source_color(fill_color);
        self.ctx.fill_preserve();
        self.ctx.set_source_color(stroke_color);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }

    /// Leave the path unpainted so later shapes can extend it
    pub fn keep(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Line, Polygon, Rectangle};
    use geodraw_core::{DrawCommand, Point, RecordingContext};

    #[test]
    fn test_path_modes() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));

        let mut ctx = RecordingContext::new();
        emit_path(&mut ctx, &line, PathMode::NewPath).unwrap();
        emit_path(&mut ctx, &line, PathMode::NewSubPath).unwrap();
        emit_path(&mut ctx, &line, PathMode::Extend).unwrap();

        assert_eq!(
            ctx.commands(),
            &[
                DrawCommand::NewPath,
                DrawCommand::MoveTo(Point::new(0.0, 0.0)),
                DrawCommand::LineTo(Point::new(1.0, 0.0)),
                DrawCommand::NewSubPath,
                DrawCommand::MoveTo(Point::new(0.0, 0.0)),
                DrawCommand::LineTo(Point::new(1.0, 0.0)),
                DrawCommand::LineTo(Point::new(0.0, 0.0)),
                DrawCommand::LineTo(Point::new(1.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_extend_chains_into_one_contour() {
        let mut ctx = RecordingContext::new();
        let a = Point::new(10.0, 10.0);
        let b = Point::new(50.0, 10.0);
        let c = Point::new(50.0, 50.0);

        emit_path(&mut ctx, &Line::new(a, b), PathMode::NewPath).unwrap();
        emit_path(&mut ctx, &Line::new(b, c), PathMode::Extend).unwrap();
        emit_path(&mut ctx, &Polygon::open([c, a]), PathMode::Extend).unwrap();

        assert_eq!(ctx.count(|c| matches!(c, DrawCommand::MoveTo(_))), 1);
        assert_eq!(ctx.count(|c| matches!(c, DrawCommand::LineTo(_))), 5);
        assert_eq!(ctx.current_point(), Some(a));
    }

    #[test]
    fn test_extend_keeps_rectangle_contour() {
        let mut ctx = RecordingContext::new();
        ctx.move_to(Point::new(1.0, 1.0));
        emit_path(&mut ctx, &Rectangle::new(5.0, 5.0, 2.0, 2.0), PathMode::Extend).unwrap();

        assert_eq!(ctx.commands()[1], DrawCommand::MoveTo(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_fill_stroke_emits_once() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let mut ctx = RecordingContext::new();
        fill_stroke(
            &mut ctx,
            &rect,
            PathMode::NewPath,
            Color::RED,
            Color::BLACK,
            2.0,
        )
        .unwrap();

        assert_eq!(ctx.count(|c| *c == DrawCommand::NewPath), 1);
        assert_eq!(ctx.count(|c| matches!(c, DrawCommand::MoveTo(_))), 1);
        assert_eq!(ctx.count(|c| *c == DrawCommand::FillPreserve), 1);
        assert_eq!(ctx.count(|c| *c == DrawCommand::Fill), 0);
        assert_eq!(ctx.count(|c| *c == DrawCommand::Stroke), 1);

        let tail = &ctx.commands()[ctx.commands().len() - 5..];
        assert_eq!(
            tail,
            &[
                DrawCommand::SetSourceColor(Color::RED),
                DrawCommand::FillPreserve,
                DrawCommand::SetSourceColor(Color::BLACK),
                DrawCommand::SetLineWidth(2.0),
                DrawCommand::Stroke,
            ]
        );
    }

    #[test]
    fn test_fill_without_color_keeps_source() {
        let rect = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let mut ctx = RecordingContext::new();
        fill(&mut ctx, &rect, PathMode::NewPath, None).unwrap();

        assert_eq!(ctx.count(|c| matches!(c, DrawCommand::SetSourceColor(_))), 0);
        assert_eq!(ctx.commands().last(), Some(&DrawCommand::Fill));
    }

    #[test]
    fn test_stroke_sets_optional_state() {
        let line = Line::new(Point::ZERO, Point::new(3.0, 4.0));
        let mut ctx = RecordingContext::new();
        stroke(&mut ctx, &line, PathMode::NewPath, None, Some(5.0)).unwrap();

        assert_eq!(ctx.line_width(), 5.0);
        assert_eq!(ctx.count(|c| matches!(c, DrawCommand::SetSourceColor(_))), 0);
    }

    #[test]
    fn test_emit_compound() {
        let shapes: Vec<ShapeGeometry> = vec![
            Rectangle::new(0.0, 0.0, 10.0, 10.0).into(),
            Rectangle::new(2.0, 2.0, 6.0, 6.0).into(),
        ];
        let mut ctx = RecordingContext::new();
        emit_compound(&mut ctx, &shapes).unwrap();

        assert_eq!(ctx.commands()[0], DrawCommand::NewPath);
        assert_eq!(ctx.count(|c| *c == DrawCommand::NewPath), 1);
        assert_eq!(ctx.count(|c| *c == DrawCommand::NewSubPath), 1);
        assert_eq!(ctx.count(|c| *c == DrawCommand::ClosePath), 2);
    }
}
