//! Canvas - configured drawing API over any DrawContext
//!
//! Canvas pairs a context with a [`DrawingConfig`] so markers, text and
//! strokes pick up the configured defaults without repeating them at every
//! call site.

use geodraw_core::{Color, DrawContext, Point, Result};

use crate::config::DrawingConfig;
use crate::marker::{self, AngleMarker, TickMarker};
use crate::primitives::{Circle, Line, Polygon, Rectangle, ShapeGeometry};
use crate::shape::Shape;
use crate::text::Text;

/// Drawing surface with configured defaults
pub struct Canvas<'c> {
    ctx: &'c mut dyn DrawContext,
    config: DrawingConfig,
}

impl<'c> Canvas<'c> {
    /// Create a canvas using the built-in defaults
    pub fn new(ctx: &'c mut dyn DrawContext) -> Self {
        Self::with_config(ctx, DrawingConfig::default())
    }

    pub fn with_config(ctx: &'c mut dyn DrawContext, config: DrawingConfig) -> Self {
        Self { ctx, config }
    }

    pub fn config(&self) -> &DrawingConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DrawingConfig {
        &mut self.config
    }

    /// The wrapped context, for calls the canvas does not cover
    pub fn context(&mut self) -> &mut dyn DrawContext {
        &mut *self.ctx
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Shapes
    // ─────────────────────────────────────────────────────────────────────────

    pub fn rectangle(&mut self) -> Shape<'_, Rectangle> {
        Shape::rectangle(&mut *self.ctx)
    }

    pub fn line(&mut self) -> Shape<'_, Line> {
        Shape::line(&mut *self.ctx)
    }

    pub fn polygon(&mut self) -> Shape<'_, Polygon> {
        Shape::polygon(&mut *self.ctx)
    }

    pub fn circle(&mut self) -> Shape<'_, Circle> {
        Shape::circle(&mut *self.ctx)
    }

    /// Text builder pre-filled with the configured font and size
    pub fn text(&mut self) -> Shape<'_, Text> {
        let geometry = Text {
            font: Some(self.config.text.font()),
            size: Some(self.config.text.size),
            ..Default::default()
        };
        Shape::new(&mut *self.ctx, geometry)
    }

    /// Builder for an arbitrary geometry
    pub fn shape(&mut self, geometry: impl Into<ShapeGeometry>) -> Shape<'_, ShapeGeometry> {
        Shape::new(&mut *self.ctx, geometry.into())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Markers
    // ─────────────────────────────────────────────────────────────────────────

    /// Angle marker at vertex `b` with the configured settings
    pub fn angle_marker(&mut self, a: Point, b: Point, c: Point) -> Result<()> {
        let settings = self.config.angle_marker;
        marker::angle_marker(&mut *self.ctx, a, b, c, &settings)
    }

    pub fn angle_marker_with(
        &mut self,
        a: Point,
        b: Point,
        c: Point,
        settings: &AngleMarker,
    ) -> Result<()> {
        marker::angle_marker(&mut *self.ctx, a, b, c, settings)
    }

    /// Tick marks across a-b with the configured settings
    pub fn tick(&mut self, a: Point, b: Point) -> Result<()> {
        let settings = self.config.tick;
        marker::tick(&mut *self.ctx, a, b, &settings)
    }

    pub fn tick_with(&mut self, a: Point, b: Point, settings: &TickMarker) -> Result<()> {
        marker::tick(&mut *self.ctx, a, b, settings)
    }

    /// Parallel marks across a-b with the configured settings
    pub fn paratick(&mut self, a: Point, b: Point) -> Result<()> {
        let settings = self.config.tick;
        marker::paratick(&mut *self.ctx, a, b, &settings)
    }

    pub fn paratick_with(&mut self, a: Point, b: Point, settings: &TickMarker) -> Result<()> {
        marker::paratick(&mut *self.ctx, a, b, settings)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Painting
    // ─────────────────────────────────────────────────────────────────────────

    /// Stroke the accumulated path with the configured stroke
    pub fn stroke_path(&mut self) {
        let stroke = self.config.stroke;
        self.ctx.set_source_color(stroke.color);
        self.ctx.set_line_width(stroke.width);
        self.ctx.stroke();
    }

    /// Fill the accumulated path
    pub fn fill_path(&mut self, color: Color) {
        self.ctx.set_source_color(color);
        self.ctx.fill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkCount;
    use geodraw_core::{DrawCommand, DrawError, FontSlant, FontWeight, RecordingContext};

    #[test]
    fn test_canvas_shapes_draw_into_context() {
        let mut ctx = RecordingContext::new();
        let mut canvas = Canvas::new(&mut ctx);
        canvas
            .rectangle()
            .of_corner_size(0.0, 0.0, 5.0, 5.0)
            .fill(Some(Color::BLUE))
            .unwrap();
        canvas
            .circle()
            .of_center_radius(Point::new(2.0, 2.0), 1.0)
            .stroke(None, None)
            .unwrap();

        assert_eq!(ctx.count(|c| *c == DrawCommand::NewPath), 2);
        assert_eq!(ctx.count(|c| *c == DrawCommand::Fill), 1);
        assert_eq!(ctx.count(|c| *c == DrawCommand::Stroke), 1);
    }

    #[test]
    fn test_configured_tick_and_stroke() {
        let mut config = DrawingConfig::default();
        config.tick.count = MarkCount::Three;
        config.stroke.width = 2.5;
        config.stroke.color = Color::RED;

        let mut ctx = RecordingContext::new();
        let mut canvas = Canvas::with_config(&mut ctx, config);
        canvas
            .tick(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
            .unwrap();
        canvas.stroke_path();

        assert_eq!(ctx.count(|c| matches!(c, DrawCommand::LineTo(_))), 3);
        assert_eq!(ctx.count(|c| *c == DrawCommand::Stroke), 1);
        assert_eq!(ctx.line_width(), 2.5);
        assert_eq!(ctx.source_color(), Color::RED);
    }

    #[test]
    fn test_canvas_text_uses_configured_font() {
        let mut config = DrawingConfig::default();
        config.text.family = "Mono".to_string();
        config.text.size = 20.0;

        let mut ctx = RecordingContext::new();
        let mut canvas = Canvas::with_config(&mut ctx, config);
        canvas
            .text()
            .of("x", Point::new(1.0, 1.0))
            .fill(None)
            .unwrap();

        assert_eq!(
            ctx.commands()[1],
            DrawCommand::SelectFontFace {
                family: "Mono".to_string(),
                slant: FontSlant::Normal,
                weight: FontWeight::Regular,
            }
        );
        assert_eq!(ctx.commands()[2], DrawCommand::SetFontSize(20.0));
        assert_eq!(ctx.font_size(), 20.0);
    }

    #[test]
    fn test_marker_errors_propagate() {
        let mut ctx = RecordingContext::new();
        let mut canvas = Canvas::new(&mut ctx);
        let p = Point::new(3.0, 3.0);

        assert!(matches!(
            canvas.paratick(p, p),
            Err(DrawError::DegenerateSegment { .. })
        ));
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn test_angle_marker_then_fill() {
        let mut ctx = RecordingContext::new();
        let mut canvas = Canvas::new(&mut ctx);
        canvas
            .angle_marker(Point::new(10.0, 0.0), Point::ZERO, Point::new(0.0, 10.0))
            .unwrap();
        canvas.fill_path(Color::GREEN);

        assert_eq!(ctx.count(|c| matches!(c, DrawCommand::Arc { .. })), 1);
        assert_eq!(ctx.commands().last(), Some(&DrawCommand::Fill));
    }

    #[test]
    fn test_shape_from_geometry() {
        let mut ctx = RecordingContext::new();
        let mut canvas = Canvas::new(&mut ctx);
        canvas
            .shape(Line::new(Point::ZERO, Point::new(1.0, 0.0)))
            .stroke(None, Some(4.0))
            .unwrap();
        canvas.context().new_path();

        assert_eq!(ctx.count(|c| *c == DrawCommand::NewPath), 2);
    }
}
