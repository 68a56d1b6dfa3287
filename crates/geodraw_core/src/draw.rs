//! Draw Context - the rendering capability shapes draw into
//!
//! The `DrawContext` trait is the whole surface geodraw needs from a renderer:
//! path construction with a current point, solid paint, text measurement and
//! outlining, and a save/restore transform stack. Any immediate-mode vector
//! backend (a rasterizer, a PDF writer, a recording log) can implement it.
//!
//! # Path model
//!
//! A context owns one current path made of contours. `move_to` starts a
//! contour, `line_to`/`arc` extend it, `close_path` closes it. `new_path`
//! discards everything, `new_sub_path` keeps the path but clears the current
//! point so the next `arc` does not connect to the previous contour.
//! `fill` and `stroke` consume the path, `fill_preserve` keeps it.
//!
//! # Example
//!
//! ```
//! use geodraw_core::{Color, DrawContext, Point, RecordingContext};
//!
//! let mut ctx = RecordingContext::new();
//! ctx.new_path();
//! ctx.move_to(Point::new(0.0, 0.0));
//! ctx.line_to(Point::new(10.0, 0.0));
//! ctx.set_source_color(Color::BLUE);
//! ctx.stroke();
//!
//! assert_eq!(ctx.commands().len(), 5);
//! ```

use std::f32::consts::TAU;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{DrawError, Result};
use crate::geometry::{Affine2D, Color, Point, Vec2};

// ─────────────────────────────────────────────────────────────────────────────
// Text Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Font slant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Font weight
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Thin,
    Light,
    #[default]
    Regular,
    Medium,
    Bold,
    Black,
}

impl FontWeight {
    /// CSS/OpenType numeric weight
    pub fn to_number(self) -> u16 {
        match self {
            FontWeight::Thin => 100,
            FontWeight::Light => 300,
            FontWeight::Regular => 400,
            FontWeight::Medium => 500,
            FontWeight::Bold => 700,
            FontWeight::Black => 900,
        }
    }
}

/// Ink metrics of a string under the current font
///
/// Bearings are measured from the text origin (the baseline start).
/// With y growing downward, `y_bearing` is negative for glyphs that rise
/// above the baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtents {
    pub x_bearing: f32,
    pub y_bearing: f32,
    pub width: f32,
    pub height: f32,
    pub x_advance: f32,
    pub y_advance: f32,
}

impl TextExtents {
    pub const fn new(x_bearing: f32, y_bearing: f32, width: f32, height: f32) -> Self {
        Self {
            x_bearing,
            y_bearing,
            width,
            height,
            x_advance: x_bearing + width,
            y_advance: 0.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DrawContext Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Rendering capability consumed by shapes and annotation primitives
///
/// Angles are radians, 0 along the positive x-axis, increasing toward the
/// positive y-axis.
pub trait DrawContext {
    // ─────────────────────────────────────────────────────────────────────────
    // Path Construction
    // ─────────────────────────────────────────────────────────────────────────

    /// Discard the current path and the current point
    fn new_path(&mut self);

    /// Keep the current path but clear the current point
    fn new_sub_path(&mut self);

    /// Start a new contour at `point`
    fn move_to(&mut self, point: Point);

    /// Extend the current contour with a straight segment
    ///
    /// Behaves like `move_to` when there is no current point.
    fn line_to(&mut self, point: Point);

    /// Add a circular arc
    ///
    /// If there is a current point a straight segment joins it to the arc
    /// start, otherwise the arc start becomes the current point. The sweep
    /// runs in the positive-angle direction: `end_angle` is advanced by full
    /// turns until it is no smaller than `start_angle`.
    fn arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32);

    /// Close the current contour back to its start point
    fn close_path(&mut self);

    /// Current point in user space, if any
    fn current_point(&self) -> Option<Point>;

    // ─────────────────────────────────────────────────────────────────────────
    // Paint
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the solid paint color used by fill and stroke
    fn set_source_color(&mut self, color: Color);

    /// Set the stroke width
    fn set_line_width(&mut self, width: f32);

    /// Fill the current path (nonzero winding) and clear it
    fn fill(&mut self);

    /// Fill the current path (nonzero winding) and keep it
    fn fill_preserve(&mut self);

    /// Stroke the current path and clear it
    fn stroke(&mut self);

    // ─────────────────────────────────────────────────────────────────────────
    // Text
    // ─────────────────────────────────────────────────────────────────────────

    /// Select the font used by `text_extents` and `text_path`
    fn select_font_face(&mut self, family: &str, slant: FontSlant, weight: FontWeight);

    /// Set the font size in user units
    fn set_font_size(&mut self, size: f32);

    /// Measure the ink extents of `text` under the current font
    fn text_extents(&self, text: &str) -> Result<TextExtents>;

    /// Append the glyph outlines of `text` at the current point
    ///
    /// The current point advances by the text's advance.
    fn text_path(&mut self, text: &str) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Transform Stack
    // ─────────────────────────────────────────────────────────────────────────

    /// Push the graphics state (transform, paint, font)
    fn save(&mut self);

    /// Pop the graphics state pushed by the matching `save`
    fn restore(&mut self);

    /// Scale user space
    fn scale(&mut self, sx: f32, sy: f32);

    /// Current user-to-device transform
    fn current_transform(&self) -> Affine2D;
}

/// Extension trait for DrawContext with convenience methods
pub trait DrawContextExt: DrawContext {
    /// Save the graphics state, restoring it when the guard drops
    fn saved(&mut self) -> StateGuard<'_, Self> {
        self.save();
        StateGuard { ctx: self }
    }
}

// Blanket implementation for all DrawContext implementers
impl<T: DrawContext + ?Sized> DrawContextExt for T {}

/// Scoped `save`/`restore` pair
///
/// Restores on drop, so an early `?` return or a panic while the state is
/// modified still leaves the context balanced.
pub struct StateGuard<'a, C: DrawContext + ?Sized> {
    ctx: &'a mut C,
}

impl<C: DrawContext + ?Sized> Deref for StateGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.ctx
    }
}

impl<C: DrawContext + ?Sized> DerefMut for StateGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.ctx
    }
}

impl<C: DrawContext + ?Sized> Drop for StateGuard<'_, C> {
    fn drop(&mut self) {
        self.ctx.restore();
    }
}

/// End angle of an arc after advancing it to be no smaller than `start`
///
/// The end moves forward by whole turns. An end already past the start is
/// left alone, so sweeps of more than one turn survive.
pub fn normalized_arc_end(start: f32, end: f32) -> f32 {
    if !(start.is_finite() && end.is_finite()) || end >= start {
        return end;
    }
    let turns = ((start - end) / TAU).ceil();
    end + turns * TAU
}

/// Point on a circle at `angle`
pub fn point_on_circle(center: Point, radius: f32, angle: f32) -> Point {
    center + Vec2::from_angle(angle) * radius
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Draw Context
// ─────────────────────────────────────────────────────────────────────────────

/// A draw command that can be recorded and replayed
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    // Path
    NewPath,
    NewSubPath,
    MoveTo(Point),
    LineTo(Point),
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    ClosePath,

    // Paint
    SetSourceColor(Color),
    SetLineWidth(f32),
    Fill,
    FillPreserve,
    Stroke,

    // Text
    SelectFontFace {
        family: String,
        slant: FontSlant,
        weight: FontWeight,
    },
    SetFontSize(f32),
    TextPath {
        text: String,
        origin: Point,
    },

    // State
    Save,
    Restore,
    Scale {
        sx: f32,
        sy: f32,
    },
}

impl DrawCommand {
    /// Whether this command adds geometry to the current path
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            DrawCommand::MoveTo(_)
                | DrawCommand::LineTo(_)
                | DrawCommand::Arc { .. }
                | DrawCommand::ClosePath
                | DrawCommand::TextPath { .. }
        )
    }
}

/// How a [`RecordingContext`] answers `text_extents`
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextMetrics {
    /// Every character is `advance` em wide with an ink box of `ascent` em
    /// above the baseline
    Proportional { advance: f32, ascent: f32 },
    /// The same extents for every string
    Fixed(TextExtents),
    /// No text support
    Unavailable,
}

impl Default for TextMetrics {
    fn default() -> Self {
        TextMetrics::Proportional {
            advance: 0.6,
            ascent: 0.7,
        }
    }
}

#[derive(Clone, Debug)]
struct GraphicsState {
    color: Color,
    line_width: f32,
    font_family: Option<String>,
    font_size: f32,
    transform: Affine2D,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            line_width: 2.0,
            font_family: None,
            font_size: 10.0,
            transform: Affine2D::IDENTITY,
        }
    }
}

/// A draw context that records commands for later inspection or replay
///
/// Coordinates are recorded exactly as passed; `scale` only updates the
/// tracked transform. Text is measured with synthetic [`TextMetrics`].
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    current_point: Option<Point>,
    contour_start: Option<Point>,
    state: GraphicsState,
    state_stack: SmallVec<[GraphicsState; 4]>,
    metrics: TextMetrics,
}

impl RecordingContext {
    /// Create a new recording context
    pub fn new() -> Self {
        Self::default()
    }

    /// Use fixed text extents for every string
    pub fn with_text_extents(mut self, extents: TextExtents) -> Self {
        self.metrics = TextMetrics::Fixed(extents);
        self
    }

    /// Use the given text metrics model
    pub fn with_text_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Clear all recorded commands and reset the graphics state
    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_point = None;
        self.contour_start = None;
        self.state = GraphicsState::default();
        self.state_stack.clear();
    }

    /// Number of recorded commands matching `predicate`
    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// Depth of the save/restore stack
    pub fn save_depth(&self) -> usize {
        self.state_stack.len()
    }

    /// Current paint color
    pub fn source_color(&self) -> Color {
        self.state.color
    }

    /// Current stroke width
    pub fn line_width(&self) -> f32 {
        self.state.line_width
    }

    /// Current font size
    pub fn font_size(&self) -> f32 {
        self.state.font_size
    }

    /// Family of the selected font, if one was selected
    pub fn font_family(&self) -> Option<&str> {
        self.state.font_family.as_deref()
    }

    /// Replay the recorded commands onto another context
    pub fn replay_into(&self, target: &mut dyn DrawContext) -> Result<()> {
        for command in &self.commands {
            match command {
                DrawCommand::NewPath => target.new_path(),
                DrawCommand::NewSubPath => target.new_sub_path(),
                DrawCommand::MoveTo(p) => target.move_to(*p),
                DrawCommand::LineTo(p) => target.line_to(*p),
                DrawCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => target.arc(*center, *radius, *start_angle, *end_angle),
                DrawCommand::ClosePath => target.close_path(),
                DrawCommand::SetSourceColor(color) => target.set_source_color(*color),
                DrawCommand::SetLineWidth(width) => target.set_line_width(*width),
                DrawCommand::Fill => target.fill(),
                DrawCommand::FillPreserve => target.fill_preserve(),
                DrawCommand::Stroke => target.stroke(),
                DrawCommand::SelectFontFace {
                    family,
                    slant,
                    weight,
                } => target.select_font_face(family, *slant, *weight),
                DrawCommand::SetFontSize(size) => target.set_font_size(*size),
                DrawCommand::TextPath { text, .. } => target.text_path(text)?,
                DrawCommand::Save => target.save(),
                DrawCommand::Restore => target.restore(),
                DrawCommand::Scale { sx, sy } => target.scale(*sx, *sy),
            }
        }
        Ok(())
    }

    fn end_path(&mut self) {
        self.current_point = None;
        self.contour_start = None;
    }
}

impl DrawContext for RecordingContext {
    fn new_path(&mut self) {
        self.commands.push(DrawCommand::NewPath);
        self.end_path();
    }

    fn new_sub_path(&mut self) {
        self.commands.push(DrawCommand::NewSubPath);
        self.current_point = None;
    }

    fn move_to(&mut self, point: Point) {
        self.commands.push(DrawCommand::MoveTo(point));
        self.current_point = Some(point);
        self.contour_start = Some(point);
    }

    fn line_to(&mut self, point: Point) {
        self.commands.push(DrawCommand::LineTo(point));
        if self.current_point.is_none() {
            self.contour_start = Some(point);
        }
        self.current_point = Some(point);
    }

    fn arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
        if self.current_point.is_none() {
            self.contour_start = Some(point_on_circle(center, radius, start_angle));
        }
        let end = normalized_arc_end(start_angle, end_angle);
        self.current_point = Some(point_on_circle(center, radius, end));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
        self.current_point = self.contour_start;
    }

    fn current_point(&self) -> Option<Point> {
        self.current_point
    }

    fn set_source_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetSourceColor(color));
        self.state.color = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.commands.push(DrawCommand::SetLineWidth(width));
        self.state.line_width = width;
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
        self.end_path();
    }

    fn fill_preserve(&mut self) {
        self.commands.push(DrawCommand::FillPreserve);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
        self.end_path();
    }

    fn select_font_face(&mut self, family: &str, slant: FontSlant, weight: FontWeight) {
        self.commands.push(DrawCommand::SelectFontFace {
            family: family.to_string(),
            slant,
            weight,
        });
        self.state.font_family = Some(family.to_string());
    }

    fn set_font_size(&mut self, size: f32) {
        self.commands.push(DrawCommand::SetFontSize(size));
        self.state.font_size = size;
    }

    fn text_extents(&self, text: &str) -> Result<TextExtents> {
        match self.metrics {
            TextMetrics::Proportional { advance, ascent } => {
                let size = self.state.font_size;
                let width = advance * size * text.chars().count() as f32;
                let height = if text.is_empty() { 0.0 } else { ascent * size };
                Ok(TextExtents {
                    x_bearing: 0.0,
                    y_bearing: -height,
                    width,
                    height,
                    x_advance: width,
                    y_advance: 0.0,
                })
            }
            TextMetrics::Fixed(extents) => Ok(extents),
            TextMetrics::Unavailable => Err(DrawError::TextUnavailable(
                "recording context has no text metrics".to_string(),
            )),
        }
    }

    fn text_path(&mut self, text: &str) -> Result<()> {
        let extents = self.text_extents(text)?;
        let origin = self.current_point.ok_or(DrawError::NoCurrentPoint)?;
        self.commands.push(DrawCommand::TextPath {
            text: text.to_string(),
            origin,
        });
        self.current_point = Some(Point::new(
            origin.x + extents.x_advance,
            origin.y + extents.y_advance,
        ));
        Ok(())
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
        self.state_stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
        match self.state_stack.pop() {
            Some(state) => self.state = state,
            None => tracing::warn!("restore called without a matching save"),
        }
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.commands.push(DrawCommand::Scale { sx, sy });
        self.state.transform = self.state.transform.then(&Affine2D::scale(sx, sy));
    }

    fn current_transform(&self) -> Affine2D {
        self.state.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_recording_context() {
        let mut ctx = RecordingContext::new();

        ctx.new_path();
        ctx.move_to(Point::new(0.0, 0.0));
        ctx.line_to(Point::new(100.0, 0.0));
        ctx.close_path();
        ctx.set_source_color(Color::BLUE);
        ctx.fill();

        assert_eq!(ctx.commands().len(), 6);
        assert_eq!(ctx.source_color(), Color::BLUE);
        assert!(ctx.current_point().is_none());
    }

    #[test]
    fn test_close_returns_to_contour_start() {
        let mut ctx = RecordingContext::new();
        ctx.move_to(Point::new(1.0, 2.0));
        ctx.line_to(Point::new(5.0, 2.0));
        ctx.close_path();

        assert_eq!(ctx.current_point(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_arc_updates_current_point() {
        let mut ctx = RecordingContext::new();
        ctx.arc(Point::new(10.0, 10.0), 5.0, 0.0, FRAC_PI_2);

        assert!(approx(ctx.current_point().unwrap(), Point::new(10.0, 15.0)));

        // Sub-path start after the arc was opened from its own start point
        ctx.close_path();
        assert!(approx(ctx.current_point().unwrap(), Point::new(15.0, 10.0)));
    }

    #[test]
    fn test_normalized_arc_end() {
        assert_eq!(normalized_arc_end(0.0, FRAC_PI_2), FRAC_PI_2);
        assert!((normalized_arc_end(FRAC_PI_2, 0.0) - TAU).abs() < 1e-6);
        assert!((normalized_arc_end(PI, -PI) - PI).abs() < 1e-5);
        assert_eq!(normalized_arc_end(0.0, 5.0 * TAU), 5.0 * TAU);
        assert!((normalized_arc_end(0.0, -3.0 * TAU - 1.0) - (TAU - 1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_arc_with_huge_angles_terminates() {
        let end = normalized_arc_end(1.0e9, 0.0);
        assert!(end.is_finite());

        let mut ctx = RecordingContext::new();
        ctx.arc(Point::ZERO, 5.0, 1.0e9, 0.0);
        ctx.arc(Point::ZERO, 5.0, 0.0, -3.0e38);
        let p = ctx.current_point().unwrap();
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(((p - Point::ZERO).length() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_fill_preserve_keeps_path() {
        let mut ctx = RecordingContext::new();
        ctx.move_to(Point::new(0.0, 0.0));
        ctx.line_to(Point::new(1.0, 1.0));
        ctx.fill_preserve();
        assert!(ctx.current_point().is_some());

        ctx.stroke();
        assert!(ctx.current_point().is_none());
    }

    #[test]
    fn test_state_stack() {
        let mut ctx = RecordingContext::new();
        ctx.set_line_width(3.0);
        ctx.save();
        ctx.set_line_width(7.0);
        ctx.scale(1.0, -1.0);
        assert_eq!(ctx.current_transform(), Affine2D::scale(1.0, -1.0));
        ctx.restore();

        assert_eq!(ctx.line_width(), 3.0);
        assert_eq!(ctx.current_transform(), Affine2D::IDENTITY);

        // Should not panic when restoring past the root
        ctx.restore();
        assert_eq!(ctx.save_depth(), 0);
    }

    #[test]
    fn test_state_guard_restores_on_drop() {
        let mut ctx = RecordingContext::new();
        {
            let mut guard = ctx.saved();
            guard.scale(2.0, 2.0);
            assert_eq!(guard.save_depth(), 1);
        }
        assert_eq!(ctx.save_depth(), 0);
        assert_eq!(ctx.commands().last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn test_text_metrics() {
        let mut ctx = RecordingContext::new();
        ctx.set_font_size(10.0);
        let extents = ctx.text_extents("abcd").unwrap();
        assert!((extents.width - 24.0).abs() < 1e-5);
        assert!((extents.y_bearing + 7.0).abs() < 1e-5);

        let fixed = TextExtents::new(1.0, -8.0, 10.0, 8.0);
        let ctx = RecordingContext::new().with_text_extents(fixed);
        assert_eq!(ctx.text_extents("anything").unwrap(), fixed);

        let ctx = RecordingContext::new().with_text_metrics(TextMetrics::Unavailable);
        assert!(matches!(
            ctx.text_extents("x"),
            Err(DrawError::TextUnavailable(_))
        ));
    }

    #[test]
    fn test_text_path_needs_current_point() {
        let mut ctx = RecordingContext::new();
        assert_eq!(ctx.text_path("hi"), Err(DrawError::NoCurrentPoint));

        ctx.move_to(Point::new(5.0, 5.0));
        ctx.text_path("hi").unwrap();
        assert_eq!(
            ctx.commands().last(),
            Some(&DrawCommand::TextPath {
                text: "hi".to_string(),
                origin: Point::new(5.0, 5.0),
            })
        );
        assert!(ctx.current_point().unwrap().x > 5.0);
    }

    #[test]
    fn test_replay_into() {
        let mut source = RecordingContext::new();
        source.new_path();
        source.arc(Point::ZERO, 4.0, 0.0, PI);
        source.new_sub_path();
        source.move_to(Point::new(1.0, 1.0));
        source.text_path("x").unwrap();
        source.stroke();

        let mut target = RecordingContext::new();
        source.replay_into(&mut target).unwrap();
        assert_eq!(source.commands(), target.commands());
    }
}
