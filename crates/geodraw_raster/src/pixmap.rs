//! CPU draw context backed by a tiny-skia pixmap
//!
//! Geometry is transformed into device space as it is added to the path,
//! matching the usual 2D vector API contract: changing the transform after a
//! segment was added does not move that segment. Arcs become cubic Béziers,
//! fills use the nonzero rule and the line width is scaled by the transform
//! in effect when the path is stroked.

use geodraw_core::{
    Affine2D, Color, DrawContext, DrawError, FontSlant, FontWeight, Point, Result, TextExtents,
};
use tiny_skia::{FillRule, Paint, Pixmap, Stroke, Transform};

use crate::font::{FontFace, FontLibrary};
use crate::path::{arc_to_cubics, DevicePath};

#[derive(Clone, Debug, PartialEq, Eq)]
struct FontSelection {
    family: String,
    slant: FontSlant,
    weight: FontWeight,
}

#[derive(Clone, Debug)]
struct GraphicsState {
    transform: Affine2D,
    color: Color,
    line_width: f32,
    font: Option<FontSelection>,
    font_size: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Affine2D::IDENTITY,
            color: Color::BLACK,
            line_width: 2.0,
            font: None,
            font_size: 10.0,
        }
    }
}

/// A [`DrawContext`] that rasterizes into an RGBA pixmap
pub struct PixmapContext {
    pixmap: Pixmap,
    path: DevicePath,
    state: GraphicsState,
    state_stack: Vec<GraphicsState>,
    fonts: FontLibrary,
}

impl PixmapContext {
    /// Create a transparent surface of the given size in pixels
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            DrawError::Surface(format!("Invalid pixmap dimensions {}x{}", width, height))
        })?;
        tracing::debug!(width, height, "created pixmap surface");
        Ok(Self {
            pixmap,
            path: DevicePath::default(),
            state: GraphicsState::default(),
            state_stack: Vec::new(),
            fonts: FontLibrary::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill the whole surface with `color`, ignoring the current path
    pub fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color_to_u8(color);
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Unpremultiplied color of a pixel, `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(
            c.red() as f32 / 255.0,
            c.green() as f32 / 255.0,
            c.blue() as f32 / 255.0,
            c.alpha() as f32 / 255.0,
        ))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fonts
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a TTF/OTF face under the family name stored in the font
    ///
    /// Returns that family name.
    pub fn register_font(&mut self, data: Vec<u8>) -> Result<String> {
        let face = FontFace::from_data(data, 0, None)?;
        let family = face.family().to_string();
        self.fonts.add(face);
        Ok(family)
    }

    /// Register a TTF/OTF face under `family`
    pub fn register_font_as(&mut self, family: &str, data: Vec<u8>) -> Result<()> {
        let face = FontFace::from_data(data, 0, Some(family))?;
        self.fonts.add(face);
        Ok(())
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Face for the current font selection
    ///
    /// Without a selection the first registered face is used.
    fn current_face(&self) -> Result<&FontFace> {
        match &self.state.font {
            Some(sel) => self
                .fonts
                .get_face(&sel.family, sel.weight, sel.slant)
                .ok_or_else(|| {
                    DrawError::TextUnavailable(format!(
                        "no font registered for family {:?}",
                        sel.family
                    ))
                }),
            None => self
                .fonts
                .default_face()
                .ok_or_else(|| DrawError::TextUnavailable("no font registered".to_string())),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Painting
    // ─────────────────────────────────────────────────────────────────────────

    fn paint(&self) -> Paint<'static> {
        let [r, g, b, a] = color_to_u8(self.state.color);
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }

    fn fill_current(&mut self) {
        let Some(path) = self.path.to_skia() else {
            return;
        };
        let paint = self.paint();
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn device(&self, p: Point) -> Point {
        self.state.transform.transform_point(p)
    }
}

fn color_to_u8(color: Color) -> [u8; 4] {
    color
        .to_array()
        .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

impl std::fmt::Debug for PixmapContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapContext")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("save_depth", &self.state_stack.len())
            .finish()
    }
}

impl DrawContext for PixmapContext {
    fn new_path(&mut self) {
        self.path.clear();
    }

    fn new_sub_path(&mut self) {
        self.path.break_contour();
    }

    fn move_to(&mut self, point: Point) {
        let p = self.device(point);
        self.path.move_to(p);
    }

    fn line_to(&mut self, point: Point) {
        let p = self.device(point);
        self.path.line_to(p);
    }

    fn arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32) {
        let (start, pieces) = arc_to_cubics(center, radius, start_angle, end_angle);
        let start = self.device(start);
        self.path.line_to(start);
        for [c1, c2, end] in pieces {
            let (c1, c2, end) = (self.device(c1), self.device(c2), self.device(end));
            self.path.cubic_to(c1, c2, end);
        }
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn current_point(&self) -> Option<Point> {
        let device = self.path.current()?;
        let inverse = self.state.transform.inverse()?;
        Some(inverse.transform_point(device))
    }

    fn set_source_color(&mut self, color: Color) {
        self.state.color = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    fn fill(&mut self) {
        self.fill_current();
        self.path.clear();
    }

    fn fill_preserve(&mut self) {
        self.fill_current();
    }

    fn stroke(&mut self) {
        if let Some(path) = self.path.to_skia() {
            let scale = self.state.transform.determinant().abs().sqrt();
            let stroke = Stroke {
                width: self.state.line_width * scale,
                ..Stroke::default()
            };
            let paint = self.paint();
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
        self.path.clear();
    }

    fn select_font_face(&mut self, family: &str, slant: FontSlant, weight: FontWeight) {
        tracing::debug!(family, ?slant, ?weight, "select font face");
        self.state.font = Some(FontSelection {
            family: family.to_string(),
            slant,
            weight,
        });
    }

    fn set_font_size(&mut self, size: f32) {
        self.state.font_size = size;
    }

    fn text_extents(&self, text: &str) -> Result<TextExtents> {
        self.current_face()?
            .text_extents(text, self.state.font_size)
    }

    fn text_path(&mut self, text: &str) -> Result<()> {
        let origin = self.path.current().ok_or(DrawError::NoCurrentPoint)?;
        let transform = self.state.transform;
        let size = self.state.font_size;

        // outline into a scratch path so a missing glyph leaves the path untouched
        let mut glyphs = DevicePath::default();
        let advance = self
            .current_face()?
            .outline_text(text, size, origin, transform, &mut glyphs)?;

        self.path.append(glyphs);
        let end = origin + transform.transform_vector(geodraw_core::Vec2::new(advance, 0.0));
        self.path.move_to(end);
        tracing::trace!(text, size, advance, "text path");
        Ok(())
    }

    fn save(&mut self) {
        self.state_stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        match self.state_stack.pop() {
            Some(state) => self.state = state,
            None => tracing::warn!("restore called without a matching save"),
        }
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.then(&Affine2D::scale(sx, sy));
    }

    fn current_transform(&self) -> Affine2D {
        self.state.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_zero_size_surface_fails() {
        assert!(matches!(
            PixmapContext::new(0, 10),
            Err(DrawError::Surface(_))
        ));
    }

    #[test]
    fn test_current_point_in_user_space() {
        let mut ctx = PixmapContext::new(10, 10).unwrap();
        assert_eq!(ctx.current_point(), None);

        ctx.scale(2.0, 2.0);
        ctx.move_to(Point::new(1.0, 2.0));
        assert!(approx(ctx.current_point().unwrap(), Point::new(1.0, 2.0)));

        // the device point stays put when the transform changes
        ctx.scale(0.5, 0.5);
        assert!(approx(ctx.current_point().unwrap(), Point::new(2.0, 4.0)));
    }

    #[test]
    fn test_arc_current_point_and_sub_path() {
        let mut ctx = PixmapContext::new(10, 10).unwrap();
        ctx.arc(Point::new(5.0, 5.0), 2.0, 0.0, PI);
        assert!(approx(ctx.current_point().unwrap(), Point::new(3.0, 5.0)));

        ctx.new_sub_path();
        assert_eq!(ctx.current_point(), None);
    }

    #[test]
    fn test_close_path_returns_to_start() {
        let mut ctx = PixmapContext::new(10, 10).unwrap();
        ctx.move_to(Point::new(1.0, 1.0));
        ctx.line_to(Point::new(8.0, 1.0));
        ctx.close_path();
        assert_eq!(ctx.current_point(), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_save_restore_transform_and_paint() {
        let mut ctx = PixmapContext::new(10, 10).unwrap();
        ctx.set_line_width(3.0);
        ctx.save();
        ctx.scale(1.0, -1.0);
        ctx.set_line_width(7.0);
        ctx.restore();

        assert_eq!(ctx.current_transform(), Affine2D::IDENTITY);
        assert_eq!(ctx.state.line_width, 3.0);

        // unmatched restore is ignored
        ctx.restore();
        assert_eq!(ctx.current_transform(), Affine2D::IDENTITY);
    }

    #[test]
    fn test_text_without_fonts_is_unavailable() {
        let mut ctx = PixmapContext::new(10, 10).unwrap();
        assert!(matches!(
            ctx.text_extents("a"),
            Err(DrawError::TextUnavailable(_))
        ));

        ctx.select_font_face("Sans", FontSlant::Normal, FontWeight::Regular);
        ctx.move_to(Point::new(1.0, 5.0));
        assert!(matches!(
            ctx.text_path("a"),
            Err(DrawError::TextUnavailable(_))
        ));
        assert_eq!(ctx.current_point(), Some(Point::new(1.0, 5.0)));
    }

    #[test]
    fn test_text_path_needs_current_point() {
        let mut ctx = PixmapContext::new(10, 10).unwrap();
        assert_eq!(ctx.text_path("a"), Err(DrawError::NoCurrentPoint));
    }

    #[test]
    fn test_register_invalid_font() {
        let mut ctx = PixmapContext::new(10, 10).unwrap();
        assert!(matches!(
            ctx.register_font(b"not a font".to_vec()),
            Err(DrawError::FontParse(_))
        ));
        assert!(ctx.fonts().is_empty());
    }

    #[test]
    fn test_clear_and_pixel() {
        let mut ctx = PixmapContext::new(4, 4).unwrap();
        assert_eq!(ctx.pixel(0, 0), Some(Color::TRANSPARENT));

        ctx.clear(Color::WHITE);
        assert_eq!(ctx.pixel(3, 3), Some(Color::WHITE));
        assert_eq!(ctx.pixel(4, 0), None);
    }
}
