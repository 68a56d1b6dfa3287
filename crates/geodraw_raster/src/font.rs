//! Font loading and glyph layout
//!
//! Fonts are registered from raw TTF/OTF bytes and parsed on demand with
//! ttf-parser. Layout is a simple left-to-right run of horizontal advances.

use std::sync::Arc;

use geodraw_core::{Affine2D, DrawError, FontSlant, FontWeight, Point, Result, TextExtents, Vec2};
use ttf_parser::{GlyphId, OutlineBuilder};

use crate::path::DevicePath;

/// A parsed font face
pub struct FontFace {
    /// Raw font data (kept alive for ttf-parser)
    data: Arc<Vec<u8>>,
    /// Face index within the font file (for TTC files)
    face_index: u32,
    family: String,
    weight: FontWeight,
    slant: FontSlant,
    units_per_em: u16,
}

impl FontFace {
    /// Load a face from raw TTF/OTF data
    ///
    /// When `family` is `None` the family name is read from the font.
    pub fn from_data(data: Vec<u8>, face_index: u32, family: Option<&str>) -> Result<Self> {
        let data = Arc::new(data);
        let face = ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| DrawError::FontParse(format!("{:?}", e)))?;

        let family = match family {
            Some(name) => name.to_string(),
            None => face
                .names()
                .into_iter()
                .find(|n| n.name_id == ttf_parser::name_id::FAMILY)
                .and_then(|n| n.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
        };

        let slant = if face.is_italic() {
            FontSlant::Italic
        } else if face.is_oblique() {
            FontSlant::Oblique
        } else {
            FontSlant::Normal
        };

        let weight = weight_from_number(face.weight().to_number());
        let units_per_em = face.units_per_em();

        Ok(Self {
            data,
            face_index,
            family,
            weight,
            slant,
            units_per_em,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    pub fn slant(&self) -> FontSlant {
        self.slant
    }

    fn as_ttf_face(&self) -> Result<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.face_index)
            .map_err(|e| DrawError::FontParse(format!("{:?}", e)))
    }

    /// Glyphs of `text` with their pen positions, in font units
    fn layout(&self, face: &ttf_parser::Face<'_>, text: &str) -> Result<(Vec<(GlyphId, f32)>, f32)> {
        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen = 0.0;
        for c in text.chars() {
            let id = face.glyph_index(c).ok_or(DrawError::MissingGlyph(c))?;
            glyphs.push((id, pen));
            pen += face.glyph_hor_advance(id).unwrap_or(0) as f32;
        }
        Ok((glyphs, pen))
    }

    /// Ink extents of `text` at `size`, in user units with y down
    pub fn text_extents(&self, text: &str, size: f32) -> Result<TextExtents> {
        let face = self.as_ttf_face()?;
        let (glyphs, advance) = self.layout(&face, text)?;
        let scale = size / self.units_per_em as f32;

        let mut ink: Option<(f32, f32, f32, f32)> = None;
        for (id, pen) in glyphs {
            let Some(bbox) = face.glyph_bounding_box(id) else {
                continue;
            };
            let x0 = pen + bbox.x_min as f32;
            let x1 = pen + bbox.x_max as f32;
            // font units are y-up
            let y0 = -(bbox.y_max as f32);
            let y1 = -(bbox.y_min as f32);
            ink = Some(match ink {
                None => (x0, y0, x1, y1),
                Some((a, b, c, d)) => (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
            });
        }

        let x_advance = advance * scale;
        Ok(match ink {
            Some((x0, y0, x1, y1)) => TextExtents {
                x_bearing: x0 * scale,
                y_bearing: y0 * scale,
                width: (x1 - x0) * scale,
                height: (y1 - y0) * scale,
                x_advance,
                y_advance: 0.0,
            },
            None => TextExtents {
                x_advance,
                ..Default::default()
            },
        })
    }

    /// Append the outlines of `text` to `path`
    ///
    /// `origin` is the device-space baseline start and `linear` maps user
    /// vectors to device vectors. Returns the advance in user units.
    pub(crate) fn outline_text(
        &self,
        text: &str,
        size: f32,
        origin: Point,
        linear: Affine2D,
        path: &mut DevicePath,
    ) -> Result<f32> {
        let face = self.as_ttf_face()?;
        let (glyphs, advance) = self.layout(&face, text)?;
        let scale = size / self.units_per_em as f32;

        for (id, pen) in glyphs {
            let mut sink = GlyphSink {
                path: &mut *path,
                origin,
                linear,
                scale,
                pen,
            };
            if face.outline_glyph(id, &mut sink).is_none() {
                tracing::trace!(glyph = id.0, "glyph has no outline");
            }
        }
        Ok(advance * scale)
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("slant", &self.slant)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

fn weight_from_number(weight: u16) -> FontWeight {
    match weight {
        0..=199 => FontWeight::Thin,
        200..=349 => FontWeight::Light,
        350..=449 => FontWeight::Regular,
        450..=599 => FontWeight::Medium,
        600..=799 => FontWeight::Bold,
        _ => FontWeight::Black,
    }
}

/// Maps glyph outline points from font units into the device path
struct GlyphSink<'a> {
    path: &'a mut DevicePath,
    origin: Point,
    linear: Affine2D,
    scale: f32,
    pen: f32,
}

impl GlyphSink<'_> {
    fn map(&self, x: f32, y: f32) -> Point {
        let user = Vec2::new((self.pen + x) * self.scale, -y * self.scale);
        self.origin + self.linear.transform_vector(user)
    }
}

impl OutlineBuilder for GlyphSink<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let c = self.map(x1, y1);
        let p = self.map(x, y);
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.map(x1, y1);
        let c2 = self.map(x2, y2);
        let p = self.map(x, y);
        self.path.cubic_to(c1, c2, p);
    }

    fn close(&mut self) {
        self.path.close();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Font Library
// ─────────────────────────────────────────────────────────────────────────────

/// Registered faces, looked up by family, weight and slant
#[derive(Debug, Default)]
pub struct FontLibrary {
    faces: Vec<FontFace>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, face: FontFace) {
        tracing::debug!(
            family = face.family(),
            weight = ?face.weight(),
            slant = ?face.slant(),
            "registered font face"
        );
        self.faces.push(face);
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Registered family names, without duplicates
    pub fn families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = Vec::new();
        for face in &self.faces {
            if !families.contains(&face.family()) {
                families.push(face.family());
            }
        }
        families
    }

    /// Best match for the request within the family (case-insensitive)
    ///
    /// Prefers an exact match, then the closest weight with the same slant,
    /// then the closest weight of any slant.
    pub fn get_face(&self, family: &str, weight: FontWeight, slant: FontSlant) -> Option<&FontFace> {
        let candidates: Vec<&FontFace> = self
            .faces
            .iter()
            .filter(|f| f.family.eq_ignore_ascii_case(family))
            .collect();

        let distance = |f: &FontFace| (f.weight.to_number() as i32 - weight.to_number() as i32).abs();

        if let Some(face) = candidates
            .iter()
            .copied()
            .find(|f| f.weight == weight && f.slant == slant)
        {
            return Some(face);
        }

        if let Some(face) = candidates
            .iter()
            .copied()
            .filter(|f| f.slant == slant)
            .min_by_key(|f| distance(*f))
        {
            return Some(face);
        }

        candidates.into_iter().min_by_key(|f| distance(*f))
    }

    /// Face used when no font has been selected
    pub fn default_face(&self) -> Option<&FontFace> {
        self.faces.first()
    }
}
