//! Text as a path
//!
//! Text is always emitted as glyph outlines, so it is filled and stroked like
//! any other shape. Alignment positions the *ink box* of the string (not its
//! advance box) relative to the nominal position.

use geodraw_core::{
    DrawContext, DrawContextExt, FontSlant, FontWeight, Point, Result, TextExtents, Vec2,
};
use serde::{Deserialize, Serialize};

use crate::path::Emit;

/// Horizontal alignment of the ink box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment of the ink box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Baseline,
    Top,
    Middle,
    Bottom,
}

/// Font face selection
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub family: String,
    pub weight: FontWeight,
    pub slant: FontSlant,
}

impl FontSpec {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::default(),
            slant: FontSlant::default(),
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_slant(mut self, slant: FontSlant) -> Self {
        self.slant = slant;
        self
    }
}

/// A string placed at a point
///
/// `font` and `size` are applied to the context before measuring; when unset
/// the context's current font and size are used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Text {
    pub text: String,
    pub position: Point,
    pub font: Option<FontSpec>,
    pub size: Option<f32>,
    pub align_x: HorizontalAlign,
    pub align_y: VerticalAlign,
    /// Render upside-down in y, for y-up coordinate systems
    pub flipped: bool,
    /// Added to `position` before alignment
    pub offset: Vec2,
}

impl Text {
    pub fn new(text: impl Into<String>, position: Point) -> Self {
        Self {
            text: text.into(),
            position,
            ..Default::default()
        }
    }

    /// Where the text origin (baseline start) must go for the ink box to be
    /// aligned at the nominal position
    pub fn origin(&self, extents: &TextExtents) -> Point {
        let anchor = self.position + self.offset;
        aligned_origin(anchor, extents, self.align_x, self.align_y, self.flipped)
    }
}

/// Baseline origin that aligns the ink box described by `extents` at `anchor`
///
/// With `flipped`, the vertical adjustment is mirrored so the result is
/// correct once the text is drawn under a `scale(1, -1)`.
pub fn aligned_origin(
    anchor: Point,
    extents: &TextExtents,
    align_x: HorizontalAlign,
    align_y: VerticalAlign,
    flipped: bool,
) -> Point {
    let mut x = anchor.x - extents.x_bearing;
    match align_x {
        HorizontalAlign::Left => {}
        HorizontalAlign::Center => x -= extents.width / 2.0,
        HorizontalAlign::Right => x -= extents.width,
    }

    let dy = match align_y {
        VerticalAlign::Baseline => 0.0,
        VerticalAlign::Middle => -extents.y_bearing / 2.0,
        VerticalAlign::Bottom => -(extents.y_bearing + extents.height),
        VerticalAlign::Top => -extents.y_bearing,
    };

    if flipped {
        Point::new(x, anchor.y - dy)
    } else {
        Point::new(x, anchor.y + dy)
    }
}

impl Emit for Text {
    fn emit(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        match &self.font {
            Some(font) if font.family.is_empty() => {
                tracing::warn!(
                    weight = ?font.weight,
                    slant = ?font.slant,
                    "font style without a family, ignored"
                );
            }
            Some(font) => ctx.select_font_face(&font.family, font.slant, font.weight),
            None => {}
        }
        if let Some(size) = self.size {
            ctx.set_font_size(size);
        }

        let extents = ctx.text_extents(&self.text)?;
        ctx.move_to(self.origin(&extents));

        if self.flipped {
            let mut saved = ctx.saved();
            saved.scale(1.0, -1.0);
            saved.text_path(&self.text)
        } else {
            ctx.text_path(&self.text)
        }
    }

    fn kind(&self) -> &'static str {
        "text"
    }
}
