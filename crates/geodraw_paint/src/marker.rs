//! Geometry annotation marks
//!
//! Angle markers (arcs or a right-angle corner at a vertex) and tick marks
//! (bars or chevrons across a segment) used to label equal angles and equal
//! lengths in geometric figures.
//!
//! Markers only build the path. The caller paints once, so every arc or tick
//! of a marker is stroked together:
//!
//! ```
//! use geodraw_core::{DrawContext, Point, RecordingContext};
//! use geodraw_paint::{tick, MarkCount, TickMarker};
//!
//! let mut ctx = RecordingContext::new();
//! tick(
//!     &mut ctx,
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     &TickMarker::default().with_count(MarkCount::Two),
//! )
//! .unwrap();
//! ctx.stroke();
//! ```

use geodraw_core::{DrawContext, DrawError, Point, Result, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::path::{emit_path, Emit, PathMode};
use crate::primitives::{Line, Polygon};
use crate::vector::SegmentFrame;

/// Number of arcs or ticks in a marker
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MarkCount {
    #[default]
    One,
    Two,
    Three,
}

impl MarkCount {
    /// Offsets of each mark from the nominal position, `gap` apart and
    /// centered on zero
    pub fn offsets(self, gap: f32) -> SmallVec<[f32; 3]> {
        match self {
            MarkCount::One => smallvec![0.0],
            MarkCount::Two => smallvec![-gap / 2.0, gap / 2.0],
            MarkCount::Three => smallvec![-gap, 0.0, gap],
        }
    }
}

impl TryFrom<u32> for MarkCount {
    type Error = DrawError;

    fn try_from(count: u32) -> Result<Self> {
        match count {
            1 => Ok(MarkCount::One),
            2 => Ok(MarkCount::Two),
            3 => Ok(MarkCount::Three),
            other => Err(DrawError::InvalidMarkCount(other)),
        }
    }
}

impl From<MarkCount> for u32 {
    fn from(count: MarkCount) -> u32 {
        match count {
            MarkCount::One => 1,
            MarkCount::Two => 2,
            MarkCount::Three => 3,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Angle Markers
// ─────────────────────────────────────────────────────────────────────────────

/// Angle marker settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleMarker {
    pub count: MarkCount,
    pub radius: f32,
    /// Distance between concentric arcs
    pub gap: f32,
    /// Draw a square corner instead of arcs
    pub right_angle: bool,
}

impl Default for AngleMarker {
    fn default() -> Self {
        Self {
            count: MarkCount::One,
            radius: 8.0,
            gap: 2.0,
            right_angle: false,
        }
    }
}

impl AngleMarker {
    pub fn with_count(mut self, count: MarkCount) -> Self {
        self.count = count;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn right_angle(mut self) -> Self {
        self.right_angle = true;
        self
    }
}

/// Mark the angle a-b-c at vertex `b`
///
/// Always starts a new path. Arcs run from the direction of `a` to the
/// direction of `c` following the context's `arc` sweep, so the order of `a`
/// and `c` picks which of the two angles is marked. Extra arcs are separate
/// sub-paths of the same path.
pub fn angle_marker(
    ctx: &mut dyn DrawContext,
    a: Point,
    b: Point,
    c: Point,
    marker: &AngleMarker,
) -> Result<()> {
    let ang1 = (a - b).angle();
    let ang2 = (c - b).angle();
    ctx.new_path();

    if marker.right_angle {
        let r = marker.radius / 2.0;
        let v = Vec2::from_angle(ang1);
        let pv = Vec2::from_angle(ang2);
        let corner = Polygon::open([b + v * r, b + (v + pv) * r, b + pv * r]);
        tracing::trace!(?b, r, "right angle marker");
        return corner.emit(ctx);
    }

    for (i, offset) in marker.count.offsets(marker.gap).into_iter().enumerate() {
        if i > 0 {
            ctx.new_sub_path();
        }
        ctx.arc(b, marker.radius + offset, ang1, ang2);
    }
    tracing::trace!(?b, ang1, ang2, count = ?marker.count, "angle marker");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tick Marks
// ─────────────────────────────────────────────────────────────────────────────

/// Tick mark settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickMarker {
    pub count: MarkCount,
    /// Size of each tick across the segment
    pub length: f32,
    /// Distance between neighbouring ticks along the segment
    pub gap: f32,
    /// How the first tick joins the current path; later ticks are sub-paths
    pub mode: PathMode,
}

impl Default for TickMarker {
    fn default() -> Self {
        Self {
            count: MarkCount::One,
            length: 4.0,
            gap: 1.0,
            mode: PathMode::NewPath,
        }
    }
}

impl TickMarker {
    pub fn with_count(mut self, count: MarkCount) -> Self {
        self.count = count;
        self
    }

    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_mode(mut self, mode: PathMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Bars across the middle of segment a-b, perpendicular to it
///
/// Fails with [`DrawError::DegenerateSegment`] before emitting anything when
/// `a` and `b` coincide.
pub fn tick(ctx: &mut dyn DrawContext, a: Point, b: Point, marker: &TickMarker) -> Result<()> {
    let frame = SegmentFrame::new(a, b)?;
    let half = frame.normal * (marker.length / 2.0);

    let segments = marker
        .count
        .offsets(marker.gap)
        .into_iter()
        .map(|offset| {
            let pos = frame.along(offset);
            Line::new(pos + half, pos - half)
        });
    emit_segments(ctx, segments, marker.mode)
}

/// Chevrons across the middle of segment a-b, pointing from `a` toward `b`
///
/// Used to mark parallel lines. Fails like [`tick`] on a degenerate segment.
pub fn paratick(ctx: &mut dyn DrawContext, a: Point, b: Point, marker: &TickMarker) -> Result<()> {
    let frame = SegmentFrame::new(a, b)?;
    let scale = marker.length / 2.0;
    let arm1 = (-frame.direction + frame.normal) * scale;
    let arm2 = (-frame.direction - frame.normal) * scale;

    let segments = marker
        .count
        .offsets(marker.gap)
        .into_iter()
        .flat_map(|offset| {
            let pos = frame.along(offset);
            [Line::new(pos, pos + arm1), Line::new(pos, pos + arm2)]
        });
    emit_segments(ctx, segments, marker.mode)
}

fn emit_segments(
    ctx: &mut dyn DrawContext,
    segments: impl Iterator<Item = Line>,
    mode: PathMode,
) -> Result<()> {
    for (i, segment) in segments.enumerate() {
        let mode = if i == 0 { mode } else { PathMode::NewSubPath };
        emit_path(ctx, &segment, mode)?;
    }
    Ok(())
}
