//! geodraw paint
//!
//! Shapes and annotation marks drawn onto any [`DrawContext`]. Every shape
//! emits its geometry into the context's current path under a [`PathMode`],
//! so shapes can start a new path, add a disjoint contour, or continue the
//! current one, and are painted once at the end.
//!
//! # Features
//!
//! - Rectangles, lines, polygons, arcs, sectors and segments
//! - Text emitted as outlines, aligned by its ink box
//! - Angle markers, tick marks and parallel marks
//! - Fill, stroke, and fill-then-stroke without rebuilding the path
//! - TOML drawing defaults applied through [`Canvas`]
//!
//! # Example
//!
//! ```rust
//! use geodraw_core::{Color, Point, RecordingContext};
//! use geodraw_paint::Canvas;
//!
//! let mut ctx = RecordingContext::new();
//! let mut canvas = Canvas::new(&mut ctx);
//!
//! let (a, b, c) = (Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(0.0, 80.0));
//! canvas
//!     .polygon()
//!     .of_points([a, b, c])
//!     .fill_stroke(Color::rgb(0.9, 0.9, 1.0), Color::BLACK, 1.0)?;
//!
//! canvas.angle_marker(b, a, c)?;
//! canvas.tick(a, b)?;
//! canvas.stroke_path();
//! # Ok::<(), geodraw_core::DrawError>(())
//! ```

pub mod config;
pub mod context;
pub mod marker;
pub mod path;
pub mod primitives;
pub mod shape;
pub mod text;
pub mod vector;

// ─────────────────────────────────────────────────────────────────────────────
// Core type re-exports from geodraw_core
// ─────────────────────────────────────────────────────────────────────────────

pub use geodraw_core::{
    Color, DrawContext, DrawContextExt, DrawError, FontSlant, FontWeight, Point, Result,
    TextExtents, Vec2,
};

// ─────────────────────────────────────────────────────────────────────────────
// geodraw_paint specific exports
// ─────────────────────────────────────────────────────────────────────────────

pub use config::{DrawingConfig, StrokeDefaults, TextDefaults};
pub use context::Canvas;
pub use marker::{angle_marker, paratick, tick, AngleMarker, MarkCount, TickMarker};
pub use path::{emit_compound, emit_path, fill, fill_stroke, stroke, Emit, EmittedPath, PathMode};
pub use primitives::{ArcKind, Circle, Line, Polygon, Rectangle, ShapeGeometry};
pub use shape::{line, polygon, rectangle, Shape};
pub use text::{aligned_origin, FontSpec, HorizontalAlign, Text, VerticalAlign};
pub use vector::{midpoint, perpendicular, unit_vector, SegmentFrame};
