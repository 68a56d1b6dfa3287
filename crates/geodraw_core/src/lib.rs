//! geodraw core
//!
//! This crate provides the foundation shared by the geodraw crates:
//!
//! - **Value types**: points, vectors, bounds, affine transforms, colors
//! - **Draw Context**: the rendering capability shapes are emitted into
//! - **Recording Context**: a `DrawContext` that logs every call, used as a
//!   test double and for deferred replay onto a real surface
//! - **Errors**: the `DrawError` taxonomy
//!
//! # Example
//!
//! ```rust
//! use geodraw_core::{DrawCommand, DrawContext, Point, RecordingContext};
//!
//! let mut ctx = RecordingContext::new();
//! ctx.new_path();
//! ctx.arc(Point::new(50.0, 50.0), 10.0, 0.0, std::f32::consts::PI);
//! ctx.stroke();
//!
//! assert_eq!(ctx.count(|c| matches!(c, DrawCommand::Arc { .. })), 1);
//! ```

pub mod draw;
pub mod error;
pub mod geometry;

pub use draw::{
    normalized_arc_end, point_on_circle, DrawCommand, DrawContext, DrawContextExt, FontSlant,
    FontWeight, RecordingContext, StateGuard, TextExtents, TextMetrics,
};
pub use error::{DrawError, Result};
pub use geometry::{Affine2D, Bounds, Color, Point, Vec2};
