//! Error types for geodraw

use thiserror::Error;

use crate::geometry::Point;

/// Errors raised while building or painting a path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    /// A segment whose endpoints coincide has no direction
    #[error("Degenerate segment: ({}, {}) and ({}, {}) coincide", a.x, a.y, b.x, b.y)]
    DegenerateSegment { a: Point, b: Point },

    /// Marker multiplicity outside 1..=3
    #[error("Invalid mark count {0}: expected 1, 2 or 3")]
    InvalidMarkCount(u32),

    /// The context cannot measure or outline text
    #[error("Text unavailable: {0}")]
    TextUnavailable(String),

    /// The selected font has no glyph for a character
    #[error("Glyph not found for character {0:?}")]
    MissingGlyph(char),

    /// Font data could not be parsed
    #[error("Font parsing failed: {0}")]
    FontParse(String),

    /// An operation needed a current point but the path has none
    #[error("No current point")]
    NoCurrentPoint,

    /// Drawing surface could not be created or used
    #[error("Surface error: {0}")]
    Surface(String),

    /// Drawing configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for geodraw operations
pub type Result<T> = std::result::Result<T, DrawError>;
