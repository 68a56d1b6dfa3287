//! geodraw raster
//!
//! CPU rendering backend for geodraw. [`PixmapContext`] implements
//! [`DrawContext`](geodraw_core::DrawContext) on a tiny-skia pixmap, with text
//! outlines and ink metrics taken from fonts registered as raw TTF/OTF bytes.
//!
//! # Example
//!
//! ```rust
//! use geodraw_core::{Color, DrawContext, Point};
//! use geodraw_raster::PixmapContext;
//!
//! let mut ctx = PixmapContext::new(64, 64)?;
//! ctx.new_path();
//! ctx.arc(Point::new(32.0, 32.0), 20.0, 0.0, std::f32::consts::TAU);
//! ctx.set_source_color(Color::RED);
//! ctx.fill();
//!
//! assert_eq!(ctx.pixel(32, 32), Some(Color::RED));
//! # Ok::<(), geodraw_core::DrawError>(())
//! ```

pub mod font;
mod path;
pub mod pixmap;

pub use font::{FontFace, FontLibrary};
pub use pixmap::PixmapContext;
