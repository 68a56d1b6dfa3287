//! Drawing defaults loaded from TOML
//!
//! Every section and field is optional; missing values fall back to the
//! built-in defaults.
//!
//! ```toml
//! [angle_marker]
//! count = 2
//! radius = 12.0
//!
//! [tick]
//! length = 6.0
//!
//! [stroke]
//! width = 1.5
//! color = { r = 0.2, g = 0.2, b = 0.2 }
//!
//! [text]
//! family = "DejaVu Sans"
//! size = 14.0
//! weight = "bold"
//! ```

use std::fs;
use std::path::Path;

use geodraw_core::{Color, DrawError, FontSlant, FontWeight, Result};
use serde::{Deserialize, Serialize};

use crate::marker::{AngleMarker, TickMarker};
use crate::text::FontSpec;

/// Stroke applied by [`Canvas::stroke_path`](crate::Canvas::stroke_path)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeDefaults {
    pub width: f32,
    pub color: Color,
}

impl Default for StrokeDefaults {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: Color::BLACK,
        }
    }
}

/// Font used by text created through a [`Canvas`](crate::Canvas)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    pub family: String,
    pub size: f32,
    pub weight: FontWeight,
    pub slant: FontSlant,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12.0,
            weight: FontWeight::Regular,
            slant: FontSlant::Normal,
        }
    }
}

impl TextDefaults {
    pub fn font(&self) -> FontSpec {
        FontSpec::new(self.family.clone())
            .with_weight(self.weight)
            .with_slant(self.slant)
    }
}

/// Defaults for markers, strokes and text
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    pub angle_marker: AngleMarker,
    pub tick: TickMarker,
    pub stroke: StrokeDefaults,
    pub text: TextDefaults,
}

impl DrawingConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DrawError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| DrawError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded drawing config");
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DrawError::Config(e.to_string()))
    }
}
