//! Engine configuration: zoom bounds, document extent, import thresholds.
//!
//! Hosts either deserialize an [`EngineConfig`] from JSON (every field has a
//! default) or build one from `SITPLAN_*` environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const DEFAULT_MIN_ZOOM: f64 = 0.25;
pub const DEFAULT_MAX_ZOOM: f64 = 4.0;
pub const DEFAULT_ZOOM_STEP: f64 = 1.1;
pub const DEFAULT_PADDING: f64 = 40.0;
pub const DEFAULT_DOCUMENT_WIDTH: f64 = 1189.0;
pub const DEFAULT_DOCUMENT_HEIGHT: f64 = 841.0;
pub const DEFAULT_DUPLICATE_OFFSET: f64 = 20.0;
pub const DEFAULT_MAX_IMPORT_SIZE: f64 = 2000.0;
pub const DEFAULT_LABEL_FONT_SIZE: f64 = 12.0;

/// Tunables for one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Smallest zoom factor the viewport may reach.
    pub min_zoom: f64,
    /// Largest zoom factor the viewport may reach.
    pub max_zoom: f64,
    /// Multiplicative zoom change per wheel notch.
    pub zoom_step: f64,
    /// View-space padding between the viewport edge and document origin.
    pub padding: f64,
    /// Page width in document units.
    pub document_width: f64,
    /// Page height in document units.
    pub document_height: f64,
    /// Offset applied to duplicated elements on both axes.
    pub duplicate_offset: f64,
    /// Imports wider or taller than this raise an oversize warning.
    pub max_import_size: f64,
    /// Font size given to newly created labels.
    pub label_font_size: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_step: DEFAULT_ZOOM_STEP,
            padding: DEFAULT_PADDING,
            document_width: DEFAULT_DOCUMENT_WIDTH,
            document_height: DEFAULT_DOCUMENT_HEIGHT,
            duplicate_offset: DEFAULT_DUPLICATE_OFFSET,
            max_import_size: DEFAULT_MAX_IMPORT_SIZE,
            label_font_size: DEFAULT_LABEL_FONT_SIZE,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `SITPLAN_MIN_ZOOM`, `SITPLAN_MAX_ZOOM`, `SITPLAN_ZOOM_STEP`
    /// - `SITPLAN_PADDING`
    /// - `SITPLAN_DOCUMENT_WIDTH`, `SITPLAN_DOCUMENT_HEIGHT`
    /// - `SITPLAN_DUPLICATE_OFFSET`, `SITPLAN_MAX_IMPORT_SIZE`
    /// - `SITPLAN_LABEL_FONT_SIZE`
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if a variable is set but unparsable or
    /// the resulting config fails [`EngineConfig::validate`].
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).map_err(|_| ()))
    }

    /// Same as [`EngineConfig::from_env`] but reading from an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Result<String, ()>,
    {
        let d = Self::default();
        let config = Self {
            min_zoom: parse_f64(&lookup, "SITPLAN_MIN_ZOOM", d.min_zoom)?,
            max_zoom: parse_f64(&lookup, "SITPLAN_MAX_ZOOM", d.max_zoom)?,
            zoom_step: parse_f64(&lookup, "SITPLAN_ZOOM_STEP", d.zoom_step)?,
            padding: parse_f64(&lookup, "SITPLAN_PADDING", d.padding)?,
            document_width: parse_f64(&lookup, "SITPLAN_DOCUMENT_WIDTH", d.document_width)?,
            document_height: parse_f64(&lookup, "SITPLAN_DOCUMENT_HEIGHT", d.document_height)?,
            duplicate_offset: parse_f64(&lookup, "SITPLAN_DUPLICATE_OFFSET", d.duplicate_offset)?,
            max_import_size: parse_f64(&lookup, "SITPLAN_MAX_IMPORT_SIZE", d.max_import_size)?,
            label_font_size: parse_f64(&lookup, "SITPLAN_LABEL_FONT_SIZE", d.label_font_size)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when zoom bounds are inverted or any
    /// size-like value is not strictly positive.
    pub fn validate(&self) -> Result<(), EngineError> {
        let positive = [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("zoom_step", self.zoom_step),
            ("document_width", self.document_width),
            ("document_height", self.document_height),
            ("max_import_size", self.max_import_size),
            ("label_font_size", self.label_font_size),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(EngineError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if self.min_zoom > self.max_zoom {
            return Err(EngineError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.padding < 0.0 {
            return Err(EngineError::Config(format!("padding must not be negative, got {}", self.padding)));
        }
        Ok(())
    }

    /// Clamp a requested zoom factor into the configured range.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

fn parse_f64<F>(lookup: &F, key: &str, default: f64) -> Result<f64, EngineError>
where
    F: Fn(&str) -> Result<String, ()>,
{
    match lookup(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("{key}: {e}"))),
        Err(()) => Ok(default),
    }
}
