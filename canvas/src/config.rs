//! Engine configuration: colors, thresholds, grid defaults, history bound.
//!
//! Built from defaults, a JSON document (every field optional), or `PLAN_*`
//! environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{CLOSE_POLYGON_THRESHOLD_PX, FIRST_POINT_THRESHOLD_PX, WHEEL_ZOOM_BASE};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Tunables for every controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Initial grid cell size in millimeters.
    pub grid_size_mm: f64,
    pub grid_visible: bool,
    /// Stroke and fill base color of area polygons.
    pub area_color: String,
    /// Fill opacity of area polygons, 0..=1.
    pub area_opacity: f64,
    pub distance_color: String,
    pub distance_stroke_width: f64,
    /// Arrowhead length as a multiple of the distance stroke width.
    pub arrow_size_factor: f64,
    pub label_font_size: f64,
    /// Default stroke color for draw mode.
    pub stroke_color: String,
    pub stroke_width: f64,
    /// Release within this many screen pixels of the first vertex closes a polygon.
    pub close_threshold_px: f64,
    pub first_point_threshold_px: f64,
    /// Size of a freshly placed symbol, in world pixels.
    pub symbol_size: f64,
    /// Upper bound on undo entries. `None` keeps every snapshot.
    pub history_capacity: Option<usize>,
    pub color_history_len: usize,
    pub wheel_zoom_base: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid_size_mm: 1000.0,
            grid_visible: false,
            area_color: "#2563eb".into(),
            area_opacity: 0.3,
            distance_color: "#dc2626".into(),
            distance_stroke_width: 2.0,
            arrow_size_factor: 5.0,
            label_font_size: 14.0,
            stroke_color: "#000000".into(),
            stroke_width: 2.0,
            close_threshold_px: CLOSE_POLYGON_THRESHOLD_PX,
            first_point_threshold_px: FIRST_POINT_THRESHOLD_PX,
            symbol_size: 40.0,
            history_capacity: None,
            color_history_len: 10,
            wheel_zoom_base: WHEEL_ZOOM_BASE,
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON document; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()
    }

    /// Build from environment variables.
    ///
    /// Optional:
    /// - `PLAN_GRID_SIZE_MM`: default 1000
    /// - `PLAN_GRID_VISIBLE`: `true`/`false`, default false
    /// - `PLAN_AREA_COLOR`, `PLAN_DISTANCE_COLOR`, `PLAN_STROKE_COLOR`
    /// - `PLAN_AREA_OPACITY`: default 0.3
    /// - `PLAN_SYMBOL_SIZE`: default 40
    /// - `PLAN_HISTORY_CAPACITY`: unbounded when absent
    ///
    /// Unparsable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the resulting values are out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(v) => Some(v),
            Err(_) => None,
        })
    }

    /// Build from an arbitrary key lookup (the environment, in production).
    ///
    /// # Errors
    ///
    /// Same as [`CanvasConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let parse_f64 = |key: &str, default: f64| match lookup(key).map(|v| v.trim().parse::<f64>()) {
            Some(Ok(v)) => v,
            _ => default,
        };
        let config = Self {
            grid_size_mm: parse_f64("PLAN_GRID_SIZE_MM", defaults.grid_size_mm),
            grid_visible: lookup("PLAN_GRID_VISIBLE").map_or(defaults.grid_visible, |v| v.trim() == "true"),
            area_color: lookup("PLAN_AREA_COLOR").unwrap_or(defaults.area_color),
            area_opacity: parse_f64("PLAN_AREA_OPACITY", defaults.area_opacity),
            distance_color: lookup("PLAN_DISTANCE_COLOR").unwrap_or(defaults.distance_color),
            stroke_color: lookup("PLAN_STROKE_COLOR").unwrap_or(defaults.stroke_color),
            symbol_size: parse_f64("PLAN_SYMBOL_SIZE", defaults.symbol_size),
            history_capacity: match lookup("PLAN_HISTORY_CAPACITY").map(|v| v.trim().parse::<usize>()) {
                Some(Ok(n)) => Some(n),
                _ => None,
            },
            ..defaults
        };
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&self.area_opacity) {
            return Err(ConfigError::Invalid { key: "area_opacity", value: self.area_opacity.to_string() });
        }
        if !(self.symbol_size.is_finite() && self.symbol_size > 0.0) {
            return Err(ConfigError::Invalid { key: "symbol_size", value: self.symbol_size.to_string() });
        }
        if !(self.wheel_zoom_base > 0.0 && self.wheel_zoom_base < 1.0) {
            return Err(ConfigError::Invalid { key: "wheel_zoom_base", value: self.wheel_zoom_base.to_string() });
        }
        if self.history_capacity == Some(0) {
            return Err(ConfigError::Invalid { key: "history_capacity", value: "0".into() });
        }
        Ok(self)
    }
}
