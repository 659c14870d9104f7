//! Canvas configuration.
//!
//! Every tunable constant of the canvas lives here. Hosts may send a partial
//! JSON object; missing fields keep their defaults.

use crate::geometry::{DEFAULT_GRID_UNIT, DEFAULT_NODE_SIZE};
use crate::transform::ScaleLimits;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Smallest zoom factor any configuration may allow.
pub const SCALE_FLOOR: f64 = 0.2;
/// Largest zoom factor any configuration may allow.
pub const SCALE_CEILING: f64 = 3.0;

/// Which screen point stays fixed while zooming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomAnchor {
    /// The viewport center.
    #[default]
    Center,
    /// The pointer position (wheel zoom only; buttons always use the center).
    Pointer,
}

/// Configuration for a canvas instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// World-space footprint shared by every node.
    pub node_size: Size,
    /// Grid-snap quantum for dragged nodes.
    pub grid_unit: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Upper bound on the scale chosen by fit-to-view.
    pub fit_max_scale: f64,
    /// Screen padding kept around the graph by fit-to-view.
    pub fit_padding: f64,
    /// Scale delta per zoom-in / zoom-out action.
    pub zoom_step: f64,
    /// Scale delta per pixel of modifier-gated wheel scroll.
    pub wheel_zoom_sensitivity: f64,
    pub zoom_anchor: ZoomAnchor,
    /// Subtasks listed on a node card before "+N more".
    pub max_visible_subtasks: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            node_size: DEFAULT_NODE_SIZE,
            grid_unit: DEFAULT_GRID_UNIT,
            min_scale: SCALE_FLOOR,
            max_scale: SCALE_CEILING,
            fit_max_scale: 1.2,
            fit_padding: 60.0,
            zoom_step: 0.1,
            wheel_zoom_sensitivity: 0.001,
            zoom_anchor: ZoomAnchor::Center,
            max_visible_subtasks: 4,
        }
    }
}

impl CanvasConfig {
    /// Decode a (possibly partial) configuration object.
    ///
    /// # Errors
    /// Returns the decoder message for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let mut config: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.normalize();
        Ok(config)
    }

    pub fn scale_limits(&self) -> ScaleLimits {
        ScaleLimits {
            min: self.min_scale,
            max: self.max_scale,
            fit_max: self.fit_max_scale,
        }
    }

    /// Repair inverted or out-of-range bounds instead of rejecting them.
    /// The scale range is always kept inside [`SCALE_FLOOR`, `SCALE_CEILING`].
    pub fn normalize(&mut self) {
        let defaults = Self::default();
        if self.min_scale.is_nan() {
            self.min_scale = defaults.min_scale;
        }
        if self.max_scale.is_nan() {
            self.max_scale = defaults.max_scale;
        }
        if self.max_scale < self.min_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        let requested = (self.min_scale, self.max_scale);
        self.min_scale = self.min_scale.clamp(SCALE_FLOOR, SCALE_CEILING);
        self.max_scale = self.max_scale.clamp(SCALE_FLOOR, SCALE_CEILING);
        if (self.min_scale, self.max_scale) != requested {
            log::warn!(
                "scale range {requested:?} clamped to ({}, {})",
                self.min_scale,
                self.max_scale
            );
        }
        if self.fit_max_scale.is_nan() {
            self.fit_max_scale = defaults.fit_max_scale;
        }
        self.fit_max_scale = self.fit_max_scale.min(self.max_scale);
        if self.node_size.width <= 0.0 || self.node_size.height <= 0.0 {
            log::warn!("ignoring non-positive node size {:?}", self.node_size);
            self.node_size = defaults.node_size;
        }
    }
}
