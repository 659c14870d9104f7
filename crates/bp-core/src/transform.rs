//! View transform: zoom scale plus pan offset.
//!
//! Pan is unbounded; scale is always clamped into [`ScaleLimits`].

use crate::config::{SCALE_CEILING, SCALE_FLOOR};
use crate::geometry;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// The canvas (viewport) dimensions in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// A zero-sized viewport has not been measured by the host yet.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLimits {
    pub min: f64,
    pub max: f64,
    /// Additional ceiling applied only by fit-to-view, so small graphs
    /// are not blown up.
    pub fit_max: f64,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self {
            min: SCALE_FLOOR,
            max: SCALE_CEILING,
            fit_max: 1.2,
        }
    }
}

impl ScaleLimits {
    pub fn clamp(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.min;
        }
        scale.clamp(self.min, self.max)
    }
}

/// Affine world → screen map: `screen = (world + offset) * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    /// Pan offset in world units.
    pub offset: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub const fn new(scale: f64, offset: Vec2) -> Self {
        Self { scale, offset }
    }

    pub fn to_screen(&self, world: Point) -> Point {
        geometry::to_screen(world, self)
    }

    pub fn to_world(&self, screen: Point) -> Point {
        geometry::to_world(screen, self)
    }

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, delta_screen: Vec2) {
        self.pan_from(self.offset, delta_screen);
    }

    /// Set the offset to `origin` displaced by a screen-space delta.
    ///
    /// Drag-panning always derives from the offset frozen at session start,
    /// so many small moves never accumulate rounding drift.
    pub fn pan_from(&mut self, origin: Vec2, delta_screen: Vec2) {
        self.offset = origin + delta_screen / self.scale;
    }

    /// Change the scale by `delta`, keeping the world point under the
    /// screen-space `anchor` fixed. Returns `true` if the scale changed.
    pub fn zoom(&mut self, delta: f64, anchor: Point, limits: &ScaleLimits) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let next = limits.clamp(self.scale + delta);
        if next == self.scale {
            return false;
        }
        let pinned = self.to_world(anchor);
        self.scale = next;
        self.offset = anchor.to_vec2() / next - pinned.to_vec2();
        true
    }

    /// The transform that centers `bounds` in `viewport` at the largest
    /// scale (capped at `limits.fit_max`) leaving `padding` pixels on each side.
    ///
    /// Returns `None` for degenerate input; callers keep their prior transform.
    pub fn fit_to_bounds(
        bounds: Rect,
        viewport: Viewport,
        padding: f64,
        limits: &ScaleLimits,
    ) -> Option<Self> {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 || !viewport.is_measured() {
            return None;
        }
        let avail_w = (viewport.width - padding * 2.0).max(0.0);
        let avail_h = (viewport.height - padding * 2.0).max(0.0);
        let fit = (avail_w / bounds.width()).min(avail_h / bounds.height());
        let scale = limits.clamp(fit.min(limits.fit_max));
        let offset = viewport.center().to_vec2() / scale - bounds.center().to_vec2();
        Some(Self { scale, offset })
    }
}
