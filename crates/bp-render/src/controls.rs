//! On-canvas view controls: zoom in, zoom out, fit to view.
//!
//! Laid out in screen space, anchored to the bottom-right corner of the
//! viewport, so they never move with pan or zoom.

use bp_core::{Point, Rect, Viewport};
use serde::Serialize;

/// A discrete, user-invocable view action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewAction {
    ZoomIn,
    ZoomOut,
    FitToView,
}

impl ViewAction {
    /// Left-to-right button order.
    pub const ALL: [ViewAction; 3] = [Self::ZoomOut, Self::ZoomIn, Self::FitToView];

    pub fn glyph(self) -> &'static str {
        match self {
            Self::ZoomIn => "+",
            Self::ZoomOut => "−",
            Self::FitToView => "⤢",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoomIn",
            Self::ZoomOut => "zoomOut",
            Self::FitToView => "fitToView",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "zoomIn" | "zoom-in" => Some(Self::ZoomIn),
            "zoomOut" | "zoom-out" => Some(Self::ZoomOut),
            "fitToView" | "fit" => Some(Self::FitToView),
            _ => None,
        }
    }
}

pub const BUTTON_SIZE: f64 = 32.0;
pub const BUTTON_GAP: f64 = 8.0;
pub const MARGIN: f64 = 16.0;
/// Width reserved left of the buttons for the zoom percentage.
pub const ZOOM_LABEL_WIDTH: f64 = 56.0;

/// Screen rectangles of every control button, in [`ViewAction::ALL`] order.
pub fn layout(viewport: Viewport) -> [(ViewAction, Rect); 3] {
    let y0 = viewport.height - MARGIN - BUTTON_SIZE;
    let total = 3.0 * BUTTON_SIZE + 2.0 * BUTTON_GAP;
    let x_start = viewport.width - MARGIN - total;
    let mut out = [(ViewAction::ZoomOut, Rect::ZERO); 3];
    for (i, action) in ViewAction::ALL.into_iter().enumerate() {
        let x0 = x_start + i as f64 * (BUTTON_SIZE + BUTTON_GAP);
        out[i] = (action, Rect::new(x0, y0, x0 + BUTTON_SIZE, y0 + BUTTON_SIZE));
    }
    out
}

/// Rectangle holding the "NN%" zoom readout.
pub fn zoom_label_rect(viewport: Viewport) -> Rect {
    let [(_, first), ..] = layout(viewport);
    Rect::new(first.x0 - BUTTON_GAP - ZOOM_LABEL_WIDTH, first.y0, first.x0 - BUTTON_GAP, first.y1)
}

/// The control under a screen point, if any.
pub fn control_at(viewport: Viewport, p: Point) -> Option<ViewAction> {
    if !viewport.is_measured() {
        return None;
    }
    layout(viewport)
        .into_iter()
        .find(|(_, rect)| rect.contains(p))
        .map(|(action, _)| action)
}
