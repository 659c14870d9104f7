use bp_core::NodeKind;

/// Theme-dependent colors shared by every backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasTheme {
    pub bg: &'static str,
    pub grid: &'static str,
    pub card_bg: &'static str,
    pub card_border: &'static str,
    pub card_border_selected: &'static str,
    pub card_border_dragging: &'static str,
    pub card_shadow: &'static str,
    pub text: &'static str,
    pub muted_text: &'static str,
    pub progress_track: &'static str,
    pub progress_done: &'static str,
    pub connector: &'static str,
    pub connector_active: &'static str,
    pub control_bg: &'static str,
    pub control_border: &'static str,
    pub control_glyph: &'static str,
    pub placeholder_text: &'static str,
    pub font_family: &'static str,
}

impl CanvasTheme {
    /// Light theme, warm white canvas.
    pub fn light() -> Self {
        Self {
            bg: "#F5F5F7",
            grid: "rgba(0, 0, 0, 0.06)",
            card_bg: "#FFFFFF",
            card_border: "#D2D2D7",
            card_border_selected: "#0A84FF",
            card_border_dragging: "#4FC3F7",
            card_shadow: "rgba(0, 0, 0, 0.12)",
            text: "#1D1D1F",
            muted_text: "#6E6E73",
            progress_track: "#E5E5EA",
            progress_done: "#34C759",
            connector: "#8E8E93",
            connector_active: "#0A84FF",
            control_bg: "#FFFFFF",
            control_border: "#D2D2D7",
            control_glyph: "#1D1D1F",
            placeholder_text: "#86868B",
            font_family: "Inter, system-ui, sans-serif",
        }
    }

    /// Dark theme.
    pub fn dark() -> Self {
        Self {
            bg: "#1C1C1E",
            grid: "rgba(255, 255, 255, 0.05)",
            card_bg: "#2C2C2E",
            card_border: "#3A3A3C",
            card_border_selected: "#0A84FF",
            card_border_dragging: "#64D2FF",
            card_shadow: "rgba(0, 0, 0, 0.45)",
            text: "#F5F5F7",
            muted_text: "#98989D",
            progress_track: "#3A3A3C",
            progress_done: "#30D158",
            connector: "#636366",
            connector_active: "#64D2FF",
            control_bg: "#2C2C2E",
            control_border: "#3A3A3C",
            control_glyph: "#F5F5F7",
            placeholder_text: "#98989D",
            font_family: "Inter, system-ui, sans-serif",
        }
    }

    pub fn from_dark_flag(is_dark: bool) -> Self {
        if is_dark { Self::dark() } else { Self::light() }
    }

    /// Header accent for a node kind.
    pub fn kind_accent(&self, kind: NodeKind) -> &'static str {
        match kind {
            NodeKind::Entry => "#0A84FF",
            NodeKind::Action => "#FF9F0A",
            NodeKind::Service => "#5E5CE6",
            NodeKind::Database => "#30B0C7",
            NodeKind::External => "#BF5AF2",
            NodeKind::Main => "#FF375F",
            NodeKind::Other => self.muted_text,
        }
    }
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self::light()
    }
}
