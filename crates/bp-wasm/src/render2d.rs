//! Canvas2D backend.
//!
//! Replays a composed [`Frame`] onto an HTML `<canvas>` via
//! `CanvasRenderingContext2d`. Graph content is drawn in world space under
//! the view transform; controls and the zoom readout in screen space.

use bp_core::{Point, Rect, ViewTransform};
use bp_render::compose::{Connector, Emphasis, Frame, NodeCard, TextAlign, TextRun};
use bp_render::CanvasTheme;
use web_sys::CanvasRenderingContext2d;

/// Grid dots closer than this on screen are skipped.
const MIN_GRID_SPACING: f64 = 8.0;

/// Draw one frame, clearing the whole canvas first.
pub fn render_frame(ctx: &CanvasRenderingContext2d, frame: &Frame, theme: &CanvasTheme, grid_unit: f64) {
    let (w, h) = (frame.viewport.width, frame.viewport.height);

    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, w, h);

    if let Some(placeholder) = &frame.placeholder {
        draw_text(ctx, &placeholder.message, theme.placeholder_text, theme.font_family);
    } else {
        draw_grid(ctx, w, h, &frame.transform, grid_unit, theme);

        ctx.save();
        let t = frame.transform;
        let _ = ctx.scale(t.scale, t.scale);
        let _ = ctx.translate(t.offset.x, t.offset.y);
        for connector in &frame.connectors {
            draw_connector(ctx, connector, theme);
        }
        for card in &frame.cards {
            draw_card(ctx, card, theme);
        }
        ctx.restore();
    }

    for button in &frame.controls {
        ctx.save();
        rounded_rect_path(ctx, button.rect, 8.0);
        ctx.set_fill_style_str(theme.control_bg);
        ctx.fill();
        ctx.set_stroke_style_str(theme.control_border);
        ctx.set_line_width(1.0);
        ctx.stroke();
        ctx.restore();

        let c = button.rect.center();
        let glyph = TextRun::new(button.glyph, Point::new(c.x, c.y + 5.0), 16.0).align(TextAlign::Middle);
        draw_text(ctx, &glyph, theme.control_glyph, theme.font_family);
    }
    if !frame.controls.is_empty() {
        let color = if frame.zoom_label.muted { theme.muted_text } else { theme.text };
        draw_text(ctx, &frame.zoom_label, color, theme.font_family);
    }
}

fn draw_grid(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    transform: &ViewTransform,
    unit: f64,
    theme: &CanvasTheme,
) {
    let spacing = unit * transform.scale;
    if spacing < MIN_GRID_SPACING {
        return;
    }
    // Dots sit on world-space grid lines, so they pan with the graph.
    let start_x = (transform.offset.x * transform.scale).rem_euclid(spacing);
    let start_y = (transform.offset.y * transform.scale).rem_euclid(spacing);

    ctx.set_fill_style_str(theme.grid);
    let mut x = start_x;
    while x < width {
        let mut y = start_y;
        while y < height {
            ctx.fill_rect(x, y, 1.0, 1.0);
            y += spacing;
        }
        x += spacing;
    }
}

fn draw_connector(ctx: &CanvasRenderingContext2d, c: &Connector, theme: &CanvasTheme) {
    let color = if c.active { theme.connector_active } else { theme.connector };

    ctx.save();
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(if c.active { 2.5 } else { 2.0 });
    ctx.begin_path();
    ctx.move_to(c.from.x, c.from.y);
    ctx.line_to(c.to.x, c.to.y);
    ctx.stroke();

    let [tip, left, right] = c.arrow;
    ctx.set_fill_style_str(color);
    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(left.x, left.y);
    ctx.line_to(right.x, right.y);
    ctx.close_path();
    ctx.fill();
    ctx.restore();

    if let Some(label) = &c.label {
        draw_text(ctx, label, theme.muted_text, theme.font_family);
    }
}

fn draw_card(ctx: &CanvasRenderingContext2d, card: &NodeCard, theme: &CanvasTheme) {
    let (border, border_width) = match card.emphasis {
        Emphasis::Normal => (theme.card_border, 1.0),
        Emphasis::Selected => (theme.card_border_selected, 2.0),
        Emphasis::Dragging => (theme.card_border_dragging, 2.0),
    };

    // Body with shadow; a dragged card floats higher.
    ctx.save();
    ctx.set_shadow_color(theme.card_shadow);
    ctx.set_shadow_blur(if card.emphasis == Emphasis::Dragging { 24.0 } else { 8.0 });
    ctx.set_shadow_offset_y(if card.emphasis == Emphasis::Dragging { 8.0 } else { 2.0 });
    rounded_rect_path(ctx, card.rect, card.corner_radius);
    ctx.set_fill_style_str(theme.card_bg);
    ctx.fill();
    ctx.restore();

    ctx.save();
    rounded_rect_path(ctx, card.rect, card.corner_radius);
    ctx.set_stroke_style_str(border);
    ctx.set_line_width(border_width);
    ctx.stroke();

    let accent = theme.kind_accent(card.kind);
    let strip = Rect::new(
        card.header.x0 + card.corner_radius,
        card.header.y0,
        card.header.x1 - card.corner_radius,
        card.header.y0 + 3.0,
    );
    ctx.set_fill_style_str(accent);
    ctx.fill_rect(strip.x0, strip.y0, strip.width(), strip.height());
    ctx.restore();

    draw_text(ctx, &card.icon, accent, theme.font_family);
    draw_text(ctx, &card.label, theme.text, theme.font_family);
    draw_text(ctx, &card.completion_text, theme.muted_text, theme.font_family);

    ctx.save();
    rounded_rect_path(ctx, card.progress_track, 3.0);
    ctx.set_fill_style_str(theme.progress_track);
    ctx.fill();
    if card.progress_fill.width() > 0.0 {
        rounded_rect_path(ctx, card.progress_fill, 3.0);
        ctx.set_fill_style_str(theme.progress_done);
        ctx.fill();
    }
    ctx.restore();

    for line in card.subtasks.iter().chain(card.overflow.as_ref()) {
        let color = if line.muted { theme.muted_text } else { theme.text };
        draw_text(ctx, line, color, theme.font_family);
    }
}

fn draw_text(ctx: &CanvasRenderingContext2d, run: &TextRun, color: &str, family: &str) {
    ctx.save();
    ctx.set_font(&format!("{} {}px {family}", run.weight, run.size));
    ctx.set_fill_style_str(color);
    ctx.set_text_baseline("alphabetic");
    ctx.set_text_align(match run.align {
        TextAlign::Start => "start",
        TextAlign::Middle => "center",
        TextAlign::End => "end",
    });
    let _ = ctx.fill_text(&run.text, run.origin.x, run.origin.y);
    ctx.restore();
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, rect: Rect, r: f64) {
    let (x, y, w, h) = (rect.x0, rect.y0, rect.width(), rect.height());
    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}
