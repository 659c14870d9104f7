//! Draw list → standalone SVG document.

use crate::compose::{Connector, Emphasis, Frame, NodeCard, TextAlign, TextRun};
use crate::theme::CanvasTheme;
use bp_core::{Point, Rect};

/// Serialize a composed frame as SVG, sized to the frame's viewport.
pub fn render_svg(frame: &Frame, theme: &CanvasTheme) -> String {
    let (w, h) = (frame.viewport.width, frame.viewport.height);
    let t = frame.transform;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"{}\">\n",
        theme.font_family
    ));
    svg.push_str(&format!(
        "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        theme.bg
    ));

    if let Some(placeholder) = &frame.placeholder {
        push_text(&mut svg, &placeholder.message, theme, "  ");
    } else {
        // scale(s) translate(o) == (world + offset) * scale
        svg.push_str(&format!(
            "  <g transform=\"scale({}) translate({} {})\">\n",
            t.scale, t.offset.x, t.offset.y
        ));
        for connector in &frame.connectors {
            push_connector(&mut svg, connector, theme);
        }
        for card in &frame.cards {
            push_card(&mut svg, card, theme);
        }
        svg.push_str("  </g>\n");
    }

    for button in &frame.controls {
        svg.push_str(&format!(
            "  <g data-action=\"{}\">\n",
            button.action.name()
        ));
        push_rect(&mut svg, button.rect, 8.0, theme.control_bg, Some((theme.control_border, 1.0)), "    ");
        let c = button.rect.center();
        let glyph = TextRun::new(button.glyph, Point::new(c.x, c.y + 5.0), 16.0)
            .weight(500)
            .align(TextAlign::Middle);
        push_text_colored(&mut svg, &glyph, theme.control_glyph, "    ");
        svg.push_str("  </g>\n");
    }
    if !frame.controls.is_empty() {
        push_text(&mut svg, &frame.zoom_label, theme, "  ");
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_connector(svg: &mut String, c: &Connector, theme: &CanvasTheme) {
    let color = if c.active {
        theme.connector_active
    } else {
        theme.connector
    };
    svg.push_str(&format!(
        "    <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{color}\" stroke-width=\"2\"/>\n",
        c.from.x, c.from.y, c.to.x, c.to.y
    ));
    let [a, b, d] = c.arrow;
    svg.push_str(&format!(
        "    <polygon points=\"{},{} {},{} {},{}\" fill=\"{color}\"/>\n",
        a.x, a.y, b.x, b.y, d.x, d.y
    ));
    if let Some(label) = &c.label {
        push_text(svg, label, theme, "    ");
    }
}

fn push_card(svg: &mut String, card: &NodeCard, theme: &CanvasTheme) {
    let (border, width) = match card.emphasis {
        Emphasis::Normal => (theme.card_border, 1.0),
        Emphasis::Selected => (theme.card_border_selected, 2.0),
        Emphasis::Dragging => (theme.card_border_dragging, 2.0),
    };
    svg.push_str(&format!(
        "    <g data-node-id=\"{}\" data-kind=\"{}\">\n",
        escape_xml(card.id.as_str()),
        card.kind.as_str()
    ));
    push_rect(svg, card.rect, card.corner_radius, theme.card_bg, Some((border, width)), "      ");
    // Accent strip along the header's top edge.
    let strip = Rect::new(card.header.x0 + card.corner_radius, card.header.y0, card.header.x1 - card.corner_radius, card.header.y0 + 3.0);
    push_rect(svg, strip, 0.0, theme.kind_accent(card.kind), None, "      ");
    push_text_colored(svg, &card.icon, theme.kind_accent(card.kind), "      ");
    push_text(svg, &card.label, theme, "      ");
    push_text(svg, &card.completion_text, theme, "      ");
    push_rect(svg, card.progress_track, 3.0, theme.progress_track, None, "      ");
    if card.progress_fill.width() > 0.0 {
        push_rect(svg, card.progress_fill, 3.0, theme.progress_done, None, "      ");
    }
    for line in &card.subtasks {
        push_text(svg, line, theme, "      ");
    }
    if let Some(more) = &card.overflow {
        push_text(svg, more, theme, "      ");
    }
    svg.push_str("    </g>\n");
}

fn push_rect(svg: &mut String, r: Rect, radius: f64, fill: &str, stroke: Option<(&str, f64)>, indent: &str) {
    svg.push_str(&format!(
        "{indent}<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{radius}\" fill=\"{fill}\"",
        r.x0,
        r.y0,
        r.width(),
        r.height()
    ));
    if let Some((color, width)) = stroke {
        svg.push_str(&format!(" stroke=\"{color}\" stroke-width=\"{width}\""));
    }
    svg.push_str("/>\n");
}

fn push_text(svg: &mut String, run: &TextRun, theme: &CanvasTheme, indent: &str) {
    let color = if run.muted { theme.muted_text } else { theme.text };
    push_text_colored(svg, run, color, indent);
}

fn push_text_colored(svg: &mut String, run: &TextRun, color: &str, indent: &str) {
    let anchor = match run.align {
        TextAlign::Start => "start",
        TextAlign::Middle => "middle",
        TextAlign::End => "end",
    };
    svg.push_str(&format!(
        "{indent}<text x=\"{}\" y=\"{}\" font-size=\"{}\" font-weight=\"{}\" text-anchor=\"{anchor}\" fill=\"{color}\">{}</text>\n",
        run.origin.x,
        run.origin.y,
        run.size,
        run.weight,
        escape_xml(&run.text)
    ));
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{SceneInput, compose};
    use bp_core::{CanvasConfig, Dataset, Edge, Node, NodeKind, Vec2, ViewTransform, Viewport};

    fn frame(dataset: &Dataset) -> Frame {
        compose(
            &SceneInput {
                dataset,
                transform: ViewTransform::new(0.5, Vec2::new(10.0, 20.0)),
                viewport: Viewport::new(800.0, 600.0),
                selection: None,
                dragging: None,
            },
            &CanvasConfig::default(),
        )
    }

    #[test]
    fn svg_contains_nodes_connectors_and_controls() {
        let ds = Dataset::new(
            vec![
                Node::new("web", "Web <App>", NodeKind::Entry).at(0.0, 0.0),
                Node::new("api", "API", NodeKind::Service).at(400.0, 0.0),
            ],
            vec![Edge::new("web", "api").labeled("REST & gRPC")],
        );
        let svg = render_svg(&frame(&ds), &CanvasTheme::light());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("transform=\"scale(0.5) translate(10 20)\""));
        assert!(svg.contains("data-node-id=\"web\""));
        assert!(svg.contains("Web &lt;App&gt;"));
        assert!(svg.contains("REST &amp; gRPC"));
        assert_eq!(svg.matches("<line ").count(), 1);
        assert!(svg.contains("data-action=\"fitToView\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn empty_frame_renders_placeholder_only() {
        let svg = render_svg(&frame(&Dataset::default()), &CanvasTheme::dark());
        assert!(svg.contains("No graph to display"));
        assert!(!svg.contains("<g transform"));
    }
}
