//! Dataset + view state → draw list.
//!
//! `compose` is a pure projection: it never mutates the dataset and holds no
//! state between frames. Connectors and node cards are emitted in world
//! space (backends apply [`Frame::transform`]); the placeholder and view
//! controls are emitted in screen space.
//!
//! Paint order: connectors, then cards in dataset order, with the card under
//! an active drag moved last so it stacks above its neighbours.

use crate::controls::{self, ViewAction};
use bp_core::geometry::{ConnectorAnchors, Side, connector_anchors, node_rect};
use bp_core::{CanvasConfig, Dataset, Node, NodeId, NodeKind, Point, Rect, Vec2, ViewTransform, Viewport};
use serde::Serialize;
use smallvec::SmallVec;

// ─── Card layout (world units) ───────────────────────────────────────────

pub const CORNER_RADIUS: f64 = 12.0;
const PAD: f64 = 14.0;
const HEADER_HEIGHT: f64 = 48.0;
const HEADER_BASELINE: f64 = 29.0;
const ICON_ADVANCE: f64 = 24.0;
const PROGRESS_HEIGHT: f64 = 6.0;
const FIRST_SUBTASK_BASELINE: f64 = 74.0;
const SUBTASK_LINE_HEIGHT: f64 = 18.0;
const LABEL_MAX_CHARS: usize = 22;
const SUBTASK_MAX_CHARS: usize = 30;

const ARROW_LENGTH: f64 = 8.0;
const ARROW_HALF_WIDTH: f64 = 4.5;
const EDGE_LABEL_LIFT: f64 = 6.0;

// ─── Draw primitives ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Start,
    Middle,
    End,
}

/// A single line of text anchored at its baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    pub origin: Point,
    pub size: f64,
    pub weight: u16,
    pub align: TextAlign,
    pub muted: bool,
}

impl TextRun {
    pub fn new(text: impl Into<String>, origin: Point, size: f64) -> Self {
        Self {
            text: text.into(),
            origin,
            size,
            weight: 400,
            align: TextAlign::Start,
            muted: false,
        }
    }

    pub fn weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn muted(mut self) -> Self {
        self.muted = true;
        self
    }
}

/// A straight connector with an arrowhead at the destination anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub from_id: NodeId,
    pub to_id: NodeId,
    pub from: Point,
    pub to: Point,
    /// Arrowhead triangle: tip first.
    pub arrow: [Point; 3],
    pub label: Option<TextRun>,
    /// Touches the selected or dragged node.
    pub active: bool,
}

/// Cosmetic state of a card. Never affects geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Emphasis {
    Normal,
    Selected,
    Dragging,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCard {
    pub id: NodeId,
    pub kind: NodeKind,
    pub rect: Rect,
    pub corner_radius: f64,
    pub header: Rect,
    pub icon: TextRun,
    pub label: TextRun,
    pub completion: u8,
    pub completion_text: TextRun,
    pub progress_track: Rect,
    pub progress_fill: Rect,
    pub subtasks: SmallVec<[TextRun; 4]>,
    /// "+N more" line when subtasks were truncated.
    pub overflow: Option<TextRun>,
    pub z_index: u32,
    pub emphasis: Emphasis,
}

/// Shown instead of the graph when there are no nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    pub rect: Rect,
    pub message: TextRun,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlButton {
    pub action: ViewAction,
    pub rect: Rect,
    pub glyph: &'static str,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub viewport: Viewport,
    pub transform: ViewTransform,
    pub connectors: Vec<Connector>,
    pub cards: Vec<NodeCard>,
    pub placeholder: Option<Placeholder>,
    pub controls: Vec<ControlButton>,
    pub zoom_label: TextRun,
}

impl Frame {
    pub fn card(&self, id: NodeId) -> Option<&NodeCard> {
        self.cards.iter().find(|c| c.id == id)
    }
}

/// Inputs to [`compose`].
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub dataset: &'a Dataset,
    pub transform: ViewTransform,
    pub viewport: Viewport,
    pub selection: Option<NodeId>,
    /// Node under an active drag session, if any.
    pub dragging: Option<NodeId>,
}

// ─── Composition ─────────────────────────────────────────────────────────

/// Project the dataset and view state into a draw list.
pub fn compose(scene: &SceneInput<'_>, config: &CanvasConfig) -> Frame {
    let dataset = scene.dataset;
    let highlighted = |id: NodeId| scene.dragging == Some(id) || scene.selection == Some(id);

    let connectors: Vec<Connector> = dataset
        .resolved_edges()
        .map(|(edge, from, to)| {
            let anchors = connector_anchors(from, to, config.node_size);
            Connector {
                from_id: from.id,
                to_id: to.id,
                from: anchors.from,
                to: anchors.to,
                arrow: arrowhead(&anchors),
                label: edge.label.as_ref().map(|text| {
                    TextRun::new(text.clone(), anchors.midpoint() - Vec2::new(0.0, EDGE_LABEL_LIFT), 11.0)
                        .align(TextAlign::Middle)
                        .muted()
                }),
                active: highlighted(from.id) || highlighted(to.id),
            }
        })
        .collect();

    let skipped = dataset.edges.len() - connectors.len();
    if skipped > 0 {
        log::trace!("skipped {skipped} edge(s) with missing endpoints");
    }

    let mut cards: Vec<NodeCard> = dataset
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let emphasis = if scene.dragging == Some(node.id) {
                Emphasis::Dragging
            } else if scene.selection == Some(node.id) {
                Emphasis::Selected
            } else {
                Emphasis::Normal
            };
            node_card(node, i as u32, emphasis, config)
        })
        .collect();

    if let Some(dragged) = scene.dragging
        && let Some(pos) = cards.iter().position(|c| c.id == dragged)
    {
        let mut card = cards.remove(pos);
        card.z_index = cards.len() as u32 + 1;
        cards.push(card);
    }

    let placeholder = dataset.is_empty().then(|| {
        let rect = Rect::from_origin_size(Point::ZERO, scene.viewport.size());
        Placeholder {
            rect,
            message: TextRun::new("No graph to display", rect.center(), 14.0)
                .align(TextAlign::Middle)
                .muted(),
        }
    });

    let controls = if scene.viewport.is_measured() {
        controls::layout(scene.viewport)
            .into_iter()
            .map(|(action, rect)| ControlButton {
                action,
                rect,
                glyph: action.glyph(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let label_rect = controls::zoom_label_rect(scene.viewport);
    let zoom_label = TextRun::new(
        format!("{}%", (scene.transform.scale * 100.0).round()),
        Point::new(label_rect.x1, label_rect.center().y + 4.0),
        12.0,
    )
    .align(TextAlign::End)
    .muted();

    log::trace!(
        "composed frame: {} cards, {} connectors, scale {:.2}",
        cards.len(),
        connectors.len(),
        scene.transform.scale
    );

    Frame {
        viewport: scene.viewport,
        transform: scene.transform,
        connectors,
        cards,
        placeholder,
        controls,
        zoom_label,
    }
}

fn node_card(node: &Node, z_index: u32, emphasis: Emphasis, config: &CanvasConfig) -> NodeCard {
    let rect = node_rect(node, config.node_size);
    let (x, y) = (rect.x0, rect.y0);
    let header = Rect::new(x, y, rect.x1, y + HEADER_HEIGHT);

    let track = Rect::new(
        x + PAD,
        y + HEADER_HEIGHT,
        rect.x1 - PAD,
        y + HEADER_HEIGHT + PROGRESS_HEIGHT,
    );
    let done = f64::from(node.completion.min(100)) / 100.0;
    let fill = Rect::new(track.x0, track.y0, track.x0 + track.width() * done, track.y1);

    let visible = config.max_visible_subtasks.min(node.subtasks.len());
    let subtasks: SmallVec<[TextRun; 4]> = node
        .subtasks
        .iter()
        .take(visible)
        .enumerate()
        .map(|(i, text)| {
            let baseline = y + FIRST_SUBTASK_BASELINE + i as f64 * SUBTASK_LINE_HEIGHT;
            TextRun::new(
                format!("• {}", truncate(text, SUBTASK_MAX_CHARS)),
                Point::new(x + PAD, baseline),
                12.0,
            )
        })
        .collect();

    let hidden = node.subtasks.len() - visible;
    let overflow = (hidden > 0).then(|| {
        let baseline = y + FIRST_SUBTASK_BASELINE + visible as f64 * SUBTASK_LINE_HEIGHT;
        TextRun::new(format!("+{hidden} more"), Point::new(x + PAD, baseline), 11.0).muted()
    });

    NodeCard {
        id: node.id,
        kind: node.kind,
        rect,
        corner_radius: CORNER_RADIUS,
        header,
        icon: TextRun::new(kind_icon(node.kind), Point::new(x + PAD, y + HEADER_BASELINE), 15.0),
        label: TextRun::new(
            truncate(&node.label, LABEL_MAX_CHARS),
            Point::new(x + PAD + ICON_ADVANCE, y + HEADER_BASELINE),
            14.0,
        )
        .weight(600),
        completion: node.completion,
        completion_text: TextRun::new(
            format!("{}%", node.completion),
            Point::new(rect.x1 - PAD, y + HEADER_BASELINE),
            11.0,
        )
        .align(TextAlign::End)
        .muted(),
        progress_track: track,
        progress_fill: fill,
        subtasks,
        overflow,
        z_index,
        emphasis,
    }
}

/// Header glyph for a node kind.
pub fn kind_icon(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Entry => "⇥",
        NodeKind::Action => "⚡",
        NodeKind::Service => "⚙",
        NodeKind::Database => "⛁",
        NodeKind::External => "☁",
        NodeKind::Main => "★",
        NodeKind::Other => "●",
    }
}

fn arrowhead(anchors: &ConnectorAnchors) -> [Point; 3] {
    // Direction of travel as the connector enters the destination side.
    let dir = match anchors.to_side {
        Side::Left => Vec2::new(1.0, 0.0),
        Side::Right => Vec2::new(-1.0, 0.0),
        Side::Top => Vec2::new(0.0, 1.0),
        Side::Bottom => Vec2::new(0.0, -1.0),
    };
    let tip = anchors.to;
    let base = tip - dir * ARROW_LENGTH;
    let perp = Vec2::new(-dir.y, dir.x) * ARROW_HALF_WIDTH;
    [tip, base + perp, base - perp]
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_core::Edge;
    use pretty_assertions::assert_eq;

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

    fn scene(dataset: &Dataset) -> SceneInput<'_> {
        SceneInput {
            dataset,
            transform: ViewTransform::default(),
            viewport: VIEWPORT,
            selection: None,
            dragging: None,
        }
    }

    #[test]
    fn dangling_edge_renders_no_connector() {
        let ds = Dataset::new(
            vec![Node::new("Aензь", "A", NodeKind::Main)],
            vec![Edge::new("Aензь", "missing")],
        );
        let frame = compose(&scene(&ds), &CanvasConfig::default());
        assert!(frame.connectors.is_empty());
        assert_eq!(frame.cards.len(), 1);
    }

    #[test]
    fn subtasks_truncate_with_overflow_counter() {
        let node = Node::new("n", "N", NodeKind::Service)
            .with_subtasks(["one", "two", "three", "four", "five", "six"]);
        let ds = Dataset::new(vec![node], vec![]);
        let frame = compose(&scene(&ds), &CanvasConfig::default());
        let card = &frame.cards[0];
        assert_eq!(card.subtasks.len(), 4);
        assert_eq!(card.subtasks[3].text, "• four");
        assert_eq!(card.overflow.as_ref().map(|t| t.text.as_str()), Some("+2 more"));
    }

    #[test]
    fn exactly_four_subtasks_have_no_overflow() {
        let node = Node::new("n", "N", NodeKind::Service).with_subtasks(["a", "b", "c", "d"]);
        let ds = Dataset::new(vec![node], vec![]);
        let frame = compose(&scene(&ds), &CanvasConfig::default());
        assert_eq!(frame.cards[0].overflow, None);
    }

    #[test]
    fn progress_fill_tracks_completion() {
        let node = Node::new("n", "N", NodeKind::Action).with_completion(25);
        let ds = Dataset::new(vec![node], vec![]);
        let frame = compose(&scene(&ds), &CanvasConfig::default());
        let card = &frame.cards[0];
        let ratio = card.progress_fill.width() / card.progress_track.width();
        assert!((ratio - 0.25).abs() < 1e-9);
        assert_eq!(card.completion_text.text, "25%");
    }

    #[test]
    fn dragged_card_is_painted_last_without_moving() {
        let ds = Dataset::new(
            vec![
                Node::new("a", "A", NodeKind::Main).at(0.0, 0.0),
                Node::new("b", "B", NodeKind::Main).at(300.0, 0.0),
            ],
            vec![Edge::new("a", "b")],
        );
        let mut input = scene(&ds);
        let plain = compose(&input, &CanvasConfig::default());
        input.dragging = Some(NodeId::intern("a"));
        let dragging = compose(&input, &CanvasConfig::default());

        let last = dragging.cards.last().unwrap();
        assert_eq!(last.id, NodeId::intern("a"));
        assert_eq!(last.emphasis, Emphasis::Dragging);
        assert!(last.z_index > dragging.cards[0].z_index);
        assert_eq!(last.rect, plain.card(NodeId::intern("a")).unwrap().rect);
        assert_eq!(dragging.connectors[0].from, plain.connectors[0].from);
        assert!(dragging.connectors[0].active);
    }

    #[test]
    fn empty_dataset_shows_placeholder() {
        let ds = Dataset::default();
        let frame = compose(&scene(&ds), &CanvasConfig::default());
        let placeholder = frame.placeholder.unwrap();
        assert_eq!(placeholder.message.origin, Point::new(400.0, 300.0));
        assert_eq!(frame.controls.len(), 3);
    }

    #[test]
    fn arrowhead_points_into_destination() {
        let ds = Dataset::new(
            vec![
                Node::new("a", "A", NodeKind::Main).at(0.0, 0.0),
                Node::new("b", "B", NodeKind::Main).at(500.0, 0.0),
            ],
            vec![Edge::new("a", "b").labeled("calls")],
        );
        let frame = compose(&scene(&ds), &CanvasConfig::default());
        let c = &frame.connectors[0];
        assert_eq!(c.arrow[0], Point::new(500.0, 80.0));
        assert_eq!(c.arrow[1], Point::new(492.0, 84.5));
        assert_eq!(c.arrow[2], Point::new(492.0, 75.5));
        assert_eq!(c.label.as_ref().unwrap().origin, Point::new(370.0, 74.0));
    }

    #[test]
    fn zoom_label_shows_percentage() {
        let ds = Dataset::default();
        let mut input = scene(&ds);
        input.transform.scale = 1.25;
        assert_eq!(compose(&input, &CanvasConfig::default()).zoom_label.text, "125%");
    }

    #[test]
    fn long_labels_are_truncated() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 5), "exac…");
    }
}
