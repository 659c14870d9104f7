//! Integration tests: fixture dataset → composed frame → hit registry / SVG.

use bp_core::geometry::DEFAULT_NODE_SIZE;
use bp_core::{CanvasConfig, Dataset, NodeId, Point, ViewTransform, Viewport};
use bp_render::compose::Emphasis;
use bp_render::svg::render_svg;
use bp_render::{CanvasTheme, HitRegistry, SceneInput, compose};
use pretty_assertions::assert_eq;

const VIEWPORT: Viewport = Viewport::new(1024.0, 768.0);

fn fixture() -> Dataset {
    Dataset::from_json(include_str!("fixtures/blueprint.json"), DEFAULT_NODE_SIZE).unwrap()
}

#[test]
fn fixture_frame_skips_the_dangling_edge() {
    let ds = fixture();
    let frame = compose(
        &SceneInput {
            dataset: &ds,
            transform: ViewTransform::default(),
            viewport: VIEWPORT,
            selection: Some(NodeId::intern("checkout")),
            dragging: None,
        },
        &CanvasConfig::default(),
    );
    assert_eq!(frame.connectors.len(), 4);
    assert_eq!(frame.cards.len(), 5);
    assert!(frame.placeholder.is_none());

    let checkout = frame.card(NodeId::intern("checkout")).unwrap();
    assert_eq!(checkout.emphasis, Emphasis::Selected);
    // checkout touches three connectors.
    assert_eq!(frame.connectors.iter().filter(|c| c.active).count(), 3);

    let landing = frame.card(NodeId::intern("landing")).unwrap();
    assert_eq!(landing.subtasks.len(), 4);
    assert_eq!(landing.overflow.as_ref().unwrap().text, "+2 more");
}

#[test]
fn registry_agrees_with_composed_cards() {
    let ds = fixture();
    let mut registry = HitRegistry::new();
    registry.rebuild(&ds, DEFAULT_NODE_SIZE);
    let frame = compose(
        &SceneInput {
            dataset: &ds,
            transform: ViewTransform::default(),
            viewport: VIEWPORT,
            selection: None,
            dragging: None,
        },
        &CanvasConfig::default(),
    );
    for card in &frame.cards {
        assert_eq!(registry.rect_of(card.id), Some(card.rect));
        assert_eq!(registry.hit_test(card.rect.center()), Some(card.id));
    }
    assert_eq!(registry.hit_test(Point::new(50.0, 50.0)), None);
}

#[test]
fn fixture_svg_has_one_group_per_node() {
    let ds = fixture();
    let frame = compose(
        &SceneInput {
            dataset: &ds,
            transform: ViewTransform::default(),
            viewport: VIEWPORT,
            selection: None,
            dragging: None,
        },
        &CanvasConfig::default(),
    );
    let svg = render_svg(&frame, &CanvasTheme::light());
    assert_eq!(svg.matches("data-node-id=").count(), 5);
    assert_eq!(svg.matches("<polygon ").count(), 4);
}
