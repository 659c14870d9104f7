//! Pure 2D geometry for the blueprint canvas.
//!
//! World space is where node positions live; screen space is pixels in the
//! visible viewport. The two are related by `screen = (world + offset) * scale`.

use crate::model::Node;
use crate::transform::ViewTransform;
use kurbo::{Point, Rect, Size};

/// Default node footprint in world units.
pub const DEFAULT_NODE_SIZE: Size = Size::new(240.0, 160.0);

/// Default grid-snap quantum in world units.
pub const DEFAULT_GRID_UNIT: f64 = 20.0;

// ─── Coordinate spaces ───────────────────────────────────────────────────

/// Map a world point to screen space.
pub fn to_screen(world: Point, transform: &ViewTransform) -> Point {
    ((world.to_vec2() + transform.offset) * transform.scale).to_point()
}

/// Map a screen point back to world space. Exact inverse of [`to_screen`].
pub fn to_world(screen: Point, transform: &ViewTransform) -> Point {
    (screen.to_vec2() / transform.scale - transform.offset).to_point()
}

// ─── Rectangles ──────────────────────────────────────────────────────────

/// The world-space rectangle a node occupies.
pub fn node_rect(node: &Node, node_size: Size) -> Rect {
    Rect::from_origin_size(node.position, node_size)
}

/// Union of all node rectangles, or `None` for an empty node set.
pub fn bounding_box(nodes: &[Node], node_size: Size) -> Option<Rect> {
    nodes
        .iter()
        .map(|n| node_rect(n, node_size))
        .reduce(|acc, r| acc.union(r))
}

/// Euclidean distance from a point to a rectangle (0 when inside).
pub fn rect_distance(rect: Rect, p: Point) -> f64 {
    let dx = (rect.x0 - p.x).max(0.0).max(p.x - rect.x1);
    let dy = (rect.y0 - p.y).max(0.0).max(p.y - rect.y1);
    dx.hypot(dy)
}

// ─── Grid snap ───────────────────────────────────────────────────────────

/// Quantize a coordinate to the nearest multiple of `unit`.
///
/// Halfway values round away from zero. A non-positive unit disables snapping.
pub fn snap_to_grid(value: f64, unit: f64) -> f64 {
    if unit <= 0.0 {
        return value;
    }
    (value / unit).round() * unit
}

/// Snap both axes independently.
pub fn snap_point(p: Point, unit: f64) -> Point {
    Point::new(snap_to_grid(p.x, unit), snap_to_grid(p.y, unit))
}

// ─── Connector anchors ───────────────────────────────────────────────────

/// A side of a node rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Midpoint of this side of `rect`.
    pub fn anchor_on(self, rect: Rect) -> Point {
        let c = rect.center();
        match self {
            Self::Left => Point::new(rect.x0, c.y),
            Self::Right => Point::new(rect.x1, c.y),
            Self::Top => Point::new(c.x, rect.y0),
            Self::Bottom => Point::new(c.x, rect.y1),
        }
    }
}

/// Where a connector leaves its source and enters its destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorAnchors {
    pub from: Point,
    pub to: Point,
    pub from_side: Side,
    pub to_side: Side,
}

impl ConnectorAnchors {
    pub fn midpoint(&self) -> Point {
        self.from.midpoint(self.to)
    }
}

/// Pick the facing sides of two node rectangles.
///
/// When the horizontal distance between centers exceeds the vertical one,
/// the connector runs between the left/right edges at mid-height; otherwise
/// between the top/bottom edges at mid-width. No routing around other nodes.
pub fn connector_anchors(from: &Node, to: &Node, node_size: Size) -> ConnectorAnchors {
    let a = node_rect(from, node_size);
    let b = node_rect(to, node_size);
    let d = b.center() - a.center();

    let (from_side, to_side) = if d.x.abs() > d.y.abs() {
        if d.x >= 0.0 {
            (Side::Right, Side::Left)
        } else {
            (Side::Left, Side::Right)
        }
    } else if d.y >= 0.0 {
        (Side::Bottom, Side::Top)
    } else {
        (Side::Top, Side::Bottom)
    };

    ConnectorAnchors {
        from: from_side.anchor_on(a),
        to: to_side.anchor_on(b),
        from_side,
        to_side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use kurbo::Vec2;

    fn node(id: &str, x: f64, y: f64) -> Node {
        Node::new(id, id, NodeKind::Service).at(x, y)
    }

    #[test]
    fn screen_world_roundtrip() {
        let transforms = [
            ViewTransform::new(1.0, Vec2::ZERO),
            ViewTransform::new(0.2, Vec2::new(-1234.5, 98.25)),
            ViewTransform::new(2.75, Vec2::new(17.0, -3.3)),
            ViewTransform::new(0.37, Vec2::new(1e4, -1e4)),
        ];
        let points = [
            Point::ZERO,
            Point::new(137.0, 47.0),
            Point::new(-5000.125, 333.3),
            Point::new(1e5, -2e5),
        ];
        for t in &transforms {
            for &p in &points {
                let back = to_world(to_screen(p, t), t);
                assert!((back - p).hypot() < 1e-6, "{p:?} via {t:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn to_screen_applies_offset_then_scale() {
        let t = ViewTransform::new(2.0, Vec2::new(10.0, -20.0));
        assert_eq!(to_screen(Point::new(5.0, 30.0), &t), Point::new(30.0, 20.0));
    }

    #[test]
    fn bounding_box_unions_node_rects() {
        let nodes = [node("a", 0.0, 0.0), node("b", 400.0, -100.0)];
        let bb = bounding_box(&nodes, DEFAULT_NODE_SIZE).unwrap();
        assert_eq!(bb, Rect::new(0.0, -100.0, 640.0, 160.0));
    }

    #[test]
    fn bounding_box_of_nothing_is_none() {
        assert_eq!(bounding_box(&[], DEFAULT_NODE_SIZE), None);
    }

    #[test]
    fn snap_is_idempotent() {
        for v in [-53.0, -10.0, 0.0, 9.99, 10.0, 137.0, 47.0, 1234.5] {
            let once = snap_to_grid(v, DEFAULT_GRID_UNIT);
            assert_eq!(snap_to_grid(once, DEFAULT_GRID_UNIT), once);
        }
        assert_eq!(snap_point(Point::new(137.0, 47.0), 20.0), Point::new(140.0, 40.0));
    }

    #[test]
    fn anchors_use_left_right_for_horizontal_displacement() {
        let a = node("a", 0.0, 0.0);
        let b = node("b", 500.0, 100.0);
        let anchors = connector_anchors(&a, &b, DEFAULT_NODE_SIZE);
        assert_eq!(anchors.from_side, Side::Right);
        assert_eq!(anchors.to_side, Side::Left);
        assert_eq!(anchors.from, Point::new(240.0, 80.0));
        assert_eq!(anchors.to, Point::new(500.0, 180.0));

        let back = connector_anchors(&b, &a, DEFAULT_NODE_SIZE);
        assert_eq!(back.from_side, Side::Left);
        assert_eq!(back.to_side, Side::Right);
    }

    #[test]
    fn anchors_use_top_bottom_for_vertical_displacement() {
        let a = node("a", 0.0, 0.0);
        let b = node("b", 50.0, 400.0);
        let anchors = connector_anchors(&a, &b, DEFAULT_NODE_SIZE);
        assert_eq!(anchors.from, Point::new(120.0, 160.0));
        assert_eq!(anchors.to, Point::new(170.0, 400.0));

        let up = connector_anchors(&b, &a, DEFAULT_NODE_SIZE);
        assert_eq!((up.from_side, up.to_side), (Side::Top, Side::Bottom));
    }

    #[test]
    fn rect_distance_is_zero_inside() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect_distance(r, Point::new(5.0, 5.0)), 0.0);
        assert_eq!(rect_distance(r, Point::new(13.0, 14.0)), 5.0);
    }
}
