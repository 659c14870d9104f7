//! Pointer interaction state machine.
//!
//! At most one session exists at a time: dragging a node or panning the
//! canvas. Every geometry read during a session derives from the values
//! frozen at pointer-down plus the live pointer position, so long drags
//! made of many small moves never accumulate drift.

use crate::input::PointerId;
use bp_core::geometry::snap_point;
use bp_core::{NodeId, Point, Vec2};

/// A node being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDrag {
    pub node_id: NodeId,
    pub pointer_id: PointerId,
    /// Screen position of the pointer at pointer-down.
    pub pointer_start: Point,
    /// World position of the node at pointer-down.
    pub node_start: Point,
    /// Last grid-snapped position shown to the user.
    pub position: Point,
    /// Set by the first move event; an unmoved release is a click.
    pub moved: bool,
}

/// The canvas being panned.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasPan {
    pub pointer_id: PointerId,
    pub pointer_start: Point,
    pub offset_start: Vec2,
    pub moved: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    DraggingNode(NodeDrag),
    PanningCanvas(CanvasPan),
}

/// What a pointer move changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// No session, or the event came from another pointer.
    Ignored,
    /// The dragged node's snapped position.
    Node { id: NodeId, position: Point },
    /// The new pan offset.
    Pan { offset: Vec2 },
}

/// How a session ended on pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    Ignored,
    NodeDragged { id: NodeId, position: Point },
    NodeClicked(NodeId),
    Panned,
    CanvasClicked,
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn dragged_node(&self) -> Option<NodeId> {
        match self {
            Self::DraggingNode(drag) => Some(drag.node_id),
            _ => None,
        }
    }

    pub fn pointer_id(&self) -> Option<PointerId> {
        match self {
            Self::Idle => None,
            Self::DraggingNode(drag) => Some(drag.pointer_id),
            Self::PanningCanvas(pan) => Some(pan.pointer_id),
        }
    }

    /// Whether the active session has seen at least one move.
    pub fn has_moved(&self) -> bool {
        match self {
            Self::Idle => false,
            Self::DraggingNode(drag) => drag.moved,
            Self::PanningCanvas(pan) => pan.moved,
        }
    }

    /// Start dragging `node_id`. Returns `false` if a session is already active.
    pub fn begin_node_drag(
        &mut self,
        node_id: NodeId,
        pointer_id: PointerId,
        pointer: Point,
        node_position: Point,
    ) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = Self::DraggingNode(NodeDrag {
            node_id,
            pointer_id,
            pointer_start: pointer,
            node_start: node_position,
            position: node_position,
            moved: false,
        });
        true
    }

    /// Start panning from `offset`. Returns `false` if a session is already active.
    pub fn begin_pan(&mut self, pointer_id: PointerId, pointer: Point, offset: Vec2) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = Self::PanningCanvas(CanvasPan {
            pointer_id,
            pointer_start: pointer,
            offset_start: offset,
            moved: false,
        });
        true
    }

    /// Advance the session for a pointer move at screen point `p`.
    pub fn pointer_move(&mut self, pointer_id: PointerId, p: Point, scale: f64, grid_unit: f64) -> Motion {
        match self {
            Self::DraggingNode(drag) if drag.pointer_id == pointer_id => {
                drag.moved = true;
                let delta = (p - drag.pointer_start) / scale;
                drag.position = snap_point(drag.node_start + delta, grid_unit);
                Motion::Node {
                    id: drag.node_id,
                    position: drag.position,
                }
            }
            Self::PanningCanvas(pan) if pan.pointer_id == pointer_id => {
                pan.moved = true;
                Motion::Pan {
                    offset: pan.offset_start + (p - pan.pointer_start) / scale,
                }
            }
            _ => Motion::Ignored,
        }
    }

    /// End the session on pointer-up, classifying it as drag, pan or click.
    pub fn release(&mut self, pointer_id: PointerId) -> Release {
        if self.pointer_id() != Some(pointer_id) {
            return Release::Ignored;
        }
        match std::mem::take(self) {
            Self::DraggingNode(drag) if drag.moved => Release::NodeDragged {
                id: drag.node_id,
                position: drag.position,
            },
            Self::DraggingNode(drag) => Release::NodeClicked(drag.node_id),
            Self::PanningCanvas(pan) if pan.moved => Release::Panned,
            Self::PanningCanvas(_) => Release::CanvasClicked,
            Self::Idle => Release::Ignored,
        }
    }

    /// End the session without classifying it, returning what was active.
    pub fn cancel(&mut self) -> Interaction {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node() -> NodeId {
        NodeId::intern("n")
    }

    #[test]
    fn drag_snaps_from_frozen_start() {
        let mut state = Interaction::Idle;
        assert!(state.begin_node_drag(node(), 1, Point::new(300.0, 300.0), Point::new(100.0, 100.0)));
        // Many small moves end exactly where one large move would.
        for step in 1..=37 {
            state.pointer_move(1, Point::new(300.0 + step as f64, 300.0 - step as f64 * 53.0 / 37.0), 1.0, 20.0);
        }
        let motion = state.pointer_move(1, Point::new(337.0, 247.0), 1.0, 20.0);
        assert_eq!(
            motion,
            Motion::Node {
                id: node(),
                position: Point::new(140.0, 40.0)
            }
        );
        assert_eq!(
            state.release(1),
            Release::NodeDragged {
                id: node(),
                position: Point::new(140.0, 40.0)
            }
        );
        assert!(state.is_idle());
    }

    #[test]
    fn drag_delta_divides_by_scale() {
        let mut state = Interaction::Idle;
        state.begin_node_drag(node(), 1, Point::ZERO, Point::new(0.0, 0.0));
        let motion = state.pointer_move(1, Point::new(80.0, 40.0), 2.0, 20.0);
        assert_eq!(
            motion,
            Motion::Node {
                id: node(),
                position: Point::new(40.0, 20.0)
            }
        );
    }

    #[test]
    fn sessions_are_mutually_exclusive() {
        let mut state = Interaction::Idle;
        assert!(state.begin_pan(1, Point::ZERO, Vec2::ZERO));
        assert!(!state.begin_node_drag(node(), 2, Point::ZERO, Point::ZERO));
        assert!(!state.begin_pan(2, Point::ZERO, Vec2::ZERO));
        assert!(matches!(state, Interaction::PanningCanvas(_)));
    }

    #[test]
    fn unmoved_release_is_a_click() {
        let mut state = Interaction::Idle;
        state.begin_node_drag(node(), 1, Point::ZERO, Point::ZERO);
        assert!(!state.has_moved());
        assert_eq!(state.release(1), Release::NodeClicked(node()));

        state.begin_pan(1, Point::ZERO, Vec2::ZERO);
        assert_eq!(state.release(1), Release::CanvasClicked);
    }

    #[test]
    fn pan_moves_offset_from_start() {
        let mut state = Interaction::Idle;
        state.begin_pan(1, Point::new(10.0, 10.0), Vec2::new(5.0, 5.0));
        let motion = state.pointer_move(1, Point::new(30.0, 0.0), 0.5, 20.0);
        assert_eq!(
            motion,
            Motion::Pan {
                offset: Vec2::new(45.0, -15.0)
            }
        );
        assert!(state.has_moved());
        assert_eq!(state.release(1), Release::Panned);
    }

    #[test]
    fn other_pointers_are_ignored() {
        let mut state = Interaction::Idle;
        state.begin_node_drag(node(), 1, Point::ZERO, Point::ZERO);
        assert_eq!(state.pointer_move(2, Point::new(50.0, 50.0), 1.0, 20.0), Motion::Ignored);
        assert_eq!(state.release(2), Release::Ignored);
        assert_eq!(state.dragged_node(), Some(node()));
    }

    #[test]
    fn cancel_returns_the_session() {
        let mut state = Interaction::Idle;
        state.begin_pan(4, Point::ZERO, Vec2::ZERO);
        assert!(matches!(state.cancel(), Interaction::PanningCanvas(_)));
        assert!(state.is_idle());
        assert_eq!(state.cancel(), Interaction::Idle);
    }
}
