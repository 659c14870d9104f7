//! Host bridge: everything the canvas tells the embedding application.

use crate::input::PointerId;
use bp_core::{Node, NodeId};

/// Callbacks into the embedding application.
///
/// Pointer capture has no-op defaults for hosts (tests, native shells)
/// that deliver every pointer event regardless.
pub trait HostBridge {
    /// A drag finished. `nodes` is the full working array, not a diff.
    fn positions_committed(&mut self, nodes: &[Node]);

    /// A node was clicked without being dragged.
    fn node_selected(&mut self, node: &Node);

    /// Empty canvas was clicked without being panned.
    fn canvas_selected(&mut self);

    fn capture_pointer(&mut self, _pointer_id: PointerId) {}

    fn release_pointer(&mut self, _pointer_id: PointerId) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    PositionsCommitted(Vec<Node>),
    NodeSelected(NodeId),
    CanvasSelected,
    Captured(PointerId),
    Released(PointerId),
}

/// Host that records every callback, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
}

impl RecordingHost {
    /// Every committed node array, oldest first.
    pub fn commits(&self) -> Vec<&[Node]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::PositionsCommitted(nodes) => Some(nodes.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Selection events only, with capture bookkeeping filtered out.
    pub fn selections(&self) -> Vec<&HostEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, HostEvent::NodeSelected(_) | HostEvent::CanvasSelected))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl HostBridge for RecordingHost {
    fn positions_committed(&mut self, nodes: &[Node]) {
        self.events.push(HostEvent::PositionsCommitted(nodes.to_vec()));
    }

    fn node_selected(&mut self, node: &Node) {
        self.events.push(HostEvent::NodeSelected(node.id));
    }

    fn canvas_selected(&mut self) {
        self.events.push(HostEvent::CanvasSelected);
    }

    fn capture_pointer(&mut self, pointer_id: PointerId) {
        self.events.push(HostEvent::Captured(pointer_id));
    }

    fn release_pointer(&mut self, pointer_id: PointerId) {
        self.events.push(HostEvent::Released(pointer_id));
    }
}
