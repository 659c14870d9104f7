//! Hit testing: point → node lookup.
//!
//! Keeps an explicit registry of node rectangles (world space) instead of
//! querying whatever surface the frame was drawn on. The registry is rebuilt
//! whenever the working dataset is replaced and patched per drag frame.

use bp_core::geometry::{node_rect, rect_distance};
use bp_core::{Dataset, NodeId, Point, Rect, Size};

#[derive(Debug, Clone, Default)]
pub struct HitRegistry {
    /// Paint order: later entries are drawn above earlier ones.
    entries: Vec<(NodeId, Rect)>,
    /// Node drawn above everything else (the one being dragged).
    raised: Option<NodeId>,
}

impl HitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entry from the dataset, keeping dataset order.
    pub fn rebuild(&mut self, dataset: &Dataset, node_size: Size) {
        self.entries.clear();
        self.entries
            .extend(dataset.nodes.iter().map(|n| (n.id, node_rect(n, node_size))));
        if let Some(raised) = self.raised
            && !self.entries.iter().any(|(id, _)| *id == raised)
        {
            self.raised = None;
        }
        log::trace!("hit registry rebuilt with {} rects", self.entries.len());
    }

    /// Move one node's rectangle. Unknown ids are ignored.
    pub fn update(&mut self, id: NodeId, rect: Rect) {
        if let Some(entry) = self.entries.iter_mut().find(|(eid, _)| *eid == id) {
            entry.1 = rect;
        }
    }

    pub fn raise(&mut self, id: Option<NodeId>) {
        self.raised = id;
    }

    pub fn rect_of(&self, id: NodeId) -> Option<Rect> {
        self.entries.iter().find(|(eid, _)| *eid == id).map(|(_, r)| *r)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the topmost node containing a world point.
    /// Returns `None` if the point is on the background.
    pub fn hit_test(&self, p: Point) -> Option<NodeId> {
        if let Some(raised) = self.raised
            && self.rect_of(raised).is_some_and(|r| r.contains(p))
        {
            return Some(raised);
        }
        self.entries
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(p))
            .map(|(id, _)| *id)
    }

    /// The rectangle nearest to `p` within `max_distance` (0 when inside).
    /// Ties go to the topmost entry.
    pub fn nearest(&self, p: Point, max_distance: f64) -> Option<(NodeId, f64)> {
        self.entries
            .iter()
            .rev()
            .map(|(id, rect)| (*id, rect_distance(*rect, p)))
            .filter(|(_, d)| *d <= max_distance)
            .fold(None, |best: Option<(NodeId, f64)>, cand| match best {
                Some(b) if b.1 <= cand.1 => Some(b),
                _ => Some(cand),
            })
    }
}
