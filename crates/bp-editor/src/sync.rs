//! Two-slot dataset model.
//!
//! `committed` is the last dataset the host pushed; `working` is what the
//! canvas shows and drags mutate. Host pushes that arrive mid-session are
//! parked in a single `pending` slot (newer pushes overwrite older ones)
//! and applied when the session ends.

use bp_core::{Dataset, NodeId, Point};

/// Outcome of offering a host dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incoming {
    /// The working copy was replaced immediately.
    Applied,
    /// Parked until the active session ends.
    Deferred { replaced_pending: bool },
}

#[derive(Debug, Clone, Default)]
pub struct DatasetSync {
    committed: Dataset,
    working: Dataset,
    pending: Option<Dataset>,
}

impl DatasetSync {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            committed: dataset.clone(),
            working: dataset,
            pending: None,
        }
    }

    pub fn working(&self) -> &Dataset {
        &self.working
    }

    pub fn committed(&self) -> &Dataset {
        &self.committed
    }

    pub fn pending(&self) -> Option<&Dataset> {
        self.pending.as_ref()
    }

    /// Accept a dataset from the host, deferring it while a session is active.
    pub fn offer(&mut self, dataset: Dataset, session_active: bool) -> Incoming {
        if session_active {
            let replaced_pending = self.pending.replace(dataset).is_some();
            if replaced_pending {
                log::debug!("pending dataset overwritten by a newer push");
            }
            Incoming::Deferred { replaced_pending }
        } else {
            self.apply(dataset);
            Incoming::Applied
        }
    }

    /// Apply the parked dataset, if any. Call on every return to idle.
    /// Returns `true` if the working copy was replaced.
    pub fn settle(&mut self) -> bool {
        match self.pending.take() {
            Some(dataset) => {
                log::debug!("applying deferred dataset ({} nodes)", dataset.nodes.len());
                self.apply(dataset);
                true
            }
            None => false,
        }
    }

    /// Move a node in the working copy. Returns `false` for unknown ids.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        self.working.set_position(id, position)
    }

    /// Whether a dragged node has vanished from the host's view of the world:
    /// missing from the working copy, or from a newer dataset still pending.
    pub fn is_orphaned(&self, id: NodeId) -> bool {
        !self.working.contains(id) || self.pending.as_ref().is_some_and(|p| !p.contains(id))
    }

    /// Whether the working copy has diverged from what the host last sent.
    pub fn has_local_edits(&self) -> bool {
        self.working != self.committed
    }

    /// Record the working copy as the host's new state after a commit.
    pub fn mark_committed(&mut self) {
        self.committed = self.working.clone();
    }

    fn apply(&mut self, dataset: Dataset) {
        self.committed = dataset.clone();
        self.working = dataset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_core::{Node, NodeKind};
    use pretty_assertions::assert_eq;

    fn dataset(ids: &[&str]) -> Dataset {
        Dataset::new(
            ids.iter()
                .enumerate()
                .map(|(i, id)| Node::new(*id, *id, NodeKind::Service).at(i as f64 * 300.0, 0.0))
                .collect(),
            vec![],
        )
    }

    #[test]
    fn idle_offer_applies_immediately() {
        let mut sync = DatasetSync::default();
        assert_eq!(sync.offer(dataset(&["a"]), false), Incoming::Applied);
        assert_eq!(sync.working().nodes.len(), 1);
        assert!(!sync.settle());
    }

    #[test]
    fn pending_slot_holds_only_the_latest() {
        let mut sync = DatasetSync::new(dataset(&["a"]));
        assert_eq!(
            sync.offer(dataset(&["a", "b"]), true),
            Incoming::Deferred { replaced_pending: false }
        );
        assert_eq!(
            sync.offer(dataset(&["a", "b", "c"]), true),
            Incoming::Deferred { replaced_pending: true }
        );
        assert_eq!(sync.working().nodes.len(), 1);

        assert!(sync.settle());
        assert_eq!(sync.working().nodes.len(), 3);
        assert!(!sync.settle());
    }

    #[test]
    fn local_moves_diverge_until_marked() {
        let mut sync = DatasetSync::new(dataset(&["a"]));
        let id = NodeId::intern("a");
        assert!(sync.move_node(id, Point::new(40.0, 60.0)));
        assert!(sync.has_local_edits());
        assert_eq!(sync.committed().position_of(id), Some(Point::ZERO));
        sync.mark_committed();
        assert!(!sync.has_local_edits());
        assert!(!sync.move_node(NodeId::intern("zz"), Point::ZERO));
    }

    #[test]
    fn orphan_detection_consults_pending() {
        let mut sync = DatasetSync::new(dataset(&["a", "b"]));
        let b = NodeId::intern("b");
        assert!(!sync.is_orphaned(b));
        sync.offer(dataset(&["a"]), true);
        assert!(sync.is_orphaned(b));
        assert!(sync.is_orphaned(NodeId::intern("never")));
    }
}
