//! Blueprint dataset model.
//!
//! A blueprint is a flat list of nodes (pages, services, databases,
//! external integrations) plus a list of directed edges that reference
//! nodes by id. The host owns every field except `position`, which the
//! canvas mutates while the user drags.

use crate::id::NodeId;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

// ─── Node kind ───────────────────────────────────────────────────────────

/// What a node stands for in the generated system blueprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Entry,
    Action,
    Service,
    Database,
    External,
    Main,
    /// Any kind this canvas has no dedicated styling for.
    #[default]
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Stable lowercase name, matching the host's `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Action => "action",
            Self::Service => "service",
            Self::Database => "database",
            Self::External => "external",
            Self::Main => "main",
            Self::Other => "other",
        }
    }
}

// ─── Node / Edge ─────────────────────────────────────────────────────────

/// A single blueprint node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    /// Top-left corner in world units.
    pub position: Point,
    /// Completion percentage, always within `0..=100`.
    #[serde(default)]
    pub completion: u8,
    /// Display-only subtask titles, in host order.
    #[serde(default)]
    pub subtasks: Vec<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            position: Point::ZERO,
            completion: 0,
            subtasks: Vec::new(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_completion(mut self, percent: u8) -> Self {
        self.completion = percent.min(100);
        self
    }

    pub fn with_subtasks<I, S>(mut self, subtasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtasks = subtasks.into_iter().map(Into::into).collect();
        self
    }
}

/// A directed connection between two nodes.
///
/// Endpoints are not validated: an edge naming an unknown node is kept in
/// the dataset and simply skipped when drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(alias = "source")]
    pub from: NodeId,
    #[serde(alias = "target")]
    pub to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ─── Dataset ─────────────────────────────────────────────────────────────

/// The node/edge set supplied wholesale by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Host-side node shape: the position is optional and defaulted on intake.
#[derive(Deserialize)]
struct NodeWire {
    id: NodeId,
    #[serde(default)]
    label: String,
    #[serde(rename = "type", default)]
    kind: NodeKind,
    #[serde(default)]
    position: Option<Point>,
    #[serde(default)]
    completion: f64,
    #[serde(default)]
    subtasks: Vec<String>,
}

#[derive(Deserialize)]
struct DatasetWire {
    #[serde(default)]
    nodes: Vec<NodeWire>,
    #[serde(default)]
    edges: Vec<Edge>,
}

/// Columns used when a host node arrives without a position.
const DEFAULT_COLUMNS: usize = 4;
/// Gap between defaulted nodes, in world units.
const DEFAULT_GAP: f64 = 80.0;

impl Dataset {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Decode a host dataset from JSON.
    ///
    /// Nodes without a `position` are placed on a simple row-major grid
    /// (four per row) sized from `node_size`; completion is clamped into
    /// `0..=100`.
    ///
    /// # Errors
    /// Returns the decoder message when the JSON does not describe a dataset.
    pub fn from_json(json: &str, node_size: Size) -> Result<Self, String> {
        let wire: DatasetWire = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let nodes = wire
            .nodes
            .into_iter()
            .enumerate()
            .map(|(i, n)| Node {
                id: n.id,
                label: n.label,
                kind: n.kind,
                position: n.position.unwrap_or_else(|| default_position(i, node_size)),
                completion: n.completion.round().clamp(0.0, 100.0) as u8,
                subtasks: n.subtasks,
            })
            .collect();
        Ok(Self {
            nodes,
            edges: wire.edges,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn position_of(&self, id: NodeId) -> Option<Point> {
        self.get(id).map(|n| n.position)
    }

    /// Move a node. Returns `false` if no node has this id.
    pub fn set_position(&mut self, id: NodeId, position: Point) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Edges whose endpoints both exist, paired with the resolved nodes.
    pub fn resolved_edges(&self) -> impl Iterator<Item = (&Edge, &Node, &Node)> {
        self.edges.iter().filter_map(|edge| {
            let from = self.get(edge.from)?;
            let to = self.get(edge.to)?;
            Some((edge, from, to))
        })
    }
}

fn default_position(index: usize, node_size: Size) -> Point {
    let col = (index % DEFAULT_COLUMNS) as f64;
    let row = (index / DEFAULT_COLUMNS) as f64;
    Point::new(
        DEFAULT_GAP + col * (node_size.width + DEFAULT_GAP),
        DEFAULT_GAP + row * (node_size.height + DEFAULT_GAP),
    )
}
