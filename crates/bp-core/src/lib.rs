pub mod config;
pub mod geometry;
pub mod id;
pub mod model;
pub mod transform;

pub use config::{CanvasConfig, SCALE_CEILING, SCALE_FLOOR, ZoomAnchor};
pub use geometry::{ConnectorAnchors, Side, bounding_box, connector_anchors, snap_point, to_screen, to_world};
pub use id::NodeId;
pub use model::*;
pub use transform::{ScaleLimits, ViewTransform, Viewport};

// Re-export kurbo primitives so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect, Size, Vec2};
