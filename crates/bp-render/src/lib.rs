pub mod compose;
pub mod controls;
pub mod hit;
pub mod svg;
pub mod theme;

pub use compose::{Frame, NodeCard, SceneInput, compose};
pub use controls::ViewAction;
pub use hit::HitRegistry;
pub use theme::CanvasTheme;
