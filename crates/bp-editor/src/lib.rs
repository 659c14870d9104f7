pub mod bridge;
pub mod capture;
pub mod engine;
pub mod input;
pub mod interaction;
pub mod shortcuts;
pub mod sync;

pub use bridge::{HostBridge, HostEvent, RecordingHost};
pub use engine::{CanvasEngine, Response};
pub use input::{InputEvent, Modifiers, PointerId};
pub use interaction::Interaction;
