//! Input abstraction layer.
//!
//! Normalizes mouse, touch, pen, wheel and keyboard events into a unified
//! `InputEvent` enum. Pointer coordinates are in screen space, relative to
//! the canvas element's top-left corner.

/// Identifies one pointer (mouse, finger, pen) for capture bookkeeping.
pub type PointerId = i32;

/// Keyboard modifier state at the time of an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event from any pointing device or the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown {
        pointer_id: PointerId,
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    /// Pointer moved. Delivered even outside the canvas while captured.
    PointerMove {
        pointer_id: PointerId,
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    /// Pointer released.
    PointerUp {
        pointer_id: PointerId,
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    /// The platform aborted the pointer (touch cancel, window blur).
    PointerCancel { pointer_id: PointerId },

    /// Pointer capture was taken away from the canvas.
    LostCapture { pointer_id: PointerId },

    /// Wheel or trackpad scroll. Only zooms when the command key is held.
    Wheel {
        x: f64,
        y: f64,
        delta_y: f64,
        modifiers: Modifiers,
    },

    /// Keyboard shortcut.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self::PointerDown {
            pointer_id,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self::PointerMove {
            pointer_id,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self::PointerUp {
            pointer_id,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    /// Extract position if this is a positioned event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Wheel { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }

    pub fn pointer_id(&self) -> Option<PointerId> {
        match self {
            Self::PointerDown { pointer_id, .. }
            | Self::PointerMove { pointer_id, .. }
            | Self::PointerUp { pointer_id, .. }
            | Self::PointerCancel { pointer_id }
            | Self::LostCapture { pointer_id } => Some(*pointer_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_covers_ctrl_and_meta() {
        assert!(Modifiers::CTRL.command());
        assert!(
            Modifiers {
                meta: true,
                ..Modifiers::NONE
            }
            .command()
        );
        assert!(!Modifiers::NONE.command());
    }

    #[test]
    fn position_and_pointer_id() {
        let down = InputEvent::pointer_down(3, 10.0, 20.0);
        assert_eq!(down.position(), Some((10.0, 20.0)));
        assert_eq!(down.pointer_id(), Some(3));
        let cancel = InputEvent::PointerCancel { pointer_id: 3 };
        assert_eq!(cancel.position(), None);
        assert_eq!(cancel.pointer_id(), Some(3));
    }
}
