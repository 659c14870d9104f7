//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to canvas actions. The map lives in Rust so
//! it's shared across WASM and native hosts.

use crate::input::Modifiers;
use bp_render::ViewAction;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    View(ViewAction),
    /// Abort the active drag or pan without committing.
    CancelInteraction,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"="`, `"Escape"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.command() {
            return match key {
                "=" | "+" => Some(ShortcutAction::View(ViewAction::ZoomIn)),
                "-" | "_" => Some(ShortcutAction::View(ViewAction::ZoomOut)),
                "0" => Some(ShortcutAction::View(ViewAction::FitToView)),
                _ => None,
            };
        }

        match key {
            // Shift+1 is "!" on most layouts.
            "!" if modifiers.shift => Some(ShortcutAction::View(ViewAction::FitToView)),
            "Escape" => Some(ShortcutAction::CancelInteraction),
            _ => None,
        }
    }
}
