//! Input event types for pointer, touch and keyboard.

use serde::{Deserialize, Serialize};

/// Phase of a pointer (mouse or touch) interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Pointer left the canvas (or the touch was cancelled)
    Leave,
}

/// A pointer event in client (display) coordinates.
///
/// `position` is None when the source event carried no usable coordinates,
/// e.g. a touch event with an empty touch list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Option<[f32; 2]>,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, position: Option<[f32; 2]>) -> Self {
        Self { phase, position }
    }

    pub fn at(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            position: Some([x, y]),
        }
    }
}

/// Keyboard input event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardEvent {
    pub key: String,
    pub pressed: bool,
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    /// Ctrl+Z / Cmd+Z (either case) on key press
    pub fn is_undo_chord(&self) -> bool {
        self.pressed && self.modifiers.is_undo_chord(&self.key)
    }
}

/// Keyboard modifier keys state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether `key` with these modifiers is the undo shortcut
    pub fn is_undo_chord(&self, key: &str) -> bool {
        (self.ctrl || self.meta) && key.eq_ignore_ascii_case("z")
    }
}
