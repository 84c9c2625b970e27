//! IPC message protocol for Scribble
//!
//! Defines all message types exchanged between the canvas core and the page UI.
//! Messages travel as JSON in the `detail` of DOM CustomEvents.

mod error;
mod input;
mod messages;

pub use error::IpcError;
pub use input::*;
pub use messages::*;

/// DOM event name for canvas -> UI messages
pub const CANVAS_TO_UI_EVENT: &str = "scribble:canvas-to-ui";

/// DOM event name for UI -> canvas messages
pub const UI_TO_CANVAS_EVENT: &str = "scribble:ui-to-canvas";

/// Serialize a message for a CustomEvent detail
pub fn to_json<T: serde::Serialize>(msg: &T) -> Result<String, IpcError> {
    Ok(serde_json::to_string(msg)?)
}

/// Parse a UI message from a CustomEvent detail
pub fn parse_ui_message(detail: &str) -> Result<UiToCanvas, IpcError> {
    if detail.trim().is_empty() {
        return Err(IpcError::InvalidFormat("empty message".into()));
    }
    Ok(serde_json::from_str(detail)?)
}
