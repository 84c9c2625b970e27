//! Main IPC message enums for communication between the canvas and the page UI.

use serde::{Deserialize, Serialize};

/// Where a displayed prediction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionSource {
    /// Scores produced by the model
    Model,
    /// Nothing drawn; fixed zero scores
    EmptyDrawing,
    /// The model failed; fixed zero scores
    Fallback,
}

/// A classification result ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionUpdate {
    /// Sequence number of the classification request
    pub sequence: u64,
    pub class_index: usize,
    pub label: String,
    pub scores: Vec<f32>,
    pub source: PredictionSource,
}

/// Messages from the canvas to the page UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CanvasToUi {
    /// Model finished loading (or failed to)
    ModelStatus {
        ready: bool,
        message: Option<String>,
    },

    /// New prediction for the current drawing
    Prediction(PredictionUpdate),

    /// Undo depth changed (for enabling an undo button)
    HistoryChanged { undo_levels: usize },

    /// Error notification
    Error { code: String, message: String },
}

/// Messages from the page UI to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToCanvas {
    /// Undo the last stroke
    Undo,

    /// Blank the canvas (undoable)
    Clear,
}
