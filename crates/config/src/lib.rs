//! Shared configuration for Scribble
//!
//! This crate provides the single source of truth for the drawing grid size,
//! brush, undo depth and classifier input geometry shared across all build
//! modes (browser canvas, native harness).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default logical grid width in pixels
pub const DEFAULT_WIDTH: u32 = 512;

/// Default logical grid height in pixels
pub const DEFAULT_HEIGHT: u32 = 512;

/// Largest accepted grid side length
pub const MAX_CANVAS_SIZE: u32 = 4096;

/// Default brush half-width in pixels
pub const DEFAULT_BRUSH_RADIUS: u32 = 5;

/// Intensity stamped by the brush (fully inked)
pub const DEFAULT_INK: u8 = 255;

/// Default number of undo snapshots kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Default margin added around the ink bounding box before cropping
pub const DEFAULT_CROP_MARGIN: u32 = 20;

/// Default classifier input resolution (square)
pub const DEFAULT_INPUT_SIZE: u32 = 28;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Canvas, brush and preprocessing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Logical grid width in pixels
    pub width: u32,
    /// Logical grid height in pixels
    pub height: u32,
    /// Brush half-width; each stamp covers a square of side `2 * brush_radius`
    pub brush_radius: u32,
    /// Intensity written by the brush
    pub ink: u8,
    /// Maximum number of undo snapshots
    pub history_capacity: usize,
    /// Margin around the ink bounding box
    pub crop_margin: u32,
    /// Side length of the classifier input image
    pub input_size: u32,
    /// Display names of the classifier's output classes, in score order
    pub labels: Vec<String>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            brush_radius: DEFAULT_BRUSH_RADIUS,
            ink: DEFAULT_INK,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            crop_margin: DEFAULT_CROP_MARGIN,
            input_size: DEFAULT_INPUT_SIZE,
            labels: (0..10).map(|digit| digit.to_string()).collect(),
        }
    }
}

impl CanvasConfig {
    /// Create a config with the given grid dimensions and default everything else
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse a JSON config. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values describe a usable canvas
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_CANVAS_SIZE || self.height > MAX_CANVAS_SIZE {
            return Err(ConfigError::Invalid(format!(
                "grid is {}x{}, max side is {}",
                self.width, self.height, MAX_CANVAS_SIZE
            )));
        }
        if self.input_size == 0 {
            return Err(ConfigError::Invalid("input_size must be positive".into()));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be positive".into(),
            ));
        }
        if self.labels.is_empty() {
            return Err(ConfigError::Invalid("at least one label is required".into()));
        }
        Ok(())
    }

    /// Number of classes the classifier is expected to score
    pub fn class_count(&self) -> usize {
        self.labels.len()
    }

    /// Display name for a class index, falling back to the index itself
    pub fn label(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| index.to_string())
    }
}
