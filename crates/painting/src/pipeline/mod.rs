//! Interactive drawing pipeline
//!
//! This module provides the drawing surface state machine that connects:
//! - Input handling (pointer/touch events already mapped to grid points)
//! - The pixel buffer (brush stamps and line rasterization)
//! - Undo history (one snapshot per stroke)
//!
//! The surface never renders or classifies by itself. Each transition returns
//! a [`SurfaceResponse`] telling the front end which side effects to run.

mod stroke;
mod surface_ops;
mod undo;

use scribble_config::CanvasConfig;

use crate::brush::Brush;
use crate::surface::PixelBuffer;
use crate::types::GridPoint;
use crate::validation::ValidationError;

pub use surface_ops::{render_rgba, RenderSink};
pub use undo::HistoryStack;

/// Interaction state of a [`DrawingSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    Idle,
    /// A stroke is active; `last` is the most recent stamped position
    Stroking { last: GridPoint },
}

/// Side effects requested by a surface transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceResponse {
    /// The buffer changed and should be presented again
    pub render: bool,
    /// The drawing should be (re)classified
    pub classify: bool,
}

impl SurfaceResponse {
    pub const NONE: Self = Self {
        render: false,
        classify: false,
    };

    pub const RENDER: Self = Self {
        render: true,
        classify: false,
    };

    pub const CLASSIFY: Self = Self {
        render: false,
        classify: true,
    };

    pub const RENDER_AND_CLASSIFY: Self = Self {
        render: true,
        classify: true,
    };

    pub fn is_none(&self) -> bool {
        !self.render && !self.classify
    }
}

/// Owned drawing state: pixel buffer, undo history and stroke state
///
/// Workflow:
/// 1. `pointer_down` snapshots the buffer into history, then stamps
/// 2. `pointer_move` rasterizes a line from the previous position
/// 3. `pointer_up` / `pointer_leave` end the stroke and request classification
/// 4. `undo` restores the last snapshot (or blanks the buffer)
pub struct DrawingSurface {
    pub(crate) buffer: PixelBuffer,
    pub(crate) history: HistoryStack,
    pub(crate) state: StrokeState,
}

impl DrawingSurface {
    /// Create a surface with the given dimensions, default brush and history depth
    pub fn new(width: u32, height: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            buffer: PixelBuffer::new(width, height)?,
            history: HistoryStack::default(),
            state: StrokeState::Idle,
        })
    }

    /// Create a surface from the shared canvas configuration
    pub fn from_config(config: &CanvasConfig) -> Result<Self, ValidationError> {
        let brush = Brush::new(config.brush_radius, config.ink);
        Ok(Self {
            buffer: PixelBuffer::with_brush(config.width, config.height, brush)?,
            history: HistoryStack::with_capacity(config.history_capacity),
            state: StrokeState::Idle,
        })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self.state, StrokeState::Stroking { .. })
    }
}
