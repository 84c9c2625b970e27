//! Stroke handling for the drawing surface

use tracing::{debug, warn};

use crate::types::GridPoint;

use super::{DrawingSurface, StrokeState, SurfaceResponse};

impl DrawingSurface {
    /// Begin a stroke at `point`
    ///
    /// The buffer is snapshotted before anything is stamped, so undo always
    /// returns to the pre-stroke state. An unresolvable point is ignored.
    pub fn pointer_down(&mut self, point: Option<GridPoint>) -> SurfaceResponse {
        let Some(point) = point else {
            warn!("pointer_down: unresolvable position, ignoring");
            self.state = StrokeState::Idle;
            return SurfaceResponse::NONE;
        };

        self.history.push(self.buffer.snapshot());

        let value = self.buffer.brush().value;
        self.buffer.stamp_at(point, value);
        self.state = StrokeState::Stroking { last: point };

        debug!(
            "Stroke started at ({}, {}), {} undo levels",
            point.x,
            point.y,
            self.history.len()
        );
        SurfaceResponse::RENDER
    }

    /// Continue the active stroke to `point`
    ///
    /// Ignored while idle. An unresolvable point while stroking drops back to
    /// idle so the surface never believes a stroke is still active.
    pub fn pointer_move(&mut self, point: Option<GridPoint>) -> SurfaceResponse {
        let StrokeState::Stroking { last } = self.state else {
            return SurfaceResponse::NONE;
        };

        let Some(point) = point else {
            warn!("pointer_move: unresolvable position, ending stroke");
            self.state = StrokeState::Idle;
            return SurfaceResponse::NONE;
        };

        let value = self.buffer.brush().value;
        self.buffer.draw_line(last, point, value);
        self.state = StrokeState::Stroking { last: point };
        SurfaceResponse::RENDER
    }

    /// End the active stroke and request classification
    pub fn pointer_up(&mut self) -> SurfaceResponse {
        if !self.is_stroking() {
            return SurfaceResponse::NONE;
        }
        self.state = StrokeState::Idle;
        debug!("Stroke ended, {} ink cells", self.buffer.ink_count());
        SurfaceResponse::CLASSIFY
    }

    /// The pointer left the drawing area; same as lifting it
    pub fn pointer_leave(&mut self) -> SurfaceResponse {
        self.pointer_up()
    }
}
