//! Undo functionality for the drawing surface

use std::collections::VecDeque;

use scribble_config::DEFAULT_HISTORY_CAPACITY;
use tracing::{debug, info};

use crate::surface::Snapshot;

use super::{DrawingSurface, StrokeState, SurfaceResponse};

/// Bounded stack of buffer snapshots, oldest first
///
/// Pushing beyond capacity evicts the oldest entry. Entries are never
/// modified once stored.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryStack {
    /// Create an empty stack holding at most `capacity` entries (at least 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a snapshot, evicting the oldest one if the stack is full
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Remove and return the most recent snapshot
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    /// Most recent snapshot without removing it
    #[cfg(test)]
    pub fn peek(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl DrawingSurface {
    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_count(&self) -> usize {
        self.history.len()
    }

    /// Undo the last stroke
    ///
    /// Restores the most recent snapshot, or blanks the buffer when the
    /// history is empty. Any active stroke is abandoned. Always asks for a
    /// render and a fresh classification.
    pub fn undo(&mut self) -> SurfaceResponse {
        self.state = StrokeState::Idle;

        let Some(snapshot) = self.history.pop() else {
            info!("Nothing to undo, clearing canvas");
            self.buffer.clear();
            return SurfaceResponse::RENDER_AND_CLASSIFY;
        };

        // Snapshots are only ever taken from this buffer
        if let Err(e) = self.buffer.restore(&snapshot) {
            debug!("Undo: {}, clearing canvas", e);
            self.buffer.clear();
        }

        debug!("Undo applied, {} levels remaining", self.history.len());
        SurfaceResponse::RENDER_AND_CLASSIFY
    }

    /// Blank the whole canvas as an undoable step
    pub fn clear(&mut self) -> SurfaceResponse {
        self.state = StrokeState::Idle;
        if self.buffer.is_blank() {
            return SurfaceResponse::NONE;
        }
        self.history.push(self.buffer.snapshot());
        self.buffer.clear();
        SurfaceResponse::RENDER_AND_CLASSIFY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Brush;
    use crate::constants::INK;
    use crate::surface::PixelBuffer;
    use crate::types::GridPoint;

    fn snapshot_with(value: u8) -> Snapshot {
        let mut buf = PixelBuffer::with_brush(4, 4, Brush::new(0, value)).unwrap();
        buf.stamp_at(GridPoint::new(0, 0), value);
        buf.snapshot()
    }

    #[test]
    fn test_push_pop_lifo() {
        let mut stack = HistoryStack::with_capacity(10);
        for v in 1..=5 {
            stack.push(snapshot_with(v));
        }
        for v in (1..=5).rev() {
            assert_eq!(stack.pop().unwrap().pixels()[0], v);
        }
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_eviction_keeps_newest() {
        let mut stack = HistoryStack::with_capacity(50);
        for v in 1..=51u8 {
            stack.push(snapshot_with(v));
        }
        assert_eq!(stack.len(), 50);

        let mut popped = Vec::new();
        while let Some(s) = stack.pop() {
            popped.push(s.pixels()[0]);
        }
        assert_eq!(popped.len(), 50);
        assert_eq!(popped.first(), Some(&51));
        assert_eq!(popped.last(), Some(&2));
        assert!(!popped.contains(&1));
    }

    #[test]
    fn test_zero_capacity_promoted() {
        let mut stack = HistoryStack::with_capacity(0);
        assert_eq!(stack.capacity(), 1);
        stack.push(snapshot_with(1));
        stack.push(snapshot_with(2));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.peek().unwrap().pixels()[0], 2);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(HistoryStack::default().capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_undo_restores_pre_stroke_state() {
        let mut surface = DrawingSurface::new(64, 64).unwrap();
        surface.pointer_down(Some(GridPoint::new(10, 10)));
        surface.pointer_up();
        let after_first = surface.buffer().clone();

        surface.pointer_down(Some(GridPoint::new(40, 40)));
        surface.pointer_move(Some(GridPoint::new(50, 20)));
        surface.pointer_up();
        assert_ne!(surface.buffer(), &after_first);

        assert_eq!(surface.undo(), SurfaceResponse::RENDER_AND_CLASSIFY);
        assert_eq!(surface.buffer(), &after_first);

        surface.undo();
        assert!(surface.buffer().is_blank());
    }

    #[test]
    fn test_undo_with_empty_history_clears() {
        let mut surface = DrawingSurface::new(32, 32).unwrap();
        assert!(!surface.can_undo());
        assert_eq!(surface.undo(), SurfaceResponse::RENDER_AND_CLASSIFY);
        assert!(surface.buffer().is_blank());
    }

    #[test]
    fn test_undo_mid_stroke_returns_to_idle() {
        let mut surface = DrawingSurface::new(32, 32).unwrap();
        surface.pointer_down(Some(GridPoint::new(8, 8)));
        surface.undo();
        assert_eq!(surface.state(), StrokeState::Idle);
        assert!(surface.buffer().is_blank());

        surface.pointer_move(Some(GridPoint::new(20, 20)));
        assert!(surface.buffer().is_blank());
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut surface = DrawingSurface::new(32, 32).unwrap();
        surface.pointer_down(Some(GridPoint::new(8, 8)));
        surface.pointer_up();
        let drawn = surface.buffer().clone();

        assert_eq!(surface.clear(), SurfaceResponse::RENDER_AND_CLASSIFY);
        assert!(surface.buffer().is_blank());
        assert_eq!(surface.undo_count(), 2);

        surface.undo();
        assert_eq!(surface.buffer(), &drawn);
        assert_eq!(surface.buffer().get(8, 8), Some(INK));
    }

    #[test]
    fn test_clear_blank_canvas_is_noop() {
        let mut surface = DrawingSurface::new(32, 32).unwrap();
        assert!(surface.clear().is_none());
        assert!(surface.history().is_empty());
    }
}
