use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::validation::to_grid;

/// A position on the logical pixel grid
///
/// May lie outside the buffer; writes there are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance, i.e. the number of 8-connected steps between points
    #[cfg(test)]
    pub fn chebyshev(self, other: GridPoint) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl From<(i32, i32)> for GridPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Maps display-space pointer coordinates onto the logical grid
///
/// The displayed canvas can be any size; the grid is fixed. A point is scaled
/// by `grid_size / display_size` after subtracting the display origin, then
/// floored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    /// Top-left corner of the displayed canvas in client coordinates
    pub origin: Vec2,
    /// Displayed canvas size in client coordinates
    pub display_size: Vec2,
    /// Logical grid size in cells
    pub grid_size: Vec2,
}

impl CoordinateMapper {
    pub fn new(origin: Vec2, display_size: Vec2, grid_width: u32, grid_height: u32) -> Self {
        Self {
            origin,
            display_size,
            grid_size: Vec2::new(grid_width as f32, grid_height as f32),
        }
    }

    /// Identity mapping for a display that is exactly grid-sized at the origin
    pub fn identity(grid_width: u32, grid_height: u32) -> Self {
        let size = Vec2::new(grid_width as f32, grid_height as f32);
        Self {
            origin: Vec2::ZERO,
            display_size: size,
            grid_size: size,
        }
    }

    /// Map a client position to a grid point
    ///
    /// Returns None when the position or the display geometry cannot produce a
    /// finite grid coordinate (missing layout, zero-sized display, NaN input).
    pub fn map(&self, client_x: f32, client_y: f32) -> Option<GridPoint> {
        if self.display_size.x <= 0.0 || self.display_size.y <= 0.0 {
            return None;
        }
        let scale = self.grid_size / self.display_size;
        let local = (Vec2::new(client_x, client_y) - self.origin) * scale;
        Some(GridPoint::new(to_grid(local.x)?, to_grid(local.y)?))
    }
}
