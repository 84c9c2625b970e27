use crate::constants::{MAX_CANVAS_SIZE, MAX_GRID_COORD};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid canvas dimensions: {width}x{height} (max {})", MAX_CANVAS_SIZE)]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Non-finite coordinate: ({x}, {y})")]
    NonFinite { x: f32, y: f32 },
    #[error("Snapshot is {found_width}x{found_height}, buffer is {width}x{height}")]
    SnapshotMismatch {
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },
}

/// Check that canvas dimensions are non-zero and within [`MAX_CANVAS_SIZE`]
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), ValidationError> {
    if width == 0 || height == 0 || width > MAX_CANVAS_SIZE || height > MAX_CANVAS_SIZE {
        return Err(ValidationError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Convert a device coordinate to a grid coordinate (floor), None if not finite
pub fn to_grid(coord: f32) -> Option<i32> {
    if !coord.is_finite() {
        return None;
    }
    let clamped = coord
        .floor()
        .clamp(-(MAX_GRID_COORD as f32), MAX_GRID_COORD as f32);
    Some(clamped as i32)
}

/// Convert a device point to grid coordinates, rejecting NaN and infinities
pub fn validate_point(x: f32, y: f32) -> Result<(i32, i32), ValidationError> {
    match (to_grid(x), to_grid(y)) {
        (Some(gx), Some(gy)) => Ok((gx, gy)),
        _ => Err(ValidationError::NonFinite { x, y }),
    }
}
