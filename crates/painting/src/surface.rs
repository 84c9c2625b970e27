//! CPU pixel buffer for drawing - 8-bit intensity storage

use image::{GrayImage, Luma};
use tracing::warn;

use crate::brush::{Brush, LinePoints};
use crate::constants::BLANK;
use crate::types::GridPoint;
use crate::validation::{validate_dimensions, validate_point, ValidationError};

/// A fixed-size grid of 8-bit intensities (0 = blank, 255 = fully inked)
///
/// Dimensions never change after construction. Every write is clipped to the
/// grid; out-of-bounds cells are silently skipped.
#[derive(Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    brush: Brush,
    /// Intensities in row-major order
    pixels: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("brush", &self.brush)
            .field("ink_count", &self.ink_count())
            .finish()
    }
}

impl PixelBuffer {
    /// Create a blank buffer with the default brush
    pub fn new(width: u32, height: u32) -> Result<Self, ValidationError> {
        Self::with_brush(width, height, Brush::default())
    }

    /// Create a blank buffer with the given brush
    pub fn with_brush(width: u32, height: u32, brush: Brush) -> Result<Self, ValidationError> {
        validate_dimensions(width, height)?;
        let pixel_count = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            brush,
            pixels: vec![BLANK; pixel_count],
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    /// Stamp the brush at a device-space point with the given intensity
    ///
    /// Fractional coordinates are floored. NaN or infinite coordinates are
    /// logged and rejected without touching the buffer.
    pub fn set_brush(&mut self, x: f32, y: f32, value: u8) -> Result<(), ValidationError> {
        let (gx, gy) = validate_point(x, y).inspect_err(|e| {
            warn!("set_brush skipped: {}", e);
        })?;
        self.stamp_at(GridPoint::new(gx, gy), value);
        Ok(())
    }

    /// Stamp the brush with its own ink value
    pub fn stamp(&mut self, x: f32, y: f32) -> Result<(), ValidationError> {
        self.set_brush(x, y, self.brush.value)
    }

    /// Stamp the brush square centered at a grid point, clipped to the buffer
    pub fn stamp_at(&mut self, center: GridPoint, value: u8) {
        let (xs, ys) = self.brush.footprint(center.x, center.y);
        let x_start = xs.start.clamp(0, self.width as i64) as usize;
        let x_end = xs.end.clamp(0, self.width as i64) as usize;
        let y_start = ys.start.clamp(0, self.height as i64) as usize;
        let y_end = ys.end.clamp(0, self.height as i64) as usize;

        if x_start >= x_end || y_start >= y_end {
            return;
        }

        let stride = self.width as usize;
        for row in y_start..y_end {
            let offset = row * stride;
            self.pixels[offset + x_start..offset + x_end].fill(value);
        }
    }

    /// Rasterize a line with Bresenham stepping, stamping the brush at every cell
    ///
    /// Endpoint order does not matter; equal endpoints produce a single stamp.
    pub fn draw_line(&mut self, from: GridPoint, to: GridPoint, value: u8) {
        for point in LinePoints::new(from, to) {
            self.stamp_at(point, value);
        }
    }

    /// Reset every cell to blank
    pub fn clear(&mut self) {
        self.pixels.fill(BLANK);
    }

    /// Get a cell, None if out of bounds
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.pixels[(y as usize) * (self.width as usize) + (x as usize)])
    }

    /// Raw grid in row-major order
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of non-blank cells
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&v| v != BLANK).count()
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&v| v == BLANK)
    }

    /// Take an immutable copy of the current contents
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone().into_boxed_slice(),
        }
    }

    /// Overwrite the contents with a snapshot taken from a same-sized buffer
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), ValidationError> {
        if snapshot.width != self.width || snapshot.height != self.height {
            return Err(ValidationError::SnapshotMismatch {
                width: self.width,
                height: self.height,
                found_width: snapshot.width,
                found_height: snapshot.height,
            });
        }
        self.pixels.copy_from_slice(&snapshot.pixels);
        Ok(())
    }

    /// Copy into a grayscale image (ink is bright), for debugging dumps
    pub fn to_gray_image(&self) -> GrayImage {
        let stride = self.width as usize;
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([self.pixels[(y as usize) * stride + (x as usize)]])
        })
    }
}

/// Immutable full copy of a [`PixelBuffer`], used for undo
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    pixels: Box<[u8]>,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INK;

    fn buffer(width: u32, height: u32, radius: u32) -> PixelBuffer {
        PixelBuffer::with_brush(width, height, Brush::new(radius, INK)).unwrap()
    }

    #[test]
    fn test_new_buffer() {
        let buf = PixelBuffer::new(100, 50).unwrap();
        assert_eq!(buf.width(), 100);
        assert_eq!(buf.height(), 50);
        assert_eq!(buf.pixels().len(), 5000);
        assert!(buf.is_blank());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 10),
            Err(ValidationError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_stamp_covers_square() {
        let mut buf = buffer(20, 20, 2);
        buf.stamp(10.0, 10.0).unwrap();

        // Side 2 * radius, from center - radius to center + radius - 1
        assert_eq!(buf.ink_count(), 16);
        assert_eq!(buf.get(8, 8), Some(INK));
        assert_eq!(buf.get(11, 11), Some(INK));
        assert_eq!(buf.get(12, 10), Some(BLANK));
        assert_eq!(buf.get(7, 10), Some(BLANK));
    }

    #[test]
    fn test_fractional_coordinates_floor() {
        let mut buf = buffer(10, 10, 0);
        buf.set_brush(3.9, 4.2, 128).unwrap();
        assert_eq!(buf.get(3, 4), Some(128));
        assert_eq!(buf.ink_count(), 1);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut buf = buffer(10, 10, 1);
        assert!(buf.set_brush(f32::NAN, 1.0, INK).is_err());
        assert!(buf.set_brush(1.0, f32::NEG_INFINITY, INK).is_err());
        assert!(buf.is_blank());
    }

    #[test]
    fn test_stamp_clipped_at_edges() {
        let mut buf = buffer(10, 10, 3);
        buf.stamp(0.0, 0.0).unwrap();
        // Only the in-bounds quadrant (0..3 x 0..3) is written
        assert_eq!(buf.ink_count(), 9);

        buf.stamp(-50.0, 500.0).unwrap();
        assert_eq!(buf.ink_count(), 9);
    }

    #[test]
    fn test_draw_line_equal_points() {
        let mut buf = buffer(10, 10, 0);
        let p = GridPoint::new(4, 4);
        buf.draw_line(p, p, INK);
        assert_eq!(buf.ink_count(), 1);
    }

    #[test]
    fn test_draw_line_reverse_matches_forward_extent() {
        let mut forward = buffer(64, 64, 1);
        let mut backward = buffer(64, 64, 1);
        let a = GridPoint::new(5, 50);
        let b = GridPoint::new(40, 3);
        forward.draw_line(a, b, INK);
        backward.draw_line(b, a, INK);

        for p in [a, b] {
            assert_eq!(forward.get(p.x as i64, p.y as i64), Some(INK));
            assert_eq!(backward.get(p.x as i64, p.y as i64), Some(INK));
        }
    }

    #[test]
    fn test_clear() {
        let mut buf = buffer(10, 10, 2);
        buf.stamp(5.0, 5.0).unwrap();
        assert!(!buf.is_blank());
        buf.clear();
        assert!(buf.is_blank());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut buf = buffer(10, 10, 1);
        let copy = buf.clone();
        buf.stamp(5.0, 5.0).unwrap();
        assert!(copy.is_blank());
        assert!(!buf.is_blank());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut buf = buffer(16, 16, 2);
        buf.stamp(3.0, 3.0).unwrap();
        let snapshot = buf.snapshot();
        let before = buf.clone();

        buf.draw_line(GridPoint::new(0, 15), GridPoint::new(15, 0), INK);
        assert_ne!(buf, before);

        buf.restore(&snapshot).unwrap();
        assert_eq!(buf, before);
    }

    #[test]
    fn test_restore_rejects_mismatched_snapshot() {
        let mut buf = buffer(16, 16, 2);
        let other = buffer(8, 8, 2).snapshot();
        assert!(matches!(
            buf.restore(&other),
            Err(ValidationError::SnapshotMismatch { .. })
        ));
    }

    #[test]
    fn test_to_gray_image() {
        let mut buf = buffer(4, 3, 0);
        buf.set_brush(2.0, 1.0, 200).unwrap();
        let img = buf.to_gray_image();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(2, 1).0, [200]);
        assert_eq!(img.get_pixel(0, 0).0, [0]);
    }
}
