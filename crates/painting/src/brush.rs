//! Square brush and line rasterization
//!
//! Strokes are rasterized as integer Bresenham lines with the brush stamped at
//! every step, so two pointer samples far apart still produce a continuous
//! stroke.

use scribble_config::{DEFAULT_BRUSH_RADIUS, DEFAULT_INK};

use crate::types::GridPoint;

/// Square brush stamped at each rasterized point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    /// Half-width of the stamp. The stamp covers `2 * radius` cells per side,
    /// or just the center cell when the radius is 0.
    pub radius: u32,
    /// Intensity written into every covered cell
    pub value: u8,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BRUSH_RADIUS,
            value: DEFAULT_INK,
        }
    }
}

impl Brush {
    pub fn new(radius: u32, value: u8) -> Self {
        Self { radius, value }
    }

    /// Half-open column and row ranges covered by a stamp centered at (cx, cy)
    ///
    /// The ranges may extend past the buffer; callers clip them.
    pub fn footprint(&self, cx: i32, cy: i32) -> (std::ops::Range<i64>, std::ops::Range<i64>) {
        let r = self.radius as i64;
        let (cx, cy) = (cx as i64, cy as i64);
        if r == 0 {
            return (cx..cx + 1, cy..cy + 1);
        }
        (cx - r..cx + r, cy - r..cy + r)
    }
}

/// Iterator over the cells of a Bresenham line, both endpoints included
#[derive(Debug, Clone)]
pub struct LinePoints {
    x: i32,
    y: i32,
    x1: i32,
    y1: i32,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl LinePoints {
    pub fn new(from: GridPoint, to: GridPoint) -> Self {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        Self {
            x: from.x,
            y: from.y,
            x1: to.x,
            y1: to.y,
            dx,
            dy,
            sx: if from.x < to.x { 1 } else { -1 },
            sy: if from.y < to.y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for LinePoints {
    type Item = GridPoint;

    fn next(&mut self) -> Option<GridPoint> {
        if self.done {
            return None;
        }
        let point = GridPoint::new(self.x, self.y);
        if self.x == self.x1 && self.y == self.y1 {
            self.done = true;
            return Some(point);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brush_default() {
        let brush = Brush::default();
        assert_eq!(brush.radius, DEFAULT_BRUSH_RADIUS);
        assert_eq!(brush.value, DEFAULT_INK);
    }

    #[test]
    fn test_footprint() {
        let (xs, ys) = Brush::new(5, 255).footprint(100, 10);
        assert_eq!(xs, 95..105);
        assert_eq!(ys, 5..15);

        let (xs, ys) = Brush::new(0, 255).footprint(3, 4);
        assert_eq!(xs, 3..4);
        assert_eq!(ys, 4..5);
    }

    #[test]
    fn test_line_single_point() {
        let p = GridPoint::new(7, 7);
        let points: Vec<_> = LinePoints::new(p, p).collect();
        assert_eq!(points, vec![p]);
    }

    #[test]
    fn test_line_endpoints_and_steps() {
        let from = GridPoint::new(10, 2);
        let to = GridPoint::new(-3, 8);
        let points: Vec<_> = LinePoints::new(from, to).collect();

        assert_eq!(points.first(), Some(&from));
        assert_eq!(points.last(), Some(&to));
        // One cell per step along the major axis
        assert_eq!(points.len(), 14);
        for pair in points.windows(2) {
            assert_eq!(pair[0].chebyshev(pair[1]), 1);
        }
    }

    #[test]
    fn test_line_is_symmetric_in_length() {
        let a = GridPoint::new(0, 0);
        let b = GridPoint::new(5, 17);
        assert_eq!(
            LinePoints::new(a, b).count(),
            LinePoints::new(b, a).count()
        );
    }
}
