//! Classifier input preparation
//!
//! Turns the full-resolution drawing into the classifier's small square input:
//! normalize, find the ink bounding box, pad it by a margin, crop, pad the crop
//! to a square and resample. Cropping first keeps small drawings legible at
//! the target resolution instead of shrinking a mostly blank canvas.

use image::{imageops, GrayImage, ImageBuffer, Luma};
use scribble_config::{CanvasConfig, DEFAULT_CROP_MARGIN, DEFAULT_INPUT_SIZE};
use tracing::debug;

use crate::surface::PixelBuffer;

/// Single-channel float image with values in [0, 1]
pub type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Inclusive extremal ink coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub y_min: u32,
    pub y_max: u32,
    pub x_min: u32,
    pub x_max: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    pub fn height(&self) -> u32 {
        self.y_max - self.y_min + 1
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }

    /// Grow by `margin` on every side, clamped to a `width` x `height` grid
    pub fn padded(&self, margin: u32, width: u32, height: u32) -> Self {
        Self {
            y_min: self.y_min.saturating_sub(margin),
            y_max: self.y_max.saturating_add(margin).min(height.saturating_sub(1)),
            x_min: self.x_min.saturating_sub(margin),
            x_max: self.x_max.saturating_add(margin).min(width.saturating_sub(1)),
        }
    }
}

/// The fixed-size square image handed to the classifier
#[derive(Debug, Clone, PartialEq)]
pub struct SquareImage {
    image: FloatImage,
}

impl SquareImage {
    /// Wrap a float image, None unless it is square and non-empty
    pub fn new(image: FloatImage) -> Option<Self> {
        let (w, h) = image.dimensions();
        (w == h && w > 0).then_some(Self { image })
    }

    /// Build from row-major values, None if `data.len() != size * size`
    pub fn from_vec(size: u32, data: Vec<f32>) -> Option<Self> {
        FloatImage::from_raw(size, size, data).and_then(Self::new)
    }

    /// Side length
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Row-major values
    pub fn as_slice(&self) -> &[f32] {
        self.image.as_raw()
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.image.get_pixel(x, y)[0]
    }

    pub fn image(&self) -> &FloatImage {
        &self.image
    }

    /// Quantize to 8-bit grayscale (ink is bright), for debugging dumps
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.size(), self.size(), |x, y| {
            Luma([(self.get(x, y).clamp(0.0, 1.0) * 255.0).round() as u8])
        })
    }
}

/// Result of preparing a drawing for classification
#[derive(Debug, Clone, PartialEq)]
pub enum Preprocessed {
    /// Nothing has been drawn; the classifier should not be consulted
    Empty,
    /// The resampled input and the padded box it was cropped from
    Ready {
        bounds: BoundingBox,
        image: SquareImage,
    },
}

impl Preprocessed {
    pub fn image(&self) -> Option<&SquareImage> {
        match self {
            Preprocessed::Empty => None,
            Preprocessed::Ready { image, .. } => Some(image),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Preprocessed::Empty)
    }
}

/// Crop / pad / resize pipeline producing classifier input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preprocessor {
    /// Margin added around the ink bounding box
    pub margin: u32,
    /// Output side length
    pub target_size: u32,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            margin: DEFAULT_CROP_MARGIN,
            target_size: DEFAULT_INPUT_SIZE,
        }
    }
}

impl Preprocessor {
    pub fn new(margin: u32, target_size: u32) -> Self {
        Self {
            margin,
            target_size: target_size.max(1),
        }
    }

    pub fn from_config(config: &CanvasConfig) -> Self {
        Self::new(config.crop_margin, config.input_size)
    }

    /// Prepare a drawing for the classifier
    pub fn prepare(&self, buffer: &PixelBuffer) -> Preprocessed {
        let normalized = normalize(buffer);

        let max = normalized.pixels().fold(0.0f32, |acc, p| acc.max(p[0]));
        if !(max > 0.0) {
            debug!("Preprocess: empty drawing");
            return Preprocessed::Empty;
        }

        let Some(ink) = bounding_box(&normalized) else {
            return Preprocessed::Empty;
        };
        let bounds = ink.padded(self.margin, buffer.width(), buffer.height());

        let cropped = crop(&normalized, &bounds);
        let square = pad_to_square(&cropped);
        let resized = resize_bilinear(&square, self.target_size, self.target_size);

        debug!(
            "Preprocess: ink box y={}..={} x={}..={}, padded to {}x{}, resized to {}",
            ink.y_min,
            ink.y_max,
            ink.x_min,
            ink.x_max,
            bounds.width(),
            bounds.height(),
            self.target_size
        );

        match SquareImage::new(resized) {
            Some(image) => Preprocessed::Ready { bounds, image },
            None => Preprocessed::Empty,
        }
    }
}

/// Scale raw intensities to [0, 1]
pub fn normalize(buffer: &PixelBuffer) -> FloatImage {
    let stride = buffer.width() as usize;
    let pixels = buffer.pixels();
    FloatImage::from_fn(buffer.width(), buffer.height(), |x, y| {
        Luma([pixels[(y as usize) * stride + (x as usize)] as f32 / 255.0])
    })
}

/// Smallest box containing every pixel with a value above zero
pub fn bounding_box(image: &FloatImage) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;
    for (x, y, p) in image.enumerate_pixels() {
        if !(p[0] > 0.0) {
            continue;
        }
        bounds = Some(match bounds {
            None => BoundingBox {
                y_min: y,
                y_max: y,
                x_min: x,
                x_max: x,
            },
            Some(b) => BoundingBox {
                y_min: b.y_min.min(y),
                y_max: b.y_max.max(y),
                x_min: b.x_min.min(x),
                x_max: b.x_max.max(x),
            },
        });
    }
    bounds
}

/// Copy the region covered by `bounds`
pub fn crop(image: &FloatImage, bounds: &BoundingBox) -> FloatImage {
    imageops::crop_imm(
        image,
        bounds.x_min,
        bounds.y_min,
        bounds.width(),
        bounds.height(),
    )
    .to_image()
}

/// Center an image on a zero-filled square canvas
///
/// When the padding cannot be split evenly, the extra pixel goes to the
/// bottom / right edge.
pub fn pad_to_square(image: &FloatImage) -> FloatImage {
    let (w, h) = image.dimensions();
    let side = w.max(h);
    let left = (side - w) / 2;
    let top = (side - h) / 2;

    let mut square = FloatImage::new(side, side);
    imageops::replace(&mut square, image, left as i64, top as i64);
    square
}

/// Bilinear resample using TensorFlow's legacy `resize_bilinear` sampling
///
/// Output pixel `d` samples source position `d * in / out` (no half-pixel
/// offset), interpolating with the next pixel clamped at the edge. The
/// classifier was trained on inputs produced this way.
pub fn resize_bilinear(image: &FloatImage, out_width: u32, out_height: u32) -> FloatImage {
    let (in_w, in_h) = image.dimensions();
    if in_w == 0 || in_h == 0 {
        return FloatImage::new(out_width, out_height);
    }
    let scale_x = in_w as f32 / out_width as f32;
    let scale_y = in_h as f32 / out_height as f32;

    FloatImage::from_fn(out_width, out_height, |dx, dy| {
        let sy = dy as f32 * scale_y;
        let y0 = (sy.floor() as u32).min(in_h - 1);
        let y1 = (y0 + 1).min(in_h - 1);
        let fy = sy - y0 as f32;

        let sx = dx as f32 * scale_x;
        let x0 = (sx.floor() as u32).min(in_w - 1);
        let x1 = (x0 + 1).min(in_w - 1);
        let fx = sx - x0 as f32;

        let top = lerp(image.get_pixel(x0, y0)[0], image.get_pixel(x1, y0)[0], fx);
        let bottom = lerp(image.get_pixel(x0, y1)[0], image.get_pixel(x1, y1)[0], fx);
        Luma([lerp(top, bottom, fy)])
    })
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
