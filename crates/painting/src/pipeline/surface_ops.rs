//! Presentation helpers for the drawing surface

use crate::constants::RENDER_ALPHA;
use crate::surface::PixelBuffer;

use super::DrawingSurface;

/// Something that can display the full buffer
///
/// Presentation is always a full redraw; there are no partial updates.
pub trait RenderSink {
    fn present(&mut self, buffer: &PixelBuffer);
}

/// Expand a buffer to RGBA8 pixels: white background, black ink, opaque
pub fn render_rgba(buffer: &PixelBuffer) -> Vec<[u8; 4]> {
    buffer
        .pixels()
        .iter()
        .map(|&ink| {
            let v = 255 - ink;
            [v, v, v, RENDER_ALPHA]
        })
        .collect()
}

impl DrawingSurface {
    /// Present the current buffer to a sink
    pub fn render_to(&self, sink: &mut impl RenderSink) {
        sink.present(&self.buffer);
    }

    /// Current buffer as tightly packed RGBA bytes (for canvas `ImageData`)
    pub fn rgba_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice::<[u8; 4], u8>(&render_rgba(&self.buffer)).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Brush;
    use crate::constants::INK;
    use crate::types::GridPoint;

    struct CountingSink {
        frames: usize,
        last_ink: usize,
    }

    impl RenderSink for CountingSink {
        fn present(&mut self, buffer: &PixelBuffer) {
            self.frames += 1;
            self.last_ink = buffer.ink_count();
        }
    }

    #[test]
    fn test_render_rgba_colors() {
        let mut buf = PixelBuffer::with_brush(2, 1, Brush::new(0, INK)).unwrap();
        buf.set_brush(1.0, 0.0, INK).unwrap();
        let rgba = render_rgba(&buf);
        assert_eq!(rgba[0], [255, 255, 255, 255]);
        assert_eq!(rgba[1], [0, 0, 0, 255]);
    }

    #[test]
    fn test_rgba_bytes_length() {
        let surface = DrawingSurface::new(8, 4).unwrap();
        let bytes = surface.rgba_bytes();
        assert_eq!(bytes.len(), 8 * 4 * 4);
        assert!(bytes.iter().all(|&b| b == 255));
    }

    #[test]
    fn test_render_to_sink() {
        let mut surface = DrawingSurface::new(32, 32).unwrap();
        let mut sink = CountingSink {
            frames: 0,
            last_ink: 0,
        };

        if surface.pointer_down(Some(GridPoint::new(16, 16))).render {
            surface.render_to(&mut sink);
        }
        assert_eq!(sink.frames, 1);
        assert_eq!(sink.last_ink, surface.buffer().ink_count());
    }
}
