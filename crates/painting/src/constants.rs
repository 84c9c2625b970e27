pub use scribble_config::MAX_CANVAS_SIZE;

/// Blank (unpainted) cell intensity.
pub const BLANK: u8 = 0;

/// Fully inked cell intensity.
pub const INK: u8 = 255;

/// Alpha written for every rendered pixel (the canvas is always opaque).
pub const RENDER_ALPHA: u8 = 255;

/// Grid coordinates derived from device input are clamped to +/- this value,
/// which keeps line rasterization bounded for wild pointer samples.
pub const MAX_GRID_COORD: i32 = 1 << 16;
