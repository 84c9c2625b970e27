//! Scribble drawing engine - pixel buffer, brush, undo and classifier input
//!
//! This crate provides the core of the sketch canvas:
//! - [`surface::PixelBuffer`] - fixed-size 8-bit intensity grid
//! - [`brush`] - square brush stamp and Bresenham line rasterization
//! - [`pipeline::DrawingSurface`] - pointer state machine with undo history
//! - [`preprocess`] - crop/pad/resize of the drawing into classifier input
//! - [`types`] - grid points and display-to-grid coordinate mapping
//! - [`validation`] - coordinate and dimension checks

pub mod brush;
pub mod constants;
pub mod pipeline;
pub mod preprocess;
pub mod surface;
pub mod types;
pub mod validation;

pub use brush::*;
pub use constants::*;
pub use pipeline::*;
pub use preprocess::*;
pub use surface::*;
pub use types::*;
pub use validation::*;
