//! Rasterization into a depth-tested frame buffer.
//!
//! - [`rasterizer::fill_triangle`]: scanline triangle fill with edge/fill colors
//! - [`line::draw_line`]: Bresenham line with optional depth override
//! - [`framebuffer::FrameBuffer`]: owned RGBA pixels plus 8-bit closeness

pub mod framebuffer;
pub mod line;
pub mod rasterizer;

pub use framebuffer::{closeness, FrameBuffer};
pub use line::{draw_line, draw_polygon_outline};
pub use rasterizer::fill_triangle;
