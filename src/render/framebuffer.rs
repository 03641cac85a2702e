//! Pixel and depth buffers for one frame.
//!
//! The depth buffer stores **closeness**: the projected `z` (expected in
//! `[-1, 1]`, -1 nearest) mapped onto `[0, 255]` and inverted, so larger
//! values are closer to the viewer. Both buffers start zeroed, which means
//! "transparent" and "nothing drawn yet".

use std::path::Path;

use image::{ImageResult, Rgba, RgbaImage};

use crate::colors::{self, Color};

/// Maps a projected depth onto the 8-bit closeness range.
///
/// `closeness = round(255 - (z + 1) / 2 * 255)`, clamped to `[0, 255]`.
/// NaN maps to 0 and therefore never passes the depth test.
///
/// The depth test compares these clamped values, so every sample nearer
/// than `z = -1` ties at 255 and cannot replace a pixel already at 255.
#[inline]
pub fn closeness(z: f32) -> u8 {
    let value = (255.0 - (z + 1.0) / 2.0 * 255.0).round();
    if value.is_nan() {
        0
    } else {
        value.clamp(0.0, 255.0) as u8
    }
}

/// Owned RGBA color buffer plus a closeness buffer of the same size.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    color: Vec<u8>,
    depth: Vec<u8>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            color: vec![0; size * 4],
            depth: vec![0; size],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Write a pixel if `closeness` is strictly greater than the stored value.
    ///
    /// Silently ignores out-of-bounds coordinates. Returns whether the pixel
    /// was written.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, closeness: u8, color: Color) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if closeness > self.depth[idx] {
            self.depth[idx] = closeness;
            self.color[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_array());
            true
        } else {
            false
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| {
            let mut rgba = [0u8; 4];
            rgba.copy_from_slice(&self.color[idx * 4..idx * 4 + 4]);
            Color::from_array(rgba)
        })
    }

    /// Get the closeness at (x, y), or None if out of bounds.
    pub fn depth_at(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|idx| self.depth[idx])
    }

    /// Row-major RGBA bytes, 4 per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.color
    }

    pub fn depth_buffer(&self) -> &[u8] {
        &self.depth
    }

    /// Overwrites every pixel with an opaque gray of its closeness.
    pub fn render_depth(&mut self) {
        for (pixel, &tone) in self.color.chunks_exact_mut(4).zip(&self.depth) {
            pixel.copy_from_slice(&Color::gray(tone).to_array());
        }
    }

    /// Blends the frame over an opaque background, for surfaces without alpha.
    pub fn composite_over(&self, background: Color) -> Vec<u8> {
        self.color
            .chunks_exact(4)
            .flat_map(|p| {
                let alpha = p[3] as u32;
                let blend = |fg: u8, bg: u8| -> u8 {
                    ((fg as u32 * alpha + bg as u32 * (255 - alpha)) / 255) as u8
                };
                [
                    blend(p[0], background.r),
                    blend(p[1], background.g),
                    blend(p[2], background.b),
                    255,
                ]
            })
            .collect()
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let color = self
                .pixel(x as i32, y as i32)
                .unwrap_or(colors::TRANSPARENT);
            Rgba(color.to_array())
        })
    }

    /// Saves the frame as an image; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_image().save(path)
    }
}
