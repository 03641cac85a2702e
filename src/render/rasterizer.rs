//! Scanline triangle fill with a depth test.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by Y so that `p1.y <= p2.y <= p3.y`
//! 2. **Walk rows** `i = 0 ..= floor(p3.y - p1.y)` below `p1`
//! 3. For each row, find point `a` on the long edge `p1 -> p3` and point `b`
//!    on the active short edge (`p1 -> p2` in the upper half, `p2 -> p3` in
//!    the lower half)
//! 4. **Fill the span** between `a` and `b`, interpolating `z` for the depth
//!    test
//!
//! ```text
//!        p1
//!        /\
//!       /  \   upper half: a on p1->p3, b on p1->p2
//!      /----\ p2
//!     /    /   lower half: a on p1->p3, b on p2->p3
//!    /  /
//!   p3
//! ```
//!
//! Pixels on the first or last column of a span, or on the first or last
//! row, are **edge pixels** and take the edge color. All others take the
//! fill color.

use crate::colors::Color;
use crate::math::vec3::Vec3;
use crate::render::framebuffer::{closeness, FrameBuffer};
use crate::triangle::Triangle;

/// Fills `triangle` into `buffer`, writing only pixels that pass the depth test.
///
/// Triangle coordinates are in screen space: X/Y in pixels, Z in the
/// projected `[-1, 1]` range. Pixels outside the buffer are skipped.
pub fn fill_triangle(triangle: &Triangle, fill: Color, edge: Color, buffer: &mut FrameBuffer) {
    let [p1, p2, p3] = triangle.sorted_by_y().points;

    let total_height = p3.y - p1.y;
    if !(total_height > 0.0) {
        // Flat triangle: a single span from the leftmost to the rightmost point.
        let left = leftmost(&[p1, p2, p3]);
        let right = rightmost(&[p1, p2, p3]);
        fill_span(buffer, p1.y.floor() as i64, left, right, true, fill, edge);
        return;
    }

    let first_half = p2.y - p1.y;
    let second_half = p3.y - p2.y;
    let last_row = total_height.floor() as i64;

    // Only rows that land on the surface are walked.
    let first_visible = ((-p1.y).ceil() as i64).max(0);
    let last_visible = ((buffer.height() as f32 - p1.y).ceil() as i64).min(last_row);

    for i in first_visible..=last_visible {
        let row = i as f32;
        let in_second_half = row > first_half || first_half == 0.0;
        let segment_height = if in_second_half { second_half } else { first_half };

        // Progress along the whole triangle and along the active segment.
        let alpha = row / total_height;
        let beta = if segment_height > 0.0 {
            let offset = if in_second_half { first_half } else { 0.0 };
            ((row - offset) / segment_height).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let a = p1.lerp(p3, alpha);
        let b = if in_second_half {
            p2.lerp(p3, beta)
        } else {
            p1.lerp(p2, beta)
        };

        let y = (p1.y + row).floor() as i64;
        let edge_row = i == 0 || i == last_row;
        fill_span(buffer, y, a, b, edge_row, fill, edge);
    }
}

fn fill_span(
    buffer: &mut FrameBuffer,
    y: i64,
    a: Vec3,
    b: Vec3,
    edge_row: bool,
    fill: Color,
    edge: Color,
) {
    if y < 0 || y >= buffer.height() as i64 {
        return;
    }

    let (left, right) = if a.x > b.x { (b, a) } else { (a, b) };
    let start = f64::from(left.x).floor();
    let end = f64::from(right.x).floor();
    let span = end - start;

    // Columns past either side are never visited, so clamping to one column
    // beyond the surface keeps the edge test below intact.
    let outside_right = f64::from(buffer.width());
    let x_start = start.clamp(-1.0, outside_right) as i64;
    let x_end = end.clamp(-1.0, outside_right) as i64;

    let first_visible = x_start.max(0);
    let last_visible = x_end.min(buffer.width() as i64 - 1);

    for x in first_visible..=last_visible {
        // [0 - 1] position across the span
        let t = if span == 0.0 {
            1.0
        } else {
            ((x as f64 - start) / span) as f32
        };
        let z = left.z + (right.z - left.z) * t;

        let is_edge = edge_row || x == x_start || x == x_end;
        let color = if is_edge { edge } else { fill };
        buffer.set_pixel(x as i32, y as i32, closeness(z), color);
    }
}

fn leftmost(points: &[Vec3]) -> Vec3 {
    points
        .iter()
        .copied()
        .fold(points[0], |best, p| if p.x < best.x { p } else { best })
}

fn rightmost(points: &[Vec3]) -> Vec3 {
    points
        .iter()
        .copied()
        .fold(points[0], |best, p| if p.x > best.x { p } else { best })
}
