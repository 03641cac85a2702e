//! Depth-tested line drawing for polygon outlines.

use crate::colors::Color;
use crate::math::vec3::Vec3;
use crate::polygon::Polygon;
use crate::render::framebuffer::{closeness, FrameBuffer};

/// Closeness used for every pixel of a line drawn with `override_depth`.
pub const OVERRIDE_CLOSENESS: u8 = u8::MAX;

/// Lines are clipped to the surface grown by this many surface extents
/// (`width + height`) on every side before rasterization.
const GUARD_EXTENTS: f64 = 4.0;

/// Draws a line between two screen-space points using Bresenham's algorithm.
///
/// Endpoints are floored to pixels. For **steep** lines (more vertical than
/// horizontal) X and Y swap roles so the loop always walks the major axis.
/// The error term grows by `|dy|` per step and moves the minor axis by one
/// pixel whenever it passes half of `dx` (kept in integers, doubled, so the
/// comparison is exact).
///
/// Depth is interpolated linearly along the major axis. With
/// `override_depth` every pixel uses [`OVERRIDE_CLOSENESS`] instead, so the
/// line draws on top of anything not already at maximum closeness.
///
/// Segments reaching far outside the surface are cut down to a guard box
/// around it first; lines with a non-finite coordinate are skipped.
pub fn draw_line(
    from: Vec3,
    to: Vec3,
    color: Color,
    override_depth: bool,
    buffer: &mut FrameBuffer,
) {
    let Some((from, to)) = clip_to_guard(from, to, buffer.width(), buffer.height()) else {
        return;
    };

    let (x1, y1) = (from.x.floor() as i64, from.y.floor() as i64);
    let (x2, y2) = (to.x.floor() as i64, to.y.floor() as i64);

    let steep = (x1 - x2).abs() < (y1 - y2).abs();
    let (mut x1, mut y1, mut z1, mut x2, mut y2, mut z2) = if steep {
        (y1, x1, from.z, y2, x2, to.z)
    } else {
        (x1, y1, from.z, x2, y2, to.z)
    };

    if x1 > x2 {
        std::mem::swap(&mut x1, &mut x2);
        std::mem::swap(&mut y1, &mut y2);
        std::mem::swap(&mut z1, &mut z2);
    }

    let dx = x2 - x1;
    let derror2 = (y2 - y1).abs() * 2;
    let y_step = if y2 > y1 { 1 } else { -1 };

    // Major-axis extent of the surface; pixels past it are never visible.
    let limit = i64::from(if steep { buffer.height() } else { buffer.width() });
    if x2 < 0 || x1 >= limit {
        return;
    }

    let mut error2 = 0i64;
    let mut y = y1;
    let mut x = x1;

    if x < 0 {
        // Jump straight to the surface edge. After `k` steps the minor axis
        // has moved `ceil((k * derror2 - dx) / (2 * dx))` times.
        let skipped = -x;
        let accumulated = skipped * derror2;
        let minor_steps = div_ceil(accumulated - dx, 2 * dx).max(0);
        y += y_step * minor_steps;
        error2 = accumulated - minor_steps * 2 * dx;
        x = 0;
    }

    while x <= x2 && x < limit {
        let t = if dx == 0 {
            0.0
        } else {
            (x - x1) as f32 / dx as f32
        };
        let depth = z1 + (z2 - z1) * t;
        let sample = if override_depth {
            OVERRIDE_CLOSENESS
        } else {
            closeness(depth)
        };

        let (px, py) = if steep { (y, x) } else { (x, y) };
        if let (Ok(px), Ok(py)) = (i32::try_from(px), i32::try_from(py)) {
            buffer.set_pixel(px, py, sample, color);
        }

        error2 += derror2;
        if error2 > dx {
            y += y_step;
            error2 -= 2 * dx;
        }
        x += 1;
    }
}

/// Ceiling division for a positive divisor.
fn div_ceil(numerator: i64, divisor: i64) -> i64 {
    let quotient = numerator.div_euclid(divisor);
    if numerator.rem_euclid(divisor) > 0 {
        quotient + 1
    } else {
        quotient
    }
}

/// Axis-aligned box around the surface that lines are clipped to.
#[derive(Clone, Copy, Debug)]
struct GuardBox {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl GuardBox {
    fn around(width: u32, height: u32) -> Self {
        let margin = (f64::from(width) + f64::from(height)) * GUARD_EXTENTS;
        Self {
            min_x: -margin,
            max_x: f64::from(width) + margin,
            min_y: -margin,
            max_y: f64::from(height) + margin,
        }
    }

    fn contains(&self, p: Vec3) -> bool {
        (self.min_x..=self.max_x).contains(&f64::from(p.x))
            && (self.min_y..=self.max_y).contains(&f64::from(p.y))
    }

    /// Liang-Barsky: the `[enter, exit]` parameter range of `from -> to`
    /// inside the box, or `None` when the segment misses it.
    fn clip_range(&self, from: Vec3, to: Vec3) -> Option<(f64, f64)> {
        let (x0, y0) = (f64::from(from.x), f64::from(from.y));
        let dx = f64::from(to.x) - x0;
        let dy = f64::from(to.y) - y0;

        let mut enter = 0.0f64;
        let mut exit = 1.0f64;
        for (p, q) in [
            (-dx, x0 - self.min_x),
            (dx, self.max_x - x0),
            (-dy, y0 - self.min_y),
            (dy, self.max_y - y0),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else if p < 0.0 {
                enter = enter.max(q / p);
            } else {
                exit = exit.min(q / p);
            }
        }
        (enter <= exit).then_some((enter, exit))
    }
}

/// Point at parameter `t` of `a -> b`, computed in double precision.
fn point_along(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    let along = |from: f32, to: f32| (f64::from(from) + (f64::from(to) - f64::from(from)) * t) as f32;
    Vec3::new(along(a.x, b.x), along(a.y, b.y), along(a.z, b.z))
}

/// Cuts the segment down to the guard box around a `width` x `height`
/// surface. Returns `None` when nothing of it is inside.
///
/// Each clipped endpoint is measured from the original endpoint nearer to
/// it, so a segment with one endpoint on the surface keeps that endpoint
/// and the direction it had.
fn clip_to_guard(from: Vec3, to: Vec3, width: u32, height: u32) -> Option<(Vec3, Vec3)> {
    if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
        return None;
    }

    let guard = GuardBox::around(width, height);
    if guard.contains(from) && guard.contains(to) {
        return Some((from, to));
    }

    let (t_enter, t_exit) = guard.clip_range(from, to)?;
    let (s_enter, s_exit) = guard.clip_range(to, from)?;

    let start = if t_enter <= 0.5 {
        point_along(from, to, t_enter)
    } else {
        point_along(to, from, s_exit)
    };
    let end = if s_enter <= 0.5 {
        point_along(to, from, s_enter)
    } else {
        point_along(from, to, t_exit)
    };
    Some((start, end))
}

/// Draws every boundary edge of `polygon`, including the closing edge.
pub fn draw_polygon_outline(
    polygon: &Polygon,
    color: Color,
    override_depth: bool,
    buffer: &mut FrameBuffer,
) {
    for (start, end) in polygon.edges() {
        draw_line(start, end, color, override_depth, buffer);
    }
}
