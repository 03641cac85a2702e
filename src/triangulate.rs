//! Ear-clipping triangulation of polygonal faces.
//!
//! # Algorithm
//!
//! 1. Walk the current vertex ring looking for an **ear**: a vertex whose
//!    neighbours can be joined by a diagonal that crosses no other edge of
//!    the ring.
//! 2. Emit the triangle `(prev, ear, next)` and drop the ear from the ring.
//! 3. Repeat until three vertices remain; they form the last triangle.
//!
//! ```text
//!   prev ______ next         prev ______ next
//!       \      /                 \      /
//!        \ ear/        =>         \    /   + triangle (prev, ear, next)
//!         \  /                     ----
//!          \/
//! ```
//!
//! Intersections are tested on the XY projection of the ring, which is the
//! screen plane once a face has gone through the viewport transform.
//!
//! # Limitations
//!
//! Only the diagonal-crossing test is applied. A reflex vertex whose
//! diagonal runs outside the polygon without crossing an edge is still
//! accepted as an ear, so some concave faces are filled incorrectly. Rings
//! where every diagonal crosses an edge produce
//! [`TriangulationError::NoEarFound`].

use thiserror::Error;

use crate::math::vec3::Vec3;
use crate::triangle::Triangle;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TriangulationError {
    #[error("polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("no ear found among {remaining} remaining vertices")]
    NoEarFound { remaining: usize },
}

/// Splits a closed vertex loop into `len - 2` triangles.
pub fn triangulate(polygon: &[Vec3]) -> Result<Vec<Triangle>, TriangulationError> {
    if polygon.len() < 3 {
        return Err(TriangulationError::TooFewVertices {
            count: polygon.len(),
        });
    }

    let mut ring = polygon.to_vec();
    let mut triangles = Vec::with_capacity(ring.len() - 2);

    while ring.len() > 3 {
        let ear = find_ear(&ring).ok_or(TriangulationError::NoEarFound {
            remaining: ring.len(),
        })?;
        let (prev, next) = neighbours(ear, ring.len());

        triangles.push(Triangle::new(ring[prev], ring[ear], ring[next]));
        ring.remove(ear);
    }
    triangles.push(Triangle::new(ring[0], ring[1], ring[2]));

    Ok(triangles)
}

/// Returns true when segments `a` and `b` intersect, endpoints included.
///
/// Parallel segments never intersect (the intersection parameters are not
/// finite).
pub fn edges_intersect(a: (Vec3, Vec3), b: (Vec3, Vec3)) -> bool {
    let a_body = a.1 - a.0;
    let b_body = b.1 - b.0;

    let ta = intersection_coefficient(a.0, a_body, b.0, b_body);
    let tb = intersection_coefficient(b.0, b_body, a.0, a_body);

    (0.0..=1.0).contains(&ta) && (0.0..=1.0).contains(&tb)
}

/// Parameter `t` along the first segment where it meets the line through
/// the second one: `e1_start + e1_body * t`.
fn intersection_coefficient(e1_start: Vec3, e1_body: Vec3, e2_start: Vec3, e2_body: Vec3) -> f32 {
    let upper = (e2_start - e1_start).cross_2d(e2_body);
    let lower = e1_body.cross_2d(e2_body);
    upper / lower
}

#[inline]
fn neighbours(index: usize, len: usize) -> (usize, usize) {
    let prev = if index == 0 { len - 1 } else { index - 1 };
    let next = if index == len - 1 { 0 } else { index + 1 };
    (prev, next)
}

fn find_ear(ring: &[Vec3]) -> Option<usize> {
    (0..ring.len()).find(|&index| {
        let (prev, next) = neighbours(index, ring.len());
        !diagonal_crosses_ring(ring, prev, next)
    })
}

/// Tests the diagonal `ring[from] -> ring[to]` against every ring edge that
/// does not end on `from` or `to`. Those edges meet the diagonal at an
/// endpoint by construction.
fn diagonal_crosses_ring(ring: &[Vec3], from: usize, to: usize) -> bool {
    let diagonal = (ring[from], ring[to]);
    (0..ring.len()).any(|start| {
        let end = (start + 1) % ring.len();
        if [start, end].iter().any(|&k| k == from || k == to) {
            return false;
        }
        edges_intersect(diagonal, (ring[start], ring[end]))
    })
}
