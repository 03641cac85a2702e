//! Polygonal mesh faces.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::mesh::LoadError;
use crate::triangle::Triangle;
use crate::triangulate::{self, TriangulationError};

/// One planar face of a mesh, stored as an ordered loop of vertices.
///
/// The loop is closed: the last vertex connects back to the first. Use
/// [`Polygon::edges`] to walk the boundary instead of indexing by hand.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec3>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self { vertices }
    }

    /// Builds a face from a flat `[x1, y1, z1, x2, y2, z2, ...]` array.
    pub fn from_coords(coords: &[f32]) -> Result<Self, LoadError> {
        if coords.len() % 3 != 0 || coords.len() < 9 {
            return Err(LoadError::InvalidFace { len: coords.len() });
        }

        let vertices = coords
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Number of vertices (and also of edges, since the loop is closed).
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates over `(start, end)` for every boundary edge, including the
    /// closing edge from the last vertex to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Returns a new polygon with `transform` applied to every vertex.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|&v| transform.transform_point(v))
                .collect(),
        }
    }

    /// Splits the face into triangles by ear clipping.
    pub fn triangulate(&self) -> Result<Vec<Triangle>, TriangulationError> {
        triangulate::triangulate(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Polygon {
        Polygon::from_coords(&[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ])
        .unwrap()
    }

    #[test]
    fn from_coords_groups_triples() {
        let p = square();
        assert_eq!(p.len(), 4);
        assert_eq!(p.vertices()[2], Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn from_coords_rejects_bad_lengths() {
        assert!(matches!(
            Polygon::from_coords(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]),
            Err(LoadError::InvalidFace { len: 6 })
        ));
        assert!(matches!(
            Polygon::from_coords(&[0.0; 10]),
            Err(LoadError::InvalidFace { len: 10 })
        ));
    }

    #[test]
    fn edges_include_closing_edge() {
        let edges: Vec<_> = square().edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO));
    }

    #[test]
    fn transformed_returns_new_polygon() {
        let original = square();
        let moved = original.transformed(&Mat4::translation(Vec3::new(2.0, 0.0, -1.0)));

        assert_eq!(original.vertices()[0], Vec3::ZERO);
        assert_relative_eq!(moved.vertices()[0], Vec3::new(2.0, 0.0, -1.0));
        assert_relative_eq!(moved.vertices()[2], Vec3::new(3.0, 1.0, -1.0));
    }
}
