//! Meshes: polygon collections with a position and accumulated rotation.

use std::time::Duration;

use thiserror::Error;

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::polygon::Polygon;

/// Length of one rotation tick. A mesh rotates by its speed once per tick.
pub const ROTATION_TICK: Duration = Duration::from_millis(15);

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("face needs a multiple of 3 coordinates and at least 3 vertices, got {len} numbers")]
    InvalidFace { len: usize },

    #[error("unknown model `{0}`")]
    UnknownModel(String),

    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),
}

/// A named set of polygons sharing one rotation origin.
///
/// Polygons are shifted by `-origin` once at construction, so rotations in
/// the frame transform happen around that origin. Rotation angles are in
/// radians and grow by `rotation_speed` on every tick.
#[derive(Clone, Debug)]
pub struct Mesh {
    name: String,
    polygons: Vec<Polygon>,
    position: Vec3,
    rotation: Vec3,
    rotation_speed: Vec3,
}

impl Mesh {
    pub fn new(name: impl Into<String>, polygons: Vec<Polygon>, origin: Vec3) -> Self {
        let recenter = Mat4::translation(-origin);
        let polygons = polygons
            .iter()
            .map(|polygon| polygon.transformed(&recenter))
            .collect();

        Self {
            name: name.into(),
            polygons,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            rotation_speed: Vec3::ZERO,
        }
    }

    /// Builds a mesh from flat `[x1, y1, z1, ...]` face arrays.
    pub fn from_faces(
        name: impl Into<String>,
        faces: &[Vec<f32>],
        origin: Vec3,
    ) -> Result<Self, LoadError> {
        let polygons = faces
            .iter()
            .map(|coords| Polygon::from_coords(coords))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, polygons, origin))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Accumulated rotation around X, Y and Z in radians.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    pub fn rotation_speed(&self) -> Vec3 {
        self.rotation_speed
    }

    /// Radians added per tick on each axis.
    pub fn set_rotation_speed(&mut self, speed: Vec3) {
        self.rotation_speed = speed;
    }

    /// Advances the rotation by exactly one tick.
    pub fn tick(&mut self) {
        self.rotation = self.rotation + self.rotation_speed;
    }

    /// Advances the rotation by `dt`, measured in fractional ticks.
    pub fn advance_rotation(&mut self, dt: Duration) {
        let ticks = dt.as_secs_f32() / ROTATION_TICK.as_secs_f32();
        self.rotation = self.rotation + self.rotation_speed * ticks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle_faces() -> Vec<Vec<f32>> {
        vec![vec![1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0, 1.0]]
    }

    #[test]
    fn construction_recenters_on_origin() {
        let mesh = Mesh::from_faces("tri", &triangle_faces(), Vec3::ONE).unwrap();
        let vertices = mesh.polygons()[0].vertices();
        assert_relative_eq!(vertices[0], Vec3::ZERO);
        assert_relative_eq!(vertices[1], Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(vertices[2], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn new_mesh_is_stationary() {
        let mut mesh = Mesh::from_faces("tri", &triangle_faces(), Vec3::ZERO).unwrap();
        mesh.tick();
        mesh.advance_rotation(Duration::from_secs(1));
        assert_eq!(mesh.rotation(), Vec3::ZERO);
        assert_eq!(mesh.position(), Vec3::ZERO);
    }

    #[test]
    fn tick_adds_speed_once() {
        let mut mesh = Mesh::new("empty", Vec::new(), Vec3::ZERO);
        mesh.set_rotation_speed(Vec3::new(0.03, -0.03, 0.0));
        mesh.tick();
        mesh.tick();
        assert_relative_eq!(mesh.rotation(), Vec3::new(0.06, -0.06, 0.0));
    }

    #[test]
    fn advance_rotation_scales_with_elapsed_time() {
        let mut mesh = Mesh::new("empty", Vec::new(), Vec3::ZERO);
        mesh.set_rotation_speed(Vec3::new(0.0, 0.0, 0.1));
        mesh.advance_rotation(ROTATION_TICK * 10);
        assert_relative_eq!(mesh.rotation(), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn invalid_face_is_reported() {
        let faces = vec![vec![0.0, 0.0, 0.0, 1.0]];
        assert!(matches!(
            Mesh::from_faces("bad", &faces, Vec3::ZERO),
            Err(LoadError::InvalidFace { len: 4 })
        ));
    }
}
