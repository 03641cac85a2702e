//! Named collections of flat face arrays.
//!
//! A [`ModelLibrary`] maps a model name to its faces, each face a flat
//! `[x1, y1, z1, x2, y2, z2, ...]` coordinate list. Libraries come from JSON
//! (`{"name": [[...], [...]]}`) or straight from Wavefront OBJ files, and
//! turn into [`Mesh`] values on demand.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::math::vec3::Vec3;
use crate::mesh::{LoadError, Mesh};

/// Flat coordinate list of one face.
pub type Face = Vec<f32>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelLibrary {
    models: BTreeMap<String, Vec<Face>>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Models that ship with the crate: a `cube` of edge 2 around the origin,
    /// unit-length coordinate `axes` and a distant `horizon` line.
    pub fn builtin() -> Self {
        let mut library = Self::new();
        library.insert("cube", cube_faces());
        library.insert("axes", axes_faces());
        library.insert("horizon", horizon_faces());
        library
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path.as_ref())?;
        let library = Self::from_json_str(&text)?;
        info!(
            "loaded {} models from {}",
            library.len(),
            path.as_ref().display()
        );
        Ok(library)
    }

    /// Loads every object of an OBJ file as a separate model.
    ///
    /// Faces keep their polygon shape; they are not triangulated on load.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let options = tobj::LoadOptions {
            single_index: false,
            triangulate: false,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path.as_ref(), &options)?;

        let mut library = Self::new();
        for model in models {
            let faces = obj_faces(&model.mesh);
            info!("OBJ object `{}`: {} faces", model.name, faces.len());
            library.insert(model.name, faces);
        }
        Ok(library)
    }

    /// Loads an OBJ file when the extension is `.obj`, JSON otherwise.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let is_obj = path
            .as_ref()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
        if is_obj {
            Self::from_obj(path)
        } else {
            Self::from_json_file(path)
        }
    }

    pub fn to_json_string(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, faces: Vec<Face>) {
        self.models.insert(name.into(), faces);
    }

    /// Adds every model of `other`, replacing models with the same name.
    pub fn merge(&mut self, other: ModelLibrary) {
        self.models.extend(other.models);
    }

    pub fn faces(&self, name: &str) -> Option<&[Face]> {
        self.models.get(name).map(Vec::as_slice)
    }

    /// Model names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Builds a mesh from the named model, rotating around `origin`.
    pub fn mesh(&self, name: &str, origin: Vec3) -> Result<Mesh, LoadError> {
        let faces = self
            .faces(name)
            .ok_or_else(|| LoadError::UnknownModel(name.to_string()))?;
        Mesh::from_faces(name, faces, origin)
    }
}

/// Expands indexed OBJ faces into flat coordinate lists.
fn obj_faces(mesh: &tobj::Mesh) -> Vec<Face> {
    let vertex = |index: u32| {
        let i = index as usize * 3;
        [
            mesh.positions[i],
            mesh.positions[i + 1],
            mesh.positions[i + 2],
        ]
    };

    // tobj leaves face_arities empty when every face is a triangle.
    let arities: Vec<usize> = if mesh.face_arities.is_empty() {
        vec![3; mesh.indices.len() / 3]
    } else {
        mesh.face_arities.iter().map(|&a| a as usize).collect()
    };

    let mut faces = Vec::with_capacity(arities.len());
    let mut offset = 0;
    for arity in arities {
        if arity < 3 {
            warn!("skipping OBJ face with {arity} vertices");
            offset += arity;
            continue;
        }
        let face = mesh.indices[offset..offset + arity]
            .iter()
            .flat_map(|&index| vertex(index))
            .collect();
        faces.push(face);
        offset += arity;
    }
    faces
}

fn cube_faces() -> Vec<Face> {
    #[rustfmt::skip]
    let faces = vec![
        // front (z = 1)
        vec![-1.0, -1.0, 1.0,  1.0, -1.0, 1.0,  1.0, 1.0, 1.0,  -1.0, 1.0, 1.0],
        // back (z = -1)
        vec![1.0, -1.0, -1.0,  -1.0, -1.0, -1.0,  -1.0, 1.0, -1.0,  1.0, 1.0, -1.0],
        // right (x = 1)
        vec![1.0, -1.0, 1.0,  1.0, -1.0, -1.0,  1.0, 1.0, -1.0,  1.0, 1.0, 1.0],
        // left (x = -1)
        vec![-1.0, -1.0, -1.0,  -1.0, -1.0, 1.0,  -1.0, 1.0, 1.0,  -1.0, 1.0, -1.0],
        // top (y = 1)
        vec![-1.0, 1.0, 1.0,  1.0, 1.0, 1.0,  1.0, 1.0, -1.0,  -1.0, 1.0, -1.0],
        // bottom (y = -1)
        vec![-1.0, -1.0, -1.0,  1.0, -1.0, -1.0,  1.0, -1.0, 1.0,  -1.0, -1.0, 1.0],
    ];
    faces
}

/// One sliver triangle per axis; its outline reads as a line.
fn axes_faces() -> Vec<Face> {
    #[rustfmt::skip]
    let faces = vec![
        vec![0.0, 0.0, 0.0,  1.0, 0.0, 0.0,  0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0,  0.0, 1.0, 0.0,  0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0,  0.0, 0.0, 1.0,  0.0, 0.0, 0.0],
    ];
    faces
}

/// A wide line far behind the scene, standing in for the horizon.
fn horizon_faces() -> Vec<Face> {
    vec![vec![
        -HORIZON_HALF_WIDTH, 0.0, -HORIZON_DISTANCE,
        HORIZON_HALF_WIDTH, 0.0, -HORIZON_DISTANCE,
        -HORIZON_HALF_WIDTH, 0.0, -HORIZON_DISTANCE,
    ]]
}

const HORIZON_DISTANCE: f32 = 1000.0;
const HORIZON_HALF_WIDTH: f32 = 10_000.0;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_json_models() {
        let json = r#"{"tri": [[0, 0, 0, 1, 0, 0, 0, 1, 0]], "empty": []}"#;
        let library = ModelLibrary::from_json_str(json).unwrap();

        assert_eq!(library.len(), 2);
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["empty", "tri"]);
        assert_eq!(library.faces("tri").unwrap()[0].len(), 9);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ModelLibrary::from_json_str("{\"tri\": [1, 2]}"),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn json_round_trip_preserves_models() {
        let library = ModelLibrary::builtin();
        let json = library.to_json_string().unwrap();
        assert_eq!(ModelLibrary::from_json_str(&json).unwrap(), library);
    }

    #[test]
    fn merge_replaces_same_names() {
        let mut library = ModelLibrary::builtin();
        let mut other = ModelLibrary::new();
        other.insert("cube", vec![vec![0.0; 9]]);
        other.insert("tri", vec![vec![0.0; 9]]);
        library.merge(other);

        assert_eq!(library.len(), 4);
        assert_eq!(library.faces("cube").unwrap().len(), 1);
    }

    #[test]
    fn unknown_model_is_an_error() {
        let library = ModelLibrary::builtin();
        assert!(matches!(
            library.mesh("teapot", Vec3::ZERO),
            Err(LoadError::UnknownModel(name)) if name == "teapot"
        ));
    }

    #[test]
    fn builtin_cube_becomes_mesh() {
        let mesh = ModelLibrary::builtin().mesh("cube", Vec3::ZERO).unwrap();
        assert_eq!(mesh.name(), "cube");
        assert_eq!(mesh.polygons().len(), 6);
        assert!(mesh.polygons().iter().all(|p| p.len() == 4));
    }

    #[test]
    fn builtin_names() {
        let library = ModelLibrary::builtin();
        assert_eq!(
            library.names().collect::<Vec<_>>(),
            vec!["axes", "cube", "horizon"]
        );
    }

    #[test]
    fn cube_faces_triangulate() {
        let mesh = ModelLibrary::builtin().mesh("cube", Vec3::ZERO).unwrap();
        for polygon in mesh.polygons() {
            assert_eq!(polygon.triangulate().unwrap().len(), 2);
        }
    }

    #[test]
    fn loads_polygon_faces_from_obj() {
        let path = std::env::temp_dir().join(format!("polyraster-{}.obj", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            writeln!(file, "o quad").unwrap();
            writeln!(file, "v 0 0 0").unwrap();
            writeln!(file, "v 1 0 0").unwrap();
            writeln!(file, "v 1 1 0").unwrap();
            writeln!(file, "v 0 1 0").unwrap();
            writeln!(file, "f 1 2 3 4").unwrap();
        }

        let library = ModelLibrary::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let faces = library.faces("quad").unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!(
            faces[0],
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            ModelLibrary::from_json_file("/nonexistent/models.json"),
            Err(LoadError::Io(_))
        ));
    }
}
