//! A CPU software renderer for polygon meshes.
//!
//! Meshes are lists of planar polygons. Each frame every polygon is
//! transformed to screen space, split into triangles by ear clipping,
//! classified as facing towards or away from the viewer and drawn as a
//! depth-tested outline, with an optional triangle overlay. Rendering never
//! touches a window; SDL2 is only used by the viewer binary to display
//! finished frames.
//!
//! # Quick Start
//!
//! ```ignore
//! use polyraster::prelude::*;
//!
//! let library = ModelLibrary::builtin();
//! let cube = library.mesh("cube", Vec3::ZERO)?;
//! let inputs = ViewInputs::new(cube.rotation());
//! let config = ProjectionMode::Freecam.frame_config(&inputs, 800, 600, true, false);
//! let frame = render(&[cube], &config)?;
//! frame.save("cube.png")?;
//! ```

pub mod colors;
pub mod engine;
pub mod math;
pub mod mesh;
pub mod model;
pub mod polygon;
pub mod projection;
pub mod render;
pub mod triangle;
pub mod triangulate;
pub mod window;

pub use engine::{render, FrameConfig, ViewSettings};
pub use mesh::{LoadError, Mesh};
pub use model::ModelLibrary;
pub use polygon::Polygon;
pub use projection::{ProjectionMode, ViewInputs};
pub use render::FrameBuffer;
pub use triangle::Triangle;
pub use triangulate::TriangulationError;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use polyraster::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use crate::engine::{render, FrameConfig, ViewSettings};

    // Geometry
    pub use crate::mesh::{LoadError, Mesh};
    pub use crate::model::ModelLibrary;
    pub use crate::polygon::Polygon;
    pub use crate::triangle::Triangle;
    pub use crate::triangulate::{triangulate, TriangulationError};

    // Projection
    pub use crate::projection::{ProjectionMode, ViewInputs};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;

    // Rendering
    pub use crate::colors::Color;
    pub use crate::render::{draw_line, fill_triangle, FrameBuffer};

    // Window & Input
    pub use crate::window::{Action, FrameLimiter, InputState, Window, WindowEvent};
}
