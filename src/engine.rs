//! Frame rendering entry point.
//!
//! [`render`] turns a list of meshes and a [`FrameConfig`] into a finished
//! [`FrameBuffer`]. Each call allocates fresh buffers and reads no state
//! besides its arguments, so frames are independent of each other.
//!
//! # Pipeline (per mesh)
//!
//! 1. Compose one transform from the view settings and the mesh position
//! 2. Transform every polygon into screen space
//! 3. Triangulate it and classify visibility from the first triangle
//! 4. Draw the outline, then optionally fill the triangles
//!
//! After all meshes the depth buffer can replace the colors as a grayscale
//! image.

use log::debug;

use crate::colors::{self, Color};
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::mesh::Mesh;
use crate::polygon::Polygon;
use crate::render::{draw_polygon_outline, fill_triangle, FrameBuffer};
use crate::triangulate::TriangulationError;

/// Index of the mesh that receives the additional Z rotation.
pub const PRIMARY_MESH: usize = 0;
/// Index of the mesh outlined in red without depth override.
pub const ACCENT_MESH: usize = 1;

/// Camera and model settings shared by every mesh of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSettings {
    /// Projection size; larger values shrink the image.
    pub zoom: f32,
    pub scale: Vec3,
    /// Rotation around X, Y and Z in radians.
    pub rotation: Vec3,
    /// Extra Z rotation (radians) applied to the primary mesh only.
    pub additional_angle: f32,
    /// Applied to vertices before everything else.
    pub before: Mat4,
    /// Applied to vertices after the viewport mapping.
    pub after: Mat4,
}

/// Everything needed to render one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameConfig {
    pub width: u32,
    pub height: u32,
    /// Fill the triangles of every face (white with gray edges).
    pub show_triangles: bool,
    /// Replace the final colors with a grayscale image of the depth buffer.
    pub show_depth: bool,
    /// Perspective (true) or parallel (false) projection.
    pub perspective: bool,
    pub view: ViewSettings,
}

impl FrameConfig {
    /// Builds the combined transform for the mesh at `index`.
    ///
    /// Order of application to a vertex (rightmost first):
    /// `after * viewport * projection * translate(-position) * Rz * Ry * Rx * scale * before`
    pub fn mesh_transform(&self, mesh: &Mesh, index: usize) -> Mat4 {
        let view = &self.view;

        let extra_angle = if index == PRIMARY_MESH {
            view.additional_angle
        } else {
            0.0
        };
        let before = view.before * Mat4::rotation_z(extra_angle);

        let perspective = if self.perspective { 1.0 } else { 0.0 };

        view.after
            * Mat4::viewport(self.width as f32, self.height as f32)
            * Mat4::projection(view.zoom, perspective)
            * Mat4::translation(-mesh.position())
            * Mat4::rotation_z(view.rotation.z)
            * Mat4::rotation_y(view.rotation.y)
            * Mat4::rotation_x(view.rotation.x)
            * Mat4::scaling(view.scale.x, view.scale.y, view.scale.z)
            * before
    }
}

/// Outline color and depth behaviour chosen per face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FaceStyle {
    outline: Color,
    override_depth: bool,
}

impl FaceStyle {
    /// Visible faces of ordinary meshes are always drawn on top; the accent
    /// mesh and back faces respect the depth buffer.
    fn for_face(mesh_index: usize, visible: bool) -> Self {
        if mesh_index == ACCENT_MESH {
            Self {
                outline: colors::OUTLINE_ACCENT,
                override_depth: false,
            }
        } else if visible {
            Self {
                outline: colors::OUTLINE_VISIBLE,
                override_depth: true,
            }
        } else {
            Self {
                outline: colors::OUTLINE_HIDDEN,
                override_depth: false,
            }
        }
    }
}

/// Renders `meshes` into a new frame buffer of the configured size.
///
/// Fails if a face cannot be triangulated.
pub fn render(meshes: &[Mesh], config: &FrameConfig) -> Result<FrameBuffer, TriangulationError> {
    let mut buffer = FrameBuffer::new(config.width, config.height);
    let mut faces = 0usize;
    let mut visible_faces = 0usize;

    for (index, mesh) in meshes.iter().enumerate() {
        let transform = config.mesh_transform(mesh, index);

        for polygon in mesh.polygons() {
            let screen = polygon.transformed(&transform);
            let visible = render_polygon(&screen, index, config.show_triangles, &mut buffer)?;
            faces += 1;
            visible_faces += usize::from(visible);
        }
    }

    if config.show_depth {
        buffer.render_depth();
    }

    debug!(
        "rendered {} meshes, {} faces ({} visible) at {}x{}",
        meshes.len(),
        faces,
        visible_faces,
        config.width,
        config.height
    );

    Ok(buffer)
}

/// Draws one screen-space polygon and returns whether it faces the viewer.
fn render_polygon(
    polygon: &Polygon,
    mesh_index: usize,
    show_triangles: bool,
    buffer: &mut FrameBuffer,
) -> Result<bool, TriangulationError> {
    let triangles = polygon.triangulate()?;
    let visible = triangles[0].is_front_facing(Vec3::FORWARD);
    let style = FaceStyle::for_face(mesh_index, visible);

    draw_polygon_outline(polygon, style.outline, style.override_depth, buffer);

    if show_triangles {
        for triangle in &triangles {
            fill_triangle(
                triangle,
                colors::TRIANGLE_FILL,
                colors::TRIANGLE_EDGE,
                buffer,
            );
        }
    }

    Ok(visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plain_view() -> ViewSettings {
        ViewSettings {
            zoom: 1.0,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            additional_angle: 0.0,
            before: Mat4::identity(),
            after: Mat4::identity(),
        }
    }

    fn config(width: u32, height: u32) -> FrameConfig {
        FrameConfig {
            width,
            height,
            show_triangles: false,
            show_depth: false,
            perspective: false,
            view: plain_view(),
        }
    }

    /// A square of half-size 0.5 at z = 0, wound counter-clockwise in world space.
    fn square_mesh(name: &str) -> Mesh {
        let faces = vec![vec![
            -0.5, -0.5, 0.0, //
            0.5, -0.5, 0.0, //
            0.5, 0.5, 0.0, //
            -0.5, 0.5, 0.0,
        ]];
        Mesh::from_faces(name, &faces, Vec3::ZERO).unwrap()
    }

    #[test]
    fn empty_scene_yields_blank_frame() {
        let frame = render(&[], &config(32, 16)).unwrap();
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.height(), 16);
        assert_eq!(frame.as_bytes().len(), 32 * 16 * 4);
        assert!(frame.as_bytes().iter().all(|&b| b == 0));
        assert!(frame.depth_buffer().iter().all(|&d| d == 0));
    }

    #[test]
    fn mesh_transform_maps_origin_to_surface_center() {
        let cfg = config(200, 100);
        let mesh = square_mesh("square");
        let m = cfg.mesh_transform(&mesh, 2);
        assert_relative_eq!(m * Vec3::ZERO, Vec3::new(100.0, 50.0, 0.0));
        // Y is flipped on screen.
        assert_relative_eq!(m * Vec3::new(0.0, 1.0, 0.0), Vec3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn mesh_position_is_subtracted() {
        let cfg = config(100, 100);
        let mut mesh = square_mesh("square");
        mesh.set_position(Vec3::new(0.5, 0.0, 0.0));
        let m = cfg.mesh_transform(&mesh, 2);
        assert_relative_eq!(m * Vec3::new(0.5, 0.0, 0.0), Vec3::new(50.0, 50.0, 0.0));
    }

    #[test]
    fn additional_angle_only_turns_primary_mesh() {
        let mut cfg = config(100, 100);
        cfg.view.additional_angle = std::f32::consts::FRAC_PI_2;
        let mesh = square_mesh("square");
        let p = Vec3::new(0.5, 0.0, 0.0);

        let primary = cfg.mesh_transform(&mesh, PRIMARY_MESH) * p;
        let other = cfg.mesh_transform(&mesh, ACCENT_MESH) * p;

        assert_relative_eq!(primary, Vec3::new(50.0, 25.0, 0.0), epsilon = 1e-4);
        assert_relative_eq!(other, Vec3::new(75.0, 50.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn square_outline_is_drawn() {
        let frame = render(&[square_mesh("square")], &config(100, 100)).unwrap();
        let drawn = frame.depth_buffer().iter().filter(|&&d| d > 0).count();
        assert!(drawn > 0);
        // Interior stays empty without the triangle overlay.
        assert_eq!(frame.depth_at(50, 50), Some(0));
    }

    #[test]
    fn triangle_overlay_fills_interior() {
        let mut cfg = config(100, 100);
        cfg.show_triangles = true;
        let frame = render(&[square_mesh("square")], &cfg).unwrap();
        assert_eq!(frame.pixel(50, 60), Some(colors::TRIANGLE_FILL));
    }

    #[test]
    fn depth_overlay_replaces_colors_with_gray() {
        let mut cfg = config(64, 64);
        cfg.show_triangles = true;
        cfg.show_depth = true;
        let frame = render(&[square_mesh("square")], &cfg).unwrap();

        for y in 0..64 {
            for x in 0..64 {
                let tone = frame.depth_at(x, y).unwrap();
                assert_eq!(frame.pixel(x, y), Some(Color::gray(tone)));
            }
        }
    }

    #[test]
    fn face_styles() {
        assert_eq!(
            FaceStyle::for_face(ACCENT_MESH, true),
            FaceStyle {
                outline: colors::OUTLINE_ACCENT,
                override_depth: false
            }
        );
        assert!(FaceStyle::for_face(PRIMARY_MESH, true).override_depth);
        assert_eq!(
            FaceStyle::for_face(PRIMARY_MESH, false).outline,
            colors::OUTLINE_HIDDEN
        );
    }

    #[test]
    fn invalid_face_reports_triangulation_error() {
        let square = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let doubled: Vec<Vec3> = square.iter().chain(square.iter()).copied().collect();
        let mesh = Mesh::new("doubled", vec![Polygon::new(doubled)], Vec3::ZERO);

        assert!(matches!(
            render(&[mesh], &config(10, 10)),
            Err(TriangulationError::NoEarFound { .. })
        ));
    }

    #[test]
    fn tiny_zoom_renders_without_overflow() {
        let mut cfg = config(64, 48);
        cfg.view.zoom = 1.0e-20;
        cfg.show_triangles = true;

        let frame = render(&[square_mesh("square")], &cfg).unwrap();
        assert_eq!(frame.as_bytes().len(), 64 * 48 * 4);
    }
}
