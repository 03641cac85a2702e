//! Projection presets.
//!
//! A [`ProjectionMode`] turns the interactive inputs (primary mesh rotation,
//! zoom, extra angle, perspective shift) into a [`FrameConfig`]. The axonometric
//! and oblique presets replace the mesh rotation with a fixed half turn
//! around Y and put their projection coefficients into the `before` matrix.

use std::f32::consts::PI;
use std::fmt;

use crate::engine::{FrameConfig, ViewSettings};
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// Per-frame inputs the presets are built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewInputs {
    /// Accumulated rotation of the primary mesh (radians).
    pub mesh_rotation: Vec3,
    pub zoom: f32,
    /// Extra Z rotation of the primary mesh, in degrees.
    pub additional_angle_degrees: f32,
    /// Perspective shift sliders, each in `[0, 100]`.
    pub shift: Vec3,
}

impl ViewInputs {
    pub const DEFAULT_ZOOM: f32 = 5.0;

    pub fn new(mesh_rotation: Vec3) -> Self {
        Self {
            mesh_rotation,
            zoom: Self::DEFAULT_ZOOM,
            additional_angle_degrees: 0.0,
            shift: Vec3::new(50.0, 50.0, 50.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    RectangularIsometry,
    RectangularDimetry,
    FrontObliqueIsometry,
    FrontObliqueDimetry,
    /// Uses the mesh's own rotation with no extra projection matrix.
    #[default]
    Freecam,
    Perspective,
}

impl ProjectionMode {
    pub const ALL: [ProjectionMode; 6] = [
        ProjectionMode::RectangularIsometry,
        ProjectionMode::RectangularDimetry,
        ProjectionMode::FrontObliqueIsometry,
        ProjectionMode::FrontObliqueDimetry,
        ProjectionMode::Freecam,
        ProjectionMode::Perspective,
    ];

    /// Returns the view settings for this preset and whether it uses
    /// perspective projection.
    pub fn view_settings(&self, inputs: &ViewInputs) -> (ViewSettings, bool) {
        let mut view = ViewSettings {
            zoom: inputs.zoom,
            scale: Vec3::ONE,
            rotation: inputs.mesh_rotation,
            additional_angle: inputs.additional_angle_degrees.to_radians(),
            before: Mat4::identity(),
            after: Mat4::identity(),
        };
        let mut perspective = false;

        // (xx, xy, yx, yy) entries of the before matrix for the parallel presets
        let parallel = match self {
            ProjectionMode::RectangularIsometry => Some((-0.86, 0.86, -0.5, -0.5)),
            ProjectionMode::RectangularDimetry => Some((-0.99, 0.375, -0.125, -0.33)),
            ProjectionMode::FrontObliqueIsometry => Some((-1.0, 0.71, 0.0, -0.71)),
            ProjectionMode::FrontObliqueDimetry => Some((-1.0, 0.71 / 2.0, 0.0, -0.71 / 2.0)),
            ProjectionMode::Freecam | ProjectionMode::Perspective => None,
        };

        if let Some((xx, xy, yx, yy)) = parallel {
            view.rotation = Vec3::new(0.0, PI, 0.0);
            view.before.set(0, 0, xx);
            view.before.set(0, 1, xy);
            view.before.set(1, 0, yx);
            view.before.set(1, 1, yy);
            view.before.set(1, 2, 1.0);
        }

        if *self == ProjectionMode::Perspective {
            perspective = true;
            view.rotation = Vec3::new(-0.5 * PI, 0.0, 0.0);
            view.scale = Vec3::new(0.8, 0.8, 0.8);
            view.before.set(0, 1, (inputs.shift.x - 50.0) / -100.0);
            view.before.set(1, 1, inputs.shift.y / 100.0);
            view.before.set(2, 1, (inputs.shift.z - 50.0) / -100.0);
        }

        (view, perspective)
    }

    /// Builds a complete frame configuration for a `width` x `height` surface.
    pub fn frame_config(
        &self,
        inputs: &ViewInputs,
        width: u32,
        height: u32,
        show_triangles: bool,
        show_depth: bool,
    ) -> FrameConfig {
        let (view, perspective) = self.view_settings(inputs);
        FrameConfig {
            width,
            height,
            show_triangles,
            show_depth,
            perspective,
            view,
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectionMode::RectangularIsometry => "Rectangular Isometry",
            ProjectionMode::RectangularDimetry => "Rectangular Dimetry",
            ProjectionMode::FrontObliqueIsometry => "Front Oblique Isometry",
            ProjectionMode::FrontObliqueDimetry => "Front Oblique Dimetry",
            ProjectionMode::Freecam => "Freecam",
            ProjectionMode::Perspective => "Perspective",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn freecam_passes_mesh_rotation_through() {
        let inputs = ViewInputs::new(Vec3::new(0.1, 0.2, 0.3));
        let (view, perspective) = ProjectionMode::Freecam.view_settings(&inputs);

        assert!(!perspective);
        assert_eq!(view.rotation, inputs.mesh_rotation);
        assert_eq!(view.before, Mat4::identity());
        assert_eq!(view.scale, Vec3::ONE);
        assert_eq!(view.zoom, ViewInputs::DEFAULT_ZOOM);
    }

    #[test]
    fn parallel_presets_fix_rotation() {
        let inputs = ViewInputs::new(Vec3::new(1.0, 1.0, 1.0));
        for mode in [
            ProjectionMode::RectangularIsometry,
            ProjectionMode::RectangularDimetry,
            ProjectionMode::FrontObliqueIsometry,
            ProjectionMode::FrontObliqueDimetry,
        ] {
            let (view, perspective) = mode.view_settings(&inputs);
            assert!(!perspective, "{mode}");
            assert_eq!(view.rotation, Vec3::new(0.0, PI, 0.0));
            assert_eq!(view.before.get(1, 2), 1.0);
        }
    }

    #[test]
    fn isometry_coefficients() {
        let (view, _) = ProjectionMode::RectangularIsometry.view_settings(&ViewInputs::new(Vec3::ZERO));
        assert_eq!(view.before.get(0, 0), -0.86);
        assert_eq!(view.before.get(0, 1), 0.86);
        assert_eq!(view.before.get(1, 0), -0.5);
        assert_eq!(view.before.get(1, 1), -0.5);
    }

    #[test]
    fn perspective_uses_shift_sliders() {
        let mut inputs = ViewInputs::new(Vec3::ZERO);
        inputs.shift = Vec3::new(0.0, 30.0, 100.0);
        let (view, perspective) = ProjectionMode::Perspective.view_settings(&inputs);

        assert!(perspective);
        assert_relative_eq!(view.before.get(0, 1), 0.5);
        assert_relative_eq!(view.before.get(1, 1), 0.3);
        assert_relative_eq!(view.before.get(2, 1), -0.5);
        assert_eq!(view.scale, Vec3::new(0.8, 0.8, 0.8));
    }

    #[test]
    fn additional_angle_is_converted_to_radians() {
        let mut inputs = ViewInputs::new(Vec3::ZERO);
        inputs.additional_angle_degrees = 180.0;
        let (view, _) = ProjectionMode::Freecam.view_settings(&inputs);
        assert_relative_eq!(view.additional_angle, PI);
    }

    #[test]
    fn frame_config_carries_flags() {
        let config = ProjectionMode::Perspective.frame_config(
            &ViewInputs::new(Vec3::ZERO),
            640,
            480,
            true,
            false,
        );
        assert_eq!((config.width, config.height), (640, 480));
        assert!(config.show_triangles);
        assert!(!config.show_depth);
        assert!(config.perspective);
    }
}
