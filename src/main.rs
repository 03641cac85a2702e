use std::path::{Path, PathBuf};
use std::time::Duration;

use image::RgbaImage;
use log::{info, warn};
use polyraster::colors;
use polyraster::prelude::*;
use polyraster::window::{WINDOW_HEIGHT, WINDOW_WIDTH};

const USAGE: &str = r#"polyraster

USAGE:
  polyraster [options] [MODEL_FILE]

MODEL_FILE is a JSON model library or a Wavefront OBJ file. Without it the
built-in cube is shown.

OPTIONS:
  --model <name>       Model to show (defaults to the first model of the file)
  --mode <1-6>         Initial projection preset
  --snapshot <path>    Render one frame to an image file and exit
  -h, --help           Show this help

KEYS:
  W/S A/D Q/E   rotate around X / Y / Z while held
  R/F           zoom out / in
  T             toggle triangle overlay
  Z             toggle depth view
  1-6           projection preset
  Up/Down       additional angle
"#;

const ZOOM_STEP: f32 = 1.1;
/// Degrees per Up/Down press.
const ANGLE_STEP: f32 = 5.0;
const DEFAULT_MODEL: &str = "cube";
const AXES_POSITION: Vec3 = Vec3::new(2.0, 0.0, 0.0);

#[derive(Debug, Default, PartialEq)]
struct Options {
    model_file: Option<PathBuf>,
    model: Option<String>,
    mode: ProjectionMode,
    snapshot: Option<PathBuf>,
}

/// Returns `None` when help was requested.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("missing value for `{flag}`"))
        };
        match arg.as_str() {
            "--model" => options.model = Some(value("--model")?),
            "--snapshot" => options.snapshot = Some(PathBuf::from(value("--snapshot")?)),
            "--mode" => {
                let raw = value("--mode")?;
                options.mode = raw
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| ProjectionMode::ALL.get(i).copied())
                    .ok_or_else(|| format!("invalid mode `{raw}`, expected 1-6"))?;
            }
            "-h" | "--help" => return Ok(None),
            other if other.starts_with('-') => {
                return Err(format!("unknown option `{other}`\n\n{USAGE}"))
            }
            other if options.model_file.is_some() => {
                return Err(format!("unexpected argument `{other}`\n\n{USAGE}"))
            }
            other => options.model_file = Some(PathBuf::from(other)),
        }
    }

    Ok(Some(options))
}

/// Primary model, red axes and the horizon, in render order.
fn build_scene(options: &Options) -> Result<Vec<Mesh>, LoadError> {
    let mut library = ModelLibrary::builtin();
    let mut primary = DEFAULT_MODEL.to_string();

    if let Some(path) = &options.model_file {
        let loaded = ModelLibrary::load(path)?;
        if let Some(first) = loaded.names().next() {
            primary = first.to_string();
        }
        library.merge(loaded);
    }
    if let Some(name) = &options.model {
        primary = name.clone();
    }

    info!("showing model `{primary}`");
    let mut axes = library.mesh("axes", Vec3::ZERO)?;
    axes.set_position(AXES_POSITION);

    Ok(vec![
        library.mesh(&primary, Vec3::ZERO)?,
        axes,
        library.mesh("horizon", Vec3::ZERO)?,
    ])
}

/// Scene plus the interactive view state.
struct Viewer {
    meshes: Vec<Mesh>,
    mode: ProjectionMode,
    zoom: f32,
    additional_angle: f32,
    show_triangles: bool,
    show_depth: bool,
}

impl Viewer {
    fn new(meshes: Vec<Mesh>, mode: ProjectionMode) -> Self {
        Self {
            meshes,
            mode,
            zoom: ViewInputs::DEFAULT_ZOOM,
            additional_angle: 0.0,
            show_triangles: false,
            show_depth: false,
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::ZoomOut => self.zoom /= ZOOM_STEP,
            Action::ZoomIn => self.zoom *= ZOOM_STEP,
            Action::ToggleTriangles => self.show_triangles = !self.show_triangles,
            Action::ToggleDepth => self.show_depth = !self.show_depth,
            Action::SelectMode(mode) => {
                info!("projection: {mode}");
                self.mode = mode;
            }
            Action::AngleUp => self.additional_angle += ANGLE_STEP,
            Action::AngleDown => self.additional_angle -= ANGLE_STEP,
        }
    }

    /// Spins the primary mesh by the held keys and advances every mesh by `dt`.
    fn update(&mut self, input: &InputState, dt: Duration) {
        if let Some(primary) = self.meshes.first_mut() {
            primary.set_rotation_speed(input.rotation_speed());
        }
        for mesh in &mut self.meshes {
            mesh.advance_rotation(dt);
        }
    }

    fn frame_config(&self, width: u32, height: u32) -> FrameConfig {
        let rotation = self.meshes.first().map_or(Vec3::ZERO, Mesh::rotation);
        let inputs = ViewInputs {
            zoom: self.zoom,
            additional_angle_degrees: self.additional_angle,
            ..ViewInputs::new(rotation)
        };
        self.mode
            .frame_config(&inputs, width, height, self.show_triangles, self.show_depth)
    }

    /// Renders a frame as opaque RGBA bytes over the background color.
    fn render_frame(&self, width: u32, height: u32) -> Result<Vec<u8>, TriangulationError> {
        let frame = render(&self.meshes, &self.frame_config(width, height))?;
        Ok(frame.composite_over(colors::BACKGROUND))
    }

    fn title(&self) -> String {
        format!("polyraster - {}", self.mode)
    }
}

fn snapshot(viewer: &Viewer, path: &Path) -> Result<(), String> {
    let bytes = viewer
        .render_frame(WINDOW_WIDTH, WINDOW_HEIGHT)
        .map_err(|e| e.to_string())?;
    let image = RgbaImage::from_raw(WINDOW_WIDTH, WINDOW_HEIGHT, bytes)
        .ok_or("frame size does not match the image size")?;
    image.save(path).map_err(|e| e.to_string())?;
    info!("wrote {}", path.display());
    Ok(())
}

fn run_window(mut viewer: Viewer) -> Result<(), String> {
    let mut window = Window::new(&viewer.title(), WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut input = InputState::new();
    let mut limiter = FrameLimiter::new(&window);

    loop {
        match window.poll_events(&mut input) {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => window.resize(w, h)?,
            WindowEvent::None => {}
        }

        for action in input.take_actions() {
            viewer.apply(action);
            if let Action::SelectMode(_) = action {
                window.set_title(&viewer.title())?;
            }
        }

        let dt = limiter.wait_and_get_delta(&window);
        viewer.update(&input, dt);

        match viewer.render_frame(window.width(), window.height()) {
            Ok(bytes) => window.present(&bytes)?,
            Err(e) => warn!("skipping frame: {e}"),
        }
    }

    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();

    let Some(options) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let meshes = build_scene(&options).map_err(|e| e.to_string())?;
    let viewer = Viewer::new(meshes, options.mode);

    match &options.snapshot {
        Some(path) => snapshot(&viewer, path),
        None => run_window(viewer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_options() {
        let options = parse_args(args(&["--mode", "6", "scene.json", "--snapshot", "out.png"]))
            .unwrap()
            .unwrap();
        assert_eq!(options.mode, ProjectionMode::Perspective);
        assert_eq!(options.model_file, Some(PathBuf::from("scene.json")));
        assert_eq!(options.snapshot, Some(PathBuf::from("out.png")));
        assert_eq!(options.model, None);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_args(args(&["--mode", "7"])).is_err());
        assert!(parse_args(args(&["--model"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["a.json", "b.json"])).is_err());
        assert_eq!(parse_args(args(&["--help"])).unwrap(), None);
    }

    #[test]
    fn default_scene_has_cube_axes_and_horizon() {
        let meshes = build_scene(&Options::default()).unwrap();
        let names: Vec<_> = meshes.iter().map(Mesh::name).collect();
        assert_eq!(names, vec!["cube", "axes", "horizon"]);
        assert_eq!(meshes[1].position(), AXES_POSITION);
    }

    #[test]
    fn unknown_model_fails_scene() {
        let options = Options {
            model: Some("teapot".to_string()),
            ..Options::default()
        };
        assert!(matches!(
            build_scene(&options),
            Err(LoadError::UnknownModel(_))
        ));
    }

    #[test]
    fn actions_update_view_state() {
        let mut viewer = Viewer::new(Vec::new(), ProjectionMode::Freecam);
        viewer.apply(Action::ZoomIn);
        assert_relative_eq!(viewer.zoom, ViewInputs::DEFAULT_ZOOM * ZOOM_STEP);
        viewer.apply(Action::ZoomOut);
        assert_relative_eq!(viewer.zoom, ViewInputs::DEFAULT_ZOOM);

        viewer.apply(Action::ToggleTriangles);
        viewer.apply(Action::ToggleDepth);
        viewer.apply(Action::AngleUp);
        viewer.apply(Action::SelectMode(ProjectionMode::Perspective));

        let config = viewer.frame_config(100, 100);
        assert!(config.show_triangles);
        assert!(config.show_depth);
        assert!(config.perspective);
        assert_relative_eq!(config.view.additional_angle, ANGLE_STEP.to_radians());
    }

    #[test]
    fn update_spins_only_the_primary_mesh() {
        let mut viewer = Viewer::new(build_scene(&Options::default()).unwrap(), ProjectionMode::Freecam);
        let mut input = InputState::new();
        input.spin_x_pos = true;

        viewer.update(&input, polyraster::mesh::ROTATION_TICK * 2);

        assert_relative_eq!(
            viewer.meshes[0].rotation().x,
            2.0 * polyraster::window::ROTATION_SPEED,
            epsilon = 1e-6
        );
        assert_eq!(viewer.meshes[1].rotation(), Vec3::ZERO);
    }

    #[test]
    fn frame_is_opaque() {
        let viewer = Viewer::new(build_scene(&Options::default()).unwrap(), ProjectionMode::Freecam);
        let bytes = viewer.render_frame(40, 30).unwrap();
        assert_eq!(bytes.len(), 40 * 30 * 4);
        assert!(bytes.chunks_exact(4).all(|p| p[3] == 255));
    }
}
