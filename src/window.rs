use std::time::Duration;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::math::vec3::Vec3;
use crate::projection::ProjectionMode;

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;
pub const FPS: u64 = 60;
pub const FRAME_TARGET_TIME: f64 = 1000.0 / FPS as f64;

/// Radians per rotation tick applied while a rotation key is held.
pub const ROTATION_SPEED: f32 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
    Resize(u32, u32),
}

/// One-shot commands triggered by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ZoomOut,
    ZoomIn,
    ToggleTriangles,
    ToggleDepth,
    SelectMode(ProjectionMode),
    AngleUp,
    AngleDown,
}

impl Action {
    /// Maps a pressed key to its command, if it has one.
    pub fn for_key(keycode: Keycode) -> Option<Self> {
        let action = match keycode {
            Keycode::R => Action::ZoomOut,
            Keycode::F => Action::ZoomIn,
            Keycode::T => Action::ToggleTriangles,
            Keycode::Z => Action::ToggleDepth,
            Keycode::Up => Action::AngleUp,
            Keycode::Down => Action::AngleDown,
            Keycode::Num1 => Action::SelectMode(ProjectionMode::ALL[0]),
            Keycode::Num2 => Action::SelectMode(ProjectionMode::ALL[1]),
            Keycode::Num3 => Action::SelectMode(ProjectionMode::ALL[2]),
            Keycode::Num4 => Action::SelectMode(ProjectionMode::ALL[3]),
            Keycode::Num5 => Action::SelectMode(ProjectionMode::ALL[4]),
            Keycode::Num6 => Action::SelectMode(ProjectionMode::ALL[5]),
            _ => return None,
        };
        Some(action)
    }
}

/// Keyboard state gathered by [`Window::poll_events`].
///
/// The six rotation keys are level-triggered (W/S around X, A/D around Y,
/// Q/E around Z); everything else is queued as an [`Action`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub spin_x_pos: bool,
    pub spin_x_neg: bool,
    pub spin_y_pos: bool,
    pub spin_y_neg: bool,
    pub spin_z_pos: bool,
    pub spin_z_neg: bool,
    actions: Vec<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotation speed per tick implied by the held keys.
    pub fn rotation_speed(&self) -> Vec3 {
        let axis = |pos: bool, neg: bool| {
            ROTATION_SPEED * (f32::from(u8::from(pos)) - f32::from(u8::from(neg)))
        };
        Vec3::new(
            axis(self.spin_x_pos, self.spin_x_neg),
            axis(self.spin_y_pos, self.spin_y_neg),
            axis(self.spin_z_pos, self.spin_z_neg),
        )
    }

    /// Drains the actions queued since the last call.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    pub fn key_down(&mut self, keycode: Keycode, repeat: bool) {
        if !self.set_held(keycode, true) && !repeat {
            if let Some(action) = Action::for_key(keycode) {
                self.actions.push(action);
            }
        }
    }

    pub fn key_up(&mut self, keycode: Keycode) {
        self.set_held(keycode, false);
    }

    /// Returns false when the key is not a rotation key.
    fn set_held(&mut self, keycode: Keycode, down: bool) -> bool {
        let flag = match keycode {
            Keycode::W => &mut self.spin_x_pos,
            Keycode::S => &mut self.spin_x_neg,
            Keycode::A => &mut self.spin_y_pos,
            Keycode::D => &mut self.spin_y_neg,
            Keycode::Q => &mut self.spin_z_pos,
            Keycode::E => &mut self.spin_z_neg,
            _ => return false,
        };
        *flag = down;
        true
    }
}

pub struct FrameLimiter {
    previous_frame_time: u64,
}

impl FrameLimiter {
    pub fn new(window: &Window) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
        }
    }

    /// Waits if necessary to maintain frame rate and returns the time elapsed
    /// since the last call.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> Duration {
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time - self.previous_frame_time;

        if delta_time < FRAME_TARGET_TIME as u64 {
            let time_to_wait = (FRAME_TARGET_TIME as u64) - delta_time;
            std::thread::sleep(Duration::from_millis(time_to_wait));
            current_time = window.timer().ticks64();
            delta_time = current_time - self.previous_frame_time;
        }

        self.previous_frame_time = current_time;
        Duration::from_millis(delta_time)
    }
}

/// SDL2 window showing RGBA frames through a streaming texture.
pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    texture: sdl2::render::Texture<'static>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // texture is dropped before texture_creator by struct field order.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::RGBA32, width, height)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            canvas,
            texture_creator,
            texture,
            event_pump,
            timer_subsystem,
            width,
            height,
        })
    }

    /// Feeds keyboard events into `input` and reports quit/resize requests.
    pub fn poll_events(&mut self, input: &mut InputState) -> WindowEvent {
        let mut result = WindowEvent::None;
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return WindowEvent::Quit,
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat,
                    ..
                } => input.key_down(keycode, repeat),
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => input.key_up(keycode),
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => result = WindowEvent::Resize(w as u32, h as u32),
                _ => {}
            }
        }
        result
    }

    /// Uploads a `width * height * 4` RGBA byte slice and shows it.
    pub fn present(&mut self, buffer: &[u8]) -> Result<(), String> {
        self.texture
            .update(None, buffer, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))?;
        self.canvas.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.width = width;
        self.height = height;
        // SAFETY: Same as in new() - texture_creator outlives texture
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(self.texture_creator.as_ref() as *const _) };
        self.texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::RGBA32, width, height)
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), String> {
        self.canvas
            .window_mut()
            .set_title(title)
            .map_err(|e| e.to_string())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn held_keys_set_rotation_speed() {
        let mut input = InputState::new();
        input.key_down(Keycode::W, false);
        input.key_down(Keycode::D, false);
        assert_relative_eq!(
            input.rotation_speed(),
            Vec3::new(ROTATION_SPEED, -ROTATION_SPEED, 0.0)
        );

        input.key_up(Keycode::W);
        assert_relative_eq!(input.rotation_speed(), Vec3::new(0.0, -ROTATION_SPEED, 0.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = InputState::new();
        input.key_down(Keycode::Q, false);
        input.key_down(Keycode::E, false);
        assert_eq!(input.rotation_speed().z, 0.0);
    }

    #[test]
    fn rotation_keys_queue_no_actions() {
        let mut input = InputState::new();
        input.key_down(Keycode::A, false);
        assert!(input.take_actions().is_empty());
    }

    #[test]
    fn presses_queue_actions_once() {
        let mut input = InputState::new();
        input.key_down(Keycode::T, false);
        input.key_down(Keycode::T, true);
        input.key_down(Keycode::Num6, false);
        input.key_down(Keycode::X, false);

        assert_eq!(
            input.take_actions(),
            vec![
                Action::ToggleTriangles,
                Action::SelectMode(ProjectionMode::Perspective)
            ]
        );
        assert!(input.take_actions().is_empty());
    }

    #[test]
    fn number_keys_follow_mode_order() {
        assert_eq!(
            Action::for_key(Keycode::Num1),
            Some(Action::SelectMode(ProjectionMode::RectangularIsometry))
        );
        assert_eq!(
            Action::for_key(Keycode::Num5),
            Some(Action::SelectMode(ProjectionMode::Freecam))
        );
        assert_eq!(Action::for_key(Keycode::R), Some(Action::ZoomOut));
        assert_eq!(Action::for_key(Keycode::F), Some(Action::ZoomIn));
    }
}
