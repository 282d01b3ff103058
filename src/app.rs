//! Window, event loop and frame driver.
//!
//! [`App`] owns the [`AppState`], the GPU state, the egui integration and
//! the dialogs. Window events go to egui first; whatever it does not
//! consume drives the orbit camera and the keyboard shortcuts.

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::ProgramSettings;
use crate::error::AppError;
use crate::gpu::{EguiIntegration, GpuState};
use crate::state::{AppState, Command};
use crate::ui::{load_attractor, Dialog, MainDialog};

/// What a key press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Command(Command),
    ToggleInfo,
}

/// Map a physical key to its shortcut.
pub fn shortcut_for_key(code: KeyCode) -> Option<Shortcut> {
    match code {
        KeyCode::F1 => Some(Shortcut::Command(Command::ToggleGui)),
        KeyCode::Space => Some(Shortcut::Command(Command::TogglePause)),
        KeyCode::KeyR => Some(Shortcut::Command(Command::Restart)),
        KeyCode::KeyG => Some(Shortcut::Command(Command::Generate)),
        KeyCode::F11 => Some(Shortcut::ToggleInfo),
        _ => None,
    }
}

pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui: Option<EguiIntegration>,
    state: AppState,
    dialogs: MainDialog,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    error: Option<AppError>,
}

impl App {
    pub fn new(settings: ProgramSettings) -> Self {
        let dialogs = MainDialog::new(&settings);
        Self {
            window: None,
            gpu: None,
            egui: None,
            state: AppState::new(settings),
            dialogs,
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title("chaos-points")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            self.state.settings.vsync,
            self.state.settings.capacity,
        ))?;
        let egui = EguiIntegration::new(gpu.device(), gpu.config.format, &window, self.dialogs.style());

        self.state.adapter_info = gpu.adapter_summary();
        self.state.set_max_points(gpu.max_points());
        let logical = window.inner_size().to_logical::<f32>(window.scale_factor());
        self.dialogs.switch_mode(logical.width, logical.height);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui = Some(egui);
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match shortcut_for_key(code) {
            Some(Shortcut::Command(command)) => self.state.apply(command),
            Some(Shortcut::ToggleInfo) => self.dialogs.info.base_mut().toggle_visible(),
            None => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu), Some(egui)) = (&self.window, &mut self.gpu, &mut self.egui) else {
            return;
        };

        self.state.update();
        gpu.set_vsync(self.state.settings.vsync);

        let frame = if self.state.show_gui {
            let dialogs = &mut self.dialogs;
            let state = &mut self.state;
            let frame = egui.run(window, |ctx| dialogs.show(ctx, state));
            if let Some(style) = self.dialogs.take_style_change() {
                egui.set_style(style);
            }
            Some(frame)
        } else {
            None
        };

        let gui = frame.as_ref().map(|frame| (&mut *egui, frame));
        match gpu.render(&mut self.state, gui) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(window.inner_size());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = match (&self.window, &mut self.egui) {
            (Some(window), Some(egui)) if self.state.show_gui => egui.on_window_event(window, &event),
            _ => false,
        };
        let pointer_on_gui = self.state.show_gui && self.egui.as_ref().is_some_and(|e| e.wants_pointer());
        let keyboard_on_gui = self.state.show_gui && self.egui.as_ref().is_some_and(|e| e.wants_keyboard());

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } if !keyboard_on_gui => self.handle_key(code),
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed && !pointer_on_gui && !consumed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = position.x - last_x;
                        let dy = position.y - last_y;
                        self.state.camera.orbit(dx as f32, dy as f32);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !pointer_on_gui => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.state.camera.zoom(scroll);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open the window and run until it is closed.
///
/// `file` is an attractor file to load before the first frame.
pub fn run(settings: ProgramSettings, file: Option<PathBuf>) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(settings);
    if let Some(path) = file {
        // Failures are logged and shown in the status line.
        let _ = load_attractor(app.state_mut(), path);
    }
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts() {
        assert_eq!(shortcut_for_key(KeyCode::F1), Some(Shortcut::Command(Command::ToggleGui)));
        assert_eq!(shortcut_for_key(KeyCode::Space), Some(Shortcut::Command(Command::TogglePause)));
        assert_eq!(shortcut_for_key(KeyCode::KeyR), Some(Shortcut::Command(Command::Restart)));
        assert_eq!(shortcut_for_key(KeyCode::KeyG), Some(Shortcut::Command(Command::Generate)));
        assert_eq!(shortcut_for_key(KeyCode::F11), Some(Shortcut::ToggleInfo));
        assert_eq!(shortcut_for_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_handle_key_applies_commands() {
        let mut app = App::new(ProgramSettings {
            capacity: 32,
            ..ProgramSettings::default()
        });
        app.handle_key(KeyCode::F1);
        assert!(!app.state().show_gui);
        app.handle_key(KeyCode::F11);
        assert!(app.dialogs.info.base().visible());
        app.handle_key(KeyCode::Space);
        assert!(app.state().emitter.paused);
    }
}
