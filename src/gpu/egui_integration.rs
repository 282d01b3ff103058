//! Egui integration for the viewer.
//!
//! Owns the egui context together with its winit input state and wgpu
//! renderer, and applies the theme chosen in the program settings.

use std::sync::Arc;
use winit::window::Window;

use crate::config::GuiTheme;

/// Egui integration state.
///
/// Wraps egui context, winit state, and wgpu renderer.
pub struct EguiIntegration {
    pub ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Output from egui frame processing.
pub struct EguiFrameOutput {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// Look of the GUI, taken from [`ProgramSettings`](crate::config::ProgramSettings).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuiStyle {
    pub theme: GuiTheme,
    /// Accent color (RGBA, 0.0-1.0) for selections and active widgets.
    pub theme_color: [f32; 4],
    pub font_size: f32,
    pub font_zoom: f32,
}

impl EguiIntegration {
    /// Create new egui integration.
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        window: &Arc<Window>,
        style: GuiStyle,
    ) -> Self {
        let ctx = egui::Context::default();
        apply_style(&ctx, style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(
            device,
            output_format,
            None,  // depth format
            1,     // msaa samples
            false, // dithering
        );

        Self { ctx, state, renderer }
    }

    /// Process a winit event.
    ///
    /// Returns true if egui consumed the event (don't pass to camera controls).
    pub fn on_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    /// Whether egui wants exclusive use of the keyboard (a text field has focus).
    pub fn wants_keyboard(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    /// Whether the pointer is over an egui area or dragging a widget.
    pub fn wants_pointer(&self) -> bool {
        self.ctx.wants_pointer_input()
    }

    pub fn set_style(&self, style: GuiStyle) {
        apply_style(&self.ctx, style);
    }

    /// Run one GUI frame and tessellate its output.
    pub fn run(&mut self, window: &Window, ui: impl FnMut(&egui::Context)) -> EguiFrameOutput {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, ui);

        // Handle platform output (clipboard, cursor, etc.)
        self.state.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        EguiFrameOutput {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }

    /// Prepare textures and buffers for rendering. Call before creating render pass.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output: &EguiFrameOutput,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &output.paint_jobs,
            screen_descriptor,
        );
    }

    /// Draw the GUI on top of what is already in the pass.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        output: &EguiFrameOutput,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.renderer.render(render_pass, &output.paint_jobs, screen_descriptor);
    }

    /// Free textures after frame is done.
    pub fn cleanup(&mut self, output: &EguiFrameOutput) {
        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn apply_style(ctx: &egui::Context, gui: GuiStyle) {
    let (theme, visuals) = match gui.theme {
        GuiTheme::Dark => (egui::Theme::Dark, egui::Visuals::dark()),
        GuiTheme::Light => (egui::Theme::Light, egui::Visuals::light()),
    };
    let mut style = egui::Style {
        visuals,
        ..Default::default()
    };
    style.visuals.window_shadow = egui::Shadow::NONE;
    style.visuals.popup_shadow = egui::Shadow::NONE;

    let accent = accent_color(gui.theme_color);
    style.visuals.selection.bg_fill = accent;
    style.visuals.hyperlink_color = accent;
    style.visuals.widgets.active.bg_fill = accent;
    style.visuals.widgets.hovered.bg_stroke.color = accent;

    for (text_style, font) in style.text_styles.iter_mut() {
        font.size = match text_style {
            egui::TextStyle::Heading => gui.font_size * 1.4,
            egui::TextStyle::Small => gui.font_size * 0.75,
            _ => gui.font_size,
        };
    }

    ctx.set_theme(theme);
    ctx.set_style_of(theme, style);
    ctx.set_zoom_factor(gui.font_zoom.clamp(0.5, 3.0));
}

fn accent_color(rgba: [f32; 4]) -> egui::Color32 {
    let [r, g, b, a] = rgba.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}
