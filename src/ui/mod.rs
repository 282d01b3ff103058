//! GUI dialogs.
//!
//! Every dialog is a floating egui window built on [`DialogBase`], which
//! tracks the title, visibility and a pending reposition. [`MainDialog`]
//! owns all of them together with the GUI look (theme, accent color, font
//! size and zoom) and lays them out again when the window mode changes.
//!
//! # Example
//!
//! ```ignore
//! let mut dialogs = MainDialog::new(&state.settings);
//! dialogs.switch_mode(1280.0, 720.0);
//! // Once per frame, inside egui:
//! dialogs.show(ctx, &mut state);
//! if let Some(style) = dialogs.take_style_change() {
//!     egui.set_style(style);
//! }
//! ```

mod about;
mod attractor;
mod clipping;
mod data;
mod fast_view;
mod gizmo;
mod info;
mod palette;
mod particle_edit;
mod particles;
mod prog_settings;
mod view_settings;

pub use about::AboutDialog;
pub use attractor::AttractorDialog;
pub use clipping::ClippingDialog;
pub use data::{export_palette, import_palette, load_attractor, save_attractor, DataDialog};
pub use fast_view::FastViewDialog;
pub use gizmo::GizmoDialog;
pub use info::InfoDialog;
pub use palette::PaletteDialog;
pub use particle_edit::ParticleEditDialog;
pub use particles::ParticlesDialog;
pub use prog_settings::ProgSettingsDialog;
pub use view_settings::ViewSettingsDialog;

use crate::config::{GuiTheme, ProgramSettings};
use crate::gpu::GuiStyle;
use crate::state::{AppState, Command};

/// Title, visibility and placement shared by every dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogBase {
    title: String,
    visible: bool,
    pending_pos: Option<egui::Pos2>,
}

impl DialogBase {
    pub fn new(title: impl Into<String>, visible: bool) -> Self {
        Self {
            title: title.into(),
            visible,
            pending_pos: None,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Move the window to `(x, y)` the next time it is shown.
    pub fn reposition(&mut self, x: f32, y: f32) {
        self.pending_pos = Some(egui::pos2(x, y));
    }

    pub fn pending_pos(&self) -> Option<egui::Pos2> {
        self.pending_pos
    }

    /// The egui window for this dialog, or `None` while hidden.
    ///
    /// The window's close button writes back into `visible`.
    pub fn window(&mut self) -> Option<egui::Window<'_>> {
        if !self.visible {
            return None;
        }
        let mut window = egui::Window::new(self.title.clone())
            .id(egui::Id::new(("dialog", self.title.as_str())))
            .resizable(false);
        if let Some(pos) = self.pending_pos.take() {
            window = window.current_pos(pos);
        }
        Some(window.open(&mut self.visible))
    }
}

/// A GUI dialog.
pub trait Dialog {
    fn base(&self) -> &DialogBase;
    fn base_mut(&mut self) -> &mut DialogBase;
    /// Draw the dialog if visible, editing `state` in place.
    fn view(&mut self, ctx: &egui::Context, state: &mut AppState);
}

/// Width used when placing dialogs.
const DIALOG_WIDTH: f32 = 320.0;
const MARGIN: f32 = 10.0;

/// Owner of every dialog and of the GUI look.
pub struct MainDialog {
    base: DialogBase,
    pub attractor: AttractorDialog,
    pub palette: PaletteDialog,
    pub particles: ParticlesDialog,
    pub view_settings: ViewSettingsDialog,
    pub prog_settings: ProgSettingsDialog,
    pub data: DataDialog,
    pub particle_edit: ParticleEditDialog,
    pub info: InfoDialog,
    pub clipping: ClippingDialog,
    pub about: AboutDialog,
    pub fast_view: FastViewDialog,
    pub gizmo: GizmoDialog,
    theme_color: [f32; 4],
    selected_theme: GuiTheme,
    font_size: f32,
    font_zoom: f32,
    style_changed: bool,
}

impl MainDialog {
    pub fn new(settings: &ProgramSettings) -> Self {
        Self {
            base: DialogBase::new("chaos-points", true),
            attractor: AttractorDialog::new(),
            palette: PaletteDialog::new(),
            particles: ParticlesDialog::new(),
            view_settings: ViewSettingsDialog::new(),
            prog_settings: ProgSettingsDialog::new(),
            data: DataDialog::new(),
            particle_edit: ParticleEditDialog::new(),
            info: InfoDialog::new(),
            clipping: ClippingDialog::new(),
            about: AboutDialog::new(),
            fast_view: FastViewDialog::new(),
            gizmo: GizmoDialog::new(),
            theme_color: settings.theme_color,
            selected_theme: settings.theme,
            font_size: settings.font_size,
            font_zoom: settings.font_zoom,
            style_changed: false,
        }
    }

    pub fn base(&self) -> &DialogBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut DialogBase {
        &mut self.base
    }

    pub fn theme_color(&self) -> [f32; 4] {
        self.theme_color
    }

    pub fn set_theme_color(&mut self, color: [f32; 4]) {
        self.style_changed |= self.theme_color != color;
        self.theme_color = color;
    }

    pub fn selected_theme(&self) -> GuiTheme {
        self.selected_theme
    }

    pub fn set_selected_theme(&mut self, theme: GuiTheme) {
        self.style_changed |= self.selected_theme != theme;
        self.selected_theme = theme;
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.style_changed |= self.font_size != size;
        self.font_size = size;
    }

    pub fn font_zoom(&self) -> f32 {
        self.font_zoom
    }

    pub fn set_font_zoom(&mut self, zoom: f32) {
        self.style_changed |= self.font_zoom != zoom;
        self.font_zoom = zoom;
    }

    pub fn style(&self) -> GuiStyle {
        GuiStyle {
            theme: self.selected_theme,
            theme_color: self.theme_color,
            font_size: self.font_size,
            font_zoom: self.font_zoom,
        }
    }

    /// The new look if any style value changed since the last call.
    pub fn take_style_change(&mut self) -> Option<GuiStyle> {
        std::mem::take(&mut self.style_changed).then(|| self.style())
    }

    fn dialogs_mut(&mut self) -> [&mut dyn Dialog; 12] {
        [
            &mut self.attractor,
            &mut self.palette,
            &mut self.particles,
            &mut self.view_settings,
            &mut self.prog_settings,
            &mut self.data,
            &mut self.particle_edit,
            &mut self.info,
            &mut self.clipping,
            &mut self.about,
            &mut self.fast_view,
            &mut self.gizmo,
        ]
    }

    /// Lay every dialog out again for a `width` x `height` window.
    pub fn switch_mode(&mut self, width: f32, height: f32) {
        let right = (width - DIALOG_WIDTH - MARGIN).max(MARGIN);
        let center = ((width - DIALOG_WIDTH) * 0.5).max(MARGIN);
        let lower = (height * 0.5).max(MARGIN);

        self.base.reposition(MARGIN, MARGIN);
        self.attractor.base_mut().reposition(MARGIN, 60.0);
        self.particles.base_mut().reposition(MARGIN, lower);
        self.fast_view.base_mut().reposition(MARGIN, 60.0);
        self.palette.base_mut().reposition(right, MARGIN);
        self.view_settings.base_mut().reposition(right, lower);
        self.info.base_mut().reposition(right, MARGIN);
        self.gizmo.base_mut().reposition((width - 150.0).max(MARGIN), (height - 170.0).max(MARGIN));
        for dialog in [
            self.prog_settings.base_mut(),
            self.data.base_mut(),
            self.particle_edit.base_mut(),
            self.clipping.base_mut(),
            self.about.base_mut(),
        ] {
            dialog.reposition(center, height * 0.2);
        }
        self.particles.reset_tree_flags();
    }

    /// Draw the main toolbar and every visible dialog.
    pub fn show(&mut self, ctx: &egui::Context, state: &mut AppState) {
        self.write_style(&mut state.settings);
        if !state.show_gui {
            return;
        }

        let mut command = None;
        if let Some(window) = self.base.window() {
            let dialogs = [
                self.attractor.base_mut(),
                self.palette.base_mut(),
                self.particles.base_mut(),
                self.view_settings.base_mut(),
                self.prog_settings.base_mut(),
                self.data.base_mut(),
                self.particle_edit.base_mut(),
                self.info.base_mut(),
                self.clipping.base_mut(),
                self.fast_view.base_mut(),
                self.gizmo.base_mut(),
                self.about.base_mut(),
            ];
            window.collapsible(true).show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for dialog in dialogs {
                        let mut visible = dialog.visible();
                        if ui.toggle_value(&mut visible, dialog.title().to_owned()).changed() {
                            dialog.set_visible(visible);
                        }
                    }
                });
                ui.separator();
                ui.horizontal(|ui| {
                    let pause = if state.emitter.paused { "Resume" } else { "Pause" };
                    if ui.button(pause).clicked() {
                        command = Some(Command::TogglePause);
                    }
                    if ui.button("Hide GUI (F1)").clicked() {
                        command = Some(Command::ToggleGui);
                    }
                });
                if let Some(status) = &state.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        }
        if let Some(command) = command {
            state.apply(command);
        }

        for dialog in self.dialogs_mut() {
            dialog.view(ctx, state);
        }

        self.read_style(&state.settings);
    }

    /// Store the style this dialog owns into `settings`, so the settings
    /// dialog edits the current values and saving persists them.
    fn write_style(&self, settings: &mut ProgramSettings) {
        settings.theme = self.selected_theme;
        settings.theme_color = self.theme_color;
        settings.font_size = self.font_size;
        settings.font_zoom = self.font_zoom;
    }

    /// Take over edits made through the settings dialog.
    fn read_style(&mut self, settings: &ProgramSettings) {
        self.set_selected_theme(settings.theme);
        self.set_theme_color(settings.theme_color);
        self.set_font_size(settings.font_size);
        self.set_font_zoom(settings.font_zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_base_visibility() {
        let mut base = DialogBase::new("Info", false);
        assert!(!base.visible());
        assert!(base.window().is_none());
        base.toggle_visible();
        assert!(base.visible());
        base.set_visible(false);
        assert!(!base.visible());
        assert_eq!(base.title(), "Info");
    }

    #[test]
    fn test_reposition_is_consumed_by_window() {
        let mut base = DialogBase::new("Palette", true);
        base.reposition(12.0, 34.0);
        assert_eq!(base.pending_pos(), Some(egui::pos2(12.0, 34.0)));
        assert!(base.window().is_some());
        assert_eq!(base.pending_pos(), None);
    }

    #[test]
    fn test_initial_visibility() {
        let main = MainDialog::new(&ProgramSettings::default());
        assert!(main.base().visible());
        assert!(main.attractor.base().visible());
        assert!(main.particles.base().visible());
        assert!(main.gizmo.base().visible());
        assert!(!main.palette.base().visible());
        assert!(!main.info.base().visible());
        assert!(!main.about.base().visible());
    }

    #[test]
    fn test_switch_mode_repositions_every_dialog() {
        let mut main = MainDialog::new(&ProgramSettings::default());
        main.switch_mode(1280.0, 720.0);
        assert!(main.base().pending_pos().is_some());
        for dialog in main.dialogs_mut() {
            let pos = dialog.base().pending_pos();
            assert!(pos.is_some(), "{} was not placed", dialog.base().title());
        }
        assert_eq!(main.palette.base().pending_pos(), Some(egui::pos2(950.0, 10.0)));
    }

    #[test]
    fn test_switch_mode_small_window_stays_on_screen() {
        let mut main = MainDialog::new(&ProgramSettings::default());
        main.switch_mode(100.0, 100.0);
        for dialog in main.dialogs_mut() {
            let pos = dialog.base().pending_pos().unwrap();
            assert!(pos.x >= MARGIN && pos.y >= 0.0);
        }
    }

    #[test]
    fn test_style_change_tracking() {
        let mut main = MainDialog::new(&ProgramSettings::default());
        assert!(main.take_style_change().is_none());
        main.set_font_size(main.font_size());
        assert!(main.take_style_change().is_none());
        main.set_font_size(18.0);
        main.set_selected_theme(GuiTheme::Light);
        let style = main.take_style_change().unwrap();
        assert_eq!(style.font_size, 18.0);
        assert_eq!(style.theme, GuiTheme::Light);
        assert!(main.take_style_change().is_none());
    }

    #[test]
    fn test_style_setters_survive_show() {
        let mut state = AppState::new(ProgramSettings {
            capacity: 64,
            ..ProgramSettings::default()
        });
        let mut main = MainDialog::new(&state.settings);
        main.set_font_size(18.0);
        main.set_selected_theme(GuiTheme::Light);
        main.set_theme_color([1.0, 0.0, 0.0, 1.0]);

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| main.show(ctx, &mut state));
        assert_eq!(main.font_size(), 18.0);
        assert_eq!(main.selected_theme(), GuiTheme::Light);
        assert_eq!(main.theme_color(), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(state.settings.font_size, 18.0);
        assert_eq!(state.settings.theme, GuiTheme::Light);
        assert_eq!(main.take_style_change().map(|s| s.font_size), Some(18.0));

        state.show_gui = false;
        main.set_font_zoom(1.5);
        let _ = ctx.run(egui::RawInput::default(), |ctx| main.show(ctx, &mut state));
        assert_eq!(state.settings.font_zoom, 1.5);
    }

    #[test]
    fn test_settings_edits_reach_style() {
        let mut state = AppState::new(ProgramSettings {
            capacity: 64,
            ..ProgramSettings::default()
        });
        let mut main = MainDialog::new(&state.settings);
        main.write_style(&mut state.settings);
        state.settings.font_zoom = 2.0;
        main.read_style(&state.settings);
        assert_eq!(main.font_zoom(), 2.0);
        assert!(main.take_style_change().is_some());

        main.read_style(&state.settings);
        assert!(main.take_style_change().is_none());
    }
}
