//! Program-wide preferences.

use super::{Dialog, DialogBase};
use crate::config::{GuiTheme, ProgramSettings, SETTINGS_FILE};
use crate::state::AppState;
use crate::textures::TexturePrecision;

pub struct ProgSettingsDialog {
    base: DialogBase,
}

impl ProgSettingsDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Program settings", false),
        }
    }
}

impl Default for ProgSettingsDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for ProgSettingsDialog {
    fn base(&self) -> &DialogBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DialogBase {
        &mut self.base
    }

    fn view(&mut self, ctx: &egui::Context, state: &mut AppState) {
        let Some(window) = self.base.window() else {
            return;
        };
        window.show(ctx, |ui| {
            let max_points = state.max_points();
            let min_points = (*ProgramSettings::CAPACITY_RANGE.start()).min(max_points);
            let settings = &mut state.settings;

            ui.heading("Emission");
            ui.add(
                egui::DragValue::new(&mut settings.capacity)
                    .speed(10_000)
                    .range(min_points..=max_points)
                    .prefix("Buffer: ")
                    .suffix(" points"),
            );
            ui.add(
                egui::DragValue::new(&mut settings.steps_per_frame)
                    .speed(100)
                    .range(ProgramSettings::STEPS_RANGE)
                    .prefix("Steps per frame: "),
            );
            ui.add(
                egui::DragValue::new(&mut settings.warmup)
                    .speed(10)
                    .range(ProgramSettings::WARMUP_RANGE)
                    .prefix("Warmup: "),
            );
            let pending = settings.capacity != state.emitter.capacity()
                || settings.steps_per_frame != state.emitter.steps_per_frame
                || settings.warmup != state.emitter.warmup;
            if ui.add_enabled(pending, egui::Button::new("Apply")).clicked() {
                state.apply_settings();
            }

            let settings = &mut state.settings;
            ui.separator();
            ui.heading("Rendering");
            let precision = settings.palette_precision;
            egui::ComboBox::from_label("Palette precision")
                .selected_text(precision.label())
                .show_ui(ui, |ui| {
                    for p in [TexturePrecision::Unorm8, TexturePrecision::Float32] {
                        ui.selectable_value(&mut settings.palette_precision, p, p.label());
                    }
                });
            if settings.palette_precision != precision {
                state.palette_dirty = true;
            }
            ui.checkbox(&mut settings.vsync, "Vertical sync");
            ui.horizontal(|ui| {
                ui.add(
                    egui::DragValue::new(&mut settings.noise_size)
                        .range(ProgramSettings::NOISE_RANGE)
                        .prefix("Noise texels: "),
                );
                if ui.button("Rebuild").clicked() {
                    state.noise_dirty = true;
                }
            });

            ui.separator();
            ui.heading("GUI");
            egui::ComboBox::from_label("Theme")
                .selected_text(settings.theme.label())
                .show_ui(ui, |ui| {
                    for theme in GuiTheme::ALL {
                        ui.selectable_value(&mut settings.theme, theme, theme.label());
                    }
                });
            ui.horizontal(|ui| {
                ui.label("Base color");
                ui.color_edit_button_rgba_unmultiplied(&mut settings.theme_color);
            });
            ui.add(egui::Slider::new(&mut settings.font_size, ProgramSettings::FONT_SIZE_RANGE).text("Font size"));
            ui.add(egui::Slider::new(&mut settings.font_zoom, ProgramSettings::FONT_ZOOM_RANGE).text("Font zoom"));

            ui.separator();
            if ui.button("Save settings").clicked() {
                match settings.save(SETTINGS_FILE) {
                    Ok(()) => state.set_status(format!("Settings saved to {}", SETTINGS_FILE)),
                    Err(e) => state.set_status(format!("Error: {}", e)),
                }
            }
        });
    }
}
