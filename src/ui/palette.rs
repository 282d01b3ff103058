//! Palette selection and mapping.

use super::data::{pick_save, JSON, PNG};
use super::{export_palette, Dialog, DialogBase};
use crate::state::AppState;

/// Swatches drawn in the preview strip.
const PREVIEW_STEPS: usize = 96;

pub struct PaletteDialog {
    base: DialogBase,
}

impl PaletteDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Palette", false),
        }
    }
}

impl Default for PaletteDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for PaletteDialog {
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
            let mut selected = state.palettes.selected();
            egui::ComboBox::from_label("Palette")
                .selected_text(state.palettes.current().name.as_str())
                .show_ui(ui, |ui| {
                    for (i, entry) in state.palettes.iter().enumerate() {
                        ui.selectable_value(&mut selected, i, entry.name.as_str());
                    }
                });
            if selected != state.palettes.selected() {
                state.select_palette(selected);
            }

            let view = &mut state.palette_view;
            ui.add(egui::Slider::new(&mut view.offset, -1.0..=1.0).text("Offset"));
            ui.add(
                egui::Slider::new(&mut view.range, 0.05..=4.0)
                    .logarithmic(true)
                    .text("Range"),
            );
            ui.checkbox(&mut view.reverse, "Reverse");
            if ui.button("Reset mapping").clicked() {
                *view = Default::default();
            }

            ui.separator();
            preview(ui, state);

            ui.horizontal(|ui| {
                if ui.button("Export...").clicked() {
                    let name = format!("{}.png", state.palettes.current().name);
                    if let Some(path) = pick_save(&[PNG, JSON], &name) {
                        let _ = export_palette(state, &path);
                    }
                }
                if ui.button("New noise").on_hover_text("Regenerate the noise texture").clicked() {
                    state.noise_dirty = true;
                }
            });
        });
    }
}

/// The palette as the shader sees it, speed zero on the left.
fn preview(ui: &mut egui::Ui, state: &AppState) {
    let width = ui.available_width().max(120.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 18.0), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let step = rect.width() / PREVIEW_STEPS as f32;
    let palette = state.palettes.current();

    for i in 0..PREVIEW_STEPS {
        let t = (i as f32 + 0.5) / PREVIEW_STEPS as f32;
        let coord = state.palette_view.coordinate(t).rem_euclid(1.0);
        let c = palette.sample(coord);
        let color = egui::Color32::from_rgb(
            (c.x.clamp(0.0, 1.0) * 255.0) as u8,
            (c.y.clamp(0.0, 1.0) * 255.0) as u8,
            (c.z.clamp(0.0, 1.0) * 255.0) as u8,
        );
        let x = rect.left() + i as f32 * step;
        let swatch = egui::Rect::from_min_max(
            egui::pos2(x, rect.top()),
            egui::pos2(x + step + 0.5, rect.bottom()),
        );
        painter.rect_filled(swatch, 0.0, color);
    }
}
