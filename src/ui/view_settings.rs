//! Camera and background.

use super::{Dialog, DialogBase};
use crate::state::AppState;

pub struct ViewSettingsDialog {
    base: DialogBase,
}

impl ViewSettingsDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("View Tools", false),
        }
    }
}

impl Default for ViewSettingsDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for ViewSettingsDialog {
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
            let camera = &mut state.camera;
            ui.add(egui::Slider::new(&mut camera.fov_y, 10.0..=120.0).text("Field of view").suffix("°"));
            ui.add(
                egui::Slider::new(&mut camera.distance, 0.2..=50.0)
                    .logarithmic(true)
                    .text("Distance"),
            );
            ui.horizontal(|ui| {
                ui.label("Near / far");
                ui.add(egui::DragValue::new(&mut camera.near).speed(0.001).range(0.001..=1.0));
                ui.add(egui::DragValue::new(&mut camera.far).speed(1.0).range(2.0..=1000.0));
            });
            ui.add(egui::Slider::new(&mut camera.auto_rotate, -2.0..=2.0).text("Auto rotate"));
            if ui.button("Reset camera").clicked() {
                camera.reset();
            }

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Background");
                ui.color_edit_button_rgb(&mut state.render.background);
            });
        });
    }
}
