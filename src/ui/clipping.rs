//! Clipping planes.

use super::attractor::vec3_edit;
use super::{Dialog, DialogBase};
use crate::render::ClippingPlanes;
use crate::state::AppState;

pub struct ClippingDialog {
    base: DialogBase,
}

impl ClippingDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Clipping planes", false),
        }
    }
}

impl Default for ClippingDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for ClippingDialog {
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
            ui.label("Points behind an enabled plane are hidden.");
            for (i, plane) in state.clipping.planes.iter_mut().enumerate() {
                ui.push_id(i, |ui| {
                    ui.separator();
                    ui.checkbox(&mut plane.enabled, format!("Plane {}", i + 1));
                    ui.add_enabled_ui(plane.enabled, |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Normal");
                            vec3_edit(ui, &mut plane.normal, 0.01);
                        });
                        ui.add(egui::Slider::new(&mut plane.distance, -1.5..=1.5).text("Distance"));
                    });
                });
            }
            ui.separator();
            if ui.button("Reset").clicked() {
                state.clipping = ClippingPlanes::default();
            }
        });
    }
}
