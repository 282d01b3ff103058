//! Attractor selection and equation parameters.

use glam::Vec3;

use super::{Dialog, DialogBase};
use crate::attractors::{AttractorKind, Integration};
use crate::state::{AppState, Command};

pub struct AttractorDialog {
    base: DialogBase,
}

impl AttractorDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Attractors", true),
        }
    }
}

impl Default for AttractorDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for AttractorDialog {
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
        window.default_width(300.0).show(ctx, |ui| {
            let mut selected = state.attractors.selected();
            egui::ComboBox::from_label("Attractor")
                .selected_text(state.attractor().name())
                .show_ui(ui, |ui| {
                    for (i, kind) in AttractorKind::ALL.iter().enumerate() {
                        ui.selectable_value(&mut selected, i, kind.name());
                    }
                });
            if selected != state.attractors.selected() {
                state.select_attractor(selected);
            }

            let mut changed = false;
            let attractor = state.attractors.current_mut();
            let kind = attractor.kind;

            ui.label(match kind.integration() {
                Integration::Ode { .. } => "Differential equations, Runge-Kutta 4",
                Integration::Map => "Iterated map",
            });
            ui.separator();

            egui::Grid::new("attractor_params").num_columns(2).show(ui, |ui| {
                for (i, name) in kind.param_names().iter().enumerate() {
                    let mut value = attractor.params()[i];
                    ui.label(*name);
                    if ui.add(egui::DragValue::new(&mut value).speed(0.001)).changed() {
                        attractor.set_param(i, value);
                        changed = true;
                    }
                    ui.end_row();
                }
                if kind.is_ode() {
                    ui.label("dt");
                    changed |= ui
                        .add(egui::DragValue::new(&mut attractor.dt).speed(0.0001).range(1e-5..=0.1))
                        .changed();
                    ui.end_row();
                }
            });

            ui.horizontal(|ui| {
                ui.label("Start");
                changed |= vec3_edit(ui, &mut attractor.start, 0.01);
            });

            ui.separator();
            let mut command = None;
            ui.horizontal(|ui| {
                if ui.button("Generate").on_hover_text("New random start point (G)").clicked() {
                    command = Some(Command::Generate);
                }
                if ui.button("Reload").on_hover_text("Restore default parameters").clicked() {
                    command = Some(Command::Reload);
                }
                if ui.button("Restart").on_hover_text("Clear and start again (R)").clicked() {
                    command = Some(Command::Restart);
                }
            });

            if changed && command.is_none() {
                command = Some(Command::Restart);
            }
            if let Some(command) = command {
                state.apply(command);
            }

            ui.label(format!(
                "Elements: {} / {}",
                state.emitter.len(),
                state.emitter.capacity()
            ));
            if state.emitter.is_diverged() {
                ui.colored_label(egui::Color32::LIGHT_RED, "Diverged: change parameters and restart");
            }
        });
    }
}

/// Three drag values for a vector. Returns true if any changed.
pub(super) fn vec3_edit(ui: &mut egui::Ui, v: &mut Vec3, speed: f64) -> bool {
    let mut changed = false;
    changed |= ui.add(egui::DragValue::new(&mut v.x).speed(speed).prefix("x: ")).changed();
    changed |= ui.add(egui::DragValue::new(&mut v.y).speed(speed).prefix("y: ")).changed();
    changed |= ui.add(egui::DragValue::new(&mut v.z).speed(speed).prefix("z: ")).changed();
    changed
}
