//! Direct control over the emitter.

use super::attractor::vec3_edit;
use super::{Dialog, DialogBase};
use crate::state::{AppState, Command};

pub struct ParticleEditDialog {
    base: DialogBase,
}

impl ParticleEditDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Particle Edit", false),
        }
    }
}

impl Default for ParticleEditDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for ParticleEditDialog {
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
            let emitter = &mut state.emitter;
            ui.checkbox(&mut emitter.paused, "Pause emission (Space)");
            ui.add(
                egui::Slider::new(&mut emitter.steps_per_frame, 1..=100_000)
                    .logarithmic(true)
                    .text("Steps per frame"),
            );
            ui.add(egui::Slider::new(&mut emitter.warmup, 0..=10_000).text("Warmup"));
            ui.add(egui::ProgressBar::new(emitter.fill_ratio()).text(format!(
                "{} / {}",
                emitter.len(),
                emitter.capacity()
            )));

            ui.separator();
            let mut restart = false;
            ui.horizontal(|ui| {
                ui.label("Start");
                restart |= vec3_edit(ui, &mut state.attractors.current_mut().start, 0.01);
            });
            ui.horizontal(|ui| {
                if ui.button("Emit 1000").clicked() {
                    state.emitter.emit(state.attractors.current(), 1000);
                }
                restart |= ui.button("Restart").clicked();
            });
            if restart {
                state.apply(Command::Restart);
            }
        });
    }
}
