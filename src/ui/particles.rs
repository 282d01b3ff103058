//! Point sprite and billboard settings.

use super::{Dialog, DialogBase};
use crate::render::{ParticleSettings, RenderMode};
use crate::state::AppState;

pub struct ParticlesDialog {
    base: DialogBase,
    ps_tree_visible: bool,
    bb_tree_visible: bool,
    collapse_trees: bool,
}

impl ParticlesDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Particles", true),
            ps_tree_visible: false,
            bb_tree_visible: false,
            collapse_trees: false,
        }
    }

    /// Whether the point-sprite and billboard sections are expanded.
    pub fn tree_flags(&self) -> (bool, bool) {
        (self.ps_tree_visible, self.bb_tree_visible)
    }

    /// Collapse both settings sections on the next frame.
    pub fn reset_tree_flags(&mut self) {
        self.ps_tree_visible = false;
        self.bb_tree_visible = false;
        self.collapse_trees = true;
    }

    /// Widgets for one render mode's settings. `id` keeps the two sets apart.
    ///
    /// Returns true if any value changed.
    pub fn view_settings(ui: &mut egui::Ui, settings: &mut ParticleSettings, id: char) -> bool {
        let mut changed = false;
        egui::Grid::new(("particle_settings", id)).num_columns(2).show(ui, |ui| {
            ui.label("Size");
            let size = if id == 'b' {
                egui::Slider::new(&mut settings.size, 0.0005..=0.1).logarithmic(true)
            } else {
                egui::Slider::new(&mut settings.size, 0.5..=32.0).suffix(" px")
            };
            changed |= ui.add(size).changed();
            ui.end_row();

            ui.label("Alpha");
            changed |= ui.add(egui::Slider::new(&mut settings.alpha, 0.0..=1.0)).changed();
            ui.end_row();

            ui.label("Intensity");
            changed |= ui.add(egui::Slider::new(&mut settings.intensity, 0.0..=4.0)).changed();
            ui.end_row();

            ui.label("Speed gain");
            changed |= ui
                .add(egui::Slider::new(&mut settings.speed_gain, 0.1..=10.0).logarithmic(true))
                .changed();
            ui.end_row();

            ui.label("Noise");
            changed |= ui.add(egui::Slider::new(&mut settings.noise_mix, 0.0..=1.0)).changed();
            ui.end_row();
        });

        changed |= ui.checkbox(&mut settings.additive, "Additive blending").changed();
        let additive = settings.additive;
        changed |= ui
            .add_enabled(!additive, egui::Checkbox::new(&mut settings.depth_test, "Depth test"))
            .changed();
        changed
    }
}

impl Default for ParticlesDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for ParticlesDialog {
    fn base(&self) -> &DialogBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DialogBase {
        &mut self.base
    }

    fn view(&mut self, ctx: &egui::Context, state: &mut AppState) {
        let Self {
            base,
            ps_tree_visible,
            bb_tree_visible,
            collapse_trees,
        } = self;
        let Some(window) = base.window() else {
            return;
        };
        let force = std::mem::take(collapse_trees).then_some(false);
        let render = &mut state.render;

        window.show(ctx, |ui| {
            ui.horizontal(|ui| {
                for mode in [RenderMode::PointSprite, RenderMode::Billboard] {
                    ui.radio_value(&mut render.mode, mode, mode.label());
                }
            });
            ui.separator();

            let sections = [
                (RenderMode::PointSprite, 'p', ps_tree_visible),
                (RenderMode::Billboard, 'b', bb_tree_visible),
            ];
            for (mode, id, flag) in sections {
                let header = egui::CollapsingHeader::new(mode.label())
                    .id_salt(("particles_tree", id))
                    .open(force)
                    .show(ui, |ui| {
                        Self::view_settings(ui, render.settings_mut(mode), id);
                    });
                *flag = header.body_returned.is_some();
            }
        });
    }
}
