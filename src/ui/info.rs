//! Frame rate, point counts and adapter.

use super::{Dialog, DialogBase};
use crate::state::AppState;

pub struct InfoDialog {
    base: DialogBase,
    /// Show frame time instead of frames per second.
    metric_ms: bool,
}

impl InfoDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Info", false),
            metric_ms: false,
        }
    }

    /// Frame-rate line in the selected metric.
    pub fn frame_rate_text(&self, state: &AppState) -> String {
        if self.metric_ms {
            format!("{:.2} ms/frame", state.time.frame_ms())
        } else {
            format!("{:.1} fps", state.time.fps())
        }
    }

    pub fn toggle_metric(&mut self) {
        self.metric_ms = !self.metric_ms;
    }
}

impl Default for InfoDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for InfoDialog {
    fn base(&self) -> &DialogBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DialogBase {
        &mut self.base
    }

    fn view(&mut self, ctx: &egui::Context, state: &mut AppState) {
        let rate = self.frame_rate_text(state);
        let Self { base, metric_ms } = self;
        let Some(window) = base.window() else {
            return;
        };
        window.show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong(rate);
                ui.toggle_value(metric_ms, "ms");
            });

            let emitter = &state.emitter;
            egui::Grid::new("info_grid").num_columns(2).show(ui, |ui| {
                ui.label("Attractor");
                ui.label(state.attractor().name());
                ui.end_row();

                ui.label("Points");
                ui.label(format!("{} / {}", emitter.len(), emitter.capacity()));
                ui.end_row();

                ui.label("Emitted");
                ui.label(emitter.total_emitted().to_string());
                ui.end_row();

                ui.label("Max speed");
                ui.label(format!("{:.5}", emitter.max_speed()));
                ui.end_row();

                if let Some((min, max)) = emitter.bounds() {
                    ui.label("Bounds");
                    ui.label(format!(
                        "({:.2}, {:.2}, {:.2}) - ({:.2}, {:.2}, {:.2})",
                        min.x, min.y, min.z, max.x, max.y, max.z
                    ));
                    ui.end_row();
                }

                ui.label("Palette");
                ui.label(format!(
                    "{} ({})",
                    state.palettes.current().name,
                    state.settings.palette_precision.label()
                ));
                ui.end_row();

                ui.label("Adapter");
                ui.label(state.adapter_info.as_str());
                ui.end_row();
            });

            if emitter.is_diverged() {
                ui.colored_label(egui::Color32::LIGHT_RED, "Emission stopped: the attractor diverged");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgramSettings;

    #[test]
    fn test_metric_toggle() {
        let state = AppState::new(ProgramSettings {
            capacity: 16,
            ..ProgramSettings::default()
        });
        let mut info = InfoDialog::new();
        assert!(info.frame_rate_text(&state).ends_with("fps"));
        info.toggle_metric();
        assert!(info.frame_rate_text(&state).ends_with("ms/frame"));
    }
}
