use super::{Dialog, DialogBase};
use crate::state::AppState;

/// Keyboard shortcuts, listed in the about box.
pub const SHORTCUTS: [(&str, &str); 5] = [
    ("F1", "Show / hide the GUI"),
    ("Space", "Pause / resume emission"),
    ("R", "Restart"),
    ("G", "Generate a new start point"),
    ("F11", "Show / hide info"),
];

pub struct AboutDialog {
    base: DialogBase,
}

impl AboutDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("About", false),
        }
    }
}

impl Default for AboutDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for AboutDialog {
    fn base(&self) -> &DialogBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DialogBase {
        &mut self.base
    }

    fn view(&mut self, ctx: &egui::Context, _state: &mut AppState) {
        let Some(window) = self.base.window() else {
            return;
        };
        window.show(ctx, |ui| {
            ui.heading(format!("chaos-points {}", env!("CARGO_PKG_VERSION")));
            ui.label(env!("CARGO_PKG_DESCRIPTION"));
            ui.separator();
            egui::Grid::new("shortcuts").num_columns(2).show(ui, |ui| {
                for (key, action) in SHORTCUTS {
                    ui.monospace(key);
                    ui.label(action);
                    ui.end_row();
                }
            });
            ui.separator();
            ui.label("Left drag orbits, wheel zooms.");
        });
    }
}
