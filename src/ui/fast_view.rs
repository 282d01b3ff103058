//! One-click attractor list.

use super::{Dialog, DialogBase};
use crate::state::AppState;

pub struct FastViewDialog {
    base: DialogBase,
}

impl FastViewDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Chaotic attractors", false),
        }
    }
}

impl Default for FastViewDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for FastViewDialog {
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
            let selected = state.attractors.selected();
            let mut clicked = None;
            egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                for (i, attractor) in state.attractors.iter().enumerate() {
                    if ui.selectable_label(i == selected, attractor.name()).clicked() {
                        clicked = Some(i);
                    }
                }
            });
            if let Some(i) = clicked {
                state.select_attractor(i);
            }
        });
    }
}
