//! Trackball gizmo rotating the cloud.

use glam::{Vec2, Vec3};

use super::{Dialog, DialogBase};
use crate::camera::Camera;
use crate::state::AppState;

const GIZMO_SIZE: f32 = 120.0;

pub struct GizmoDialog {
    base: DialogBase,
}

impl GizmoDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Gizmo", true),
        }
    }
}

impl Default for GizmoDialog {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen-space direction (y down) of a world axis as seen by `camera`.
fn axis_on_screen(camera: &Camera, axis: Vec3) -> Vec2 {
    let d = camera.view_matrix().transform_vector3(axis);
    Vec2::new(d.x, -d.y)
}

impl Dialog for GizmoDialog {
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
        window.title_bar(false).show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(GIZMO_SIZE, GIZMO_SIZE), egui::Sense::drag());
            if response.dragged() {
                let d = response.drag_delta();
                state.camera.rotate_by_drag(Vec2::new(d.x, d.y));
            }

            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = GIZMO_SIZE * 0.4;
            painter.circle_stroke(center, radius, ui.visuals().widgets.noninteractive.bg_stroke);

            let axes = [
                (Vec3::X, egui::Color32::from_rgb(230, 70, 70), "X"),
                (Vec3::Y, egui::Color32::from_rgb(70, 200, 70), "Y"),
                (Vec3::Z, egui::Color32::from_rgb(80, 120, 240), "Z"),
            ];
            for (axis, color, label) in axes {
                let dir = axis_on_screen(&state.camera, axis) * radius;
                let tip = center + egui::vec2(dir.x, dir.y);
                painter.line_segment([center, tip], egui::Stroke::new(2.0, color));
                painter.text(tip, egui::Align2::CENTER_CENTER, label, egui::FontId::monospace(11.0), color);
            }

            if ui.small_button("Reset").clicked() {
                state.camera.rotation = glam::Quat::IDENTITY;
            }
        });
    }
}
