//! Loading and saving attractor files and palettes.
//!
//! The file operations are plain functions over [`AppState`] so the
//! keyboard handler, the command line and the dialogs share them. Each one
//! leaves a status message for the main dialog.

use std::path::{Path, PathBuf};

use super::{Dialog, DialogBase};
use crate::config::{load_attractor_file, save_attractor_file};
use crate::error::ConfigError;
use crate::palettes::{read_palette, write_palette};
use crate::state::AppState;

/// Load an attractor file into `state`.
pub fn load_attractor(state: &mut AppState, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let result = load_attractor_file(path).and_then(|file| state.apply_file(&file));
    report(state, result, || format!("Loaded {}", path.display()))
}

/// Save the current view as an attractor file.
pub fn save_attractor(state: &mut AppState, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let result = save_attractor_file(path, &state.to_file());
    report(state, result, || format!("Saved {}", path.display()))
}

/// Write the selected palette as JSON or PNG, chosen by extension.
pub fn export_palette(state: &mut AppState, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let result = write_palette(&state.palettes, path, state.palettes.selected());
    report(state, result, || format!("Exported palette to {}", path.display()))
}

/// Add a JSON palette to the library and select it.
pub fn import_palette(state: &mut AppState, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let result = read_palette(path).map(|entry| {
        let index = state.palettes.add(entry);
        state.select_palette(index);
    });
    report(state, result, || format!("Imported palette from {}", path.display()))
}

fn report(
    state: &mut AppState,
    result: Result<(), ConfigError>,
    success: impl FnOnce() -> String,
) -> Result<(), ConfigError> {
    match &result {
        Ok(()) => state.set_status(success()),
        Err(e) => {
            log::warn!("{}", e);
            state.set_status(format!("Error: {}", e));
        }
    }
    result
}

#[cfg(not(target_arch = "wasm32"))]
pub(super) fn pick_open(filters: &[(&str, &[&str])]) -> Option<PathBuf> {
    filters
        .iter()
        .fold(rfd::FileDialog::new(), |dialog, (name, ext)| dialog.add_filter(*name, *ext))
        .pick_file()
}

#[cfg(not(target_arch = "wasm32"))]
pub(super) fn pick_save(filters: &[(&str, &[&str])], file_name: &str) -> Option<PathBuf> {
    filters
        .iter()
        .fold(rfd::FileDialog::new(), |dialog, (name, ext)| dialog.add_filter(*name, *ext))
        .set_file_name(file_name)
        .save_file()
}

#[cfg(target_arch = "wasm32")]
pub(super) fn pick_open(_filters: &[(&str, &[&str])]) -> Option<PathBuf> {
    None
}

#[cfg(target_arch = "wasm32")]
pub(super) fn pick_save(_filters: &[(&str, &[&str])], _file_name: &str) -> Option<PathBuf> {
    None
}

pub(super) const JSON: (&str, &[&str]) = ("JSON", &["json"]);
pub(super) const PNG: (&str, &[&str]) = ("PNG image", &["png"]);

pub struct DataDialog {
    base: DialogBase,
    last_file: Option<PathBuf>,
}

impl DataDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Data", false),
            last_file: None,
        }
    }
}

impl Default for DataDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog for DataDialog {
    fn base(&self) -> &DialogBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DialogBase {
        &mut self.base
    }

    fn view(&mut self, ctx: &egui::Context, state: &mut AppState) {
        let Self { base, last_file } = self;
        let Some(window) = base.window() else {
            return;
        };
        window.show(ctx, |ui| {
            ui.label("Attractor file");
            ui.horizontal(|ui| {
                if ui.button("Load...").clicked() {
                    if let Some(path) = pick_open(&[JSON]) {
                        if load_attractor(state, &path).is_ok() {
                            *last_file = Some(path);
                        }
                    }
                }
                if ui.button("Save as...").clicked() {
                    let name = format!("{}.json", state.attractor().name().replace(' ', "_"));
                    if let Some(path) = pick_save(&[JSON], &name) {
                        if save_attractor(state, &path).is_ok() {
                            *last_file = Some(path);
                        }
                    }
                }
                let can_save = last_file.is_some();
                if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                    if let Some(path) = last_file.clone() {
                        let _ = save_attractor(state, &path);
                    }
                }
            });
            if let Some(path) = last_file.as_ref() {
                ui.small(path.display().to_string());
            }

            ui.separator();
            ui.label("Palette");
            ui.horizontal(|ui| {
                if ui.button("Import...").clicked() {
                    if let Some(path) = pick_open(&[JSON]) {
                        let _ = import_palette(state, &path);
                    }
                }
                if ui.button("Export...").clicked() {
                    let name = format!("{}.json", state.palettes.current().name);
                    if let Some(path) = pick_save(&[JSON, PNG], &name) {
                        let _ = export_palette(state, &path);
                    }
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attractors::AttractorKind;
    use crate::config::ProgramSettings;

    fn state() -> AppState {
        AppState::new(ProgramSettings {
            capacity: 256,
            ..ProgramSettings::default()
        })
    }

    #[test]
    fn test_save_then_load_restores_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");

        let mut a = state();
        a.select_attractor(3);
        a.camera.distance = 7.5;
        save_attractor(&mut a, &path).unwrap();
        assert!(a.status.as_deref().unwrap().starts_with("Saved"));

        let mut b = state();
        load_attractor(&mut b, &path).unwrap();
        assert_eq!(b.attractor().kind, AttractorKind::Thomas);
        assert_eq!(b.camera.distance, 7.5);
    }

    #[test]
    fn test_load_failure_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = state();
        assert!(load_attractor(&mut s, dir.path().join("missing.json")).is_err());
        assert!(s.status.as_deref().unwrap().starts_with("Error"));
        assert_eq!(s.attractor().kind, AttractorKind::Lorenz);
    }

    #[test]
    fn test_palette_export_import() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("fire.json");
        let png = dir.path().join("fire.png");

        let mut s = state();
        let fire = s.palettes.find("Fire").unwrap();
        s.select_palette(fire);
        export_palette(&mut s, &json).unwrap();
        export_palette(&mut s, &png).unwrap();
        assert!(png.exists());

        let mut other = state();
        let before = other.palettes.len();
        other.palette_dirty = false;
        import_palette(&mut other, &json).unwrap();
        assert_eq!(other.palettes.len(), before);
        assert_eq!(other.palettes.current().name, "Fire");
        assert!(other.palette_dirty);
    }
}
