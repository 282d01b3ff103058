//! Attractor files and program settings.
//!
//! Both are JSON. Attractor files capture everything needed to reproduce a
//! view: equation parameters, palette, render settings, camera and clipping.
//! Program settings hold preferences that apply to every attractor.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::attractors::{Attractor, AttractorKind};
use crate::camera::Camera;
use crate::emitter::{DEFAULT_CAPACITY, DEFAULT_STEPS_PER_FRAME, DEFAULT_WARMUP, MAX_CAPACITY};
use crate::error::ConfigError;
use crate::palettes::PaletteView;
use crate::render::{ClippingPlanes, RenderSettings};
use crate::textures::{TexturePrecision, MAX_TEXTURE_WIDTH};

/// Program settings file, looked up in the working directory.
pub const SETTINGS_FILE: &str = "chaos-points.json";

/// A saved attractor view.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AttractorFile {
    pub attractor: String,
    pub params: Vec<f32>,
    pub dt: f32,
    pub start: Vec3,
    #[serde(default)]
    pub palette: Option<String>,
    #[serde(default)]
    pub palette_view: PaletteView,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub clipping: ClippingPlanes,
}

impl AttractorFile {
    /// Rebuild the attractor, checking name and parameter count.
    pub fn to_attractor(&self) -> Result<Attractor, ConfigError> {
        let kind = AttractorKind::from_name(&self.attractor)
            .ok_or_else(|| ConfigError::UnknownAttractor(self.attractor.clone()))?;
        let mut attractor = Attractor::new(kind);
        if !attractor.set_params(&self.params) {
            return Err(ConfigError::ParamCount {
                attractor: self.attractor.clone(),
                expected: kind.default_params().len(),
                actual: self.params.len(),
            });
        }
        if kind.is_ode() {
            attractor.dt = self.dt;
        }
        attractor.start = self.start;
        Ok(attractor)
    }
}

/// Load an attractor file, validating it before returning.
pub fn load_attractor_file(path: impl AsRef<Path>) -> Result<AttractorFile, ConfigError> {
    let json = fs::read_to_string(path.as_ref())?;
    let file: AttractorFile = serde_json::from_str(&json)?;
    file.to_attractor()?;
    log::info!("Loaded attractor '{}' from {}", file.attractor, path.as_ref().display());
    Ok(file)
}

/// Save an attractor file as pretty-printed JSON.
pub fn save_attractor_file(path: impl AsRef<Path>, file: &AttractorFile) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(file)?;
    fs::write(path.as_ref(), json)?;
    log::info!("Saved attractor '{}' to {}", file.attractor, path.as_ref().display());
    Ok(())
}

/// Built-in GUI color schemes.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GuiTheme {
    #[default]
    Dark,
    Light,
}

impl GuiTheme {
    pub const ALL: [GuiTheme; 2] = [GuiTheme::Dark, GuiTheme::Light];

    pub fn label(&self) -> &'static str {
        match self {
            GuiTheme::Dark => "Dark",
            GuiTheme::Light => "Light",
        }
    }
}

/// Preferences that persist across sessions.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgramSettings {
    /// Ring buffer capacity in points.
    pub capacity: usize,
    pub steps_per_frame: u32,
    pub warmup: u32,
    pub palette_precision: TexturePrecision,
    pub vsync: bool,
    /// Texels in the noise texture.
    pub noise_size: usize,
    pub font_size: f32,
    pub font_zoom: f32,
    pub theme: GuiTheme,
    /// Accent color for selections and highlights (RGBA).
    pub theme_color: [f32; 4],
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            steps_per_frame: DEFAULT_STEPS_PER_FRAME,
            warmup: DEFAULT_WARMUP,
            palette_precision: TexturePrecision::Unorm8,
            vsync: true,
            noise_size: 1024,
            font_size: 13.0,
            font_zoom: 1.0,
            theme: GuiTheme::Dark,
            theme_color: [0.0, 0.30, 0.55, 1.0],
        }
    }
}

impl ProgramSettings {
    pub const CAPACITY_RANGE: RangeInclusive<usize> = 1_000..=MAX_CAPACITY;
    pub const STEPS_RANGE: RangeInclusive<u32> = 1..=200_000;
    pub const WARMUP_RANGE: RangeInclusive<u32> = 0..=100_000;
    pub const NOISE_RANGE: RangeInclusive<usize> = 1..=MAX_TEXTURE_WIDTH;
    pub const FONT_SIZE_RANGE: RangeInclusive<f32> = 8.0..=24.0;
    pub const FONT_ZOOM_RANGE: RangeInclusive<f32> = 0.5..=2.5;

    /// Clamp every field into the range the settings dialog allows.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.capacity = clamp_to(self.capacity, &Self::CAPACITY_RANGE);
        self.steps_per_frame = clamp_to(self.steps_per_frame, &Self::STEPS_RANGE);
        self.warmup = clamp_to(self.warmup, &Self::WARMUP_RANGE);
        self.noise_size = clamp_to(self.noise_size, &Self::NOISE_RANGE);
        self.font_size = clamp_finite(self.font_size, defaults.font_size, &Self::FONT_SIZE_RANGE);
        self.font_zoom = clamp_finite(self.font_zoom, defaults.font_zoom, &Self::FONT_ZOOM_RANGE);
        for (c, d) in self.theme_color.iter_mut().zip(defaults.theme_color) {
            *c = clamp_finite(*c, d, &(0.0..=1.0));
        }
        self
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults when the file is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                let sanitized = settings.clone().sanitized();
                if sanitized != settings {
                    log::warn!("Out-of-range values in {} were clamped", path.display());
                }
                sanitized
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Ignoring settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn clamp_to<T: Ord + Copy>(value: T, range: &RangeInclusive<T>) -> T {
    value.clamp(*range.start(), *range.end())
}

fn clamp_finite(value: f32, fallback: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lorenz_file() -> AttractorFile {
        AttractorFile {
            attractor: "Lorenz".into(),
            params: vec![10.0, 28.0, 2.5],
            dt: 0.004,
            start: Vec3::new(0.5, 0.5, 0.5),
            palette: Some("Fire".into()),
            palette_view: PaletteView::default(),
            render: RenderSettings::default(),
            camera: Camera::default(),
            clipping: ClippingPlanes::default(),
        }
    }

    #[test]
    fn test_to_attractor() {
        let a = lorenz_file().to_attractor().unwrap();
        assert_eq!(a.kind, AttractorKind::Lorenz);
        assert_eq!(a.params(), &[10.0, 28.0, 2.5]);
        assert_eq!(a.dt, 0.004);
        assert_eq!(a.start, Vec3::splat(0.5));
    }

    #[test]
    fn test_unknown_attractor() {
        let mut file = lorenz_file();
        file.attractor = "Nowhere".into();
        assert!(matches!(file.to_attractor(), Err(ConfigError::UnknownAttractor(n)) if n == "Nowhere"));
    }

    #[test]
    fn test_param_count_mismatch() {
        let mut file = lorenz_file();
        file.params.pop();
        match file.to_attractor() {
            Err(ConfigError::ParamCount { expected, actual, .. }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_map_ignores_dt() {
        let file = AttractorFile {
            attractor: "Pickover".into(),
            params: vec![1.0, 2.0, 3.0, 4.0],
            dt: 0.5,
            ..lorenz_file()
        };
        assert_eq!(file.to_attractor().unwrap().dt, 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lorenz.json");
        let file = lorenz_file();
        save_attractor_file(&path, &file).unwrap();
        assert_eq!(load_attractor_file(&path).unwrap(), file);
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("min.json");
        fs::write(
            &path,
            r#"{"attractor":"thomas","params":[0.2],"dt":0.05,"start":[0.1,0.0,0.0]}"#,
        )
        .unwrap();
        let file = load_attractor_file(&path).unwrap();
        assert_eq!(file.render, RenderSettings::default());
        assert!(file.palette.is_none());
    }

    #[test]
    fn test_load_rejects_bad_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"attractor":"Lorenz","params":[1.0],"dt":0.01,"start":[0,0,0]}"#).unwrap();
        assert!(matches!(load_attractor_file(&path), Err(ConfigError::ParamCount { .. })));
    }

    #[test]
    fn test_settings_defaults_on_missing_fields() {
        let settings: ProgramSettings = serde_json::from_str(r#"{"vsync":false}"#).unwrap();
        assert!(!settings.vsync);
        assert_eq!(settings.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_settings_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(ProgramSettings::load_or_default(&missing), ProgramSettings::default());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert_eq!(ProgramSettings::load_or_default(&broken), ProgramSettings::default());

        let good = dir.path().join("good.json");
        let settings = ProgramSettings { steps_per_frame: 77, ..ProgramSettings::default() };
        settings.save(&good).unwrap();
        assert_eq!(ProgramSettings::load_or_default(&good), settings);
    }

    #[test]
    fn test_out_of_range_settings_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"capacity":100000000,"noise_size":100000,"font_size":-5.0}"#).unwrap();

        let settings = ProgramSettings::load_or_default(&path);
        assert_eq!(settings.capacity, MAX_CAPACITY);
        assert_eq!(settings.noise_size, MAX_TEXTURE_WIDTH);
        assert_eq!(settings.font_size, 8.0);
        assert_eq!(settings.font_zoom, 1.0);
    }

    #[test]
    fn test_sanitized_replaces_non_finite_values() {
        let settings = ProgramSettings {
            capacity: 0,
            steps_per_frame: 0,
            warmup: u32::MAX,
            noise_size: 0,
            font_size: f32::NAN,
            font_zoom: f32::INFINITY,
            theme_color: [2.0, -1.0, f32::NAN, 0.5],
            ..ProgramSettings::default()
        }
        .sanitized();
        assert_eq!(settings.capacity, 1_000);
        assert_eq!(settings.steps_per_frame, 1);
        assert_eq!(settings.warmup, 100_000);
        assert_eq!(settings.noise_size, 1);
        assert_eq!(settings.font_size, 13.0);
        assert_eq!(settings.font_zoom, 1.0);
        assert_eq!(settings.theme_color, [1.0, 0.0, 0.55, 0.5]);

        let defaults = ProgramSettings::default();
        assert_eq!(defaults.clone().sanitized(), defaults);
    }
}
