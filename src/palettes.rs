//! Color palettes for point rendering.
//!
//! A palette is a list of RGB colors uploaded as a 1-D texture. Each point
//! picks its color by looking up a coordinate derived from its speed, after
//! the [`PaletteView`] offset/range/reverse adjustment.
//!
//! Built-in palettes are expanded from five color stops; user palettes are
//! loaded from JSON files written by [`write_palette`].

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TextureError};
use crate::textures::{TextureData, MAX_TEXTURE_WIDTH};

/// Texels in a built-in palette.
pub const PALETTE_SIZE: usize = 256;

const BUILTIN_STOPS: &[(&str, [[f32; 3]; 5])] = &[
    ("Viridis", [[0.267, 0.004, 0.329], [0.282, 0.140, 0.458], [0.127, 0.566, 0.551], [0.369, 0.789, 0.383], [0.993, 0.906, 0.144]]),
    ("Magma", [[0.001, 0.0, 0.014], [0.329, 0.071, 0.435], [0.716, 0.215, 0.475], [0.994, 0.541, 0.380], [0.987, 0.991, 0.749]]),
    ("Plasma", [[0.050, 0.030, 0.528], [0.494, 0.012, 0.658], [0.798, 0.280, 0.470], [0.973, 0.580, 0.254], [0.940, 0.975, 0.131]]),
    ("Inferno", [[0.001, 0.0, 0.014], [0.341, 0.063, 0.429], [0.735, 0.216, 0.330], [0.988, 0.645, 0.198], [0.988, 1.0, 0.644]]),
    ("Sunset", [[0.1, 0.0, 0.2], [0.5, 0.0, 0.5], [1.0, 0.2, 0.4], [1.0, 0.5, 0.2], [1.0, 0.9, 0.4]]),
    ("Ocean", [[0.0, 0.05, 0.15], [0.0, 0.2, 0.4], [0.0, 0.4, 0.6], [0.2, 0.6, 0.8], [0.6, 0.9, 1.0]]),
    ("Fire", [[0.1, 0.0, 0.0], [0.5, 0.0, 0.0], [1.0, 0.3, 0.0], [1.0, 0.7, 0.0], [1.0, 1.0, 0.8]]),
    ("Ice", [[1.0, 1.0, 1.0], [0.8, 0.9, 1.0], [0.4, 0.7, 1.0], [0.1, 0.4, 0.8], [0.0, 0.1, 0.4]]),
    ("Neon", [[1.0, 0.0, 0.5], [0.5, 0.0, 1.0], [0.0, 0.5, 1.0], [0.0, 1.0, 1.0], [0.5, 1.0, 0.5]]),
    ("Forest", [[0.1, 0.05, 0.0], [0.3, 0.15, 0.05], [0.2, 0.4, 0.1], [0.3, 0.6, 0.2], [0.5, 0.8, 0.3]]),
    ("Grayscale", [[0.0, 0.0, 0.0], [0.25, 0.25, 0.25], [0.5, 0.5, 0.5], [0.75, 0.75, 0.75], [1.0, 1.0, 1.0]]),
];

/// A named list of RGB colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub colors: Vec<[f32; 3]>,
    /// Sample with nearest filtering so each color shows as a flat band.
    #[serde(default)]
    pub banded: bool,
}

impl PaletteEntry {
    /// Expand color stops into `size` evenly interpolated colors.
    pub fn from_stops(name: impl Into<String>, stops: &[[f32; 3]], size: usize) -> Self {
        let colors = (0..size)
            .map(|i| {
                let t = i as f32 / (size - 1).max(1) as f32;
                sample_stops(stops, t).to_array()
            })
            .collect();
        Self {
            name: name.into(),
            colors,
            banded: false,
        }
    }

    /// Hue ramp palette.
    pub fn hls(size: usize) -> Result<Self, TextureError> {
        let ramp = TextureData::hls_ramp(size)?;
        Ok(Self {
            name: "HLS".into(),
            colors: ramp.texels.iter().map(|t| [t[0], t[1], t[2]]).collect(),
            banded: false,
        })
    }

    /// Build the texture for this palette.
    ///
    /// Smooth palettes are quantized to 8-bit and filtered linearly; banded
    /// palettes keep full float precision with nearest filtering.
    pub fn to_texture(&self) -> Result<TextureData, TextureError> {
        let flat: Vec<f32> = self.colors.iter().flatten().copied().collect();
        if self.banded {
            TextureData::palette_from_f32(&flat, self.colors.len())
        } else {
            let bytes: Vec<u8> = flat
                .iter()
                .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect();
            TextureData::palette_from_u8(&bytes, self.colors.len())
        }
    }

    /// Color at normalized position `t`, interpolating between entries.
    pub fn sample(&self, t: f32) -> Vec3 {
        sample_stops(&self.colors, t)
    }
}

fn sample_stops(stops: &[[f32; 3]], t: f32) -> Vec3 {
    match stops.len() {
        0 => Vec3::ONE,
        1 => Vec3::from_array(stops[0]),
        n => {
            let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
            let i = (scaled.floor() as usize).min(n - 2);
            let f = scaled - i as f32;
            Vec3::from_array(stops[i]).lerp(Vec3::from_array(stops[i + 1]), f)
        }
    }
}

/// How speed values map onto the palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteView {
    /// Shift added to every coordinate. The texture repeats, so this rotates colors.
    pub offset: f32,
    /// Portion of the palette spanned by speeds from zero to max.
    pub range: f32,
    /// Walk the palette backwards.
    pub reverse: bool,
}

impl Default for PaletteView {
    fn default() -> Self {
        Self {
            offset: 0.0,
            range: 1.0,
            reverse: false,
        }
    }
}

impl PaletteView {
    /// Texture coordinate for a normalized value `t` in `[0, 1]`.
    pub fn coordinate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let t = if self.reverse { 1.0 - t } else { t };
        self.offset + t * self.range
    }
}

/// Built-in and user palettes with the current selection.
#[derive(Debug, Clone)]
pub struct PaletteLibrary {
    entries: Vec<PaletteEntry>,
    selected: usize,
}

impl PaletteLibrary {
    pub fn new() -> Self {
        let mut entries: Vec<PaletteEntry> = BUILTIN_STOPS
            .iter()
            .map(|(name, stops)| PaletteEntry::from_stops(*name, stops, PALETTE_SIZE))
            .collect();
        if let Ok(hls) = PaletteEntry::hls(PALETTE_SIZE) {
            entries.push(hls);
        }
        Self { entries, selected: 0 }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> &PaletteEntry {
        &self.entries[self.selected]
    }

    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter()
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Add a palette, replacing one with the same name. Returns its index.
    pub fn add(&mut self, entry: PaletteEntry) -> usize {
        if let Some(i) = self.find(&entry.name) {
            self.entries[i] = entry;
            i
        } else {
            self.entries.push(entry);
            self.entries.len() - 1
        }
    }
}

impl Default for PaletteLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Write palette `idx` to `path`.
///
/// A `.png` extension writes a one-pixel-high image strip; anything else
/// writes JSON readable by [`read_palette`].
pub fn write_palette(library: &PaletteLibrary, path: impl AsRef<Path>, idx: usize) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let entry = library.get(idx).ok_or(ConfigError::NoSuchPalette(idx))?;
    if entry.colors.is_empty() {
        return Err(ConfigError::EmptyPalette);
    }

    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));

    if is_png {
        let mut img = image::RgbImage::new(entry.colors.len() as u32, 1);
        for (x, c) in entry.colors.iter().enumerate() {
            let px = c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
            img.put_pixel(x as u32, 0, image::Rgb(px));
        }
        img.save(path)?;
    } else {
        std::fs::write(path, serde_json::to_string_pretty(entry)?)?;
    }
    log::info!("Wrote palette '{}' to {}", entry.name, path.display());
    Ok(())
}

/// Read a JSON palette file.
pub fn read_palette(path: impl AsRef<Path>) -> Result<PaletteEntry, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    let entry: PaletteEntry = serde_json::from_str(&json)?;
    if entry.colors.is_empty() {
        return Err(ConfigError::EmptyPalette);
    }
    if entry.colors.len() > MAX_TEXTURE_WIDTH {
        return Err(ConfigError::PaletteTooLarge {
            colors: entry.colors.len(),
            max: MAX_TEXTURE_WIDTH,
        });
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::FilterMode;

    #[test]
    fn test_library_has_builtins_and_hls() {
        let lib = PaletteLibrary::new();
        assert_eq!(lib.len(), BUILTIN_STOPS.len() + 1);
        assert!(lib.find("viridis").is_some());
        assert!(lib.find("HLS").is_some());
        assert!(lib.iter().all(|p| p.colors.len() == PALETTE_SIZE));
    }

    #[test]
    fn test_from_stops_hits_endpoints() {
        let stops = [[0.0, 0.0, 0.0], [1.0, 0.5, 0.0]];
        let entry = PaletteEntry::from_stops("test", &stops, 11);
        assert_eq!(entry.colors[0], [0.0, 0.0, 0.0]);
        assert_eq!(entry.colors[10], [1.0, 0.5, 0.0]);
        assert!((entry.colors[5][0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sample_clamps() {
        let entry = PaletteEntry::from_stops("test", &[[0.0; 3], [1.0; 3]], 2);
        assert_eq!(entry.sample(-1.0), Vec3::ZERO);
        assert_eq!(entry.sample(2.0), Vec3::ONE);
    }

    #[test]
    fn test_texture_filter_follows_banding() {
        let mut entry = PaletteEntry::from_stops("test", &[[0.0; 3], [1.0; 3]], 4);
        assert_eq!(entry.to_texture().unwrap().filter, FilterMode::Linear);
        entry.banded = true;
        assert_eq!(entry.to_texture().unwrap().filter, FilterMode::Nearest);
    }

    #[test]
    fn test_view_coordinate() {
        let view = PaletteView { offset: 0.25, range: 0.5, reverse: false };
        assert_eq!(view.coordinate(0.0), 0.25);
        assert_eq!(view.coordinate(1.0), 0.75);

        let reversed = PaletteView { reverse: true, ..view };
        assert_eq!(reversed.coordinate(0.0), 0.75);
        assert_eq!(reversed.coordinate(5.0), 0.25);
    }

    #[test]
    fn test_add_replaces_by_name() {
        let mut lib = PaletteLibrary::new();
        let n = lib.len();
        let idx = lib.add(PaletteEntry::from_stops("Mine", &[[1.0, 0.0, 0.0]], 4));
        assert_eq!(idx, n);
        let again = lib.add(PaletteEntry::from_stops("mine", &[[0.0, 1.0, 0.0]], 4));
        assert_eq!(again, n);
        assert_eq!(lib.len(), n + 1);
        assert_eq!(lib.get(n).unwrap().colors[0], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_write_and_read_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fire.json");
        let lib = PaletteLibrary::new();
        let idx = lib.find("Fire").unwrap();
        write_palette(&lib, &path, idx).unwrap();
        let back = read_palette(&path).unwrap();
        assert_eq!(&back, lib.get(idx).unwrap());
    }

    #[test]
    fn test_write_png_strip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocean.png");
        let lib = PaletteLibrary::new();
        write_palette(&lib, &path, lib.find("Ocean").unwrap()).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), PALETTE_SIZE as u32);
        assert_eq!(img.height(), 1);
    }

    #[test]
    fn test_write_unknown_index() {
        let dir = tempfile::tempdir().unwrap();
        let lib = PaletteLibrary::new();
        let err = write_palette(&lib, dir.path().join("x.json"), 999).unwrap_err();
        assert!(matches!(err, ConfigError::NoSuchPalette(999)));
    }

    #[test]
    fn test_read_empty_palette_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, r#"{"name":"empty","colors":[]}"#).unwrap();
        assert!(matches!(read_palette(&path), Err(ConfigError::EmptyPalette)));
    }

    #[test]
    fn test_read_oversized_palette_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.json");
        let huge = PaletteEntry {
            name: "huge".into(),
            colors: vec![[0.5, 0.5, 0.5]; MAX_TEXTURE_WIDTH + 1],
            banded: false,
        };
        std::fs::write(&path, serde_json::to_string(&huge).unwrap()).unwrap();
        assert!(matches!(
            read_palette(&path),
            Err(ConfigError::PaletteTooLarge { colors, max }) if colors == MAX_TEXTURE_WIDTH + 1 && max == MAX_TEXTURE_WIDTH
        ));
        assert!(matches!(huge.to_texture(), Err(TextureError::TooWide { .. })));
    }
}
