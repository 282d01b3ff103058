//! One-dimensional texture data for palettes and noise.
//!
//! Every texture the particle shader samples is a single row of RGB texels:
//! the active palette, the HLS hue ramp and the random-vector noise strip.
//! This module builds the texel data on the CPU; uploading and replacing the
//! GPU texture lives in `gpu::texture`.
//!
//! # Example
//!
//! ```ignore
//! let ramp = TextureData::hls_ramp(256)?;
//! let noise = TextureData::random_vectors(&mut rand::thread_rng(), 1024)?;
//! let bytes = ramp.to_bytes(TexturePrecision::Unorm8);
//! ```

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::{hls_to_rgb, random_unit_vector};
use crate::error::TextureError;

/// Widest 1-D texture accepted. Matches wgpu's default
/// `max_texture_dimension_2d`, which every adapter supports.
pub const MAX_TEXTURE_WIDTH: usize = 8192;

/// Filter mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default).
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering. Keeps palette bands crisp.
    Nearest,
}

/// Address mode for texture wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Clamp to edge color.
    ClampToEdge,
    /// Repeat the texture (default). Palette offsets wrap around.
    #[default]
    Repeat,
    /// Mirror the texture at boundaries.
    MirrorRepeat,
}

/// Storage precision of palette textures on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TexturePrecision {
    /// 8 bits per channel, normalized.
    #[default]
    Unorm8,
    /// 32-bit float per channel. Needs float32 filtering support.
    Float32,
}

impl TexturePrecision {
    /// Bytes used by one RGBA texel.
    pub fn bytes_per_texel(&self) -> u32 {
        match self {
            TexturePrecision::Unorm8 => 4,
            TexturePrecision::Float32 => 16,
        }
    }

    /// Display name for settings UIs.
    pub fn label(&self) -> &'static str {
        match self {
            TexturePrecision::Unorm8 => "RGBA 8 bit",
            TexturePrecision::Float32 => "RGBA 32 bit float",
        }
    }
}

/// Texel data and sampling attributes for a 1-pixel-high texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    /// RGBA texels, alpha is always 1.
    pub texels: Vec<[f32; 4]>,
    /// Filter mode for magnification/minification.
    pub filter: FilterMode,
    /// Address mode for coordinates outside 0-1.
    pub address_mode: AddressMode,
}

impl TextureData {
    fn from_rgb(colors: impl Iterator<Item = Vec3>, filter: FilterMode) -> Self {
        Self {
            texels: colors.map(|c| [c.x, c.y, c.z, 1.0]).collect(),
            filter,
            address_mode: AddressMode::Repeat,
        }
    }

    /// Hue ramp: texel `i` is HLS `(i / size, 0.5, 0.99)`.
    pub fn hls_ramp(size: usize) -> Result<Self, TextureError> {
        check_size(size)?;
        let colors = (0..size).map(|i| hls_to_rgb(Vec3::new(i as f32 / size as f32, 0.5, 0.99)));
        Ok(Self::from_rgb(colors, FilterMode::Linear))
    }

    /// Noise strip of random unit vectors remapped from `[-1, 1]` to `[0, 1]`.
    pub fn random_vectors<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Result<Self, TextureError> {
        check_size(size)?;
        let colors: Vec<Vec3> = (0..size)
            .map(|_| (random_unit_vector(rng) + Vec3::ONE) * 0.5)
            .collect();
        Ok(Self::from_rgb(colors.into_iter(), FilterMode::Linear))
    }

    /// Palette from packed 8-bit RGB triples. Sampled with linear filtering.
    pub fn palette_from_u8(rgb: &[u8], size: usize) -> Result<Self, TextureError> {
        check_len(rgb.len(), size)?;
        let colors = rgb
            .chunks_exact(3)
            .take(size)
            .map(|c| Vec3::new(c[0] as f32, c[1] as f32, c[2] as f32) / 255.0);
        Ok(Self::from_rgb(colors, FilterMode::Linear))
    }

    /// Palette from packed float RGB triples. Sampled with nearest filtering.
    pub fn palette_from_f32(rgb: &[f32], size: usize) -> Result<Self, TextureError> {
        check_len(rgb.len(), size)?;
        let colors = rgb
            .chunks_exact(3)
            .take(size)
            .map(|c| Vec3::new(c[0], c[1], c[2]));
        Ok(Self::from_rgb(colors, FilterMode::Nearest))
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Set the address mode.
    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }

    /// Texture width in texels.
    pub fn width(&self) -> u32 {
        self.texels.len() as u32
    }

    /// Raw upload bytes for the given precision.
    pub fn to_bytes(&self, precision: TexturePrecision) -> Vec<u8> {
        match precision {
            TexturePrecision::Unorm8 => self
                .texels
                .iter()
                .flat_map(|t| t.map(unorm8))
                .collect(),
            TexturePrecision::Float32 => bytemuck::cast_slice(&self.texels).to_vec(),
        }
    }
}

fn check_size(size: usize) -> Result<(), TextureError> {
    if size == 0 {
        return Err(TextureError::Empty);
    }
    if size > MAX_TEXTURE_WIDTH {
        return Err(TextureError::TooWide {
            width: size,
            max: MAX_TEXTURE_WIDTH,
        });
    }
    Ok(())
}

fn check_len(actual: usize, size: usize) -> Result<(), TextureError> {
    check_size(size)?;
    let expected = size * 3;
    if actual < expected {
        return Err(TextureError::SizeMismatch { expected, actual });
    }
    Ok(())
}

fn unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_hls_ramp_first_texel_is_red_hue() {
        let ramp = TextureData::hls_ramp(256).unwrap();
        assert_eq!(ramp.width(), 256);
        let first = ramp.texels[0];
        let expected = hls_to_rgb(Vec3::new(0.0, 0.5, 0.99));
        assert_eq!(first, [expected.x, expected.y, expected.z, 1.0]);
        assert_eq!(ramp.filter, FilterMode::Linear);
        assert_eq!(ramp.address_mode, AddressMode::Repeat);
    }

    #[test]
    fn test_oversized_textures_are_rejected() {
        let too_wide = TextureError::TooWide {
            width: MAX_TEXTURE_WIDTH + 1,
            max: MAX_TEXTURE_WIDTH,
        };
        assert_eq!(TextureData::hls_ramp(MAX_TEXTURE_WIDTH + 1), Err(too_wide.clone()));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            TextureData::random_vectors(&mut rng, MAX_TEXTURE_WIDTH + 1),
            Err(too_wide.clone())
        );
        let rgb = vec![0.5f32; (MAX_TEXTURE_WIDTH + 1) * 3];
        assert_eq!(TextureData::palette_from_f32(&rgb, MAX_TEXTURE_WIDTH + 1), Err(too_wide));
        assert!(TextureData::hls_ramp(MAX_TEXTURE_WIDTH).is_ok());
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert_eq!(TextureData::hls_ramp(0), Err(TextureError::Empty));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(TextureData::random_vectors(&mut rng, 0), Err(TextureError::Empty));
        assert_eq!(TextureData::palette_from_u8(&[], 0), Err(TextureError::Empty));
    }

    #[test]
    fn test_random_vectors_in_unit_cube() {
        let mut rng = StdRng::seed_from_u64(9);
        let noise = TextureData::random_vectors(&mut rng, 512).unwrap();
        assert_eq!(noise.width(), 512);
        for t in &noise.texels {
            for c in &t[..3] {
                assert!((0.0..=1.0).contains(c));
            }
            assert_eq!(t[3], 1.0);
        }
    }

    #[test]
    fn test_palette_from_u8_filters_linear() {
        let data = [255, 0, 0, 0, 255, 0];
        let pal = TextureData::palette_from_u8(&data, 2).unwrap();
        assert_eq!(pal.texels, vec![[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]]);
        assert_eq!(pal.filter, FilterMode::Linear);
    }

    #[test]
    fn test_palette_from_f32_filters_nearest() {
        let data = [0.1, 0.2, 0.3];
        let pal = TextureData::palette_from_f32(&data, 1).unwrap();
        assert_eq!(pal.texels, vec![[0.1, 0.2, 0.3, 1.0]]);
        assert_eq!(pal.filter, FilterMode::Nearest);
    }

    #[test]
    fn test_palette_size_mismatch() {
        let err = TextureData::palette_from_u8(&[1, 2, 3, 4], 2).unwrap_err();
        assert_eq!(err, TextureError::SizeMismatch { expected: 6, actual: 4 });
    }

    #[test]
    fn test_to_bytes_unorm8_clamps() {
        let data = TextureData::palette_from_f32(&[1.5, -0.2, 0.5], 1).unwrap();
        assert_eq!(data.to_bytes(TexturePrecision::Unorm8), vec![255, 0, 128, 255]);
    }

    #[test]
    fn test_to_bytes_float32_layout() {
        let data = TextureData::palette_from_f32(&[0.25, 0.5, 0.75], 1).unwrap();
        let bytes = data.to_bytes(TexturePrecision::Float32);
        assert_eq!(bytes.len(), 16);
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(floats, vec![0.25, 0.5, 0.75, 1.0]);
    }
}
