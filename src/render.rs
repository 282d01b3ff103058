//! Render settings shared by the GUI and the GPU pipeline.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::palettes::PaletteView;

/// How each point is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Screen-aligned sprite with a constant size in pixels.
    #[default]
    PointSprite,
    /// Camera-facing quad sized in world units, so it shrinks with distance.
    Billboard,
}

impl RenderMode {
    pub fn label(&self) -> &'static str {
        match self {
            RenderMode::PointSprite => "Point sprite",
            RenderMode::Billboard => "Billboard",
        }
    }
}

/// Appearance settings for one render mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSettings {
    /// Pixels for point sprites, world units (of the fitted cloud) for billboards.
    pub size: f32,
    pub alpha: f32,
    /// Color multiplier applied after the palette lookup.
    pub intensity: f32,
    /// Multiplier on speed before it is mapped onto the palette.
    pub speed_gain: f32,
    /// Add colors instead of alpha blending.
    pub additive: bool,
    /// Write and test depth. Ignored with additive blending.
    pub depth_test: bool,
    /// How much the per-point noise tints the palette color.
    pub noise_mix: f32,
}

impl ParticleSettings {
    pub fn point_sprite() -> Self {
        Self {
            size: 2.0,
            alpha: 0.6,
            intensity: 1.0,
            speed_gain: 1.0,
            additive: true,
            depth_test: false,
            noise_mix: 0.0,
        }
    }

    pub fn billboard() -> Self {
        Self {
            size: 0.004,
            alpha: 0.9,
            intensity: 1.0,
            speed_gain: 1.0,
            additive: false,
            depth_test: true,
            noise_mix: 0.1,
        }
    }

    pub fn writes_depth(&self) -> bool {
        self.depth_test && !self.additive
    }
}

/// Both render modes' settings and which one is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub mode: RenderMode,
    pub point_sprite: ParticleSettings,
    pub billboard: ParticleSettings,
    /// Background clear color (RGB, 0.0-1.0).
    pub background: [f32; 3],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::PointSprite,
            point_sprite: ParticleSettings::point_sprite(),
            billboard: ParticleSettings::billboard(),
            background: [0.02, 0.02, 0.05],
        }
    }
}

impl RenderSettings {
    pub fn active(&self) -> &ParticleSettings {
        match self.mode {
            RenderMode::PointSprite => &self.point_sprite,
            RenderMode::Billboard => &self.billboard,
        }
    }

    pub fn settings_mut(&mut self, mode: RenderMode) -> &mut ParticleSettings {
        match mode {
            RenderMode::PointSprite => &mut self.point_sprite,
            RenderMode::Billboard => &mut self.billboard,
        }
    }
}

/// A single clipping plane. Points on the negative side are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipPlane {
    pub enabled: bool,
    pub normal: Vec3,
    pub distance: f32,
}

impl ClipPlane {
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.normalize_or_zero().dot(p) + self.distance
    }

    /// Plane as `vec4(normal, distance)` with a normalized normal.
    pub fn to_vec4(&self) -> [f32; 4] {
        let n = self.normal.normalize_or_zero();
        [n.x, n.y, n.z, self.distance]
    }
}

/// The three clipping planes, one per axis by default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClippingPlanes {
    pub planes: [ClipPlane; 3],
}

impl Default for ClippingPlanes {
    fn default() -> Self {
        let axis = |normal: Vec3| ClipPlane { enabled: false, normal, distance: 1.0 };
        Self {
            planes: [axis(Vec3::X), axis(Vec3::Y), axis(Vec3::Z)],
        }
    }
}

impl ClippingPlanes {
    /// Whether a fitted-space point survives every enabled plane.
    pub fn keeps(&self, p: Vec3) -> bool {
        self.planes
            .iter()
            .filter(|pl| pl.enabled)
            .all(|pl| pl.signed_distance(p) >= 0.0)
    }
}

/// Uniform block shared by the particle vertex and fragment shaders.
///
/// Layout matches `Uniforms` in `particles.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub clip_planes: [[f32; 4]; 3],
    pub clip_enabled: [u32; 4],
    pub viewport: [f32; 2],
    pub point_size: f32,
    pub billboard: u32,
    pub alpha: f32,
    pub intensity: f32,
    pub speed_scale: f32,
    pub palette_offset: f32,
    pub palette_range: f32,
    pub palette_reverse: u32,
    pub noise_mix: f32,
    pub _padding: f32,
}

impl ParticleUniforms {
    /// Collect the uniform values for one frame.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        view_proj: Mat4,
        model: Mat4,
        viewport: [f32; 2],
        render: &RenderSettings,
        palette: &PaletteView,
        clipping: &ClippingPlanes,
        max_speed: f32,
    ) -> Self {
        let active = render.active();
        let speed_scale = if max_speed > f32::EPSILON {
            active.speed_gain / max_speed
        } else {
            0.0
        };
        let mut clip_enabled = [0u32; 4];
        for (flag, plane) in clip_enabled.iter_mut().zip(&clipping.planes) {
            *flag = plane.enabled as u32;
        }
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            clip_planes: clipping.planes.map(|p| p.to_vec4()),
            clip_enabled,
            viewport,
            point_size: active.size,
            billboard: (render.mode == RenderMode::Billboard) as u32,
            alpha: active.alpha,
            intensity: active.intensity,
            speed_scale,
            palette_offset: palette.offset,
            palette_range: palette.range,
            palette_reverse: palette.reverse as u32,
            noise_mix: active.noise_mix,
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_matches_wgsl() {
        assert_eq!(std::mem::size_of::<ParticleUniforms>(), 240);
        assert_eq!(std::mem::size_of::<ParticleUniforms>() % 16, 0);
    }

    #[test]
    fn test_active_follows_mode() {
        let mut r = RenderSettings::default();
        assert_eq!(r.active(), &r.point_sprite);
        r.mode = RenderMode::Billboard;
        assert_eq!(r.active(), &r.billboard);
        r.settings_mut(RenderMode::Billboard).size = 0.5;
        assert_eq!(r.active().size, 0.5);
    }

    #[test]
    fn test_additive_disables_depth_writes() {
        let mut s = ParticleSettings::billboard();
        assert!(s.writes_depth());
        s.additive = true;
        assert!(!s.writes_depth());
    }

    #[test]
    fn test_clipping_keeps() {
        let mut clip = ClippingPlanes::default();
        assert!(clip.keeps(Vec3::splat(-5.0)));
        clip.planes[0].enabled = true;
        clip.planes[0].distance = 0.0;
        assert!(clip.keeps(Vec3::new(0.5, 0.0, 0.0)));
        assert!(!clip.keeps(Vec3::new(-0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_uniforms_speed_scale() {
        let render = RenderSettings::default();
        let u = ParticleUniforms::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            [800.0, 600.0],
            &render,
            &PaletteView::default(),
            &ClippingPlanes::default(),
            4.0,
        );
        assert_eq!(u.speed_scale, 0.25);
        assert_eq!(u.billboard, 0);
        assert_eq!(u.clip_enabled, [0, 0, 0, 0]);

        let idle = ParticleUniforms::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            [800.0, 600.0],
            &render,
            &PaletteView::default(),
            &ClippingPlanes::default(),
            0.0,
        );
        assert_eq!(idle.speed_scale, 0.0);
    }
}
