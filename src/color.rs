//! Random helpers and HLS color conversion.
//!
//! These feed the procedural textures: the hue ramp palette and the
//! random-vector noise texture sampled by the particle shader.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;

const ONE_SIXTH: f32 = 1.0 / 6.0;
const ONE_THIRD: f32 = 1.0 / 3.0;
const TWO_THIRDS: f32 = 2.0 / 3.0;

/// Uniform random value between `min` and `max` (inclusive).
pub fn random_min_max<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let t: f32 = rng.gen_range(0.0..=1.0);
    min + (max - min) * t
}

/// Random point on the unit sphere.
///
/// Picks `z` in `[-1, 1]`, then a point on the circle of radius
/// `sqrt(1 - z²)` at that height, which gives a uniform distribution
/// over the sphere surface.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let z = random_min_max(rng, -1.0, 1.0);
    let radius = (1.0 - z * z).max(0.0).sqrt();
    let t = random_min_max(rng, -PI, PI);
    Vec3::new(t.cos() * radius, t.sin() * radius, z)
}

/// Convert an HLS triple `(hue, lightness, saturation)` to RGB.
///
/// Hue is expected in `[0, 1]`; values up to one unit outside that range
/// are wrapped once. Zero saturation yields a grey of the given lightness.
pub fn hls_to_rgb(hls: Vec3) -> Vec3 {
    let (mut h, l, s) = (hls.x, hls.y, hls.z);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    if h < 0.0 {
        h += 1.0;
    }
    if h > 1.0 {
        h -= 1.0;
    }

    let v2 = if l <= 0.5 { l * (1.0 + s) } else { (l + s) - l * s };
    let v1 = 2.0 * l - v2;
    let d = (v2 - v1) * 6.0;

    if h < ONE_SIXTH {
        Vec3::new(v2, v1 + d * h, v1 + d * (h - ONE_THIRD))
    } else if h < 0.5 {
        Vec3::new(v1 + d * (ONE_THIRD - h), v2, v1 + d * (h - ONE_THIRD))
    } else if h < TWO_THIRDS {
        Vec3::new(v1, v1 + d * (TWO_THIRDS - h), v2)
    } else {
        Vec3::new(v1, v1, v1 + d * (ONE_THIRD - h))
    }
}
