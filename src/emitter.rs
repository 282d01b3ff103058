//! Ring-buffered point accumulation.
//!
//! The emitter steps the current attractor on the CPU and writes each new
//! point into a fixed-capacity ring. Once the ring is full the oldest points
//! are overwritten, so the cloud always shows the most recent `capacity`
//! points. Slots written since the last upload are tracked as at most two
//! contiguous index ranges, which the GPU side copies into the vertex buffer.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::attractors::Attractor;

/// Default ring capacity.
pub const DEFAULT_CAPACITY: usize = 1_000_000;
/// Largest ring whose vertex buffer fits wgpu's default `max_buffer_size` (256 MiB).
pub const MAX_CAPACITY: usize = 1 << 24;
/// Default points emitted per frame.
pub const DEFAULT_STEPS_PER_FRAME: u32 = 2_000;
/// Default number of initial iterations discarded after a restart.
pub const DEFAULT_WARMUP: u32 = 200;

/// One point as stored in the GPU vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    /// Distance travelled from the previous point.
    pub speed: f32,
}

/// Fixed-capacity ring of attractor points.
#[derive(Debug)]
pub struct PointEmitter {
    points: Vec<PointVertex>,
    head: usize,
    total: u64,
    cursor: Vec3,
    dirty_start: usize,
    dirty_len: usize,
    pending_warmup: u32,
    diverged: bool,
    bounds: Option<(Vec3, Vec3)>,
    max_speed: f32,
    /// Iterations discarded after each restart.
    pub warmup: u32,
    /// Points emitted by [`PointEmitter::update`].
    pub steps_per_frame: u32,
    /// When set, [`PointEmitter::update`] emits nothing.
    pub paused: bool,
}

impl PointEmitter {
    /// Create an emitter holding up to `capacity` points (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: vec![PointVertex::default(); capacity],
            head: 0,
            total: 0,
            cursor: Vec3::ZERO,
            dirty_start: 0,
            dirty_len: 0,
            pending_warmup: DEFAULT_WARMUP,
            diverged: false,
            bounds: None,
            max_speed: 0.0,
            warmup: DEFAULT_WARMUP,
            steps_per_frame: DEFAULT_STEPS_PER_FRAME,
            paused: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    /// Drop all points and continue from `start`.
    pub fn restart(&mut self, start: Vec3) {
        self.head = 0;
        self.total = 0;
        self.cursor = start;
        self.dirty_start = 0;
        self.dirty_len = 0;
        self.pending_warmup = self.warmup;
        self.diverged = false;
        self.bounds = None;
        self.max_speed = 0.0;
        log::debug!("emitter restarted at {:?}", start);
    }

    /// Change the ring capacity. Existing points are discarded.
    pub fn resize(&mut self, capacity: usize, start: Vec3) {
        let capacity = capacity.max(1);
        if capacity != self.points.len() {
            self.points = vec![PointVertex::default(); capacity];
        }
        self.restart(start);
    }

    /// Emit `steps_per_frame` points unless paused or diverged.
    pub fn update(&mut self, attractor: &Attractor) -> usize {
        if self.paused {
            return 0;
        }
        self.emit(attractor, self.steps_per_frame as usize)
    }

    /// Step the attractor `steps` times, writing each point to the ring.
    ///
    /// Returns the number of points written. A non-finite point stops
    /// emission until the next [`restart`](Self::restart).
    pub fn emit(&mut self, attractor: &Attractor, steps: usize) -> usize {
        if self.diverged {
            return 0;
        }

        while self.pending_warmup > 0 {
            self.cursor = attractor.step(self.cursor);
            self.pending_warmup -= 1;
            if !self.cursor.is_finite() {
                self.diverge(attractor);
                return 0;
            }
        }

        let capacity = self.points.len();
        let mut written = 0;
        for _ in 0..steps {
            let next = attractor.step(self.cursor);
            if !next.is_finite() {
                self.diverge(attractor);
                break;
            }
            let speed = (next - self.cursor).length();
            self.cursor = next;

            self.points[self.head] = PointVertex {
                position: next.to_array(),
                speed,
            };
            if self.dirty_len == 0 {
                self.dirty_start = self.head;
            }
            self.dirty_len = (self.dirty_len + 1).min(capacity);
            self.head = (self.head + 1) % capacity;
            self.total += 1;

            self.bounds = Some(match self.bounds {
                Some((min, max)) => (min.min(next), max.max(next)),
                None => (next, next),
            });
            self.max_speed = self.max_speed.max(speed);
            written += 1;
        }
        written
    }

    fn diverge(&mut self, attractor: &Attractor) {
        self.diverged = true;
        log::warn!(
            "{} diverged after {} points; emission stopped until restart",
            attractor.name(),
            self.total
        );
    }

    /// Ranges of ring slots written since the last call.
    pub fn take_dirty(&mut self) -> Vec<Range<usize>> {
        let capacity = self.points.len();
        let (start, len) = (self.dirty_start, self.dirty_len);
        self.dirty_len = 0;

        if len == 0 {
            Vec::new()
        } else if len >= capacity {
            vec![0..capacity]
        } else if start + len <= capacity {
            vec![start..start + len]
        } else {
            vec![start..capacity, 0..start + len - capacity]
        }
    }

    /// All ring slots, including ones not yet written.
    pub fn points(&self) -> &[PointVertex] {
        &self.points
    }

    /// Number of valid points (what should be drawn).
    pub fn len(&self) -> usize {
        self.total.min(self.points.len() as u64) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Points written since the last restart, including overwritten ones.
    pub fn total_emitted(&self) -> u64 {
        self.total
    }

    pub fn fill_ratio(&self) -> f32 {
        self.len() as f32 / self.points.len() as f32
    }

    pub fn is_diverged(&self) -> bool {
        self.diverged
    }

    /// Current integration point.
    pub fn cursor(&self) -> Vec3 {
        self.cursor
    }

    /// Axis-aligned bounds of every point emitted since the last restart.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.bounds
    }

    /// Largest step length seen since the last restart.
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Transform that centers the cloud and fits it into `[-1, 1]`.
    pub fn model_matrix(&self) -> Mat4 {
        let Some((min, max)) = self.bounds else {
            return Mat4::IDENTITY;
        };
        let center = (min + max) * 0.5;
        let extent = (max - min).max_element();
        let scale = if extent > f32::EPSILON { 2.0 / extent } else { 1.0 };
        Mat4::from_scale(Vec3::splat(scale)) * Mat4::from_translation(-center)
    }
}

impl Default for PointEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attractors::AttractorKind;

    fn emitter(capacity: usize) -> PointEmitter {
        let mut e = PointEmitter::new(capacity);
        e.warmup = 0;
        e.restart(Vec3::new(1.0, 1.0, 1.0));
        e
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 16);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        assert_eq!(PointEmitter::new(0).capacity(), 1);
    }

    #[test]
    fn test_emit_fills_ring_in_order() {
        let lorenz = Attractor::new(AttractorKind::Lorenz);
        let mut e = emitter(8);
        assert_eq!(e.emit(&lorenz, 5), 5);
        assert_eq!(e.len(), 5);
        assert_eq!(e.total_emitted(), 5);

        let mut p = Vec3::ONE;
        for i in 0..5 {
            let next = lorenz.step(p);
            assert_eq!(e.points()[i].position, next.to_array());
            assert!((e.points()[i].speed - (next - p).length()).abs() < 1e-6);
            p = next;
        }
    }

    #[test]
    fn test_ring_wraps_and_overwrites_oldest() {
        let lorenz = Attractor::new(AttractorKind::Lorenz);
        let mut e = emitter(4);
        e.emit(&lorenz, 6);
        assert_eq!(e.len(), 4);
        assert_eq!(e.total_emitted(), 6);
        assert!((e.fill_ratio() - 1.0).abs() < f32::EPSILON);

        let mut p = Vec3::ONE;
        let mut expected = Vec::new();
        for _ in 0..6 {
            p = lorenz.step(p);
            expected.push(p.to_array());
        }
        // Slots 0 and 1 hold points 4 and 5.
        assert_eq!(e.points()[0].position, expected[4]);
        assert_eq!(e.points()[1].position, expected[5]);
        assert_eq!(e.points()[2].position, expected[2]);
    }

    #[test]
    fn test_dirty_ranges() {
        let lorenz = Attractor::new(AttractorKind::Lorenz);
        let mut e = emitter(10);
        assert!(e.take_dirty().is_empty());

        e.emit(&lorenz, 3);
        e.emit(&lorenz, 4);
        assert_eq!(e.take_dirty(), vec![0..7]);
        assert!(e.take_dirty().is_empty());

        // Head is at 7: writing 5 wraps to slot 2.
        e.emit(&lorenz, 5);
        assert_eq!(e.take_dirty(), vec![7..10, 0..2]);

        // More than a full ring marks everything.
        e.emit(&lorenz, 25);
        assert_eq!(e.take_dirty(), vec![0..10]);
    }

    #[test]
    fn test_restart_resets_counts() {
        let lorenz = Attractor::new(AttractorKind::Lorenz);
        let mut e = emitter(16);
        e.emit(&lorenz, 10);
        e.restart(Vec3::ONE);
        assert!(e.is_empty());
        assert_eq!(e.len(), 0);
        assert!(e.bounds().is_none());
        assert_eq!(e.max_speed(), 0.0);
        assert!(e.take_dirty().is_empty());
    }

    #[test]
    fn test_warmup_discards_leading_points() {
        let lorenz = Attractor::new(AttractorKind::Lorenz);
        let mut e = PointEmitter::new(16);
        e.warmup = 3;
        e.restart(Vec3::ONE);
        e.emit(&lorenz, 1);

        let mut p = Vec3::ONE;
        for _ in 0..4 {
            p = lorenz.step(p);
        }
        assert_eq!(e.points()[0].position, p.to_array());
        assert_eq!(e.total_emitted(), 1);
    }

    #[test]
    fn test_update_respects_pause() {
        let lorenz = Attractor::new(AttractorKind::Lorenz);
        let mut e = emitter(64);
        e.steps_per_frame = 10;
        assert_eq!(e.update(&lorenz), 10);
        e.paused = true;
        assert_eq!(e.update(&lorenz), 0);
        assert_eq!(e.total_emitted(), 10);
    }

    #[test]
    fn test_divergence_stops_emission() {
        let mut poly = Attractor::new(AttractorKind::PolynomialA);
        assert!(poly.set_params(&[1.0e30, 1.0e30, 1.0e30]));
        let mut e = emitter(64);
        e.restart(Vec3::splat(1.0e30));
        let written = e.emit(&poly, 50);
        assert!(written < 50);
        assert!(e.is_diverged());
        assert_eq!(e.emit(&poly, 10), 0);

        e.restart(Vec3::ZERO);
        assert!(!e.is_diverged());
    }

    #[test]
    fn test_bounds_and_model_matrix() {
        let lorenz = Attractor::new(AttractorKind::Lorenz);
        let mut e = emitter(4096);
        e.emit(&lorenz, 4000);
        let (min, max) = e.bounds().unwrap();
        let m = e.model_matrix();
        let lo = m.transform_point3(min);
        let hi = m.transform_point3(max);
        assert!(lo.min_element() >= -1.0 - 1e-4);
        assert!(hi.max_element() <= 1.0 + 1e-4);
        assert!(((hi - lo).max_element() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_model_matrix_without_points() {
        assert_eq!(emitter(4).model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_resize_discards_points() {
        let lorenz = Attractor::new(AttractorKind::Lorenz);
        let mut e = emitter(8);
        e.emit(&lorenz, 8);
        e.resize(32, Vec3::ONE);
        assert_eq!(e.capacity(), 32);
        assert!(e.is_empty());
    }

    #[test]
    fn test_diverging_warmup_emits_nothing() {
        let mut poly = Attractor::new(AttractorKind::PolynomialA);
        assert!(poly.set_params(&[1.0e30, 1.0e30, 1.0e30]));
        let mut e = PointEmitter::new(64);
        e.warmup = 20;
        e.restart(Vec3::splat(1.0e30));
        assert_eq!(e.emit(&poly, 10), 0);
        assert!(e.is_diverged());
        assert_eq!(e.len(), 0);
        assert_eq!(e.total_emitted(), 0);
        assert!(e.take_dirty().is_empty());
    }
}
