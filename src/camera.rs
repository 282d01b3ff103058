//! Camera for the 3D orbit view.
//!
//! Mouse drags in the viewport change yaw/pitch; the gizmo dialog rotates
//! the cloud itself through a trackball quaternion.

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Orbit camera plus an object rotation driven by the gizmo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Rotation applied to the cloud before viewing.
    pub rotation: Quat,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Radians per second added to `yaw`.
    pub auto_rotate: f32,
}

impl Camera {
    /// Create a new camera with default positioning.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.3,
            distance: 3.0,
            target: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: 45.0,
            near: 0.01,
            far: 100.0,
            auto_rotate: 0.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// View matrix including the gizmo rotation.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y) * Mat4::from_quat(self.rotation)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect.max(1e-3), self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }

    /// Orbit by a mouse drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-1.5, 1.5);
    }

    /// Zoom by scroll lines.
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance - lines * 0.3).clamp(0.2, 50.0);
    }

    /// Trackball rotation from a gizmo drag, in pixels.
    pub fn rotate_by_drag(&mut self, delta: Vec2) {
        let angle = delta.length() * 0.01;
        if angle <= f32::EPSILON {
            return;
        }
        // Screen x drags spin around Y, screen y drags around X.
        let axis = Vec3::new(delta.y, delta.x, 0.0).normalize();
        self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
    }

    pub fn advance(&mut self, delta_secs: f32) {
        self.yaw += self.auto_rotate * delta_secs;
    }

    /// Reset position and rotation, keeping projection settings.
    pub fn reset(&mut self) {
        let fresh = Self::new();
        self.yaw = fresh.yaw;
        self.pitch = fresh.pitch;
        self.distance = fresh.distance;
        self.target = fresh.target;
        self.rotation = fresh.rotation;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
