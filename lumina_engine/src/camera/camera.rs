/// Camera - passive view parameters read by the pipeline.
///
/// The pipeline never moves the camera. The caller integrates input and
/// writes position/orientation; each frame the view and projection matrices
/// are derived from the current values.

use glam::{Mat4, Vec3};
use crate::error::{Error, Result};
use crate::{engine_bail, engine_report};
use super::depth::{DepthRange, ProjectionKind};

/// Perspective camera.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    fov_degrees: f32,
    z_near: f32,
    z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
    }
}

impl Camera {
    /// Create a camera at `position` looking along `front`.
    ///
    /// Field of view 45 degrees, clip planes 0.1 / 100.
    pub fn new(position: Vec3, front: Vec3, up: Vec3) -> Self {
        Self {
            position,
            front: front.normalize_or_zero(),
            up,
            fov_degrees: 45.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }

    // ===== GETTERS =====

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Normalized view direction.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Up vector used to build the view matrix.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Vertical field of view, in degrees.
    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Clip range used for depth linearization in the geometry pass.
    pub fn depth_range(&self) -> DepthRange {
        DepthRange::new(ProjectionKind::Perspective, self.z_near, self.z_far)
    }

    /// View matrix (`lookAt(position, position + front, up)`).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection for the given viewport aspect ratio.
    ///
    /// GL clip conventions (NDC depth in [-1, 1]).
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), aspect, self.z_near, self.z_far)
    }

    // ===== SETTERS =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set view direction and up vector. `front` is normalized.
    pub fn set_orientation(&mut self, front: Vec3, up: Vec3) {
        self.front = front.normalize_or_zero();
        self.up = up;
    }

    /// Set the vertical field of view, clamped to 1..=90 degrees.
    pub fn set_fov_degrees(&mut self, fov: f32) {
        self.fov_degrees = fov.clamp(1.0, 90.0);
    }

    /// Set the clip planes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `0 < near < far`.
    pub fn set_clip_planes(&mut self, z_near: f32, z_far: f32) -> Result<()> {
        if !(z_near > 0.0 && z_near < z_far) {
            return Err(engine_report!("lumina::Camera", Error::InvalidConfig(format!(
                "camera clip planes must satisfy 0 < near < far (near {}, far {})",
                z_near, z_far
            ))));
        }
        self.z_near = z_near;
        self.z_far = z_far;
        Ok(())
    }

    /// Viewport aspect ratio guard shared by the frame loop.
    pub(crate) fn aspect_for(width: u32, height: u32) -> Result<f32> {
        if width == 0 || height == 0 {
            engine_bail!("lumina::Camera", "Cannot derive aspect ratio from a {}x{} viewport", width, height);
        }
        Ok(width as f32 / height as f32)
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
