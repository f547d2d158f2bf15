/// Per-frame camera state shared by every pass.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::camera::Camera;

/// Size of the `Matrices` block in std140 layout
pub const FRAME_UNIFORMS_SIZE: u64 = 144;

/// Camera matrices and position for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
}

/// std140 image of [`FrameUniforms`]
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Std140Matrices {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    camera_position: [f32; 3],
    _padding: f32,
}

impl FrameUniforms {
    /// Uniforms for `camera` rendered into a viewport of the given aspect.
    pub fn from_camera(camera: &Camera, aspect: f32) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(aspect),
            camera_position: camera.position(),
        }
    }

    /// Serialize to the `Matrices` block layout.
    ///
    /// Offsets: view 0, projection 64, camera position 128 (vec3 padded to 16).
    pub fn to_std140_bytes(&self) -> Vec<u8> {
        let image = Std140Matrices {
            view: self.view.to_cols_array_2d(),
            projection: self.projection.to_cols_array_2d(),
            camera_position: self.camera_position.to_array(),
            _padding: 0.0,
        };
        bytemuck::bytes_of(&image).to_vec()
    }
}
