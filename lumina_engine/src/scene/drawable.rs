/// Drawable trait - the mesh collaborator.
///
/// Mesh loading and vertex layout live outside the pipeline. A drawable only
/// knows how to issue its draw calls with whatever shader the current pass
/// made active.

use std::sync::Arc;
use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::renderer::{CommandList, Shader, UniformValue};

/// Geometry the passes can draw.
pub trait Drawable: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;

    /// Object-to-world transform
    fn model_matrix(&self) -> Mat4;

    /// Issue the draw calls. The pass has already bound `shader`.
    fn draw(&self, cmd: &mut dyn CommandList, shader: &Arc<dyn Shader>) -> Result<()>;
}

/// Set the `model` uniform, then draw.
pub fn draw_with_model(drawable: &dyn Drawable, cmd: &mut dyn CommandList, shader: &Arc<dyn Shader>) -> Result<()> {
    shader.set_uniform("model", UniformValue::Mat4(drawable.model_matrix()))?;
    drawable.draw(cmd, shader)
}

/// Forward-rendered object (light source visualization).
///
/// Drawn after deferred lighting, depth-tested against the G-buffer depth.
#[derive(Clone)]
pub struct ForwardObject {
    pub drawable: Arc<dyn Drawable>,
    /// Flat emissive color, written to both lighting outputs
    pub color: Vec3,
}

impl ForwardObject {
    pub fn new(drawable: Arc<dyn Drawable>, color: Vec3) -> Self {
        Self { drawable, color }
    }
}
