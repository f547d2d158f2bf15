/// Uniform block holding [`FrameUniforms`], bound at a fixed slot.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::renderer::{Buffer, BufferDesc, BufferUsage, CommandList, Renderer, Shader};
use crate::{engine_report, engine_trace};
use super::frame_uniforms::{FrameUniforms, FRAME_UNIFORMS_SIZE};

/// Block name declared by every shader reading camera data
pub const MATRICES_BLOCK: &str = "Matrices";

/// Binding slot of the `Matrices` block
pub const MATRICES_SLOT: u32 = 0;

/// GPU-side copy of the frame uniforms.
///
/// Written once at the start of each frame; every pass recorded after that
/// observes the same values.
pub struct UniformBlock {
    buffer: Arc<dyn Buffer>,
    current: Option<FrameUniforms>,
    updated_frame: Option<u64>,
}

impl UniformBlock {
    /// Allocate the block storage.
    pub fn new(renderer: &mut dyn Renderer) -> Result<Self> {
        let buffer = renderer.create_buffer(BufferDesc {
            name: MATRICES_BLOCK.to_string(),
            size: FRAME_UNIFORMS_SIZE,
            usage: BufferUsage::Uniform,
        })?;
        Ok(Self { buffer, current: None, updated_frame: None })
    }

    /// Write this frame's values.
    ///
    /// # Errors
    ///
    /// `PassOrder` if the block was already written during `frame`.
    pub fn update(&mut self, frame: u64, uniforms: FrameUniforms) -> Result<()> {
        if self.updated_frame == Some(frame) {
            return Err(engine_report!("lumina::UniformBlock", Error::PassOrder(format!(
                "uniform block updated twice in frame {}", frame
            ))));
        }
        self.buffer.update(0, &uniforms.to_std140_bytes())?;
        self.current = Some(uniforms);
        self.updated_frame = Some(frame);
        engine_trace!("lumina::UniformBlock", "Frame {} uniforms written", frame);
        Ok(())
    }

    /// Point `shader`'s `Matrices` block at the shared slot.
    pub fn bind_shader(&self, shader: &Arc<dyn Shader>) -> Result<()> {
        shader.set_uniform_block_binding(MATRICES_BLOCK, MATRICES_SLOT)
    }

    /// Bind the storage to the shared slot on the command stream.
    pub fn bind(&self, cmd: &mut dyn CommandList) -> Result<()> {
        cmd.bind_uniform_buffer(MATRICES_SLOT, &self.buffer)
    }

    /// Values of the last update
    pub fn current(&self) -> Option<&FrameUniforms> {
        self.current.as_ref()
    }

    /// Frame index of the last update
    pub fn updated_frame(&self) -> Option<u64> {
        self.updated_frame
    }
}
