/// Renderer trait - main GPU resource factory interface

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{
    Buffer, BufferDesc, CommandList, Framebuffer, Shader, ShaderDesc, Texture, TextureDesc,
};

/// Renderer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Number of draw calls issued since creation
    pub draw_calls: u32,
    /// Number of full-screen passes issued since creation
    pub fullscreen_draws: u32,
    /// Number of textures currently allocated
    pub textures: u32,
}

/// Main renderer trait
///
/// Central factory for GPU resources plus access to the single command
/// stream. Implemented by backend-specific renderers.
///
/// Exactly one frame is recorded at a time: stages borrow the command list
/// through `command_list()` and every command is issued in order.
pub trait Renderer: Send + Sync {
    /// Create a texture (2D or cube map)
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a buffer (uniform block storage)
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Compile and link a shader program
    ///
    /// # Errors
    ///
    /// Returns `Error::ShaderCompile` or `Error::ShaderLink` with the backend
    /// diagnostic text. The program is never handed out half-built.
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>>;

    /// Create an empty framebuffer of the given size
    ///
    /// Attachments are added one by one with `Framebuffer::attach`; the
    /// caller checks `Framebuffer::status` after each of them.
    fn create_framebuffer(&mut self, name: &str, width: u32, height: u32) -> Result<Arc<dyn Framebuffer>>;

    /// The command stream every pass records into
    fn command_list(&mut self) -> &mut dyn CommandList;

    /// Get statistics about the renderer
    fn stats(&self) -> RendererStats;
}
