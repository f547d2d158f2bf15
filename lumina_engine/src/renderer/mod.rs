/// Renderer module - abstraction over the host graphics API
///
/// The pipeline only talks to these traits. A backend (OpenGL, Vulkan, ...)
/// implements them; tests use the mock renderer which records every command.

// Module declarations
pub mod renderer;
pub mod texture;
pub mod buffer;
pub mod shader;
pub mod framebuffer;
pub mod command_list;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use texture::*;
pub use buffer::*;
pub use shader::*;
pub use framebuffer::*;
pub use command_list::*;

// Mock renderer for tests (no GPU required)
#[cfg(test)]
pub mod mock_renderer;
