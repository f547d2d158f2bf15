/// CommandList trait - the single ordered GPU command stream

use std::sync::Arc;
use bitflags::bitflags;

use crate::error::Result;
use crate::renderer::{Buffer, Framebuffer, Shader, Texture};

bitflags! {
    /// Buffers cleared by `CommandList::clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

/// Values written by a clear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearValue {
    /// Color clear value (RGBA)
    pub color: [f32; 4],
    /// Depth clear value
    pub depth: f32,
}

impl ClearValue {
    /// Opaque black color, far depth
    pub fn black() -> Self {
        Self { color: [0.0, 0.0, 0.0, 1.0], depth: 1.0 }
    }

    /// Custom color, far depth
    pub fn color(color: [f32; 4]) -> Self {
        Self { color, depth: 1.0 }
    }
}

/// Blending state for color writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Writes replace the destination (required for data > 1.0 in alpha)
    Disabled,
    /// `src * src_alpha + dst * (1 - src_alpha)`
    Alpha,
    /// `src + dst`
    Additive,
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Viewport covering `width` x `height` from the origin
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0.0, y: 0.0, width: width as f32, height: height as f32 }
    }
}

/// Command list for issuing rendering commands
///
/// Commands execute in issue order on one stream; no command blocks the
/// CPU. State (bound framebuffer, blend, depth test, bound textures) persists
/// until changed, so every pass sets the state it depends on.
pub trait CommandList: Send + Sync {
    /// Bind a framebuffer as draw destination (`None` = the screen)
    fn bind_framebuffer(&mut self, framebuffer: Option<&Arc<dyn Framebuffer>>) -> Result<()>;

    /// Select which color attachments of the bound framebuffer are written
    ///
    /// An empty slice disables color output (depth-only passes).
    fn set_draw_buffers(&mut self, attachments: &[u32]) -> Result<()>;

    /// Set the viewport
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Clear the selected buffers of the bound framebuffer
    fn clear(&mut self, flags: ClearFlags, value: ClearValue) -> Result<()>;

    /// Enable or disable depth testing
    fn set_depth_test(&mut self, enabled: bool) -> Result<()>;

    /// Set the blending state
    fn set_blend_mode(&mut self, mode: BlendMode) -> Result<()>;

    /// Make a shader program current
    fn use_shader(&mut self, shader: &Arc<dyn Shader>) -> Result<()>;

    /// Bind a texture to a texture unit
    fn bind_texture(&mut self, unit: u32, texture: &Arc<dyn Texture>) -> Result<()>;

    /// Bind a uniform buffer to a binding slot
    fn bind_uniform_buffer(&mut self, slot: u32, buffer: &Arc<dyn Buffer>) -> Result<()>;

    /// Draw non-indexed geometry with the current vertex state
    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()>;

    /// Draw a screen-covering triangle pair (full-screen passes)
    fn draw_fullscreen(&mut self) -> Result<()>;

    /// Copy the depth buffer of `source` into `destination`
    ///
    /// Full extent of both framebuffers, NEAREST filtering, depth bit only.
    fn blit_depth(
        &mut self,
        source: &Arc<dyn Framebuffer>,
        destination: &Arc<dyn Framebuffer>,
    ) -> Result<()>;
}
