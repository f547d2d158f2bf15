/// Framebuffer trait - GPU render destination with attachments

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::renderer::Texture;

/// Attachment point of a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Color attachment `n`
    Color(u32),
    /// Depth (or depth/stencil) attachment
    Depth,
}

/// Completeness status reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    /// Ready to be rendered into
    Complete,
    /// No attachment at all
    IncompleteMissingAttachment,
    /// An attachment has a format that cannot be used at its attachment point
    IncompleteAttachment,
    /// Attachments do not share the framebuffer dimensions
    IncompleteDimensions,
    /// Backend-specific combination rejected
    Unsupported,
}

impl FramebufferStatus {
    /// Returns true when the framebuffer can be rendered into
    pub fn is_complete(&self) -> bool {
        *self == FramebufferStatus::Complete
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FramebufferStatus::Complete => "complete",
            FramebufferStatus::IncompleteMissingAttachment => "missing attachment",
            FramebufferStatus::IncompleteAttachment => "incompatible attachment",
            FramebufferStatus::IncompleteDimensions => "attachment dimensions differ",
            FramebufferStatus::Unsupported => "unsupported attachment combination",
        };
        f.write_str(text)
    }
}

/// Framebuffer trait
///
/// A render destination built incrementally from texture attachments.
pub trait Framebuffer: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;

    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Attach a texture (cube maps are attached layered)
    fn attach(&self, attachment: Attachment, texture: &Arc<dyn Texture>) -> Result<()>;

    /// Completeness check for the current attachment configuration
    fn status(&self) -> FramebufferStatus;
}
