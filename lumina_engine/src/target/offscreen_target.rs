/// Offscreen target - framebuffer with sampleable color attachments.
///
/// Every pass writes into one of these (except the final post-process pass,
/// which writes to the screen). Attachment count and formats are fixed at
/// creation; resizing is a full reallocation.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::renderer::{
    Attachment, CommandList, Framebuffer, Renderer, SamplerDesc, Texture, TextureDesc,
    TextureFormat, TextureKind, Viewport,
};
use crate::{engine_debug, engine_report};

/// 2D target or six-face cube target (point light shadows)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLayout {
    Flat,
    Cube,
}

/// Depth attachment configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepthAttachment {
    /// No depth buffer
    None,
    /// Depth/stencil used only for testing and blits
    Internal,
    /// Depth texture that later passes sample (shadow maps)
    Sampled {
        format: TextureFormat,
        sampler: SamplerDesc,
    },
}

/// Format and sampling of one color attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAttachmentDesc {
    pub format: TextureFormat,
    pub sampler: SamplerDesc,
}

/// Offscreen target description
#[derive(Debug, Clone)]
pub struct TargetDesc {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub layout: TargetLayout,
    pub colors: Vec<ColorAttachmentDesc>,
    pub depth: DepthAttachment,
}

impl TargetDesc {
    /// Flat target with no attachments yet.
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            layout: TargetLayout::Flat,
            colors: Vec::new(),
            depth: DepthAttachment::None,
        }
    }

    /// `count` color attachments of `format` with an optional internal depth buffer.
    pub fn uniform(name: &str, width: u32, height: u32, count: u32, format: TextureFormat, depth: bool) -> Self {
        let mut desc = Self::new(name, width, height);
        for _ in 0..count {
            desc = desc.with_color(format);
        }
        if depth {
            desc = desc.with_depth(DepthAttachment::Internal);
        }
        desc
    }

    /// Append a color attachment sampled NEAREST / clamp-to-edge.
    pub fn with_color(self, format: TextureFormat) -> Self {
        self.with_color_sampler(format, SamplerDesc::nearest_clamp())
    }

    pub fn with_color_sampler(mut self, format: TextureFormat, sampler: SamplerDesc) -> Self {
        self.colors.push(ColorAttachmentDesc { format, sampler });
        self
    }

    pub fn with_depth(mut self, depth: DepthAttachment) -> Self {
        self.depth = depth;
        self
    }

    /// Allocate attachments as cube maps.
    pub fn cube(mut self) -> Self {
        self.layout = TargetLayout::Cube;
        self
    }
}

/// Offscreen render destination.
pub struct OffscreenTarget {
    desc: TargetDesc,
    framebuffer: Arc<dyn Framebuffer>,
    colors: Vec<Arc<dyn Texture>>,
    depth: Option<Arc<dyn Texture>>,
    allocations: u32,
}

struct Allocation {
    framebuffer: Arc<dyn Framebuffer>,
    colors: Vec<Arc<dyn Texture>>,
    depth: Option<Arc<dyn Texture>>,
}

/// Complete attachments at a new size, not yet swapped into their target
pub struct PendingReallocation {
    desc: TargetDesc,
    allocation: Allocation,
}

/// Move `targets` to a new size together.
///
/// Every new allocation is built before any target switches, so on error
/// all of them keep their previous attachments.
pub fn reallocate_all(renderer: &mut dyn Renderer, targets: Vec<&mut OffscreenTarget>, width: u32, height: u32)
    -> Result<()>
{
    let pending = targets
        .iter()
        .map(|target| target.prepare_reallocation(renderer, width, height))
        .collect::<Result<Vec<_>>>()?;
    for (target, pending) in targets.into_iter().zip(pending) {
        target.commit_reallocation(pending);
    }
    Ok(())
}

impl OffscreenTarget {
    /// Allocate a target.
    ///
    /// # Errors
    ///
    /// `TargetCreation` if the size is zero or the framebuffer is incomplete
    /// after any attachment step.
    pub fn create(renderer: &mut dyn Renderer, desc: TargetDesc) -> Result<Self> {
        let allocation = Self::allocate(renderer, &desc)?;
        engine_debug!("lumina::OffscreenTarget",
            "Created '{}' {}x{} ({} color, depth {:?})",
            desc.name, desc.width, desc.height, desc.colors.len(), desc.depth);
        Ok(Self {
            desc,
            framebuffer: allocation.framebuffer,
            colors: allocation.colors,
            depth: allocation.depth,
            allocations: 1,
        })
    }

    fn allocate(renderer: &mut dyn Renderer, desc: &TargetDesc) -> Result<Allocation> {
        if desc.width == 0 || desc.height == 0 {
            return Err(engine_report!("lumina::OffscreenTarget", Error::TargetCreation {
                target: desc.name.clone(),
                reason: format!("zero size {}x{}", desc.width, desc.height),
            }));
        }

        let kind = match desc.layout {
            TargetLayout::Flat => TextureKind::Texture2D,
            TargetLayout::Cube => TextureKind::CubeMap,
        };
        let framebuffer = renderer.create_framebuffer(&desc.name, desc.width, desc.height)?;

        let mut colors = Vec::with_capacity(desc.colors.len());
        for (index, color) in desc.colors.iter().enumerate() {
            let texture = renderer.create_texture(TextureDesc {
                name: format!("{}.color{}", desc.name, index),
                width: desc.width,
                height: desc.height,
                format: color.format,
                kind,
                sampler: color.sampler,
                data: None,
            })?;
            framebuffer.attach(Attachment::Color(index as u32), &texture)?;
            Self::check_complete(desc, framebuffer.as_ref())?;
            colors.push(texture);
        }

        let depth = match desc.depth {
            DepthAttachment::None => None,
            DepthAttachment::Internal => Some((TextureFormat::D24_UNORM_S8_UINT, SamplerDesc::nearest_clamp())),
            DepthAttachment::Sampled { format, sampler } => Some((format, sampler)),
        };
        let depth = match depth {
            Some((format, sampler)) => {
                let texture = renderer.create_texture(TextureDesc {
                    name: format!("{}.depth", desc.name),
                    width: desc.width,
                    height: desc.height,
                    format,
                    kind,
                    sampler,
                    data: None,
                })?;
                framebuffer.attach(Attachment::Depth, &texture)?;
                Self::check_complete(desc, framebuffer.as_ref())?;
                Some(texture)
            }
            None => None,
        };

        // Catches targets with no attachment at all
        Self::check_complete(desc, framebuffer.as_ref())?;

        Ok(Allocation { framebuffer, colors, depth })
    }

    fn check_complete(desc: &TargetDesc, framebuffer: &dyn Framebuffer) -> Result<()> {
        let status = framebuffer.status();
        if status.is_complete() {
            Ok(())
        } else {
            Err(engine_report!("lumina::OffscreenTarget", Error::TargetCreation {
                target: desc.name.clone(),
                reason: status.to_string(),
            }))
        }
    }

    /// Recreate every attachment at a new size.
    ///
    /// The previous attachments stay valid until the new set is complete.
    pub fn reallocate(&mut self, renderer: &mut dyn Renderer, width: u32, height: u32) -> Result<()> {
        let pending = self.prepare_reallocation(renderer, width, height)?;
        self.commit_reallocation(pending);
        Ok(())
    }

    /// Build the attachments for a new size, leaving this target untouched.
    pub fn prepare_reallocation(&self, renderer: &mut dyn Renderer, width: u32, height: u32)
        -> Result<PendingReallocation>
    {
        if width == 0 || height == 0 {
            return Err(engine_report!("lumina::OffscreenTarget", Error::InvalidConfig(format!(
                "cannot reallocate '{}' to {}x{}", self.desc.name, width, height
            ))));
        }
        let mut desc = self.desc.clone();
        desc.width = width;
        desc.height = height;
        let allocation = Self::allocate(renderer, &desc)?;
        Ok(PendingReallocation { desc, allocation })
    }

    /// Swap in attachments built by [`prepare_reallocation`](Self::prepare_reallocation).
    pub fn commit_reallocation(&mut self, pending: PendingReallocation) {
        let PendingReallocation { desc, allocation } = pending;
        self.desc = desc;
        self.framebuffer = allocation.framebuffer;
        self.colors = allocation.colors;
        self.depth = allocation.depth;
        self.allocations += 1;
        engine_debug!("lumina::OffscreenTarget", "Reallocated '{}' to {}x{}",
            self.desc.name, self.desc.width, self.desc.height);
    }

    /// Make this target the draw destination, writing `draw_buffers`.
    ///
    /// An empty list is a depth-only pass.
    pub fn activate(&self, cmd: &mut dyn CommandList, draw_buffers: &[u32]) -> Result<()> {
        if let Some(bad) = draw_buffers.iter().find(|&&i| i as usize >= self.colors.len()) {
            return Err(engine_report!("lumina::OffscreenTarget", Error::InvalidResource(format!(
                "'{}' has {} color attachments, draw buffer {} requested",
                self.desc.name, self.colors.len(), bad
            ))));
        }
        cmd.bind_framebuffer(Some(&self.framebuffer))?;
        cmd.set_draw_buffers(draw_buffers)?;
        cmd.set_viewport(Viewport::full(self.desc.width, self.desc.height))
    }

    /// Activate writing every color attachment.
    pub fn activate_all(&self, cmd: &mut dyn CommandList) -> Result<()> {
        let all: Vec<u32> = (0..self.colors.len() as u32).collect();
        self.activate(cmd, &all)
    }

    /// Read-only handle to color attachment `index`.
    pub fn sample_attachment(&self, index: usize) -> Result<Arc<dyn Texture>> {
        self.colors.get(index).cloned().ok_or_else(|| {
            engine_report!("lumina::OffscreenTarget", Error::InvalidResource(format!(
                "'{}' has no color attachment {}", self.desc.name, index
            )))
        })
    }

    /// Sampleable depth texture.
    pub fn depth_texture(&self) -> Result<Arc<dyn Texture>> {
        match (&self.desc.depth, &self.depth) {
            (DepthAttachment::Sampled { .. }, Some(texture)) => Ok(texture.clone()),
            _ => Err(engine_report!("lumina::OffscreenTarget", Error::InvalidResource(format!(
                "'{}' has no sampleable depth attachment", self.desc.name
            )))),
        }
    }

    /// Depth-only NEAREST blit into `other`.
    pub fn copy_depth_to(&self, cmd: &mut dyn CommandList, other: &OffscreenTarget) -> Result<()> {
        if self.depth.is_none() || other.depth.is_none() {
            return Err(engine_report!("lumina::OffscreenTarget", Error::InvalidResource(format!(
                "depth blit '{}' -> '{}' needs depth on both targets",
                self.desc.name, other.desc.name
            ))));
        }
        cmd.blit_depth(&self.framebuffer, &other.framebuffer)
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn width(&self) -> u32 {
        self.desc.width
    }

    pub fn height(&self) -> u32 {
        self.desc.height
    }

    pub fn layout(&self) -> TargetLayout {
        self.desc.layout
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    pub fn has_depth(&self) -> bool {
        self.depth.is_some()
    }

    pub fn framebuffer(&self) -> &Arc<dyn Framebuffer> {
        &self.framebuffer
    }

    /// Number of allocations so far (1 after `create`)
    pub fn allocations(&self) -> u32 {
        self.allocations
    }
}

#[cfg(test)]
#[path = "offscreen_target_tests.rs"]
mod tests;
