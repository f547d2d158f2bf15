/// Geometry stage - opaque scene into the five-channel G-buffer.

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{
    BlendMode, ClearFlags, ClearValue, CommandList, Renderer, SamplerDesc, Shader, Texture,
    TextureFormat, UniformValue,
};
use crate::scene::{draw_with_model, SceneContext};
use crate::target::{DepthAttachment, OffscreenTarget, TargetDesc};
use crate::engine_debug;

/// G-buffer channel, in attachment order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GBufferChannel {
    /// World position (rgb) + linear depth (a)
    WorldPosition,
    /// View position (rgb) + linear depth (a)
    ViewPosition,
    WorldNormal,
    ViewNormal,
    /// Albedo (rgb) + specular strength (a)
    AlbedoSpecular,
}

impl GBufferChannel {
    pub const ALL: [GBufferChannel; 5] = [
        GBufferChannel::WorldPosition,
        GBufferChannel::ViewPosition,
        GBufferChannel::WorldNormal,
        GBufferChannel::ViewNormal,
        GBufferChannel::AlbedoSpecular,
    ];

    /// Attachment index (and `layout (location)` in the fragment shader)
    pub fn index(self) -> usize {
        match self {
            GBufferChannel::WorldPosition => 0,
            GBufferChannel::ViewPosition => 1,
            GBufferChannel::WorldNormal => 2,
            GBufferChannel::ViewNormal => 3,
            GBufferChannel::AlbedoSpecular => 4,
        }
    }

    /// Sampler name in the passes that read the channel
    pub fn sampler_name(self) -> &'static str {
        match self {
            GBufferChannel::WorldPosition => "g_world_position",
            GBufferChannel::ViewPosition => "g_view_position",
            GBufferChannel::WorldNormal => "g_world_normal",
            GBufferChannel::ViewNormal => "g_view_normal",
            GBufferChannel::AlbedoSpecular => "g_albedo_specular",
        }
    }
}

pub struct GeometryStage {
    target: OffscreenTarget,
    shader: Arc<dyn Shader>,
}

impl GeometryStage {
    pub fn new(renderer: &mut dyn Renderer, shader: Arc<dyn Shader>, width: u32, height: u32) -> Result<Self> {
        // Positions need full precision; linear depth is stored in alpha
        let desc = TargetDesc::new("gbuffer", width, height)
            .with_color(TextureFormat::R32G32B32A32_SFLOAT)
            .with_color(TextureFormat::R32G32B32A32_SFLOAT)
            .with_color(TextureFormat::R16G16B16A16_SFLOAT)
            .with_color(TextureFormat::R16G16B16A16_SFLOAT)
            .with_color(TextureFormat::R16G16B16A16_SFLOAT)
            .with_depth(DepthAttachment::Sampled {
                format: TextureFormat::D24_UNORM_S8_UINT,
                sampler: SamplerDesc::nearest_clamp(),
            });
        let target = OffscreenTarget::create(renderer, desc)?;
        Ok(Self { target, shader })
    }

    /// Draw every opaque drawable into all five channels.
    pub fn render(&self, cmd: &mut dyn CommandList, scene: &SceneContext) -> Result<()> {
        self.target.activate_all(cmd)?;
        // Alpha carries data, blending would corrupt it
        cmd.set_blend_mode(BlendMode::Disabled)?;
        cmd.set_depth_test(true)?;
        cmd.clear(ClearFlags::COLOR | ClearFlags::DEPTH, ClearValue::black())?;

        cmd.use_shader(&self.shader)?;
        self.shader.set_uniform("z_near", UniformValue::Float(scene.camera.z_near()))?;
        self.shader.set_uniform("z_far", UniformValue::Float(scene.camera.z_far()))?;

        for drawable in &scene.drawables {
            draw_with_model(drawable.as_ref(), cmd, &self.shader)?;
        }
        engine_debug!("lumina::GeometryStage", "Drew {} objects into the G-buffer", scene.drawables.len());
        Ok(())
    }

    pub fn channel(&self, channel: GBufferChannel) -> Result<Arc<dyn Texture>> {
        self.target.sample_attachment(channel.index())
    }

    pub fn target(&self) -> &OffscreenTarget {
        &self.target
    }

    pub fn resize(&mut self, renderer: &mut dyn Renderer, width: u32, height: u32) -> Result<()> {
        self.target.reallocate(renderer, width, height)
    }

    pub(crate) fn target_mut(&mut self) -> &mut OffscreenTarget {
        &mut self.target
    }
}
