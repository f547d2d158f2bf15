/// Lighting stage - full-screen deferred shading plus the forward pass.
///
/// Writes the shaded color (attachment 0) and the bright regions above the
/// luminance threshold (attachment 1). The forward pass then draws light
/// source geometry into both outputs, depth-tested against the G-buffer
/// depth blitted into this target.

use std::sync::Arc;

use crate::error::Result;
use crate::lights::LightManager;
use crate::pipeline::PipelineSettings;
use crate::renderer::{
    BlendMode, ClearFlags, ClearValue, CommandList, Renderer, SamplerDesc, Shader, Texture,
    TextureDesc, TextureFormat, TextureKind, UniformValue,
};
use crate::scene::{draw_with_model, ForwardObject};
use crate::target::{OffscreenTarget, TargetDesc};
use crate::{engine_debug, engine_trace};
use super::geometry::{GBufferChannel, GeometryStage};

/// Texture unit of the occlusion buffer
pub const OCCLUSION_UNIT: u32 = 5;

/// First texture unit of the shadow samplers
pub const FIRST_SHADOW_UNIT: u32 = 6;

/// SSAO switches of one lighting draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OcclusionMode {
    pub apply_ssao: bool,
    pub apply_blur: bool,
}

pub struct LightingStage {
    target: OffscreenTarget,
    shader: Arc<dyn Shader>,
    forward_shader: Arc<dyn Shader>,
    /// Bound on the occlusion unit while SSAO is off
    neutral_occlusion: Arc<dyn Texture>,
}

impl LightingStage {
    pub fn new(
        renderer: &mut dyn Renderer,
        shader: Arc<dyn Shader>,
        forward_shader: Arc<dyn Shader>,
        settings: &PipelineSettings,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let target = OffscreenTarget::create(renderer,
            TargetDesc::uniform("lighting", width, height, 2, TextureFormat::R16G16B16A16_SFLOAT, true))?;

        let neutral_occlusion = renderer.create_texture(TextureDesc {
            name: "lighting.neutral_occlusion".to_string(),
            width: 1,
            height: 1,
            format: TextureFormat::R8G8B8A8_UNORM,
            kind: TextureKind::Texture2D,
            sampler: SamplerDesc::nearest_clamp(),
            data: Some(vec![255; 4]),
        })?;

        for channel in GBufferChannel::ALL {
            shader.set_uniform(channel.sampler_name(), UniformValue::Int(channel.index() as i32))?;
        }
        shader.set_uniform("ssao.occlusion", UniformValue::Int(OCCLUSION_UNIT as i32))?;
        shader.set_uniform("bright_threshold", UniformValue::Float(settings.bright_threshold))?;

        Ok(Self { target, shader, forward_shader, neutral_occlusion })
    }

    /// Shade every G-buffer pixel with every light.
    ///
    /// `occlusion` is `None` when SSAO is disabled; the ambient term is
    /// then multiplied by 1.
    pub fn render(
        &self,
        cmd: &mut dyn CommandList,
        geometry: &GeometryStage,
        occlusion: Option<&Arc<dyn Texture>>,
        mode: OcclusionMode,
        lights: &LightManager,
    ) -> Result<()> {
        self.target.activate_all(cmd)?;
        cmd.set_depth_test(false)?;
        cmd.set_blend_mode(BlendMode::Disabled)?;
        cmd.clear(ClearFlags::COLOR | ClearFlags::DEPTH, ClearValue::black())?;

        cmd.use_shader(&self.shader)?;
        for channel in GBufferChannel::ALL {
            cmd.bind_texture(channel.index() as u32, &geometry.channel(channel)?)?;
        }
        let apply_ssao = mode.apply_ssao && occlusion.is_some();
        cmd.bind_texture(OCCLUSION_UNIT, occlusion.unwrap_or(&self.neutral_occlusion))?;
        self.shader.set_uniform("ssao.apply_ssao", UniformValue::Bool(apply_ssao))?;
        self.shader.set_uniform("ssao.apply_blur", UniformValue::Bool(apply_ssao && mode.apply_blur))?;

        for binding in lights.configure_shader(&self.shader, FIRST_SHADOW_UNIT)? {
            cmd.bind_texture(binding.unit, &binding.texture)?;
        }
        cmd.draw_fullscreen()?;
        engine_trace!("lumina::LightingStage", "Shaded with {} lights", lights.len());
        Ok(())
    }

    /// Blit G-buffer depth, then draw light-source geometry into both outputs.
    pub fn render_forward(
        &self,
        cmd: &mut dyn CommandList,
        geometry: &GeometryStage,
        objects: &[ForwardObject],
    ) -> Result<()> {
        geometry.target().copy_depth_to(cmd, &self.target)?;
        self.target.activate(cmd, &[0, 1])?;
        cmd.set_depth_test(true)?;

        cmd.use_shader(&self.forward_shader)?;
        for object in objects {
            self.forward_shader.set_uniform("light_color", UniformValue::Vec3(object.color))?;
            draw_with_model(object.drawable.as_ref(), cmd, &self.forward_shader)?;
        }
        engine_debug!("lumina::LightingStage", "Forward pass drew {} objects", objects.len());
        Ok(())
    }

    /// Shaded color buffer
    pub fn scene_texture(&self) -> Result<Arc<dyn Texture>> {
        self.target.sample_attachment(0)
    }

    /// Bright-regions buffer
    pub fn bright_texture(&self) -> Result<Arc<dyn Texture>> {
        self.target.sample_attachment(1)
    }

    pub fn target(&self) -> &OffscreenTarget {
        &self.target
    }

    pub(crate) fn target_mut(&mut self) -> &mut OffscreenTarget {
        &mut self.target
    }
}
