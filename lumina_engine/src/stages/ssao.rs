/// Ambient occlusion stage - SSAO from the view-space G-buffer channels,
/// followed by an optional 4x4 box blur.

use std::sync::Arc;
use glam::{Vec2, Vec3};

use crate::error::Result;
use crate::pipeline::PipelineSettings;
use crate::renderer::{
    BlendMode, ClearFlags, ClearValue, CommandList, Renderer, SamplerDesc, Shader, Texture,
    TextureDesc, TextureFormat, TextureKind, UniformValue,
};
use crate::shading::ssao::{generate_kernel, generate_noise, NOISE_DIM};
use crate::target::{OffscreenTarget, TargetDesc};
use crate::engine_debug;
use super::geometry::{GBufferChannel, GeometryStage};

const VIEW_POSITION_UNIT: u32 = 0;
const VIEW_NORMAL_UNIT: u32 = 1;
const NOISE_UNIT: u32 = 2;

/// Noise rotation vectors as RGBA32F texels (z = 0, a = 1)
fn noise_texels(noise: &[Vec3]) -> Vec<u8> {
    let texels: Vec<[f32; 4]> = noise.iter().map(|v| [v.x, v.y, v.z, 1.0]).collect();
    bytemuck::cast_slice(&texels).to_vec()
}

pub struct AmbientOcclusionStage {
    ssao_target: OffscreenTarget,
    blur_target: OffscreenTarget,
    noise: Arc<dyn Texture>,
    ssao_shader: Arc<dyn Shader>,
    blur_shader: Arc<dyn Shader>,
    kernel: Vec<Vec3>,
}

impl AmbientOcclusionStage {
    /// Allocate both targets, upload the noise tile and the sample kernel.
    pub fn new(
        renderer: &mut dyn Renderer,
        ssao_shader: Arc<dyn Shader>,
        blur_shader: Arc<dyn Shader>,
        settings: &PipelineSettings,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let ssao_target = OffscreenTarget::create(renderer,
            TargetDesc::uniform("ssao", width, height, 1, TextureFormat::R16_SFLOAT, false))?;
        let blur_target = OffscreenTarget::create(renderer,
            TargetDesc::uniform("ssao_blur", width, height, 1, TextureFormat::R16_SFLOAT, false))?;

        let noise = renderer.create_texture(TextureDesc {
            name: "ssao.noise".to_string(),
            width: NOISE_DIM,
            height: NOISE_DIM,
            format: TextureFormat::R32G32B32A32_SFLOAT,
            kind: TextureKind::Texture2D,
            sampler: SamplerDesc::nearest_repeat(),
            data: Some(noise_texels(&generate_noise(settings.ssao_seed.wrapping_add(1)))),
        })?;

        let kernel = generate_kernel(settings.ssao_kernel_size, settings.ssao_seed);
        for (index, sample) in kernel.iter().enumerate() {
            ssao_shader.set_uniform(&format!("samples[{}]", index), UniformValue::Vec3(*sample))?;
        }
        ssao_shader.set_uniform("kernel_size", UniformValue::Int(kernel.len() as i32))?;
        ssao_shader.set_uniform("radius", UniformValue::Float(settings.ssao_radius))?;
        ssao_shader.set_uniform("bias", UniformValue::Float(settings.ssao_bias))?;
        ssao_shader.set_uniform(GBufferChannel::ViewPosition.sampler_name(), UniformValue::Int(VIEW_POSITION_UNIT as i32))?;
        ssao_shader.set_uniform(GBufferChannel::ViewNormal.sampler_name(), UniformValue::Int(VIEW_NORMAL_UNIT as i32))?;
        ssao_shader.set_uniform("noise_texture", UniformValue::Int(NOISE_UNIT as i32))?;
        blur_shader.set_uniform("ssao_input", UniformValue::Int(0))?;

        engine_debug!("lumina::AmbientOcclusionStage", "Uploaded {} kernel samples", kernel.len());
        Ok(Self { ssao_target, blur_target, noise, ssao_shader, blur_shader, kernel })
    }

    /// Raw occlusion into the `ssao` target.
    pub fn render(&self, cmd: &mut dyn CommandList, geometry: &GeometryStage) -> Result<()> {
        self.ssao_target.activate_all(cmd)?;
        cmd.set_depth_test(false)?;
        cmd.set_blend_mode(BlendMode::Disabled)?;
        cmd.clear(ClearFlags::COLOR, ClearValue::black())?;

        cmd.use_shader(&self.ssao_shader)?;
        cmd.bind_texture(VIEW_POSITION_UNIT, &geometry.channel(GBufferChannel::ViewPosition)?)?;
        cmd.bind_texture(VIEW_NORMAL_UNIT, &geometry.channel(GBufferChannel::ViewNormal)?)?;
        cmd.bind_texture(NOISE_UNIT, &self.noise)?;
        self.ssao_shader.set_uniform("noise_scale", UniformValue::Vec2(self.noise_scale()))?;
        cmd.draw_fullscreen()
    }

    /// Box blur of the raw occlusion into the `ssao_blur` target.
    pub fn render_blur(&self, cmd: &mut dyn CommandList) -> Result<()> {
        self.blur_target.activate_all(cmd)?;
        cmd.clear(ClearFlags::COLOR, ClearValue::black())?;
        cmd.use_shader(&self.blur_shader)?;
        cmd.bind_texture(0, &self.ssao_target.sample_attachment(0)?)?;
        cmd.draw_fullscreen()
    }

    /// Occlusion the lighting pass reads
    pub fn occlusion_texture(&self, blurred: bool) -> Result<Arc<dyn Texture>> {
        if blurred {
            self.blur_target.sample_attachment(0)
        } else {
            self.ssao_target.sample_attachment(0)
        }
    }

    /// Tiles the 4x4 noise texture across the screen
    pub fn noise_scale(&self) -> Vec2 {
        Vec2::new(
            self.ssao_target.width() as f32 / NOISE_DIM as f32,
            self.ssao_target.height() as f32 / NOISE_DIM as f32,
        )
    }

    pub fn kernel(&self) -> &[Vec3] {
        &self.kernel
    }

    pub(crate) fn targets_mut(&mut self) -> [&mut OffscreenTarget; 2] {
        [&mut self.ssao_target, &mut self.blur_target]
    }

    pub fn targets(&self) -> [&OffscreenTarget; 2] {
        [&self.ssao_target, &self.blur_target]
    }
}
