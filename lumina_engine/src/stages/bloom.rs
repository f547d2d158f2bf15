/// Bloom stage - ping-pong Gaussian blur of the bright regions, composited
/// additively onto the shaded scene.

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{BlendMode, CommandList, Renderer, SamplerDesc, Shader, Texture, TextureFormat, UniformValue};
use crate::shading::blur::clamp_iterations;
use crate::target::{OffscreenTarget, TargetDesc};
use crate::{engine_debug, engine_warn};
use super::lighting::LightingStage;

/// Texture the post-process pass reads.
///
/// Bloom off sources the shaded buffer directly; nothing is recomputed.
pub fn select_source(bloom_enabled: bool, finished: Arc<dyn Texture>, scene: Arc<dyn Texture>) -> Arc<dyn Texture> {
    if bloom_enabled {
        finished
    } else {
        scene
    }
}

pub struct BloomStage {
    ping_pong: [OffscreenTarget; 2],
    composite: OffscreenTarget,
    blur_shader: Arc<dyn Shader>,
    mix_shader: Arc<dyn Shader>,
}

impl BloomStage {
    pub fn new(
        renderer: &mut dyn Renderer,
        blur_shader: Arc<dyn Shader>,
        mix_shader: Arc<dyn Shader>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let blur_target = |name: &str| {
            TargetDesc::new(name, width, height)
                .with_color_sampler(TextureFormat::R16G16B16A16_SFLOAT, SamplerDesc::linear_clamp())
        };
        let ping = OffscreenTarget::create(renderer, blur_target("bloom.ping"))?;
        let pong = OffscreenTarget::create(renderer, blur_target("bloom.pong"))?;
        let composite = OffscreenTarget::create(renderer,
            TargetDesc::uniform("bloom", width, height, 1, TextureFormat::R16G16B16A16_SFLOAT, false))?;

        blur_shader.set_uniform("image", UniformValue::Int(0))?;
        mix_shader.set_uniform("scene", UniformValue::Int(0))?;
        mix_shader.set_uniform("bloom_blur", UniformValue::Int(1))?;

        Ok(Self { ping_pong: [ping, pong], composite, blur_shader, mix_shader })
    }

    /// Blur `lighting`'s bright buffer `iterations` times, then composite.
    ///
    /// One iteration is a horizontal pass into the first buffer followed by
    /// a vertical pass into the second. Returns the clamped iteration count.
    pub fn apply(&self, cmd: &mut dyn CommandList, lighting: &LightingStage, iterations: u32) -> Result<u32> {
        let requested = iterations;
        let iterations = clamp_iterations(requested);
        if iterations != requested {
            engine_warn!("lumina::BloomStage", "Bloom iterations {} clamped to {}", requested, iterations);
        }
        cmd.set_depth_test(false)?;
        cmd.set_blend_mode(BlendMode::Disabled)?;
        cmd.use_shader(&self.blur_shader)?;

        let mut source = lighting.bright_texture()?;
        for _ in 0..iterations {
            for (target, horizontal) in self.ping_pong.iter().zip([true, false]) {
                target.activate_all(cmd)?;
                self.blur_shader.set_uniform("horizontal", UniformValue::Bool(horizontal))?;
                cmd.bind_texture(0, &source)?;
                cmd.draw_fullscreen()?;
                source = target.sample_attachment(0)?;
            }
        }

        self.composite.activate_all(cmd)?;
        cmd.use_shader(&self.mix_shader)?;
        cmd.bind_texture(0, &lighting.scene_texture()?)?;
        cmd.bind_texture(1, &source)?;
        cmd.draw_fullscreen()?;

        engine_debug!("lumina::BloomStage", "Bloom with {} blur iterations", iterations);
        Ok(iterations)
    }

    /// Scene plus blurred bright regions
    pub fn finished_texture(&self) -> Result<Arc<dyn Texture>> {
        self.composite.sample_attachment(0)
    }

    pub(crate) fn targets_mut(&mut self) -> [&mut OffscreenTarget; 3] {
        let [ping, pong] = &mut self.ping_pong;
        [ping, pong, &mut self.composite]
    }

    pub fn targets(&self) -> [&OffscreenTarget; 3] {
        [&self.ping_pong[0], &self.ping_pong[1], &self.composite]
    }
}
