/// Post-process stage - kernel, tone mapping, gamma, grayscale and
/// inversion, written to the screen.

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{BlendMode, ClearFlags, ClearValue, CommandList, Shader, Texture, UniformValue, Viewport};
use crate::shading::PostEffects;
use crate::engine_trace;

pub struct PostProcessStage {
    shader: Arc<dyn Shader>,
    clear_color: [f32; 4],
    width: u32,
    height: u32,
}

impl PostProcessStage {
    pub fn new(shader: Arc<dyn Shader>, clear_color: [f32; 4], width: u32, height: u32) -> Result<Self> {
        shader.set_uniform("screen_texture", UniformValue::Int(0))?;
        Ok(Self { shader, clear_color, width, height })
    }

    /// Draw `source` to the screen through `effects`.
    pub fn apply(&self, cmd: &mut dyn CommandList, source: &Arc<dyn Texture>, effects: &PostEffects) -> Result<()> {
        cmd.bind_framebuffer(None)?;
        cmd.set_viewport(Viewport::full(self.width, self.height))?;
        cmd.set_depth_test(false)?;
        cmd.set_blend_mode(BlendMode::Disabled)?;
        cmd.clear(ClearFlags::COLOR, ClearValue::color(self.clear_color))?;

        cmd.use_shader(&self.shader)?;
        cmd.bind_texture(0, source)?;
        self.shader.set_uniform("KernelIndex", UniformValue::Int(effects.kernel.index() as i32))?;
        self.shader.set_uniform("exposure", UniformValue::Float(effects.exposure))?;
        self.shader.set_uniform("GammaCorrection", UniformValue::Bool(effects.gamma_correction))?;
        self.shader.set_uniform("Grayscale", UniformValue::Bool(effects.grayscale))?;
        self.shader.set_uniform("Inversion", UniformValue::Bool(effects.inversion))?;
        cmd.draw_fullscreen()?;
        engine_trace!("lumina::PostProcessStage", "Presented '{}'", source.info().name);
        Ok(())
    }

    /// Screen size changed
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
