/// Frame loop - owns every stage and drives one frame through the pass graph.
///
/// Per frame: uniforms, shadows (when due), geometry, SSAO (+ blur), lighting,
/// depth blit + forward pass, bloom, post-process to the screen. The
/// `RenderConfig` is read once at the start of each frame.

use winit::event::WindowEvent;

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::renderer::Renderer;
use crate::scene::SceneContext;
use crate::shaders::ShaderLibrary;
use crate::stages::{
    select_source, AmbientOcclusionStage, BloomStage, GeometryStage, LightingStage, OcclusionMode,
    PostProcessStage, ShadowStage,
};
use crate::target::{reallocate_all, OffscreenTarget};
use crate::uniforms::{FrameUniforms, UniformBlock};
use crate::{engine_debug, engine_info, engine_report, engine_trace, engine_warn};
use super::pass_graph::{PassGraph, PassKind};
use super::render_config::{PipelineSettings, RenderConfig};

/// What one `render_frame` call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStats {
    pub frame_index: u64,
    /// Passes in execution order
    pub passes: Vec<PassKind>,
    /// Draw calls, full-screen passes included
    pub draw_calls: u32,
}

impl FrameStats {
    pub fn passes_executed(&self) -> usize {
        self.passes.len()
    }

    pub fn executed(&self, kind: PassKind) -> bool {
        self.passes.contains(&kind)
    }
}

/// Deferred pipeline driver
pub struct FrameLoop {
    config: RenderConfig,
    settings: PipelineSettings,
    uniforms: UniformBlock,
    shaders: ShaderLibrary,
    shadow: ShadowStage,
    geometry: GeometryStage,
    ssao: AmbientOcclusionStage,
    lighting: LightingStage,
    bloom: BloomStage,
    post: PostProcessStage,
    width: u32,
    height: u32,
    frame_index: u64,
}

impl FrameLoop {
    /// Compile every shader and allocate every target.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for out-of-range settings or a zero-sized viewport,
    /// `ShaderCompile`/`ShaderLink` and `TargetCreation` from setup. Nothing
    /// is rendered with a half-built pipeline.
    pub fn new(
        renderer: &mut dyn Renderer,
        settings: PipelineSettings,
        config: RenderConfig,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        settings.validate().map_err(|err| engine_report!("lumina::FrameLoop", err))?;
        config.validate().map_err(|err| engine_report!("lumina::FrameLoop", err))?;
        if width == 0 || height == 0 {
            return Err(engine_report!("lumina::FrameLoop", Error::InvalidConfig(format!(
                "cannot build the pipeline for a {}x{} viewport", width, height
            ))));
        }

        let uniforms = UniformBlock::new(renderer)?;
        let shaders = ShaderLibrary::load(renderer, &uniforms)?;

        let shadow = ShadowStage::new(settings, shaders.directional_depth.clone(), shaders.point_depth.clone());
        let geometry = GeometryStage::new(renderer, shaders.geometry.clone(), width, height)?;
        let ssao = AmbientOcclusionStage::new(renderer, shaders.ssao.clone(), shaders.ssao_blur.clone(),
            &settings, width, height)?;
        let lighting = LightingStage::new(renderer, shaders.lighting.clone(), shaders.light_cube.clone(),
            &settings, width, height)?;
        let bloom = BloomStage::new(renderer, shaders.gaussian_blur.clone(), shaders.bloom_mix.clone(),
            width, height)?;
        let post = PostProcessStage::new(shaders.post_effects.clone(), settings.clear_color, width, height)?;

        engine_info!("lumina::FrameLoop", "Deferred pipeline ready at {}x{} (shadow maps {}², {:?})",
            width, height, settings.shadow_resolution, settings.shadow_refresh);

        Ok(Self {
            config,
            settings,
            uniforms,
            shaders,
            shadow,
            geometry,
            ssao,
            lighting,
            bloom,
            post,
            width,
            height,
            frame_index: 0,
        })
    }

    /// Record one frame.
    ///
    /// Shadow depth targets for newly added lights are allocated first;
    /// the maps are re-rendered when the refresh policy says so.
    pub fn render_frame(&mut self, renderer: &mut dyn Renderer, scene: &mut SceneContext) -> Result<FrameStats> {
        let config = self.config;
        let effects = config.post_effects()?;
        let aspect = Camera::aspect_for(self.width, self.height)?;
        let frame = self.frame_index;
        self.frame_index += 1;

        self.shadow.sync_lights(renderer, &scene.lights)?;
        let shadows_due = self.shadow.is_due(self.settings.shadow_refresh);
        let graph = PassGraph::deferred(&config, shadows_due)?;
        let order = graph.execution_order();

        let before = renderer.stats();
        let cmd = renderer.command_list();

        for &kind in &order {
            engine_trace!("lumina::FrameLoop", "Frame {}: {}", frame, kind.name());
            match kind {
                PassKind::Uniforms => {
                    self.uniforms.update(frame, FrameUniforms::from_camera(&scene.camera, aspect))?;
                    self.uniforms.bind(cmd)?;
                }
                PassKind::Shadows => self.shadow.render(cmd, &mut scene.lights, &scene.drawables)?,
                PassKind::Geometry => self.geometry.render(cmd, scene)?,
                PassKind::Ssao => self.ssao.render(cmd, &self.geometry)?,
                PassKind::SsaoBlur => self.ssao.render_blur(cmd)?,
                PassKind::Lighting => {
                    let occlusion = if config.ssao_enabled {
                        Some(self.ssao.occlusion_texture(config.ssao_blur_enabled)?)
                    } else {
                        None
                    };
                    let mode = OcclusionMode {
                        apply_ssao: config.ssao_enabled,
                        apply_blur: config.ssao_blur_enabled,
                    };
                    self.lighting.render(cmd, &self.geometry, occlusion.as_ref(), mode, &scene.lights)?;
                }
                PassKind::Forward => self.lighting.render_forward(cmd, &self.geometry, &scene.forward)?,
                PassKind::Bloom => {
                    self.bloom.apply(cmd, &self.lighting, config.bloom_iterations)?;
                }
                PassKind::PostProcess => {
                    let source = select_source(
                        config.bloom_enabled,
                        self.bloom.finished_texture()?,
                        self.lighting.scene_texture()?,
                    );
                    self.post.apply(cmd, &source, &effects)?;
                }
            }
        }

        let after = renderer.stats();
        let draw_calls = (after.draw_calls + after.fullscreen_draws)
            .saturating_sub(before.draw_calls + before.fullscreen_draws);
        engine_debug!("lumina::FrameLoop", "Frame {} recorded {} passes, {} draw calls",
            frame, order.len(), draw_calls);

        Ok(FrameStats { frame_index: frame, passes: order, draw_calls })
    }

    /// Reallocate every screen-sized target.
    ///
    /// Zero-sized requests (minimized window) and unchanged sizes are
    /// ignored. Returns whether a reallocation happened. On error every
    /// target keeps its previous size.
    pub fn handle_resize(&mut self, renderer: &mut dyn Renderer, width: u32, height: u32) -> Result<bool> {
        if width == 0 || height == 0 {
            engine_debug!("lumina::FrameLoop", "Ignoring {}x{} resize", width, height);
            return Ok(false);
        }
        if (width, height) == (self.width, self.height) {
            return Ok(false);
        }

        // All targets switch together or none do; the blits need matching sizes
        let mut targets = vec![self.geometry.target_mut(), self.lighting.target_mut()];
        targets.extend(self.ssao.targets_mut());
        targets.extend(self.bloom.targets_mut());
        reallocate_all(renderer, targets, width, height).map_err(|err| {
            engine_warn!("lumina::FrameLoop", "Resize to {}x{} failed, keeping {}x{}",
                width, height, self.width, self.height);
            err
        })?;
        self.post.resize(width, height);
        self.width = width;
        self.height = height;

        engine_info!("lumina::FrameLoop", "Resized render targets to {}x{}", width, height);
        Ok(true)
    }

    /// Forward window events; only `Resized` matters.
    pub fn handle_window_event(&mut self, renderer: &mut dyn Renderer, event: &WindowEvent) -> Result<bool> {
        match event {
            WindowEvent::Resized(size) => self.handle_resize(renderer, size.width, size.height),
            _ => Ok(false),
        }
    }

    /// Replace the interactive configuration; applies from the next frame.
    pub fn set_config(&mut self, config: RenderConfig) -> Result<()> {
        config.validate().map_err(|err| engine_report!("lumina::FrameLoop", err))?;
        if config != self.config {
            engine_debug!("lumina::FrameLoop", "Render config changed: {:?}", config);
        }
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Re-render shadow maps on the next frame.
    pub fn invalidate_shadows(&mut self) {
        self.shadow.invalidate();
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Frames rendered so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn shaders(&self) -> &ShaderLibrary {
        &self.shaders
    }

    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    pub fn shadow_stage(&self) -> &ShadowStage {
        &self.shadow
    }

    /// Every screen-sized offscreen target
    pub fn targets(&self) -> Vec<&OffscreenTarget> {
        let mut targets = vec![self.geometry.target(), self.lighting.target()];
        targets.extend(self.ssao.targets());
        targets.extend(self.bloom.targets());
        targets
    }
}

#[cfg(test)]
#[path = "frame_loop_tests.rs"]
mod tests;
