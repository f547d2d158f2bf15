/// Pipeline configuration.
///
/// `RenderConfig` holds the interactive switches, read once per frame.
/// `PipelineSettings` holds the constants fixed at startup.

use glam::Vec3;

use crate::error::{Error, Result};
use crate::shading::{PostEffects, PostKernel};
use crate::shading::blur::{MAX_BLOOM_ITERATIONS, MIN_BLOOM_ITERATIONS};
use crate::shading::ssao;

/// Highest accepted exposure
pub const MAX_EXPOSURE: f32 = 100.0;

/// Interactive render switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub grayscale: bool,
    pub inversion: bool,
    pub gamma_correction: bool,
    /// 0 identity, 1 sharpen, 2 blur, 3 edge detection
    pub kernel_index: u32,
    pub exposure: f32,
    pub ssao_enabled: bool,
    pub ssao_blur_enabled: bool,
    pub bloom_enabled: bool,
    pub bloom_iterations: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            grayscale: false,
            inversion: false,
            gamma_correction: true,
            kernel_index: 0,
            exposure: 0.4,
            ssao_enabled: true,
            ssao_blur_enabled: true,
            bloom_enabled: false,
            bloom_iterations: 15,
        }
    }
}

impl RenderConfig {
    /// Reject out-of-range values
    pub fn validate(&self) -> Result<()> {
        if PostKernel::from_index(self.kernel_index).is_none() {
            return Err(Error::InvalidConfig(format!(
                "kernel index {} is outside 0..=3", self.kernel_index
            )));
        }
        if !self.exposure.is_finite() || !(0.0..=MAX_EXPOSURE).contains(&self.exposure) {
            return Err(Error::InvalidConfig(format!(
                "exposure {} is outside 0..={}", self.exposure, MAX_EXPOSURE
            )));
        }
        if !(MIN_BLOOM_ITERATIONS..=MAX_BLOOM_ITERATIONS).contains(&self.bloom_iterations) {
            return Err(Error::InvalidConfig(format!(
                "bloom iterations {} are outside {}..={}",
                self.bloom_iterations, MIN_BLOOM_ITERATIONS, MAX_BLOOM_ITERATIONS
            )));
        }
        Ok(())
    }

    /// Post-process switches for this configuration
    pub fn post_effects(&self) -> Result<PostEffects> {
        let kernel = PostKernel::from_index(self.kernel_index).ok_or_else(|| {
            Error::InvalidConfig(format!("kernel index {} is outside 0..=3", self.kernel_index))
        })?;
        Ok(PostEffects {
            kernel,
            exposure: self.exposure,
            gamma_correction: self.gamma_correction,
            grayscale: self.grayscale,
            inversion: self.inversion,
        })
    }
}

/// When shadow maps are re-rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRefreshPolicy {
    /// Render once, then only after `invalidate`
    #[default]
    Static,
    /// Render every frame
    PerFrame,
}

/// Directional shadow frustum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalShadowSettings {
    /// Orthographic half extent B in `ortho(-B, B, -B, B, near, far)`
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
    /// Light eye sits at `-distance·direction + lift·world_up`
    pub distance: f32,
    pub lift: f32,
    pub world_up: Vec3,
}

impl Default for DirectionalShadowSettings {
    fn default() -> Self {
        Self {
            half_extent: 10.0,
            near: 30.0,
            far: 120.0,
            distance: 25.0,
            lift: 10.0,
            world_up: Vec3::Y,
        }
    }
}

/// Startup constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    /// Shadow map edge length (2D and per cube face)
    pub shadow_resolution: u32,
    pub directional_shadow: DirectionalShadowSettings,
    /// Near plane of the cube shadow projection; the far plane is per light
    pub point_shadow_near: f32,
    pub shadow_refresh: ShadowRefreshPolicy,
    pub ssao_kernel_size: usize,
    pub ssao_radius: f32,
    pub ssao_bias: f32,
    /// Seed for the kernel and noise generators
    pub ssao_seed: u64,
    pub bright_threshold: f32,
    /// Screen clear color of the final pass
    pub clear_color: [f32; 4],
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            shadow_resolution: 4096,
            directional_shadow: DirectionalShadowSettings::default(),
            point_shadow_near: 1.0,
            shadow_refresh: ShadowRefreshPolicy::Static,
            ssao_kernel_size: ssao::KERNEL_SIZE,
            ssao_radius: ssao::RADIUS,
            ssao_bias: ssao::BIAS,
            ssao_seed: 0x5eed,
            bright_threshold: crate::shading::lighting::BRIGHT_THRESHOLD,
            clear_color: [0.3, 0.3, 0.3, 1.0],
        }
    }
}

impl PipelineSettings {
    pub fn validate(&self) -> Result<()> {
        if self.shadow_resolution == 0 {
            return Err(Error::InvalidConfig("shadow resolution must be non-zero".to_string()));
        }
        let dir = &self.directional_shadow;
        if !(dir.half_extent > 0.0 && dir.near < dir.far) {
            return Err(Error::InvalidConfig(format!(
                "directional shadow frustum (B {}, near {}, far {}) is empty",
                dir.half_extent, dir.near, dir.far
            )));
        }
        if !(self.point_shadow_near > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "point shadow near plane {} must be positive", self.point_shadow_near
            )));
        }
        if self.ssao_kernel_size == 0 || self.ssao_kernel_size > ssao::KERNEL_SIZE {
            return Err(Error::InvalidConfig(format!(
                "SSAO kernel size {} is outside 1..={}", self.ssao_kernel_size, ssao::KERNEL_SIZE
            )));
        }
        if self.ssao_radius <= 0.0 {
            return Err(Error::InvalidConfig(format!("SSAO radius {} must be positive", self.ssao_radius)));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "render_config_tests.rs"]
mod tests;
