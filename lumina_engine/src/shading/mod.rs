//! Shading module - CPU evaluation of the full-screen pass math.
//!
//! Each function mirrors one GLSL source under `shaders/`. The GPU is the
//! production path; these are used to check the formulas pixel by pixel and
//! to generate the SSAO kernel and noise uploaded to the GPU.

pub mod image;
pub mod lighting;
pub mod ssao;
pub mod blur;
pub mod post;

pub use image::Image;
pub use lighting::{
    shade, shade_image, CubeDepth, DirectionalDepth, GBufferImages, LightingOutput,
    ShadowMaps, ShadowSampler, SurfaceSample, Unshadowed,
};
pub use post::{PostEffects, PostKernel};

#[cfg(test)]
#[path = "shading_tests.rs"]
mod tests;
