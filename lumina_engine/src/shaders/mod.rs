//! Shader library - GLSL programs bundled with the crate.
//!
//! Every program is compiled at startup through the renderer; a compile or
//! link failure aborts pipeline creation.

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{Renderer, Shader, ShaderDesc, ShaderSource, ShaderStage};
use crate::uniforms::UniformBlock;
use crate::{engine_info, engine_report};

const FULLSCREEN_VERT: &str = include_str!("../../shaders/fullscreen.vert");
const GEOMETRY_VERT: &str = include_str!("../../shaders/geometry_pass.vert");
const GEOMETRY_FRAG: &str = include_str!("../../shaders/geometry_pass.frag");
const SIMPLE_DEPTH_VERT: &str = include_str!("../../shaders/simple_depth.vert");
const SIMPLE_DEPTH_FRAG: &str = include_str!("../../shaders/simple_depth.frag");
const CUBE_DEPTH_VERT: &str = include_str!("../../shaders/cube_depth.vert");
const CUBE_DEPTH_GEOM: &str = include_str!("../../shaders/cube_depth.geom");
const CUBE_DEPTH_FRAG: &str = include_str!("../../shaders/cube_depth.frag");
const SSAO_FRAG: &str = include_str!("../../shaders/ssao.frag");
const SSAO_BLUR_FRAG: &str = include_str!("../../shaders/ssao_blur.frag");
const LIGHTING_FRAG: &str = include_str!("../../shaders/lighting_pass.frag");
const LIGHT_CUBE_VERT: &str = include_str!("../../shaders/light_cube.vert");
const LIGHT_CUBE_FRAG: &str = include_str!("../../shaders/light_cube.frag");
const GAUSSIAN_BLUR_FRAG: &str = include_str!("../../shaders/gaussian_blur.frag");
const BLOOM_MIX_FRAG: &str = include_str!("../../shaders/bloom_mix.frag");
const POST_EFFECTS_FRAG: &str = include_str!("../../shaders/post_effects.frag");

/// Compiled programs, one per pass
#[derive(Clone)]
pub struct ShaderLibrary {
    pub geometry: Arc<dyn Shader>,
    pub directional_depth: Arc<dyn Shader>,
    pub point_depth: Arc<dyn Shader>,
    pub ssao: Arc<dyn Shader>,
    pub ssao_blur: Arc<dyn Shader>,
    pub lighting: Arc<dyn Shader>,
    pub light_cube: Arc<dyn Shader>,
    pub gaussian_blur: Arc<dyn Shader>,
    pub bloom_mix: Arc<dyn Shader>,
    pub post_effects: Arc<dyn Shader>,
}

fn program(name: &str, sources: &[(ShaderStage, &'static str)]) -> ShaderDesc {
    ShaderDesc {
        name: name.to_string(),
        sources: sources
            .iter()
            .map(|&(stage, code)| ShaderSource { stage, code })
            .collect(),
    }
}

fn compile(renderer: &mut dyn Renderer, desc: ShaderDesc) -> Result<Arc<dyn Shader>> {
    renderer
        .create_shader(desc)
        .map_err(|err| engine_report!("lumina::ShaderLibrary", err))
}

impl ShaderLibrary {
    /// Compile every program and bind the `Matrices` block where it is read.
    pub fn load(renderer: &mut dyn Renderer, uniforms: &UniformBlock) -> Result<Self> {
        use ShaderStage::{Fragment, Geometry, Vertex};

        let library = Self {
            geometry: compile(renderer, program("geometry", &[(Vertex, GEOMETRY_VERT), (Fragment, GEOMETRY_FRAG)]))?,
            directional_depth: compile(renderer, program("directional_depth",
                &[(Vertex, SIMPLE_DEPTH_VERT), (Fragment, SIMPLE_DEPTH_FRAG)]))?,
            point_depth: compile(renderer, program("point_depth",
                &[(Vertex, CUBE_DEPTH_VERT), (Geometry, CUBE_DEPTH_GEOM), (Fragment, CUBE_DEPTH_FRAG)]))?,
            ssao: compile(renderer, program("ssao", &[(Vertex, FULLSCREEN_VERT), (Fragment, SSAO_FRAG)]))?,
            ssao_blur: compile(renderer, program("ssao_blur", &[(Vertex, FULLSCREEN_VERT), (Fragment, SSAO_BLUR_FRAG)]))?,
            lighting: compile(renderer, program("lighting", &[(Vertex, FULLSCREEN_VERT), (Fragment, LIGHTING_FRAG)]))?,
            light_cube: compile(renderer, program("light_cube", &[(Vertex, LIGHT_CUBE_VERT), (Fragment, LIGHT_CUBE_FRAG)]))?,
            gaussian_blur: compile(renderer, program("gaussian_blur",
                &[(Vertex, FULLSCREEN_VERT), (Fragment, GAUSSIAN_BLUR_FRAG)]))?,
            bloom_mix: compile(renderer, program("bloom_mix", &[(Vertex, FULLSCREEN_VERT), (Fragment, BLOOM_MIX_FRAG)]))?,
            post_effects: compile(renderer, program("post_effects",
                &[(Vertex, FULLSCREEN_VERT), (Fragment, POST_EFFECTS_FRAG)]))?,
        };

        for shader in [&library.geometry, &library.ssao, &library.lighting, &library.light_cube] {
            uniforms.bind_shader(shader)?;
        }

        engine_info!("lumina::ShaderLibrary", "Compiled 10 shader programs");
        Ok(library)
    }
}

#[cfg(test)]
#[path = "shaders_tests.rs"]
mod tests;
