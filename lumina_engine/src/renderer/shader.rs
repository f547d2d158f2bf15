/// Shader trait, shader descriptor and uniform values

use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::error::Result;

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Geometry,
    Fragment,
}

/// Source code of one stage
#[derive(Debug, Clone)]
pub struct ShaderSource {
    /// Stage this source is compiled for
    pub stage: ShaderStage,
    /// GLSL source code
    pub code: &'static str,
}

/// Descriptor for creating a shader program
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    /// Program name, used in diagnostics
    pub name: String,
    /// One source per stage
    pub sources: Vec<ShaderSource>,
}

impl ShaderDesc {
    /// Returns the source for `stage`, if the program has one
    pub fn source(&self, stage: ShaderStage) -> Option<&'static str> {
        self.sources.iter().find(|s| s.stage == stage).map(|s| s.code)
    }
}

/// Value assignable to a named uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

/// Compiled, linked shader program
///
/// Programs are opaque uniform-addressable targets. Uniform values persist
/// in the program until overwritten, like GL program state.
pub trait Shader: Send + Sync {
    /// Program name
    fn name(&self) -> &str;

    /// Set a named uniform
    ///
    /// Unknown names are ignored by backends (inactive uniforms are
    /// optimized out by the compiler).
    fn set_uniform(&self, name: &str, value: UniformValue) -> Result<()>;

    /// Bind the named uniform block to a binding slot
    fn set_uniform_block_binding(&self, block: &str, slot: u32) -> Result<()>;
}
