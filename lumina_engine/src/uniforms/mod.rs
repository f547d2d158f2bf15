//! Uniforms module - shared per-frame camera state.

mod frame_uniforms;
mod uniform_block;

pub use frame_uniforms::{FrameUniforms, FRAME_UNIFORMS_SIZE};
pub use uniform_block::{UniformBlock, MATRICES_BLOCK, MATRICES_SLOT};

#[cfg(test)]
#[path = "uniforms_tests.rs"]
mod tests;
