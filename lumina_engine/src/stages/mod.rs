//! Stages module - one type per pipeline pass.
//!
//! Each stage owns its offscreen target(s) and shader handles, records its
//! commands into the shared `CommandList`, and exposes its outputs as
//! sampleable textures for the next stage.

mod geometry;
mod shadow;
mod ssao;
mod lighting;
mod bloom;
mod post_process;

pub use geometry::{GBufferChannel, GeometryStage};
pub use shadow::{
    directional_light_position, directional_light_space_transform, point_light_transforms,
    ShadowCaster, ShadowCasterState, ShadowKind, ShadowStage, CUBE_FACES,
};
pub use ssao::AmbientOcclusionStage;
pub use lighting::{LightingStage, OcclusionMode, FIRST_SHADOW_UNIT, OCCLUSION_UNIT};
pub use bloom::{select_source, BloomStage};
pub use post_process::PostProcessStage;

#[cfg(test)]
#[path = "stages_tests.rs"]
mod tests;
