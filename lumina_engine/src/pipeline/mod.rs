//! Pipeline module - configuration, pass graph and the frame driver.

mod render_config;
mod pass_graph;
mod frame_loop;

pub use render_config::{
    DirectionalShadowSettings, PipelineSettings, RenderConfig, ShadowRefreshPolicy, MAX_EXPOSURE,
};
pub use pass_graph::{buffers, Pass, PassGraph, PassId, PassKind};
pub use frame_loop::{FrameLoop, FrameStats};
