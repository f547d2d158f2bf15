/*!
# Lumina Engine

Real-time deferred rendering pipeline.

A frame flows through a fixed graph of passes, each writing offscreen
targets that later passes sample:

- **Shadows**: depth maps per light (2D for directional, cube for point)
- **Geometry**: five-channel G-buffer (positions + linear depth, normals, albedo + specular)
- **Ambient occlusion**: SSAO with an optional 4x4 blur
- **Lighting**: full-screen shading of every light, bright-region extraction,
  then a depth-tested forward pass for light-source geometry
- **Bloom**: ping-pong Gaussian blur composited onto the shaded image
- **Post-process**: kernel, exposure tone mapping, gamma, grayscale, inversion

The host graphics API sits behind the `renderer` traits. The `shading`
module evaluates the same per-pixel math on the CPU.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod renderer;
pub mod camera;
pub mod uniforms;
pub mod target;
pub mod lights;
pub mod scene;
pub mod shaders;
pub mod shading;
pub mod stages;
pub mod pipeline;

// Main lumina namespace module
pub mod lumina {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging front-end
    pub use crate::engine::Engine;

    // Frame driver and configuration
    pub use crate::pipeline::{FrameLoop, FrameStats, PipelineSettings, RenderConfig, ShadowRefreshPolicy};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{format_entry, Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with all host API traits
    pub mod render {
        pub use crate::renderer::*;
    }

    pub mod scene {
        pub use crate::camera::{Camera, DepthRange, ProjectionKind};
        pub use crate::lights::*;
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
