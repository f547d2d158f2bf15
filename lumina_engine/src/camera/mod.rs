//! Camera module - passive camera plus depth-range helpers.
//!
//! The engine does NOT move cameras. Input integration belongs to the
//! caller; the pipeline only reads the camera each frame.

mod camera;
mod depth;

pub use camera::Camera;
pub use depth::{DepthRange, ProjectionKind};
