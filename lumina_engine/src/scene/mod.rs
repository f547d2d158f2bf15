//! Scene module - drawable collaborator and the per-frame scene bundle.

mod drawable;
mod scene_context;

pub use drawable::{draw_with_model, Drawable, ForwardObject};
pub use scene_context::SceneContext;
