//! Target module - offscreen render destinations.

mod offscreen_target;

pub use offscreen_target::{
    reallocate_all, ColorAttachmentDesc, DepthAttachment, OffscreenTarget, PendingReallocation, TargetDesc,
    TargetLayout,
};
