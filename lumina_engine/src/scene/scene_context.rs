/// SceneContext - everything a frame reads from the scene.
///
/// Passed by reference into the frame loop and each stage; there is no
/// global scene or camera.

use std::sync::Arc;

use crate::camera::Camera;
use crate::lights::LightManager;
use super::drawable::{Drawable, ForwardObject};

pub struct SceneContext {
    pub camera: Camera,
    pub lights: LightManager,
    /// Opaque geometry (geometry and shadow passes)
    pub drawables: Vec<Arc<dyn Drawable>>,
    /// Forward geometry (drawn after lighting)
    pub forward: Vec<ForwardObject>,
}

impl SceneContext {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            lights: LightManager::new(),
            drawables: Vec::new(),
            forward: Vec::new(),
        }
    }

    pub fn add_drawable(&mut self, drawable: Arc<dyn Drawable>) {
        self.drawables.push(drawable);
    }

    pub fn add_forward(&mut self, object: ForwardObject) {
        self.forward.push(object);
    }
}
