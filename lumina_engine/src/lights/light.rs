/// Light definitions.
///
/// Lights are plain data. The shadow stage fills in the shadow map and
/// light-space transform(s) once the light's depth target exists.

use std::sync::Arc;
use glam::{Mat4, Vec3};

use crate::renderer::Texture;

/// Ambient, diffuse and specular intensities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightAttrib {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightAttrib {
    pub fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        Self { ambient, diffuse, specular }
    }

    /// Same intensity for all three terms
    pub fn uniform(intensity: Vec3) -> Self {
        Self::new(intensity, intensity, intensity)
    }
}

/// Point light falloff `1 / (1 + linear·d + quadratic·d²)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub fn new(linear: f32, quadratic: f32) -> Self {
        Self { linear, quadratic }
    }

    /// Attenuation factor at `distance`
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (1.0 + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// Directional light
#[derive(Clone)]
pub struct DirectionalLight {
    pub attrib: LightAttrib,
    /// Direction the light travels, as given.
    ///
    /// Its length scales how far back the shadow camera sits.
    pub direction: Vec3,
    pub(crate) shadow_map: Option<Arc<dyn Texture>>,
    pub(crate) light_space_transform: Option<Mat4>,
}

impl DirectionalLight {
    pub fn new(attrib: LightAttrib, direction: Vec3) -> Self {
        Self {
            attrib,
            direction,
            shadow_map: None,
            light_space_transform: None,
        }
    }

    /// Normalized travel direction used for shading
    pub fn unit_direction(&self) -> Vec3 {
        self.direction.normalize_or_zero()
    }

    pub fn shadow_map(&self) -> Option<&Arc<dyn Texture>> {
        self.shadow_map.as_ref()
    }

    /// Projection·view of the shadow pass, once computed
    pub fn light_space_transform(&self) -> Option<Mat4> {
        self.light_space_transform
    }

    pub(crate) fn attach_shadow(&mut self, shadow_map: Arc<dyn Texture>, transform: Mat4) {
        self.shadow_map = Some(shadow_map);
        self.light_space_transform = Some(transform);
    }
}

/// Point light
#[derive(Clone)]
pub struct PointLight {
    pub attrib: LightAttrib,
    pub position: Vec3,
    pub attenuation: Attenuation,
    /// Far plane of the cube shadow projection; stored depth is distance / far
    pub far_plane: f32,
    pub(crate) shadow_map: Option<Arc<dyn Texture>>,
    pub(crate) shadow_transforms: Option<[Mat4; 6]>,
}

impl PointLight {
    pub fn new(attrib: LightAttrib, position: Vec3, attenuation: Attenuation, far_plane: f32) -> Self {
        Self {
            attrib,
            position,
            attenuation,
            far_plane,
            shadow_map: None,
            shadow_transforms: None,
        }
    }

    pub fn shadow_map(&self) -> Option<&Arc<dyn Texture>> {
        self.shadow_map.as_ref()
    }

    /// One transform per cube face, +X, -X, +Y, -Y, +Z, -Z
    pub fn shadow_transforms(&self) -> Option<&[Mat4; 6]> {
        self.shadow_transforms.as_ref()
    }

    pub(crate) fn attach_shadow(&mut self, shadow_map: Arc<dyn Texture>, transforms: [Mat4; 6]) {
        self.shadow_map = Some(shadow_map);
        self.shadow_transforms = Some(transforms);
    }
}

/// Any light the manager accepts
#[derive(Clone)]
pub enum Light {
    Directional(DirectionalLight),
    Point(PointLight),
}

impl From<DirectionalLight> for Light {
    fn from(light: DirectionalLight) -> Self {
        Light::Directional(light)
    }
}

impl From<PointLight> for Light {
    fn from(light: PointLight) -> Self {
        Light::Point(light)
    }
}
