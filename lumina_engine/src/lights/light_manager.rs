/// Ordered light collection and its serialization to the lighting shader.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::renderer::{Shader, Texture, UniformValue};
use crate::{engine_debug, engine_report};
use super::light::{DirectionalLight, Light, PointLight};

/// Directional lights the lighting shader declares
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// Point lights the lighting shader declares
pub const MAX_POINT_LIGHTS: usize = 6;

/// Fragment texture units every GL 3.3 implementation provides
pub const MAX_TEXTURE_UNITS: u32 = 16;

/// Shadow map texture to bind before the lighting draw
#[derive(Clone)]
pub struct ShadowBinding {
    pub unit: u32,
    pub texture: Arc<dyn Texture>,
}

/// Lights in insertion order.
///
/// Append-only during setup; read-only while frames render (the shadow
/// stage only attaches shadow maps to existing lights).
#[derive(Default)]
pub struct LightManager {
    directional: Vec<DirectionalLight>,
    point: Vec<PointLight>,
}

impl LightManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a light; returns its index among lights of the same kind.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the shader's light array is already full, or
    /// when a directional light has no usable direction.
    pub fn add(&mut self, light: impl Into<Light>) -> Result<usize> {
        match light.into() {
            Light::Directional(light) => {
                if !light.direction.is_finite() || light.direction.length_squared() < f32::EPSILON {
                    return Err(engine_report!("lumina::LightManager", Error::InvalidConfig(format!(
                        "directional light direction {:?} cannot be normalized", light.direction
                    ))));
                }
                if self.directional.len() >= MAX_DIRECTIONAL_LIGHTS {
                    return Err(engine_report!("lumina::LightManager", Error::InvalidConfig(format!(
                        "at most {} directional lights are supported", MAX_DIRECTIONAL_LIGHTS
                    ))));
                }
                self.directional.push(light);
                Ok(self.directional.len() - 1)
            }
            Light::Point(light) => {
                if self.point.len() >= MAX_POINT_LIGHTS {
                    return Err(engine_report!("lumina::LightManager", Error::InvalidConfig(format!(
                        "at most {} point lights are supported", MAX_POINT_LIGHTS
                    ))));
                }
                self.point.push(light);
                Ok(self.point.len() - 1)
            }
        }
    }

    pub fn directional(&self) -> &[DirectionalLight] {
        &self.directional
    }

    pub fn point(&self) -> &[PointLight] {
        &self.point
    }

    pub(crate) fn directional_mut(&mut self) -> &mut [DirectionalLight] {
        &mut self.directional
    }

    pub(crate) fn point_mut(&mut self) -> &mut [PointLight] {
        &mut self.point
    }

    pub fn len(&self) -> usize {
        self.directional.len() + self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Texture unit of directional light `index`'s shadow map
    pub fn directional_shadow_unit(first_unit: u32, index: usize) -> u32 {
        first_unit + index as u32
    }

    /// Texture unit of point light `index`'s shadow cube map
    pub fn point_shadow_unit(first_unit: u32, index: usize) -> u32 {
        first_unit + (MAX_DIRECTIONAL_LIGHTS + index) as u32
    }

    /// Push the light list into `shader`.
    ///
    /// Every declared shadow sampler gets its own unit starting at
    /// `first_unit`, so 2D and cube samplers never share one. Returns the
    /// shadow maps the caller must bind.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the last sampler would land past
    /// [`MAX_TEXTURE_UNITS`].
    pub fn configure_shader(&self, shader: &Arc<dyn Shader>, first_unit: u32) -> Result<Vec<ShadowBinding>> {
        let last_unit = Self::point_shadow_unit(first_unit, MAX_POINT_LIGHTS - 1);
        if last_unit >= MAX_TEXTURE_UNITS {
            return Err(engine_report!("lumina::LightManager", Error::InvalidConfig(format!(
                "shadow samplers need units {}..={}, only {} are available",
                first_unit, last_unit, MAX_TEXTURE_UNITS
            ))));
        }

        let mut bindings = Vec::new();

        shader.set_uniform("dir_light_count", UniformValue::Int(self.directional.len() as i32))?;
        shader.set_uniform("point_light_count", UniformValue::Int(self.point.len() as i32))?;

        for index in 0..MAX_DIRECTIONAL_LIGHTS {
            let unit = Self::directional_shadow_unit(first_unit, index);
            shader.set_uniform(&format!("dir_lights[{}].shadow_map", index), UniformValue::Int(unit as i32))?;
        }
        for index in 0..MAX_POINT_LIGHTS {
            let unit = Self::point_shadow_unit(first_unit, index);
            shader.set_uniform(&format!("point_lights[{}].shadow_map", index), UniformValue::Int(unit as i32))?;
        }

        for (index, light) in self.directional.iter().enumerate() {
            let prefix = format!("dir_lights[{}]", index);
            set_attrib(shader, &prefix, &light.attrib)?;
            shader.set_uniform(&format!("{}.direction", prefix), UniformValue::Vec3(light.unit_direction()))?;
            let transform = light.light_space_transform.unwrap_or_default();
            shader.set_uniform(&format!("{}.light_space_transform", prefix), UniformValue::Mat4(transform))?;
            shader.set_uniform(&format!("{}.has_shadow", prefix), UniformValue::Bool(light.shadow_map.is_some()))?;
            if let Some(texture) = &light.shadow_map {
                bindings.push(ShadowBinding {
                    unit: Self::directional_shadow_unit(first_unit, index),
                    texture: texture.clone(),
                });
            }
        }

        for (index, light) in self.point.iter().enumerate() {
            let prefix = format!("point_lights[{}]", index);
            set_attrib(shader, &prefix, &light.attrib)?;
            shader.set_uniform(&format!("{}.position", prefix), UniformValue::Vec3(light.position))?;
            shader.set_uniform(&format!("{}.attenuation.linear", prefix),
                UniformValue::Float(light.attenuation.linear))?;
            shader.set_uniform(&format!("{}.attenuation.quadratic", prefix),
                UniformValue::Float(light.attenuation.quadratic))?;
            shader.set_uniform(&format!("{}.far_plane", prefix), UniformValue::Float(light.far_plane))?;
            shader.set_uniform(&format!("{}.has_shadow", prefix), UniformValue::Bool(light.shadow_map.is_some()))?;
            if let Some(texture) = &light.shadow_map {
                bindings.push(ShadowBinding {
                    unit: Self::point_shadow_unit(first_unit, index),
                    texture: texture.clone(),
                });
            }
        }

        engine_debug!("lumina::LightManager", "Configured {} directional, {} point lights on '{}'",
            self.directional.len(), self.point.len(), shader.name());
        Ok(bindings)
    }
}

fn set_attrib(shader: &Arc<dyn Shader>, prefix: &str, attrib: &super::light::LightAttrib) -> Result<()> {
    shader.set_uniform(&format!("{}.attrib.ambient", prefix), UniformValue::Vec3(attrib.ambient))?;
    shader.set_uniform(&format!("{}.attrib.diffuse", prefix), UniformValue::Vec3(attrib.diffuse))?;
    shader.set_uniform(&format!("{}.attrib.specular", prefix), UniformValue::Vec3(attrib.specular))
}

#[cfg(test)]
#[path = "light_manager_tests.rs"]
mod tests;
