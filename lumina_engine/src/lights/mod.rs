//! Lights module - directional and point lights, and their manager.

mod light;
mod light_manager;

pub use light::{Attenuation, DirectionalLight, Light, LightAttrib, PointLight};
pub use light_manager::{LightManager, ShadowBinding, MAX_DIRECTIONAL_LIGHTS, MAX_POINT_LIGHTS, MAX_TEXTURE_UNITS};
