use glam::{Mat4, Vec3};
use std::sync::Arc;

use super::*;
use crate::lights::{Attenuation, DirectionalLight, LightAttrib, PointLight};
use crate::renderer::mock_renderer::{MockShader, MockTexture};
use crate::renderer::{SamplerDesc, Shader, Texture, TextureDesc, TextureFormat, TextureKind, UniformValue};
use crate::error::Error;

fn sun() -> DirectionalLight {
    DirectionalLight::new(LightAttrib::uniform(Vec3::splat(0.5)), Vec3::new(0.0, -2.0, 0.0))
}

fn bulb() -> PointLight {
    PointLight::new(LightAttrib::uniform(Vec3::ONE), Vec3::new(1.0, 2.0, 3.0), Attenuation::new(0.7, 3.5), 120.0)
}

fn shader() -> (Arc<MockShader>, Arc<dyn Shader>) {
    let shader = Arc::new(MockShader::new("lighting".to_string(), vec![]));
    let as_dyn: Arc<dyn Shader> = shader.clone();
    (shader, as_dyn)
}

fn shadow_texture(name: &str, kind: TextureKind) -> Arc<dyn Texture> {
    Arc::new(MockTexture::from_desc(&TextureDesc {
        name: name.to_string(),
        width: 4,
        height: 4,
        format: TextureFormat::D32_SFLOAT,
        kind,
        sampler: SamplerDesc::shadow_border(),
        data: None,
    }))
}

// ============================================================================
// Collection
// ============================================================================

#[test]
fn test_add_keeps_insertion_order() {
    let mut lights = LightManager::new();
    assert!(lights.is_empty());

    assert_eq!(lights.add(sun()).unwrap(), 0);
    assert_eq!(lights.add(bulb()).unwrap(), 0);
    let mut second = sun();
    second.direction = Vec3::X;
    assert_eq!(lights.add(second).unwrap(), 1);

    assert_eq!(lights.len(), 3);
    assert_eq!(lights.directional()[1].direction, Vec3::X);
    assert_eq!(lights.directional()[0].direction, Vec3::new(0.0, -2.0, 0.0));
}

#[test]
fn test_add_rejects_degenerate_direction() {
    let mut lights = LightManager::new();
    for direction in [Vec3::ZERO, Vec3::splat(1e-5), Vec3::new(f32::NAN, -1.0, 0.0), Vec3::new(0.0, f32::INFINITY, 0.0)] {
        let light = DirectionalLight::new(LightAttrib::uniform(Vec3::ONE), direction);
        assert!(matches!(lights.add(light), Err(Error::InvalidConfig(_))), "{:?}", direction);
    }
    assert!(lights.is_empty());

    assert_eq!(lights.add(sun()).unwrap(), 0);
}

#[test]
fn test_capacity_is_enforced() {
    let mut lights = LightManager::new();
    for _ in 0..MAX_DIRECTIONAL_LIGHTS {
        lights.add(sun()).unwrap();
    }
    assert!(matches!(lights.add(sun()), Err(Error::InvalidConfig(_))));

    for _ in 0..MAX_POINT_LIGHTS {
        lights.add(bulb()).unwrap();
    }
    assert!(matches!(lights.add(bulb()), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_attenuation_factor() {
    let attenuation = Attenuation::new(0.7, 3.5);
    assert_eq!(attenuation.factor(0.0), 1.0);
    assert!((attenuation.factor(1.0) - 1.0 / 5.2).abs() < 1e-6);
}

// ============================================================================
// configure_shader
// ============================================================================

#[test]
fn test_configure_shader_serializes_lights() {
    let mut lights = LightManager::new();
    lights.add(sun()).unwrap();
    lights.add(bulb()).unwrap();
    let (mock, shader) = shader();

    let bindings = lights.configure_shader(&shader, 6).unwrap();
    assert!(bindings.is_empty());

    assert_eq!(mock.uniform_int("dir_light_count"), Some(1));
    assert_eq!(mock.uniform_int("point_light_count"), Some(1));
    assert_eq!(mock.uniform("dir_lights[0].direction"), Some(UniformValue::Vec3(Vec3::NEG_Y)));
    assert_eq!(mock.uniform("dir_lights[0].attrib.diffuse"), Some(UniformValue::Vec3(Vec3::splat(0.5))));
    assert_eq!(mock.uniform_bool("dir_lights[0].has_shadow"), Some(false));
    assert_eq!(mock.uniform("point_lights[0].position"), Some(UniformValue::Vec3(Vec3::new(1.0, 2.0, 3.0))));
    assert_eq!(mock.uniform_float("point_lights[0].attenuation.linear"), Some(0.7));
    assert_eq!(mock.uniform_float("point_lights[0].attenuation.quadratic"), Some(3.5));
    assert_eq!(mock.uniform_float("point_lights[0].far_plane"), Some(120.0));
}

#[test]
fn test_configure_shader_assigns_distinct_units() {
    let lights = LightManager::new();
    let (mock, shader) = shader();
    lights.configure_shader(&shader, 6).unwrap();

    let mut units = Vec::new();
    for i in 0..MAX_DIRECTIONAL_LIGHTS {
        units.push(mock.uniform_int(&format!("dir_lights[{}].shadow_map", i)).unwrap());
    }
    for i in 0..MAX_POINT_LIGHTS {
        units.push(mock.uniform_int(&format!("point_lights[{}].shadow_map", i)).unwrap());
    }
    let expected: Vec<i32> = (6..6 + (MAX_DIRECTIONAL_LIGHTS + MAX_POINT_LIGHTS) as i32).collect();
    assert_eq!(units, expected);
    assert_eq!(units.last().copied(), Some(MAX_TEXTURE_UNITS as i32 - 1));
}

#[test]
fn test_configure_shader_rejects_units_past_limit() {
    let lights = LightManager::new();
    let (mock, shader) = shader();

    assert!(matches!(lights.configure_shader(&shader, 7), Err(Error::InvalidConfig(_))));
    assert_eq!(mock.uniform_int("dir_light_count"), None);
    assert!(lights.configure_shader(&shader, 6).is_ok());
}

#[test]
fn test_configure_shader_returns_shadow_bindings() {
    let mut lights = LightManager::new();
    lights.add(sun()).unwrap();
    lights.add(bulb()).unwrap();
    let transform = Mat4::from_scale(Vec3::splat(2.0));
    lights.directional_mut()[0].attach_shadow(shadow_texture("sun", TextureKind::Texture2D), transform);
    lights.point_mut()[0].attach_shadow(shadow_texture("bulb", TextureKind::CubeMap), [Mat4::IDENTITY; 6]);
    let (mock, shader) = shader();

    let bindings = lights.configure_shader(&shader, 6).unwrap();
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings[0].unit, 6);
    assert_eq!(bindings[0].texture.info().name, "sun");
    assert_eq!(bindings[1].unit, 6 + MAX_DIRECTIONAL_LIGHTS as u32);
    assert_eq!(bindings[1].texture.info().name, "bulb");
    assert_eq!(mock.uniform_mat4("dir_lights[0].light_space_transform"), Some(transform));
    assert_eq!(mock.uniform_bool("point_lights[0].has_shadow"), Some(true));
}
