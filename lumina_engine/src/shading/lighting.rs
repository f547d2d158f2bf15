/// Deferred lighting math (mirrors `lighting_pass.frag`).

use glam::{Mat4, Vec2, Vec3, Vec3Swizzles, Vec4Swizzles};

use crate::lights::{DirectionalLight, LightAttrib, LightManager, PointLight};
use super::image::Image;

/// Blinn-Phong exponent
pub const SPECULAR_EXPONENT: f32 = 32.0;

/// Rec. 709 luminance weights
pub const LUMINANCE: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Luminance above which a pixel is copied to the bright output
pub const BRIGHT_THRESHOLD: f32 = 1.0;

pub const DIRECTIONAL_SHADOW_BIAS: f32 = 0.005;
pub const POINT_SHADOW_BIAS: f32 = 0.05;

/// One G-buffer texel as the lighting pass reads it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub world_position: Vec3,
    pub normal: Vec3,
    pub albedo: Vec3,
    pub specular: f32,
}

/// Shadow lookups available to the lighting pass
pub trait ShadowSampler {
    /// Shadow factor (0 lit, 1 shadowed) for directional light `index`
    fn directional(&self, index: usize, light: &DirectionalLight, world_position: Vec3) -> f32;

    /// Shadow factor for point light `index`
    fn point(&self, index: usize, light: &PointLight, world_position: Vec3) -> f32;
}

/// No shadow maps: every light is unoccluded
pub struct Unshadowed;

impl ShadowSampler for Unshadowed {
    fn directional(&self, _index: usize, _light: &DirectionalLight, _world_position: Vec3) -> f32 {
        0.0
    }

    fn point(&self, _index: usize, _light: &PointLight, _world_position: Vec3) -> f32 {
        0.0
    }
}

/// Six depth faces of a point light shadow, +X, -X, +Y, -Y, +Z, -Z.
///
/// Texels hold distance / far.
pub struct CubeDepth {
    pub faces: [Image; 6],
}

impl CubeDepth {
    /// NEAREST lookup along `direction` (GL cube map face selection)
    pub fn sample(&self, direction: Vec3) -> f32 {
        let abs = direction.abs();
        let (face, sc, tc, ma) = if abs.x >= abs.y && abs.x >= abs.z {
            if direction.x > 0.0 {
                (0, -direction.z, -direction.y, abs.x)
            } else {
                (1, direction.z, -direction.y, abs.x)
            }
        } else if abs.y >= abs.z {
            if direction.y > 0.0 {
                (2, direction.x, direction.z, abs.y)
            } else {
                (3, direction.x, -direction.z, abs.y)
            }
        } else if direction.z > 0.0 {
            (4, direction.x, -direction.y, abs.z)
        } else {
            (5, -direction.x, -direction.y, abs.z)
        };
        if ma == 0.0 {
            return 1.0;
        }
        let uv = Vec2::new((sc / ma + 1.0) * 0.5, (tc / ma + 1.0) * 0.5);
        self.faces[face].sample_nearest(uv).x
    }
}

/// Directional shadow map read back to the CPU
pub struct DirectionalDepth {
    pub light_space_transform: Mat4,
    pub depth: Image,
}

/// CPU copies of rendered shadow maps, indexed like the light manager
#[derive(Default)]
pub struct ShadowMaps {
    pub directional: Vec<Option<DirectionalDepth>>,
    pub point: Vec<Option<CubeDepth>>,
}

impl ShadowSampler for ShadowMaps {
    fn directional(&self, index: usize, _light: &DirectionalLight, world_position: Vec3) -> f32 {
        match self.directional.get(index) {
            Some(Some(map)) => directional_shadow(map.light_space_transform, &map.depth, world_position),
            _ => 0.0,
        }
    }

    fn point(&self, index: usize, light: &PointLight, world_position: Vec3) -> f32 {
        match self.point.get(index) {
            Some(Some(cube)) => point_shadow(cube, light.position, light.far_plane, world_position),
            _ => 0.0,
        }
    }
}

/// Single nearest-sample comparison against a directional shadow map.
///
/// Outside the light frustum reads the white border and counts as lit.
pub fn directional_shadow(light_space_transform: Mat4, depth: &Image, world_position: Vec3) -> f32 {
    let clip = light_space_transform * world_position.extend(1.0);
    let coords = clip.xyz() / clip.w * 0.5 + Vec3::splat(0.5);
    if coords.z > 1.0 {
        return 0.0;
    }
    let inside = (0.0..=1.0).contains(&coords.x) && (0.0..=1.0).contains(&coords.y);
    let closest = if inside { depth.sample_nearest(coords.xy()).x } else { 1.0 };
    if coords.z - DIRECTIONAL_SHADOW_BIAS > closest { 1.0 } else { 0.0 }
}

/// Single nearest-sample comparison against a point light cube map.
pub fn point_shadow(cube: &CubeDepth, light_position: Vec3, far_plane: f32, world_position: Vec3) -> f32 {
    let frag_to_light = world_position - light_position;
    let closest = cube.sample(frag_to_light) * far_plane;
    if frag_to_light.length() - POINT_SHADOW_BIAS > closest { 1.0 } else { 0.0 }
}

/// Luminance of a linear color
pub fn luminance(color: Vec3) -> f32 {
    color.dot(LUMINANCE)
}

/// Bright-pass output for a shaded color
pub fn bright_pass(color: Vec3) -> Vec3 {
    if luminance(color) > BRIGHT_THRESHOLD { color } else { Vec3::ZERO }
}

/// Shade one surface sample with every light.
///
/// `occlusion` is the SSAO factor, 1.0 when SSAO is off.
pub fn shade(
    surface: &SurfaceSample,
    camera_position: Vec3,
    lights: &LightManager,
    occlusion: f32,
    shadows: &dyn ShadowSampler,
) -> Vec3 {
    let normal = surface.normal.normalize_or_zero();
    let view_dir = (camera_position - surface.world_position).normalize_or_zero();
    let mut result = Vec3::ZERO;

    for (index, light) in lights.directional().iter().enumerate() {
        let light_dir = -light.unit_direction();
        let (ambient, direct) = blinn_phong(surface, normal, view_dir, light_dir, &light.attrib, occlusion);
        let shadow = shadows.directional(index, light, surface.world_position);
        result += ambient + (1.0 - shadow) * direct;
    }

    for (index, light) in lights.point().iter().enumerate() {
        let to_light = light.position - surface.world_position;
        let light_dir = to_light.normalize_or_zero();
        let (ambient, direct) = blinn_phong(surface, normal, view_dir, light_dir, &light.attrib, occlusion);
        let attenuation = light.attenuation.factor(to_light.length());
        let shadow = shadows.point(index, light, surface.world_position);
        result += (ambient + (1.0 - shadow) * direct) * attenuation;
    }

    result
}

/// (ambient, diffuse + specular) for one light
fn blinn_phong(
    surface: &SurfaceSample,
    normal: Vec3,
    view_dir: Vec3,
    light_dir: Vec3,
    attrib: &LightAttrib,
    occlusion: f32,
) -> (Vec3, Vec3) {
    let ambient = attrib.ambient * surface.albedo * occlusion;
    let diffuse = attrib.diffuse * normal.dot(light_dir).max(0.0) * surface.albedo;
    let halfway = (light_dir + view_dir).normalize_or_zero();
    let specular = attrib.specular * normal.dot(halfway).max(0.0).powf(SPECULAR_EXPONENT) * surface.specular;
    (ambient, diffuse + specular)
}

/// G-buffer channels the lighting pass reads
pub struct GBufferImages {
    /// Channel 0: world position (rgb)
    pub world_position: Image,
    /// Channel 2: world normal (rgb)
    pub world_normal: Image,
    /// Channel 4: albedo (rgb) + specular (a)
    pub albedo_specular: Image,
}

/// Color and bright outputs of the lighting pass
pub struct LightingOutput {
    pub color: Image,
    pub bright: Image,
}

/// Full-screen lighting over G-buffer images.
///
/// `occlusion` of `None` is the SSAO-disabled path (factor 1.0).
pub fn shade_image(
    gbuffer: &GBufferImages,
    occlusion: Option<&Image>,
    lights: &LightManager,
    camera_position: Vec3,
    shadows: &dyn ShadowSampler,
) -> LightingOutput {
    let width = gbuffer.world_position.width();
    let height = gbuffer.world_position.height();
    let mut color = Image::new(width, height);
    let mut bright = Image::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let albedo_spec = gbuffer.albedo_specular.get(x, y);
            let surface = SurfaceSample {
                world_position: gbuffer.world_position.get(x, y).xyz(),
                normal: gbuffer.world_normal.get(x, y).xyz(),
                albedo: albedo_spec.xyz(),
                specular: albedo_spec.w,
            };
            let ao = occlusion.map(|image| image.get(x, y).x).unwrap_or(1.0);
            let shaded = shade(&surface, camera_position, lights, ao, shadows);
            color.set(x, y, shaded.extend(1.0));
            bright.set(x, y, bright_pass(shaded).extend(1.0));
        }
    }

    LightingOutput { color, bright }
}
