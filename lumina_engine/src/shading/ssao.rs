/// Screen-space ambient occlusion (mirrors `ssao.frag` and `ssao_blur.frag`).
///
/// Kernel and noise generation live here too: the SSAO stage uploads the
/// same vectors the CPU reference uses.

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::image::Image;

/// Hemisphere samples per pixel
pub const KERNEL_SIZE: usize = 64;

/// Side of the tiled rotation-noise texture (and of the blur box)
pub const NOISE_DIM: u32 = 4;

/// Sampling radius in view-space units
pub const RADIUS: f32 = 0.5;

/// Depth comparison bias
pub const BIAS: f32 = 0.025;

/// SSAO tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsaoParams {
    pub radius: f32,
    pub bias: f32,
}

impl Default for SsaoParams {
    fn default() -> Self {
        Self { radius: RADIUS, bias: BIAS }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Tangent-space hemisphere kernel (z >= 0), clustered toward the origin.
///
/// Sample `i` is scaled by `lerp(0.1, 1.0, (i / size)²)`. Deterministic
/// for a given seed.
pub fn generate_kernel(size: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(size);

    for i in 0..size {
        let direction = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>(),
        )
        .normalize_or_zero();
        let magnitude: f32 = rng.gen();

        let scale = i as f32 / size as f32;
        let scale = lerp(0.1, 1.0, scale * scale);
        samples.push(direction * magnitude * scale);
    }

    samples
}

/// Random rotation vectors around the tangent-space Z axis.
pub fn generate_noise(seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..NOISE_DIM * NOISE_DIM)
        .map(|_| Vec3::new(rng.gen::<f32>() * 2.0 - 1.0, rng.gen::<f32>() * 2.0 - 1.0, 0.0))
        .collect()
}

/// Occlusion factor for one pixel (1.0 = unoccluded).
///
/// `view_position` holds view-space positions (rgb), `pixel` is the
/// integer texel, `projection` the camera projection.
pub fn occlusion_at(
    view_position: &Image,
    view_normal: &Image,
    pixel: (u32, u32),
    kernel: &[Vec3],
    noise: &[Vec3],
    projection: Mat4,
    params: SsaoParams,
) -> f32 {
    let (x, y) = pixel;
    let frag = view_position.get(x, y).xyz();
    let normal = view_normal.get(x, y).xyz().normalize_or_zero();
    if normal == Vec3::ZERO || kernel.is_empty() {
        return 1.0;
    }

    let random = noise[((y % NOISE_DIM) * NOISE_DIM + (x % NOISE_DIM)) as usize];
    let mut tangent = (random - normal * random.dot(normal)).normalize_or_zero();
    if tangent == Vec3::ZERO {
        tangent = normal.any_orthonormal_vector();
    }
    let bitangent = normal.cross(tangent);
    let tbn = Mat3::from_cols(tangent, bitangent, normal);

    let mut occlusion = 0.0;
    for sample in kernel {
        let sample_pos = frag + tbn * *sample * params.radius;

        let offset = projection * Vec4::new(sample_pos.x, sample_pos.y, sample_pos.z, 1.0);
        let ndc = offset.xyz() / offset.w;
        let uv = Vec2::new(ndc.x * 0.5 + 0.5, ndc.y * 0.5 + 0.5);

        let sample_depth = view_position.sample_nearest(uv).z;
        let distance = (frag.z - sample_depth).abs();
        let range_check = smoothstep(0.0, 1.0, params.radius / distance.max(f32::EPSILON));
        if sample_depth >= sample_pos.z + params.bias {
            occlusion += range_check;
        }
    }

    1.0 - occlusion / kernel.len() as f32
}

/// Occlusion for every pixel, single channel in `x`.
pub fn ambient_occlusion(
    view_position: &Image,
    view_normal: &Image,
    kernel: &[Vec3],
    noise: &[Vec3],
    projection: Mat4,
    params: SsaoParams,
) -> Image {
    Image::from_fn(view_position.width(), view_position.height(), |x, y| {
        let ao = occlusion_at(view_position, view_normal, (x, y), kernel, noise, projection, params);
        Vec4::new(ao, 0.0, 0.0, 1.0)
    })
}

/// Box blur over the noise tile (`NOISE_DIM`² texels), clamp-to-edge.
pub fn box_blur(occlusion: &Image) -> Image {
    let half = (NOISE_DIM / 2) as i32;
    let count = (NOISE_DIM * NOISE_DIM) as f32;
    Image::from_fn(occlusion.width(), occlusion.height(), |x, y| {
        let mut sum = 0.0;
        for dy in -half..half {
            for dx in -half..half {
                sum += occlusion.get_clamped(x as i32 + dx, y as i32 + dy).x;
            }
        }
        Vec4::new(sum / count, 0.0, 0.0, 1.0)
    })
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
