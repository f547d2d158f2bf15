/// Separable Gaussian blur and bloom composite (mirrors `gaussian_blur.frag`
/// and `bloom_mix.frag`).

use glam::Vec4Swizzles;

use super::image::Image;

/// Center weight followed by four side weights
pub const GAUSSIAN_WEIGHTS: [f32; 5] = [0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216];

/// Allowed bloom iteration range
pub const MIN_BLOOM_ITERATIONS: u32 = 1;
pub const MAX_BLOOM_ITERATIONS: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurDirection {
    Horizontal,
    Vertical,
}

impl BlurDirection {
    /// Value of the `horizontal` uniform
    pub fn is_horizontal(self) -> bool {
        self == BlurDirection::Horizontal
    }
}

/// One blur pass along `direction`, clamp-to-edge.
pub fn gaussian_pass(input: &Image, direction: BlurDirection) -> Image {
    let (sx, sy) = match direction {
        BlurDirection::Horizontal => (1, 0),
        BlurDirection::Vertical => (0, 1),
    };
    Image::from_fn(input.width(), input.height(), |x, y| {
        let (x, y) = (x as i32, y as i32);
        let mut result = input.get_clamped(x, y).xyz() * GAUSSIAN_WEIGHTS[0];
        for (i, weight) in GAUSSIAN_WEIGHTS.iter().enumerate().skip(1) {
            let i = i as i32;
            result += input.get_clamped(x + i * sx, y + i * sy).xyz() * *weight;
            result += input.get_clamped(x - i * sx, y - i * sy).xyz() * *weight;
        }
        result.extend(1.0)
    })
}

/// Clamp a requested iteration count to the supported range
pub fn clamp_iterations(iterations: u32) -> u32 {
    iterations.clamp(MIN_BLOOM_ITERATIONS, MAX_BLOOM_ITERATIONS)
}

/// Ping-pong blur: each iteration is a horizontal then a vertical pass.
pub fn bloom_blur(bright: &Image, iterations: u32) -> Image {
    let mut current = bright.clone();
    for _ in 0..clamp_iterations(iterations) {
        let horizontal = gaussian_pass(&current, BlurDirection::Horizontal);
        current = gaussian_pass(&horizontal, BlurDirection::Vertical);
    }
    current
}

/// Additive composite `scene + blurred`
pub fn bloom_composite(scene: &Image, blurred: &Image) -> Image {
    Image::from_fn(scene.width(), scene.height(), |x, y| {
        (scene.get(x, y).xyz() + blurred.get(x, y).xyz()).extend(1.0)
    })
}

/// Source of the post-process pass.
///
/// With bloom off the pipeline reads the shaded buffer untouched.
pub fn bloom_output(scene: &Image, bright: &Image, enabled: bool, iterations: u32) -> Image {
    if enabled {
        bloom_composite(scene, &bloom_blur(bright, iterations))
    } else {
        scene.clone()
    }
}
