/// Post-process math (mirrors `post_effects.frag`).
///
/// Fixed order: kernel, exposure tone mapping, gamma, grayscale, inversion.

use glam::{Vec3, Vec4Swizzles};

use super::image::Image;
use super::lighting::LUMINANCE;

/// Display gamma
pub const GAMMA: f32 = 2.2;

/// 3×3 convolution applied before tone mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostKernel {
    #[default]
    Identity,
    Sharpen,
    Blur,
    EdgeDetection,
}

impl PostKernel {
    /// Kernel for the interactive selector (0..=3)
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(PostKernel::Identity),
            1 => Some(PostKernel::Sharpen),
            2 => Some(PostKernel::Blur),
            3 => Some(PostKernel::EdgeDetection),
            _ => None,
        }
    }

    /// Value of the `KernelIndex` uniform
    pub fn index(self) -> u32 {
        match self {
            PostKernel::Identity => 0,
            PostKernel::Sharpen => 1,
            PostKernel::Blur => 2,
            PostKernel::EdgeDetection => 3,
        }
    }

    /// Row-major weights, top row first
    pub fn weights(self) -> [f32; 9] {
        match self {
            PostKernel::Identity => [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            PostKernel::Sharpen => [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0],
            PostKernel::Blur => {
                let w = [1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0];
                w.map(|v: f32| v / 16.0)
            }
            PostKernel::EdgeDetection => [1.0, 1.0, 1.0, 1.0, -8.0, 1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Post-process switches read once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostEffects {
    pub kernel: PostKernel,
    pub exposure: f32,
    pub gamma_correction: bool,
    pub grayscale: bool,
    pub inversion: bool,
}

pub fn tone_map(color: Vec3, exposure: f32) -> Vec3 {
    Vec3::ONE - (-color * exposure).exp()
}

pub fn gamma_correct(color: Vec3) -> Vec3 {
    color.powf(1.0 / GAMMA)
}

pub fn grayscale(color: Vec3) -> Vec3 {
    Vec3::splat(color.dot(LUMINANCE))
}

pub fn invert(color: Vec3) -> Vec3 {
    Vec3::ONE - color
}

/// 3×3 convolution with one-texel offsets, clamp-to-edge
pub fn apply_kernel(image: &Image, kernel: PostKernel) -> Image {
    if kernel == PostKernel::Identity {
        return image.clone();
    }
    let weights = kernel.weights();
    Image::from_fn(image.width(), image.height(), |x, y| {
        let mut sum = Vec3::ZERO;
        for row in 0..3i32 {
            for col in 0..3i32 {
                // Top row first: +1 in y is up in texture space
                let dx = col - 1;
                let dy = 1 - row;
                let texel = image.get_clamped(x as i32 + dx, y as i32 + dy).xyz();
                sum += texel * weights[(row * 3 + col) as usize];
            }
        }
        sum.extend(1.0)
    })
}

/// Per-pixel effects after the kernel
pub fn apply_color_effects(color: Vec3, effects: &PostEffects) -> Vec3 {
    let mut color = tone_map(color, effects.exposure);
    if effects.gamma_correction {
        color = gamma_correct(color);
    }
    if effects.grayscale {
        color = grayscale(color);
    }
    if effects.inversion {
        color = invert(color);
    }
    color
}

/// Full post-process chain over an image
pub fn post_process_image(image: &Image, effects: &PostEffects) -> Image {
    apply_kernel(image, effects.kernel).map(|pixel| apply_color_effects(pixel.xyz(), effects).extend(1.0))
}
