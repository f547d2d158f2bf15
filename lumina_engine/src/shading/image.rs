/// In-memory RGBA float image.
///
/// Stands in for a render target channel when evaluating pass math on the
/// CPU. Pixel (0, 0) is the bottom-left texel, matching texture coordinates.

use glam::{Vec2, Vec4};

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Image {
    /// Image cleared to zero
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Vec4::ZERO)
    }

    pub fn filled(width: u32, height: u32, value: Vec4) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; (width * height) as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Vec4) -> Self {
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, value: Vec4) {
        self.pixels[(y * self.width + x) as usize] = value;
    }

    /// Texel fetch with clamp-to-edge addressing
    pub fn get_clamped(&self, x: i32, y: i32) -> Vec4 {
        let x = x.clamp(0, self.width as i32 - 1) as u32;
        let y = y.clamp(0, self.height as i32 - 1) as u32;
        self.get(x, y)
    }

    /// NEAREST sample at texture coordinate `uv`, clamp-to-edge
    pub fn sample_nearest(&self, uv: Vec2) -> Vec4 {
        let x = (uv.x * self.width as f32).floor() as i32;
        let y = (uv.y * self.height as f32).floor() as i32;
        self.get_clamped(x, y)
    }

    /// Per-pixel transform
    pub fn map(&self, f: impl Fn(Vec4) -> Vec4) -> Image {
        Image {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&p| f(p)).collect(),
        }
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }
}
