/// Texture trait, texture descriptor, sampler state and texture info

/// Texture storage format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // Color formats
    R8G8B8A8_UNORM,
    R16_SFLOAT,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_SFLOAT,

    // Depth formats
    D24_UNORM_S8_UINT,
    D32_SFLOAT,
}

impl TextureFormat {
    /// Returns true for depth/stencil formats
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_SFLOAT)
    }

    /// Number of channels stored per texel
    pub fn channel_count(&self) -> u32 {
        match self {
            TextureFormat::R16_SFLOAT => 1,
            TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::R16G16B16A16_SFLOAT
            | TextureFormat::R32G32B32A32_SFLOAT => 4,
            TextureFormat::D24_UNORM_S8_UINT => 2,
            TextureFormat::D32_SFLOAT => 1,
        }
    }

    /// Size in bytes of one texel
    pub fn bytes_per_texel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM => 4,
            TextureFormat::R16_SFLOAT => 2,
            TextureFormat::R16G16B16A16_SFLOAT => 8,
            TextureFormat::R32G32B32A32_SFLOAT => 16,
            TextureFormat::D24_UNORM_S8_UINT => 4,
            TextureFormat::D32_SFLOAT => 4,
        }
    }
}

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// Simple 2D texture
    Texture2D,
    /// Six-faced cube map (+X, -X, +Y, -Y, +Z, -Z)
    CubeMap,
}

/// Texel filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// Addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
    ClampToBorder,
}

/// Sampler state baked into a texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDesc {
    /// Minification and magnification filter
    pub filter: FilterMode,
    /// Wrap mode applied on every axis (S, T and R for cube maps)
    pub wrap: WrapMode,
    /// Border color used with `WrapMode::ClampToBorder`
    pub border_color: [f32; 4],
}

impl SamplerDesc {
    /// Nearest filtering, clamp to edge (intermediate pass buffers)
    pub fn nearest_clamp() -> Self {
        Self {
            filter: FilterMode::Nearest,
            wrap: WrapMode::ClampToEdge,
            border_color: [0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Linear filtering, clamp to edge (blur and bloom buffers)
    pub fn linear_clamp() -> Self {
        Self {
            filter: FilterMode::Linear,
            wrap: WrapMode::ClampToEdge,
            border_color: [0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Nearest filtering, repeat (tiled noise textures)
    pub fn nearest_repeat() -> Self {
        Self {
            filter: FilterMode::Nearest,
            wrap: WrapMode::Repeat,
            border_color: [0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Nearest filtering, clamp to a white border
    ///
    /// Used by directional shadow maps: lookups outside the light frustum
    /// read depth 1.0 and therefore count as lit.
    pub fn shadow_border() -> Self {
        Self {
            filter: FilterMode::Nearest,
            wrap: WrapMode::ClampToBorder,
            border_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self::nearest_clamp()
    }
}

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Debug name
    pub name: String,
    /// Width in pixels (per face for cube maps)
    pub width: u32,
    /// Height in pixels (per face for cube maps)
    pub height: u32,
    /// Texel format
    pub format: TextureFormat,
    /// 2D or cube map
    pub kind: TextureKind,
    /// Sampler state
    pub sampler: SamplerDesc,
    /// Optional initial texel data (tightly packed, all faces in order)
    pub data: Option<Vec<u8>>,
}

/// Read-only properties of a created texture
#[derive(Debug, Clone)]
pub struct TextureInfo {
    /// Debug name
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Texel format
    pub format: TextureFormat,
    /// 2D or cube map
    pub kind: TextureKind,
    /// Sampler state
    pub sampler: SamplerDesc,
}

impl TextureInfo {
    /// Returns true for cube maps
    pub fn is_cube(&self) -> bool {
        self.kind == TextureKind::CubeMap
    }
}

/// Texture resource trait
///
/// Implemented by backend-specific texture types.
/// The texture is destroyed when the last handle is dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;
}
