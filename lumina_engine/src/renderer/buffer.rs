/// Buffer trait and buffer descriptor

use crate::error::Result;

/// Buffer usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Uniform block storage
    Uniform,
    /// Vertex data
    Vertex,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Debug name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Usage
    pub usage: BufferUsage,
}

/// GPU buffer trait
pub trait Buffer: Send + Sync {
    /// Size in bytes
    fn size(&self) -> u64;

    /// Write `data` at byte `offset`
    ///
    /// # Errors
    ///
    /// Returns an error if the write would run past the end of the buffer.
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;
}
