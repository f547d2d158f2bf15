//! Error types for the Lumina engine
//!
//! This module defines the error types used throughout the pipeline,
//! including resource creation, shader compilation and pass ordering.

use std::fmt;

/// Result type for Lumina engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Lumina engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (OpenGL, Vulkan, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, attachment index, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, renderer, subsystems)
    InitializationFailed(String),

    /// A render target never became complete after attachment configuration
    TargetCreation {
        /// Name of the offscreen target
        target: String,
        /// Completeness status reported by the backend
        reason: String,
    },

    /// A shader stage failed to compile
    ShaderCompile {
        /// Shader program name
        shader: String,
        /// Failing stage (vertex, geometry, fragment)
        stage: String,
        /// Compiler diagnostic text
        log: String,
    },

    /// A shader program failed to link
    ShaderLink {
        /// Shader program name
        shader: String,
        /// Linker diagnostic text
        log: String,
    },

    /// Interactive or static configuration out of range
    InvalidConfig(String),

    /// A pass reads a buffer before it was produced, or two passes write it
    PassOrder(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::TargetCreation { target, reason } => {
                write!(f, "Render target '{}' is incomplete: {}", target, reason)
            }
            Error::ShaderCompile { shader, stage, log } => {
                write!(f, "Shader '{}' failed to compile ({} stage): {}", shader, stage, log)
            }
            Error::ShaderLink { shader, log } => {
                write!(f, "Shader '{}' failed to link: {}", shader, log)
            }
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::PassOrder(msg) => write!(f, "Pass ordering violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
