//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("context lost".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("context lost"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_target_creation_display() {
    let err = Error::TargetCreation {
        target: "gbuffer".to_string(),
        reason: "IncompleteDimensions".to_string(),
    };
    let display = format!("{}", err);
    assert!(display.contains("gbuffer"));
    assert!(display.contains("IncompleteDimensions"));
}

#[test]
fn test_shader_compile_display() {
    let err = Error::ShaderCompile {
        shader: "lighting".to_string(),
        stage: "Fragment".to_string(),
        log: "0:12: syntax error".to_string(),
    };
    let display = format!("{}", err);
    assert!(display.contains("lighting"));
    assert!(display.contains("Fragment"));
    assert!(display.contains("syntax error"));
}

#[test]
fn test_shader_link_display() {
    let err = Error::ShaderLink {
        shader: "post_effects".to_string(),
        log: "varying mismatch".to_string(),
    };
    let display = format!("{}", err);
    assert!(display.contains("failed to link"));
    assert!(display.contains("varying mismatch"));
}

#[test]
fn test_invalid_config_display() {
    let err = Error::InvalidConfig("kernel_index 7".to_string());
    assert!(format!("{}", err).contains("kernel_index 7"));
}

#[test]
fn test_pass_order_display() {
    let err = Error::PassOrder("lighting reads ssao.raw".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Pass ordering violation"));
    assert!(display.contains("ssao.raw"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::InvalidResource("texture".to_string()));
    assert!(debug.contains("InvalidResource"));

    let debug = format!("{:?}", Error::InitializationFailed("init".to_string()));
    assert!(debug.contains("InitializationFailed"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::TargetCreation {
        target: "shadow".to_string(),
        reason: "MissingAttachment".to_string(),
    };
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// RESULT ALIAS
// ============================================================================

fn fails() -> Result<u32> {
    Err(Error::PassOrder("bloom before lighting".to_string()))
}

fn propagates() -> Result<u32> {
    let value = fails()?;
    Ok(value + 1)
}

#[test]
fn test_result_propagation() {
    let result = propagates();
    assert!(matches!(result, Err(Error::PassOrder(_))));
}
