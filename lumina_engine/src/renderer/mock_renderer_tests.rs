/// Unit tests for MockRenderer and associated mock types.

use crate::renderer::mock_renderer::*;
use crate::renderer::{
    Attachment, BlendMode, Buffer, BufferDesc, BufferUsage, ClearFlags, ClearValue,
    CommandList, Framebuffer, FramebufferStatus, Renderer, SamplerDesc, Shader, ShaderDesc,
    ShaderSource, ShaderStage, Texture, TextureDesc, TextureFormat, TextureKind,
    UniformValue, Viewport,
};
use crate::error::Error;
use std::sync::Arc;

fn texture_desc(name: &str, width: u32, height: u32, format: TextureFormat) -> TextureDesc {
    TextureDesc {
        name: name.to_string(),
        width,
        height,
        format,
        kind: TextureKind::Texture2D,
        sampler: SamplerDesc::default(),
        data: None,
    }
}

fn program(name: &str) -> ShaderDesc {
    ShaderDesc {
        name: name.to_string(),
        sources: vec![
            ShaderSource { stage: ShaderStage::Vertex, code: "void main() {}" },
            ShaderSource { stage: ShaderStage::Fragment, code: "void main() {}" },
        ],
    }
}

// ============================================================================
// MockBuffer Tests
// ============================================================================

#[test]
fn test_mock_buffer_update_writes_bytes() {
    let buffer = MockBuffer::new("ubo".to_string(), 8);
    buffer.update(4, &[1, 2, 3, 4]).unwrap();

    assert_eq!(buffer.contents(), vec![0, 0, 0, 0, 1, 2, 3, 4]);
    assert_eq!(buffer.write_count(), 1);
}

#[test]
fn test_mock_buffer_update_out_of_bounds() {
    let buffer = MockBuffer::new("ubo".to_string(), 8);
    let result = buffer.update(6, &[1, 2, 3, 4]);

    assert!(result.is_err());
    assert_eq!(buffer.write_count(), 0);
}

// ============================================================================
// MockShader Tests
// ============================================================================

#[test]
fn test_mock_shader_records_uniforms() {
    let shader = MockShader::new("lighting".to_string(), vec![ShaderStage::Fragment]);
    shader.set_uniform("ssao.apply_ssao", UniformValue::Bool(true)).unwrap();
    shader.set_uniform("dir_light_count", UniformValue::Int(2)).unwrap();
    shader.set_uniform("dir_light_count", UniformValue::Int(3)).unwrap();

    assert_eq!(shader.uniform_bool("ssao.apply_ssao"), Some(true));
    assert_eq!(shader.uniform_int("dir_light_count"), Some(3));
    assert_eq!(shader.uniform_float("dir_light_count"), None);
    assert_eq!(shader.uniform("missing"), None);
}

#[test]
fn test_mock_shader_block_binding() {
    let shader = MockShader::new("geometry".to_string(), vec![]);
    shader.set_uniform_block_binding("Matrices", 0).unwrap();

    assert_eq!(shader.block_binding("Matrices"), Some(0));
    assert_eq!(shader.block_binding("Other"), None);
}

// ============================================================================
// MockFramebuffer Tests
// ============================================================================

#[test]
fn test_mock_framebuffer_without_attachments_is_incomplete() {
    let fb = MockFramebuffer::new("empty".to_string(), 4, 4, false);
    assert_eq!(fb.status(), FramebufferStatus::IncompleteMissingAttachment);
}

#[test]
fn test_mock_framebuffer_completeness_rules() {
    let color: Arc<dyn Texture> = Arc::new(MockTexture::from_desc(
        &texture_desc("c", 4, 4, TextureFormat::R16G16B16A16_SFLOAT)));
    let depth: Arc<dyn Texture> = Arc::new(MockTexture::from_desc(
        &texture_desc("d", 4, 4, TextureFormat::D24_UNORM_S8_UINT)));
    let small: Arc<dyn Texture> = Arc::new(MockTexture::from_desc(
        &texture_desc("s", 2, 2, TextureFormat::R16G16B16A16_SFLOAT)));

    let fb = MockFramebuffer::new("fb".to_string(), 4, 4, false);
    fb.attach(Attachment::Color(0), &color).unwrap();
    fb.attach(Attachment::Depth, &depth).unwrap();
    assert!(fb.status().is_complete());
    assert_eq!(fb.attachments(), vec![Attachment::Color(0), Attachment::Depth]);

    let wrong_format = MockFramebuffer::new("fb".to_string(), 4, 4, false);
    wrong_format.attach(Attachment::Color(0), &depth).unwrap();
    assert_eq!(wrong_format.status(), FramebufferStatus::IncompleteAttachment);

    let wrong_size = MockFramebuffer::new("fb".to_string(), 4, 4, false);
    wrong_size.attach(Attachment::Color(0), &small).unwrap();
    assert_eq!(wrong_size.status(), FramebufferStatus::IncompleteDimensions);
}

#[test]
fn test_mock_framebuffer_forced_failure() {
    let color: Arc<dyn Texture> = Arc::new(MockTexture::from_desc(
        &texture_desc("c", 4, 4, TextureFormat::R8G8B8A8_UNORM)));
    let fb = MockFramebuffer::new("fb".to_string(), 4, 4, true);
    fb.attach(Attachment::Color(0), &color).unwrap();

    assert_eq!(fb.status(), FramebufferStatus::Unsupported);
}

// ============================================================================
// MockCommandList Tests
// ============================================================================

#[test]
fn test_mock_command_list_records_in_order() {
    let mut renderer = MockRenderer::new();
    let fb = renderer.create_framebuffer("gbuffer", 8, 8).unwrap();
    let shader = renderer.create_shader(program("geometry")).unwrap();

    let cmd = renderer.command_list();
    cmd.bind_framebuffer(Some(&fb)).unwrap();
    cmd.set_draw_buffers(&[0, 1, 2]).unwrap();
    cmd.set_viewport(Viewport::full(8, 8)).unwrap();
    cmd.clear(ClearFlags::COLOR | ClearFlags::DEPTH, ClearValue::black()).unwrap();
    cmd.set_blend_mode(BlendMode::Disabled).unwrap();
    cmd.use_shader(&shader).unwrap();
    cmd.draw(36, 0).unwrap();
    cmd.bind_framebuffer(None).unwrap();
    cmd.draw_fullscreen().unwrap();

    assert_eq!(renderer.commands(), vec![
        "bind_framebuffer(gbuffer)",
        "set_draw_buffers([0, 1, 2])",
        "set_viewport(8x8)",
        "clear(COLOR|DEPTH)",
        "set_blend_mode(Disabled)",
        "use_shader(geometry)",
        "draw(36)",
        "bind_framebuffer(screen)",
        "draw_fullscreen",
    ]);

    let stats = renderer.stats();
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.fullscreen_draws, 1);

    renderer.clear_commands();
    assert!(renderer.commands().is_empty());
}

#[test]
fn test_mock_command_list_blit_depth() {
    let mut renderer = MockRenderer::new();
    let src = renderer.create_framebuffer("gbuffer", 8, 8).unwrap();
    let dst = renderer.create_framebuffer("lighting", 8, 8).unwrap();

    renderer.command_list().blit_depth(&src, &dst).unwrap();
    assert_eq!(renderer.commands(), vec!["blit_depth(gbuffer -> lighting)"]);
}

// ============================================================================
// MockRenderer Tests
// ============================================================================

#[test]
fn test_mock_renderer_tracks_textures() {
    let mut renderer = MockRenderer::new();
    let a = renderer.create_texture(texture_desc("a", 4, 4, TextureFormat::R8G8B8A8_UNORM)).unwrap();
    let b = renderer.create_texture(texture_desc("b", 4, 4, TextureFormat::R8G8B8A8_UNORM)).unwrap();

    assert_eq!(renderer.created_textures, vec!["a", "b"]);
    assert_eq!(renderer.stats().textures, 2);

    drop(a);
    assert_eq!(renderer.stats().textures, 1);
    assert_eq!(b.info().name, "b");
}

#[test]
fn test_mock_renderer_rejects_zero_size_texture() {
    let mut renderer = MockRenderer::new();
    let result = renderer.create_texture(texture_desc("zero", 0, 4, TextureFormat::R8G8B8A8_UNORM));
    assert!(result.is_err());
}

#[test]
fn test_mock_renderer_rejects_non_square_cube() {
    let mut renderer = MockRenderer::new();
    let mut desc = texture_desc("cube", 8, 4, TextureFormat::D32_SFLOAT);
    desc.kind = TextureKind::CubeMap;
    assert!(renderer.create_texture(desc).is_err());
}

#[test]
fn test_mock_renderer_failing_shader() {
    let mut renderer = MockRenderer::new().with_failing_shader("ssao");

    match renderer.create_shader(program("ssao")) {
        Err(Error::ShaderCompile { shader, .. }) => assert_eq!(shader, "ssao"),
        other => panic!("expected compile error, got {:?}", other.map(|s| s.name().to_string())),
    }
    assert!(renderer.create_shader(program("bloom")).is_ok());
}

#[test]
fn test_mock_renderer_shader_needs_vertex_and_fragment() {
    let mut renderer = MockRenderer::new();
    let desc = ShaderDesc {
        name: "broken".to_string(),
        sources: vec![ShaderSource { stage: ShaderStage::Fragment, code: "" }],
    };

    assert!(matches!(renderer.create_shader(desc), Err(Error::ShaderLink { .. })));
}

#[test]
fn test_mock_renderer_typed_handles() {
    let mut renderer = MockRenderer::new();
    let buffer = renderer.create_buffer(BufferDesc {
        name: "Matrices".to_string(),
        size: 16,
        usage: BufferUsage::Uniform,
    }).unwrap();
    buffer.update(0, &[7; 16]).unwrap();
    renderer.create_framebuffer("post", 2, 2).unwrap();

    assert_eq!(renderer.buffer("Matrices").contents(), vec![7; 16]);
    assert_eq!(renderer.framebuffer("post").width, 2);
}

#[test]
fn test_mock_drawable_issues_one_draw() {
    use crate::scene::Drawable;

    let mut renderer = MockRenderer::new();
    let shader = renderer.create_shader(program("geometry")).unwrap();
    let drawable = MockDrawable::new("cube", 36);

    drawable.draw(renderer.command_list(), &shader).unwrap();
    assert_eq!(renderer.commands(), vec!["draw(36)"]);
    assert_eq!(drawable.name(), "cube");
}
