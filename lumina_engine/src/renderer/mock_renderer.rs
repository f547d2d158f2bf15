/// Mock Renderer for unit tests (no GPU required)
///
/// Every command issued on the mock command list is recorded as a string so
/// tests can assert pass ordering and state changes. Created shaders,
/// buffers and framebuffers stay reachable through typed handles for
/// inspecting uniform values, buffer contents and attachments.

use std::sync::{Arc, Mutex};
use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::engine_bail;
use crate::renderer::{
    Attachment, BlendMode, Buffer, BufferDesc, ClearFlags, ClearValue, CommandList,
    Framebuffer, FramebufferStatus, Renderer, RendererStats, Shader, ShaderDesc,
    ShaderStage, Texture, TextureDesc, TextureInfo, TextureKind, UniformValue, Viewport,
};
use crate::scene::Drawable;

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub data_len: usize,
}

impl MockTexture {
    pub fn from_desc(desc: &TextureDesc) -> Self {
        Self {
            info: TextureInfo {
                name: desc.name.clone(),
                width: desc.width,
                height: desc.height,
                format: desc.format,
                kind: desc.kind,
                sampler: desc.sampler,
            },
            data_len: desc.data.as_ref().map(|d| d.len()).unwrap_or(0),
        }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub name: String,
    pub size: u64,
    contents: Mutex<Vec<u8>>,
    writes: Mutex<u32>,
}

impl MockBuffer {
    pub fn new(name: String, size: u64) -> Self {
        Self {
            name,
            size,
            contents: Mutex::new(vec![0; size as usize]),
            writes: Mutex::new(0),
        }
    }

    /// Snapshot of the buffer bytes
    pub fn contents(&self) -> Vec<u8> {
        self.contents.lock().unwrap().clone()
    }

    /// Number of successful `update` calls
    pub fn write_count(&self) -> u32 {
        *self.writes.lock().unwrap()
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let end = offset + data.len() as u64;
        if end > self.size {
            engine_bail!("lumina::mock",
                "Buffer '{}' write of {} bytes at {} exceeds size {}",
                self.name, data.len(), offset, self.size);
        }
        let mut contents = self.contents.lock().unwrap();
        contents[offset as usize..end as usize].copy_from_slice(data);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Shader
// ============================================================================

#[derive(Debug)]
pub struct MockShader {
    pub name: String,
    pub stages: Vec<ShaderStage>,
    uniforms: Mutex<FxHashMap<String, UniformValue>>,
    block_bindings: Mutex<FxHashMap<String, u32>>,
}

impl MockShader {
    pub fn new(name: String, stages: Vec<ShaderStage>) -> Self {
        Self {
            name,
            stages,
            uniforms: Mutex::new(FxHashMap::default()),
            block_bindings: Mutex::new(FxHashMap::default()),
        }
    }

    /// Last value written to a uniform
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.lock().unwrap().get(name).copied()
    }

    pub fn uniform_bool(&self, name: &str) -> Option<bool> {
        match self.uniform(name) {
            Some(UniformValue::Bool(v)) => Some(v),
            _ => None,
        }
    }

    pub fn uniform_int(&self, name: &str) -> Option<i32> {
        match self.uniform(name) {
            Some(UniformValue::Int(v)) => Some(v),
            _ => None,
        }
    }

    pub fn uniform_float(&self, name: &str) -> Option<f32> {
        match self.uniform(name) {
            Some(UniformValue::Float(v)) => Some(v),
            _ => None,
        }
    }

    pub fn uniform_mat4(&self, name: &str) -> Option<Mat4> {
        match self.uniform(name) {
            Some(UniformValue::Mat4(v)) => Some(v),
            _ => None,
        }
    }

    /// Slot assigned to a uniform block
    pub fn block_binding(&self, block: &str) -> Option<u32> {
        self.block_bindings.lock().unwrap().get(block).copied()
    }
}

impl Shader for MockShader {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_uniform(&self, name: &str, value: UniformValue) -> Result<()> {
        self.uniforms.lock().unwrap().insert(name.to_string(), value);
        Ok(())
    }

    fn set_uniform_block_binding(&self, block: &str, slot: u32) -> Result<()> {
        self.block_bindings.lock().unwrap().insert(block.to_string(), slot);
        Ok(())
    }
}

// ============================================================================
// Mock Framebuffer
// ============================================================================

#[derive(Debug)]
pub struct MockFramebuffer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    force_incomplete: bool,
    attachments: Mutex<Vec<(Attachment, TextureInfo)>>,
}

impl MockFramebuffer {
    pub fn new(name: String, width: u32, height: u32, force_incomplete: bool) -> Self {
        Self {
            name,
            width,
            height,
            force_incomplete,
            attachments: Mutex::new(Vec::new()),
        }
    }

    /// Attachment points in attach order
    pub fn attachments(&self) -> Vec<Attachment> {
        self.attachments.lock().unwrap().iter().map(|(a, _)| *a).collect()
    }
}

impl Framebuffer for MockFramebuffer {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn attach(&self, attachment: Attachment, texture: &Arc<dyn Texture>) -> Result<()> {
        let mut attachments = self.attachments.lock().unwrap();
        attachments.retain(|(a, _)| *a != attachment);
        attachments.push((attachment, texture.info().clone()));
        Ok(())
    }

    fn status(&self) -> FramebufferStatus {
        if self.force_incomplete {
            return FramebufferStatus::Unsupported;
        }
        let attachments = self.attachments.lock().unwrap();
        if attachments.is_empty() {
            return FramebufferStatus::IncompleteMissingAttachment;
        }
        for (attachment, info) in attachments.iter() {
            let format_ok = match attachment {
                Attachment::Color(_) => !info.format.is_depth(),
                Attachment::Depth => info.format.is_depth(),
            };
            if !format_ok {
                return FramebufferStatus::IncompleteAttachment;
            }
            if info.width != self.width || info.height != self.height {
                return FramebufferStatus::IncompleteDimensions;
            }
        }
        FramebufferStatus::Complete
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

#[derive(Debug, Default)]
pub struct MockCommandList {
    pub commands: Vec<String>,
    pub draw_calls: u32,
    pub fullscreen_draws: u32,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self::default()
    }
}

fn clear_flags_label(flags: ClearFlags) -> String {
    let mut parts = Vec::new();
    if flags.contains(ClearFlags::COLOR) {
        parts.push("COLOR");
    }
    if flags.contains(ClearFlags::DEPTH) {
        parts.push("DEPTH");
    }
    parts.join("|")
}

impl CommandList for MockCommandList {
    fn bind_framebuffer(&mut self, framebuffer: Option<&Arc<dyn Framebuffer>>) -> Result<()> {
        let name = framebuffer.map(|fb| fb.name().to_string()).unwrap_or_else(|| "screen".to_string());
        self.commands.push(format!("bind_framebuffer({})", name));
        Ok(())
    }

    fn set_draw_buffers(&mut self, attachments: &[u32]) -> Result<()> {
        self.commands.push(format!("set_draw_buffers({:?})", attachments));
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.commands.push(format!("set_viewport({}x{})", viewport.width, viewport.height));
        Ok(())
    }

    fn clear(&mut self, flags: ClearFlags, _value: ClearValue) -> Result<()> {
        self.commands.push(format!("clear({})", clear_flags_label(flags)));
        Ok(())
    }

    fn set_depth_test(&mut self, enabled: bool) -> Result<()> {
        self.commands.push(format!("set_depth_test({})", enabled));
        Ok(())
    }

    fn set_blend_mode(&mut self, mode: BlendMode) -> Result<()> {
        self.commands.push(format!("set_blend_mode({:?})", mode));
        Ok(())
    }

    fn use_shader(&mut self, shader: &Arc<dyn Shader>) -> Result<()> {
        self.commands.push(format!("use_shader({})", shader.name()));
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, texture: &Arc<dyn Texture>) -> Result<()> {
        self.commands.push(format!("bind_texture({}, {})", unit, texture.info().name));
        Ok(())
    }

    fn bind_uniform_buffer(&mut self, slot: u32, _buffer: &Arc<dyn Buffer>) -> Result<()> {
        self.commands.push(format!("bind_uniform_buffer({})", slot));
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, _first_vertex: u32) -> Result<()> {
        self.draw_calls += 1;
        self.commands.push(format!("draw({})", vertex_count));
        Ok(())
    }

    fn draw_fullscreen(&mut self) -> Result<()> {
        self.fullscreen_draws += 1;
        self.commands.push("draw_fullscreen".to_string());
        Ok(())
    }

    fn blit_depth(
        &mut self,
        source: &Arc<dyn Framebuffer>,
        destination: &Arc<dyn Framebuffer>,
    ) -> Result<()> {
        self.commands.push(format!("blit_depth({} -> {})", source.name(), destination.name()));
        Ok(())
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

/// Mock Renderer that tracks created resources without GPU
pub struct MockRenderer {
    /// Track created textures (names, creation order)
    pub created_textures: Vec<String>,
    /// Created buffers
    pub buffers: Vec<Arc<MockBuffer>>,
    /// Created shaders
    pub shaders: Vec<Arc<MockShader>>,
    /// Created framebuffers
    pub framebuffers: Vec<Arc<MockFramebuffer>>,
    command_list: MockCommandList,
    incomplete_framebuffers: bool,
    incomplete_framebuffer_name: Option<String>,
    failing_shader: Option<String>,
    live_textures: Vec<std::sync::Weak<MockTexture>>,
}

impl MockRenderer {
    /// Create a new mock renderer
    pub fn new() -> Self {
        Self {
            created_textures: Vec::new(),
            buffers: Vec::new(),
            shaders: Vec::new(),
            framebuffers: Vec::new(),
            command_list: MockCommandList::new(),
            incomplete_framebuffers: false,
            incomplete_framebuffer_name: None,
            failing_shader: None,
            live_textures: Vec::new(),
        }
    }

    /// Every framebuffer created from now on reports `Unsupported`
    pub fn with_incomplete_framebuffers(mut self) -> Self {
        self.incomplete_framebuffers = true;
        self
    }

    /// Framebuffers named `name` created from now on report `Unsupported`
    pub fn fail_framebuffers_named(&mut self, name: &str) {
        self.incomplete_framebuffer_name = Some(name.to_string());
    }

    /// The named program fails to compile its fragment stage
    pub fn with_failing_shader(mut self, name: &str) -> Self {
        self.failing_shader = Some(name.to_string());
        self
    }

    /// Recorded commands so far
    pub fn commands(&self) -> Vec<String> {
        self.command_list.commands.clone()
    }

    /// Forget recorded commands
    pub fn clear_commands(&mut self) {
        self.command_list.commands.clear();
    }

    /// Typed handle of a created shader
    pub fn shader(&self, name: &str) -> Arc<MockShader> {
        self.shaders.iter().find(|s| s.name == name).cloned()
            .unwrap_or_else(|| panic!("shader '{}' was not created", name))
    }

    /// Most recently created framebuffer with this name
    pub fn framebuffer(&self, name: &str) -> Arc<MockFramebuffer> {
        self.framebuffers.iter().rev().find(|f| f.name == name).cloned()
            .unwrap_or_else(|| panic!("framebuffer '{}' was not created", name))
    }

    /// Typed handle of a created buffer
    pub fn buffer(&self, name: &str) -> Arc<MockBuffer> {
        self.buffers.iter().find(|b| b.name == name).cloned()
            .unwrap_or_else(|| panic!("buffer '{}' was not created", name))
    }
}

impl Renderer for MockRenderer {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!("lumina::mock", "Texture '{}' has zero size", desc.name);
        }
        if desc.kind == TextureKind::CubeMap && desc.width != desc.height {
            engine_bail!("lumina::mock", "Cube map '{}' faces must be square", desc.name);
        }
        self.created_textures.push(desc.name.clone());
        let texture = Arc::new(MockTexture::from_desc(&desc));
        self.live_textures.push(Arc::downgrade(&texture));
        Ok(texture)
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        let buffer = Arc::new(MockBuffer::new(desc.name, desc.size));
        self.buffers.push(buffer.clone());
        Ok(buffer)
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>> {
        if self.failing_shader.as_deref() == Some(desc.name.as_str()) {
            return Err(Error::ShaderCompile {
                shader: desc.name,
                stage: format!("{:?}", ShaderStage::Fragment),
                log: "0:1: mock compile failure".to_string(),
            });
        }
        if desc.source(ShaderStage::Vertex).is_none() || desc.source(ShaderStage::Fragment).is_none() {
            return Err(Error::ShaderLink {
                shader: desc.name,
                log: "program needs a vertex and a fragment stage".to_string(),
            });
        }
        let stages = desc.sources.iter().map(|s| s.stage).collect();
        let shader = Arc::new(MockShader::new(desc.name, stages));
        self.shaders.push(shader.clone());
        Ok(shader)
    }

    fn create_framebuffer(&mut self, name: &str, width: u32, height: u32) -> Result<Arc<dyn Framebuffer>> {
        let framebuffer = Arc::new(MockFramebuffer::new(
            name.to_string(),
            width,
            height,
            self.incomplete_framebuffers || self.incomplete_framebuffer_name.as_deref() == Some(name),
        ));
        self.framebuffers.push(framebuffer.clone());
        Ok(framebuffer)
    }

    fn command_list(&mut self) -> &mut dyn CommandList {
        &mut self.command_list
    }

    fn stats(&self) -> RendererStats {
        RendererStats {
            draw_calls: self.command_list.draw_calls,
            fullscreen_draws: self.command_list.fullscreen_draws,
            textures: self.live_textures.iter().filter(|t| t.strong_count() > 0).count() as u32,
        }
    }
}

// ============================================================================
// Mock Drawable
// ============================================================================

/// Drawable issuing a single non-indexed draw
pub struct MockDrawable {
    pub name: String,
    pub vertex_count: u32,
    pub model: Mat4,
}

impl MockDrawable {
    pub fn new(name: &str, vertex_count: u32) -> Self {
        Self { name: name.to_string(), vertex_count, model: Mat4::IDENTITY }
    }
}

impl Drawable for MockDrawable {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_matrix(&self) -> Mat4 {
        self.model
    }

    fn draw(&self, cmd: &mut dyn CommandList, _shader: &Arc<dyn Shader>) -> Result<()> {
        cmd.draw(self.vertex_count, 0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;
