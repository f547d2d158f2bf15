/// Shadow stage - scene depth from each light's point of view.
///
/// Directional lights render into a 2D depth map through an orthographic
/// light-space transform. Point lights render into a depth cube map in a
/// single pass; the geometry shader expands every triangle to the six faces
/// and stores `distance / far`.

use std::sync::Arc;
use glam::{Mat4, Vec3};

use crate::error::{Error, Result};
use crate::lights::LightManager;
use crate::pipeline::{DirectionalShadowSettings, PipelineSettings, ShadowRefreshPolicy};
use crate::renderer::{
    ClearFlags, ClearValue, CommandList, Renderer, SamplerDesc, Shader, Texture, TextureFormat,
    UniformValue,
};
use crate::scene::{draw_with_model, Drawable};
use crate::target::{DepthAttachment, OffscreenTarget, TargetDesc};
use crate::{engine_debug, engine_info, engine_report, engine_trace};

/// Cube face (view direction, up) pairs in GL face order +X, -X, +Y, -Y, +Z, -Z
pub const CUBE_FACES: [(Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Y),
    (Vec3::NEG_X, Vec3::NEG_Y),
    (Vec3::Y, Vec3::Z),
    (Vec3::NEG_Y, Vec3::NEG_Z),
    (Vec3::Z, Vec3::NEG_Y),
    (Vec3::NEG_Z, Vec3::NEG_Y),
];

/// Eye of a directional light's shadow camera.
///
/// `direction` is not normalized: a longer vector pulls the eye further back.
pub fn directional_light_position(direction: Vec3, settings: &DirectionalShadowSettings) -> Vec3 {
    -settings.distance * direction + settings.lift * settings.world_up
}

/// `ortho(-B, B, -B, B, near, far) · lookAt(eye, eye + direction, up)`
pub fn directional_light_space_transform(direction: Vec3, settings: &DirectionalShadowSettings) -> Mat4 {
    let eye = directional_light_position(direction, settings);
    let direction = direction.normalize_or_zero();
    // lookAt degenerates when looking along the up vector
    let up = if direction.cross(settings.world_up).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        settings.world_up
    };
    let b = settings.half_extent;
    let projection = Mat4::orthographic_rh_gl(-b, b, -b, b, settings.near, settings.far);
    projection * Mat4::look_at_rh(eye, eye + direction, up)
}

/// Six 90° perspective transforms, one per cube face.
pub fn point_light_transforms(position: Vec3, near: f32, far: f32) -> [Mat4; 6] {
    let projection = Mat4::perspective_rh_gl(90f32.to_radians(), 1.0, near, far);
    CUBE_FACES.map(|(direction, up)| projection * Mat4::look_at_rh(position, position + direction, up))
}

/// Lifecycle of one light's shadow map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowCasterState {
    Uninitialized,
    DepthTargetAllocated,
    Rendered,
}

/// Shadow map flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowKind {
    /// 2D map, border-clamped to white
    Directional,
    /// Cube map, edge-clamped
    Point,
}

/// Depth target of one light, plus the transform(s) it was rendered with
pub struct ShadowCaster {
    kind: ShadowKind,
    state: ShadowCasterState,
    target: Option<OffscreenTarget>,
    transform: Option<Mat4>,
    cube_transforms: Option<[Mat4; 6]>,
}

impl ShadowCaster {
    pub fn new(kind: ShadowKind) -> Self {
        Self {
            kind,
            state: ShadowCasterState::Uninitialized,
            target: None,
            transform: None,
            cube_transforms: None,
        }
    }

    pub fn kind(&self) -> ShadowKind {
        self.kind
    }

    pub fn state(&self) -> ShadowCasterState {
        self.state
    }

    /// Allocate the depth-only target (2D or cube) at `resolution`².
    pub fn allocate_depth_target(&mut self, renderer: &mut dyn Renderer, name: &str, resolution: u32) -> Result<()> {
        let desc = TargetDesc::new(name, resolution, resolution);
        let desc = match self.kind {
            ShadowKind::Directional => desc.with_depth(DepthAttachment::Sampled {
                format: TextureFormat::D32_SFLOAT,
                sampler: SamplerDesc::shadow_border(),
            }),
            ShadowKind::Point => desc
                .with_depth(DepthAttachment::Sampled {
                    format: TextureFormat::D32_SFLOAT,
                    sampler: SamplerDesc::nearest_clamp(),
                })
                .cube(),
        };
        self.target = Some(OffscreenTarget::create(renderer, desc)?);
        self.state = ShadowCasterState::DepthTargetAllocated;
        self.transform = None;
        self.cube_transforms = None;
        Ok(())
    }

    fn target(&self) -> Result<&OffscreenTarget> {
        self.target.as_ref().ok_or_else(|| {
            engine_report!("lumina::ShadowStage", Error::InvalidResource(
                format!("{:?} shadow caster has no depth target yet", self.kind)
            ))
        })
    }

    /// Bind the depth target with color output disabled and clear depth only.
    pub fn begin(&self, cmd: &mut dyn CommandList) -> Result<()> {
        let target = self.target()?;
        target.activate(cmd, &[])?;
        cmd.clear(ClearFlags::DEPTH, ClearValue::black())
    }

    fn finish_directional(&mut self, transform: Mat4) -> Result<()> {
        if self.kind != ShadowKind::Directional {
            return Err(engine_report!("lumina::ShadowStage", Error::InvalidResource(
                "a cube shadow map has no single light-space transform".to_string()
            )));
        }
        self.target()?;
        self.transform = Some(transform);
        self.state = ShadowCasterState::Rendered;
        Ok(())
    }

    fn finish_point(&mut self, transforms: [Mat4; 6]) -> Result<()> {
        if self.kind != ShadowKind::Point {
            return Err(engine_report!("lumina::ShadowStage", Error::InvalidResource(
                "a 2D shadow map has no cube transforms".to_string()
            )));
        }
        self.target()?;
        self.cube_transforms = Some(transforms);
        self.state = ShadowCasterState::Rendered;
        Ok(())
    }

    /// Sampleable depth texture.
    pub fn shadow_map(&self) -> Result<Arc<dyn Texture>> {
        self.target()?.depth_texture()
    }

    /// Transform of a rendered directional map.
    pub fn light_space_transform(&self) -> Result<Mat4> {
        match (self.kind, self.transform) {
            (ShadowKind::Directional, Some(transform)) => Ok(transform),
            (ShadowKind::Point, _) => Err(engine_report!("lumina::ShadowStage", Error::InvalidResource(
                "a cube shadow map has no single light-space transform".to_string()
            ))),
            (ShadowKind::Directional, None) => Err(engine_report!("lumina::ShadowStage", Error::InvalidResource(
                "directional shadow map has not been rendered".to_string()
            ))),
        }
    }

    /// Per-face transforms of a rendered cube map.
    pub fn cube_transforms(&self) -> Result<[Mat4; 6]> {
        match (self.kind, self.cube_transforms) {
            (ShadowKind::Point, Some(transforms)) => Ok(transforms),
            (ShadowKind::Directional, _) => Err(engine_report!("lumina::ShadowStage", Error::InvalidResource(
                "a 2D shadow map has no cube transforms".to_string()
            ))),
            (ShadowKind::Point, None) => Err(engine_report!("lumina::ShadowStage", Error::InvalidResource(
                "point shadow map has not been rendered".to_string()
            ))),
        }
    }
}

/// Shadow maps for every light of the scene
pub struct ShadowStage {
    settings: PipelineSettings,
    directional_shader: Arc<dyn Shader>,
    point_shader: Arc<dyn Shader>,
    directional: Vec<ShadowCaster>,
    point: Vec<ShadowCaster>,
    dirty: bool,
}

impl ShadowStage {
    pub fn new(settings: PipelineSettings, directional_shader: Arc<dyn Shader>, point_shader: Arc<dyn Shader>) -> Self {
        Self {
            settings,
            directional_shader,
            point_shader,
            directional: Vec::new(),
            point: Vec::new(),
            dirty: true,
        }
    }

    /// Allocate depth targets for lights added since the last call.
    pub fn sync_lights(&mut self, renderer: &mut dyn Renderer, lights: &LightManager) -> Result<()> {
        let resolution = self.settings.shadow_resolution;

        while self.directional.len() < lights.directional().len() {
            let mut caster = ShadowCaster::new(ShadowKind::Directional);
            caster.allocate_depth_target(renderer, &format!("shadow.directional{}", self.directional.len()), resolution)?;
            self.directional.push(caster);
            self.dirty = true;
        }
        while self.point.len() < lights.point().len() {
            let mut caster = ShadowCaster::new(ShadowKind::Point);
            caster.allocate_depth_target(renderer, &format!("shadow.point{}", self.point.len()), resolution)?;
            self.point.push(caster);
            self.dirty = true;
        }
        Ok(())
    }

    /// Whether this frame must re-render the shadow maps
    pub fn is_due(&self, policy: ShadowRefreshPolicy) -> bool {
        match policy {
            ShadowRefreshPolicy::PerFrame => true,
            ShadowRefreshPolicy::Static => self.dirty,
        }
    }

    /// Force a re-render on the next frame (static scenes that moved).
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Render every light's depth map and attach it to the light.
    ///
    /// # Errors
    ///
    /// `InvalidResource` when a light has no allocated target (call
    /// `sync_lights` first), `InvalidConfig` when a point light's far plane
    /// is not beyond the shadow near plane.
    pub fn render(
        &mut self,
        cmd: &mut dyn CommandList,
        lights: &mut LightManager,
        drawables: &[Arc<dyn Drawable>],
    ) -> Result<()> {
        if self.directional.len() < lights.directional().len() || self.point.len() < lights.point().len() {
            return Err(engine_report!("lumina::ShadowStage", Error::InvalidResource(
                "shadow render requested before depth targets were allocated".to_string()
            )));
        }

        for (index, light) in lights.directional_mut().iter_mut().enumerate() {
            let caster = &mut self.directional[index];
            let transform = directional_light_space_transform(light.direction, &self.settings.directional_shadow);

            caster.begin(cmd)?;
            cmd.use_shader(&self.directional_shader)?;
            self.directional_shader.set_uniform("LightSpaceTransform", UniformValue::Mat4(transform))?;
            for drawable in drawables {
                draw_with_model(drawable.as_ref(), cmd, &self.directional_shader)?;
            }
            caster.finish_directional(transform)?;
            light.attach_shadow(caster.shadow_map()?, transform);
            engine_trace!("lumina::ShadowStage", "Directional shadow {} rendered", index);
        }

        let near = self.settings.point_shadow_near;
        for (index, light) in lights.point_mut().iter_mut().enumerate() {
            if light.far_plane <= near {
                return Err(engine_report!("lumina::ShadowStage", Error::InvalidConfig(format!(
                    "point light {} far plane {} is not beyond the shadow near plane {}",
                    index, light.far_plane, near
                ))));
            }
            let caster = &mut self.point[index];
            let transforms = point_light_transforms(light.position, near, light.far_plane);

            caster.begin(cmd)?;
            cmd.use_shader(&self.point_shader)?;
            for (face, transform) in transforms.iter().enumerate() {
                self.point_shader.set_uniform(&format!("Shadow_Matrices[{}]", face), UniformValue::Mat4(*transform))?;
            }
            self.point_shader.set_uniform("LightPos", UniformValue::Vec3(light.position))?;
            self.point_shader.set_uniform("Far", UniformValue::Float(light.far_plane))?;
            for drawable in drawables {
                draw_with_model(drawable.as_ref(), cmd, &self.point_shader)?;
            }
            caster.finish_point(transforms)?;
            light.attach_shadow(caster.shadow_map()?, transforms);
            engine_trace!("lumina::ShadowStage", "Point shadow {} rendered", index);
        }

        if self.dirty {
            engine_info!("lumina::ShadowStage", "Rendered {} directional and {} point shadow maps",
                self.directional.len(), self.point.len());
        } else {
            engine_debug!("lumina::ShadowStage", "Refreshed shadow maps");
        }
        self.dirty = false;
        Ok(())
    }

    pub fn directional_casters(&self) -> &[ShadowCaster] {
        &self.directional
    }

    pub fn point_casters(&self) -> &[ShadowCaster] {
        &self.point
    }
}

#[cfg(test)]
#[path = "shadow_tests.rs"]
mod tests;
