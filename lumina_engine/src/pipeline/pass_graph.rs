/// Pass graph - the frame's passes as a DAG of named buffer dependencies.
///
/// Each pass declares the buffers it reads (inputs) and writes (outputs).
/// Construction checks that every input has a producer earlier in the
/// order, so a pass never samples a buffer before it was written in the
/// same frame.

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, SlotMap};

use crate::error::{Error, Result};
use crate::engine_report;
use super::render_config::RenderConfig;

new_key_type! {
    /// Stable handle of a pass inside its graph
    pub struct PassId;
}

/// Buffer names of the deferred graph
pub mod buffers {
    pub const FRAME_UNIFORMS: &str = "frame_uniforms";
    /// Persistent: kept from an earlier frame when shadows are not re-rendered
    pub const SHADOW_MAPS: &str = "shadow_maps";
    pub const GBUFFER: &str = "gbuffer";
    pub const SSAO: &str = "ssao";
    pub const SSAO_BLUR: &str = "ssao_blur";
    /// Persistent: constant white occlusion used while SSAO is off
    pub const NEUTRAL_OCCLUSION: &str = "neutral_occlusion";
    pub const LIGHTING_COLOR: &str = "lighting_color";
    pub const LIGHTING_BRIGHT: &str = "lighting_bright";
    pub const BLOOM: &str = "bloom";
    pub const SCREEN: &str = "screen";
}

/// What a pass records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    Uniforms,
    Shadows,
    Geometry,
    Ssao,
    SsaoBlur,
    Lighting,
    Forward,
    Bloom,
    PostProcess,
}

impl PassKind {
    pub fn name(self) -> &'static str {
        match self {
            PassKind::Uniforms => "uniforms",
            PassKind::Shadows => "shadows",
            PassKind::Geometry => "geometry",
            PassKind::Ssao => "ssao",
            PassKind::SsaoBlur => "ssao_blur",
            PassKind::Lighting => "lighting",
            PassKind::Forward => "forward",
            PassKind::Bloom => "bloom",
            PassKind::PostProcess => "post_process",
        }
    }
}

/// Pass node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass {
    kind: PassKind,
    inputs: Vec<&'static str>,
    outputs: Vec<&'static str>,
}

impl Pass {
    pub fn new(kind: PassKind) -> Self {
        Self { kind, inputs: Vec::new(), outputs: Vec::new() }
    }

    pub fn reads(mut self, buffers: &[&'static str]) -> Self {
        self.inputs.extend_from_slice(buffers);
        self
    }

    pub fn writes(mut self, buffers: &[&'static str]) -> Self {
        self.outputs.extend_from_slice(buffers);
        self
    }

    pub fn kind(&self) -> PassKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn inputs(&self) -> &[&'static str] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[&'static str] {
        &self.outputs
    }

    /// Reads and writes the same buffer (depth-tested forward drawing)
    pub fn is_read_modify_write(&self, buffer: &str) -> bool {
        self.inputs.iter().any(|b| *b == buffer) && self.outputs.iter().any(|b| *b == buffer)
    }
}

/// Validated pass order
pub struct PassGraph {
    passes: SlotMap<PassId, Pass>,
    order: Vec<PassId>,
    producers: FxHashMap<&'static str, PassId>,
}

fn order_error(message: String) -> Error {
    engine_report!("lumina::PassGraph", Error::PassOrder(message))
}

impl PassGraph {
    /// Validate `passes` in the given order.
    ///
    /// `persistent` names buffers that outlive a frame and need no producer
    /// in this one.
    ///
    /// # Errors
    ///
    /// `PassOrder` on a duplicate pass, a read before any write, or a
    /// second writer of a buffer that is not a read-modify-write.
    pub fn build(passes: Vec<Pass>, persistent: &[&'static str]) -> Result<Self> {
        let persistent: FxHashSet<&str> = persistent.iter().copied().collect();
        let mut kinds = FxHashSet::default();
        let mut slots = SlotMap::with_key();
        let mut order = Vec::with_capacity(passes.len());
        let mut producers: FxHashMap<&'static str, PassId> = FxHashMap::default();

        for pass in passes {
            if !kinds.insert(pass.kind) {
                return Err(order_error(format!("pass '{}' appears twice", pass.name())));
            }
            for input in pass.inputs() {
                if !producers.contains_key(input) && !persistent.contains(input) {
                    return Err(order_error(format!(
                        "pass '{}' reads '{}' before any pass wrote it", pass.name(), input
                    )));
                }
            }
            let outputs = pass.outputs().to_vec();
            let rmw: Vec<bool> = outputs.iter().map(|o| pass.is_read_modify_write(o)).collect();
            let name = pass.name();
            let id = slots.insert(pass);
            for (output, rmw) in outputs.into_iter().zip(rmw) {
                if let Some(previous) = producers.get(output) {
                    if !rmw {
                        let previous: &Pass = &slots[*previous];
                        return Err(order_error(format!(
                            "'{}' is written by both '{}' and '{}'", output, previous.name(), name
                        )));
                    }
                }
                producers.insert(output, id);
            }
            order.push(id);
        }

        Ok(Self { passes: slots, order, producers })
    }

    /// The standard deferred frame for `config`.
    ///
    /// Disabled stages are left out; their consumers read the bypass
    /// source instead (neutral occlusion, the unbloomed lighting buffer).
    pub fn deferred(config: &RenderConfig, render_shadows: bool) -> Result<Self> {
        use buffers::*;

        let mut passes = vec![Pass::new(PassKind::Uniforms).writes(&[FRAME_UNIFORMS])];
        if render_shadows {
            passes.push(Pass::new(PassKind::Shadows).writes(&[SHADOW_MAPS]));
        }
        passes.push(Pass::new(PassKind::Geometry).reads(&[FRAME_UNIFORMS]).writes(&[GBUFFER]));

        let occlusion = if config.ssao_enabled {
            passes.push(Pass::new(PassKind::Ssao).reads(&[FRAME_UNIFORMS, GBUFFER]).writes(&[SSAO]));
            if config.ssao_blur_enabled {
                passes.push(Pass::new(PassKind::SsaoBlur).reads(&[SSAO]).writes(&[SSAO_BLUR]));
                SSAO_BLUR
            } else {
                SSAO
            }
        } else {
            NEUTRAL_OCCLUSION
        };

        passes.push(Pass::new(PassKind::Lighting)
            .reads(&[FRAME_UNIFORMS, GBUFFER, SHADOW_MAPS, occlusion])
            .writes(&[LIGHTING_COLOR, LIGHTING_BRIGHT]));
        passes.push(Pass::new(PassKind::Forward)
            .reads(&[FRAME_UNIFORMS, GBUFFER, LIGHTING_COLOR, LIGHTING_BRIGHT])
            .writes(&[LIGHTING_COLOR, LIGHTING_BRIGHT]));

        let post_source = if config.bloom_enabled {
            passes.push(Pass::new(PassKind::Bloom).reads(&[LIGHTING_COLOR, LIGHTING_BRIGHT]).writes(&[BLOOM]));
            BLOOM
        } else {
            LIGHTING_COLOR
        };
        passes.push(Pass::new(PassKind::PostProcess).reads(&[post_source]).writes(&[SCREEN]));

        Self::build(passes, &[SHADOW_MAPS, NEUTRAL_OCCLUSION])
    }

    /// Pass kinds in execution order
    pub fn execution_order(&self) -> Vec<PassKind> {
        self.order.iter().map(|id| self.passes[*id].kind()).collect()
    }

    pub fn pass(&self, id: PassId) -> Option<&Pass> {
        self.passes.get(id)
    }

    pub fn ids(&self) -> &[PassId] {
        &self.order
    }

    pub fn contains(&self, kind: PassKind) -> bool {
        self.passes.values().any(|pass| pass.kind() == kind)
    }

    /// Last pass writing `buffer`
    pub fn producer(&self, buffer: &str) -> Option<&Pass> {
        self.producers.get(buffer).and_then(|id| self.passes.get(*id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
#[path = "pass_graph_tests.rs"]
mod tests;
