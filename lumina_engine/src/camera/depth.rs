/// Depth-buffer linearization.
///
/// The geometry pass stores a linear depth in the alpha channel of both
/// position channels. The shader and this module use the same formulas so
/// tests can check the values the GPU writes.
///
/// Depth buffer values are in [0, 1] with GL conventions: NDC depth
/// `z = 2d - 1`.

use crate::error::{Error, Result};

/// Projection the depth buffer was produced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    Perspective,
    Orthographic,
}

/// Near/far clip range of a projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub kind: ProjectionKind,
    pub near: f32,
    pub far: f32,
}

impl DepthRange {
    pub fn new(kind: ProjectionKind, near: f32, far: f32) -> Self {
        Self { kind, near, far }
    }

    /// Rejects ranges that cannot be linearized.
    pub fn validate(&self) -> Result<()> {
        let valid = match self.kind {
            ProjectionKind::Perspective => self.near > 0.0 && self.near < self.far,
            ProjectionKind::Orthographic => self.near < self.far,
        };
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidConfig(format!(
                "depth range near {} / far {} is not usable for {:?} projection",
                self.near, self.far, self.kind
            )))
        }
    }

    /// Eye-space distance for a depth buffer value.
    pub fn view_distance(&self, depth: f32) -> f32 {
        let (n, f) = (self.near, self.far);
        match self.kind {
            ProjectionKind::Perspective => {
                let z_ndc = depth * 2.0 - 1.0;
                (2.0 * n * f) / (f + n - z_ndc * (f - n))
            }
            ProjectionKind::Orthographic => n + depth * (f - n),
        }
    }

    /// Linear depth in [0, 1]: 0 on the near plane, 1 on the far plane.
    pub fn linearize(&self, depth: f32) -> f32 {
        match self.kind {
            ProjectionKind::Perspective => {
                (self.view_distance(depth) - self.near) / (self.far - self.near)
            }
            ProjectionKind::Orthographic => depth,
        }
    }

    /// Depth buffer value for an eye-space distance.
    pub fn depth_for_distance(&self, distance: f32) -> f32 {
        let (n, f) = (self.near, self.far);
        match self.kind {
            ProjectionKind::Perspective => {
                let z_ndc = (f + n - (2.0 * n * f) / distance) / (f - n);
                (z_ndc + 1.0) * 0.5
            }
            ProjectionKind::Orthographic => (distance - n) / (f - n),
        }
    }

    /// Inverse of [`DepthRange::linearize`].
    pub fn delinearize(&self, linear: f32) -> f32 {
        match self.kind {
            ProjectionKind::Perspective => {
                self.depth_for_distance(self.near + linear * (self.far - self.near))
            }
            ProjectionKind::Orthographic => linear,
        }
    }
}

#[cfg(test)]
#[path = "depth_tests.rs"]
mod tests;
