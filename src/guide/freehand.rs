//! Freehand brush footprint: jittered lattice inside a disc or square.
use std::collections::HashSet;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::brush::selection::Slot;
use crate::guide::{plane_basis, rand01, Candidate, Frame, GuideSampling, SampleContext};

/// Maximum lattice half-size in cells; bounds the worst-case iteration
/// count of one pass, since there is no cancellation mechanism.
const MAX_LATTICE_HALF: i32 = 32;

/// Footprint shape of a freehand brush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FootprintShape {
    #[default]
    Circle,
    Square,
}

/// A free-form 2D brush footprint filled with a jittered square lattice.
///
/// The lattice pitch is the largest spacing across the brush, so mixed
/// brushes stay non-overlapping at full density. Cells outside the
/// footprint are discarded. With `density < 1` each cell first rolls
/// against the density, and cells adjacent to an already-claimed cell are
/// suppressed to avoid clustering; at full density with jitter disabled
/// the output is exactly the deterministic lattice-membership set.
#[derive(Clone, Debug)]
pub struct FreehandGuide {
    pub origin: Vec3,
    pub shape: FootprintShape,
    pub radius: f32,
    /// Fraction of lattice cells kept, clamped to `[0, 1]`.
    pub density: f32,
    /// Jitter amount in `[0, 1]`, where 0 is cell centers and 1 displaces
    /// up to half a cell.
    pub jitter: f32,
    pub normal: Vec3,
}

impl FreehandGuide {
    pub fn circle(origin: Vec3, radius: f32) -> Self {
        Self {
            origin,
            shape: FootprintShape::Circle,
            radius,
            density: 1.0,
            jitter: 0.0,
            normal: Vec3::Y,
        }
    }

    pub fn square(origin: Vec3, radius: f32) -> Self {
        Self {
            shape: FootprintShape::Square,
            ..Self::circle(origin, radius)
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density.clamp(0.0, 1.0);
        self
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    fn inside(&self, x: f32, y: f32) -> bool {
        match self.shape {
            FootprintShape::Circle => x * x + y * y <= self.radius * self.radius,
            FootprintShape::Square => x.abs() <= self.radius && y.abs() <= self.radius,
        }
    }
}

impl GuideSampling for FreehandGuide {
    fn generate(&self, ctx: &mut SampleContext<'_, '_>) -> Vec<Candidate> {
        if self.radius <= 0.0 {
            warn!("degenerate freehand footprint; yielding no candidates");
            return Vec::new();
        }

        let pitch = ctx.spacing.max_spacing();
        let half = ((self.radius / pitch).ceil() as i32).clamp(1, MAX_LATTICE_HALF);
        let (u, v) = plane_basis(self.normal);
        let normal = self.normal.normalize_or(Vec3::Y);
        let density = self.density.clamp(0.0, 1.0);
        let jitter_amp = self.jitter.clamp(0.0, 1.0) * pitch * 0.5;

        let mut claimed: HashSet<(i32, i32)> = HashSet::new();
        let mut out = Vec::new();
        for row in -half..=half {
            for col in -half..=half {
                let cx = col as f32 * pitch;
                let cy = row as f32 * pitch;
                if !self.inside(cx, cy) {
                    continue;
                }

                if density < 1.0 {
                    if rand01(ctx.rng) >= density {
                        continue;
                    }
                    // Suppress cells whose already-visited neighbors are
                    // claimed, so thinned output does not clump.
                    let visited = [
                        (col - 1, row),
                        (col - 1, row - 1),
                        (col, row - 1),
                        (col + 1, row - 1),
                    ];
                    if visited.iter().any(|cell| claimed.contains(cell)) {
                        continue;
                    }
                }
                claimed.insert((col, row));

                let Slot::Item(item) = ctx.selector.next(ctx.rng) else {
                    continue;
                };

                let (jx, jy) = if jitter_amp > 0.0 {
                    (
                        (rand01(ctx.rng) * 2.0 - 1.0) * jitter_amp,
                        (rand01(ctx.rng) * 2.0 - 1.0) * jitter_amp,
                    )
                } else {
                    (0.0, 0.0)
                };

                out.push(Candidate {
                    item,
                    position: self.origin + u * (cx + jx) + v * (cy + jy),
                    frame: Frame { tangent: u, normal },
                    progress: 0.0,
                });
            }
        }

        let count = out.len();
        for (index, candidate) in out.iter_mut().enumerate() {
            candidate.progress = (index + 1) as f32 / count as f32;
        }

        out
    }
}
