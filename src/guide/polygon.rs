//! Polygon-outline guide: per-segment greedy packing.
use std::f32::consts::TAU;

use glam::Vec3;
use tracing::warn;

use crate::guide::{pack_span, plane_basis, Candidate, Frame, GuideSampling, SampleContext};

/// A parametric shape outline traversed segment by segment.
///
/// Each straight segment between consecutive vertices is packed
/// independently with the same pack-and-distribute algorithm the arc guide
/// uses, so corners never receive half-overlapping items. The selection
/// cursor is shared across segments; callers that want the pattern to
/// restart per stroke reset the selector before sampling.
#[derive(Clone, Debug)]
pub struct PolygonGuide {
    pub vertices: Vec<Vec3>,
    /// Connect the last vertex back to the first.
    pub closed: bool,
    pub normal: Vec3,
}

impl PolygonGuide {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            closed: true,
            normal: Vec3::Y,
        }
    }

    /// An open segment list (no closing edge).
    pub fn open(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            closed: false,
            normal: Vec3::Y,
        }
    }

    /// A regular polygon outline with `sides` vertices (minimum 3) in the
    /// plane perpendicular to `Vec3::Y`.
    pub fn regular(center: Vec3, radius: f32, sides: usize) -> Self {
        let sides = sides.max(3);
        let (u, v) = plane_basis(Vec3::Y);
        let vertices = (0..sides)
            .map(|i| {
                let angle = i as f32 / sides as f32 * TAU;
                center + (angle.cos() * u + angle.sin() * v) * radius
            })
            .collect();
        Self::new(vertices)
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    fn segments(&self) -> Vec<(Vec3, Vec3)> {
        let mut segments: Vec<_> = self.vertices.windows(2).map(|w| (w[0], w[1])).collect();
        if self.closed && self.vertices.len() > 2 {
            if let (Some(&first), Some(&last)) = (self.vertices.first(), self.vertices.last()) {
                segments.push((last, first));
            }
        }
        segments
    }
}

impl GuideSampling for PolygonGuide {
    fn generate(&self, ctx: &mut SampleContext<'_, '_>) -> Vec<Candidate> {
        let segments = self.segments();
        let total: f32 = segments.iter().map(|(a, b)| (*b - *a).length()).sum();
        if segments.is_empty() || total <= f32::EPSILON {
            warn!("degenerate polygon guide; yielding no candidates");
            return Vec::new();
        }

        let normal = self.normal.normalize_or(Vec3::Y);
        let mut out = Vec::new();
        let mut traversed = 0.0;
        for (a, b) in segments {
            let length = (b - a).length();
            if length <= f32::EPSILON {
                continue;
            }
            let tangent = (b - a) / length;
            for slot in pack_span(length, ctx) {
                out.push(Candidate {
                    item: slot.item,
                    position: a + tangent * slot.center,
                    frame: Frame { tangent, normal },
                    progress: (traversed + slot.center) / total,
                });
            }
            traversed += length;
        }

        out
    }
}
