//! Circular-arc guide: greedy packing along an arc perimeter.
use std::f32::consts::TAU;

use glam::Vec3;
use tracing::warn;

use crate::guide::{pack_span, plane_basis, Candidate, Frame, GuideSampling, SampleContext};

/// A circular arc (or full circle) in the plane perpendicular to `normal`.
///
/// Angles are normalized into `[0, 2π)` at sampling time, with the end
/// forced strictly after the start by adding a full turn when needed; a
/// start equal to the end therefore means a full circle.
#[derive(Clone, Debug)]
pub struct ArcGuide {
    pub center: Vec3,
    pub radius: f32,
    /// Arc start angle in radians.
    pub start_angle: f32,
    /// Arc end angle in radians.
    pub end_angle: f32,
    pub normal: Vec3,
}

impl ArcGuide {
    pub fn new(center: Vec3, radius: f32, start_angle: f32, end_angle: f32) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            normal: Vec3::Y,
        }
    }

    /// A full circle.
    pub fn circle(center: Vec3, radius: f32) -> Self {
        Self::new(center, radius, 0.0, TAU)
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    /// Normalized (start, sweep) with the end strictly after the start.
    fn normalized_sweep(&self) -> (f32, f32) {
        let start = self.start_angle.rem_euclid(TAU);
        let mut end = self.end_angle.rem_euclid(TAU);
        if end <= start {
            end += TAU;
        }
        (start, end - start)
    }
}

impl GuideSampling for ArcGuide {
    fn generate(&self, ctx: &mut SampleContext<'_, '_>) -> Vec<Candidate> {
        let (start, sweep) = self.normalized_sweep();
        let perimeter = self.radius * sweep;
        if self.radius <= 0.0 || perimeter <= f32::EPSILON {
            warn!("degenerate arc guide; yielding no candidates");
            return Vec::new();
        }

        let (u, v) = plane_basis(self.normal);
        let normal = self.normal.normalize_or(Vec3::Y);

        pack_span(perimeter, ctx)
            .into_iter()
            .map(|slot| {
                let angle = start + slot.center / self.radius;
                let radial = angle.cos() * u + angle.sin() * v;
                Candidate {
                    item: slot.item,
                    position: self.center + radial * self.radius,
                    frame: Frame {
                        tangent: -angle.sin() * u + angle.cos() * v,
                        normal,
                    },
                    progress: slot.center / perimeter,
                }
            })
            .collect()
    }
}
