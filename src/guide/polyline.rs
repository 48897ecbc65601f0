//! Poly-line guide: arc-length walk along an ordered point list.
use glam::Vec3;
use tracing::warn;

use crate::guide::{Candidate, Frame, GuideSampling, SampleContext};

/// An ordered poly-line traversed by cumulative arc length.
#[derive(Clone, Debug)]
pub struct PolylineGuide {
    pub points: Vec<Vec3>,
    /// Guide-plane normal used as the up direction for emitted frames.
    pub normal: Vec3,
}

impl PolylineGuide {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            normal: Vec3::Y,
        }
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    fn cumulative_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(self.points.len());
        let mut total = 0.0;
        lengths.push(0.0);
        for pair in self.points.windows(2) {
            total += (pair[1] - pair[0]).length();
            lengths.push(total);
        }
        lengths
    }
}

impl GuideSampling for PolylineGuide {
    fn generate(&self, ctx: &mut SampleContext<'_, '_>) -> Vec<Candidate> {
        if self.points.len() < 2 {
            warn!("polyline guide has fewer than two points; yielding no candidates");
            return Vec::new();
        }

        let lengths = self.cumulative_lengths();
        let total = *lengths.last().unwrap_or(&0.0);
        if total <= f32::EPSILON {
            warn!("zero-length polyline guide; yielding no candidates");
            return Vec::new();
        }

        // Minimum step guarantees termination even for degenerate spacing.
        let step_floor = total / 1024.0;
        let normal = self.normal.normalize_or(Vec3::Y);

        let mut out = Vec::new();
        let mut cursor = 0.0f32;
        let mut segment = 0usize;
        loop {
            let (item, step) = ctx.next_step();
            cursor += step.max(step_floor);
            if cursor > total + total * 1e-6 {
                // The overflowing draw belongs to the next pass.
                ctx.push_back(item);
                break;
            }

            // Monotonic forward scan; the cursor never moves backward.
            while segment + 2 < lengths.len() && lengths[segment + 1] < cursor {
                segment += 1;
            }

            let Some(item) = item else {
                continue;
            };

            let seg_start = lengths[segment];
            let seg_len = lengths[segment + 1] - seg_start;
            let t = if seg_len > 0.0 {
                ((cursor - seg_start) / seg_len).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let a = self.points[segment];
            let b = self.points[segment + 1];

            out.push(Candidate {
                item,
                position: a.lerp(b, t),
                frame: Frame {
                    tangent: (b - a).normalize_or_zero(),
                    normal,
                },
                progress: cursor / total,
            });
        }

        out
    }
}
