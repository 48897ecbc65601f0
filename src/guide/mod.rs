//! Guide geometries and the sampling that turns them into candidate points.
//!
//! A guide converts its geometry plus the pass's spacing and selection
//! state into an ordered stream of [`Candidate`]s. Ordering always follows
//! guide traversal (arc length ascending, or row-major for lattices);
//! downstream code links consecutive candidates to orient items along the
//! running stroke tangent.
use glam::Vec3;
use rand::RngCore;

pub mod arc;
pub mod freehand;
pub mod grid;
pub mod polygon;
pub mod polyline;

pub use arc::ArcGuide;
pub use freehand::{FootprintShape, FreehandGuide};
pub use grid::GridGuide;
pub use polygon::PolygonGuide;
pub use polyline::PolylineGuide;

use crate::brush::selection::{ItemSelector, Slot};
use crate::brush::spacing::SpacingResolver;

/// Local orientation at a candidate point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Direction of guide traversal at this point.
    pub tangent: Vec3,
    /// Guide-plane normal (the up direction without a surface hit).
    pub normal: Vec3,
}

impl Frame {
    pub fn bitangent(&self) -> Vec3 {
        self.normal.cross(self.tangent)
    }
}

/// One candidate placement slot emitted by a guide.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Index of the selected item template.
    pub item: usize,
    /// Guide-space position, prior to any surface projection.
    pub position: Vec3,
    pub frame: Frame,
    /// Traversal progress in `(0, 1]`.
    pub progress: f32,
}

/// Mutable pass state shared with a guide while it samples.
pub struct SampleContext<'a, 'b> {
    pub spacing: &'a mut SpacingResolver<'b>,
    pub selector: &'a mut ItemSelector,
    pub rng: &'a mut dyn RngCore,
}

impl SampleContext<'_, '_> {
    /// Draws the next slot and its spacing budget. Skips produce no item
    /// but still consume the width of the previously resolved item.
    pub(crate) fn next_step(&mut self) -> (Option<usize>, f32) {
        match self.selector.next(self.rng) {
            Slot::Item(index) => (Some(index), self.spacing.spacing_for(index)),
            Slot::Skip => (None, self.spacing.skip_spacing()),
        }
    }

    /// Returns a drawn step that did not fit on the guide, so the selector
    /// serves it again on the next segment or pass instead of losing it.
    pub(crate) fn push_back(&mut self, item: Option<usize>) {
        let slot = match item {
            Some(index) => Slot::Item(index),
            None => Slot::Skip,
        };
        self.selector.push_back(slot);
    }
}

/// A guide geometry that can be sampled into ordered candidates.
///
/// Sampling is restartable: the same guide with a freshly reset selector
/// reproduces the same candidate count and ordering, excluding entropy
/// drawn for random selection or jitter.
pub trait GuideSampling {
    fn generate(&self, ctx: &mut SampleContext<'_, '_>) -> Vec<Candidate>;
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Orthonormal basis (u, v) spanning the plane perpendicular to `normal`.
pub(crate) fn plane_basis(normal: Vec3) -> (Vec3, Vec3) {
    let n = normal.normalize_or(Vec3::Y);
    let seed = if n.x.abs() < 0.9 { Vec3::X } else { Vec3::Z };
    let u = (seed - n * seed.dot(n)).normalize();
    let v = n.cross(u);
    (u, v)
}

/// One item packed into a linear span.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PackedSlot {
    pub item: usize,
    /// Width the item occupies along the span.
    pub width: f32,
    /// Distance of the item center from the span start, after the leftover
    /// remainder has been distributed.
    pub center: f32,
}

/// Greedily packs slots end-to-end into `length`, then distributes the
/// leftover remainder as uniform extra gap so the run is centered rather
/// than left-packed. Skip slots occupy width but yield no packed item.
pub(crate) fn pack_span(length: f32, ctx: &mut SampleContext<'_, '_>) -> Vec<PackedSlot> {
    if length <= f32::EPSILON {
        return Vec::new();
    }

    // The 1/1024 width floor bounds the iteration count for tiny spacings.
    let width_floor = length / 1024.0;
    let mut slots: Vec<(Option<usize>, f32)> = Vec::new();
    let mut used = 0.0;
    loop {
        let (item, width) = ctx.next_step();
        let width = width.max(width_floor);
        if used + width > length {
            // The overflowing draw belongs to the next segment or pass.
            ctx.push_back(item);
            break;
        }
        used += width;
        slots.push((item, width));
    }

    if slots.is_empty() {
        return Vec::new();
    }

    let extra = (length - used) / slots.len() as f32;
    let mut packed = Vec::with_capacity(slots.len());
    let mut cursor = 0.0;
    for (item, width) in slots {
        cursor += extra * 0.5;
        if let Some(item) = item {
            packed.push(PackedSlot {
                item,
                width,
                center: cursor + width * 0.5,
            });
        }
        cursor += width + extra * 0.5;
    }

    packed
}
