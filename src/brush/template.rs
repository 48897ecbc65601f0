//! Item templates and their randomization rules.
//!
//! An [`ItemTemplate`] describes one placeable prefab variant: its nominal
//! bounding size plus the randomization and surface-projection rules applied
//! when a pose is resolved. Randomized parameters draw through the caller's
//! RNG; fixed ranges never touch it, which keeps fully fixed configurations
//! bit-reproducible across passes.
use glam::Vec3;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::brush::ItemId;
use crate::guide::rand01;

/// A fixed value or a uniform random range.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    /// A degenerate range that always yields `value` and draws no entropy.
    pub fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// Draws a value; fixed ranges short-circuit without consuming entropy.
    pub fn sample(&self, rng: &mut dyn RngCore) -> f32 {
        if self.is_fixed() {
            self.min
        } else {
            self.min + rand01(rng) * (self.max - self.min)
        }
    }
}

/// Mirroring policy for one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlipPolicy {
    #[default]
    Never,
    Always,
    Random,
}

impl FlipPolicy {
    /// Resolves the policy to a flip flag; only `Random` consumes entropy.
    pub fn resolve(&self, rng: &mut dyn RngCore) -> bool {
        match self {
            FlipPolicy::Never => false,
            FlipPolicy::Always => true,
            FlipPolicy::Random => rand01(rng) < 0.5,
        }
    }
}

/// Scale, rotation, and mirroring randomization for one item.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemRandomization {
    /// Scale multiplier; the X draw is copied to Y and Z unless
    /// `separate_scale_axes` is set.
    pub scale: ValueRange,
    pub separate_scale_axes: bool,
    pub scale_y: ValueRange,
    pub scale_z: ValueRange,
    /// Rotation offset about the up axis, in degrees.
    pub rotation_offset: ValueRange,
    /// When set, the sampled rotation offset is rounded to the nearest
    /// multiple of this factor (degrees).
    pub rotation_snap: Option<f32>,
    pub flip_x: FlipPolicy,
    pub flip_y: FlipPolicy,
}

impl Default for ItemRandomization {
    fn default() -> Self {
        Self {
            scale: ValueRange::fixed(1.0),
            separate_scale_axes: false,
            scale_y: ValueRange::fixed(1.0),
            scale_z: ValueRange::fixed(1.0),
            rotation_offset: ValueRange::fixed(0.0),
            rotation_snap: None,
            flip_x: FlipPolicy::Never,
            flip_y: FlipPolicy::Never,
        }
    }
}

impl ItemRandomization {
    /// Resolves the per-axis scale multiplier.
    pub fn resolve_scale(&self, rng: &mut dyn RngCore) -> Vec3 {
        let x = self.scale.sample(rng);
        if self.separate_scale_axes {
            Vec3::new(x, self.scale_y.sample(rng), self.scale_z.sample(rng))
        } else {
            Vec3::splat(x)
        }
    }

    /// Resolves the rotation offset in degrees, snapped if configured.
    pub fn resolve_rotation_offset(&self, rng: &mut dyn RngCore) -> f32 {
        let offset = self.rotation_offset.sample(rng);
        match self.rotation_snap {
            Some(snap) if snap > 0.0 => (offset / snap).round() * snap,
            _ => offset,
        }
    }
}

/// Surface-projection behavior for one item.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceProjection {
    /// Reorient the item so its up axis matches the surface normal.
    pub rotate_to_surface: bool,
    /// Shift the item along the up axis until its lowest point sits flush
    /// against the surface.
    pub embed_in_surface: bool,
    /// Flush the pivot instead of the lowest point of the bounds.
    pub embed_at_pivot: bool,
    /// Offset along the surface normal (or guide normal without a hit).
    pub distance: ValueRange,
}

impl SurfaceProjection {
    pub fn new() -> Self {
        Self {
            rotate_to_surface: false,
            embed_in_surface: false,
            embed_at_pivot: false,
            distance: ValueRange::fixed(0.0),
        }
    }
}

impl Default for SurfaceProjection {
    fn default() -> Self {
        Self::new()
    }
}

/// One placeable prefab variant with its randomization rules.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct ItemTemplate {
    /// Immutable prefab reference id.
    pub id: ItemId,
    /// Nominal bounding size, used when the host has no item bounds.
    pub extents: Vec3,
    /// Recompute the yaw from the running stroke tangent.
    pub align_to_stroke: bool,
    /// Offset applied in the resolved rotation's space.
    pub local_offset: Vec3,
    pub randomization: ItemRandomization,
    pub surface: SurfaceProjection,
}

impl ItemTemplate {
    pub fn new(id: impl Into<ItemId>, extents: Vec3) -> Self {
        Self {
            id: id.into(),
            extents,
            align_to_stroke: false,
            local_offset: Vec3::ZERO,
            randomization: ItemRandomization::default(),
            surface: SurfaceProjection::default(),
        }
    }

    pub fn with_randomization(mut self, randomization: ItemRandomization) -> Self {
        self.randomization = randomization;
        self
    }

    pub fn with_surface(mut self, surface: SurfaceProjection) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_align_to_stroke(mut self, align: bool) -> Self {
        self.align_to_stroke = align;
        self
    }

    pub fn with_local_offset(mut self, offset: Vec3) -> Self {
        self.local_offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct FixedRng {
        value: u32,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value
        }

        fn next_u64(&mut self) -> u64 {
            self.value as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
        }
    }

    #[test]
    fn fixed_range_never_draws_entropy() {
        // A panicking RNG proves sample() short-circuits.
        struct PanicRng;
        impl RngCore for PanicRng {
            fn next_u32(&mut self) -> u32 {
                panic!("entropy drawn for a fixed range");
            }
            fn next_u64(&mut self) -> u64 {
                panic!("entropy drawn for a fixed range");
            }
            fn fill_bytes(&mut self, _dest: &mut [u8]) {
                panic!("entropy drawn for a fixed range");
            }
        }
        let mut rng = PanicRng;
        assert_eq!(ValueRange::fixed(2.5).sample(&mut rng), 2.5);
        assert!(!FlipPolicy::Never.resolve(&mut rng));
        assert!(FlipPolicy::Always.resolve(&mut rng));
    }

    #[test]
    fn sampled_values_stay_in_range() {
        let range = ValueRange::new(0.5, 2.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = range.sample(&mut rng);
            assert!((0.5..=2.0).contains(&v));
        }
    }

    #[test]
    fn new_orders_min_and_max() {
        let range = ValueRange::new(3.0, 1.0);
        assert_eq!(range.min, 1.0);
        assert_eq!(range.max, 3.0);
    }

    #[test]
    fn uniform_scale_copies_x_to_all_axes() {
        let randomization = ItemRandomization {
            scale: ValueRange::new(0.5, 1.5),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let scale = randomization.resolve_scale(&mut rng);
        assert_eq!(scale.x, scale.y);
        assert_eq!(scale.x, scale.z);
    }

    #[test]
    fn separate_axes_draw_independently() {
        let randomization = ItemRandomization {
            scale: ValueRange::fixed(1.0),
            separate_scale_axes: true,
            scale_y: ValueRange::fixed(2.0),
            scale_z: ValueRange::fixed(3.0),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let scale = randomization.resolve_scale(&mut rng);
        assert_eq!(scale, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn rotation_offset_snaps_to_multiples() {
        let randomization = ItemRandomization {
            rotation_offset: ValueRange::fixed(47.0),
            rotation_snap: Some(15.0),
            ..Default::default()
        };
        let mut rng = FixedRng { value: 0 };
        assert_eq!(randomization.resolve_rotation_offset(&mut rng), 45.0);
    }

    #[test]
    fn random_flip_follows_draw() {
        let mut low = FixedRng { value: 0 };
        let mut high = FixedRng { value: u32::MAX };
        assert!(FlipPolicy::Random.resolve(&mut low));
        assert!(!FlipPolicy::Random.resolve(&mut high));
    }

    #[test]
    fn surface_projection_default_matches_new() {
        let projection = SurfaceProjection::default();
        assert_eq!(projection, SurfaceProjection::new());
        assert!(projection.distance.is_fixed());
        assert_eq!(projection.distance.min, 0.0);
    }
}
