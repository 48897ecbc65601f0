//! Per-item spacing resolution with a pass-local memo.
use std::collections::HashMap;

use glam::{Quat, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::brush::Multibrush;
use crate::world::ItemBounds;

/// Floor applied to any resolved spacing, guaranteeing forward progress
/// along a guide even for degenerate item extents.
pub const MIN_SPACING: f32 = 0.5;

/// Reference axis for bounds-derived spacing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    fn extent_of(self, size: Vec3) -> f32 {
        match self {
            Axis::X => size.x,
            Axis::Y => size.y,
            Axis::Z => size.z,
        }
    }
}

/// How the linear spacing for an item is computed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpacingMode {
    /// A configured constant, in world units.
    Fixed(f32),
    /// Derived from the item's bounding extent along the reference axis.
    Bounds(Axis),
}

impl Default for SpacingMode {
    fn default() -> Self {
        SpacingMode::Fixed(1.0)
    }
}

/// Spacing configuration for one layout pass.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpacingConfig {
    pub mode: SpacingMode,
    /// Extra gap added on top of the computed spacing.
    pub gap: f32,
    /// Tool-level scale multiplier overriding the item's own scale range.
    pub scale_override: Option<f32>,
}

impl SpacingConfig {
    pub fn fixed(spacing: f32) -> Self {
        Self {
            mode: SpacingMode::Fixed(spacing),
            gap: 0.0,
            scale_override: None,
        }
    }

    pub fn bounds(axis: Axis) -> Self {
        Self {
            mode: SpacingMode::Bounds(axis),
            gap: 0.0,
            scale_override: None,
        }
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_scale_override(mut self, scale: f32) -> Self {
        self.scale_override = Some(scale);
        self
    }
}

/// Resolves and memoizes per-item spacing for the duration of one pass.
///
/// The memo is owned by the resolver instance, never shared or global, so
/// repeated passes cannot observe stale entries. The resolver also tracks
/// the most recently resolved spacing, which defines the width of pattern
/// skips: a skipped slot advances the guide cursor by the spacing of the
/// previous item, or [`MIN_SPACING`] at the start of a pass.
pub struct SpacingResolver<'a> {
    config: SpacingConfig,
    brush: &'a Multibrush,
    bounds: &'a dyn ItemBounds,
    memo: HashMap<usize, f32>,
    last: Option<f32>,
}

impl<'a> SpacingResolver<'a> {
    pub fn new(config: SpacingConfig, brush: &'a Multibrush, bounds: &'a dyn ItemBounds) -> Self {
        Self {
            config,
            brush,
            bounds,
            memo: HashMap::new(),
            last: None,
        }
    }

    /// Required spacing for the given item index, memoized per pass.
    pub fn spacing_for(&mut self, item_index: usize) -> f32 {
        if let Some(&spacing) = self.memo.get(&item_index) {
            self.last = Some(spacing);
            return spacing;
        }

        let mut spacing = match self.config.mode {
            SpacingMode::Fixed(value) => value + self.config.gap,
            // Bounds-derived extents clamp to the floor even when tiny, so
            // a flat or empty mesh cannot stall the walk.
            SpacingMode::Bounds(axis) => {
                (self.bounds_extent(item_index, axis) + self.config.gap).max(MIN_SPACING)
            }
        };
        if spacing <= 0.0 || !spacing.is_finite() {
            warn!(
                item_index,
                spacing, "spacing underflow; clamping to minimum"
            );
            spacing = MIN_SPACING;
        }

        self.memo.insert(item_index, spacing);
        self.last = Some(spacing);
        spacing
    }

    /// Width of a pattern skip: the spacing of the most recently resolved
    /// item, or the minimum floor before any item has been resolved.
    pub fn skip_spacing(&self) -> f32 {
        self.last.unwrap_or(MIN_SPACING)
    }

    /// Largest spacing across the whole brush; used by footprint guides as
    /// a uniform lattice pitch.
    pub fn max_spacing(&mut self) -> f32 {
        (0..self.brush.len())
            .map(|i| self.spacing_for(i))
            .fold(MIN_SPACING, f32::max)
    }

    fn bounds_extent(&self, item_index: usize, axis: Axis) -> f32 {
        let Some(template) = self.brush.item(item_index) else {
            return MIN_SPACING;
        };

        let size = self
            .bounds
            .item_bounds(&template.id, Quat::IDENTITY)
            .map(|aabb| aabb.size())
            .unwrap_or(template.extents);

        // Conservative multiplier: the tool override when set, otherwise
        // the upper bound of the item's own scale range.
        let scale = self
            .config
            .scale_override
            .unwrap_or(template.randomization.scale.max);

        axis.extent_of(size) * scale.abs()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::brush::{ItemId, ItemTemplate, ValueRange};
    use crate::world::{Aabb, FlatWorld};

    fn brush() -> Multibrush {
        Multibrush::new("test")
            .with_item(ItemTemplate::new("wide", Vec3::new(4.0, 1.0, 2.0)))
            .with_item(ItemTemplate::new("thin", Vec3::new(0.0, 1.0, 1.0)))
    }

    #[test]
    fn fixed_mode_returns_value_plus_gap() {
        let brush = brush();
        let world = FlatWorld;
        let mut resolver =
            SpacingResolver::new(SpacingConfig::fixed(2.0).with_gap(0.5), &brush, &world);
        assert_eq!(resolver.spacing_for(0), 2.5);
    }

    #[test]
    fn bounds_mode_falls_back_to_template_extents() {
        let brush = brush();
        let world = FlatWorld;
        let mut resolver = SpacingResolver::new(SpacingConfig::bounds(Axis::X), &brush, &world);
        assert_eq!(resolver.spacing_for(0), 4.0);
    }

    #[test]
    fn bounds_mode_prefers_host_bounds() {
        struct Host;
        impl ItemBounds for Host {
            fn item_bounds(&self, _item: &ItemId, _rotation: Quat) -> Option<Aabb> {
                Some(Aabb::from_center_size(Vec3::ZERO, Vec3::new(6.0, 1.0, 1.0)))
            }
        }
        let brush = brush();
        let host = Host;
        let mut resolver = SpacingResolver::new(SpacingConfig::bounds(Axis::X), &brush, &host);
        assert_eq!(resolver.spacing_for(0), 6.0);
    }

    #[test]
    fn scale_override_beats_item_scale_range() {
        let brush = Multibrush::new("test").with_item(
            ItemTemplate::new("rock", Vec3::new(2.0, 1.0, 1.0)).with_randomization(
                crate::brush::ItemRandomization {
                    scale: ValueRange::new(1.0, 3.0),
                    ..Default::default()
                },
            ),
        );
        let world = FlatWorld;

        let mut by_range = SpacingResolver::new(SpacingConfig::bounds(Axis::X), &brush, &world);
        assert_eq!(by_range.spacing_for(0), 6.0);

        let mut by_override = SpacingResolver::new(
            SpacingConfig::bounds(Axis::X).with_scale_override(0.5),
            &brush,
            &world,
        );
        assert_eq!(by_override.spacing_for(0), 1.0);
    }

    #[test]
    fn degenerate_extent_clamps_to_floor() {
        let brush = brush();
        let world = FlatWorld;
        let mut resolver = SpacingResolver::new(SpacingConfig::bounds(Axis::X), &brush, &world);
        assert_eq!(resolver.spacing_for(1), MIN_SPACING);
    }

    #[test]
    fn negative_fixed_spacing_clamps_to_floor() {
        let brush = brush();
        let world = FlatWorld;
        let mut resolver = SpacingResolver::new(SpacingConfig::fixed(-3.0), &brush, &world);
        assert_eq!(resolver.spacing_for(0), MIN_SPACING);
    }

    #[test]
    fn memoizes_per_item_within_a_pass() {
        struct CountingBounds {
            calls: Cell<usize>,
        }
        impl ItemBounds for CountingBounds {
            fn item_bounds(&self, _item: &ItemId, _rotation: Quat) -> Option<Aabb> {
                self.calls.set(self.calls.get() + 1);
                Some(Aabb::from_center_size(Vec3::ZERO, Vec3::ONE))
            }
        }

        let brush = brush();
        let host = CountingBounds {
            calls: Cell::new(0),
        };
        let mut resolver = SpacingResolver::new(SpacingConfig::bounds(Axis::X), &brush, &host);
        resolver.spacing_for(0);
        resolver.spacing_for(0);
        resolver.spacing_for(0);
        assert_eq!(host.calls.get(), 1);
    }

    #[test]
    fn skip_spacing_tracks_last_resolved_item() {
        let brush = brush();
        let world = FlatWorld;
        let mut resolver = SpacingResolver::new(SpacingConfig::fixed(2.0), &brush, &world);

        assert_eq!(resolver.skip_spacing(), MIN_SPACING);
        resolver.spacing_for(0);
        assert_eq!(resolver.skip_spacing(), 2.0);
    }

    #[test]
    fn max_spacing_covers_largest_item() {
        let brush = brush();
        let world = FlatWorld;
        let mut resolver = SpacingResolver::new(SpacingConfig::bounds(Axis::X), &brush, &world);
        assert_eq!(resolver.max_spacing(), 4.0);
    }
}
