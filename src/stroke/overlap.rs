//! Overlap filtering of candidate placements against existing objects.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::world::{Aabb, NearbyQuery, ObjectRef, SceneObjects};

/// Which existing objects a new candidate must not collide with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverlapPolicy {
    /// Accept everything.
    #[default]
    Disabled,
    /// Reject near any object belonging to the active palette.
    VsPalette,
    /// Reject near any object placed by the active brush.
    VsBrush,
    /// Reject near any object with the same prefab source.
    VsSamePrefab,
    /// Reject on bounding-box intersection with any visible scene object.
    VsAllObjects,
}

/// Accepts or rejects candidates against the host's nearby-object query.
///
/// For [`OverlapPolicy::VsAllObjects`] the filter also tracks the bounds
/// of records already accepted in the current stroke, so one pass never
/// produces two overlapping records even before anything is committed to
/// the scene. Rejected candidates consume no stroke slot, but the sampler's
/// forward progress is already spent; a rejection never re-samples.
pub struct OverlapFilter<'a> {
    policy: OverlapPolicy,
    nearby: &'a dyn NearbyQuery,
    scene: &'a dyn SceneObjects,
    /// The guide's own surface collider, excluded from all checks.
    exclude: Option<ObjectRef>,
    /// Multiplier on the candidate-extent query radius.
    radius_scale: f32,
    accepted: Vec<Aabb>,
}

impl<'a> OverlapFilter<'a> {
    pub fn new(
        policy: OverlapPolicy,
        nearby: &'a dyn NearbyQuery,
        scene: &'a dyn SceneObjects,
    ) -> Self {
        Self {
            policy,
            nearby,
            scene,
            exclude: None,
            radius_scale: 1.0,
            accepted: Vec::new(),
        }
    }

    pub fn with_exclusion(mut self, exclude: Option<ObjectRef>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_radius_scale(mut self, scale: f32) -> Self {
        self.radius_scale = scale;
        self
    }

    /// Whether a candidate with the given world bounds and prefab source
    /// may be placed.
    pub fn accepts(&self, world_aabb: &Aabb, prefab: &str) -> bool {
        if self.policy == OverlapPolicy::Disabled {
            return true;
        }

        if self.policy == OverlapPolicy::VsAllObjects
            && self.accepted.iter().any(|aabb| aabb.intersects(world_aabb))
        {
            return false;
        }

        // Query radius sized from the candidate extent.
        let radius = world_aabb.size().length() * 0.5 * self.radius_scale;
        for obj in self.nearby.nearby(world_aabb.center(), radius) {
            if Some(obj) == self.exclude {
                continue;
            }
            let rejects = match self.policy {
                OverlapPolicy::Disabled => false,
                OverlapPolicy::VsPalette => self.scene.belongs_to_palette(obj),
                OverlapPolicy::VsBrush => self.scene.belongs_to_brush(obj),
                OverlapPolicy::VsSamePrefab => {
                    self.scene.prefab_source_of(obj).as_deref() == Some(prefab)
                }
                OverlapPolicy::VsAllObjects => {
                    self.scene.is_visible(obj)
                        && self
                            .scene
                            .object_bounds(obj)
                            .is_some_and(|bounds| bounds.intersects(world_aabb))
                }
            };
            if rejects {
                return false;
            }
        }

        true
    }

    /// Records an accepted candidate's bounds for within-stroke exclusion.
    pub fn commit(&mut self, world_aabb: Aabb) {
        if self.policy == OverlapPolicy::VsAllObjects {
            self.accepted.push(world_aabb);
        }
    }
}
