//! Consumed host capabilities at the engine boundary.
//!
//! The engine never owns a scene: ray casts, nearby-object lookups, object
//! metadata, and item bounds are supplied by the caller through the traits
//! in this module. [`FlatWorld`] is the inert implementation used for
//! free-space placement and in tests.
use glam::{Quat, Vec3};

use crate::brush::ItemId;

/// Opaque handle to an object owned by the host scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub u64);

/// Result of a successful surface ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// World-space intersection point.
    pub point: Vec3,
    /// World-space surface normal at the intersection.
    pub normal: Vec3,
    /// Collider that was hit.
    pub collider: ObjectRef,
}

/// Axis-aligned bounding box in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Builds a box from its center and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// World-space bounds of this box after rotating its corners about the
    /// box center.
    pub fn rotated(&self, rotation: Quat) -> Aabb {
        let center = self.center();
        let half = self.size() * 0.5;
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            );
            let p = center + rotation * corner;
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }

    /// Scales the box about its center, component-wise.
    pub fn scaled(&self, scale: Vec3) -> Aabb {
        Aabb::from_center_size(self.center(), self.size() * scale.abs())
    }

    pub fn translated(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Ray-cast capability of the host scene.
pub trait SurfaceQuery {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
    ) -> Option<SurfaceHit>;
}

/// Nearby-object queries backed by the host's spatial index.
pub trait NearbyQuery {
    /// Objects within `radius` of `position`.
    fn nearby(&self, position: Vec3, radius: f32) -> Vec<ObjectRef>;

    /// Objects within `radius` of the ray from `origin` along `direction`.
    fn nearby_along(&self, origin: Vec3, direction: Vec3, radius: f32) -> Vec<ObjectRef>;
}

/// Per-object metadata queries used by overlap filtering.
pub trait SceneObjects {
    fn belongs_to_palette(&self, obj: ObjectRef) -> bool;

    fn belongs_to_brush(&self, obj: ObjectRef) -> bool;

    /// Prefab source id the object was instantiated from, if known.
    fn prefab_source_of(&self, obj: ObjectRef) -> Option<ItemId>;

    /// World bounds of the object's collider, if it has one.
    fn object_bounds(&self, obj: ObjectRef) -> Option<Aabb>;

    fn is_visible(&self, obj: ObjectRef) -> bool;
}

/// World bounds of a placeable item under a given rotation.
pub trait ItemBounds {
    fn item_bounds(&self, item: &ItemId, rotation: Quat) -> Option<Aabb>;
}

/// Inert host: no surfaces, no neighbors, no bounds. Placement falls back
/// to guide-plane poses and template extents.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatWorld;

impl SurfaceQuery for FlatWorld {
    fn raycast(
        &self,
        _origin: Vec3,
        _direction: Vec3,
        _max_distance: f32,
        _mask: u32,
    ) -> Option<SurfaceHit> {
        None
    }
}

impl NearbyQuery for FlatWorld {
    fn nearby(&self, _position: Vec3, _radius: f32) -> Vec<ObjectRef> {
        Vec::new()
    }

    fn nearby_along(&self, _origin: Vec3, _direction: Vec3, _radius: f32) -> Vec<ObjectRef> {
        Vec::new()
    }
}

impl SceneObjects for FlatWorld {
    fn belongs_to_palette(&self, _obj: ObjectRef) -> bool {
        false
    }

    fn belongs_to_brush(&self, _obj: ObjectRef) -> bool {
        false
    }

    fn prefab_source_of(&self, _obj: ObjectRef) -> Option<ItemId> {
        None
    }

    fn object_bounds(&self, _obj: ObjectRef) -> Option<Aabb> {
        None
    }

    fn is_visible(&self, _obj: ObjectRef) -> bool {
        false
    }
}

impl ItemBounds for FlatWorld {
    fn item_bounds(&self, _item: &ItemId, _rotation: Quat) -> Option<Aabb> {
        None
    }
}
