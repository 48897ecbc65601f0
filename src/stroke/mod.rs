//! Stroke output: ordered placement records for one layout pass.
use glam::{Quat, Vec3};

pub mod builder;
pub mod events;
pub mod overlap;
pub mod transform;

use crate::brush::ItemId;
use crate::world::ObjectRef;

/// One resolved placement produced by a layout pass.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementRecord {
    /// Prefab reference id of the placed item.
    pub item_id: ItemId,
    pub position: Vec3,
    pub rotation: Quat,
    /// Non-uniform world scale.
    pub scale: Vec3,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Target layer for instantiation.
    pub layer: u32,
    /// Parent the instance should attach to.
    pub parent: Option<ObjectRef>,
    /// Surface collider the record may be re-parented to.
    pub surface: Option<ObjectRef>,
    /// Guide-space source coordinate, kept so previews can re-project the
    /// record when the surface moves.
    pub guide_coord: Vec3,
}

/// The ordered output of one layout pass.
///
/// Rebuilt wholesale on every guide or parameter change; record order
/// always matches guide traversal order, which preview code relies on to
/// link consecutive records.
#[derive(Clone, Debug, Default)]
pub struct Stroke {
    pub records: Vec<PlacementRecord>,
}

impl Stroke {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacementRecord> {
        self.records.iter()
    }
}

impl IntoIterator for Stroke {
    type Item = PlacementRecord;
    type IntoIter = std::vec::IntoIter<PlacementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Stroke {
    type Item = &'a PlacementRecord;
    type IntoIter = std::slice::Iter<'a, PlacementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
