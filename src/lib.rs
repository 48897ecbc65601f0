#![forbid(unsafe_code)]
//! stroke_scatter: Deterministic multibrush placement along guide geometry.
//!
//! Modules:
//! - brush: item templates, selection modes, spacing resolution
//! - guide: polyline, arc, polygon, grid, and freehand candidate sampling
//! - stroke: transform resolution, overlap filtering, build orchestration, events
//! - world: consumed host capabilities (ray casts, nearby queries, bounds)
//!
//! For examples and docs, see README and docs.rs.
pub mod brush;
pub mod error;
pub mod guide;
pub mod stroke;
pub mod world;

/// Convenient re-exports for common types. Import with `use stroke_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::brush::selection::{ItemSelector, Slot};
    pub use crate::brush::spacing::{Axis, SpacingConfig, SpacingMode, SpacingResolver};
    pub use crate::brush::template::{
        FlipPolicy, ItemRandomization, ItemTemplate, SurfaceProjection, ValueRange,
    };
    pub use crate::brush::{ItemId, Multibrush, SelectionMode};
    pub use crate::error::{Error, Result};
    pub use crate::guide::{
        ArcGuide, Candidate, FootprintShape, Frame, FreehandGuide, GridGuide, GuideSampling,
        PolygonGuide, PolylineGuide, SampleContext,
    };
    pub use crate::stroke::builder::{BuildConfig, BuildResult, StrokeBuilder, SurfaceConfig};
    pub use crate::stroke::events::{
        EventSink, FnSink, RejectReason, StrokeEvent, StrokeEventKind, VecSink,
    };
    pub use crate::stroke::overlap::{OverlapFilter, OverlapPolicy};
    pub use crate::stroke::transform::{ResolvedPose, TransformResolver};
    pub use crate::stroke::{PlacementRecord, Stroke};
    pub use crate::world::{
        Aabb, FlatWorld, ItemBounds, NearbyQuery, ObjectRef, SceneObjects, SurfaceHit,
        SurfaceQuery,
    };
}
