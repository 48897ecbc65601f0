//! High-level orchestration of one layout pass over a guide.
use glam::{Quat, Vec3};
use rand::RngCore;
use tracing::{info, warn};

use crate::brush::selection::ItemSelector;
use crate::brush::spacing::{SpacingConfig, SpacingResolver};
use crate::brush::Multibrush;
use crate::error::{Error, Result};
use crate::guide::{GuideSampling, SampleContext};
use crate::stroke::events::{EventSink, RejectReason, StrokeEvent, StrokeEventKind};
use crate::stroke::overlap::{OverlapFilter, OverlapPolicy};
use crate::stroke::transform::TransformResolver;
use crate::stroke::{PlacementRecord, Stroke};
use crate::world::{
    Aabb, ItemBounds, NearbyQuery, ObjectRef, SceneObjects, SurfaceQuery,
};

/// Surface projection settings for a build.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    /// Collision mask passed to the host's ray cast.
    pub mask: u32,
    /// Cast start height above the candidate; the ray runs down for twice
    /// this distance, so surfaces slightly below the guide plane still hit.
    pub cast_height: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            mask: u32::MAX,
            cast_height: 100.0,
        }
    }
}

impl SurfaceConfig {
    pub fn new(mask: u32) -> Self {
        Self {
            mask,
            ..Default::default()
        }
    }

    pub fn with_cast_height(mut self, cast_height: f32) -> Self {
        self.cast_height = cast_height;
        self
    }
}

/// Configuration for building a stroke.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct BuildConfig {
    pub spacing: SpacingConfig,
    pub overlap: OverlapPolicy,
    /// Multiplier on the nearby-query radius used by overlap filtering.
    pub overlap_radius_scale: f32,
    /// Target layer for instantiation.
    pub layer: u32,
    /// Parent the placed instances should attach to.
    pub parent: Option<ObjectRef>,
    /// When set, candidates are projected onto host surfaces by ray cast.
    pub surface: Option<SurfaceConfig>,
    /// The guide's own surface collider, ignored by overlap checks.
    pub exclude_surface: Option<ObjectRef>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            spacing: SpacingConfig::default(),
            overlap: OverlapPolicy::default(),
            overlap_radius_scale: 1.0,
            layer: 0,
            parent: None,
            surface: None,
            exclude_surface: None,
        }
    }
}

impl BuildConfig {
    pub fn new(spacing: SpacingConfig) -> Self {
        Self {
            spacing,
            ..Default::default()
        }
    }

    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_overlap_radius_scale(mut self, scale: f32) -> Self {
        self.overlap_radius_scale = scale;
        self
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_parent(mut self, parent: Option<ObjectRef>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_surface(mut self, surface: SurfaceConfig) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_exclude_surface(mut self, exclude: Option<ObjectRef>) -> Self {
        self.exclude_surface = exclude;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.overlap_radius_scale.is_finite() || self.overlap_radius_scale <= 0.0 {
            return Err(Error::InvalidConfig(
                "overlap_radius_scale must be > 0".into(),
            ));
        }
        if let Some(surface) = &self.surface {
            if !surface.cast_height.is_finite() || surface.cast_height <= 0.0 {
                return Err(Error::InvalidConfig("cast_height must be > 0".into()));
            }
        }

        Ok(())
    }
}

/// Summary of one build.
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct BuildResult {
    /// The records produced, in guide traversal order.
    pub stroke: Stroke,
    /// Candidates the guide produced.
    pub candidates_sampled: usize,
    /// Candidates dropped by overlap filtering.
    pub candidates_rejected: usize,
}

/// Runs the sample -> resolve -> filter pipeline for one guide and brush.
///
/// A build is atomic from a reader's point of view: the returned
/// [`Stroke`] is built in full within one call and never mutated
/// afterwards. The caller owns the [`ItemSelector`]; reset it before the
/// build to restart selection at the first item, or leave it to continue
/// the rotation from a previous stroke.
pub struct StrokeBuilder<'a, H>
where
    H: SurfaceQuery + NearbyQuery + SceneObjects + ItemBounds,
{
    pub config: BuildConfig,
    brush: &'a Multibrush,
    host: &'a H,
}

impl<'a, H> StrokeBuilder<'a, H>
where
    H: SurfaceQuery + NearbyQuery + SceneObjects + ItemBounds,
{
    pub fn try_new(config: BuildConfig, brush: &'a Multibrush, host: &'a H) -> Result<Self> {
        if brush.is_empty() {
            return Err(Error::EmptyBrush);
        }
        config.validate()?;
        Ok(Self {
            config,
            brush,
            host,
        })
    }

    pub fn build(
        &self,
        guide: &dyn GuideSampling,
        selector: &mut ItemSelector,
        rng: &mut dyn RngCore,
    ) -> Result<BuildResult> {
        self.build_with_events(guide, selector, rng, &mut ())
    }

    pub fn build_with_events(
        &self,
        guide: &dyn GuideSampling,
        selector: &mut ItemSelector,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<BuildResult> {
        if selector.item_count() != self.brush.len() {
            return Err(Error::InvalidConfig(
                "selector was built for a different brush".into(),
            ));
        }

        let mut spacing = SpacingResolver::new(self.config.spacing, self.brush, self.host);
        let candidates = {
            let mut ctx = SampleContext {
                spacing: &mut spacing,
                selector,
                rng: &mut *rng,
            };
            guide.generate(&mut ctx)
        };

        info!(
            brush = %self.brush.id,
            candidates = candidates.len(),
            "stroke build started"
        );
        if sink.wants(StrokeEventKind::BuildStarted) {
            sink.send(StrokeEvent::BuildStarted {
                brush_id: self.brush.id.clone(),
                candidate_count: candidates.len(),
            });
        }

        let resolver = TransformResolver::new(self.host);
        let mut filter = OverlapFilter::new(self.config.overlap, self.host, self.host)
            .with_exclusion(self.config.exclude_surface)
            .with_radius_scale(self.config.overlap_radius_scale);

        let mut stroke = Stroke::new();
        let mut rejected = 0;
        for (index, candidate) in candidates.iter().enumerate() {
            let Some(template) = self.brush.item(candidate.item) else {
                warn!(index, item = candidate.item, "candidate references missing item");
                continue;
            };

            let hit = match &self.config.surface {
                Some(surface) => {
                    let up = candidate.frame.normal.normalize_or(Vec3::Y);
                    let origin = candidate.position + up * surface.cast_height;
                    let hit =
                        self.host
                            .raycast(origin, -up, surface.cast_height * 2.0, surface.mask);
                    if hit.is_none() {
                        warn!(
                            item = %template.id,
                            position = ?candidate.position,
                            "surface cast missed; placing on the guide plane"
                        );
                        if sink.wants(StrokeEventKind::Warning) {
                            sink.send(StrokeEvent::Warning {
                                context: template.id.clone(),
                                message: "surface cast missed; placing on the guide plane"
                                    .to_owned(),
                            });
                        }
                    }
                    hit
                }
                None => None,
            };

            let next_position = candidates.get(index + 1).map(|next| next.position);
            let pose = resolver.resolve(template, candidate, next_position, hit.as_ref(), rng);

            // Unrotated base bounds; the pose applies rotation and scale.
            let base = self
                .host
                .item_bounds(&template.id, Quat::IDENTITY)
                .unwrap_or_else(|| Aabb::from_center_size(Vec3::ZERO, template.extents));
            let world_aabb = pose.world_aabb(base);

            if !filter.accepts(&world_aabb, &template.id) {
                rejected += 1;
                if sink.wants(StrokeEventKind::CandidateRejected) {
                    sink.send(StrokeEvent::CandidateRejected {
                        candidate_index: index,
                        item_id: template.id.clone(),
                        position: candidate.position,
                        reason: RejectReason::Overlap,
                    });
                }
                continue;
            }
            filter.commit(world_aabb);

            let record = PlacementRecord {
                item_id: template.id.clone(),
                position: pose.position,
                rotation: pose.rotation,
                scale: pose.scale,
                flip_x: pose.flip_x,
                flip_y: pose.flip_y,
                layer: self.config.layer,
                parent: self.config.parent,
                surface: hit.as_ref().map(|h| h.collider),
                guide_coord: candidate.position,
            };
            if sink.wants(StrokeEventKind::PlacementMade) {
                sink.send(StrokeEvent::PlacementMade {
                    candidate_index: index,
                    record: record.clone(),
                });
            }
            stroke.records.push(record);
        }

        info!(
            brush = %self.brush.id,
            placed = stroke.len(),
            rejected,
            "stroke build finished"
        );
        if sink.wants(StrokeEventKind::BuildFinished) {
            sink.send(StrokeEvent::BuildFinished {
                placed: stroke.len(),
                rejected,
            });
        }

        Ok(BuildResult {
            stroke,
            candidates_sampled: candidates.len(),
            candidates_rejected: rejected,
        })
    }
}
