//! Pose resolution: candidate point plus surface hit into a final transform.
use glam::{Mat3, Quat, Vec3};
use rand::RngCore;

use crate::brush::ItemTemplate;
use crate::guide::Candidate;
use crate::world::{Aabb, ItemBounds, SurfaceHit};

/// Final world pose for one placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl ResolvedPose {
    /// World bounds of the item under this pose.
    pub fn world_aabb(&self, base: Aabb) -> Aabb {
        base.scaled(self.scale)
            .rotated(self.rotation)
            .translated(self.position)
    }
}

/// Combines a candidate, its guide frame, an optional surface hit, and the
/// item's randomization rules into a final world transform.
pub struct TransformResolver<'a> {
    bounds: &'a dyn ItemBounds,
}

impl<'a> TransformResolver<'a> {
    pub fn new(bounds: &'a dyn ItemBounds) -> Self {
        Self { bounds }
    }

    /// Resolves the pose for one candidate.
    ///
    /// `next_position` is the following candidate on the guide, used when
    /// the item aligns to the running stroke tangent. A missing surface hit
    /// is not an error: the item is placed on the guide plane using the
    /// guide's own normal.
    pub fn resolve(
        &self,
        template: &ItemTemplate,
        candidate: &Candidate,
        next_position: Option<Vec3>,
        hit: Option<&SurfaceHit>,
        rng: &mut dyn RngCore,
    ) -> ResolvedPose {
        let up = candidate.frame.normal.normalize_or(Vec3::Y);

        // Guide frame orientation, optionally recomputed from the delta to
        // the next candidate so the item faces along the stroke.
        let mut tangent = candidate.frame.tangent;
        if template.align_to_stroke {
            if let Some(next) = next_position {
                let delta = next - candidate.position;
                if delta.length_squared() > 1e-8 {
                    tangent = delta.normalize();
                }
            }
        }
        let mut rotation = rotation_from_frame(tangent, up);

        let offset = template.randomization.resolve_rotation_offset(rng);
        if offset != 0.0 {
            rotation = Quat::from_axis_angle(up, offset.to_radians()) * rotation;
        }

        let scale = template.randomization.resolve_scale(rng);
        let flip_x = template.randomization.flip_x.resolve(rng);
        let flip_y = template.randomization.flip_y.resolve(rng);

        let surface_distance = template.surface.distance.sample(rng);
        let mut position = candidate.position;
        match hit {
            Some(hit) if template.surface.rotate_to_surface => {
                let surface_normal = hit.normal.normalize_or(Vec3::Y);
                rotation = Quat::from_rotation_arc(up, surface_normal) * rotation;
                position = hit.point + surface_normal * surface_distance;
            }
            Some(hit) => {
                position = hit.point + up * surface_distance;
            }
            None => {
                position += up * surface_distance;
            }
        }

        if template.surface.embed_in_surface {
            if let Some(hit) = hit {
                let bottom = if template.surface.embed_at_pivot {
                    0.0
                } else {
                    let base = self
                        .bounds
                        .item_bounds(&template.id, rotation)
                        .unwrap_or_else(|| {
                            Aabb::from_center_size(Vec3::ZERO, template.extents)
                                .rotated(rotation)
                        });
                    base.min.y * scale.y
                };
                position.y = hit.point.y + surface_distance - bottom;
            }
        }

        position += rotation * template.local_offset;

        ResolvedPose {
            position,
            rotation,
            scale,
            flip_x,
            flip_y,
        }
    }
}

/// Rotation whose forward axis follows `tangent` and whose up axis is `up`.
fn rotation_from_frame(tangent: Vec3, up: Vec3) -> Quat {
    let forward = (tangent - up * tangent.dot(up)).normalize_or_zero();
    if forward == Vec3::ZERO {
        // Degenerate tangent: keep the up axis, ignore yaw.
        return Quat::from_rotation_arc(Vec3::Y, up);
    }
    let right = up.cross(forward);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::brush::{FlipPolicy, ItemRandomization, SurfaceProjection, ValueRange};
    use crate::guide::Frame;
    use crate::world::{FlatWorld, ObjectRef};

    fn candidate_at(position: Vec3) -> Candidate {
        Candidate {
            item: 0,
            position,
            frame: Frame {
                tangent: Vec3::X,
                normal: Vec3::Y,
            },
            progress: 0.5,
        }
    }

    fn hit_at(point: Vec3, normal: Vec3) -> SurfaceHit {
        SurfaceHit {
            point,
            normal,
            collider: ObjectRef(1),
        }
    }

    #[test]
    fn no_hit_places_on_the_guide_plane() {
        let world = FlatWorld;
        let resolver = TransformResolver::new(&world);
        let template = ItemTemplate::new("rock", Vec3::ONE).with_surface(SurfaceProjection {
            distance: ValueRange::fixed(0.25),
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(0);

        let pose = resolver.resolve(
            &template,
            &candidate_at(Vec3::new(2.0, 0.0, 3.0)),
            None,
            None,
            &mut rng,
        );
        assert_eq!(pose.position, Vec3::new(2.0, 0.25, 3.0));
        assert_eq!(pose.scale, Vec3::ONE);
        assert!(!pose.flip_x && !pose.flip_y);
    }

    #[test]
    fn hit_snaps_position_to_the_surface() {
        let world = FlatWorld;
        let resolver = TransformResolver::new(&world);
        let template = ItemTemplate::new("rock", Vec3::ONE);
        let mut rng = StdRng::seed_from_u64(0);

        let hit = hit_at(Vec3::new(2.0, -1.5, 3.0), Vec3::Y);
        let pose = resolver.resolve(
            &template,
            &candidate_at(Vec3::new(2.0, 0.0, 3.0)),
            None,
            Some(&hit),
            &mut rng,
        );
        assert_eq!(pose.position, hit.point);
    }

    #[test]
    fn rotate_to_surface_tilts_the_up_axis() {
        let world = FlatWorld;
        let resolver = TransformResolver::new(&world);
        let template = ItemTemplate::new("tree", Vec3::ONE).with_surface(SurfaceProjection {
            rotate_to_surface: true,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(0);

        let slope_normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let hit = hit_at(Vec3::ZERO, slope_normal);
        let pose = resolver.resolve(&template, &candidate_at(Vec3::ZERO), None, Some(&hit), &mut rng);

        let item_up = pose.rotation * Vec3::Y;
        assert!((item_up - slope_normal).length() < 1e-4);
    }

    #[test]
    fn align_to_stroke_faces_the_next_candidate() {
        let world = FlatWorld;
        let resolver = TransformResolver::new(&world);
        let template = ItemTemplate::new("fence", Vec3::ONE).with_align_to_stroke(true);
        let mut rng = StdRng::seed_from_u64(0);

        let pose = resolver.resolve(
            &template,
            &candidate_at(Vec3::ZERO),
            Some(Vec3::new(0.0, 0.0, 4.0)),
            None,
            &mut rng,
        );
        let forward = pose.rotation * Vec3::Z;
        assert!((forward - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn rotation_offset_is_snapped() {
        let world = FlatWorld;
        let resolver = TransformResolver::new(&world);
        let template = ItemTemplate::new("rock", Vec3::ONE).with_randomization(ItemRandomization {
            rotation_offset: ValueRange::fixed(93.0),
            rotation_snap: Some(90.0),
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(0);

        let pose = resolver.resolve(&template, &candidate_at(Vec3::ZERO), None, None, &mut rng);
        // 93 snaps to 90 degrees applied on top of the frame tangent X.
        let forward = pose.rotation * Vec3::Z;
        let expected = Quat::from_rotation_y(90.0f32.to_radians()) * Vec3::X;
        assert!((forward - expected).length() < 1e-4);
    }

    #[test]
    fn embed_flushes_the_bounds_bottom() {
        let world = FlatWorld;
        let resolver = TransformResolver::new(&world);
        let template =
            ItemTemplate::new("pillar", Vec3::new(1.0, 4.0, 1.0)).with_surface(SurfaceProjection {
                embed_in_surface: true,
                ..Default::default()
            });
        let mut rng = StdRng::seed_from_u64(0);

        let hit = hit_at(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        let pose = resolver.resolve(&template, &candidate_at(Vec3::ZERO), None, Some(&hit), &mut rng);
        // Bounds bottom is -2 below the pivot; pivot lands 2 above the hit.
        assert!((pose.position.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn embed_at_pivot_lands_the_pivot_on_the_surface() {
        let world = FlatWorld;
        let resolver = TransformResolver::new(&world);
        let template =
            ItemTemplate::new("pillar", Vec3::new(1.0, 4.0, 1.0)).with_surface(SurfaceProjection {
                embed_in_surface: true,
                embed_at_pivot: true,
                distance: ValueRange::fixed(0.5),
                ..Default::default()
            });
        let mut rng = StdRng::seed_from_u64(0);

        let hit = hit_at(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        let pose = resolver.resolve(&template, &candidate_at(Vec3::ZERO), None, Some(&hit), &mut rng);
        assert!((pose.position.y - 2.5).abs() < 1e-4);
    }

    #[test]
    fn local_offset_rotates_with_the_pose() {
        let world = FlatWorld;
        let resolver = TransformResolver::new(&world);
        let template =
            ItemTemplate::new("lamp", Vec3::ONE).with_local_offset(Vec3::new(0.0, 0.0, 1.0));
        let mut rng = StdRng::seed_from_u64(0);

        // Frame tangent is X, so the local forward offset lands along X.
        let pose = resolver.resolve(&template, &candidate_at(Vec3::ZERO), None, None, &mut rng);
        assert!((pose.position - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn always_flip_sets_both_flags() {
        let world = FlatWorld;
        let resolver = TransformResolver::new(&world);
        let template = ItemTemplate::new("decal", Vec3::ONE).with_randomization(ItemRandomization {
            flip_x: FlipPolicy::Always,
            flip_y: FlipPolicy::Always,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(0);

        let pose = resolver.resolve(&template, &candidate_at(Vec3::ZERO), None, None, &mut rng);
        assert!(pose.flip_x && pose.flip_y);
    }

    #[test]
    fn world_aabb_applies_scale_and_translation() {
        let pose = ResolvedPose {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(2.0),
            flip_x: false,
            flip_y: false,
        };
        let aabb = pose.world_aabb(Aabb::from_center_size(Vec3::ZERO, Vec3::ONE));
        assert_eq!(aabb.min, Vec3::new(9.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(11.0, 1.0, 1.0));
    }
}
