//! Terrain probes used to place fire on surfaces.

use crate::{LayerMask, PhysicsWorld};
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a successful terrain probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point, pointing out of the terrain.
    pub normal: Vec3,
    /// Distance from the probe origin (ray) or probe centre (area).
    pub distance: f32,
    /// The collider that was hit.
    pub collider: ColliderHandle,
}

/// Geometry queries a fire front needs from the terrain backend.
///
/// All queries are pure: no mutation, and a miss is `None` rather than an
/// error.
pub trait TerrainQuery {
    /// Cast from `origin` along `direction` for at most `max_distance`.
    ///
    /// Used to find walls standing between a front and its next position.
    fn probe_ahead(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;

    /// Cast from `origin` along `-surface_up` and return the nearest terrain hit.
    fn probe_downward(
        &self,
        origin: Vec3,
        surface_up: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;

    /// Find the terrain point closest to `center` within `radius`.
    ///
    /// Catches ledges and tight corners a straight ray skips over.
    fn probe_area(&self, center: Vec3, radius: f32, mask: LayerMask) -> Option<SurfaceHit>;
}

impl PhysicsWorld {
    /// Cast a ray and return the first hit on colliders matching `mask`.
    ///
    /// A ray that starts inside terrain reports no hit: there is no surface
    /// normal to give back.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                mask.query_filter(),
            )
            .filter(|(_, intersection)| {
                intersection.time_of_impact > 0.0 && intersection.normal.norm_squared() > 0.0
            })
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                SurfaceHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }
}

impl PhysicsWorld {
    /// Distance from `point` to the closest terrain matching `mask`, zero when
    /// the point is inside. `None` if there is no terrain at all.
    pub fn distance_to_terrain(&self, point: Vec3, mask: LayerMask) -> Option<f32> {
        let query_point = point![point.x, point.y, point.z];
        self.query_pipeline
            .project_point(
                &self.rigid_body_set,
                &self.collider_set,
                &query_point,
                true,
                mask.query_filter(),
            )
            .map(|(_, projection)| {
                if projection.is_inside {
                    0.0
                } else {
                    (projection.point - query_point).norm()
                }
            })
    }
}

impl TerrainQuery for PhysicsWorld {
    fn probe_ahead(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }
        self.raycast(origin, direction, max_distance, mask)
    }

    fn probe_downward(
        &self,
        origin: Vec3,
        surface_up: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.probe_ahead(origin, -surface_up, max_distance, mask)
    }

    fn probe_area(&self, center: Vec3, radius: f32, mask: LayerMask) -> Option<SurfaceHit> {
        if radius <= 0.0 {
            return None;
        }
        let query_point = point![center.x, center.y, center.z];
        // Non-solid projection lands on the boundary even from inside a collider.
        // Platforms are deeper than they are wide, so that boundary is in-plane.
        let (collider, projection) = self.query_pipeline.project_point(
            &self.rigid_body_set,
            &self.collider_set,
            &query_point,
            false,
            mask.query_filter(),
        )?;

        let point = Vec3::new(projection.point.x, projection.point.y, projection.point.z);
        let offset = center - point;
        let distance = offset.length();
        if !projection.is_inside && distance > radius {
            return None;
        }

        let normal = if distance < 1e-6 {
            log::trace!("Area probe centre lies on the surface, reporting world up");
            Vec3::Y
        } else if projection.is_inside {
            -offset / distance
        } else {
            offset / distance
        };

        Some(SurfaceHit {
            point,
            normal,
            distance: if projection.is_inside { 0.0 } else { distance },
            collider,
        })
    }
}
