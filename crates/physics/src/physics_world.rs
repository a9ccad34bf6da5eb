//! Static terrain world backed by Rapier3D.
//!
//! Fire only needs scene queries, so there is no dynamics pipeline here:
//! platforms are fixed colliders and the query pipeline is refreshed whenever
//! the collider set changes.

use crate::collision::CollisionGroup;
use engine_core::Vec2;
use rapier3d::na::Isometry3;
use rapier3d::prelude::*;

/// Extra Z thickness beyond a platform's largest in-plane half extent.
pub const PLATFORM_DEPTH_MARGIN: f32 = 1.0;

/// Half thickness along Z for a platform with the given in-plane half extents.
///
/// The box must be deeper than it is wide or tall: closest-point queries from
/// inside a platform then always resolve to an in-plane face, never to the
/// z = +-depth caps.
pub fn platform_half_depth(half_extents: Vec2) -> f32 {
    half_extents.max_element() + PLATFORM_DEPTH_MARGIN
}

/// Terrain colliders plus the acceleration structure used to query them.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub island_manager: IslandManager,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Update query pipeline for raycasting.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static box platform in the XY plane.
    /// `center`: world position of the box centre. `half_extents`: half width/height.
    /// `rotation_z_rad`: counter-clockwise rotation about Z in radians.
    pub fn add_platform(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        rotation_z_rad: f32,
        group: CollisionGroup,
    ) -> ColliderHandle {
        let (membership, filter) = group.scene();
        let position = Isometry3::new(
            vector![center.x, center.y, 0.0],
            vector![0.0, 0.0, rotation_z_rad as Real],
        );
        let collider = ColliderBuilder::cuboid(
            half_extents.x as Real,
            half_extents.y as Real,
            platform_half_depth(half_extents) as Real,
        )
        .position(position)
        .collision_groups(InteractionGroups::new(membership, filter))
        .build();
        let handle = self.collider_set.insert(collider);
        self.update_query_pipeline();
        log::debug!(
            "Added {:?} platform at ({}, {}) half extents ({}, {})",
            group,
            center.x,
            center.y,
            half_extents.x,
            half_extents.y
        );
        handle
    }

    /// Remove a collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true,
        );
        self.update_query_pipeline();
    }

    /// Number of colliders currently in the scene.
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }
}
