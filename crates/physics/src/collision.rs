//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Solid ground and terrain fire can walk on
    Ground = 1 << 0,
    /// Floating platforms
    Platform = 1 << 1,
    /// Player character
    Player = 1 << 2,
    /// Enemies
    Enemy = 1 << 3,
    /// Fire visuals and hit boxes
    Fire = 1 << 4,
    /// Triggers and sensors
    Trigger = 1 << 5,
}

impl CollisionGroup {
    /// Membership/filter pair for a static scene collider of this group.
    ///
    /// Scene geometry collides with everything; queries narrow it down.
    pub fn scene(self) -> (Group, Group) {
        (Group::from_bits_retain(self as u32), Group::ALL)
    }
}

/// Bit set of [`CollisionGroup`]s a query is allowed to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Everything fire can burn along.
    pub const TERRAIN: LayerMask =
        LayerMask(CollisionGroup::Ground as u32 | CollisionGroup::Platform as u32);
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    pub fn from_groups(groups: &[CollisionGroup]) -> Self {
        LayerMask(groups.iter().fold(0, |bits, g| bits | *g as u32))
    }

    pub fn contains(self, group: CollisionGroup) -> bool {
        self.0 & group as u32 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Query filter accepting only colliders whose membership intersects the mask.
    pub fn query_filter(self) -> QueryFilter<'static> {
        QueryFilter::default().groups(InteractionGroups::new(
            Group::ALL,
            Group::from_bits_retain(self.0),
        ))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::TERRAIN
    }
}
