//! Ignition groups and convergence detection.
//!
//! A group is born when a root front spreads into both a left and a right
//! child. Each tick the tracker measures the gap between the root's current
//! leaves; once it drops below the left leaf's spread distance the platform is
//! considered engulfed, both leaves are frozen, and the group retires.

use engine_core::{Transform, World};

use crate::{FireFront, FrontHandle};

/// Where fronts announce new ignition groups.
///
/// Handed to the spread step explicitly; fronts never look the tracker up.
pub trait GroupRegistry {
    /// Start tracking `root`. Returns `false` (and tracks nothing) unless the
    /// root exists and both of its leaves are set.
    fn register(&mut self, world: &World, root: FrontHandle) -> bool;
}

/// A tracked ignition root. Its leaves are read from the root on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnitionGroup {
    pub root: FrontHandle,
}

impl IgnitionGroup {
    /// Current `(left, right)` leaves of the root.
    pub fn leaves(&self, world: &World) -> Option<(FrontHandle, FrontHandle)> {
        let root = world.get::<&FireFront>(self.root).ok()?;
        Some((root.left_leaf?, root.right_leaf?))
    }

    /// Whether `handle` is this group's root or one of its current leaves.
    pub fn references(&self, world: &World, handle: FrontHandle) -> bool {
        if self.root == handle {
            return true;
        }
        matches!(self.leaves(world), Some((l, r)) if l == handle || r == handle)
    }
}

/// A group that finished burning this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    pub root: FrontHandle,
    pub left: FrontHandle,
    pub right: FrontHandle,
    /// Gap between the leaves when convergence was detected.
    pub distance: f32,
}

/// Owns the set of active ignition groups.
#[derive(Debug, Default)]
pub struct IgnitionTracker {
    active: Vec<IgnitionGroup>,
}

enum Check {
    Burning,
    Converged(Convergence),
    Stale,
}

impl IgnitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_active(&self, root: FrontHandle) -> bool {
        self.active.iter().any(|g| g.root == root)
    }

    pub fn groups(&self) -> &[IgnitionGroup] {
        &self.active
    }

    pub fn active_roots(&self) -> impl Iterator<Item = FrontHandle> + '_ {
        self.active.iter().map(|g| g.root)
    }

    /// Whether any active group holds `handle` as its root or a leaf.
    pub fn references(&self, world: &World, handle: FrontHandle) -> bool {
        self.active.iter().any(|g| g.references(world, handle))
    }

    /// Check every active group once and retire the ones whose leaves met.
    ///
    /// Groups are evaluated first and removed afterwards, so a retirement never
    /// affects which other groups get checked this tick.
    pub fn tick(&mut self, world: &mut World) -> Vec<Convergence> {
        let mut converged = Vec::new();
        let mut retired = Vec::new();

        for group in &self.active {
            match Self::check(world, group) {
                Check::Burning => {}
                Check::Converged(c) => {
                    converged.push(c);
                    retired.push(group.root);
                }
                Check::Stale => {
                    log::warn!("Ignition group {:?} lost its fronts, dropping it", group.root);
                    retired.push(group.root);
                }
            }
        }

        for c in &converged {
            for leaf in [c.left, c.right] {
                if let Ok(front) = world.query_one_mut::<&mut FireFront>(leaf) {
                    front.freeze();
                }
            }
            log::info!(
                "Ignition {:?} engulfed its platform (leaf gap {:.2})",
                c.root,
                c.distance
            );
        }

        if !retired.is_empty() {
            self.active.retain(|g| !retired.contains(&g.root));
        }
        converged
    }

    fn check(world: &World, group: &IgnitionGroup) -> Check {
        let Some((left, right)) = group.leaves(world) else {
            return Check::Stale;
        };
        let position = |handle| world.get::<&Transform>(handle).ok().map(|t| t.position);
        let threshold = world.get::<&FireFront>(left).ok().map(|f| f.spread_distance);
        let (Some(left_position), Some(right_position), Some(threshold)) =
            (position(left), position(right), threshold)
        else {
            return Check::Stale;
        };

        let distance = left_position.distance(right_position);
        if distance < threshold {
            Check::Converged(Convergence {
                root: group.root,
                left,
                right,
                distance,
            })
        } else {
            Check::Burning
        }
    }
}

impl GroupRegistry for IgnitionTracker {
    fn register(&mut self, world: &World, root: FrontHandle) -> bool {
        let group = IgnitionGroup { root };
        if group.leaves(world).is_none() {
            log::debug!("Not tracking {:?}: root needs both leaves", root);
            return false;
        }
        if self.is_active(root) {
            return false;
        }
        self.active.push(group);
        true
    }
}
