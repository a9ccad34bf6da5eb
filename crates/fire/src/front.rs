//! Fire fronts: one burning point each, and the spread step that walks a
//! chain of them along the terrain.
//!
//! Fronts live in a `hecs::World` as `(Transform, FireFront, Active)`. All
//! cross-front links (`root`, `left_leaf`, `right_leaf`) are plain entity
//! handles. They never own anything; the pool owns the entities.

use engine_core::{Transform, Vec3, World};
use physics::{SurfaceHit, TerrainQuery};

use crate::{FireConfig, FrontFactory, FrontHandle, GroupRegistry};

/// Which way a front walks along its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FireDirection {
    /// Against the front's local right axis.
    Left,
    /// Along the front's local right axis.
    Right,
    /// Both ways at once. Only ignition roots use this.
    Both,
}

impl FireDirection {
    /// Single directions this front spreads into, in left-then-right order.
    pub fn spread_directions(self) -> &'static [FireDirection] {
        match self {
            FireDirection::Left => &[FireDirection::Left],
            FireDirection::Right => &[FireDirection::Right],
            FireDirection::Both => &[FireDirection::Left, FireDirection::Right],
        }
    }

    /// Multiplier applied to local right for a single direction.
    pub fn sign(self) -> f32 {
        match self {
            FireDirection::Left => -1.0,
            FireDirection::Right => 1.0,
            FireDirection::Both => 0.0,
        }
    }
}

/// Lifecycle of a front once it is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontState {
    /// Waiting for its spread time.
    Armed,
    /// Spread and lit at least one child.
    Spawned,
    /// Spread but found no surface in any direction.
    DeadEnd,
    /// Frozen because its group converged before it could spread.
    Engulfed,
}

/// Simulation state of one burning point. Position and orientation live in
/// the entity's [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireFront {
    pub direction: FireDirection,
    pub spread_delay: f32,
    pub spread_distance: f32,
    /// Simulation time at which the front tries to spread.
    pub spread_at: f32,
    /// Set once, on the first spread attempt or when frozen.
    pub has_spread: bool,
    pub state: FrontState,
    /// Ignition root this front descends from. `None` on roots.
    pub root: Option<FrontHandle>,
    /// Roots only: current outermost front of the left chain.
    pub left_leaf: Option<FrontHandle>,
    /// Roots only: current outermost front of the right chain.
    pub right_leaf: Option<FrontHandle>,
}

impl FireFront {
    /// A freshly lit front that will spread `config.spread_delay` after `now`.
    pub fn new(direction: FireDirection, config: &FireConfig, now: f32) -> Self {
        Self {
            direction,
            spread_delay: config.spread_delay,
            spread_distance: config.spread_distance,
            spread_at: now + config.spread_delay,
            has_spread: false,
            state: FrontState::Armed,
            root: None,
            left_leaf: None,
            right_leaf: None,
        }
    }

    pub fn with_root(mut self, root: Option<FrontHandle>) -> Self {
        self.root = root;
        self
    }

    pub fn is_root(&self) -> bool {
        self.direction == FireDirection::Both
    }

    pub fn is_due(&self, now: f32) -> bool {
        !self.has_spread && now >= self.spread_at
    }

    pub fn leaf(&self, direction: FireDirection) -> Option<FrontHandle> {
        match direction {
            FireDirection::Left => self.left_leaf,
            FireDirection::Right => self.right_leaf,
            FireDirection::Both => None,
        }
    }

    fn set_leaf(&mut self, direction: FireDirection, leaf: FrontHandle) {
        match direction {
            FireDirection::Left => self.left_leaf = Some(leaf),
            FireDirection::Right => self.right_leaf = Some(leaf),
            FireDirection::Both => {}
        }
    }

    /// Stop this front from ever spreading.
    pub fn freeze(&mut self) {
        if !self.has_spread {
            self.has_spread = true;
            self.state = FrontState::Engulfed;
        }
    }
}

/// Everything a spread step reads but does not own.
pub struct SpreadContext<'a, Q: TerrainQuery + ?Sized> {
    pub terrain: &'a Q,
    pub config: &'a FireConfig,
    pub now: f32,
}

/// What one spread attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadOutcome {
    pub front: FrontHandle,
    pub children: Vec<(FireDirection, FrontHandle)>,
    /// Directions where neither probe found terrain.
    pub dead_ends: Vec<FireDirection>,
    /// The front was a root and its group is now tracked.
    pub registered: bool,
}

/// Locate terrain for the next front one step from `from` along `step`.
///
/// Terrain blocking the way wins and the front climbs onto it. Otherwise the
/// directional probe starts `probe_lift` above the candidate along `up`, and
/// the area probe only runs when that misses.
pub fn find_surface<Q: TerrainQuery + ?Sized>(
    terrain: &Q,
    from: Vec3,
    step: Vec3,
    up: Vec3,
    distance: f32,
    config: &FireConfig,
) -> Option<SurfaceHit> {
    let mask = config.ground_mask();
    let lift = up * config.probe_lift;
    if let Some(wall) = terrain.probe_ahead(from + lift, step, distance, mask) {
        return Some(wall);
    }
    let candidate = from + step * distance;
    terrain
        .probe_downward(candidate + lift, up, config.probe_max_distance, mask)
        .or_else(|| terrain.probe_area(candidate, config.fallback_probe_radius, mask))
}

/// Run the spread step for `handle`.
///
/// Returns `None` when the front is unknown or has already spread; a second
/// call is a no-op.
pub fn spread_front<Q, R>(
    world: &mut World,
    factory: &mut FrontFactory,
    registry: &mut R,
    ctx: &SpreadContext<'_, Q>,
    handle: FrontHandle,
) -> Option<SpreadOutcome>
where
    Q: TerrainQuery + ?Sized,
    R: GroupRegistry + ?Sized,
{
    let (transform, front) = {
        let (transform, front) = world
            .query_one_mut::<(&Transform, &mut FireFront)>(handle)
            .ok()?;
        if front.has_spread {
            return None;
        }
        front.has_spread = true;
        (*transform, *front)
    };

    let position = transform.position;
    let up = transform.up();
    let right = transform.right();
    // Roots become the group root of their own children.
    let child_root = if front.is_root() { Some(handle) } else { front.root };

    let mut outcome = SpreadOutcome {
        front: handle,
        children: Vec::with_capacity(2),
        dead_ends: Vec::new(),
        registered: false,
    };

    for &direction in front.direction.spread_directions() {
        let step = right * direction.sign();
        let surface = find_surface(
            ctx.terrain,
            position,
            step,
            up,
            front.spread_distance,
            ctx.config,
        );
        let Some(hit) = surface else {
            log::trace!("Front {:?} found no surface to the {:?}", handle, direction);
            outcome.dead_ends.push(direction);
            continue;
        };

        let child = factory.spawn(
            world,
            Transform::from_position_up(hit.point, hit.normal),
            FireFront::new(direction, ctx.config, ctx.now).with_root(child_root),
        );
        outcome.children.push((direction, child));

        if let Some(root) = child_root {
            promote_leaf(world, root, direction, child);
        }
    }

    let state = if outcome.children.is_empty() {
        FrontState::DeadEnd
    } else {
        FrontState::Spawned
    };
    if let Ok(front) = world.query_one_mut::<&mut FireFront>(handle) {
        front.state = state;
    }

    if front.is_root() && outcome.children.len() == 2 {
        outcome.registered = registry.register(world, handle);
    }

    log::debug!(
        "Front {:?} ({:?}) spread at t={:.2}: {} children, {} dead ends",
        handle,
        front.direction,
        ctx.now,
        outcome.children.len(),
        outcome.dead_ends.len()
    );
    Some(outcome)
}

/// Make `leaf` the root's outermost front in `direction`.
fn promote_leaf(world: &mut World, root: FrontHandle, direction: FireDirection, leaf: FrontHandle) {
    match world.query_one_mut::<&mut FireFront>(root) {
        Ok(root_front) if root_front.is_root() => root_front.set_leaf(direction, leaf),
        _ => log::warn!("Front {:?} points at missing root {:?}", leaf, root),
    }
}

/// Read-only snapshot of a front for renderers and debug overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontView {
    pub handle: FrontHandle,
    pub position: Vec3,
    pub up: Vec3,
    pub direction: FireDirection,
    pub state: FrontState,
    pub has_spread: bool,
    pub root: Option<FrontHandle>,
    pub left_leaf: Option<FrontHandle>,
    pub right_leaf: Option<FrontHandle>,
}

impl FrontView {
    pub fn new(handle: FrontHandle, transform: &Transform, front: &FireFront) -> Self {
        Self {
            handle,
            position: transform.position,
            up: transform.up(),
            direction: front.direction,
            state: front.state,
            has_spread: front.has_spread,
            root: front.root,
            left_leaf: front.left_leaf,
            right_leaf: front.right_leaf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IgnitionTracker;
    use physics::{ColliderHandle, LayerMask};
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Probe {
        Ahead(Vec3),
        Down(Vec3),
        Area(Vec3),
    }

    /// Flat ground at y = 0 for |x| <= half_width, with every probe recorded.
    /// An optional wall rises from the ground with its left face at `wall_x`.
    struct FlatGround {
        half_width: f32,
        area_hits: bool,
        wall_x: Option<f32>,
        calls: RefCell<Vec<Probe>>,
    }

    impl FlatGround {
        fn new(half_width: f32) -> Self {
            Self {
                half_width,
                area_hits: false,
                wall_x: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn hit(point: Vec3) -> SurfaceHit {
            Self::hit_facing(point, Vec3::Y)
        }

        fn hit_facing(point: Vec3, normal: Vec3) -> SurfaceHit {
            SurfaceHit {
                point,
                normal,
                distance: 0.0,
                collider: ColliderHandle::invalid(),
            }
        }
    }

    impl TerrainQuery for FlatGround {
        fn probe_ahead(
            &self,
            origin: Vec3,
            direction: Vec3,
            max: f32,
            _mask: LayerMask,
        ) -> Option<SurfaceHit> {
            self.calls.borrow_mut().push(Probe::Ahead(origin));
            let wall_x = self.wall_x?;
            let reach = origin.x + direction.x * max;
            (direction.x > 0.0 && origin.x < wall_x && reach >= wall_x)
                .then(|| Self::hit_facing(Vec3::new(wall_x, origin.y, 0.0), -Vec3::X))
        }

        fn probe_downward(
            &self,
            origin: Vec3,
            _up: Vec3,
            _max: f32,
            _mask: LayerMask,
        ) -> Option<SurfaceHit> {
            self.calls.borrow_mut().push(Probe::Down(origin));
            (origin.x.abs() <= self.half_width && origin.y >= 0.0)
                .then(|| Self::hit(Vec3::new(origin.x, 0.0, 0.0)))
        }

        fn probe_area(&self, center: Vec3, _radius: f32, _mask: LayerMask) -> Option<SurfaceHit> {
            self.calls.borrow_mut().push(Probe::Area(center));
            let x = center.x.clamp(-self.half_width, self.half_width);
            self.area_hits.then(|| Self::hit(Vec3::new(x, 0.0, 0.0)))
        }
    }

    struct Harness {
        world: World,
        factory: FrontFactory,
        tracker: IgnitionTracker,
        config: FireConfig,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                world: World::new(),
                factory: FrontFactory::new(),
                tracker: IgnitionTracker::new(),
                config: FireConfig::default(),
            }
        }

        fn root_at(&mut self, x: f32) -> FrontHandle {
            self.factory.spawn(
                &mut self.world,
                Transform::from_position(Vec3::new(x, 0.0, 0.0)),
                FireFront::new(FireDirection::Both, &self.config, 0.0),
            )
        }

        fn spread(&mut self, terrain: &FlatGround, handle: FrontHandle) -> Option<SpreadOutcome> {
            let ctx = SpreadContext {
                terrain,
                config: &self.config,
                now: 1.0,
            };
            spread_front(&mut self.world, &mut self.factory, &mut self.tracker, &ctx, handle)
        }

        fn front(&self, handle: FrontHandle) -> FireFront {
            *self.world.get::<&FireFront>(handle).unwrap()
        }

        fn position(&self, handle: FrontHandle) -> Vec3 {
            self.world.get::<&Transform>(handle).unwrap().position
        }
    }

    #[test]
    fn new_front_is_armed_until_delay() {
        let config = FireConfig::default();
        let front = FireFront::new(FireDirection::Left, &config, 2.0);
        assert_eq!(front.state, FrontState::Armed);
        assert!(!front.is_due(2.5));
        assert!(front.is_due(3.0));
    }

    #[test]
    fn root_spawns_left_and_right_children_and_registers() {
        let mut h = Harness::new();
        let ground = FlatGround::new(10.0);
        let root = h.root_at(0.0);

        let outcome = h.spread(&ground, root).unwrap();
        assert_eq!(outcome.children.len(), 2);
        assert!(outcome.registered);
        assert!(h.tracker.is_active(root));

        let (left_dir, left) = outcome.children[0];
        let (right_dir, right) = outcome.children[1];
        assert_eq!(left_dir, FireDirection::Left);
        assert_eq!(right_dir, FireDirection::Right);
        assert_eq!(h.position(left), Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(h.position(right), Vec3::new(2.0, 0.0, 0.0));

        let root_front = h.front(root);
        assert_eq!(root_front.left_leaf, Some(left));
        assert_eq!(root_front.right_leaf, Some(right));
        assert_eq!(root_front.state, FrontState::Spawned);
        assert_eq!(h.front(left).root, Some(root));
        assert_eq!(h.front(left).left_leaf, None);
        assert_eq!(h.front(right).direction, FireDirection::Right);
    }

    #[test]
    fn second_spread_is_a_noop() {
        let mut h = Harness::new();
        let ground = FlatGround::new(10.0);
        let root = h.root_at(0.0);
        assert!(h.spread(&ground, root).is_some());
        let fronts_after_first = h.world.len();
        assert!(h.spread(&ground, root).is_none());
        assert_eq!(h.world.len(), fronts_after_first);
        assert!(h.front(root).has_spread);
    }

    #[test]
    fn directional_probe_takes_precedence() {
        let mut h = Harness::new();
        let mut ground = FlatGround::new(10.0);
        ground.area_hits = true;
        let root = h.root_at(0.0);
        h.spread(&ground, root).unwrap();
        let calls = ground.calls.borrow();
        assert!(!calls.iter().any(|c| matches!(c, Probe::Area(_))));
        // Per direction: look ahead from the lifted front, then probe down
        // from the lifted candidate.
        assert_eq!(
            *calls,
            vec![
                Probe::Ahead(Vec3::new(0.0, 0.5, 0.0)),
                Probe::Down(Vec3::new(-2.0, 0.5, 0.0)),
                Probe::Ahead(Vec3::new(0.0, 0.5, 0.0)),
                Probe::Down(Vec3::new(2.0, 0.5, 0.0)),
            ]
        );
    }

    #[test]
    fn blocking_wall_turns_the_chain_upward() {
        let mut h = Harness::new();
        let mut ground = FlatGround::new(10.0);
        ground.wall_x = Some(1.0);
        let root = h.root_at(0.0);
        let outcome = h.spread(&ground, root).unwrap();
        assert_eq!(outcome.children.len(), 2);

        let (dir, climber) = outcome.children[1];
        assert_eq!(dir, FireDirection::Right);
        assert_eq!(h.position(climber), Vec3::new(1.0, 0.5, 0.0));
        let up = h.world.get::<&Transform>(climber).unwrap().up();
        assert!((up - -Vec3::X).length() < 1e-5);
        // Local right on the wall points up it.
        let right = h.world.get::<&Transform>(climber).unwrap().right();
        assert!((right - Vec3::Y).length() < 1e-5);

        // The wall face answered; the right candidate was never probed.
        let calls = ground.calls.borrow();
        assert!(!calls.contains(&Probe::Down(Vec3::new(2.0, 0.5, 0.0))));
        assert!(!calls.iter().any(|c| matches!(c, Probe::Area(_))));
    }

    #[test]
    fn area_probe_used_when_ray_misses() {
        let mut h = Harness::new();
        let mut ground = FlatGround::new(1.0);
        ground.area_hits = true;
        let root = h.root_at(0.0);
        let outcome = h.spread(&ground, root).unwrap();
        assert_eq!(outcome.children.len(), 2);
        assert_eq!(h.position(outcome.children[1].1), Vec3::new(1.0, 0.0, 0.0));
        let areas = ground
            .calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Probe::Area(_)))
            .count();
        assert_eq!(areas, 2);
    }

    #[test]
    fn both_probes_missing_leaves_dead_root() {
        let mut h = Harness::new();
        let ground = FlatGround::new(1.0);
        let root = h.root_at(0.0);
        let outcome = h.spread(&ground, root).unwrap();
        assert!(outcome.children.is_empty());
        assert_eq!(outcome.dead_ends, vec![FireDirection::Left, FireDirection::Right]);
        assert!(!outcome.registered);
        let front = h.front(root);
        assert!(front.has_spread);
        assert_eq!(front.state, FrontState::DeadEnd);
        assert!(h.tracker.is_empty());
    }

    #[test]
    fn chain_child_replaces_root_leaf() {
        let mut h = Harness::new();
        let ground = FlatGround::new(10.0);
        let root = h.root_at(0.0);
        let first = h.spread(&ground, root).unwrap();
        let right = first.children[1].1;

        let next = h.spread(&ground, right).unwrap();
        assert_eq!(next.children.len(), 1);
        let (dir, grandchild) = next.children[0];
        assert_eq!(dir, FireDirection::Right);
        assert_eq!(h.position(grandchild), Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(h.front(grandchild).root, Some(root));
        assert_eq!(h.front(root).right_leaf, Some(grandchild));
        // Left side untouched.
        assert_eq!(h.front(root).left_leaf, Some(first.children[0].1));
    }

    #[test]
    fn freeze_only_marks_unspread_fronts_engulfed() {
        let config = FireConfig::default();
        let mut armed = FireFront::new(FireDirection::Left, &config, 0.0);
        armed.freeze();
        assert!(armed.has_spread);
        assert_eq!(armed.state, FrontState::Engulfed);

        let mut dead = FireFront::new(FireDirection::Left, &config, 0.0);
        dead.has_spread = true;
        dead.state = FrontState::DeadEnd;
        dead.freeze();
        assert_eq!(dead.state, FrontState::DeadEnd);
    }
}
