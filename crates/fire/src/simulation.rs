//! The fire simulation facade: owns fronts, pool, tracker and clock, and
//! steps them in a fixed order once per frame.

use std::collections::HashSet;

use engine_core::{Active, SimClock, Transform, Vec2, Vec3, World};
use physics::TerrainQuery;

use crate::{
    spread_front, Convergence, FireConfig, FireDirection, FireError, FireFront, FrontFactory,
    FrontHandle, FrontView, Ignition, IgnitionSource, IgnitionTracker, SpreadContext,
    SpreadOutcome,
};

/// What happened during one [`FireSimulation::advance`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Simulation time the tick ran at.
    pub now: f32,
    pub spreads: Vec<SpreadOutcome>,
    pub convergences: Vec<Convergence>,
    /// Roots lit by sparks this tick.
    pub ignitions: Vec<FrontHandle>,
}

/// Engine-agnostic fire simulation over a terrain backend.
pub struct FireSimulation<Q: TerrainQuery> {
    world: World,
    terrain: Q,
    config: FireConfig,
    clock: SimClock,
    factory: FrontFactory,
    tracker: IgnitionTracker,
    ignition: IgnitionSource,
}

impl<Q: TerrainQuery> FireSimulation<Q> {
    /// Build a simulation. Fails if `config` does not validate.
    pub fn new(terrain: Q, config: FireConfig) -> Result<Self, FireError> {
        config.validate()?;
        let mut world = World::new();
        let mut factory = FrontFactory::new();
        if config.pool_prewarm > 0 {
            factory.prewarm(&mut world, config.pool_prewarm);
        }
        Ok(Self {
            world,
            terrain,
            config,
            clock: SimClock::new(),
            factory,
            tracker: IgnitionTracker::new(),
            ignition: IgnitionSource::new(),
        })
    }

    /// Step one frame.
    ///
    /// Order: every due front spreads against the same `now`, then the
    /// tracker checks convergence, then sparks that burned out this frame
    /// light new roots.
    pub fn advance(&mut self, delta_seconds: f32) -> TickReport {
        if !self.clock.advance(delta_seconds) {
            return TickReport {
                now: self.now(),
                ..Default::default()
            };
        }
        let now = self.now();
        let mut report = TickReport {
            now,
            ..Default::default()
        };

        let due: Vec<FrontHandle> = self
            .world
            .query::<(&FireFront, &Active)>()
            .iter()
            .filter(|(_, (front, _))| front.is_due(now))
            .map(|(handle, _)| handle)
            .collect();

        let ctx = SpreadContext {
            terrain: &self.terrain,
            config: &self.config,
            now,
        };
        for handle in due {
            if let Some(outcome) = spread_front(
                &mut self.world,
                &mut self.factory,
                &mut self.tracker,
                &ctx,
                handle,
            ) {
                report.spreads.push(outcome);
            }
        }

        report.convergences = self.tracker.tick(&mut self.world);

        let lit = self
            .ignition
            .update(now, &self.terrain, self.config.ground_mask());
        for ignition in lit {
            report.ignitions.push(self.light_root(ignition));
        }
        report
    }

    /// Light a root at `position` right away. It spreads after the configured
    /// delay.
    pub fn ignite(&mut self, position: Vec3) -> FrontHandle {
        let ignition = self.ignition.ignite(position);
        self.light_root(ignition)
    }

    /// Drop a spark at `position`; it lights a root on nearby terrain once its
    /// lifetime runs out.
    pub fn drop_spark(&mut self, position: Vec3) {
        self.ignition.drop_spark(
            position,
            self.now(),
            self.config.spark_lifetime,
            self.config.spark_radius,
        );
    }

    fn light_root(&mut self, ignition: Ignition) -> FrontHandle {
        let front = FireFront::new(FireDirection::Both, &self.config, self.now());
        let handle = self.factory.spawn(
            &mut self.world,
            Transform::from_position_up(ignition.position, ignition.up),
            front,
        );
        log::info!("Ignited {:?} at {:?}", handle, ignition.position);
        handle
    }

    /// Return a spent front to the pool.
    ///
    /// Fronts that may still spread, or that an active group or a burning
    /// descendant still points at, are refused.
    pub fn release_front(&mut self, handle: FrontHandle) -> Result<(), FireError> {
        let armed_roots = self.armed_roots();
        self.release_unless_referenced(handle, &armed_roots)
    }

    fn release_unless_referenced(
        &mut self,
        handle: FrontHandle,
        armed_roots: &HashSet<FrontHandle>,
    ) -> Result<(), FireError> {
        let front = match self.world.query_one_mut::<(&FireFront, &Active)>(handle) {
            Ok((front, _)) => *front,
            Err(_) => return Err(FireError::UnknownFront(handle)),
        };
        if !front.has_spread {
            return Err(FireError::StillBurning(handle));
        }
        if armed_roots.contains(&handle) || self.tracker.references(&self.world, handle) {
            return Err(FireError::InActiveGroup(handle));
        }
        self.factory.release(&mut self.world, handle);
        Ok(())
    }

    /// Roots with at least one descendant still waiting to spread.
    fn armed_roots(&self) -> HashSet<FrontHandle> {
        self.world
            .query::<(&FireFront, &Active)>()
            .iter()
            .filter(|(_, (front, _))| !front.has_spread)
            .filter_map(|(_, (front, _))| front.root)
            .collect()
    }

    /// Release every spent front whose position lies outside the rectangle
    /// `min..=max`. Returns how many went back to the pool.
    pub fn cull_outside(&mut self, min: Vec2, max: Vec2) -> usize {
        let outside: Vec<FrontHandle> = self
            .world
            .query::<(&Transform, &FireFront, &Active)>()
            .iter()
            .filter(|(_, (transform, front, _))| {
                let p = transform.position;
                front.has_spread && (p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y)
            })
            .map(|(handle, _)| handle)
            .collect();

        // Releasing spent fronts never changes which fronts are armed.
        let armed_roots = self.armed_roots();
        let released = outside
            .into_iter()
            .filter(|&handle| self.release_unless_referenced(handle, &armed_roots).is_ok())
            .count();
        if released > 0 {
            log::debug!("Culled {} off-screen fronts", released);
        }
        released
    }

    /// Snapshot of a live front.
    pub fn front(&self, handle: FrontHandle) -> Option<FrontView> {
        let mut query = self
            .world
            .query_one::<(&Transform, &FireFront, &Active)>(handle)
            .ok()?;
        let (transform, front, _) = query.get()?;
        Some(FrontView::new(handle, transform, front))
    }

    /// Snapshots of every live front.
    pub fn fronts(&self) -> Vec<FrontView> {
        self.world
            .query::<(&Transform, &FireFront, &Active)>()
            .iter()
            .map(|(handle, (transform, front, _))| FrontView::new(handle, transform, front))
            .collect()
    }

    /// Roots of ignition groups still burning toward each other.
    pub fn active_groups(&self) -> Vec<FrontHandle> {
        self.tracker.active_roots().collect()
    }

    pub fn pending_sparks(&self) -> usize {
        self.ignition.sparks().len()
    }

    /// Simulation time in seconds.
    pub fn now(&self) -> f32 {
        self.clock.elapsed_seconds()
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    pub fn config(&self) -> &FireConfig {
        &self.config
    }

    pub fn factory(&self) -> &FrontFactory {
        &self.factory
    }

    pub fn terrain(&self) -> &Q {
        &self.terrain
    }

    /// Mutable terrain access, e.g. to add platforms mid-run.
    pub fn terrain_mut(&mut self) -> &mut Q {
        &mut self.terrain
    }
}
