//! Front allocation through the entity pool.

use engine_core::{Active, ObjectPool, Transform, World};

use crate::{FireFront, FrontHandle};

/// Creates and recycles front entities.
///
/// New fronts reuse a parked entity when one is available and only spawn a
/// fresh one when the pool is dry.
#[derive(Debug, Default)]
pub struct FrontFactory {
    pool: ObjectPool<FrontHandle>,
    /// Entities ever spawned by this factory.
    allocated: usize,
    /// Fronts served from the pool.
    reused: usize,
}

impl FrontFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `count` blank entities so early spreads do not allocate.
    pub fn prewarm(&mut self, world: &mut World, count: usize) {
        let mut spawned = 0;
        self.pool.prefill(count, world, |world| {
            spawned += 1;
            world.spawn((Transform::default(),))
        });
        self.allocated += spawned;
    }

    /// Light a front at `transform`.
    pub fn spawn(
        &mut self,
        world: &mut World,
        transform: Transform,
        front: FireFront,
    ) -> FrontHandle {
        if let Some(entity) = self.pool.acquire(world) {
            if world.insert(entity, (transform, front)).is_ok() {
                self.reused += 1;
                return entity;
            }
            log::warn!("Pooled front {:?} vanished, allocating instead", entity);
        } else {
            log::debug!("Front pool empty, allocating");
        }
        self.allocated += 1;
        world.spawn((transform, front, Active))
    }

    /// Deactivate `handle` and park it for reuse.
    pub fn release(&mut self, world: &mut World, handle: FrontHandle) {
        self.pool.release(handle, world);
    }

    pub fn available(&self) -> usize {
        self.pool.available()
    }

    pub fn allocated(&self) -> usize {
        self.allocated
    }

    pub fn reused(&self) -> usize {
        self.reused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FireConfig, FireDirection};
    use engine_core::Vec3;

    fn front() -> FireFront {
        FireFront::new(FireDirection::Left, &FireConfig::default(), 0.0)
    }

    #[test]
    fn spawn_allocates_when_pool_empty() {
        let mut world = World::new();
        let mut factory = FrontFactory::new();
        let e = factory.spawn(&mut world, Transform::default(), front());
        assert!(world.get::<&Active>(e).is_ok());
        assert_eq!(factory.allocated(), 1);
        assert_eq!(factory.reused(), 0);
    }

    #[test]
    fn released_front_is_reused_with_new_state() {
        let mut world = World::new();
        let mut factory = FrontFactory::new();
        let e = factory.spawn(&mut world, Transform::default(), front());
        factory.release(&mut world, e);
        assert!(world.get::<&Active>(e).is_err());
        assert_eq!(factory.available(), 1);

        let mut fresh = front();
        fresh.direction = FireDirection::Right;
        let at = Transform::from_position(Vec3::new(3.0, 1.0, 0.0));
        let again = factory.spawn(&mut world, at, fresh);
        assert_eq!(again, e);
        assert_eq!(factory.reused(), 1);
        assert_eq!(factory.allocated(), 1);
        assert!(world.get::<&Active>(e).is_ok());
        assert_eq!(world.get::<&FireFront>(e).unwrap().direction, FireDirection::Right);
        assert_eq!(world.get::<&Transform>(e).unwrap().position, Vec3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn prewarm_fills_pool_without_active_fronts() {
        let mut world = World::new();
        let mut factory = FrontFactory::new();
        factory.prewarm(&mut world, 4);
        assert_eq!(factory.available(), 4);
        assert_eq!(factory.allocated(), 4);
        assert_eq!(world.query::<&Active>().iter().count(), 0);

        factory.spawn(&mut world, Transform::default(), front());
        assert_eq!(factory.available(), 3);
        assert_eq!(factory.allocated(), 4);
        assert_eq!(world.query::<&Active>().iter().count(), 1);
    }
}
