//! Generic object pool.
//!
//! The pool only stores parked items. What "activating" or "deactivating" an
//! item means is supplied by a [`PoolHooks`] implementation, so the same pool
//! can recycle ECS entities, GPU buffers, or plain structs.

use std::collections::VecDeque;

use hecs::{Entity, World};

use crate::Active;

/// Side effects run when an item leaves or enters the pool.
pub trait PoolHooks<T> {
    /// Called on an item just handed out by [`ObjectPool::acquire`].
    fn activate(&mut self, item: &T);
    /// Called on an item before it is parked by [`ObjectPool::release`].
    fn deactivate(&mut self, item: &T);
}

/// FIFO pool of reusable items.
#[derive(Debug)]
pub struct ObjectPool<T> {
    available: VecDeque<T>,
}

impl<T> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObjectPool<T> {
    pub fn new() -> Self {
        Self {
            available: VecDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            available: VecDeque::with_capacity(capacity),
        }
    }

    /// Take the oldest parked item and activate it. Returns `None` when the
    /// pool is empty; the caller decides whether to allocate instead.
    pub fn acquire<H: PoolHooks<T> + ?Sized>(&mut self, hooks: &mut H) -> Option<T> {
        let item = self.available.pop_front()?;
        hooks.activate(&item);
        Some(item)
    }

    /// Deactivate `item` and park it for reuse.
    pub fn release<H: PoolHooks<T> + ?Sized>(&mut self, item: T, hooks: &mut H) {
        hooks.deactivate(&item);
        self.available.push_back(item);
    }

    /// Park `count` freshly made items, deactivating each.
    pub fn prefill<H, F>(&mut self, count: usize, hooks: &mut H, mut make: F)
    where
        H: PoolHooks<T> + ?Sized,
        F: FnMut(&mut H) -> T,
    {
        self.available.reserve(count);
        for _ in 0..count {
            let item = make(hooks);
            self.release(item, hooks);
        }
    }

    /// Number of parked items.
    pub fn available(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}

/// Entities are activated by tagging them [`Active`].
impl PoolHooks<Entity> for World {
    fn activate(&mut self, item: &Entity) {
        if self.insert_one(*item, Active).is_err() {
            log::warn!("Pooled entity {:?} no longer exists", item);
        }
    }

    fn deactivate(&mut self, item: &Entity) {
        match self.remove_one::<Active>(*item) {
            // An entity that was never activated has no tag to remove.
            Ok(Active) | Err(hecs::ComponentError::MissingComponent(_)) => {}
            Err(err) => log::warn!("Could not deactivate pooled entity {:?}: {}", item, err),
        }
    }
}
