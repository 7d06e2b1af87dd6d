//! Fixed-capacity object pool
//!
//! Slots are allocated once at construction and recycled forever after.
//! When every slot is in use, `spawn` reclaims the oldest live slot instead
//! of growing.

use super::entity::Poolable;

/// Index of a slot inside one pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub usize);

/// Result of a spawn request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawned {
    pub slot: SlotId,
    /// The slot was live and has been taken over; callers must drop any
    /// reference they still hold to it
    pub reclaimed: bool,
}

#[derive(Debug)]
pub struct ObjectPool<T> {
    label: &'static str,
    slots: Vec<T>,
    /// Stack of free slot indices
    free: Vec<usize>,
    /// Spawn sequence number per slot, for picking the oldest on exhaustion
    spawned_at: Vec<u64>,
    spawn_seq: u64,
}

impl<T: Poolable> ObjectPool<T> {
    /// Create a pool with `capacity` slots (at least one)
    pub fn new(label: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            label,
            slots: (0..capacity).map(|_| T::default()).collect(),
            free: (0..capacity).rev().collect(),
            spawned_at: vec![0; capacity],
            spawn_seq: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn in_use_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Hand out a fresh slot, marked in use and alive with default per-kind state
    pub fn spawn(&mut self) -> Spawned {
        let (index, reclaimed) = match self.free.pop() {
            Some(index) => (index, false),
            None => {
                let oldest = (0..self.slots.len())
                    .min_by_key(|&i| self.spawned_at[i])
                    .unwrap_or(0);
                log::debug!("{} pool exhausted, reclaiming slot {}", self.label, oldest);
                (oldest, true)
            }
        };

        self.spawn_seq += 1;
        self.spawned_at[index] = self.spawn_seq;

        let slot = &mut self.slots[index];
        *slot = T::default();
        let body = slot.body_mut();
        body.in_use = true;
        body.alive = true;

        Spawned {
            slot: SlotId(index),
            reclaimed,
        }
    }

    /// Return a slot to the pool. Killing a free slot is ignored.
    pub fn kill(&mut self, slot: SlotId) {
        let Some(entity) = self.slots.get_mut(slot.0) else {
            return;
        };
        let body = entity.body_mut();
        if !body.in_use {
            return;
        }
        body.in_use = false;
        body.alive = false;
        self.free.push(slot.0);
    }

    /// Kill every live slot
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            self.kill(SlotId(index));
        }
    }

    pub fn get(&self, slot: SlotId) -> &T {
        &self.slots[slot.0]
    }

    pub fn get_mut(&mut self, slot: SlotId) -> &mut T {
        &mut self.slots[slot.0]
    }

    /// Every slot, live or not
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Entity, Hazard};
    use proptest::prelude::*;

    #[test]
    fn test_spawn_marks_alive_and_in_use() {
        let mut pool: ObjectPool<Hazard> = ObjectPool::new("hazard", 3);
        let spawned = pool.spawn();
        assert!(!spawned.reclaimed);
        let body = pool.get(spawned.slot).body();
        assert!(body.alive && body.in_use);
        assert_eq!(pool.in_use_count(), 1);
    }

    #[test]
    fn test_kill_frees_slot_for_reuse() {
        let mut pool: ObjectPool<Hazard> = ObjectPool::new("hazard", 1);
        let first = pool.spawn().slot;
        pool.get_mut(first).spin = 2.0;
        pool.kill(first);
        assert!(!pool.get(first).body.alive);
        assert_eq!(pool.in_use_count(), 0);

        let second = pool.spawn();
        assert!(!second.reclaimed);
        assert_eq!(second.slot, first);
        // Per-kind state is reset on reuse
        assert_eq!(pool.get(second.slot).spin, 0.0);
    }

    #[test]
    fn test_exhaustion_reclaims_oldest() {
        let mut pool: ObjectPool<Hazard> = ObjectPool::new("hazard", 3);
        let first = pool.spawn().slot;
        pool.spawn();
        pool.spawn();

        let extra = pool.spawn();
        assert!(extra.reclaimed);
        assert_eq!(extra.slot, first);
        assert_eq!(pool.in_use_count(), 3);
    }

    #[test]
    fn test_double_kill_is_ignored() {
        let mut pool: ObjectPool<Hazard> = ObjectPool::new("hazard", 2);
        let slot = pool.spawn().slot;
        pool.kill(slot);
        pool.kill(slot);
        assert_eq!(pool.in_use_count(), 0);
        pool.spawn();
        pool.spawn();
        assert_eq!(pool.in_use_count(), 2);
        assert!(pool.spawn().reclaimed);
    }

    #[test]
    fn test_clear_kills_everything() {
        let mut pool: ObjectPool<Hazard> = ObjectPool::new("hazard", 4);
        for _ in 0..4 {
            pool.spawn();
        }
        pool.clear();
        assert_eq!(pool.in_use_count(), 0);
        assert!(pool.iter_mut().all(|h| !h.body.in_use && !h.body.alive));
    }

    proptest! {
        #[test]
        fn prop_in_use_never_exceeds_capacity(
            capacity in 1usize..16,
            ops in proptest::collection::vec((any::<bool>(), 0usize..16), 0..200),
        ) {
            let mut pool: ObjectPool<Hazard> = ObjectPool::new("hazard", capacity);
            for (spawn, index) in ops {
                if spawn {
                    pool.spawn();
                } else {
                    pool.kill(SlotId(index % capacity));
                }
                let live = pool.iter_mut().filter(|h| h.body.in_use).count();
                prop_assert!(live <= capacity);
                prop_assert_eq!(live, pool.in_use_count());
                prop_assert_eq!(pool.capacity(), capacity);
            }
        }
    }
}
