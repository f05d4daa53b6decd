//! Fixed-capacity slot pool for in-flight call records.
//!
//! Storage for every slot is allocated once when the pool is built. Slots
//! are addressed by generational handles: releasing a slot bumps its
//! generation, so a stale handle can never reach the slot's next occupant.

use bitvec::prelude::*;
use extplay_core::{PlaybackError, PlaybackResult};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(0);

/// Handle to an occupied slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct SlotHandle {
    pool: u32,
    index: usize,
    generation: u32,
}

impl SlotHandle {
    /// Slot index within its pool
    pub fn index(&self) -> usize {
        self.index
    }

    /// Generation of the slot when this handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for SlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {} (gen {})", self.index, self.generation)
    }
}

/// Bounded pool of slots with an occupancy bitmap
pub struct SlotPool<T> {
    id: u32,
    slots: Vec<Option<T>>,
    generations: Vec<u32>,
    occupied: BitVec,
}

impl<T> SlotPool<T> {
    /// Create a pool with `capacity` slots
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            slots,
            generations: vec![0; capacity],
            occupied: bitvec![0; capacity],
        }
    }

    /// Total number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.occupied.count_ones()
    }

    /// Whether every slot is free
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied.not_any()
    }

    /// Store `value` in a free slot
    ///
    /// # Errors
    ///
    /// Returns `SlotsExhausted` if every slot is occupied
    pub fn acquire(&mut self, value: T) -> PlaybackResult<SlotHandle> {
        let index = self
            .occupied
            .first_zero()
            .ok_or(PlaybackError::SlotsExhausted {
                capacity: self.capacity(),
            })?;
        self.occupied.set(index, true);
        self.slots[index] = Some(value);
        Ok(SlotHandle {
            pool: self.id,
            index,
            generation: self.generations[index],
        })
    }

    /// Free a slot and take its value back
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlot` for a foreign, stale, or already released handle
    pub fn release(&mut self, handle: SlotHandle) -> PlaybackResult<T> {
        self.check(handle)?;
        self.occupied.set(handle.index, false);
        self.generations[handle.index] = self.generations[handle.index].wrapping_add(1);
        self.slots[handle.index].take().ok_or(PlaybackError::InvalidSlot {
            index: handle.index,
            generation: handle.generation,
        })
    }

    /// Borrow the value behind a live handle
    #[must_use]
    pub fn get(&self, handle: SlotHandle) -> Option<&T> {
        self.check(handle).ok()?;
        self.slots[handle.index].as_ref()
    }

    fn check(&self, handle: SlotHandle) -> PlaybackResult<()> {
        let live = handle.pool == self.id
            && self.occupied.get(handle.index).is_some_and(|bit| *bit)
            && self.generations[handle.index] == handle.generation;
        if live {
            Ok(())
        } else {
            Err(PlaybackError::InvalidSlot {
                index: handle.index,
                generation: handle.generation,
            })
        }
    }
}

impl<T> fmt::Debug for SlotPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotPool")
            .field("capacity", &self.capacity())
            .field("occupied", &self.occupied())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_acquire_release() {
        let mut pool = SlotPool::with_capacity(2);
        let a = pool.acquire("a").unwrap();
        let b = pool.acquire("b").unwrap();
        assert_ne!(a.index(), b.index());
        assert_eq!(pool.occupied(), 2);
        assert_eq!(pool.get(a), Some(&"a"));

        assert_eq!(pool.release(a).unwrap(), "a");
        assert_eq!(pool.occupied(), 1);
        assert_eq!(pool.release(b).unwrap(), "b");
        assert!(pool.is_empty());
    }

    #[test]
    fn test_exhaustion() {
        let mut pool = SlotPool::with_capacity(1);
        let _held = pool.acquire(1).unwrap();
        assert_eq!(
            pool.acquire(2).unwrap_err(),
            PlaybackError::SlotsExhausted { capacity: 1 }
        );
    }

    #[test]
    fn test_double_release_rejected() {
        let mut pool = SlotPool::with_capacity(2);
        let a = pool.acquire(()).unwrap();
        pool.release(a).unwrap();
        assert!(matches!(
            pool.release(a),
            Err(PlaybackError::InvalidSlot { index: 0, generation: 0 })
        ));
    }

    #[test]
    fn test_stale_handle_cannot_reach_new_occupant() {
        let mut pool = SlotPool::with_capacity(1);
        let old = pool.acquire(1).unwrap();
        pool.release(old).unwrap();
        let new = pool.acquire(2).unwrap();
        assert_eq!(old.index(), new.index());
        assert!(pool.get(old).is_none());
        assert!(pool.release(old).is_err());
        assert_eq!(pool.release(new).unwrap(), 2);
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let mut first = SlotPool::with_capacity(2);
        let mut second = SlotPool::with_capacity(2);
        let _mine = second.acquire(0).unwrap();
        let foreign = first.acquire(0).unwrap();
        assert!(second.release(foreign).is_err());
        assert_eq!(second.occupied(), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Acquire,
        Release(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Acquire), (0usize..8).prop_map(Op::Release)]
    }

    proptest! {
        #[test]
        fn prop_slots_disjoint_and_reusable(ops in proptest::collection::vec(op(), 1..64)) {
            let mut pool = SlotPool::with_capacity(4);
            let mut live: Vec<SlotHandle> = Vec::new();
            let mut released: Vec<SlotHandle> = Vec::new();

            for op in ops {
                match op {
                    Op::Acquire => match pool.acquire(()) {
                        Ok(handle) => {
                            prop_assert!(live.iter().all(|h| h.index() != handle.index()));
                            live.push(handle);
                        }
                        Err(err) => {
                            prop_assert_eq!(live.len(), 4);
                            prop_assert_eq!(err, PlaybackError::SlotsExhausted { capacity: 4 });
                        }
                    },
                    Op::Release(i) if i < live.len() => {
                        let handle = live.swap_remove(i);
                        prop_assert!(pool.release(handle).is_ok());
                        released.push(handle);
                    }
                    Op::Release(i) => {
                        if let Some(stale) = released.get(i) {
                            prop_assert!(pool.release(*stale).is_err());
                        }
                    }
                }
                prop_assert_eq!(pool.occupied(), live.len());
                let indices: HashSet<_> = live.iter().map(SlotHandle::index).collect();
                prop_assert_eq!(indices.len(), live.len());
            }
        }
    }
}
