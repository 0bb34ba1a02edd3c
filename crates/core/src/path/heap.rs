//! Arena-backed binary heap for the A* open set.
//! Items live in an external arena; the heap stores indices and keeps each
//! item's heap slot up to date through the arena so membership checks and
//! re-sifts after key mutation stay O(1)/O(log n).

use crate::types::CellIndex;

/// Caller-supplied total order plus the per-item heap-slot field.
pub trait HeapOrder {
    /// True when `a` must pop before `b`.
    fn precedes(&self, a: CellIndex, b: CellIndex) -> bool;
    fn heap_slot(&self, id: CellIndex) -> usize;
    fn set_heap_slot(&mut self, id: CellIndex, slot: usize);
}

/// Fixed-capacity binary heap. Capacity is sized to the number of grid cells;
/// at most one entry per cell can be open at a time, so exceeding it is a
/// programming error, not a recoverable condition.
pub struct OpenHeap {
    ids: Vec<CellIndex>,
    capacity: usize,
}

impl OpenHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { ids: Vec::with_capacity(capacity), capacity }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn push<A: HeapOrder>(&mut self, arena: &mut A, id: CellIndex) {
        assert!(self.ids.len() < self.capacity, "open set exceeded its cell capacity");
        arena.set_heap_slot(id, self.ids.len());
        self.ids.push(id);
        self.sift_up(arena, self.ids.len() - 1);
    }

    /// Removes and returns the highest-priority item: swap root with the last
    /// slot, shrink, sift the new root down.
    pub fn pop<A: HeapOrder>(&mut self, arena: &mut A) -> Option<CellIndex> {
        let first = *self.ids.first()?;
        let last = self.ids.pop().expect("non-empty after first() succeeded");
        if !self.ids.is_empty() {
            self.ids[0] = last;
            arena.set_heap_slot(last, 0);
            self.sift_down(arena, 0);
        }
        Some(first)
    }

    /// Membership check through the item's recorded slot. A stale slot from
    /// an earlier residence cannot false-positive: the slot is only trusted
    /// when the heap actually stores `id` there.
    pub fn contains<A: HeapOrder>(&self, arena: &A, id: CellIndex) -> bool {
        let slot = arena.heap_slot(id);
        slot < self.ids.len() && self.ids[slot] == id
    }

    /// Re-sift after the caller mutated the item's ordering key. Keys only
    /// ever improve during a search, so sifting up suffices.
    pub fn update<A: HeapOrder>(&mut self, arena: &mut A, id: CellIndex) {
        let slot = arena.heap_slot(id);
        debug_assert!(slot < self.ids.len() && self.ids[slot] == id);
        self.sift_up(arena, slot);
    }

    fn sift_up<A: HeapOrder>(&mut self, arena: &mut A, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !arena.precedes(self.ids[slot], self.ids[parent]) {
                break;
            }
            self.swap_slots(arena, slot, parent);
            slot = parent;
        }
    }

    fn sift_down<A: HeapOrder>(&mut self, arena: &mut A, mut slot: usize) {
        loop {
            let left = slot * 2 + 1;
            let right = slot * 2 + 2;
            let mut best = slot;
            if left < self.ids.len() && arena.precedes(self.ids[left], self.ids[best]) {
                best = left;
            }
            if right < self.ids.len() && arena.precedes(self.ids[right], self.ids[best]) {
                best = right;
            }
            if best == slot {
                return;
            }
            self.swap_slots(arena, slot, best);
            slot = best;
        }
    }

    fn swap_slots<A: HeapOrder>(&mut self, arena: &mut A, a: usize, b: usize) {
        self.ids.swap(a, b);
        arena.set_heap_slot(self.ids[a], a);
        arena.set_heap_slot(self.ids[b], b);
    }
}
