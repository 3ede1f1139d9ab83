//! Block and conflict records produced by event recording.

use heapscope_core::HeapId;

/// One allocation's lifetime on one heap.
///
/// Created when an allocation event is recorded and mutated in place when
/// the matching free or reallocation arrives; blocks are never removed from
/// the history (the block log is append-only, a freed block simply gets its
/// end tick set).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapBlock {
    /// Start address of the allocation.
    pub address: u64,
    /// Size of the allocation in address units.
    pub size: u64,
    /// The heap the allocation belongs to.
    pub heap_id: HeapId,
    /// Tick at which the block was allocated.
    pub alloc_tick: u32,
    /// Tick at which the block was freed or reallocated away; `None` while
    /// the block is still live.
    pub free_tick: Option<u32>,
}

impl HeapBlock {
    /// A freshly allocated, still-live block.
    pub fn new(address: u64, size: u64, heap_id: HeapId, alloc_tick: u32) -> Self {
        Self {
            address,
            size,
            heap_id,
            alloc_tick,
            free_tick: None,
        }
    }

    /// `true` while no free/realloc has closed the block.
    pub fn is_live(&self) -> bool {
        self.free_tick.is_none()
    }

    /// One past the last address covered by the block. Saturates at the top
    /// of the address space rather than wrapping.
    pub fn address_end(&self) -> u64 {
        self.address.saturating_add(self.size)
    }

    /// End of the block's tick interval: its free tick, or `now` while live.
    pub fn end_tick(&self, now: u32) -> u32 {
        self.free_tick.unwrap_or(now)
    }

    /// `true` if `address` falls inside the block's half-open address range.
    pub fn contains_address(&self, address: u64) -> bool {
        address >= self.address && address < self.address_end()
    }

    /// `true` if the half-open address range `[self.address, address_end)`
    /// intersects the inclusive viewport range `[lo, hi]`.
    ///
    /// A zero-sized block has an empty range and intersects nothing,
    /// matching [`contains_address`](Self::contains_address).
    pub fn intersects_address_range(&self, lo: u64, hi: u64) -> bool {
        self.address < self.address_end() && self.address <= hi && self.address_end() > lo
    }

    /// `true` if the block's tick interval `[alloc_tick, end]` (end clipped
    /// to `now` while live) intersects the inclusive range `[lo, hi]`.
    pub fn intersects_tick_range(&self, lo: u32, hi: u32, now: u32) -> bool {
        self.alloc_tick <= hi && self.end_tick(now) >= lo
    }

    /// `true` if the block existed at `tick` (allocated at or before it,
    /// not yet freed, end inclusive).
    pub fn covers_tick(&self, tick: u32, now: u32) -> bool {
        self.alloc_tick <= tick && tick <= self.end_tick(now)
    }
}

/// Whether the anomalous event in a [`HeapConflict`] was an allocation or
/// a free.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    /// An allocation landed on an address that already carried a live block
    /// on the same heap.
    Allocation,
    /// A free (or the close half of a realloc) targeted an address with no
    /// live block on that heap.
    Free,
}

/// An immutable record of a detected heap-protocol anomaly.
///
/// Conflicts are the product the tool exists to surface; they are logged
/// and processing continues, never aborting on a corrupt trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapConflict {
    /// Tick at which the anomaly was observed.
    pub tick: u32,
    /// Address involved in the anomalous event.
    pub address: u64,
    /// Which side of the protocol the event was on.
    pub kind: ConflictKind,
}

impl HeapConflict {
    /// Record a conflict at `tick` for `address`.
    pub fn new(tick: u32, address: u64, kind: ConflictKind) -> Self {
        Self {
            tick,
            address,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_block_end_clips_to_now() {
        let b = HeapBlock::new(100, 16, HeapId(0), 3);
        assert!(b.is_live());
        assert_eq!(b.end_tick(9), 9);

        let mut closed = b;
        closed.free_tick = Some(5);
        assert!(!closed.is_live());
        assert_eq!(closed.end_tick(9), 5);
    }

    #[test]
    fn address_containment_is_half_open() {
        let b = HeapBlock::new(100, 16, HeapId(0), 0);
        assert!(b.contains_address(100));
        assert!(b.contains_address(115));
        assert!(!b.contains_address(116));
        assert!(!b.contains_address(99));
    }

    #[test]
    fn zero_sized_block_contains_nothing() {
        let b = HeapBlock::new(100, 0, HeapId(0), 0);
        assert!(!b.contains_address(100));
        assert!(!b.intersects_address_range(0, u64::MAX));
    }

    #[test]
    fn address_end_saturates() {
        let b = HeapBlock::new(u64::MAX - 8, 32, HeapId(0), 0);
        assert_eq!(b.address_end(), u64::MAX);
    }

    #[test]
    fn tick_intersection_is_inclusive() {
        let mut b = HeapBlock::new(0, 1, HeapId(0), 5);
        b.free_tick = Some(8);
        assert!(b.intersects_tick_range(8, 10, 20));
        assert!(b.intersects_tick_range(0, 5, 20));
        assert!(!b.intersects_tick_range(9, 10, 20));
        assert!(!b.intersects_tick_range(0, 4, 20));
    }
}
