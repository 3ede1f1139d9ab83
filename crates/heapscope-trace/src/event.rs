//! Structured allocation events and replay into a history.

use heapscope_core::HeapId;
use heapscope_history::HeapHistory;

/// One structured allocation event, in the shape the history engine
/// consumes.
///
/// Events carry no tick: the engine's event counter assigns logical time
/// in delivery order, which is why traces must be replayed in the order
/// they were recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// An allocation of `size` address units at `address`.
    Alloc {
        /// Heap the allocation belongs to.
        heap: HeapId,
        /// Start address.
        address: u64,
        /// Size in address units.
        size: u64,
    },
    /// A free of the block at `address`.
    Free {
        /// Heap the free targets.
        heap: HeapId,
        /// Address being freed.
        address: u64,
    },
    /// A reallocation moving a block from `old_address` to `new_address`.
    Realloc {
        /// Heap the reallocation targets.
        heap: HeapId,
        /// Address of the block being moved.
        old_address: u64,
        /// Address of the replacement block.
        new_address: u64,
        /// Size of the replacement block.
        size: u64,
    },
}

impl TraceEvent {
    /// Apply this event to a history via the corresponding recording
    /// operation.
    pub fn apply(&self, history: &mut HeapHistory) {
        match *self {
            Self::Alloc {
                heap,
                address,
                size,
            } => history.record_malloc(address, size, heap),
            Self::Free { heap, address } => history.record_free(address, heap),
            Self::Realloc {
                heap,
                old_address,
                new_address,
                size,
            } => history.record_realloc(old_address, new_address, size, heap),
        }
    }
}

/// Apply a sequence of events to a history in order.
///
/// # Examples
///
/// ```
/// use heapscope_core::HeapId;
/// use heapscope_history::HeapHistory;
/// use heapscope_trace::{replay_into, TraceEvent};
///
/// let mut history = HeapHistory::new();
/// replay_into(
///     &mut history,
///     [
///         TraceEvent::Alloc { heap: HeapId(0), address: 0x1000, size: 64 },
///         TraceEvent::Free { heap: HeapId(0), address: 0x1000 },
///     ],
/// );
/// assert_eq!(history.blocks().len(), 1);
/// ```
pub fn replay_into<I>(history: &mut HeapHistory, events: I)
where
    I: IntoIterator<Item = TraceEvent>,
{
    for event in events {
        event.apply(history);
    }
}
