//! The [`HeapId`] identifier newtype.

use std::fmt;

/// Identifies one of up to 256 independent heaps in a trace.
///
/// Heaps are logically independent address spaces: the same address on two
/// different heaps never refers to the same allocation, and the engine keys
/// its live-block index by `(address, HeapId)` pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapId(pub u8);

impl HeapId {
    /// The default heap for traces that do not distinguish heaps.
    pub const DEFAULT: HeapId = HeapId(0);
}

impl fmt::Display for HeapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for HeapId {
    fn from(v: u8) -> Self {
        Self(v)
    }
}
