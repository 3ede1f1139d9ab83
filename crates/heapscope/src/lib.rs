//! Heapscope: an in-memory model of heap allocation history for a 2D
//! pan/zoom viewer over the address × logical-time plane.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the heapscope sub-crates. For most users, adding `heapscope` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use heapscope::prelude::*;
//!
//! let mut history = HeapHistory::new();
//! history.record_malloc(0x1000, 64, HeapId(0));
//! history.record_malloc(0x2000, 128, HeapId(0));
//! history.record_free(0x1000, HeapId(0));
//!
//! // Look at everything ever observed, then zoom in 2x around the center.
//! history.set_current_window_to_global();
//! history.zoom_to_point(0.5, 0.5, 0.5, 0.5);
//!
//! // Triangle geometry for the renderer: six vertices per visible block.
//! let vertices = history.dump_vertices_for_active_window();
//! assert_eq!(vertices.len() % 6, 0);
//! ```
//!
//! # Crates
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`model`] | `heapscope-core` | `HeapId`, windows, saturating arithmetic |
//! | [`history`] | `heapscope-history` | blocks, conflicts, the query engine |
//! | [`trace`] | `heapscope-trace` | binary trace streams and replay |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: ids, saturating arithmetic, window models.
pub mod model {
    pub use heapscope_core::*;
}

/// The allocation-history engine and geometry export.
pub mod history {
    pub use heapscope_history::*;
}

/// Binary trace streams and replay.
pub mod trace {
    pub use heapscope_trace::*;
}

/// The types most users need, in one import.
pub mod prelude {
    pub use heapscope_core::{ContinuousHeapWindow, HeapId, HeapWindow};
    pub use heapscope_history::{ConflictKind, HeapBlock, HeapConflict, HeapHistory, HeapVertex};
    pub use heapscope_trace::{replay_into, TraceEvent, TraceReader, TraceWriter};
}
