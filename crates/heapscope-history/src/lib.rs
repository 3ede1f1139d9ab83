//! Allocation-history engine for the heapscope viewer.
//!
//! [`HeapHistory`] ingests allocate/free/reallocate events, maintains the
//! append-only block log and its live-block index, records protocol
//! anomalies as [`HeapConflict`] entries, and answers spatial queries over
//! the address × tick plane for the viewer's pan/zoom viewport. Geometry
//! export turns the visible block set into a flat triangle-vertex buffer
//! for the external renderer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod history;
pub mod vertex;

pub use block::{ConflictKind, HeapBlock, HeapConflict};
pub use history::HeapHistory;
pub use vertex::HeapVertex;
