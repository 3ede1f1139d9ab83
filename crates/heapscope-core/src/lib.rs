//! Core types for the heapscope allocation-history viewer.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! [`HeapId`] identifier, the saturating float-to-unsigned arithmetic that
//! underpins all viewport navigation, and the two window models:
//! [`HeapWindow`] (exact unsigned bounds, used for the all-time extent) and
//! [`ContinuousHeapWindow`] (the navigable viewport driven by fractional
//! pan/zoom deltas).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod saturate;
pub mod window;

pub use error::WindowError;
pub use id::HeapId;
pub use saturate::{saturating_add_f64, Saturation, UnsignedAxis};
pub use window::{ContinuousHeapWindow, HeapWindow};
