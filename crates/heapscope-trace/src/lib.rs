//! Binary allocation-trace streams for heapscope.
//!
//! A trace is the serialized form of the event sequence the history engine
//! consumes: a short header (magic + format version) followed by tagged
//! allocate/free/reallocate records. [`TraceWriter`] produces the format,
//! [`TraceReader`] consumes it, and [`replay_into`] drives a
//! [`heapscope_history::HeapHistory`] from any event source.
//!
//! The on-wire encoding is owned entirely by this crate; the engine only
//! sees [`TraceEvent`] values in event order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod event;
pub mod reader;
pub mod writer;

pub use error::TraceError;
pub use event::{replay_into, TraceEvent};
pub use reader::{EventIter, TraceReader};
pub use writer::TraceWriter;

/// Magic bytes opening every trace stream.
pub const MAGIC: [u8; 4] = *b"HTRC";

/// Current trace format version.
pub const FORMAT_VERSION: u8 = 1;
