//! Trace recording writer.

use std::io::Write;

use crate::codec::{encode_event, encode_header};
use crate::error::TraceError;
use crate::event::TraceEvent;

/// Writes a trace to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production code
/// can use `BufWriter<File>`. The header is written immediately on
/// construction.
///
/// # Examples
///
/// ```
/// use heapscope_core::HeapId;
/// use heapscope_trace::{TraceEvent, TraceReader, TraceWriter};
///
/// let mut buf = Vec::new();
/// let mut writer = TraceWriter::new(&mut buf).unwrap();
/// writer
///     .write_event(&TraceEvent::Alloc { heap: HeapId(0), address: 0x1000, size: 64 })
///     .unwrap();
/// assert_eq!(writer.events_written(), 1);
/// drop(writer);
///
/// let mut reader = TraceReader::open(buf.as_slice()).unwrap();
/// let event = reader.next_event().unwrap().unwrap();
/// assert_eq!(event, TraceEvent::Alloc { heap: HeapId(0), address: 0x1000, size: 64 });
/// assert!(reader.next_event().unwrap().is_none());
/// ```
pub struct TraceWriter<W: Write> {
    writer: W,
    events_written: u64,
}

impl<W: Write> TraceWriter<W> {
    /// Open a trace stream, writing the header.
    pub fn new(mut writer: W) -> Result<Self, TraceError> {
        encode_header(&mut writer)?;
        Ok(Self {
            writer,
            events_written: 0,
        })
    }

    /// Append one event record.
    pub fn write_event(&mut self, event: &TraceEvent) -> Result<(), TraceError> {
        encode_event(&mut self.writer, event)?;
        self.events_written += 1;
        Ok(())
    }

    /// Number of events written so far.
    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> Result<W, TraceError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
