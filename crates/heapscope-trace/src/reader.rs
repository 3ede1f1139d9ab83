//! Trace playback reader.

use std::io::Read;

use heapscope_history::HeapHistory;

use crate::codec::{decode_event, decode_header};
use crate::error::TraceError;
use crate::event::TraceEvent;

/// Reads a trace from a byte stream.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production code can
/// use `BufReader<File>`. The header is validated on construction.
pub struct TraceReader<R: Read> {
    reader: R,
    events_read: u64,
}

impl<R: Read> TraceReader<R> {
    /// Open a trace stream, reading and validating the header.
    pub fn open(mut reader: R) -> Result<Self, TraceError> {
        decode_header(&mut reader)?;
        Ok(Self {
            reader,
            events_read: 0,
        })
    }

    /// Read the next event, or `None` if the stream is exhausted.
    pub fn next_event(&mut self) -> Result<Option<TraceEvent>, TraceError> {
        let event = decode_event(&mut self.reader)?;
        if event.is_some() {
            self.events_read += 1;
        }
        Ok(event)
    }

    /// Number of events read so far.
    pub fn events_read(&self) -> u64 {
        self.events_read
    }

    /// Read the remaining events into `history` in order, returning how
    /// many were applied.
    ///
    /// Stops at the first decode error; events applied before the error
    /// stay applied, matching the tool's keep-going posture toward corrupt
    /// traces (the caller decides whether a partial model is worth
    /// showing).
    pub fn replay_into(&mut self, history: &mut HeapHistory) -> Result<u64, TraceError> {
        let mut applied = 0;
        while let Some(event) = self.next_event()? {
            event.apply(history);
            applied += 1;
        }
        Ok(applied)
    }

    /// Convert into an event iterator.
    pub fn events(self) -> EventIter<R> {
        EventIter {
            reader: self.reader,
            done: false,
        }
    }
}

/// Iterator adapter over trace events.
pub struct EventIter<R: Read> {
    reader: R,
    done: bool,
}

impl<R: Read> Iterator for EventIter<R> {
    type Item = Result<TraceEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match decode_event(&mut self.reader) {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::TraceWriter;
    use heapscope_core::HeapId;

    fn sample_events() -> Vec<TraceEvent> {
        vec![
            TraceEvent::Alloc {
                heap: HeapId(0),
                address: 100,
                size: 16,
            },
            TraceEvent::Alloc {
                heap: HeapId(1),
                address: 0x7fff_0000_1000,
                size: 4096,
            },
            TraceEvent::Realloc {
                heap: HeapId(0),
                old_address: 100,
                new_address: 160,
                size: 32,
            },
            TraceEvent::Free {
                heap: HeapId(0),
                address: 160,
            },
        ]
    }

    fn write_trace(events: &[TraceEvent]) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut writer = TraceWriter::new(&mut buf).unwrap();
        for e in events {
            writer.write_event(e).unwrap();
        }
        drop(writer);
        buf
    }

    #[test]
    fn round_trip_write_read() {
        let events = sample_events();
        let buf = write_trace(&events);

        let mut reader = TraceReader::open(buf.as_slice()).unwrap();
        let mut decoded = Vec::new();
        while let Some(e) = reader.next_event().unwrap() {
            decoded.push(e);
        }
        assert_eq!(decoded, events);
        assert_eq!(reader.events_read(), 4);
    }

    #[test]
    fn event_iterator_works() {
        let buf = write_trace(&sample_events());
        let reader = TraceReader::open(buf.as_slice()).unwrap();
        let events: Vec<_> = reader.events().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(events, sample_events());
    }

    #[test]
    fn bad_magic_on_open() {
        let data = b"XTRC\x01rest of data";
        assert!(matches!(
            TraceReader::open(data.as_slice()),
            Err(TraceError::InvalidMagic)
        ));
    }

    #[test]
    fn truncated_stream_errors() {
        let mut buf = write_trace(&sample_events());
        buf.truncate(buf.len() - 4);
        let mut reader = TraceReader::open(buf.as_slice()).unwrap();
        // Drain until the error surfaces; a truncated tail must never be
        // mistaken for a clean end of stream.
        loop {
            match reader.next_event() {
                Ok(Some(_)) => continue,
                other => {
                    assert!(matches!(other, Err(TraceError::Truncated)));
                    break;
                }
            }
        }
    }

    #[test]
    fn replay_into_applies_all_events() {
        let buf = write_trace(&sample_events());
        let mut reader = TraceReader::open(buf.as_slice()).unwrap();
        let mut history = HeapHistory::new();
        let applied = reader.replay_into(&mut history).unwrap();
        assert_eq!(applied, 4);
        assert_eq!(history.blocks().len(), 3);
        assert_eq!(history.current_tick(), 4);
    }
}
