//! Binary encode/decode for the trace format.
//!
//! All integers are little-endian. The format is intentionally simple: a
//! 5-byte header (magic + version), then one tagged record per event with
//! no framing, compression, or alignment padding.

use std::io::{ErrorKind, Read, Write};

use heapscope_core::HeapId;

use crate::error::TraceError;
use crate::event::TraceEvent;
use crate::{FORMAT_VERSION, MAGIC};

/// Event tag for [`TraceEvent::Alloc`].
pub const EVENT_ALLOC: u8 = 0;
/// Event tag for [`TraceEvent::Free`].
pub const EVENT_FREE: u8 = 1;
/// Event tag for [`TraceEvent::Realloc`].
pub const EVENT_REALLOC: u8 = 2;

// ── Primitives ──────────────────────────────────────────────────

fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), TraceError> {
    w.write_all(&[v])?;
    Ok(())
}

fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), TraceError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn read_u8(r: &mut dyn Read) -> Result<u8, TraceError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u64_le(r: &mut dyn Read) -> Result<u64, TraceError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Map end-of-stream inside a record to [`TraceError::Truncated`].
fn mid_record(e: TraceError) -> TraceError {
    match e {
        TraceError::Io(io) if io.kind() == ErrorKind::UnexpectedEof => TraceError::Truncated,
        other => other,
    }
}

// ── Header ──────────────────────────────────────────────────────

/// Write the stream header (magic + version).
pub fn encode_header(w: &mut dyn Write) -> Result<(), TraceError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)
}

/// Read and validate the stream header.
pub fn decode_header(r: &mut dyn Read) -> Result<(), TraceError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(TraceError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(TraceError::UnsupportedVersion { found: version });
    }
    Ok(())
}

// ── Events ──────────────────────────────────────────────────────

/// Encode one event record.
pub fn encode_event(w: &mut dyn Write, event: &TraceEvent) -> Result<(), TraceError> {
    match *event {
        TraceEvent::Alloc {
            heap,
            address,
            size,
        } => {
            write_u8(w, EVENT_ALLOC)?;
            write_u8(w, heap.0)?;
            write_u64_le(w, address)?;
            write_u64_le(w, size)
        }
        TraceEvent::Free { heap, address } => {
            write_u8(w, EVENT_FREE)?;
            write_u8(w, heap.0)?;
            write_u64_le(w, address)
        }
        TraceEvent::Realloc {
            heap,
            old_address,
            new_address,
            size,
        } => {
            write_u8(w, EVENT_REALLOC)?;
            write_u8(w, heap.0)?;
            write_u64_le(w, old_address)?;
            write_u64_le(w, new_address)?;
            write_u64_le(w, size)
        }
    }
}

/// Decode the next event record, or `None` at a clean end of stream.
///
/// End of stream at a record boundary is `Ok(None)`; end of stream in the
/// middle of a record is [`TraceError::Truncated`].
pub fn decode_event(r: &mut dyn Read) -> Result<Option<TraceEvent>, TraceError> {
    let tag = match read_u8(r) {
        Ok(tag) => tag,
        Err(TraceError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    };
    let event = match tag {
        EVENT_ALLOC => {
            let heap = HeapId(read_u8(r).map_err(mid_record)?);
            let address = read_u64_le(r).map_err(mid_record)?;
            let size = read_u64_le(r).map_err(mid_record)?;
            TraceEvent::Alloc {
                heap,
                address,
                size,
            }
        }
        EVENT_FREE => {
            let heap = HeapId(read_u8(r).map_err(mid_record)?);
            let address = read_u64_le(r).map_err(mid_record)?;
            TraceEvent::Free { heap, address }
        }
        EVENT_REALLOC => {
            let heap = HeapId(read_u8(r).map_err(mid_record)?);
            let old_address = read_u64_le(r).map_err(mid_record)?;
            let new_address = read_u64_le(r).map_err(mid_record)?;
            let size = read_u64_le(r).map_err(mid_record)?;
            TraceEvent::Realloc {
                heap,
                old_address,
                new_address,
                size,
            }
        }
        tag => return Err(TraceError::UnknownEventTag { tag }),
    };
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_event() -> impl Strategy<Value = TraceEvent> {
        prop_oneof![
            (any::<u8>(), any::<u64>(), any::<u64>()).prop_map(|(h, a, s)| TraceEvent::Alloc {
                heap: HeapId(h),
                address: a,
                size: s,
            }),
            (any::<u8>(), any::<u64>()).prop_map(|(h, a)| TraceEvent::Free {
                heap: HeapId(h),
                address: a,
            }),
            (any::<u8>(), any::<u64>(), any::<u64>(), any::<u64>()).prop_map(
                |(h, o, n, s)| TraceEvent::Realloc {
                    heap: HeapId(h),
                    old_address: o,
                    new_address: n,
                    size: s,
                }
            ),
        ]
    }

    #[test]
    fn header_round_trips() {
        let mut buf = Vec::new();
        encode_header(&mut buf).unwrap();
        assert_eq!(&buf[..4], b"HTRC");
        decode_header(&mut buf.as_slice()).unwrap();
    }

    #[test]
    fn bad_magic_rejected() {
        let data = b"XTRC\x01";
        assert!(matches!(
            decode_header(&mut data.as_slice()),
            Err(TraceError::InvalidMagic)
        ));
    }

    #[test]
    fn future_version_rejected() {
        let data = b"HTRC\x63";
        assert!(matches!(
            decode_header(&mut data.as_slice()),
            Err(TraceError::UnsupportedVersion { found: 0x63 })
        ));
    }

    #[test]
    fn unknown_tag_rejected() {
        let data = [0xFFu8, 0, 0, 0];
        assert!(matches!(
            decode_event(&mut data.as_slice()),
            Err(TraceError::UnknownEventTag { tag: 0xFF })
        ));
    }

    #[test]
    fn clean_eof_is_none() {
        let data: [u8; 0] = [];
        assert!(decode_event(&mut data.as_slice()).unwrap().is_none());
    }

    #[test]
    fn mid_record_eof_is_truncated() {
        let mut buf = Vec::new();
        encode_event(
            &mut buf,
            &TraceEvent::Alloc {
                heap: HeapId(0),
                address: 0x1000,
                size: 64,
            },
        )
        .unwrap();
        buf.truncate(buf.len() - 3);
        assert!(matches!(
            decode_event(&mut buf.as_slice()),
            Err(TraceError::Truncated)
        ));
    }

    proptest! {
        #[test]
        fn events_round_trip(events in prop::collection::vec(arb_event(), 0..32)) {
            let mut buf = Vec::new();
            for e in &events {
                encode_event(&mut buf, e).unwrap();
            }
            let mut r = buf.as_slice();
            let mut decoded = Vec::new();
            while let Some(e) = decode_event(&mut r).unwrap() {
                decoded.push(e);
            }
            prop_assert_eq!(decoded, events);
        }
    }
}
