//! End-to-end: write a trace, read it back, replay it into a history,
//! and run the viewer-facing queries against the result.

use heapscope_core::{HeapId, HeapWindow};
use heapscope_history::{ConflictKind, HeapHistory};
use heapscope_trace::{TraceEvent, TraceReader, TraceWriter};

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
fn written_trace_replays_to_queryable_history() {
    let h0 = HeapId(0);
    let events = vec![
        TraceEvent::Alloc {
            heap: h0,
            address: 100,
            size: 16,
        },
        TraceEvent::Free {
            heap: h0,
            address: 100,
        },
        TraceEvent::Alloc {
            heap: h0,
            address: 0x4000,
            size: 256,
        },
        // Anomaly: free of an address that was never allocated.
        TraceEvent::Free {
            heap: HeapId(3),
            address: 5000,
        },
    ];
    let buf = write_trace(&events);

    let mut reader = TraceReader::open(buf.as_slice()).unwrap();
    let mut history = HeapHistory::new();
    assert_eq!(reader.replay_into(&mut history).unwrap(), 4);

    // Block shapes from the worked scenario.
    assert_eq!(history.blocks().len(), 2);
    let first = &history.blocks()[0];
    assert_eq!(
        (first.address, first.size, first.alloc_tick, first.free_tick),
        (100, 16, 0, Some(1))
    );

    // The unknown free surfaced as a conflict, not an error.
    assert_eq!(history.conflicts().len(), 1);
    assert_eq!(history.conflicts()[0].kind, ConflictKind::Free);
    assert_eq!(history.conflicts()[0].address, 5000);

    // Spatial query over the first block's lifetime.
    history.set_current_window(&HeapWindow::new(0, 1 << 20, 0, 0).unwrap());
    assert_eq!(history.active_blocks(), vec![0]);

    // Geometry export sees only the visible block.
    assert_eq!(history.dump_vertices_for_active_window().len(), 6);

    // Reset to the global extent and everything is visible.
    history.set_current_window_to_global();
    assert_eq!(history.active_blocks().len(), 2);
}

#[test]
fn replay_is_deterministic() {
    let events: Vec<TraceEvent> = (0..200u64)
        .map(|i| {
            if i % 3 == 2 {
                TraceEvent::Free {
                    heap: HeapId((i % 4) as u8),
                    address: (i / 3) * 64,
                }
            } else {
                TraceEvent::Alloc {
                    heap: HeapId((i % 4) as u8),
                    address: (i % 32) * 64,
                    size: 48,
                }
            }
        })
        .collect();
    let buf = write_trace(&events);

    let mut first = HeapHistory::new();
    let mut second = HeapHistory::new();
    TraceReader::open(buf.as_slice())
        .unwrap()
        .replay_into(&mut first)
        .unwrap();
    TraceReader::open(buf.as_slice())
        .unwrap()
        .replay_into(&mut second)
        .unwrap();

    assert_eq!(first.blocks(), second.blocks());
    assert_eq!(first.conflicts(), second.conflicts());
    assert_eq!(first.global_area(), second.global_area());

    first.set_current_window_to_global();
    second.set_current_window_to_global();
    assert_eq!(first.active_blocks(), second.active_blocks());
    assert_eq!(
        first.dump_vertices_for_active_window(),
        second.dump_vertices_for_active_window()
    );
}
