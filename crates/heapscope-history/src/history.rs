//! The event-recording and query engine.

use heapscope_core::{ContinuousHeapWindow, HeapId, HeapWindow};
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::block::{ConflictKind, HeapBlock, HeapConflict};
use crate::vertex::HeapVertex;

/// The allocation history of up to 256 heaps in address × tick space.
///
/// Owns the append-only block log, the live-block index, the conflict log,
/// the all-time extent, the navigable viewport, and the address-sorted
/// query cache. Single-threaded by design: every operation runs to
/// completion on the calling thread, and collaborators hold no references
/// into the engine across calls.
///
/// Ticks are a monotonically increasing event counter, not wall-clock
/// time; every recording call stamps the current tick and advances it by
/// one.
///
/// # Examples
///
/// ```
/// use heapscope_core::HeapId;
/// use heapscope_history::HeapHistory;
///
/// let mut history = HeapHistory::new();
/// history.record_malloc(0x1000, 64, HeapId(0));
/// history.record_free(0x1000, HeapId(0));
///
/// assert_eq!(history.blocks().len(), 1);
/// assert_eq!(history.blocks()[0].free_tick, Some(1));
/// assert!(history.conflicts().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct HeapHistory {
    /// Append-only log of every block ever allocated.
    blocks: Vec<HeapBlock>,
    /// Maps (address, heap) to the index of the currently open block.
    live_blocks: IndexMap<(u64, HeapId), usize>,
    /// Append-only log of detected protocol anomalies.
    conflicts: Vec<HeapConflict>,
    /// Event counter; stamped on each record call, then advanced.
    current_tick: u32,
    /// All-time extent of observed events. Meaningless until `has_events`.
    global_area: HeapWindow,
    has_events: bool,
    /// The currently visible part of the history.
    current_window: ContinuousHeapWindow,
    /// Block indices ordered by (address, alloc tick); rebuilt lazily.
    sorted_by_address: Vec<usize>,
    cache_dirty: bool,
}

impl Default for HeapHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HeapHistory {
    /// An empty history at tick zero.
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            live_blocks: IndexMap::new(),
            conflicts: Vec::new(),
            current_tick: 0,
            global_area: HeapWindow {
                minimum_address: 0,
                maximum_address: 0,
                minimum_tick: 0,
                maximum_tick: 0,
            },
            has_events: false,
            current_window: ContinuousHeapWindow::default(),
            sorted_by_address: Vec::new(),
            cache_dirty: false,
        }
    }

    // ── Event recording ─────────────────────────────────────────

    /// Record an allocation of `size` address units at `address` on `heap`.
    ///
    /// If a live block already exists for `(address, heap)` — an allocation
    /// that was never freed — an [`ConflictKind::Allocation`] conflict is
    /// logged, the stale block is closed at the current tick, and the new
    /// allocation proceeds, superseding it in the live index.
    pub fn record_malloc(&mut self, address: u64, size: u64, heap: HeapId) {
        let tick = self.current_tick;
        if let Some(&stale) = self.live_blocks.get(&(address, heap)) {
            self.conflicts
                .push(HeapConflict::new(tick, address, ConflictKind::Allocation));
            self.blocks[stale].free_tick = Some(tick);
        }
        let index = self.blocks.len();
        self.blocks.push(HeapBlock::new(address, size, heap, tick));
        self.live_blocks.insert((address, heap), index);
        self.extend_global(address, address.saturating_add(size), tick);
        self.cache_dirty = true;
        self.current_tick += 1;
    }

    /// Record a free of `address` on `heap`.
    ///
    /// Freeing an address with no live block is a [`ConflictKind::Free`]
    /// conflict and otherwise a no-op; the block log is not touched.
    pub fn record_free(&mut self, address: u64, heap: HeapId) {
        let tick = self.current_tick;
        self.close_live_block(address, heap, tick);
        self.extend_global(address, address, tick);
        self.current_tick += 1;
    }

    /// Record a reallocation moving the block at `old_address` to
    /// `new_address` with `size`, both halves attributed to the same tick.
    ///
    /// The close half follows the same missing-live-block conflict rule as
    /// [`record_free`](Self::record_free).
    pub fn record_realloc(&mut self, old_address: u64, new_address: u64, size: u64, heap: HeapId) {
        let tick = self.current_tick;
        self.close_live_block(old_address, heap, tick);
        if let Some(&stale) = self.live_blocks.get(&(new_address, heap)) {
            self.conflicts
                .push(HeapConflict::new(tick, new_address, ConflictKind::Allocation));
            self.blocks[stale].free_tick = Some(tick);
        }
        let index = self.blocks.len();
        self.blocks
            .push(HeapBlock::new(new_address, size, heap, tick));
        self.live_blocks.insert((new_address, heap), index);
        self.extend_global(new_address, new_address.saturating_add(size), tick);
        self.cache_dirty = true;
        self.current_tick += 1;
    }

    /// Close the live block at `(address, heap)` at `tick`, or log a
    /// free-side conflict if there is none.
    fn close_live_block(&mut self, address: u64, heap: HeapId, tick: u32) {
        match self.live_blocks.swap_remove(&(address, heap)) {
            Some(index) => {
                self.blocks[index].free_tick = Some(tick);
            }
            None => {
                self.conflicts
                    .push(HeapConflict::new(tick, address, ConflictKind::Free));
            }
        }
    }

    fn extend_global(&mut self, address_lo: u64, address_hi: u64, tick: u32) {
        if self.has_events {
            self.global_area.include_address_range(address_lo, address_hi);
            self.global_area.include_tick(tick);
        } else {
            self.global_area = HeapWindow {
                minimum_address: address_lo,
                maximum_address: address_hi,
                minimum_tick: tick,
                maximum_tick: tick,
            };
            self.has_events = true;
        }
    }

    // ── State access ────────────────────────────────────────────

    /// The append-only block log, in allocation order.
    pub fn blocks(&self) -> &[HeapBlock] {
        &self.blocks
    }

    /// The append-only conflict log, in detection order.
    pub fn conflicts(&self) -> &[HeapConflict] {
        &self.conflicts
    }

    /// The current value of the event counter (one past the last recorded
    /// event); live blocks extend to this tick in queries and geometry.
    pub fn current_tick(&self) -> u32 {
        self.current_tick
    }

    /// Number of blocks currently live across all heaps.
    pub fn live_block_count(&self) -> usize {
        self.live_blocks.len()
    }

    /// The all-time extent of observed events. Monotonically non-shrinking;
    /// the zero window until the first event is recorded.
    pub fn global_area(&self) -> HeapWindow {
        self.global_area
    }

    /// Lowest address ever observed.
    pub fn minimum_address(&self) -> u64 {
        self.global_area.minimum_address
    }

    /// Highest address ever observed (half-open upper bound).
    pub fn maximum_address(&self) -> u64 {
        self.global_area.maximum_address
    }

    /// Earliest tick in the extent.
    pub fn minimum_tick(&self) -> u32 {
        self.global_area.minimum_tick
    }

    /// Latest tick in the extent.
    pub fn maximum_tick(&self) -> u32 {
        self.global_area.maximum_tick
    }

    // ── Viewport navigation ─────────────────────────────────────

    /// Replace the viewport with a discrete window.
    pub fn set_current_window(&mut self, window: &HeapWindow) {
        self.current_window.reset(window);
    }

    /// Reset the viewport to the all-time extent.
    pub fn set_current_window_to_global(&mut self) {
        self.current_window.reset(&self.global_area);
    }

    /// The current viewport.
    pub fn current_window(&self) -> &ContinuousHeapWindow {
        &self.current_window
    }

    /// Pan the viewport by `dx` ticks and `dy` address units; see
    /// [`ContinuousHeapWindow::pan`].
    pub fn pan_current_window(&mut self, dx: f64, dy: f64) {
        self.current_window.pan(dx, dy);
    }

    /// Zoom the viewport toward a fractional fixed point; see
    /// [`ContinuousHeapWindow::zoom_to_point`].
    pub fn zoom_to_point(&mut self, dx: f64, dy: f64, factor_x: f64, factor_y: f64) {
        self.current_window.zoom_to_point(dx, dy, factor_x, factor_y);
    }

    // ── Spatial queries ─────────────────────────────────────────

    fn ensure_sorted_cache(&mut self) {
        if !self.cache_dirty {
            return;
        }
        let blocks = &self.blocks;
        let mut order: Vec<usize> = (0..blocks.len()).collect();
        // Stable sort keeps equal (address, alloc_tick) pairs in index
        // order, so query results are deterministic.
        order.sort_by_key(|&i| (blocks[i].address, blocks[i].alloc_tick));
        self.sorted_by_address = order;
        self.cache_dirty = false;
    }

    /// Indices of every block visible in the current viewport: blocks whose
    /// tick interval intersects the viewport's tick range and whose address
    /// interval intersects its address range.
    ///
    /// Results are ordered by start address, ties by allocation tick
    /// ascending. The address-sorted cache is rebuilt first if the block
    /// log changed since the last query.
    pub fn active_blocks(&mut self) -> Vec<usize> {
        self.ensure_sorted_cache();
        let min_addr = self.current_window.minimum_address();
        let max_addr = self.current_window.maximum_address();
        let min_tick = self.current_window.minimum_tick();
        let max_tick = self.current_window.maximum_tick();
        let now = self.current_tick;
        let blocks = &self.blocks;
        // Everything sorted past the viewport's high address edge can never
        // intersect; cut it off before filtering.
        let cut = self
            .sorted_by_address
            .partition_point(|&i| blocks[i].address <= max_addr);
        self.sorted_by_address[..cut]
            .iter()
            .copied()
            .filter(|&i| {
                let b = &blocks[i];
                b.intersects_address_range(min_addr, max_addr)
                    && b.intersects_tick_range(min_tick, max_tick, now)
            })
            .collect()
    }

    /// The block, if any, that was live at `tick` and whose address range
    /// contains `address`; among overlapping candidates (which only arise
    /// from recorded conflicts) the most recently allocated wins.
    pub fn block_at(&mut self, address: u64, tick: u32) -> Option<usize> {
        self.ensure_sorted_cache();
        let now = self.current_tick;
        let blocks = &self.blocks;
        let cut = self
            .sorted_by_address
            .partition_point(|&i| blocks[i].address <= address);
        let mut best: Option<usize> = None;
        for &i in &self.sorted_by_address[..cut] {
            let b = &blocks[i];
            if !b.contains_address(address) || !b.covers_tick(tick, now) {
                continue;
            }
            let better = match best {
                Some(j) => (b.alloc_tick, i) > (blocks[j].alloc_tick, j),
                None => true,
            };
            if better {
                best = Some(i);
            }
        }
        best
    }

    // ── Geometry export ─────────────────────────────────────────

    /// Emit two triangles (six vertices) per visible block, spanning the
    /// block's address range and its tick range clipped to the current
    /// tick, in viewport-normalized coordinates.
    ///
    /// Pure transformation: no I/O, no renderer contact; the caller gets
    /// an owned flat buffer.
    pub fn dump_vertices_for_active_window(&mut self) -> Vec<HeapVertex> {
        let active = self.active_blocks();
        let window = self.current_window;
        let now = self.current_tick;
        let mut vertices = Vec::with_capacity(active.len() * 6);
        for index in active {
            vertices.extend(block_vertices(&self.blocks[index], &window, now));
        }
        vertices
    }
}

/// The two-triangle rectangle for one block, in viewport-normalized
/// coordinates.
fn block_vertices(
    block: &HeapBlock,
    window: &ContinuousHeapWindow,
    now: u32,
) -> SmallVec<[HeapVertex; 6]> {
    // Degenerate viewports (single tick or single address) still render;
    // treat the span as one unit so the division stays finite.
    let width = window.width().max(1.0);
    let height = window.height().max(1.0);
    let x0 = ((f64::from(block.alloc_tick) - window.minimum_tick_as_f64()) / width) as f32;
    let x1 = ((f64::from(block.end_tick(now)) - window.minimum_tick_as_f64()) / width) as f32;
    let y0 = ((block.address as f64 - window.minimum_address_as_f64()) / height) as f32;
    let y1 = ((block.address_end() as f64 - window.minimum_address_as_f64()) / height) as f32;
    smallvec::smallvec![
        HeapVertex::new(x0, y0),
        HeapVertex::new(x1, y0),
        HeapVertex::new(x0, y1),
        HeapVertex::new(x1, y0),
        HeapVertex::new(x1, y1),
        HeapVertex::new(x0, y1),
    ]
}
