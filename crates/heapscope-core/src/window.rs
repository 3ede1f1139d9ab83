//! Window models over the address × tick plane.
//!
//! [`HeapWindow`] holds exact unsigned bounds and is used for the all-time
//! extent of a trace. [`ContinuousHeapWindow`] is the navigable viewport:
//! the same four bounds, but updated through floating-point pan/zoom deltas
//! routed through the saturating arithmetic in [`crate::saturate`].
//!
//! Axis convention throughout the workspace: the x axis is logical time
//! (ticks, `u32`), the y axis is address space (`u64`). `width()` therefore
//! measures ticks and `height()` measures addresses, matching the viewer's
//! horizontal-time layout.

use crate::error::WindowError;
use crate::saturate::saturating_add_f64;

/// A rectangle in address × tick space with exact unsigned bounds.
///
/// Invariant: `maximum >= minimum` on both axes, enforced at construction.
/// The address axis is conventionally half-open (`maximum_address` is one
/// past the last byte of interest), the tick axis inclusive.
///
/// # Examples
///
/// ```
/// use heapscope_core::HeapWindow;
///
/// let w = HeapWindow::new(0x1000, 0x2000, 0, 100).unwrap();
/// assert_eq!(w.height(), 0x1000);
/// assert_eq!(w.width(), 100);
/// assert!(HeapWindow::new(10, 5, 0, 0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapWindow {
    /// Lowest address covered.
    pub minimum_address: u64,
    /// Highest address covered (half-open upper bound).
    pub maximum_address: u64,
    /// Earliest tick covered (inclusive).
    pub minimum_tick: u32,
    /// Latest tick covered (inclusive).
    pub maximum_tick: u32,
}

impl HeapWindow {
    /// Create a window, validating that neither axis is inverted.
    pub fn new(
        minimum_address: u64,
        maximum_address: u64,
        minimum_tick: u32,
        maximum_tick: u32,
    ) -> Result<Self, WindowError> {
        if minimum_address > maximum_address {
            return Err(WindowError::InvertedBounds {
                axis: "address",
                min: minimum_address,
                max: maximum_address,
            });
        }
        if minimum_tick > maximum_tick {
            return Err(WindowError::InvertedBounds {
                axis: "tick",
                min: u64::from(minimum_tick),
                max: u64::from(maximum_tick),
            });
        }
        Ok(Self {
            minimum_address,
            maximum_address,
            minimum_tick,
            maximum_tick,
        })
    }

    /// Address span covered by the window.
    pub fn height(&self) -> u64 {
        self.maximum_address - self.minimum_address
    }

    /// Tick span covered by the window.
    pub fn width(&self) -> u32 {
        self.maximum_tick - self.minimum_tick
    }

    /// Grow the window outward to include the address range `[lo, hi)`.
    ///
    /// Growth only: neither bound ever retracts.
    pub fn include_address_range(&mut self, lo: u64, hi: u64) {
        self.minimum_address = self.minimum_address.min(lo);
        self.maximum_address = self.maximum_address.max(hi);
    }

    /// Grow the window outward to include `tick`.
    pub fn include_tick(&mut self, tick: u32) {
        self.minimum_tick = self.minimum_tick.min(tick);
        self.maximum_tick = self.maximum_tick.max(tick);
    }
}

/// The navigable viewport over the address × tick plane.
///
/// Bounds are exact unsigned values, but every update arrives as a
/// floating-point delta from the renderer's pan/zoom gestures. All bound
/// mutations route through [`saturating_add_f64`], so the viewport can
/// never wrap past `0` or the type maximum no matter how hard the user
/// flings it.
///
/// # Examples
///
/// ```
/// use heapscope_core::{ContinuousHeapWindow, HeapWindow};
///
/// let extent = HeapWindow::new(1000, 2000, 0, 100).unwrap();
/// let mut view = ContinuousHeapWindow::from_window(&extent);
///
/// // Pan 10 ticks right, 100 address units up.
/// view.pan(10.0, 100.0);
/// assert_eq!(view.minimum_tick(), 10);
/// assert_eq!(view.minimum_address(), 1100);
///
/// // Zoom in 2x around the center; the span halves.
/// view.zoom_to_point(0.5, 0.5, 0.5, 0.5);
/// assert_eq!(view.maximum_tick() - view.minimum_tick(), 50);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContinuousHeapWindow {
    minimum_address: u64,
    maximum_address: u64,
    minimum_tick: u32,
    maximum_tick: u32,
}

impl ContinuousHeapWindow {
    /// Build a viewport from a discrete window.
    pub fn from_window(window: &HeapWindow) -> Self {
        Self {
            minimum_address: window.minimum_address,
            maximum_address: window.maximum_address,
            minimum_tick: window.minimum_tick,
            maximum_tick: window.maximum_tick,
        }
    }

    /// Replace all four bounds from a discrete window, discarding any
    /// fractional navigation state.
    pub fn reset(&mut self, window: &HeapWindow) {
        *self = Self::from_window(window);
    }

    /// Lowest visible address.
    pub fn minimum_address(&self) -> u64 {
        self.minimum_address
    }

    /// Highest visible address.
    pub fn maximum_address(&self) -> u64 {
        self.maximum_address
    }

    /// Earliest visible tick.
    pub fn minimum_tick(&self) -> u32 {
        self.minimum_tick
    }

    /// Latest visible tick.
    pub fn maximum_tick(&self) -> u32 {
        self.maximum_tick
    }

    /// Low 32 bits of the minimum address, for split-precision uploads to
    /// renderers that cannot consume a full `u64` per vertex attribute.
    pub fn minimum_address_low32(&self) -> u32 {
        self.minimum_address as u32
    }

    /// High 32 bits of the minimum address.
    pub fn minimum_address_high32(&self) -> u32 {
        (self.minimum_address >> 32) as u32
    }

    /// Low 32 bits of the maximum address.
    pub fn maximum_address_low32(&self) -> u32 {
        self.maximum_address as u32
    }

    /// High 32 bits of the maximum address.
    pub fn maximum_address_high32(&self) -> u32 {
        (self.maximum_address >> 32) as u32
    }

    /// Minimum address as `f64` for rendering math.
    pub fn minimum_address_as_f64(&self) -> f64 {
        self.minimum_address as f64
    }

    /// Maximum address as `f64` for rendering math.
    pub fn maximum_address_as_f64(&self) -> f64 {
        self.maximum_address as f64
    }

    /// Minimum tick as `f64` for rendering math.
    pub fn minimum_tick_as_f64(&self) -> f64 {
        f64::from(self.minimum_tick)
    }

    /// Maximum tick as `f64` for rendering math.
    pub fn maximum_tick_as_f64(&self) -> f64 {
        f64::from(self.maximum_tick)
    }

    /// Visible tick span as `f64`.
    pub fn width(&self) -> f64 {
        self.maximum_tick_as_f64() - self.minimum_tick_as_f64()
    }

    /// Visible address span as `f64`.
    pub fn height(&self) -> f64 {
        self.maximum_address_as_f64() - self.minimum_address_as_f64()
    }

    /// Shift the viewport by `dx` ticks and `dy` address units.
    ///
    /// Each bound is shifted through its own saturating add: a bound that
    /// runs out of headroom clamps while the other keeps moving, so the
    /// window compresses against the edge of the representable range
    /// instead of wrapping. Both bounds of an axis clamp toward the same
    /// limit, so `min` can never overtake `max`.
    ///
    /// Callers convert screen-space gesture deltas into axis units using
    /// [`width`](Self::width) and [`height`](Self::height).
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (min_tick, _) = saturating_add_f64(self.minimum_tick, dx);
        let (max_tick, _) = saturating_add_f64(self.maximum_tick, dx);
        let (min_addr, _) = saturating_add_f64(self.minimum_address, dy);
        let (max_addr, _) = saturating_add_f64(self.maximum_address, dy);
        self.minimum_tick = min_tick;
        self.maximum_tick = max_tick;
        self.minimum_address = min_addr;
        self.maximum_address = max_addr;
    }

    /// Zoom toward a point inside the viewport.
    ///
    /// `dx` and `dy` are the fixed point in fractional window coordinates
    /// (0.0 = minimum edge, 1.0 = maximum edge); `factor_x` / `factor_y`
    /// scale the tick and address spans around it (values below 1 zoom in).
    /// The fixed point keeps its fractional position after resizing. A
    /// minimum extent of one tick and one address unit is enforced so the
    /// viewport can never collapse to zero or invert. Non-finite or
    /// non-positive factors leave the corresponding axis untouched.
    pub fn zoom_to_point(&mut self, dx: f64, dy: f64, factor_x: f64, factor_y: f64) {
        if factor_x.is_finite() && factor_x > 0.0 {
            let width = self.width();
            let new_width = width * factor_x;
            let (min_tick, _) = saturating_add_f64(self.minimum_tick, dx * (width - new_width));
            let (max_tick, _) =
                saturating_add_f64(self.maximum_tick, (1.0 - dx) * (new_width - width));
            self.minimum_tick = min_tick;
            self.maximum_tick = max_tick;
            self.enforce_minimum_tick_extent();
        }
        if factor_y.is_finite() && factor_y > 0.0 {
            let height = self.height();
            let new_height = height * factor_y;
            let (min_addr, _) =
                saturating_add_f64(self.minimum_address, dy * (height - new_height));
            let (max_addr, _) =
                saturating_add_f64(self.maximum_address, (1.0 - dy) * (new_height - height));
            self.minimum_address = min_addr;
            self.maximum_address = max_addr;
            self.enforce_minimum_address_extent();
        }
    }

    fn enforce_minimum_tick_extent(&mut self) {
        if self.maximum_tick > self.minimum_tick {
            return;
        }
        if self.minimum_tick == u32::MAX {
            self.minimum_tick = u32::MAX - 1;
            self.maximum_tick = u32::MAX;
        } else {
            self.maximum_tick = self.minimum_tick + 1;
        }
    }

    fn enforce_minimum_address_extent(&mut self) {
        if self.maximum_address > self.minimum_address {
            return;
        }
        if self.minimum_address == u64::MAX {
            self.minimum_address = u64::MAX - 1;
            self.maximum_address = u64::MAX;
        } else {
            self.maximum_address = self.minimum_address + 1;
        }
    }
}
