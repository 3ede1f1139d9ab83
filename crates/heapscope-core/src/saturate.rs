//! Saturating float-to-unsigned arithmetic.
//!
//! Viewport navigation mixes floating-point interaction deltas with bounds
//! stored as fixed-width unsigned integers (`u64` addresses, `u32` ticks).
//! [`saturating_add_f64`] is the single place where that mix happens: the
//! result is clamped to `[0, MAX]` instead of wrapping, and the caller is
//! told whether clamping occurred.

/// Outcome of a saturating addition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Saturation {
    /// The delta was applied without clamping.
    None,
    /// The delta exceeded the headroom toward the type maximum; the result
    /// was clamped to `MAX`.
    AtMax,
    /// The delta exceeded the headroom toward zero; the result was clamped
    /// to `0`.
    AtMin,
}

impl Saturation {
    /// `true` if the result was clamped at either end.
    pub fn is_clamped(self) -> bool {
        !matches!(self, Self::None)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// An unsigned axis type (`u32` ticks or `u64` addresses) that supports
/// saturating addition of an `f64` delta.
///
/// Sealed: the viewport only ever navigates these two axes.
pub trait UnsignedAxis: Copy + Ord + sealed::Sealed {
    /// The zero value of the axis.
    const ZERO: Self;
    /// The largest representable value on the axis.
    const MAX_VALUE: Self;
    /// View the value as `f64`. Lossy above 2^53, which is acceptable for
    /// interaction math: a sub-unit error at petabyte addresses is far
    /// below one pixel.
    fn as_f64(self) -> f64;
    /// Convert back from a non-negative `f64`. Uses Rust's saturating
    /// float-to-int cast, so any residual rounding past the limits clamps
    /// instead of wrapping.
    fn from_f64_clamped(v: f64) -> Self;
}

impl UnsignedAxis for u32 {
    const ZERO: Self = 0;
    const MAX_VALUE: Self = u32::MAX;

    fn as_f64(self) -> f64 {
        self as f64
    }

    fn from_f64_clamped(v: f64) -> Self {
        v as u32
    }
}

impl UnsignedAxis for u64 {
    const ZERO: Self = 0;
    const MAX_VALUE: Self = u64::MAX;

    fn as_f64(self) -> f64 {
        self as f64
    }

    fn from_f64_clamped(v: f64) -> Self {
        v as u64
    }
}

/// Add a signed floating-point delta to an unsigned value, clamping to
/// `[0, MAX]` instead of wrapping.
///
/// A zero (or NaN) delta is a no-op reporting [`Saturation::None`]. All
/// comparisons happen in `f64` before any conversion back to the integer
/// domain, so no intermediate overflow is possible.
///
/// # Examples
///
/// ```
/// use heapscope_core::{saturating_add_f64, Saturation};
///
/// assert_eq!(saturating_add_f64(100u64, 50.0), (150, Saturation::None));
/// assert_eq!(saturating_add_f64(100u64, -200.0), (0, Saturation::AtMin));
/// assert_eq!(saturating_add_f64(u32::MAX - 1, 10.0), (u32::MAX, Saturation::AtMax));
/// ```
pub fn saturating_add_f64<T: UnsignedAxis>(value: T, delta: f64) -> (T, Saturation) {
    if delta.is_nan() || delta == 0.0 {
        return (value, Saturation::None);
    }
    if delta > 0.0 {
        let headroom = T::MAX_VALUE.as_f64() - value.as_f64();
        if delta > headroom {
            return (T::MAX_VALUE, Saturation::AtMax);
        }
        (T::from_f64_clamped(value.as_f64() + delta), Saturation::None)
    } else {
        if -delta > value.as_f64() {
            return (T::ZERO, Saturation::AtMin);
        }
        (T::from_f64_clamped(value.as_f64() + delta), Saturation::None)
    }
}
