//! The flat vertex type handed to the external renderer.

/// A single 2D vertex in viewport-normalized coordinates.
///
/// `x` runs along the tick axis and `y` along the address axis; 0.0 is the
/// viewport's minimum edge and 1.0 its maximum edge. Blocks partially
/// outside the viewport produce coordinates outside `[0, 1]`; clipping is
/// the renderer's job.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeapVertex {
    /// Position along the tick axis.
    pub x: f32,
    /// Position along the address axis.
    pub y: f32,
}

impl HeapVertex {
    /// Construct a vertex at `(x, y)`.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
