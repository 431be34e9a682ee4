//! Anchor-based resize math.
//!
//! Edges not touched by the anchor stay fixed. A moved left/top edge follows
//! the pointer but is clamped to `[0, opposite_edge - 1]`; a moved right/bottom
//! edge yields a size clamped to `[1, canvas_extent - origin]`. All arithmetic
//! saturates, so regions imported with out-of-range bounds cannot overflow.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use crate::doc::Bounds;
use crate::hit::ResizeAnchor;
use crate::mapper::{CanvasSize, LogicalPoint};

/// New bounds for dragging `anchor` of `bounds` to `pointer`.
#[must_use]
pub fn resize_bounds(bounds: Bounds, anchor: ResizeAnchor, pointer: LogicalPoint, canvas: CanvasSize) -> Bounds {
    let (x, width) = resize_axis(
        bounds.x,
        bounds.right(),
        pointer.x,
        canvas.width,
        anchor.moves_left(),
        anchor.moves_right(),
    );
    let (y, height) = resize_axis(
        bounds.y,
        bounds.bottom(),
        pointer.y,
        canvas.height,
        anchor.moves_top(),
        anchor.moves_bottom(),
    );
    Bounds { x, y, width: width.max(1), height: height.max(1) }
}

/// Resize one axis. Returns the new origin and extent.
fn resize_axis(start: i32, end: i32, pointer: i32, extent: i32, moves_start: bool, moves_end: bool) -> (i32, i32) {
    if moves_start {
        let origin = pointer.min(end.saturating_sub(1)).max(0);
        (origin, end.saturating_sub(origin))
    } else if moves_end {
        let size = pointer.saturating_sub(start).min(extent.saturating_sub(start)).max(1);
        (start, size)
    } else {
        (start, end.saturating_sub(start))
    }
}
