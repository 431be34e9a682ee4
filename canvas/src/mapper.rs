//! Coordinate mapping between screen pixels and logical canvas units.
//!
//! The menu preview is the background image scaled to fit its container while
//! preserving aspect ratio, so a single scale factor (`viewport.width /
//! canvas.width`) applies to both axes. Logical coordinates are integers;
//! screen coordinates are CSS pixels relative to the page.

#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogicalPoint {
    pub x: i32,
    pub y: i32,
}

impl LogicalPoint {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The fixed logical size of the menu. All region bounds are relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: i32,
    pub height: i32,
}

impl CanvasSize {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

/// On-screen placement of the preview element (as from `getBoundingClientRect`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Whether the viewport is large enough to accept a drawn region.
    #[must_use]
    pub fn accepts_draw(&self, min_px: f64) -> bool {
        self.width >= min_px && self.height >= min_px
    }
}

/// Screen pixels per logical unit.
///
/// Falls back to `1.0` when the viewport or canvas is degenerate, which
/// happens transiently while the preview is mounting or resizing.
#[must_use]
pub fn scale_for(viewport: ViewportRect, canvas: CanvasSize) -> f64 {
    if canvas.width <= 0 || !viewport.width.is_finite() || viewport.width <= 0.0 {
        return 1.0;
    }
    viewport.width / f64::from(canvas.width)
}

/// Convert a screen-space pointer position to logical canvas units, clamped
/// to `[0, canvas.width] x [0, canvas.height]`.
#[must_use]
pub fn to_logical(pointer: Point, viewport: ViewportRect, canvas: CanvasSize) -> LogicalPoint {
    let scale = scale_for(viewport, canvas);
    LogicalPoint {
        x: round_clamped((pointer.x - viewport.left) / scale, canvas.width),
        y: round_clamped((pointer.y - viewport.top) / scale, canvas.height),
    }
}

/// Convert a logical point to screen space. Exact inverse of [`to_logical`]
/// without clamping.
#[must_use]
pub fn to_screen(logical: LogicalPoint, viewport: ViewportRect, canvas: CanvasSize) -> Point {
    let scale = scale_for(viewport, canvas);
    Point {
        x: f64::from(logical.x) * scale + viewport.left,
        y: f64::from(logical.y) * scale + viewport.top,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_clamped(value: f64, max: i32) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    // Clamp in f64 first so the cast cannot saturate unexpectedly.
    let upper = f64::from(max.max(0));
    value.round().min(upper).max(0.0) as i32
}
