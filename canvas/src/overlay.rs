//! Pure projection of regions and the live gesture into screen space.
//!
//! The overlay is recomputed from scratch every frame. Coordinates are CSS
//! pixels relative to the preview element's top-left corner, so the painter
//! (or a DOM-based host) can position elements without knowing the canvas size.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::doc::{Bounds, Region, RegionId};
use crate::hit::{self, ResizeAnchor};
use crate::input::GestureState;
use crate::mapper::Point;

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    /// Project logical `bounds` with `scale` screen pixels per unit.
    #[must_use]
    pub fn from_bounds(bounds: Bounds, scale: f64) -> Self {
        Self {
            left: f64::from(bounds.x) * scale,
            top: f64::from(bounds.y) * scale,
            width: f64::from(bounds.width) * scale,
            height: f64::from(bounds.height) * scale,
        }
    }
}

/// One resize handle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMark {
    pub anchor: ResizeAnchor,
    /// Handle center.
    pub center: Point,
}

/// One region as it should appear on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionOverlay {
    pub id: RegionId,
    pub rect: ScreenRect,
    pub selected: bool,
    /// One-based index label, e.g. `#3`.
    pub badge: String,
    /// Resize handles; only populated for the selected region in edit mode.
    pub handles: Vec<HandleMark>,
}

/// Everything the painter needs for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    /// Regions in paint order (first is bottom-most).
    pub regions: Vec<RegionOverlay>,
    /// The in-progress draw rectangle, if the user is drawing.
    pub draft: Option<ScreenRect>,
}

/// Build the overlay for the current frame.
#[must_use]
pub fn project(
    regions: &[Region],
    gesture: &GestureState,
    selected: Option<RegionId>,
    scale: f64,
    edit_mode: bool,
) -> Overlay {
    let regions = regions
        .iter()
        .enumerate()
        .map(|(i, region)| {
            let is_selected = selected == Some(region.id);
            let handles = if is_selected && edit_mode { handle_marks(region.bounds, scale) } else { Vec::new() };
            RegionOverlay {
                id: region.id,
                rect: ScreenRect::from_bounds(region.bounds, scale),
                selected: is_selected,
                badge: format!("#{}", i + 1),
                handles,
            }
        })
        .collect();

    Overlay { regions, draft: gesture.draft().map(|b| ScreenRect::from_bounds(b, scale)) }
}

fn handle_marks(bounds: Bounds, scale: f64) -> Vec<HandleMark> {
    ResizeAnchor::ALL
        .into_iter()
        .map(|anchor| {
            let (x, y) = hit::handle_position(bounds, anchor);
            HandleMark { anchor, center: Point::new(x * scale, y * scale) }
        })
        .collect()
}
