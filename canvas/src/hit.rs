//! Resize-handle geometry and pointer hit-testing.
//!
//! Handles are fixed-size squares in screen space, so their hit radius is
//! converted to logical units with the current scale. The selected region is
//! tested first (handles, then body) because it is drawn on top; the rest are
//! tested from last to first, matching paint order.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{Bounds, Region, RegionId};
use crate::mapper::LogicalPoint;

/// Which part of a region was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// All anchors, clockwise from north.
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Whether dragging this anchor moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::W | Self::Sw)
    }

    /// Whether dragging this anchor moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::Ne | Self::E | Self::Se)
    }

    /// Whether dragging this anchor moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::N | Self::Ne)
    }

    /// Whether dragging this anchor moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Sw | Self::S | Self::Se)
    }

    /// CSS cursor shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub region_id: RegionId,
    pub part: HitPart,
}

/// Center of `anchor`'s handle on `bounds`, in logical units.
///
/// Corners sit on the corners; edge handles sit on the edge midpoints.
#[must_use]
pub fn handle_position(bounds: Bounds, anchor: ResizeAnchor) -> (f64, f64) {
    let left = f64::from(bounds.x);
    let top = f64::from(bounds.y);
    let right = f64::from(bounds.right());
    let bottom = f64::from(bounds.bottom());
    let mid_x = left + f64::from(bounds.width) / 2.0;
    let mid_y = top + f64::from(bounds.height) / 2.0;

    match anchor {
        ResizeAnchor::N => (mid_x, top),
        ResizeAnchor::Ne => (right, top),
        ResizeAnchor::E => (right, mid_y),
        ResizeAnchor::Se => (right, bottom),
        ResizeAnchor::S => (mid_x, bottom),
        ResizeAnchor::Sw => (left, bottom),
        ResizeAnchor::W => (left, mid_y),
        ResizeAnchor::Nw => (left, top),
    }
}

/// Which handle of `bounds`, if any, is under `pt`.
///
/// `radius` is the handle half-size in logical units. Corners win over edge
/// midpoints when a region is small enough for them to overlap.
#[must_use]
pub fn handle_at(bounds: Bounds, pt: LogicalPoint, radius: f64) -> Option<ResizeAnchor> {
    let px = f64::from(pt.x);
    let py = f64::from(pt.y);
    let corners_first = [
        ResizeAnchor::Nw,
        ResizeAnchor::Ne,
        ResizeAnchor::Se,
        ResizeAnchor::Sw,
        ResizeAnchor::N,
        ResizeAnchor::E,
        ResizeAnchor::S,
        ResizeAnchor::W,
    ];
    corners_first.into_iter().find(|&anchor| {
        let (hx, hy) = handle_position(bounds, anchor);
        (px - hx).abs() <= radius && (py - hy).abs() <= radius
    })
}

/// Test which region (if any) is under `pt`.
///
/// `scale` is screen pixels per logical unit; `handle_radius_px` is the
/// on-screen handle half-size. Handles are only considered on the selected
/// region.
#[must_use]
pub fn hit_test(
    pt: LogicalPoint,
    regions: &[Region],
    selected: Option<RegionId>,
    scale: f64,
    handle_radius_px: f64,
) -> Option<Hit> {
    let selected_region = selected.and_then(|id| regions.iter().find(|r| r.id == id));

    if let Some(region) = selected_region {
        let radius = if scale > 0.0 && scale.is_finite() { handle_radius_px / scale } else { handle_radius_px };
        if let Some(anchor) = handle_at(region.bounds, pt, radius) {
            return Some(Hit { region_id: region.id, part: HitPart::ResizeHandle(anchor) });
        }
        if region.bounds.contains(pt) {
            return Some(Hit { region_id: region.id, part: HitPart::Body });
        }
    }

    regions
        .iter()
        .rev()
        .find(|r| Some(r.id) != selected && r.bounds.contains(pt))
        .map(|r| Hit { region_id: r.id, part: HitPart::Body })
}
