//! Input model: mouse buttons, editor mode flags, and the gesture state machine.
//!
//! This module defines the types consumed by the input engine. `UiState`
//! captures the editor's persistent mode (selection, edit/preview, whether
//! drawing is allowed). `GestureState` is the active gesture being tracked
//! between pointer-down and pointer-up, carrying all context needed to turn
//! subsequent moves into region mutations and to finalize on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::DRAG_THRESHOLD;
use crate::doc::{Bounds, RegionId};
use crate::hit::ResizeAnchor;
use crate::mapper::LogicalPoint;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// The id of the currently selected region, if any.
    pub selected_id: Option<RegionId>,
    /// Edit mode accepts gestures; preview mode turns taps into simulated actions.
    pub edit_mode: bool,
    /// Whether a drag on empty space may create a region.
    pub draw_enabled: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self { selected_id: None, edit_mode: true, draw_enabled: true }
    }
}

/// Internal state for the gesture state machine.
///
/// Each active variant carries the context needed to apply the next pointer
/// move. Region bounds are never captured here: handlers re-read them from the
/// store at the moment of mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pointer went down on empty space; not yet past the drag threshold.
    PendingDraw {
        /// Logical position of the pointer-down.
        start: LogicalPoint,
    },
    /// The user is dragging out a new region.
    Drawing {
        /// Logical position of the pointer-down; one corner of the draft.
        start: LogicalPoint,
        /// Latest logical pointer position; the opposite corner.
        current: LogicalPoint,
    },
    /// Pointer went down on a region body; not yet past the drag threshold.
    PendingMove {
        /// Id of the region under the pointer.
        id: RegionId,
        /// Logical position of the pointer-down.
        start: LogicalPoint,
        /// Pointer minus region origin at pointer-down; preserved while moving.
        offset: LogicalPoint,
    },
    /// The user is translating an existing region.
    Moving {
        /// Id of the region being moved.
        id: RegionId,
        /// Pointer minus region origin, held constant for the whole drag.
        offset: LogicalPoint,
    },
    /// The user is resizing a region by dragging one of its eight handles.
    Resizing {
        /// Id of the region being resized.
        id: RegionId,
        /// Which corner/edge handle is being dragged.
        anchor: ResizeAnchor,
    },
}

impl GestureState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The region this gesture operates on, if any.
    #[must_use]
    pub fn region_id(&self) -> Option<RegionId> {
        match self {
            Self::PendingMove { id, .. } | Self::Moving { id, .. } | Self::Resizing { id, .. } => Some(*id),
            Self::Idle | Self::PendingDraw { .. } | Self::Drawing { .. } => None,
        }
    }

    /// The in-progress draw rectangle while `Drawing`.
    #[must_use]
    pub fn draft(&self) -> Option<Bounds> {
        match self {
            Self::Drawing { start, current } => Some(Bounds::from_corners(*start, *current)),
            _ => None,
        }
    }
}

/// Whether the pointer has travelled far enough from `start` to count as a drag.
///
/// Each axis is checked independently against [`DRAG_THRESHOLD`].
#[must_use]
pub fn exceeds_drag_threshold(start: LogicalPoint, current: LogicalPoint) -> bool {
    (current.x - start.x).abs() > DRAG_THRESHOLD || (current.y - start.y).abs() > DRAG_THRESHOLD
}
