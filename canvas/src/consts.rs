//! Shared numeric constants for the canvas crate.

// ── Gestures ────────────────────────────────────────────────────

/// Per-axis displacement, in logical units, a pointer must exceed before a
/// pending draw or move turns into a drag.
pub const DRAG_THRESHOLD: i32 = 4;

/// Smallest width and height, in logical units, a drawn rectangle must reach
/// to become a region.
pub const MIN_DRAW_SIZE: i32 = 4;

/// Smallest on-screen viewport edge, in CSS pixels, that still accepts draws.
pub const MIN_VIEWPORT_PX: f64 = 8.0;

/// Window after an image swap during which completed draws are dropped.
pub const IMAGE_SWAP_SUPPRESS_MS: f64 = 300.0;

/// How long a preview toast stays visible.
pub const TOAST_DURATION_MS: f64 = 2500.0;

// ── Store ───────────────────────────────────────────────────────

/// Maximum number of tap regions in one menu.
pub const MAX_REGIONS: usize = 20;

// ── Canvas ──────────────────────────────────────────────────────

/// Default logical menu width.
pub const DEFAULT_CANVAS_WIDTH: i32 = 2500;

/// Default logical menu height.
pub const DEFAULT_CANVAS_HEIGHT: i32 = 1686;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space half-size of a resize handle, in pixels.
pub const HANDLE_RADIUS_PX: f64 = 5.0;

// ── Overlay styles ──────────────────────────────────────────────

/// Border of an unselected region.
pub const REGION_STROKE: &str = "rgba(0, 75, 153, 0.85)";

/// Fill of an unselected region.
pub const REGION_FILL: &str = "rgba(0, 102, 204, 0.08)";

/// Border of the selected region.
pub const SELECTED_STROKE: &str = "#ffd54f";

/// Fill of the selected region.
pub const SELECTED_FILL: &str = "rgba(255, 213, 79, 0.12)";

/// Region border width in CSS pixels.
pub const REGION_LINE_WIDTH_PX: f64 = 2.0;

/// Dash segment length for unselected region borders, in CSS pixels.
pub const REGION_DASH_PX: f64 = 6.0;

/// Background of the `#n` index badge.
pub const BADGE_FILL: &str = "rgba(0, 0, 0, 0.6)";

/// Badge offset from the region's top-left corner, in CSS pixels.
pub const BADGE_INSET_PX: f64 = 4.0;

/// Badge label font size, in CSS pixels.
pub const BADGE_FONT_PX: f64 = 11.0;

// ── Background image ────────────────────────────────────────────

/// Narrowest background image the menu API accepts, in pixels.
pub const IMAGE_MIN_WIDTH: u32 = 800;

/// Widest background image the menu API accepts, in pixels.
pub const IMAGE_MAX_WIDTH: u32 = 2500;

/// Shortest background image the menu API accepts, in pixels.
pub const IMAGE_MIN_HEIGHT: u32 = 250;

/// Smallest accepted width / height ratio.
pub const IMAGE_MIN_ASPECT: f64 = 1.45;

/// Largest accepted image file.
pub const IMAGE_MAX_BYTES: u64 = 1024 * 1024;

/// Regions at least this wide (as a fraction of the canvas) ...
pub const PLACEHOLDER_MIN_WIDTH_RATIO: f64 = 0.8;

/// ... and at most this tall are dropped when the first image is set.
pub const PLACEHOLDER_MAX_HEIGHT_RATIO: f64 = 0.25;
