//! Rendering: paints an [`Overlay`] onto a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a fully projected overlay and produces pixels; it does not
//! mutate any application state. The background image is not drawn here: the
//! canvas sits transparently on top of the host's `<img>` element.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{
    BADGE_FILL, BADGE_FONT_PX, BADGE_INSET_PX, HANDLE_RADIUS_PX, REGION_DASH_PX, REGION_FILL, REGION_LINE_WIDTH_PX,
    REGION_STROKE, SELECTED_FILL, SELECTED_STROKE,
};
use crate::overlay::{HandleMark, Overlay, RegionOverlay, ScreenRect};

/// Horizontal padding inside the badge, in CSS pixels.
const BADGE_PAD_X: f64 = 6.0;
/// Vertical padding inside the badge, in CSS pixels.
const BADGE_PAD_Y: f64 = 2.0;

/// Draw one frame.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    overlay: &Overlay,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);

    // Unselected first so the selected region always paints on top.
    for region in overlay.regions.iter().filter(|r| !r.selected) {
        draw_region(ctx, region)?;
    }
    for region in overlay.regions.iter().filter(|r| r.selected) {
        draw_region(ctx, region)?;
        draw_handles(ctx, &region.handles);
    }

    if let Some(draft) = overlay.draft {
        draw_draft(ctx, draft)?;
    }
    Ok(())
}

// =============================================================
// Regions
// =============================================================

fn draw_region(ctx: &CanvasRenderingContext2d, region: &RegionOverlay) -> Result<(), JsValue> {
    let r = region.rect;
    ctx.save();

    if region.selected {
        ctx.set_fill_style_str(SELECTED_FILL);
        ctx.set_stroke_style_str(SELECTED_STROKE);
    } else {
        ctx.set_fill_style_str(REGION_FILL);
        ctx.set_stroke_style_str(REGION_STROKE);
        set_dash(ctx, REGION_DASH_PX)?;
    }
    ctx.set_line_width(REGION_LINE_WIDTH_PX);
    ctx.fill_rect(r.left, r.top, r.width, r.height);
    stroke_inset(ctx, r);
    clear_dash(ctx)?;

    draw_badge(ctx, r, &region.badge)?;
    ctx.restore();
    Ok(())
}

fn draw_badge(ctx: &CanvasRenderingContext2d, rect: ScreenRect, label: &str) -> Result<(), JsValue> {
    ctx.set_font(&format!("{BADGE_FONT_PX:.0}px sans-serif"));
    let text_w = measured_text_width(ctx, label);
    let w = text_w + BADGE_PAD_X * 2.0;
    let h = BADGE_FONT_PX + BADGE_PAD_Y * 2.0;
    let x = rect.left + BADGE_INSET_PX;
    let y = rect.top + BADGE_INSET_PX;

    ctx.set_fill_style_str(BADGE_FILL);
    ctx.fill_rect(x, y, w, h);
    ctx.set_fill_style_str("#fff");
    ctx.set_text_baseline("middle");
    ctx.fill_text(label, x + BADGE_PAD_X, y + h * 0.5)?;
    Ok(())
}

fn measured_text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    match ctx.measure_text(text) {
        Ok(metrics) => metrics.width(),
        Err(_) => BADGE_FONT_PX * 0.6 * f64::from(u32::try_from(text.chars().count()).unwrap_or(u32::MAX)),
    }
}

// =============================================================
// Selection UI
// =============================================================

fn draw_handles(ctx: &CanvasRenderingContext2d, handles: &[HandleMark]) {
    ctx.save();
    ctx.set_fill_style_str("#fff");
    ctx.set_stroke_style_str(SELECTED_STROKE);
    ctx.set_line_width(1.0);
    let size = HANDLE_RADIUS_PX * 2.0;
    for handle in handles {
        let x = handle.center.x - HANDLE_RADIUS_PX;
        let y = handle.center.y - HANDLE_RADIUS_PX;
        ctx.fill_rect(x, y, size, size);
        ctx.stroke_rect(x, y, size, size);
    }
    ctx.restore();
}

fn draw_draft(ctx: &CanvasRenderingContext2d, draft: ScreenRect) -> Result<(), JsValue> {
    ctx.save();
    set_dash(ctx, REGION_DASH_PX)?;
    ctx.set_fill_style_str(REGION_FILL);
    ctx.set_stroke_style_str(REGION_STROKE);
    ctx.set_line_width(REGION_LINE_WIDTH_PX);
    ctx.fill_rect(draft.left, draft.top, draft.width, draft.height);
    stroke_inset(ctx, draft);
    clear_dash(ctx)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Stroke the border inside the rectangle, like a CSS border.
fn stroke_inset(ctx: &CanvasRenderingContext2d, r: ScreenRect) {
    let half = REGION_LINE_WIDTH_PX / 2.0;
    let w = (r.width - REGION_LINE_WIDTH_PX).max(0.0);
    let h = (r.height - REGION_LINE_WIDTH_PX).max(0.0);
    ctx.stroke_rect(r.left + half, r.top + half, w, h);
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash_px: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash_px.into());
    dash_array.push(&dash_px.into());
    ctx.set_line_dash(&dash_array)
}

fn clear_dash(ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
    ctx.set_line_dash(&js_sys::Array::new())
}
