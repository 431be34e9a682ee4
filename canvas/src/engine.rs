use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{HANDLE_RADIUS_PX, IMAGE_SWAP_SUPPRESS_MS, MIN_DRAW_SIZE, MIN_VIEWPORT_PX};
use crate::doc::{self, Bounds, Region, RegionId, RegionPatch, RegionStore};
use crate::error::{ImageError, MenuError, StoreError};
use crate::hit::{self, HitPart, ResizeAnchor};
use crate::input::{self, Button, GestureState, UiState};
use crate::mapper::{self, CanvasSize, LogicalPoint, Point, ViewportRect};
use crate::menu::{self, MenuSettings, RichMenuDoc};
use crate::overlay::{self, Overlay};
use crate::preview::{self, PreviewOutcome, Toast};
use crate::render;
use crate::resize;
use crate::template::Template;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A region was drawn and added to the store.
    RegionCreated(Region),
    /// The region collection changed; `revision` is the store's new counter.
    RegionsChanged { revision: u64 },
    /// The selected region changed.
    SelectionChanged(Option<RegionId>),
    /// A region was tapped in preview mode.
    PreviewRequested { id: RegionId, outcome: PreviewOutcome },
    SetCursor(String),
    RenderNeeded,
}

/// Background image state as far as gestures care about it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageState {
    /// Current image URL or data URL.
    pub url: Option<String>,
    /// When `url` was last set, for suppressing stray draws right after a swap.
    pub set_at_ms: Option<f64>,
    /// Decoded pixel size, once the host reports the image has loaded.
    pub natural_size: Option<(u32, u32)>,
}

impl ImageState {
    /// Whether a draw finishing at `now_ms` falls inside the post-swap window.
    #[must_use]
    pub fn suppresses_draw_at(&self, now_ms: f64) -> bool {
        match (&self.url, self.set_at_ms) {
            (Some(_), Some(set_at)) => now_ms - set_at < IMAGE_SWAP_SUPPRESS_MS,
            _ => false,
        }
    }

    /// Check the loaded image against the menu API's size rules.
    ///
    /// Returns `None` until the image has loaded.
    #[must_use]
    pub fn check(&self) -> Option<Result<(), ImageError>> {
        self.natural_size.map(|(w, h)| menu::check_image_dimensions(w, h))
    }

    /// Whether the loaded image differs from the logical canvas size.
    #[must_use]
    pub fn mismatches(&self, canvas: CanvasSize) -> bool {
        self.natural_size.is_some_and(|(w, h)| {
            i64::from(w) != i64::from(canvas.width) || i64::from(h) != i64::from(canvas.height)
        })
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub store: RegionStore,
    pub ui: UiState,
    pub gesture: GestureState,
    pub canvas_size: CanvasSize,
    pub viewport: ViewportRect,
    pub settings: MenuSettings,
    image: ImageState,
    toast: Option<Toast>,
    cursor: &'static str,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            store: RegionStore::new(),
            ui: UiState::default(),
            gesture: GestureState::default(),
            canvas_size: CanvasSize::default(),
            viewport: ViewportRect::default(),
            settings: MenuSettings::default(),
            image: ImageState::default(),
            toast: None,
            cursor: "default",
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Viewport ---

    /// Record where the preview element currently sits on screen.
    #[must_use]
    pub fn set_viewport(&mut self, viewport: ViewportRect) -> Vec<Action> {
        if self.viewport == viewport {
            return Vec::new();
        }
        self.viewport = viewport;
        vec![Action::RenderNeeded]
    }

    /// Screen pixels per logical unit for the current viewport.
    #[must_use]
    pub fn scale(&self) -> f64 {
        mapper::scale_for(self.viewport, self.canvas_size)
    }

    // --- Region writes ---

    /// Replace the whole region collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TooManyRegions`] if more than the allowed number of
    /// distinct regions would remain; nothing changes.
    pub fn replace_regions(&mut self, regions: Vec<Region>) -> Result<Vec<Action>, StoreError> {
        let changed = self.store.replace_all(regions).inspect_err(|e| warn!(error = %e, "replace rejected"))?;
        Ok(self.after_bulk_write(changed))
    }

    /// Update regions by id in place and append new ones.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TooManyRegions`] if the merged collection would be too
    /// large; nothing changes.
    pub fn merge_regions(&mut self, regions: Vec<Region>) -> Result<Vec<Action>, StoreError> {
        let changed = self.store.merge(regions).inspect_err(|e| warn!(error = %e, "merge rejected"))?;
        Ok(self.after_bulk_write(changed))
    }

    /// Apply a field edit to one region. Stale ids are ignored.
    #[must_use]
    pub fn update_region(&mut self, id: &RegionId, patch: &RegionPatch) -> Vec<Action> {
        if self.store.update_one(id, patch) {
            self.changed_actions()
        } else {
            Vec::new()
        }
    }

    /// Delete one region. Deleting the selected region clears the selection.
    #[must_use]
    pub fn remove_region(&mut self, id: &RegionId) -> Vec<Action> {
        if self.store.remove_one(id).is_none() {
            return Vec::new();
        }
        let mut actions = self.changed_actions();
        self.drop_stale_selection(&mut actions);
        actions
    }

    /// Append one region.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CapacityReached`] or [`StoreError::DuplicateId`].
    pub fn add_region(&mut self, region: Region) -> Result<Vec<Action>, StoreError> {
        self.store.add(region)?;
        Ok(self.changed_actions())
    }

    /// Replace every region with a preset layout and select its first region.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the bulk replace.
    pub fn apply_template(&mut self, template: Template) -> Result<Vec<Action>, StoreError> {
        let regions = template.build(self.canvas_size);
        let first = regions.first().map(|r| r.id);
        let mut actions = self.replace_regions(regions)?;
        info!(template = template.id(), count = self.store.len(), "template applied");
        self.gesture = GestureState::Idle;
        self.select(first, &mut actions);
        Ok(actions)
    }

    // --- Menu documents ---

    /// Load a whole menu document: size, settings, and regions with fresh ids.
    ///
    /// The selection is reset. A document that carries an image URL counts
    /// as an image swap at `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Store`] if the document has too many areas; the
    /// editor is left unchanged.
    pub fn load_menu(&mut self, doc: &RichMenuDoc, now_ms: f64) -> Result<Vec<Action>, MenuError> {
        let mut actions = self.replace_regions(doc.to_regions())?;
        info!(name = %doc.name, count = doc.areas.len(), "menu loaded");

        self.canvas_size = doc.size;
        self.settings = doc.settings();
        if let Some(url) = &doc.image_url {
            self.image = ImageState { url: Some(url.clone()), set_at_ms: Some(now_ms), natural_size: None };
        }
        self.gesture = GestureState::Idle;
        self.select(None, &mut actions);
        push_render(&mut actions);
        Ok(actions)
    }

    /// Parse and load a menu document.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Json`] for malformed text, or the errors of [`Self::load_menu`].
    pub fn import_menu_json(&mut self, text: &str, now_ms: f64) -> Result<Vec<Action>, MenuError> {
        let doc = RichMenuDoc::from_json(text)?;
        self.load_menu(&doc, now_ms)
    }

    /// The current menu as an API document.
    #[must_use]
    pub fn export_menu(&self) -> RichMenuDoc {
        RichMenuDoc::from_parts(&self.settings, self.canvas_size, self.store.regions())
    }

    // --- Editor state ---

    /// Select a region, or clear the selection with `None`. Unknown ids are ignored.
    #[must_use]
    pub fn set_selection(&mut self, id: Option<RegionId>) -> Vec<Action> {
        let mut actions = Vec::new();
        if id.is_some_and(|id| self.store.get(&id).is_none()) {
            return actions;
        }
        self.select(id, &mut actions);
        actions
    }

    #[must_use]
    pub fn set_canvas_size(&mut self, size: CanvasSize) -> Vec<Action> {
        if self.canvas_size == size {
            return Vec::new();
        }
        self.canvas_size = size;
        vec![Action::RenderNeeded]
    }

    /// Swap the background image.
    ///
    /// Any gesture in progress is dropped. Setting the first image after none
    /// removes placeholder banner regions. Re-sending the current reference is
    /// a no-op.
    #[must_use]
    pub fn set_image(&mut self, url: Option<String>, now_ms: f64) -> Vec<Action> {
        if self.image.url == url {
            return Vec::new();
        }
        let had_image = self.image.url.is_some();
        let set_at_ms = url.as_ref().map(|_| now_ms);
        let gains_image = !had_image && url.is_some();
        self.image = ImageState { url, set_at_ms, natural_size: None };
        self.gesture = GestureState::Idle;

        let mut actions = Vec::new();
        if gains_image {
            let size = self.canvas_size;
            let kept: Vec<Region> =
                self.store.regions().iter().filter(|r| !menu::is_placeholder_banner(r.bounds, size)).cloned().collect();
            let removed = self.store.len() - kept.len();
            if removed > 0 {
                match self.replace_regions(kept) {
                    Ok(mut pruned) => {
                        info!(removed, "placeholder regions removed");
                        actions.append(&mut pruned);
                    }
                    Err(e) => warn!(error = %e, "placeholder pruning failed"),
                }
            }
        }
        push_render(&mut actions);
        actions
    }

    /// The host decoded the background image.
    #[must_use]
    pub fn on_image_loaded(&mut self, natural_width: u32, natural_height: u32) -> Vec<Action> {
        self.image.natural_size = Some((natural_width, natural_height));
        self.gesture = GestureState::Idle;
        if let Some(Err(e)) = self.image.check() {
            warn!(error = %e, "background image outside menu limits");
        }
        vec![Action::RenderNeeded]
    }

    /// Switch between editing and preview. Leaving edit mode drops any gesture
    /// and the selection.
    #[must_use]
    pub fn set_edit_mode(&mut self, edit_mode: bool) -> Vec<Action> {
        self.ui.edit_mode = edit_mode;
        let mut actions = Vec::new();
        if !edit_mode {
            self.gesture = GestureState::Idle;
            self.select(None, &mut actions);
        }
        push_render(&mut actions);
        actions
    }

    pub fn set_draw_enabled(&mut self, enabled: bool) {
        self.ui.draw_enabled = enabled;
    }

    /// Hide the toast once it is due.
    #[must_use]
    pub fn expire_toast(&mut self, now_ms: f64) -> Vec<Action> {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now_ms)) {
            self.toast = None;
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    // --- Pointer input ---

    /// Handle a pointer-down over the preview at screen position `screen`.
    #[must_use]
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, now_ms: f64) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let p = mapper::to_logical(screen, self.viewport, self.canvas_size);

        if !self.ui.edit_mode {
            return self.preview_tap(p, now_ms);
        }
        if !self.gesture.is_idle() {
            debug!(gesture = ?self.gesture, "dropping unfinished gesture");
            self.gesture = GestureState::Idle;
        }

        let mut actions = Vec::new();
        let hit = hit::hit_test(p, self.store.regions(), self.ui.selected_id, self.scale(), HANDLE_RADIUS_PX);
        match hit {
            Some(hit::Hit { region_id, part: HitPart::ResizeHandle(anchor) }) => {
                self.start_resize(region_id, anchor, &mut actions);
            }
            Some(hit::Hit { region_id, part: HitPart::Body }) => {
                let origin = self.store.get(&region_id).map_or(LogicalPoint::default(), |r| {
                    LogicalPoint::new(r.bounds.x, r.bounds.y)
                });
                let offset = LogicalPoint::new(p.x - origin.x, p.y - origin.y);
                self.gesture = GestureState::PendingMove { id: region_id, start: p, offset };
                self.select(Some(region_id), &mut actions);
                self.set_cursor("move", &mut actions);
            }
            None if self.ui.draw_enabled => {
                self.gesture = GestureState::PendingDraw { start: p };
                self.select(None, &mut actions);
            }
            None => {}
        }
        debug!(gesture = ?self.gesture, x = p.x, y = p.y, "pointer down");
        push_render(&mut actions);
        actions
    }

    /// Start resizing from a host-rendered handle.
    #[must_use]
    pub fn begin_resize(&mut self, id: RegionId, anchor: ResizeAnchor) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.ui.edit_mode || self.store.get(&id).is_none() {
            return actions;
        }
        self.start_resize(id, anchor, &mut actions);
        push_render(&mut actions);
        actions
    }

    #[must_use]
    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        let p = mapper::to_logical(screen, self.viewport, self.canvas_size);
        let mut actions = Vec::new();

        if !self.ui.edit_mode {
            let over = hit::hit_test(p, self.store.regions(), None, self.scale(), HANDLE_RADIUS_PX).is_some();
            self.set_cursor(if over { "pointer" } else { "default" }, &mut actions);
            return actions;
        }

        match self.gesture {
            GestureState::Idle => self.update_hover_cursor(p, &mut actions),
            GestureState::PendingDraw { start } => {
                if input::exceeds_drag_threshold(start, p) {
                    self.gesture = GestureState::Drawing { start, current: p };
                    debug!("draw started");
                    push_render(&mut actions);
                }
            }
            GestureState::Drawing { start, .. } => {
                self.gesture = GestureState::Drawing { start, current: p };
                push_render(&mut actions);
            }
            GestureState::PendingMove { id, start, offset } => {
                if input::exceeds_drag_threshold(start, p) {
                    self.gesture = GestureState::Moving { id, offset };
                    debug!(id = %id, "move started");
                    self.apply_move(id, offset, p, &mut actions);
                }
            }
            GestureState::Moving { id, offset } => self.apply_move(id, offset, p, &mut actions),
            GestureState::Resizing { id, anchor } => self.apply_resize(id, anchor, p, &mut actions),
        }
        actions
    }

    /// Pointer released over the preview.
    #[must_use]
    pub fn on_pointer_up(&mut self, now_ms: f64) -> Vec<Action> {
        self.finish_gesture(now_ms)
    }

    /// Pointer released anywhere in the window.
    #[must_use]
    pub fn on_window_pointer_up(&mut self, now_ms: f64) -> Vec<Action> {
        self.finish_gesture(now_ms)
    }

    /// The window lost focus mid-gesture.
    #[must_use]
    pub fn on_window_blur(&mut self, now_ms: f64) -> Vec<Action> {
        self.finish_gesture(now_ms)
    }

    // --- Queries ---

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        self.store.regions()
    }

    #[must_use]
    pub fn region(&self, id: &RegionId) -> Option<&Region> {
        self.store.get(id)
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// The currently selected region, if any.
    #[must_use]
    pub fn selection(&self) -> Option<RegionId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    #[must_use]
    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    #[must_use]
    pub fn image(&self) -> &ImageState {
        &self.image
    }

    #[must_use]
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Screen-space projection of the current frame.
    #[must_use]
    pub fn overlay(&self) -> Overlay {
        overlay::project(self.store.regions(), &self.gesture, self.ui.selected_id, self.scale(), self.ui.edit_mode)
    }

    // --- Gesture internals ---

    fn preview_tap(&mut self, p: LogicalPoint, now_ms: f64) -> Vec<Action> {
        let Some(hit) = hit::hit_test(p, self.store.regions(), None, self.scale(), HANDLE_RADIUS_PX) else {
            return Vec::new();
        };
        let Some(region) = self.store.get(&hit.region_id) else {
            return Vec::new();
        };
        let outcome = preview::simulate(&region.action);
        if let Some(message) = &outcome.toast {
            self.toast = Some(Toast::new(message.clone(), now_ms));
        }
        debug!(id = %region.id, "preview tap");
        vec![Action::PreviewRequested { id: region.id, outcome }, Action::RenderNeeded]
    }

    fn start_resize(&mut self, id: RegionId, anchor: ResizeAnchor, actions: &mut Vec<Action>) {
        self.gesture = GestureState::Resizing { id, anchor };
        self.select(Some(id), actions);
        self.set_cursor(anchor.cursor(), actions);
        debug!(id = %id, anchor = ?anchor, "resize started");
    }

    fn apply_move(&mut self, id: RegionId, offset: LogicalPoint, p: LogicalPoint, actions: &mut Vec<Action>) {
        let Some(region) = self.store.get(&id) else {
            return;
        };
        let size = self.canvas_size;
        let x = (p.x - offset.x).min(size.width - 1).max(0);
        let y = (p.y - offset.y).min(size.height - 1).max(0);
        let bounds = Bounds { x, y, ..region.bounds };
        if self.store.update_one(&id, &RegionPatch::bounds(bounds)) {
            actions.append(&mut self.changed_actions());
        }
    }

    fn apply_resize(&mut self, id: RegionId, anchor: ResizeAnchor, p: LogicalPoint, actions: &mut Vec<Action>) {
        let Some(region) = self.store.get(&id) else {
            return;
        };
        let bounds = resize::resize_bounds(region.bounds, anchor, p, self.canvas_size);
        if self.store.update_one(&id, &RegionPatch::bounds(bounds)) {
            actions.append(&mut self.changed_actions());
        }
    }

    fn finish_gesture(&mut self, now_ms: f64) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.gesture);
        let mut actions = Vec::new();
        if !self.ui.edit_mode {
            return actions;
        }

        match gesture {
            GestureState::Idle => return actions,
            GestureState::Drawing { start, current } => {
                self.finish_draw(Bounds::from_corners(start, current), now_ms, &mut actions);
            }
            GestureState::PendingMove { id, .. } => {
                if self.store.get(&id).is_some() {
                    self.select(Some(id), &mut actions);
                }
            }
            GestureState::PendingDraw { .. } | GestureState::Moving { .. } | GestureState::Resizing { .. } => {}
        }
        self.set_cursor("default", &mut actions);
        push_render(&mut actions);
        actions
    }

    fn finish_draw(&mut self, rect: Bounds, now_ms: f64, actions: &mut Vec<Action>) {
        if self.image.suppresses_draw_at(now_ms) {
            debug!("draw dropped: image swapped moments ago");
            return;
        }
        if !self.viewport.accepts_draw(MIN_VIEWPORT_PX) {
            debug!(width = self.viewport.width, height = self.viewport.height, "draw dropped: viewport too small");
            return;
        }
        if rect.width < MIN_DRAW_SIZE || rect.height < MIN_DRAW_SIZE {
            debug!(width = rect.width, height = rect.height, "draw dropped: too small");
            return;
        }

        let region = Region::new(rect, doc::Action::default());
        let id = region.id;
        if let Err(e) = self.store.add(region.clone()) {
            warn!(error = %e, "draw dropped");
            return;
        }
        info!(id = %id, x = rect.x, y = rect.y, width = rect.width, height = rect.height, "region created");
        actions.push(Action::RegionCreated(region));
        actions.append(&mut self.changed_actions());
        self.select(Some(id), actions);
    }

    fn update_hover_cursor(&mut self, p: LogicalPoint, actions: &mut Vec<Action>) {
        let hit = hit::hit_test(p, self.store.regions(), self.ui.selected_id, self.scale(), HANDLE_RADIUS_PX);
        let cursor = match hit {
            Some(hit::Hit { part: HitPart::ResizeHandle(anchor), .. }) => anchor.cursor(),
            Some(hit::Hit { part: HitPart::Body, .. }) => "move",
            None if self.ui.draw_enabled => "crosshair",
            None => "default",
        };
        self.set_cursor(cursor, actions);
    }

    // --- Helpers ---

    fn select(&mut self, id: Option<RegionId>, actions: &mut Vec<Action>) {
        if self.ui.selected_id != id {
            self.ui.selected_id = id;
            actions.push(Action::SelectionChanged(id));
        }
    }

    fn set_cursor(&mut self, cursor: &'static str, actions: &mut Vec<Action>) {
        if self.cursor != cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor.to_owned()));
        }
    }

    fn changed_actions(&self) -> Vec<Action> {
        vec![Action::RegionsChanged { revision: self.store.revision() }, Action::RenderNeeded]
    }

    fn after_bulk_write(&mut self, changed: bool) -> Vec<Action> {
        if !changed {
            return Vec::new();
        }
        debug!(count = self.store.len(), revision = self.store.revision(), "regions replaced");
        let mut actions = self.changed_actions();
        self.drop_stale_selection(&mut actions);
        actions
    }

    fn drop_stale_selection(&mut self, actions: &mut Vec<Action>) {
        if self.ui.selected_id.is_some_and(|id| self.store.get(&id).is_none()) {
            self.select(None, actions);
        }
    }
}

fn push_render(actions: &mut Vec<Action>) {
    if !actions.contains(&Action::RenderNeeded) {
        actions.push(Action::RenderNeeded);
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
///
/// The canvas is an overlay stacked on the preview image; its bounding rect
/// is the viewport used for coordinate mapping.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
    dpr: f64,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let mut engine = Self { canvas, core: EngineCore::new(), dpr: 1.0 };
        // Nothing has been drawn yet; the host renders once after construction.
        engine.core.viewport = engine.measure_viewport();
        engine
    }

    // --- Viewport ---

    /// Re-read the canvas position and size and resize its backing store.
    #[must_use]
    pub fn sync_viewport(&mut self) -> Vec<Action> {
        let viewport = self.measure_viewport();
        self.core.set_viewport(viewport)
    }

    fn measure_viewport(&mut self) -> ViewportRect {
        let rect = self.canvas.get_bounding_client_rect();
        self.dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let viewport = ViewportRect::new(rect.left(), rect.top(), rect.width(), rect.height());
        self.canvas.set_width(backing_px(viewport.width, self.dpr));
        self.canvas.set_height(backing_px(viewport.height, self.dpr));
        viewport
    }

    // --- Input events ---

    /// `client_x`/`client_y` are `MouseEvent.clientX/Y`; `button` is `MouseEvent.button`.
    #[must_use]
    pub fn on_pointer_down(&mut self, client_x: f64, client_y: f64, button: i16) -> Vec<Action> {
        let mut actions = self.sync_viewport();
        let now = js_sys::Date::now();
        actions.extend(self.core.on_pointer_down(Point::new(client_x, client_y), Button::from_dom(button), now));
        actions
    }

    #[must_use]
    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64) -> Vec<Action> {
        self.core.on_pointer_move(Point::new(client_x, client_y))
    }

    #[must_use]
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_pointer_up(js_sys::Date::now())
    }

    #[must_use]
    pub fn on_window_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_window_pointer_up(js_sys::Date::now())
    }

    #[must_use]
    pub fn on_window_blur(&mut self) -> Vec<Action> {
        self.core.on_window_blur(js_sys::Date::now())
    }

    #[must_use]
    pub fn begin_resize(&mut self, id: RegionId, anchor: ResizeAnchor) -> Vec<Action> {
        self.core.begin_resize(id, anchor)
    }

    // --- Delegated writes ---

    /// See [`EngineCore::replace_regions`].
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`].
    pub fn replace_regions(&mut self, regions: Vec<Region>) -> Result<Vec<Action>, StoreError> {
        self.core.replace_regions(regions)
    }

    /// See [`EngineCore::merge_regions`].
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`].
    pub fn merge_regions(&mut self, regions: Vec<Region>) -> Result<Vec<Action>, StoreError> {
        self.core.merge_regions(regions)
    }

    #[must_use]
    pub fn update_region(&mut self, id: &RegionId, patch: &RegionPatch) -> Vec<Action> {
        self.core.update_region(id, patch)
    }

    #[must_use]
    pub fn remove_region(&mut self, id: &RegionId) -> Vec<Action> {
        self.core.remove_region(id)
    }

    /// See [`EngineCore::add_region`].
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`].
    pub fn add_region(&mut self, region: Region) -> Result<Vec<Action>, StoreError> {
        self.core.add_region(region)
    }

    /// See [`EngineCore::apply_template`].
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`].
    pub fn apply_template(&mut self, template: Template) -> Result<Vec<Action>, StoreError> {
        self.core.apply_template(template)
    }

    /// See [`EngineCore::load_menu`].
    ///
    /// # Errors
    ///
    /// Propagates [`MenuError`].
    pub fn load_menu(&mut self, doc: &RichMenuDoc) -> Result<Vec<Action>, MenuError> {
        self.core.load_menu(doc, js_sys::Date::now())
    }

    /// See [`EngineCore::import_menu_json`].
    ///
    /// # Errors
    ///
    /// Propagates [`MenuError`].
    pub fn import_menu_json(&mut self, text: &str) -> Result<Vec<Action>, MenuError> {
        self.core.import_menu_json(text, js_sys::Date::now())
    }

    #[must_use]
    pub fn set_selection(&mut self, id: Option<RegionId>) -> Vec<Action> {
        self.core.set_selection(id)
    }

    #[must_use]
    pub fn set_canvas_size(&mut self, size: CanvasSize) -> Vec<Action> {
        self.core.set_canvas_size(size)
    }

    #[must_use]
    pub fn set_image(&mut self, url: Option<String>) -> Vec<Action> {
        self.core.set_image(url, js_sys::Date::now())
    }

    #[must_use]
    pub fn on_image_loaded(&mut self, natural_width: u32, natural_height: u32) -> Vec<Action> {
        self.core.on_image_loaded(natural_width, natural_height)
    }

    #[must_use]
    pub fn set_edit_mode(&mut self, edit_mode: bool) -> Vec<Action> {
        self.core.set_edit_mode(edit_mode)
    }

    pub fn set_draw_enabled(&mut self, enabled: bool) {
        self.core.set_draw_enabled(enabled);
    }

    #[must_use]
    pub fn expire_toast(&mut self) -> Vec<Action> {
        self.core.expire_toast(js_sys::Date::now())
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let viewport = self.core.viewport;
        render::draw(&ctx, &self.core.overlay(), viewport.width, viewport.height, self.dpr)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        self.core.regions()
    }

    #[must_use]
    pub fn selection(&self) -> Option<RegionId> {
        self.core.selection()
    }

    #[must_use]
    pub fn export_menu(&self) -> RichMenuDoc {
        self.core.export_menu()
    }

    #[must_use]
    pub fn toast(&self) -> Option<&Toast> {
        self.core.toast()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn backing_px(css_px: f64, dpr: f64) -> u32 {
    let px = (css_px * dpr).round();
    if px.is_finite() && px > 0.0 { px.min(f64::from(u32::MAX)) as u32 } else { 0 }
}
