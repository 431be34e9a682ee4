#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::consts::MAX_REGIONS;
use crate::doc::{Action as RegionAction, ActionKind};

// =============================================================
// Helpers
// =============================================================

const T0: f64 = 100_000.0;

/// Engine whose viewport maps one screen pixel to one logical unit.
fn core() -> EngineCore {
    let mut core = EngineCore::new();
    let _ = core.set_viewport(ViewportRect::new(0.0, 0.0, 2500.0, 1686.0));
    core
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn down(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_down(pt(x, y), Button::Primary, T0)
}

fn drag(core: &mut EngineCore, from: (f64, f64), to: (f64, f64)) -> Vec<Action> {
    let mut actions = down(core, from.0, from.1);
    actions.extend(core.on_pointer_move(pt(to.0, to.1)));
    actions.extend(core.on_pointer_up(T0 + 1_000.0));
    actions
}

fn add(core: &mut EngineCore, x: i32, y: i32, w: i32, h: i32) -> RegionId {
    add_with(core, Bounds::new(x, y, w, h), RegionAction::default())
}

fn add_with(core: &mut EngineCore, bounds: Bounds, action: RegionAction) -> RegionId {
    let region = Region::new(bounds, action);
    let id = region.id;
    core.add_region(region).unwrap();
    id
}

fn bounds(core: &EngineCore, id: RegionId) -> Bounds {
    core.region(&id).unwrap().bounds
}

fn has_action(actions: &[Action], pred: impl Fn(&Action) -> bool) -> bool {
    actions.iter().any(pred)
}

fn created(actions: &[Action]) -> Option<&Region> {
    actions.iter().find_map(|a| match a {
        Action::RegionCreated(r) => Some(r),
        _ => None,
    })
}

fn regions_changed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RegionsChanged { .. }))
}

// =============================================================
// Drawing
// =============================================================

#[test]
fn draw_creates_selected_region_with_default_action() {
    let mut core = core();
    let actions = drag(&mut core, (100.0, 100.0), (600.0, 500.0));

    assert_eq!(core.regions().len(), 1);
    let region = &core.regions()[0];
    assert_eq!(region.bounds, Bounds::new(100, 100, 500, 400));
    assert_eq!(region.action, RegionAction::Message { text: "Hello".into() });
    assert_eq!(core.selection(), Some(region.id));

    assert_eq!(created(&actions), Some(region));
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(Some(region.id))));
    assert!(regions_changed(&actions));
    assert!(core.gesture().is_idle());
}

#[test]
fn draw_toward_origin_normalizes_rect() {
    let mut core = core();
    drag(&mut core, (600.0, 500.0), (100.0, 100.0));
    assert_eq!(core.regions()[0].bounds, Bounds::new(100, 100, 500, 400));
}

#[test]
fn draw_tracks_latest_move() {
    let mut core = core();
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(300.0, 300.0));
    let _ = core.on_pointer_move(pt(200.0, 250.0));
    assert_eq!(core.gesture().draft(), Some(Bounds::new(100, 100, 100, 150)));
    let _ = core.on_pointer_up(T0);
    assert_eq!(core.regions()[0].bounds, Bounds::new(100, 100, 100, 150));
}

#[test]
fn click_on_empty_space_creates_nothing_and_clears_selection() {
    let mut core = core();
    let id = add(&mut core, 1000, 1000, 100, 100);
    let _ = core.set_selection(Some(id));

    let actions = drag(&mut core, (100.0, 100.0), (104.0, 104.0));
    assert_eq!(core.regions().len(), 1);
    assert_eq!(core.selection(), None);
    assert!(created(&actions).is_none());
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));
}

#[test]
fn pending_draw_below_threshold_stays_pending() {
    let mut core = core();
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(103.0, 96.0));
    assert!(matches!(core.gesture(), GestureState::PendingDraw { .. }));
}

#[test]
fn drag_just_past_threshold_creates_region() {
    let mut core = core();
    drag(&mut core, (100.0, 100.0), (105.0, 105.0));
    assert_eq!(core.regions().len(), 1);
    assert_eq!(core.regions()[0].bounds, Bounds::new(100, 100, 5, 5));
}

#[test]
fn thin_draw_is_discarded() {
    let mut core = core();
    let actions = drag(&mut core, (100.0, 100.0), (200.0, 103.0));
    assert!(core.regions().is_empty());
    assert!(created(&actions).is_none());
    assert!(core.gesture().is_idle());
}

#[test]
fn draw_suppressed_right_after_image_swap() {
    let mut core = core();
    let _ = core.set_image(Some("menu.png".into()), T0);

    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(600.0, 500.0));
    let _ = core.on_pointer_up(T0 + 299.0);
    assert!(core.regions().is_empty());

    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(600.0, 500.0));
    let _ = core.on_pointer_up(T0 + 300.0);
    assert_eq!(core.regions().len(), 1);
}

#[test]
fn clearing_image_does_not_suppress() {
    let mut core = core();
    let _ = core.set_image(Some("a.png".into()), T0 - 10_000.0);
    let _ = core.set_image(None, T0);
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(600.0, 500.0));
    let _ = core.on_pointer_up(T0 + 1.0);
    assert_eq!(core.regions().len(), 1);
}

#[test]
fn draw_ignored_on_tiny_viewport() {
    let mut core = core();
    let _ = core.set_viewport(ViewportRect::new(0.0, 0.0, 7.0, 100.0));
    down(&mut core, 1.0, 1.0);
    let _ = core.on_pointer_move(pt(6.0, 6.0));
    let _ = core.on_pointer_up(T0);
    assert!(core.regions().is_empty());
}

#[test]
fn draw_ignored_at_capacity() {
    let mut core = core();
    for i in 0..MAX_REGIONS {
        let x = i32::try_from(i).unwrap() * 10;
        add(&mut core, x, 1500, 5, 5);
    }
    let actions = drag(&mut core, (100.0, 100.0), (600.0, 500.0));
    assert_eq!(core.regions().len(), MAX_REGIONS);
    assert!(created(&actions).is_none());
}

#[test]
fn draw_disabled_leaves_gesture_idle() {
    let mut core = core();
    core.set_draw_enabled(false);
    drag(&mut core, (100.0, 100.0), (600.0, 500.0));
    assert!(core.regions().is_empty());
}

#[test]
fn draw_with_scaled_offset_viewport() {
    let mut core = EngineCore::new();
    let _ = core.set_viewport(ViewportRect::new(10.0, 20.0, 1250.0, 843.0));
    down(&mut core, 60.0, 70.0);
    let _ = core.on_pointer_move(pt(310.0, 270.0));
    let _ = core.on_pointer_up(T0);
    assert_eq!(core.regions()[0].bounds, Bounds::new(100, 100, 500, 400));
}

#[test]
fn draw_past_canvas_edge_is_clamped() {
    let mut core = core();
    drag(&mut core, (2400.0, 1600.0), (9000.0, 9000.0));
    assert_eq!(core.regions()[0].bounds, Bounds::new(2400, 1600, 100, 86));
}

#[test]
fn overlay_shows_draft_while_drawing() {
    let mut core = core();
    down(&mut core, 100.0, 100.0);
    assert!(core.overlay().draft.is_none());
    let _ = core.on_pointer_move(pt(300.0, 200.0));
    let draft = core.overlay().draft.unwrap();
    assert_eq!((draft.left, draft.top, draft.width, draft.height), (100.0, 100.0, 200.0, 100.0));
}

// =============================================================
// Moving
// =============================================================

#[test]
fn move_preserves_pointer_offset_and_size() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 50, 50);
    down(&mut core, 110.0, 110.0);
    assert_eq!(core.selection(), Some(id));

    let actions = core.on_pointer_move(pt(200.0, 200.0));
    assert!(matches!(core.gesture(), GestureState::Moving { .. }));
    assert_eq!(bounds(&core, id), Bounds::new(190, 190, 50, 50));
    assert!(regions_changed(&actions));

    let _ = core.on_pointer_move(pt(300.0, 250.0));
    assert_eq!(bounds(&core, id), Bounds::new(290, 240, 50, 50));
    let _ = core.on_pointer_up(T0);
    assert!(core.gesture().is_idle());
    assert_eq!(core.selection(), Some(id));
}

#[test]
fn move_clamps_origin_to_last_unit() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 50, 50);
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(9000.0, 9000.0));
    assert_eq!(bounds(&core, id), Bounds::new(2499, 1685, 50, 50));
}

#[test]
fn move_clamps_origin_at_zero() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 50, 50);
    down(&mut core, 140.0, 140.0);
    let _ = core.on_pointer_move(pt(0.0, 0.0));
    assert_eq!(bounds(&core, id), Bounds::new(0, 0, 50, 50));
}

#[test]
fn click_on_region_selects_without_moving() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 50, 50);
    let rev = core.revision();
    let actions = drag(&mut core, (120.0, 120.0), (123.0, 117.0));
    assert_eq!(core.selection(), Some(id));
    assert_eq!(bounds(&core, id), Bounds::new(100, 100, 50, 50));
    assert_eq!(core.revision(), rev);
    assert!(!regions_changed(&actions));
}

#[test]
fn pointer_down_on_region_selects_immediately() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 50, 50);
    let actions = down(&mut core, 120.0, 120.0);
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(Some(id))));
    assert!(matches!(core.gesture(), GestureState::PendingMove { id: g, offset, .. } if g == id && offset == LogicalPoint::new(20, 20)));
}

#[test]
fn move_targets_topmost_region() {
    let mut core = core();
    let below = add(&mut core, 0, 0, 200, 200);
    let above = add(&mut core, 100, 100, 200, 200);
    down(&mut core, 150.0, 150.0);
    let _ = core.on_pointer_move(pt(250.0, 250.0));
    assert_eq!(bounds(&core, below), Bounds::new(0, 0, 200, 200));
    assert_eq!(bounds(&core, above), Bounds::new(200, 200, 200, 200));
}

#[test]
fn region_removed_mid_move_turns_moves_into_noops() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 50, 50);
    down(&mut core, 110.0, 110.0);
    let _ = core.on_pointer_move(pt(200.0, 200.0));
    let _ = core.remove_region(&id);

    let actions = core.on_pointer_move(pt(300.0, 300.0));
    assert!(!regions_changed(&actions));
    assert!(core.regions().is_empty());
    let _ = core.on_pointer_up(T0);
    assert!(core.gesture().is_idle());
    assert_eq!(core.selection(), None);
}

// =============================================================
// Resizing
// =============================================================

#[test]
fn resize_se_handle_shrinks() {
    let mut core = core();
    let id = add(&mut core, 0, 0, 100, 100);
    let _ = core.set_selection(Some(id));

    down(&mut core, 100.0, 100.0);
    assert!(matches!(core.gesture(), GestureState::Resizing { anchor: ResizeAnchor::Se, .. }));
    let _ = core.on_pointer_move(pt(50.0, 50.0));
    assert_eq!(bounds(&core, id), Bounds::new(0, 0, 50, 50));
}

#[test]
fn resize_starts_without_threshold() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 100, 100);
    let _ = core.set_selection(Some(id));
    down(&mut core, 100.0, 150.0);
    let _ = core.on_pointer_move(pt(98.0, 150.0));
    assert_eq!(bounds(&core, id), Bounds::new(98, 100, 102, 100));
}

#[test]
fn resize_far_outside_clamps_to_canvas() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 100, 100);
    let _ = core.set_selection(Some(id));
    down(&mut core, 200.0, 200.0);
    let _ = core.on_pointer_move(pt(99_999.0, 99_999.0));
    assert_eq!(bounds(&core, id), Bounds::new(100, 100, 2400, 1586));
}

#[test]
fn resize_rereads_bounds_from_store() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 100, 100);
    let _ = core.set_selection(Some(id));
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(90.0, 90.0));
    assert_eq!(bounds(&core, id), Bounds::new(90, 90, 110, 110));

    let _ = core.update_region(&id, &RegionPatch::bounds(Bounds::new(500, 500, 100, 100)));
    let _ = core.on_pointer_move(pt(450.0, 450.0));
    assert_eq!(bounds(&core, id), Bounds::new(450, 450, 150, 150));
}

#[test]
fn handles_of_unselected_region_are_inert() {
    let mut core = core();
    let id = add(&mut core, 0, 0, 100, 100);
    down(&mut core, 100.0, 100.0);
    assert!(matches!(core.gesture(), GestureState::PendingMove { .. }));
    assert_eq!(core.selection(), Some(id));
}

#[test]
fn begin_resize_from_host_handle() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 100, 100);
    let actions = core.begin_resize(id, ResizeAnchor::E);
    assert_eq!(core.selection(), Some(id));
    assert!(has_action(&actions, |a| *a == Action::SetCursor("ew-resize".into())));
    let _ = core.on_pointer_move(pt(150.0, 0.0));
    assert_eq!(bounds(&core, id), Bounds::new(100, 100, 50, 100));
}

#[test]
fn begin_resize_unknown_id_is_noop() {
    let mut core = core();
    assert!(core.begin_resize(Uuid::new_v4(), ResizeAnchor::E).is_empty());
    assert!(core.gesture().is_idle());
}

#[test]
fn begin_resize_ignored_in_preview() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 100, 100);
    let _ = core.set_edit_mode(false);
    assert!(core.begin_resize(id, ResizeAnchor::E).is_empty());
}

// =============================================================
// Gesture termination
// =============================================================

#[test]
fn window_pointer_up_finishes_draw() {
    let mut core = core();
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(600.0, 500.0));
    let _ = core.on_window_pointer_up(T0);
    assert_eq!(core.regions().len(), 1);
    assert!(core.gesture().is_idle());
}

#[test]
fn window_blur_finishes_draw() {
    let mut core = core();
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(600.0, 500.0));
    let _ = core.on_window_blur(T0);
    assert_eq!(core.regions().len(), 1);
}

#[test]
fn second_pointer_up_is_harmless() {
    let mut core = core();
    drag(&mut core, (100.0, 100.0), (600.0, 500.0));
    let actions = core.on_window_pointer_up(T0);
    assert!(actions.is_empty());
    assert_eq!(core.regions().len(), 1);
}

#[test]
fn leaving_edit_mode_cancels_draw() {
    let mut core = core();
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(600.0, 500.0));
    let _ = core.set_edit_mode(false);
    assert!(core.gesture().is_idle());
    let _ = core.on_pointer_up(T0);
    assert!(core.regions().is_empty());
}

#[test]
fn leaving_edit_mode_mid_move_clears_selection() {
    let mut core = core();
    let id = add(&mut core, 1000, 1000, 100, 100);
    down(&mut core, 1050.0, 1050.0);
    let _ = core.on_pointer_move(pt(1100.0, 1100.0));
    assert_eq!(core.selection(), Some(id));

    let actions = core.set_edit_mode(false);
    assert!(core.gesture().is_idle());
    assert_eq!(core.selection(), None);
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));

    let _ = core.on_pointer_move(pt(1200.0, 1200.0));
    assert_eq!(bounds(&core, id), Bounds::new(1050, 1050, 100, 100));
}

#[test]
fn image_swap_cancels_gesture() {
    let mut core = core();
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(600.0, 500.0));
    let _ = core.set_image(Some("a.png".into()), T0);
    assert!(core.gesture().is_idle());
    let _ = core.on_pointer_up(T0 + 5_000.0);
    assert!(core.regions().is_empty());
}

#[test]
fn image_load_cancels_gesture() {
    let mut core = core();
    down(&mut core, 100.0, 100.0);
    let _ = core.on_image_loaded(2500, 1686);
    assert!(core.gesture().is_idle());
}

#[test]
fn secondary_button_ignored() {
    let mut core = core();
    let actions = core.on_pointer_down(pt(100.0, 100.0), Button::Secondary, T0);
    assert!(actions.is_empty());
    assert!(core.gesture().is_idle());
}

#[test]
fn stale_gesture_replaced_on_next_down() {
    let mut core = core();
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(600.0, 500.0));
    // Missed pointer-up; next down starts fresh.
    down(&mut core, 1000.0, 1000.0);
    assert!(matches!(core.gesture(), GestureState::PendingDraw { start } if start == LogicalPoint::new(1000, 1000)));
    assert!(core.regions().is_empty());
}

// =============================================================
// Cursor
// =============================================================

#[test]
fn hover_cursor_reflects_target() {
    let mut core = core();
    let id = add(&mut core, 100, 100, 100, 100);
    let actions = core.on_pointer_move(pt(150.0, 150.0));
    assert!(has_action(&actions, |a| *a == Action::SetCursor("move".into())));
    assert!(core.on_pointer_move(pt(160.0, 160.0)).is_empty());

    let actions = core.on_pointer_move(pt(1000.0, 1000.0));
    assert!(has_action(&actions, |a| *a == Action::SetCursor("crosshair".into())));

    let _ = core.set_selection(Some(id));
    let actions = core.on_pointer_move(pt(200.0, 200.0));
    assert!(has_action(&actions, |a| *a == Action::SetCursor("nwse-resize".into())));
}

// =============================================================
// Preview mode
// =============================================================

#[test]
fn preview_tap_requests_simulation() {
    let mut core = core();
    let id = add_with(&mut core, Bounds::new(0, 0, 500, 500), RegionAction::Uri { uri: "https://example.com".into() });
    let _ = core.set_edit_mode(false);

    let actions = down(&mut core, 100.0, 100.0);
    let expected = PreviewOutcome { chat: "Open link: https://example.com".into(), toast: Some("URI: https://example.com".into()) };
    assert!(has_action(&actions, |a| *a == Action::PreviewRequested { id, outcome: expected.clone() }));
    assert_eq!(core.toast().map(|t| t.message.as_str()), Some("URI: https://example.com"));
    assert!(core.gesture().is_idle());
    assert_eq!(core.selection(), None);
}

#[test]
fn preview_tap_on_empty_space_does_nothing() {
    let mut core = core();
    add(&mut core, 0, 0, 100, 100);
    let _ = core.set_edit_mode(false);
    assert!(down(&mut core, 1000.0, 1000.0).is_empty());
}

#[test]
fn preview_drag_never_draws() {
    let mut core = core();
    let _ = core.set_edit_mode(false);
    drag(&mut core, (100.0, 100.0), (600.0, 500.0));
    assert!(core.regions().is_empty());
}

#[test]
fn preview_message_has_no_toast() {
    let mut core = core();
    add(&mut core, 0, 0, 500, 500);
    let _ = core.set_edit_mode(false);
    down(&mut core, 10.0, 10.0);
    assert!(core.toast().is_none());
}

#[test]
fn toast_expires() {
    let mut core = core();
    add_with(&mut core, Bounds::new(0, 0, 500, 500), RegionAction::blank(ActionKind::DatetimePicker));
    let _ = core.set_edit_mode(false);
    down(&mut core, 10.0, 10.0);
    assert!(core.toast().is_some());
    assert!(core.expire_toast(T0 + 2_499.0).is_empty());
    assert!(core.toast().is_some());
    assert_eq!(core.expire_toast(T0 + 2_500.0), [Action::RenderNeeded]);
    assert!(core.toast().is_none());
}

// =============================================================
// Region writes
// =============================================================

#[test]
fn replace_regions_twice_is_noop() {
    let mut core = core();
    let regions = vec![Region::new(Bounds::new(0, 0, 10, 10), RegionAction::default())];
    assert!(!core.replace_regions(regions.clone()).unwrap().is_empty());
    let rev = core.revision();
    assert!(core.replace_regions(regions).unwrap().is_empty());
    assert_eq!(core.revision(), rev);
}

#[test]
fn replace_without_selected_region_clears_selection() {
    let mut core = core();
    let id = add(&mut core, 0, 0, 10, 10);
    let _ = core.set_selection(Some(id));
    let actions = core.replace_regions(vec![Region::new(Bounds::new(5, 5, 5, 5), RegionAction::default())]).unwrap();
    assert_eq!(core.selection(), None);
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));
}

#[test]
fn replace_too_many_is_rejected_untouched() {
    let mut core = core();
    let id = add(&mut core, 0, 0, 10, 10);
    let many: Vec<Region> =
        (0..=MAX_REGIONS).map(|_| Region::new(Bounds::new(0, 0, 1, 1), RegionAction::default())).collect();
    assert!(matches!(core.replace_regions(many), Err(StoreError::TooManyRegions { .. })));
    assert_eq!(core.regions().len(), 1);
    assert_eq!(core.regions()[0].id, id);
}

#[test]
fn merge_regions_in_place_and_append() {
    let mut core = core();
    let a = add(&mut core, 0, 0, 10, 10);
    let b = add(&mut core, 10, 0, 10, 10);
    let c = add(&mut core, 20, 0, 10, 10);
    let b2 = Region { id: b, bounds: Bounds::new(10, 10, 10, 10), action: RegionAction::default() };
    let d = Region::new(Bounds::new(40, 0, 10, 10), RegionAction::default());
    core.merge_regions(vec![b2, d.clone()]).unwrap();
    let ids: Vec<RegionId> = core.regions().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![a, b, c, d.id]);
    assert_eq!(bounds(&core, b), Bounds::new(10, 10, 10, 10));
}

#[test]
fn update_region_stale_id_is_noop() {
    let mut core = core();
    add(&mut core, 0, 0, 10, 10);
    let actions = core.update_region(&Uuid::new_v4(), &RegionPatch::bounds(Bounds::new(1, 1, 1, 1)));
    assert!(actions.is_empty());
}

#[test]
fn update_region_action_edit() {
    let mut core = core();
    let id = add(&mut core, 0, 0, 10, 10);
    let action = RegionAction::Uri { uri: "https://example.com".into() };
    let actions = core.update_region(&id, &RegionPatch::action(action.clone()));
    assert!(regions_changed(&actions));
    assert_eq!(core.region(&id).unwrap().action, action);
}

#[test]
fn remove_selected_region_clears_selection() {
    let mut core = core();
    let id = add(&mut core, 0, 0, 10, 10);
    let _ = core.set_selection(Some(id));
    let actions = core.remove_region(&id);
    assert!(has_action(&actions, |a| *a == Action::SelectionChanged(None)));
    assert!(core.remove_region(&id).is_empty());
}

#[test]
fn set_selection_unknown_id_ignored() {
    let mut core = core();
    assert!(core.set_selection(Some(Uuid::new_v4())).is_empty());
    assert_eq!(core.selection(), None);
}

#[test]
fn add_region_duplicate_rejected() {
    let mut core = core();
    let region = Region::new(Bounds::new(0, 0, 10, 10), RegionAction::default());
    core.add_region(region.clone()).unwrap();
    assert_eq!(core.add_region(region.clone()), Err(StoreError::DuplicateId { id: region.id }));
}

// =============================================================
// Templates and menus
// =============================================================

#[test]
fn apply_template_replaces_and_selects_first() {
    let mut core = core();
    add(&mut core, 0, 0, 10, 10);
    core.apply_template(Template::Grid2x3).unwrap();
    assert_eq!(core.regions().len(), 6);
    assert_eq!(core.selection(), Some(core.regions()[0].id));
    assert_eq!(core.regions()[5].bounds, Bounds::new(1667, 843, 833, 843));
}

#[test]
fn load_menu_assigns_fresh_ids_and_resets_selection() {
    let mut core = core();
    let id = add(&mut core, 0, 0, 10, 10);
    let _ = core.set_selection(Some(id));

    let text = r#"{
        "size": { "width": 1200, "height": 405 },
        "name": "Shop",
        "chatBarText": "Open",
        "areas": [
            { "bounds": { "x": 0, "y": 0, "width": 600, "height": 405 }, "action": { "type": "message", "text": "A" } },
            { "bounds": { "x": 600, "y": 0, "width": 600, "height": 405 }, "action": { "type": "message", "text": "B" } }
        ]
    }"#;
    core.import_menu_json(text, T0).unwrap();

    assert_eq!(core.canvas_size(), CanvasSize::new(1200, 405));
    assert_eq!(core.regions().len(), 2);
    assert!(core.regions().iter().all(|r| r.id != id));
    assert_eq!(core.selection(), None);
    assert_eq!(core.settings.name, "Shop");
    assert_eq!(core.settings.chat_bar_text, "Open");
}

#[test]
fn load_menu_with_image_suppresses_immediate_draw() {
    let mut core = core();
    let doc = RichMenuDoc { image_url: Some("https://cdn/menu.png".into()), ..RichMenuDoc::default() };
    core.load_menu(&doc, T0).unwrap();
    assert_eq!(core.image().url.as_deref(), Some("https://cdn/menu.png"));
    assert!(core.image().suppresses_draw_at(T0 + 10.0));
}

#[test]
fn load_menu_too_many_areas_leaves_editor_unchanged() {
    let mut core = core();
    let id = add(&mut core, 0, 0, 10, 10);
    let areas = (0..=MAX_REGIONS).map(|_| menu::MenuArea { bounds: Bounds::new(0, 0, 1, 1), action: RegionAction::default() });
    let doc = RichMenuDoc { size: CanvasSize::new(1200, 405), areas: areas.collect(), ..RichMenuDoc::default() };
    assert!(matches!(core.load_menu(&doc, T0), Err(MenuError::Store(_))));
    assert_eq!(core.canvas_size(), CanvasSize::default());
    assert_eq!(core.regions()[0].id, id);
}

#[test]
fn import_invalid_json_is_error() {
    let mut core = core();
    assert!(matches!(core.import_menu_json("nope", T0), Err(MenuError::Json(_))));
}

#[test]
fn export_menu_after_draw() {
    let mut core = core();
    drag(&mut core, (100.0, 100.0), (600.0, 500.0));
    let doc = core.export_menu();
    assert_eq!(doc.size, CanvasSize::new(2500, 1686));
    assert_eq!(doc.name, "My Rich Menu");
    assert_eq!(doc.areas.len(), 1);
    assert_eq!(doc.areas[0].bounds, Bounds::new(100, 100, 500, 400));
}

// =============================================================
// Background image
// =============================================================

#[test]
fn first_image_prunes_placeholder_banners() {
    let mut core = core();
    let banner = add(&mut core, 0, 0, 2500, 300);
    let keep = add(&mut core, 0, 400, 1250, 843);
    let actions = core.set_image(Some("menu.png".into()), T0);
    assert!(core.region(&banner).is_none());
    assert!(core.region(&keep).is_some());
    assert!(regions_changed(&actions));
}

#[test]
fn later_image_swaps_keep_banners() {
    let mut core = core();
    let _ = core.set_image(Some("a.png".into()), T0);
    let banner = add(&mut core, 0, 0, 2500, 300);
    let _ = core.set_image(Some("b.png".into()), T0 + 1_000.0);
    assert!(core.region(&banner).is_some());
}

#[test]
fn image_loaded_records_size_and_checks_rules() {
    let mut core = core();
    let _ = core.set_image(Some("a.png".into()), T0);
    assert!(core.image().check().is_none());

    let _ = core.on_image_loaded(1000, 1000);
    assert_eq!(core.image().natural_size, Some((1000, 1000)));
    assert!(matches!(core.image().check(), Some(Err(ImageError::AspectRatio { .. }))));
    assert!(core.image().mismatches(core.canvas_size()));

    let _ = core.on_image_loaded(2500, 1686);
    assert_eq!(core.image().check(), Some(Ok(())));
    assert!(!core.image().mismatches(core.canvas_size()));
}

#[test]
fn resending_same_image_keeps_draw_and_window() {
    let mut core = core();
    let _ = core.set_image(Some("a.png".into()), T0 - 10_000.0);
    down(&mut core, 100.0, 100.0);
    let _ = core.on_pointer_move(pt(600.0, 500.0));

    assert!(core.set_image(Some("a.png".into()), T0).is_empty());
    assert!(matches!(core.gesture(), GestureState::Drawing { .. }));
    assert!(!core.image().suppresses_draw_at(T0 + 100.0));

    let _ = core.on_pointer_up(T0 + 100.0);
    assert_eq!(core.regions().len(), 1);
}

#[test]
fn resending_same_image_keeps_natural_size() {
    let mut core = core();
    let _ = core.set_image(Some("a.png".into()), T0);
    let _ = core.on_image_loaded(2500, 1686);
    let _ = core.set_image(Some("a.png".into()), T0 + 5_000.0);
    assert_eq!(core.image().natural_size, Some((2500, 1686)));
    assert_eq!(core.image().set_at_ms, Some(T0));
}

// =============================================================
// Viewport
// =============================================================

#[test]
fn degenerate_viewport_uses_unit_scale() {
    let mut core = EngineCore::new();
    assert_eq!(core.scale(), 1.0);
    let _ = core.set_viewport(ViewportRect::new(0.0, 0.0, 1250.0, 843.0));
    assert_eq!(core.scale(), 0.5);
}

#[test]
fn set_viewport_unchanged_is_silent() {
    let mut core = core();
    assert!(core.set_viewport(ViewportRect::new(0.0, 0.0, 2500.0, 1686.0)).is_empty());
}

#[test]
fn backing_px_rounds_and_guards() {
    assert_eq!(backing_px(100.4, 2.0), 201);
    assert_eq!(backing_px(-5.0, 2.0), 0);
    assert_eq!(backing_px(f64::NAN, 1.0), 0);
}

#[test]
fn viewport_resync_before_press_renders_and_remaps() {
    let mut core = core();
    let mut actions = core.set_viewport(ViewportRect::new(0.0, 0.0, 1250.0, 843.0));
    assert_eq!(actions, [Action::RenderNeeded]);

    actions.extend(down(&mut core, 50.0, 50.0));
    let _ = core.on_pointer_move(pt(300.0, 250.0));
    let _ = core.on_pointer_up(T0 + 1_000.0);
    assert!(has_action(&actions, |a| *a == Action::RenderNeeded));
    assert_eq!(core.regions()[0].bounds, Bounds::new(100, 100, 500, 400));
}
