use chart_sync::ChartError;
use chart_sync::api::{
    DualViewCoordinator, OverlayClosePolicy, SlotOutcome, SlotState, UpdateMessage, reduce,
};
use chart_sync::core::{ChartId, LayoutMetrics, LogicalDataset, UpdateKind, ViewSlot};
use chart_sync::render::{NullDrawingLibrary, RedrawKind};

fn metrics(width: u32) -> LayoutMetrics {
    LayoutMetrics::new(width, 0.6).expect("metrics")
}

fn base() -> LogicalDataset {
    LogicalDataset::new(vec![
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        vec![1.0, 0.8, 0.6, 0.5, 0.4],
    ])
    .expect("dataset")
}

fn coordinator(policy: OverlayClosePolicy) -> DualViewCoordinator<NullDrawingLibrary> {
    DualViewCoordinator::new(&ChartId::from("loss"), NullDrawingLibrary::default(), policy)
}

fn with_both_live(policy: OverlayClosePolicy) -> DualViewCoordinator<NullDrawingLibrary> {
    let mut coordinator = coordinator(policy);
    let data = base();
    assert_eq!(
        coordinator.on_layout(ViewSlot::Inline, metrics(400), &data, 1),
        SlotOutcome::Constructed
    );
    assert_eq!(
        coordinator.on_layout(ViewSlot::Overlay, metrics(900), &data, 1),
        SlotOutcome::Deferred
    );
    assert_eq!(coordinator.open_overlay(&data, 1), SlotOutcome::Constructed);
    coordinator
}

#[test]
fn surfaces_are_named_after_chart() {
    let coordinator = with_both_live(OverlayClosePolicy::KeepMounted);

    let inline = coordinator.handle(ViewSlot::Inline).expect("inline handle");
    let overlay = coordinator.handle(ViewSlot::Overlay).expect("overlay handle");
    assert_eq!(inline.surface_id().as_str(), "loss");
    assert_eq!(overlay.surface_id().as_str(), "loss-modal");
    assert_eq!(overlay.viewport().height, 540);
}

#[test]
fn inline_waits_for_width_before_constructing() {
    let mut coordinator = coordinator(OverlayClosePolicy::KeepMounted);
    let data = base();

    assert_eq!(
        coordinator.on_layout(ViewSlot::Inline, metrics(0), &data, 1),
        SlotOutcome::Deferred
    );
    assert_eq!(coordinator.slot_state(ViewSlot::Inline), SlotState::Unmounted);
    assert!(coordinator.handle(ViewSlot::Inline).is_none());

    assert_eq!(
        coordinator.on_layout(ViewSlot::Inline, metrics(400), &data, 1),
        SlotOutcome::Constructed
    );
    assert_eq!(coordinator.slot_state(ViewSlot::Inline), SlotState::Live);
}

#[test]
fn overlay_is_not_constructed_until_opened() {
    let mut coordinator = coordinator(OverlayClosePolicy::KeepMounted);
    let data = base();

    assert_eq!(coordinator.open_overlay(&data, 1), SlotOutcome::Deferred);
    assert_eq!(coordinator.slot_state(ViewSlot::Overlay), SlotState::Unmounted);

    assert_eq!(
        coordinator.on_layout(ViewSlot::Overlay, metrics(900), &data, 1),
        SlotOutcome::Constructed
    );
    assert!(coordinator.is_overlay_visible());
}

#[test]
fn append_with_overlay_unmounted_only_touches_inline() {
    let mut coordinator = coordinator(OverlayClosePolicy::KeepMounted);
    let data = base();
    coordinator.on_layout(ViewSlot::Inline, metrics(400), &data, 1);
    coordinator
        .handle_mut(ViewSlot::Inline)
        .expect("inline")
        .surface_mut()
        .hover(2);

    let reduced = reduce(&data, &UpdateMessage::append(vec![vec![5.0], vec![0.35]]))
        .expect("append");
    let dispatch = coordinator.on_update(&reduced.dataset, reduced.kind, 2);

    assert_eq!(dispatch.inline, SlotOutcome::Applied(RedrawKind::Incremental));
    assert_eq!(dispatch.overlay, SlotOutcome::Skipped);
    assert_eq!(
        coordinator.last_saved_viewport(ViewSlot::Inline).and_then(|s| s.cursor_index),
        Some(2)
    );
    assert_eq!(coordinator.last_saved_viewport(ViewSlot::Overlay), None);
    assert_eq!(coordinator.slot_state(ViewSlot::Overlay), SlotState::Unmounted);
    assert_eq!(coordinator.adapter(ViewSlot::Overlay).library().constructed, 0);
}

#[test]
fn update_reaches_both_live_views_and_keeps_zoom() {
    let mut coordinator = with_both_live(OverlayClosePolicy::KeepMounted);
    coordinator
        .handle_mut(ViewSlot::Overlay)
        .expect("overlay")
        .surface_mut()
        .drag_zoom(1.0, 3.0);
    coordinator
        .handle_mut(ViewSlot::Inline)
        .expect("inline")
        .surface_mut()
        .hover(2);

    let reduced = reduce(
        &base(),
        &UpdateMessage::append(vec![vec![5.0], vec![0.35]]),
    )
    .expect("append");
    let dispatch = coordinator.on_update(&reduced.dataset, reduced.kind, 2);

    assert_eq!(dispatch.inline, SlotOutcome::Applied(RedrawKind::Incremental));
    assert_eq!(dispatch.overlay, SlotOutcome::Applied(RedrawKind::Incremental));

    let snapshot =
        LogicalDataset::new(vec![vec![0.0, 1.0, 2.0, 3.0], vec![4.0, 3.0, 2.0, 1.0]])
            .expect("dataset");
    let dispatch = coordinator.on_update(&snapshot, UpdateKind::Snapshot, 3);
    assert_eq!(
        dispatch.outcome(ViewSlot::Overlay),
        &SlotOutcome::Applied(RedrawKind::Full)
    );

    assert_eq!(
        coordinator.viewport_state(ViewSlot::Overlay).zoom_range,
        Some((1.0, 3.0))
    );
    assert_eq!(
        coordinator.viewport_state(ViewSlot::Inline).cursor_index,
        Some(2)
    );
    assert_eq!(
        coordinator
            .handle(ViewSlot::Inline)
            .expect("inline")
            .surface()
            .data,
        snapshot
    );
}

#[test]
fn keep_mounted_overlay_survives_close_and_reopen() {
    let mut coordinator = with_both_live(OverlayClosePolicy::KeepMounted);
    coordinator
        .handle_mut(ViewSlot::Overlay)
        .expect("overlay")
        .surface_mut()
        .drag_zoom(1.0, 2.0);

    assert_eq!(coordinator.close_overlay(), SlotOutcome::Unchanged);
    assert!(!coordinator.is_overlay_visible());
    assert_eq!(coordinator.slot_state(ViewSlot::Overlay), SlotState::Live);

    let reduced = reduce(
        &base(),
        &UpdateMessage::append(vec![vec![5.0], vec![0.35]]),
    )
    .expect("append");
    let dispatch = coordinator.on_update(&reduced.dataset, reduced.kind, 2);
    assert_eq!(dispatch.overlay, SlotOutcome::Applied(RedrawKind::Incremental));

    assert_eq!(coordinator.open_overlay(&reduced.dataset, 2), SlotOutcome::Unchanged);
    let overlay = coordinator.handle(ViewSlot::Overlay).expect("overlay");
    assert_eq!(overlay.surface().zoom, Some((1.0, 2.0)));
    assert_eq!(overlay.surface().data, reduced.dataset);
    assert_eq!(coordinator.adapter(ViewSlot::Overlay).library().constructed, 1);
}

#[test]
fn destroy_on_close_rebuilds_overlay_with_fresh_state() {
    let mut coordinator = with_both_live(OverlayClosePolicy::DestroyOnClose);
    coordinator
        .handle_mut(ViewSlot::Overlay)
        .expect("overlay")
        .surface_mut()
        .drag_zoom(1.0, 2.0);

    assert_eq!(coordinator.close_overlay(), SlotOutcome::Destroyed);
    assert_eq!(coordinator.slot_state(ViewSlot::Overlay), SlotState::Destroyed);
    assert!(coordinator.handle(ViewSlot::Overlay).is_none());

    let reduced = reduce(
        &base(),
        &UpdateMessage::append(vec![vec![5.0], vec![0.35]]),
    )
    .expect("append");
    let dispatch = coordinator.on_update(&reduced.dataset, reduced.kind, 2);
    assert_eq!(dispatch.overlay, SlotOutcome::Skipped);
    assert_eq!(dispatch.inline, SlotOutcome::Applied(RedrawKind::Incremental));

    assert_eq!(
        coordinator.open_overlay(&reduced.dataset, 2),
        SlotOutcome::Constructed
    );
    let overlay = coordinator.handle(ViewSlot::Overlay).expect("overlay");
    assert_eq!(overlay.surface().zoom, None);
    assert_eq!(overlay.surface().data, reduced.dataset);
    assert_eq!(coordinator.adapter(ViewSlot::Overlay).library().constructed, 2);
}

#[test]
fn failure_in_one_view_does_not_touch_the_other() {
    let mut coordinator = with_both_live(OverlayClosePolicy::KeepMounted);
    coordinator
        .handle_mut(ViewSlot::Inline)
        .expect("inline")
        .surface_mut()
        .fail_next_render = true;

    let first = reduce(
        &base(),
        &UpdateMessage::append(vec![vec![5.0], vec![0.35]]),
    )
    .expect("append");
    let dispatch = coordinator.on_update(&first.dataset, first.kind, 2);

    assert!(matches!(
        dispatch.inline,
        SlotOutcome::Failed(ChartError::RenderFailure { .. })
    ));
    assert_eq!(dispatch.overlay, SlotOutcome::Applied(RedrawKind::Incremental));
    assert_eq!(coordinator.slot_state(ViewSlot::Inline), SlotState::Live);

    let second = reduce(
        &first.dataset,
        &UpdateMessage::append(vec![vec![6.0], vec![0.3]]),
    )
    .expect("append");
    let dispatch = coordinator.on_update(&second.dataset, second.kind, 3);

    assert_eq!(dispatch.inline, SlotOutcome::Applied(RedrawKind::Full));
    assert_eq!(dispatch.overlay, SlotOutcome::Applied(RedrawKind::Incremental));
    assert_eq!(
        coordinator
            .handle(ViewSlot::Inline)
            .expect("inline")
            .surface()
            .data,
        second.dataset
    );
}

#[test]
fn failed_overlay_construction_leaves_inline_live() {
    let chart = ChartId::from("loss");
    let mut overlay_library = NullDrawingLibrary::default();
    overlay_library.fail_next_construct = true;
    let mut coordinator = DualViewCoordinator::with_libraries(
        &chart,
        NullDrawingLibrary::default(),
        overlay_library,
        OverlayClosePolicy::KeepMounted,
    );
    let data = base();

    coordinator.on_layout(ViewSlot::Inline, metrics(400), &data, 1);
    coordinator.on_layout(ViewSlot::Overlay, metrics(900), &data, 1);
    assert!(matches!(
        coordinator.open_overlay(&data, 1),
        SlotOutcome::Failed(_)
    ));
    assert_eq!(coordinator.slot_state(ViewSlot::Overlay), SlotState::Unmounted);
    assert_eq!(coordinator.slot_state(ViewSlot::Inline), SlotState::Live);

    assert_eq!(coordinator.open_overlay(&data, 1), SlotOutcome::Constructed);
}

#[test]
fn resize_is_applied_once_and_keeps_data() {
    let mut coordinator = with_both_live(OverlayClosePolicy::KeepMounted);
    let data = base();

    assert_eq!(
        coordinator.on_layout(ViewSlot::Inline, metrics(500), &data, 1),
        SlotOutcome::Resized
    );
    assert_eq!(
        coordinator.on_layout(ViewSlot::Inline, metrics(500), &data, 1),
        SlotOutcome::Unchanged
    );

    let inline = coordinator.handle(ViewSlot::Inline).expect("inline");
    assert_eq!(inline.viewport().height, 300);
    assert_eq!(inline.surface().option_updates, 1);
    assert_eq!(inline.surface().full_redraws, 0);
    assert_eq!(
        coordinator
            .handle(ViewSlot::Overlay)
            .expect("overlay")
            .viewport()
            .width,
        900
    );
}

#[test]
fn inline_interactivity_is_configurable_per_slot() {
    let mut coordinator =
        coordinator(OverlayClosePolicy::KeepMounted).with_inline_interactive(false);
    let data = base();
    coordinator.on_layout(ViewSlot::Inline, metrics(400), &data, 1);
    coordinator.on_layout(ViewSlot::Overlay, metrics(900), &data, 1);
    coordinator.open_overlay(&data, 1);

    assert!(!coordinator.adapter(ViewSlot::Inline).is_interactive());
    assert!(coordinator.adapter(ViewSlot::Overlay).is_interactive());
    assert!(
        coordinator
            .handle(ViewSlot::Overlay)
            .expect("overlay")
            .surface()
            .options
            .interactive
    );
}

#[test]
fn unmount_destroys_both_and_ignores_later_events() {
    let mut coordinator = with_both_live(OverlayClosePolicy::KeepMounted);

    coordinator.unmount();
    coordinator.unmount();

    assert!(coordinator.is_unmounted());
    assert_eq!(coordinator.slot_state(ViewSlot::Inline), SlotState::Destroyed);
    assert_eq!(coordinator.slot_state(ViewSlot::Overlay), SlotState::Destroyed);

    let data = base();
    let dispatch = coordinator.on_update(&data, UpdateKind::Snapshot, 2);
    assert_eq!(dispatch.inline, SlotOutcome::Skipped);
    assert_eq!(dispatch.overlay, SlotOutcome::Skipped);
    assert_eq!(
        coordinator.on_layout(ViewSlot::Inline, metrics(600), &data, 2),
        SlotOutcome::Skipped
    );
    assert_eq!(coordinator.open_overlay(&data, 2), SlotOutcome::Skipped);
}
