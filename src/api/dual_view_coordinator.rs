use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::core::{ChartId, LayoutMetrics, LogicalDataset, SurfaceId, UpdateKind, ViewSlot};
use crate::error::ChartError;
use crate::interaction::ViewportState;
use crate::render::{
    DatasetUpdate, DrawingLibrary, RedrawKind, RenderAdapter, RenderInstanceHandle,
};

use super::{OverlayClosePolicy, ViewportStateCache};

/// Lifecycle of one view slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    Unmounted,
    Constructing,
    Live,
    Destroyed,
}

/// What one event did to one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotOutcome {
    /// A drawing instance was created.
    Constructed,
    /// New data reached the instance.
    Applied(RedrawKind),
    /// New geometry reached the instance.
    Resized,
    /// The event carried nothing new for this slot.
    Unchanged,
    /// The instance was torn down.
    Destroyed,
    /// Construction waits for a container with width.
    Deferred,
    /// No live instance; the event was dropped for this slot.
    Skipped,
    /// The drawing library failed; the slot keeps its state.
    Failed(ChartError),
}

/// Per-slot outcomes of one data update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDispatch {
    pub inline: SlotOutcome,
    pub overlay: SlotOutcome,
}

impl UpdateDispatch {
    #[must_use]
    pub fn outcome(&self, slot: ViewSlot) -> &SlotOutcome {
        match slot {
            ViewSlot::Inline => &self.inline,
            ViewSlot::Overlay => &self.overlay,
        }
    }
}

struct SlotRuntime<L: DrawingLibrary> {
    slot: ViewSlot,
    adapter: RenderAdapter<L>,
    handle: Option<RenderInstanceHandle<L::Surface>>,
    state: SlotState,
    layout: Option<LayoutMetrics>,
    cache: ViewportStateCache,
}

impl<L: DrawingLibrary> SlotRuntime<L> {
    fn new(slot: ViewSlot, adapter: RenderAdapter<L>) -> Self {
        Self {
            slot,
            adapter,
            handle: None,
            state: SlotState::Unmounted,
            layout: None,
            cache: ViewportStateCache::new(),
        }
    }

    fn transition(&mut self, next: SlotState) {
        if self.state != next {
            debug!(slot = self.slot.as_str(), from = ?self.state, to = ?next, "slot transition");
            self.state = next;
        }
    }

    fn construct(&mut self, data: &LogicalDataset, revision: u64) -> SlotOutcome {
        let Some(metrics) = self.layout.filter(|metrics| metrics.has_width()) else {
            return SlotOutcome::Deferred;
        };

        self.transition(SlotState::Constructing);
        match self.adapter.construct(metrics, data, revision) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.cache = ViewportStateCache::new();
                self.transition(SlotState::Live);
                SlotOutcome::Constructed
            }
            Err(err) if err.is_deferrable() => {
                debug!(slot = self.slot.as_str(), error = %err, "construction deferred");
                self.transition(SlotState::Unmounted);
                SlotOutcome::Deferred
            }
            Err(err) => {
                warn!(slot = self.slot.as_str(), error = %err, "construction failed");
                self.transition(SlotState::Unmounted);
                SlotOutcome::Failed(err)
            }
        }
    }

    fn apply(&mut self, update: DatasetUpdate<'_>) -> SlotOutcome {
        let Some(handle) = self.handle.as_mut().filter(|_| self.state == SlotState::Live) else {
            trace!(
                slot = self.slot.as_str(),
                state = ?self.state,
                "no live surface, update dropped for slot"
            );
            return SlotOutcome::Skipped;
        };

        let result = self.cache.around(&mut self.adapter, handle, |adapter, handle| {
            adapter.apply_update(handle, update)
        });
        match result {
            Ok(RedrawKind::Skipped) => SlotOutcome::Unchanged,
            Ok(redraw) => SlotOutcome::Applied(redraw),
            Err(err) => {
                warn!(
                    slot = self.slot.as_str(),
                    error = %err,
                    "update skipped after render failure"
                );
                SlotOutcome::Failed(err)
            }
        }
    }

    fn resize(&mut self, metrics: LayoutMetrics) -> SlotOutcome {
        let Some(handle) = self.handle.as_mut().filter(|_| self.state == SlotState::Live) else {
            return SlotOutcome::Skipped;
        };
        if handle.viewport() == metrics.viewport() {
            return SlotOutcome::Unchanged;
        }

        let result = self.cache.around(&mut self.adapter, handle, |adapter, handle| {
            adapter.resize(handle, metrics)
        });
        match result {
            Ok(true) => SlotOutcome::Resized,
            Ok(false) => SlotOutcome::Unchanged,
            Err(err) => {
                warn!(
                    slot = self.slot.as_str(),
                    error = %err,
                    "resize skipped after render failure"
                );
                SlotOutcome::Failed(err)
            }
        }
    }

    fn destroy(&mut self) -> SlotOutcome {
        let outcome = match self.handle.as_mut() {
            Some(handle) => {
                self.adapter.destroy(handle);
                SlotOutcome::Destroyed
            }
            None => SlotOutcome::Unchanged,
        };
        self.handle = None;
        self.cache = ViewportStateCache::new();
        self.transition(SlotState::Destroyed);
        outcome
    }
}

/// Drives the inline and overlay instances of one chart from one dataset.
///
/// Each slot owns its own adapter and handle. Nothing one slot does (a
/// failed construction, a render failure, a teardown) changes the other.
/// The overlay is only constructed once it has been opened with a known
/// container width.
pub struct DualViewCoordinator<L: DrawingLibrary> {
    inline: SlotRuntime<L>,
    overlay: SlotRuntime<L>,
    overlay_visible: bool,
    close_policy: OverlayClosePolicy,
    unmounted: bool,
}

impl<L: DrawingLibrary + Clone> DualViewCoordinator<L> {
    #[must_use]
    pub fn new(chart: &ChartId, library: L, close_policy: OverlayClosePolicy) -> Self {
        Self::with_libraries(chart, library.clone(), library, close_policy)
    }
}

impl<L: DrawingLibrary> DualViewCoordinator<L> {
    /// Builds a coordinator whose slots draw through separate libraries.
    #[must_use]
    pub fn with_libraries(
        chart: &ChartId,
        inline_library: L,
        overlay_library: L,
        close_policy: OverlayClosePolicy,
    ) -> Self {
        let inline = RenderAdapter::new(
            inline_library,
            SurfaceId::for_slot(chart, ViewSlot::Inline),
        );
        let overlay = RenderAdapter::new(
            overlay_library,
            SurfaceId::for_slot(chart, ViewSlot::Overlay),
        );
        Self {
            inline: SlotRuntime::new(ViewSlot::Inline, inline),
            overlay: SlotRuntime::new(ViewSlot::Overlay, overlay),
            overlay_visible: false,
            close_policy,
            unmounted: false,
        }
    }

    /// Sets whether the inline view accepts cursor and zoom gestures.
    #[must_use]
    pub fn with_inline_interactive(mut self, interactive: bool) -> Self {
        self.inline.adapter.set_interactive(interactive);
        self
    }

    /// Sets caller options passed through to both views.
    #[must_use]
    pub fn with_base_options(mut self, base_options: Value) -> Self {
        self.inline.adapter.set_base_options(base_options.clone());
        self.overlay.adapter.set_base_options(base_options);
        self
    }

    #[must_use]
    pub fn slot_state(&self, slot: ViewSlot) -> SlotState {
        self.slot(slot).state
    }

    #[must_use]
    pub fn handle(&self, slot: ViewSlot) -> Option<&RenderInstanceHandle<L::Surface>> {
        self.slot(slot).handle.as_ref()
    }

    pub fn handle_mut(
        &mut self,
        slot: ViewSlot,
    ) -> Option<&mut RenderInstanceHandle<L::Surface>> {
        self.slot_mut(slot).handle.as_mut()
    }

    #[must_use]
    pub fn adapter(&self, slot: ViewSlot) -> &RenderAdapter<L> {
        &self.slot(slot).adapter
    }

    pub fn adapter_mut(&mut self, slot: ViewSlot) -> &mut RenderAdapter<L> {
        &mut self.slot_mut(slot).adapter
    }

    /// Current cursor and zoom of a slot; none while it has no instance.
    #[must_use]
    pub fn viewport_state(&self, slot: ViewSlot) -> ViewportState {
        let runtime = self.slot(slot);
        runtime
            .handle
            .as_ref()
            .map_or(ViewportState::none(), |handle| runtime.adapter.save_viewport(handle))
    }

    /// State captured around the slot's most recent redraw or resize.
    #[must_use]
    pub fn last_saved_viewport(&self, slot: ViewSlot) -> Option<ViewportState> {
        self.slot(slot).cache.last_saved()
    }

    #[must_use]
    pub fn layout(&self, slot: ViewSlot) -> Option<LayoutMetrics> {
        self.slot(slot).layout
    }

    #[must_use]
    pub fn is_overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    #[must_use]
    pub fn close_policy(&self) -> OverlayClosePolicy {
        self.close_policy
    }

    #[must_use]
    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    /// Feeds settled container geometry to one slot.
    ///
    /// The first usable width constructs the slot (the overlay also has to
    /// be visible); later widths resize the live instance.
    pub fn on_layout(
        &mut self,
        slot: ViewSlot,
        metrics: LayoutMetrics,
        data: &LogicalDataset,
        revision: u64,
    ) -> SlotOutcome {
        if self.unmounted {
            return SlotOutcome::Skipped;
        }
        let may_construct = self.may_construct(slot);
        let runtime = self.slot_mut(slot);
        if metrics.has_width() {
            runtime.layout = Some(metrics);
        }

        match runtime.state {
            SlotState::Unmounted | SlotState::Constructing if may_construct => {
                runtime.construct(data, revision)
            }
            SlotState::Live => runtime.resize(metrics),
            _ => SlotOutcome::Deferred,
        }
    }

    /// Pushes one dataset revision to every live slot.
    pub fn on_update(
        &mut self,
        data: &LogicalDataset,
        kind: UpdateKind,
        revision: u64,
    ) -> UpdateDispatch {
        let update = DatasetUpdate {
            dataset: data,
            kind,
            revision,
        };
        if self.unmounted {
            return UpdateDispatch {
                inline: SlotOutcome::Skipped,
                overlay: SlotOutcome::Skipped,
            };
        }
        UpdateDispatch {
            inline: self.inline.apply(update),
            overlay: self.overlay.apply(update),
        }
    }

    /// Shows the overlay, constructing its instance when geometry is known.
    pub fn open_overlay(&mut self, data: &LogicalDataset, revision: u64) -> SlotOutcome {
        if self.unmounted {
            return SlotOutcome::Skipped;
        }
        self.overlay_visible = true;
        debug!(policy = ?self.close_policy, "overlay opened");

        match self.overlay.state {
            SlotState::Destroyed => {
                self.overlay.transition(SlotState::Unmounted);
                self.overlay.construct(data, revision)
            }
            SlotState::Unmounted | SlotState::Constructing => {
                self.overlay.construct(data, revision)
            }
            // Catches up if a failed redraw left the hidden instance behind.
            SlotState::Live => self.overlay.apply(DatasetUpdate {
                dataset: data,
                kind: UpdateKind::Snapshot,
                revision,
            }),
        }
    }

    /// Hides the overlay, tearing it down only under `DestroyOnClose`.
    pub fn close_overlay(&mut self) -> SlotOutcome {
        if self.unmounted || !self.overlay_visible {
            return SlotOutcome::Unchanged;
        }
        self.overlay_visible = false;
        debug!(policy = ?self.close_policy, "overlay closed");

        match self.close_policy {
            OverlayClosePolicy::KeepMounted => SlotOutcome::Unchanged,
            OverlayClosePolicy::DestroyOnClose => self.overlay.destroy(),
        }
    }

    /// Destroys both instances. Later events are ignored.
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.inline.destroy();
        self.overlay.destroy();
        self.overlay_visible = false;
        self.unmounted = true;
        debug!("coordinator unmounted");
    }

    fn may_construct(&self, slot: ViewSlot) -> bool {
        match slot {
            ViewSlot::Inline => true,
            ViewSlot::Overlay => self.overlay_visible,
        }
    }

    fn slot(&self, slot: ViewSlot) -> &SlotRuntime<L> {
        match slot {
            ViewSlot::Inline => &self.inline,
            ViewSlot::Overlay => &self.overlay,
        }
    }

    fn slot_mut(&mut self, slot: ViewSlot) -> &mut SlotRuntime<L> {
        match slot {
            ViewSlot::Inline => &mut self.inline,
            ViewSlot::Overlay => &mut self.overlay,
        }
    }
}

impl<L: DrawingLibrary> Drop for DualViewCoordinator<L> {
    fn drop(&mut self) {
        self.unmount();
    }
}
