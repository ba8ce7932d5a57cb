use std::time::Instant;

use tracing::{debug, warn};

use crate::core::{ChartId, LogicalDataset, ViewSlot};
use crate::error::{ChartError, ChartResult};
use crate::interaction::ViewportState;
use crate::render::DrawingLibrary;

use super::{
    ChartComponentConfig, DualViewCoordinator, LayoutObserver, SlotOutcome, SlotState,
    UpdateDispatch, UpdateMessage, UpdateReducer,
};

/// Composition root for one logical chart.
///
/// Owns the dataset and both layout observers, and turns host events
/// (messages, container measurements, overlay open/close, clock ticks) into
/// calls on the coordinator. The dataset is only ever replaced, never edited
/// in place, so both views always read the same revision.
pub struct ChartComponent<L: DrawingLibrary> {
    id: ChartId,
    config: ChartComponentConfig,
    dataset: LogicalDataset,
    revision: u64,
    reducer: UpdateReducer,
    coordinator: DualViewCoordinator<L>,
    inline_layout: LayoutObserver,
    overlay_layout: LayoutObserver,
    mounted: bool,
    rejected_updates: u64,
}

impl<L: DrawingLibrary + Clone> ChartComponent<L> {
    pub fn mount(id: ChartId, config: ChartComponentConfig, library: L) -> ChartResult<Self> {
        Self::mount_with_libraries(id, config, library.clone(), library)
    }
}

impl<L: DrawingLibrary> ChartComponent<L> {
    /// Mounts a chart whose views draw through separate library instances.
    pub fn mount_with_libraries(
        id: ChartId,
        config: ChartComponentConfig,
        inline_library: L,
        overlay_library: L,
    ) -> ChartResult<Self> {
        let config = config.validate()?;
        let inline_layout = LayoutObserver::new(config.aspect_ratio, config.resize_debounce())?;
        let overlay_layout = LayoutObserver::new(config.aspect_ratio, config.resize_debounce())?;
        let coordinator = DualViewCoordinator::with_libraries(
            &id,
            inline_library,
            overlay_library,
            config.overlay_close_policy,
        )
        .with_inline_interactive(config.inline_interactive)
        .with_base_options(config.render_options.clone());

        debug!(chart = %id, policy = ?config.overlay_close_policy, "chart mounted");
        Ok(Self {
            reducer: UpdateReducer::new(config.history_limit),
            id,
            config,
            dataset: LogicalDataset::empty(),
            revision: 0,
            coordinator,
            inline_layout,
            overlay_layout,
            mounted: true,
            rejected_updates: 0,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ChartId {
        &self.id
    }

    #[must_use]
    pub fn config(&self) -> &ChartComponentConfig {
        &self.config
    }

    #[must_use]
    pub fn dataset(&self) -> &LogicalDataset {
        &self.dataset
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Messages rejected since mount (shape mismatches, bad limits).
    #[must_use]
    pub fn rejected_updates(&self) -> u64 {
        self.rejected_updates
    }

    #[must_use]
    pub fn coordinator(&self) -> &DualViewCoordinator<L> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut DualViewCoordinator<L> {
        &mut self.coordinator
    }

    #[must_use]
    pub fn slot_state(&self, slot: ViewSlot) -> SlotState {
        self.coordinator.slot_state(slot)
    }

    #[must_use]
    pub fn viewport_state(&self, slot: ViewSlot) -> ViewportState {
        self.coordinator.viewport_state(slot)
    }

    /// Folds one update into the dataset and redraws every live view.
    ///
    /// A rejected message leaves the dataset untouched and is returned as an
    /// error. Render failures do not fail the call; they show up per slot in
    /// the returned dispatch.
    pub fn handle_message(&mut self, msg: &UpdateMessage) -> ChartResult<UpdateDispatch> {
        if !self.mounted {
            return Err(ChartError::MissingSurface {
                surface: self.id.to_string(),
            });
        }

        let reduced = match self.reducer.reduce(&self.dataset, msg) {
            Ok(reduced) => reduced,
            Err(err) => {
                self.rejected_updates += 1;
                warn!(chart = %self.id, error = %err, "update rejected, keeping previous dataset");
                return Err(err);
            }
        };

        self.dataset = reduced.dataset;
        self.revision += 1;
        Ok(self
            .coordinator
            .on_update(&self.dataset, reduced.kind, self.revision))
    }

    /// Decodes a JSON update message and handles it.
    pub fn handle_json(&mut self, raw: &str) -> ChartResult<UpdateDispatch> {
        let msg = UpdateMessage::from_json_str(raw).inspect_err(|err| {
            self.rejected_updates += 1;
            warn!(chart = %self.id, error = %err, "undecodable update dropped");
        })?;
        self.handle_message(&msg)
    }

    /// Records a container width measured by the host.
    pub fn observe_container(&mut self, slot: ViewSlot, width: u32, now: Instant) {
        self.observer_mut(slot).observe(width, now);
    }

    /// Forwards every settled layout change to the coordinator.
    pub fn tick(&mut self, now: Instant) -> Vec<(ViewSlot, SlotOutcome)> {
        let mut outcomes = Vec::new();
        for slot in ViewSlot::ALL {
            if let Some(metrics) = self.observer_mut(slot).poll(now) {
                let outcome = self
                    .coordinator
                    .on_layout(slot, metrics, &self.dataset, self.revision);
                outcomes.push((slot, outcome));
            }
        }
        outcomes
    }

    /// Earliest instant at which `tick` has layout work to do.
    #[must_use]
    pub fn next_layout_deadline(&self) -> Option<Instant> {
        match (
            self.inline_layout.next_deadline(),
            self.overlay_layout.next_deadline(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Shows the overlay view.
    ///
    /// A pending overlay width is applied right away so the instance can be
    /// built without waiting for the debounce.
    pub fn open_overlay(&mut self) -> SlotOutcome {
        if let Some(metrics) = self.overlay_layout.flush() {
            self.coordinator
                .on_layout(ViewSlot::Overlay, metrics, &self.dataset, self.revision);
        }
        self.coordinator.open_overlay(&self.dataset, self.revision)
    }

    pub fn close_overlay(&mut self) -> SlotOutcome {
        self.coordinator.close_overlay()
    }

    /// Releases observers and both drawing instances.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.inline_layout.unmount();
        self.overlay_layout.unmount();
        self.coordinator.unmount();
        self.mounted = false;
        debug!(chart = %self.id, "chart unmounted");
    }

    fn observer_mut(&mut self, slot: ViewSlot) -> &mut LayoutObserver {
        match slot {
            ViewSlot::Inline => &mut self.inline_layout,
            ViewSlot::Overlay => &mut self.overlay_layout,
        }
    }
}
