use std::time::Instant;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use crate::core::{ChartId, ViewSlot};
use crate::error::{ChartError, ChartResult};
use crate::render::DrawingLibrary;

use super::{
    AddressedMessage, BroadcastMessage, ChartComponent, SlotOutcome, UpdateDispatch, UpdateMessage,
};

/// Routes addressed update messages to the charts mounted in one host view.
///
/// Charts are kept in mount order so ticks visit them deterministically.
pub struct ChartHost<L: DrawingLibrary> {
    charts: IndexMap<ChartId, ChartComponent<L>>,
}

impl<L: DrawingLibrary> Default for ChartHost<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DrawingLibrary> ChartHost<L> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            charts: IndexMap::new(),
        }
    }

    /// Adds a mounted chart. A chart already registered under the same id is
    /// unmounted and returned.
    pub fn insert(&mut self, chart: ChartComponent<L>) -> Option<ChartComponent<L>> {
        let id = chart.id().clone();
        let mut previous = self.charts.insert(id.clone(), chart);
        if let Some(previous) = previous.as_mut() {
            debug!(chart = %id, "replacing mounted chart");
            previous.unmount();
        }
        previous
    }

    /// Unmounts and removes a chart.
    pub fn remove(&mut self, id: &ChartId) -> Option<ChartComponent<L>> {
        let mut chart = self.charts.shift_remove(id)?;
        chart.unmount();
        Some(chart)
    }

    #[must_use]
    pub fn get(&self, id: &ChartId) -> Option<&ChartComponent<L>> {
        self.charts.get(id)
    }

    pub fn get_mut(&mut self, id: &ChartId) -> Option<&mut ChartComponent<L>> {
        self.charts.get_mut(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ChartId> {
        self.charts.keys()
    }

    /// Delivers a message to the chart it names.
    pub fn route(&mut self, addressed: &AddressedMessage) -> ChartResult<UpdateDispatch> {
        self.deliver(&addressed.chart_id, &addressed.message)
    }

    /// Delivers one message to every listed chart, in list order.
    ///
    /// Each chart gets its own result; an unknown or rejecting chart does
    /// not stop delivery to the others. Repeated ids are delivered once.
    pub fn route_many(
        &mut self,
        ids: &[ChartId],
        msg: &UpdateMessage,
    ) -> Vec<(ChartId, ChartResult<UpdateDispatch>)> {
        let mut seen = IndexSet::with_capacity(ids.len());
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(id) {
                debug!(chart = %id, "duplicate chart id in broadcast skipped");
                continue;
            }
            results.push((id.clone(), self.deliver(id, msg)));
        }
        results
    }

    pub fn route_broadcast(
        &mut self,
        broadcast: &BroadcastMessage,
    ) -> Vec<(ChartId, ChartResult<UpdateDispatch>)> {
        self.route_many(&broadcast.chart_ids, &broadcast.message)
    }

    /// Decodes a broadcast JSON message and fans it out.
    pub fn route_broadcast_json(
        &mut self,
        raw: &str,
    ) -> ChartResult<Vec<(ChartId, ChartResult<UpdateDispatch>)>> {
        let broadcast = BroadcastMessage::from_json_str(raw)?;
        Ok(self.route_broadcast(&broadcast))
    }

    /// Decodes an addressed JSON message and routes it.
    pub fn route_json(&mut self, raw: &str) -> ChartResult<UpdateDispatch> {
        let addressed = AddressedMessage::from_json_str(raw)?;
        self.route(&addressed)
    }

    /// Ticks every chart's layout observers.
    pub fn tick(&mut self, now: Instant) -> Vec<(ChartId, ViewSlot, SlotOutcome)> {
        let mut outcomes = Vec::new();
        for (id, chart) in &mut self.charts {
            outcomes.extend(
                chart
                    .tick(now)
                    .into_iter()
                    .map(|(slot, outcome)| (id.clone(), slot, outcome)),
            );
        }
        outcomes
    }

    fn deliver(&mut self, id: &ChartId, msg: &UpdateMessage) -> ChartResult<UpdateDispatch> {
        let Some(chart) = self.charts.get_mut(id) else {
            warn!(chart = %id, "message for unknown chart dropped");
            return Err(ChartError::UnknownChart(id.to_string()));
        };
        chart.handle_message(msg)
    }

    /// Unmounts and drops every chart.
    pub fn clear(&mut self) {
        for (_, mut chart) in self.charts.drain(..) {
            chart.unmount();
        }
    }
}
