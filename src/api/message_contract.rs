use serde::{Deserialize, Serialize};

use crate::core::ChartId;
use crate::error::{ChartError, ChartResult};

use super::UpdateMessage;

/// Update message tagged with the chart it targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressedMessage {
    #[serde(rename = "chartId")]
    pub chart_id: ChartId,
    pub message: UpdateMessage,
}

impl AddressedMessage {
    #[must_use]
    pub fn new(chart_id: ChartId, message: UpdateMessage) -> Self {
        Self { chart_id, message }
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse addressed message json: {e}"))
        })
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize addressed message: {e}"))
        })
    }
}

/// One update message fanned out to several charts.
///
/// Every listed chart folds the message into its own dataset, so each one
/// applies its own shape checks and history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    #[serde(rename = "chartIds")]
    pub chart_ids: Vec<ChartId>,
    pub message: UpdateMessage,
}

impl BroadcastMessage {
    #[must_use]
    pub fn new(chart_ids: Vec<ChartId>, message: UpdateMessage) -> Self {
        Self { chart_ids, message }
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse broadcast message json: {e}"))
        })
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize broadcast message: {e}"))
        })
    }
}

impl UpdateMessage {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse update message json: {e}"))
        })
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize update message: {e}"))
        })
    }
}
