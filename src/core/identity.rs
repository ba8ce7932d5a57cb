use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the two presentations of one chart a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewSlot {
    /// Compact view embedded in the host panel.
    Inline,
    /// Expanded view shown inside a modal overlay.
    Overlay,
}

impl ViewSlot {
    pub const ALL: [Self; 2] = [Self::Inline, Self::Overlay];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Overlay => "overlay",
        }
    }
}

/// Stable identifier of one logical chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(String);

impl ChartId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChartId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Identity of one render surface, derived deterministically from its chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub const OVERLAY_SUFFIX: &'static str = "-modal";

    #[must_use]
    pub fn for_slot(chart: &ChartId, slot: ViewSlot) -> Self {
        match slot {
            ViewSlot::Inline => Self(chart.as_str().to_owned()),
            ViewSlot::Overlay => Self(format!("{chart}{}", Self::OVERLAY_SUFFIX)),
        }
    }

    /// Resolves a surface id back to its chart and slot.
    #[must_use]
    pub fn parse(raw: &str) -> (ChartId, ViewSlot) {
        match raw.strip_suffix(Self::OVERLAY_SUFFIX) {
            Some(chart) if !chart.is_empty() => (ChartId::new(chart), ViewSlot::Overlay),
            _ => (ChartId::new(raw), ViewSlot::Inline),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
