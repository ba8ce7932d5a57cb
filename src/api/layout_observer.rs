use std::time::{Duration, Instant};

use tracing::trace;

use crate::core::LayoutMetrics;
use crate::core::types::validate_aspect_ratio;
use crate::error::ChartResult;

/// Turns raw container-width notifications into debounced layout events.
///
/// Widths are pushed with `observe` and pulled with `poll`. An emission
/// happens once a width has been stable for the debounce period, except the
/// very first non-zero width, which is released on the next poll so the
/// first instance is not held back. Zero widths (container not laid out)
/// and repeats of the last emitted width never emit.
#[derive(Debug, Clone)]
pub struct LayoutObserver {
    aspect_ratio: f64,
    debounce: Duration,
    last_emitted: Option<u32>,
    pending: Option<(u32, Instant)>,
    terminated: bool,
}

impl LayoutObserver {
    pub fn new(aspect_ratio: f64, debounce: Duration) -> ChartResult<Self> {
        validate_aspect_ratio(aspect_ratio)?;
        Ok(Self {
            aspect_ratio,
            debounce,
            last_emitted: None,
            pending: None,
            terminated: false,
        })
    }

    /// Records the container width measured at `now`.
    pub fn observe(&mut self, width: u32, now: Instant) {
        if self.terminated {
            return;
        }
        if width == 0 || self.last_emitted == Some(width) {
            self.pending = None;
            return;
        }
        match self.pending {
            Some((pending, _)) if pending == width => {}
            _ => self.pending = Some((width, now)),
        }
    }

    /// Emits the pending width once it has settled.
    pub fn poll(&mut self, now: Instant) -> Option<LayoutMetrics> {
        if self.terminated {
            return None;
        }
        let (width, since) = self.pending?;
        let settled = self.last_emitted.is_none()
            || now.saturating_duration_since(since) >= self.debounce;
        if !settled {
            return None;
        }
        self.emit(width)
    }

    /// Emits the pending width immediately, skipping the debounce.
    pub fn flush(&mut self) -> Option<LayoutMetrics> {
        if self.terminated {
            return None;
        }
        let (width, _) = self.pending?;
        self.emit(width)
    }

    /// When the pending width will settle, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.terminated {
            return None;
        }
        self.pending.map(|(_, since)| {
            if self.last_emitted.is_none() {
                since
            } else {
                since + self.debounce
            }
        })
    }

    #[must_use]
    pub fn last_metrics(&self) -> Option<LayoutMetrics> {
        self.last_emitted.map(|width| LayoutMetrics {
            width,
            aspect_ratio: self.aspect_ratio,
        })
    }

    /// Stops observation; nothing is emitted afterwards.
    pub fn unmount(&mut self) {
        self.pending = None;
        self.terminated = true;
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn emit(&mut self, width: u32) -> Option<LayoutMetrics> {
        self.pending = None;
        self.last_emitted = Some(width);
        trace!(width, aspect_ratio = self.aspect_ratio, "layout settled");
        Some(LayoutMetrics {
            width,
            aspect_ratio: self.aspect_ratio,
        })
    }
}
