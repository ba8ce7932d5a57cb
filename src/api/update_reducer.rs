use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::windowing::retain_tail;
use crate::core::{LogicalDataset, UpdateKind};
use crate::error::{ChartError, ChartResult};

/// Data update pushed by the server for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpdateMessage {
    /// Replaces the dataset wholesale.
    Snapshot { series: LogicalDataset },
    /// Extends every series by the same number of samples.
    Append {
        deltas: Vec<Vec<f64>>,
        #[serde(
            default,
            rename = "historyLimit",
            skip_serializing_if = "Option::is_none"
        )]
        history_limit: Option<usize>,
    },
}

impl UpdateMessage {
    #[must_use]
    pub fn snapshot(series: LogicalDataset) -> Self {
        Self::Snapshot { series }
    }

    #[must_use]
    pub fn append(deltas: Vec<Vec<f64>>) -> Self {
        Self::Append {
            deltas,
            history_limit: None,
        }
    }

    #[must_use]
    pub fn append_with_limit(deltas: Vec<Vec<f64>>, history_limit: usize) -> Self {
        Self::Append {
            deltas,
            history_limit: Some(history_limit),
        }
    }

    #[must_use]
    pub fn history_limit(&self) -> Option<usize> {
        match self {
            Self::Snapshot { .. } => None,
            Self::Append { history_limit, .. } => *history_limit,
        }
    }
}

/// Outcome of folding one message into a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduced {
    pub dataset: LogicalDataset,
    pub kind: UpdateKind,
}

/// Folds `msg` into `prev` without touching `prev`.
///
/// Only the message's own history limit applies; see [`UpdateReducer`] for
/// the variant that remembers the latest limit.
pub fn reduce(prev: &LogicalDataset, msg: &UpdateMessage) -> ChartResult<Reduced> {
    reduce_with_limit(prev, msg, msg.history_limit())
}

fn reduce_with_limit(
    prev: &LogicalDataset,
    msg: &UpdateMessage,
    history_limit: Option<usize>,
) -> ChartResult<Reduced> {
    match msg {
        UpdateMessage::Snapshot { series } => Ok(Reduced {
            dataset: series.clone(),
            kind: UpdateKind::Snapshot,
        }),
        UpdateMessage::Append { deltas, .. } => {
            let appended = validate_deltas(prev, deltas)?;
            if history_limit == Some(0) {
                return Err(ChartError::InvalidData(
                    "history limit must be >= 1".to_owned(),
                ));
            }

            let mut series = prev.clone_series();
            for (values, delta) in series.iter_mut().zip(deltas) {
                values.extend_from_slice(delta);
            }
            let dropped = history_limit.map_or(0, |limit| retain_tail(&mut series, limit));

            trace!(appended, dropped, history_limit, "reduced append");
            Ok(Reduced {
                dataset: prev.with_series(series),
                kind: UpdateKind::Append { appended, dropped },
            })
        }
    }
}

/// Checks that the deltas line up with `prev` and returns the per-series
/// sample count.
fn validate_deltas(prev: &LogicalDataset, deltas: &[Vec<f64>]) -> ChartResult<usize> {
    if deltas.len() != prev.series_count() {
        return Err(ChartError::ShapeMismatch {
            expected_series: prev.series_count(),
            actual_series: deltas.len(),
            detail: "append must carry one delta per series".to_owned(),
        });
    }

    let appended = deltas.first().map_or(0, Vec::len);
    if let Some((index, delta)) = deltas
        .iter()
        .enumerate()
        .find(|(_, delta)| delta.len() != appended)
    {
        return Err(ChartError::ShapeMismatch {
            expected_series: prev.series_count(),
            actual_series: deltas.len(),
            detail: format!(
                "series {index} carries {} new samples, expected {appended}",
                delta.len()
            ),
        });
    }
    Ok(appended)
}

/// Stateful reducer that keeps the most recent history limit.
///
/// Appends without a limit reuse the last one seen (or the configured
/// default), so the retained window does not silently grow back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateReducer {
    history_limit: Option<usize>,
}

impl UpdateReducer {
    #[must_use]
    pub fn new(default_history_limit: Option<usize>) -> Self {
        Self {
            history_limit: default_history_limit,
        }
    }

    #[must_use]
    pub fn history_limit(self) -> Option<usize> {
        self.history_limit
    }

    /// Folds `msg` into `prev`. On error the remembered limit is unchanged.
    pub fn reduce(&mut self, prev: &LogicalDataset, msg: &UpdateMessage) -> ChartResult<Reduced> {
        let limit = msg.history_limit().or(self.history_limit);
        let reduced = reduce_with_limit(prev, msg, limit)?;
        if let Some(limit) = msg.history_limit() {
            self.history_limit = Some(limit);
        }
        Ok(reduced)
    }
}
