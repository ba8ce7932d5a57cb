use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Column-aligned collection of named numeric series.
///
/// `series[0]` is the shared x-axis and `series[1..]` are the y-values of
/// each trajectory. Every series has the same length at all times.
///
/// On the wire a dataset is either plain nested arrays or
/// `{"series": [[..]], "labels": [..]}`. Unlabelled series get the names
/// `x`, `Trajectory 1`, `Trajectory 2`, ...
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "DatasetRepr", into = "DatasetRepr")]
pub struct LogicalDataset {
    series: Vec<Vec<f64>>,
    labels: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DatasetRepr {
    Plain(Vec<Vec<f64>>),
    Labelled {
        series: Vec<Vec<f64>>,
        labels: Vec<String>,
    },
}

impl LogicalDataset {
    /// Builds a dataset, rejecting series of unequal length.
    pub fn new(series: Vec<Vec<f64>>) -> ChartResult<Self> {
        if let Some(first) = series.first() {
            let expected = first.len();
            if let Some((index, values)) = series
                .iter()
                .enumerate()
                .find(|(_, values)| values.len() != expected)
            {
                return Err(ChartError::InvalidData(format!(
                    "series {index} has {} samples, expected {expected}",
                    values.len()
                )));
            }
        }
        Ok(Self {
            series,
            labels: None,
        })
    }

    /// Names every series, x-axis included.
    pub fn with_labels(mut self, labels: Vec<String>) -> ChartResult<Self> {
        if labels.len() != self.series.len() {
            return Err(ChartError::InvalidData(format!(
                "{} labels given for {} series",
                labels.len(),
                self.series.len()
            )));
        }
        self.labels = Some(labels);
        Ok(self)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalizes flat single-trajectory input into the two-series layout.
    pub fn from_single_series(x: Vec<f64>, y: Vec<f64>) -> ChartResult<Self> {
        Self::new(vec![x, y])
    }

    /// Normalizes per-trajectory input, where each trajectory carries its own
    /// x and y arrays, into the shared-x layout.
    ///
    /// The first trajectory's x-values become the shared axis, so every
    /// trajectory must have the same length.
    pub fn from_trajectories(x_data: Vec<Vec<f64>>, y_data: Vec<Vec<f64>>) -> ChartResult<Self> {
        if x_data.len() != y_data.len() {
            return Err(ChartError::InvalidData(format!(
                "x and y must have the same number of trajectories ({} vs {})",
                x_data.len(),
                y_data.len()
            )));
        }
        if x_data.is_empty() {
            return Err(ChartError::InvalidData("no trajectories provided".to_owned()));
        }
        for (index, (x, y)) in x_data.iter().zip(&y_data).enumerate() {
            if x.len() != y.len() {
                return Err(ChartError::InvalidData(format!(
                    "trajectory {index} x and y must have the same length"
                )));
            }
            if x.is_empty() {
                return Err(ChartError::InvalidData(format!(
                    "trajectory {index} cannot be empty"
                )));
            }
        }

        let mut x_data = x_data;
        let mut series = Vec::with_capacity(y_data.len() + 1);
        series.push(x_data.swap_remove(0));
        series.extend(y_data);
        Self::new(series)
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Number of samples in each series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn series(&self) -> &[Vec<f64>] {
        &self.series
    }

    #[must_use]
    pub fn x_axis(&self) -> Option<&[f64]> {
        self.series.first().map(Vec::as_slice)
    }

    /// Labels set with `with_labels`, if any.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// One display name per series, falling back to positional names.
    #[must_use]
    pub fn resolved_labels(&self) -> Vec<String> {
        match &self.labels {
            Some(labels) => labels.clone(),
            None => (0..self.series.len())
                .map(|index| match index {
                    0 => "x".to_owned(),
                    n => format!("Trajectory {n}"),
                })
                .collect(),
        }
    }

    /// Returns the trailing `count` samples of every series.
    #[must_use]
    pub fn tail(&self, count: usize) -> Vec<&[f64]> {
        let start = self.len().saturating_sub(count);
        self.series.iter().map(|values| &values[start..]).collect()
    }

    /// Same labels, new column-aligned series.
    pub(crate) fn with_series(&self, series: Vec<Vec<f64>>) -> Self {
        debug_assert!(
            series
                .first()
                .is_none_or(|first| series.iter().all(|values| values.len() == first.len())),
            "series must stay column-aligned"
        );
        Self {
            series,
            labels: self.labels.clone(),
        }
    }

    pub(crate) fn clone_series(&self) -> Vec<Vec<f64>> {
        self.series.clone()
    }
}

impl TryFrom<Vec<Vec<f64>>> for LogicalDataset {
    type Error = ChartError;

    fn try_from(series: Vec<Vec<f64>>) -> ChartResult<Self> {
        Self::new(series)
    }
}

impl From<LogicalDataset> for Vec<Vec<f64>> {
    fn from(dataset: LogicalDataset) -> Self {
        dataset.series
    }
}

impl TryFrom<DatasetRepr> for LogicalDataset {
    type Error = ChartError;

    fn try_from(repr: DatasetRepr) -> ChartResult<Self> {
        match repr {
            DatasetRepr::Plain(series) => Self::new(series),
            DatasetRepr::Labelled { series, labels } => Self::new(series)?.with_labels(labels),
        }
    }
}

impl From<LogicalDataset> for DatasetRepr {
    fn from(dataset: LogicalDataset) -> Self {
        match dataset.labels {
            Some(labels) => Self::Labelled {
                series: dataset.series,
                labels,
            },
            None => Self::Plain(dataset.series),
        }
    }
}
