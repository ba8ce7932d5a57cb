use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("shape mismatch: expected {expected_series} series, got {actual_series} ({detail})")]
    ShapeMismatch {
        expected_series: usize,
        actual_series: usize,
        detail: String,
    },

    #[error("cannot construct surface `{surface}` in a container of width {width}")]
    ConstructionError { surface: String, width: u32 },

    #[error("render failure on surface `{surface}`: {reason}")]
    RenderFailure { surface: String, reason: String },

    #[error("no live surface for `{surface}`")]
    MissingSurface { surface: String },

    #[error("unknown chart id `{0}`")]
    UnknownChart(String),
}

impl ChartError {
    /// Returns `true` for errors the engine recovers from by retrying later
    /// rather than by dropping the work.
    #[must_use]
    pub fn is_deferrable(&self) -> bool {
        matches!(self, Self::ConstructionError { .. })
    }
}
