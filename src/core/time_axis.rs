use chrono::{DateTime, Utc};

/// Converts a timestamp into fractional unix seconds, the x-axis unit the
/// drawing library expects for time series.
#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Builds a shared x-axis series from timestamps.
#[must_use]
pub fn unix_seconds_axis(times: &[DateTime<Utc>]) -> Vec<f64> {
    times.iter().copied().map(datetime_to_unix_seconds).collect()
}
