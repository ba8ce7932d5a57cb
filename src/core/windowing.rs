/// Drops the oldest samples of every series so at most `limit` remain.
///
/// All series lose the same number of leading samples, so column alignment
/// is preserved. Returns the number of samples dropped per series.
pub fn retain_tail(series: &mut [Vec<f64>], limit: usize) -> usize {
    let len = series.first().map_or(0, Vec::len);
    if len <= limit {
        return 0;
    }

    let dropped = len - limit;
    for values in series.iter_mut() {
        values.drain(..dropped);
    }
    dropped
}

/// Clamps a sample index into `0..len`.
///
/// Returns `None` when there are no samples to point at.
#[must_use]
pub fn clamp_index(index: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(index.min(len - 1))
    }
}
