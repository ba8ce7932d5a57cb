use serde::{Deserialize, Serialize};

use crate::core::windowing::clamp_index;

/// Transient interaction state of one drawing instance.
///
/// The drawing library owns this state internally; the engine only reads it
/// before a redraw and writes it back afterwards. It never outlives the
/// instance it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportState {
    pub cursor_index: Option<usize>,
    pub zoom_range: Option<(f64, f64)>,
}

impl ViewportState {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            cursor_index: None,
            zoom_range: None,
        }
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        self.cursor_index.is_none() && self.zoom_range.is_none()
    }

    /// Keeps the cursor on a valid sample after the dataset shrank.
    ///
    /// An out-of-range cursor moves to the last sample instead of
    /// disappearing; an empty dataset clears it.
    #[must_use]
    pub fn clamped_to_len(self, len: usize) -> Self {
        Self {
            cursor_index: self.cursor_index.and_then(|index| clamp_index(index, len)),
            zoom_range: self.zoom_range,
        }
    }
}

/// Normalizes a zoom range so `min <= max`, rejecting non-finite bounds.
#[must_use]
pub fn normalize_zoom_range(range: (f64, f64)) -> Option<(f64, f64)> {
    let (a, b) = range;
    if !a.is_finite() || !b.is_finite() {
        return None;
    }
    Some(if a <= b { (a, b) } else { (b, a) })
}
