use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Pixel geometry handed to the drawing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Observed container geometry.
///
/// Only the width is measured; the height follows from the aspect ratio so
/// both views keep the same proportions at any size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub width: u32,
    pub aspect_ratio: f64,
}

impl LayoutMetrics {
    pub fn new(width: u32, aspect_ratio: f64) -> ChartResult<Self> {
        validate_aspect_ratio(aspect_ratio)?;
        Ok(Self {
            width,
            aspect_ratio,
        })
    }

    /// Derived height. Any positive width yields at least one pixel, so a
    /// laid-out container always produces a constructible viewport.
    #[must_use]
    pub fn height(self) -> u32 {
        if self.width == 0 {
            return 0;
        }
        let height = (f64::from(self.width) * self.aspect_ratio).round();
        if height < 1.0 {
            1
        } else if height >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            height as u32
        }
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        Viewport::new(self.width, self.height())
    }

    #[must_use]
    pub fn has_width(self) -> bool {
        self.width > 0
    }
}

pub(crate) fn validate_aspect_ratio(aspect_ratio: f64) -> ChartResult<()> {
    if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return Err(ChartError::InvalidData(
            "aspect ratio must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}
