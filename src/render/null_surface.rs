use crate::core::{LogicalDataset, SurfaceId};
use crate::core::windowing::retain_tail;
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawingLibrary, DrawingSurface, RenderOptions};

/// Headless drawing library used by tests and hosts without pixels.
///
/// Cloning shares nothing: each clone hands out its own instances.
#[derive(Debug, Clone, Default)]
pub struct NullDrawingLibrary {
    /// Makes the next `create_instance` fail with a render failure.
    pub fail_next_construct: bool,
    pub constructed: usize,
}

impl DrawingLibrary for NullDrawingLibrary {
    type Surface = NullSurface;

    fn create_instance(
        &mut self,
        surface: &SurfaceId,
        options: &RenderOptions,
        data: &LogicalDataset,
    ) -> ChartResult<NullSurface> {
        if std::mem::take(&mut self.fail_next_construct) {
            return Err(ChartError::RenderFailure {
                surface: surface.to_string(),
                reason: "injected construction failure".to_owned(),
            });
        }
        if !options.viewport.is_valid() {
            return Err(ChartError::ConstructionError {
                surface: surface.to_string(),
                width: options.viewport.width,
            });
        }

        self.constructed += 1;
        Ok(NullSurface {
            surface_id: surface.clone(),
            data: data.clone(),
            options: options.clone(),
            cursor: None,
            zoom: None,
            full_redraws: 0,
            appends: 0,
            appended_samples: 0,
            option_updates: 0,
            destroy_calls: 0,
            fail_next_render: false,
            cursor_on_set_data: None,
        })
    }
}

/// Headless drawing instance.
///
/// Behaves like a typical plotting library: replacing data resets the zoom
/// and resets the cursor (or moves it to `cursor_on_set_data`), and a cursor
/// past the last sample is rejected. Incremental appends are replayed
/// against the retained copy and checked against the full dataset, so a
/// wrong delta surfaces as a render failure.
#[derive(Debug, Clone)]
pub struct NullSurface {
    pub surface_id: SurfaceId,
    pub data: LogicalDataset,
    pub options: RenderOptions,
    pub cursor: Option<usize>,
    pub zoom: Option<(f64, f64)>,
    pub full_redraws: usize,
    pub appends: usize,
    pub appended_samples: usize,
    pub option_updates: usize,
    pub destroy_calls: usize,
    /// Makes the next data or options call fail.
    pub fail_next_render: bool,
    /// Cursor placed by `set_data`, for libraries that pick one themselves.
    pub cursor_on_set_data: Option<usize>,
}

impl NullSurface {
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroy_calls > 0
    }

    /// Simulates a user cursor move.
    pub fn hover(&mut self, index: usize) {
        self.cursor = Some(index);
    }

    /// Simulates a drag-zoom gesture.
    pub fn drag_zoom(&mut self, min: f64, max: f64) {
        self.zoom = Some((min, max));
    }

    fn take_injected_failure(&mut self) -> ChartResult<()> {
        if std::mem::take(&mut self.fail_next_render) {
            return Err(ChartError::RenderFailure {
                surface: self.surface_id.to_string(),
                reason: "injected render failure".to_owned(),
            });
        }
        Ok(())
    }
}

impl DrawingSurface for NullSurface {
    fn set_data(&mut self, data: &LogicalDataset) -> ChartResult<()> {
        self.take_injected_failure()?;
        self.data = data.clone();
        self.cursor = self
            .cursor_on_set_data
            .filter(|&index| index < data.len());
        self.zoom = None;
        self.full_redraws += 1;
        Ok(())
    }

    fn append_data(
        &mut self,
        data: &LogicalDataset,
        appended: usize,
        dropped: usize,
    ) -> ChartResult<()> {
        self.take_injected_failure()?;
        if data.series_count() != self.data.series_count() {
            return Err(ChartError::InvalidData(
                "incremental append cannot change the series count".to_owned(),
            ));
        }

        let mut series = self.data.clone_series();
        for (values, new_values) in series.iter_mut().zip(data.tail(appended)) {
            values.extend_from_slice(new_values);
        }
        let kept = series.first().map_or(0, Vec::len).saturating_sub(dropped);
        retain_tail(&mut series, kept);

        let replayed = self.data.with_series(series);
        if &replayed != data {
            return Err(ChartError::InvalidData(
                "incremental append diverged from the full dataset".to_owned(),
            ));
        }

        self.data = replayed;
        self.appends += 1;
        self.appended_samples += appended;
        Ok(())
    }

    fn set_options(&mut self, options: &RenderOptions) -> ChartResult<()> {
        self.take_injected_failure()?;
        self.options = options.clone();
        self.option_updates += 1;
        Ok(())
    }

    fn cursor_index(&self) -> Option<usize> {
        self.cursor
    }

    fn set_cursor_index(&mut self, index: Option<usize>) -> ChartResult<()> {
        if let Some(index) = index.filter(|&index| index >= self.data.len()) {
            return Err(ChartError::InvalidData(format!(
                "cursor index {index} is out of bounds for {} samples",
                self.data.len()
            )));
        }
        self.cursor = index;
        Ok(())
    }

    fn zoom_range(&self) -> Option<(f64, f64)> {
        self.zoom
    }

    fn set_zoom_range(&mut self, range: Option<(f64, f64)>) -> ChartResult<()> {
        self.zoom = range;
        Ok(())
    }

    fn destroy(&mut self) {
        self.destroy_calls += 1;
    }
}
