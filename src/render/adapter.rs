use serde_json::Value;
use tracing::{debug, trace};

use crate::core::{LayoutMetrics, LogicalDataset, SurfaceId, UpdateKind, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ViewportState, normalize_zoom_range};

use super::{DrawingLibrary, DrawingSurface, RenderOptions};

/// One dataset revision as seen by the render layer.
#[derive(Debug, Clone, Copy)]
pub struct DatasetUpdate<'a> {
    pub dataset: &'a LogicalDataset,
    pub kind: UpdateKind,
    /// Monotonic revision of `dataset`; repeated calls with the same
    /// revision are ignored.
    pub revision: u64,
}

/// Which path an update took on the drawing instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawKind {
    /// Nothing had to be sent.
    Skipped,
    /// Only the new samples were pushed.
    Incremental,
    /// The whole dataset was replaced.
    Full,
}

/// Exclusive handle to one live drawing instance.
///
/// Handles are never cloned or shared between view slots. Destroying an
/// already destroyed handle is a no-op.
#[derive(Debug)]
pub struct RenderInstanceHandle<S: DrawingSurface> {
    surface_id: SurfaceId,
    surface: S,
    viewport: Viewport,
    labels: Vec<String>,
    series_count: usize,
    len: usize,
    revision: u64,
    needs_full_redraw: bool,
    destroyed: bool,
}

impl<S: DrawingSurface> RenderInstanceHandle<S> {
    #[must_use]
    pub fn surface_id(&self) -> &SurfaceId {
        &self.surface_id
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access to the instance, for host-side gestures.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Samples per series currently shown by the instance.
    #[must_use]
    pub fn data_len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series_count
    }

    /// Series names last sent to the instance.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_live(&self) -> ChartResult<()> {
        if self.destroyed {
            return Err(ChartError::MissingSurface {
                surface: self.surface_id.to_string(),
            });
        }
        Ok(())
    }

    fn render_failure(&self, err: ChartError) -> ChartError {
        match err {
            ChartError::RenderFailure { .. } => err,
            other => ChartError::RenderFailure {
                surface: self.surface_id.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Uniform wrapper around one drawing library for one view slot.
///
/// Every operation is synchronous. Data-only changes never recreate the
/// instance; only `construct` does.
#[derive(Debug, Clone)]
pub struct RenderAdapter<L: DrawingLibrary> {
    library: L,
    surface_id: SurfaceId,
    interactive: bool,
    base_options: Value,
}

impl<L: DrawingLibrary> RenderAdapter<L> {
    #[must_use]
    pub fn new(library: L, surface_id: SurfaceId) -> Self {
        Self {
            library,
            surface_id,
            interactive: true,
            base_options: Value::Object(serde_json::Map::new()),
        }
    }

    #[must_use]
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    #[must_use]
    pub fn with_base_options(mut self, base_options: Value) -> Self {
        self.base_options = base_options;
        self
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn set_base_options(&mut self, base_options: Value) {
        self.base_options = base_options;
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    #[must_use]
    pub fn surface_id(&self) -> &SurfaceId {
        &self.surface_id
    }

    #[must_use]
    pub fn library(&self) -> &L {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut L {
        &mut self.library
    }

    #[must_use]
    pub fn options_for(
        &self,
        viewport: Viewport,
        cursor: Option<usize>,
        labels: &[String],
    ) -> RenderOptions {
        RenderOptions::new(viewport, self.base_options.clone())
            .with_cursor(cursor)
            .with_interactive(self.interactive)
            .with_labels(labels.to_vec())
    }

    /// Creates a drawing instance sized to `metrics` and showing `data`.
    ///
    /// Fails with `ConstructionError` while the container has no width; the
    /// caller retries on the next layout event.
    pub fn construct(
        &mut self,
        metrics: LayoutMetrics,
        data: &LogicalDataset,
        revision: u64,
    ) -> ChartResult<RenderInstanceHandle<L::Surface>> {
        let viewport = metrics.viewport();
        if !viewport.is_valid() {
            return Err(ChartError::ConstructionError {
                surface: self.surface_id.to_string(),
                width: metrics.width,
            });
        }

        let labels = data.resolved_labels();
        let options = self.options_for(viewport, None, &labels);
        let surface = self
            .library
            .create_instance(&self.surface_id, &options, data)
            .map_err(|err| match err {
                ChartError::ConstructionError { .. } | ChartError::RenderFailure { .. } => err,
                other => ChartError::RenderFailure {
                    surface: self.surface_id.to_string(),
                    reason: other.to_string(),
                },
            })?;

        debug!(
            surface = %self.surface_id,
            width = viewport.width,
            height = viewport.height,
            samples = data.len(),
            series = data.series_count(),
            "constructed drawing instance"
        );

        Ok(RenderInstanceHandle {
            surface_id: self.surface_id.clone(),
            surface,
            viewport,
            labels,
            series_count: data.series_count(),
            len: data.len(),
            revision,
            needs_full_redraw: false,
            destroyed: false,
        })
    }

    /// Pushes a new dataset revision to the instance.
    ///
    /// Snapshots, series-count changes and recovery after a failed call take
    /// the full path; plain appends send only the new samples.
    pub fn apply_update(
        &mut self,
        handle: &mut RenderInstanceHandle<L::Surface>,
        update: DatasetUpdate<'_>,
    ) -> ChartResult<RedrawKind> {
        handle.ensure_live()?;
        if update.revision == handle.revision {
            trace!(
                surface = %handle.surface_id,
                revision = update.revision,
                "revision already applied"
            );
            return Ok(RedrawKind::Skipped);
        }

        let next = update.dataset;
        let redraw = match update.kind {
            UpdateKind::Snapshot => RedrawKind::Full,
            _ if handle.needs_full_redraw || next.series_count() != handle.series_count => {
                RedrawKind::Full
            }
            UpdateKind::Append {
                appended: 0,
                dropped: 0,
            } => RedrawKind::Skipped,
            // The window swallowed part of the delta itself.
            UpdateKind::Append { appended, .. } if appended > next.len() => RedrawKind::Full,
            UpdateKind::Append { .. } => RedrawKind::Incremental,
        };

        let result = match (redraw, update.kind) {
            (RedrawKind::Incremental, UpdateKind::Append { appended, dropped }) => {
                handle.surface.append_data(next, appended, dropped)
            }
            (RedrawKind::Skipped, _) => Ok(()),
            _ => self.full_redraw(handle, next),
        };

        if let Err(err) = result {
            handle.needs_full_redraw = true;
            return Err(handle.render_failure(err));
        }

        handle.series_count = next.series_count();
        handle.len = next.len();
        handle.revision = update.revision;
        handle.needs_full_redraw = false;
        trace!(
            surface = %handle.surface_id,
            revision = update.revision,
            ?redraw,
            samples = handle.len,
            "applied update"
        );
        Ok(redraw)
    }

    /// Applies new container geometry without touching data or zoom.
    ///
    /// Returns `false` when the geometry did not change.
    pub fn resize(
        &mut self,
        handle: &mut RenderInstanceHandle<L::Surface>,
        metrics: LayoutMetrics,
    ) -> ChartResult<bool> {
        handle.ensure_live()?;
        let viewport = metrics.viewport();
        if viewport == handle.viewport {
            return Ok(false);
        }
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let options = self.options_for(viewport, handle.surface.cursor_index(), &handle.labels);
        handle
            .surface
            .set_options(&options)
            .map_err(|err| handle.render_failure(err))?;
        debug!(
            surface = %handle.surface_id,
            width = viewport.width,
            height = viewport.height,
            "resized drawing instance"
        );
        handle.viewport = viewport;
        Ok(true)
    }

    /// Replaces the data and, when the series names changed, the options.
    fn full_redraw(
        &self,
        handle: &mut RenderInstanceHandle<L::Surface>,
        next: &LogicalDataset,
    ) -> ChartResult<()> {
        handle.surface.set_data(next)?;
        let labels = next.resolved_labels();
        if labels != handle.labels {
            let options =
                self.options_for(handle.viewport, handle.surface.cursor_index(), &labels);
            handle.surface.set_options(&options)?;
            handle.labels = labels;
        }
        Ok(())
    }

    /// Reads the instance's cursor and zoom. Destroyed handles report none.
    #[must_use]
    pub fn save_viewport(&self, handle: &RenderInstanceHandle<L::Surface>) -> ViewportState {
        if handle.destroyed {
            return ViewportState::none();
        }
        ViewportState {
            cursor_index: handle.surface.cursor_index(),
            zoom_range: handle.surface.zoom_range().and_then(normalize_zoom_range),
        }
    }

    /// Writes cursor and zoom back to the instance.
    ///
    /// Fields that already match are not rewritten.
    pub fn restore_viewport(
        &mut self,
        handle: &mut RenderInstanceHandle<L::Surface>,
        state: ViewportState,
    ) -> ChartResult<()> {
        handle.ensure_live()?;
        let zoom = state.zoom_range.and_then(normalize_zoom_range);
        if handle.surface.zoom_range() != zoom {
            handle
                .surface
                .set_zoom_range(zoom)
                .map_err(|err| handle.render_failure(err))?;
        }
        if handle.surface.cursor_index() != state.cursor_index {
            handle
                .surface
                .set_cursor_index(state.cursor_index)
                .map_err(|err| handle.render_failure(err))?;
        }
        Ok(())
    }

    /// Releases the instance. A second call only logs.
    pub fn destroy(&mut self, handle: &mut RenderInstanceHandle<L::Surface>) {
        if handle.destroyed {
            debug!(surface = %handle.surface_id, "destroy on already destroyed handle ignored");
            return;
        }
        handle.surface.destroy();
        handle.destroyed = true;
        debug!(surface = %handle.surface_id, "destroyed drawing instance");
    }
}
