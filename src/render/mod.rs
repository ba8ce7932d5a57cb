mod adapter;
mod null_surface;
mod options;

pub use adapter::{DatasetUpdate, RedrawKind, RenderAdapter, RenderInstanceHandle};
pub use null_surface::{NullDrawingLibrary, NullSurface};
pub use options::RenderOptions;

use crate::core::{LogicalDataset, SurfaceId};
use crate::error::ChartResult;

/// One live instance of the external drawing library.
///
/// Implementations wrap whatever stateful plotting surface the host uses.
/// The engine treats it as opaque apart from these calls.
pub trait DrawingSurface {
    /// Replaces the whole dataset on the instance.
    fn set_data(&mut self, data: &LogicalDataset) -> ChartResult<()>;

    /// Pushes only the newest samples.
    ///
    /// `data` is the full dataset after the append: its last `appended`
    /// samples are new and `dropped` samples fell off the front. Libraries
    /// without an incremental path can keep the default full replace.
    fn append_data(
        &mut self,
        data: &LogicalDataset,
        appended: usize,
        dropped: usize,
    ) -> ChartResult<()> {
        let _ = (appended, dropped);
        self.set_data(data)
    }

    fn set_options(&mut self, options: &RenderOptions) -> ChartResult<()>;

    fn cursor_index(&self) -> Option<usize>;

    fn set_cursor_index(&mut self, index: Option<usize>) -> ChartResult<()>;

    fn zoom_range(&self) -> Option<(f64, f64)>;

    fn set_zoom_range(&mut self, range: Option<(f64, f64)>) -> ChartResult<()>;

    /// Releases every resource held by the instance.
    fn destroy(&mut self);
}

/// Factory for drawing-library instances.
pub trait DrawingLibrary {
    type Surface: DrawingSurface;

    fn create_instance(
        &mut self,
        surface: &SurfaceId,
        options: &RenderOptions,
        data: &LogicalDataset,
    ) -> ChartResult<Self::Surface>;
}
