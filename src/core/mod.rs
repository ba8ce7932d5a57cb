pub mod dataset;
pub mod identity;
pub mod time_axis;
pub mod types;
pub mod update;
pub mod windowing;

pub use dataset::LogicalDataset;
pub use identity::{ChartId, SurfaceId, ViewSlot};
pub use types::{LayoutMetrics, Viewport};
pub use update::UpdateKind;
