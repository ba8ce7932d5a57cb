//! chart-sync: live-chart synchronization engine.
//!
//! Keeps an inline view and an overlay view of one streaming dataset in step
//! while preserving each view's cursor and zoom across data updates and
//! container resizes. The drawing library itself stays behind the
//! `render::DrawingLibrary` seam.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartComponent, ChartComponentConfig, ChartHost, UpdateMessage};
pub use error::{ChartError, ChartResult};
