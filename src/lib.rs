//! chart-engine: headless computation engine for interactive time-series charts.
//!
//! The crate turns a multi-series dataset, a visible window, a pixel viewport
//! and an optional selection into drawable geometry, axis labels, tooltips and
//! animated value ranges. Rasterization stays with the host: frames are
//! published as plain data through a [`render::FrameSink`].

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartComputation, ChartEngine, EngineConfig};
pub use error::{ChartError, ChartResult};
