//! resilient-chart-rs: chart rendering that never leaves a blank region.
//!
//! Each chart is drawn by an interactive primary renderer when the page has
//! one and it behaves; otherwise a static, labelled SVG stands in. Both
//! paths keep an accessible data table in sync with the visual, and numeric
//! shaping runs on a background channel with an inline fallback.

pub mod api;
pub mod compute;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartRequest, OverlayConfig, RenderState, ResilientChart};
pub use error::{ChartError, ChartResult};
