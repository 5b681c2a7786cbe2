//! Page-facing surface: the resilient chart wrapper and what it talks to.

mod export;
mod presenter;
mod request;
mod wrapper;

pub use export::{
    CSV_MIME, ExportArtifact, ExportFormat, PNG_MIME, export_file_name, to_csv,
};
pub use presenter::{MemoryPresenter, Presenter, RegionContent, RegionSnapshot, RendererHandle};
pub use request::{
    CHART_REQUEST_JSON_SCHEMA_V1, ChartRequest, ChartRequestJsonContractV1, OverlayConfig,
};
pub use wrapper::{FallbackReason, RenderState, ResilientChart};
