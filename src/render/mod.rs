mod backend;
mod fallback;
mod frame;
mod null_renderer;
mod primitives;
mod svg;

pub use backend::{ChartBackend, LiveChart};
pub use fallback::{
    DATA_TABLE_NOTE, FALLBACK_WIDTH, FallbackGenerator, MIN_FALLBACK_HEIGHT, PLACEHOLDER_MESSAGE,
};
pub use frame::{RenderFrame, Shape, Viewport};
pub use null_renderer::{BLANK_PNG, NullBackend, NullBackendLog, NullChart, NullFailure};
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, PathCommand, PathPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use svg::{SvgRenderStats, SvgRenderer, escape_xml};

use crate::error::ChartResult;

/// Contract implemented by any static rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from chart domain logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
