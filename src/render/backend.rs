use crate::core::{ChartSpec, SeriesData, StyleOptions};
use crate::error::ChartResult;

/// Factory for the interactive charting library.
///
/// Hosts without the library simply pass no backend; every method here may
/// fail and the caller is expected to degrade to the static fallback.
pub trait ChartBackend {
    fn name(&self) -> &str;

    fn create(
        &self,
        spec: &ChartSpec,
        series: &SeriesData,
        categories: Option<&[String]>,
    ) -> ChartResult<Box<dyn LiveChart>>;
}

/// One live, interactive chart instance owned by the primary renderer.
pub trait LiveChart {
    /// Initial paint, or repaint after an update.
    fn render(&mut self) -> ChartResult<()>;

    fn update_series(&mut self, series: &SeriesData, categories: Option<&[String]>)
    -> ChartResult<()>;

    fn update_options(&mut self, style: &StyleOptions) -> ChartResult<()>;

    fn toggle_series(&mut self, series_name: &str) -> ChartResult<()>;

    fn zoom(&mut self, start: f64, end: f64) -> ChartResult<()>;

    /// Rasterizes the current canvas to PNG bytes.
    fn rasterize_png(&self) -> ChartResult<Vec<u8>>;

    fn destroy(&mut self) {}
}
