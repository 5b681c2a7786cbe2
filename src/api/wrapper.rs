use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::compute::ComputeOutput;
use crate::core::{
    ChartRegistry, ChartSpec, ChartTypeResolver, DataTableModel, SeriesData, StyleOptions,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{FocusState, KeyAction, KeyInput};
use crate::render::{ChartBackend, FallbackGenerator, LiveChart};

use super::{
    ChartRequest, ExportArtifact, OverlayConfig, Presenter, RegionContent, RendererHandle,
};

/// Per-chart lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderState {
    Uninitialized,
    PrimaryRendering,
    PrimaryActive,
    FallbackActive,
}

/// Why the last render attempt ended in fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    HostMissing,
    RendererUnavailable,
    ConstructionFailed(String),
    PaintFailed(String),
}

impl FallbackReason {
    /// Absence of the host or the renderer is an expected condition, not a fault.
    #[must_use]
    pub fn is_environmental(&self) -> bool {
        matches!(self, Self::HostMissing | Self::RendererUnavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Initial,
    Series,
    Options,
}

/// Orchestrates one chart: primary renderer when possible, static fallback
/// and an always-current data table otherwise.
///
/// No public method returns an error; failures become state transitions
/// or logged no-ops.
pub struct ResilientChart<'a, P: Presenter> {
    registry: &'a ChartRegistry,
    backend: Option<&'a dyn ChartBackend>,
    presenter: P,
    config: OverlayConfig,
    spec: ChartSpec,
    series: SeriesData,
    categories: Option<Vec<String>>,
    table: DataTableModel,
    state: RenderState,
    fallback_reason: Option<FallbackReason>,
    live: Option<RendererHandle>,
    focus: FocusState,
    table_visible: bool,
}

impl<'a, P: Presenter> ResilientChart<'a, P> {
    /// Resolves, builds and renders the chart described by `request`.
    ///
    /// `backend` is `None` when the page has no interactive charting library.
    pub fn mount(
        registry: &'a ChartRegistry,
        backend: Option<&'a dyn ChartBackend>,
        presenter: P,
        request: ChartRequest,
        config: OverlayConfig,
    ) -> Self {
        let kind = request.kind.unwrap_or_else(|| {
            ChartTypeResolver::new(registry).resolve(
                &request.host.classes,
                &request.host.parent_classes,
                Some(request.resolution_id()),
            )
        });
        let entry = registry.lookup(kind);
        let style = match &request.style_options {
            Some(overrides) => entry.style.merged_with(overrides),
            None => entry.style.clone(),
        };
        let height = request.height.unwrap_or(entry.height);
        let (series, categories) = match request.series {
            Some(series) => (series, request.categories),
            None => (
                entry.sample_series.clone(),
                request.categories.or_else(|| entry.sample_categories.clone()),
            ),
        };

        let spec = ChartSpec::new(request.id, kind, height, style);
        let table = DataTableModel::build(&series, categories.as_deref());
        debug!(chart_id = %spec.id, kind = %kind, rows = table.row_count(), "mount chart");

        let mut chart = Self {
            registry,
            backend,
            presenter,
            table_visible: config.table_initially_visible,
            config,
            spec,
            series,
            categories,
            table,
            state: RenderState::Uninitialized,
            fallback_reason: None,
            live: None,
            focus: FocusState::default(),
        };
        chart.rerender(Change::Initial);
        chart
    }

    #[must_use]
    pub fn state(&self) -> RenderState {
        self.state
    }

    #[must_use]
    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    #[must_use]
    pub fn series(&self) -> &SeriesData {
        &self.series
    }

    #[must_use]
    pub fn categories(&self) -> Option<&[String]> {
        self.categories.as_deref()
    }

    #[must_use]
    pub fn table(&self) -> &DataTableModel {
        &self.table
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The page may change around the chart, e.g. a host element appearing
    /// before the next update.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    #[must_use]
    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        self.fallback_reason.as_ref()
    }

    /// Live renderer handle, present only in `PrimaryActive`.
    #[must_use]
    pub fn handle(&self) -> Option<&RendererHandle> {
        self.live.as_ref()
    }

    #[must_use]
    pub fn is_table_visible(&self) -> bool {
        self.table_visible
    }

    #[must_use]
    pub fn focused_point(&self) -> Option<usize> {
        self.focus.focused()
    }

    /// Replaces the data. The table is regenerated and shown before the
    /// renderer repaints; from fallback this retries the primary renderer.
    pub fn update_series(&mut self, series: SeriesData, categories: Option<Vec<String>>) {
        self.series = series;
        self.categories = categories;
        self.refresh_table();
        self.rerender(Change::Series);
    }

    /// Merges `overrides` into the current style options and repaints.
    pub fn update_options(&mut self, overrides: &StyleOptions) {
        self.spec = ChartSpec::new(
            self.spec.id.clone(),
            self.spec.kind,
            self.spec.height,
            self.spec.style_options.merged_with(overrides),
        );
        self.refresh_table();
        self.rerender(Change::Options);
    }

    /// Applies a resolved background job. Failed jobs keep the data on
    /// screen. Returns whether the chart data changed.
    pub fn apply_computed(
        &mut self,
        result: ChartResult<ComputeOutput>,
        series_name: &str,
    ) -> bool {
        match result {
            Ok(output) => match output.into_series_data(series_name) {
                Some(series) => {
                    let categories = self.categories.clone();
                    self.update_series(series, categories);
                    true
                }
                None => {
                    debug!(chart_id = %self.spec.id, "computed output has no series shape");
                    false
                }
            },
            Err(err) => {
                warn!(
                    chart_id = %self.spec.id,
                    error = %err,
                    "keeping previous data after failed job"
                );
                false
            }
        }
    }

    pub fn toggle_series(&mut self, series_name: &str) -> bool {
        self.pass_through("toggle_series", |chart| chart.toggle_series(series_name))
    }

    pub fn zoom(&mut self, start: f64, end: f64) -> bool {
        self.pass_through("zoom", |chart| chart.zoom(start, end))
    }

    /// Rasterizes the live chart and delivers a PNG. Unavailable in fallback.
    pub fn export_png(&mut self) -> ChartResult<()> {
        let Some(handle) = self.live.clone().filter(|_| self.state == RenderState::PrimaryActive)
        else {
            debug!(
                chart_id = %self.spec.id,
                state = ?self.state,
                "png export ignored without live chart"
            );
            return Err(ChartError::ExportUnavailable(format!(
                "png export needs an active primary renderer (state {:?})",
                self.state
            )));
        };
        let bytes = handle
            .query(|chart| chart.rasterize_png())
            .ok_or_else(|| ChartError::ExportUnavailable("live chart is busy".to_owned()))??;
        let artifact = ExportArtifact::png(self.export_stem(), bytes, Utc::now());
        self.presenter.deliver_export(&self.spec.id, artifact);
        Ok(())
    }

    /// Delivers the current data table as CSV. Available in every state.
    pub fn export_csv(&mut self) -> bool {
        let artifact = ExportArtifact::csv(self.export_stem(), &self.table, Utc::now());
        self.presenter.deliver_export(&self.spec.id, artifact);
        true
    }

    pub fn set_table_visible(&mut self, visible: bool) {
        if self.state == RenderState::FallbackActive && !visible {
            debug!(chart_id = %self.spec.id, "data table stays visible in fallback");
            return;
        }
        self.table_visible = visible;
        self.presenter.set_table_visible(&self.spec.id, visible);
    }

    /// Keyboard entry point for the focused chart surface.
    pub fn handle_key(&mut self, input: KeyInput) -> KeyAction {
        let action = self
            .focus
            .handle(input, self.table.row_count(), self.config.shortcuts);
        match &action {
            KeyAction::Announce(index) => {
                if let Some(message) = self.table.describe_row(*index) {
                    self.presenter.announce(&self.spec.id, &message);
                }
            }
            KeyAction::ToggleTable => self.set_table_visible(!self.table_visible),
            KeyAction::ExportPng => {
                if let Err(err) = self.export_png() {
                    warn!(chart_id = %self.spec.id, error = %err, "png export failed");
                }
            }
            KeyAction::ExportCsv => {
                self.export_csv();
            }
            KeyAction::FocusMoved(_) | KeyAction::Cleared | KeyAction::Ignored => {}
        }
        action
    }

    /// Tears the chart down and hands the presenter back.
    pub fn unmount(mut self) -> P {
        self.release_live();
        self.presenter.unmount(&self.spec.id);
        trace!(chart_id = %self.spec.id, "chart unmounted");
        self.presenter
    }

    fn export_stem(&self) -> &str {
        self.config
            .export_file_stem
            .as_deref()
            .unwrap_or(&self.spec.id)
    }

    fn refresh_table(&mut self) {
        self.table = DataTableModel::build(&self.series, self.categories.as_deref());
        self.focus.clamp_to(self.table.row_count());
        self.presenter
            .show_table(&self.spec.id, &self.table, self.table_visible);
    }

    fn pass_through(
        &mut self,
        operation: &'static str,
        op: impl FnOnce(&mut dyn LiveChart) -> ChartResult<()>,
    ) -> bool {
        let Some(handle) = self.live.as_ref().filter(|_| self.state == RenderState::PrimaryActive)
        else {
            debug!(
                chart_id = %self.spec.id,
                operation,
                state = ?self.state,
                "pass-through ignored without live chart"
            );
            return false;
        };
        match handle.with_mut(op) {
            Ok(()) => true,
            Err(err) => {
                warn!(chart_id = %self.spec.id, operation, error = %err, "pass-through failed");
                false
            }
        }
    }

    fn transition(&mut self, next: RenderState) {
        trace!(chart_id = %self.spec.id, from = ?self.state, to = ?next, "render state transition");
        self.state = next;
    }

    fn rerender(&mut self, change: Change) {
        self.transition(RenderState::PrimaryRendering);
        self.presenter.ensure_table_controls(&self.spec.id);
        let outcome = if self.presenter.host_exists(&self.spec.id) {
            match self.live.clone() {
                Some(handle) => self.repaint(&handle, change).map(|()| handle),
                None => self.construct(),
            }
        } else {
            Err(FallbackReason::HostMissing)
        };
        match outcome {
            Ok(handle) => self.enter_primary(handle),
            Err(reason) => self.enter_fallback(reason),
        }
    }

    fn construct(&self) -> Result<RendererHandle, FallbackReason> {
        let backend = self.backend.ok_or(FallbackReason::RendererUnavailable)?;
        let categories = self.categories.as_deref();
        let chart = backend
            .create(&self.spec, &self.series, categories)
            .map_err(|err| match err {
                ChartError::RendererUnavailable => FallbackReason::RendererUnavailable,
                other => FallbackReason::ConstructionFailed(other.to_string()),
            })?;
        let handle = RendererHandle::new(chart);
        if let Err(err) = handle.with_mut(|chart| chart.render()) {
            destroy_chart(&self.spec.id, &handle);
            return Err(FallbackReason::PaintFailed(err.to_string()));
        }
        debug!(chart_id = %self.spec.id, backend = backend.name(), "primary renderer constructed");
        Ok(handle)
    }

    fn repaint(&self, handle: &RendererHandle, change: Change) -> Result<(), FallbackReason> {
        handle
            .with_mut(|chart| {
                match change {
                    Change::Series => {
                        chart.update_series(&self.series, self.categories.as_deref())?;
                    }
                    Change::Options => chart.update_options(&self.spec.style_options)?,
                    Change::Initial => {}
                }
                chart.render()
            })
            .map_err(|err| FallbackReason::PaintFailed(err.to_string()))
    }

    fn enter_primary(&mut self, handle: RendererHandle) {
        self.presenter.mount(&self.spec.id, RegionContent::Primary);
        self.presenter
            .show_table(&self.spec.id, &self.table, self.table_visible);
        self.presenter.set_png_export_enabled(&self.spec.id, true);
        self.presenter
            .publish_handle(&self.spec.handle_key(), handle.clone());
        self.live = Some(handle);
        self.fallback_reason = None;
        self.transition(RenderState::PrimaryActive);
    }

    fn enter_fallback(&mut self, reason: FallbackReason) {
        match &reason {
            FallbackReason::HostMissing => {
                debug!(chart_id = %self.spec.id, "host element missing, rendering fallback");
            }
            FallbackReason::RendererUnavailable => {
                debug!(chart_id = %self.spec.id, "primary renderer unavailable, rendering fallback");
            }
            FallbackReason::ConstructionFailed(message) => {
                warn!(chart_id = %self.spec.id, error = %message, "primary renderer construction failed");
            }
            FallbackReason::PaintFailed(message) => {
                warn!(chart_id = %self.spec.id, error = %message, "primary renderer paint failed");
            }
        }
        self.release_live();

        let svg = FallbackGenerator::new(self.registry).generate_for(&self.spec);
        self.presenter
            .mount(&self.spec.id, RegionContent::Fallback { svg });
        self.table_visible = true;
        self.presenter.show_table(&self.spec.id, &self.table, true);
        self.presenter.set_png_export_enabled(&self.spec.id, false);
        self.fallback_reason = Some(reason);
        self.transition(RenderState::FallbackActive);
    }

    fn release_live(&mut self) {
        if let Some(handle) = self.live.take() {
            destroy_chart(&self.spec.id, &handle);
            self.presenter.withdraw_handle(&self.spec.handle_key());
        }
    }
}

/// Returns `false` when the chart is borrowed elsewhere and stays alive.
fn destroy_chart(chart_id: &str, handle: &RendererHandle) -> bool {
    match handle.with_mut(|chart| {
        chart.destroy();
        Ok(())
    }) {
        Ok(()) => true,
        Err(err) => {
            warn!(chart_id, error = %err, "live chart could not be destroyed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::destroy_chart;
    use crate::api::RendererHandle;
    use crate::core::{ChartKind, ChartSpec, SeriesData, StyleOptions};
    use crate::render::{ChartBackend, NullBackend};

    #[test]
    fn destroy_reports_a_busy_chart() {
        let backend = NullBackend::default();
        let spec = ChartSpec::new("busy-chart", ChartKind::Line, 320, StyleOptions::default());
        let chart = backend
            .create(&spec, &SeriesData::flat(&[1.0, 2.0]), None)
            .expect("null chart");
        let handle = RendererHandle::new(chart);

        let while_borrowed = handle.query(|_| destroy_chart(&spec.id, &handle));
        assert_eq!(while_borrowed, Some(false));
        assert_eq!(backend.log().destroyed, 0);

        assert!(destroy_chart(&spec.id, &handle));
        assert_eq!(backend.log().destroyed, 1);
    }
}
