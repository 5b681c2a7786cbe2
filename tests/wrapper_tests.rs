use resilient_chart::api::{
    ChartRequest, FallbackReason, MemoryPresenter, OverlayConfig, RegionContent, RenderState,
    ResilientChart,
};
use resilient_chart::compute::{ComputeChannel, ComputeJob};
use resilient_chart::core::{
    ChartKind, ChartRegistry, HostElement, NamedSeries, SeriesData, StyleOptions,
};
use resilient_chart::render::{ChartBackend, NullBackend, NullFailure};
use resilient_chart::ChartError;

const MARKET_ID: &str = "marketGrowth-chart";

fn market_request() -> ChartRequest {
    ChartRequest::new(MARKET_ID).with_series(
        SeriesData::Named(vec![NamedSeries::from_numbers("Market Size", &[1.5, 5.0, 20.0])]),
        Some(&["2025", "2026", "2027"]),
    )
}

fn mount<'a>(
    registry: &'a ChartRegistry,
    backend: Option<&'a dyn ChartBackend>,
    request: ChartRequest,
) -> ResilientChart<'a, MemoryPresenter> {
    ResilientChart::mount(
        registry,
        backend,
        MemoryPresenter::with_hosts(&[MARKET_ID]),
        request,
        OverlayConfig::default(),
    )
}

#[test]
fn missing_renderer_ends_in_fallback_with_visible_table() {
    let registry = ChartRegistry::builtin();
    let chart = mount(&registry, None, market_request());

    assert_eq!(chart.state(), RenderState::FallbackActive);
    assert_eq!(chart.spec().kind, ChartKind::Area);
    assert_eq!(chart.fallback_reason(), Some(&FallbackReason::RendererUnavailable));
    assert_eq!(chart.table().row_count(), 3);
    assert_eq!(chart.table().value_headers(), &["Market Size".to_owned()][..]);

    let region = chart.presenter().region(MARKET_ID).expect("region mounted");
    match region.content.as_ref().expect("content") {
        RegionContent::Fallback { svg } => assert!(svg.contains("Market Growth Projection")),
        RegionContent::Primary => panic!("expected fallback content"),
    }
    assert!(region.table_visible);
    assert_eq!(region.table.as_ref(), Some(chart.table()));
    assert!(!region.png_export_enabled);
    assert!(chart.presenter().publications().is_empty());
    assert!(chart.handle().is_none());
}

#[test]
fn working_renderer_publishes_handle_once() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::default();
    let chart = mount(&registry, Some(&backend), market_request());

    assert_eq!(chart.state(), RenderState::PrimaryActive);
    assert_eq!(chart.fallback_reason(), None);
    assert_eq!(chart.presenter().publications(), &["chart:marketGrowth-chart".to_owned()]);

    let published = chart
        .presenter()
        .handle("chart:marketGrowth-chart")
        .expect("published handle");
    assert!(published.same_instance(chart.handle().expect("live handle")));
    assert_eq!(published.query(|live| live.rasterize_png().is_ok()), Some(true));

    let region = chart.presenter().region(MARKET_ID).expect("region");
    assert_eq!(region.content, Some(RegionContent::Primary));
    assert!(!region.table_visible);
    assert!(region.png_export_enabled);

    let log = backend.log();
    assert_eq!(log.constructed, 1);
    assert_eq!(log.paints, 1);
}

#[test]
fn construction_failure_is_recovered_by_fallback() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::failing(NullFailure::Construct("canvas unsupported".into()));
    let chart = mount(&registry, Some(&backend), market_request());

    assert_eq!(chart.state(), RenderState::FallbackActive);
    match chart.fallback_reason() {
        Some(FallbackReason::ConstructionFailed(message)) => {
            assert!(message.contains("canvas unsupported"));
        }
        other => panic!("unexpected reason {other:?}"),
    }
    assert!(chart.presenter().publications().is_empty());
}

#[test]
fn paint_failure_destroys_the_instance_and_falls_back() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::failing(NullFailure::Paint("context lost".into()));
    let chart = mount(&registry, Some(&backend), market_request());

    assert_eq!(chart.state(), RenderState::FallbackActive);
    assert!(matches!(chart.fallback_reason(), Some(FallbackReason::PaintFailed(_))));
    let log = backend.log();
    assert_eq!(log.constructed, 1);
    assert_eq!(log.destroyed, 1);
    assert!(chart.presenter().publications().is_empty());
}

#[test]
fn missing_host_never_constructs_the_renderer() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::default();
    let chart = ResilientChart::mount(
        &registry,
        Some(&backend as &dyn ChartBackend),
        MemoryPresenter::default(),
        market_request(),
        OverlayConfig::default(),
    );

    assert_eq!(chart.state(), RenderState::FallbackActive);
    assert_eq!(chart.fallback_reason(), Some(&FallbackReason::HostMissing));
    assert_eq!(backend.log().constructed, 0);
}

#[test]
fn fallback_retries_primary_on_update() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::default();
    let mut chart = ResilientChart::mount(
        &registry,
        Some(&backend as &dyn ChartBackend),
        MemoryPresenter::default(),
        market_request(),
        OverlayConfig::default(),
    );
    assert_eq!(chart.state(), RenderState::FallbackActive);

    chart.presenter_mut().add_host(MARKET_ID);
    chart.update_series(
        SeriesData::Named(vec![NamedSeries::from_numbers("Market Size", &[2.0, 6.0])]),
        Some(vec!["2025".into(), "2026".into()]),
    );

    assert_eq!(chart.state(), RenderState::PrimaryActive);
    assert_eq!(chart.table().row_count(), 2);
    assert_eq!(chart.presenter().publications().len(), 1);
}

#[test]
fn updates_regenerate_table_and_repaint_live_chart() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::default();
    let mut chart = mount(&registry, Some(&backend), market_request());

    let series = SeriesData::Named(vec![NamedSeries::from_numbers("Market Size", &[9.0])]);
    chart.update_series(series.clone(), Some(vec!["2030".into()]));

    assert_eq!(chart.state(), RenderState::PrimaryActive);
    assert_eq!(chart.table().rows[0].category, "2030");
    let region = chart.presenter().region(MARKET_ID).expect("region");
    assert_eq!(region.table.as_ref(), Some(chart.table()));
    assert_eq!(region.table_controls_created, 1);

    let log = backend.log();
    assert_eq!(log.constructed, 1);
    assert_eq!(log.paints, 2);
    assert_eq!(log.last_series, Some(series));
    assert_eq!(chart.presenter().publications().len(), 2);
}

#[test]
fn update_failure_withdraws_the_handle() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::failing(NullFailure::Update("stale options".into()));
    let mut chart = mount(&registry, Some(&backend), market_request());
    assert_eq!(chart.state(), RenderState::PrimaryActive);

    chart.update_options(&StyleOptions::default().with_colors(&["#123456"]));

    assert_eq!(chart.state(), RenderState::FallbackActive);
    assert_eq!(chart.spec().style_options.colors, vec!["#123456".to_owned()]);
    assert!(chart.presenter().handle("chart:marketGrowth-chart").is_none());
    assert_eq!(backend.log().destroyed, 1);
}

#[test]
fn pass_through_operations_are_no_ops_in_fallback() {
    let registry = ChartRegistry::builtin();
    let mut fallback = mount(&registry, None, market_request());
    assert!(!fallback.toggle_series("Market Size"));
    assert!(!fallback.zoom(0.0, 1.0));
    assert!(matches!(fallback.export_png(), Err(ChartError::ExportUnavailable(_))));
    assert_eq!(fallback.state(), RenderState::FallbackActive);

    let backend = NullBackend::default();
    let mut live = mount(&registry, Some(&backend), market_request());
    assert!(live.toggle_series("Market Size"));
    assert!(live.zoom(1.0, 2.0));
    assert!(!live.zoom(2.0, 1.0));
    assert_eq!(live.state(), RenderState::PrimaryActive);

    let log = backend.log();
    assert_eq!(log.hidden_series, vec!["Market Size".to_owned()]);
    assert_eq!(log.zoom, Some((1.0, 2.0)));
}

#[test]
fn registry_defaults_fill_omitted_request_fields() {
    let registry = ChartRegistry::builtin();
    let request = ChartRequest::new("home-card").with_host(
        HostElement::with_id("home-card").with_classes(&["bar-chart"]),
    );
    let chart = mount(&registry, None, request);

    let entry = registry.lookup(ChartKind::Bar);
    assert_eq!(chart.spec().kind, ChartKind::Bar);
    assert_eq!(chart.spec().height, entry.height);
    assert_eq!(chart.series(), &entry.sample_series);
    assert_eq!(chart.categories(), entry.sample_categories.as_deref());
    assert!(chart.spec().style_options.annotation.is_some());
}

#[test]
fn explicit_kind_skips_resolution() {
    let registry = ChartRegistry::builtin();
    let chart = mount(&registry, None, market_request().with_kind(ChartKind::Gauge));
    assert_eq!(chart.spec().kind, ChartKind::Gauge);
    assert_eq!(chart.state(), RenderState::FallbackActive);
}

#[test]
fn failed_jobs_keep_previous_data() {
    let registry = ChartRegistry::builtin();
    let mut chart = mount(&registry, None, market_request());
    let before = chart.table().clone();

    let changed = chart.apply_computed(Err(ChartError::JobFailed("worker crashed".into())), "x");

    assert!(!changed);
    assert_eq!(chart.table(), &before);
}

#[test]
fn last_resolved_job_wins() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::default();
    let mut chart = mount(&registry, Some(&backend), market_request());
    let channel = ComputeChannel::inline();

    let earlier = channel.submit(ComputeJob::Smooth { values: vec![1.0, 2.0, 3.0] });
    let later = channel.submit(ComputeJob::Smooth { values: vec![7.0, 8.0, 9.0] });

    // The later submission resolves first; the earlier one lands last.
    assert!(chart.apply_computed(futures::executor::block_on(later), "Market Size"));
    assert!(chart.apply_computed(futures::executor::block_on(earlier), "Market Size"));

    assert_eq!(chart.table().rows[0].values, vec!["1".to_owned()]);
    assert_eq!(chart.table().rows[2].values, vec!["3".to_owned()]);
    assert_eq!(chart.state(), RenderState::PrimaryActive);
}

#[test]
fn unmount_releases_the_live_chart() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::default();
    let chart = mount(&registry, Some(&backend), market_request());

    let presenter = chart.unmount();

    assert!(presenter.region(MARKET_ID).is_none());
    assert!(presenter.handle("chart:marketGrowth-chart").is_none());
    assert_eq!(backend.log().destroyed, 1);
}
