use resilient_chart::api::{
    ChartRequest, ExportFormat, MemoryPresenter, OverlayConfig, ResilientChart, to_csv,
};
use resilient_chart::core::{ChartRegistry, DataTableModel, NamedSeries, SeriesData, SeriesValue};
use resilient_chart::render::{BLANK_PNG, ChartBackend, NullBackend};
use resilient_chart::ChartError;

const CHART_ID: &str = "revenueProjection-chart";

fn request() -> ChartRequest {
    ChartRequest::new(CHART_ID).with_series(
        SeriesData::Named(vec![
            NamedSeries::from_numbers("Revenue, $M", &[0.5, 2.4]),
            NamedSeries::new("Range", vec![SeriesValue::pair(1.0, 3.0), SeriesValue::Missing]),
        ]),
        Some(&["FY \"25\"", "FY26"]),
    )
}

#[test]
fn csv_quotes_fields_per_rfc_4180() {
    let table = DataTableModel::build(
        &SeriesData::Named(vec![NamedSeries::from_numbers("Market Size", &[1.5, 5.0, 20.0])]),
        Some(&["2025".to_owned(), "2026".to_owned(), "2027".to_owned()]),
    );
    assert_eq!(
        to_csv(&table),
        "Category,Market Size\r\n2025,1.5\r\n2026,5\r\n2027,20\r\n"
    );

    let registry = ChartRegistry::builtin();
    let chart = ResilientChart::mount(
        &registry,
        None,
        MemoryPresenter::with_hosts(&[CHART_ID]),
        request(),
        OverlayConfig::default(),
    );
    assert_eq!(
        to_csv(chart.table()),
        "Category,\"Revenue, $M\",Range\r\n\"FY \"\"25\"\"\",0.5,\"[1, 3]\"\r\nFY26,2.4,-\r\n"
    );
}

#[test]
fn csv_export_matches_the_table_on_screen() {
    let registry = ChartRegistry::builtin();
    for backend in [None, Some(NullBackend::default())] {
        let mut chart = ResilientChart::mount(
            &registry,
            backend.as_ref().map(|b| b as &dyn ChartBackend),
            MemoryPresenter::with_hosts(&[CHART_ID]),
            request(),
            OverlayConfig::default().with_export_file_stem("revenue"),
        );
        assert!(chart.export_csv());

        let region = chart.presenter().region(CHART_ID).expect("region");
        let shown = region.table.as_ref().expect("table shown");
        let artifact = region.exports.last().expect("delivered export");

        assert_eq!(artifact.format, ExportFormat::Csv);
        assert_eq!(artifact.mime(), "text/csv;charset=utf-8");
        assert!(artifact.file_name.starts_with("revenue-"));
        assert!(artifact.file_name.ends_with(".csv"));
        assert_eq!(artifact.bytes, to_csv(shown).into_bytes());
    }
}

#[test]
fn png_export_requires_the_live_chart() {
    let registry = ChartRegistry::builtin();

    let mut fallback = ResilientChart::mount(
        &registry,
        None,
        MemoryPresenter::with_hosts(&[CHART_ID]),
        request(),
        OverlayConfig::default(),
    );
    assert!(matches!(fallback.export_png(), Err(ChartError::ExportUnavailable(_))));
    let region = fallback.presenter().region(CHART_ID).expect("region");
    assert!(region.exports.is_empty());
    assert!(!region.png_export_enabled);

    let backend = NullBackend::default();
    let mut live = ResilientChart::mount(
        &registry,
        Some(&backend as &dyn ChartBackend),
        MemoryPresenter::with_hosts(&[CHART_ID]),
        request(),
        OverlayConfig::default(),
    );
    live.export_png().expect("png delivered");
    let artifact = live
        .presenter()
        .region(CHART_ID)
        .and_then(|region| region.exports.last())
        .expect("png delivered");
    assert_eq!(artifact.format, ExportFormat::Png);
    assert_eq!(artifact.bytes, BLANK_PNG.to_vec());
    assert!(artifact.file_name.starts_with("revenueProjection-chart-"));
}
