use resilient_chart::api::{
    ChartRequest, ExportFormat, MemoryPresenter, OverlayConfig, ResilientChart,
};
use resilient_chart::core::{ChartRegistry, NamedSeries, SeriesData};
use resilient_chart::interaction::{Key, KeyAction, KeyInput, ShortcutConfig};
use resilient_chart::render::{ChartBackend, NullBackend};

const CHART_ID: &str = "userGrowth-chart";

fn request() -> ChartRequest {
    ChartRequest::new(CHART_ID).with_series(
        SeriesData::Named(vec![
            NamedSeries::from_numbers("Users", &[120.0, 340.0, 910.0]),
            NamedSeries::from_numbers("Paying", &[12.0, 51.0]),
        ]),
        Some(&["Q1", "Q2", "Q3"]),
    )
}

#[test]
fn arrows_move_focus_and_enter_announces_the_row() {
    let registry = ChartRegistry::builtin();
    let mut chart = ResilientChart::mount(
        &registry,
        None,
        MemoryPresenter::with_hosts(&[CHART_ID]),
        request(),
        OverlayConfig::default(),
    );

    assert_eq!(chart.handle_key(KeyInput::plain(Key::ArrowRight)), KeyAction::FocusMoved(0));
    assert_eq!(chart.handle_key(KeyInput::plain(Key::ArrowRight)), KeyAction::FocusMoved(1));
    assert_eq!(chart.handle_key(KeyInput::plain(Key::Enter)), KeyAction::Announce(1));
    assert_eq!(chart.handle_key(KeyInput::plain(Key::End)), KeyAction::FocusMoved(2));
    assert_eq!(chart.handle_key(KeyInput::plain(Key::Space)), KeyAction::Announce(2));
    assert_eq!(chart.handle_key(KeyInput::plain(Key::Home)), KeyAction::FocusMoved(0));

    let region = chart.presenter().region(CHART_ID).expect("region");
    assert_eq!(
        region.announcements,
        vec!["Q2: Users 340, Paying 51".to_owned(), "Q3: Users 910, Paying -".to_owned()]
    );
}

#[test]
fn focus_is_clamped_when_the_table_shrinks() {
    let registry = ChartRegistry::builtin();
    let mut chart = ResilientChart::mount(
        &registry,
        None,
        MemoryPresenter::with_hosts(&[CHART_ID]),
        request(),
        OverlayConfig::default(),
    );
    chart.handle_key(KeyInput::plain(Key::End));

    chart.update_series(
        SeriesData::Named(vec![NamedSeries::from_numbers("Users", &[1.0])]),
        Some(vec!["Q1".into()]),
    );

    assert_eq!(chart.focused_point(), Some(0));
}

#[test]
fn table_shortcut_toggles_only_while_live() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::default();
    let mut live = ResilientChart::mount(
        &registry,
        Some(&backend as &dyn ChartBackend),
        MemoryPresenter::with_hosts(&[CHART_ID]),
        request(),
        OverlayConfig::default(),
    );
    assert!(!live.is_table_visible());
    assert_eq!(live.handle_key(KeyInput::alt('T')), KeyAction::ToggleTable);
    assert!(live.is_table_visible());
    assert!(live.presenter().region(CHART_ID).expect("region").table_visible);
    live.handle_key(KeyInput::alt('t'));
    assert!(!live.is_table_visible());

    let mut fallback = ResilientChart::mount(
        &registry,
        None,
        MemoryPresenter::with_hosts(&[CHART_ID]),
        request(),
        OverlayConfig::default(),
    );
    fallback.handle_key(KeyInput::alt('t'));
    assert!(fallback.is_table_visible());
}

#[test]
fn export_shortcuts_follow_the_overlay_config() {
    let registry = ChartRegistry::builtin();
    let backend = NullBackend::default();
    let shortcuts = ShortcutConfig {
        toggle_table: 'd',
        export_png: 'i',
        export_csv: 'x',
    };
    let mut chart = ResilientChart::mount(
        &registry,
        Some(&backend as &dyn ChartBackend),
        MemoryPresenter::with_hosts(&[CHART_ID]),
        request(),
        OverlayConfig::default().with_shortcuts(shortcuts),
    );

    assert_eq!(chart.handle_key(KeyInput::alt('c')), KeyAction::Ignored);
    assert_eq!(chart.handle_key(KeyInput::alt('x')), KeyAction::ExportCsv);
    assert_eq!(chart.handle_key(KeyInput::alt('i')), KeyAction::ExportPng);

    let formats: Vec<ExportFormat> = chart
        .presenter()
        .region(CHART_ID)
        .expect("region")
        .exports
        .iter()
        .map(|artifact| artifact.format)
        .collect();
    assert_eq!(formats, vec![ExportFormat::Csv, ExportFormat::Png]);
}

#[test]
fn keys_without_data_are_ignored() {
    let registry = ChartRegistry::builtin();
    let mut chart = ResilientChart::mount(
        &registry,
        None,
        MemoryPresenter::with_hosts(&[CHART_ID]),
        ChartRequest::new(CHART_ID).with_series(SeriesData::Named(Vec::new()), None),
        OverlayConfig::default(),
    );

    assert_eq!(chart.handle_key(KeyInput::plain(Key::ArrowRight)), KeyAction::Ignored);
    assert_eq!(chart.handle_key(KeyInput::plain(Key::Enter)), KeyAction::Ignored);
    assert!(chart.presenter().region(CHART_ID).expect("region").announcements.is_empty());
}
