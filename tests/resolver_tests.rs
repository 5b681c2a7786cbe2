use resilient_chart::core::{
    BUILTIN_ID_RULES, ChartKind, ChartRegistry, ChartTypeResolver, HostElement, NamedSeries,
    RegistryEntry, SeriesData,
};

fn strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| (*t).to_owned()).collect()
}

#[test]
fn host_class_suffix_wins_over_parent_and_id() {
    let registry = ChartRegistry::builtin();
    let resolver = ChartTypeResolver::new(&registry);

    let kind = resolver.resolve(
        &strings(&["card", "rangeArea-chart"]),
        &strings(&["bar-chart"]),
        Some("marketGrowth-chart"),
    );
    assert_eq!(kind, ChartKind::RangeArea);
}

#[test]
fn parent_classes_are_scanned_when_host_has_no_match() {
    let registry = ChartRegistry::builtin();
    let resolver = ChartTypeResolver::new(&registry);

    let kind = resolver.resolve(&strings(&["card"]), &strings(&["panel", "heatmap-chart"]), None);
    assert_eq!(kind, ChartKind::Heatmap);
}

#[test]
fn class_tokens_for_kinds_outside_the_registry_are_skipped() {
    let registry = ChartRegistry::builtin();
    let resolver = ChartTypeResolver::new(&registry);

    let kind = resolver.resolve(
        &strings(&["funnel-chart", "sparkline-chart"]),
        &strings(&["pie-chart"]),
        None,
    );
    assert_eq!(kind, ChartKind::Pie);
}

#[test]
fn id_substring_table_is_consulted_in_order() {
    let registry = ChartRegistry::builtin();
    let resolver = ChartTypeResolver::new(&registry);

    let cases = [
        ("marketGrowth-chart", ChartKind::Area),
        ("fundingAllocation-chart", ChartKind::Donut),
        ("home-revenueStreams", ChartKind::Pie),
        ("tokenPrice", ChartKind::Candlestick),
        ("teamComposition-2026", ChartKind::Polar),
    ];
    for (id, expected) in cases {
        assert_eq!(resolver.resolve(&[], &[], Some(id)), expected, "id {id}");
    }

    assert_eq!(BUILTIN_ID_RULES[0].0, "quantumMarketForecast");
    assert_eq!(BUILTIN_ID_RULES.len(), 16);
}

#[test]
fn unmatched_inputs_default_to_line() {
    let registry = ChartRegistry::builtin();
    let resolver = ChartTypeResolver::new(&registry);

    assert_eq!(resolver.resolve(&[], &[], None), ChartKind::Line);
    assert_eq!(
        resolver.resolve(&strings(&["chart"]), &strings(&["-chart"]), Some("unrelated")),
        ChartKind::Line
    );
}

#[test]
fn resolve_host_reads_the_element_description() {
    let registry = ChartRegistry::builtin();
    let resolver = ChartTypeResolver::new(&registry);

    let host = HostElement::with_id("competitiveLandscape").with_parent_classes(&["grid"]);
    assert_eq!(resolver.resolve_host(&host), ChartKind::Radar);
}

#[test]
fn custom_registry_limits_class_matches() {
    let line = RegistryEntry::new(
        "Trend",
        "",
        SeriesData::Named(vec![NamedSeries::from_numbers("Trend", &[1.0, 2.0])]),
    );
    let registry = ChartRegistry::from_entries([(ChartKind::Line, line)]).expect("line entry");
    let resolver = ChartTypeResolver::new(&registry);

    assert_eq!(
        resolver.resolve(&strings(&["area-chart"]), &[], None),
        ChartKind::Line
    );
    // The id table does not consult the registry.
    assert_eq!(resolver.resolve(&[], &[], Some("marketGrowth")), ChartKind::Area);
}

#[test]
fn custom_id_rules_replace_the_builtin_table() {
    let registry = ChartRegistry::builtin();
    let resolver =
        ChartTypeResolver::with_id_rules(&registry, [("burn".to_owned(), ChartKind::Bar)]);

    assert_eq!(resolver.resolve(&[], &[], Some("monthlyBurn")), ChartKind::Line);
    assert_eq!(resolver.resolve(&[], &[], Some("burnRate")), ChartKind::Bar);
    assert_eq!(resolver.resolve(&[], &[], Some("marketGrowth")), ChartKind::Line);
}
