use resilient_chart::core::{Annotation, ChartKind, ChartRegistry, ChartSpec, StyleOptions};
use resilient_chart::render::{
    DATA_TABLE_NOTE, FallbackGenerator, PLACEHOLDER_MESSAGE, Renderer, SvgRenderer,
};

#[test]
fn every_kind_yields_a_labelled_static_graphic() {
    let registry = ChartRegistry::builtin();
    let generator = FallbackGenerator::new(&registry);

    for kind in ChartKind::ALL {
        let svg = generator.generate(kind);
        assert!(svg.starts_with("<svg"), "{kind}: {svg}");
        assert!(svg.ends_with("</svg>"), "{kind}");
        assert!(svg.contains(r#"role="img""#), "{kind}");
        assert!(svg.contains("<title"), "{kind}");
        assert!(svg.contains(DATA_TABLE_NOTE), "{kind}");
        assert!(!svg.contains("<script"), "{kind}");
    }
}

#[test]
fn area_graphic_carries_title_and_subtitle() {
    let registry = ChartRegistry::builtin();
    let generator = FallbackGenerator::new(&registry);
    let entry = registry.lookup(ChartKind::Area);

    let svg = generator.generate(ChartKind::Area);

    assert!(svg.contains("Market Growth Projection"));
    assert!(!entry.subtitle().is_empty());
    assert!(svg.contains(entry.subtitle()));
}

#[test]
fn kinds_without_templates_use_the_placeholder() {
    let registry = ChartRegistry::builtin();
    let generator = FallbackGenerator::new(&registry);

    for kind in [ChartKind::Funnel, ChartKind::Gauge] {
        assert!(generator.generate(kind).contains(PLACEHOLDER_MESSAGE));
    }
    let unknown = generator.generate_named("sparkline");
    assert!(unknown.contains(PLACEHOLDER_MESSAGE));
    assert!(unknown.contains(DATA_TABLE_NOTE));
}

#[test]
fn value_axis_graphics_include_the_milestone_label() {
    let registry = ChartRegistry::builtin();
    let generator = FallbackGenerator::new(&registry);

    for kind in [ChartKind::Area, ChartKind::Line, ChartKind::Bar] {
        let annotation = registry
            .lookup(kind)
            .style
            .annotation
            .clone()
            .expect("catalog entries are annotated");
        assert!(generator.generate(kind).contains(&annotation.label), "{kind}");
    }
}

#[test]
fn instance_graphics_honor_overrides_and_escape_text() {
    let registry = ChartRegistry::builtin();
    let generator = FallbackGenerator::new(&registry);
    let style = StyleOptions {
        title: Some("R&D <Spend>".into()),
        ..registry.lookup(ChartKind::Bar).style.clone()
    }
    .with_annotation(Annotation::new(3.0, "Break-even"));
    let spec = ChartSpec::new("burn-chart", ChartKind::Bar, 300, style);

    let svg = generator.generate_for(&spec);

    assert!(svg.contains("R&amp;D &lt;Spend&gt;"));
    assert!(!svg.contains("R&D <Spend>"));
    assert!(svg.contains("Break-even"));
    assert!(svg.contains(r#"id="burn-chart-fallback-title""#));
}

#[test]
fn built_frames_validate_and_respect_minimum_height() {
    let registry = ChartRegistry::builtin();
    let generator = FallbackGenerator::new(&registry);

    for kind in ChartKind::ALL {
        let style = registry.lookup(kind).style.clone();
        let frame = generator.build_frame(kind, &style, 10);
        assert!(frame.validate().is_ok(), "{kind}");
        assert!(frame.viewport.height >= 220);

        let mut renderer = SvgRenderer::new("check");
        renderer.render(&frame).expect("valid frame renders");
        assert!(renderer.last_stats().texts_drawn >= 2, "{kind}");
    }
}

#[test]
fn backdrops_and_gridlines_sit_beneath_the_data() {
    let registry = ChartRegistry::builtin();
    let generator = FallbackGenerator::new(&registry);

    let polar = generator.generate(ChartKind::Polar);
    let disc = polar.find("<circle").expect("polar backdrop");
    let first_wedge = polar.find("<path").expect("polar wedges");
    assert!(disc < first_wedge, "{polar}");

    let bar = generator.generate(ChartKind::Bar);
    let first_gridline = bar.find("<line").expect("value gridlines");
    let last_bar = bar.rfind("<rect").expect("bars");
    assert!(first_gridline < last_bar, "{bar}");
}
