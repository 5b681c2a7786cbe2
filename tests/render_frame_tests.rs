use resilient_chart::ChartError;
use resilient_chart::render::{
    CirclePrimitive, Color, LinePrimitive, PathCommand, PathPrimitive, RectPrimitive,
    RenderFrame, Renderer, Shape, SvgRenderer, TextHAlign, TextPrimitive, Viewport,
};

fn sample_frame() -> RenderFrame {
    let mut frame = RenderFrame::new(Viewport::new(320, 200), "Revenue")
        .with_description("Static bar chart preview");
    frame.push_line(
        LinePrimitive::new(10.0, 100.0, 310.0, 100.0, 1.5, Color::rgb(1.0, 0.27, 0.38)).dashed(4.0),
    );
    frame.push_path(
        PathPrimitive::new(vec![
            PathCommand::MoveTo(10.0, 150.0),
            PathCommand::LineTo(160.0, 60.0),
            PathCommand::LineTo(310.0, 120.0),
        ])
        .stroked(Color::rgb(0.0, 0.56, 0.98), 2.0),
    );
    frame.push_text(TextPrimitive::new(
        "Q1 & Q2",
        10.0,
        20.0,
        12.0,
        Color::rgb(0.1, 0.1, 0.1),
        TextHAlign::Left,
    ));
    frame
}

#[test]
fn svg_renderer_counts_and_escapes_primitives() {
    let mut renderer = SvgRenderer::new("revenue chart");
    renderer.render(&sample_frame()).expect("valid frame");

    let stats = renderer.last_stats();
    assert_eq!(stats.lines_drawn, 1);
    assert_eq!(stats.paths_drawn, 1);
    assert_eq!(stats.texts_drawn, 1);

    let markup = renderer.markup();
    assert!(markup.contains(r#"id="revenue-chart-title""#));
    assert!(markup.contains("<desc id=\"revenue-chart-desc\">Static bar chart preview</desc>"));
    assert!(markup.contains("Q1 &amp; Q2"));
    assert!(markup.contains(r#"stroke-dasharray="4 4""#));
}

#[test]
fn shapes_paint_in_push_order_below_texts() {
    let mut frame = RenderFrame::new(Viewport::new(200, 200), "Order");
    frame.push_text(TextPrimitive::new(
        "label",
        10.0,
        10.0,
        12.0,
        Color::rgb(0.0, 0.0, 0.0),
        TextHAlign::Left,
    ));
    frame.push_circle(CirclePrimitive::new(100.0, 100.0, 80.0, Color::rgb(0.9, 0.9, 0.9)));
    frame.push_rect(RectPrimitive::new(20.0, 20.0, 40.0, 40.0, Color::rgb(0.0, 0.56, 0.98)));
    frame.push_line(LinePrimitive::new(0.0, 0.0, 200.0, 200.0, 1.0, Color::rgb(0.5, 0.5, 0.5)));

    assert!(matches!(
        frame.shapes.as_slice(),
        [Shape::Circle(_), Shape::Rect(_), Shape::Line(_)]
    ));

    let mut renderer = SvgRenderer::new("order");
    renderer.render(&frame).expect("valid frame");
    let markup = renderer.markup();
    let circle = markup.find("<circle").expect("circle");
    let rect = markup.find("<rect").expect("rect");
    let line = markup.find("<line").expect("line");
    let text = markup.find("<text").expect("text");
    assert!(circle < rect && rect < line && line < text);
}

#[test]
fn invalid_frames_are_rejected_before_serialization() {
    let mut renderer = SvgRenderer::new("bad");

    let untitled = RenderFrame::new(Viewport::new(320, 200), "  ");
    assert!(matches!(renderer.render(&untitled), Err(ChartError::InvalidData(_))));

    let mut non_finite = sample_frame();
    non_finite.push_line(LinePrimitive::new(
        f64::NAN,
        0.0,
        1.0,
        1.0,
        1.0,
        Color::rgb(0.0, 0.0, 0.0),
    ));
    assert!(renderer.render(&non_finite).is_err());
    assert!(renderer.markup().is_empty());

    let zero = RenderFrame::new(Viewport::new(0, 200), "Empty");
    assert!(renderer.render(&zero).is_err());
}

#[test]
fn hex_colors_parse_short_and_long_forms() {
    let short = Color::from_hex("#fff").expect("short form");
    let long = Color::from_hex("#008ffb").expect("long form");
    assert_eq!(short.to_svg_rgb(), "#ffffff");
    assert_eq!(long.to_svg_rgb(), "#008ffb");
    assert!(Color::from_hex("008ffb").is_none());
    assert!(Color::from_hex("#12345").is_none());
}
