//! Static SVG stand-ins for charts the primary renderer could not draw.
//!
//! Every graphic carries the chart title, a simplified drawing of the sample
//! data shape, the milestone marker on value-axis charts and a note pointing
//! at the data table. Generation is total: a frame that fails validation is
//! replaced by the generic placeholder, and the placeholder by a constant.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use tracing::warn;

use crate::core::{ChartKind, ChartRegistry, ChartSpec, SeriesData, SeriesValue, StrokeCurve};
use crate::core::{RegistryEntry, StyleOptions};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PathCommand, PathPrimitive, RectPrimitive, RenderFrame,
    Renderer, SvgRenderer, TextHAlign, TextPrimitive, Viewport,
};

pub const FALLBACK_WIDTH: u32 = 640;
pub const MIN_FALLBACK_HEIGHT: u32 = 220;
pub const DATA_TABLE_NOTE: &str =
    "Static preview. The complete values are listed in the data table below.";
pub const PLACEHOLDER_MESSAGE: &str = "A preview is not available for this chart type.";

const MINIMAL_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="220" role="img" aria-label="Chart preview"><text x="20" y="110">Static preview. The complete values are listed in the data table below.</text></svg>"#;

const TITLE_COLOR: Color = Color::rgb(0.13, 0.15, 0.2);
const MUTED_COLOR: Color = Color::rgb(0.42, 0.45, 0.5);
const GRID_COLOR: Color = Color::rgb(0.88, 0.89, 0.91);
const BACKGROUND_COLOR: Color = Color::rgb(1.0, 1.0, 1.0);
const FALLBACK_SERIES_COLOR: Color = Color::rgb(0.0, 0.56, 0.98);
const CANDLE_UP_COLOR: Color = Color::rgb(0.0, 0.72, 0.27);
const CANDLE_DOWN_COLOR: Color = Color::rgb(0.94, 0.25, 0.24);

const PLOT_LEFT: f64 = 56.0;
const PLOT_TOP: f64 = 72.0;
const PLOT_RIGHT_MARGIN: f64 = 24.0;
const PLOT_BOTTOM_MARGIN: f64 = 58.0;
const LABEL_COLUMN: f64 = 96.0;

/// Builds fallback graphics from the catalog's sample data.
#[derive(Debug, Clone, Copy)]
pub struct FallbackGenerator<'a> {
    registry: &'a ChartRegistry,
}

impl<'a> FallbackGenerator<'a> {
    #[must_use]
    pub fn new(registry: &'a ChartRegistry) -> Self {
        Self { registry }
    }

    /// Fallback graphic for `kind` with catalog defaults.
    #[must_use]
    pub fn generate(&self, kind: ChartKind) -> String {
        let entry = self.registry.lookup(kind);
        self.render_or_placeholder(
            &format!("fallback-{}", kind.name()),
            kind,
            &entry.style,
            entry.height,
        )
    }

    /// Fallback graphic for a concrete chart instance, honoring its style.
    #[must_use]
    pub fn generate_for(&self, spec: &ChartSpec) -> String {
        self.render_or_placeholder(
            &format!("{}-fallback", spec.id),
            spec.kind,
            &spec.style_options,
            spec.height,
        )
    }

    /// Accepts a raw kind name; unknown names get the generic placeholder.
    #[must_use]
    pub fn generate_named(&self, raw_kind: &str) -> String {
        match ChartKind::from_name(raw_kind) {
            Some(kind) => self.generate(kind),
            None => render_placeholder("fallback-unknown", "Chart", MIN_FALLBACK_HEIGHT),
        }
    }

    /// Scene for `kind` before serialization.
    #[must_use]
    pub fn build_frame(&self, kind: ChartKind, style: &StyleOptions, height: u32) -> RenderFrame {
        let entry = self.registry.lookup(kind);
        let title = display_title(style, entry);
        let viewport = Viewport::new(FALLBACK_WIDTH, height.max(MIN_FALLBACK_HEIGHT));
        let subtitle = style
            .subtitle
            .as_deref()
            .unwrap_or_else(|| entry.subtitle());

        let description = format!(
            "Static {} chart preview of {title}. Values are listed in the accompanying data table.",
            kind.name()
        );
        let mut scene = Scene::new(viewport, title, subtitle, description, style);
        let series = &entry.sample_series;
        let categories = entry.sample_categories.as_deref().unwrap_or(&[]);

        match kind {
            ChartKind::Area => scene.draw_curves(series, categories, true),
            ChartKind::Line => scene.draw_curves(series, categories, false),
            ChartKind::RangeArea => scene.draw_range_band(series, categories),
            ChartKind::Bar => scene.draw_bars(series, categories),
            ChartKind::Mixed => scene.draw_mixed(series, categories),
            ChartKind::Candlestick => scene.draw_candles(series, categories),
            ChartKind::BoxPlot => scene.draw_boxes(series, categories),
            ChartKind::Scatter => scene.draw_scatter(series),
            ChartKind::Heatmap => scene.draw_heatmap(series, categories),
            ChartKind::Timeline => scene.draw_timeline(series),
            ChartKind::Treemap => scene.draw_treemap(series, categories),
            ChartKind::Pie => scene.draw_wedges(series, categories, WedgeStyle::Pie),
            ChartKind::Donut => scene.draw_wedges(series, categories, WedgeStyle::Donut),
            ChartKind::Polar => scene.draw_wedges(series, categories, WedgeStyle::Polar),
            ChartKind::Radar => scene.draw_radar(series, categories),
            ChartKind::Funnel | ChartKind::Gauge => scene.draw_placeholder_body(),
        }

        scene.finish()
    }

    fn render_or_placeholder(
        &self,
        id_prefix: &str,
        kind: ChartKind,
        style: &StyleOptions,
        height: u32,
    ) -> String {
        let frame = self.build_frame(kind, style, height);
        let mut renderer = SvgRenderer::new(id_prefix);
        match renderer.render(&frame) {
            Ok(()) => renderer.into_markup(),
            Err(err) => {
                warn!(kind = %kind, error = %err, "fallback frame rejected, using placeholder");
                render_placeholder(id_prefix, &frame.title, height)
            }
        }
    }
}

fn display_title(style: &StyleOptions, entry: &RegistryEntry) -> String {
    [style.title.as_deref(), Some(entry.title())]
        .into_iter()
        .flatten()
        .find(|title| !title.trim().is_empty())
        .unwrap_or("Chart")
        .to_owned()
}

fn render_placeholder(id_prefix: &str, title: &str, height: u32) -> String {
    let viewport = Viewport::new(FALLBACK_WIDTH, height.max(MIN_FALLBACK_HEIGHT));
    let title = if title.trim().is_empty() { "Chart" } else { title };
    let style = StyleOptions::default();
    let description =
        format!("Static chart preview of {title}. Values are listed in the accompanying data table.");
    let mut scene = Scene::new(viewport, title.to_owned(), "", description, &style);
    scene.draw_placeholder_body();
    let frame = scene.finish();

    let mut renderer = SvgRenderer::new(id_prefix);
    match renderer.render(&frame) {
        Ok(()) => renderer.into_markup(),
        Err(_) => MINIMAL_SVG.to_owned(),
    }
}

#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn right(self) -> f64 {
        self.left + self.width
    }

    fn bottom(self) -> f64 {
        self.top + self.height
    }

    fn center(self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    fn slot_width(self, count: usize) -> f64 {
        self.width / count.max(1) as f64
    }

    fn slot_center(self, index: usize, count: usize) -> f64 {
        self.left + self.slot_width(count) * (index as f64 + 0.5)
    }

    fn inset_left(self, amount: f64) -> Self {
        Self {
            left: self.left + amount,
            width: (self.width - amount).max(1.0),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if !min.is_finite() || !max.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }
        Self { min, max }.widened()
    }

    fn including(self, value: f64) -> Self {
        if !value.is_finite() {
            return self;
        }
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
        .widened()
    }

    fn widened(self) -> Self {
        if (self.max - self.min).abs() < 1e-9 {
            Self {
                min: self.min - 1.0,
                max: self.max + 1.0,
            }
        } else {
            self
        }
    }

    fn fraction(self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Pixel y for `value`; larger values sit higher.
    fn project_y(self, value: f64, plot: PlotArea) -> f64 {
        plot.bottom() - plot.height * self.fraction(value)
    }

    fn project_x(self, value: f64, plot: PlotArea) -> f64 {
        plot.left + plot.width * self.fraction(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WedgeStyle {
    Pie,
    Donut,
    Polar,
}

/// Series flattened to `(name, values)` rows for cartesian drawing.
fn value_rows(series: &SeriesData) -> Vec<(String, Vec<SeriesValue>)> {
    match series {
        SeriesData::Flat(values) => vec![("Value".to_owned(), values.clone())],
        SeriesData::Named(series) => series
            .iter()
            .enumerate()
            .map(|(index, s)| {
                let name = s
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Series {}", index + 1));
                (name, s.data.clone())
            })
            .collect(),
        SeriesData::Nested(series) => series
            .iter()
            .enumerate()
            .map(|(index, s)| {
                let name = s
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Series {}", index + 1));
                (name, s.data.iter().map(|point| point.y.clone()).collect())
            })
            .collect(),
    }
}

/// Labeled scalar items for part-of-whole charts.
fn labeled_items(series: &SeriesData, categories: &[String]) -> Vec<(String, f64)> {
    let label_at = |index: usize| {
        categories
            .get(index)
            .filter(|label| !label.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| format!("Item {}", index + 1))
    };
    let items: Vec<(String, f64)> = match series {
        SeriesData::Flat(values) => values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| value.primary().map(|v| (label_at(index), v)))
            .collect(),
        SeriesData::Named(series) => series
            .first()
            .map(|s| {
                s.data
                    .iter()
                    .enumerate()
                    .filter_map(|(index, value)| value.primary().map(|v| (label_at(index), v)))
                    .collect()
            })
            .unwrap_or_default(),
        SeriesData::Nested(series) => series
            .iter()
            .flat_map(|s| s.data.iter())
            .enumerate()
            .filter_map(|(index, point)| {
                let label = if point.x.trim().is_empty() {
                    label_at(index)
                } else {
                    point.x.clone()
                };
                point.y.primary().map(|v| (label, v))
            })
            .collect(),
    };
    items.into_iter().filter(|(_, value)| *value > 0.0).collect()
}

fn curve_commands(points: &[(f64, f64)], curve: StrokeCurve) -> Vec<PathCommand> {
    let mut commands = Vec::with_capacity(points.len() * 2);
    let Some(&(x0, y0)) = points.first() else {
        return commands;
    };
    commands.push(PathCommand::MoveTo(x0, y0));
    for pair in points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        match curve {
            StrokeCurve::Smooth => {
                let half = (to.0 - from.0) / 2.0;
                commands.push(PathCommand::CubicTo {
                    c1: (from.0 + half, from.1),
                    c2: (to.0 - half, to.1),
                    to,
                });
            }
            StrokeCurve::Straight => commands.push(PathCommand::LineTo(to.0, to.1)),
            StrokeCurve::Stepline => {
                commands.push(PathCommand::LineTo(to.0, from.1));
                commands.push(PathCommand::LineTo(to.0, to.1));
            }
        }
    }
    commands
}

fn polar_point(center: (f64, f64), radius: f64, angle: f64) -> (f64, f64) {
    (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
}

fn short_number(value: f64) -> String {
    let mut text = format!("{value:.1}");
    if text.ends_with(".0") {
        text.truncate(text.len() - 2);
    }
    if text == "-0" { "0".to_owned() } else { text }
}

struct Scene<'s> {
    frame: RenderFrame,
    plot: PlotArea,
    style: &'s StyleOptions,
}

impl<'s> Scene<'s> {
    fn new(
        viewport: Viewport,
        title: String,
        subtitle: &str,
        description: String,
        style: &'s StyleOptions,
    ) -> Self {
        let width = f64::from(viewport.width);
        let height = f64::from(viewport.height);
        let mut frame = RenderFrame::new(viewport, title.clone()).with_description(description);

        frame.push_rect(
            RectPrimitive::new(0.5, 0.5, width - 1.0, height - 1.0, BACKGROUND_COLOR)
                .with_border(1.0, GRID_COLOR)
                .with_corner_radius(6.0),
        );
        frame.push_text(
            TextPrimitive::new(title, 20.0, 30.0, 16.0, TITLE_COLOR, TextHAlign::Left).bold(),
        );
        if !subtitle.trim().is_empty() {
            frame.push_text(TextPrimitive::new(
                subtitle,
                20.0,
                50.0,
                12.0,
                MUTED_COLOR,
                TextHAlign::Left,
            ));
        }
        frame.push_text(TextPrimitive::new(
            DATA_TABLE_NOTE,
            width / 2.0,
            height - 12.0,
            11.0,
            MUTED_COLOR,
            TextHAlign::Center,
        ));

        let plot = PlotArea {
            left: PLOT_LEFT,
            top: PLOT_TOP,
            width: (width - PLOT_LEFT - PLOT_RIGHT_MARGIN).max(1.0),
            height: (height - PLOT_TOP - PLOT_BOTTOM_MARGIN).max(1.0),
        };

        Self { frame, plot, style }
    }

    fn finish(self) -> RenderFrame {
        self.frame
    }

    fn color(&self, index: usize) -> Color {
        Color::from_hex(self.style.color_at(index)).unwrap_or(FALLBACK_SERIES_COLOR)
    }

    fn label(&mut self, text: &str, x: f64, y: f64, size: f64, align: TextHAlign) {
        if text.trim().is_empty() {
            return;
        }
        self.frame
            .push_text(TextPrimitive::new(text, x, y, size, MUTED_COLOR, align));
    }

    fn annotation_value(&self) -> Option<f64> {
        self.style
            .annotation
            .as_ref()
            .map(|annotation| annotation.y)
            .filter(|y| y.is_finite())
    }

    fn draw_placeholder_body(&mut self) {
        let plot = self.plot;
        self.frame.push_rect(
            RectPrimitive::new(plot.left, plot.top, plot.width, plot.height, BACKGROUND_COLOR)
                .with_border(1.0, GRID_COLOR)
                .with_corner_radius(4.0),
        );
        let (cx, cy) = plot.center();
        self.label(PLACEHOLDER_MESSAGE, cx, cy, 13.0, TextHAlign::Center);
    }

    /// Gridlines, min/max value labels and category labels.
    fn draw_value_axes(&mut self, range: ValueRange, categories: &[String], count: usize) {
        let plot = self.plot;
        for step in 0..=4 {
            let y = plot.top + plot.height * f64::from(step) / 4.0;
            self.frame
                .push_line(LinePrimitive::new(plot.left, y, plot.right(), y, 1.0, GRID_COLOR));
        }
        self.label(&short_number(range.max), plot.left - 8.0, plot.top + 4.0, 10.0, TextHAlign::Right);
        self.label(
            &short_number(range.min),
            plot.left - 8.0,
            plot.bottom() + 4.0,
            10.0,
            TextHAlign::Right,
        );

        let stride = count.div_ceil(12).max(1);
        for (index, category) in categories.iter().enumerate().take(count) {
            if index % stride != 0 {
                continue;
            }
            let x = plot.slot_center(index, count);
            self.label(category, x, plot.bottom() + 18.0, 10.0, TextHAlign::Center);
        }
    }

    /// Dashed milestone line across value-axis charts.
    fn draw_annotation(&mut self, range: ValueRange) {
        let Some(annotation) = self.style.annotation.clone() else {
            return;
        };
        if !annotation.y.is_finite() {
            return;
        }
        let plot = self.plot;
        let y = range.project_y(annotation.y, plot);
        let color = Color::from_hex(&annotation.color).unwrap_or(CANDLE_DOWN_COLOR);
        self.frame.push_line(
            LinePrimitive::new(plot.left, y, plot.right(), y, 1.5, color).dashed(4.0),
        );
        if !annotation.label.trim().is_empty() {
            self.frame.push_text(TextPrimitive::new(
                annotation.label,
                plot.right() - 4.0,
                y - 6.0,
                10.0,
                color,
                TextHAlign::Right,
            ));
        }
    }

    fn value_range(&self, rows: &[(String, Vec<SeriesValue>)], include_zero: bool) -> ValueRange {
        let values = rows
            .iter()
            .flat_map(|(_, data)| data.iter().filter_map(SeriesValue::bounds))
            .flat_map(|(low, high)| [low, high]);
        let mut range = ValueRange::from_values(values);
        if include_zero {
            range = range.including(0.0);
        }
        if let Some(y) = self.annotation_value() {
            range = range.including(y);
        }
        range
    }

    fn curve_points(
        &self,
        data: &[SeriesValue],
        range: ValueRange,
        count: usize,
        pick: impl Fn(&SeriesValue) -> Option<f64>,
    ) -> Vec<(f64, f64)> {
        data.iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let v = pick(value)?;
                Some((self.plot.slot_center(index, count), range.project_y(v, self.plot)))
            })
            .collect()
    }

    fn draw_series_curve(&mut self, index: usize, points: &[(f64, f64)], fill_to: Option<f64>) {
        let color = self.color(index);
        if points.len() >= 2 {
            let commands = curve_commands(points, self.style.curve);
            if let Some(baseline) = fill_to {
                let mut area = commands.clone();
                let (first_x, last_x) = (points[0].0, points[points.len() - 1].0);
                area.push(PathCommand::LineTo(last_x, baseline));
                area.push(PathCommand::LineTo(first_x, baseline));
                area.push(PathCommand::Close);
                self.frame
                    .push_path(PathPrimitive::new(area).filled(color.with_alpha(0.25)));
            }
            self.frame
                .push_path(PathPrimitive::new(commands).stroked(color, 2.5));
        }
        for &(x, y) in points {
            self.frame.push_circle(CirclePrimitive::new(x, y, 3.5, color));
        }
    }

    fn draw_curves(&mut self, series: &SeriesData, categories: &[String], filled: bool) {
        let rows = value_rows(series);
        let count = categories.len().max(series.max_len());
        let range = self.value_range(&rows, filled);
        self.draw_value_axes(range, categories, count);

        let baseline = filled.then(|| range.project_y(range.min.max(0.0), self.plot));
        for (index, (_, data)) in rows.iter().enumerate() {
            let points = self.curve_points(data, range, count, SeriesValue::primary);
            self.draw_series_curve(index, &points, baseline);
        }
        self.draw_annotation(range);
    }

    fn draw_range_band(&mut self, series: &SeriesData, categories: &[String]) {
        let rows = value_rows(series);
        let count = categories.len().max(series.max_len());
        let range = self.value_range(&rows, false);
        self.draw_value_axes(range, categories, count);

        for (index, (_, data)) in rows.iter().enumerate() {
            let color = self.color(index);
            let upper = self.curve_points(data, range, count, |v| v.bounds().map(|b| b.1));
            let lower = self.curve_points(data, range, count, |v| v.bounds().map(|b| b.0));
            if upper.len() < 2 || lower.len() < 2 {
                continue;
            }

            let mut band = curve_commands(&upper, self.style.curve);
            let reversed: Vec<(f64, f64)> = lower.iter().rev().copied().collect();
            for command in curve_commands(&reversed, self.style.curve) {
                band.push(match command {
                    PathCommand::MoveTo(x, y) => PathCommand::LineTo(x, y),
                    other => other,
                });
            }
            band.push(PathCommand::Close);
            self.frame
                .push_path(PathPrimitive::new(band).filled(color.with_alpha(0.3)));
            for edge in [&upper, &lower] {
                self.frame.push_path(
                    PathPrimitive::new(curve_commands(edge, self.style.curve)).stroked(color, 2.0),
                );
            }
        }
        self.draw_annotation(range);
    }

    fn push_bars(&mut self, rows: &[(String, Vec<SeriesValue>)], range: ValueRange, count: usize) {
        let plot = self.plot;
        let group_width = plot.slot_width(count) * 0.7;
        let bar_width = group_width / rows.len().max(1) as f64;
        let zero_y = range.project_y(0.0_f64.clamp(range.min, range.max), plot);

        for (series_index, (_, data)) in rows.iter().enumerate() {
            let color = self.color(series_index);
            for (index, value) in data.iter().enumerate().take(count) {
                let Some(v) = value.primary() else {
                    continue;
                };
                let x = plot.slot_center(index, count) - group_width / 2.0
                    + bar_width * series_index as f64;
                let y = range.project_y(v, plot);
                let (top, bottom) = if y <= zero_y { (y, zero_y) } else { (zero_y, y) };
                self.frame.push_rect(
                    RectPrimitive::new(x + 1.0, top, (bar_width - 2.0).max(1.0), bottom - top, color)
                        .with_corner_radius(2.0),
                );
            }
        }
    }

    fn draw_bars(&mut self, series: &SeriesData, categories: &[String]) {
        let rows = value_rows(series);
        let count = categories.len().max(series.max_len());
        let range = self.value_range(&rows, true);
        self.draw_value_axes(range, categories, count);
        self.push_bars(&rows, range, count);
        self.draw_annotation(range);
    }

    fn draw_mixed(&mut self, series: &SeriesData, categories: &[String]) {
        let rows = value_rows(series);
        let count = categories.len().max(series.max_len());
        let range = self.value_range(&rows, true);
        self.draw_value_axes(range, categories, count);

        let (bars, lines) = rows.split_at(rows.len().min(1));
        self.push_bars(bars, range, count);
        for (offset, (_, data)) in lines.iter().enumerate() {
            let points = self.curve_points(data, range, count, SeriesValue::primary);
            self.draw_series_curve(offset + 1, &points, None);
        }
        self.draw_annotation(range);
    }

    fn draw_candles(&mut self, series: &SeriesData, categories: &[String]) {
        let rows = value_rows(series);
        let count = categories.len().max(series.max_len());
        let range = self.value_range(&rows, false);
        self.draw_value_axes(range, categories, count);

        let plot = self.plot;
        let body_width = (plot.slot_width(count) * 0.5).max(2.0);
        let candles = rows.first().map(|(_, data)| data.clone()).unwrap_or_default();
        for (index, value) in candles.iter().enumerate().take(count) {
            let SeriesValue::Tuple(ohlc) = value else {
                continue;
            };
            if value.is_missing() || ohlc.len() < 4 {
                continue;
            }
            let (open, high, low, close) = (ohlc[0], ohlc[1], ohlc[2], ohlc[3]);
            let color = if close >= open {
                CANDLE_UP_COLOR
            } else {
                CANDLE_DOWN_COLOR
            };
            let x = plot.slot_center(index, count);
            self.frame.push_line(LinePrimitive::new(
                x,
                range.project_y(high, plot),
                x,
                range.project_y(low, plot),
                1.5,
                color,
            ));
            let open_y = range.project_y(open, plot);
            let close_y = range.project_y(close, plot);
            self.frame.push_rect(RectPrimitive::new(
                x - body_width / 2.0,
                open_y.min(close_y),
                body_width,
                (open_y - close_y).abs().max(1.0),
                color,
            ));
        }
        self.draw_annotation(range);
    }

    fn draw_boxes(&mut self, series: &SeriesData, categories: &[String]) {
        let rows = value_rows(series);
        let count = categories.len().max(series.max_len());
        let range = self.value_range(&rows, false);
        self.draw_value_axes(range, categories, count);

        let plot = self.plot;
        let box_width = (plot.slot_width(count) * 0.4).max(4.0);
        let color = self.color(0);
        let boxes = rows.first().map(|(_, data)| data.clone()).unwrap_or_default();
        for (index, value) in boxes.iter().enumerate().take(count) {
            let SeriesValue::Tuple(summary) = value else {
                continue;
            };
            if value.is_missing() || summary.len() < 5 {
                continue;
            }
            let [low, q1, median, q3, high] =
                [summary[0], summary[1], summary[2], summary[3], summary[4]]
                    .map(|v| range.project_y(v, plot));
            let x = plot.slot_center(index, count);
            let half = box_width / 2.0;
            self.frame
                .push_line(LinePrimitive::new(x, high, x, low, 1.5, MUTED_COLOR));
            for cap in [low, high] {
                self.frame.push_line(LinePrimitive::new(
                    x - half / 2.0,
                    cap,
                    x + half / 2.0,
                    cap,
                    1.5,
                    MUTED_COLOR,
                ));
            }
            self.frame.push_rect(
                RectPrimitive::new(x - half, q3, box_width, (q1 - q3).max(1.0), color.with_alpha(0.35))
                    .with_border(1.5, color),
            );
            self.frame
                .push_line(LinePrimitive::new(x - half, median, x + half, median, 2.0, color));
        }
        self.draw_annotation(range);
    }

    fn draw_scatter(&mut self, series: &SeriesData) {
        let rows = value_rows(series);
        let coordinates: Vec<Vec<(f64, f64)>> = rows
            .iter()
            .map(|(_, data)| {
                data.iter()
                    .enumerate()
                    .filter(|(_, value)| !value.is_missing())
                    .filter_map(|(index, value)| match value {
                        SeriesValue::Tuple(pair) if pair.len() >= 2 => Some((pair[0], pair[1])),
                        SeriesValue::Number(y) => Some((index as f64, *y)),
                        _ => None,
                    })
                    .collect()
            })
            .collect();

        let x_range = ValueRange::from_values(coordinates.iter().flatten().map(|p| p.0));
        let mut y_range = ValueRange::from_values(coordinates.iter().flatten().map(|p| p.1));
        if let Some(y) = self.annotation_value() {
            y_range = y_range.including(y);
        }
        self.draw_value_axes(y_range, &[], 0);

        let plot = self.plot;
        self.label(&short_number(x_range.min), plot.left, plot.bottom() + 18.0, 10.0, TextHAlign::Left);
        self.label(
            &short_number(x_range.max),
            plot.right(),
            plot.bottom() + 18.0,
            10.0,
            TextHAlign::Right,
        );
        for (index, points) in coordinates.iter().enumerate() {
            let color = self.color(index).with_alpha(0.8);
            for &(x, y) in points {
                self.frame.push_circle(CirclePrimitive::new(
                    x_range.project_x(x, plot),
                    y_range.project_y(y, plot),
                    5.0,
                    color,
                ));
            }
        }
        self.draw_annotation(y_range);
    }

    fn draw_heatmap(&mut self, series: &SeriesData, categories: &[String]) {
        let rows = value_rows(series);
        let count = categories.len().max(series.max_len());
        if rows.is_empty() || count == 0 {
            self.draw_placeholder_body();
            return;
        }
        let range = ValueRange::from_values(
            rows.iter()
                .flat_map(|(_, data)| data.iter().filter_map(SeriesValue::primary)),
        );
        let plot = self.plot.inset_left(LABEL_COLUMN - PLOT_LEFT + 16.0);
        let cell_width = plot.slot_width(count);
        let cell_height = plot.height / rows.len() as f64;
        let base = self.color(0);

        for (row_index, (name, data)) in rows.iter().enumerate() {
            let y = plot.top + cell_height * row_index as f64;
            self.label(name, plot.left - 8.0, y + cell_height / 2.0 + 4.0, 11.0, TextHAlign::Right);
            for column in 0..count {
                let x = plot.left + cell_width * column as f64;
                let value = data.get(column).and_then(SeriesValue::primary);
                let fill = match value {
                    Some(v) => base.with_alpha(0.15 + 0.85 * range.fraction(v)),
                    None => GRID_COLOR,
                };
                self.frame.push_rect(
                    RectPrimitive::new(x, y, cell_width, cell_height, fill)
                        .with_border(2.0, BACKGROUND_COLOR),
                );
                if let Some(v) = value {
                    if cell_width > 28.0 {
                        self.frame.push_text(TextPrimitive::new(
                            short_number(v),
                            x + cell_width / 2.0,
                            y + cell_height / 2.0 + 4.0,
                            11.0,
                            TITLE_COLOR,
                            TextHAlign::Center,
                        ));
                    }
                }
            }
        }
        for (column, category) in categories.iter().enumerate().take(count) {
            let x = plot.slot_center(column, count);
            self.label(category, x, plot.bottom() + 18.0, 10.0, TextHAlign::Center);
        }
    }

    fn draw_timeline(&mut self, series: &SeriesData) {
        let items: Vec<(String, f64, f64)> = match series {
            SeriesData::Nested(series) => series
                .iter()
                .flat_map(|s| s.data.iter())
                .filter_map(|point| {
                    let (low, high) = point.y.bounds()?;
                    Some((point.x.clone(), low, high))
                })
                .collect(),
            other => value_rows(other)
                .into_iter()
                .flat_map(|(name, data)| {
                    data.into_iter().enumerate().filter_map(move |(index, value)| {
                        let (low, high) = value.bounds()?;
                        Some((format!("{name} {}", index + 1), low, high))
                    })
                })
                .collect(),
        };
        if items.is_empty() {
            self.draw_placeholder_body();
            return;
        }

        let range = ValueRange::from_values(items.iter().flat_map(|(_, low, high)| [*low, *high]));
        let plot = self.plot.inset_left(LABEL_COLUMN - PLOT_LEFT + 16.0);
        let row_height = plot.height / items.len() as f64;
        for (index, (label, low, high)) in items.iter().enumerate() {
            let y = plot.top + row_height * index as f64;
            let x0 = range.project_x(*low, plot);
            let x1 = range.project_x(*high, plot);
            self.frame.push_rect(
                RectPrimitive::new(x0, y + row_height * 0.2, (x1 - x0).max(2.0), row_height * 0.6, self.color(index))
                    .with_corner_radius(3.0),
            );
            self.label(label, plot.left - 8.0, y + row_height / 2.0 + 4.0, 11.0, TextHAlign::Right);
        }
        self.label(&short_number(range.min), plot.left, plot.bottom() + 18.0, 10.0, TextHAlign::Left);
        self.label(
            &short_number(range.max),
            plot.right(),
            plot.bottom() + 18.0,
            10.0,
            TextHAlign::Right,
        );
    }

    fn draw_treemap(&mut self, series: &SeriesData, categories: &[String]) {
        let items = labeled_items(series, categories);
        let total: f64 = items.iter().map(|(_, value)| value).sum();
        if items.is_empty() || total <= 0.0 {
            self.draw_placeholder_body();
            return;
        }
        let plot = self.plot;
        let mut cursor = plot.left;
        for (index, (label, value)) in items.iter().enumerate() {
            let width = plot.width * value / total;
            self.frame.push_rect(
                RectPrimitive::new(cursor, plot.top, width, plot.height, self.color(index))
                    .with_border(2.0, BACKGROUND_COLOR),
            );
            if width > 48.0 {
                self.frame.push_text(
                    TextPrimitive::new(
                        label.as_str(),
                        cursor + 8.0,
                        plot.top + 20.0,
                        12.0,
                        BACKGROUND_COLOR,
                        TextHAlign::Left,
                    )
                    .bold(),
                );
                self.frame.push_text(TextPrimitive::new(
                    short_number(*value),
                    cursor + 8.0,
                    plot.top + 36.0,
                    11.0,
                    BACKGROUND_COLOR,
                    TextHAlign::Left,
                ));
            }
            cursor += width;
        }
    }

    fn draw_wedges(&mut self, series: &SeriesData, categories: &[String], style: WedgeStyle) {
        let items = labeled_items(series, categories);
        let total: f64 = items.iter().map(|(_, value)| value).sum();
        let largest = items.iter().map(|(_, value)| *value).fold(0.0, f64::max);
        if items.is_empty() || total <= 0.0 {
            self.draw_placeholder_body();
            return;
        }

        let plot = self.plot;
        let outer = (plot.height.min(plot.width * 0.5) / 2.0 - 4.0).max(8.0);
        let center = (plot.left + outer + 12.0, plot.top + plot.height / 2.0);
        let inner = outer * 0.6;
        let sweep_for = |value: f64| match style {
            WedgeStyle::Polar => TAU / items.len() as f64,
            WedgeStyle::Pie | WedgeStyle::Donut => TAU * value / total,
        };

        if style == WedgeStyle::Polar {
            self.frame
                .push_circle(CirclePrimitive::new(center.0, center.1, outer, GRID_COLOR.with_alpha(0.4)));
        }

        let mut angle = -FRAC_PI_2;
        for (index, (_, value)) in items.iter().enumerate() {
            let color = self.color(index);
            let sweep = sweep_for(*value);
            let radius = match style {
                WedgeStyle::Polar => outer * (value / largest).sqrt(),
                WedgeStyle::Pie | WedgeStyle::Donut => outer,
            };
            if sweep >= TAU - 1e-6 {
                // A single full slice cannot be expressed as one arc.
                self.frame
                    .push_circle(CirclePrimitive::new(center.0, center.1, radius, color));
            } else {
                let end = angle + sweep;
                let large_arc = sweep > PI;
                let start_outer = polar_point(center, radius, angle);
                let end_outer = polar_point(center, radius, end);
                let mut commands = Vec::with_capacity(6);
                if style == WedgeStyle::Donut {
                    let start_inner = polar_point(center, inner, angle);
                    let end_inner = polar_point(center, inner, end);
                    commands.push(PathCommand::MoveTo(start_outer.0, start_outer.1));
                    commands.push(PathCommand::Arc { radius, large_arc, sweep: true, to: end_outer });
                    commands.push(PathCommand::LineTo(end_inner.0, end_inner.1));
                    commands.push(PathCommand::Arc {
                        radius: inner,
                        large_arc,
                        sweep: false,
                        to: start_inner,
                    });
                } else {
                    commands.push(PathCommand::MoveTo(center.0, center.1));
                    commands.push(PathCommand::LineTo(start_outer.0, start_outer.1));
                    commands.push(PathCommand::Arc { radius, large_arc, sweep: true, to: end_outer });
                }
                commands.push(PathCommand::Close);
                self.frame.push_path(
                    PathPrimitive::new(commands)
                        .filled(color)
                        .stroked(BACKGROUND_COLOR, 2.0),
                );
                angle = end;
            }
        }

        if style == WedgeStyle::Donut {
            self.frame
                .push_circle(CirclePrimitive::new(center.0, center.1, inner, BACKGROUND_COLOR));
            self.frame.push_text(
                TextPrimitive::new(short_number(total), center.0, center.1 + 6.0, 18.0, TITLE_COLOR, TextHAlign::Center)
                    .bold(),
            );
        }

        let legend_x = center.0 + outer + 32.0;
        let row_height = 20.0;
        let legend_top = center.1 - row_height * items.len() as f64 / 2.0;
        for (index, (label, value)) in items.iter().enumerate() {
            let y = legend_top + row_height * index as f64;
            self.frame
                .push_rect(RectPrimitive::new(legend_x, y, 10.0, 10.0, self.color(index)).with_corner_radius(2.0));
            let share = 100.0 * value / total;
            self.label(
                &format!("{label} ({}%)", short_number(share)),
                legend_x + 16.0,
                y + 9.0,
                11.0,
                TextHAlign::Left,
            );
        }
    }

    fn draw_radar(&mut self, series: &SeriesData, categories: &[String]) {
        let rows = value_rows(series);
        let spokes = categories.len().max(series.max_len());
        if spokes < 3 {
            self.draw_curves(series, categories, false);
            return;
        }
        let range = ValueRange::from_values(
            rows.iter()
                .flat_map(|(_, data)| data.iter().filter_map(SeriesValue::primary)),
        )
        .including(0.0);
        let plot = self.plot;
        let center = plot.center();
        let radius = (plot.width.min(plot.height) / 2.0 - 16.0).max(8.0);
        let angle_at = |index: usize| -FRAC_PI_2 + TAU * index as f64 / spokes as f64;

        for level in 1..=4 {
            let r = radius * f64::from(level) / 4.0;
            let mut ring: Vec<PathCommand> = (0..spokes)
                .map(|index| {
                    let (x, y) = polar_point(center, r, angle_at(index));
                    if index == 0 {
                        PathCommand::MoveTo(x, y)
                    } else {
                        PathCommand::LineTo(x, y)
                    }
                })
                .collect();
            ring.push(PathCommand::Close);
            self.frame
                .push_path(PathPrimitive::new(ring).stroked(GRID_COLOR, 1.0));
        }
        for index in 0..spokes {
            let (x, y) = polar_point(center, radius, angle_at(index));
            self.frame
                .push_line(LinePrimitive::new(center.0, center.1, x, y, 1.0, GRID_COLOR));
            if let Some(label) = categories.get(index) {
                let (lx, ly) = polar_point(center, radius + 12.0, angle_at(index));
                let align = if (lx - center.0).abs() < 1.0 {
                    TextHAlign::Center
                } else if lx > center.0 {
                    TextHAlign::Left
                } else {
                    TextHAlign::Right
                };
                self.label(label, lx, ly + 4.0, 10.0, align);
            }
        }

        for (series_index, (_, data)) in rows.iter().enumerate() {
            let color = self.color(series_index);
            let vertices: Vec<(f64, f64)> = (0..spokes)
                .map(|index| {
                    let v = data.get(index).and_then(SeriesValue::primary).unwrap_or(range.min);
                    polar_point(center, radius * range.fraction(v), angle_at(index))
                })
                .collect();
            let mut polygon: Vec<PathCommand> = vertices
                .iter()
                .enumerate()
                .map(|(index, &(x, y))| {
                    if index == 0 {
                        PathCommand::MoveTo(x, y)
                    } else {
                        PathCommand::LineTo(x, y)
                    }
                })
                .collect();
            polygon.push(PathCommand::Close);
            self.frame.push_path(
                PathPrimitive::new(polygon)
                    .filled(color.with_alpha(0.2))
                    .stroked(color, 2.0),
            );
            for (x, y) in vertices {
                self.frame.push_circle(CirclePrimitive::new(x, y, 3.0, color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ValueRange, curve_commands, short_number};
    use crate::core::StrokeCurve;
    use crate::render::PathCommand;

    #[test]
    fn degenerate_range_is_widened() {
        let range = ValueRange::from_values([5.0, 5.0]);
        assert!(range.max > range.min);
        let empty = ValueRange::from_values(std::iter::empty());
        assert_eq!((empty.min, empty.max), (0.0, 1.0));
    }

    #[test]
    fn stepline_emits_two_segments_per_step() {
        let commands = curve_commands(&[(0.0, 0.0), (10.0, 5.0)], StrokeCurve::Stepline);
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[1], PathCommand::LineTo(10.0, 0.0));
    }

    #[test]
    fn short_numbers_drop_trailing_zero() {
        assert_eq!(short_number(20.0), "20");
        assert_eq!(short_number(1.26), "1.3");
    }
}
