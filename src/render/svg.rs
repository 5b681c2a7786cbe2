use std::fmt::Write as _;

use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, LinePrimitive, PathCommand, PathPrimitive, RectPrimitive, RenderFrame,
    Renderer, Shape, TextHAlign, TextPrimitive,
};

const SVG_STYLE: &str = "text{font-family:Inter,Helvetica,Arial,sans-serif}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub paths_drawn: usize,
    pub circles_drawn: usize,
    pub texts_drawn: usize,
}

/// Serializes frames into standalone SVG documents.
///
/// The output needs no script and no external resources. Element ids are
/// prefixed with `id_prefix` so several graphics can share one page.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    id_prefix: String,
    markup: String,
    last_stats: SvgRenderStats,
}

impl SvgRenderer {
    #[must_use]
    pub fn new(id_prefix: impl Into<String>) -> Self {
        Self {
            id_prefix: sanitize_id(&id_prefix.into()),
            markup: String::new(),
            last_stats: SvgRenderStats::default(),
        }
    }

    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    #[must_use]
    pub fn into_markup(self) -> String {
        self.markup
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }

    fn write_document(&mut self, frame: &RenderFrame) {
        let mut out = String::with_capacity(4096);
        let mut stats = SvgRenderStats::default();
        let width = frame.viewport.width;
        let height = frame.viewport.height;
        let title_id = format!("{}-title", self.id_prefix);
        let desc_id = format!("{}-desc", self.id_prefix);

        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" role="img" aria-labelledby="{title_id} {desc_id}" class="chart-fallback">"#
        );
        let _ = write!(
            out,
            r#"<title id="{title_id}">{}</title><desc id="{desc_id}">{}</desc><style>{SVG_STYLE}</style>"#,
            escape_xml(&frame.title),
            escape_xml(&frame.description)
        );

        for shape in &frame.shapes {
            match shape {
                Shape::Rect(rect) => {
                    write_rect(&mut out, rect);
                    stats.rects_drawn += 1;
                }
                Shape::Path(path) => {
                    write_path(&mut out, path);
                    stats.paths_drawn += 1;
                }
                Shape::Circle(circle) => {
                    write_circle(&mut out, circle);
                    stats.circles_drawn += 1;
                }
                Shape::Line(line) => {
                    write_line(&mut out, line);
                    stats.lines_drawn += 1;
                }
            }
        }
        for text in &frame.texts {
            write_text(&mut out, text);
            stats.texts_drawn += 1;
        }

        out.push_str("</svg>");
        self.markup = out;
        self.last_stats = stats;
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.write_document(frame);
        Ok(())
    }
}

fn write_rect(out: &mut String, rect: &RectPrimitive) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
        fmt_num(rect.x),
        fmt_num(rect.y),
        fmt_num(rect.width),
        fmt_num(rect.height),
        rect.fill_color.to_svg_rgb()
    );
    write_opacity(out, "fill-opacity", rect.fill_color.alpha);
    if rect.corner_radius > 0.0 {
        let _ = write!(out, r#" rx="{}""#, fmt_num(rect.corner_radius));
    }
    if rect.border_width > 0.0 {
        let _ = write!(
            out,
            r#" stroke="{}" stroke-width="{}""#,
            rect.border_color.to_svg_rgb(),
            fmt_num(rect.border_width)
        );
    }
    out.push_str("/>");
}

fn write_path(out: &mut String, path: &PathPrimitive) {
    out.push_str(r#"<path d=""#);
    for (index, command) in path.commands.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        match *command {
            PathCommand::MoveTo(x, y) => {
                let _ = write!(out, "M{},{}", fmt_num(x), fmt_num(y));
            }
            PathCommand::LineTo(x, y) => {
                let _ = write!(out, "L{},{}", fmt_num(x), fmt_num(y));
            }
            PathCommand::CubicTo { c1, c2, to } => {
                let _ = write!(
                    out,
                    "C{},{} {},{} {},{}",
                    fmt_num(c1.0),
                    fmt_num(c1.1),
                    fmt_num(c2.0),
                    fmt_num(c2.1),
                    fmt_num(to.0),
                    fmt_num(to.1)
                );
            }
            PathCommand::Arc {
                radius,
                large_arc,
                sweep,
                to,
            } => {
                let _ = write!(
                    out,
                    "A{r},{r} 0 {} {} {},{}",
                    u8::from(large_arc),
                    u8::from(sweep),
                    fmt_num(to.0),
                    fmt_num(to.1),
                    r = fmt_num(radius)
                );
            }
            PathCommand::Close => out.push('Z'),
        }
    }
    out.push('"');

    match path.fill_color {
        Some(color) => {
            let _ = write!(out, r#" fill="{}""#, color.to_svg_rgb());
            write_opacity(out, "fill-opacity", color.alpha);
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(color) = path.stroke_color {
        let _ = write!(
            out,
            r#" stroke="{}" stroke-width="{}" stroke-linejoin="round""#,
            color.to_svg_rgb(),
            fmt_num(path.stroke_width)
        );
        write_opacity(out, "stroke-opacity", color.alpha);
    }
    out.push_str("/>");
}

fn write_circle(out: &mut String, circle: &CirclePrimitive) {
    let _ = write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{}" fill="{}""#,
        fmt_num(circle.cx),
        fmt_num(circle.cy),
        fmt_num(circle.radius),
        circle.fill_color.to_svg_rgb()
    );
    write_opacity(out, "fill-opacity", circle.fill_color.alpha);
    out.push_str("/>");
}

fn write_line(out: &mut String, line: &LinePrimitive) {
    let _ = write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}""#,
        fmt_num(line.x1),
        fmt_num(line.y1),
        fmt_num(line.x2),
        fmt_num(line.y2),
        line.color.to_svg_rgb(),
        fmt_num(line.stroke_width)
    );
    write_opacity(out, "stroke-opacity", line.color.alpha);
    if let Some(dash) = line.dash {
        let _ = write!(out, r#" stroke-dasharray="{d} {d}""#, d = fmt_num(dash));
    }
    out.push_str("/>");
}

fn write_text(out: &mut String, text: &TextPrimitive) {
    let anchor = match text.h_align {
        TextHAlign::Left => "start",
        TextHAlign::Center => "middle",
        TextHAlign::Right => "end",
    };
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{anchor}""#,
        fmt_num(text.x),
        fmt_num(text.y),
        fmt_num(text.font_size_px),
        text.color.to_svg_rgb()
    );
    if text.bold {
        out.push_str(r#" font-weight="600""#);
    }
    let _ = write!(out, ">{}</text>", escape_xml(&text.text));
}

fn write_opacity(out: &mut String, attribute: &str, alpha: f64) {
    if alpha < 1.0 {
        let _ = write!(out, r#" {attribute}="{}""#, fmt_num(alpha));
    }
}

/// Two-decimal fixed point with trailing zeros trimmed.
fn fmt_num(value: f64) -> String {
    let mut text = format!("{value:.2}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" { "0".to_owned() } else { text }
}

#[must_use]
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn sanitize_id(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '-' })
        .collect();
    if cleaned.is_empty() {
        "chart".to_owned()
    } else {
        cleaned
    }
}
