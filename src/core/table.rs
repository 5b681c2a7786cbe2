use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::core::{LabeledPoint, NamedSeries, NestedSeries, SeriesData, SeriesValue};

pub const PLACEHOLDER: &str = "-";
pub const CATEGORY_HEADER: &str = "Category";
pub const ITEM_HEADER: &str = "Item";
pub const VALUE_HEADER: &str = "Value";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub category: String,
    pub values: Vec<String>,
}

/// Read-only tabular projection of series data.
///
/// `headers[0]` labels the category column; the remaining headers name the
/// value columns. Every row carries exactly `headers.len() - 1` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTableModel {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl DataTableModel {
    /// Synthesizes the table. Never fails: shapes it cannot interpret
    /// produce a header-only table.
    #[must_use]
    pub fn build(series: &SeriesData, categories: Option<&[String]>) -> Self {
        match (series, categories) {
            (SeriesData::Flat(values), Some(categories)) => flat_by_category(values, categories),
            (SeriesData::Flat(values), None) => flat_by_item(values),
            (SeriesData::Named(series), Some(categories)) => named_by_category(series, categories),
            (SeriesData::Named(series), None) => named_by_point(series),
            (SeriesData::Nested(series), Some(categories)) => {
                nested_by_category(series, categories)
            }
            (SeriesData::Nested(series), None) => nested_by_point(series),
        }
    }

    #[must_use]
    pub fn value_headers(&self) -> &[String] {
        self.headers.get(1..).unwrap_or(&[])
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sentence describing one row, used for live-region announcements.
    #[must_use]
    pub fn describe_row(&self, index: usize) -> Option<String> {
        let row = self.rows.get(index)?;
        let mut out = format!("{}:", row.category);
        for (position, (header, value)) in self.value_headers().iter().zip(&row.values).enumerate() {
            if position > 0 {
                out.push(',');
            }
            let _ = write!(out, " {header} {value}");
        }
        Some(out)
    }
}

/// Readable cell text: numbers in shortest form, tuples as `[a, b]`,
/// missing or non-finite values as the placeholder dash.
#[must_use]
pub fn format_cell(value: &SeriesValue) -> String {
    if value.is_missing() {
        return PLACEHOLDER.to_owned();
    }
    match value {
        SeriesValue::Number(number) => format_number(*number),
        SeriesValue::Tuple(values) => {
            let parts: Vec<String> = values.iter().map(|v| format_number(*v)).collect();
            format!("[{}]", parts.join(", "))
        }
        SeriesValue::Missing => PLACEHOLDER.to_owned(),
    }
}

fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_owned();
    }
    if value == 0.0 {
        // Avoids rendering `-0`.
        return "0".to_owned();
    }
    format!("{value}")
}

fn cell_at(data: &[SeriesValue], index: usize) -> String {
    data.get(index).map_or_else(|| PLACEHOLDER.to_owned(), format_cell)
}

fn series_label(name: Option<&str>, fallback_index: usize) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name.to_owned(),
        _ => format!("Series {}", fallback_index + 1),
    }
}

fn point_label(series_name: Option<&str>, index: usize) -> String {
    match series_name {
        Some(name) if !name.trim().is_empty() => format!("{name} {}", index + 1),
        _ => format!("{ITEM_HEADER} {}", index + 1),
    }
}

fn flat_by_category(values: &[SeriesValue], categories: &[String]) -> DataTableModel {
    DataTableModel {
        headers: vec![CATEGORY_HEADER.to_owned(), VALUE_HEADER.to_owned()],
        rows: categories
            .iter()
            .enumerate()
            .map(|(index, category)| TableRow {
                category: category.clone(),
                values: vec![cell_at(values, index)],
            })
            .collect(),
    }
}

fn flat_by_item(values: &[SeriesValue]) -> DataTableModel {
    DataTableModel {
        headers: vec![ITEM_HEADER.to_owned(), VALUE_HEADER.to_owned()],
        rows: values
            .iter()
            .enumerate()
            .map(|(index, value)| TableRow {
                category: point_label(None, index),
                values: vec![format_cell(value)],
            })
            .collect(),
    }
}

fn category_headers<'a>(names: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut headers = vec![CATEGORY_HEADER.to_owned()];
    headers.extend(
        names
            .enumerate()
            .map(|(index, name)| series_label(name, index)),
    );
    headers
}

fn named_by_category(series: &[NamedSeries], categories: &[String]) -> DataTableModel {
    let headers = category_headers(series.iter().map(|s| s.name.as_deref()));
    let rows = categories
        .iter()
        .enumerate()
        .map(|(index, category)| TableRow {
            category: category.clone(),
            values: series.iter().map(|s| cell_at(&s.data, index)).collect(),
        })
        .collect();

    DataTableModel { headers, rows }
}

/// Categories take precedence over the points' own `x` labels.
fn nested_by_category(series: &[NestedSeries], categories: &[String]) -> DataTableModel {
    let headers = category_headers(series.iter().map(|s| s.name.as_deref()));
    let rows = categories
        .iter()
        .enumerate()
        .map(|(index, category)| TableRow {
            category: category.clone(),
            values: series
                .iter()
                .map(|s| {
                    s.data
                        .get(index)
                        .map_or_else(|| PLACEHOLDER.to_owned(), |point| format_cell(&point.y))
                })
                .collect(),
        })
        .collect();

    DataTableModel { headers, rows }
}

fn named_by_point(series: &[NamedSeries]) -> DataTableModel {
    let rows = series
        .iter()
        .flat_map(|s| {
            s.data.iter().enumerate().map(|(index, value)| TableRow {
                category: point_label(s.name.as_deref(), index),
                values: vec![format_cell(value)],
            })
        })
        .collect::<Vec<_>>();

    let headers = if series.is_empty() {
        vec![CATEGORY_HEADER.to_owned()]
    } else {
        vec![ITEM_HEADER.to_owned(), VALUE_HEADER.to_owned()]
    };
    DataTableModel { headers, rows }
}

fn nested_by_point(series: &[NestedSeries]) -> DataTableModel {
    let rows = series
        .iter()
        .flat_map(|s| {
            s.data
                .iter()
                .enumerate()
                .map(|(index, point)| nested_row(s.name.as_deref(), index, point))
        })
        .collect::<Vec<_>>();

    let headers = if series.is_empty() {
        vec![CATEGORY_HEADER.to_owned()]
    } else {
        vec![ITEM_HEADER.to_owned(), VALUE_HEADER.to_owned()]
    };
    DataTableModel { headers, rows }
}

fn nested_row(series_name: Option<&str>, index: usize, point: &LabeledPoint) -> TableRow {
    let category = if point.x.trim().is_empty() {
        point_label(series_name, index)
    } else {
        point.x.clone()
    };
    TableRow {
        category,
        values: vec![format_cell(&point.y)],
    }
}
