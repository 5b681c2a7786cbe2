use indexmap::IndexMap;
use tracing::debug;

use crate::core::{Annotation, ChartKind, NamedSeries, SeriesData, SeriesValue, StyleOptions};
use crate::core::{LabeledPoint, NestedSeries};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_CHART_HEIGHT: u32 = 350;
pub const MILESTONE_LABEL: &str = "Milestone";

/// Rendering defaults plus the sample data used to draw a fallback graphic.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub height: u32,
    pub style: StyleOptions,
    pub sample_series: SeriesData,
    pub sample_categories: Option<Vec<String>>,
}

impl RegistryEntry {
    #[must_use]
    pub fn new(title: &str, subtitle: &str, sample_series: SeriesData) -> Self {
        Self {
            height: DEFAULT_CHART_HEIGHT,
            style: StyleOptions {
                title: Some(title.to_owned()),
                subtitle: Some(subtitle.to_owned()),
                ..StyleOptions::default()
            },
            sample_series,
            sample_categories: None,
        }
    }

    #[must_use]
    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.sample_categories = Some(categories.iter().map(|c| (*c).to_owned()).collect());
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: StyleOptions) -> Self {
        self.style = self.style.merged_with(&style);
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.style.title.as_deref().unwrap_or("Chart")
    }

    #[must_use]
    pub fn subtitle(&self) -> &str {
        self.style.subtitle.as_deref().unwrap_or("")
    }
}

/// Immutable catalog of chart kinds, built once and shared by reference.
///
/// Lookups are total: kinds without an entry resolve to the `line` entry,
/// which every registry is guaranteed to contain.
#[derive(Debug, Clone)]
pub struct ChartRegistry {
    entries: IndexMap<ChartKind, RegistryEntry>,
}

impl ChartRegistry {
    /// Builds a registry from custom entries.
    ///
    /// Every entry without an annotation receives the milestone marker.
    /// Fails when no `line` entry is supplied, since it backs unknown kinds.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (ChartKind, RegistryEntry)>,
    ) -> ChartResult<Self> {
        let mut entries: IndexMap<ChartKind, RegistryEntry> = entries.into_iter().collect();
        if !entries.contains_key(&ChartKind::Line) {
            return Err(ChartError::InvalidSpec(
                "chart registry requires a `line` entry".to_owned(),
            ));
        }
        apply_milestones(&mut entries);
        Ok(Self { entries })
    }

    /// The catalog shipped with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        let mut entries = builtin_entries();
        apply_milestones(&mut entries);
        Self { entries }
    }

    #[must_use]
    pub fn lookup(&self, kind: ChartKind) -> &RegistryEntry {
        match self.entries.get(&kind) {
            Some(entry) => entry,
            None => &self.entries[&ChartKind::Line],
        }
    }

    #[must_use]
    pub fn contains(&self, kind: ChartKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ChartKind> + '_ {
        self.entries.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChartRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn apply_milestones(entries: &mut IndexMap<ChartKind, RegistryEntry>) {
    for (kind, entry) in entries.iter_mut() {
        if entry.style.annotation.is_none() {
            entry.style.annotation = Some(milestone_for(&entry.sample_series));
            debug!(kind = %kind, "applied default milestone annotation");
        }
    }
}

/// Marker placed at the midpoint of the sample data's value range.
fn milestone_for(series: &SeriesData) -> Annotation {
    let values = series.first_series_primaries();
    let low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let y = if low.is_finite() && high.is_finite() {
        (low + high) / 2.0
    } else {
        0.0
    };
    Annotation::new(y, MILESTONE_LABEL)
}

const YEARS: [&str; 6] = ["2025", "2026", "2027", "2028", "2029", "2030"];

fn named(name: &str, values: &[f64]) -> NamedSeries {
    NamedSeries::from_numbers(name, values)
}

fn tuples(name: &str, rows: &[&[f64]]) -> NamedSeries {
    NamedSeries::new(name, rows.iter().map(|row| SeriesValue::tuple(row)).collect())
}

fn builtin_entries() -> IndexMap<ChartKind, RegistryEntry> {
    let mut entries = IndexMap::new();

    entries.insert(
        ChartKind::Area,
        RegistryEntry::new(
            "Market Growth Projection",
            "Addressable market, $B",
            SeriesData::Named(vec![named("Market Size", &[1.5, 5.0, 20.0, 48.0, 95.0, 180.0])]),
        )
        .with_categories(&YEARS)
        .with_height(380),
    );
    entries.insert(
        ChartKind::Radar,
        RegistryEntry::new(
            "Competitive Positioning",
            "Capability score out of 10",
            SeriesData::Named(vec![
                named("Our Platform", &[9.0, 8.0, 9.0, 7.0, 6.0, 8.0]),
                named("Incumbent", &[6.0, 7.0, 6.0, 5.0, 9.0, 7.0]),
            ]),
        )
        .with_categories(&["Performance", "Scalability", "Security", "Cost", "Ecosystem", "Support"]),
    );
    entries.insert(
        ChartKind::Bar,
        RegistryEntry::new(
            "Revenue Projection",
            "Annual revenue, $M",
            SeriesData::Named(vec![named("Revenue", &[0.5, 2.4, 8.1, 19.6, 42.0])]),
        )
        .with_categories(&YEARS[..5]),
    );
    entries.insert(
        ChartKind::Line,
        RegistryEntry::new(
            "User Growth",
            "Monthly active users, thousands",
            SeriesData::Named(vec![named(
                "Active Users",
                &[2.0, 5.0, 9.0, 16.0, 28.0, 45.0, 70.0, 110.0],
            )]),
        )
        .with_categories(&["Q1", "Q2", "Q3", "Q4", "Q5", "Q6", "Q7", "Q8"]),
    );
    entries.insert(
        ChartKind::Pie,
        RegistryEntry::new(
            "Revenue Streams",
            "Share of revenue, %",
            SeriesData::flat(&[45.0, 25.0, 18.0, 12.0]),
        )
        .with_categories(&["Licensing", "Cloud Services", "Consulting", "Training"]),
    );
    entries.insert(
        ChartKind::Donut,
        RegistryEntry::new(
            "Funding Allocation",
            "Use of proceeds, %",
            SeriesData::flat(&[40.0, 25.0, 20.0, 15.0]),
        )
        .with_categories(&["R&D", "Go-to-Market", "Operations", "Reserve"]),
    );
    entries.insert(
        ChartKind::Scatter,
        RegistryEntry::new(
            "Customer Segments",
            "Contract value vs. retention",
            SeriesData::Named(vec![
                tuples("Enterprise", &[&[120.0, 85.0], &[150.0, 92.0], &[90.0, 70.0]]),
                tuples("SMB", &[&[20.0, 40.0], &[35.0, 55.0], &[28.0, 48.0]]),
            ]),
        ),
    );
    entries.insert(
        ChartKind::Heatmap,
        RegistryEntry::new(
            "Risk Matrix",
            "Exposure by risk area",
            SeriesData::Named(vec![
                named("Technical", &[2.0, 5.0, 7.0, 3.0]),
                named("Market", &[4.0, 6.0, 3.0, 2.0]),
                named("Regulatory", &[1.0, 3.0, 5.0, 8.0]),
            ]),
        )
        .with_categories(&["Low", "Medium", "High", "Critical"]),
    );
    entries.insert(
        ChartKind::Timeline,
        RegistryEntry::new(
            "Product Roadmap",
            "Months from funding",
            SeriesData::Nested(vec![NestedSeries {
                name: Some("Phases".to_owned()),
                data: vec![
                    LabeledPoint::new("Research", SeriesValue::pair(0.0, 6.0)),
                    LabeledPoint::new("Prototype", SeriesValue::pair(4.0, 12.0)),
                    LabeledPoint::new("Pilot", SeriesValue::pair(10.0, 18.0)),
                    LabeledPoint::new("Launch", SeriesValue::pair(16.0, 24.0)),
                ],
            }]),
        )
        .with_height(300),
    );
    entries.insert(
        ChartKind::Mixed,
        RegistryEntry::new(
            "Unit Economics",
            "Revenue ($M) and gross margin (%)",
            SeriesData::Named(vec![
                named("Revenue", &[0.5, 2.4, 8.1, 19.6, 42.0]),
                named("Gross Margin", &[20.0, 38.0, 52.0, 61.0, 68.0]),
            ]),
        )
        .with_categories(&YEARS[..5]),
    );
    entries.insert(
        ChartKind::Candlestick,
        RegistryEntry::new(
            "Token Price",
            "Weekly open, high, low, close",
            SeriesData::Named(vec![tuples(
                "Price",
                &[
                    &[10.0, 12.5, 9.5, 12.0],
                    &[12.0, 13.0, 10.5, 11.0],
                    &[11.0, 14.5, 10.8, 14.0],
                    &[14.0, 15.2, 12.9, 13.2],
                    &[13.2, 16.0, 13.0, 15.8],
                ],
            )]),
        )
        .with_categories(&["W1", "W2", "W3", "W4", "W5"]),
    );
    entries.insert(
        ChartKind::BoxPlot,
        RegistryEntry::new(
            "Latency Distribution",
            "Request latency, ms",
            SeriesData::Named(vec![tuples(
                "Latency",
                &[
                    &[12.0, 18.0, 24.0, 31.0, 45.0],
                    &[15.0, 22.0, 29.0, 38.0, 52.0],
                    &[9.0, 14.0, 19.0, 26.0, 37.0],
                ],
            )]),
        )
        .with_categories(&["North America", "Europe", "Asia Pacific"]),
    );
    entries.insert(
        ChartKind::Treemap,
        RegistryEntry::new(
            "Market Share",
            "Revenue share by segment, %",
            SeriesData::Nested(vec![NestedSeries {
                name: None,
                data: vec![
                    LabeledPoint::new("Enterprise", 42.0),
                    LabeledPoint::new("Mid-Market", 28.0),
                    LabeledPoint::new("SMB", 18.0),
                    LabeledPoint::new("Public Sector", 12.0),
                ],
            }]),
        ),
    );
    entries.insert(
        ChartKind::RangeArea,
        RegistryEntry::new(
            "Scenario Range",
            "Revenue band, $M",
            SeriesData::Named(vec![tuples(
                "Forecast Range",
                &[&[1.0, 2.0], &[2.0, 4.0], &[4.0, 8.0], &[7.0, 14.0], &[10.0, 22.0]],
            )]),
        )
        .with_categories(&YEARS[..5]),
    );
    entries.insert(
        ChartKind::Polar,
        RegistryEntry::new(
            "Team Composition",
            "Headcount by function",
            SeriesData::flat(&[12.0, 8.0, 5.0, 4.0, 3.0]),
        )
        .with_categories(&["Engineering", "Research", "Sales", "Operations", "Design"]),
    );

    entries
}

#[cfg(test)]
mod tests {
    use super::{ChartRegistry, RegistryEntry};
    use crate::core::{ChartKind, SeriesData};

    #[test]
    fn custom_registry_requires_line_entry() {
        let entry = RegistryEntry::new("Only bars", "", SeriesData::flat(&[1.0]));
        assert!(ChartRegistry::from_entries([(ChartKind::Bar, entry)]).is_err());
    }

    #[test]
    fn milestone_sits_at_sample_midpoint() {
        let entry = RegistryEntry::new("Line", "", SeriesData::flat(&[10.0, 30.0]));
        let registry =
            ChartRegistry::from_entries([(ChartKind::Line, entry)]).expect("registry");
        let annotation = registry
            .lookup(ChartKind::Line)
            .style
            .annotation
            .clone()
            .expect("annotation");
        assert!((annotation.y - 20.0).abs() <= 1e-9);
    }
}
