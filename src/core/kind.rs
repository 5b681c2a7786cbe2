use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ChartError;

/// Closed set of chart shapes the engine knows how to describe.
///
/// Not every kind has a catalog entry or a dedicated fallback template:
/// `Funnel` and `Gauge` resolve to the `line` catalog entry and to the
/// generic placeholder graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartKind {
    Area,
    Radar,
    Bar,
    Line,
    Pie,
    Donut,
    Scatter,
    Heatmap,
    Timeline,
    Mixed,
    Candlestick,
    BoxPlot,
    Treemap,
    RangeArea,
    Polar,
    Funnel,
    Gauge,
}

impl ChartKind {
    pub const ALL: [ChartKind; 17] = [
        ChartKind::Area,
        ChartKind::Radar,
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Donut,
        ChartKind::Scatter,
        ChartKind::Heatmap,
        ChartKind::Timeline,
        ChartKind::Mixed,
        ChartKind::Candlestick,
        ChartKind::BoxPlot,
        ChartKind::Treemap,
        ChartKind::RangeArea,
        ChartKind::Polar,
        ChartKind::Funnel,
        ChartKind::Gauge,
    ];

    /// Canonical camel-case name, as used in class tokens (`rangeArea-chart`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Radar => "radar",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Donut => "donut",
            Self::Scatter => "scatter",
            Self::Heatmap => "heatmap",
            Self::Timeline => "timeline",
            Self::Mixed => "mixed",
            Self::Candlestick => "candlestick",
            Self::BoxPlot => "boxPlot",
            Self::Treemap => "treemap",
            Self::RangeArea => "rangeArea",
            Self::Polar => "polarArea",
            Self::Funnel => "funnel",
            Self::Gauge => "gauge",
        }
    }

    /// Parses a kind name leniently: case-insensitive, ignoring `-` and `_`.
    #[must_use]
    pub fn from_name(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .flat_map(char::to_lowercase)
            .collect();
        let kind = match normalized.as_str() {
            "area" => Self::Area,
            "radar" => Self::Radar,
            "bar" | "column" => Self::Bar,
            "line" => Self::Line,
            "pie" => Self::Pie,
            "donut" | "doughnut" => Self::Donut,
            "scatter" => Self::Scatter,
            "heatmap" => Self::Heatmap,
            "timeline" | "gantt" => Self::Timeline,
            "mixed" | "combo" => Self::Mixed,
            "candlestick" => Self::Candlestick,
            "boxplot" => Self::BoxPlot,
            "treemap" => Self::Treemap,
            "rangearea" => Self::RangeArea,
            "polar" | "polararea" => Self::Polar,
            "funnel" => Self::Funnel,
            "gauge" | "radialbar" => Self::Gauge,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| ChartError::InvalidSpec(format!("unknown chart kind `{s}`")))
    }
}

impl Serialize for ChartKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ChartKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_name(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown chart kind `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::ChartKind;

    #[test]
    fn names_round_trip_through_lenient_parser() {
        for kind in ChartKind::ALL {
            assert_eq!(ChartKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn parser_ignores_case_and_separators() {
        assert_eq!(ChartKind::from_name("range-area"), Some(ChartKind::RangeArea));
        assert_eq!(ChartKind::from_name("RANGE_AREA"), Some(ChartKind::RangeArea));
        assert_eq!(ChartKind::from_name("box-plot"), Some(ChartKind::BoxPlot));
        assert_eq!(ChartKind::from_name("sparkline"), None);
    }
}
