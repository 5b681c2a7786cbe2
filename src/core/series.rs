use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One cell of series data.
///
/// Tuples cover every compound shape the catalog uses: coordinate pairs,
/// ranges, OHLC quadruples and five-number box-plot summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesValue {
    Number(f64),
    Tuple(SmallVec<[f64; 4]>),
    Missing,
}

impl SeriesValue {
    #[must_use]
    pub fn pair(a: f64, b: f64) -> Self {
        Self::Tuple(SmallVec::from_slice(&[a, b]))
    }

    #[must_use]
    pub fn tuple(values: &[f64]) -> Self {
        Self::Tuple(SmallVec::from_slice(values))
    }

    /// Non-finite numbers count as missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Number(value) => !value.is_finite(),
            Self::Tuple(values) => values.is_empty() || values.iter().any(|v| !v.is_finite()),
            Self::Missing => true,
        }
    }

    /// Representative scalar used for plotting simplified shapes.
    ///
    /// OHLC quadruples report the close, five-number summaries the median,
    /// every other tuple its last element.
    #[must_use]
    pub fn primary(&self) -> Option<f64> {
        if self.is_missing() {
            return None;
        }
        match self {
            Self::Number(value) => Some(*value),
            Self::Tuple(values) if values.len() == 5 => Some(values[2]),
            Self::Tuple(values) => values.last().copied(),
            Self::Missing => None,
        }
    }

    /// Lowest and highest component, used for ranges and candles.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.is_missing() {
            return None;
        }
        match self {
            Self::Number(value) => Some((*value, *value)),
            Self::Tuple(values) => {
                let low = values.iter().copied().fold(f64::INFINITY, f64::min);
                let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                Some((low, high))
            }
            Self::Missing => None,
        }
    }
}

impl From<f64> for SeriesValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for SeriesValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }
}

/// Series aligned positionally with a category axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    #[serde(default)]
    pub name: Option<String>,
    pub data: Vec<SeriesValue>,
}

impl NamedSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<SeriesValue>) -> Self {
        Self {
            name: Some(name.into()),
            data,
        }
    }

    #[must_use]
    pub fn from_numbers(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(SeriesValue::Number).collect())
    }
}

/// Data point that carries its own label (treemap tiles, timeline phases).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub x: String,
    pub y: SeriesValue,
}

impl LabeledPoint {
    #[must_use]
    pub fn new(x: impl Into<String>, y: impl Into<SeriesValue>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedSeries {
    #[serde(default)]
    pub name: Option<String>,
    pub data: Vec<LabeledPoint>,
}

/// Chart data in one of its three shapes.
///
/// Deserialization tries the shapes in declaration order, so a bare array of
/// numbers is `Flat`, records with scalar/tuple data are `Named` and records
/// with `{x, y}` points are `Nested`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesData {
    Flat(Vec<SeriesValue>),
    Named(Vec<NamedSeries>),
    Nested(Vec<NestedSeries>),
}

impl Default for SeriesData {
    fn default() -> Self {
        Self::Named(Vec::new())
    }
}

impl SeriesData {
    #[must_use]
    pub fn flat(values: &[f64]) -> Self {
        Self::Flat(values.iter().copied().map(SeriesValue::Number).collect())
    }

    /// Longest data array across all series.
    #[must_use]
    pub fn max_len(&self) -> usize {
        match self {
            Self::Flat(values) => values.len(),
            Self::Named(series) => series.iter().map(|s| s.data.len()).max().unwrap_or(0),
            Self::Nested(series) => series.iter().map(|s| s.data.len()).max().unwrap_or(0),
        }
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        match self {
            Self::Flat(_) => 1,
            Self::Named(series) => series.len(),
            Self::Nested(series) => series.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_len() == 0
    }

    /// Representative values of the first series, missing cells skipped.
    #[must_use]
    pub fn first_series_primaries(&self) -> Vec<f64> {
        match self {
            Self::Flat(values) => values.iter().filter_map(SeriesValue::primary).collect(),
            Self::Named(series) => series
                .first()
                .map(|s| s.data.iter().filter_map(SeriesValue::primary).collect())
                .unwrap_or_default(),
            Self::Nested(series) => series
                .first()
                .map(|s| s.data.iter().filter_map(|p| p.y.primary()).collect())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SeriesData, SeriesValue};

    #[test]
    fn untagged_json_shapes_map_to_expected_variants() {
        let flat: SeriesData = serde_json::from_str("[44, 55, null]").expect("flat");
        assert!(matches!(flat, SeriesData::Flat(ref v) if v.len() == 3 && v[2].is_missing()));

        let named: SeriesData =
            serde_json::from_str(r#"[{"name":"Market Size","data":[1.5,[2,3]]}]"#).expect("named");
        assert!(matches!(named, SeriesData::Named(ref s) if s[0].data[1] == SeriesValue::pair(2.0, 3.0)));

        let nested: SeriesData =
            serde_json::from_str(r#"[{"data":[{"x":"R&D","y":40}]}]"#).expect("nested");
        assert!(matches!(nested, SeriesData::Nested(ref s) if s[0].name.is_none()));
    }

    #[test]
    fn primary_prefers_close_and_median() {
        assert_eq!(SeriesValue::tuple(&[1.0, 4.0, 0.5, 3.0]).primary(), Some(3.0));
        assert_eq!(SeriesValue::tuple(&[1.0, 2.0, 3.0, 4.0, 5.0]).primary(), Some(3.0));
        assert_eq!(SeriesValue::Number(f64::NAN).primary(), None);
    }
}
