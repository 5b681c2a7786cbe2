use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{NamedSeries, SeriesData, SeriesValue};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioView {
    #[default]
    Absolute,
    /// Growth of each period relative to the base branch's first period, in %.
    Percentage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMultipliers {
    pub conservative: f64,
    pub base: f64,
    pub aggressive: f64,
}

impl Default for ScenarioMultipliers {
    fn default() -> Self {
        Self {
            conservative: 0.7,
            base: 1.0,
            aggressive: 1.5,
        }
    }
}

/// Data-shaping request. Plain data only, so it can cross a worker boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ComputeJob {
    Smooth {
        values: Vec<f64>,
    },
    GrowthRates {
        values: Vec<f64>,
    },
    Cagr {
        start: f64,
        end: f64,
        years: f64,
    },
    Scenario {
        base: Vec<f64>,
        #[serde(default)]
        view: ScenarioView,
        #[serde(default)]
        multipliers: ScenarioMultipliers,
    },
    Aggregate {
        values: Vec<f64>,
    },
}

impl ComputeJob {
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Smooth { .. } => "smooth",
            Self::GrowthRates { .. } => "growthRates",
            Self::Cagr { .. } => "cagr",
            Self::Scenario { .. } => "scenario",
            Self::Aggregate { .. } => "aggregate",
        }
    }

    /// Runs the job on the calling thread.
    pub fn run(&self) -> ChartResult<ComputeOutput> {
        match self {
            Self::Smooth { values } => Ok(ComputeOutput::Series(smooth(values))),
            Self::GrowthRates { values } => Ok(ComputeOutput::Rates(growth_rates(values))),
            Self::Cagr { start, end, years } => {
                cagr(*start, *end, *years).map(ComputeOutput::Scalar)
            }
            Self::Scenario {
                base,
                view,
                multipliers,
            } => shape_scenarios(base, *view, *multipliers).map(ComputeOutput::Scenarios),
            Self::Aggregate { values } => aggregate(values).map(ComputeOutput::Summary),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    pub view: ScenarioView,
    pub conservative: Vec<f64>,
    pub base: Vec<f64>,
    pub aggressive: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ComputeOutput {
    Series(Vec<f64>),
    Rates(Vec<Option<f64>>),
    Scalar(f64),
    Scenarios(ScenarioSet),
    Summary(AggregateSummary),
}

impl ComputeOutput {
    /// Chart-ready series for outputs that have one; scalars and summaries
    /// have no series shape.
    #[must_use]
    pub fn into_series_data(self, name: &str) -> Option<SeriesData> {
        match self {
            Self::Series(values) => Some(SeriesData::Named(vec![NamedSeries::from_numbers(
                name, &values,
            )])),
            Self::Rates(rates) => Some(SeriesData::Named(vec![NamedSeries::new(
                name,
                rates.into_iter().map(SeriesValue::from).collect(),
            )])),
            Self::Scenarios(set) => Some(SeriesData::Named(vec![
                NamedSeries::from_numbers("Conservative", &set.conservative),
                NamedSeries::from_numbers("Base", &set.base),
                NamedSeries::from_numbers("Aggressive", &set.aggressive),
            ])),
            Self::Scalar(_) | Self::Summary(_) => None,
        }
    }
}

/// 3-point moving average; the first and last points are left untouched.
#[must_use]
pub fn smooth(values: &[f64]) -> Vec<f64> {
    if values.len() < 3 {
        return values.to_vec();
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(values[0]);
    out.extend(
        values
            .windows(3)
            .map(|window| (window[0] + window[1] + window[2]) / 3.0),
    );
    out.push(values[values.len() - 1]);
    out
}

/// Period-over-period growth in percent. The first period and periods
/// following a zero value have no rate.
#[must_use]
pub fn growth_rates(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(values.windows(2).map(|pair| {
        let (previous, current) = (pair[0], pair[1]);
        if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
            None
        } else {
            Some((current - previous) / previous * 100.0)
        }
    }));
    out
}

/// Compound annual growth rate between two endpoints, in percent.
pub fn cagr(start: f64, end: f64, years: f64) -> ChartResult<f64> {
    if !start.is_finite() || start <= 0.0 {
        return Err(ChartError::JobFailed(
            "cagr start value must be finite and > 0".to_owned(),
        ));
    }
    if !end.is_finite() || end < 0.0 {
        return Err(ChartError::JobFailed(
            "cagr end value must be finite and >= 0".to_owned(),
        ));
    }
    if !years.is_finite() || years <= 0.0 {
        return Err(ChartError::JobFailed(
            "cagr duration must be finite and > 0".to_owned(),
        ));
    }
    Ok(((end / start).powf(1.0 / years) - 1.0) * 100.0)
}

pub fn shape_scenarios(
    base: &[f64],
    view: ScenarioView,
    multipliers: ScenarioMultipliers,
) -> ChartResult<ScenarioSet> {
    let scaled = |factor: f64| base.iter().map(|v| v * factor).collect::<Vec<f64>>();
    let absolute = [
        scaled(multipliers.conservative),
        scaled(multipliers.base),
        scaled(multipliers.aggressive),
    ];

    let [conservative, base, aggressive] = match view {
        ScenarioView::Absolute => absolute,
        ScenarioView::Percentage => {
            let reference = percentage_reference(&absolute[1])?;
            absolute.map(|series| {
                series
                    .iter()
                    .map(|v| (v / reference - 1.0) * 100.0)
                    .collect()
            })
        }
    };

    Ok(ScenarioSet {
        view,
        conservative,
        base,
        aggressive,
    })
}

/// First period of the base branch; every branch is measured against it.
fn percentage_reference(base_branch: &[f64]) -> ChartResult<f64> {
    match base_branch.first() {
        None => Ok(1.0),
        Some(&first) if first != 0.0 && first.is_finite() => Ok(first),
        Some(_) => Err(ChartError::JobFailed(
            "percentage view requires a finite, non-zero first base period".to_owned(),
        )),
    }
}

pub fn aggregate(values: &[f64]) -> ChartResult<AggregateSummary> {
    if values.is_empty() {
        return Err(ChartError::JobFailed(
            "aggregate requires at least one value".to_owned(),
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ChartError::JobFailed(
            "aggregate values must be finite".to_owned(),
        ));
    }

    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort_unstable();
    let count = sorted.len();
    let median = if count % 2 == 1 {
        sorted[count / 2].0
    } else {
        (sorted[count / 2 - 1].0 + sorted[count / 2].0) / 2.0
    };
    let sum: f64 = values.iter().sum();

    Ok(AggregateSummary {
        count,
        sum,
        mean: sum / count as f64,
        min: sorted[0].0,
        max: sorted[count - 1].0,
        median,
    })
}
