//! Control-limit models for G, T and I charts.
//!
//! Each model maps an observation sequence to a centre line and upper/lower
//! control limits. The lower limit is clamped at zero for every model.
//!
//! Empty input is handled per model and deliberately not unified:
//! - G: mean of nothing is undefined, so callers must check for emptiness and
//!   the model reports [`LimitError::NoObservations`] instead of NaN. A
//!   negative mean has no square root either and is reported as
//!   [`LimitError::NegativeMean`].
//! - T: returns the zero triple.
//! - I: returns the zero triple for fewer than two observations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bias-correction constant d2 for moving ranges of subgroup size 2.
pub const D2_SUBGROUP_2: f64 = 1.128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChartType {
    #[default]
    #[serde(rename = "GChart")]
    G,
    #[serde(rename = "TChart")]
    T,
    #[serde(rename = "IChart")]
    I,
}

impl ChartType {
    pub const ALL: [ChartType; 3] = [ChartType::G, ChartType::T, ChartType::I];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::G => "GChart",
            ChartType::T => "TChart",
            ChartType::I => "IChart",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = LimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| LimitError::UnknownChartType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LimitError {
    #[error("{0} limits need at least one observation")]
    NoObservations(ChartType),
    #[error("{chart_type} limits need a non-negative mean, got {mean}")]
    NegativeMean { chart_type: ChartType, mean: f64 },
    #[error("unknown chart type `{0}`")]
    UnknownChartType(String),
}

/// Centre line with upper and lower control limits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartLimits {
    pub cl: f64,
    pub ucl: f64,
    pub lcl: f64,
}

impl ChartLimits {
    pub const ZERO: ChartLimits = ChartLimits {
        cl: 0.0,
        ucl: 0.0,
        lcl: 0.0,
    };

    fn around(cl: f64, half_width: f64) -> Self {
        Self {
            cl,
            ucl: cl + half_width,
            lcl: (cl - half_width).max(0.0),
        }
    }
}

pub fn calculate_limits(kind: ChartType, values: &[f64]) -> Result<ChartLimits, LimitError> {
    match kind {
        ChartType::G => g_chart_limits(values),
        ChartType::T => Ok(t_chart_limits(values)),
        ChartType::I => Ok(i_chart_limits(values)),
    }
}

pub fn g_chart_limits(values: &[f64]) -> Result<ChartLimits, LimitError> {
    if values.is_empty() {
        return Err(LimitError::NoObservations(ChartType::G));
    }
    let cl = mean(values);
    if cl < 0.0 {
        return Err(LimitError::NegativeMean {
            chart_type: ChartType::G,
            mean: cl,
        });
    }
    Ok(ChartLimits::around(cl, 3.0 * cl.sqrt()))
}

pub fn t_chart_limits(values: &[f64]) -> ChartLimits {
    if values.is_empty() {
        return ChartLimits::ZERO;
    }
    let cl = mean(values);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    ChartLimits::around(cl, 0.5 * (max - min))
}

pub fn i_chart_limits(values: &[f64]) -> ChartLimits {
    if values.len() < 2 {
        return ChartLimits::ZERO;
    }
    let cl = mean(values);
    let moving_ranges: Vec<f64> = values
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .collect();
    let sigma = mean(&moving_ranges) / D2_SUBGROUP_2;
    ChartLimits::around(cl, 3.0 * sigma)
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}
