//! Volatility indicators
//!
//! Rank and percentile of the current value within a volatility series,
//! plus the combined chart payload served to journal clients: the rolling
//! realized-vol series with the indicator summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::Estimator;

/// One chart row: date and the rolling vol at that date (None until the
/// window fills).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolPoint {
    pub date: NaiveDate,
    pub vol: Option<f64>,
}

/// Rolling realized-vol chart data plus range indicators for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityAnalysis {
    pub symbol: String,
    pub method: Estimator,
    pub window: usize,
    /// Per-date rolling volatility, aligned with the fetched history
    pub series: Vec<VolPoint>,
    /// Latest defined value in the series
    pub current: Option<f64>,
    /// Position of the current value in the observed range, 0-100
    pub rank: Option<f64>,
    /// Share of observations below the current value, 0-100
    pub percentile: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl VolatilityAnalysis {
    /// Assemble the analysis from an aligned rolling-vol series.
    pub fn from_series(
        symbol: impl Into<String>,
        method: Estimator,
        window: usize,
        dates: Vec<NaiveDate>,
        values: Vec<Option<f64>>,
    ) -> Self {
        let defined: Vec<f64> = values.iter().flatten().copied().collect();
        let series = dates
            .into_iter()
            .zip(values)
            .map(|(date, vol)| VolPoint { date, vol })
            .collect();

        Self {
            symbol: symbol.into(),
            method,
            window,
            series,
            current: defined.last().copied(),
            rank: vol_rank(&defined),
            percentile: vol_percentile(&defined),
            high: max(&defined),
            low: min(&defined),
        }
    }
}

/// Rank of the latest value within the series range:
/// `(current - low) / (high - low) * 100`, 0 when the range is degenerate.
pub fn vol_rank(series: &[f64]) -> Option<f64> {
    let current = *series.last()?;
    let high = max(series)?;
    let low = min(series)?;
    if high - low > 0.0 {
        Some((current - low) / (high - low) * 100.0)
    } else {
        Some(0.0)
    }
}

/// Share of observations strictly below the latest value, as a percentage.
pub fn vol_percentile(series: &[f64]) -> Option<f64> {
    let current = *series.last()?;
    let below = series.iter().filter(|v| **v < current).count();
    Some(below as f64 / series.len() as f64 * 100.0)
}

fn max(series: &[f64]) -> Option<f64> {
    series.iter().copied().reduce(f64::max)
}

fn min(series: &[f64]) -> Option<f64> {
    series.iter().copied().reduce(f64::min)
}
