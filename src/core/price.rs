//! Price series data
//!
//! OHLCV bars for an underlying, ordered by timestamp. The series invariant
//! (strictly increasing timestamps, no duplicates) is enforced at
//! construction, so downstream estimators can assume it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{VolError, VolResult};

/// A single OHLCV bar. Immutable once recorded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricePoint {
    /// Bar timestamp (close time for daily bars)
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// True when every price field is strictly positive and high >= low.
    pub fn is_well_formed(&self) -> bool {
        self.open > 0.0 && self.high > 0.0 && self.low > 0.0 && self.close > 0.0 && self.high >= self.low
    }
}

/// Ordered price history for one symbol.
///
/// Timestamps are strictly increasing. Gaps (non-trading days) are allowed
/// and carry no return information; estimators treat consecutive bars as
/// consecutive trading periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create an empty series.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// Create a series from pre-collected bars, validating the ordering
    /// invariant.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> VolResult<Self> {
        for pair in points.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(VolError::invalid_data(format!(
                    "price series timestamps not strictly increasing at {}",
                    pair[1].timestamp
                )));
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    /// Append a bar; it must be newer than the current last bar.
    pub fn push(&mut self, point: PricePoint) -> VolResult<()> {
        if let Some(last) = self.points.last() {
            if point.timestamp <= last.timestamp {
                return Err(VolError::invalid_data(format!(
                    "out-of-order price point at {}",
                    point.timestamp
                )));
            }
        }
        self.points.push(point);
        Ok(())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The trailing `n` bars, or None when the series is shorter than `n`.
    pub fn tail(&self, n: usize) -> Option<&[PricePoint]> {
        if self.points.len() < n {
            return None;
        }
        Some(&self.points[self.points.len() - n..])
    }

    /// Closing prices in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}
