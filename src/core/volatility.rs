//! Volatility estimate types
//!
//! The estimator set is a fixed piece of domain knowledge, so it is a closed
//! enum rather than open-ended dispatch; estimates record which method and
//! window produced them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Realized-volatility estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Estimator {
    /// Standard deviation of close-to-close log returns.
    CloseToClose,
    /// High/low range estimator (Parkinson 1980). Assumes no drift; more
    /// efficient than close-to-close on small samples.
    Parkinson,
    /// OHLC estimator (Garman-Klass 1980). Captures intraday drift and
    /// open/close jumps.
    GarmanKlass,
}

impl Estimator {
    pub fn name(&self) -> &'static str {
        match self {
            Estimator::CloseToClose => "close-to-close",
            Estimator::Parkinson => "parkinson",
            Estimator::GarmanKlass => "garman-klass",
        }
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sample-size quality flag attached to an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleQuality {
    Normal,
    /// Window below 10 periods; estimator variance is high.
    SmallSample,
}

/// An annualized realized-volatility estimate. Produced once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityEstimate {
    /// Annualized volatility as a fraction (0.23 = 23%)
    pub value: f64,
    /// Estimator that produced the value
    pub method: Estimator,
    /// Window length in return periods
    pub window: usize,
    /// Timestamp of the last bar consumed
    pub as_of: DateTime<Utc>,
    /// Sample-size quality flag
    pub quality: SampleQuality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimator_names() {
        assert_eq!(Estimator::CloseToClose.name(), "close-to-close");
        assert_eq!(format!("{}", Estimator::GarmanKlass), "garman-klass");
    }

    #[test]
    fn test_estimator_usable_as_map_key() {
        use std::collections::HashMap;
        let mut m = HashMap::new();
        m.insert(Estimator::Parkinson, 0.2);
        assert_eq!(m.get(&Estimator::Parkinson), Some(&0.2));
    }
}
