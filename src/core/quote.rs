//! Option quote data
//!
//! Market quotes for listed options: bid/ask/last with the underlying price
//! observed at quote time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::conventions;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

/// A single option market quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Underlying symbol (e.g., "SPY")
    pub symbol: String,
    /// Expiration date
    pub expiry: NaiveDate,
    /// Strike price
    pub strike: f64,
    /// Call or put
    pub option_type: OptionType,
    /// Bid price
    pub bid: Option<f64>,
    /// Ask price
    pub ask: Option<f64>,
    /// Last traded price
    pub last: Option<f64>,
    /// Underlying spot at quote time
    pub underlying_price: f64,
    /// Quote timestamp
    pub timestamp: DateTime<Utc>,
}

impl OptionQuote {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        expiry: NaiveDate,
        strike: f64,
        option_type: OptionType,
        bid: Option<f64>,
        ask: Option<f64>,
        last: Option<f64>,
        underlying_price: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            expiry,
            strike,
            option_type,
            bid,
            ask,
            last,
            underlying_price,
            timestamp,
        }
    }

    /// Mid price, defined only when both sides are quoted and positive.
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(b), Some(a)) if b > 0.0 && a > 0.0 => Some((b + a) / 2.0),
            _ => None,
        }
    }

    /// Best usable market price: mid, falling back to the last trade.
    pub fn market_price(&self) -> Option<f64> {
        self.mid().or(self.last.filter(|p| *p > 0.0))
    }

    /// Bid-ask spread
    pub fn spread(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(b), Some(a)) => Some(a - b),
            _ => None,
        }
    }

    /// True when the bid exceeds the ask.
    pub fn is_crossed(&self) -> bool {
        matches!((self.bid, self.ask), (Some(b), Some(a)) if b > a)
    }

    /// Year fraction from the quote timestamp to expiry, Actual/365.
    pub fn time_to_expiry(&self) -> f64 {
        conventions::year_fraction(self.timestamp.date_naive(), self.expiry)
    }
}
