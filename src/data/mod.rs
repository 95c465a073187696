//! Market data access
//!
//! The core consumes market data only through the [`MarketDataSource`]
//! trait; concrete vendor integrations live outside this crate.
//! [`mock::StaticDataSource`] is a deterministic in-memory implementation
//! for tests.

pub mod mock;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::{OptionQuote, PriceSeries, VolResult};

/// Read interface to an external market-data provider.
///
/// Implementations map upstream failures (network, rate limits, unknown
/// symbols) to [`crate::core::VolError::DataSource`], keeping them distinct
/// from this crate's computational errors.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Historical daily bars for `symbol` over `[start, end]`, inclusive.
    async fn get_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> VolResult<PriceSeries>;

    /// Current option chain for `symbol`, optionally restricted to one
    /// expiry.
    async fn get_option_chain(
        &self,
        symbol: &str,
        expiry: Option<NaiveDate>,
    ) -> VolResult<Vec<OptionQuote>>;
}

pub use mock::StaticDataSource;
