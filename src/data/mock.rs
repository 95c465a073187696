//! In-memory market data source for testing.
//!
//! Serves fixture data registered per symbol, with configurable latency and
//! failure injection, and counts calls so tests can assert on caching
//! behavior.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::core::{OptionQuote, PriceSeries, VolError, VolResult};

use super::MarketDataSource;

/// Deterministic [`MarketDataSource`] backed by registered fixtures.
#[derive(Default)]
pub struct StaticDataSource {
    series: HashMap<String, PriceSeries>,
    chains: HashMap<String, Vec<OptionQuote>>,
    latency: Duration,
    fail_with: Option<String>,
    history_calls: AtomicUsize,
    chain_calls: AtomicUsize,
}

impl StaticDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a price history fixture.
    #[must_use]
    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.symbol().to_string(), series);
        self
    }

    /// Register an option chain fixture for `symbol`.
    #[must_use]
    pub fn with_chain(mut self, symbol: impl Into<String>, quotes: Vec<OptionQuote>) -> Self {
        self.chains.insert(symbol.into(), quotes);
        self
    }

    /// Delay every call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail every call with a `DataSource` error carrying `message`.
    #[must_use]
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Number of `get_history` calls served so far.
    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_option_chain` calls served so far.
    pub fn chain_calls(&self) -> usize {
        self.chain_calls.load(Ordering::SeqCst)
    }

    async fn simulate(&self) -> VolResult<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(msg) = &self.fail_with {
            return Err(VolError::data_source(msg.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketDataSource for StaticDataSource {
    async fn get_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> VolResult<PriceSeries> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;

        let series = self
            .series
            .get(symbol)
            .ok_or_else(|| VolError::data_source(format!("no history for symbol {symbol}")))?;

        let points = series
            .points()
            .iter()
            .filter(|p| {
                let date = p.timestamp.date_naive();
                date >= start && date <= end
            })
            .copied()
            .collect();
        PriceSeries::new(symbol, points)
    }

    async fn get_option_chain(
        &self,
        symbol: &str,
        expiry: Option<NaiveDate>,
    ) -> VolResult<Vec<OptionQuote>> {
        self.chain_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;

        let quotes = self
            .chains
            .get(symbol)
            .ok_or_else(|| VolError::data_source(format!("no option chain for symbol {symbol}")))?;

        Ok(quotes
            .iter()
            .filter(|q| expiry.map_or(true, |e| q.expiry == e))
            .cloned()
            .collect())
    }
}
