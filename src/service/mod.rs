//! Volatility service facade
//!
//! The single entry point surrounding layers call. Composes the data source
//! with the historical engine, the implied-vol solver, and the chain
//! analyzer; applies per-request timeouts to the source, caches historical
//! estimates (single-flight), and logs fetches. Computational errors pass
//! through unchanged; source failures and timeouts surface as `DataSource`.

pub mod cache;

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tokio::time::timeout;

use crate::core::{Estimator, OptionQuote, OptionsSurface, PriceSeries, VolError, VolResult, VolatilityEstimate};
use crate::data::MarketDataSource;
use crate::models::black_scholes::PricingModel;
use crate::models::implied::SolverConfig;
use crate::models::indicators::VolatilityAnalysis;
use crate::models::{chain, historical};
use crate::conventions::TRADING_DAYS_PER_YEAR;

pub use cache::{CacheConfig, HvCache, HvKey};

/// Service tuning knobs.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Risk-free rate used for implied-vol extraction
    pub risk_free_rate: f64,
    /// Flat dividend yield for the pricing model
    pub dividend_yield: f64,
    /// Annualization factor for realized vol (trading periods per year)
    pub annualization: f64,
    /// Calendar days of history fetched for realized-vol requests
    pub history_days: i64,
    /// Per-request timeout on data source calls
    pub source_timeout: Duration,
    /// Historical-vol cache settings
    pub cache: CacheConfig,
    /// Implied-vol solver settings
    pub solver: SolverConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
            annualization: TRADING_DAYS_PER_YEAR,
            history_days: 365,
            source_timeout: Duration::from_secs(10),
            cache: CacheConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}

/// Facade over the volatility analytics core.
///
/// Stateless apart from the historical-vol cache; safe to share across
/// request handlers behind an `Arc`.
pub struct VolatilityService<S: MarketDataSource> {
    source: Arc<S>,
    config: ServiceConfig,
    hv_cache: HvCache,
}

impl<S: MarketDataSource> VolatilityService<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_config(source, ServiceConfig::default())
    }

    pub fn with_config(source: Arc<S>, config: ServiceConfig) -> Self {
        let hv_cache = HvCache::new(config.cache.clone());
        Self {
            source,
            config,
            hv_cache,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Annualized realized volatility for `symbol` over the trailing
    /// `window` periods.
    ///
    /// Cached per (symbol, window, method, as-of date); concurrent requests
    /// for the same key share one computation. Realized vol for a closed
    /// trading day never changes, so a hit is bit-identical to the first
    /// computation.
    pub async fn get_historical_volatility(
        &self,
        symbol: &str,
        window: usize,
        method: Estimator,
    ) -> VolResult<VolatilityEstimate> {
        let as_of = Utc::now().date_naive();
        let key = HvKey {
            symbol: symbol.to_string(),
            window,
            method,
            as_of,
        };

        self.hv_cache
            .get_or_compute(key, || async move {
                let series = self.fetch_history(symbol, as_of).await?;
                historical::estimate(&series, window, method, self.config.annualization)
            })
            .await
    }

    /// Implied-vol surface for `symbol`, optionally restricted to one
    /// expiry.
    ///
    /// Not cached: option quotes are live and staleness is unacceptable.
    /// Spot is taken from the most recent quote's underlying price.
    pub async fn get_options_surface(
        &self,
        symbol: &str,
        expiry: Option<NaiveDate>,
    ) -> VolResult<OptionsSurface> {
        let quotes = self.fetch_chain(symbol, expiry).await?;
        let spot = quotes
            .iter()
            .max_by_key(|q| q.timestamp)
            .map(|q| q.underlying_price)
            .ok_or_else(|| {
                VolError::data_source(format!("no option quotes returned for {symbol}"))
            })?;

        let model = PricingModel::BlackScholes {
            dividend_yield: self.config.dividend_yield,
        };
        let rate = self.config.risk_free_rate;
        let solver = self.config.solver;

        // The fan-out is CPU-bound (rayon); keep it off the async workers.
        let surface = tokio::task::spawn_blocking(move || {
            chain::build_surface_with(&quotes, spot, rate, &model, &solver)
        })
        .await
        .map_err(|e| VolError::invalid_data(format!("surface build task failed: {e}")))??;

        tracing::info!(
            symbol,
            points = surface.len(),
            invalid = surface.diagnostics.invalid_quotes,
            expired = surface.diagnostics.expired,
            "built options surface"
        );
        Ok(surface)
    }

    /// Rolling realized-vol chart series with rank/percentile indicators.
    ///
    /// Request-scoped; not cached.
    pub async fn get_volatility_analysis(
        &self,
        symbol: &str,
        window: usize,
        method: Estimator,
    ) -> VolResult<VolatilityAnalysis> {
        let as_of = Utc::now().date_naive();
        let series = self.fetch_history(symbol, as_of).await?;
        let values = historical::rolling(&series, window, method, self.config.annualization)?;
        let dates = series
            .points()
            .iter()
            .map(|p| p.timestamp.date_naive())
            .collect();
        Ok(VolatilityAnalysis::from_series(
            symbol, method, window, dates, values,
        ))
    }

    async fn fetch_history(&self, symbol: &str, as_of: NaiveDate) -> VolResult<PriceSeries> {
        let start = as_of - chrono::Duration::days(self.config.history_days);
        tracing::info!(symbol, %start, %as_of, "fetching price history");
        timeout(
            self.config.source_timeout,
            self.source.get_history(symbol, start, as_of),
        )
        .await
        .map_err(|_| VolError::data_source(format!("history request for {symbol} timed out")))?
    }

    async fn fetch_chain(
        &self,
        symbol: &str,
        expiry: Option<NaiveDate>,
    ) -> VolResult<Vec<OptionQuote>> {
        tracing::info!(symbol, ?expiry, "fetching option chain");
        timeout(
            self.config.source_timeout,
            self.source.get_option_chain(symbol, expiry),
        )
        .await
        .map_err(|_| VolError::data_source(format!("option chain request for {symbol} timed out")))?
    }
}
