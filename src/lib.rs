//! # vol-core
//!
//! Volatility and options analytics core for a trading-journal backend.
//!
//! ## Overview
//!
//! Three pure computation engines behind one service facade:
//!
//! - **Historical volatility**: annualized realized vol over OHLC windows
//!   (close-to-close, Parkinson, Garman-Klass estimators)
//! - **Implied volatility**: Newton-Raphson solver with bisection fallback
//!   over Black-Scholes European pricing
//! - **Chain analysis**: per-(strike, expiry) implied vol and Greeks
//!   assembled into a surface, solved in parallel
//!
//! ## Key Components
//!
//! - **Data Access**: the [`data::MarketDataSource`] trait; vendor
//!   integrations live outside this crate
//! - **Core Types**: price series, option quotes, estimates, surfaces
//! - **Models**: pricing, estimators, solver, chain analyzer, indicators
//! - **Service**: [`service::VolatilityService`] with a single-flight
//!   historical-vol cache and per-request source timeouts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vol_core::prelude::*;
//!
//! # async fn run(source: Arc<StaticDataSource>) -> VolResult<()> {
//! let service = VolatilityService::new(source);
//!
//! // Realized vol: 20-day close-to-close, cached until tomorrow
//! let hv = service
//!     .get_historical_volatility("SPY", 20, Estimator::CloseToClose)
//!     .await?;
//! println!("20d HV: {:.1}%", hv.value * 100.0);
//!
//! // Implied-vol surface across all listed expiries
//! let surface = service.get_options_surface("SPY", None).await?;
//! for point in &surface.points {
//!     println!("{} {}: {:.1}%", point.expiry, point.strike, point.implied_vol * 100.0);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## What This Crate Does
//!
//! - Computes realized and implied volatility with documented conventions
//!   (Actual/365 day count, 252-period annualization)
//! - Derives Greeks analytically from the same model as the solved vol
//! - Degrades gracefully: unusable quotes are excluded and tallied,
//!   non-converged solves are flagged, never silently dropped
//!
//! ## What This Crate Does NOT Do
//!
//! - Talk to market-data vendors (bring a [`data::MarketDataSource`])
//! - Persist anything (estimates and surfaces are request-scoped values)
//! - Serve HTTP or render UI (that is the surrounding application's job)

pub mod conventions;
pub mod core;
pub mod data;
pub mod models;
pub mod service;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        Estimator, Greeks, OptionQuote, OptionType, OptionsSurface, PricePoint, PriceSeries,
        SampleQuality, SurfaceDiagnostics, SurfacePoint, VolError, VolResult, VolatilityEstimate,
    };

    // Data access
    pub use crate::data::{MarketDataSource, StaticDataSource};

    // Models
    pub use crate::models::{
        build_surface,
        build_surface_with,
        estimate,
        rolling,
        solve,
        solve_with,
        ImpliedVolResult,
        PricingModel,
        SolverConfig,
        VolatilityAnalysis,
    };

    // Service
    pub use crate::service::{CacheConfig, ServiceConfig, VolatilityService};
}

// Re-export main types at crate root
pub use crate::core::{VolError, VolResult};
pub use crate::service::VolatilityService;
