//! Core data types for the volatility analytics library
//!
//! Defines fundamental types:
//! - PricePoint / PriceSeries: OHLCV history for an underlying
//! - OptionQuote: bid/ask/last market quotes
//! - VolatilityEstimate: annualized realized-vol results
//! - OptionsSurface: implied vol + Greeks per (strike, expiry)

pub mod error;
pub mod greeks;
pub mod price;
pub mod quote;
pub mod surface;
pub mod volatility;

pub use error::*;
pub use greeks::*;
pub use price::*;
pub use quote::*;
pub use surface::*;
pub use volatility::*;
