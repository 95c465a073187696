//! Volatility computation
//!
//! Implements:
//! - Black-Scholes pricing and analytic Greeks
//! - Historical (realized) volatility estimators
//! - Implied volatility solver (Newton-Raphson with bisection fallback)
//! - Options chain analysis into an implied-vol surface
//! - Rank/percentile volatility indicators

pub mod black_scholes;
pub mod chain;
pub mod historical;
pub mod implied;
pub mod indicators;

pub use black_scholes::*;
pub use chain::*;
pub use historical::*;
pub use implied::*;
pub use indicators::*;
