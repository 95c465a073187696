//! Implied volatility solver
//!
//! Newton-Raphson on the pricing error, seeded with the Brenner-Subrahmanyam
//! approximation, falling back to bisection over a bounded vol range when the
//! Newton step degenerates (vega ≈ 0 deep OTM / near expiry, non-finite or
//! out-of-bounds steps).
//!
//! Non-convergence within the iteration budget is not an error: the solver
//! returns its best-effort vol with `converged = false` and the residual
//! pricing error, so surface construction still gets a (flagged) point.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{OptionQuote, OptionType, VolError, VolResult};
use crate::models::black_scholes::PricingModel;

/// Solver tuning knobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Absolute pricing-error tolerance in currency units
    pub price_tolerance: f64,
    /// Iteration budget shared by the Newton and bisection phases
    pub max_iterations: u32,
    /// Lower vol bound
    pub min_vol: f64,
    /// Upper vol bound
    pub max_vol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            price_tolerance: 1e-4,
            max_iterations: 100,
            min_vol: 1e-4,
            max_vol: 5.0,
        }
    }
}

/// Outcome of one implied-vol solve. Owned by the caller; nothing is cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpliedVolResult {
    /// Underlying symbol of the solved quote
    pub symbol: String,
    pub strike: f64,
    pub expiry: NaiveDate,
    pub option_type: OptionType,
    /// Annualized implied volatility (fraction)
    pub implied_vol: f64,
    /// Iterations consumed across both phases
    pub iterations: u32,
    /// False when the budget ran out before the pricing tolerance was met
    pub converged: bool,
    /// Model price minus target price at the returned vol
    pub price_error: f64,
}

/// Solve for the volatility implied by `quote` with default tuning.
pub fn solve(
    quote: &OptionQuote,
    underlying: f64,
    rate: f64,
    model: &PricingModel,
) -> VolResult<ImpliedVolResult> {
    solve_with(quote, underlying, rate, model, &SolverConfig::default())
}

/// Solve for the volatility implied by `quote`.
///
/// The target price is the mid when both sides are quoted and positive,
/// else the last trade. Time to expiry is the Actual/365 year fraction from
/// the quote timestamp.
///
/// # Errors
/// - `InvalidQuote` for a crossed market, no usable price, or a
///   non-positive strike
/// - `ExpiredOption` when expiry is not after the quote timestamp
/// - `InvalidParameter` for a non-positive underlying price
pub fn solve_with(
    quote: &OptionQuote,
    underlying: f64,
    rate: f64,
    model: &PricingModel,
    config: &SolverConfig,
) -> VolResult<ImpliedVolResult> {
    if underlying <= 0.0 {
        return Err(VolError::invalid_parameter(format!(
            "underlying price must be positive, got {underlying}"
        )));
    }
    if quote.strike <= 0.0 {
        return Err(VolError::invalid_quote(format!(
            "strike must be positive, got {}",
            quote.strike
        )));
    }
    if quote.is_crossed() {
        return Err(VolError::invalid_quote(format!(
            "crossed market: bid {:?} > ask {:?}",
            quote.bid, quote.ask
        )));
    }
    let target = quote
        .market_price()
        .ok_or_else(|| VolError::invalid_quote("no usable market price (bid/ask/last all zero or missing)"))?;

    let time = quote.time_to_expiry();
    if time <= 0.0 {
        return Err(VolError::ExpiredOption {
            expiry: quote.expiry,
            as_of: quote.timestamp.date_naive(),
        });
    }

    // Brenner-Subrahmanyam ATM approximation as the starting point
    let seed = ((2.0 * std::f64::consts::PI / time).sqrt() * target / underlying)
        .clamp(config.min_vol, config.max_vol);

    let mut vol = seed;
    let mut iterations = 0u32;

    while iterations < config.max_iterations {
        iterations += 1;

        let price = model.price(underlying, quote.strike, rate, vol, time, quote.option_type);
        let error = price - target;
        if error.abs() < config.price_tolerance {
            return Ok(result(quote, vol, iterations, true, error));
        }

        let vega = model.vega(underlying, quote.strike, rate, vol, time);
        if vega < 1e-10 {
            break; // Newton step unusable, switch to bisection
        }

        let next = vol - error / vega;
        if !next.is_finite() || next <= config.min_vol || next >= config.max_vol {
            break;
        }
        vol = next;
    }

    bisect(quote, underlying, rate, model, config, target, time, iterations)
}

/// Bisection over [min_vol, max_vol]; consumes the remaining iteration
/// budget. Model price is monotonically increasing in vol.
#[allow(clippy::too_many_arguments)]
fn bisect(
    quote: &OptionQuote,
    underlying: f64,
    rate: f64,
    model: &PricingModel,
    config: &SolverConfig,
    target: f64,
    time: f64,
    mut iterations: u32,
) -> VolResult<ImpliedVolResult> {
    let mut low = config.min_vol;
    let mut high = config.max_vol;
    let mut mid = 0.5 * (low + high);

    while iterations < config.max_iterations {
        iterations += 1;

        mid = 0.5 * (low + high);
        let price = model.price(underlying, quote.strike, rate, mid, time, quote.option_type);
        let error = price - target;

        if error.abs() < config.price_tolerance {
            return Ok(result(quote, mid, iterations, true, error));
        }
        if error > 0.0 {
            high = mid;
        } else {
            low = mid;
        }

        if high - low < 1e-9 {
            // Interval exhausted: the target is unattainable within the vol
            // bounds (e.g. price below intrinsic). Degraded result.
            break;
        }
    }

    let price = model.price(underlying, quote.strike, rate, mid, time, quote.option_type);
    Ok(result(quote, mid, iterations, false, price - target))
}

fn result(
    quote: &OptionQuote,
    vol: f64,
    iterations: u32,
    converged: bool,
    price_error: f64,
) -> ImpliedVolResult {
    ImpliedVolResult {
        symbol: quote.symbol.clone(),
        strike: quote.strike,
        expiry: quote.expiry,
        option_type: quote.option_type,
        implied_vol: vol,
        iterations,
        converged,
        price_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    const MODEL: PricingModel = PricingModel::BlackScholes { dividend_yield: 0.0 };

    fn quote_at(
        strike: f64,
        days_to_expiry: i64,
        option_type: OptionType,
        bid: Option<f64>,
        ask: Option<f64>,
    ) -> OptionQuote {
        let ts = Utc.with_ymd_and_hms(2025, 8, 20, 15, 30, 0).unwrap();
        let expiry = ts.date_naive() + chrono::Duration::days(days_to_expiry);
        OptionQuote::new("SPY", expiry, strike, option_type, bid, ask, None, 100.0, ts)
    }

    fn priced_quote(strike: f64, days: i64, option_type: OptionType, vol: f64) -> OptionQuote {
        let mut q = quote_at(strike, days, option_type, None, None);
        let price = MODEL.price(100.0, strike, 0.05, vol, days as f64 / 365.0, option_type);
        q.bid = Some(price);
        q.ask = Some(price);
        q
    }

    #[test]
    fn test_round_trip_recovers_vol() {
        for &(strike, days, vol) in &[
            (100.0, 180, 0.25),
            (90.0, 90, 0.30),
            (110.0, 365, 0.18),
        ] {
            let q = priced_quote(strike, days, OptionType::Call, vol);
            let res = solve(&q, 100.0, 0.05, &MODEL).unwrap();
            assert!(res.converged);
            assert_abs_diff_eq!(res.implied_vol, vol, epsilon = 1e-3);
            assert!(res.price_error.abs() < 1e-4);
        }
    }

    #[test]
    fn test_put_round_trip() {
        let q = priced_quote(95.0, 120, OptionType::Put, 0.35);
        let res = solve(&q, 100.0, 0.05, &MODEL).unwrap();
        assert!(res.converged);
        assert_abs_diff_eq!(res.implied_vol, 0.35, epsilon = 1e-3);
    }

    #[test]
    fn test_atm_30_day_scenario_converges() {
        // bid 4.95 / ask 5.05 -> mid 5.0, S = K = 100, 30 days, r = 5%
        let q = quote_at(100.0, 30, OptionType::Call, Some(4.95), Some(5.05));
        let res = solve(&q, 100.0, 0.05, &MODEL).unwrap();
        assert!(res.converged);
        assert!(res.iterations <= 100);
        assert!(res.implied_vol > 0.0);
        // Model reprices the mid to tolerance
        let price = MODEL.price(100.0, 100.0, 0.05, res.implied_vol, 30.0 / 365.0, OptionType::Call);
        assert_abs_diff_eq!(price, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_crossed_market_rejected() {
        let q = quote_at(100.0, 30, OptionType::Call, Some(5.0), Some(4.0));
        let err = solve(&q, 100.0, 0.05, &MODEL);
        assert!(matches!(err, Err(VolError::InvalidQuote(_))));
    }

    #[test]
    fn test_empty_quote_rejected() {
        let q = quote_at(100.0, 30, OptionType::Call, Some(0.0), Some(0.0));
        let err = solve(&q, 100.0, 0.05, &MODEL);
        assert!(matches!(err, Err(VolError::InvalidQuote(_))));

        let q = quote_at(100.0, 30, OptionType::Call, None, None);
        let err = solve(&q, 100.0, 0.05, &MODEL);
        assert!(matches!(err, Err(VolError::InvalidQuote(_))));
    }

    #[test]
    fn test_expired_option_rejected() {
        let q = quote_at(100.0, 0, OptionType::Call, Some(4.95), Some(5.05));
        let err = solve(&q, 100.0, 0.05, &MODEL);
        assert!(matches!(err, Err(VolError::ExpiredOption { .. })));

        let q = quote_at(100.0, -30, OptionType::Call, Some(4.95), Some(5.05));
        assert!(matches!(
            solve(&q, 100.0, 0.05, &MODEL),
            Err(VolError::ExpiredOption { .. })
        ));
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        let q = quote_at(100.0, 30, OptionType::Call, Some(4.95), Some(5.05));
        assert!(matches!(
            solve(&q, 0.0, 0.05, &MODEL),
            Err(VolError::InvalidParameter(_))
        ));

        let q = quote_at(-5.0, 30, OptionType::Call, Some(4.95), Some(5.05));
        assert!(matches!(
            solve(&q, 100.0, 0.05, &MODEL),
            Err(VolError::InvalidQuote(_))
        ));
    }

    #[test]
    fn test_unattainable_price_degrades_not_errors() {
        // Mid far below intrinsic: no vol in range can match it
        let q = quote_at(50.0, 30, OptionType::Call, Some(1.0), Some(1.0));
        let res = solve(&q, 100.0, 0.05, &MODEL).unwrap();
        assert!(!res.converged);
        assert!(res.price_error.abs() > 1.0);
        assert!(res.iterations <= 100);
    }

    #[test]
    fn test_deep_otm_falls_back_to_bisection() {
        // Deep OTM short-dated: tiny vega kills the Newton step, bisection
        // still pins the price
        let vol = 0.60;
        let q = priced_quote(160.0, 20, OptionType::Call, vol);
        let res = solve(&q, 100.0, 0.05, &MODEL).unwrap();
        assert!(res.price_error.abs() < 1e-4 || !res.converged);
        if res.converged {
            assert_abs_diff_eq!(res.implied_vol, vol, epsilon = 0.05);
        }
    }

    #[test]
    fn test_one_sided_quote_uses_last_trade() {
        let mut q = quote_at(100.0, 180, OptionType::Call, None, None);
        let price = MODEL.price(100.0, 100.0, 0.05, 0.22, 180.0 / 365.0, OptionType::Call);
        q.last = Some(price);
        let res = solve(&q, 100.0, 0.05, &MODEL).unwrap();
        assert!(res.converged);
        assert_abs_diff_eq!(res.implied_vol, 0.22, epsilon = 1e-3);
    }
}
