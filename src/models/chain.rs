//! Options chain analysis
//!
//! Builds an [`OptionsSurface`] from a set of raw quotes: dedup by
//! (strike, expiry) with the latest timestamp winning, per-quote implied-vol
//! solves fanned out across the rayon pool, Greeks derived analytically from
//! the same model at the solved vol, and a deterministic (expiry, strike)
//! ordering of the result.
//!
//! Quotes rejected for unusable prices or stale expiries are excluded and
//! tallied, never fatal to the surface; any other error aborts the build.

use chrono::Utc;
use rayon::prelude::*;

use crate::core::{
    OptionQuote, OptionsSurface, SurfaceDiagnostics, SurfacePoint, VolError, VolResult,
};
use crate::models::black_scholes::PricingModel;
use crate::models::implied::{self, SolverConfig};

/// Per-quote outcome inside the fan-out.
enum Outcome {
    Point(SurfacePoint),
    InvalidQuote,
    Expired,
}

/// Build an implied-vol surface from `quotes` with default solver tuning.
pub fn build_surface(
    quotes: &[OptionQuote],
    spot: f64,
    rate: f64,
    model: &PricingModel,
) -> VolResult<OptionsSurface> {
    build_surface_with(quotes, spot, rate, model, &SolverConfig::default())
}

/// Build an implied-vol surface from `quotes`.
///
/// Thread-safe and pure; solves are independent per quote and the output
/// ordering does not depend on completion order.
pub fn build_surface_with(
    quotes: &[OptionQuote],
    spot: f64,
    rate: f64,
    model: &PricingModel,
    solver: &SolverConfig,
) -> VolResult<OptionsSurface> {
    let deduped = dedup_latest(quotes);

    let underlying = quotes
        .first()
        .map(|q| q.symbol.clone())
        .unwrap_or_default();
    let as_of = quotes
        .iter()
        .map(|q| q.timestamp)
        .max()
        .unwrap_or_else(Utc::now);

    let outcomes: Vec<Outcome> = deduped
        .par_iter()
        .map(|quote| solve_one(quote, spot, rate, model, solver))
        .collect::<VolResult<Vec<_>>>()?;

    let mut diagnostics = SurfaceDiagnostics::default();
    let mut points = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Outcome::Point(p) => {
                if p.converged {
                    diagnostics.solved += 1;
                } else {
                    diagnostics.unconverged += 1;
                }
                points.push(p);
            }
            Outcome::InvalidQuote => diagnostics.invalid_quotes += 1,
            Outcome::Expired => diagnostics.expired += 1,
        }
    }

    points.sort_by(|a, b| a.expiry.cmp(&b.expiry).then(a.strike.total_cmp(&b.strike)));

    Ok(OptionsSurface {
        underlying,
        spot,
        as_of,
        points,
        diagnostics,
    })
}

fn solve_one(
    quote: &OptionQuote,
    spot: f64,
    rate: f64,
    model: &PricingModel,
    solver: &SolverConfig,
) -> VolResult<Outcome> {
    match implied::solve_with(quote, spot, rate, model, solver) {
        Ok(res) => {
            let greeks = model.greeks(
                spot,
                quote.strike,
                rate,
                res.implied_vol,
                quote.time_to_expiry(),
                quote.option_type,
            );
            Ok(Outcome::Point(SurfacePoint {
                strike: quote.strike,
                expiry: quote.expiry,
                implied_vol: res.implied_vol,
                delta: greeks.delta,
                gamma: greeks.gamma,
                theta: greeks.theta,
                vega: greeks.vega,
                converged: res.converged,
            }))
        }
        Err(VolError::InvalidQuote(_)) => Ok(Outcome::InvalidQuote),
        Err(VolError::ExpiredOption { .. }) => Ok(Outcome::Expired),
        Err(other) => Err(other),
    }
}

/// Keep one quote per (strike, expiry): the most recent by timestamp,
/// independent of input order.
fn dedup_latest(quotes: &[OptionQuote]) -> Vec<&OptionQuote> {
    let mut sorted: Vec<&OptionQuote> = quotes.iter().collect();
    sorted.sort_by(|a, b| {
        a.expiry
            .cmp(&b.expiry)
            .then(a.strike.total_cmp(&b.strike))
            .then(b.timestamp.cmp(&a.timestamp))
    });
    sorted.dedup_by(|a, b| a.expiry == b.expiry && a.strike == b.strike);
    sorted
}
