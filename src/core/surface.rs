//! Options surface
//!
//! Implied volatility and Greeks per (strike, expiry) for one underlying at
//! one as-of time. The surface is an ordered point set, not a dense grid:
//! points are unique by (strike, expiry) and sorted by (expiry, strike).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of the surface: solved implied vol plus analytic Greeks.
///
/// `converged = false` marks a best-effort solve that missed the pricing
/// tolerance within the iteration budget; the point is still present so
/// consumers see the full strike range, but should treat it as unreliable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub strike: f64,
    pub expiry: NaiveDate,
    /// Annualized implied volatility (fraction)
    pub implied_vol: f64,
    pub delta: f64,
    pub gamma: f64,
    /// Per calendar day
    pub theta: f64,
    /// Per 1% vol move
    pub vega: f64,
    pub converged: bool,
}

/// Per-build tally of quote outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceDiagnostics {
    /// Points solved to tolerance
    pub solved: usize,
    /// Quotes excluded for unusable prices (crossed, empty)
    pub invalid_quotes: usize,
    /// Quotes excluded because expiry was not in the future
    pub expired: usize,
    /// Points included with `converged = false`
    pub unconverged: usize,
}

/// Implied volatility surface for one underlying at one as-of time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsSurface {
    /// Underlying symbol
    pub underlying: String,
    /// Spot price the surface was solved against
    pub spot: f64,
    /// As-of time (latest quote timestamp)
    pub as_of: DateTime<Utc>,
    /// Points sorted by (expiry, strike), unique per (strike, expiry)
    pub points: Vec<SurfacePoint>,
    pub diagnostics: SurfaceDiagnostics,
}

impl OptionsSurface {
    /// All distinct expiries in ascending order.
    pub fn expiries(&self) -> Vec<NaiveDate> {
        let mut expiries: Vec<NaiveDate> = self.points.iter().map(|p| p.expiry).collect();
        expiries.dedup();
        expiries
    }

    /// The smile at one expiry, in ascending strike order.
    pub fn slice(&self, expiry: NaiveDate) -> Vec<&SurfacePoint> {
        self.points.iter().filter(|p| p.expiry == expiry).collect()
    }

    /// Point at an exact (strike, expiry), if present.
    pub fn point_at(&self, strike: f64, expiry: NaiveDate) -> Option<&SurfacePoint> {
        self.points
            .iter()
            .find(|p| p.expiry == expiry && p.strike == strike)
    }

    /// The point closest to spot at one expiry.
    pub fn atm_point(&self, expiry: NaiveDate) -> Option<&SurfacePoint> {
        self.slice(expiry).into_iter().min_by(|a, b| {
            let da = (a.strike - self.spot).abs();
            let db = (b.strike - self.spot).abs();
            da.total_cmp(&db)
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
