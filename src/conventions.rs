//! Market conventions shared across the crate.
//!
//! One day-count convention (Actual/365 fixed) and one annualization factor
//! (252 trading periods per year) are used everywhere so that realized and
//! implied volatilities are directly comparable.

use chrono::NaiveDate;

/// Calendar days per year under the Actual/365 fixed day count.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Trading periods per year, used to annualize per-period realized variance.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Year fraction between two dates under Actual/365 fixed.
///
/// Negative when `to` precedes `from`.
pub fn year_fraction(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

/// Forward price under flat continuous carry: F = S · exp((r − q) · T).
pub fn forward_price(spot: f64, rate: f64, dividend_yield: f64, expiry: f64) -> f64 {
    spot * ((rate - dividend_yield) * expiry).exp()
}
