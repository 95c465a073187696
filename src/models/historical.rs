//! Historical (realized) volatility engine
//!
//! Computes annualized realized volatility over a trailing window of OHLCV
//! bars, polymorphic over the closed [`Estimator`] set. Each estimator
//! produces a raw per-period variance; the engine annualizes by scaling with
//! the annualization factor and taking the square root.
//!
//! Inputs are assumed split-adjusted; discontinuities from corporate actions
//! are not detected here.

use crate::core::{Estimator, PricePoint, PriceSeries, SampleQuality, VolError, VolResult, VolatilityEstimate};

/// Window length below which estimates are flagged [`SampleQuality::SmallSample`].
const SMALL_SAMPLE_WINDOW: usize = 10;

const LN_2: f64 = std::f64::consts::LN_2;

/// Estimate annualized realized volatility over the trailing `window`
/// return periods of `series`.
///
/// Requires `window >= 2` and at least `window + 1` bars. The
/// `annualization` factor is the number of return periods per year
/// (252 for daily bars, [`crate::conventions::TRADING_DAYS_PER_YEAR`]).
///
/// Pure function of its inputs.
pub fn estimate(
    series: &PriceSeries,
    window: usize,
    method: Estimator,
    annualization: f64,
) -> VolResult<VolatilityEstimate> {
    if window < 2 {
        return Err(VolError::invalid_parameter(format!(
            "window must be >= 2, got {window}"
        )));
    }
    if !annualization.is_finite() || annualization <= 0.0 {
        return Err(VolError::invalid_parameter(format!(
            "annualization factor must be positive, got {annualization}"
        )));
    }
    // window + 1 bars cover `window` return periods for all estimators
    let bars = series.tail(window + 1).ok_or(VolError::InsufficientData {
        required: window + 1,
        actual: series.len(),
    })?;
    let variance = window_variance(bars, method)?;
    let as_of = bars[bars.len() - 1].timestamp;

    let quality = if window < SMALL_SAMPLE_WINDOW {
        SampleQuality::SmallSample
    } else {
        SampleQuality::Normal
    };

    Ok(VolatilityEstimate {
        value: (variance * annualization).sqrt(),
        method,
        window,
        as_of,
        quality,
    })
}

/// Rolling annualized volatility aligned with the series: index `i` holds
/// the estimate for the window ending at bar `i`, `None` until the window
/// fills.
pub fn rolling(
    series: &PriceSeries,
    window: usize,
    method: Estimator,
    annualization: f64,
) -> VolResult<Vec<Option<f64>>> {
    if window < 2 {
        return Err(VolError::invalid_parameter(format!(
            "window must be >= 2, got {window}"
        )));
    }
    if series.len() < window + 1 {
        return Err(VolError::InsufficientData {
            required: window + 1,
            actual: series.len(),
        });
    }

    let points = series.points();
    let mut out = vec![None; points.len()];
    for end in window..points.len() {
        let bars = &points[end - window..=end];
        let variance = window_variance(bars, method)?;
        out[end] = Some((variance * annualization).sqrt());
    }
    Ok(out)
}

/// Raw per-period variance of one window of bars.
///
/// `bars` holds `window + 1` entries; close-to-close consumes the full
/// slice as consecutive pairs, the range estimators consume the trailing
/// `window` bars.
fn window_variance(bars: &[PricePoint], method: Estimator) -> VolResult<f64> {
    for bar in bars {
        if !bar.is_well_formed() {
            return Err(VolError::invalid_data(format!(
                "non-positive or inverted OHLC at {}",
                bar.timestamp
            )));
        }
    }

    let variance = match method {
        Estimator::CloseToClose => close_to_close_variance(bars),
        Estimator::Parkinson => parkinson_variance(&bars[1..]),
        Estimator::GarmanKlass => garman_klass_variance(&bars[1..]),
    };

    // Garman-Klass can dip below zero on degenerate bars
    Ok(variance.max(0.0))
}

/// Sample variance (ddof = 1) of consecutive close-to-close log returns.
fn close_to_close_variance(bars: &[PricePoint]) -> f64 {
    let returns: Vec<f64> = bars
        .windows(2)
        .map(|pair| (pair[1].close / pair[0].close).ln())
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0)
}

/// Parkinson (1980): (1 / 4 ln 2) · mean(ln(H/L)²). No-drift assumption.
fn parkinson_variance(bars: &[PricePoint]) -> f64 {
    let sum: f64 = bars
        .iter()
        .map(|b| (b.high / b.low).ln().powi(2))
        .sum();
    sum / (4.0 * LN_2 * bars.len() as f64)
}

/// Garman-Klass (1980): mean(0.5·ln(H/L)² − (2 ln 2 − 1)·ln(C/O)²).
fn garman_klass_variance(bars: &[PricePoint]) -> f64 {
    let sum: f64 = bars
        .iter()
        .map(|b| {
            let hl = (b.high / b.low).ln();
            let co = (b.close / b.open).ln();
            0.5 * hl * hl - (2.0 * LN_2 - 1.0) * co * co
        })
        .sum();
    sum / bars.len() as f64
}
