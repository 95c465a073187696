//! Property-based tests using proptest.
//!
//! Verify invariant properties across random inputs rather than fixed
//! examples: solver round-trips, surface uniqueness, and estimator edge
//! behavior.

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use proptest::prelude::*;
use vol_core::core::{Estimator, OptionQuote, OptionType, PricePoint, PriceSeries};
use vol_core::models::{build_surface, estimate, solve, PricingModel};

const MODEL: PricingModel = PricingModel::BlackScholes { dividend_yield: 0.0 };
const RATE: f64 = 0.05;

fn quote_priced_at(spot: f64, strike: f64, days: i64, option_type: OptionType, vol: f64) -> OptionQuote {
    let ts = Utc.with_ymd_and_hms(2025, 8, 20, 15, 30, 0).unwrap();
    let expiry = ts.date_naive() + ChronoDuration::days(days);
    let price = MODEL.price(spot, strike, RATE, vol, days as f64 / 365.0, option_type);
    OptionQuote::new(
        "SPY",
        expiry,
        strike,
        option_type,
        Some(price),
        Some(price),
        None,
        spot,
        ts,
    )
}

fn flat_series(n: usize, price: f64) -> PriceSeries {
    let points = (0..n)
        .map(|i| {
            let ts = Utc.with_ymd_and_hms(2025, 1, 1, 21, 0, 0).unwrap()
                + ChronoDuration::days(i as i64);
            PricePoint::new(ts, price, price, price, price, 1_000)
        })
        .collect();
    PriceSeries::new("TEST", points).unwrap()
}

// --- Property 1: solver round-trip ---

proptest! {
    /// When bid == ask == the model price at some vol, the solver recovers
    /// that vol. Ranges keep vega well away from zero so the price
    /// tolerance translates into a tight vol tolerance.
    #[test]
    fn solve_recovers_priced_vol(
        vol in 0.15_f64..0.80,
        strike in 85.0_f64..115.0,
        days in 90_i64..730,
        is_call in any::<bool>(),
    ) {
        let option_type = if is_call { OptionType::Call } else { OptionType::Put };
        let quote = quote_priced_at(100.0, strike, days, option_type, vol);
        prop_assume!(quote.market_price().unwrap() > 0.01);

        let res = solve(&quote, 100.0, RATE, &MODEL).unwrap();
        prop_assert!(res.converged, "failed to converge at vol={vol} strike={strike}");
        prop_assert!(res.iterations <= 100);
        prop_assert!(
            (res.implied_vol - vol).abs() < 1e-3,
            "recovered {} for true vol {}",
            res.implied_vol,
            vol
        );
        prop_assert!(res.price_error.abs() < 1e-4);
    }
}

// --- Property 2: surface uniqueness and ordering ---

proptest! {
    /// No duplicate (strike, expiry) survives surface construction, and the
    /// points come back ordered by (expiry, strike) regardless of the input
    /// order or duplication.
    #[test]
    fn surface_points_unique_and_ordered(
        strikes in proptest::collection::vec(80.0_f64..120.0, 1..12),
        dup_rounds in 1_usize..4,
    ) {
        let mut quotes = Vec::new();
        for round in 0..dup_rounds {
            for (i, strike) in strikes.iter().enumerate() {
                // Reuse a small expiry set so collisions actually occur
                let days = 30 + 30 * ((i % 3) as i64);
                let mut q = quote_priced_at(100.0, *strike, days, OptionType::Call, 0.25);
                q.timestamp = q.timestamp + ChronoDuration::seconds(round as i64);
                quotes.push(q);
            }
        }

        let surface = build_surface(&quotes, 100.0, RATE, &MODEL).unwrap();

        let mut keys: Vec<_> = surface
            .points
            .iter()
            .map(|p| (p.expiry, p.strike.to_bits()))
            .collect();
        let sorted = keys.clone();
        keys.dedup();
        prop_assert_eq!(keys.len(), sorted.len(), "duplicate (strike, expiry) in surface");

        for pair in surface.points.windows(2) {
            prop_assert!(
                (pair[0].expiry, pair[0].strike) <= (pair[1].expiry, pair[1].strike)
            );
        }
    }
}

// --- Property 3: constant price means zero realized vol ---

proptest! {
    /// Any constant-price series yields (exactly) zero close-to-close and
    /// Parkinson volatility, for any valid window.
    #[test]
    fn constant_price_series_has_zero_vol(
        price in 1.0_f64..5000.0,
        window in 2_usize..30,
    ) {
        let series = flat_series(window + 5, price);
        for method in [Estimator::CloseToClose, Estimator::Parkinson] {
            let est = estimate(&series, window, method, 252.0).unwrap();
            prop_assert_eq!(est.value, 0.0);
        }
    }
}

// --- Property 4: window bounds ---

proptest! {
    /// `estimate` with window >= series length reports InsufficientData
    /// with the exact requirement.
    #[test]
    fn oversized_window_is_insufficient_data(
        len in 3_usize..40,
        extra in 0_usize..10,
    ) {
        let series = flat_series(len, 100.0);
        let window = len + extra;
        let err = estimate(&series, window, Estimator::CloseToClose, 252.0);
        match err {
            Err(vol_core::VolError::InsufficientData { required, actual }) => {
                prop_assert_eq!(required, window + 1);
                prop_assert_eq!(actual, len);
            }
            other => prop_assert!(false, "expected InsufficientData, got {:?}", other),
        }
    }
}

// --- Property 5: solved vol reprices the quote ---

proptest! {
    /// Greeks-bearing surface points always reprice their quote to within
    /// the solver tolerance when flagged converged.
    #[test]
    fn converged_surface_points_reprice(
        vol in 0.15_f64..0.60,
        strike in 90.0_f64..110.0,
    ) {
        let quote = quote_priced_at(100.0, strike, 180, OptionType::Call, vol);
        let target = quote.market_price().unwrap();
        let surface = build_surface(std::slice::from_ref(&quote), 100.0, RATE, &MODEL).unwrap();
        prop_assert_eq!(surface.points.len(), 1);

        let point = &surface.points[0];
        prop_assume!(point.converged);
        let repriced = MODEL.price(
            100.0,
            point.strike,
            RATE,
            point.implied_vol,
            180.0 / 365.0,
            OptionType::Call,
        );
        prop_assert!((repriced - target).abs() < 1e-4);
    }
}
