//! Option pricing models
//!
//! Provides:
//! - European option pricing (Black-Scholes-Merton with flat dividend yield)
//! - Analytic Greeks
//! - Raw vega for the implied-vol Newton step
//!
//! The model set is a closed enum: pricing-model choice is fixed domain
//! knowledge, and the solver and chain analyzer take the model as a value so
//! a reported implied vol and its Greeks always come from the same model.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

use crate::conventions::DAYS_PER_YEAR;
use crate::core::{Greeks, OptionType};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    // Normal::new(0, 1) cannot fail
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.cdf(x)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Pricing model used for implied-vol extraction and Greeks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PricingModel {
    /// Black-Scholes-Merton European pricing with a flat continuous
    /// dividend yield.
    BlackScholes { dividend_yield: f64 },
}

impl Default for PricingModel {
    fn default() -> Self {
        PricingModel::BlackScholes { dividend_yield: 0.0 }
    }
}

impl PricingModel {
    /// Model price of a European option.
    ///
    /// `time <= 0` prices at intrinsic; `vol <= 0` prices at discounted
    /// forward intrinsic.
    pub fn price(
        &self,
        spot: f64,
        strike: f64,
        rate: f64,
        vol: f64,
        time: f64,
        option_type: OptionType,
    ) -> f64 {
        let PricingModel::BlackScholes { dividend_yield: div } = *self;

        if time <= 0.0 {
            return option_type.intrinsic(spot, strike);
        }

        let forward = spot * ((rate - div) * time).exp();
        let df = (-rate * time).exp();

        if vol <= 0.0 {
            return df * option_type.intrinsic(forward, strike);
        }

        let d1 = d1(spot, strike, rate, div, vol, time);
        let d2 = d1 - vol * time.sqrt();

        match option_type {
            OptionType::Call => df * (forward * norm_cdf(d1) - strike * norm_cdf(d2)),
            OptionType::Put => df * (strike * norm_cdf(-d2) - forward * norm_cdf(-d1)),
        }
    }

    /// Analytic Greeks at the given vol.
    ///
    /// Theta is per calendar day; vega and rho per 1% move.
    pub fn greeks(
        &self,
        spot: f64,
        strike: f64,
        rate: f64,
        vol: f64,
        time: f64,
        option_type: OptionType,
    ) -> Greeks {
        let PricingModel::BlackScholes { dividend_yield: div } = *self;

        if time <= 0.0 || vol <= 0.0 {
            // At expiry or zero vol: delta collapses to an indicator
            let delta = match option_type {
                OptionType::Call => {
                    if spot > strike {
                        1.0
                    } else {
                        0.0
                    }
                }
                OptionType::Put => {
                    if spot < strike {
                        -1.0
                    } else {
                        0.0
                    }
                }
            };
            return Greeks::new(delta, 0.0, 0.0, 0.0, 0.0);
        }

        let d1 = d1(spot, strike, rate, div, vol, time);
        let d2 = d1 - vol * time.sqrt();
        let df = (-rate * time).exp();
        let carry_df = (-div * time).exp();
        let sqrt_t = time.sqrt();
        let pdf_d1 = norm_pdf(d1);

        let delta = match option_type {
            OptionType::Call => carry_df * norm_cdf(d1),
            OptionType::Put => carry_df * (norm_cdf(d1) - 1.0),
        };

        let gamma = carry_df * pdf_d1 / (spot * vol * sqrt_t);

        let vega = spot * carry_df * pdf_d1 * sqrt_t / 100.0;

        let decay = -spot * carry_df * pdf_d1 * vol / (2.0 * sqrt_t);
        let theta = match option_type {
            OptionType::Call => {
                decay - rate * strike * df * norm_cdf(d2) + div * spot * carry_df * norm_cdf(d1)
            }
            OptionType::Put => {
                decay + rate * strike * df * norm_cdf(-d2) - div * spot * carry_df * norm_cdf(-d1)
            }
        };

        let rho = match option_type {
            OptionType::Call => strike * time * df * norm_cdf(d2) / 100.0,
            OptionType::Put => -strike * time * df * norm_cdf(-d2) / 100.0,
        };

        Greeks::new(delta, gamma, theta / DAYS_PER_YEAR, vega, rho)
    }

    /// Raw vega (per unit vol, not per 1%), used for the Newton step.
    pub fn vega(&self, spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
        let PricingModel::BlackScholes { dividend_yield: div } = *self;
        if time <= 0.0 || vol <= 0.0 {
            return 0.0;
        }
        let d1 = d1(spot, strike, rate, div, vol, time);
        spot * (-div * time).exp() * norm_pdf(d1) * time.sqrt()
    }
}

/// Black-Scholes d1 parameter
fn d1(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    let forward = spot * ((rate - div) * time).exp();
    ((forward / strike).ln() + 0.5 * vol * vol * time) / (vol * time.sqrt())
}
