//! Option Greeks
//!
//! First-order sensitivities reported alongside implied volatility.
//! Conventions: theta per calendar day, vega and rho per 1% move.

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Theta: dV/dt (time decay, per day)
    pub theta: f64,
    /// Vega: dV/dσ (per 1% vol move)
    pub vega: f64,
    /// Rho: dV/dr (per 1% rate move)
    pub rho: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
            rho,
        }
    }
}
