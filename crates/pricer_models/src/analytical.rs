//! Closed-form Black-Scholes-Merton pricing for European options.
//!
//! This module provides European call and put prices and analytical call
//! Greeks under lognormal dynamics with a continuous dividend yield.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! Expired options (`T = 0`) are worth their intrinsic value; zero-volatility
//! options are worth the positive part of the deterministic forward
//! difference `S·e^(-qT) - K·e^(-rT)` (sign flipped for puts).

use pricer_core::math::distributions::{norm_cdf, norm_pdf};
use pricer_core::types::{Greeks, MarketParams, OptionType};

/// Computes the d₁ and d₂ terms of the Black-Scholes formula.
///
/// Caller must ensure `T > 0` and `σ > 0`; the degenerate branches in
/// [`price`] and [`greeks`] never reach this.
#[inline]
fn d_terms(params: &MarketParams) -> (f64, f64) {
    let vol_sqrt_t = params.volatility() * params.expiry().sqrt();
    let log_moneyness = (params.spot() / params.strike()).ln();
    let drift =
        (params.carry() + 0.5 * params.volatility() * params.volatility()) * params.expiry();
    let d1 = (log_moneyness + drift) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Computes the European option price.
///
/// # Arguments
/// * `params` - Validated market parameters
/// * `option_type` - Call or put
///
/// # Examples
/// ```
/// use pricer_core::types::{MarketParams, OptionType};
/// use pricer_models::analytical;
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// let call = analytical::price(&params, OptionType::Call);
/// let put = analytical::price(&params, OptionType::Put);
///
/// // Put-call parity: C - P = S·e^(-qT) - K·e^(-rT)
/// let forward = 100.0 - 100.0 * (-0.02_f64).exp();
/// assert!((call - put - forward).abs() < 1e-9);
/// ```
pub fn price(params: &MarketParams, option_type: OptionType) -> f64 {
    // Maturity payoff, undiscounted
    if params.expiry() == 0.0 {
        return option_type.intrinsic(params.spot(), params.strike());
    }

    // Deterministic case: both legs grow at known rates
    if params.volatility() == 0.0 {
        let forward_gap = params.forward_spot() - params.discounted_strike();
        return match option_type {
            OptionType::Call => forward_gap.max(0.0),
            OptionType::Put => (-forward_gap).max(0.0),
        };
    }

    let (d1, d2) = d_terms(params);
    let discounted_spot = params.forward_spot();
    let discounted_strike = params.discounted_strike();

    match option_type {
        OptionType::Call => discounted_spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionType::Put => discounted_strike * norm_cdf(-d2) - discounted_spot * norm_cdf(-d1),
    }
}

/// Computes the analytical Greeks of the call.
///
/// Reporting conventions: `theta` is per calendar day, `vega` and `rho` are
/// per 1-percentage-point change.
///
/// # Examples
/// ```
/// use pricer_core::types::MarketParams;
/// use pricer_models::analytical;
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// let greeks = analytical::greeks(&params);
///
/// assert!(greeks.delta > 0.0 && greeks.delta < 1.0);
/// assert!(greeks.gamma > 0.0);
/// assert!(greeks.theta < 0.0);
/// ```
pub fn greeks(params: &MarketParams) -> Greeks {
    // Expired or deterministic: delta is a step function, the rest vanish
    if params.expiry() == 0.0 || params.volatility() == 0.0 {
        return Greeks::degenerate(params.spot() > params.strike());
    }

    let (d1, d2) = d_terms(params);
    let sqrt_t = params.expiry().sqrt();
    let discounted_spot = params.forward_spot();
    let discounted_strike = params.discounted_strike();

    let pdf_d1 = norm_pdf(d1);
    let cdf_d1 = norm_cdf(d1);
    let cdf_d2 = norm_cdf(d2);

    let delta = (-params.dividend_yield() * params.expiry()).exp() * cdf_d1;
    let gamma = (-params.dividend_yield() * params.expiry()).exp() * pdf_d1
        / (params.spot() * params.volatility() * sqrt_t);
    let theta = (-(discounted_spot * pdf_d1 * params.volatility()) / (2.0 * sqrt_t)
        - params.rate() * discounted_strike * cdf_d2
        + params.dividend_yield() * discounted_spot * cdf_d1)
        / 365.0;
    let vega = discounted_spot * pdf_d1 * sqrt_t / 100.0;
    let rho = params.strike() * params.expiry() * (-params.rate() * params.expiry()).exp() * cdf_d2
        / 100.0;

    Greeks {
        delta,
        gamma,
        theta,
        vega,
        rho,
    }
}
