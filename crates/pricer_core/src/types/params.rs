//! Market parameters and lattice specifications.
//!
//! This module provides shared parameter structures for the pricing
//! engines with construction-time validation.

use super::error::PricingError;
use super::option::{ExerciseStyle, OptionType};

/// Market parameters for a vanilla option.
///
/// Contains spot, strike, time to expiry, risk-free rate, volatility, and
/// continuous dividend yield, with validation ensuring the parameter domain
/// every pricing operation relies on. Once constructed, a `MarketParams` is
/// valid for all pricing operations; no further input checks are needed
/// downstream.
///
/// # Examples
/// ```
/// use pricer_core::types::MarketParams;
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// assert_eq!(params.spot(), 100.0);
/// assert_eq!(params.dividend_yield(), 0.0);
///
/// // Negative rates are allowed; negative volatility is not.
/// assert!(MarketParams::new(100.0, 100.0, 1.0, -0.01, 0.20, 0.0).is_ok());
/// assert!(MarketParams::new(100.0, 100.0, 1.0, 0.02, -0.20, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketParams {
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    volatility: f64,
    dividend_yield: f64,
}

impl MarketParams {
    /// Creates new market parameters with validation.
    ///
    /// # Arguments
    /// * `spot` - Current stock price (must be positive)
    /// * `strike` - Strike price (must be positive)
    /// * `expiry` - Time to expiry in years (must be non-negative)
    /// * `rate` - Risk-free interest rate, annualised (may be negative)
    /// * `volatility` - Volatility (must be non-negative)
    /// * `dividend_yield` - Continuous dividend yield (must be non-negative)
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if any constraint is violated.
    pub fn new(
        spot: f64,
        strike: f64,
        expiry: f64,
        rate: f64,
        volatility: f64,
        dividend_yield: f64,
    ) -> Result<Self, PricingError> {
        if !(spot > 0.0) {
            return Err(PricingError::InvalidParameter(format!(
                "spot price must be positive, got {}",
                spot
            )));
        }
        if !(strike > 0.0) {
            return Err(PricingError::InvalidParameter(format!(
                "strike price must be positive, got {}",
                strike
            )));
        }
        if !(expiry >= 0.0) {
            return Err(PricingError::InvalidParameter(format!(
                "time to expiry must be non-negative, got {}",
                expiry
            )));
        }
        if !(rate.is_finite()) {
            return Err(PricingError::InvalidParameter(format!(
                "risk-free rate must be finite, got {}",
                rate
            )));
        }
        if !(volatility >= 0.0) {
            return Err(PricingError::InvalidParameter(format!(
                "volatility must be non-negative, got {}",
                volatility
            )));
        }
        if !(dividend_yield >= 0.0) {
            return Err(PricingError::InvalidParameter(format!(
                "dividend yield must be non-negative, got {}",
                dividend_yield
            )));
        }

        Ok(Self {
            spot,
            strike,
            expiry,
            rate,
            volatility,
            dividend_yield,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the time to expiry in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the continuous dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Cost of carry: rate minus dividend yield.
    #[inline]
    pub fn carry(&self) -> f64 {
        self.rate - self.dividend_yield
    }

    /// Spot discounted by the dividend yield over the option life,
    /// `S·e^(-qT)`.
    #[inline]
    pub fn forward_spot(&self) -> f64 {
        self.spot * (-self.dividend_yield * self.expiry).exp()
    }

    /// Strike discounted at the risk-free rate over the option life,
    /// `K·e^(-rT)`.
    #[inline]
    pub fn discounted_strike(&self) -> f64 {
        self.strike * (-self.rate * self.expiry).exp()
    }
}

/// A lattice pricing specification: market parameters plus tree geometry
/// and contract terms.
///
/// # Examples
/// ```
/// use pricer_core::types::{ExerciseStyle, LatticeSpec, MarketParams, OptionType};
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// let spec = LatticeSpec::new(params, 250, OptionType::Put, ExerciseStyle::American).unwrap();
/// assert_eq!(spec.steps(), 250);
///
/// // Zero steps are rejected
/// assert!(LatticeSpec::new(params, 0, OptionType::Put, ExerciseStyle::American).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeSpec {
    params: MarketParams,
    steps: usize,
    option_type: OptionType,
    exercise: ExerciseStyle,
}

impl LatticeSpec {
    /// Creates a lattice specification with validation.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if `steps < 1`.
    pub fn new(
        params: MarketParams,
        steps: usize,
        option_type: OptionType,
        exercise: ExerciseStyle,
    ) -> Result<Self, PricingError> {
        if steps < 1 {
            return Err(PricingError::InvalidParameter(
                "step count must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            params,
            steps,
            option_type,
            exercise,
        })
    }

    /// Returns the market parameters.
    #[inline]
    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    /// Returns the number of tree steps.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the option payoff type.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Returns the exercise style.
    #[inline]
    pub fn exercise(&self) -> ExerciseStyle {
        self.exercise
    }

    /// Intrinsic payoff of this contract at the given stock level.
    #[inline]
    pub fn intrinsic(&self, stock: f64) -> f64 {
        self.option_type.intrinsic(stock, self.params.strike())
    }
}
