//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from pricing operations

use thiserror::Error;

/// Categorised pricing errors.
///
/// Provides structured error handling for pricing operations with
/// descriptive context for each failure mode.
///
/// # Variants
/// - `InvalidParameter`: Invalid market data or lattice parameters
/// - `InvalidProbabilities`: Trinomial risk-neutral probabilities outside [0, 1]
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidParameter("spot price must be positive".to_string());
/// assert_eq!(
///     format!("{}", err),
///     "Invalid parameter: spot price must be positive"
/// );
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    /// Invalid market or lattice parameter (rejected before any pricing runs).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Trinomial risk-neutral probabilities left the valid range. Very small
    /// step counts combined with large volatility or rates can push the Boyle
    /// probabilities outside [0, 1]; the remedy is a larger step count.
    #[error(
        "Invalid trinomial probabilities: pu={pu:.8}, pm={pm:.8}, pd={pd:.8}. \
         Increase the step count or adjust parameters."
    )]
    InvalidProbabilities {
        /// Up-move probability
        pu: f64,
        /// Middle-move probability
        pm: f64,
        /// Down-move probability
        pd: f64,
    },
}
