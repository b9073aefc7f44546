//! Option contract enums.
//!
//! This module provides the payoff type, exercise style, and lattice model
//! selectors shared by all pricing engines.

use serde::{Deserialize, Serialize};

/// Option payoff type.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
///
/// assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
/// assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionType {
    /// Intrinsic (immediate exercise) payoff at the given stock level.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Returns whether this is a call.
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, OptionType::Call)
    }
}

/// Option exercise style.
///
/// Defines when an option can be exercised during its lifetime.
///
/// # Variants
/// - `European`: Exercise only at expiry
/// - `American`: Exercise at any step up to expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStyle {
    /// European style: exercise only at expiry.
    European,
    /// American style: exercise at any step up to expiry.
    American,
}

impl ExerciseStyle {
    /// Returns whether this is a European exercise style.
    #[inline]
    pub fn is_european(self) -> bool {
        matches!(self, ExerciseStyle::European)
    }

    /// Returns whether this is an American exercise style.
    #[inline]
    pub fn is_american(self) -> bool {
        matches!(self, ExerciseStyle::American)
    }
}

/// Lattice model selector for convergence sweeps and boundary requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatticeModel {
    /// Cox-Ross-Rubinstein binomial tree.
    Binomial,
    /// Boyle (1988) trinomial tree.
    Trinomial,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_intrinsic() {
        assert_eq!(OptionType::Call.intrinsic(120.0, 100.0), 20.0);
        assert_eq!(OptionType::Call.intrinsic(80.0, 100.0), 0.0);
    }

    #[test]
    fn test_put_intrinsic() {
        assert_eq!(OptionType::Put.intrinsic(80.0, 100.0), 20.0);
        assert_eq!(OptionType::Put.intrinsic(120.0, 100.0), 0.0);
    }

    #[test]
    fn test_intrinsic_at_the_money() {
        assert_eq!(OptionType::Call.intrinsic(100.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_exercise_style_predicates() {
        assert!(ExerciseStyle::European.is_european());
        assert!(!ExerciseStyle::European.is_american());
        assert!(ExerciseStyle::American.is_american());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&OptionType::Call).unwrap();
        assert_eq!(json, "\"call\"");
        let style: ExerciseStyle = serde_json::from_str("\"american\"").unwrap();
        assert_eq!(style, ExerciseStyle::American);
    }
}
