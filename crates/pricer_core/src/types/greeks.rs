//! Greeks container.

use serde::{Deserialize, Serialize};

/// First- and second-order sensitivities of the call price.
///
/// Conventions follow market practice for reporting rather than raw partial
/// derivatives: `theta` is per calendar day, `vega` and `rho` are per
/// 1-percentage-point change in volatility and rate respectively.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Sensitivity to the spot price (∂V/∂S).
    pub delta: f64,
    /// Convexity in the spot price (∂²V/∂S²).
    pub gamma: f64,
    /// Time decay per calendar day.
    pub theta: f64,
    /// Sensitivity to a 1-percentage-point volatility move.
    pub vega: f64,
    /// Sensitivity to a 1-percentage-point rate move.
    pub rho: f64,
}

impl Greeks {
    /// Greeks of an expired or deterministic position: delta is a step
    /// function of moneyness, every other sensitivity vanishes.
    #[inline]
    pub fn degenerate(in_the_money: bool) -> Self {
        Greeks {
            delta: if in_the_money { 1.0 } else { 0.0 },
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
            rho: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_in_the_money() {
        let greeks = Greeks::degenerate(true);
        assert_eq!(greeks.delta, 1.0);
        assert_eq!(greeks.gamma, 0.0);
        assert_eq!(greeks.theta, 0.0);
        assert_eq!(greeks.vega, 0.0);
        assert_eq!(greeks.rho, 0.0);
    }

    #[test]
    fn test_degenerate_out_of_the_money() {
        assert_eq!(Greeks::degenerate(false).delta, 0.0);
    }

    #[test]
    fn test_serialize_field_names() {
        let greeks = Greeks {
            delta: 0.5,
            gamma: 0.01,
            theta: -0.02,
            vega: 0.39,
            rho: 0.44,
        };
        let json = serde_json::to_value(greeks).unwrap();
        assert_eq!(json["delta"], 0.5);
        assert_eq!(json["rho"], 0.44);
    }
}
