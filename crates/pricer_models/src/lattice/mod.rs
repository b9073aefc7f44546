//! Lattice pricing engines.
//!
//! This module provides:
//! - `binomial`: Cox-Ross-Rubinstein two-branch tree
//! - `trinomial`: Boyle (1988) three-branch tree
//!
//! Both engines share the same capabilities: a rollback price, a full
//! per-node lattice materialization for visualization, and early-exercise
//! boundary extraction. The shared pieces (the exercise-optimality rule and
//! the critical-price selection) live here so the two engines cannot drift
//! apart.

use pricer_core::types::{LatticeSpec, OptionType};
use serde::{Deserialize, Serialize};

pub mod binomial;
pub mod trinomial;

/// Slack absorbing floating-point noise when continuation and intrinsic
/// values are numerically equal at the exercise frontier.
const EXERCISE_TOL: f64 = 1e-10;

/// Exercise-optimality rule shared by both lattice engines: intrinsic must
/// match or beat continuation within tolerance, and be strictly positive.
#[inline]
pub(crate) fn exercise_is_optimal(intrinsic: f64, continuation: f64) -> bool {
    intrinsic >= continuation - EXERCISE_TOL && intrinsic > 0.0
}

/// One node of a materialized lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeNode {
    /// Stock price at this node.
    pub stock: f64,
    /// Option value under pure European backward induction.
    pub european: f64,
    /// Option value with the American exercise clamp applied.
    pub american: f64,
    /// Whether immediate exercise is optimal at this node.
    pub early_exercise: bool,
}

/// A fully materialized lattice, level by level.
///
/// Level `i` holds `i + 1` nodes for the binomial engine and `2i + 1` nodes
/// for the trinomial engine, ordered by ascending stock price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// Requested step count.
    pub steps: usize,
    /// Per-level nodes, chronological from the root.
    pub levels: Vec<Vec<LatticeNode>>,
}

/// One point of an early-exercise boundary, chronological.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    /// Time from valuation, in years.
    pub time: f64,
    /// Critical stock price at which exercise becomes optimal.
    pub stock_price: f64,
    /// Remaining life of the option at this point.
    pub time_to_maturity: f64,
}

/// Tracks the critical stock price among the exercising nodes of one time
/// step. The boundary separates the exercise region from the hold region, so
/// puts keep the highest exercising stock price (exercise below, hold above)
/// and calls the lowest (exercise above, hold below).
#[derive(Debug)]
pub(crate) struct BoundaryTracker {
    option_type: OptionType,
    critical: Option<f64>,
}

impl BoundaryTracker {
    pub(crate) fn new(option_type: OptionType) -> Self {
        Self {
            option_type,
            critical: None,
        }
    }

    /// Records a stock level at which exercise is optimal.
    pub(crate) fn observe(&mut self, stock: f64) {
        let tighter = match (self.option_type, self.critical) {
            (_, None) => true,
            (OptionType::Put, Some(current)) => stock > current,
            (OptionType::Call, Some(current)) => stock < current,
        };
        if tighter {
            self.critical = Some(stock);
        }
    }

    /// Returns the critical price for this step, if any node exercised.
    pub(crate) fn finish(self) -> Option<f64> {
        self.critical
    }
}

/// Single-node lattice for degenerate inputs (expired or zero-volatility),
/// where the tree collapses to its root.
pub(crate) fn degenerate_lattice(spec: &LatticeSpec) -> Lattice {
    let value = crate::analytical::price(spec.params(), spec.option_type());
    let intrinsic = spec.intrinsic(spec.params().spot());
    let node = LatticeNode {
        stock: spec.params().spot(),
        european: value,
        american: value,
        early_exercise: exercise_is_optimal(intrinsic, value),
    };
    Lattice {
        steps: spec.steps(),
        levels: vec![vec![node]],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================
    // Exercise rule
    // ==========================================================

    #[test]
    fn test_exercise_requires_positive_intrinsic() {
        assert!(!exercise_is_optimal(0.0, 0.0));
        assert!(!exercise_is_optimal(0.0, -1.0));
    }

    #[test]
    fn test_exercise_within_tolerance() {
        // Intrinsic a hair below continuation still counts as exercising
        assert!(exercise_is_optimal(5.0, 5.0 + 5e-11));
        assert!(!exercise_is_optimal(5.0, 5.0 + 1e-9));
    }

    #[test]
    fn test_exercise_when_intrinsic_dominates() {
        assert!(exercise_is_optimal(10.0, 8.0));
        assert!(!exercise_is_optimal(8.0, 10.0));
    }

    // ==========================================================
    // Boundary tracker
    // ==========================================================

    #[test]
    fn test_put_tracker_keeps_highest() {
        let mut tracker = BoundaryTracker::new(OptionType::Put);
        tracker.observe(80.0);
        tracker.observe(92.0);
        tracker.observe(85.0);
        assert_eq!(tracker.finish(), Some(92.0));
    }

    #[test]
    fn test_call_tracker_keeps_lowest() {
        let mut tracker = BoundaryTracker::new(OptionType::Call);
        tracker.observe(140.0);
        tracker.observe(115.0);
        tracker.observe(130.0);
        assert_eq!(tracker.finish(), Some(115.0));
    }

    #[test]
    fn test_tracker_empty_step() {
        let tracker = BoundaryTracker::new(OptionType::Put);
        assert_eq!(tracker.finish(), None);
    }
}
