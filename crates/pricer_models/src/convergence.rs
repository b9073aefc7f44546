//! Price-versus-step-count convergence sweeps.
//!
//! Evaluates a lattice model's European call price over a range of step
//! counts, producing the data behind convergence plots and the
//! convergence-oriented validation tests.

use pricer_core::types::{ExerciseStyle, LatticeModel, LatticeSpec, MarketParams, OptionType};
use serde::{Deserialize, Serialize};

use crate::lattice::{binomial, trinomial};

/// One point of a convergence curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    /// Lattice step count.
    pub steps: usize,
    /// European call price at that step count.
    pub price: f64,
}

/// Step counts above which the sweep coarsens to every 3rd count to bound
/// total work (the rollback is O(N²) per evaluation).
const DENSE_SWEEP_LIMIT: usize = 500;

/// Sweeps the European call price of the chosen lattice model over step
/// counts `1..=max_steps`.
///
/// The grid is dense up to 500 steps and every 3rd count beyond. Step counts whose Boyle probabilities leave `[0, 1]` (trinomial
/// only, at very small counts) are skipped, so the returned sequence may
/// have gaps at the low end. Each call recomputes from scratch.
///
/// # Examples
/// ```
/// use pricer_core::types::{LatticeModel, MarketParams};
/// use pricer_models::convergence;
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// let curve = convergence::sweep(&params, LatticeModel::Binomial, 50);
///
/// assert_eq!(curve.len(), 50);
/// assert_eq!(curve[0].steps, 1);
/// assert!(curve.windows(2).all(|pair| pair[0].steps < pair[1].steps));
/// ```
pub fn sweep(
    params: &MarketParams,
    model: LatticeModel,
    max_steps: usize,
) -> Vec<ConvergencePoint> {
    let stride = if max_steps <= DENSE_SWEEP_LIMIT { 1 } else { 3 };

    let mut curve = Vec::new();
    for steps in (1..=max_steps).step_by(stride) {
        let spec = match LatticeSpec::new(*params, steps, OptionType::Call, ExerciseStyle::European)
        {
            Ok(spec) => spec,
            Err(_) => continue,
        };

        let price = match model {
            LatticeModel::Binomial => binomial::price(&spec),
            LatticeModel::Trinomial => match trinomial::price(&spec) {
                Ok(price) => price,
                // Out-of-range probabilities at small step counts: skip the
                // point rather than failing the sweep
                Err(_) => continue,
            },
        };

        curve.push(ConvergencePoint { steps, price });
    }

    curve
}
