//! Aggregation engine.
//!
//! `calculate_all` composes the analytic model and both lattice engines over
//! one set of market parameters into a single serializable response: prices,
//! Greeks, convergence curves, early-exercise boundaries, sample lattices
//! for visualization, and the validation report.
//!
//! The binomial and trinomial blocks are mutually independent and run
//! concurrently; each block is internally sequential, so the numerical
//! results are identical to a serial evaluation.

use pricer_core::types::{
    ExerciseStyle, Greeks, LatticeModel, LatticeSpec, MarketParams, OptionType, PricingError,
};
use pricer_models::analytical;
use pricer_models::convergence::{self, ConvergencePoint};
use pricer_models::lattice::{binomial, trinomial, BoundaryPoint, Lattice};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validation::{self, ValidationReport};

/// Step count cap for the sample lattices included for visualization; a
/// deeper tree is unreadable as a diagram and quadratic in node count.
const PLOT_STEP_LIMIT: usize = 6;

/// Closed-form results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackScholesResult {
    /// European call price.
    pub call_price: f64,
    /// European put price.
    pub put_price: f64,
    /// Analytical call Greeks.
    pub greeks: Greeks,
}

/// Results of one lattice model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeResult {
    /// European call price.
    pub european_call: f64,
    /// European put price.
    pub european_put: f64,
    /// American call price, always computed via the tree. Coincides with the
    /// European call when the dividend yield is zero.
    pub american_call: f64,
    /// American put price.
    pub american_put: f64,
    /// European call price versus step count.
    pub convergence: Vec<ConvergencePoint>,
    /// American put early-exercise boundary, chronological.
    pub boundary_put: Vec<BoundaryPoint>,
    /// American call early-exercise boundary (empty without dividends).
    pub boundary_call: Vec<BoundaryPoint>,
}

/// A binomial and trinomial lattice side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticePair {
    /// CRR lattice.
    pub binomial: Lattice,
    /// Boyle lattice.
    pub trinomial: Lattice,
}

/// Sample lattices for visualization, capped at 6 steps and independent of
/// the main pricing step count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeGallery {
    /// Put lattices for both models.
    pub put: LatticePair,
    /// Call lattices for both models.
    pub call: LatticePair,
}

/// The full aggregate response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResponse {
    /// Closed-form prices and Greeks.
    pub black_scholes: BlackScholesResult,
    /// CRR lattice results.
    pub binomial: LatticeResult,
    /// Boyle lattice results.
    pub trinomial: LatticeResult,
    /// Sample lattices for visualization.
    pub lattices: LatticeGallery,
    /// Cross-model validation report.
    pub validation: ValidationReport,
}

/// One lattice model's complete contribution to the response.
struct ModelBlock {
    result: LatticeResult,
    plot_put: Lattice,
    plot_call: Lattice,
}

/// Runs every model over one set of market parameters.
///
/// A single invalid input aborts the entire computation; there are no
/// partial results. The one exception is the convergence sweep, which
/// silently skips step counts with out-of-range trinomial probabilities.
///
/// # Errors
/// `PricingError::InvalidParameter` for a step count below 1, and
/// `PricingError::InvalidProbabilities` when the trinomial probabilities
/// leave `[0, 1]` at the requested step count.
///
/// # Examples
/// ```
/// use pricer_core::types::MarketParams;
/// use pricer_pricing::engine;
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// let response = engine::calculate_all(&params, 250).unwrap();
///
/// assert!((response.black_scholes.call_price - 8.9161).abs() < 1e-3);
/// assert!(response.validation.overall_passed);
/// ```
pub fn calculate_all(
    params: &MarketParams,
    steps: usize,
) -> Result<PricingResponse, PricingError> {
    let plot_steps = steps.min(PLOT_STEP_LIMIT);
    debug!(steps, plot_steps, "running aggregate pricing");

    // The two lattice blocks dominate the cost and are independent
    let (binomial_block, trinomial_block) = rayon::join(
        || run_binomial_block(params, steps, plot_steps),
        || run_trinomial_block(params, steps, plot_steps),
    );
    let binomial_block = binomial_block?;
    let trinomial_block = trinomial_block?;

    let black_scholes = BlackScholesResult {
        call_price: analytical::price(params, OptionType::Call),
        put_price: analytical::price(params, OptionType::Put),
        greeks: analytical::greeks(params),
    };

    let validation = validation::run_all_validations(params, steps)?;
    debug!(
        passed = validation.passed_tests,
        total = validation.total_tests,
        "validation complete"
    );

    Ok(PricingResponse {
        black_scholes,
        binomial: binomial_block.result,
        trinomial: trinomial_block.result,
        lattices: LatticeGallery {
            put: LatticePair {
                binomial: binomial_block.plot_put,
                trinomial: trinomial_block.plot_put,
            },
            call: LatticePair {
                binomial: binomial_block.plot_call,
                trinomial: trinomial_block.plot_call,
            },
        },
        validation,
    })
}

fn run_binomial_block(
    params: &MarketParams,
    steps: usize,
    plot_steps: usize,
) -> Result<ModelBlock, PricingError> {
    let european_call = LatticeSpec::new(*params, steps, OptionType::Call, ExerciseStyle::European)?;
    let european_put = LatticeSpec::new(*params, steps, OptionType::Put, ExerciseStyle::European)?;
    let american_call = LatticeSpec::new(*params, steps, OptionType::Call, ExerciseStyle::American)?;
    let american_put = LatticeSpec::new(*params, steps, OptionType::Put, ExerciseStyle::American)?;

    let result = LatticeResult {
        european_call: binomial::price(&european_call),
        european_put: binomial::price(&european_put),
        american_call: binomial::price(&american_call),
        american_put: binomial::price(&american_put),
        convergence: convergence::sweep(params, LatticeModel::Binomial, steps),
        boundary_put: binomial::exercise_boundary(&american_put),
        boundary_call: binomial::exercise_boundary(&american_call),
    };

    let plot_put = LatticeSpec::new(*params, plot_steps, OptionType::Put, ExerciseStyle::American)?;
    let plot_call =
        LatticeSpec::new(*params, plot_steps, OptionType::Call, ExerciseStyle::American)?;

    Ok(ModelBlock {
        result,
        plot_put: binomial::materialize(&plot_put),
        plot_call: binomial::materialize(&plot_call),
    })
}

fn run_trinomial_block(
    params: &MarketParams,
    steps: usize,
    plot_steps: usize,
) -> Result<ModelBlock, PricingError> {
    let european_call = LatticeSpec::new(*params, steps, OptionType::Call, ExerciseStyle::European)?;
    let european_put = LatticeSpec::new(*params, steps, OptionType::Put, ExerciseStyle::European)?;
    let american_call = LatticeSpec::new(*params, steps, OptionType::Call, ExerciseStyle::American)?;
    let american_put = LatticeSpec::new(*params, steps, OptionType::Put, ExerciseStyle::American)?;

    let result = LatticeResult {
        european_call: trinomial::price(&european_call)?,
        european_put: trinomial::price(&european_put)?,
        american_call: trinomial::price(&american_call)?,
        american_put: trinomial::price(&american_put)?,
        convergence: convergence::sweep(params, LatticeModel::Trinomial, steps),
        boundary_put: trinomial::exercise_boundary(&american_put)?,
        boundary_call: trinomial::exercise_boundary(&american_call)?,
    };

    let plot_put = LatticeSpec::new(*params, plot_steps, OptionType::Put, ExerciseStyle::American)?;
    let plot_call =
        LatticeSpec::new(*params, plot_steps, OptionType::Call, ExerciseStyle::American)?;

    Ok(ModelBlock {
        result,
        plot_put: trinomial::materialize(&plot_put)?,
        plot_call: trinomial::materialize(&plot_call)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn standard_params() -> MarketParams {
        MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap()
    }

    // ==========================================================
    // Response shape
    // ==========================================================

    #[test]
    fn test_response_shape() {
        let response = calculate_all(&standard_params(), 50).unwrap();

        assert_eq!(response.binomial.convergence.len(), 50);
        assert_eq!(response.trinomial.convergence.len(), 50);
        // Plot lattices are capped at 6 steps regardless of the pricing N
        assert_eq!(response.lattices.put.binomial.levels.len(), 7);
        assert_eq!(response.lattices.put.trinomial.levels.len(), 7);
        assert_eq!(response.lattices.call.binomial.levels.len(), 7);
        assert_eq!(response.validation.categories.len(), 5);
    }

    #[test]
    fn test_small_step_count_keeps_plot_lattice_size() {
        let response = calculate_all(&standard_params(), 4).unwrap();
        assert_eq!(response.lattices.put.binomial.levels.len(), 5);
    }

    #[test]
    fn test_models_agree_on_reference_scenario() {
        let response = calculate_all(&standard_params(), 250).unwrap();
        let reference = response.black_scholes.call_price;

        assert_relative_eq!(reference, 8.9161, epsilon = 1e-3);
        assert!((response.binomial.european_call - reference).abs() / reference < 0.0015);
        assert!((response.trinomial.european_call - reference).abs() / reference < 0.0008);
    }

    #[test]
    fn test_american_call_matches_european_without_dividends() {
        let response = calculate_all(&standard_params(), 200).unwrap();
        assert!(
            (response.binomial.american_call - response.binomial.european_call).abs() <= 1e-4
        );
        assert!(
            (response.trinomial.american_call - response.trinomial.european_call).abs() <= 1e-4
        );
        assert!(response.binomial.boundary_call.is_empty());
    }

    #[test]
    fn test_american_call_premium_with_dividends() {
        let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.03).unwrap();
        let response = calculate_all(&params, 250).unwrap();

        assert!(response.binomial.american_call > response.binomial.european_call);
        assert!(response.trinomial.american_call > response.trinomial.european_call);
        assert!(!response.binomial.boundary_call.is_empty());
    }

    #[test]
    fn test_put_boundaries_populated() {
        let response = calculate_all(&standard_params(), 100).unwrap();
        assert!(!response.binomial.boundary_put.is_empty());
        assert!(!response.trinomial.boundary_put.is_empty());
    }

    // ==========================================================
    // Failure modes
    // ==========================================================

    #[test]
    fn test_zero_steps_rejected() {
        let result = calculate_all(&standard_params(), 0);
        assert!(matches!(result, Err(PricingError::InvalidParameter(_))));
    }

    #[test]
    fn test_invalid_probabilities_abort_whole_computation() {
        let params = MarketParams::new(100.0, 100.0, 5.0, 0.20, 0.05, 0.0).unwrap();
        let result = calculate_all(&params, 1);
        assert!(matches!(
            result,
            Err(PricingError::InvalidProbabilities { .. })
        ));
    }

    // ==========================================================
    // Serialization
    // ==========================================================

    #[test]
    fn test_response_serializes_with_expected_keys() {
        let response = calculate_all(&standard_params(), 25).unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["black_scholes"]["greeks"]["delta"].is_number());
        assert!(json["binomial"]["european_call"].is_number());
        assert!(json["trinomial"]["boundary_put"].is_array());
        assert!(json["lattices"]["put"]["binomial"]["levels"].is_array());
        assert!(json["validation"]["overall_passed"].is_boolean());
    }
}
