//! Cox-Ross-Rubinstein binomial lattice.
//!
//! CRR parameterization with continuous dividend yield:
//! `u = e^(σ√dt)`, `d = 1/u`, risk-neutral probability
//! `p = (e^((r-q)dt) - d) / (u - d)`, per-step discount `e^(-r·dt)`.
//!
//! At step `i` the tree has `i + 1` recombining nodes; with `k` up-moves the
//! stock price is `S·u^k·d^(i-k)`. Backward induction reuses a single value
//! buffer, and stock levels are generated with the multiplicative recurrence
//! `S·d^i·(u/d)^k` rather than a `powf` per node.

use pricer_core::types::{LatticeSpec, MarketParams};

use super::{
    degenerate_lattice, exercise_is_optimal, BoundaryPoint, BoundaryTracker, Lattice, LatticeNode,
};

/// CRR tree parameters derived from market inputs and a step count.
///
/// # Examples
/// ```
/// use pricer_core::types::MarketParams;
/// use pricer_models::lattice::binomial::CrrParams;
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// let tree = CrrParams::new(&params, 250);
///
/// // u·d = 1 and p lies in (0, 1) for sane inputs
/// assert!((tree.up * tree.down - 1.0).abs() < 1e-12);
/// assert!(tree.probability > 0.0 && tree.probability < 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CrrParams {
    /// Step length in years.
    pub dt: f64,
    /// Up-move factor `e^(σ√dt)`.
    pub up: f64,
    /// Down-move factor `1/u`.
    pub down: f64,
    /// Risk-neutral up probability.
    pub probability: f64,
    /// Per-step discount factor `e^(-r·dt)`.
    pub discount: f64,
}

impl CrrParams {
    /// Derives the tree parameters. Callers are responsible for handling the
    /// degenerate inputs (`T = 0`, `σ = 0`) for which `u = d` and the
    /// probability is undefined.
    pub fn new(params: &MarketParams, steps: usize) -> Self {
        let dt = params.expiry() / steps as f64;
        let up = (params.volatility() * dt.sqrt()).exp();
        let down = 1.0 / up;
        let probability = ((params.carry() * dt).exp() - down) / (up - down);
        let discount = (-params.rate() * dt).exp();

        Self {
            dt,
            up,
            down,
            probability,
            discount,
        }
    }
}

/// Prices a vanilla option on the CRR tree.
///
/// European values come from pure discounted backward induction; American
/// values additionally clamp each node to its intrinsic value.
///
/// # Examples
/// ```
/// use pricer_core::types::{ExerciseStyle, LatticeSpec, MarketParams, OptionType};
/// use pricer_models::lattice::binomial;
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// let spec = LatticeSpec::new(params, 250, OptionType::Call, ExerciseStyle::European).unwrap();
///
/// // Converges to the Black-Scholes value ≈ 8.9161
/// assert!((binomial::price(&spec) - 8.9161).abs() < 0.02);
/// ```
pub fn price(spec: &LatticeSpec) -> f64 {
    let params = spec.params();
    if params.expiry() == 0.0 || params.volatility() == 0.0 {
        return crate::analytical::price(params, spec.option_type());
    }

    let n = spec.steps();
    let tree = CrrParams::new(params, n);
    let ratio = tree.up / tree.down;
    let disc_up = tree.discount * tree.probability;
    let disc_down = tree.discount * (1.0 - tree.probability);

    // Terminal payoffs, k up-moves ascending
    let mut values = vec![0.0_f64; n + 1];
    let mut stock = params.spot() * tree.down.powi(n as i32);
    for value in values.iter_mut() {
        *value = spec.intrinsic(stock);
        stock *= ratio;
    }

    // In-place rollback: after step i, values[0..=i] holds that step's values
    let clamp = spec.exercise().is_american();
    for i in (0..n).rev() {
        if clamp {
            let mut stock = params.spot() * tree.down.powi(i as i32);
            for k in 0..=i {
                let continuation = disc_up * values[k + 1] + disc_down * values[k];
                values[k] = continuation.max(spec.intrinsic(stock));
                stock *= ratio;
            }
        } else {
            for k in 0..=i {
                values[k] = disc_up * values[k + 1] + disc_down * values[k];
            }
        }
    }

    values[0]
}

/// Materializes the full lattice for visualization: per-node stock price,
/// European value, American value, and early-exercise flag.
pub fn materialize(spec: &LatticeSpec) -> Lattice {
    let params = spec.params();
    if params.expiry() == 0.0 || params.volatility() == 0.0 {
        return degenerate_lattice(spec);
    }

    let n = spec.steps();
    let tree = CrrParams::new(params, n);
    let ratio = tree.up / tree.down;
    let disc_up = tree.discount * tree.probability;
    let disc_down = tree.discount * (1.0 - tree.probability);

    // Stock grid: level i has nodes k = 0..=i
    let mut stock_levels: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let mut level = Vec::with_capacity(i + 1);
        let mut stock = params.spot() * tree.down.powi(i as i32);
        for _ in 0..=i {
            level.push(stock);
            stock *= ratio;
        }
        stock_levels.push(level);
    }

    let terminal: Vec<f64> = stock_levels[n].iter().map(|&s| spec.intrinsic(s)).collect();

    // European pass: no exercise clamp
    let mut european: Vec<Vec<f64>> = vec![terminal.clone()];
    let mut next = terminal.clone();
    for i in (0..n).rev() {
        let current: Vec<f64> = (0..=i)
            .map(|k| disc_up * next[k + 1] + disc_down * next[k])
            .collect();
        european.push(current.clone());
        next = current;
    }
    european.reverse();

    // American pass, recording where exercise is optimal
    let mut american: Vec<Vec<f64>> = vec![terminal.clone()];
    let mut early: Vec<Vec<bool>> = vec![vec![false; terminal.len()]];
    let mut next = terminal;
    for i in (0..n).rev() {
        let mut current = Vec::with_capacity(i + 1);
        let mut flags = Vec::with_capacity(i + 1);
        for k in 0..=i {
            let continuation = disc_up * next[k + 1] + disc_down * next[k];
            let intrinsic = spec.intrinsic(stock_levels[i][k]);
            if exercise_is_optimal(intrinsic, continuation) {
                current.push(intrinsic);
                flags.push(true);
            } else {
                current.push(continuation);
                flags.push(false);
            }
        }
        american.push(current.clone());
        early.push(flags);
        next = current;
    }
    american.reverse();
    early.reverse();

    let levels = (0..=n)
        .map(|i| {
            (0..=i)
                .map(|k| LatticeNode {
                    stock: stock_levels[i][k],
                    european: european[i][k],
                    american: american[i][k],
                    early_exercise: early[i][k],
                })
                .collect()
        })
        .collect();

    Lattice { steps: n, levels }
}

/// Extracts the early-exercise boundary: at each time step, the critical
/// stock price among exercising nodes (highest for puts, lowest for calls).
/// The backward pass always applies the American exercise rule; steps with
/// no exercising node contribute no point. The result is chronological.
pub fn exercise_boundary(spec: &LatticeSpec) -> Vec<BoundaryPoint> {
    let params = spec.params();
    if params.expiry() == 0.0 || params.volatility() == 0.0 {
        return Vec::new();
    }

    let n = spec.steps();
    let tree = CrrParams::new(params, n);
    let ratio = tree.up / tree.down;
    let disc_up = tree.discount * tree.probability;
    let disc_down = tree.discount * (1.0 - tree.probability);

    let mut values = vec![0.0_f64; n + 1];
    let mut stock = params.spot() * tree.down.powi(n as i32);
    for value in values.iter_mut() {
        *value = spec.intrinsic(stock);
        stock *= ratio;
    }

    let mut boundary = Vec::new();
    for i in (0..n).rev() {
        let mut tracker = BoundaryTracker::new(spec.option_type());
        let mut stock = params.spot() * tree.down.powi(i as i32);
        for k in 0..=i {
            let continuation = disc_up * values[k + 1] + disc_down * values[k];
            let intrinsic = spec.intrinsic(stock);
            values[k] = continuation.max(intrinsic);
            if exercise_is_optimal(intrinsic, continuation) {
                tracker.observe(stock);
            }
            stock *= ratio;
        }

        if let Some(critical) = tracker.finish() {
            let time = i as f64 * tree.dt;
            boundary.push(BoundaryPoint {
                time,
                stock_price: critical,
                time_to_maturity: params.expiry() - time,
            });
        }
    }

    // Computed backwards; report time running forward
    boundary.reverse();
    boundary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytical;
    use approx::assert_relative_eq;
    use pricer_core::types::{ExerciseStyle, OptionType};

    fn spec(
        params: MarketParams,
        steps: usize,
        option_type: OptionType,
        exercise: ExerciseStyle,
    ) -> LatticeSpec {
        LatticeSpec::new(params, steps, option_type, exercise).unwrap()
    }

    fn standard_params() -> MarketParams {
        MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap()
    }

    // ==========================================================
    // Parameter tests
    // ==========================================================

    #[test]
    fn test_crr_params_reciprocal_moves() {
        let tree = CrrParams::new(&standard_params(), 100);
        assert_relative_eq!(tree.up * tree.down, 1.0, epsilon = 1e-14);
        assert!(tree.probability > 0.0 && tree.probability < 1.0);
        assert!(tree.discount < 1.0);
    }

    #[test]
    fn test_crr_single_step_martingale() {
        // p·u + (1-p)·d = e^((r-q)·dt) by construction
        let params = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.30, 0.02).unwrap();
        let tree = CrrParams::new(&params, 12);
        let growth = tree.probability * tree.up + (1.0 - tree.probability) * tree.down;
        assert_relative_eq!(growth, (params.carry() * tree.dt).exp(), epsilon = 1e-14);
    }

    // ==========================================================
    // European pricing
    // ==========================================================

    #[test]
    fn test_european_call_converges_to_black_scholes() {
        let params = standard_params();
        let reference = analytical::price(&params, OptionType::Call);
        let tree = price(&spec(
            params,
            250,
            OptionType::Call,
            ExerciseStyle::European,
        ));
        let relative_error = (tree - reference).abs() / reference;
        assert!(
            relative_error < 0.0015,
            "relative error {} too large",
            relative_error
        );
    }

    #[test]
    fn test_european_put_converges_to_black_scholes() {
        let params = standard_params();
        let reference = analytical::price(&params, OptionType::Put);
        let tree = price(&spec(params, 250, OptionType::Put, ExerciseStyle::European));
        assert!((tree - reference).abs() / reference < 0.0015);
    }

    #[test]
    fn test_put_call_parity() {
        let params = MarketParams::new(100.0, 105.0, 0.75, 0.03, 0.25, 0.02).unwrap();
        let call = price(&spec(params, 400, OptionType::Call, ExerciseStyle::European));
        let put = price(&spec(params, 400, OptionType::Put, ExerciseStyle::European));
        let forward_gap = params.forward_spot() - params.discounted_strike();
        assert!((call - put - forward_gap).abs() / params.spot() < 2e-4);
    }

    #[test]
    fn test_single_step_tree() {
        let params = standard_params();
        let tree = CrrParams::new(&params, 1);
        let up_payoff = (100.0 * tree.up - 100.0_f64).max(0.0);
        let expected = tree.discount * tree.probability * up_payoff;
        let call = price(&spec(params, 1, OptionType::Call, ExerciseStyle::European));
        assert_relative_eq!(call, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_expiry_zero_is_intrinsic() {
        let params = MarketParams::new(110.0, 100.0, 0.0, 0.02, 0.20, 0.0).unwrap();
        let call = price(&spec(params, 50, OptionType::Call, ExerciseStyle::European));
        assert_eq!(call, 10.0);
        let put = price(&spec(params, 50, OptionType::Put, ExerciseStyle::American));
        assert_eq!(put, 0.0);
    }

    #[test]
    fn test_zero_volatility_matches_analytic() {
        let params = MarketParams::new(100.0, 90.0, 1.0, 0.05, 0.0, 0.01).unwrap();
        let call = price(&spec(params, 50, OptionType::Call, ExerciseStyle::European));
        assert_relative_eq!(
            call,
            analytical::price(&params, OptionType::Call),
            epsilon = 1e-12
        );
    }

    // ==========================================================
    // American pricing
    // ==========================================================

    #[test]
    fn test_american_put_dominates_european() {
        let params = standard_params();
        let european = price(&spec(params, 200, OptionType::Put, ExerciseStyle::European));
        let american = price(&spec(params, 200, OptionType::Put, ExerciseStyle::American));
        assert!(american >= european - 1e-10);
        // ATM put on a positive-rate underlying carries a real premium
        assert!(american > european);
    }

    #[test]
    fn test_american_call_equals_european_without_dividends() {
        let params = standard_params();
        let european = price(&spec(
            params,
            200,
            OptionType::Call,
            ExerciseStyle::European,
        ));
        let american = price(&spec(
            params,
            200,
            OptionType::Call,
            ExerciseStyle::American,
        ));
        assert!((american - european).abs() <= 1e-4);
    }

    #[test]
    fn test_american_call_premium_with_dividends() {
        let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.03).unwrap();
        let european = price(&spec(
            params,
            250,
            OptionType::Call,
            ExerciseStyle::European,
        ));
        let american = price(&spec(
            params,
            250,
            OptionType::Call,
            ExerciseStyle::American,
        ));
        assert!(
            american > european,
            "expected positive early-exercise premium, eu={} am={}",
            european,
            american
        );
    }

    #[test]
    fn test_deep_itm_american_put_is_intrinsic() {
        let params = MarketParams::new(40.0, 100.0, 1.0, 0.05, 0.20, 0.0).unwrap();
        let american = price(&spec(params, 200, OptionType::Put, ExerciseStyle::American));
        assert_relative_eq!(american, 60.0, epsilon = 1e-6);
    }

    // ==========================================================
    // Materialization
    // ==========================================================

    #[test]
    fn test_materialize_level_shapes() {
        let lattice = materialize(&spec(
            standard_params(),
            6,
            OptionType::Put,
            ExerciseStyle::American,
        ));
        assert_eq!(lattice.steps, 6);
        assert_eq!(lattice.levels.len(), 7);
        for (i, level) in lattice.levels.iter().enumerate() {
            assert_eq!(level.len(), i + 1);
        }
    }

    #[test]
    fn test_materialize_root_matches_price() {
        let params = standard_params();
        let put_spec = spec(params, 6, OptionType::Put, ExerciseStyle::American);
        let lattice = materialize(&put_spec);

        let american_spec = spec(params, 6, OptionType::Put, ExerciseStyle::American);
        let european_spec = spec(params, 6, OptionType::Put, ExerciseStyle::European);
        assert_relative_eq!(
            lattice.levels[0][0].american,
            price(&american_spec),
            epsilon = 1e-10
        );
        assert_relative_eq!(
            lattice.levels[0][0].european,
            price(&european_spec),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_materialize_terminal_flags_false() {
        let lattice = materialize(&spec(
            standard_params(),
            5,
            OptionType::Put,
            ExerciseStyle::American,
        ));
        assert!(lattice.levels[5].iter().all(|node| !node.early_exercise));
    }

    #[test]
    fn test_materialize_stock_ascending_within_level() {
        let lattice = materialize(&spec(
            standard_params(),
            6,
            OptionType::Call,
            ExerciseStyle::American,
        ));
        for level in &lattice.levels {
            for pair in level.windows(2) {
                assert!(pair[0].stock < pair[1].stock);
            }
        }
    }

    #[test]
    fn test_materialize_degenerate_single_node() {
        let params = MarketParams::new(90.0, 100.0, 0.0, 0.02, 0.20, 0.0).unwrap();
        let lattice = materialize(&spec(params, 6, OptionType::Put, ExerciseStyle::American));
        assert_eq!(lattice.levels.len(), 1);
        let node = &lattice.levels[0][0];
        assert_eq!(node.american, 10.0);
        assert!(node.early_exercise);
    }

    // ==========================================================
    // Early-exercise boundary
    // ==========================================================

    #[test]
    fn test_put_boundary_chronological_and_below_strike() {
        let boundary = exercise_boundary(&spec(
            standard_params(),
            200,
            OptionType::Put,
            ExerciseStyle::American,
        ));
        assert!(!boundary.is_empty());
        for pair in boundary.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
        for point in &boundary {
            assert!(point.stock_price < 100.0);
            assert_relative_eq!(point.time + point.time_to_maturity, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_call_boundary_empty_without_dividends() {
        // Early exercise of a call is never optimal absent dividends
        let boundary = exercise_boundary(&spec(
            standard_params(),
            200,
            OptionType::Call,
            ExerciseStyle::American,
        ));
        assert!(boundary.is_empty());
    }

    #[test]
    fn test_call_boundary_appears_with_dividends() {
        let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.05).unwrap();
        let boundary = exercise_boundary(&spec(
            params,
            200,
            OptionType::Call,
            ExerciseStyle::American,
        ));
        assert!(!boundary.is_empty());
        for point in &boundary {
            assert!(point.stock_price > 100.0);
        }
    }

    #[test]
    fn test_boundary_empty_for_degenerate_inputs() {
        let params = MarketParams::new(100.0, 100.0, 0.0, 0.02, 0.20, 0.0).unwrap();
        let boundary = exercise_boundary(&spec(params, 50, OptionType::Put, ExerciseStyle::American));
        assert!(boundary.is_empty());
    }
}
