//! Boyle trinomial lattice.
//!
//! Boyle (1988) parameterization with continuous dividend yield:
//! `u = e^(σ√(2dt))`, `d = 1/u`, middle factor 1. With
//! `a = e^((r-q)dt/2)` and `b = e^(σ√(dt/2))`:
//!
//! - `pu = ((a - 1/b) / (b - 1/b))²`
//! - `pd = ((b - a) / (b - 1/b))²`
//! - `pm = 1 - pu - pd`
//!
//! At step `i` the tree has `2i + 1` nodes indexed by net up-moves
//! `k ∈ [-i, i]` with stock price `S·u^k`. Parameter combinations that push
//! any probability outside `[0, 1]` (very small step counts with large
//! volatility or rates) are rejected with
//! [`PricingError::InvalidProbabilities`] before any rollback runs.

use pricer_core::types::{LatticeSpec, MarketParams, PricingError};

use super::{
    degenerate_lattice, exercise_is_optimal, BoundaryPoint, BoundaryTracker, Lattice, LatticeNode,
};

/// Tolerance for the probability-domain check.
const PROBABILITY_EPS: f64 = 1e-12;

/// Boyle tree parameters derived from market inputs and a step count.
///
/// # Examples
/// ```
/// use pricer_core::types::MarketParams;
/// use pricer_models::lattice::trinomial::BoyleParams;
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// let tree = BoyleParams::new(&params, 250).unwrap();
///
/// // The three probabilities form a distribution
/// let total = tree.p_up + tree.p_mid + tree.p_down;
/// assert!((total - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BoyleParams {
    /// Step length in years.
    pub dt: f64,
    /// Up-move factor `e^(σ√(2dt))`.
    pub up: f64,
    /// Down-move factor `1/u`.
    pub down: f64,
    /// Risk-neutral up probability.
    pub p_up: f64,
    /// Risk-neutral middle probability.
    pub p_mid: f64,
    /// Risk-neutral down probability.
    pub p_down: f64,
    /// Per-step discount factor `e^(-r·dt)`.
    pub discount: f64,
}

impl BoyleParams {
    /// Derives the tree parameters without the probability-domain check.
    ///
    /// Used where out-of-range probabilities are reported rather than
    /// rejected (the risk-neutral validation tests). Pricing paths go
    /// through [`BoyleParams::new`] instead.
    pub fn unchecked(params: &MarketParams, steps: usize) -> Self {
        let dt = params.expiry() / steps as f64;
        let up = (params.volatility() * (2.0 * dt).sqrt()).exp();
        let down = 1.0 / up;

        let a = (params.carry() * dt / 2.0).exp();
        let b = (params.volatility() * (dt / 2.0).sqrt()).exp();
        let inv_b = 1.0 / b;
        let denom = b - inv_b;

        let p_up = ((a - inv_b) / denom).powi(2);
        let p_down = ((b - a) / denom).powi(2);
        let p_mid = 1.0 - p_up - p_down;

        Self {
            dt,
            up,
            down,
            p_up,
            p_mid,
            p_down,
            discount: (-params.rate() * dt).exp(),
        }
    }

    /// Derives the tree parameters, rejecting probability combinations
    /// outside `[0, 1]`.
    ///
    /// # Errors
    /// `PricingError::InvalidProbabilities` when any of `pu`, `pm`, `pd`
    /// falls outside `[-ε, 1+ε]` for `ε = 1e-12`.
    pub fn new(params: &MarketParams, steps: usize) -> Result<Self, PricingError> {
        let tree = Self::unchecked(params, steps);

        let in_range =
            |p: f64| (-PROBABILITY_EPS..=1.0 + PROBABILITY_EPS).contains(&p) && p.is_finite();
        if !(in_range(tree.p_up) && in_range(tree.p_mid) && in_range(tree.p_down)) {
            return Err(PricingError::InvalidProbabilities {
                pu: tree.p_up,
                pm: tree.p_mid,
                pd: tree.p_down,
            });
        }

        Ok(tree)
    }
}

/// Prices a vanilla option on the Boyle tree.
///
/// # Errors
/// `PricingError::InvalidProbabilities` when the Boyle probabilities leave
/// `[0, 1]`; the remedy is a larger step count.
///
/// # Examples
/// ```
/// use pricer_core::types::{ExerciseStyle, LatticeSpec, MarketParams, OptionType};
/// use pricer_models::lattice::trinomial;
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// let spec = LatticeSpec::new(params, 250, OptionType::Call, ExerciseStyle::European).unwrap();
///
/// // Converges to the Black-Scholes value ≈ 8.9161
/// let price = trinomial::price(&spec).unwrap();
/// assert!((price - 8.9161).abs() < 0.01);
/// ```
pub fn price(spec: &LatticeSpec) -> Result<f64, PricingError> {
    let params = spec.params();
    if params.expiry() == 0.0 || params.volatility() == 0.0 {
        return Ok(crate::analytical::price(params, spec.option_type()));
    }

    let n = spec.steps();
    let tree = BoyleParams::new(params, n)?;
    let disc_up = tree.discount * tree.p_up;
    let disc_mid = tree.discount * tree.p_mid;
    let disc_down = tree.discount * tree.p_down;

    // Terminal payoffs at S·u^k, k = -N..=N ascending
    let mut values = vec![0.0_f64; 2 * n + 1];
    let mut stock = params.spot() * tree.down.powi(n as i32);
    for value in values.iter_mut() {
        *value = spec.intrinsic(stock);
        stock *= tree.up;
    }

    // In-place rollback: node j at step i reads children j (down), j+1 (mid),
    // j+2 (up) from the previous pass, none of which have been overwritten
    // yet when iterating j forward.
    let clamp = spec.exercise().is_american();
    for i in (0..n).rev() {
        let width = 2 * i + 1;
        if clamp {
            let mut stock = params.spot() * tree.down.powi(i as i32);
            for j in 0..width {
                let continuation =
                    disc_down * values[j] + disc_mid * values[j + 1] + disc_up * values[j + 2];
                values[j] = continuation.max(spec.intrinsic(stock));
                stock *= tree.up;
            }
        } else {
            for j in 0..width {
                values[j] =
                    disc_down * values[j] + disc_mid * values[j + 1] + disc_up * values[j + 2];
            }
        }
    }

    Ok(values[0])
}

/// Materializes the full lattice for visualization.
///
/// # Errors
/// `PricingError::InvalidProbabilities` on out-of-range Boyle probabilities.
pub fn materialize(spec: &LatticeSpec) -> Result<Lattice, PricingError> {
    let params = spec.params();
    if params.expiry() == 0.0 || params.volatility() == 0.0 {
        return Ok(degenerate_lattice(spec));
    }

    let n = spec.steps();
    let tree = BoyleParams::new(params, n)?;
    let disc_up = tree.discount * tree.p_up;
    let disc_mid = tree.discount * tree.p_mid;
    let disc_down = tree.discount * tree.p_down;

    // Stock grid: level i has nodes k = -i..=i
    let mut stock_levels: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let mut level = Vec::with_capacity(2 * i + 1);
        let mut stock = params.spot() * tree.down.powi(i as i32);
        for _ in 0..2 * i + 1 {
            level.push(stock);
            stock *= tree.up;
        }
        stock_levels.push(level);
    }

    let terminal: Vec<f64> = stock_levels[n].iter().map(|&s| spec.intrinsic(s)).collect();

    // European pass
    let mut european: Vec<Vec<f64>> = vec![terminal.clone()];
    let mut next = terminal.clone();
    for i in (0..n).rev() {
        let current: Vec<f64> = (0..2 * i + 1)
            .map(|j| disc_down * next[j] + disc_mid * next[j + 1] + disc_up * next[j + 2])
            .collect();
        european.push(current.clone());
        next = current;
    }
    european.reverse();

    // American pass with early-exercise flags
    let mut american: Vec<Vec<f64>> = vec![terminal.clone()];
    let mut early: Vec<Vec<bool>> = vec![vec![false; terminal.len()]];
    let mut next = terminal;
    for i in (0..n).rev() {
        let mut current = Vec::with_capacity(2 * i + 1);
        let mut flags = Vec::with_capacity(2 * i + 1);
        for j in 0..2 * i + 1 {
            let continuation =
                disc_down * next[j] + disc_mid * next[j + 1] + disc_up * next[j + 2];
            let intrinsic = spec.intrinsic(stock_levels[i][j]);
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
            (0..2 * i + 1)
                .map(|j| LatticeNode {
                    stock: stock_levels[i][j],
                    european: european[i][j],
                    american: american[i][j],
                    early_exercise: early[i][j],
                })
                .collect()
        })
        .collect();

    Ok(Lattice { steps: n, levels })
}

/// Extracts the early-exercise boundary, mirroring the binomial contract:
/// highest exercising stock price per step for puts, lowest for calls,
/// reported chronologically.
///
/// # Errors
/// `PricingError::InvalidProbabilities` on out-of-range Boyle probabilities.
pub fn exercise_boundary(spec: &LatticeSpec) -> Result<Vec<BoundaryPoint>, PricingError> {
    let params = spec.params();
    if params.expiry() == 0.0 || params.volatility() == 0.0 {
        return Ok(Vec::new());
    }

    let n = spec.steps();
    let tree = BoyleParams::new(params, n)?;
    let disc_up = tree.discount * tree.p_up;
    let disc_mid = tree.discount * tree.p_mid;
    let disc_down = tree.discount * tree.p_down;

    let mut values = vec![0.0_f64; 2 * n + 1];
    let mut stock = params.spot() * tree.down.powi(n as i32);
    for value in values.iter_mut() {
        *value = spec.intrinsic(stock);
        stock *= tree.up;
    }

    let mut boundary = Vec::new();
    for i in (0..n).rev() {
        let mut tracker = BoundaryTracker::new(spec.option_type());
        let mut stock = params.spot() * tree.down.powi(i as i32);
        for j in 0..2 * i + 1 {
            let continuation =
                disc_down * values[j] + disc_mid * values[j + 1] + disc_up * values[j + 2];
            let intrinsic = spec.intrinsic(stock);
            values[j] = continuation.max(intrinsic);
            if exercise_is_optimal(intrinsic, continuation) {
                tracker.observe(stock);
            }
            stock *= tree.up;
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

    boundary.reverse();
    Ok(boundary)
}
