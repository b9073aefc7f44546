//! Cross-model validation battery.
//!
//! Five independent test categories, each re-invoking the pricing models
//! with the caller's inputs and reporting measured value versus target:
//!
//! 1. **Convergence Analysis**: lattice European call error vs. Black-Scholes
//!    at the caller's step count, with targets that scale inversely in N
//! 2. **European Pricing Accuracy**: call and put errors for both lattices
//! 3. **Arbitrage & Put-Call Parity**: European lower bounds and the parity
//!    residual per model
//! 4. **American Option Checks**: put early-exercise premium is non-negative;
//!    without dividends, American and European calls coincide
//! 5. **Risk-Neutral Validity**: probabilities lie in [0, 1]; for small step
//!    counts, the analytic martingale identity holds
//!
//! All formulas are dividend-aware: bounds and parity discount the spot by
//! `e^(-qT)`, the martingale forward grows at `r - q`, and the
//! no-early-exercise call check only applies when the dividend yield is zero.

use pricer_core::types::{ExerciseStyle, LatticeSpec, MarketParams, OptionType, PricingError};
use pricer_models::lattice::binomial::{self, CrrParams};
use pricer_models::lattice::trinomial::{self, BoyleParams};
use pricer_models::analytical;
use serde::{Deserialize, Serialize};

/// Step count above which the martingale sub-test is omitted entirely.
const MARTINGALE_STEP_LIMIT: usize = 100;

/// One validation test: measured value versus target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationTest {
    /// Human-readable test name.
    pub name: String,
    /// Whether the measured value met the target.
    pub passed: bool,
    /// Measured value.
    pub value: f64,
    /// Target the value is compared against.
    pub target: f64,
    /// Unit of the measured value (`"%"`, `"$"`, or empty).
    pub unit: String,
}

impl ValidationTest {
    fn new(name: &str, passed: bool, value: f64, target: f64, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            passed,
            value,
            target,
            unit: unit.to_string(),
        }
    }
}

/// A category of validation tests with an aggregate verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCategory {
    /// Category name.
    pub name: String,
    /// Individual tests.
    pub tests: Vec<ValidationTest>,
    /// Conjunction of all test verdicts.
    pub all_passed: bool,
}

impl ValidationCategory {
    fn from_tests(name: &str, tests: Vec<ValidationTest>) -> Self {
        let all_passed = tests.iter().all(|test| test.passed);
        Self {
            name: name.to_string(),
            tests,
            all_passed,
        }
    }
}

/// The full validation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All categories, in report order.
    pub categories: Vec<ValidationCategory>,
    /// Whether every category passed.
    pub overall_passed: bool,
    /// Total number of tests run.
    pub total_tests: usize,
    /// Number of tests that passed.
    pub passed_tests: usize,
}

/// Relative error as a percentage, guarded against a near-zero reference.
#[inline]
fn relative_error_pct(value: f64, reference: f64) -> f64 {
    (value - reference).abs() / reference.abs().max(1e-16) * 100.0
}

fn european_spec(
    params: &MarketParams,
    steps: usize,
    option_type: OptionType,
) -> Result<LatticeSpec, PricingError> {
    LatticeSpec::new(*params, steps, option_type, ExerciseStyle::European)
}

fn american_spec(
    params: &MarketParams,
    steps: usize,
    option_type: OptionType,
) -> Result<LatticeSpec, PricingError> {
    LatticeSpec::new(*params, steps, option_type, ExerciseStyle::American)
}

/// Runs all five validation categories.
///
/// # Errors
/// `PricingError::InvalidParameter` for a step count below 1, and
/// `PricingError::InvalidProbabilities` when the trinomial probabilities
/// leave `[0, 1]` at the caller's step count.
///
/// # Examples
/// ```
/// use pricer_core::types::MarketParams;
/// use pricer_pricing::validation;
///
/// let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
/// let report = validation::run_all_validations(&params, 250).unwrap();
///
/// assert!(report.overall_passed);
/// assert_eq!(report.passed_tests, report.total_tests);
/// ```
pub fn run_all_validations(
    params: &MarketParams,
    steps: usize,
) -> Result<ValidationReport, PricingError> {
    let categories = vec![
        convergence_analysis(params, steps)?,
        european_accuracy(params, steps)?,
        arbitrage_and_parity(params, steps)?,
        american_checks(params, steps)?,
        risk_neutral_validity(params, steps),
    ];

    let total_tests = categories.iter().map(|cat| cat.tests.len()).sum();
    let passed_tests = categories
        .iter()
        .flat_map(|cat| cat.tests.iter())
        .filter(|test| test.passed)
        .count();
    let overall_passed = categories.iter().all(|cat| cat.all_passed);

    Ok(ValidationReport {
        categories,
        overall_passed,
        total_tests,
        passed_tests,
    })
}

/// Category 1: lattice European call error vs. Black-Scholes at the caller's
/// step count, with N-scaled targets.
fn convergence_analysis(
    params: &MarketParams,
    steps: usize,
) -> Result<ValidationCategory, PricingError> {
    let reference = analytical::price(params, OptionType::Call);
    let binomial_call = binomial::price(&european_spec(params, steps, OptionType::Call)?);
    let trinomial_call = trinomial::price(&european_spec(params, steps, OptionType::Call)?)?;

    let binomial_error = relative_error_pct(binomial_call, reference);
    let trinomial_error = relative_error_pct(trinomial_call, reference);

    let scale = if steps > 0 { 400.0 / steps as f64 } else { 1.0 };
    let binomial_target = 0.2 * scale;
    let trinomial_target = 0.1 * scale;

    Ok(ValidationCategory::from_tests(
        "Convergence Analysis",
        vec![
            ValidationTest::new(
                &format!("Binomial Convergence (N={})", steps),
                binomial_error <= binomial_target,
                binomial_error,
                binomial_target,
                "%",
            ),
            ValidationTest::new(
                &format!("Trinomial Convergence (N={})", steps),
                trinomial_error <= trinomial_target,
                trinomial_error,
                trinomial_target,
                "%",
            ),
        ],
    ))
}

/// Category 2: European call and put accuracy for both lattices.
fn european_accuracy(
    params: &MarketParams,
    steps: usize,
) -> Result<ValidationCategory, PricingError> {
    let reference_call = analytical::price(params, OptionType::Call);
    let reference_put = analytical::price(params, OptionType::Put);

    let binomial_call = binomial::price(&european_spec(params, steps, OptionType::Call)?);
    let binomial_put = binomial::price(&european_spec(params, steps, OptionType::Put)?);
    let trinomial_call = trinomial::price(&european_spec(params, steps, OptionType::Call)?)?;
    let trinomial_put = trinomial::price(&european_spec(params, steps, OptionType::Put)?)?;

    let scale = if steps > 0 { 250.0 / steps as f64 } else { 1.0 };
    let binomial_target = 0.15 * scale;
    let trinomial_target = 0.08 * scale;

    let binomial_call_error = relative_error_pct(binomial_call, reference_call);
    let binomial_put_error = relative_error_pct(binomial_put, reference_put);
    let trinomial_call_error = relative_error_pct(trinomial_call, reference_call);
    let trinomial_put_error = relative_error_pct(trinomial_put, reference_put);

    Ok(ValidationCategory::from_tests(
        "European Pricing Accuracy",
        vec![
            ValidationTest::new(
                "Binomial Call Accuracy",
                binomial_call_error <= binomial_target,
                binomial_call_error,
                binomial_target,
                "%",
            ),
            ValidationTest::new(
                "Binomial Put Accuracy",
                binomial_put_error <= binomial_target,
                binomial_put_error,
                binomial_target,
                "%",
            ),
            ValidationTest::new(
                "Trinomial Call Accuracy",
                trinomial_call_error <= trinomial_target,
                trinomial_call_error,
                trinomial_target,
                "%",
            ),
            ValidationTest::new(
                "Trinomial Put Accuracy",
                trinomial_put_error <= trinomial_target,
                trinomial_put_error,
                trinomial_target,
                "%",
            ),
        ],
    ))
}

/// Category 3: European lower bounds and the put-call parity residual.
fn arbitrage_and_parity(
    params: &MarketParams,
    steps: usize,
) -> Result<ValidationCategory, PricingError> {
    let binomial_call = binomial::price(&european_spec(params, steps, OptionType::Call)?);
    let binomial_put = binomial::price(&european_spec(params, steps, OptionType::Put)?);
    let trinomial_call = trinomial::price(&european_spec(params, steps, OptionType::Call)?)?;
    let trinomial_put = trinomial::price(&european_spec(params, steps, OptionType::Put)?)?;

    let discounted_spot = params.forward_spot();
    let discounted_strike = params.discounted_strike();
    let forward_gap = discounted_spot - discounted_strike;

    let call_floor = forward_gap.max(0.0);
    let put_floor = (-forward_gap).max(0.0);

    // Absolute parity gap, reported as % of spot for readability
    let binomial_parity_pct =
        ((binomial_call - binomial_put) - forward_gap).abs() / params.spot() * 100.0;
    let trinomial_parity_pct =
        ((trinomial_call - trinomial_put) - forward_gap).abs() / params.spot() * 100.0;

    Ok(ValidationCategory::from_tests(
        "Arbitrage & Put-Call Parity",
        vec![
            ValidationTest::new(
                "Call Lower Bound (C ≥ max(S·e^(-qT) - K·e^(-rT), 0))",
                binomial_call >= call_floor - 1e-6,
                binomial_call,
                call_floor,
                "$",
            ),
            ValidationTest::new(
                "Put Lower Bound (P ≥ max(K·e^(-rT) - S·e^(-qT), 0))",
                binomial_put >= put_floor - 1e-6,
                binomial_put,
                put_floor,
                "$",
            ),
            ValidationTest::new(
                "Put-Call Parity (Binomial)",
                binomial_parity_pct <= 0.02,
                binomial_parity_pct,
                0.02,
                "%",
            ),
            ValidationTest::new(
                "Put-Call Parity (Trinomial)",
                trinomial_parity_pct <= 0.02,
                trinomial_parity_pct,
                0.02,
                "%",
            ),
        ],
    ))
}

/// Category 4: American-specific checks. The no-early-exercise call check
/// only applies without dividends; with a dividend yield, a positive call
/// premium is legitimate.
fn american_checks(
    params: &MarketParams,
    steps: usize,
) -> Result<ValidationCategory, PricingError> {
    let binomial_put_eu = binomial::price(&european_spec(params, steps, OptionType::Put)?);
    let binomial_put_am = binomial::price(&american_spec(params, steps, OptionType::Put)?);
    let trinomial_put_eu = trinomial::price(&european_spec(params, steps, OptionType::Put)?)?;
    let trinomial_put_am = trinomial::price(&american_spec(params, steps, OptionType::Put)?)?;

    let binomial_premium = binomial_put_am - binomial_put_eu;
    let trinomial_premium = trinomial_put_am - trinomial_put_eu;

    let mut tests = vec![
        ValidationTest::new(
            "Put Early Exercise Premium (Binomial)",
            binomial_premium >= -1e-6,
            binomial_premium,
            0.0,
            "$",
        ),
        ValidationTest::new(
            "Put Early Exercise Premium (Trinomial)",
            trinomial_premium >= -1e-6,
            trinomial_premium,
            0.0,
            "$",
        ),
    ];

    if params.dividend_yield() == 0.0 {
        let binomial_call_eu = binomial::price(&european_spec(params, steps, OptionType::Call)?);
        let binomial_call_am = binomial::price(&american_spec(params, steps, OptionType::Call)?);
        let trinomial_call_eu =
            trinomial::price(&european_spec(params, steps, OptionType::Call)?)?;
        let trinomial_call_am =
            trinomial::price(&american_spec(params, steps, OptionType::Call)?)?;

        let binomial_gap = (binomial_call_am - binomial_call_eu).abs();
        let trinomial_gap = (trinomial_call_am - trinomial_call_eu).abs();

        tests.push(ValidationTest::new(
            "No Early Exercise - Call (Binomial)",
            binomial_gap <= 1e-4,
            binomial_gap,
            1e-4,
            "$",
        ));
        tests.push(ValidationTest::new(
            "No Early Exercise - Call (Trinomial)",
            trinomial_gap <= 1e-4,
            trinomial_gap,
            1e-4,
            "$",
        ));
    }

    Ok(ValidationCategory::from_tests(
        "American Option Checks",
        tests,
    ))
}

/// Category 5: risk-neutral probability sanity and, for small step counts,
/// the analytic martingale identity
/// `E[S_T] = S·(p·u + (1-p)·d)^N = S·e^((r-q)T)`.
fn risk_neutral_validity(params: &MarketParams, steps: usize) -> ValidationCategory {
    let crr = CrrParams::new(params, steps);
    let boyle = BoyleParams::unchecked(params, steps);

    let in_unit_interval = |p: f64| (0.0..=1.0).contains(&p);

    let mut tests = vec![
        ValidationTest::new(
            "Binomial Probability in [0,1]",
            in_unit_interval(crr.probability),
            crr.probability,
            0.5,
            "",
        ),
        ValidationTest::new(
            "Trinomial p_up in [0,1]",
            in_unit_interval(boyle.p_up),
            boyle.p_up,
            0.33,
            "",
        ),
        ValidationTest::new(
            "Trinomial p_mid in [0,1]",
            in_unit_interval(boyle.p_mid),
            boyle.p_mid,
            0.33,
            "",
        ),
        ValidationTest::new(
            "Trinomial p_down in [0,1]",
            in_unit_interval(boyle.p_down),
            boyle.p_down,
            0.33,
            "",
        ),
    ];

    if steps <= MARTINGALE_STEP_LIMIT {
        let growth = crr.probability * crr.up + (1.0 - crr.probability) * crr.down;
        let expected_terminal = params.spot() * growth.powi(steps as i32);
        let theoretical_terminal = params.spot() * (params.carry() * params.expiry()).exp();
        let martingale_error =
            (expected_terminal - theoretical_terminal).abs() / params.spot() * 100.0;

        tests.push(ValidationTest::new(
            "Martingale Property",
            martingale_error <= 0.1,
            martingale_error,
            0.1,
            "%",
        ));
    }

    ValidationCategory::from_tests("Risk-Neutral Validity", tests)
}
