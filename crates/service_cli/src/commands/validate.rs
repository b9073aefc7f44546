//! Validate command implementation.
//!
//! Runs only the cross-model validation battery and renders per-category
//! results. Exits nonzero when any test fails.

use pricer_core::types::MarketParams;
use pricer_pricing::validation;
use tracing::info;

use crate::{CliError, Result};

/// Run the validate command.
pub fn run(params: &MarketParams, steps: usize) -> Result<()> {
    info!("Running validation battery with N = {}...", steps);

    let report = validation::run_all_validations(params, steps)?;

    for category in &report.categories {
        let verdict = if category.all_passed { "PASS" } else { "FAIL" };
        println!("\n[{}] {}", verdict, category.name);
        for test in &category.tests {
            let mark = if test.passed { "✓" } else { "✗" };
            println!(
                "  {} {:<50} value={:.6}{} target={:.6}{}",
                mark, test.name, test.value, test.unit, test.target, test.unit
            );
        }
    }

    println!(
        "\nOverall: {}/{} tests passed",
        report.passed_tests, report.total_tests
    );

    if !report.overall_passed {
        return Err(CliError::ValidationFailed {
            passed: report.passed_tests,
            total: report.total_tests,
        });
    }

    Ok(())
}
