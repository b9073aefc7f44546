//! Price command implementation.
//!
//! Runs the aggregation engine and prints the result as JSON or a summary
//! table.

use pricer_core::types::MarketParams;
use pricer_pricing::engine::{self, PricingResponse};
use tracing::info;

use crate::{CliError, Result};

/// Run the price command.
pub fn run(params: &MarketParams, steps: usize, format: &str) -> Result<()> {
    info!("Starting pricing...");
    info!("  Spot: {}", params.spot());
    info!("  Strike: {}", params.strike());
    info!("  Maturity: {}y", params.expiry());
    info!("  Steps: {}", steps);

    let response = engine::calculate_all(params, steps)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "table" => {
            print_table(&response);
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, table",
                other
            )));
        }
    }

    info!("Pricing complete");
    Ok(())
}

fn print_table(response: &PricingResponse) {
    let greeks = &response.black_scholes.greeks;

    println!("\n┌───────────────┬────────────┬────────────┬────────────┬────────────┐");
    println!("│ Model         │ Eur. Call  │ Eur. Put   │ Am. Call   │ Am. Put    │");
    println!("├───────────────┼────────────┼────────────┼────────────┼────────────┤");
    println!(
        "│ Black-Scholes │ {:>10.4} │ {:>10.4} │            │            │",
        response.black_scholes.call_price, response.black_scholes.put_price
    );
    println!(
        "│ Binomial      │ {:>10.4} │ {:>10.4} │ {:>10.4} │ {:>10.4} │",
        response.binomial.european_call,
        response.binomial.european_put,
        response.binomial.american_call,
        response.binomial.american_put
    );
    println!(
        "│ Trinomial     │ {:>10.4} │ {:>10.4} │ {:>10.4} │ {:>10.4} │",
        response.trinomial.european_call,
        response.trinomial.european_put,
        response.trinomial.american_call,
        response.trinomial.american_put
    );
    println!("└───────────────┴────────────┴────────────┴────────────┴────────────┘");

    println!(
        "\nGreeks (call): delta={:.4}  gamma={:.4}  theta={:.4}/day  vega={:.4}/%  rho={:.4}/%",
        greeks.delta, greeks.gamma, greeks.theta, greeks.vega, greeks.rho
    );
    println!(
        "Validation: {}/{} tests passed",
        response.validation.passed_tests, response.validation.total_tests
    );
}
