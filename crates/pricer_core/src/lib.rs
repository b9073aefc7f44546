//! # pricer_core: Foundation for the Lattice Option Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core serves as the bottom layer of the workspace, providing:
//! - Validated market parameter types: `MarketParams`, `LatticeSpec` (`types::params`)
//! - Option contract enums: `OptionType`, `ExerciseStyle`, `LatticeModel` (`types::option`)
//! - Greeks container: `Greeks` (`types::greeks`)
//! - Error types: `PricingError` (`types::error`)
//! - Standard normal distribution functions (`math::distributions`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external
//! dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Structured error derivation
//! - serde: Serialisation of value types
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::distributions::norm_cdf;
//! use pricer_core::types::{MarketParams, OptionType};
//!
//! // Validated market parameters: spot, strike, expiry, rate, vol, dividend yield
//! let params = MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap();
//! assert_eq!(params.spot(), 100.0);
//!
//! // Payoff helper
//! let payoff = OptionType::Call.intrinsic(110.0, 100.0);
//! assert_eq!(payoff, 10.0);
//!
//! // Standard normal CDF
//! let phi = norm_cdf(0.0_f64);
//! assert!((phi - 0.5).abs() < 1e-7);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
