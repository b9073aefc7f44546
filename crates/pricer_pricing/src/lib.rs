//! # Pricer Pricing (L3: Aggregation Engine)
//!
//! Composes the analytic model and both lattice engines into a single
//! serializable result, and cross-validates the three models against each
//! other and against no-arbitrage theory.
//!
//! This crate provides:
//! - `engine`: the aggregation orchestrator (`calculate_all`) producing the
//!   full pricing response: prices, Greeks, convergence curves,
//!   early-exercise boundaries, sample lattices, and the validation report
//! - `validation`: the five-category validation battery
//!   (`run_all_validations`)
//!
//! Every operation is a pure function of its scalar inputs; nothing is
//! cached between calls. The binomial and trinomial blocks of an
//! aggregation run concurrently, with sequential numerical semantics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod engine;
pub mod validation;

pub use engine::{calculate_all, PricingResponse};
pub use validation::{run_all_validations, ValidationReport};
