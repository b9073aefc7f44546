//! # Pricer Models (L2: Pricing Models)
//!
//! Vanilla option pricing models: closed-form Black-Scholes-Merton and the
//! two lattice engines the validation battery cross-checks it against.
//!
//! This crate provides:
//! - Closed-form European prices and call Greeks with continuous dividend
//!   yield (`analytical`)
//! - Cox-Ross-Rubinstein binomial lattice: price, full per-node lattice,
//!   early-exercise boundary (`lattice::binomial`)
//! - Boyle (1988) trinomial lattice with the same capabilities
//!   (`lattice::trinomial`)
//! - Price-versus-step-count convergence sweeps (`convergence`)
//!
//! ## Design Principles
//!
//! - **Stateless free functions** over validated parameter types; every
//!   operation is a pure function of its inputs
//! - **One dividend-aware implementation per formula**: the no-dividend case
//!   is the `q = 0` point of the same code path, never a separate variant
//! - **Scratch-buffer backward induction**: lattice rollback reuses a single
//!   buffer instead of allocating per step

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod convergence;
pub mod lattice;

pub use convergence::ConvergencePoint;
pub use lattice::{BoundaryPoint, Lattice, LatticeNode};
