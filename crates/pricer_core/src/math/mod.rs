//! Mathematical building blocks.
//!
//! This module provides:
//! - `distributions`: Standard normal CDF and PDF

pub mod distributions;

pub use distributions::{norm_cdf, norm_pdf};
