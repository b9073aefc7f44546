//! CLI error types.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Convenience result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// A pricing operation rejected the inputs.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// An argument was syntactically valid but unsupported.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The response could not be serialised.
    #[error("Serialisation failed: {0}")]
    Serialisation(#[from] serde_json::Error),

    /// The validation battery reported failures.
    #[error("Validation failed: {passed}/{total} tests passed")]
    ValidationFailed {
        /// Number of passing tests.
        passed: usize,
        /// Total number of tests.
        total: usize,
    },
}
