//! Error types for the kernel crate.

use thiserror::Error;

/// Kernel configuration errors. Both variants are fatal: gate-affecting
/// configuration never falls back to an arbitrary default.
#[derive(Debug, Error)]
pub enum KernelError {
    /// A will-operator tag did not name any of the nine operators.
    #[error("unknown will operator: '{0}'")]
    UnknownOperator(String),

    /// Clamp bounds were non-finite, non-positive or inverted.
    #[error("invalid kernel clamp: min={min}, max={max}")]
    InvalidClamp {
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },
}
