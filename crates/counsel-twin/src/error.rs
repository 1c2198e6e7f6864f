//! Error types for the shadow twin.

use counsel_kernel::KernelError;
use thiserror::Error;

/// Errors raised while deriving a counter-draft.
#[derive(Debug, Error)]
pub enum TwinError {
    /// The draft carried a `will` tag naming no known operator. Fatal:
    /// the inversion table never substitutes a default.
    #[error("counter-draft derivation failed: {0}")]
    Operator(#[from] KernelError),

    /// The draft's `will` tag was not a string.
    #[error("will tag must be a string, got: {0}")]
    MalformedWillTag(String),
}
