//! Error types for the gate crate.

use thiserror::Error;

/// Errors raised while interpreting gate inputs.
///
/// Gate *failures* are not errors - they are ordinary `false` outcomes.
/// These variants cover malformed inputs only.
#[derive(Debug, Error)]
pub enum GateError {
    /// A consent scope string was not one of the five lattice levels.
    #[error("unknown consent scope: '{0}'")]
    UnknownScope(String),
}
