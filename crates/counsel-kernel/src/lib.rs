//! # Counsel Kernel
//!
//! Maps a discrete will operator to one of nine named geometric kernels.
//! Each kernel inspects a candidate's attributes (reversibility, scale,
//! coverage, repair plan, ...) and returns a multiplicative weight that
//! shapes raw cost before ranking: `effective = raw * weight`.
//!
//! Weights are clamped to a configured range (defaults 0.25 - 4.0).
//! An unknown operator is a fatal configuration error, never a silent
//! default.

mod error;
mod kernels;
mod operator;
mod profile;

pub use error::KernelError;
pub use kernels::{weight_for, KernelClamp};
pub use operator::WillOperator;
pub use profile::ActionProfile;

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
