//! Error types for the counsel core.
//!
//! Only configuration and audit-integrity failures abort a request. A
//! failed gate is a Refuse outcome, an empty candidate pool is a Stand
//! outcome, and collaborator outages degrade to conservative defaults -
//! none of those surface here.

use thiserror::Error;

/// Core error type for decision operations.
#[derive(Debug, Error)]
pub enum CounselError {
    /// Malformed thresholds, floors or clamp bounds. Fatal at startup
    /// or first use.
    #[error("configuration error: {0}")]
    Config(String),

    /// A recomputed proof token did not match. Fatal before any Answer
    /// is surfaced.
    #[error("audit integrity failure: {0}")]
    Audit(#[from] counsel_proofs::AuditError),

    /// Mandatory ledger persistence failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] counsel_proofs::LedgerError),

    /// Unknown will operator or invalid kernel clamp.
    #[error("kernel error: {0}")]
    Kernel(#[from] counsel_kernel::KernelError),

    /// Counter-draft derivation failed.
    #[error("shadow twin error: {0}")]
    Twin(#[from] counsel_twin::TwinError),
}
