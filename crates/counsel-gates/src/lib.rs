//! # Counsel Gates
//!
//! Pure pass/fail predicates that every decision must clear before any
//! candidate is scored. Three rails are enforced:
//!
//! - **Consent**: a valid ticket must be present and its scope must cover
//!   the requested scope (de-escalation only, never escalation).
//! - **Apophatic**: forbidden totalizing keys must be absent anywhere in
//!   the flattened context and parameters; constraint-only keys must be
//!   explicitly affirmed.
//! - **Externality**: declared coverage must meet the configured target
//!   and a rollback recipe must be ready.
//!
//! All checks are stateless and side-effect free. Any single failure at
//! the state level short-circuits the whole decision to Refuse before the
//! solver runs.

pub mod apophatic;
pub mod consent;
pub mod externality;
pub mod flatten;

mod error;

pub use apophatic::{ApophaticPolicy, ApophaticReport};
pub use consent::{ConsentEvidence, ConsentScope, ConsentTicket};
pub use error::GateError;
pub use flatten::flatten;

/// Result type for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

/// Current wall-clock time as fractional epoch seconds.
///
/// Decisions stamp proofs and validate ticket TTLs against this value.
/// A clock before the UNIX epoch degrades to 0.0, which conservatively
/// invalidates every ticket.
pub fn epoch_seconds() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
