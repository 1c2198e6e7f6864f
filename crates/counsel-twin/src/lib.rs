//! # Counsel Twin
//!
//! The shadow twin re-derives advice from an inverted premise before a
//! verdict is finalized: it flips the will operator through its counter
//! table, hardens every externality budget line to a high floor,
//! attaches a default rollback recipe, and runs the counter-draft
//! through the same proof pipeline as the primary. Arbitration is by
//! hard-gate survival first (consent, apophatic, externalities), then by
//! lower risk, with ties favoring the primary. The rationale records
//! which gates passed on each side - the audit trail for "we checked the
//! opposite case".

mod error;
mod twin;

pub use error::TwinError;
pub use twin::{ShadowTwin, TwinRationale, TwinResult, TwinSelection};
