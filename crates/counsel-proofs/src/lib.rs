//! # Counsel Proofs
//!
//! Proof-carrying advice: every recommendation carries an ordered list of
//! named proofs (`consent`, `apophatic`, `externalities`, `harms_ledger`,
//! `remembrance`) showing which gates passed and why, plus a blended risk
//! score. Each proof is sealed with a content-hash token over its
//! canonicalized payload, so a later auditor can recompute the token and
//! detect tampering or nondeterminism.
//!
//! External collaborators (externality pricer, harms index, remembrance
//! source, decision ledger) are consumed behind traits. When one is
//! unavailable the pipeline degrades to conservative defaults - unknown
//! coverage counts as zero, which fails the externality gate - and the
//! failure is recorded in the proof details rather than dropped.

pub mod audit;
pub mod canonical;
pub mod collaborators;
pub mod harms;
pub mod ledger;
pub mod pipeline;
pub mod pricer;

mod advice;
mod proof;

pub use advice::{AdviceDraft, AdviceWithProof};
pub use audit::AuditError;
pub use collaborators::{
    Assessment, CollaboratorError, ExternalLine, ExternalityPricer, HarmIndexSnapshot,
    HarmPenalties, HarmsIndex, RemembranceSource, StaticRemembrance,
};
pub use harms::{HarmEvent, HarmsRecorder};
pub use ledger::{DecisionLedger, LedgerError, LedgerRecord, MemoryLedger, SledLedger};
pub use pipeline::{CommitOutcome, PipelineConfig, ProofPipeline};
pub use pricer::DeclaredPlanPricer;
pub use proof::{Proof, ProofName};
