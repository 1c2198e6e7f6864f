//! # Counsel Core
//!
//! Unified facade for the counsel advisory-gating pipeline. Before any
//! recommendation is surfaced it must pass consent, apophatic and
//! externality-coverage checks; surviving candidates are ranked by a
//! lexicographic cost/benefit rule and a final tri-state verdict -
//! Answer, Refuse or Stand - is issued, sensitive to a four-valued truth
//! model and to paradox proximity. Every verdict carries a tamper-evident
//! bundle of proofs.
//!
//! ## Pipeline
//!
//! ```text
//!  draft + candidates
//!        |
//!        v
//!  +-------------+     +---------------+     +--------------+
//!  | Gate        | --> | Kernel-shaped | --> | Paradox gate |
//!  | checkers    |     | solver        |     | (A/R/S)      |
//!  +-------------+     +---------------+     +--------------+
//!        |                                          |
//!        v                                          v
//!  +-------------+     +---------------+     +--------------+
//!  | Proof       | --> | Shadow twin   | --> | Ledger       |
//!  | pipeline    |     | (optional)    |     | commit       |
//!  +-------------+     +---------------+     +--------------+
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use counsel_core::{CounselConfig, DecisionCore};
//! use counsel_proofs::AdviceDraft;
//! use counsel_solver::{Action, DecisionState};
//! use counsel_kernel::WillOperator;
//! use serde_json::json;
//!
//! let core = DecisionCore::new(CounselConfig::default()).unwrap();
//!
//! let draft = AdviceDraft::new("plan:001", "scale feature X?")
//!     .with_plan(json!({"budget_lines": {"privacy": 0.9, "safety": 0.9},
//!                       "rollback_recipe": "flag off"}))
//!     .with_params(json!({"will": "EXPANSION"}))
//!     .with_context(json!({"consent": {"valid": true, "scope": "org"}}));
//! let state = DecisionState::new("S5", WillOperator::Expansion)
//!     .with_context(draft.context.clone());
//! let candidates = vec![Action::new("a1", "scale with mitigation")
//!     .with_params(json!({"coverage": 0.9, "risk": 0.2,
//!                         "rollback_recipe": "flag off"}))];
//!
//! let result = core.decide(&draft, &state, &candidates).unwrap();
//! println!("{}", result.verdict);
//! ```
//!
//! ## Guarantees
//!
//! - Hard rails short-circuit: a consent or apophatic failure refuses
//!   before any candidate is scored.
//! - Every decision returns a structured result even on collaborator
//!   failure; only configuration and audit-integrity errors abort.
//! - Proof tokens are deterministic content hashes; the audit pass
//!   recomputes them before any Answer is surfaced.
//! - Ledger writes happen last; a cancelled decision never persists a
//!   partial result.

mod config;
mod counsel;
mod error;
mod result;

pub use config::CounselConfig;
pub use counsel::DecisionCore;
pub use error::CounselError;
pub use result::{DecisionResult, ProofBundle};

// Re-export component types for convenience.
pub use counsel_gates::{ApophaticPolicy, ConsentScope, ConsentTicket};
pub use counsel_kernel::{ActionProfile, KernelClamp, WillOperator};
pub use counsel_proofs::{
    AdviceDraft, AdviceWithProof, PipelineConfig, Proof, ProofName, ProofPipeline,
};
pub use counsel_solver::{
    Action, DecisionState, GateTable, ParadoxZone, SolverConfig, TruthValue, Verdict,
};
pub use counsel_twin::{ShadowTwin, TwinResult, TwinSelection};

/// Core result type for decision operations.
pub type Result<T> = std::result::Result<T, CounselError>;
