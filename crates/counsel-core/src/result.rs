//! Decision results and their proof bundles.

use counsel_gates::ConsentEvidence;
use counsel_solver::{Action, TruthValue, Verdict};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The grouped proofs attached to every decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofBundle {
    /// Truth basis and apophatic findings.
    pub logic: Value,
    /// Externality and harms snapshots.
    pub ethics: Value,
    /// Consent evidence: tickets, scope and TTL checks.
    pub consent: Value,
    /// Shadow-twin arbitration record, when a contemplation ran.
    pub phenomenology: Value,
    /// Recheck deadline, epoch seconds; set only when paradox-nearby.
    pub repair_horizon: Option<f64>,
}

impl ProofBundle {
    /// An empty bundle carrying only consent evidence, for refusals
    /// issued before the solver runs.
    pub fn refusal(consent: &ConsentEvidence, logic: Value) -> Self {
        Self {
            logic,
            ethics: Value::Object(Default::default()),
            consent: serde_json::to_value(consent).unwrap_or(Value::Null),
            phenomenology: Value::Object(Default::default()),
            repair_horizon: None,
        }
    }
}

/// The complete outcome of one decision instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResult {
    /// Final verdict.
    pub verdict: Verdict,
    /// The chosen action, absent for Refuse/Stand.
    pub chosen_action: Option<Action>,
    /// Kernel-shaped cost of the chosen action.
    pub effective_cost: Option<f64>,
    /// Coherence score of the chosen action.
    pub coherence: Option<f64>,
    /// Truth value driving the verdict, absent on early refusal.
    pub truth: Option<TruthValue>,
    /// The proof bundle.
    pub proofs: ProofBundle,
    /// Ledger reference, `None` if persistence failed or was skipped.
    pub ledger_id: Option<String>,
    /// Persistence warning when the ledger write failed non-fatally.
    pub persistence_warning: Option<String>,
}
