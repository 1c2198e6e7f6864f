//! Advice drafts and their proof-carrying results.

use crate::proof::Proof;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A draft recommendation entering the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceDraft {
    /// Draft identifier.
    pub id: String,
    /// The question being advised on.
    pub query: String,
    /// Free-form plan: budget lines, rollback recipe, deployment scope.
    pub plan: Value,
    /// Free-form knobs, including the `will` operator tag and apophatic
    /// hint flags.
    pub params: Value,
    /// Context map; must contain consent information.
    pub context: Value,
}

impl AdviceDraft {
    /// Creates a draft with empty plan, params and context.
    pub fn new(id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
            plan: Value::Object(Default::default()),
            params: Value::Object(Default::default()),
            context: Value::Object(Default::default()),
        }
    }

    /// Replaces the plan.
    pub fn with_plan(mut self, plan: Value) -> Self {
        self.plan = plan;
        self
    }

    /// Replaces the params.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Replaces the context.
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }
}

/// A recommendation with its full proof set. Immutable once built;
/// resolution or repair is recorded as new ledger entries, never edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceWithProof {
    /// Draft identifier this advice answers.
    pub id: String,
    /// The answer text.
    pub answer: String,
    /// Blended risk in [0, 1]; lower is better.
    pub risk: f64,
    /// Ordered gate attestations.
    pub proofs: Vec<Proof>,
    /// Externality and harms snapshot at decision time.
    pub assessment: Value,
    /// Decision timestamp, epoch seconds.
    pub decided_at: f64,
}

impl AdviceWithProof {
    /// Finds a proof by name.
    pub fn proof(&self, name: crate::proof::ProofName) -> Option<&Proof> {
        self.proofs.iter().find(|p| p.name == name)
    }

    /// Whether the named proof exists and passed.
    pub fn proof_ok(&self, name: crate::proof::ProofName) -> bool {
        self.proof(name).map(|p| p.ok).unwrap_or(false)
    }
}
