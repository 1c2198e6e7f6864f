//! Counter-draft derivation and primary/counter arbitration.

use crate::error::TwinError;
use counsel_kernel::WillOperator;
use counsel_proofs::{AdviceDraft, AdviceWithProof, ProofName, ProofPipeline};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Which side the arbitration selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwinSelection {
    /// The primary advice won.
    Primary,
    /// The counter advice won.
    Counter,
}

/// Why the selection went the way it did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwinRationale {
    /// Whether the primary passed all three hard gates.
    pub primary_hard_ok: bool,
    /// Whether the counter passed all three hard gates.
    pub counter_hard_ok: bool,
    /// Primary risk score.
    pub primary_risk: f64,
    /// Counter risk score.
    pub counter_risk: f64,
    /// One-line explanation of the deciding comparison.
    pub note: String,
}

/// Both sides of a contemplation, with the arbitration outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwinResult {
    /// The primary advice and its proofs.
    pub primary: AdviceWithProof,
    /// The counter advice and its proofs.
    pub counter: AdviceWithProof,
    /// Which side won.
    pub selection: TwinSelection,
    /// The audit trail of the arbitration.
    pub rationale: TwinRationale,
}

/// The adversarial contemplator.
#[derive(Debug, Clone)]
pub struct ShadowTwin {
    /// Floor every budget line is raised to in the counter-draft.
    externality_floor: f64,
    /// Budget lines hardened even when the plan omits them.
    budget_keys: Vec<String>,
    /// Rollback recipe attached when the plan has none.
    default_rollback: String,
}

impl Default for ShadowTwin {
    fn default() -> Self {
        Self {
            externality_floor: 0.9,
            budget_keys: [
                "privacy",
                "safety",
                "environmental",
                "reputation",
                "technical_debt",
                "compute",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            default_rollback: "rollback: kill-switch + throttle + data quarantine".to_string(),
        }
    }
}

impl ShadowTwin {
    /// Creates a twin with the default hardening profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the externality floor.
    pub fn with_externality_floor(mut self, floor: f64) -> Self {
        self.externality_floor = floor.clamp(0.0, 1.0);
        self
    }

    /// Derives the counter-draft from a primary draft.
    ///
    /// Inverts the `will` operator through its counter table, raises
    /// every budget line to at least the floor, attaches the default
    /// rollback recipe if absent, and suffixes the draft id. Consent
    /// scope is left untouched: the counter must not escalate.
    pub fn counter_draft(&self, draft: &AdviceDraft) -> Result<AdviceDraft, TwinError> {
        let mut params = draft.params.clone();
        match draft.params.get("will") {
            Some(Value::String(tag)) => {
                let operator: WillOperator = tag.parse()?;
                params["will"] = json!(operator.invert().name());
            }
            Some(other) => {
                return Err(TwinError::MalformedWillTag(other.to_string()));
            }
            None => {}
        }

        let mut plan = draft.plan.clone();
        if !plan.is_object() {
            plan = Value::Object(Default::default());
        }
        let lines = plan
            .as_object_mut()
            .and_then(|p| {
                if !p.contains_key("budget_lines") {
                    p.insert("budget_lines".to_string(), json!({}));
                }
                p.get_mut("budget_lines")
            })
            .and_then(Value::as_object_mut);
        if let Some(lines) = lines {
            for key in &self.budget_keys {
                lines.entry(key.clone()).or_insert(json!(0.0));
            }
            let declared: Vec<String> = lines.keys().cloned().collect();
            for key in declared {
                let current = lines.get(&key).and_then(Value::as_f64).unwrap_or(0.0);
                lines.insert(key, json!(current.max(self.externality_floor)));
            }
        }
        if let Some(plan_map) = plan.as_object_mut() {
            let has_rollback = matches!(
                plan_map.get("rollback_recipe"),
                Some(Value::String(s)) if !s.is_empty()
            ) || matches!(plan_map.get("rollback_recipe"), Some(Value::Bool(true)));
            if !has_rollback {
                plan_map.insert("rollback_recipe".to_string(), json!(self.default_rollback));
            }
        }

        debug!(draft = %draft.id, "counter-draft derived");
        Ok(AdviceDraft {
            id: format!("{}:counter", draft.id),
            query: draft.query.clone(),
            plan,
            params,
            context: draft.context.clone(),
        })
    }

    /// The counter answer text: the primary text behind an explicit
    /// counter-move marker.
    pub fn counter_answer(&self, primary_answer: &str) -> String {
        format!("COUNTER-MOVE: {}", primary_answer)
    }

    /// Builds proofs for both sides and arbitrates.
    ///
    /// Hard-gate pass means consent, apophatic and externalities proofs
    /// all ok. Exactly one side passing wins outright; otherwise the
    /// lower risk wins, with ties favoring the primary.
    pub fn contemplate(
        &self,
        pipeline: &ProofPipeline,
        draft: &AdviceDraft,
        primary_answer: &str,
    ) -> Result<TwinResult, TwinError> {
        let primary = pipeline.build(draft, primary_answer);

        let counter_draft = self.counter_draft(draft)?;
        let counter_answer = self.counter_answer(primary_answer);
        let counter = pipeline.build(&counter_draft, &counter_answer);

        let primary_hard_ok = hard_ok(&primary);
        let counter_hard_ok = hard_ok(&counter);

        let (selection, note) = match (primary_hard_ok, counter_hard_ok) {
            (true, false) => (
                TwinSelection::Primary,
                "counter failed a hard gate".to_string(),
            ),
            (false, true) => (
                TwinSelection::Counter,
                "primary failed a hard gate".to_string(),
            ),
            _ => {
                if primary.risk <= counter.risk {
                    (
                        TwinSelection::Primary,
                        "lower risk among gates-passing candidates (ties favor primary)"
                            .to_string(),
                    )
                } else {
                    (
                        TwinSelection::Counter,
                        "lower risk among gates-passing candidates".to_string(),
                    )
                }
            }
        };

        info!(
            draft = %draft.id,
            selection = ?selection,
            primary_risk = primary.risk,
            counter_risk = counter.risk,
            "shadow twin arbitration"
        );

        let rationale = TwinRationale {
            primary_hard_ok,
            counter_hard_ok,
            primary_risk: primary.risk,
            counter_risk: counter.risk,
            note,
        };

        Ok(TwinResult {
            primary,
            counter,
            selection,
            rationale,
        })
    }
}

/// Whether advice passed all three hard gates.
fn hard_ok(awp: &AdviceWithProof) -> bool {
    awp.proof_ok(ProofName::Consent)
        && awp.proof_ok(ProofName::Apophatic)
        && awp.proof_ok(ProofName::Externalities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_proofs::{PipelineConfig, ProofPipeline};

    fn pipeline() -> ProofPipeline {
        ProofPipeline::new(PipelineConfig::default())
    }

    fn draft() -> AdviceDraft {
        AdviceDraft::new("plan:001", "enable autonomous inbox triage for the org?")
            .with_plan(json!({
                "data_kind": "personal",
                "deployment_scope": "org",
                "budget_lines": {"privacy": 0.9, "safety": 0.8, "technical_debt": 0.6}
            }))
            .with_params(json!({"will": "Expansion", "no_image": true}))
            .with_context(json!({"consent": {"valid": true, "scope": "org"}}))
    }

    #[test]
    fn test_counter_draft_inverts_will() {
        let twin = ShadowTwin::new();
        let counter = twin.counter_draft(&draft()).unwrap();
        assert_eq!(counter.params["will"], "POSSESSION");
        assert_eq!(counter.id, "plan:001:counter");
    }

    #[test]
    fn test_counter_draft_raises_budget_lines() {
        let twin = ShadowTwin::new();
        let counter = twin.counter_draft(&draft()).unwrap();
        let lines = counter.plan["budget_lines"].as_object().unwrap();
        for (_key, value) in lines {
            assert!(value.as_f64().unwrap() >= 0.9);
        }
        // Lines absent from the plan are hardened in too.
        assert_eq!(lines["compute"], json!(0.9));
    }

    #[test]
    fn test_counter_draft_attaches_rollback() {
        let twin = ShadowTwin::new();
        let counter = twin.counter_draft(&draft()).unwrap();
        assert!(counter.plan["rollback_recipe"]
            .as_str()
            .unwrap()
            .contains("kill-switch"));
    }

    #[test]
    fn test_counter_draft_keeps_consent_scope() {
        let twin = ShadowTwin::new();
        let counter = twin.counter_draft(&draft()).unwrap();
        assert_eq!(counter.context, draft().context);
    }

    #[test]
    fn test_counter_draft_without_will_tag() {
        let twin = ShadowTwin::new();
        let no_will = draft().with_params(json!({"no_image": true}));
        let counter = twin.counter_draft(&no_will).unwrap();
        assert!(counter.params.get("will").is_none());
    }

    #[test]
    fn test_unknown_will_tag_is_fatal() {
        let twin = ShadowTwin::new();
        let bad = draft().with_params(json!({"will": "DOMINION"}));
        assert!(matches!(
            twin.counter_draft(&bad),
            Err(TwinError::Operator(_))
        ));
    }

    #[test]
    fn test_contemplate_records_both_sides() {
        let twin = ShadowTwin::new();
        let result = twin
            .contemplate(&pipeline(), &draft(), "enable, gated by reversible micro-moves")
            .unwrap();
        assert_eq!(result.primary.id, "plan:001");
        assert_eq!(result.counter.id, "plan:001:counter");
        assert!(result
            .counter
            .answer
            .starts_with("COUNTER-MOVE: enable, gated"));
        assert_eq!(result.primary.proofs.len(), 5);
        assert_eq!(result.counter.proofs.len(), 5);
    }

    #[test]
    fn test_hard_gate_precedence() {
        // Primary plan has no rollback recipe and thin coverage: it
        // fails the externalities gate. The hardened counter passes all
        // three, so it wins outright despite any risk comparison.
        let twin = ShadowTwin::new();
        let weak = draft().with_plan(json!({
            "budget_lines": {"privacy": 0.4, "safety": 0.4}
        }));
        let result = twin.contemplate(&pipeline(), &weak, "enable").unwrap();
        assert!(!result.rationale.primary_hard_ok);
        assert!(result.rationale.counter_hard_ok);
        assert_eq!(result.selection, TwinSelection::Counter);
    }

    #[test]
    fn test_risk_tie_favors_primary() {
        // Fully hardened primary: the counter derivation changes
        // nothing material, so risks tie and the primary wins.
        let twin = ShadowTwin::new();
        let hardened = draft().with_plan(json!({
            "budget_lines": {
                "privacy": 0.95, "safety": 0.95, "environmental": 0.95,
                "reputation": 0.95, "technical_debt": 0.95, "compute": 0.95
            },
            "rollback_recipe": "kill-switch"
        }));
        let result = twin.contemplate(&pipeline(), &hardened, "enable").unwrap();
        assert_eq!(result.selection, TwinSelection::Primary);
    }
}
