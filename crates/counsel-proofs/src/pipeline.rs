//! The proof-carrying pipeline.
//!
//! Builds the ordered proof list for a draft + answer pair, blends the
//! risk score, and commits the result through the decision ledger.

use crate::advice::{AdviceDraft, AdviceWithProof};
use crate::collaborators::{
    Assessment, ExternalityPricer, HarmPenalties, HarmsIndex, RemembranceSource,
    StaticRemembrance,
};
use crate::harms::HarmsRecorder;
use crate::ledger::{DecisionLedger, LedgerError, LedgerRecord, MemoryLedger};
use crate::pricer::DeclaredPlanPricer;
use crate::proof::{Proof, ProofName};
use counsel_gates::{apophatic, consent, epoch_seconds, externality, ApophaticPolicy, ConsentScope};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Thresholds and weights for proof building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Externality coverage target. Default 0.75.
    pub coverage_target: f64,
    /// Soft bound on summed harm penalties. Default 0.75.
    pub harm_bound: f64,
    /// Remembrance-retention target. Default 0.70.
    pub remembrance_target: f64,
    /// Weight of expected externality cost in the risk blend. Default 0.6.
    pub externality_risk_weight: f64,
    /// Weight of summed harm penalties in the risk blend. Default 0.4.
    pub harm_risk_weight: f64,
    /// Whether a failed ledger write aborts the commit. Default false.
    pub ledger_required: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            coverage_target: 0.75,
            harm_bound: 0.75,
            remembrance_target: 0.70,
            externality_risk_weight: 0.6,
            harm_risk_weight: 0.4,
            ledger_required: false,
        }
    }
}

impl PipelineConfig {
    /// Rejects out-of-range thresholds.
    pub fn validate(&self) -> Result<(), String> {
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        if !unit(self.coverage_target) || !unit(self.remembrance_target) {
            return Err("coverage and remembrance targets must be in [0, 1]".to_string());
        }
        if !self.harm_bound.is_finite() || self.harm_bound < 0.0 {
            return Err("harm bound must be finite and non-negative".to_string());
        }
        if self.externality_risk_weight < 0.0 || self.harm_risk_weight < 0.0 {
            return Err("risk weights must be non-negative".to_string());
        }
        Ok(())
    }
}

/// Outcome of a ledger commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitOutcome {
    /// Ledger reference, `None` if the write failed non-fatally.
    pub ledger_id: Option<String>,
    /// Persistence warning when the write failed; never silently dropped.
    pub warning: Option<String>,
}

/// Builds proof-carrying advice and commits it to the ledger.
///
/// Cloning the pipeline shares its collaborators; building proofs takes
/// `&self` so decisions can run concurrently.
#[derive(Clone)]
pub struct ProofPipeline {
    config: PipelineConfig,
    policy: ApophaticPolicy,
    target_scope: Option<ConsentScope>,
    pricer: Arc<dyn ExternalityPricer>,
    harms: Arc<dyn HarmsIndex>,
    remembrance: Arc<dyn RemembranceSource>,
    ledger: Arc<dyn DecisionLedger>,
}

impl ProofPipeline {
    /// Creates a pipeline with the bundled collaborators.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            policy: ApophaticPolicy::default(),
            target_scope: None,
            pricer: Arc::new(DeclaredPlanPricer::default()),
            harms: Arc::new(HarmsRecorder::new()),
            remembrance: Arc::new(StaticRemembrance::default()),
            ledger: Arc::new(MemoryLedger::new()),
        }
    }

    /// Replaces the apophatic policy.
    pub fn with_policy(mut self, policy: ApophaticPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Requires consent to cover a specific scope.
    pub fn with_target_scope(mut self, scope: Option<ConsentScope>) -> Self {
        self.target_scope = scope;
        self
    }

    /// Replaces the externality pricer.
    pub fn with_pricer(mut self, pricer: Arc<dyn ExternalityPricer>) -> Self {
        self.pricer = pricer;
        self
    }

    /// Replaces the harms index.
    pub fn with_harms(mut self, harms: Arc<dyn HarmsIndex>) -> Self {
        self.harms = harms;
        self
    }

    /// Replaces the remembrance source.
    pub fn with_remembrance(mut self, remembrance: Arc<dyn RemembranceSource>) -> Self {
        self.remembrance = remembrance;
        self
    }

    /// Replaces the decision ledger.
    pub fn with_ledger(mut self, ledger: Arc<dyn DecisionLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Builds the full proof set for a draft + answer pair.
    ///
    /// Runs all five gates in order. Collaborator failures degrade to
    /// conservative inputs - zero coverage, saturated penalties, zero
    /// retention - and are recorded in the proof details.
    pub fn build(&self, draft: &AdviceDraft, answer: &str) -> AdviceWithProof {
        let now = epoch_seconds();
        let mut proofs = Vec::with_capacity(5);

        // 1) Consent.
        let evidence = consent::check(&draft.context, self.target_scope, now);
        debug!(draft = %draft.id, ok = evidence.ok, "consent gate");
        proofs.push(Proof::new(
            ProofName::Consent,
            evidence.ok,
            serde_json::to_value(&evidence).unwrap_or_else(|_| json!({})),
        ));

        // 2) Apophatic.
        let report = apophatic::check(&self.policy, &draft.context, &draft.params);
        debug!(draft = %draft.id, ok = report.admissible, "apophatic gate");
        proofs.push(Proof::new(
            ProofName::Apophatic,
            report.admissible,
            json!({"violations": report.violations, "warnings": report.warnings}),
        ));

        // 3) Externalities.
        let (assessment, pricer_failure) = match self.pricer.assess(&draft.plan) {
            Ok(assessment) => (assessment, None),
            Err(e) => {
                warn!(draft = %draft.id, error = %e, "externality pricer unavailable");
                (Assessment::unavailable(), Some(e.to_string()))
            }
        };
        let ext_ok = externality::coverage_ok(
            assessment.coverage,
            assessment.rollback_ready,
            self.config.coverage_target,
        );
        let mut ext_details = json!({
            "coverage": assessment.coverage,
            "rollback_ready": assessment.rollback_ready,
            "target": self.config.coverage_target,
            "externals": assessment.externals,
        });
        if let Some(failure) = &pricer_failure {
            ext_details["unavailable"] = json!(failure);
        }
        proofs.push(Proof::new(ProofName::Externalities, ext_ok, ext_details));

        // 4) Harms.
        let (index, penalties, harms_failure) = match self.harms.compute_index() {
            Ok(index) => {
                let penalties = self.harms.penalties(&index);
                (Some(index), penalties, None)
            }
            Err(e) => {
                warn!(draft = %draft.id, error = %e, "harms index unavailable");
                (None, HarmPenalties::saturated(), Some(e.to_string()))
            }
        };
        let harms_ok = penalties.sum() <= self.config.harm_bound;
        let mut harms_details = json!({
            "index": index,
            "penalties": penalties,
            "bound": self.config.harm_bound,
        });
        if let Some(failure) = &harms_failure {
            harms_details["unavailable"] = json!(failure);
        }
        proofs.push(Proof::new(ProofName::HarmsLedger, harms_ok, harms_details));

        // 5) Remembrance.
        let (retention, remembrance_failure) = match self.remembrance.retention_score() {
            Ok(score) => (score, None),
            Err(e) => {
                warn!(draft = %draft.id, error = %e, "remembrance source unavailable");
                (0.0, Some(e.to_string()))
            }
        };
        let remembrance_ok = retention >= self.config.remembrance_target;
        let mut remembrance_details = json!({
            "score": retention,
            "target": self.config.remembrance_target,
        });
        if let Some(failure) = &remembrance_failure {
            remembrance_details["unavailable"] = json!(failure);
        }
        proofs.push(Proof::new(
            ProofName::Remembrance,
            remembrance_ok,
            remembrance_details,
        ));

        // Blend risk from expected externality cost and harm penalties.
        let risk = (self.config.externality_risk_weight * assessment.expected_cost()
            + self.config.harm_risk_weight * penalties.sum())
        .clamp(0.0, 1.0);

        AdviceWithProof {
            id: draft.id.clone(),
            answer: answer.to_string(),
            risk,
            proofs,
            assessment: json!({
                "externalities": assessment,
                "harms": {"index": index, "penalties": penalties},
            }),
            decided_at: now,
        }
    }

    /// Commits advice to the ledger.
    ///
    /// A failed write degrades to a `None` ledger reference with a
    /// persistence warning, unless persistence is mandatory, in which
    /// case the failure is an error.
    pub fn commit(&self, awp: &AdviceWithProof) -> Result<CommitOutcome, LedgerError> {
        let record = LedgerRecord::from_advice(awp);
        match self.ledger.register(&record) {
            Ok(ledger_id) => {
                debug!(advice = %awp.id, ledger = %ledger_id, "advice committed");
                Ok(CommitOutcome {
                    ledger_id: Some(ledger_id),
                    warning: None,
                })
            }
            Err(e) if self.config.ledger_required => {
                Err(LedgerError::WriteRequired(e.to_string()))
            }
            Err(e) => {
                warn!(advice = %awp.id, error = %e, "ledger write failed, result kept in memory");
                Ok(CommitOutcome {
                    ledger_id: None,
                    warning: Some(format!("ledger write failed: {}", e)),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CollaboratorError, HarmIndexSnapshot};
    use crate::ledger::Result as LedgerResult;
    use serde_json::{json, Value};

    fn draft() -> AdviceDraft {
        AdviceDraft::new("plan:001", "enable autonomous inbox triage for the org?")
            .with_plan(json!({
                "budget_lines": {"privacy": 0.9, "safety": 0.8, "technical_debt": 0.8},
                "rollback_recipe": "kill-switch + throttle + data quarantine"
            }))
            .with_params(json!({"will": "EXPANSION", "no_image": true}))
            .with_context(json!({"consent": {"valid": true, "scope": "org"}}))
    }

    struct DownPricer;
    impl ExternalityPricer for DownPricer {
        fn assess(&self, _plan: &Value) -> crate::collaborators::Result<Assessment> {
            Err(CollaboratorError::Unavailable("pricer offline".to_string()))
        }
    }

    struct DownHarms;
    impl HarmsIndex for DownHarms {
        fn compute_index(&self) -> crate::collaborators::Result<HarmIndexSnapshot> {
            Err(CollaboratorError::Timeout("harms index".to_string()))
        }
        fn penalties(&self, _index: &HarmIndexSnapshot) -> HarmPenalties {
            HarmPenalties::saturated()
        }
    }

    struct BrokenLedger;
    impl DecisionLedger for BrokenLedger {
        fn register(&self, _record: &LedgerRecord) -> LedgerResult<String> {
            Err(LedgerError::Storage("disk full".to_string()))
        }
    }

    #[test]
    fn test_build_produces_five_ordered_proofs() {
        let pipeline = ProofPipeline::new(PipelineConfig::default());
        let awp = pipeline.build(&draft(), "enable with reversible micro-moves");
        let names: Vec<&str> = awp.proofs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["consent", "apophatic", "externalities", "harms_ledger", "remembrance"]
        );
    }

    #[test]
    fn test_all_gates_pass_on_clean_draft() {
        let pipeline = ProofPipeline::new(PipelineConfig::default());
        let awp = pipeline.build(&draft(), "enable");
        assert!(awp.proofs.iter().all(|p| p.ok));
        assert!(awp.risk >= 0.0 && awp.risk <= 1.0);
    }

    #[test]
    fn test_tokens_reproducible_across_builds() {
        let pipeline = ProofPipeline::new(PipelineConfig::default());
        let a = pipeline.build(&draft(), "enable");
        let b = pipeline.build(&draft(), "enable");
        // Consent evidence embeds ticket issuance defaults derived from
        // the clock; compare the clock-free proofs.
        for name in [ProofName::Apophatic, ProofName::Externalities] {
            assert_eq!(
                a.proof(name).unwrap().token,
                b.proof(name).unwrap().token,
            );
        }
    }

    #[test]
    fn test_low_coverage_fails_externality_gate() {
        let pipeline = ProofPipeline::new(PipelineConfig::default());
        let low = draft().with_plan(json!({
            "budget_lines": {"privacy": 0.4, "safety": 0.4, "technical_debt": 0.4},
            "rollback_recipe": "kill-switch"
        }));
        let awp = pipeline.build(&low, "enable");
        assert!(!awp.proof_ok(ProofName::Externalities));
    }

    #[test]
    fn test_pricer_unavailable_degrades_conservatively() {
        let pipeline =
            ProofPipeline::new(PipelineConfig::default()).with_pricer(Arc::new(DownPricer));
        let awp = pipeline.build(&draft(), "enable");
        let proof = awp.proof(ProofName::Externalities).unwrap();
        assert!(!proof.ok);
        assert_eq!(proof.details["coverage"], json!(0.0));
        assert!(proof.details.get("unavailable").is_some());
    }

    #[test]
    fn test_harms_unavailable_fails_soft_gate() {
        let pipeline =
            ProofPipeline::new(PipelineConfig::default()).with_harms(Arc::new(DownHarms));
        let awp = pipeline.build(&draft(), "enable");
        assert!(!awp.proof_ok(ProofName::HarmsLedger));
        assert!(awp.risk > 0.0);
    }

    #[test]
    fn test_remembrance_below_target_fails() {
        let pipeline = ProofPipeline::new(PipelineConfig::default())
            .with_remembrance(Arc::new(StaticRemembrance::new(0.5)));
        let awp = pipeline.build(&draft(), "enable");
        assert!(!awp.proof_ok(ProofName::Remembrance));
    }

    #[test]
    fn test_commit_returns_ledger_id() {
        let ledger = Arc::new(MemoryLedger::new());
        let pipeline =
            ProofPipeline::new(PipelineConfig::default()).with_ledger(ledger.clone());
        let awp = pipeline.build(&draft(), "enable");
        let outcome = pipeline.commit(&awp).unwrap();
        assert!(outcome.ledger_id.is_some());
        assert!(outcome.warning.is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_failed_commit_degrades_with_warning() {
        let pipeline =
            ProofPipeline::new(PipelineConfig::default()).with_ledger(Arc::new(BrokenLedger));
        let awp = pipeline.build(&draft(), "enable");
        let outcome = pipeline.commit(&awp).unwrap();
        assert!(outcome.ledger_id.is_none());
        assert!(outcome.warning.unwrap().contains("disk full"));
    }

    #[test]
    fn test_failed_commit_errors_when_mandatory() {
        let config = PipelineConfig {
            ledger_required: true,
            ..PipelineConfig::default()
        };
        let pipeline = ProofPipeline::new(config).with_ledger(Arc::new(BrokenLedger));
        let awp = pipeline.build(&draft(), "enable");
        assert!(matches!(
            pipeline.commit(&awp),
            Err(LedgerError::WriteRequired(_))
        ));
    }

    #[test]
    fn test_config_validation() {
        assert!(PipelineConfig::default().validate().is_ok());
        let bad = PipelineConfig {
            coverage_target: 1.5,
            ..PipelineConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
