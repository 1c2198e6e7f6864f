//! The unified decision facade.
//!
//! [`DecisionCore`] wires the gate checkers, the kernel-shaped solver,
//! the paradox gate, the proof pipeline and the shadow twin behind one
//! entry point. Every decision is a pure synchronous computation over
//! its inputs plus read-only collaborator calls; methods take `&self`
//! so independent decisions may run concurrently, sharing only the
//! immutable configuration and the collaborators' own synchronization.

use crate::config::CounselConfig;
use crate::error::CounselError;
use crate::result::{DecisionResult, ProofBundle};

use counsel_gates::{apophatic, consent, epoch_seconds, ConsentEvidence};
use counsel_proofs::{
    audit, AdviceDraft, AdviceWithProof, DecisionLedger, ExternalityPricer, HarmsIndex,
    ProofPipeline, RemembranceSource,
};
use counsel_solver::{
    Action, BlendCoherenceModel, CoherenceModel, CostModel, DecisionState, DriftCostModel,
    GateInput, MoveSolver, SelectedMove, TruthValue, Verdict,
};
use counsel_twin::{ShadowTwin, TwinResult};

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The counsel decision facade.
///
/// # Pipeline
///
/// 1. State-level hard rails (consent, apophatic) - any failure
///    short-circuits to Refuse before the solver runs.
/// 2. Minimal-clean-move selection, kernel-weighted.
/// 3. Paradox-gate classification over the assembled decision context.
/// 4. Proof build and audit verification - a token mismatch aborts
///    before any Answer is surfaced.
/// 5. Optional shadow-twin confirmation.
/// 6. Ledger commit; a failed write degrades to a null ledger
///    reference with a persistence warning.
pub struct DecisionCore {
    /// Immutable configuration.
    config: CounselConfig,
    /// Proof pipeline shared with the twin.
    pipeline: ProofPipeline,
    /// The minimal-clean-move solver.
    solver: MoveSolver,
    /// The adversarial contemplator.
    twin: ShadowTwin,
}

impl DecisionCore {
    /// Creates a core with bundled collaborators and models.
    ///
    /// # Errors
    ///
    /// Returns [`CounselError::Config`] if any threshold, floor or
    /// clamp bound is malformed.
    pub fn new(config: CounselConfig) -> Result<Self, CounselError> {
        config.validate().map_err(CounselError::Config)?;

        let pipeline = ProofPipeline::new(config.pipeline.clone())
            .with_policy(config.apophatic.clone())
            .with_target_scope(config.target_scope);
        let solver = MoveSolver::new(
            config.solver.clone(),
            Box::new(DriftCostModel::new()),
            Box::new(BlendCoherenceModel::default()),
        );

        info!(twin_check = config.twin_check, "decision core initialized");
        Ok(Self {
            config,
            pipeline,
            solver,
            twin: ShadowTwin::new(),
        })
    }

    /// Replaces the pipeline collaborators.
    pub fn with_collaborators(
        mut self,
        pricer: Arc<dyn ExternalityPricer>,
        harms: Arc<dyn HarmsIndex>,
        remembrance: Arc<dyn RemembranceSource>,
        ledger: Arc<dyn DecisionLedger>,
    ) -> Self {
        self.pipeline = self
            .pipeline
            .with_pricer(pricer)
            .with_harms(harms)
            .with_remembrance(remembrance)
            .with_ledger(ledger);
        self
    }

    /// Replaces the cost and coherence models.
    pub fn with_models(
        mut self,
        cost: Box<dyn CostModel>,
        coherence: Box<dyn CoherenceModel>,
    ) -> Self {
        self.solver = MoveSolver::new(self.config.solver.clone(), cost, coherence);
        self
    }

    /// The configuration in force.
    pub fn config(&self) -> &CounselConfig {
        &self.config
    }

    /// Evaluates a draft against a candidate set and issues a verdict.
    ///
    /// Always returns a structured result on gate failures, empty
    /// candidate pools and collaborator outages; only configuration and
    /// audit-integrity errors abort the request.
    pub fn decide(
        &self,
        draft: &AdviceDraft,
        state: &DecisionState,
        candidates: &[Action],
    ) -> Result<DecisionResult, CounselError> {
        let now = epoch_seconds();

        // Phase 1: state-level hard rails.
        let evidence = self.state_consent(draft, state, now);
        let report = apophatic::check(&self.config.apophatic, &draft.context, &draft.params);
        if !evidence.ok || !report.admissible {
            warn!(
                draft = %draft.id,
                consent = evidence.ok,
                apophatic = report.admissible,
                "hard rail failed, refusing before the solver"
            );
            let logic = json!({
                "apophatic_ok": report.admissible,
                "violations": report.violations,
                "warnings": report.warnings,
            });
            return Ok(DecisionResult {
                verdict: Verdict::Refuse,
                chosen_action: None,
                effective_cost: None,
                coherence: None,
                truth: None,
                proofs: ProofBundle::refusal(&evidence, logic),
                ledger_id: None,
                persistence_warning: None,
            });
        }

        // Phase 2: minimal clean move.
        let selected = self.solver.select(state, candidates);
        debug!(draft = %draft.id, accepted = selected.is_some(), "solver pass complete");

        // Phase 3: paradox-gate classification.
        let truth = selected
            .as_ref()
            .map(|m| m.action.predicted_truth)
            .unwrap_or(TruthValue::Neither);
        let paradox_nearby = state.paradox_nearby(&self.config.solver);
        let repair_horizon = paradox_nearby.then(|| self.config.repair.horizon_after(now));
        let input = GateInput {
            accepted: selected.is_some(),
            truth,
            consent_ok: true,
            apophatic_ok: true,
            cost_ok: selected.is_some(),
            coherence_ok: selected.is_some(),
            paradox_nearby,
            reversible_micro_move: selected
                .as_ref()
                .map(|m| m.action.is_reversible_micro_move())
                .unwrap_or(false),
            has_repair_horizon: repair_horizon.is_some(),
        };
        let verdict = self.config.gate_rules.evaluate(&input);
        info!(draft = %draft.id, verdict = %verdict, truth = %truth, "paradox gate classified");

        // Phase 4: proofs and audit.
        let answer_text = match (&verdict, &selected) {
            (Verdict::Answer, Some(m)) => m.action.description.clone(),
            _ => verdict.to_string(),
        };
        let awp = self.pipeline.build(draft, &answer_text);
        audit::verify(&awp)?;

        // Phase 5: optional adversarial confirmation.
        let phenomenology = if self.config.twin_check && verdict.is_answer() {
            let twin_result = self.twin.contemplate(&self.pipeline, draft, &answer_text)?;
            json!({
                "selection": twin_result.selection,
                "rationale": twin_result.rationale,
            })
        } else {
            json!({})
        };

        let proofs = ProofBundle {
            logic: json!({
                "truth": truth,
                "apophatic_ok": true,
                "warnings": report.warnings,
            }),
            ethics: awp.assessment.clone(),
            consent: serde_json::to_value(&evidence).unwrap_or_default(),
            phenomenology,
            repair_horizon,
        };

        // Phase 6: ledger commit, last - a cancelled decision must never
        // persist a partial result.
        let outcome = self.pipeline.commit(&awp)?;

        Ok(DecisionResult {
            verdict,
            chosen_action: selected.as_ref().map(|m| m.action.clone()),
            effective_cost: selected.as_ref().map(|m| m.effective_cost),
            coherence: selected.as_ref().map(|m| m.coherence),
            truth: Some(truth),
            proofs,
            ledger_id: outcome.ledger_id,
            persistence_warning: outcome.warning,
        })
    }

    /// Builds proof-carrying advice for a draft without deciding.
    pub fn build_advice(&self, draft: &AdviceDraft, answer: &str) -> AdviceWithProof {
        self.pipeline.build(draft, answer)
    }

    /// Runs the shadow-twin cross-check directly.
    pub fn contemplate(
        &self,
        draft: &AdviceDraft,
        primary_answer: &str,
    ) -> Result<TwinResult, CounselError> {
        Ok(self.twin.contemplate(&self.pipeline, draft, primary_answer)?)
    }

    /// Consent over the draft context, falling back to the state's own
    /// tickets when the context carries none that qualify.
    fn state_consent(
        &self,
        draft: &AdviceDraft,
        state: &DecisionState,
        now: f64,
    ) -> ConsentEvidence {
        let evidence = consent::check(&draft.context, self.config.target_scope, now);
        if evidence.ok || state.consent_tickets.is_empty() {
            return evidence;
        }
        let ok = state.consent_tickets.iter().any(|t| {
            t.is_valid(now)
                && match self.config.target_scope {
                    Some(target) => t.scope.covers(target),
                    None => true,
                }
        });
        if ok {
            ConsentEvidence {
                ok: true,
                tickets: state.consent_tickets.clone(),
                target_scope: self.config.target_scope,
                reason: "consent:validated".to_string(),
            }
        } else {
            evidence
        }
    }

    /// The currently selected move for a state, without classifying it.
    pub fn preview_move(
        &self,
        state: &DecisionState,
        candidates: &[Action],
    ) -> Option<SelectedMove> {
        self.solver.select(state, candidates)
    }
}
