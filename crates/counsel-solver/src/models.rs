//! Cost and coherence models.
//!
//! Raw cost and coherence come from collaborator models consumed behind
//! traits. The bundled implementations score candidates from their
//! declared attributes; real deployments substitute models backed by the
//! externality and harms subsystems.

use crate::action::Action;
use crate::state::DecisionState;
use counsel_gates::{apophatic, consent, epoch_seconds, ApophaticPolicy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure of a cost or coherence model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model could not be evaluated.
    #[error("model unavailable: {0}")]
    Unavailable(String),
}

/// Result type for model calls.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Computes a candidate's raw cost. More negative is better; a candidate
/// must cross the negative move threshold to count as an accepted move.
pub trait CostModel: Send + Sync {
    /// Raw cost of taking `action` in `state`.
    fn cost(&self, state: &DecisionState, action: &Action) -> Result<f64>;
}

/// Computes a candidate's coherence score in [0, 1].
pub trait CoherenceModel: Send + Sync {
    /// Coherence of taking `action` in `state` under the given weights.
    fn coherence(
        &self,
        state: &DecisionState,
        action: &Action,
        weights: &CoherenceWeights,
    ) -> Result<f64>;
}

/// Component weights for the coherence blend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CoherenceWeights {
    /// Weight of externality-coverage sufficiency. Default 0.55.
    pub coverage: f64,
    /// Weight of risk-derived coherence. Default 0.25.
    pub coherence: f64,
    /// Weight of rollback readiness. Default 0.10.
    pub rollback: f64,
    /// Weight of the dignity penalty. Default 0.25.
    pub dignity: f64,
}

impl Default for CoherenceWeights {
    fn default() -> Self {
        Self {
            coverage: 0.55,
            coherence: 0.25,
            rollback: 0.10,
            dignity: 0.25,
        }
    }
}

fn param_f64(action: &Action, key: &str, default: f64) -> f64 {
    action.params.get(key).and_then(Value::as_f64).unwrap_or(default)
}

fn param_present(action: &Action, key: &str) -> bool {
    match action.params.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

/// Bundled cost model scoring structural cleanliness.
///
/// Starts from the candidate's declared expected gain and adds penalties
/// for failing rails (consent 0.35, apophatic 0.25, thin coverage 0.20),
/// declared risk and harm pressure. A clean candidate lands well below
/// zero; a dirty one loses its negative sign and is rejected by the
/// move threshold.
#[derive(Debug, Clone)]
pub struct DriftCostModel {
    policy: ApophaticPolicy,
}

impl DriftCostModel {
    /// Creates the model with the default apophatic policy.
    pub fn new() -> Self {
        Self {
            policy: ApophaticPolicy::default(),
        }
    }
}

impl Default for DriftCostModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CostModel for DriftCostModel {
    fn cost(&self, state: &DecisionState, action: &Action) -> Result<f64> {
        let now = epoch_seconds();
        let consent_ok = consent::check(&state.context, None, now).ok
            || state.consent_tickets.iter().any(|t| t.is_valid(now));
        let apoph_ok =
            apophatic::check(&self.policy, &Value::Object(Default::default()), &action.params)
                .admissible;
        let coverage_ok = param_f64(action, "coverage", 0.0) >= 0.5;

        let mut rail_penalty = 0.0;
        if !consent_ok {
            rail_penalty += 0.35;
        }
        if !apoph_ok {
            rail_penalty += 0.25;
        }
        if !coverage_ok {
            rail_penalty += 0.20;
        }

        let mut risk = param_f64(action, "risk", 0.1);
        if param_present(action, "externality_priced") {
            let coverage = param_f64(action, "coverage", 0.0);
            risk = (risk + (1.0 - coverage) * 0.2).min(0.8);
        }
        let harm_penalty = param_f64(action, "energy_penalty", 0.0);
        let gain = param_f64(action, "expected_gain", 0.2);

        Ok(rail_penalty + 0.3 * risk + 0.4 * harm_penalty - gain)
    }
}

/// Bundled coherence model blending coverage sufficiency, risk-derived
/// stability, rollback readiness and dignity preservation.
#[derive(Debug, Clone)]
pub struct BlendCoherenceModel {
    /// Coverage level treated as fully sufficient.
    coverage_target: f64,
}

impl BlendCoherenceModel {
    /// Creates the model with the given coverage target.
    pub fn new(coverage_target: f64) -> Self {
        Self { coverage_target }
    }
}

impl Default for BlendCoherenceModel {
    fn default() -> Self {
        Self::new(0.75)
    }
}

impl CoherenceModel for BlendCoherenceModel {
    fn coherence(
        &self,
        _state: &DecisionState,
        action: &Action,
        weights: &CoherenceWeights,
    ) -> Result<f64> {
        let coverage = param_f64(action, "coverage", 0.0);
        let coverage_term = if self.coverage_target > 0.5 {
            ((coverage - 0.5) / (self.coverage_target - 0.5)).clamp(0.0, 1.0)
        } else {
            coverage
        };

        let risk = param_f64(action, "risk", 0.5);
        let stability = (1.0 - risk).max(0.0);

        let rollback = if param_present(action, "rollback_recipe") {
            1.0
        } else {
            0.0
        };
        let dignity_penalty = param_f64(action, "grace_penalty", 0.0);
        let repair_bonus = if param_present(action, "repair_plan") {
            0.08
        } else {
            0.0
        };

        Ok((weights.coverage * coverage_term
            + weights.coherence * stability
            + weights.rollback * rollback
            - weights.dignity * dignity_penalty
            + repair_bonus)
            .clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_kernel::WillOperator;
    use serde_json::json;

    fn state() -> DecisionState {
        DecisionState::new("S5", WillOperator::Expansion)
            .with_context(json!({"consent": {"valid": true, "scope": "org"}}))
    }

    fn clean_action() -> Action {
        Action::new("a1", "scale with mitigation").with_params(json!({
            "coverage": 0.9,
            "externality_priced": true,
            "risk": 0.2,
            "rollback_recipe": "rollback steps",
            "energy_penalty": 0.1,
            "grace_penalty": 0.05
        }))
    }

    #[test]
    fn test_clean_candidate_has_negative_cost() {
        let model = DriftCostModel::new();
        let cost = model.cost(&state(), &clean_action()).unwrap();
        assert!(cost < -0.05, "clean candidate should clear the move threshold, got {cost}");
    }

    #[test]
    fn test_missing_consent_raises_cost() {
        let model = DriftCostModel::new();
        let no_consent = DecisionState::new("S5", WillOperator::Expansion);
        let with = model.cost(&state(), &clean_action()).unwrap();
        let without = model.cost(&no_consent, &clean_action()).unwrap();
        assert!(without > with);
        assert!(without > -0.05);
    }

    #[test]
    fn test_forbidden_param_raises_cost() {
        let model = DriftCostModel::new();
        let tainted = clean_action().with_params(json!({
            "coverage": 0.9,
            "ground_is": "being"
        }));
        let clean = model.cost(&state(), &clean_action()).unwrap();
        let dirty = model.cost(&state(), &tainted).unwrap();
        assert!(dirty > clean);
    }

    #[test]
    fn test_coherence_rewards_coverage_and_rollback() {
        let model = BlendCoherenceModel::default();
        let weights = CoherenceWeights::default();
        let strong = model.coherence(&state(), &clean_action(), &weights).unwrap();
        let weak = model
            .coherence(
                &state(),
                &Action::new("a2", "scale blind").with_params(json!({"coverage": 0.2})),
                &weights,
            )
            .unwrap();
        assert!(strong > weak);
        assert!((0.0..=1.0).contains(&strong));
        assert!((0.0..=1.0).contains(&weak));
    }

    #[test]
    fn test_repair_plan_bonus() {
        let model = BlendCoherenceModel::default();
        let weights = CoherenceWeights::default();
        let with_repair = clean_action().with_params(json!({
            "coverage": 0.9,
            "risk": 0.2,
            "rollback_recipe": "steps",
            "repair_plan": true
        }));
        let base = model.coherence(&state(), &clean_action(), &weights).unwrap();
        let bonus = model.coherence(&state(), &with_repair, &weights).unwrap();
        assert!(bonus > base);
    }
}
