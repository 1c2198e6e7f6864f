//! Collaborator contracts consumed by the pipeline.
//!
//! The externality pricer, harms index, remembrance source and decision
//! ledger are out-of-scope subsystems. They are consumed behind traits;
//! every call is fallible and implementations are expected to bound
//! their own calls with a timeout. The pipeline recovers from failures
//! with conservative defaults and records the degradation in the proof
//! details.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure of an external collaborator call.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The collaborator could not be reached.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The collaborator did not answer within its bound.
    #[error("collaborator timed out: {0}")]
    Timeout(String),
}

/// Result type for collaborator calls.
pub type Result<T> = std::result::Result<T, CollaboratorError>;

/// A single priced externality line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalLine {
    /// Line identifier.
    pub id: String,
    /// What the externality is.
    pub description: String,
    /// `positive` or `negative`.
    pub kind: String,
    /// Impact magnitude, -1.0 to 1.0.
    pub magnitude: f64,
    /// Probability the impact lands, 0..1.
    pub likelihood: f64,
}

impl ExternalLine {
    /// Expected cost contribution of this line.
    pub fn expected_cost(&self) -> f64 {
        self.magnitude.abs() * self.likelihood
    }
}

/// Externality assessment for a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Declared coverage of externalities, 0..1.
    pub coverage: f64,
    /// Whether a rollback recipe is ready.
    pub rollback_ready: bool,
    /// Priced externality lines.
    pub externals: Vec<ExternalLine>,
}

impl Assessment {
    /// The conservative assessment used when the pricer is unreachable:
    /// zero coverage fails the externality gate.
    pub fn unavailable() -> Self {
        Self {
            coverage: 0.0,
            rollback_ready: false,
            externals: Vec::new(),
        }
    }

    /// Sum of expected costs across all lines.
    pub fn expected_cost(&self) -> f64 {
        self.externals.iter().map(ExternalLine::expected_cost).sum()
    }
}

/// Prices the externalities of a plan.
pub trait ExternalityPricer: Send + Sync {
    /// Assesses a plan's externality coverage and rollback readiness.
    fn assess(&self, plan: &Value) -> Result<Assessment>;
}

/// Snapshot of the harms index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmIndexSnapshot {
    /// Aggregate harm pressure, 0..1.
    pub h: f64,
    /// Outstanding consent debt, 0..1.
    pub consent_debt: f64,
    /// Outstanding dignity debt, 0..1.
    pub dignity_debt: f64,
    /// How reversible the recorded harms are, 0..1.
    pub reversibility_score: f64,
}

/// Penalties derived from a harm index snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HarmPenalties {
    /// Penalty applied on the cost axis, 0..1.
    pub energy_penalty: f64,
    /// Penalty applied on the coherence axis, 0..1.
    pub grace_penalty: f64,
}

impl HarmPenalties {
    /// Combined penalty, checked against the soft harms bound.
    pub fn sum(&self) -> f64 {
        self.energy_penalty + self.grace_penalty
    }

    /// The conservative penalties used when the harms index is
    /// unreachable: both axes saturated, failing the soft gate.
    pub fn saturated() -> Self {
        Self {
            energy_penalty: 1.0,
            grace_penalty: 1.0,
        }
    }
}

/// Computes the harms index and its penalties.
pub trait HarmsIndex: Send + Sync {
    /// Current harms index.
    fn compute_index(&self) -> Result<HarmIndexSnapshot>;

    /// Penalties derived from a snapshot.
    fn penalties(&self, index: &HarmIndexSnapshot) -> HarmPenalties;
}

/// Supplies the remembrance-retention score.
pub trait RemembranceSource: Send + Sync {
    /// Retention score in [0, 1]; higher means less forgetting.
    fn retention_score(&self) -> Result<f64>;
}

/// Fixed-score stand-in for the memory substrate.
#[derive(Debug, Clone, Copy)]
pub struct StaticRemembrance {
    score: f64,
}

impl StaticRemembrance {
    /// Creates a source that always reports `score`.
    pub fn new(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
        }
    }
}

impl Default for StaticRemembrance {
    fn default() -> Self {
        Self::new(0.85)
    }
}

impl RemembranceSource for StaticRemembrance {
    fn retention_score(&self) -> Result<f64> {
        Ok(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_cost() {
        let line = ExternalLine {
            id: "e1".into(),
            description: "privacy exposure".into(),
            kind: "negative".into(),
            magnitude: -0.5,
            likelihood: 0.4,
        };
        assert!((line.expected_cost() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_unavailable_assessment_fails_gate() {
        let a = Assessment::unavailable();
        assert_eq!(a.coverage, 0.0);
        assert!(!a.rollback_ready);
        assert!(!counsel_gates::externality::coverage_ok(
            a.coverage,
            a.rollback_ready,
            0.75
        ));
    }

    #[test]
    fn test_saturated_penalties_exceed_bound() {
        assert!(HarmPenalties::saturated().sum() > 0.75);
    }

    #[test]
    fn test_static_remembrance_clamps() {
        assert_eq!(StaticRemembrance::new(2.0).retention_score().unwrap(), 1.0);
    }
}
