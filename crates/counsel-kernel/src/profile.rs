//! The fixed attribute set kernels inspect.
//!
//! Candidate parameters arrive as a free-form JSON map. They are resolved
//! into an [`ActionProfile`] once at the boundary, with documented
//! defaults, so the kernels never probe a loose map themselves.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric and boolean candidate attributes read by the kernels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionProfile {
    /// Whether the move can be undone. Default `true`.
    pub reversible: bool,
    /// Scaling factor of the move. Default 1.0 (no scaling).
    pub scale: f64,
    /// Declared externality coverage, 0..1. Default 0.0.
    pub coverage: f64,
    /// Whether externalities have been priced. Default `false`.
    pub externality_priced: bool,
    /// Whether a rollback recipe is attached. Default `false`.
    pub rollback_recipe: bool,
    /// Whether a repair plan is attached. Default `false`.
    pub repair_plan: bool,
    /// Whether the move carries feedback loops. Default `false`.
    pub feedback_loops: bool,
    /// How well the tending cadence fits the system, 0..1. Default 0.5.
    pub cadence_fit: f64,
    /// Whether the move leaves coercion intact. Default `false`.
    pub coercion_risk: bool,
    /// Humiliation risk, 0..1. Default 0.0.
    pub humiliation_risk: f64,
    /// Clutching/ownership-theater index, 0..1. Default 0.0.
    pub clutching_index: f64,
    /// Custody clarity, 0..1. Default 0.5.
    pub custody_clarity: f64,
    /// Direction coherence across apparent flips, 0..1. Default 0.5.
    pub direction_coherence: f64,
    /// Diffusion risk, 0..1. Default 0.0.
    pub diffusion_risk: f64,
    /// Aesthetic coherence, 0..1. Default 0.0.
    pub aesthetic_coherence: f64,
    /// Whether the aesthetic claim is priced and testable. Default `false`.
    pub aesthetic_priced: bool,
    /// Identity-theater index, 0..1. Default 0.0.
    pub identity_theater: f64,
    /// Kenosis signal (self-advantage negated, vow affirmed), 0..1.
    /// Default 0.0.
    pub kenosis_signal: f64,
    /// Explicit apophatic-boundary flag; `None` falls back to the
    /// state's paradox proximity.
    pub apophatic_nearby: Option<bool>,
}

impl Default for ActionProfile {
    fn default() -> Self {
        Self {
            reversible: true,
            scale: 1.0,
            coverage: 0.0,
            externality_priced: false,
            rollback_recipe: false,
            repair_plan: false,
            feedback_loops: false,
            cadence_fit: 0.5,
            coercion_risk: false,
            humiliation_risk: 0.0,
            clutching_index: 0.0,
            custody_clarity: 0.5,
            direction_coherence: 0.5,
            diffusion_risk: 0.0,
            aesthetic_coherence: 0.0,
            aesthetic_priced: false,
            identity_theater: 0.0,
            kenosis_signal: 0.0,
            apophatic_nearby: None,
        }
    }
}

fn get_f64(params: &Value, key: &str, default: f64) -> f64 {
    params.get(key).and_then(Value::as_f64).unwrap_or(default)
}

/// Truthiness for flag-like params: booleans count as themselves, a
/// non-empty string (e.g. an inline rollback recipe) counts as present.
fn get_flag(params: &Value, key: &str, default: bool) -> bool {
    match params.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Null) | None => default,
        Some(_) => true,
    }
}

impl ActionProfile {
    /// Resolves a profile from a candidate's parameter map, applying the
    /// documented defaults for absent fields.
    pub fn from_params(params: &Value, reversible: bool) -> Self {
        Self {
            reversible,
            scale: get_f64(params, "scale", 1.0),
            coverage: get_f64(params, "coverage", 0.0),
            externality_priced: get_flag(params, "externality_priced", false),
            rollback_recipe: get_flag(params, "rollback_recipe", false),
            repair_plan: get_flag(params, "repair_plan", false),
            feedback_loops: get_flag(params, "feedback_loops", false),
            cadence_fit: get_f64(params, "cadence_fit", 0.5),
            coercion_risk: get_flag(params, "coercion_risk", false),
            humiliation_risk: get_f64(params, "humiliation_risk", 0.0),
            clutching_index: get_f64(params, "clutching_index", 0.0),
            custody_clarity: get_f64(params, "custody_clarity", 0.5),
            direction_coherence: get_f64(params, "direction_coherence", 0.5),
            diffusion_risk: get_f64(params, "diffusion_risk", 0.0),
            aesthetic_coherence: get_f64(params, "aesthetic_coherence", 0.0),
            aesthetic_priced: get_flag(params, "aesthetic_priced", false),
            identity_theater: get_f64(params, "identity_theater", 0.0),
            kenosis_signal: get_f64(params, "kenosis_signal", 0.0),
            apophatic_nearby: params.get("apophatic_nearby").and_then(Value::as_bool),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let profile = ActionProfile::from_params(&json!({}), true);
        assert!(profile.reversible);
        assert_eq!(profile.scale, 1.0);
        assert_eq!(profile.cadence_fit, 0.5);
        assert!(!profile.rollback_recipe);
        assert!(profile.apophatic_nearby.is_none());
    }

    #[test]
    fn test_declared_fields_read() {
        let profile = ActionProfile::from_params(
            &json!({"scale": 2.0, "coverage": 0.9, "externality_priced": true}),
            false,
        );
        assert!(!profile.reversible);
        assert_eq!(profile.scale, 2.0);
        assert_eq!(profile.coverage, 0.9);
        assert!(profile.externality_priced);
    }

    #[test]
    fn test_string_rollback_recipe_counts_as_present() {
        let profile = ActionProfile::from_params(
            &json!({"rollback_recipe": "kill-switch + throttle"}),
            true,
        );
        assert!(profile.rollback_recipe);
        let empty = ActionProfile::from_params(&json!({"rollback_recipe": ""}), true);
        assert!(!empty.rollback_recipe);
    }
}
